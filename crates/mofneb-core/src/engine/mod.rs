//! # Engine Module
//!
//! The placement engine turns a host framework, a guest molecule and the host's
//! partial charges into a short, charge-ordered sequence of host-guest complexes.
//!
//! ## Architecture
//!
//! - **Tasks** ([`tasks`]) - Overlap checking, site ranking, placement search and path sampling
//! - **Configuration** ([`config`]) - Direction stencils, fallback policy and NEB job settings
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress reporting
//! - **Error Handling** ([`error`]) - Engine error taxonomy
//!
//! All tasks are deterministic. With the `parallel` feature the per-site
//! placement search runs on the rayon thread pool; results keep site order.

pub mod config;
pub mod error;
pub mod progress;
pub mod tasks;
