//! # Workflows Module
//!
//! End-to-end entry points that tie the [`crate::engine`] tasks together.
//!
//! - **NEB Workflow** ([`neb`]) - Ranks host sites, places the guest, falls back to a
//!   second direction stencil when the path is too short, and samples the final
//!   reaction path.

pub mod neb;
