//! # MOFNEB Core Library
//!
//! Builds the initial reaction path for a nudged-elastic-band (NEB) study of a small
//! guest molecule moving through a host framework, such as a metal-organic framework.
//! Host atoms are ranked by partial charge, the guest is placed next to representative
//! sites without colliding with the host, and a short charge-ordered sequence of
//! host-guest complexes is written as an AMS NEB job.
//!
//! ## Architectural Philosophy
//!
//! - **[`core`]: The Foundation.** Atoms, periodic structures, the element table,
//!   covalent radii, minimum-image geometry and the file readers and writers
//!   (XYZ, charge lists, AMS output logs and AMS job scripts).
//!
//! - **[`engine`]: The Logic Core.** The individual stages (overlap checking, site
//!   ranking, placement search and path sampling), their configuration, error types
//!   and progress reporting.
//!
//! - **[`workflows`]: The Public API.** [`workflows::neb::run`] executes the whole
//!   procedure and returns the reaction path ready for serialization.

pub mod core;
pub mod engine;
pub mod workflows;
