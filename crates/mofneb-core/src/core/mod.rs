//! # Core Module
//!
//! This module provides the stateless building blocks of MOFNEB: the data models
//! for host frameworks, guest species and host-guest complexes, the element and
//! covalent-radius tables, periodic geometry, and file I/O.
//!
//! ## Architecture
//!
//! - **Structure Representation** ([`models`]) - Atoms, periodic cells, structures, placements and reaction paths
//! - **Reference Data** ([`radii`]) - Covalent radius lookup with per-element overrides
//! - **Geometry** ([`utils::geometry`]) - Minimum-image distances under periodic boundary conditions
//! - **File I/O** ([`io`]) - XYZ structures, charge lists, AMS output parsing and NEB job writing
//!
//! Nothing in this module holds run state; the placement pipeline itself lives
//! in [`crate::engine`].

pub mod io;
pub mod models;
pub mod radii;
pub mod utils;
