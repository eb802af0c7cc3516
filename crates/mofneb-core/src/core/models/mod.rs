//! # Core Models Module
//!
//! This module contains the data structures used to represent host frameworks,
//! guest species and the host-guest complexes assembled from them.
//!
//! ## Key Components
//!
//! - [`element`] - Static element table (atomic numbers, masses, covalent radii)
//! - [`atom`] - Individual atom with element identity and Cartesian position
//! - [`structure`] - Ordered atoms with an optional periodic cell ([`structure::Lattice`])
//! - [`placement`] - Immutable host-guest complexes and the reaction paths built from them
//!
//! ## Usage
//!
//! ```
//! use mofneb::core::models::{atom::Atom, structure::{AtomicStructure, Lattice}};
//! use nalgebra::Point3;
//!
//! let lattice = Lattice::orthorhombic(10.0, 10.0, 10.0).unwrap();
//! let host = AtomicStructure::periodic(
//!     vec![Atom::new("Zn", Point3::new(0.0, 0.0, 0.0)).unwrap()],
//!     lattice,
//! );
//! assert!(host.validate().is_ok());
//! ```

pub mod atom;
pub mod element;
pub mod placement;
pub mod structure;
