//! Provides input/output functionality for structure, charge and job files.
//!
//! This module contains readers for the structures and partial charges consumed
//! by the placement engine, and the writer that turns a sampled reaction path
//! into an AMS NEB run script. Structure formats share the
//! [`traits::StructureFile`] interface.

pub mod ams;
pub mod charges;
pub mod traits;
pub mod xyz;
