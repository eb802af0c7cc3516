//! Amsterdam Modeling Suite (AMS) text interfaces.
//!
//! - [`job`] renders NEB run scripts from a sampled reaction path.
//! - [`log`] extracts geometries and partial charges from plain-text AMS output.

pub mod job;
pub mod log;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AmsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("A reaction path needs at least 2 images, found {found}")]
    TooFewImages { found: usize },
    #[error("Constrained atom count {constrained} exceeds the {atoms} atoms of image '{image}'")]
    ConstraintOutOfRange {
        image: String,
        constrained: usize,
        atoms: usize,
    },
    #[error("Section starting with '{0}' not found in AMS output")]
    SectionNotFound(&'static str),
    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },
}
