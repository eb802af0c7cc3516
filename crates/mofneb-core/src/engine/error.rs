use thiserror::Error;

use super::config::ConfigError;
use crate::core::utils::geometry::GeometryError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Precondition failed: host has {atoms} atoms but {charges} charges were supplied")]
    ChargeCountMismatch { atoms: usize, charges: usize },

    #[error("Inconsistent structure configuration: {source}")]
    Configuration {
        #[from]
        source: GeometryError,
    },

    #[error("Invalid configuration: {source}")]
    InvalidConfig {
        #[from]
        source: ConfigError,
    },

    #[error("Precondition failed: charge of site {index} is not a finite number")]
    NonFiniteCharge { index: usize },

    #[error("No covalent radius known for atomic number {atomic_number}")]
    UnknownElement { atomic_number: u8 },

    #[error("Guest structure contains no atoms")]
    EmptyGuest,

    #[error("No collision-free placement found for any of the {sites} representative sites")]
    NoValidPlacement { sites: usize },
}

impl EngineError {
    /// Whether this error is a violated input precondition (as opposed to a
    /// configuration problem or an exhausted search).
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            EngineError::ChargeCountMismatch { .. }
                | EngineError::NonFiniteCharge { .. }
                | EngineError::EmptyGuest
        )
    }

    /// Whether a caller may reasonably retry, e.g. with a different guest
    /// orientation or direction stencil.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, EngineError::NoValidPlacement { .. })
    }
}
