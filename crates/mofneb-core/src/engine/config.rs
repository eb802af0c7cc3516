use crate::core::io::ams::job::NebJob;
use crate::core::utils::geometry::normalized;
use nalgebra::Vector3;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Maximum number of images kept by the path sampler.
pub const MAX_PATH_LENGTH: usize = 7;
/// Default minimum path length below which the fallback stencil is tried.
pub const DEFAULT_MIN_PATH_LENGTH: usize = 4;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{parameter}': {reason}")]
    InvalidValue {
        parameter: &'static str,
        reason: String,
    },
}

#[rustfmt::skip]
const AXIS_DIRECTIONS: [[f64; 3]; 6] = [
    [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0],
    [-1.0, 0.0, 0.0], [0.0, -1.0, 0.0], [0.0, 0.0, -1.0],
];

#[rustfmt::skip]
const DIAGONAL_DIRECTIONS: [[f64; 3]; 7] = [
    [1.0, 1.0, 0.0], [-1.0, 1.0, 0.0], [1.0, -1.0, 0.0], [0.0, 1.0, 1.0],
    [1.0, 0.0, 1.0], [1.0, 1.0, 1.0], [-1.0, -1.0, -1.0],
];

/// The set of trial directions tried, in order, around each insertion site.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Stencil {
    /// The six axis directions: +x, +y, +z, -x, -y, -z.
    Axis6,
    /// The six axis directions followed by seven face, edge and corner diagonals.
    #[default]
    Full13,
    /// A single caller-chosen direction.
    FixedSingle(Vector3<f64>),
}

impl Stencil {
    /// A single-direction stencil along +x.
    pub fn fixed_default() -> Self {
        Stencil::FixedSingle(Vector3::x())
    }

    /// Returns the normalized trial directions in search order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for a zero-length fixed direction.
    pub fn directions(&self) -> Result<Vec<Vector3<f64>>, ConfigError> {
        let raw: Vec<Vector3<f64>> = match self {
            Stencil::Axis6 => AXIS_DIRECTIONS.iter().map(|d| Vector3::from(*d)).collect(),
            Stencil::Full13 => AXIS_DIRECTIONS
                .iter()
                .chain(DIAGONAL_DIRECTIONS.iter())
                .map(|d| Vector3::from(*d))
                .collect(),
            Stencil::FixedSingle(direction) => vec![*direction],
        };
        raw.iter()
            .map(|d| {
                normalized(d).ok_or_else(|| ConfigError::InvalidValue {
                    parameter: "direction",
                    reason: "direction vector must have non-zero length".to_string(),
                })
            })
            .collect()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Stencil::Axis6 => "axis-6",
            Stencil::Full13 => "full-13",
            Stencil::FixedSingle(_) => "fixed-single",
        }
    }
}

impl fmt::Display for Stencil {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stencil::FixedSingle(d) => write!(f, "fixed-single({}, {}, {})", d.x, d.y, d.z),
            other => f.write_str(other.name()),
        }
    }
}

impl FromStr for Stencil {
    type Err = ConfigError;

    /// Parses `axis-6`, `full-13` or `fixed-single` (case-insensitive, `_` and `-`
    /// interchangeable). `fixed-single` starts out along +x.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "axis-6" | "axis6" => Ok(Stencil::Axis6),
            "full-13" | "full13" => Ok(Stencil::Full13),
            "fixed-single" | "fixed" | "single" => Ok(Stencil::fixed_default()),
            _ => Err(ConfigError::InvalidValue {
                parameter: "stencil",
                reason: format!(
                    "unknown stencil '{}', expected 'axis-6', 'full-13' or 'fixed-single'",
                    s
                ),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    pub stencil: Stencil,
    /// Stencil used for a second search when the primary path is too short.
    pub fallback_stencil: Option<Stencil>,
    /// Paths shorter than this trigger the fallback search.
    pub min_path_length: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NebConfig {
    pub search: SearchConfig,
    pub job: NebJob,
}

#[derive(Default)]
pub struct NebConfigBuilder {
    stencil: Option<Stencil>,
    fallback_stencil: Option<Stencil>,
    min_path_length: Option<usize>,
    images: Option<usize>,
    engine: Option<String>,
}

impl NebConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stencil(mut self, stencil: Stencil) -> Self {
        self.stencil = Some(stencil);
        self
    }
    pub fn fallback_stencil(mut self, stencil: Option<Stencil>) -> Self {
        self.fallback_stencil = stencil;
        self
    }
    pub fn min_path_length(mut self, length: usize) -> Self {
        self.min_path_length = Some(length);
        self
    }
    pub fn images(mut self, images: usize) -> Self {
        self.images = Some(images);
        self
    }
    pub fn engine(mut self, engine: impl Into<String>) -> Self {
        self.engine = Some(engine.into());
        self
    }

    pub fn build(self) -> Result<NebConfig, ConfigError> {
        let stencil = self
            .stencil
            .ok_or(ConfigError::MissingParameter("stencil"))?;
        stencil.directions()?;
        if let Some(fallback) = &self.fallback_stencil {
            fallback.directions()?;
        }

        let min_path_length = self.min_path_length.unwrap_or(DEFAULT_MIN_PATH_LENGTH);
        if !(2..=MAX_PATH_LENGTH).contains(&min_path_length) {
            return Err(ConfigError::InvalidValue {
                parameter: "min_path_length",
                reason: format!("must be between 2 and {}", MAX_PATH_LENGTH),
            });
        }

        let defaults = NebJob::default();
        let images = self.images.unwrap_or(defaults.images);
        if images == 0 {
            return Err(ConfigError::InvalidValue {
                parameter: "images",
                reason: "must be at least 1".to_string(),
            });
        }
        let engine = self.engine.unwrap_or(defaults.engine);
        if engine.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                parameter: "engine",
                reason: "must not be empty".to_string(),
            });
        }

        Ok(NebConfig {
            search: SearchConfig {
                stencil,
                fallback_stencil: self.fallback_stencil,
                min_path_length,
            },
            job: NebJob { images, engine },
        })
    }
}
