use crate::core::models::element;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RadiiLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Unknown element symbol '{0}' in covalent radius table")]
    UnknownElement(String),
    #[error("Covalent radius for '{symbol}' must be non-negative and finite, got {radius}")]
    InvalidRadius { symbol: String, radius: f64 },
}

/// Covalent radius lookup keyed by atomic number.
///
/// The built-in element table supplies the defaults; individual elements can be
/// overridden, e.g. to reproduce a reference calculation or to tune the
/// clearance for an unusual guest.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CovalentRadii {
    overrides: HashMap<u8, f64>,
}

impl CovalentRadii {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads overrides from a TOML file mapping element symbols to radii.
    ///
    /// ```toml
    /// O = 0.70
    /// Li = 1.20
    /// ```
    pub fn load(path: &Path) -> Result<Self, RadiiLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| RadiiLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        let table: HashMap<String, f64> =
            toml::from_str(&content).map_err(|e| RadiiLoadError::Toml {
                path: path.to_string_lossy().to_string(),
                source: e,
            })?;
        Self::from_symbols(table)
    }

    /// Builds a table from `(symbol, radius)` overrides.
    pub fn from_symbols<I, S>(overrides: I) -> Result<Self, RadiiLoadError>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        let mut radii = Self::new();
        for (symbol, radius) in overrides {
            let symbol = symbol.as_ref();
            let data = element::lookup(symbol)
                .ok_or_else(|| RadiiLoadError::UnknownElement(symbol.to_string()))?;
            if !radius.is_finite() || radius < 0.0 {
                return Err(RadiiLoadError::InvalidRadius {
                    symbol: symbol.to_string(),
                    radius,
                });
            }
            radii.overrides.insert(data.number, radius);
        }
        Ok(radii)
    }

    /// Returns a copy with the radius of `symbol` replaced.
    pub fn with_radius(mut self, symbol: &str, radius: f64) -> Result<Self, RadiiLoadError> {
        let extra = Self::from_symbols([(symbol, radius)])?;
        self.overrides.extend(extra.overrides);
        Ok(self)
    }

    /// Returns the covalent radius for `atomic_number`, or `None` if the element
    /// is unknown.
    pub fn radius(&self, atomic_number: u8) -> Option<f64> {
        self.overrides.get(&atomic_number).copied().or_else(|| {
            element::lookup_by_number(atomic_number).map(|(_, data)| data.covalent_radius)
        })
    }

    pub fn overrides(&self) -> &HashMap<u8, f64> {
        &self.overrides
    }

    /// Layers the overrides of `other` on top of these; `other` wins on conflicts.
    pub fn merge(&mut self, other: &CovalentRadii) {
        self.overrides
            .extend(other.overrides.iter().map(|(&z, &r)| (z, r)));
    }
}
