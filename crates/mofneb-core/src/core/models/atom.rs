use super::element;
use nalgebra::Point3;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown element symbol: '{0}'")]
pub struct UnknownElementError(pub String);

/// Represents a single atom of a host or guest structure.
///
/// An atom is identified by its chemical element only; the element symbol and the
/// atomic number are always consistent because atoms can only be built through
/// the element table.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The canonical element symbol (e.g., "Zn", "O").
    pub symbol: String,
    /// The atomic number (Z) of the element.
    pub atomic_number: u8,
    /// The Cartesian coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
}

impl Atom {
    /// Creates a new `Atom` from an element symbol and a position.
    ///
    /// # Arguments
    ///
    /// * `symbol` - The element symbol, in any capitalization.
    /// * `position` - The Cartesian coordinates of the atom.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownElementError`] if the symbol is not in the element table.
    pub fn new(symbol: &str, position: Point3<f64>) -> Result<Self, UnknownElementError> {
        let symbol = element::normalize_symbol(symbol);
        let data =
            element::lookup(&symbol).ok_or_else(|| UnknownElementError(symbol.clone()))?;
        Ok(Self {
            symbol,
            atomic_number: data.number,
            position,
        })
    }

    /// Returns the standard atomic weight of this atom's element.
    pub fn mass(&self) -> f64 {
        element::lookup(&self.symbol).map_or(0.0, |data| data.mass)
    }

    pub fn is_hydrogen(&self) -> bool {
        element::is_hydrogen(&self.symbol)
    }
}
