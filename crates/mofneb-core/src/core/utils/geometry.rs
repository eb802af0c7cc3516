use crate::core::models::structure::Lattice;
use itertools::iproduct;
use nalgebra::{DMatrix, Point3, Vector3};
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GeometryError {
    #[error("Periodic boundary conditions are enabled but no lattice is defined")]
    MissingLattice,
    #[error("Lattice has zero or near-zero volume")]
    SingularLattice,
}

/// Computes all pairwise distances between `from` and `to`.
///
/// With any periodic axis enabled the minimum-image convention is applied: the
/// fractional separation is wrapped into `[-0.5, 0.5]` on each periodic axis and
/// the neighbouring images are scanned, which keeps the result exact for skewed
/// cells. Non-periodic axes are never wrapped.
///
/// # Return
///
/// A `from.len() x to.len()` matrix of distances in Angstroms.
///
/// # Errors
///
/// Returns [`GeometryError::MissingLattice`] if `pbc` enables an axis but
/// `lattice` is `None`.
pub fn minimum_image_distances(
    from: &[Point3<f64>],
    to: &[Point3<f64>],
    lattice: Option<&Lattice>,
    pbc: [bool; 3],
) -> Result<DMatrix<f64>, GeometryError> {
    let periodic = pbc.iter().any(|&p| p);
    let lattice = match (periodic, lattice) {
        (false, _) => None,
        (true, Some(lattice)) => Some(lattice),
        (true, None) => return Err(GeometryError::MissingLattice),
    };

    Ok(DMatrix::from_fn(from.len(), to.len(), |i, j| {
        let delta = to[j] - from[i];
        match lattice {
            Some(lattice) => minimum_image_norm(&delta, lattice, pbc),
            None => delta.norm(),
        }
    }))
}

fn minimum_image_norm(delta: &Vector3<f64>, lattice: &Lattice, pbc: [bool; 3]) -> f64 {
    let mut frac = lattice.to_fractional(delta);
    for axis in 0..3 {
        if pbc[axis] {
            frac[axis] -= frac[axis].round();
        }
    }

    let shifts = |axis: usize| if pbc[axis] { -1..=1 } else { 0..=0 };
    iproduct!(shifts(0), shifts(1), shifts(2))
        .map(|(a, b, c)| {
            let image = frac + Vector3::new(a as f64, b as f64, c as f64);
            lattice.to_cartesian(&image).norm()
        })
        .fold(f64::INFINITY, f64::min)
}

/// Returns `v` scaled to unit length, or `None` for a (near-)zero vector.
pub fn normalized(v: &Vector3<f64>) -> Option<Vector3<f64>> {
    v.try_normalize(f64::EPSILON)
}
