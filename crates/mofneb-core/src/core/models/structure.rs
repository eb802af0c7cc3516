use super::atom::Atom;
use crate::core::utils::geometry::GeometryError;
use nalgebra::{Matrix3, Point3, Vector3};

const SINGULAR_VOLUME_TOLERANCE: f64 = 1e-6;

/// A periodic simulation cell.
///
/// The cell vectors are stored as the *columns* of `matrix`, so that
/// `matrix * fractional` yields Cartesian coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Lattice {
    matrix: Matrix3<f64>,
    inverse: Matrix3<f64>,
}

impl Lattice {
    /// Creates a lattice from a matrix whose columns are the cell vectors.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::SingularLattice`] if the cell has (near-)zero volume.
    pub fn new(matrix: Matrix3<f64>) -> Result<Self, GeometryError> {
        if matrix.determinant().abs() < SINGULAR_VOLUME_TOLERANCE {
            return Err(GeometryError::SingularLattice);
        }
        let inverse = matrix.try_inverse().ok_or(GeometryError::SingularLattice)?;
        Ok(Self { matrix, inverse })
    }

    /// Creates a lattice from three cell vectors `a`, `b`, `c`.
    pub fn from_vectors(vectors: [Vector3<f64>; 3]) -> Result<Self, GeometryError> {
        Self::new(Matrix3::from_columns(&vectors))
    }

    /// Creates an orthorhombic lattice with edge lengths `a`, `b`, `c`.
    pub fn orthorhombic(a: f64, b: f64, c: f64) -> Result<Self, GeometryError> {
        Self::new(Matrix3::from_diagonal(&Vector3::new(a, b, c)))
    }

    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.matrix
    }

    /// Returns the three cell vectors in `a`, `b`, `c` order.
    pub fn vectors(&self) -> [Vector3<f64>; 3] {
        [
            self.matrix.column(0).into_owned(),
            self.matrix.column(1).into_owned(),
            self.matrix.column(2).into_owned(),
        ]
    }

    pub fn to_fractional(&self, cartesian: &Vector3<f64>) -> Vector3<f64> {
        self.inverse * cartesian
    }

    pub fn to_cartesian(&self, fractional: &Vector3<f64>) -> Vector3<f64> {
        self.matrix * fractional
    }
}

/// An ordered collection of atoms with optional periodic boundary conditions.
///
/// This is the common representation of host frameworks, guest species and the
/// combined host-guest complexes built during placement. Atom order is
/// significant: combined structures always list host atoms first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AtomicStructure {
    atoms: Vec<Atom>,
    lattice: Option<Lattice>,
    pbc: [bool; 3],
}

impl AtomicStructure {
    /// Creates a non-periodic structure from a list of atoms.
    pub fn new(atoms: Vec<Atom>) -> Self {
        Self {
            atoms,
            lattice: None,
            pbc: [false; 3],
        }
    }

    /// Creates a structure that is periodic along all three cell vectors.
    pub fn periodic(atoms: Vec<Atom>, lattice: Lattice) -> Self {
        Self {
            atoms,
            lattice: Some(lattice),
            pbc: [true; 3],
        }
    }

    /// Creates a structure with an explicit cell and periodicity flags.
    ///
    /// No consistency check is made here; [`AtomicStructure::validate`] reports a
    /// structure that is periodic without a cell.
    pub fn with_cell(atoms: Vec<Atom>, lattice: Option<Lattice>, pbc: [bool; 3]) -> Self {
        Self {
            atoms,
            lattice,
            pbc,
        }
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn atom(&self, index: usize) -> Option<&Atom> {
        self.atoms.get(index)
    }

    pub fn lattice(&self) -> Option<&Lattice> {
        self.lattice.as_ref()
    }

    pub fn pbc(&self) -> [bool; 3] {
        self.pbc
    }

    pub fn is_periodic(&self) -> bool {
        self.pbc.iter().any(|&p| p)
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn positions(&self) -> Vec<Point3<f64>> {
        self.atoms.iter().map(|a| a.position).collect()
    }

    pub fn atomic_numbers(&self) -> impl Iterator<Item = u8> + '_ {
        self.atoms.iter().map(|a| a.atomic_number)
    }

    /// Checks the periodicity invariant: any periodic axis requires a cell.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::MissingLattice`] if a periodicity flag is set but
    /// no lattice is present.
    pub fn validate(&self) -> Result<(), GeometryError> {
        if self.is_periodic() && self.lattice.is_none() {
            return Err(GeometryError::MissingLattice);
        }
        Ok(())
    }

    /// Rigidly shifts every atom by `offset`.
    pub fn translate(&mut self, offset: &Vector3<f64>) {
        for atom in &mut self.atoms {
            atom.position += offset;
        }
    }

    /// Returns the mass-weighted center of the structure.
    ///
    /// Returns `None` for an empty structure.
    pub fn center_of_mass(&self) -> Option<Point3<f64>> {
        if self.atoms.is_empty() {
            return None;
        }
        let (weighted, total_mass) = self.atoms.iter().fold(
            (Vector3::zeros(), 0.0),
            |(sum, mass), atom| {
                let m = atom.mass();
                (sum + atom.position.coords * m, mass + m)
            },
        );
        if total_mass <= 0.0 {
            return None;
        }
        Some(Point3::from(weighted / total_mass))
    }

    /// Returns a copy translated so that its center of mass lies on `target`.
    pub fn centered_at(&self, target: &Point3<f64>) -> Self {
        let mut shifted = self.clone();
        if let Some(com) = self.center_of_mass() {
            shifted.translate(&(target - com));
        }
        shifted
    }

    /// Concatenates `other` after the atoms of `self`.
    ///
    /// The result keeps the cell and periodicity of `self`, so for a host-guest
    /// complex the host's boundary conditions apply to the whole complex.
    pub fn concat(&self, other: &AtomicStructure) -> Self {
        let mut atoms = Vec::with_capacity(self.atoms.len() + other.atoms.len());
        atoms.extend_from_slice(&self.atoms);
        atoms.extend_from_slice(&other.atoms);
        Self {
            atoms,
            lattice: self.lattice.clone(),
            pbc: self.pbc,
        }
    }
}
