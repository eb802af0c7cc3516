use super::structure::AtomicStructure;

/// A collision-free host-guest complex anchored at one host site.
///
/// Placements are immutable once built. The combined structure lists all host
/// atoms first, followed by the translated guest atoms; the boundary between the
/// two is stored explicitly in `host_atom_count`.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    charge: f64,
    site_index: usize,
    host_atom_count: usize,
    structure: AtomicStructure,
}

impl Placement {
    /// Builds a placement by appending `guest` to `host`.
    ///
    /// # Arguments
    ///
    /// * `charge` - The partial charge of the anchoring host site.
    /// * `site_index` - The index of the anchoring atom in `host`.
    /// * `host` - The host structure.
    /// * `guest` - The guest structure, already moved to its final position.
    pub(crate) fn new(
        charge: f64,
        site_index: usize,
        host: &AtomicStructure,
        guest: &AtomicStructure,
    ) -> Self {
        Self {
            charge,
            site_index,
            host_atom_count: host.len(),
            structure: host.concat(guest),
        }
    }

    pub fn charge(&self) -> f64 {
        self.charge
    }

    pub fn site_index(&self) -> usize {
        self.site_index
    }

    pub fn host_atom_count(&self) -> usize {
        self.host_atom_count
    }

    pub fn guest_atom_count(&self) -> usize {
        self.structure.len() - self.host_atom_count
    }

    pub fn structure(&self) -> &AtomicStructure {
        &self.structure
    }

    /// Returns the guest part of the combined structure.
    pub fn guest_atoms(&self) -> &[super::atom::Atom] {
        &self.structure.atoms()[self.host_atom_count..]
    }
}

/// An ordered sequence of placements seeding a reaction-path calculation.
///
/// Images are ordered by non-increasing site charge: the first image is the most
/// positively charged insertion site and the last the most negative.
#[derive(Debug, Clone, PartialEq)]
pub struct ReactionPath {
    images: Vec<Placement>,
}

impl ReactionPath {
    pub(crate) fn new(images: Vec<Placement>) -> Self {
        debug_assert!(
            images
                .windows(2)
                .all(|pair| pair[0].charge() >= pair[1].charge()),
            "reaction path images must be ordered by non-increasing charge"
        );
        Self { images }
    }

    pub fn images(&self) -> &[Placement] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn charges(&self) -> Vec<f64> {
        self.images.iter().map(Placement::charge).collect()
    }

    /// The number of leading host atoms shared by every image.
    ///
    /// Returns `None` for an empty path.
    pub fn host_atom_count(&self) -> Option<usize> {
        self.images.first().map(Placement::host_atom_count)
    }

    pub fn structures(&self) -> impl Iterator<Item = &AtomicStructure> {
        self.images.iter().map(Placement::structure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use nalgebra::Point3;

    fn structure(symbols: &[&str]) -> AtomicStructure {
        AtomicStructure::new(
            symbols
                .iter()
                .enumerate()
                .map(|(i, s)| Atom::new(s, Point3::new(i as f64 * 3.0, 0.0, 0.0)).unwrap())
                .collect(),
        )
    }

    #[test]
    fn placement_records_explicit_host_guest_boundary() {
        let host = structure(&["Zn", "O", "O"]);
        let guest = structure(&["Li", "F"]);
        let placement = Placement::new(0.5, 1, &host, &guest);

        assert_eq!(placement.host_atom_count(), 3);
        assert_eq!(placement.guest_atom_count(), 2);
        assert_eq!(placement.structure().len(), 5);
        assert_eq!(placement.guest_atoms()[0].symbol, "Li");
        assert_eq!(placement.site_index(), 1);
        assert_eq!(placement.charge(), 0.5);
    }

    #[test]
    fn reaction_path_exposes_charges_in_order() {
        let host = structure(&["O"]);
        let guest = structure(&["Li"]);
        let path = ReactionPath::new(vec![
            Placement::new(1.0, 0, &host, &guest),
            Placement::new(-1.0, 0, &host, &guest),
        ]);
        assert_eq!(path.charges(), vec![1.0, -1.0]);
        assert_eq!(path.host_atom_count(), Some(1));
        assert_eq!(path.structures().count(), 2);
    }
}
