use crate::core::models::structure::AtomicStructure;
use crate::core::radii::CovalentRadii;
use crate::core::utils::geometry::minimum_image_distances;
use crate::engine::error::EngineError;
use tracing::trace;

/// Clearance in Angstroms required on top of the summed covalent radii.
pub const SAFETY_MARGIN: f64 = 0.4;

/// Slack on the distance comparison. A guest placed at exactly the contact
/// distance from its anchor must still be accepted.
const DISTANCE_TOLERANCE: f64 = 1e-9;

/// Looks up the covalent radius of every atom in `structure`.
pub(crate) fn atom_radii(
    structure: &AtomicStructure,
    radii: &CovalentRadii,
) -> Result<Vec<f64>, EngineError> {
    structure
        .atomic_numbers()
        .map(|z| {
            radii
                .radius(z)
                .ok_or(EngineError::UnknownElement { atomic_number: z })
        })
        .collect()
}

/// Checks that no guest atom comes closer to any host atom than their summed
/// covalent radii plus [`SAFETY_MARGIN`].
///
/// Distances follow the minimum-image convention under the host's cell and
/// periodicity. The scan stops at the first offending pair.
///
/// A pair is accepted when `d >= threshold - 1e-9`. The slack only absorbs
/// rounding in the anchor contact, which is constructed to sit exactly on the
/// threshold; any real intrusion is far larger.
///
/// # Errors
///
/// Returns [`EngineError::Configuration`] if the host is periodic without a
/// lattice, and [`EngineError::UnknownElement`] if an atom has no radius.
pub fn is_clear(
    host: &AtomicStructure,
    guest: &AtomicStructure,
    radii: &CovalentRadii,
) -> Result<bool, EngineError> {
    host.validate()?;
    let host_radii = atom_radii(host, radii)?;
    let guest_radii = atom_radii(guest, radii)?;
    let guest_positions = guest.positions();

    for (i, (atom, host_radius)) in host.atoms().iter().zip(&host_radii).enumerate() {
        let row = minimum_image_distances(
            std::slice::from_ref(&atom.position),
            &guest_positions,
            host.lattice(),
            host.pbc(),
        )?;
        for (j, guest_radius) in guest_radii.iter().enumerate() {
            let threshold = host_radius + guest_radius + SAFETY_MARGIN;
            let distance = row[(0, j)];
            if distance < threshold - DISTANCE_TOLERANCE {
                trace!(host_atom = i, guest_atom = j, distance, threshold, "Overlap found.");
                return Ok(false);
            }
        }
    }
    Ok(true)
}
