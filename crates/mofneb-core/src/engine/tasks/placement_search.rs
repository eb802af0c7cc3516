use super::overlap::{SAFETY_MARGIN, atom_radii, is_clear};
use super::site_ranking::{RankedSites, Site};
use crate::core::models::placement::Placement;
use crate::core::models::structure::AtomicStructure;
use crate::core::radii::CovalentRadii;
use crate::engine::config::Stencil;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use nalgebra::Vector3;
use tracing::{debug, info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Outcome of searching every representative site once.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Accepted placements in representative order.
    pub placements: Vec<Placement>,
    /// Number of representative sites for which no direction was clear.
    pub skipped: usize,
}

/// Places the guest next to every representative site.
///
/// For each site the guest's center of mass is moved to
/// `anchor + u * (r_host + r_guest_max + SAFETY_MARGIN)` for each stencil
/// direction `u` in turn, and the first collision-free position is kept. Sites
/// where every direction collides are skipped.
///
/// # Errors
///
/// Returns [`EngineError::EmptyGuest`] for a guest without atoms, and propagates
/// configuration and radius lookup errors from the overlap check.
#[instrument(skip_all, name = "placement_search_task", fields(stencil = %stencil))]
pub fn search_placements(
    host: &AtomicStructure,
    guest: &AtomicStructure,
    ranked: &RankedSites,
    radii: &CovalentRadii,
    stencil: &Stencil,
    reporter: &ProgressReporter,
) -> Result<SearchOutcome, EngineError> {
    if guest.is_empty() {
        return Err(EngineError::EmptyGuest);
    }
    host.validate()?;
    let directions = stencil.directions()?;
    let guest_reach = atom_radii(guest, radii)?
        .into_iter()
        .fold(f64::NEG_INFINITY, f64::max);

    let sites: Vec<(&str, Site)> = ranked.representatives().collect();
    info!(
        sites = sites.len(),
        directions = directions.len(),
        "Searching guest placements."
    );
    reporter.report(Progress::TaskStart {
        total_steps: sites.len() as u64,
    });

    #[cfg(not(feature = "parallel"))]
    let iterator = sites.iter();

    #[cfg(feature = "parallel")]
    let iterator = sites.par_iter();

    let results: Vec<Result<Option<Placement>, EngineError>> = iterator
        .map(|(symbol, site)| {
            let result = place_at_site(host, guest, *site, guest_reach, &directions, radii);
            if let Ok(None) = result {
                warn!(
                    element = %symbol,
                    index = site.index,
                    charge = site.charge,
                    "No collision-free direction found; skipping site."
                );
                reporter.report(Progress::SiteSkipped {
                    symbol: symbol.to_string(),
                    index: site.index,
                });
            }
            reporter.report(Progress::TaskIncrement);
            result
        })
        .collect();

    reporter.report(Progress::TaskFinish);

    let mut placements = Vec::with_capacity(results.len());
    let mut skipped = 0;
    for result in results {
        match result? {
            Some(placement) => placements.push(placement),
            None => skipped += 1,
        }
    }

    info!(accepted = placements.len(), skipped, "Placement search complete.");
    Ok(SearchOutcome {
        placements,
        skipped,
    })
}

fn place_at_site(
    host: &AtomicStructure,
    guest: &AtomicStructure,
    site: Site,
    guest_reach: f64,
    directions: &[Vector3<f64>],
    radii: &CovalentRadii,
) -> Result<Option<Placement>, EngineError> {
    // Index comes from ranking the same host, so it is in range.
    let anchor = &host.atoms()[site.index];
    let host_radius = radii
        .radius(anchor.atomic_number)
        .ok_or(EngineError::UnknownElement {
            atomic_number: anchor.atomic_number,
        })?;
    let r_sum = host_radius + guest_reach + SAFETY_MARGIN;

    for (k, direction) in directions.iter().enumerate() {
        let target = anchor.position + direction * r_sum;
        let candidate = guest.centered_at(&target);
        if is_clear(host, &candidate, radii)? {
            debug!(site = site.index, direction = k, "Accepted placement direction.");
            return Ok(Some(Placement::new(
                site.charge,
                site.index,
                host,
                &candidate,
            )));
        }
    }
    Ok(None)
}
