use crate::core::models::placement::ReactionPath;
use crate::core::models::structure::AtomicStructure;
use crate::core::radii::CovalentRadii;
use crate::engine::config::{NebConfig, Stencil};
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::tasks::placement_search::search_placements;
use crate::engine::tasks::path_sampling::sample_path;
use crate::engine::tasks::site_ranking::{RankedSites, rank_sites};
use tracing::{info, instrument, warn};

#[derive(Debug, Clone)]
pub struct NebResult {
    /// The sampled, charge-ordered reaction path.
    pub path: ReactionPath,
    /// The stencil whose search produced `path`.
    pub stencil: Stencil,
    /// Number of accepted placements before sampling.
    pub pool_size: usize,
    /// Number of representative sites without a collision-free placement.
    pub skipped_sites: usize,
}

struct Attempt {
    stencil: Stencil,
    pool_size: usize,
    skipped_sites: usize,
    path: Option<ReactionPath>,
}

impl Attempt {
    fn path_len(&self) -> usize {
        self.path.as_ref().map_or(0, ReactionPath::len)
    }
}

/// Builds a reaction path of guest insertion sites in `host`.
///
/// Sites are ranked by partial charge, the guest is placed next to each
/// representative site with the configured stencil, and the accepted
/// placements are sampled into a path. A path shorter than
/// `config.search.min_path_length` triggers one more search with the fallback
/// stencil, if any; the longer of the two paths is kept, the primary on a tie.
///
/// # Errors
///
/// Input preconditions (charge count, empty guest) and configuration errors are
/// reported before any placement work. [`EngineError::NoValidPlacement`] is
/// returned when no attempt yields a single placement.
#[instrument(skip_all, name = "neb_workflow")]
pub fn run(
    host: &AtomicStructure,
    guest: &AtomicStructure,
    charges: &[f64],
    radii: &CovalentRadii,
    config: &NebConfig,
    reporter: &ProgressReporter,
) -> Result<NebResult, EngineError> {
    // === Phase 0: Validation ===
    reporter.phase("Validation", || -> Result<(), EngineError> {
        if host.len() != charges.len() {
            return Err(EngineError::ChargeCountMismatch {
                atoms: host.len(),
                charges: charges.len(),
            });
        }
        if guest.is_empty() {
            return Err(EngineError::EmptyGuest);
        }
        host.validate()?;
        guest.validate()?;
        config.search.stencil.directions()?;
        if let Some(fallback) = &config.search.fallback_stencil {
            fallback.directions()?;
        }
        Ok(())
    })?;
    info!(
        host_atoms = host.len(),
        guest_atoms = guest.len(),
        stencil = %config.search.stencil,
        "Starting NEB setup."
    );

    // === Phase 1: Site ranking ===
    let ranked = reporter.phase("Ranking sites", || rank_sites(host, charges))?;
    let site_count = ranked.representatives().count();
    if ranked.is_empty() {
        warn!("No element group has enough atoms to provide representative sites.");
    }

    // === Phase 2: Primary search ===
    let primary = attempt(host, guest, &ranked, radii, config.search.stencil, reporter)?;

    // === Phase 3: Fallback search ===
    let min_len = config.search.min_path_length;
    let chosen = match config.search.fallback_stencil {
        Some(fallback) if primary.path_len() < min_len && fallback != primary.stencil => {
            warn!(
                found = primary.path_len(),
                required = min_len,
                fallback = %fallback,
                "Reaction path too short; retrying with fallback stencil."
            );
            reporter.report(Progress::Message(format!(
                "Path has {} images; retrying with {} stencil",
                primary.path_len(),
                fallback
            )));
            let secondary = attempt(host, guest, &ranked, radii, fallback, reporter)?;
            if secondary.path_len() > primary.path_len() {
                secondary
            } else {
                primary
            }
        }
        _ => primary,
    };

    let Attempt {
        stencil,
        pool_size,
        skipped_sites,
        path,
    } = chosen;
    let path = path.ok_or(EngineError::NoValidPlacement { sites: site_count })?;

    info!(
        images = path.len(),
        stencil = %stencil,
        pool_size,
        skipped_sites,
        "NEB setup complete."
    );
    Ok(NebResult {
        path,
        stencil,
        pool_size,
        skipped_sites,
    })
}

fn attempt(
    host: &AtomicStructure,
    guest: &AtomicStructure,
    ranked: &RankedSites,
    radii: &CovalentRadii,
    stencil: Stencil,
    reporter: &ProgressReporter,
) -> Result<Attempt, EngineError> {
    let outcome = reporter.phase("Searching placements", || {
        search_placements(host, guest, ranked, radii, &stencil, reporter)
    })?;
    let pool_size = outcome.placements.len();

    let path = reporter.phase("Sampling path", || {
        if outcome.placements.is_empty() {
            Ok(None)
        } else {
            sample_path(outcome.placements).map(Some)
        }
    })?;

    Ok(Attempt {
        stencil,
        pool_size,
        skipped_sites: outcome.skipped,
        path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use crate::engine::config::NebConfigBuilder;
    use nalgebra::{Point3, Vector3};
    use std::sync::Mutex;

    fn atom(symbol: &str, x: f64, y: f64, z: f64) -> Atom {
        Atom::new(symbol, Point3::new(x, y, z)).unwrap()
    }

    fn oxygen_row(count: usize) -> AtomicStructure {
        AtomicStructure::new(
            (0..count)
                .map(|i| atom("O", i as f64 * 10.0, 0.0, 0.0))
                .collect(),
        )
    }

    fn li() -> AtomicStructure {
        AtomicStructure::new(vec![atom("Li", 0.0, 0.0, 0.0)])
    }

    #[test]
    fn three_site_host_gives_three_image_path() {
        let host = oxygen_row(3);
        let config = NebConfigBuilder::new().stencil(Stencil::Full13).build().unwrap();
        let result = run(
            &host,
            &li(),
            &[-0.2, 0.4, 0.1],
            &CovalentRadii::new(),
            &config,
            &ProgressReporter::new(),
        )
        .unwrap();

        assert_eq!(result.path.charges(), vec![0.4, 0.1, -0.2]);
        assert_eq!(result.pool_size, 3);
        assert_eq!(result.skipped_sites, 0);
        assert_eq!(result.stencil, Stencil::Full13);
    }

    #[test]
    fn fallback_is_used_when_it_gives_a_longer_path() {
        // The fixed direction points into a neighbour for every site but the last.
        let host = AtomicStructure::new(
            (0..3).map(|i| atom("O", i as f64 * 2.5, 0.0, 0.0)).collect(),
        );
        let config = NebConfigBuilder::new()
            .stencil(Stencil::FixedSingle(Vector3::x()))
            .fallback_stencil(Some(Stencil::Axis6))
            .min_path_length(3)
            .build()
            .unwrap();

        let result = run(
            &host,
            &li(),
            &[0.3, 0.2, 0.1],
            &CovalentRadii::new(),
            &config,
            &ProgressReporter::new(),
        )
        .unwrap();

        assert_eq!(result.stencil, Stencil::Axis6);
        assert_eq!(result.path.len(), 3);
    }

    #[test]
    fn no_fallback_keeps_short_primary_path() {
        let host = AtomicStructure::new(
            (0..3).map(|i| atom("O", i as f64 * 2.5, 0.0, 0.0)).collect(),
        );
        let config = NebConfigBuilder::new()
            .stencil(Stencil::FixedSingle(Vector3::x()))
            .build()
            .unwrap();

        let result = run(
            &host,
            &li(),
            &[0.3, 0.2, 0.1],
            &CovalentRadii::new(),
            &config,
            &ProgressReporter::new(),
        )
        .unwrap();

        assert_eq!(result.path.len(), 1);
        assert_eq!(result.path.images()[0].site_index(), 2);
        assert_eq!(result.skipped_sites, 2);
    }

    #[test]
    fn charge_mismatch_is_reported_before_any_search() {
        let events = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            if let Progress::PhaseStart { name } = event {
                events.lock().unwrap().push(name);
            }
        }));
        let config = NebConfigBuilder::new().stencil(Stencil::Full13).build().unwrap();

        let err = run(&oxygen_row(3), &li(), &[0.1], &CovalentRadii::new(), &config, &reporter)
            .unwrap_err();

        assert!(err.is_precondition());
        drop(reporter);
        assert_eq!(events.into_inner().unwrap(), vec!["Validation"]);
    }

    #[test]
    fn host_without_rankable_groups_has_no_valid_placement() {
        let host = oxygen_row(2);
        let config = NebConfigBuilder::new().stencil(Stencil::Full13).build().unwrap();
        let err = run(
            &host,
            &li(),
            &[0.1, 0.2],
            &CovalentRadii::new(),
            &config,
            &ProgressReporter::new(),
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::NoValidPlacement { sites: 0 }));
        assert!(err.is_recoverable());
    }
}
