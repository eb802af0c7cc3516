use crate::core::models::placement::{Placement, ReactionPath};
use crate::engine::config::MAX_PATH_LENGTH;
use crate::engine::error::EngineError;
use crate::engine::tasks::site_ranking::descending_charge;
use tracing::{info, instrument};

/// Evenly spaced indices over `0..=n-1`, both endpoints included.
///
/// Index `i` is `i * (n - 1) / (k - 1)` rounded to the nearest integer. An
/// exact half is rounded toward the nearer endpoint; the central point of an
/// odd-length selection rounds down.
fn spread_indices(n: usize, k: usize) -> Vec<usize> {
    if k == 0 || n == 0 {
        return Vec::new();
    }
    if k == 1 {
        return vec![0];
    }
    let den = k - 1;
    (0..k)
        .map(|i| {
            let num = i * (n - 1);
            let (q, r) = (num / den, num % den);
            match (2 * r).cmp(&den) {
                std::cmp::Ordering::Greater => q + 1,
                std::cmp::Ordering::Equal if 2 * i > den => q + 1,
                _ => q,
            }
        })
        .collect()
}

/// Orders the pool by descending charge and keeps at most seven placements
/// spread over the full charge range.
///
/// # Errors
///
/// Returns [`EngineError::NoValidPlacement`] for an empty pool and
/// [`EngineError::NonFiniteCharge`] if a placement carries a NaN or infinite
/// charge.
#[instrument(skip_all, name = "path_sampling_task", fields(pool = pool.len()))]
pub fn sample_path(mut pool: Vec<Placement>) -> Result<ReactionPath, EngineError> {
    if pool.is_empty() {
        return Err(EngineError::NoValidPlacement { sites: 0 });
    }
    if let Some(placement) = pool.iter().find(|p| !p.charge().is_finite()) {
        return Err(EngineError::NonFiniteCharge {
            index: placement.site_index(),
        });
    }
    pool.sort_by(|a, b| descending_charge(a.charge(), b.charge()));

    let images = if pool.len() < MAX_PATH_LENGTH {
        pool
    } else {
        let keep = spread_indices(pool.len(), MAX_PATH_LENGTH);
        pool.into_iter()
            .enumerate()
            .filter(|(i, _)| keep.binary_search(i).is_ok())
            .map(|(_, placement)| placement)
            .collect()
    };

    info!(images = images.len(), "Sampled reaction path.");
    Ok(ReactionPath::new(images))
}
