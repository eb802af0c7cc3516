use crate::core::models::structure::AtomicStructure;
use crate::engine::error::EngineError;
use std::cmp::Ordering;
use tracing::{debug, info, instrument};

/// Orders finite charges from most positive to most negative. `-0.0` and
/// `0.0` compare equal so a stable sort keeps them in index order.
pub(crate) fn descending_charge(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// Smallest element group that still yields a high/median/low triple.
pub const MIN_GROUP_SIZE: usize = 3;

/// A host atom considered as an insertion anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Site {
    pub index: usize,
    pub charge: f64,
}

/// The representative sites of one element: most positive, median and most
/// negative charge, in that order.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteGroup {
    pub symbol: String,
    pub representatives: Vec<Site>,
}

/// Representative sites of every element group, in the order the elements
/// first appear in the host.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankedSites {
    groups: Vec<SiteGroup>,
}

impl RankedSites {
    pub fn groups(&self) -> &[SiteGroup] {
        &self.groups
    }

    pub fn get(&self, symbol: &str) -> Option<&SiteGroup> {
        self.groups.iter().find(|g| g.symbol == symbol)
    }

    /// All representatives flattened, group by group.
    pub fn representatives(&self) -> impl Iterator<Item = (&str, Site)> + '_ {
        self.groups
            .iter()
            .flat_map(|g| g.representatives.iter().map(move |s| (g.symbol.as_str(), *s)))
    }

    /// Number of element groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Picks, per non-hydrogen element, the sites with the highest, median and
/// lowest partial charge.
///
/// Elements with fewer than [`MIN_GROUP_SIZE`] atoms are dropped.
///
/// # Errors
///
/// Returns [`EngineError::ChargeCountMismatch`] if `charges` does not hold one
/// value per host atom, and [`EngineError::NonFiniteCharge`] for a NaN or
/// infinite charge.
#[instrument(skip_all, name = "site_ranking_task")]
pub fn rank_sites(host: &AtomicStructure, charges: &[f64]) -> Result<RankedSites, EngineError> {
    if host.len() != charges.len() {
        return Err(EngineError::ChargeCountMismatch {
            atoms: host.len(),
            charges: charges.len(),
        });
    }
    if let Some(index) = charges.iter().position(|q| !q.is_finite()) {
        return Err(EngineError::NonFiniteCharge { index });
    }

    let mut grouped: Vec<(String, Vec<Site>)> = Vec::new();
    for (index, (atom, &charge)) in host.atoms().iter().zip(charges).enumerate() {
        if atom.is_hydrogen() {
            continue;
        }
        let site = Site { index, charge };
        match grouped.iter_mut().find(|(symbol, _)| *symbol == atom.symbol) {
            Some((_, sites)) => sites.push(site),
            None => grouped.push((atom.symbol.clone(), vec![site])),
        }
    }

    let groups: Vec<SiteGroup> = grouped
        .into_iter()
        .filter_map(|(symbol, mut sites)| {
            if sites.len() < MIN_GROUP_SIZE {
                debug!(
                    element = %symbol,
                    count = sites.len(),
                    "Dropping element group with too few atoms."
                );
                return None;
            }
            sites.sort_by(|a, b| descending_charge(a.charge, b.charge));
            let representatives = vec![sites[0], sites[sites.len() / 2], sites[sites.len() - 1]];
            Some(SiteGroup {
                symbol,
                representatives,
            })
        })
        .collect();

    info!(groups = groups.len(), "Ranked host sites.");
    Ok(RankedSites { groups })
}
