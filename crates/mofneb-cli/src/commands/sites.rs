use super::input::load_host;
use crate::cli::SitesArgs;
use crate::error::{CliError, Result};
use mofneb::engine::tasks::site_ranking::{RankedSites, rank_sites};
use std::fmt::{self, Write};
use tracing::info;

const RANK_LABELS: [&str; 3] = ["highest", "median", "lowest"];

pub fn run(args: SitesArgs) -> Result<()> {
    let host = load_host(&args.host)?;
    let ranked = rank_sites(&host.structure, &host.charges)?;
    info!(groups = ranked.len(), "Host sites ranked.");

    if ranked.is_empty() {
        println!("No element has enough atoms to provide representative sites.");
    } else {
        let table = format_sites(&ranked).map_err(|e| CliError::Other(e.into()))?;
        print!("{}", table);
    }
    Ok(())
}

/// One line per representative: element, rank, 1-based atom number, charge.
fn format_sites(ranked: &RankedSites) -> std::result::Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "{:<8} {:<8} {:>6} {:>10}", "Element", "Rank", "Atom", "Charge")?;
    for group in ranked.groups() {
        for (label, site) in RANK_LABELS.iter().zip(&group.representatives) {
            writeln!(
                out,
                "{:<8} {:<8} {:>6} {:>10.4}",
                group.symbol,
                label,
                site.index + 1,
                site.charge
            )?;
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mofneb::core::models::atom::Atom;
    use mofneb::core::models::structure::AtomicStructure;
    use nalgebra::Point3;

    #[test]
    fn formats_one_row_per_representative() {
        let atoms = ["Zn", "O", "Zn", "O", "Zn", "O", "H"]
            .iter()
            .enumerate()
            .map(|(i, s)| Atom::new(s, Point3::new(i as f64, 0.0, 0.0)).unwrap())
            .collect();
        let host = AtomicStructure::new(atoms);
        let ranked = rank_sites(&host, &[1.2, -0.5, 1.0, -0.7, 1.1, -0.6, 0.2]).unwrap();

        let text = format_sites(&ranked).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 1 + 6);
        assert_eq!(
            lines[1].split_whitespace().collect::<Vec<_>>(),
            vec!["Zn", "highest", "1", "1.2000"]
        );
        assert_eq!(
            lines[6].split_whitespace().collect::<Vec<_>>(),
            vec!["O", "lowest", "4", "-0.7000"]
        );
    }
}
