use super::AmsError;
use crate::core::models::atom::Atom;
use crate::core::models::structure::{AtomicStructure, Lattice};
use nalgebra::{Point3, Vector3};
use std::path::Path;
use tracing::debug;

const XYZ_GEOMETRY_KEY: &str = "G E O M E T R Y    I N    X - Y - Z    F O R M A T";
const XYZ_GEOMETRY_END: &str = "Total nr. of atoms:";
const TABLE_GEOMETRY_KEY: &str = "Index Symbol   x (angstrom)   y (angstrom)   z (angstrom)";
const LATTICE_KEY: &str = "Lattice vectors (angstrom)";
const AIM_CHARGES_KEY: &str = "Atomic Charge Analysis";
const AIM_CHARGES_END: &str = "Total:";
const MULLIKEN_CHARGES_KEY: &str = "Mulliken Charges";
const MULLIKEN_CHARGES_END: &str = "Total ";

/// Which partial-charge table to read from the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChargeModel {
    /// Atoms-in-molecules charges from the "Atomic Charge Analysis" table.
    #[default]
    Aim,
    /// Charges from the "Mulliken Charges" table.
    Mulliken,
}

/// A plain-text AMS output file held in memory.
///
/// All section lookups use the *last* occurrence of a section header, so for an
/// optimization log the final geometry and charges are returned.
#[derive(Debug, Clone)]
pub struct AmsLog {
    lines: Vec<String>,
}

/// A `[start, stop)` line range located in the log.
struct Section {
    start: usize,
    stop: usize,
}

impl AmsLog {
    pub fn parse(content: &str) -> Self {
        Self {
            lines: content.lines().map(str::to_string).collect(),
        }
    }

    pub fn read_from_path(path: &Path) -> Result<Self, AmsError> {
        Ok(Self::parse(&std::fs::read_to_string(path)?))
    }

    /// Locates the lines after the last line containing `start_key`.
    ///
    /// The section begins `start_offset` lines after that header and ends just
    /// before line `i + 1 + stop_offset`, where `i` is the first line at or after
    /// the section start containing `stop_key`.
    fn section(
        &self,
        start_key: &'static str,
        stop_key: &str,
        start_offset: usize,
        stop_offset: isize,
    ) -> Result<Section, AmsError> {
        let header = self
            .lines
            .iter()
            .rposition(|line| line.contains(start_key))
            .ok_or(AmsError::SectionNotFound(start_key))?;
        let start = header + start_offset;
        let stop_line = self
            .lines
            .iter()
            .enumerate()
            .skip(start)
            .find(|(_, line)| line.contains(stop_key))
            .map(|(i, _)| i)
            .ok_or(AmsError::SectionNotFound(start_key))?;
        let stop = (stop_line as isize + 1 + stop_offset).max(start as isize) as usize;
        Ok(Section {
            start,
            stop: stop.min(self.lines.len()),
        })
    }

    fn section_lines(&self, section: &Section) -> impl Iterator<Item = (usize, &str)> {
        self.lines[section.start..section.stop]
            .iter()
            .enumerate()
            .map(move |(i, line)| (section.start + i + 1, line.as_str()))
            .filter(|(_, line)| !line.trim().is_empty())
    }

    /// Reads the final geometry.
    ///
    /// The "XYZ format" geometry block is preferred; logs that only carry the
    /// indexed atom table are read from that table and the trailing lattice
    /// block. A cell, when present, makes the structure fully periodic.
    pub fn structure(&self) -> Result<AtomicStructure, AmsError> {
        match self.xyz_block_structure() {
            Err(AmsError::SectionNotFound(_)) => {
                debug!("No XYZ-format geometry block, falling back to the indexed atom table.");
                self.table_structure()
            }
            other => other,
        }
    }

    fn xyz_block_structure(&self) -> Result<AtomicStructure, AmsError> {
        let section = self.section(XYZ_GEOMETRY_KEY, XYZ_GEOMETRY_END, 3, -2)?;
        let mut atoms = Vec::new();
        let mut cell = Vec::new();

        for (line_num, line) in self.section_lines(&section) {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if line.contains("VEC") {
                cell.push(parse_vector(&fields[1..], line_num)?);
            } else {
                atoms.push(parse_atom(fields.first().copied(), &fields[1..], line_num)?);
            }
        }
        build_structure(atoms, cell)
    }

    fn table_structure(&self) -> Result<AtomicStructure, AmsError> {
        let section = self.section(TABLE_GEOMETRY_KEY, LATTICE_KEY, 1, -2)?;
        let mut atoms = Vec::new();
        for (line_num, line) in self.section_lines(&section) {
            let fields: Vec<&str> = line.split_whitespace().collect();
            let coords = fields.get(2..).unwrap_or_default();
            atoms.push(parse_atom(fields.get(1).copied(), coords, line_num)?);
        }

        let mut cell = Vec::new();
        if let Some(header) = self.lines.iter().rposition(|l| l.contains(LATTICE_KEY)) {
            for offset in 1..=3 {
                let line_num = header + offset;
                let line = self.lines.get(line_num).ok_or_else(|| AmsError::Parse {
                    line: line_num + 1,
                    message: "truncated lattice block".to_string(),
                })?;
                let fields: Vec<&str> = line.split_whitespace().collect();
                cell.push(parse_vector(fields.get(1..).unwrap_or_default(), line_num + 1)?);
            }
        }
        build_structure(atoms, cell)
    }

    /// Reads the final per-atom partial charges of the requested model.
    pub fn charges(&self, model: ChargeModel) -> Result<Vec<f64>, AmsError> {
        let (section, column) = match model {
            ChargeModel::Aim => (self.section(AIM_CHARGES_KEY, AIM_CHARGES_END, 8, -2)?, 6),
            ChargeModel::Mulliken => (
                self.section(MULLIKEN_CHARGES_KEY, MULLIKEN_CHARGES_END, 3, -1)?,
                2,
            ),
        };

        self.section_lines(&section)
            .map(|(line_num, line)| {
                let value = line.split_whitespace().nth(column).ok_or_else(|| AmsError::Parse {
                    line: line_num,
                    message: format!("expected a charge in column {}", column + 1),
                })?;
                value
                    .parse::<f64>()
                    .ok()
                    .filter(|q| q.is_finite())
                    .ok_or_else(|| AmsError::Parse {
                        line: line_num,
                        message: format!("invalid charge '{}'", value),
                    })
            })
            .collect()
    }
}

fn parse_number(value: &str, line: usize) -> Result<f64, AmsError> {
    value.parse().map_err(|_| AmsError::Parse {
        line,
        message: format!("invalid number '{}'", value),
    })
}

fn parse_vector(fields: &[&str], line: usize) -> Result<Vector3<f64>, AmsError> {
    if fields.len() < 3 {
        return Err(AmsError::Parse {
            line,
            message: "expected three coordinates".to_string(),
        });
    }
    Ok(Vector3::new(
        parse_number(fields[0], line)?,
        parse_number(fields[1], line)?,
        parse_number(fields[2], line)?,
    ))
}

fn parse_atom(symbol: Option<&str>, coords: &[&str], line: usize) -> Result<Atom, AmsError> {
    let symbol = symbol.ok_or_else(|| AmsError::Parse {
        line,
        message: "missing element symbol".to_string(),
    })?;
    let position = Point3::from(parse_vector(coords, line)?);
    Atom::new(symbol, position).map_err(|e| AmsError::Parse {
        line,
        message: e.to_string(),
    })
}

fn build_structure(atoms: Vec<Atom>, cell: Vec<Vector3<f64>>) -> Result<AtomicStructure, AmsError> {
    match cell.len() {
        0 => Ok(AtomicStructure::new(atoms)),
        3 => {
            let lattice = Lattice::from_vectors([cell[0], cell[1], cell[2]]).map_err(|e| {
                AmsError::Parse {
                    line: 0,
                    message: e.to_string(),
                }
            })?;
            Ok(AtomicStructure::periodic(atoms, lattice))
        }
        n => Err(AmsError::Parse {
            line: 0,
            message: format!("expected 3 lattice vectors, found {}", n),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DFTB_LOG: &str = "\
 Some preamble
 G E O M E T R Y    I N    X - Y - Z    F O R M A T
 ----------------------------------------------------
 (angstrom)
 Zn      0.000000      0.000000      0.000000
 O       2.000000      0.000000      0.000000
 VEC1   10.000000      0.000000      0.000000
 VEC2    0.000000     10.000000      0.000000
 VEC3    0.000000      0.000000     10.000000

 Total nr. of atoms:      2
 Atomic Charge Analysis
 line 2
 line 3
 line 4
 line 5
 line 6
 line 7
 line 8
   1  Zn   a  b  c  d   1.2500
   2  O    a  b  c  d  -0.6250

 Total:   0.6250
";

    const BAND_LOG: &str = "\
 Index Symbol   x (angstrom)   y (angstrom)   z (angstrom)
      1 Cu      0.100000     0.200000     0.300000
      2 O       1.900000     0.000000     0.000000

 Lattice vectors (angstrom)
    1     8.000000     0.000000     0.000000
    2     0.000000     8.000000     0.000000
    3     0.000000     0.000000     8.000000
 Mulliken Charges
 -----------------
 Index Atom Charge
    1 Cu   0.9000
    2 O   -0.4500
 Total   0.4500
";

    #[test]
    fn reads_xyz_block_geometry_with_cell() {
        let log = AmsLog::parse(DFTB_LOG);
        let structure = log.structure().unwrap();
        assert_eq!(structure.len(), 2);
        assert_eq!(structure.atoms()[0].symbol, "Zn");
        assert_eq!(structure.atoms()[1].position, Point3::new(2.0, 0.0, 0.0));
        assert_eq!(structure.pbc(), [true; 3]);
        assert_eq!(structure.lattice().unwrap().vectors()[2], Vector3::new(0.0, 0.0, 10.0));
    }

    #[test]
    fn reads_aim_charges() {
        let log = AmsLog::parse(DFTB_LOG);
        assert_eq!(log.charges(ChargeModel::Aim).unwrap(), vec![1.25, -0.625]);
    }

    #[test]
    fn falls_back_to_indexed_table_geometry() {
        let log = AmsLog::parse(BAND_LOG);
        let structure = log.structure().unwrap();
        assert_eq!(structure.len(), 2);
        assert_eq!(structure.atoms()[0].symbol, "Cu");
        assert_eq!(structure.atoms()[0].position, Point3::new(0.1, 0.2, 0.3));
        assert_eq!(structure.lattice().unwrap().vectors()[0], Vector3::new(8.0, 0.0, 0.0));
    }

    #[test]
    fn reads_mulliken_charges() {
        let log = AmsLog::parse(BAND_LOG);
        assert_eq!(log.charges(ChargeModel::Mulliken).unwrap(), vec![0.9, -0.45]);
    }

    #[test]
    fn non_finite_charges_are_parse_errors() {
        let log = AmsLog::parse(&BAND_LOG.replace("-0.4500", "NaN"));
        assert!(matches!(
            log.charges(ChargeModel::Mulliken),
            Err(AmsError::Parse { .. })
        ));
        let log = AmsLog::parse(&DFTB_LOG.replace("1.2500", "inf"));
        assert!(matches!(log.charges(ChargeModel::Aim), Err(AmsError::Parse { .. })));
    }

    #[test]
    fn last_section_occurrence_wins() {
        let content = format!("{}{}", DFTB_LOG, DFTB_LOG.replace("1.2500", "2.5000"));
        let log = AmsLog::parse(&content);
        assert_eq!(log.charges(ChargeModel::Aim).unwrap(), vec![2.5, -0.625]);
    }

    #[test]
    fn missing_section_is_reported() {
        let log = AmsLog::parse("nothing useful here\n");
        assert!(matches!(log.structure(), Err(AmsError::SectionNotFound(_))));
        assert!(matches!(
            log.charges(ChargeModel::Mulliken),
            Err(AmsError::SectionNotFound(MULLIKEN_CHARGES_KEY))
        ));
    }
}
