use crate::core::io::traits::StructureFile;
use crate::core::models::atom::Atom;
use crate::core::models::structure::{AtomicStructure, Lattice};
use nalgebra::{Point3, Vector3};
use std::io::{self, BufRead, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum XyzError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: XyzParseErrorKind },
    #[error("Missing required record: {0}")]
    MissingRecord(String),
}

#[derive(Debug, Error)]
pub enum XyzParseErrorKind {
    #[error("Invalid atom count '{0}'")]
    InvalidAtomCount(String),
    #[error("Atom line must contain a symbol and three coordinates")]
    TooFewFields,
    #[error("Invalid float value '{0}'")]
    InvalidFloat(String),
    #[error("Unknown element symbol '{0}'")]
    UnknownElement(String),
    #[error("Lattice must contain nine numbers")]
    InvalidLattice,
    #[error("Lattice vectors span zero volume")]
    SingularLattice,
    #[error("pbc must contain three T/F flags")]
    InvalidPbc,
}

/// Plain and extended XYZ.
///
/// The comment line may carry the extended-XYZ keys `Lattice="ax ay az bx by bz cx cy cz"`
/// and `pbc="T T F"`. A lattice without `pbc` is treated as fully periodic.
pub struct XyzFile;

impl StructureFile for XyzFile {
    type Error = XyzError;

    fn read_from(reader: &mut impl BufRead) -> Result<AtomicStructure, Self::Error> {
        let mut lines = reader.lines().enumerate().map(|(i, l)| (i + 1, l));

        let (count_line, count) = loop {
            match lines.next() {
                Some((n, line)) => {
                    let line = line?;
                    if !line.trim().is_empty() {
                        break (n, line);
                    }
                }
                None => return Err(XyzError::MissingRecord("atom count line".into())),
            }
        };
        let atom_count: usize = count.trim().parse().map_err(|_| XyzError::Parse {
            line: count_line,
            kind: XyzParseErrorKind::InvalidAtomCount(count.trim().to_string()),
        })?;

        let (comment_line, comment) = match lines.next() {
            Some((n, line)) => (n, line?),
            None => return Err(XyzError::MissingRecord("comment line".into())),
        };
        let (lattice, pbc) = parse_comment(&comment, comment_line)?;

        let mut atoms = Vec::with_capacity(atom_count);
        for _ in 0..atom_count {
            let (n, line) = lines
                .next()
                .ok_or_else(|| XyzError::MissingRecord(format!("{} atom lines", atom_count)))?;
            atoms.push(parse_atom_line(&line?, n)?);
        }

        Ok(AtomicStructure::with_cell(atoms, lattice, pbc))
    }

    fn write_to(structure: &AtomicStructure, writer: &mut impl Write) -> Result<(), Self::Error> {
        writeln!(writer, "{}", structure.len())?;

        let mut comment = Vec::new();
        if let Some(lattice) = structure.lattice() {
            let values: Vec<String> = lattice
                .vectors()
                .iter()
                .flat_map(|v| v.iter().map(|x| format!("{:.6}", x)).collect::<Vec<_>>())
                .collect();
            comment.push(format!("Lattice=\"{}\"", values.join(" ")));
        }
        let flags: Vec<&str> = structure
            .pbc()
            .iter()
            .map(|&p| if p { "T" } else { "F" })
            .collect();
        comment.push(format!("pbc=\"{}\"", flags.join(" ")));
        writeln!(writer, "{}", comment.join(" "))?;

        for atom in structure.atoms() {
            writeln!(
                writer,
                "{:<2} {:>12.6} {:>12.6} {:>12.6}",
                atom.symbol, atom.position.x, atom.position.y, atom.position.z
            )?;
        }
        Ok(())
    }
}

fn parse_float(value: &str, line: usize) -> Result<f64, XyzError> {
    value.parse().map_err(|_| XyzError::Parse {
        line,
        kind: XyzParseErrorKind::InvalidFloat(value.to_string()),
    })
}

fn parse_atom_line(line: &str, line_num: usize) -> Result<Atom, XyzError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 4 {
        return Err(XyzError::Parse {
            line: line_num,
            kind: XyzParseErrorKind::TooFewFields,
        });
    }
    let x = parse_float(fields[1], line_num)?;
    let y = parse_float(fields[2], line_num)?;
    let z = parse_float(fields[3], line_num)?;
    Atom::new(fields[0], Point3::new(x, y, z)).map_err(|e| XyzError::Parse {
        line: line_num,
        kind: XyzParseErrorKind::UnknownElement(e.0),
    })
}

fn quoted_value<'a>(comment: &'a str, key: &str) -> Option<&'a str> {
    let lower = comment.to_ascii_lowercase();
    let start = lower.find(&format!("{}=\"", key.to_ascii_lowercase()))? + key.len() + 2;
    let end = comment[start..].find('"')? + start;
    Some(&comment[start..end])
}

fn parse_comment(
    comment: &str,
    line: usize,
) -> Result<(Option<Lattice>, [bool; 3]), XyzError> {
    let lattice = match quoted_value(comment, "Lattice") {
        Some(raw) => {
            let values = raw
                .split_whitespace()
                .map(|v| parse_float(v, line))
                .collect::<Result<Vec<_>, _>>()?;
            if values.len() != 9 {
                return Err(XyzError::Parse {
                    line,
                    kind: XyzParseErrorKind::InvalidLattice,
                });
            }
            let vectors = [
                Vector3::new(values[0], values[1], values[2]),
                Vector3::new(values[3], values[4], values[5]),
                Vector3::new(values[6], values[7], values[8]),
            ];
            Some(Lattice::from_vectors(vectors).map_err(|_| XyzError::Parse {
                line,
                kind: XyzParseErrorKind::SingularLattice,
            })?)
        }
        None => None,
    };

    let pbc = match quoted_value(comment, "pbc") {
        Some(raw) => {
            let flags = raw
                .split_whitespace()
                .map(|f| match f {
                    "T" | "t" | "True" | "true" | "1" => Ok(true),
                    "F" | "f" | "False" | "false" | "0" => Ok(false),
                    _ => Err(XyzError::Parse {
                        line,
                        kind: XyzParseErrorKind::InvalidPbc,
                    }),
                })
                .collect::<Result<Vec<_>, _>>()?;
            <[bool; 3]>::try_from(flags).map_err(|_| XyzError::Parse {
                line,
                kind: XyzParseErrorKind::InvalidPbc,
            })?
        }
        None => [lattice.is_some(); 3],
    };

    Ok((lattice, pbc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_plain_xyz_as_non_periodic() {
        let content = "2\nwater fragment\nO 0.0 0.0 0.0\nH 0.0 0.757 0.587\n";
        let structure = XyzFile::read_from(&mut Cursor::new(content)).unwrap();
        assert_eq!(structure.len(), 2);
        assert_eq!(structure.atoms()[1].symbol, "H");
        assert!(!structure.is_periodic());
        assert!(structure.lattice().is_none());
    }

    #[test]
    fn reads_extended_xyz_lattice_and_pbc() {
        let content = "1\nLattice=\"10 0 0 0 11 0 0 0 12\" pbc=\"T T F\" Properties=species:S:1:pos:R:3\nZn 1.0 2.0 3.0\n";
        let structure = XyzFile::read_from(&mut Cursor::new(content)).unwrap();
        assert_eq!(structure.pbc(), [true, true, false]);
        let vectors = structure.lattice().unwrap().vectors();
        assert_eq!(vectors[1], Vector3::new(0.0, 11.0, 0.0));
    }

    #[test]
    fn lattice_without_pbc_implies_full_periodicity() {
        let content = "1\nLattice=\"5 0 0 0 5 0 0 0 5\"\nLi 0 0 0\n";
        let structure = XyzFile::read_from(&mut Cursor::new(content)).unwrap();
        assert_eq!(structure.pbc(), [true; 3]);
    }

    #[test]
    fn reports_truncated_file() {
        let content = "3\ncomment\nO 0 0 0\n";
        let result = XyzFile::read_from(&mut Cursor::new(content));
        assert!(matches!(result, Err(XyzError::MissingRecord(_))));
    }

    #[test]
    fn reports_bad_coordinate_with_line_number() {
        let content = "1\n\nO 0 abc 0\n";
        let result = XyzFile::read_from(&mut Cursor::new(content));
        assert!(matches!(result, Err(XyzError::Parse { line: 3, .. })));
    }

    #[test]
    fn reports_unknown_element() {
        let content = "1\n\nXx 0 0 0\n";
        let result = XyzFile::read_from(&mut Cursor::new(content));
        assert!(matches!(
            result,
            Err(XyzError::Parse {
                kind: XyzParseErrorKind::UnknownElement(_),
                ..
            })
        ));
    }

    #[test]
    fn written_frames_can_be_read_back() {
        let content = "2\nLattice=\"8 0 0 0 8 0 0 0 8\" pbc=\"T T T\"\nZn 0.5 0.5 0.5\nLi 2.0 2.0 2.0\n";
        let structure = XyzFile::read_from(&mut Cursor::new(content)).unwrap();

        let mut buffer = Vec::new();
        XyzFile::write_all_to([&structure, &structure], &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text.matches("pbc=\"T T T\"").count(), 2);

        let reread = XyzFile::read_from(&mut Cursor::new(text)).unwrap();
        assert_eq!(reread.len(), 2);
        assert_eq!(reread.pbc(), [true; 3]);
        assert!((reread.atoms()[1].position - Point3::new(2.0, 2.0, 2.0)).norm() < 1e-6);
    }
}
