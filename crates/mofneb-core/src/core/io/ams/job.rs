use super::AmsError;
use crate::core::models::placement::ReactionPath;
use crate::core::models::structure::AtomicStructure;
use std::io::Write;

pub const DEFAULT_IMAGES: usize = 30;
pub const DEFAULT_ENGINE: &str = "DFTB";

/// Settings of the NEB task written into the job script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NebJob {
    /// Number of interpolated images between the end points.
    pub images: usize,
    /// Name of the AMS engine block (e.g., "DFTB", "ForceField").
    pub engine: String,
}

impl Default for NebJob {
    fn default() -> Self {
        Self {
            images: DEFAULT_IMAGES,
            engine: DEFAULT_ENGINE.to_string(),
        }
    }
}

/// Writes an AMS NEB run script for `path`.
///
/// The first image becomes the `Initial` system, the last the `Final` system and
/// everything in between `Intermediate-1`, `Intermediate-2`, ... in path order.
/// The host atoms (the leading `path.host_atom_count()` atoms) are frozen in every
/// system; guest atoms are left free.
///
/// # Errors
///
/// Returns [`AmsError::TooFewImages`] for paths with fewer than two images.
pub fn write_to(path: &ReactionPath, job: &NebJob, writer: &mut impl Write) -> Result<(), AmsError> {
    let constrained = path.host_atom_count().unwrap_or(0);
    write_with_constraints(path, constrained, job, writer)
}

/// Like [`write_to`], with an explicit number of leading atoms to freeze.
pub fn write_with_constraints(
    path: &ReactionPath,
    constrained_atom_count: usize,
    job: &NebJob,
    writer: &mut impl Write,
) -> Result<(), AmsError> {
    if path.len() < 2 {
        return Err(AmsError::TooFewImages { found: path.len() });
    }

    let structures: Vec<&AtomicStructure> = path.structures().collect();
    let last = structures.len() - 1;

    writeln!(writer, "#!/bin/sh")?;
    writeln!(writer)?;
    writeln!(writer, "$AMSBIN/ams <<eor")?;
    writeln!(writer, "Task NEB")?;
    writeln!(writer, "NEB")?;
    writeln!(writer, "  Images {}", job.images)?;
    writeln!(writer, "End")?;

    for (i, structure) in structures.iter().enumerate() {
        let name = match i {
            0 => "Initial".to_string(),
            i if i == last => "Final".to_string(),
            i => format!("Intermediate-{}", i),
        };
        write_system_block(&name, structure, constrained_atom_count, writer)?;
    }

    writeln!(writer, "Engine {}", job.engine)?;
    writeln!(writer, "EndEngine")?;
    writeln!(writer, "eor")?;
    Ok(())
}

fn write_system_block(
    name: &str,
    structure: &AtomicStructure,
    constrained_atom_count: usize,
    writer: &mut impl Write,
) -> Result<(), AmsError> {
    if constrained_atom_count > structure.len() {
        return Err(AmsError::ConstraintOutOfRange {
            image: name.to_string(),
            constrained: constrained_atom_count,
            atoms: structure.len(),
        });
    }

    writeln!(writer, "System {}", name)?;
    writeln!(writer, "  Atoms")?;
    for atom in structure.atoms() {
        writeln!(
            writer,
            "{:<2} {:>10.6} {:>10.6} {:>10.6}",
            atom.symbol, atom.position.x, atom.position.y, atom.position.z
        )?;
    }
    writeln!(writer, "  End")?;

    if let Some(lattice) = structure.lattice().filter(|_| structure.is_periodic()) {
        writeln!(writer, "  Lattice")?;
        for v in lattice.vectors() {
            writeln!(writer, " {:>10.6} {:>10.6} {:>10.6}", v.x, v.y, v.z)?;
        }
        writeln!(writer, "  End")?;
    }

    let indices: Vec<String> = (1..=constrained_atom_count).map(|i| i.to_string()).collect();
    writeln!(writer, "  Constraints")?;
    writeln!(writer, "    Atoms")?;
    writeln!(writer, "      {} : Fixed", indices.join(" "))?;
    writeln!(writer, "    End")?;
    writeln!(writer, "  End")?;
    writeln!(writer, "End")?;
    Ok(())
}

/// Renders the run script into a string, freezing the path's host atoms.
pub fn render(path: &ReactionPath, job: &NebJob) -> Result<String, AmsError> {
    write_path(path, path.host_atom_count().unwrap_or(0), job)
}

/// Renders the run script into a string, freezing the first
/// `constrained_atom_count` atoms of every image.
pub fn write_path(
    path: &ReactionPath,
    constrained_atom_count: usize,
    job: &NebJob,
) -> Result<String, AmsError> {
    let mut buffer = Vec::new();
    write_with_constraints(path, constrained_atom_count, job, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
