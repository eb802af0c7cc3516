use crate::core::models::structure::AtomicStructure;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Defines the interface for reading and writing atomic structure file formats.
///
/// Implementors handle format-specific parsing and serialization; the provided
/// methods add path-based convenience wrappers on top.
pub trait StructureFile {
    /// The error type for I/O operations.
    type Error: Error + From<io::Error>;

    /// Reads the first structure from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or I/O operations encounter issues.
    fn read_from(reader: &mut impl BufRead) -> Result<AtomicStructure, Self::Error>;

    /// Writes a single structure to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_to(structure: &AtomicStructure, writer: &mut impl Write) -> Result<(), Self::Error>;

    /// Writes several structures, one after the other, to a writer.
    fn write_all_to<'a>(
        structures: impl IntoIterator<Item = &'a AtomicStructure>,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        for structure in structures {
            Self::write_to(structure, writer)?;
        }
        Ok(())
    }

    /// Reads a structure from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<AtomicStructure, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }

    /// Writes a structure to a file path, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or writing fails.
    fn write_to_path<P: AsRef<Path>>(
        structure: &AtomicStructure,
        path: P,
    ) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(structure, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
