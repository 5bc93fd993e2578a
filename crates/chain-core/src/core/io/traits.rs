use crate::core::models::system::System;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Defines the interface for exporting a [`System`] to a file format.
///
/// Implementors hold the format options (box size, ordering, ...) and handle
/// the format-specific serialization.
pub trait SystemWriter {
    /// The error type for export operations.
    type Error: Error + From<io::Error>;

    /// Writes the system to a writer.
    ///
    /// # Arguments
    ///
    /// * `system` - The system to write.
    /// * `writer` - The writer to output to.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or I/O operations encounter issues.
    fn write_to(&self, system: &System, writer: &mut impl Write) -> Result<(), Self::Error>;

    /// Writes the system to a file path, creating or truncating the file.
    ///
    /// # Arguments
    ///
    /// * `system` - The system to write.
    /// * `path` - The path to the file to write.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or writing fails.
    fn write_to_path<P: AsRef<Path>>(&self, system: &System, path: P) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_to(system, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
