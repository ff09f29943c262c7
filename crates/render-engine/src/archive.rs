//! In-memory compressed archive of still images.

use std::io::{Cursor, Write};

use zip::write::FileOptions;
use zip::ZipWriter;

use carelab_common::error::{CarelabError, CarelabResult};

/// Collects named files and produces one archive blob.
pub trait ArchiveAssembler: Send {
    fn add_file(&mut self, name: &str, bytes: &[u8]) -> CarelabResult<()>;

    /// Entry names in insertion order.
    fn entries(&self) -> &[String];

    fn finalize(self: Box<Self>) -> CarelabResult<Vec<u8>>;
}

pub trait ArchiveFactory: Send + Sync {
    fn create(&self) -> CarelabResult<Box<dyn ArchiveAssembler>>;
}

/// Deflate-compressed ZIP archives.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZipArchiveFactory;

impl ArchiveFactory for ZipArchiveFactory {
    fn create(&self) -> CarelabResult<Box<dyn ArchiveAssembler>> {
        Ok(Box::new(ZipAssembler::new()))
    }
}

pub struct ZipAssembler {
    zip: ZipWriter<Cursor<Vec<u8>>>,
    entries: Vec<String>,
}

impl ZipAssembler {
    pub fn new() -> Self {
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
            entries: Vec::new(),
        }
    }
}

impl Default for ZipAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveAssembler for ZipAssembler {
    fn add_file(&mut self, name: &str, bytes: &[u8]) -> CarelabResult<()> {
        if self.entries.iter().any(|e| e == name) {
            return Err(CarelabError::assembly(format!(
                "Duplicate archive entry '{name}'"
            )));
        }
        let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        self.zip
            .start_file(name, options)
            .map_err(|e| CarelabError::assembly(format!("Failed to add '{name}': {e}")))?;
        self.zip
            .write_all(bytes)
            .map_err(|e| CarelabError::assembly(format!("Failed to write '{name}': {e}")))?;
        self.entries.push(name.to_string());
        Ok(())
    }

    fn entries(&self) -> &[String] {
        &self.entries
    }

    fn finalize(mut self: Box<Self>) -> CarelabResult<Vec<u8>> {
        let cursor = self
            .zip
            .finish()
            .map_err(|e| CarelabError::assembly(format!("Failed to finish archive: {e}")))?;
        let bytes = cursor.into_inner();
        tracing::debug!(
            entries = self.entries.len(),
            bytes = bytes.len(),
            "Archive assembled"
        );
        Ok(bytes)
    }
}
