//! Delivery of finished artifacts.

use std::path::{Path, PathBuf};

use carelab_common::error::{CarelabError, CarelabResult};

/// Hands a finished artifact to the user under a suggested file name.
pub trait ArtifactSink: Send + Sync {
    fn save(&self, file_name: &str, bytes: &[u8]) -> CarelabResult<PathBuf>;
}

/// Writes artifacts into a directory, replacing files of the same name.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ArtifactSink for DirectorySink {
    fn save(&self, file_name: &str, bytes: &[u8]) -> CarelabResult<PathBuf> {
        if file_name.is_empty() || file_name.contains(['/', '\\']) {
            return Err(CarelabError::save(format!(
                "Invalid artifact name '{file_name}'"
            )));
        }
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            CarelabError::save(format!("Cannot create {}: {e}", self.dir.display()))
        })?;

        // Never leave a truncated artifact under the final name.
        let path = self.dir.join(file_name);
        let partial = self.dir.join(format!(".{file_name}.part"));
        std::fs::write(&partial, bytes)
            .and_then(|_| std::fs::rename(&partial, &path))
            .map_err(|e| {
                let _ = std::fs::remove_file(&partial);
                CarelabError::save(format!("Failed to write {}: {e}", path.display()))
            })?;

        tracing::info!(path = %path.display(), bytes = bytes.len(), "Artifact saved");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saves_into_created_directory() {
        let dir = std::env::temp_dir().join("carelab_sink_test").join("nested");
        let _ = std::fs::remove_dir_all(&dir);

        let sink = DirectorySink::new(&dir);
        let path = sink.save("CareLab-Offers-2025.pdf", b"%PDF-1.3").unwrap();
        assert_eq!(path, dir.join("CareLab-Offers-2025.pdf"));
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.3");
        assert!(!dir.join(".CareLab-Offers-2025.pdf.part").exists());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_rejects_path_like_names() {
        let sink = DirectorySink::new(std::env::temp_dir());
        assert!(sink.save("../escape.pdf", b"").is_err());
        assert!(sink.save("", b"").is_err());
    }
}
