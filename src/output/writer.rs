//! Writing sealed bundles and the run manifest to disk.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use super::bundle::PackOutput;
use crate::error::OutputError;

/// Writes packed output into a directory.
pub struct BundleWriter {
    dir: PathBuf,
    base_name: String,
}

impl BundleWriter {
    /// Create a writer for the given directory and base name.
    pub fn new(dir: impl Into<PathBuf>, base_name: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            base_name: base_name.into(),
        }
    }

    /// Path of the manifest file.
    pub fn manifest_path(&self) -> PathBuf {
        self.dir.join(format!("{}_manifest.json", self.base_name))
    }

    /// Write every bundle and the manifest, returning the written paths.
    pub fn write(&self, output: &PackOutput) -> Result<Vec<PathBuf>, OutputError> {
        fs::create_dir_all(&self.dir).map_err(|source| OutputError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let mut written = Vec::with_capacity(output.bundles.len() + 1);
        for bundle in &output.bundles {
            let path = self.dir.join(&bundle.name);
            write_file(&path, bundle.content.as_bytes())?;
            written.push(path);
        }

        let manifest = serde_json::to_vec_pretty(&output.manifest)?;
        let manifest_path = self.manifest_path();
        write_file(&manifest_path, &manifest)?;
        written.push(manifest_path);

        info!(
            dir = %self.dir.display(),
            files = written.len(),
            "Wrote bundles"
        );

        Ok(written)
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), OutputError> {
    fs::write(path, bytes).map_err(|source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    })
}
