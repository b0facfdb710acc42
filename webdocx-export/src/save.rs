//! Persisting encoded documents

use std::fs;
use std::path::PathBuf;

use crate::error::Result;

/// Destination for encoded document bytes.
pub trait Saver: Send + Sync {
    /// Store `bytes` under `file_name`, returning where they ended up.
    fn save(&self, bytes: &[u8], file_name: &str) -> Result<PathBuf>;
}

/// Writes documents into a directory, creating it on first use.
#[derive(Debug, Clone)]
pub struct DirectorySaver {
    dir: PathBuf,
}

impl DirectorySaver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl Default for DirectorySaver {
    fn default() -> Self {
        Self::new(".")
    }
}

impl Saver for DirectorySaver {
    fn save(&self, bytes: &[u8], file_name: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(file_name);
        fs::write(&path, bytes)?;
        log::info!("wrote {} bytes to {}", bytes.len(), path.display());
        Ok(path)
    }
}

/// File name for a document called `name`, with `extension` appended unless already present.
pub fn output_file_name(name: &str, extension: &str) -> String {
    let name = name.trim();
    let name = if name.is_empty() { "document" } else { name };
    let suffix = format!(".{extension}");
    if name.to_ascii_lowercase().ends_with(&suffix.to_ascii_lowercase()) {
        name.to_string()
    } else {
        format!("{name}{suffix}")
    }
}
