use anyhow::{Context, Result};
use indexmap::IndexMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Destination of generated files. Paths are relative to the output root.
pub trait FileWriter {
    fn write(&mut self, path: &Path, contents: &str) -> Result<()>;
}

/// Writes under a root directory, creating parent directories and
/// overwriting existing files.
#[derive(Debug, Clone)]
pub struct FsWriter {
    root: PathBuf,
}

impl FsWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl FileWriter for FsWriter {
    fn write(&mut self, path: &Path, contents: &str) -> Result<()> {
        let target = self.root.join(path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create output directory: {:?}", parent))?;
        }
        fs::write(&target, contents)
            .with_context(|| format!("Failed to write output file: {:?}", target))?;
        debug!(path = %target.display(), bytes = contents.len(), "wrote file");
        Ok(())
    }
}

/// Keeps files in memory; used for dry runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryWriter {
    files: IndexMap<PathBuf, String>,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn files(&self) -> &IndexMap<PathBuf, String> {
        &self.files
    }

    pub fn get(&self, path: impl AsRef<Path>) -> Option<&str> {
        self.files.get(path.as_ref()).map(String::as_str)
    }
}

impl FileWriter for MemoryWriter {
    fn write(&mut self, path: &Path, contents: &str) -> Result<()> {
        self.files.insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fs_writer_creates_directories_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = FsWriter::new(dir.path());
        let path = Path::new("app/Models/User.php");

        writer.write(path, "first").unwrap();
        writer.write(path, "second").unwrap();
        assert_eq!(fs::read_to_string(dir.path().join(path)).unwrap(), "second");
    }

    #[test]
    fn test_memory_writer() {
        let mut writer = MemoryWriter::new();
        writer.write(Path::new("config/app.php"), "<?php").unwrap();
        assert_eq!(writer.get("config/app.php"), Some("<?php"));
        assert_eq!(writer.files().len(), 1);
    }
}
