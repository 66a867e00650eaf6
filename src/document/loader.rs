use super::{Document, Node};
use crate::error::SchemaError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A parsed document together with where it came from.
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub document: Document,
    /// Canonical path of the file.
    pub path: PathBuf,
    /// Directory used to resolve relative `+include` targets.
    pub base_dir: PathBuf,
}

/// Document loader - turns a path into a parsed [`Document`]
pub trait DocumentLoader {
    fn load(&self, path: &Path) -> Result<LoadedDocument, SchemaError>;
}

/// Loads YAML schema files from disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsLoader;

impl DocumentLoader for FsLoader {
    fn load(&self, path: &Path) -> Result<LoadedDocument, SchemaError> {
        let path = with_schema_extension(path);
        if !path.is_file() {
            return Err(SchemaError::MissingFile { path });
        }

        let path = fs::canonicalize(&path).map_err(|source| SchemaError::Read {
            path: path.clone(),
            source,
        })?;
        let content = fs::read_to_string(&path).map_err(|source| SchemaError::Read {
            path: path.clone(),
            source,
        })?;

        debug!(path = %path.display(), bytes = content.len(), "loaded schema file");

        let document = parse_document(&content, &path)?;
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        Ok(LoadedDocument {
            document,
            path,
            base_dir,
        })
    }
}

/// Parses YAML text into a [`Document`]. An empty file is an empty document.
pub fn parse_document(content: &str, path: &Path) -> Result<Document, SchemaError> {
    if content.trim().is_empty() {
        return Ok(Document::new());
    }

    let node: Node = serde_yaml::from_str(content).map_err(|source| SchemaError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    match node {
        Node::Map(document) => Ok(document),
        Node::Null => Ok(Document::new()),
        _ => Err(SchemaError::NotAMapping {
            path: path.to_path_buf(),
        }),
    }
}

/// Appends `.yml` unless the path already names a YAML file.
fn with_schema_extension(path: &Path) -> PathBuf {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("yml") | Some("yaml") => path.to_path_buf(),
        _ => {
            let mut os = path.as_os_str().to_os_string();
            os.push(".yml");
            PathBuf::from(os)
        }
    }
}
