//! Schema macro expansion.
//!
//! Resolves the two directives a schema document may carry at any level:
//!
//! - `+include` composes other files into the current document, either by
//!   merging them into a mapping (`+include: [a.yml, b.yml]`) or by
//!   substituting a whole file for a value (`key: "+include:a.yml"`).
//! - `+extends` merges other subtrees of the same document into the current
//!   level (`+extends: defaults.table`).
//!
//! Includes are resolved first, then extends run against the fully included
//! document. The output never contains a directive key.

mod extends;
mod include;
pub mod policy;

pub use policy::{FieldMerge, MergePolicy};

use crate::document::{Document, DocumentLoader, Node};
use crate::error::SchemaError;
use std::path::Path;
use tracing::debug;

pub const INCLUDE: &str = "+include";
pub const INCLUDE_PREFIX: &str = "+include:";
pub const EXTENDS: &str = "+extends";

/// Default ceiling for nested includes, nested extends and tree depth.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Expands `+include` and `+extends` directives in a schema document.
pub struct SchemaExpander<'a> {
    loader: &'a dyn DocumentLoader,
    policy: MergePolicy,
    max_depth: usize,
}

impl<'a> SchemaExpander<'a> {
    pub fn new(loader: &'a dyn DocumentLoader) -> Self {
        Self {
            loader,
            policy: MergePolicy::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_policy(mut self, policy: MergePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn policy(&self) -> &MergePolicy {
        &self.policy
    }

    /// Loads a schema file and expands it.
    pub fn expand_file(&self, path: &Path) -> Result<Document, SchemaError> {
        let loaded = self.loader.load(path)?;
        debug!(path = %loaded.path.display(), "expanding schema file");

        let mut active = vec![loaded.path.clone()];
        let included = include::IncludePass::new(self, &mut active)
            .resolve_map(loaded.document, &loaded.base_dir, 0)?;
        extends::ExtendsPass::new(self, &included).resolve_root()
    }

    /// Expands an already parsed document. `base_dir` is the directory
    /// relative `+include` targets are resolved against.
    pub fn expand(&self, raw: Document, base_dir: &Path) -> Result<Document, SchemaError> {
        let mut active = Vec::new();
        let included = include::IncludePass::new(self, &mut active).resolve_map(raw, base_dir, 0)?;
        extends::ExtendsPass::new(self, &included).resolve_root()
    }

    fn check_depth(&self, depth: usize, at: impl FnOnce() -> String) -> Result<(), SchemaError> {
        if depth > self.max_depth {
            return Err(SchemaError::DepthExceeded {
                limit: self.max_depth,
                at: at(),
            });
        }
        Ok(())
    }
}

/// Reads a directive value: a single path or a list of paths.
fn directive_targets(directive: &'static str, value: Node) -> Result<Vec<String>, SchemaError> {
    match value {
        Node::Str(path) => Ok(vec![path]),
        Node::List(items) => items
            .into_iter()
            .map(|item| match item {
                Node::Str(path) => Ok(path),
                other => Err(SchemaError::InvalidDirective {
                    directive,
                    found: other.kind(),
                }),
            })
            .collect(),
        other => Err(SchemaError::InvalidDirective {
            directive,
            found: other.kind(),
        }),
    }
}
