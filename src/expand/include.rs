use super::{directive_targets, SchemaExpander, INCLUDE, INCLUDE_PREFIX};
use crate::document::{Document, Node};
use crate::error::SchemaError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Depth-first `+include` resolution.
pub(super) struct IncludePass<'e, 'a> {
    expander: &'e SchemaExpander<'a>,
    /// Files currently being included, outermost first.
    active: &'e mut Vec<PathBuf>,
}

impl<'e, 'a> IncludePass<'e, 'a> {
    pub(super) fn new(expander: &'e SchemaExpander<'a>, active: &'e mut Vec<PathBuf>) -> Self {
        Self { expander, active }
    }

    pub(super) fn resolve_map(
        &mut self,
        map: Document,
        base_dir: &Path,
        depth: usize,
    ) -> Result<Document, SchemaError> {
        self.expander
            .check_depth(depth, || base_dir.display().to_string())?;

        let mut own = Document::with_capacity(map.len());
        let mut targets = Vec::new();
        for (key, value) in map {
            if key == INCLUDE {
                targets = directive_targets(INCLUDE, value)?;
            } else {
                let value = self.resolve_node(value, base_dir, depth + 1)?;
                own.insert(key, value);
            }
        }

        if targets.is_empty() {
            return Ok(own);
        }

        let expander = self.expander;
        let policy = &expander.policy;
        let mut merged = Document::new();
        for target in &targets {
            let included = self.load(target, base_dir, depth)?;
            merged = policy.merge_maps(merged, included);
        }
        Ok(policy.merge_maps(merged, own))
    }

    fn resolve_node(&mut self, node: Node, base_dir: &Path, depth: usize) -> Result<Node, SchemaError> {
        match node {
            Node::Str(value) => match value.strip_prefix(INCLUDE_PREFIX) {
                Some(target) => Ok(Node::Map(self.load(target.trim(), base_dir, depth)?)),
                None => Ok(Node::Str(value)),
            },
            Node::Map(map) => Ok(Node::Map(self.resolve_map(map, base_dir, depth)?)),
            Node::List(items) => items
                .into_iter()
                .map(|item| self.resolve_node(item, base_dir, depth))
                .collect::<Result<Vec<_>, _>>()
                .map(Node::List),
            other => Ok(other),
        }
    }

    /// Loads one include target and resolves its own includes relative to
    /// the directory it lives in.
    fn load(&mut self, target: &str, base_dir: &Path, depth: usize) -> Result<Document, SchemaError> {
        let loaded = self.expander.loader.load(&base_dir.join(target))?;
        if self.active.contains(&loaded.path) {
            return Err(SchemaError::IncludeCycle { path: loaded.path });
        }

        debug!(target, path = %loaded.path.display(), "including schema file");

        self.active.push(loaded.path);
        let resolved = self.resolve_map(loaded.document, &loaded.base_dir, depth + 1);
        self.active.pop();
        resolved
    }
}
