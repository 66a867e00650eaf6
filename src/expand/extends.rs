use super::{directive_targets, SchemaExpander, EXTENDS};
use crate::document::{lookup, Document, Node};
use crate::error::SchemaError;
use tracing::debug;

/// Depth-first `+extends` resolution against a fixed root document.
pub(super) struct ExtendsPass<'e, 'a> {
    expander: &'e SchemaExpander<'a>,
    root: &'e Document,
    /// Extends paths currently being resolved, outermost first.
    active: Vec<String>,
}

impl<'e, 'a> ExtendsPass<'e, 'a> {
    pub(super) fn new(expander: &'e SchemaExpander<'a>, root: &'e Document) -> Self {
        Self {
            expander,
            root,
            active: Vec::new(),
        }
    }

    pub(super) fn resolve_root(mut self) -> Result<Document, SchemaError> {
        match self.resolve_map(self.root.clone(), 0)? {
            Node::Map(document) => Ok(document),
            other => Err(SchemaError::IncompatibleMerge {
                origin: EXTENDS.to_string(),
                base: other.kind(),
                local: "the root mapping",
            }),
        }
    }

    fn resolve_node(&mut self, node: Node, depth: usize) -> Result<Node, SchemaError> {
        match node {
            Node::Map(map) => self.resolve_map(map, depth),
            Node::List(items) => items
                .into_iter()
                .map(|item| self.resolve_node(item, depth))
                .collect::<Result<Vec<_>, _>>()
                .map(Node::List),
            other => Ok(other),
        }
    }

    /// Resolves one mapping level. A level carrying `+extends` may turn
    /// into a list when it extends a list and declares nothing else.
    fn resolve_map(&mut self, mut map: Document, depth: usize) -> Result<Node, SchemaError> {
        self.expander.check_depth(depth, || {
            self.active.last().cloned().unwrap_or_else(|| EXTENDS.to_string())
        })?;

        let directive = map.shift_remove(EXTENDS);

        let mut own = Document::with_capacity(map.len());
        for (key, value) in map {
            let value = self.resolve_node(value, depth + 1)?;
            own.insert(key, value);
        }

        let Some(directive) = directive else {
            return Ok(Node::Map(own));
        };

        // Each path is layered under what is merged so far, so earlier
        // paths win over later ones and the level's own keys win over all.
        let expander = self.expander;
        let policy = &expander.policy;
        let mut merged = Node::Map(own);
        for path in directive_targets(EXTENDS, directive)? {
            let resolved = self.resolve_path(&path, depth)?;
            merged = policy.merge_level(resolved, merged, &path)?;
        }
        Ok(merged)
    }

    /// Looks up an extends path in the root and resolves it completely, so
    /// the merged result carries no directive.
    fn resolve_path(&mut self, path: &str, depth: usize) -> Result<Node, SchemaError> {
        if self.active.iter().any(|active| active == path) {
            return Err(SchemaError::ExtendsCycle {
                path: path.to_string(),
            });
        }

        let raw = lookup(self.root, path).ok_or_else(|| SchemaError::UnresolvedExtends {
            path: path.to_string(),
        })?;
        if !raw.is_composite() {
            return Err(SchemaError::NotComposite {
                path: path.to_string(),
            });
        }

        debug!(path, "resolving extends");

        self.active.push(path.to_string());
        let resolved = self.resolve_node(raw.clone(), depth + 1);
        self.active.pop();
        resolved
    }
}
