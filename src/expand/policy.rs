use crate::document::{Document, Node};
use crate::error::SchemaError;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// How a field declared on both sides of a merge is combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldMerge {
    /// Two lists are concatenated, base items first. Any other pair keeps
    /// the local value.
    #[default]
    Concat,
    /// The local value replaces the base value, lists included.
    Override,
    /// Two mappings are merged recursively with the same policy and two
    /// lists are concatenated. Any other pair keeps the local value.
    Deep,
}

/// Per-field strategies every policy starts from. Column maps merge by
/// column name.
pub fn builtin_fields() -> IndexMap<String, FieldMerge> {
    IndexMap::from([("columns".to_string(), FieldMerge::Deep)])
}

/// Configured entries are layered over [`builtin_fields`].
fn deserialize_fields<'de, D>(deserializer: D) -> Result<IndexMap<String, FieldMerge>, D::Error>
where
    D: Deserializer<'de>,
{
    let configured = IndexMap::<String, FieldMerge>::deserialize(deserializer)?;
    let mut fields = builtin_fields();
    fields.extend(configured);
    Ok(fields)
}

/// Merge strategy used by both the include and the extends pass.
///
/// `default` applies to every key without an entry in `fields`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergePolicy {
    #[serde(default)]
    pub default: FieldMerge,

    #[serde(default = "builtin_fields", deserialize_with = "deserialize_fields")]
    pub fields: IndexMap<String, FieldMerge>,
}

impl Default for MergePolicy {
    fn default() -> Self {
        Self {
            default: FieldMerge::default(),
            fields: builtin_fields(),
        }
    }
}

impl MergePolicy {
    pub fn with_default(mut self, strategy: FieldMerge) -> Self {
        self.default = strategy;
        self
    }

    pub fn with_field(mut self, field: impl Into<String>, strategy: FieldMerge) -> Self {
        self.fields.insert(field.into(), strategy);
        self
    }

    pub fn strategy_for(&self, field: &str) -> FieldMerge {
        self.fields.get(field).copied().unwrap_or(self.default)
    }

    /// Layers `local` on top of `base`. Base keys keep their position; new
    /// local keys are appended in their declared order.
    pub fn merge_maps(&self, base: Document, local: Document) -> Document {
        let mut merged = base;
        for (key, value) in local {
            match merged.get_mut(&key) {
                Some(slot) => {
                    let previous = std::mem::replace(slot, Node::Null);
                    *slot = self.merge_field(&key, previous, value);
                }
                None => {
                    merged.insert(key, value);
                }
            }
        }
        merged
    }

    fn merge_field(&self, key: &str, base: Node, local: Node) -> Node {
        match (self.strategy_for(key), base, local) {
            (FieldMerge::Concat | FieldMerge::Deep, Node::List(mut items), Node::List(more)) => {
                items.extend(more);
                Node::List(items)
            }
            (FieldMerge::Deep, Node::Map(base), Node::Map(local)) => {
                Node::Map(self.merge_maps(base, local))
            }
            (_, _, local) => local,
        }
    }

    /// Merges a whole level: the base supplied by a directive and the level
    /// that declared it.
    ///
    /// Mappings merge key by key and lists concatenate. A list base can only
    /// absorb an empty mapping (a level holding nothing but the directive).
    pub fn merge_level(&self, base: Node, local: Node, origin: &str) -> Result<Node, SchemaError> {
        match (base, local) {
            (Node::Map(base), Node::Map(local)) => Ok(Node::Map(self.merge_maps(base, local))),
            (Node::List(mut items), Node::List(more)) => {
                items.extend(more);
                Ok(Node::List(items))
            }
            (Node::List(items), Node::Map(local)) if local.is_empty() => Ok(Node::List(items)),
            (base, local) => Err(SchemaError::IncompatibleMerge {
                origin: origin.to_string(),
                base: base.kind(),
                local: local.kind(),
            }),
        }
    }
}
