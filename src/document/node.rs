use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A nested mapping from string keys to [`Node`] values, in declaration order.
pub type Document = IndexMap<String, Node>;

/// A value inside a [`Document`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Node>),
    Map(Document),
}

impl Node {
    /// Short name of the value's shape, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Null => "null",
            Node::Bool(_) => "a boolean",
            Node::Int(_) | Node::Float(_) => "a number",
            Node::Str(_) => "a string",
            Node::List(_) => "a list",
            Node::Map(_) => "a mapping",
        }
    }

    /// Mappings and lists are composite; everything else is a scalar.
    pub fn is_composite(&self) -> bool {
        matches!(self, Node::List(_) | Node::Map(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Document> {
        match self {
            Node::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Node]> {
        match self {
            Node::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::Str(value.to_string())
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::Str(value)
    }
}

impl From<bool> for Node {
    fn from(value: bool) -> Self {
        Node::Bool(value)
    }
}

impl From<i64> for Node {
    fn from(value: i64) -> Self {
        Node::Int(value)
    }
}

impl From<Vec<Node>> for Node {
    fn from(value: Vec<Node>) -> Self {
        Node::List(value)
    }
}

impl From<Document> for Node {
    fn from(value: Document) -> Self {
        Node::Map(value)
    }
}

/// Looks up a dot-delimited key path. Only mapping keys are addressable.
pub fn lookup<'a>(document: &'a Document, path: &str) -> Option<&'a Node> {
    let mut segments = path.split('.');
    let mut current = document.get(segments.next()?)?;
    for segment in segments {
        current = current.as_map()?.get(segment)?;
    }
    Some(current)
}

/// Whether any mapping in the tree still carries one of the given keys.
pub fn contains_key_anywhere(document: &Document, keys: &[&str]) -> bool {
    fn visit(node: &Node, keys: &[&str]) -> bool {
        match node {
            Node::Map(map) => contains_key_anywhere(map, keys),
            Node::List(items) => items.iter().any(|item| visit(item, keys)),
            _ => false,
        }
    }

    document
        .iter()
        .any(|(key, value)| keys.contains(&key.as_str()) || visit(value, keys))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        serde_yaml::from_str(
            r#"
tables:
  user:
    columns:
      id: { type: increments }
    flags: [a, b]
count: 3
ratio: 0.5
empty: ~
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_deserialize_preserves_order_and_shapes() {
        let doc = sample();
        let keys: Vec<_> = doc.keys().cloned().collect();
        assert_eq!(keys, vec!["tables", "count", "ratio", "empty"]);
        assert_eq!(doc["count"], Node::Int(3));
        assert_eq!(doc["ratio"], Node::Float(0.5));
        assert_eq!(doc["empty"], Node::Null);
    }

    #[test]
    fn test_lookup_nested_path() {
        let doc = sample();
        let columns = lookup(&doc, "tables.user.columns").unwrap();
        assert!(columns.as_map().unwrap().contains_key("id"));
        assert!(lookup(&doc, "tables.user.missing").is_none());
        assert!(lookup(&doc, "count.deeper").is_none());
    }

    #[test]
    fn test_lookup_does_not_index_lists() {
        let doc = sample();
        assert!(lookup(&doc, "tables.user.flags.0").is_none());
    }

    #[test]
    fn test_contains_key_anywhere() {
        let mut doc = sample();
        assert!(!contains_key_anywhere(&doc, &["+extends"]));
        let mut nested = Document::new();
        nested.insert("+extends".to_string(), Node::from("tables.user"));
        doc.insert("list".to_string(), Node::List(vec![Node::Map(nested)]));
        assert!(contains_key_anywhere(&doc, &["+extends"]));
    }
}
