use crate::document::Node;

/// Renders a document value as a literal in the generated source, using
/// short array syntax for lists and mappings.
pub fn literal(node: &Node) -> String {
    match node {
        Node::Null => "null".to_string(),
        Node::Bool(value) => value.to_string(),
        Node::Int(value) => value.to_string(),
        Node::Float(value) => {
            let text = value.to_string();
            if value.is_finite() && !text.contains(['.', 'e', 'E']) {
                format!("{text}.0")
            } else {
                text
            }
        }
        Node::Str(value) => quote(value),
        Node::List(items) => {
            let items: Vec<String> = items.iter().map(literal).collect();
            format!("[{}]", items.join(", "))
        }
        Node::Map(map) => {
            let entries: Vec<String> = map
                .iter()
                .map(|(key, value)| format!("{} => {}", quote(key), literal(value)))
                .collect();
            format!("[{}]", entries.join(", "))
        }
    }
}

/// Single-quoted string literal.
pub fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}
