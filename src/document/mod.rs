pub mod loader;
pub mod node;

pub use loader::{parse_document, DocumentLoader, FsLoader, LoadedDocument};
pub use node::{contains_key_anywhere, lookup, Document, Node};
