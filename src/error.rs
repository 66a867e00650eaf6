//! Error types for schema expansion and generator resolution.

use std::path::PathBuf;
use thiserror::Error;

/// Error raised while loading, expanding or interpreting a schema document.
///
/// Every variant is fatal for the current generation run.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A referenced schema file does not exist.
    #[error("schema file '{}' not found", path.display())]
    MissingFile {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// A schema file exists but could not be read.
    #[error("failed to read schema file '{}': {source}", path.display())]
    Read {
        /// Path of the file.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// A schema file is not valid YAML, or uses non-string keys.
    #[error("failed to parse schema file '{}': {source}", path.display())]
    Parse {
        /// Path of the file.
        path: PathBuf,
        /// Underlying YAML error.
        #[source]
        source: serde_yaml::Error,
    },

    /// A schema file parsed, but its top level is not a mapping.
    #[error("schema file '{}' must contain a mapping at its top level", path.display())]
    NotAMapping {
        /// Path of the file.
        path: PathBuf,
    },

    /// A directive carried a value of the wrong shape.
    #[error("invalid '{directive}' directive: expected a path or a list of paths, found {found}")]
    InvalidDirective {
        /// Directive key.
        directive: &'static str,
        /// Kind of value that was found.
        found: &'static str,
    },

    /// An `+extends` path does not exist in the root document.
    #[error("cannot extend '{path}': key '{path}' is not defined in your schema")]
    UnresolvedExtends {
        /// Dot-delimited path.
        path: String,
    },

    /// An `+extends` path resolves to a scalar.
    #[error("cannot extend '{path}': value of '{path}' is not a mapping or a list")]
    NotComposite {
        /// Dot-delimited path.
        path: String,
    },

    /// Two levels cannot be merged because their shapes differ.
    #[error("cannot merge {base} from '{origin}' into {local}")]
    IncompatibleMerge {
        /// Extends path or include target that supplied the base.
        origin: String,
        /// Kind of the base value.
        base: &'static str,
        /// Kind of the local value.
        local: &'static str,
    },

    /// A file includes itself, directly or transitively.
    #[error("include cycle detected at '{}'", path.display())]
    IncludeCycle {
        /// File that was included again.
        path: PathBuf,
    },

    /// An extends path extends itself, directly or transitively.
    #[error("extends cycle detected at '{path}'")]
    ExtendsCycle {
        /// Dot-delimited path that was entered again.
        path: String,
    },

    /// Expansion nested deeper than the configured ceiling.
    #[error("schema expansion exceeded the depth limit of {limit} at '{at}'")]
    DepthExceeded {
        /// Configured limit.
        limit: usize,
        /// Key, path or file where the limit was hit.
        at: String,
    },

    /// The expanded document does not match the typed schema view.
    #[error("invalid schema: {source}")]
    Invalid {
        /// Underlying deserialization error.
        #[source]
        source: serde_yaml::Error,
    },

    /// A relation references a table that is not declared.
    #[error("table '{table}' has a relation to undefined table '{target}'")]
    UnknownTable {
        /// Table declaring the relation.
        table: String,
        /// Missing target table.
        target: String,
    },
}

/// Error raised while binding or resolving generator roles.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// The role is not in the built-in role table.
    #[error("'{role}' is not a bindable generator role")]
    InvalidRole {
        /// Role identifier.
        role: String,
    },

    /// The implementation does not satisfy the role's required base type.
    #[error("generator '{implementation}' bound to role '{role}' must be '{required}' or a subtype of it")]
    ContractViolation {
        /// Role identifier.
        role: String,
        /// Offending implementation type.
        implementation: String,
        /// Required base type.
        required: String,
    },

    /// The type is not known to the instantiation service.
    #[error("generator type '{type_id}' is not registered")]
    UnknownType {
        /// Type identifier.
        type_id: String,
    },

    /// The instantiation service failed to construct the type.
    #[error("failed to instantiate generator '{type_id}': {message}")]
    Instantiation {
        /// Type identifier.
        type_id: String,
        /// Failure description.
        message: String,
    },
}
