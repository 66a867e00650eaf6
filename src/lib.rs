//! Schema-driven code generation.
//!
//! A run reads a YAML schema ([`document`]), expands its `+include` and
//! `+extends` directives ([`expand`]), builds a typed view over the result
//! ([`schema`]) and hands every table to the generators bound in the
//! [`registry`]. Generators model classes with the [`builder`] and emit
//! label-addressable [`code`] that patch hooks can edit before
//! [`pipeline::Pipeline`] writes it out.

pub mod app_config;
pub mod builder;
pub mod code;
pub mod config;
pub mod document;
pub mod error;
pub mod expand;
pub mod generators;
pub mod naming;
pub mod pipeline;
pub mod registry;
pub mod schema;
pub mod writer;

pub use error::{RegistryError, SchemaError};
pub use pipeline::{Pipeline, RunReport};
