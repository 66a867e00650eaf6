//! Typed view over an expanded schema document.

pub mod table;

pub use table::{Column, Namespaces, Relation, Table};

use crate::document::{Document, Node};
use crate::error::SchemaError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub email: String,
}

/// The root schema. Keys other than the ones below are ignored, so shared
/// subtrees used only as `+extends` sources can live next to `tables`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(default)]
    pub author: Author,

    #[serde(default = "default_config_file")]
    pub config_file: String,

    #[serde(default)]
    pub namespaces: Namespaces,

    #[serde(default)]
    tables: IndexMap<String, Table>,
}

fn default_config_file() -> String {
    "app".to_string()
}

impl Schema {
    /// Builds the view from a fully expanded document.
    pub fn from_document(document: &Document) -> Result<Self, SchemaError> {
        let value = serde_yaml::to_value(Node::Map(document.clone()))
            .map_err(|source| SchemaError::Invalid { source })?;
        let mut schema: Schema =
            serde_yaml::from_value(value).map_err(|source| SchemaError::Invalid { source })?;

        for (name, table) in schema.tables.iter_mut() {
            table.name = name.clone();
            table.namespaces = schema.namespaces.clone();
        }

        for table in schema.tables.values() {
            if let Some(relation) = table
                .relations
                .iter()
                .find(|relation| !schema.tables.contains_key(&relation.table))
            {
                return Err(SchemaError::UnknownTable {
                    table: table.name.clone(),
                    target: relation.table.clone(),
                });
            }
        }

        Ok(schema)
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.values()
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    pub fn author_name(&self) -> &str {
        &self.author.name
    }

    pub fn author_email(&self) -> &str {
        &self.author.email
    }

    /// `Name <email>` as used in generated docblocks.
    pub fn author_line(&self) -> String {
        format!("{} <{}>", self.author.name, self.author.email)
    }
}
