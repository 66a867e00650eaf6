use crate::naming::{camel, qualify, singularize, title, upper_camel};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Namespaces generated classes are placed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Namespaces {
    #[serde(default = "default_model_namespace")]
    pub model: String,

    #[serde(default = "default_repository_namespace")]
    pub repository: String,

    #[serde(default = "default_provider_namespace")]
    pub provider: String,
}

fn default_model_namespace() -> String {
    "App\\Models".to_string()
}

fn default_repository_namespace() -> String {
    "App\\Repositories".to_string()
}

fn default_provider_namespace() -> String {
    "App\\Providers".to_string()
}

impl Default for Namespaces {
    fn default() -> Self {
        Self {
            model: default_model_namespace(),
            repository: default_repository_namespace(),
            provider: default_provider_namespace(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    #[serde(rename = "type", default = "default_column_type")]
    pub kind: String,

    #[serde(default)]
    pub primary: bool,

    #[serde(default)]
    pub fillable: Option<bool>,

    #[serde(default)]
    pub nullable: bool,

    #[serde(default)]
    pub label: Option<String>,
}

fn default_column_type() -> String {
    "string".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    pub table: String,

    #[serde(rename = "type")]
    pub kind: String,

    pub key_from: String,

    pub key_to: String,
}

/// One table of the schema, with the naming conventions derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    #[serde(skip)]
    pub(super) name: String,

    #[serde(skip)]
    pub(super) namespaces: Namespaces,

    #[serde(default)]
    pub label: Option<String>,

    #[serde(default)]
    pub singular: Option<String>,

    #[serde(default)]
    pub model: Option<String>,

    #[serde(default)]
    pub soft_delete: bool,

    #[serde(default = "default_true")]
    pub menu: bool,

    #[serde(default)]
    pub columns: IndexMap<String, Column>,

    #[serde(default)]
    pub relations: Vec<Relation>,
}

fn default_true() -> bool {
    true
}

impl Table {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn label(&self) -> String {
        self.label.clone().unwrap_or_else(|| title(&self.name))
    }

    pub fn singular_name(&self) -> String {
        self.singular
            .clone()
            .unwrap_or_else(|| singularize(&self.name))
    }

    /// First column flagged `primary`, `id` when none is.
    pub fn primary_column(&self) -> &str {
        self.columns
            .iter()
            .find(|(_, column)| column.primary)
            .map(|(name, _)| name.as_str())
            .unwrap_or("id")
    }

    /// Non-primary columns not explicitly marked `fillable: false`.
    pub fn fillable_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|(_, column)| !column.primary && column.fillable.unwrap_or(true))
            .map(|(name, _)| name.as_str())
            .collect()
    }

    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    pub fn model_class(&self, qualified: bool) -> String {
        let class = self
            .model
            .clone()
            .unwrap_or_else(|| upper_camel(&self.singular_name()));
        self.qualified(&self.namespaces.model, class, qualified)
    }

    pub fn repository_interface(&self, qualified: bool) -> String {
        let class = format!("{}Repository", self.model_class(false));
        self.qualified(&self.namespaces.repository, class, qualified)
    }

    pub fn repository_class(&self, qualified: bool) -> String {
        let class = format!("Eloquent{}Repository", self.model_class(false));
        self.qualified(&self.namespaces.repository, class, qualified)
    }

    pub fn namespaces(&self) -> &Namespaces {
        &self.namespaces
    }

    /// Route name of the listing page, e.g. `users.index`.
    pub fn route_list_name(&self) -> String {
        format!("{}.index", self.name.replace('_', "-"))
    }

    pub fn model_varname(&self) -> String {
        camel(&self.singular_name())
    }

    pub fn primary_varname(&self) -> String {
        camel(self.primary_column())
    }

    fn qualified(&self, namespace: &str, class: String, qualified: bool) -> String {
        if qualified {
            qualify(namespace, &class)
        } else {
            class
        }
    }
}
