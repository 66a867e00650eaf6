//! Application config aggregated over a generation run.

use crate::builder::quote;
use anyhow::{Context as _, Result};
use indexmap::IndexMap;
use std::path::PathBuf;
use tera::{Context, Tera};
use tracing::debug;

const TEMPLATE: &str = include_str!("../templates/app_config.php.tera");

/// Repository bindings and menu entries written to `config/<file>.php`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    file_name: String,
    repositories: IndexMap<String, String>,
    menu: IndexMap<String, String>,
}

impl AppConfig {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            ..Self::default()
        }
    }

    pub fn path(&self) -> PathBuf {
        PathBuf::from("config").join(format!("{}.php", self.file_name))
    }

    pub fn repositories(&self) -> &IndexMap<String, String> {
        &self.repositories
    }

    pub fn menu(&self) -> &IndexMap<String, String> {
        &self.menu
    }

    /// Registers `interface -> class`. An existing entry is only replaced
    /// when `update` is set. Returns whether the config changed.
    pub fn add_repository(&mut self, interface: &str, class: &str, update: bool) -> bool {
        upsert(&mut self.repositories, interface, class, update)
    }

    /// Registers a menu entry for `route`, same rules as
    /// [`AppConfig::add_repository`].
    pub fn add_menu(&mut self, route: &str, label: &str, update: bool) -> bool {
        upsert(&mut self.menu, route, label, update)
    }

    pub fn render(&self) -> Result<String> {
        let repositories: Vec<_> = self
            .repositories
            .iter()
            .map(|(interface, class)| {
                serde_json::json!({
                    "interface": format!("\\{}", interface.trim_start_matches('\\')),
                    "class": format!("\\{}", class.trim_start_matches('\\')),
                })
            })
            .collect();
        let menu: Vec<_> = self
            .menu
            .iter()
            .map(|(route, label)| {
                serde_json::json!({
                    "route": quote(route),
                    "label": quote(label),
                })
            })
            .collect();

        let mut context = Context::new();
        context.insert("header", "Generated by schemagen.");
        context.insert("repositories", &repositories);
        context.insert("menu", &menu);

        Tera::one_off(TEMPLATE, &context, false)
            .with_context(|| format!("Failed to render {:?}", self.path()))
    }
}

fn upsert(entries: &mut IndexMap<String, String>, key: &str, value: &str, update: bool) -> bool {
    match entries.get_mut(key) {
        Some(existing) if existing.as_str() == value => false,
        Some(_) if !update => {
            debug!(key, "entry exists, not updating");
            false
        }
        Some(existing) => {
            *existing = value.to_string();
            true
        }
        None => {
            entries.insert(key.to_string(), value.to_string());
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_with_and_without_update() {
        let mut config = AppConfig::new("app");
        assert!(config.add_menu("users.index", "Users", false));
        assert!(!config.add_menu("users.index", "Members", false));
        assert_eq!(config.menu()["users.index"], "Users");
        assert!(config.add_menu("users.index", "Members", true));
        assert_eq!(config.menu()["users.index"], "Members");
        assert!(!config.add_menu("users.index", "Members", true));

        assert!(config.add_repository("App\\UserRepository", "App\\EloquentUserRepository", true));
        assert_eq!(config.repositories().len(), 1);
        assert_eq!(config.path(), PathBuf::from("config/app.php"));
    }

    #[test]
    fn test_render() {
        let mut config = AppConfig::new("admin");
        config.add_repository(
            "App\\Repositories\\UserRepository",
            "App\\Repositories\\EloquentUserRepository",
            true,
        );
        config.add_menu("users.index", "User's List", false);

        let text = config.render().unwrap();
        let expected = r#"<?php

/*
 * Generated by schemagen.
 */

return [
    'repositories' => [
        \App\Repositories\UserRepository::class => \App\Repositories\EloquentUserRepository::class,
    ],

    'menu' => [
        'users.index' => 'User\'s List',
    ],
];
"#;
        assert_eq!(text.trim_end(), expected.trim_end());
    }

    #[test]
    fn test_render_empty() {
        let text = AppConfig::new("app").render().unwrap();
        assert!(text.contains("    'repositories' => [\n    ],\n"));
        assert!(text.contains("    'menu' => [\n    ],\n"));
    }
}
