use super::schema::Config;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_CONFIG_PATH: &str = "./.config/schemagen.yaml";

/// Load configuration from file or return default
pub fn load_config(custom_path: Option<&Path>) -> Result<Config> {
    let config_path = match custom_path {
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(DEFAULT_CONFIG_PATH),
    };

    if config_path.exists() {
        debug!(path = %config_path.display(), "loading config");
        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;

        Ok(config)
    } else if custom_path.is_some() {
        // explicit path must exist
        anyhow::bail!("Config file not found: {:?}", config_path);
    } else {
        debug!("no config file, using defaults");
        Ok(Config::default())
    }
}

/// Merge config with CLI arguments (CLI takes precedence)
pub fn merge_with_cli_args(
    mut config: Config,
    schema: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Config {
    if let Some(schema_path) = schema {
        config.schema = Some(schema_path);
    }

    if let Some(output_path) = output {
        config.output = output_path;
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expand::FieldMerge;

    #[test]
    fn test_load_full_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schemagen.yaml");
        fs::write(
            &path,
            r#"
version: "2"
schema: schema/app.yml
output: build
bindings:
  model: audited-model-generator
hooks:
  beforeGenerate: ["echo before"]
merge:
  default: deep
  fields:
    relations: override
max_depth: 8
"#,
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.version, "2");
        assert_eq!(config.schema, Some(PathBuf::from("schema/app.yml")));
        assert_eq!(config.output, PathBuf::from("build"));
        assert_eq!(config.bindings["model"], "audited-model-generator");
        assert_eq!(config.hooks.before_generate, vec!["echo before"]);
        assert!(config.hooks.after_generate.is_empty());
        assert_eq!(config.merge.default, FieldMerge::Deep);
        assert_eq!(config.merge.strategy_for("relations"), FieldMerge::Override);
        assert_eq!(config.merge.strategy_for("columns"), FieldMerge::Deep);
        assert_eq!(config.max_depth, 8);
    }

    #[test]
    fn test_defaults_for_empty_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schemagen.yaml");
        fs::write(&path, "{}\n").unwrap();
        assert_eq!(load_config(Some(&path)).unwrap(), Config::default());
    }

    #[test]
    fn test_missing_explicit_config_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(Some(&dir.path().join("nope.yaml"))).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_cli_args_take_precedence() {
        let config = Config {
            schema: Some(PathBuf::from("from-file.yml")),
            ..Config::default()
        };
        let merged = merge_with_cli_args(config.clone(), Some(PathBuf::from("cli.yml")), None);
        assert_eq!(merged.schema, Some(PathBuf::from("cli.yml")));
        assert_eq!(merged.output, PathBuf::from("generated"));

        let merged = merge_with_cli_args(config, None, Some(PathBuf::from("out")));
        assert_eq!(merged.schema, Some(PathBuf::from("from-file.yml")));
        assert_eq!(merged.output, PathBuf::from("out"));
    }
}
