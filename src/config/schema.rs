use crate::expand::{MergePolicy, DEFAULT_MAX_DEPTH};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: String,

    /// Root schema document
    #[serde(default)]
    pub schema: Option<PathBuf>,

    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Role id -> generator type id
    #[serde(default)]
    pub bindings: IndexMap<String, String>,

    #[serde(default)]
    pub hooks: HooksConfig,

    #[serde(default)]
    pub merge: MergePolicy,

    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

fn default_version() -> String {
    "1.0".to_string()
}

fn default_output() -> PathBuf {
    PathBuf::from("generated")
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct HooksConfig {
    #[serde(rename = "beforeGenerate", default)]
    pub before_generate: Vec<String>,

    #[serde(rename = "afterGenerate", default)]
    pub after_generate: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            schema: None,
            output: default_output(),
            bindings: IndexMap::new(),
            hooks: HooksConfig::default(),
            merge: MergePolicy::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
