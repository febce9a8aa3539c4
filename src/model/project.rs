use serde::{Deserialize, Serialize};

fn default_encoding() -> String {
    "utf-8".to_string()
}

fn default_locations() -> String {
    "relative".to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ProjectInfo {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub project_path: String,

    /// TS files belonging to the project, relative to `root_path` or absolute.
    #[serde(default, alias = "ts_files")]
    pub catalog_paths: Vec<String>,

    #[serde(default)]
    pub root_path: String,

    #[serde(default = "default_encoding")]
    pub encoding: String,

    #[serde(default, alias = "source_lang")]
    pub source_language: String,

    #[serde(default, alias = "target_lang")]
    pub target_language: String,

    /// Location style written on save: `absolute`, `relative` or `none`.
    #[serde(default = "default_locations")]
    pub locations: String,
}
