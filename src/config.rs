use std::collections::BTreeMap;
use std::path::PathBuf;

use fmprep_calendar::{Date, Granularity};
use serde::Deserialize;

/// Top-level fmprep configuration.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FmprepConfig {
    /// Filesystem layout.
    pub platform: PlatformToml,

    /// Raw-file preprocessing settings.
    pub preprocess: PreprocessToml,

    /// Model task settings used by `batch`.
    #[serde(default)]
    pub task: TaskToml,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlatformToml {
    pub cache_root: PathBuf,
    pub source_root: PathBuf,
    #[serde(default = "default_source_dir_template")]
    pub source_dir_template: String,
    /// Filename glob with the same placeholders; every file when absent.
    #[serde(default)]
    pub source_name_template: Option<String>,
    /// Worker threads; `0` uses one per core.
    #[serde(default)]
    pub threads: usize,
}

fn default_source_dir_template() -> String {
    "{collection}".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PreprocessToml {
    pub version: String,
    #[serde(default)]
    pub xres: Option<f64>,
    #[serde(default)]
    pub yres: Option<f64>,
    #[serde(default)]
    pub xext: Option<[f64; 2]>,
    #[serde(default)]
    pub yext: Option<[f64; 2]>,
    #[serde(default)]
    pub levels: Option<Vec<f64>>,
    #[serde(default)]
    pub tstep_hours: Option<u32>,
    #[serde(default)]
    pub granularity: Granularity,
    #[serde(default)]
    pub extensive: Vec<String>,
    /// Source dimension name -> canonical axis.
    #[serde(default = "default_dims")]
    pub dims: BTreeMap<String, String>,
    pub start: Date,
    pub end: Date,
    #[serde(default)]
    pub reprocess: bool,
    #[serde(default)]
    pub collections: Vec<CollectionToml>,
}

fn default_dims() -> BTreeMap<String, String> {
    [("time", "t"), ("lev", "z"), ("lat", "y"), ("lon", "x")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CollectionToml {
    pub name: String,
    pub vars: Vec<String>,
    #[serde(default)]
    pub constant: bool,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct TaskToml {
    #[serde(default)]
    pub collections: Vec<String>,
    /// Model name -> source name.
    #[serde(default)]
    pub input_variables: BTreeMap<String, String>,
    /// Canonical axis -> model dimension name.
    #[serde(default)]
    pub coords: BTreeMap<String, String>,
    #[serde(default)]
    pub levels: Option<Vec<f64>>,
    #[serde(default)]
    pub constants: Vec<String>,
    #[serde(default)]
    pub granularity: Granularity,
}
