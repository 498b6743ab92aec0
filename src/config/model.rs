// src/config/model.rs

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

/// Untyped configuration bag as handed over by the host.
///
/// The host keeps two views of the same logical configuration:
/// - `raw`: the values as written, before interpolation.
/// - `config`: the interpolated values.
///
/// Decoding merges both, with `config` winning on key collision.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceConfig {
    pub raw: toml::Table,
    pub config: toml::Table,
}

impl ResourceConfig {
    pub fn new(raw: toml::Table, config: toml::Table) -> Self {
        Self { raw, config }
    }

    /// A bag with no interpolated view, e.g. read straight from a file.
    pub fn from_raw(raw: toml::Table) -> Self {
        Self {
            raw,
            config: toml::Table::new(),
        }
    }

    /// Merge both views; interpolated values take precedence.
    pub fn merged(&self) -> toml::Table {
        let mut merged = self.raw.clone();
        for (key, value) in self.config.iter() {
            merged.insert(key.clone(), value.clone());
        }
        merged
    }
}

/// Decoded, strongly-shaped build request.
///
/// Produced by [`decode`](crate::config::decode); `directory` has already
/// been home-expanded. Requiredness of `directory` and `target` is checked
/// by [`validate`](crate::config::validate), not here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildRequest {
    pub directory: PathBuf,
    pub target: String,
    /// Ordered by key so the command line is reproducible.
    pub variables: BTreeMap<String, String>,
}

impl BuildRequest {
    /// Argument vector for the build tool: `[target, "k=v", ...]`.
    pub fn args(&self) -> Vec<String> {
        std::iter::once(self.target.clone())
            .chain(self.variables.iter().map(|(k, v)| format!("{k}={v}")))
            .collect()
    }
}

/// Provisioner-level settings.
///
/// ```toml
/// [settings]
/// program = "make"
/// capture_limit = 8192
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProvisionerSettings {
    /// Build tool executable to invoke.
    #[serde(default = "default_program")]
    pub program: String,

    /// How many trailing bytes of combined output are kept for error
    /// reports.
    #[serde(default = "default_capture_limit")]
    pub capture_limit: usize,
}

fn default_program() -> String {
    "make".to_string()
}

fn default_capture_limit() -> usize {
    8 * 1024
}

impl Default for ProvisionerSettings {
    fn default() -> Self {
        Self {
            program: default_program(),
            capture_limit: default_capture_limit(),
        }
    }
}

/// A provisioner file as read from disk.
///
/// ```toml
/// directory = "~/infrastructure"
/// target = "provision"
///
/// [settings]
/// capture_limit = 4096
///
/// [[variables]]
/// region = "eu-west-1"
/// ```
///
/// Everything outside `[settings]` is kept untyped and handed to the
/// decoder, so unknown keys are reported there.
#[derive(Debug, Clone, Deserialize)]
pub struct ProvisionerFile {
    #[serde(default)]
    pub settings: ProvisionerSettings,

    #[serde(flatten)]
    pub resource: toml::Table,
}

impl ProvisionerFile {
    pub fn resource_config(&self) -> ResourceConfig {
        ResourceConfig::from_raw(self.resource.clone())
    }
}
