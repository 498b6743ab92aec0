#![allow(dead_code)]

use makefile_provisioner::config::ResourceConfig;
use toml::Value;

/// Builder for `ResourceConfig` to simplify test setup.
///
/// Values go into the interpolated view unless added with the `raw_*`
/// methods.
pub struct ResourceConfigBuilder {
    config: ResourceConfig,
}

impl ResourceConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: ResourceConfig::default(),
        }
    }

    /// A config with `directory` and `target` already set.
    pub fn valid(directory: &str, target: &str) -> Self {
        Self::new().directory(directory).target(target)
    }

    pub fn directory(self, dir: &str) -> Self {
        self.value("directory", Value::String(dir.to_string()))
    }

    pub fn target(self, target: &str) -> Self {
        self.value("target", Value::String(target.to_string()))
    }

    /// Variables in the host's singleton-wrapped shape: `[{ k = v, .. }]`.
    pub fn variables(self, vars: &[(&str, &str)]) -> Self {
        let table: toml::Table = vars
            .iter()
            .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
            .collect();
        self.value("variables", Value::Array(vec![Value::Table(table)]))
    }

    pub fn value(mut self, key: &str, value: Value) -> Self {
        self.config.config.insert(key.to_string(), value);
        self
    }

    pub fn raw_value(mut self, key: &str, value: Value) -> Self {
        self.config.raw.insert(key.to_string(), value);
        self
    }

    pub fn without(mut self, key: &str) -> Self {
        self.config.config.remove(key);
        self.config.raw.remove(key);
        self
    }

    pub fn build(self) -> ResourceConfig {
        self.config
    }
}

impl Default for ResourceConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
