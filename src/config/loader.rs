// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::ProvisionerFile;
use crate::config::validate::validate_settings;
use crate::errors::Result;

/// Load a provisioner file from a given path.
///
/// This only performs TOML deserialization; the resource keys are left
/// untyped for the decoder. Use [`load_and_validate`] to also check the
/// `[settings]` table.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<ProvisionerFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let file: ProvisionerFile = toml::from_str(&contents)?;

    Ok(file)
}

/// Load a provisioner file and check its settings.
///
/// Resource configuration problems (unknown keys, missing target, ...) are
/// not checked here; they belong to
/// [`Provisioner::validate`](crate::Provisioner::validate).
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ProvisionerFile> {
    let file = load_from_path(&path)?;
    validate_settings(&file.settings)?;
    Ok(file)
}

/// Default provisioner file: `Provisioner.toml` in the working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Provisioner.toml")
}
