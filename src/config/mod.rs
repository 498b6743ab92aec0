// src/config/mod.rs

//! Configuration decoding and validation for the provisioner.
//!
//! Responsibilities:
//! - Define the resource/settings data model (`model.rs`).
//! - Undo the singleton-list wrapping of variables (`normalize.rs`).
//! - Decode the untyped bag into a `BuildRequest` (`decode.rs`).
//! - Collect configuration problems without running anything (`validate.rs`).
//! - Load a provisioner file from disk (`loader.rs`).

pub mod decode;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod validate;

pub use decode::{decode, decode_all, expand_home};
pub use loader::{load_and_validate, load_from_path};
pub use model::{BuildRequest, ProvisionerFile, ProvisionerSettings, ResourceConfig};
pub use normalize::normalize_variables;
pub use validate::{validate, validate_settings};
