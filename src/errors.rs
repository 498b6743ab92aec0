// src/errors.rs

//! Crate-wide error types and aliases.

use thiserror::Error;

/// Problems found while decoding a resource configuration into a
/// [`BuildRequest`](crate::config::BuildRequest).
///
/// None of these are retried; they are surfaced before any process runs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("error parsing the variables: expected a list holding exactly one map, got {len} elements")]
    MalformedVariables { len: usize },

    #[error("unknown configuration field '{0}'")]
    UnknownField(String),

    #[error("'{field}' expected type '{expected}', got '{found}'")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("cannot expand home directory: {0}")]
    HomeExpansion(String),
}

/// Why a launched build tool did not succeed.
#[derive(Error, Debug)]
pub enum ProcessFailure {
    #[error("failed to start process: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("failed while waiting for process: {0}")]
    Wait(#[source] std::io::Error),

    #[error("exit status {0}")]
    Exit(i32),

    #[error("cancelled")]
    Cancelled,
}

#[derive(Error, Debug)]
pub enum ProvisionerError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("a {0} is required")]
    RequiredField(&'static str),

    #[error("error running command '{command}': {failure}. Output: {}", String::from_utf8_lossy(.output))]
    Process {
        command: String,
        failure: ProcessFailure,
        output: Vec<u8>,
    },

    #[error("invalid settings: {0}")]
    Settings(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl ProvisionerError {
    /// Trailing captured output of a failed process, if this is a process
    /// error.
    pub fn captured_output(&self) -> Option<&[u8]> {
        match self {
            ProvisionerError::Process { output, .. } => Some(output),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ProvisionerError>;
