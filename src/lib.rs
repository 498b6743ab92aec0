// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod types;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use tokio::sync::oneshot;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::loader::load_and_validate;
use crate::config::validate::{validate, validate_settings};
use crate::config::{ProvisionerSettings, ResourceConfig};
use crate::errors::{ProvisionerError, Result};
use crate::exec::{ProcessLauncher, ProcessRunner, SystemLauncher};
use crate::types::OutputSink;

pub use crate::types::{ExitOutcome, Invocation};

/// Provisioner that runs a build tool (by default `make`) against a
/// directory.
///
/// The host calls [`validate`](Self::validate) before provisioning and
/// [`apply`](Self::apply) to do the work.
pub struct Provisioner {
    runner: ProcessRunner,
}

impl Provisioner {
    /// Provisioner backed by real OS processes.
    pub fn new(settings: ProvisionerSettings) -> Result<Self> {
        Self::with_launcher(settings, Arc::new(SystemLauncher))
    }

    /// Provisioner with a custom launcher (e.g. a stub in tests).
    pub fn with_launcher(
        settings: ProvisionerSettings,
        launcher: Arc<dyn ProcessLauncher>,
    ) -> Result<Self> {
        validate_settings(&settings)?;
        Ok(Self {
            runner: ProcessRunner::new(settings, launcher),
        })
    }

    pub fn settings(&self) -> &ProvisionerSettings {
        self.runner.settings()
    }

    /// Collect every configuration problem without running anything.
    ///
    /// Returns `(warnings, errors)`.
    pub fn validate(&self, config: &ResourceConfig) -> (Vec<String>, Vec<ProvisionerError>) {
        validate(config)
    }

    /// Run the build tool, streaming its output to `sink`.
    ///
    /// Every line the tool writes has been emitted by the time this returns.
    pub async fn apply(&self, config: &ResourceConfig, sink: Arc<dyn OutputSink>) -> Result<()> {
        self.runner.run(config, sink, None).await
    }

    /// Like [`apply`](Self::apply), but firing `cancel` kills the running
    /// build tool. Dropping the sender without sending does not cancel.
    pub async fn apply_with_cancel(
        &self,
        config: &ResourceConfig,
        sink: Arc<dyn OutputSink>,
        cancel: oneshot::Receiver<()>,
    ) -> Result<()> {
        self.runner.run(config, sink, Some(cancel)).await
    }
}

/// Host stand-in that prints every emitted line to stdout.
struct StdoutSink;

impl OutputSink for StdoutSink {
    fn emit(&self, line: &str) {
        println!("{line}");
    }
}

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - provisioner file loading
/// - CLI overrides for settings
/// - validation (all problems reported at once)
/// - apply, with Ctrl-C mapped to cancellation
pub async fn run(args: CliArgs) -> anyhow::Result<()> {
    let config_path = PathBuf::from(&args.config);
    let file = load_and_validate(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    let mut settings = file.settings.clone();
    if let Some(program) = args.program {
        settings.program = program;
    }
    if let Some(limit) = args.capture_limit {
        settings.capture_limit = limit;
    }

    let provisioner = Provisioner::new(settings)?;
    let resource = file.resource_config();

    let (warnings, errors) = provisioner.validate(&resource);
    for warning in &warnings {
        eprintln!("warning: {warning}");
    }
    if !errors.is_empty() {
        for error in &errors {
            eprintln!("error: {error}");
        }
        bail!("{} configuration problem(s) found", errors.len());
    }

    if args.validate_only {
        info!("configuration is valid");
        return Ok(());
    }

    // Ctrl-C → cancel the running build tool.
    let (cancel_tx, cancel_rx) = oneshot::channel();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("failed to listen for Ctrl+C: {e}");
            return;
        }
        let _ = cancel_tx.send(());
    });

    provisioner
        .apply_with_cancel(&resource, Arc::new(StdoutSink), cancel_rx)
        .await?;

    debug!("apply complete");
    Ok(())
}
