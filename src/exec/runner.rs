// src/exec/runner.rs

//! Single build tool run: decode, launch, relay, drain, report.

use std::sync::Arc;

use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::config::decode;
use crate::config::model::{ProvisionerSettings, ResourceConfig};
use crate::errors::{ProcessFailure, ProvisionerError, Result};
use crate::exec::fan_out::FanOutWriter;
use crate::exec::launcher::{LaunchFuture, ProcessLauncher};
use crate::exec::relay::spawn_relay;
use crate::exec::ring_buffer::BoundedSink;
use crate::types::{ExitOutcome, Invocation, OutputSink};

/// In-memory buffer between the fan-out writer and the relay task.
const PIPE_CAPACITY: usize = 64 * 1024;

/// Runs the build tool for one resource configuration.
///
/// Stages:
/// 1. decode the configuration (errors abort before anything is launched),
/// 2. announce the command and start the output relay,
/// 3. launch the child with its output fanned out to the capture window
///    and the relay pipe,
/// 4. close the pipe and wait for the relay to drain,
/// 5. turn a failed run into an error carrying the captured tail.
pub struct ProcessRunner {
    settings: ProvisionerSettings,
    launcher: Arc<dyn ProcessLauncher>,
}

impl ProcessRunner {
    pub fn new(settings: ProvisionerSettings, launcher: Arc<dyn ProcessLauncher>) -> Self {
        Self { settings, launcher }
    }

    pub fn settings(&self) -> &ProvisionerSettings {
        &self.settings
    }

    /// Run to completion. If `cancel` fires while the child is running, the
    /// child is killed and the run fails with [`ProcessFailure::Cancelled`].
    pub async fn run(
        &self,
        config: &ResourceConfig,
        sink: Arc<dyn OutputSink>,
        cancel: Option<oneshot::Receiver<()>>,
    ) -> Result<()> {
        let request = decode(config)?;

        let invocation = Invocation {
            program: self.settings.program.clone(),
            args: request.args(),
            directory: request.directory,
        };
        let command = invocation.command_line();
        let capture = BoundedSink::new(self.settings.capture_limit)?;

        sink.emit(&format!("Executing: {command}"));

        let (feed, source) = tokio::io::duplex(PIPE_CAPACITY);
        let relay = spawn_relay(source, Arc::clone(&sink));
        let mut output = FanOutWriter::new(capture, feed);

        info!(
            command = %command,
            directory = %invocation.directory.display(),
            "running build tool"
        );

        let launch = self.launcher.launch(&invocation, &mut output);
        let outcome = wait_for_exit(launch, cancel, &command).await;

        // Close the write end before waiting so the relay sees end-of-stream.
        let (capture, feed) = output.into_parts();
        drop(feed);
        let lines = relay.finished().await;
        debug!(lines, captured = capture.len(), "output drained");

        let failure = match outcome {
            Ok(ExitOutcome::Success) => {
                info!(command = %command, "build tool succeeded");
                return Ok(());
            }
            Ok(ExitOutcome::Failed(code)) => ProcessFailure::Exit(code),
            Err(failure) => failure,
        };

        warn!(command = %command, error = %failure, "build tool failed");

        Err(ProvisionerError::Process {
            command,
            failure,
            output: capture.into_bytes(),
        })
    }
}

/// Await the launched process, or stop it when `cancel` fires.
///
/// Takes the launch future by value so the child is dropped (and killed)
/// before the caller closes the relay pipe.
async fn wait_for_exit(
    mut launch: LaunchFuture<'_>,
    cancel: Option<oneshot::Receiver<()>>,
    command: &str,
) -> std::result::Result<ExitOutcome, ProcessFailure> {
    let Some(cancel) = cancel else {
        return launch.await;
    };

    tokio::select! {
        outcome = &mut launch => outcome,
        signal = cancel => match signal {
            Ok(()) => {
                info!(command = %command, "cancellation requested; stopping build tool");
                Err(ProcessFailure::Cancelled)
            }
            // Sender dropped without a signal: keep waiting.
            Err(_) => launch.await,
        },
    }
}
