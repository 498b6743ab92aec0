use std::sync::{Arc, Mutex};

use tokio::io::AsyncWriteExt;
use makefile_provisioner::errors::ProcessFailure;
use makefile_provisioner::exec::{LaunchFuture, OutputWriter, ProcessLauncher};
use makefile_provisioner::types::{ExitOutcome, Invocation};

/// A launcher that doesn't spawn anything:
/// - records every invocation it is asked to run
/// - writes a scripted byte stream as the "combined output"
/// - reports a scripted exit outcome.
///
/// With `hang()`, the launch never finishes on its own (for cancellation
/// tests).
pub struct StubLauncher {
    output: Vec<u8>,
    outcome: ExitOutcome,
    hang: bool,
    invocations: Arc<Mutex<Vec<Invocation>>>,
}

impl StubLauncher {
    pub fn new(output: impl Into<Vec<u8>>, outcome: ExitOutcome) -> Self {
        Self {
            output: output.into(),
            outcome,
            hang: false,
            invocations: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn succeeding(output: impl Into<Vec<u8>>) -> Self {
        Self::new(output, ExitOutcome::Success)
    }

    pub fn hang(mut self) -> Self {
        self.hang = true;
        self
    }

    /// Shared handle to the recorded invocations.
    pub fn invocations(&self) -> Arc<Mutex<Vec<Invocation>>> {
        Arc::clone(&self.invocations)
    }
}

impl ProcessLauncher for StubLauncher {
    fn launch<'a>(
        &'a self,
        invocation: &'a Invocation,
        output: OutputWriter<'a>,
    ) -> LaunchFuture<'a> {
        Box::pin(async move {
            {
                let mut guard = self.invocations.lock().unwrap();
                guard.push(invocation.clone());
            }

            // Dribble the output in small chunks, like a real pipe would.
            for chunk in self.output.chunks(1000) {
                output
                    .write_all(chunk)
                    .await
                    .map_err(ProcessFailure::Wait)?;
            }

            if self.hang {
                std::future::pending::<()>().await;
            }

            Ok::<_, ProcessFailure>(self.outcome)
        })
    }
}
