// src/exec/launcher.rs

//! Pluggable process launcher abstraction.
//!
//! The runner talks to a `ProcessLauncher` instead of spawning processes
//! directly. This makes it easy to swap in a stub launcher in tests while
//! keeping the production implementation here.
//!
//! - `SystemLauncher` is the default implementation. It spawns the build
//!   tool with `tokio::process::Command` and pumps its stdout and stderr
//!   into the supplied writer.
//! - Tests can provide their own `ProcessLauncher` that, for example,
//!   records invocations and writes scripted output.

use std::future::Future;
use std::io;
use std::pin::Pin;
use std::process::Stdio;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::errors::ProcessFailure;
use crate::types::{ExitOutcome, Invocation};

/// Destination for a child's combined stdout and stderr.
pub type OutputWriter<'a> = &'a mut (dyn AsyncWrite + Send + Unpin);

/// Future resolving once the launched process has exited.
pub type LaunchFuture<'a> =
    Pin<Box<dyn Future<Output = Result<ExitOutcome, ProcessFailure>> + Send + 'a>>;

/// Trait abstracting how the build tool is started.
///
/// Production code uses [`SystemLauncher`]; tests can provide their own
/// implementation that doesn't spawn real processes.
pub trait ProcessLauncher: Send + Sync {
    /// Run `invocation` to completion, writing all of its output to
    /// `output`.
    ///
    /// Dropping the returned future must stop the process.
    fn launch<'a>(
        &'a self,
        invocation: &'a Invocation,
        output: OutputWriter<'a>,
    ) -> LaunchFuture<'a>;
}

/// Launcher that spawns real OS processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLauncher;

impl ProcessLauncher for SystemLauncher {
    fn launch<'a>(
        &'a self,
        invocation: &'a Invocation,
        output: OutputWriter<'a>,
    ) -> LaunchFuture<'a> {
        Box::pin(run_child(invocation, output))
    }
}

async fn run_child(
    invocation: &Invocation,
    output: OutputWriter<'_>,
) -> Result<ExitOutcome, ProcessFailure> {
    let mut cmd = Command::new(&invocation.program);
    cmd.args(&invocation.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    // An empty directory means "run where we are".
    if !invocation.directory.as_os_str().is_empty() {
        cmd.current_dir(&invocation.directory);
    }

    let mut child = cmd.spawn().map_err(ProcessFailure::Spawn)?;
    debug!(pid = ?child.id(), program = %invocation.program, "spawned build tool");

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    pump_output(stdout, stderr, output).await;

    let status = child.wait().await.map_err(ProcessFailure::Wait)?;
    let outcome = ExitOutcome::from_status(status);

    info!(
        program = %invocation.program,
        exit_code = status.code().unwrap_or(-1),
        success = status.success(),
        "build tool exited"
    );

    Ok(outcome)
}

/// Copy stdout and stderr into `output` until both reach end-of-stream.
///
/// Both pipes are read from a single loop, so `output` has exactly one
/// writer and chunks land in the order they were read.
async fn pump_output<O, E>(
    mut stdout: Option<O>,
    mut stderr: Option<E>,
    output: OutputWriter<'_>,
) where
    O: AsyncRead + Unpin,
    E: AsyncRead + Unpin,
{
    let mut out_buf = vec![0u8; 8 * 1024];
    let mut err_buf = vec![0u8; 8 * 1024];

    while stdout.is_some() || stderr.is_some() {
        let (read, from_stdout) = tokio::select! {
            read = read_chunk(&mut stdout, &mut out_buf), if stdout.is_some() => (read, true),
            read = read_chunk(&mut stderr, &mut err_buf), if stderr.is_some() => (read, false),
        };

        let n = match read {
            Ok(n) => n,
            Err(e) => {
                warn!(error = %e, stdout = from_stdout, "reading child output failed");
                0
            }
        };

        if n == 0 {
            if from_stdout {
                stdout = None;
            } else {
                stderr = None;
            }
            continue;
        }

        let chunk = if from_stdout { &out_buf[..n] } else { &err_buf[..n] };
        if let Err(e) = output.write_all(chunk).await {
            warn!(error = %e, "forwarding child output failed");
        }
    }

    if let Err(e) = output.flush().await {
        debug!(error = %e, "flushing child output failed");
    }
}

async fn read_chunk<R>(pipe: &mut Option<R>, buf: &mut [u8]) -> io::Result<usize>
where
    R: AsyncRead + Unpin,
{
    match pipe.as_mut() {
        Some(pipe) => pipe.read(buf).await,
        None => Ok(0),
    }
}
