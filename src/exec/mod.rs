// src/exec/mod.rs

//! Process execution layer.
//!
//! This module is responsible for actually running the build tool, using
//! `tokio::process::Command`, and streaming its output back to the host.
//!
//! - [`ring_buffer`] keeps the trailing window of output for error reports.
//! - [`fan_out`] duplicates the child's output into that window and the
//!   relay pipe.
//! - [`relay`] turns the piped bytes into lines for the host's sink.
//! - [`launcher`] provides the `ProcessLauncher` trait and the concrete
//!   `SystemLauncher`, which tests can replace with a stub.
//! - [`runner`] ties it together for a single run.

pub mod fan_out;
pub mod launcher;
pub mod relay;
pub mod ring_buffer;
pub mod runner;

pub use fan_out::FanOutWriter;
pub use launcher::{LaunchFuture, OutputWriter, ProcessLauncher, SystemLauncher};
pub use relay::{RelayHandle, relay, spawn_relay};
pub use ring_buffer::BoundedSink;
pub use runner::ProcessRunner;
