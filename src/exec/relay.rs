// src/exec/relay.rs

//! Line-oriented relay from a byte stream to an [`OutputSink`].

use std::borrow::Cow;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::types::OutputSink;

/// Forward every line read from `source` to `sink`, until end-of-stream.
///
/// Line terminators (`\n`, `\r\n`) are stripped; invalid UTF-8 is replaced.
/// A final line without a terminator is still forwarded. Returns the number
/// of lines forwarded.
pub async fn relay<R>(source: R, sink: &dyn OutputSink) -> usize
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(source);
    let mut buf = Vec::new();
    let mut lines = 0;

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                sink.emit(&line_text(&buf));
                lines += 1;
            }
            Err(e) => {
                warn!(error = %e, "reading relayed output failed");
                break;
            }
        }
    }

    lines
}

fn line_text(raw: &[u8]) -> Cow<'_, str> {
    let line = raw.strip_suffix(b"\n").unwrap_or(raw);
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    String::from_utf8_lossy(line)
}

/// Completion handle for a relay started with [`spawn_relay`].
#[derive(Debug)]
pub struct RelayHandle {
    done: oneshot::Receiver<usize>,
}

impl RelayHandle {
    /// Wait until the relay has drained its source.
    ///
    /// Resolves once the write end of the source has been closed and every
    /// buffered line has been forwarded. Returns the number of lines.
    pub async fn finished(self) -> usize {
        match self.done.await {
            Ok(lines) => lines,
            Err(_) => {
                warn!("output relay ended without signalling completion");
                0
            }
        }
    }
}

/// Run [`relay`] on a background Tokio task.
pub fn spawn_relay<R>(source: R, sink: Arc<dyn OutputSink>) -> RelayHandle
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let (done_tx, done_rx) = oneshot::channel();

    tokio::spawn(async move {
        let lines = relay(source, sink.as_ref()).await;
        debug!(lines, "output relay finished");
        let _ = done_tx.send(lines);
    });

    RelayHandle { done: done_rx }
}
