// src/exec/fan_out.rs

//! Writer that duplicates every chunk into a capture window and a live feed.

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::io::AsyncWrite;
use tracing::debug;

use crate::exec::ring_buffer::BoundedSink;

/// Fan-out destination for a child's combined output.
///
/// Every accepted chunk is copied into the [`BoundedSink`] and into the
/// feed (the write half of the relay pipe). The two destinations share no
/// state. If the feed goes away, output keeps being captured.
#[derive(Debug)]
pub struct FanOutWriter<W> {
    capture: BoundedSink,
    feed: Option<W>,
}

impl<W> FanOutWriter<W> {
    pub fn new(capture: BoundedSink, feed: W) -> Self {
        Self {
            capture,
            feed: Some(feed),
        }
    }

    pub fn capture(&self) -> &BoundedSink {
        &self.capture
    }

    /// Split back into the capture window and the feed (if still open).
    ///
    /// Dropping the returned feed closes the relay pipe.
    pub fn into_parts(self) -> (BoundedSink, Option<W>) {
        (self.capture, self.feed)
    }
}

impl<W: AsyncWrite + Unpin> AsyncWrite for FanOutWriter<W> {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let this = self.get_mut();

        let Some(feed) = this.feed.as_mut() else {
            return Poll::Ready(Ok(this.capture.write(buf)));
        };

        match Pin::new(feed).poll_write(cx, buf) {
            Poll::Ready(Ok(n)) => {
                // Only capture what the feed accepted; the caller retries the rest.
                this.capture.write(&buf[..n]);
                Poll::Ready(Ok(n))
            }
            Poll::Ready(Err(e)) => {
                debug!(error = %e, "output feed closed; capturing only");
                this.feed = None;
                Poll::Ready(Ok(this.capture.write(buf)))
            }
            Poll::Pending => Poll::Pending,
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut().feed.as_mut() {
            Some(feed) => Pin::new(feed).poll_flush(cx),
            None => Poll::Ready(Ok(())),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut().feed.as_mut() {
            Some(feed) => Pin::new(feed).poll_shutdown(cx),
            None => Poll::Ready(Ok(())),
        }
    }
}
