use std::sync::{Arc, Mutex};

use makefile_provisioner::types::OutputSink;

/// An output sink that records every emitted line, in order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    lines: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    /// Lines emitted by the build tool, i.e. without the `Executing:` banner.
    pub fn tool_lines(&self) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|l| !l.starts_with("Executing: "))
            .collect()
    }
}

impl OutputSink for RecordingSink {
    fn emit(&self, line: &str) {
        self.lines.lock().unwrap().push(line.to_string());
    }
}
