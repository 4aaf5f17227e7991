//! Process-wide log of git invocations.
//!
//! One record per invocation, oldest lines dropped once the configured cap
//! is exceeded. The host renders `to_text()` into a read-only display
//! buffer.

use std::collections::VecDeque;
use std::sync::Mutex;

pub const DEFAULT_MAX_LINES: usize = 5000;

pub struct ProcessLog {
    inner: Mutex<Inner>,
}

struct Inner {
    lines: VecDeque<String>,
    max_lines: usize,
}

impl ProcessLog {
    pub fn new(max_lines: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                lines: VecDeque::new(),
                max_lines,
            }),
        }
    }

    /// Append one record followed by a blank separator line, trimming the
    /// oldest lines back to the cap.
    pub fn append_record(&self, record: &str) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        for line in record.lines() {
            inner.lines.push_back(line.to_string());
        }
        inner.lines.push_back(String::new());
        while inner.lines.len() > inner.max_lines {
            inner.lines.pop_front();
        }
    }

    pub fn line_count(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .lines
            .len()
    }

    pub fn to_text(&self) -> String {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let mut out = String::new();
        for line in &inner.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}

impl Default for ProcessLog {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LINES)
    }
}
