//! Line-level scanner for `alt=sse` response bodies.
//!
//! Gemini's streaming REST endpoint frames each chunk as a bare `data:` line
//! followed by a blank line; there are no `event:` names and no `[DONE]`
//! sentinel. HTTP chunk boundaries do not respect line boundaries, so the
//! scanner buffers partial lines between calls.

/// Incremental scanner that turns raw byte chunks into complete `data:`
/// payloads.
pub struct DataLineScanner {
    buffer: String,
}

impl Default for DataLineScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLineScanner {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
        }
    }

    /// Feed one chunk of the response body; returns the payload of every
    /// `data:` line the chunk completed, in order.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.push_str(&String::from_utf8_lossy(chunk));

        let mut payloads = Vec::new();
        while let Some(end) = self.buffer.find('\n') {
            let line = self.buffer[..end].trim_end_matches('\r').to_string();
            self.buffer.drain(..=end);
            if let Some(data) = line.strip_prefix("data: ") {
                payloads.push(data.to_string());
            }
        }
        payloads
    }
}
