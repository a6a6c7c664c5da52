use colored::Colorize;
use core::fmt;
use std::io;

const DEFAULT_CAPACITY: usize = 64 * 1024;

/// Bounded sink for the guest diagnostic stream.
///
/// Keeps at most `capacity` bytes. Once the cap is hit the stream is cut at
/// the nearest character boundary and a visible truncation marker is shown,
/// so a log-spamming handler cannot flood a harness report.
#[derive(Debug)]
pub struct DiagnosticLog {
    buffer: String,
    capacity: usize,
    truncated: bool,
}

impl Default for DiagnosticLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl DiagnosticLog {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: String::new(),
            capacity,
            truncated: false,
        }
    }

    /// Appends a chunk, decoding it lossily and dropping whatever exceeds the
    /// remaining capacity.
    pub fn append(&mut self, chunk: &[u8]) {
        if self.truncated || chunk.is_empty() {
            return;
        }
        let chunk = String::from_utf8_lossy(chunk);
        let room = self.capacity - self.buffer.len();
        if chunk.len() <= room {
            self.buffer.push_str(&chunk);
            return;
        }
        self.buffer.push_str(truncate_to_char_boundary(&chunk, room));
        self.truncated = true;
    }

    #[must_use]
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// The captured stream, with the truncation marker when the cap was hit.
    #[must_use]
    pub fn into_report(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DiagnosticLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.buffer)?;
        if self.truncated {
            write!(f, "{}", "...[TRUNCATED]".red())?;
        }
        Ok(())
    }
}

impl io::Write for DiagnosticLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.append(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// cut `s` to at most `max` bytes without splitting a character
fn truncate_to_char_boundary(s: &str, mut max: usize) -> &str {
    while !s.is_char_boundary(max) {
        max -= 1;
    }
    &s[..max]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_streams_are_kept_whole() {
        let mut log = DiagnosticLog::with_capacity(15);
        log.append(b"hello world");
        assert!(!log.is_truncated());
        assert_eq!("hello world", log.into_report());
    }

    #[test]
    fn overflowing_streams_are_cut_with_a_marker() {
        let mut log = DiagnosticLog::with_capacity(10);
        log.append(b"hello world");
        log.append(b"never seen");
        assert!(log.is_truncated());

        let marker = "...[TRUNCATED]".red().to_string();
        assert_eq!(format!("hello worl{marker}"), log.into_report());
    }

    #[test]
    fn truncation_lands_on_a_char_boundary() {
        let mut log = DiagnosticLog::with_capacity(15);
        log.append("✌️✌️✌️".as_bytes()); // ✌️ is 6 bytes, ✌ is 3
        let marker = "...[TRUNCATED]".red().to_string();
        assert_eq!(format!("✌\u{fe0f}✌\u{fe0f}✌{marker}"), log.into_report());
    }

    #[test]
    fn chunks_accumulate_in_order() {
        let mut log = DiagnosticLog::with_capacity(64);
        log.append(b"hello ");
        log.append(b"world");
        assert_eq!("hello world", log.to_string());
    }
}
