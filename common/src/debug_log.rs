//! Injected logging.
//!
//! There is no global logger. Components that report decode problems take a
//! `&mut dyn LogSink` (or `&mut impl LogSink`) argument instead. The stock
//! sink is [`DebugLog`], a ring buffer of the most recent lines that the
//! simulator shows on its debug page.
//!
//! # Usage
//!
//! ```ignore
//! let mut log = DebugLog::new();
//! log.log("unknown parameter: foo");
//! log_fmt(&mut log, format_args!("nav type {} unknown", 9));
//!
//! for line in log.iter() {
//!     println!("{}", line);
//! }
//! ```

use core::fmt::{self, Write};

use heapless::{Deque, String};

// =============================================================================
// Debug Log Configuration
// =============================================================================

/// Maximum number of log lines to keep in the ring buffer.
pub const LOG_BUFFER_SIZE: usize = 8;

/// Maximum characters per log line.
pub const LOG_LINE_LENGTH: usize = 64;

// =============================================================================
// Log Sink
// =============================================================================

/// Destination for diagnostic messages.
pub trait LogSink {
    fn log(
        &mut self,
        msg: &str,
    );
}

/// Format a message into a fixed line buffer and hand it to `sink`.
/// Lines longer than [`LOG_LINE_LENGTH`] are cut short.
pub fn log_fmt<S: LogSink + ?Sized>(
    sink: &mut S,
    args: fmt::Arguments<'_>,
) {
    let mut line: Truncating<LOG_LINE_LENGTH> = Truncating(String::new());
    line.write_fmt(args).ok();
    sink.log(&line.0);
}

/// `fmt::Write` adapter that keeps as much as fits instead of failing.
struct Truncating<const N: usize>(String<N>);

impl<const N: usize> Write for Truncating<N> {
    fn write_str(
        &mut self,
        s: &str,
    ) -> fmt::Result {
        for c in s.chars() {
            if self.0.push(c).is_err() {
                break;
            }
        }
        Ok(())
    }
}

/// Sink that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLog;

impl LogSink for NullLog {
    fn log(
        &mut self,
        _msg: &str,
    ) {
    }
}

// =============================================================================
// Debug Log Ring Buffer
// =============================================================================

/// Ring buffer for debug log messages.
///
/// Stores the last `LOG_BUFFER_SIZE` messages. Old messages are dropped when
/// the buffer is full. `total` keeps counting past the buffer size.
pub struct DebugLog {
    buffer: Deque<String<LOG_LINE_LENGTH>, LOG_BUFFER_SIZE>,
    total: u32,
}

impl DebugLog {
    /// Create a new empty debug log.
    pub const fn new() -> Self { Self { buffer: Deque::new(), total: 0 } }

    /// Push a log message. If buffer is full, oldest message is dropped.
    pub fn push(
        &mut self,
        msg: &str,
    ) {
        if self.buffer.is_full() {
            self.buffer.pop_front();
        }

        let mut line: String<LOG_LINE_LENGTH> = String::new();
        for c in msg.chars() {
            if line.push(c).is_err() {
                break;
            }
        }

        self.buffer.push_back(line).ok();
        self.total = self.total.saturating_add(1);
    }

    /// Iterate over log messages (oldest first).
    pub fn iter(&self) -> impl Iterator<Item = &str> { self.buffer.iter().map(heapless::string::StringInner::as_str) }

    /// Most recent message, if any.
    pub fn last(&self) -> Option<&str> { self.buffer.back().map(heapless::string::StringInner::as_str) }

    /// Number of buffered entries.
    #[inline]
    pub const fn len(&self) -> usize { self.buffer.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.buffer.is_empty() }

    /// Messages pushed since creation, including dropped ones.
    #[inline]
    pub const fn total(&self) -> u32 { self.total }
}

impl Default for DebugLog {
    fn default() -> Self { Self::new() }
}

impl LogSink for DebugLog {
    fn log(
        &mut self,
        msg: &str,
    ) {
        self.push(msg);
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Push a u32 value to a heapless string (no format! macro).
pub fn push_u32<const N: usize>(
    s: &mut String<N>,
    mut val: u32,
) {
    if val == 0 {
        s.push('0').ok();
        return;
    }

    let mut digits = [0u8; 10];
    let mut i = 0;
    while val > 0 {
        digits[i] = (val % 10) as u8;
        val /= 10;
        i += 1;
    }

    while i > 0 {
        i -= 1;
        s.push((b'0' + digits[i]) as char).ok();
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_log_push() {
        let mut log = DebugLog::new();
        assert!(log.is_empty());

        log.push("Test message");
        assert_eq!(log.len(), 1);
        assert_eq!(log.last(), Some("Test message"));
    }

    #[test]
    fn test_debug_log_ring_buffer() {
        let mut log = DebugLog::new();

        for i in 0..LOG_BUFFER_SIZE {
            let mut msg: String<16> = String::new();
            push_u32(&mut msg, i as u32);
            log.push(&msg);
        }
        assert_eq!(log.len(), LOG_BUFFER_SIZE);

        log.push("New");
        assert_eq!(log.len(), LOG_BUFFER_SIZE);
        assert_eq!(log.total(), LOG_BUFFER_SIZE as u32 + 1);

        let first = log.iter().next();
        assert_eq!(first, Some("1"));
        assert_eq!(log.last(), Some("New"));
    }

    #[test]
    fn test_debug_log_truncation() {
        let mut log = DebugLog::new();
        let long = "x".repeat(LOG_LINE_LENGTH * 2);
        log.push(&long);
        assert_eq!(log.last().map(str::len), Some(LOG_LINE_LENGTH));
    }

    #[test]
    fn test_log_fmt_through_trait_object() {
        let mut log = DebugLog::new();
        {
            let sink: &mut dyn LogSink = &mut log;
            log_fmt(sink, format_args!("nav type {} unknown", 9));
        }
        assert_eq!(log.last(), Some("nav type 9 unknown"));
    }

    #[test]
    fn test_log_fmt_truncates() {
        let mut log = DebugLog::new();
        log_fmt(&mut log, format_args!("{}", "y".repeat(200)));
        assert_eq!(log.last().map(str::len), Some(LOG_LINE_LENGTH));
    }

    #[test]
    fn test_null_log() {
        let mut sink = NullLog;
        sink.log("dropped");
    }

    #[test]
    fn test_push_u32() {
        let mut s: String<16> = String::new();
        push_u32(&mut s, 0);
        assert_eq!(s.as_str(), "0");

        let mut s: String<16> = String::new();
        push_u32(&mut s, 12345);
        assert_eq!(s.as_str(), "12345");

        let mut s: String<16> = String::new();
        push_u32(&mut s, u32::MAX);
        assert_eq!(s.as_str(), "4294967295");
    }
}
