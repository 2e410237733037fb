// ABOUTME: Sink routing for inbound log records.
// ABOUTME: Decodes the level convention once and dispatches to injected sinks.

use std::io::Write;
use std::sync::atomic::{AtomicI32, Ordering};

use tailstream_proto::LogRecord;

/// Level value marking a record as a raw stderr echo. Any other negative
/// level is a raw stdout echo. This encoding is part of the wire contract.
pub const STDERR_ECHO_LEVEL: i32 = -2;

/// Where the raw-echo half of a record goes, decoded once from the numeric
/// level at the dispatch boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Raw echo to the error stream.
    Stderr,
    /// Raw echo to standard output.
    Stdout,
    /// No raw echo; structured logging only.
    Structured,
}

impl Route {
    /// Decode the routing convention for a record level.
    pub fn for_level(level: i32) -> Route {
        match level {
            STDERR_ECHO_LEVEL => Route::Stderr,
            l if l < 0 => Route::Stdout,
            _ => Route::Structured,
        }
    }
}

/// Destinations for dispatched records.
///
/// Injected at controller construction so hosts can substitute their own
/// logger and capture streams without subclassing anything.
pub trait RecordSinks: Send + Sync {
    /// Forward a record to the structured logger, numeric level as-is.
    /// The implementation decides how to treat negative or out-of-range
    /// levels.
    fn log(&self, level: i32, msg: &str);

    /// Update the structured logger's threshold.
    fn set_level(&self, level: i32);

    /// Write a raw stdout echo verbatim, no added newline.
    fn write_stdout(&self, msg: &str);

    /// Write a raw stderr echo verbatim, no added newline.
    fn write_stderr(&self, msg: &str);
}

/// Dispatch one inbound record.
///
/// Raw echoes are delivered twice: once verbatim to the process stream and
/// once to the structured logger.
pub fn dispatch(record: &LogRecord, sinks: &dyn RecordSinks) {
    match Route::for_level(record.level) {
        Route::Stderr => sinks.write_stderr(&record.msg),
        Route::Stdout => sinks.write_stdout(&record.msg),
        Route::Structured => {}
    }
    sinks.log(record.level, &record.msg);
}

/// Default sinks: `tracing` for structured records, the real process
/// streams for raw echoes.
///
/// Structured records are emitted under the `tailstream::remote` target so
/// they stay distinguishable from the client's own diagnostics and cannot
/// feed back through whatever subscriber the host installs for them.
pub struct StdSinks {
    threshold: AtomicI32,
}

/// Numeric severity thresholds for mapping record levels onto tracing
/// levels. Matches the widely used 10/20/30/40 convention on the wire.
const ERROR_LEVEL: i32 = 40;
const WARN_LEVEL: i32 = 30;
const INFO_LEVEL: i32 = 20;
const DEBUG_LEVEL: i32 = 10;

const REMOTE_TARGET: &str = "tailstream::remote";

impl StdSinks {
    /// Sinks with the threshold at zero: all structured records pass, raw
    /// echo levels (negative) are suppressed from the structured side,
    /// matching how a stock logger treats sub-zero severities.
    pub fn new() -> Self {
        Self {
            threshold: AtomicI32::new(0),
        }
    }
}

impl Default for StdSinks {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordSinks for StdSinks {
    fn log(&self, level: i32, msg: &str) {
        if level < self.threshold.load(Ordering::Relaxed) {
            return;
        }
        // tracing callsites carry a static level, so the numeric severity
        // picks a branch here and rides along as a field.
        if level >= ERROR_LEVEL {
            tracing::error!(target: REMOTE_TARGET, level, "{}", msg);
        } else if level >= WARN_LEVEL {
            tracing::warn!(target: REMOTE_TARGET, level, "{}", msg);
        } else if level >= INFO_LEVEL {
            tracing::info!(target: REMOTE_TARGET, level, "{}", msg);
        } else if level >= DEBUG_LEVEL {
            tracing::debug!(target: REMOTE_TARGET, level, "{}", msg);
        } else {
            tracing::trace!(target: REMOTE_TARGET, level, "{}", msg);
        }
    }

    fn set_level(&self, level: i32) {
        self.threshold.store(level, Ordering::Relaxed);
    }

    fn write_stdout(&self, msg: &str) {
        let mut out = std::io::stdout();
        let _ = out.write_all(msg.as_bytes());
        let _ = out.flush();
    }

    fn write_stderr(&self, msg: &str) {
        let mut err = std::io::stderr();
        let _ = err.write_all(msg.as_bytes());
        let _ = err.flush();
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{RecordingSinks, SinkCall};
    use super::*;

    fn record(level: i32, msg: &str) -> LogRecord {
        LogRecord {
            level,
            msg: msg.to_string(),
        }
    }

    #[test]
    fn test_route_decoding() {
        assert_eq!(Route::for_level(-2), Route::Stderr);
        assert_eq!(Route::for_level(-1), Route::Stdout);
        assert_eq!(Route::for_level(-10), Route::Stdout);
        assert_eq!(Route::for_level(0), Route::Structured);
        assert_eq!(Route::for_level(20), Route::Structured);
    }

    #[test]
    fn test_negative_level_is_delivered_twice() {
        let sinks = RecordingSinks::default();
        dispatch(&record(-1, "m"), &sinks);
        assert_eq!(
            sinks.calls(),
            vec![
                SinkCall::Stdout("m".to_string()),
                SinkCall::Log(-1, "m".to_string()),
            ]
        );
    }

    #[test]
    fn test_stderr_sentinel_routes_to_error_stream() {
        let sinks = RecordingSinks::default();
        dispatch(&record(STDERR_ECHO_LEVEL, "e"), &sinks);
        assert_eq!(
            sinks.calls(),
            vec![
                SinkCall::Stderr("e".to_string()),
                SinkCall::Log(-2, "e".to_string()),
            ]
        );
    }

    #[test]
    fn test_non_negative_level_is_structured_only() {
        let sinks = RecordingSinks::default();
        dispatch(&record(20, "x"), &sinks);
        assert_eq!(sinks.calls(), vec![SinkCall::Log(20, "x".to_string())]);
    }

    #[test]
    fn test_message_content_is_untouched() {
        let sinks = RecordingSinks::default();
        dispatch(&record(-1, "line with trailing newline\n"), &sinks);
        assert_eq!(
            sinks.calls()[0],
            SinkCall::Stdout("line with trailing newline\n".to_string())
        );
    }

    #[test]
    fn test_std_sinks_threshold_updates() {
        let sinks = StdSinks::new();
        assert_eq!(sinks.threshold.load(Ordering::Relaxed), 0);
        sinks.set_level(30);
        assert_eq!(sinks.threshold.load(Ordering::Relaxed), 30);
    }
}
