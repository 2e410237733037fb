// ABOUTME: Terminal classification of a failed log stream.
// ABOUTME: Maps the transport status onto shutdown, disconnect, or fatal.

use tonic::{Code, Status};

/// How one stream lifetime ended. Produced exactly once per worker.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamOutcome {
    /// The server closed the inbound half normally.
    Completed,
    /// Graceful shutdown; we cancelled our own connection.
    Cancelled,
    /// The server dropped the connection. No retry is attempted.
    Disconnected,
    /// The stream died with an unexpected status.
    Failed {
        /// The transport status code.
        code: Code,
        /// The status detail, verbatim.
        message: String,
    },
}

/// Classify a stream failure and emit the matching operator-facing note.
///
/// Cancellation and server disconnects are routine and logged at info;
/// anything else is unexpected and logged at error with full detail.
pub fn classify(status: &Status) -> StreamOutcome {
    match status.code() {
        Code::Cancelled => {
            tracing::info!("cancelling logs channel");
            StreamOutcome::Cancelled
        }
        Code::Unavailable | Code::ResourceExhausted => {
            tracing::info!(code = ?status.code(), "server disconnected from logs channel");
            StreamOutcome::Disconnected
        }
        code => {
            tracing::error!(
                ?code,
                message = status.message(),
                "error on logs channel, shutting down"
            );
            StreamOutcome::Failed {
                code,
                message: status.message().to_string(),
            }
        }
    }
}
