// ABOUTME: Re-exports generated protobuf types for the tailstream protocol.
// ABOUTME: Single source of truth for the log streaming service and message types.

#![allow(clippy::derive_partial_eq_without_eq)]

/// Generated protobuf types for the tailstream protocol.
pub mod tailstream {
    tonic::include_proto!("tailstream");
}

// Re-export commonly used types at crate root for convenience
pub use tailstream::*;

// Re-export client types under a client module
pub mod client {
    pub use super::tailstream::log_streamer_client::LogStreamerClient;
}

// Re-export server types under a server module
pub mod server {
    pub use super::tailstream::log_streamer_server::{LogStreamer, LogStreamerServer};
}
