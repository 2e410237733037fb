// ABOUTME: Client-side controller for the tailstream log streaming service.
// ABOUTME: Forwards settings requests upstream, relays server records to local sinks.

pub mod channel;
pub mod classify;
pub mod client;
pub mod error;
pub mod outbound;
pub mod sink;

// Channel creation
pub use channel::{create_channel, ChannelConfig, KeepAliveConfig};

// Terminal stream classification
pub use classify::{classify, StreamOutcome};

// Lifecycle controller
pub use client::LogStreamClient;

// Error types
pub use error::ClientError;

// Outbound queue plumbing
pub use outbound::{ControlRequest, OutboundRequests};

// Record dispatch
pub use sink::{dispatch, RecordSinks, Route, StdSinks, STDERR_ECHO_LEVEL};

// Re-export proto types for convenience
pub use tailstream_proto;
