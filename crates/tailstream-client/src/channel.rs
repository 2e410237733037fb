// ABOUTME: gRPC channel construction for the log streaming endpoint.
// ABOUTME: Keep-alive, TLS, and timeout configuration for long-lived streams.

use std::time::Duration;
use tonic::transport::{Channel, ClientTlsConfig, Endpoint};

use crate::error::ClientError;

/// HTTP/2 keep-alive settings for the stream channel.
#[derive(Debug, Clone)]
pub struct KeepAliveConfig {
    /// Ping interval while the connection is idle.
    pub interval: Duration,
    /// How long to wait for a ping response before declaring the peer dead.
    pub timeout: Duration,
    /// Ping even when no stream is active.
    pub while_idle: bool,
}

impl Default for KeepAliveConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            timeout: Duration::from_secs(20),
            while_idle: true,
        }
    }
}

/// Configuration for the channel carrying the log stream.
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// Server address to connect to (e.g., "http://localhost:50051").
    pub address: String,
    /// Keep-alive settings. If None, keep-alive pings are disabled.
    pub keep_alive: Option<KeepAliveConfig>,
    /// Connection timeout.
    pub connect_timeout: Option<Duration>,
    /// Enable TLS for the connection.
    pub use_tls: bool,
}

impl ChannelConfig {
    /// Create a channel config with default settings.
    /// TLS is auto-detected from the URL scheme (https:// enables it).
    pub fn new(address: impl Into<String>) -> Self {
        let address = address.into().trim().to_string();
        let use_tls = address.to_lowercase().starts_with("https://");
        Self {
            address,
            keep_alive: Some(KeepAliveConfig::default()),
            connect_timeout: Some(Duration::from_secs(30)),
            use_tls,
        }
    }

    /// Disable keep-alive pings.
    pub fn without_keep_alive(mut self) -> Self {
        self.keep_alive = None;
        self
    }

    /// Set custom keep-alive configuration.
    pub fn with_keep_alive(mut self, config: KeepAliveConfig) -> Self {
        self.keep_alive = Some(config);
        self
    }

    /// Set connection timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }
}

/// Create a gRPC channel with the specified configuration.
///
/// The log stream stays open for the life of the process, so keep-alive is
/// on by default: idle periods must not look like a dead peer to load
/// balancers sitting between client and server.
pub async fn create_channel(config: &ChannelConfig) -> Result<Channel, ClientError> {
    let mut endpoint = Endpoint::from_shared(config.address.clone())
        .map_err(|e| ClientError::InvalidAddress(e.to_string()))?;

    if config.use_tls {
        endpoint = endpoint
            .tls_config(ClientTlsConfig::new())
            .map_err(|e| ClientError::ConnectionFailed(format!("TLS config error: {}", e)))?;
    }

    if let Some(ka) = &config.keep_alive {
        endpoint = endpoint
            .http2_keep_alive_interval(ka.interval)
            .keep_alive_timeout(ka.timeout)
            .keep_alive_while_idle(ka.while_idle);
    }

    if let Some(timeout) = config.connect_timeout {
        endpoint = endpoint.connect_timeout(timeout);
    }

    let channel = endpoint.connect().await?;

    tracing::debug!(
        address = %config.address,
        keep_alive = config.keep_alive.is_some(),
        "log stream channel connected"
    );

    Ok(channel)
}
