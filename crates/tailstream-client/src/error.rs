// ABOUTME: Error types for the tailstream-client crate.
// ABOUTME: Structured errors for channel setup and controller lifecycle.

use thiserror::Error;

/// Errors that can occur in the log stream client.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Invalid server address format.
    #[error("invalid server address: {0}")]
    InvalidAddress(String),

    /// Failed to connect to the server.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// A metadata key or value cannot be carried on a gRPC request.
    #[error("invalid metadata entry '{0}'")]
    InvalidMetadata(String),

    /// The stream worker panicked instead of returning an outcome.
    #[error("stream worker panicked: {0}")]
    WorkerPanicked(String),
}

impl From<tonic::transport::Error> for ClientError {
    fn from(err: tonic::transport::Error) -> Self {
        ClientError::ConnectionFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ClientError::InvalidAddress("not a url".to_string());
        assert_eq!(err.to_string(), "invalid server address: not a url");

        let err = ClientError::InvalidMetadata("bad\nkey".to_string());
        assert!(err.to_string().contains("invalid metadata entry"));

        let err = ClientError::WorkerPanicked("oops".to_string());
        assert!(err.to_string().contains("panicked"));
    }

    #[tokio::test]
    async fn test_from_tonic_transport_error() {
        use tonic::transport::Endpoint;

        let endpoint = Endpoint::from_static("http://[::1]:1");
        let result = endpoint.connect().await;

        if let Err(transport_err) = result {
            let err: ClientError = transport_err.into();
            assert!(matches!(err, ClientError::ConnectionFailed(_)));
        }
    }
}
