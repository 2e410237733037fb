// ABOUTME: Lifecycle controller and background worker for the log stream.
// ABOUTME: Owns the bidirectional Logstream call from connect to close.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tonic::metadata::{AsciiMetadataKey, AsciiMetadataValue, MetadataMap};
use tonic::transport::Channel;
use tonic::Request;

use tailstream_proto::client::LogStreamerClient;
use tailstream_proto::LogSettingsRequest;

use crate::classify::{classify, StreamOutcome};
use crate::error::ClientError;
use crate::outbound::{ControlRequest, OutboundRequests};
use crate::sink::{dispatch, RecordSinks, StdSinks};

/// Client-side controller for the log stream.
///
/// Spawns one background worker that owns the entire lifetime of the
/// bidirectional call: it transmits queued settings requests on the
/// outbound half and dispatches every inbound record to the sinks. Callers
/// never block on network I/O; `set_level` and `disable_logs` only enqueue.
///
/// The worker is terminal: stream failures are classified and traced inside
/// it, never propagated to caller tasks. `close` consumes the controller,
/// so a second close or a use-after-close does not compile.
pub struct LogStreamClient {
    requests: mpsc::UnboundedSender<ControlRequest>,
    sinks: Arc<dyn RecordSinks>,
    worker: JoinHandle<StreamOutcome>,
}

impl LogStreamClient {
    /// Open the log stream over an established channel and start the
    /// worker. Records go to the default sinks: `tracing` for structured
    /// records, the process streams for raw echoes.
    ///
    /// `metadata` is attached to the streaming call as ASCII key-value
    /// pairs; invalid pairs are rejected here, before the worker starts.
    pub fn connect(
        channel: Channel,
        metadata: Vec<(String, String)>,
    ) -> Result<Self, ClientError> {
        Self::with_sinks(channel, metadata, Arc::new(StdSinks::new()))
    }

    /// Like [`connect`](Self::connect), with caller-supplied sinks.
    pub fn with_sinks(
        channel: Channel,
        metadata: Vec<(String, String)>,
        sinks: Arc<dyn RecordSinks>,
    ) -> Result<Self, ClientError> {
        let metadata = build_metadata(&metadata)?;
        let (requests, queue) = mpsc::unbounded_channel();
        let worker = tokio::spawn(run_stream(channel, metadata, queue, sinks.clone()));
        Ok(Self {
            requests,
            sinks,
            worker,
        })
    }

    /// Set the streaming verbosity: updates the local sink threshold and
    /// asks the server to forward records at `level` and above.
    /// Non-blocking, callable from any task.
    pub fn set_level(&self, level: i32) {
        self.sinks.set_level(level);
        self.enqueue(LogSettingsRequest {
            enabled: true,
            loglevel: level,
        });
    }

    /// Ask the server to stop forwarding records. Non-blocking.
    pub fn disable_logs(&self) {
        self.enqueue(LogSettingsRequest {
            enabled: false,
            loglevel: 0,
        });
    }

    fn enqueue(&self, request: LogSettingsRequest) {
        if self
            .requests
            .send(ControlRequest::Settings(request))
            .is_err()
        {
            tracing::debug!("stream worker already exited, dropping settings request");
        }
    }

    /// Shut down: close the outbound half once everything queued so far has
    /// been transmitted, then wait for the worker to finish and return how
    /// the stream ended. The wait is bounded by the server closing its half
    /// after it sees end-of-stream.
    pub async fn close(self) -> Result<StreamOutcome, ClientError> {
        // The send only fails if the worker is already gone, in which case
        // the join below returns immediately.
        let _ = self.requests.send(ControlRequest::Shutdown);
        self.worker
            .await
            .map_err(|e| ClientError::WorkerPanicked(e.to_string()))
    }
}

fn build_metadata(pairs: &[(String, String)]) -> Result<MetadataMap, ClientError> {
    let mut map = MetadataMap::new();
    for (key, value) in pairs {
        let key: AsciiMetadataKey = key
            .parse()
            .map_err(|_| ClientError::InvalidMetadata(key.clone()))?;
        let value: AsciiMetadataValue = value
            .parse()
            .map_err(|_| ClientError::InvalidMetadata(format!("{}: {}", key, value)))?;
        map.insert(key, value);
    }
    Ok(map)
}

/// The worker: opens the stream, then drains the inbound half until it
/// ends, dispatching records in arrival order. Returns the terminal
/// outcome; failures are classified here, exactly once, and never thrown.
async fn run_stream(
    channel: Channel,
    metadata: MetadataMap,
    queue: mpsc::UnboundedReceiver<ControlRequest>,
    sinks: Arc<dyn RecordSinks>,
) -> StreamOutcome {
    let mut client = LogStreamerClient::new(channel);

    let mut request = Request::new(OutboundRequests::new(queue));
    *request.metadata_mut() = metadata;

    let mut inbound = match client.logstream(request).await {
        Ok(response) => response.into_inner(),
        Err(status) => return classify(&status),
    };

    loop {
        match inbound.message().await {
            Ok(Some(record)) => dispatch(&record, sinks.as_ref()),
            Ok(None) => {
                tracing::debug!("logs channel closed by server");
                return StreamOutcome::Completed;
            }
            Err(status) => return classify(&status),
        }
    }
}
