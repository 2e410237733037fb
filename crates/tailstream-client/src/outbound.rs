// ABOUTME: Outbound half of the log stream: request queue and stream adapter.
// ABOUTME: Turns queued settings requests into the gRPC outbound sequence.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::mpsc;

use tailstream_proto::LogSettingsRequest;

/// One item on the outbound request queue.
///
/// `Shutdown` is the sentinel: it is enqueued at most once, always last,
/// and is never transmitted. Observing it closes the outbound half of the
/// stream.
#[derive(Debug)]
pub enum ControlRequest {
    /// A settings request to transmit to the server.
    Settings(LogSettingsRequest),
    /// End of outbound stream; drain everything queued before it, then stop.
    Shutdown,
}

/// Stream adapter over the request queue, passed to the gRPC call as the
/// outbound message sequence.
///
/// Yields queued requests in FIFO order. Once the shutdown sentinel is
/// observed the adapter is fused: it reports end-of-stream forever, even if
/// stray items are enqueued afterwards.
pub struct OutboundRequests {
    requests: mpsc::UnboundedReceiver<ControlRequest>,
    done: bool,
}

impl OutboundRequests {
    /// Wrap the consumer half of the request queue.
    pub fn new(requests: mpsc::UnboundedReceiver<ControlRequest>) -> Self {
        Self {
            requests,
            done: false,
        }
    }
}

impl Stream for OutboundRequests {
    type Item = LogSettingsRequest;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.done {
            return Poll::Ready(None);
        }
        match this.requests.poll_recv(cx) {
            Poll::Ready(Some(ControlRequest::Settings(request))) => Poll::Ready(Some(request)),
            Poll::Ready(Some(ControlRequest::Shutdown)) | Poll::Ready(None) => {
                this.done = true;
                this.requests.close();
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}
