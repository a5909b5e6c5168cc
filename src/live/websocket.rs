use std::{sync::mpsc as std_mpsc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use tokio::{
    net::TcpStream,
    runtime::Handle,
    sync::{mpsc, watch},
};
use tokio_tungstenite::{
    connect_async,
    tungstenite::{client::IntoClientRequest, Message},
    MaybeTlsStream, WebSocketStream,
};

use crate::live::{
    backoff::ReconnectPolicy,
    transport::{EventSink, TransportError, TransportEvent, TransportLink, UpdateTransport},
};

const LIVE_WEBSOCKET_WORKER_STARTED: &str = "LIVE_WEBSOCKET_WORKER_STARTED";
const LIVE_WEBSOCKET_WORKER_STOPPED: &str = "LIVE_WEBSOCKET_WORKER_STOPPED";
const LIVE_WEBSOCKET_SHUTDOWN_SLOW: &str = "LIVE_WEBSOCKET_SHUTDOWN_SLOW";

/// How long `close` waits for queued frames and the close frame to go out.
const CLOSE_GRACE: Duration = Duration::from_millis(500);

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// WebSocket transport running each link as a task on a tokio runtime.
#[derive(Debug, Clone)]
pub struct WebSocketTransport {
    runtime: Handle,
    policy: ReconnectPolicy,
}

impl WebSocketTransport {
    pub fn new(runtime: Handle, policy: ReconnectPolicy) -> Self {
        Self { runtime, policy }
    }
}

impl UpdateTransport for WebSocketTransport {
    fn open(
        &self,
        endpoint: &str,
        sink: EventSink,
    ) -> Result<Box<dyn TransportLink>, TransportError> {
        endpoint
            .into_client_request()
            .map_err(|error| TransportError::InvalidEndpoint {
                endpoint: endpoint.to_owned(),
                details: error.to_string(),
            })?;

        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (stop_tx, stop_rx) = watch::channel(false);
        let (done_tx, done_rx) = std_mpsc::channel();

        let worker = ConnectionWorker {
            endpoint: endpoint.to_owned(),
            policy: self.policy,
            sink: sink.clone(),
            outbound_rx,
            stop_rx,
        };

        self.runtime.spawn(async move {
            tracing::debug!(
                code = LIVE_WEBSOCKET_WORKER_STARTED,
                "live websocket worker started"
            );
            let initiated_locally = worker.run().await;
            sink(TransportEvent::Closed { initiated_locally });
            tracing::debug!(
                code = LIVE_WEBSOCKET_WORKER_STOPPED,
                initiated_locally,
                "live websocket worker stopped"
            );
            let _ = done_tx.send(());
        });

        Ok(Box::new(WebSocketLink {
            outbound_tx,
            stop_tx: Some(stop_tx),
            done_rx,
        }))
    }
}

struct WebSocketLink {
    outbound_tx: mpsc::UnboundedSender<String>,
    stop_tx: Option<watch::Sender<bool>>,
    done_rx: std_mpsc::Receiver<()>,
}

impl TransportLink for WebSocketLink {
    fn send_text(&self, payload: &str) -> Result<(), TransportError> {
        self.outbound_tx
            .send(payload.to_owned())
            .map_err(|_| TransportError::LinkClosed)
    }

    fn close(&mut self) {
        let Some(stop_tx) = self.stop_tx.take() else {
            return;
        };

        // The worker drops its stop receiver once it is done; nothing to wait for then.
        if stop_tx.send(true).is_err() {
            return;
        }

        if self.done_rx.recv_timeout(CLOSE_GRACE).is_err() {
            tracing::warn!(
                code = LIVE_WEBSOCKET_SHUTDOWN_SLOW,
                grace_ms = CLOSE_GRACE.as_millis() as u64,
                "live websocket worker did not finish within the close grace period"
            );
        }
    }
}

impl Drop for WebSocketLink {
    fn drop(&mut self) {
        self.close();
    }
}

enum PumpExit {
    Stopped,
    PeerClosed,
    Failed(String),
}

struct ConnectionWorker {
    endpoint: String,
    policy: ReconnectPolicy,
    sink: EventSink,
    outbound_rx: mpsc::UnboundedReceiver<String>,
    stop_rx: watch::Receiver<bool>,
}

impl ConnectionWorker {
    /// Runs until stopped or out of reconnect attempts. Returns whether the
    /// local side asked for the shutdown.
    async fn run(mut self) -> bool {
        let mut attempt = 0u32;

        loop {
            let connected = tokio::select! {
                _ = wait_for_stop(&mut self.stop_rx) => return true,
                result = connect_async(self.endpoint.as_str()) => result,
            };

            match connected {
                Ok((stream, _response)) => {
                    attempt = 0;
                    self.discard_stale_outbound();
                    (self.sink)(TransportEvent::Opened);

                    match self.pump(stream).await {
                        PumpExit::Stopped => return true,
                        PumpExit::PeerClosed => {
                            tracing::info!(
                                endpoint = %self.endpoint,
                                "live websocket closed by server"
                            );
                        }
                        PumpExit::Failed(details) => (self.sink)(TransportEvent::Error(details)),
                    }
                }
                Err(error) => (self.sink)(TransportEvent::Error(error.to_string())),
            }

            attempt = attempt.saturating_add(1);
            let Some(delay) = self.policy.delay_for(attempt) else {
                return false;
            };

            (self.sink)(TransportEvent::Reconnecting { attempt, delay });
            tokio::select! {
                _ = wait_for_stop(&mut self.stop_rx) => return true,
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }

    async fn pump(&mut self, stream: WsStream) -> PumpExit {
        let (mut write, mut read) = stream.split();

        loop {
            tokio::select! {
                _ = wait_for_stop(&mut self.stop_rx) => {
                    while let Ok(payload) = self.outbound_rx.try_recv() {
                        if write.send(Message::Text(payload)).await.is_err() {
                            break;
                        }
                    }
                    let _ = write.send(Message::Close(None)).await;
                    return PumpExit::Stopped;
                }
                outbound = self.outbound_rx.recv() => {
                    let Some(payload) = outbound else {
                        let _ = write.send(Message::Close(None)).await;
                        return PumpExit::Stopped;
                    };
                    if let Err(error) = write.send(Message::Text(payload)).await {
                        return PumpExit::Failed(error.to_string());
                    }
                }
                inbound = read.next() => match inbound {
                    Some(Ok(Message::Text(text))) => (self.sink)(TransportEvent::Message(text)),
                    Some(Ok(Message::Close(_))) | None => return PumpExit::PeerClosed,
                    Some(Ok(other)) => {
                        tracing::trace!(kind = frame_kind(&other), "ignoring non-text frame");
                    }
                    Some(Err(error)) => return PumpExit::Failed(error.to_string()),
                },
            }
        }
    }

    /// Frames handed over while no connection was up are not buffered.
    fn discard_stale_outbound(&mut self) {
        let mut discarded = 0usize;
        while self.outbound_rx.try_recv().is_ok() {
            discarded += 1;
        }

        if discarded > 0 {
            tracing::debug!(discarded, "discarded frames queued while the link was down");
        }
    }
}

/// Resolves once the link asks to stop or is dropped.
async fn wait_for_stop(stop_rx: &mut watch::Receiver<bool>) {
    loop {
        if *stop_rx.borrow_and_update() {
            return;
        }

        if stop_rx.changed().await.is_err() {
            return;
        }
    }
}

fn frame_kind(message: &Message) -> &'static str {
    match message {
        Message::Text(_) => "text",
        Message::Binary(_) => "binary",
        Message::Ping(_) => "ping",
        Message::Pong(_) => "pong",
        Message::Close(_) => "close",
        Message::Frame(_) => "frame",
    }
}
