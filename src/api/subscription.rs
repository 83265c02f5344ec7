//! Live subscription over the `graphql-ws` socket protocol

use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::header::SEC_WEBSOCKET_PROTOCOL;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, trace, warn};

pub const GRAPHQL_WS_PROTOCOL: &str = "graphql-ws";

/// Socket errors
#[derive(Debug, Error)]
pub enum SocketError {
    #[error("Invalid socket request: {0}")]
    InvalidRequest(String),
    #[error("Failed to connect: {0}")]
    Connect(String),
    #[error("Failed to send frame: {0}")]
    Send(String),
    #[error("Socket error: {0}")]
    Receive(String),
}

/// Connection state, numbered like a browser WebSocket's `readyState`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    Connecting = 0,
    Open = 1,
    Closing = 2,
    Closed = 3,
}

/// What the socket driver reports to its owner
#[derive(Debug, Clone, PartialEq)]
pub enum SocketEvent {
    ReadyState(ReadyState),
    Message(String),
}

/// The `start` control message for a subscription operation
pub fn start_message(id: &str, operation_name: &str, query: &str) -> String {
    json!({
        "id": id,
        "type": "start",
        "payload": {
            "variables": {},
            "extensions": {},
            "operationName": operation_name,
            "query": query,
        }
    })
    .to_string()
}

fn connection_init() -> String {
    json!({ "type": "connection_init", "payload": {} }).to_string()
}

/// Log protocol-level frames; data frames are left to the consumer
fn log_control_frame(text: &str) {
    let kind = serde_json::from_str::<Value>(text)
        .ok()
        .and_then(|v| v.get("type").and_then(|t| t.as_str()).map(str::to_string));

    match kind.as_deref() {
        Some("ka") => trace!("keep-alive"),
        Some("connection_ack") => debug!("Subscription connection acknowledged"),
        Some("error") | Some("connection_error") => warn!("Subscription error frame: {}", text),
        Some("complete") => info!("Subscription completed by server"),
        _ => {}
    }
}

/// Drives one socket connection; never reconnects
pub struct SubscriptionClient {
    url: String,
}

impl SubscriptionClient {
    pub fn new(url: String) -> Self {
        Self { url }
    }

    /// Connect, relay `outbound` text frames to the server and every inbound
    /// text frame to `events`. Always ends by reporting `Closed`.
    pub async fn run(
        &self,
        events: mpsc::UnboundedSender<SocketEvent>,
        mut outbound: mpsc::UnboundedReceiver<String>,
    ) -> Result<(), SocketError> {
        let _ = events.send(SocketEvent::ReadyState(ReadyState::Connecting));
        let result = self.drive(&events, &mut outbound).await;
        let _ = events.send(SocketEvent::ReadyState(ReadyState::Closed));
        result
    }

    async fn drive(
        &self,
        events: &mpsc::UnboundedSender<SocketEvent>,
        outbound: &mut mpsc::UnboundedReceiver<String>,
    ) -> Result<(), SocketError> {
        let mut request = self
            .url
            .as_str()
            .into_client_request()
            .map_err(|e| SocketError::InvalidRequest(e.to_string()))?;
        request
            .headers_mut()
            .insert(SEC_WEBSOCKET_PROTOCOL, HeaderValue::from_static(GRAPHQL_WS_PROTOCOL));

        debug!("Connecting to {}", self.url);
        let (ws_stream, _) = connect_async(request)
            .await
            .map_err(|e| SocketError::Connect(e.to_string()))?;

        let (mut ws_sender, mut ws_receiver) = ws_stream.split();

        ws_sender
            .send(Message::Text(connection_init()))
            .await
            .map_err(|e| SocketError::Send(e.to_string()))?;

        info!("🔌 Live feed socket open: {}", self.url);
        if events.send(SocketEvent::ReadyState(ReadyState::Open)).is_err() {
            return Ok(());
        }

        loop {
            tokio::select! {
                incoming = ws_receiver.next() => match incoming {
                    Some(Ok(Message::Text(text))) => {
                        log_control_frame(&text);
                        if events.send(SocketEvent::Message(text)).is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(frame))) => {
                        info!("Live feed socket closed by server: {:?}", frame);
                        break;
                    }
                    // Ping/pong are answered by tungstenite; binary frames are not part of the protocol
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(SocketError::Receive(e.to_string())),
                    None => break,
                },
                out = outbound.recv() => match out {
                    Some(text) => {
                        ws_sender
                            .send(Message::Text(text))
                            .await
                            .map_err(|e| SocketError::Send(e.to_string()))?;
                    }
                    None => {
                        let _ = events.send(SocketEvent::ReadyState(ReadyState::Closing));
                        let _ = ws_sender.send(Message::Close(None)).await;
                        break;
                    }
                },
            }
        }

        Ok(())
    }
}
