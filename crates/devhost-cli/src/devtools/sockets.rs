//! Websocket broadcast channels for the message and events sockets.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::routing::{MethodRouter, get};
use devhost::{BroadcastParams, EventSink, MessageSocket, ReporterEvent};
use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, trace};

/// Version field of every message-socket frame.
pub const MESSAGE_PROTOCOL_VERSION: u32 = 2;

const CHANNEL_CAPACITY: usize = 256;

/// Fan-out of text frames to every connected websocket client.
///
/// Clients see frames published after they connect. A client that falls
/// more than the channel capacity behind skips the frames it missed.
#[derive(Debug, Clone)]
pub struct Broadcaster {
    tx: broadcast::Sender<String>,
}

impl Default for Broadcaster {
    fn default() -> Self {
        Self::new()
    }
}

impl Broadcaster {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Publish a frame; returns how many clients it was queued for.
    pub fn publish(&self, frame: String) -> usize {
        self.tx.send(frame).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.tx.subscribe()
    }

    /// Upgrade handler that streams this channel to the client.
    pub fn route(&self) -> MethodRouter {
        let channel = self.clone();
        get(move |ws: WebSocketUpgrade| {
            let frames = channel.subscribe();
            async move { ws.on_upgrade(move |socket| forward(socket, frames)) }
        })
    }
}

async fn forward(socket: WebSocket, mut frames: broadcast::Receiver<String>) {
    let (mut sender, mut receiver) = socket.split();
    debug!("Websocket client connected");

    loop {
        tokio::select! {
            frame = frames.recv() => match frame {
                Ok(text) => {
                    if sender.send(Message::Text(text.into())).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    debug!(skipped, "Websocket client fell behind");
                }
                Err(RecvError::Closed) => break,
            },
            incoming = receiver.next() => match incoming {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }

    debug!("Websocket client disconnected");
}

/// Message socket: `{"version":2,"method":..,"params":..}` frames.
#[derive(Debug, Clone)]
pub struct MessageSocketServer {
    channel: Broadcaster,
}

impl MessageSocketServer {
    pub fn new(channel: Broadcaster) -> Self {
        Self { channel }
    }

    pub fn frame(method: &str, params: Option<BroadcastParams>) -> Value {
        let mut frame = json!({
            "version": MESSAGE_PROTOCOL_VERSION,
            "method": method,
        });
        if let Some(params) = params {
            frame["params"] = Value::Object(params);
        }
        frame
    }
}

impl MessageSocket for MessageSocketServer {
    fn broadcast(&self, method: &str, params: Option<BroadcastParams>) {
        let delivered = self.channel.publish(Self::frame(method, params).to_string());
        trace!(method, delivered, "Broadcast message");
    }
}

/// Events socket: `{"type":"report_event","data":..}` frames.
#[derive(Debug, Clone)]
pub struct EventsSocketServer {
    channel: Broadcaster,
}

impl EventsSocketServer {
    pub fn new(channel: Broadcaster) -> Self {
        Self { channel }
    }

    pub fn frame(event: &ReporterEvent) -> Value {
        json!({ "type": "report_event", "data": event })
    }
}

impl EventSink for EventsSocketServer {
    fn report_event(&self, event: &ReporterEvent) {
        self.channel.publish(Self::frame(event).to_string());
    }
}
