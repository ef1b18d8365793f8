// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Socket abstraction for the heartbeat channel.
//!
//! The connectivity monitor consumes a socket as two halves:
//! - a [`SocketSender`] used to write ping frames
//! - a [`SocketReceiver`] yielding lifecycle events and incoming frames
//!
//! [`WebSocketTransport`] provides both halves over tokio-tungstenite. Tests
//! substitute channel-backed mocks.

use std::future::Future;
use std::pin::Pin;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

/// Error type for transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Connection failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Connection closed unexpectedly.
    #[error("connection closed")]
    ConnectionClosed,

    /// Send failed.
    #[error("send failed: {0}")]
    SendFailed(String),
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Something that happened on the socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocketEvent {
    /// The socket finished its handshake and is usable.
    Open,
    /// A text frame arrived.
    Message(String),
    /// The socket closed, cleanly or because the peer went away.
    Close,
    /// The socket reported an error.
    Error(String),
}

/// Write half of a socket.
pub trait SocketSender: Send {
    /// Send a text frame.
    fn send_text(
        &mut self,
        text: String,
    ) -> Pin<Box<dyn Future<Output = TransportResult<()>> + Send + '_>>;
}

/// Read half of a socket.
pub trait SocketReceiver: Send {
    /// Wait for the next event.
    ///
    /// Returns `None` once the socket is gone and no further events will arrive.
    fn next_event(&mut self) -> Pin<Box<dyn Future<Output = Option<SocketEvent>> + Send + '_>>;
}

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// WebSocket transport implementation using tokio-tungstenite.
pub struct WebSocketTransport;

impl WebSocketTransport {
    /// Connect to `url` and split the socket into its two halves.
    ///
    /// The receiver's first event is always [`SocketEvent::Open`].
    pub async fn connect(url: &str) -> TransportResult<(WebSocketSender, WebSocketReceiver)> {
        let (ws_stream, _) = tokio_tungstenite::connect_async(url)
            .await
            .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;

        let (sink, stream) = ws_stream.split();
        Ok((
            WebSocketSender { sink: Some(sink) },
            WebSocketReceiver {
                stream,
                announced_open: false,
                closed: false,
            },
        ))
    }
}

/// Write half of a tungstenite socket.
pub struct WebSocketSender {
    sink: Option<SplitSink<WsStream, Message>>,
}

impl SocketSender for WebSocketSender {
    fn send_text(
        &mut self,
        text: String,
    ) -> Pin<Box<dyn Future<Output = TransportResult<()>> + Send + '_>> {
        Box::pin(async move {
            let sink = self.sink.as_mut().ok_or(TransportError::ConnectionClosed)?;

            if let Err(e) = sink.send(Message::Text(text.into())).await {
                // Connection is broken, clear it
                self.sink = None;
                return Err(TransportError::SendFailed(e.to_string()));
            }

            Ok(())
        })
    }
}

/// Read half of a tungstenite socket.
pub struct WebSocketReceiver {
    stream: SplitStream<WsStream>,
    announced_open: bool,
    closed: bool,
}

impl SocketReceiver for WebSocketReceiver {
    fn next_event(&mut self) -> Pin<Box<dyn Future<Output = Option<SocketEvent>> + Send + '_>> {
        Box::pin(async move {
            if !self.announced_open {
                self.announced_open = true;
                return Some(SocketEvent::Open);
            }
            if self.closed {
                return None;
            }

            loop {
                match self.stream.next().await {
                    Some(Ok(Message::Text(text))) => {
                        return Some(SocketEvent::Message(text.as_str().to_owned()));
                    }
                    Some(Ok(Message::Close(_))) => {
                        self.closed = true;
                        return Some(SocketEvent::Close);
                    }
                    Some(Ok(_)) => {
                        // Binary and protocol-level ping/pong frames are not ours
                        continue;
                    }
                    Some(Err(e)) => {
                        self.closed = true;
                        return Some(SocketEvent::Error(e.to_string()));
                    }
                    None => {
                        self.closed = true;
                        return Some(SocketEvent::Close);
                    }
                }
            }
        })
    }
}
