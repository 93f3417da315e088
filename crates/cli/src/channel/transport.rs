// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Transport abstraction for push channels.
//!
//! Channels are receive-only: the backend pushes JSON text frames and the
//! client never writes. A transport is reused across reconnects; each
//! `connect` replaces the previous socket.

use std::future::Future;
use std::pin::Pin;

#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    #[error("receive failed: {0}")]
    ReceiveFailed(String),

    #[error("connection closed")]
    ConnectionClosed,
}

pub type ChannelResult<T> = Result<T, ChannelError>;

pub trait ChannelTransport: Send {
    fn connect(
        &mut self,
        url: &str,
    ) -> Pin<Box<dyn Future<Output = ChannelResult<()>> + Send + '_>>;

    /// Next text frame. `None` once the peer has closed the connection.
    fn recv(&mut self) -> Pin<Box<dyn Future<Output = ChannelResult<Option<String>>> + Send + '_>>;

    fn close(&mut self) -> Pin<Box<dyn Future<Output = ChannelResult<()>> + Send + '_>>;
}

type WsStream =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

/// Channel transport over tokio-tungstenite.
pub struct WebSocketTransport {
    ws: Option<WebSocketConnection>,
}

struct WebSocketConnection {
    sink: futures_util::stream::SplitSink<WsStream, tokio_tungstenite::tungstenite::Message>,
    stream: futures_util::stream::SplitStream<WsStream>,
}

impl WebSocketTransport {
    pub fn new() -> Self {
        WebSocketTransport { ws: None }
    }

    pub fn is_connected(&self) -> bool {
        self.ws.is_some()
    }
}

impl Default for WebSocketTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl ChannelTransport for WebSocketTransport {
    fn connect(
        &mut self,
        url: &str,
    ) -> Pin<Box<dyn Future<Output = ChannelResult<()>> + Send + '_>> {
        let url = url.to_string();
        Box::pin(async move {
            use futures_util::StreamExt;

            self.ws = None;
            let (ws_stream, _) = tokio_tungstenite::connect_async(&url)
                .await
                .map_err(|e| ChannelError::ConnectionFailed(e.to_string()))?;

            let (sink, stream) = ws_stream.split();
            self.ws = Some(WebSocketConnection { sink, stream });
            Ok(())
        })
    }

    fn recv(&mut self) -> Pin<Box<dyn Future<Output = ChannelResult<Option<String>>> + Send + '_>> {
        Box::pin(async move {
            use futures_util::StreamExt;
            use tokio_tungstenite::tungstenite::Message;

            let ws = self.ws.as_mut().ok_or(ChannelError::ConnectionClosed)?;

            loop {
                match ws.stream.next().await {
                    Some(Ok(Message::Text(text))) => return Ok(Some(text.to_string())),
                    Some(Ok(Message::Close(_))) | None => {
                        self.ws = None;
                        return Ok(None);
                    }
                    // Ping/pong are answered by tungstenite; binary frames are not part of the protocol
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => {
                        self.ws = None;
                        return Err(ChannelError::ReceiveFailed(e.to_string()));
                    }
                }
            }
        })
    }

    fn close(&mut self) -> Pin<Box<dyn Future<Output = ChannelResult<()>> + Send + '_>> {
        Box::pin(async move {
            if let Some(mut ws) = self.ws.take() {
                use futures_util::SinkExt;
                let _ = ws.sink.close().await;
            }
            Ok(())
        })
    }
}
