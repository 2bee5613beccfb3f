// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WebSocket connection to the relay.
//!
//! The relay identifies a client by the `username` query parameter of the
//! socket URL. Each text message on the socket carries exactly one encoded
//! [`Frame`](parley_core::Frame). The stream is split so the inbound
//! pipeline can wait in `receive` while the outbound pipeline sends.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use reqwest::Url;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::{self, Message as WsMessage};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, warn};

use parley_config::model::RelayConfig;
use parley_core::{
    AdapterType, HealthStatus, Identifier, ParleyError, PluginAdapter, RelayConnection,
    RelayConnector,
};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Opens WebSocket connections to the relay's socket endpoint.
#[derive(Debug, Clone)]
pub struct WsRelayConnector {
    endpoint: Url,
    connect_timeout: Duration,
}

impl WsRelayConnector {
    pub fn new(config: &RelayConfig) -> Result<Self, ParleyError> {
        let mut endpoint = Url::parse(&config.url)
            .map_err(|e| ParleyError::Config(format!("invalid relay url `{}`: {e}", config.url)))?;
        endpoint.set_path(&config.socket_path);
        Ok(Self {
            endpoint,
            connect_timeout: config.connect_timeout(),
        })
    }

    /// Socket URL for `username`, with the name percent-encoded.
    pub fn socket_url(&self, username: &Identifier) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .clear()
            .append_pair("username", username.as_str());
        url
    }
}

#[async_trait]
impl PluginAdapter for WsRelayConnector {
    fn name(&self) -> &str {
        "websocket"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Relay
    }

    async fn health_check(&self) -> Result<HealthStatus, ParleyError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), ParleyError> {
        Ok(())
    }
}

#[async_trait]
impl RelayConnector for WsRelayConnector {
    async fn open(&self, username: &Identifier) -> Result<Arc<dyn RelayConnection>, ParleyError> {
        let url = self.socket_url(username);
        info!(user = %username, endpoint = %self.endpoint, "connecting to relay");

        let (stream, _response) = match timeout(self.connect_timeout, connect_async(url.as_str())).await {
            Ok(Ok(ok)) => ok,
            Ok(Err(e)) => return Err(ParleyError::connection_with("relay handshake failed", e)),
            Err(elapsed) => {
                warn!(user = %username, timeout = ?self.connect_timeout, "relay handshake timed out");
                return Err(ParleyError::connection_with(
                    format!("relay handshake timed out after {:?}", self.connect_timeout),
                    elapsed,
                ));
            }
        };

        info!(user = %username, "relay connected");
        Ok(Arc::new(WsRelayConnection::new(stream)))
    }
}

/// One open relay socket.
pub struct WsRelayConnection {
    sink: Mutex<SplitSink<WsStream, WsMessage>>,
    stream: Mutex<SplitStream<WsStream>>,
    closed: AtomicBool,
}

impl WsRelayConnection {
    fn new(stream: WsStream) -> Self {
        let (sink, stream) = stream.split();
        Self {
            sink: Mutex::new(sink),
            stream: Mutex::new(stream),
            closed: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl RelayConnection for WsRelayConnection {
    async fn send(&self, frame: &str) -> Result<(), ParleyError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(ParleyError::connection("relay connection is closed"));
        }
        self.sink
            .lock()
            .await
            .send(WsMessage::text(frame.to_owned()))
            .await
            .map_err(|e| ParleyError::connection_with("relay send failed", e))
    }

    async fn receive(&self) -> Result<Option<String>, ParleyError> {
        let mut stream = self.stream.lock().await;
        loop {
            match stream.next().await {
                None => return Ok(None),
                Some(Ok(WsMessage::Text(text))) => return Ok(Some(text.as_str().to_owned())),
                Some(Ok(WsMessage::Binary(data))) => match String::from_utf8(data.to_vec()) {
                    Ok(text) => return Ok(Some(text)),
                    Err(e) => warn!(error = %e, "dropping non-UTF-8 binary message from relay"),
                },
                Some(Ok(WsMessage::Close(frame))) => {
                    debug!(?frame, "relay closed the connection");
                    return Ok(None);
                }
                // Control frames; tungstenite answers pings itself.
                Some(Ok(_)) => {}
                Some(Err(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed)) => {
                    return Ok(None);
                }
                Some(Err(e)) => return Err(ParleyError::connection_with("relay receive failed", e)),
            }
        }
    }

    async fn close(&self) -> Result<(), ParleyError> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        match self.sink.lock().await.close().await {
            Ok(()) => {}
            Err(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed) => {}
            Err(e) => return Err(ParleyError::connection_with("relay close failed", e)),
        }
        debug!("relay connection closed");
        Ok(())
    }
}
