//! Push channel transport
//!
//! The listener is written against these traits so its reconnect and
//! dispatch behavior can be exercised without a live backend. The
//! production transport is a WebSocket client.

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use geobeacon_common::{Error, Result};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, trace};

/// Opens a fresh push channel for each connection attempt
#[async_trait]
pub trait PushConnector: Send + Sync {
    type Channel: PushChannel;

    async fn connect(&self) -> Result<Self::Channel>;
}

/// One live push channel
///
/// `recv` returns `Ok(Some(text))` for an inbound text message, `Ok(None)`
/// on clean closure, and `Err` on a transport fault. Closing the channel
/// must unblock a pending `recv` with a closure, not leave it hanging.
#[async_trait]
pub trait PushChannel: Send {
    async fn recv(&mut self) -> Result<Option<String>>;

    async fn close(&mut self);
}

/// WebSocket connector for the configured push endpoint
pub struct WsConnector {
    push_url: String,
}

impl WsConnector {
    pub fn new(push_url: String) -> Self {
        Self { push_url }
    }
}

#[async_trait]
impl PushConnector for WsConnector {
    type Channel = WsChannel;

    async fn connect(&self) -> Result<WsChannel> {
        let (stream, response) = connect_async(self.push_url.as_str())
            .await
            .map_err(|e| Error::Channel(format!("connect to {} failed: {}", self.push_url, e)))?;

        debug!(status = %response.status(), "push channel handshake complete");
        Ok(WsChannel { stream })
    }
}

/// A live WebSocket push channel
pub struct WsChannel {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[async_trait]
impl PushChannel for WsChannel {
    async fn recv(&mut self) -> Result<Option<String>> {
        loop {
            match self.stream.next().await {
                Some(Ok(Message::Text(text))) => return Ok(Some(text)),
                Some(Ok(Message::Ping(payload))) => {
                    // Answer keepalives ourselves; a pending read never flushes
                    self.stream
                        .send(Message::Pong(payload))
                        .await
                        .map_err(|e| Error::Channel(e.to_string()))?;
                }
                Some(Ok(Message::Close(frame))) => {
                    trace!(?frame, "close frame received");
                    return Ok(None);
                }
                Some(Ok(other)) => trace!(?other, "ignoring non-text frame"),
                Some(Err(e)) => return Err(Error::Channel(e.to_string())),
                None => return Ok(None),
            }
        }
    }

    async fn close(&mut self) {
        if let Err(e) = self.stream.close(None).await {
            trace!("error closing push channel: {}", e);
        }
    }
}
