//! WebSocket gateway client for tests

use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio_tungstenite::{
    connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream,
};

/// How long to wait for any single frame
const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// A dispatched server event
#[derive(Debug, Clone)]
pub struct Dispatch {
    pub event: String,
    pub seq: Option<u64>,
    pub data: Value,
}

/// Thin client over the gateway envelope
pub struct GatewayClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    /// `heartbeat_interval` from Hello
    pub heartbeat_interval: u64,
}

impl GatewayClient {
    /// Connect and consume the Hello frame
    pub async fn connect(url: &str) -> Result<Self> {
        let (stream, _) = connect_async(url).await?;
        let mut client = Self {
            stream,
            heartbeat_interval: 0,
        };

        let hello = client.next_envelope().await?;
        if hello["op"] != 10 {
            bail!("expected Hello, got {hello}");
        }
        client.heartbeat_interval = hello["d"]["heartbeat_interval"]
            .as_u64()
            .context("Hello without heartbeat_interval")?;
        Ok(client)
    }

    /// Connect and authenticate, draining the join sequence
    pub async fn connect_authenticated(url: &str, token: &str) -> Result<Self> {
        let mut client = Self::connect(url).await?;
        client.emit("authenticate", json!({ "token": token })).await?;
        client.wait_for("online-users").await?;
        Ok(client)
    }

    /// Send a client event
    pub async fn emit(&mut self, event: &str, data: Value) -> Result<()> {
        self.send_raw(json!({ "op": 2, "t": event, "d": data }).to_string())
            .await
    }

    pub async fn heartbeat(&mut self, seq: Option<u64>) -> Result<()> {
        self.send_raw(json!({ "op": 1, "d": seq }).to_string()).await
    }

    pub async fn send_raw(&mut self, text: String) -> Result<()> {
        self.stream.send(Message::Text(text)).await?;
        Ok(())
    }

    pub async fn send_binary(&mut self, bytes: Vec<u8>) -> Result<()> {
        self.stream.send(Message::Binary(bytes)).await?;
        Ok(())
    }

    /// Next decoded envelope of any op
    pub async fn next_envelope(&mut self) -> Result<Value> {
        loop {
            let frame = tokio::time::timeout(RECV_TIMEOUT, self.stream.next())
                .await
                .map_err(|_| anyhow!("timed out waiting for a frame"))?
                .ok_or_else(|| anyhow!("gateway stream ended"))??;

            match frame {
                Message::Text(text) => return Ok(serde_json::from_str(&text)?),
                Message::Close(frame) => bail!("connection closed: {frame:?}"),
                _ => {}
            }
        }
    }

    /// Next dispatched event, in order
    pub async fn next_dispatch(&mut self) -> Result<Dispatch> {
        loop {
            let envelope = self.next_envelope().await?;
            if envelope["op"] == 0 {
                return Ok(Dispatch {
                    event: envelope["t"].as_str().unwrap_or_default().to_string(),
                    seq: envelope["s"].as_u64(),
                    data: envelope["d"].clone(),
                });
            }
        }
    }

    /// Skip events until `event` arrives
    pub async fn wait_for(&mut self, event: &str) -> Result<Dispatch> {
        loop {
            let dispatch = self.next_dispatch().await?;
            if dispatch.event == event {
                return Ok(dispatch);
            }
        }
    }

    /// Skip events until `event` arrives with data matching `accept`
    pub async fn wait_for_match(
        &mut self,
        event: &str,
        accept: impl Fn(&Value) -> bool,
    ) -> Result<Dispatch> {
        loop {
            let dispatch = self.wait_for(event).await?;
            if accept(&dispatch.data) {
                return Ok(dispatch);
            }
        }
    }

    /// Collect every event up to and including the first `event` matching `accept`
    pub async fn collect_until(
        &mut self,
        event: &str,
        accept: impl Fn(&Value) -> bool,
    ) -> Result<Vec<Dispatch>> {
        let mut seen = Vec::new();
        loop {
            let dispatch = self.next_dispatch().await?;
            let done = dispatch.event == event && accept(&dispatch.data);
            seen.push(dispatch);
            if done {
                return Ok(seen);
            }
        }
    }

    /// Wait for the server to close the socket and return its close code
    pub async fn expect_close(&mut self) -> Result<u16> {
        loop {
            let frame = tokio::time::timeout(RECV_TIMEOUT, self.stream.next())
                .await
                .map_err(|_| anyhow!("timed out waiting for close"))?;

            match frame {
                Some(Ok(Message::Close(Some(frame)))) => return Ok(frame.code.into()),
                Some(Ok(Message::Close(None))) => bail!("closed without a code"),
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => bail!("stream ended without a close frame"),
            }
        }
    }

    /// Close from the client side
    pub async fn close(mut self) -> Result<()> {
        self.stream.close(None).await?;
        Ok(())
    }
}
