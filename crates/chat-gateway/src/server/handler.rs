//! WebSocket handler
//!
//! One task per socket direction plus a heartbeat watchdog. Everything that
//! touches shared chat state goes through the coordinator.

use crate::connection::{Connection, ConnectionId, Outbound};
use crate::coordinator::Command;
use crate::handlers::{ConnectionContext, MessageDispatcher};
use crate::protocol::{CloseCode, GatewayMessage, HelloPayload};
use crate::server::GatewayState;
use axum::{
    extract::{
        ws::{CloseFrame, Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::interval;

/// How long a closing socket gets to flush its close frame
const CLOSE_GRACE: Duration = Duration::from_secs(1);

/// Floor for the watchdog tick so a zero interval cannot spin
const MIN_WATCHDOG_TICK: Duration = Duration::from_millis(10);

/// WebSocket gateway handler
pub async fn gateway_handler(
    State(state): State<GatewayState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(state, socket))
}

/// Which task ended the connection
enum Ended {
    Receive(Option<CloseCode>),
    Send,
    Heartbeat,
}

/// Handle an upgraded WebSocket connection
async fn handle_socket(state: GatewayState, socket: WebSocket) {
    let connection_id = ConnectionId::generate();
    let config = state.config().clone();

    let (tx, mut rx) = mpsc::channel::<Outbound>(config.outbound_buffer);
    let connection = Connection::new(connection_id.clone(), tx);

    if state
        .coordinator()
        .send(Command::Connect {
            connection: connection.clone(),
        })
        .await
        .is_err()
    {
        tracing::error!(connection_id = %connection_id, "Coordinator unavailable, refusing socket");
        return;
    }

    tracing::info!(connection_id = %connection_id, "WebSocket connection established");

    let (mut ws_sink, mut ws_stream) = socket.split();

    let hello = GatewayMessage::hello(HelloPayload::with_interval(config.heartbeat_interval_ms));
    let hello_sent = match hello.to_json() {
        Ok(json) => ws_sink.send(Message::Text(json)).await.is_ok(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode Hello");
            false
        }
    };
    if !hello_sent {
        tracing::warn!(connection_id = %connection_id, "Failed to send Hello message");
        disconnect(&state, &connection_id).await;
        return;
    }

    // Receive: decode frames and dispatch them in arrival order
    let state_recv = state.clone();
    let mut ctx = ConnectionContext::new(connection.clone());
    let mut recv_task = tokio::spawn(async move {
        while let Some(frame) = ws_stream.next().await {
            match frame {
                Ok(Message::Text(text)) => {
                    if let Some(code) = handle_text_message(&state_recv, &mut ctx, &text).await {
                        return Some(code);
                    }
                }
                Ok(Message::Binary(_)) => {
                    tracing::debug!(connection_id = %ctx.id(), "Binary frames not supported");
                    return Some(CloseCode::DecodeError);
                }
                Ok(Message::Ping(_) | Message::Pong(_)) => {
                    tracing::trace!(connection_id = %ctx.id(), "Ping/pong");
                }
                Ok(Message::Close(_)) => {
                    tracing::info!(connection_id = %ctx.id(), "Client closed connection");
                    return None;
                }
                Err(e) => {
                    tracing::debug!(connection_id = %ctx.id(), error = %e, "WebSocket error");
                    return None;
                }
            }
        }
        None
    });

    // Send: drain the outbound queue into the socket
    let connection_id_send = connection_id.clone();
    let mut send_task = tokio::spawn(async move {
        while let Some(outbound) = rx.recv().await {
            match outbound {
                Outbound::Message(message) => {
                    let json = match message.to_json() {
                        Ok(json) => json,
                        Err(e) => {
                            tracing::error!(error = %e, "Failed to encode outbound message");
                            continue;
                        }
                    };
                    if ws_sink.send(Message::Text(json)).await.is_err() {
                        tracing::debug!(
                            connection_id = %connection_id_send,
                            "Failed to write to WebSocket"
                        );
                        return;
                    }
                }
                Outbound::Close(code) => {
                    let frame = CloseFrame {
                        code: code.as_u16(),
                        reason: code.description().into(),
                    };
                    let _ = ws_sink.send(Message::Close(Some(frame))).await;
                    return;
                }
            }
        }
        let _ = ws_sink.close().await;
    });

    // Heartbeat watchdog
    let connection_hb = connection.clone();
    let timeout = config.heartbeat_timeout();
    let tick = (config.heartbeat_interval() / 2).max(MIN_WATCHDOG_TICK);
    let mut heartbeat_task = tokio::spawn(async move {
        let mut check = interval(tick);
        loop {
            check.tick().await;
            let silent_for = connection_hb.time_since_heartbeat();
            if silent_for > timeout {
                tracing::info!(
                    connection_id = %connection_hb.id(),
                    silent_ms = silent_for.as_millis(),
                    "Connection timed out (no heartbeat)"
                );
                return;
            }
        }
    });

    let ended = tokio::select! {
        result = &mut recv_task => match result {
            Ok(code) => Ended::Receive(code),
            Err(e) => {
                tracing::error!(connection_id = %connection_id, error = %e, "Receive task failed");
                Ended::Receive(Some(CloseCode::UnknownError))
            }
        },
        _ = &mut send_task => Ended::Send,
        _ = &mut heartbeat_task => Ended::Heartbeat,
    };

    let close_code = match ended {
        Ended::Receive(code) => code,
        Ended::Heartbeat => Some(CloseCode::SessionTimeout),
        Ended::Send => None,
    };

    disconnect(&state, &connection_id).await;
    recv_task.abort();
    heartbeat_task.abort();

    if !matches!(ended, Ended::Send) {
        match close_code {
            Some(code) => {
                tracing::debug!(connection_id = %connection_id, close_code = %code, "Closing socket");
                connection.close(code);
                if tokio::time::timeout(CLOSE_GRACE, &mut send_task).await.is_err() {
                    send_task.abort();
                }
            }
            None => send_task.abort(),
        }
    }

    tracing::info!(connection_id = %connection_id, "WebSocket connection closed");
}

/// Decode and dispatch one text frame; `Some` means the socket must close
async fn handle_text_message(
    state: &GatewayState,
    ctx: &mut ConnectionContext,
    text: &str,
) -> Option<CloseCode> {
    let message = match GatewayMessage::decode(text) {
        Ok(message) => message,
        Err(code) => {
            tracing::debug!(connection_id = %ctx.id(), close_code = %code, "Undecodable frame");
            return Some(code);
        }
    };

    tracing::trace!(connection_id = %ctx.id(), op = %message.op, "Received message");

    match MessageDispatcher::dispatch(state, ctx, message).await {
        Ok(code) => code,
        Err(e) => {
            if let Some(code) = e.to_close_code() {
                tracing::error!(connection_id = %ctx.id(), error = %e, "Fatal handler error");
                return Some(code);
            }
            tracing::debug!(connection_id = %ctx.id(), error = %e, "Handler error");
            let (event, data) = e.to_event();
            ctx.connection.dispatch(event, data);
            None
        }
    }
}

/// Tear the connection out of the coordinator's state
async fn disconnect(state: &GatewayState, connection_id: &ConnectionId) {
    let command = Command::Disconnect {
        connection_id: connection_id.clone(),
    };
    if state.coordinator().send(command).await.is_err() {
        tracing::warn!(connection_id = %connection_id, "Coordinator gone during disconnect");
    }
}
