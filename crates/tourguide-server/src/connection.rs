//! Per-connection handler: hello, then questions until the socket closes.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;
use tokio_util::sync::CancellationToken;
use tourguide_common::SessionId;

use crate::app::App;
use crate::protocol::{ClientMessage, ServerMessage};
use crate::turn::handle_ask;

type WsStream = WebSocketStream<tokio::net::TcpStream>;

/// Handle a single WebSocket connection.
pub async fn handle_connection(ws: WsStream, addr: SocketAddr, app: Arc<App>) {
    let (mut sink, mut stream) = ws.split();

    // 1. Hello: optionally resume a previous session.
    let hello_timeout = Duration::from_secs(app.config.server.hello_timeout_secs.into());
    let requested = match read_hello(&mut stream, addr, hello_timeout).await {
        Some(requested) => requested,
        None => return,
    };
    let requested = requested.as_deref().and_then(SessionId::parse);
    let (session_id, state) = app.sessions.resume_or_create(requested.as_ref()).await;
    let resumed = requested.as_ref() == Some(&session_id);

    tracing::info!(peer = %addr, session = %session_id, resumed, "Client connected");

    // 2. Single writer task; turns and this loop send through the channel.
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let json = match serde_json::to_string(&msg) {
                Ok(json) => json,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to encode server message");
                    continue;
                }
            };
            if sink.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
        let _ = sink.close().await;
    });

    let _ = tx.send(ServerMessage::SessionReady {
        session_id: session_id.to_string(),
        resumed,
    });
    for warning in &app.warnings {
        let _ = tx.send(ServerMessage::Warning {
            message: warning.clone(),
        });
    }

    // 3. Read loop. Closing the socket cancels every in-flight turn.
    let cancel = CancellationToken::new();
    loop {
        match stream.next().await {
            Some(Ok(Message::Text(text))) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(ClientMessage::Ask { text }) => {
                    app.sessions.keep_alive(&session_id, &state).await;
                    tokio::spawn(handle_ask(
                        app.clone(),
                        state.clone(),
                        text,
                        tx.clone(),
                        cancel.child_token(),
                    ));
                }
                Ok(ClientMessage::Reset) => {
                    app.reset_session(&session_id, &state).await;
                    let _ = tx.send(ServerMessage::ResetDone);
                }
                Ok(ClientMessage::End) => {
                    app.sessions.destroy(&session_id).await;
                    break;
                }
                Ok(ClientMessage::Hello { .. }) => {
                    let _ = tx.send(ServerMessage::Error {
                        message: "session already started".into(),
                    });
                }
                Err(e) => {
                    tracing::debug!(peer = %addr, error = %e, "Invalid client message");
                    let _ = tx.send(ServerMessage::Error {
                        message: format!("invalid message: {e}"),
                    });
                }
            },
            // tungstenite queues pong replies itself.
            Some(Ok(Message::Close(_))) | None => break,
            Some(Ok(_)) => {}
            Some(Err(e)) => {
                tracing::debug!(peer = %addr, error = %e, "WS error");
                break;
            }
        }
    }

    // 4. Cleanup. The session itself stays until reaped so the widget can resume it.
    cancel.cancel();
    tracing::info!(peer = %addr, session = %session_id, "Client disconnected");
}

/// Read the hello frame. `Some(session_id)` on success, `None` to drop the
/// connection.
async fn read_hello(
    stream: &mut futures_util::stream::SplitStream<WsStream>,
    addr: SocketAddr,
    timeout: Duration,
) -> Option<Option<String>> {
    let frame = tokio::time::timeout(timeout, stream.next()).await;

    match frame {
        Ok(Some(Ok(Message::Text(text)))) => match serde_json::from_str::<ClientMessage>(&text) {
            Ok(ClientMessage::Hello { session_id }) => Some(session_id),
            Ok(other) => {
                tracing::warn!(peer = %addr, message = ?other, "Expected hello");
                None
            }
            Err(e) => {
                tracing::warn!(peer = %addr, error = %e, "Invalid hello message");
                None
            }
        },
        Ok(Some(Ok(_))) => {
            tracing::warn!(peer = %addr, "Expected text hello, got binary");
            None
        }
        Ok(Some(Err(e))) => {
            tracing::warn!(peer = %addr, error = %e, "WS error during hello");
            None
        }
        Ok(None) => {
            tracing::debug!(peer = %addr, "Connection closed before hello");
            None
        }
        Err(_) => {
            tracing::warn!(peer = %addr, ?timeout, "Hello timeout");
            None
        }
    }
}
