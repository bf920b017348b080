//! Live-channel upgrade handler.

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::http::HeaderMap;
use axum::http::header::ORIGIN;
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use tracing::{debug, info, warn};

use socialhub_core::error::AppError;

use crate::state::AppState;

/// Connection-time parameters.
#[derive(Debug, Default, serde::Deserialize)]
pub struct WsQuery {
    /// Claimed user id. Missing or placeholder values leave the connection
    /// unregistered.
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

/// GET /ws?userId={id}
pub async fn ws_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    ws: WebSocketUpgrade,
    Query(query): Query<WsQuery>,
) -> Result<Response, AppError> {
    // Browsers always send Origin; non-browser clients may omit it.
    if let Some(origin) = headers.get(ORIGIN) {
        let origin = origin
            .to_str()
            .map_err(|_| AppError::forbidden("Malformed Origin header"))?;
        if !state.config.server.cors.is_origin_allowed(origin) {
            warn!(origin = %origin, "Live connection from disallowed origin");
            return Err(AppError::forbidden("Origin not allowed"));
        }
    }

    Ok(ws.on_upgrade(move |socket| handle_ws_connection(state, query.user_id, socket)))
}

/// Drives one established connection until either side goes away.
async fn handle_ws_connection(state: AppState, user_id: Option<String>, socket: WebSocket) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let mut shutdown = state.realtime.shutdown_receiver();

    let (session, mut outbound_rx) = state.realtime.connections.open(user_id.as_deref()).await;
    let conn_id = session.handle.id;

    info!(
        conn_id = %conn_id,
        identity = ?session.identity,
        "Live connection established"
    );

    let outbound_task = tokio::spawn(async move {
        while let Some(frame) = outbound_rx.recv().await {
            let text = frame.as_str().to_owned();
            if ws_tx.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
        let _ = ws_tx.close().await;
    });

    loop {
        tokio::select! {
            incoming = ws_rx.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    state.realtime.connections.handle_inbound(&session, text.as_str());
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    debug!(conn_id = %conn_id, error = %e, "Live connection error");
                    break;
                }
            },
            _ = shutdown.recv() => {
                debug!(conn_id = %conn_id, "Closing live connection for shutdown");
                break;
            }
        }
    }

    outbound_task.abort();
    state.realtime.connections.close(&session);

    info!(conn_id = %conn_id, "Live connection closed");
}
