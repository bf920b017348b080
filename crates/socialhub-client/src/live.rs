//! Live-channel subscriber.

use futures::{SinkExt, StreamExt};
use reqwest::Url;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info};

use socialhub_realtime::message::{InboundMessage, OutboundMessage};

use crate::error::{ClientError, ClientResult};
use crate::state::SharedState;

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Build the `/ws?userId=..` URL from the server root.
pub fn ws_url(base_url: &Url, user_id: &str) -> ClientResult<Url> {
    let mut url = base_url.clone();
    let scheme = match url.scheme() {
        "https" | "wss" => "wss",
        _ => "ws",
    };
    url.set_scheme(scheme)
        .map_err(|_| ClientError::InvalidUrl(base_url.to_string()))?;
    url.set_path("/ws");
    url.query_pairs_mut().clear().append_pair("userId", user_id);
    Ok(url)
}

/// An open live channel for one user.
pub struct LiveSubscriber {
    socket: Socket,
}

impl std::fmt::Debug for LiveSubscriber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveSubscriber").finish_non_exhaustive()
    }
}

impl LiveSubscriber {
    /// Open the channel, identifying as `user_id`. `base_url` is the server
    /// root, e.g. `http://localhost:8000`.
    pub async fn connect(base_url: &str, user_id: &str) -> ClientResult<Self> {
        let base = Url::parse(base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{base_url}: {e}")))?;
        let url = ws_url(&base, user_id)?;
        let (socket, _) = connect_async(url.as_str()).await?;
        info!(user_id = %user_id, "Live channel connected");
        Ok(Self { socket })
    }

    /// Next server event, or `None` once the server closed the channel.
    /// Frames that do not parse are skipped.
    pub async fn next_event(&mut self) -> ClientResult<Option<OutboundMessage>> {
        while let Some(frame) = self.socket.next().await {
            match frame? {
                Message::Text(text) => match serde_json::from_str(text.as_str()) {
                    Ok(event) => return Ok(Some(event)),
                    Err(e) => debug!(error = %e, "Skipping unrecognized frame"),
                },
                Message::Close(_) => return Ok(None),
                _ => {}
            }
        }
        Ok(None)
    }

    /// Application-level keepalive; answered with a `pong` event.
    pub async fn ping(&mut self) -> ClientResult<()> {
        let body = serde_json::to_string(&InboundMessage::Ping)?;
        self.socket.send(Message::text(body)).await?;
        Ok(())
    }

    /// Feed every event into `state` until the channel closes.
    pub async fn run(mut self, state: SharedState) -> ClientResult<()> {
        while let Some(event) = self.next_event().await? {
            state.lock().await.apply(event);
        }
        info!("Live channel closed by server");
        Ok(())
    }

    pub async fn close(mut self) -> ClientResult<()> {
        self.socket.close(None).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ws_url_from_http_root() {
        let base = Url::parse("http://localhost:8000").unwrap();
        assert_eq!(
            ws_url(&base, "u1").unwrap().as_str(),
            "ws://localhost:8000/ws?userId=u1"
        );
    }

    #[test]
    fn test_ws_url_from_https_root() {
        let base = Url::parse("https://social.example/").unwrap();
        assert_eq!(
            ws_url(&base, "a b").unwrap().as_str(),
            "wss://social.example/ws?userId=a+b"
        );
    }
}
