// src/feed_push.rs
use crate::announcement::{Announcement, AnnouncementId};
use crate::errors::FeedError;
use crate::event::FeedMessage;
use crate::feed::FeedEvent;
use futures::StreamExt;
use log::{debug, error, info, warn};
use serde::Deserialize;
use tokio::net::TcpStream;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use url::Url;

/// Path of the push endpoint, relative to the portal base address.
const PUSH_PATH: &str = "/ws/announcements";

/// Derives the push-channel address from the HTTP base: the scheme flips to
/// its WebSocket counterpart and the feed path is appended.
pub fn push_url(base: &Url) -> Result<Url, FeedError> {
    let scheme = match base.scheme() {
        "https" => "wss",
        "http" => "ws",
        other => {
            return Err(FeedError::BadBaseUrl(format!("unsupported scheme '{other}'")));
        }
    };
    let mut url = base.clone();
    url.set_scheme(scheme).map_err(|_| FeedError::BadBaseUrl(base.to_string()))?;
    let path = format!("{}{}", base.path().trim_end_matches('/'), PUSH_PATH);
    url.set_path(&path);
    Ok(url)
}

// ===== wire envelope

#[derive(Debug, Deserialize)]
struct Envelope {
    event: String,
    data: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ArchivePayload {
    id: AnnouncementId,
}

/// Decodes one text frame. Fails closed: an unknown tag or a payload that
/// does not match the envelope is logged and dropped, never an error. A bad
/// frame must not take the subscription down.
pub fn decode_frame(frame: &str) -> Option<FeedEvent> {
    let envelope: Envelope = match serde_json::from_str(frame) {
        Ok(envelope) => envelope,
        Err(err) => {
            warn!("dropping unparseable push frame: {}", err);
            return None;
        }
    };

    match envelope.event.as_str() {
        "new_announcement" => match serde_json::from_value::<Announcement>(envelope.data) {
            Ok(announcement) => Some(FeedEvent::New(announcement)),
            Err(err) => {
                warn!("new_announcement frame with bad payload: {}", err);
                None
            }
        },
        "archive_announcement" => match serde_json::from_value::<ArchivePayload>(envelope.data) {
            Ok(payload) => Some(FeedEvent::Archive(payload.id)),
            Err(err) => {
                warn!("archive_announcement frame with bad payload: {}", err);
                None
            }
        },
        other => {
            debug!("ignoring push frame with unknown tag '{}'", other);
            None
        }
    }
}

// ===== subscription lifecycle

/// A live push subscription. Dropping it (or calling [`Subscription::close`])
/// tears the reader task down exactly once, whatever state the connection is
/// in at that moment.
pub struct Subscription {
    handle: Option<JoinHandle<()>>,
}

impl Subscription {
    /// Connects to the announcement push channel and spawns the reader task.
    /// Decoded deltas are forwarded to `tx` in arrival order.
    pub async fn open(base: &Url, tx: UnboundedSender<FeedMessage>) -> Result<Self, FeedError> {
        let url = push_url(base)?;
        let (stream, _response) = connect_async(url.as_str()).await?;
        info!("announcement push channel connected: {}", url);

        let handle = tokio::spawn(read_loop(stream, tx));
        Ok(Self { handle: Some(handle) })
    }

    /// Idempotent teardown.
    pub fn close(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            debug!("announcement push subscription closed");
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.close();
    }
}

async fn read_loop(
    mut stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    tx: UnboundedSender<FeedMessage>,
) {
    while let Some(frame) = stream.next().await {
        let message = match frame {
            Ok(message) => message,
            // No automatic reconnect: the feed is informational and may go
            // stale until the view is reopened.
            Err(err) => {
                error!("push channel transport error: {}", err);
                break;
            }
        };

        match message {
            Message::Text(text) => {
                if let Some(event) = decode_frame(&text) {
                    // The receiver is gone once the UI loop quits.
                    if tx.send(FeedMessage::Delta(event)).is_err() {
                        break;
                    }
                }
            }
            Message::Close(_) => {
                info!("push channel closed by server");
                break;
            }
            _ => {}
        }
    }
}
