//! Live connection: authenticates on the platform WebSocket, then a reader task decodes frames
//! and forwards events on a bounded channel. The instance event loop consumes [`EventStream`].

use futures_util::{SinkExt, Stream, StreamExt};
use mbot_core::{Event, MbotError, Result};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::header::{HeaderValue, AUTHORIZATION};
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tracing::{debug, info, instrument, warn};

use crate::adapters::{decode_frame, Frame};
use crate::models::StatusReply;

/// Events buffered between the reader task and the event loop.
pub const EVENT_BUFFER: usize = 256;

/// Receiving end of a live connection.
pub struct EventStream {
    events: mpsc::Receiver<Event>,
    reader: Option<JoinHandle<Result<()>>>,
}

impl EventStream {
    /// Wraps a plain channel, e.g. to drive an instance without a platform.
    pub fn from_receiver(events: mpsc::Receiver<Event>) -> Self {
        Self {
            events,
            reader: None,
        }
    }

    /// Next event; `None` once the connection is gone and the buffer is drained.
    pub async fn recv(&mut self) -> Option<Event> {
        self.events.recv().await
    }

    /// Why the stream ended. Call after [`EventStream::recv`] returned `None`.
    pub async fn close_reason(&mut self) -> String {
        match self.reader.take() {
            Some(reader) => match reader.await {
                Ok(Ok(())) => "server closed the connection".to_string(),
                Ok(Err(e)) => e.to_string(),
                Err(e) => format!("reader task failed: {}", e),
            },
            None => "event source closed".to_string(),
        }
    }
}

/// Opens the live connection on `ws_url` and sends the authentication challenge.
#[instrument(skip(token))]
pub async fn connect(ws_url: &str, token: &str) -> Result<EventStream> {
    let mut request = ws_url
        .into_client_request()
        .map_err(|e| MbotError::Connection(e.to_string()))?;
    let bearer = HeaderValue::from_str(&format!("Bearer {}", token))
        .map_err(|e| MbotError::Connection(e.to_string()))?;
    request.headers_mut().insert(AUTHORIZATION, bearer);

    let (stream, _response) = connect_async(request)
        .await
        .map_err(|e| MbotError::Connection(e.to_string()))?;
    let (mut write, read) = stream.split();

    let challenge = serde_json::json!({
        "seq": 1,
        "action": "authentication_challenge",
        "data": { "token": token },
    });
    write
        .send(Message::Text(challenge.to_string()))
        .await
        .map_err(|e| MbotError::Connection(e.to_string()))?;
    info!("live connection open, authentication challenge sent");

    let (tx, rx) = mpsc::channel(EVENT_BUFFER);
    let reader = tokio::spawn(async move {
        // The sink half stays alive with the reader so the socket is not half-closed.
        let _write = write;
        read_frames(read, tx).await
    });

    Ok(EventStream {
        events: rx,
        reader: Some(reader),
    })
}

async fn read_frames<R>(mut read: R, tx: mpsc::Sender<Event>) -> Result<()>
where
    R: Stream<Item = std::result::Result<Message, WsError>> + Unpin,
{
    while let Some(message) = read.next().await {
        match message {
            Ok(Message::Text(text)) => match decode_frame(&text) {
                Ok(Frame::Event(event)) => {
                    if tx.send(event).await.is_err() {
                        debug!("event receiver dropped, stopping reader");
                        return Ok(());
                    }
                }
                Ok(Frame::Reply(reply)) => log_reply(&reply),
                Err(e) => warn!(error = %e, "undecodable frame skipped"),
            },
            Ok(Message::Close(frame)) => {
                info!(frame = ?frame, "live connection closed by server");
                return Ok(());
            }
            Ok(_) => {}
            Err(e) => return Err(MbotError::Connection(e.to_string())),
        }
    }
    Ok(())
}

fn log_reply(reply: &StatusReply) {
    match reply.status.as_str() {
        "OK" => debug!(seq_reply = ?reply.seq_reply, "action acknowledged"),
        "FAIL" => warn!(
            seq_reply = ?reply.seq_reply,
            error = %reply.error.as_ref().map(|e| e.message.as_str()).unwrap_or("none"),
            "action failed"
        ),
        other => debug!(status = %other, seq_reply = ?reply.seq_reply, "unsupported status reply"),
    }
}
