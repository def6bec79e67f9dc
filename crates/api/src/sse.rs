//! Server-sent-events adapter over a job's progress channel.
//!
//! The adapter pulls from the job's broadcast receiver with a bounded wait.
//! Every wait that expires without an event produces a heartbeat, so proxies
//! and browsers keep the connection open during slow provider calls. The
//! stream ends right after forwarding a terminal event.

use std::convert::Infallible;
use std::time::Duration;

use axum::response::sse::{Event, Sse};
use futures::stream::{self, Stream, StreamExt};
use tokio::sync::broadcast::{self, error::RecvError};

use lingosheet_events::{ProgressEvent, Subscription};

/// Sent when the channel closes without a terminal event (job evicted).
pub const CHANNEL_CLOSED_MESSAGE: &str = "Progress channel closed before the job finished";

struct Cursor {
    /// Event to emit before touching the receiver.
    pending: Option<ProgressEvent>,
    /// `None` once the stream has nothing more to read.
    receiver: Option<broadcast::Receiver<ProgressEvent>>,
}

/// Progress events for one subscriber, heartbeats included.
///
/// A finished job yields only its terminal event. A live job yields the
/// latest progress snapshot (if any) and then everything published after
/// the subscription, until and including the terminal event.
pub fn progress_events(
    subscription: Subscription,
    heartbeat: Duration,
) -> impl Stream<Item = ProgressEvent> + Send {
    let cursor = match subscription {
        Subscription::Finished(terminal) => Cursor {
            pending: Some(terminal),
            receiver: None,
        },
        Subscription::Live { receiver, snapshot } => Cursor {
            pending: snapshot,
            receiver: Some(receiver),
        },
    };

    stream::unfold(cursor, move |mut cursor| async move {
        if let Some(event) = cursor.pending.take() {
            return Some((event, cursor));
        }
        let mut receiver = cursor.receiver.take()?;

        loop {
            match tokio::time::timeout(heartbeat, receiver.recv()).await {
                Err(_elapsed) => {
                    cursor.receiver = Some(receiver);
                    return Some((ProgressEvent::Heartbeat, cursor));
                }
                Ok(Ok(event)) => {
                    if !event.is_terminal() {
                        cursor.receiver = Some(receiver);
                    }
                    return Some((event, cursor));
                }
                Ok(Err(RecvError::Lagged(skipped))) => {
                    tracing::warn!(skipped, "Progress subscriber lagged, skipping events");
                }
                Ok(Err(RecvError::Closed)) => {
                    tracing::warn!("Progress channel closed without a terminal event");
                    return Some((ProgressEvent::failed(CHANNEL_CLOSED_MESSAGE), cursor));
                }
            }
        }
    })
}

/// Encode one event as an SSE `data:` frame.
fn to_sse_event(event: ProgressEvent) -> Event {
    Event::default().json_data(&event).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to encode progress event");
        Event::default().data(r#"{"type":"failed","error":"Failed to encode progress event","complete":true}"#)
    })
}

/// The `text/event-stream` response for a subscription.
pub fn progress_sse(
    subscription: Subscription,
    heartbeat: Duration,
) -> Sse<impl Stream<Item = Result<Event, Infallible>> + Send> {
    Sse::new(progress_events(subscription, heartbeat).map(|event| Ok(to_sse_event(event))))
}
