//! The progress event streamed for every translation job.

use serde::{Serialize, Serializer};

use lingosheet_core::progress::COMPLETE_PERCENT;

// ---------------------------------------------------------------------------
// Wire type constants
// ---------------------------------------------------------------------------

/// Intermediate progress update.
pub const EVENT_TYPE_PROGRESS: &str = "progress";
/// Synthetic keep-alive inserted by the stream adapter.
pub const EVENT_TYPE_HEARTBEAT: &str = "heartbeat";
/// Job finished successfully.
pub const EVENT_TYPE_COMPLETED: &str = "completed";
/// Job failed.
pub const EVENT_TYPE_FAILED: &str = "failed";

// ---------------------------------------------------------------------------
// ProgressEvent
// ---------------------------------------------------------------------------

/// A single message on a job's event channel.
///
/// `Completed` and `Failed` are terminal: nothing but heartbeats may follow
/// them on a stream, and the stream closes right after forwarding one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// Work in progress, `percent` in `0..=100`.
    Progress { percent: u8, message: String },

    /// Keep-alive; never produced by a worker.
    Heartbeat,

    /// The job finished; `result_reference` is the output file name.
    Completed {
        message: String,
        result_reference: String,
    },

    /// The job failed; `message` is the human-readable cause.
    Failed { message: String },
}

impl ProgressEvent {
    pub fn progress(percent: u8, message: impl Into<String>) -> Self {
        Self::Progress {
            percent: percent.min(COMPLETE_PERCENT),
            message: message.into(),
        }
    }

    pub fn completed(message: impl Into<String>, result_reference: impl Into<String>) -> Self {
        Self::Completed {
            message: message.into(),
            result_reference: result_reference.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }

    /// Whether this event ends the job's stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed { .. } | Self::Failed { .. })
    }

    /// Percent carried by the event, if any. `Completed` is always 100.
    pub fn percent(&self) -> Option<u8> {
        match self {
            Self::Progress { percent, .. } => Some(*percent),
            Self::Completed { .. } => Some(COMPLETE_PERCENT),
            Self::Heartbeat | Self::Failed { .. } => None,
        }
    }

    /// Value of the `type` field on the wire.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Progress { .. } => EVENT_TYPE_PROGRESS,
            Self::Heartbeat => EVENT_TYPE_HEARTBEAT,
            Self::Completed { .. } => EVENT_TYPE_COMPLETED,
            Self::Failed { .. } => EVENT_TYPE_FAILED,
        }
    }

    fn to_wire(&self) -> WireEvent<'_> {
        let mut wire = WireEvent {
            kind: self.event_type(),
            progress: self.percent(),
            ..WireEvent::default()
        };
        match self {
            Self::Progress { message, .. } => wire.message = Some(message),
            Self::Heartbeat => wire.heartbeat = Some(true),
            Self::Completed {
                message,
                result_reference,
            } => {
                wire.message = Some(message);
                wire.complete = Some(true);
                wire.translated_file = Some(result_reference);
            }
            Self::Failed { message } => {
                wire.error = Some(message);
                wire.complete = Some(true);
            }
        }
        wire
    }
}

/// Flat JSON shape understood by the browser client.
///
/// The client keys off `progress`, `complete`, `error` and
/// `translated_file`; `type` makes the variant explicit for everyone else.
#[derive(Default, Serialize)]
struct WireEvent<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    progress: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    complete: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    translated_file: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    heartbeat: Option<bool>,
}

impl Serialize for ProgressEvent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_wire().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn progress_wire_shape() {
        let value = serde_json::to_value(ProgressEvent::progress(33, "Translating")).unwrap();
        assert_eq!(
            value,
            json!({"type": "progress", "progress": 33, "message": "Translating"})
        );
    }

    #[test]
    fn heartbeat_wire_shape() {
        let value = serde_json::to_value(ProgressEvent::Heartbeat).unwrap();
        assert_eq!(value, json!({"type": "heartbeat", "heartbeat": true}));
    }

    #[test]
    fn completed_wire_shape_carries_result_and_full_percent() {
        let value =
            serde_json::to_value(ProgressEvent::completed("Done", "translated_1_book.xlsx"))
                .unwrap();
        assert_eq!(
            value,
            json!({
                "type": "completed",
                "progress": 100,
                "message": "Done",
                "complete": true,
                "translated_file": "translated_1_book.xlsx",
            })
        );
    }

    #[test]
    fn failed_wire_shape() {
        let value = serde_json::to_value(ProgressEvent::failed("boom")).unwrap();
        assert_eq!(
            value,
            json!({"type": "failed", "error": "boom", "complete": true})
        );
    }

    #[test]
    fn only_completed_and_failed_are_terminal() {
        assert!(!ProgressEvent::progress(50, "x").is_terminal());
        assert!(!ProgressEvent::Heartbeat.is_terminal());
        assert!(ProgressEvent::completed("x", "y").is_terminal());
        assert!(ProgressEvent::failed("x").is_terminal());
    }

    #[test]
    fn progress_constructor_clamps_to_100() {
        assert_eq!(ProgressEvent::progress(250, "x").percent(), Some(100));
    }
}
