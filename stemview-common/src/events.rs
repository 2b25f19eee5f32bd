//! Event types for the stemview event system
//!
//! Provides the shared ViewEvent enum and the broadcast EventBus used to
//! push upload lifecycle and progress updates to SSE clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// View event types
///
/// Events are broadcast via EventBus and serialized for SSE transmission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ViewEvent {
    /// A file was accepted and the upload request is about to be sent
    UploadStarted {
        upload_id: Uuid,
        file_name: String,
        timestamp: DateTime<Utc>,
    },

    /// Decorative progress bar moved
    ///
    /// Emitted by the progress ticker on every tick and once more with 100
    /// when the response arrives.
    ProgressUpdated {
        upload_id: Uuid,
        percent: u8,
        timestamp: DateTime<Utc>,
    },

    /// Backend answered and the results panel was replaced
    UploadCompleted {
        upload_id: Uuid,
        audio_type: String,
        is_monophonic: bool,
        stem_count: usize,
        timestamp: DateTime<Utc>,
    },

    /// Upload ended in an error state
    UploadFailed {
        upload_id: Uuid,
        message: String,
        timestamp: DateTime<Utc>,
    },

    /// A stem's instrument disclosure panel was expanded or collapsed
    DisclosureToggled {
        stem: String,
        expanded: bool,
        timestamp: DateTime<Utc>,
    },
}

impl ViewEvent {
    /// Event name used as the SSE `event:` field
    pub fn event_type(&self) -> &str {
        match self {
            ViewEvent::UploadStarted { .. } => "UploadStarted",
            ViewEvent::ProgressUpdated { .. } => "ProgressUpdated",
            ViewEvent::UploadCompleted { .. } => "UploadCompleted",
            ViewEvent::UploadFailed { .. } => "UploadFailed",
            ViewEvent::DisclosureToggled { .. } => "DisclosureToggled",
        }
    }

    /// Upload this event belongs to, if any
    pub fn upload_id(&self) -> Option<Uuid> {
        match self {
            ViewEvent::UploadStarted { upload_id, .. }
            | ViewEvent::ProgressUpdated { upload_id, .. }
            | ViewEvent::UploadCompleted { upload_id, .. }
            | ViewEvent::UploadFailed { upload_id, .. } => Some(*upload_id),
            ViewEvent::DisclosureToggled { .. } => None,
        }
    }
}

/// Broadcast bus for ViewEvents
///
/// Uses tokio::broadcast internally: every subscriber sees every event
/// emitted after it subscribed; slow subscribers lose the oldest events
/// once `capacity` is exceeded.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<ViewEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<ViewEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Ok(subscriber_count)` if at least one subscriber exists.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: ViewEvent,
    ) -> Result<usize, broadcast::error::SendError<ViewEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    ///
    /// Progress ticks are only interesting to an open page.
    pub fn emit_lossy(&self, event: ViewEvent) {
        let _ = self.tx.send(event);
    }

    /// Get the current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Get the configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serializes_with_type_tag() {
        let event = ViewEvent::ProgressUpdated {
            upload_id: Uuid::nil(),
            percent: 42,
            timestamp: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "ProgressUpdated");
        assert_eq!(json["percent"], 42);
        assert_eq!(event.event_type(), "ProgressUpdated");
    }

    #[test]
    fn test_emit_without_subscribers_is_err_but_lossy_is_silent() {
        let bus = EventBus::new(8);
        let event = ViewEvent::DisclosureToggled {
            stem: "other".to_string(),
            expanded: true,
            timestamp: Utc::now(),
        };
        assert!(bus.emit(event.clone()).is_err());
        bus.emit_lossy(event);
        assert_eq!(bus.subscriber_count(), 0);
        assert_eq!(bus.capacity(), 8);
    }

    #[tokio::test]
    async fn test_subscriber_receives_events_in_order() {
        let bus = EventBus::new(8);
        let mut rx = bus.subscribe();
        let id = Uuid::new_v4();

        for percent in [1u8, 2, 3] {
            bus.emit_lossy(ViewEvent::ProgressUpdated {
                upload_id: id,
                percent,
                timestamp: Utc::now(),
            });
        }

        for expected in [1u8, 2, 3] {
            match rx.recv().await.unwrap() {
                ViewEvent::ProgressUpdated { percent, upload_id, .. } => {
                    assert_eq!(percent, expected);
                    assert_eq!(upload_id, id);
                }
                other => panic!("unexpected event {:?}", other),
            }
        }
    }

    #[test]
    fn test_upload_id_absent_for_disclosure_events() {
        let event = ViewEvent::DisclosureToggled {
            stem: "other".to_string(),
            expanded: false,
            timestamp: Utc::now(),
        };
        assert_eq!(event.upload_id(), None);
    }
}
