use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{broadcast, RwLock};
use tracing::debug;

use nysh_core::LessonEvent;

const CHANNEL_CAPACITY: usize = 1024;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventEnvelope {
    pub id: String,
    pub session_id: String,
    pub event: LessonEvent,
    pub created_at: DateTime<Utc>,
}

impl EventEnvelope {
    pub fn new(session_id: impl Into<String>, event: LessonEvent) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            session_id: session_id.into(),
            event,
            created_at: Utc::now(),
        }
    }
}

pub type SubscriberId = String;

struct Subscriber {
    session_id: Option<String>,
    event_types: Option<Vec<String>>,
    sender: broadcast::Sender<EventEnvelope>,
}

impl Subscriber {
    fn matches(&self, envelope: &EventEnvelope) -> bool {
        if let Some(ref session_id) = self.session_id {
            if envelope.session_id != *session_id {
                return false;
            }
        }

        if let Some(ref event_types) = self.event_types {
            if !event_types.iter().any(|t| t == envelope.event.event_type()) {
                return false;
            }
        }

        true
    }
}

/// Fan-out of lesson events to SSE listeners
pub struct EventBus {
    subscribers: RwLock<HashMap<SubscriberId, Subscriber>>,
    event_count: RwLock<u64>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            subscribers: RwLock::new(HashMap::new()),
            event_count: RwLock::new(0),
        }
    }

    pub async fn publish(&self, session_id: &str, event: LessonEvent) {
        let envelope = EventEnvelope::new(session_id, event);
        let event_type = envelope.event.event_type();

        {
            let mut count = self.event_count.write().await;
            *count += 1;
        }

        let subscribers = self.subscribers.read().await;
        let mut sent_count = 0usize;
        for subscriber in subscribers.values() {
            if subscriber.matches(&envelope) && subscriber.sender.send(envelope.clone()).is_ok() {
                sent_count += 1;
            }
        }

        debug!(
            event_type = event_type,
            session_id = session_id,
            sent_to = sent_count,
            "Event published"
        );
    }

    pub async fn publish_all(&self, session_id: &str, events: Vec<LessonEvent>) {
        for event in events {
            self.publish(session_id, event).await;
        }
    }

    pub async fn subscribe_filtered(
        &self,
        session_id: Option<String>,
        event_types: Option<Vec<String>>,
    ) -> (SubscriberId, broadcast::Receiver<EventEnvelope>) {
        let (sender, receiver) = broadcast::channel(CHANNEL_CAPACITY);
        let subscriber_id = uuid::Uuid::new_v4().to_string();

        let subscriber = Subscriber {
            session_id,
            event_types,
            sender,
        };

        {
            let mut subscribers = self.subscribers.write().await;
            subscribers.insert(subscriber_id.clone(), subscriber);
        }

        debug!(subscriber_id = %subscriber_id, "New filtered subscription created");
        (subscriber_id, receiver)
    }

    pub async fn unsubscribe(&self, subscriber_id: &str) {
        let mut subscribers = self.subscribers.write().await;
        if subscribers.remove(subscriber_id).is_some() {
            debug!(subscriber_id = %subscriber_id, "Subscription removed");
        }
    }

    /// Drops every filtered subscription bound to a session, which ends their streams
    pub async fn close_session(&self, session_id: &str) {
        let mut subscribers = self.subscribers.write().await;
        let before = subscribers.len();
        subscribers.retain(|_, s| s.session_id.as_deref() != Some(session_id));
        let removed = before - subscribers.len();
        if removed > 0 {
            debug!(session_id = session_id, removed, "Session subscriptions closed");
        }
    }

    pub async fn subscriber_count(&self) -> usize {
        self.subscribers.read().await.len()
    }

    pub async fn event_count(&self) -> u64 {
        *self.event_count.read().await
    }

    pub async fn stats(&self) -> EventBusStats {
        EventBusStats {
            total_events: self.event_count().await,
            subscriber_count: self.subscriber_count().await,
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventBusStats {
    pub total_events: u64,
    pub subscriber_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use nysh_core::events::HeartsPayload;

    fn heart_lost(hearts: u32) -> LessonEvent {
        LessonEvent::HeartLost(HeartsPayload {
            hearts,
            max_hearts: 5,
        })
    }

    #[tokio::test]
    async fn test_event_bus_publish_subscribe() {
        let bus = EventBus::new();
        let (_, mut receiver) = bus.subscribe_filtered(None, None).await;

        bus.publish("session1", heart_lost(4)).await;

        let envelope = receiver.recv().await.unwrap();
        assert_eq!(envelope.event.event_type(), "HEART_LOST");
        assert_eq!(envelope.session_id, "session1");
        assert_eq!(bus.event_count().await, 1);
    }

    #[tokio::test]
    async fn test_filtered_subscription() {
        let bus = EventBus::new();
        let (sub_id, mut receiver) = bus
            .subscribe_filtered(
                Some("session1".to_string()),
                Some(vec!["HEART_LOST".to_string()]),
            )
            .await;

        bus.publish("session2", heart_lost(4)).await;
        bus.publish(
            "session1",
            LessonEvent::HeartsRestored(HeartsPayload {
                hearts: 5,
                max_hearts: 5,
            }),
        )
        .await;
        bus.publish("session1", heart_lost(3)).await;

        let envelope = receiver.recv().await.unwrap();
        assert_eq!(envelope.session_id, "session1");
        assert_eq!(envelope.event, heart_lost(3));

        bus.unsubscribe(&sub_id).await;
        assert_eq!(bus.subscribers.read().await.len(), 0);
    }

    #[tokio::test]
    async fn test_close_session_ends_its_streams() {
        let bus = EventBus::new();
        let (_, mut receiver) = bus.subscribe_filtered(Some("s".to_string()), None).await;
        let (_other, _) = bus.subscribe_filtered(Some("t".to_string()), None).await;

        bus.close_session("s").await;

        assert_eq!(bus.stats().await.subscriber_count, 1);
        assert!(matches!(
            receiver.recv().await,
            Err(broadcast::error::RecvError::Closed)
        ));
    }
}
