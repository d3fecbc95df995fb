use std::collections::HashSet;
use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::sse::{Event, Sse};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use futures_util::future;
use futures_util::stream::{self, StreamExt};
use serde::Deserialize;
use tokio_stream::wrappers::{BroadcastStream, IntervalStream};

use crate::core::{EventBus, SubscriberId};
use crate::response::AppError;
use crate::state::AppState;

const PING_INTERVAL_SECS: u64 = 30;

const EVENT_TYPES: [&str; 6] = [
    "QUESTION_PRESENTED",
    "ANSWER_JUDGED",
    "HEART_LOST",
    "HEARTS_DEPLETED",
    "HEARTS_RESTORED",
    "LESSON_COMPLETED",
];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StreamQuery {
    event_types: Option<String>,
}

struct SubscriptionGuard {
    bus: Arc<EventBus>,
    subscriber_id: SubscriberId,
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        let bus = Arc::clone(&self.bus);
        let id = std::mem::take(&mut self.subscriber_id);
        tokio::spawn(async move {
            bus.unsubscribe(&id).await;
        });
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/:id/events", get(session_stream))
}

fn parse_event_types(raw: &str) -> Vec<String> {
    let allowed: HashSet<&str> = EVENT_TYPES.into_iter().collect();
    raw.split(',')
        .map(|v| v.trim())
        .filter(|v| allowed.contains(v))
        .map(|v| v.to_string())
        .collect()
}

/// Streams the transition notifications of one lesson session. The stream ends
/// once the session is deleted.
async fn session_stream(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Query(query): Query<StreamQuery>,
) -> Result<impl IntoResponse, AppError> {
    let sessions = state.sessions();
    if !sessions.contains(&session_id) {
        return Err(AppError::not_found(format!(
            "lesson session {session_id} not found"
        )));
    }

    let event_types = match query.event_types.as_deref() {
        Some(raw) => {
            let parsed = parse_event_types(raw);
            if parsed.is_empty() {
                return Err(AppError::validation(format!(
                    "eventTypes must name at least one of {}",
                    EVENT_TYPES.join(", ")
                )));
            }
            Some(parsed)
        }
        None => None,
    };

    let bus = state.event_bus();
    let (subscriber_id, receiver) = bus
        .subscribe_filtered(Some(session_id.clone()), event_types)
        .await;
    let guard = SubscriptionGuard {
        bus: Arc::clone(&bus),
        subscriber_id,
    };

    let events = BroadcastStream::new(receiver).filter_map(move |msg| {
        let _guard = &guard;
        async move {
            match msg {
                Ok(envelope) => {
                    let data = serde_json::to_string(&envelope.event)
                        .unwrap_or_else(|_| "{}".to_string());
                    let sse = Event::default()
                        .id(envelope.id)
                        .event(envelope.event.event_type())
                        .data(data);
                    Some(Ok::<Event, Infallible>(sse))
                }
                Err(_) => None,
            }
        }
    });

    let ping_event = || {
        let payload = serde_json::json!({ "timestamp": chrono::Utc::now().to_rfc3339() });
        Event::default()
            .id(uuid::Uuid::new_v4().to_string())
            .event("ping")
            .data(payload.to_string())
    };

    let initial = stream::once(async move { Ok::<Event, Infallible>(ping_event()) });
    let pings = IntervalStream::new(tokio::time::interval(std::time::Duration::from_secs(
        PING_INTERVAL_SECS,
    )))
    .skip(1)
    .take_while(move |_| future::ready(sessions.contains(&session_id)))
    .map(move |_| Ok::<Event, Infallible>(ping_event()));

    let stream = initial.chain(stream::select(events, pings));

    Ok(Sse::new(stream))
}
