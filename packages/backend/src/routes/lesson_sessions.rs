use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::info;

use nysh_core::{Answer, LessonEvent};

use crate::response::{AppError, SuccessResponse};
use crate::services::session_registry::SessionUpdate;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OpenSessionBody {
    lesson_id: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(open_session))
        .route("/:id", get(get_session).delete(close_session))
        .route("/:id/answer", post(submit_answer))
        .route("/:id/advance", post(advance))
        .route("/:id/practice", post(practice_recover))
}

async fn open_session(
    State(state): State<AppState>,
    body: Result<Json<OpenSessionBody>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(body) = body.map_err(|err| AppError::bad_request(err.body_text()))?;
    let lesson_id = body.lesson_id.trim();
    if lesson_id.is_empty() {
        return Err(AppError::validation("lessonId is required"));
    }

    let update = start_session(&state, lesson_id).await?;
    Ok((StatusCode::CREATED, SuccessResponse::new(update)))
}

async fn start_session(state: &AppState, lesson_id: &str) -> Result<SessionUpdate, AppError> {
    let update = state.sessions().open(&state.content(), lesson_id)?;

    let bus = state.event_bus();
    for evicted in &update.evicted {
        bus.close_session(evicted).await;
    }
    dispatch(state, &update).await;

    Ok(update)
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let view = state.sessions().view(&id)?;
    Ok(SuccessResponse::new(view))
}

async fn submit_answer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Answer>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(answer) = body.map_err(|err| {
        AppError::validation(format!(
            "answer must be {{\"choice\": string}} or {{\"arrangement\": [index]}}: {}",
            err.body_text()
        ))
    })?;

    let update = state.sessions().submit_answer(&id, &answer)?;
    dispatch(&state, &update).await;

    Ok(SuccessResponse::new(update))
}

async fn advance(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let update = state.sessions().advance(&id)?;
    dispatch(&state, &update).await;

    Ok(SuccessResponse::new(update))
}

async fn practice_recover(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let update = state.sessions().practice_recover(&id)?;
    dispatch(&state, &update).await;

    Ok(SuccessResponse::new(update))
}

async fn close_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.sessions().remove(&id)?;
    state.event_bus().close_session(&id).await;
    info!(session_id = %id, "lesson session left");

    Ok(StatusCode::NO_CONTENT)
}

/// Credits a finished lesson to the learner and fans the events out to listeners
async fn dispatch(state: &AppState, update: &SessionUpdate) {
    for event in &update.events {
        if let LessonEvent::LessonCompleted(summary) = event {
            state.progress().record_completion(summary);
        }
    }

    state
        .event_bus()
        .publish_all(&update.session_id, update.events.clone())
        .await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use nysh_core::ContentStore;
    use tokio::sync::broadcast::error::RecvError;

    #[tokio::test]
    async fn test_evicted_sessions_close_their_streams() {
        let state = AppState::new(ContentStore::builtin().unwrap(), 1);
        let first = start_session(&state, "3").await.unwrap();

        let bus = state.event_bus();
        let (_, mut receiver) = bus
            .subscribe_filtered(Some(first.session_id.clone()), None)
            .await;

        let lesson = state.content().get_lesson("3").unwrap();
        let sessions = state.sessions();
        while sessions.snapshot(&first.session_id).unwrap().summary.is_none() {
            let index = sessions.snapshot(&first.session_id).unwrap().current_question_index;
            let question = &lesson.questions[index];
            let answer = match &question.correct_order {
                Some(order) => Answer::arrangement(order.clone()),
                None => Answer::choice(question.correct_answer.clone()),
            };
            sessions.submit_answer(&first.session_id, &answer).unwrap();
            sessions.advance(&first.session_id).unwrap();
        }

        let second = start_session(&state, "4").await.unwrap();
        assert_eq!(second.evicted, vec![first.session_id.clone()]);
        assert_eq!(bus.stats().await.subscriber_count, 0);
        assert!(matches!(receiver.recv().await, Err(RecvError::Closed)));
    }
}
