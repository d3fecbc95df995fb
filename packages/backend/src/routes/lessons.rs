use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use serde::Serialize;

use nysh_core::{LessonSummary, QuestionView, StoryContent};

use crate::response::{AppError, SuccessResponse};
use crate::state::AppState;

/// Lesson preview. Carries only the questions that will be played and never
/// their answer keys.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LessonDetail {
    #[serde(flatten)]
    summary: LessonSummary,
    type_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    story: Option<StoryContent>,
    questions: Vec<QuestionView>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_lessons))
        .route("/:id", get(get_lesson))
}

async fn list_lessons(State(state): State<AppState>) -> impl IntoResponse {
    SuccessResponse::new(state.content().summaries())
}

async fn get_lesson(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let lesson = state
        .content()
        .get_lesson(&id)
        .ok_or_else(|| AppError::not_found(format!("lesson {id} not found")))?;

    let detail = LessonDetail {
        summary: LessonSummary::from(lesson.as_ref()),
        type_label: lesson.type_label(),
        story: lesson.story.clone(),
        questions: lesson.played_questions().iter().map(QuestionView::from).collect(),
    };

    Ok(SuccessResponse::new(detail))
}
