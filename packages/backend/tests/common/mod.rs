#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use nysh_backend::config::Config;
use nysh_core::{Answer, ContentStore, Question};

pub fn create_test_app() -> Router {
    create_test_app_with(Config::default())
}

pub fn create_test_app_with(config: Config) -> Router {
    let content = ContentStore::builtin().expect("built-in content");
    nysh_backend::build_app(&config, content)
}

pub fn question(lesson_id: &str, index: usize) -> Question {
    let store = ContentStore::builtin().expect("built-in content");
    store.get_lesson(lesson_id).expect("lesson").questions[index].clone()
}

pub fn correct_answer(question: &Question) -> Value {
    let answer = match &question.correct_order {
        Some(order) if question.question_type.is_arrangement() => Answer::arrangement(order.clone()),
        _ => Answer::choice(question.correct_answer.clone()),
    };
    serde_json::to_value(answer).expect("answer json")
}

pub fn wrong_answer(question: &Question) -> Value {
    if question.question_type.is_arrangement() {
        let mut order = question.correct_order.clone().expect("order");
        order.rotate_left(1);
        serde_json::json!({ "arrangement": order })
    } else {
        serde_json::json!({ "choice": format!("{} (wrong)", question.correct_answer) })
    }
}

pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(json) => Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

pub async fn open_session(app: &Router, lesson_id: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/lesson-sessions",
        Some(serde_json::json!({ "lessonId": lesson_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["sessionId"].as_str().unwrap().to_string()
}
