use serde::Serialize;

use crate::reward::CompletionSummary;

/// Notification emitted by a session transition. Views consume these to drive
/// animations; nothing flows back into the session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "payload")]
pub enum LessonEvent {
    #[serde(rename = "QUESTION_PRESENTED")]
    QuestionPresented(QuestionPresentedPayload),

    #[serde(rename = "ANSWER_JUDGED")]
    AnswerJudged(AnswerJudgedPayload),

    #[serde(rename = "HEART_LOST")]
    HeartLost(HeartsPayload),

    #[serde(rename = "HEARTS_DEPLETED")]
    HeartsDepleted(HeartsPayload),

    #[serde(rename = "HEARTS_RESTORED")]
    HeartsRestored(HeartsPayload),

    #[serde(rename = "LESSON_COMPLETED")]
    LessonCompleted(CompletionSummary),
}

impl LessonEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            LessonEvent::QuestionPresented(_) => "QUESTION_PRESENTED",
            LessonEvent::AnswerJudged(_) => "ANSWER_JUDGED",
            LessonEvent::HeartLost(_) => "HEART_LOST",
            LessonEvent::HeartsDepleted(_) => "HEARTS_DEPLETED",
            LessonEvent::HeartsRestored(_) => "HEARTS_RESTORED",
            LessonEvent::LessonCompleted(_) => "LESSON_COMPLETED",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionPresentedPayload {
    pub question_index: usize,
    pub question_id: String,
    pub total_questions: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerJudgedPayload {
    pub question_index: usize,
    pub question_id: String,
    pub is_correct: bool,
    pub submitted: String,
    pub score: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeartsPayload {
    pub hearts: u32,
    pub max_hearts: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_wire_shape() {
        let event = LessonEvent::HeartLost(HeartsPayload {
            hearts: 4,
            max_hearts: 5,
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "HEART_LOST");
        assert_eq!(json["payload"]["hearts"], 4);
        assert_eq!(json["payload"]["maxHearts"], 5);
        assert_eq!(event.event_type(), "HEART_LOST");
    }
}
