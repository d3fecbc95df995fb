//! Lesson Progress State Machine
//!
//! ```text
//! AnsweringQuestion --submit_answer--> ShowingExplanation --advance--> AnsweringQuestion
//!        |                                      |
//!        | (last heart lost)                    +--advance (last question)--> Completed
//!        v
//!     GameOver --practice_recover--> AnsweringQuestion (same question, score kept)
//! ```
//!
//! Every transition is synchronous and atomic: it either applies fully and
//! returns the notifications it produced, or returns an error and leaves the
//! session untouched. Out-of-phase calls are rejected with
//! [`SessionError::InvalidTransition`] rather than silently ignored.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::content::ContentStore;
use crate::evaluator::{check_answer, Answer, AnswerError, Judgement};
use crate::events::{AnswerJudgedPayload, HeartsPayload, LessonEvent, QuestionPresentedPayload};
use crate::feedback::{Feedback, Mood};
use crate::reward::CompletionSummary;
use crate::types::{CefrLevel, Lesson, LessonType, Question, QuestionType, StoryContent, MAX_HEARTS};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    AnsweringQuestion,
    ShowingExplanation,
    GameOver,
    Completed,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AnsweringQuestion => "answeringQuestion",
            Self::ShowingExplanation => "showingExplanation",
            Self::GameOver => "gameOver",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    SubmitAnswer,
    Advance,
    PracticeRecover,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::SubmitAnswer => "submit an answer",
            Self::Advance => "advance",
            Self::PracticeRecover => "practice",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("lesson {0} not found")]
    LessonNotFound(String),
    #[error("lesson {0} has no questions")]
    EmptyLesson(String),
    #[error("cannot {action} during {phase}")]
    InvalidTransition { action: Action, phase: Phase },
    #[error(transparent)]
    Answer(#[from] AnswerError),
}

/// Opens a fresh session on question 1 with full hearts
pub fn open_lesson(store: &ContentStore, lesson_id: &str) -> Result<LessonSession, SessionError> {
    let lesson = store
        .get_lesson(lesson_id)
        .ok_or_else(|| SessionError::LessonNotFound(lesson_id.to_string()))?;
    LessonSession::new(lesson)
}

/// Mutable progress record for one playthrough of one lesson
#[derive(Debug, Clone)]
pub struct LessonSession {
    lesson: Arc<Lesson>,
    question_count: usize,
    current_question_index: usize,
    score: u32,
    hearts: u32,
    max_hearts: u32,
    mistakes: u32,
    phase: Phase,
    feedback: Feedback,
    last_judgement: Option<Judgement>,
    summary: Option<CompletionSummary>,
}

impl LessonSession {
    pub fn new(lesson: Arc<Lesson>) -> Result<Self, SessionError> {
        let question_count = lesson.effective_question_count();
        let first = lesson
            .questions
            .first()
            .ok_or_else(|| SessionError::EmptyLesson(lesson.id.clone()))?;
        let feedback = Feedback::question(0, &first.question);

        debug!(lesson_id = %lesson.id, question_count, "lesson session opened");

        Ok(Self {
            lesson,
            question_count,
            current_question_index: 0,
            score: 0,
            hearts: MAX_HEARTS,
            max_hearts: MAX_HEARTS,
            mistakes: 0,
            phase: Phase::AnsweringQuestion,
            feedback,
            last_judgement: None,
            summary: None,
        })
    }

    pub fn lesson(&self) -> &Arc<Lesson> {
        &self.lesson
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_question_index(&self) -> usize {
        self.current_question_index
    }

    pub fn effective_question_count(&self) -> usize {
        self.question_count
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn hearts(&self) -> u32 {
        self.hearts
    }

    pub fn max_hearts(&self) -> u32 {
        self.max_hearts
    }

    /// Cumulative wrong answers, including those before a practice recovery
    pub fn mistakes(&self) -> u32 {
        self.mistakes
    }

    pub fn feedback(&self) -> &Feedback {
        &self.feedback
    }

    pub fn summary(&self) -> Option<&CompletionSummary> {
        self.summary.as_ref()
    }

    pub fn is_completed(&self) -> bool {
        self.phase == Phase::Completed
    }

    pub fn current_question(&self) -> &Question {
        &self.lesson.questions[self.current_question_index]
    }

    fn is_last_question(&self) -> bool {
        self.current_question_index + 1 >= self.question_count
    }

    fn require(&self, action: Action, phase: Phase) -> Result<(), SessionError> {
        if self.phase != phase {
            debug!(
                lesson_id = %self.lesson.id,
                %action,
                phase = %self.phase,
                "transition rejected"
            );
            return Err(SessionError::InvalidTransition {
                action,
                phase: self.phase,
            });
        }
        Ok(())
    }

    /// Notification for the question currently on screen
    pub fn question_presented(&self) -> LessonEvent {
        LessonEvent::QuestionPresented(QuestionPresentedPayload {
            question_index: self.current_question_index,
            question_id: self.current_question().id.clone(),
            total_questions: self.question_count,
        })
    }

    fn hearts_payload(&self) -> HeartsPayload {
        HeartsPayload {
            hearts: self.hearts,
            max_hearts: self.max_hearts,
        }
    }

    /// Judges the answer to the current question. A wrong answer costs a heart;
    /// losing the last heart goes straight to `GameOver`.
    pub fn submit_answer(&mut self, answer: &Answer) -> Result<Vec<LessonEvent>, SessionError> {
        self.require(Action::SubmitAnswer, Phase::AnsweringQuestion)?;

        let question = &self.lesson.questions[self.current_question_index];
        let judgement = check_answer(question, answer)?;
        let explanation = question.explanation.clone();
        let question_id = question.id.clone();

        let mut events = Vec::with_capacity(3);

        if judgement.is_correct {
            self.score += 1;
            self.feedback = Feedback::correct(&explanation);
            self.phase = Phase::ShowingExplanation;
        } else {
            let hearts_before = self.hearts;
            self.hearts = self.hearts.saturating_sub(1);
            self.mistakes += 1;
            self.feedback = Feedback::incorrect(&explanation, hearts_before);
            events.push(LessonEvent::HeartLost(self.hearts_payload()));

            if self.hearts == 0 {
                self.phase = Phase::GameOver;
                self.feedback = Feedback::game_over();
                events.push(LessonEvent::HeartsDepleted(self.hearts_payload()));
            } else {
                self.phase = Phase::ShowingExplanation;
            }
        }

        events.insert(
            0,
            LessonEvent::AnswerJudged(AnswerJudgedPayload {
                question_index: self.current_question_index,
                question_id,
                is_correct: judgement.is_correct,
                submitted: judgement.submitted.clone(),
                score: self.score,
            }),
        );

        debug!(
            lesson_id = %self.lesson.id,
            question_index = self.current_question_index,
            is_correct = judgement.is_correct,
            score = self.score,
            hearts = self.hearts,
            phase = %self.phase,
            "answer judged"
        );

        self.last_judgement = Some(judgement);
        Ok(events)
    }

    /// Moves past the explanation to the next question, or completes the lesson
    /// after the last played question.
    pub fn advance(&mut self) -> Result<Vec<LessonEvent>, SessionError> {
        self.require(Action::Advance, Phase::ShowingExplanation)?;

        self.last_judgement = None;

        if !self.is_last_question() {
            self.current_question_index += 1;
            self.phase = Phase::AnsweringQuestion;
            self.feedback = Feedback::question(
                self.current_question_index,
                &self.current_question().question,
            );
            debug!(
                lesson_id = %self.lesson.id,
                question_index = self.current_question_index,
                "advanced to next question"
            );
            return Ok(vec![self.question_presented()]);
        }

        let summary = CompletionSummary::new(&self.lesson, self.score);
        self.phase = Phase::Completed;
        self.feedback = Feedback::new(summary.message, summary.mood);
        self.summary = Some(summary.clone());

        debug!(
            lesson_id = %self.lesson.id,
            score = summary.score,
            xp_earned = summary.xp_earned,
            badge = ?summary.badge,
            "lesson completed"
        );

        Ok(vec![LessonEvent::LessonCompleted(summary)])
    }

    /// Refills hearts and returns to the same question. Score and position are kept.
    pub fn practice_recover(&mut self) -> Result<Vec<LessonEvent>, SessionError> {
        self.require(Action::PracticeRecover, Phase::GameOver)?;

        self.hearts = self.max_hearts;
        self.phase = Phase::AnsweringQuestion;
        self.last_judgement = None;
        self.feedback = Feedback::hearts_restored();

        debug!(
            lesson_id = %self.lesson.id,
            question_index = self.current_question_index,
            score = self.score,
            "hearts restored by practice"
        );

        Ok(vec![
            LessonEvent::HeartsRestored(self.hearts_payload()),
            self.question_presented(),
        ])
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let lesson = &self.lesson;
        let completed = self.is_completed();
        let question = self.current_question();
        let showing_explanation = self.phase == Phase::ShowingExplanation;

        SessionSnapshot {
            lesson_id: lesson.id.clone(),
            lesson_title: lesson.title.clone(),
            lesson_type: lesson.lesson_type,
            level: lesson.level,
            type_label: lesson.type_label(),
            phase: self.phase,
            current_question_index: self.current_question_index,
            total_questions: self.question_count,
            progress_percentage: progress_percentage(self.current_question_index, self.question_count),
            is_last_question: self.is_last_question(),
            score: self.score,
            hearts: self.hearts,
            max_hearts: self.max_hearts,
            mistakes: self.mistakes,
            feedback_message: self.feedback.message.clone(),
            feedback_mood: self.feedback.mood,
            question: (!completed).then(|| QuestionView::from(question)),
            explanation: showing_explanation.then(|| question.explanation.clone()),
            revealed_answer: showing_explanation.then(|| revealed_answer(question)),
            judgement: self.last_judgement.clone(),
            cultural_note: if self.current_question_index == 0 && !completed {
                lesson.cultural_note.clone()
            } else {
                None
            },
            story: lesson.story.clone(),
            summary: self.summary.clone(),
        }
    }
}

fn progress_percentage(index: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (index + 1) as f64 / total as f64 * 100.0
}

/// The answer key shown once the explanation is up
fn revealed_answer(question: &Question) -> String {
    match (&question.words, &question.correct_order) {
        (Some(words), Some(order)) if question.question_type.is_arrangement() => order
            .iter()
            .filter_map(|&i| words.get(i).map(String::as_str))
            .collect::<Vec<_>>()
            .join(" "),
        _ => question.correct_answer.clone(),
    }
}

/// A question as rendered, without its answer key
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    pub id: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub question: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub words: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub letter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound: Option<String>,
}

impl From<&Question> for QuestionView {
    fn from(question: &Question) -> Self {
        Self {
            id: question.id.clone(),
            question_type: question.question_type,
            question: question.question.clone(),
            options: question.options.clone(),
            words: question.words.clone(),
            audio_url: question.audio_url.clone(),
            letter: question.letter.clone(),
            sound: question.sound.clone(),
        }
    }
}

/// Everything the presentation layer needs to render the lesson screen
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub lesson_id: String,
    pub lesson_title: String,
    pub lesson_type: LessonType,
    pub level: CefrLevel,
    pub type_label: String,
    pub phase: Phase,
    pub current_question_index: usize,
    pub total_questions: usize,
    pub progress_percentage: f64,
    pub is_last_question: bool,
    pub score: u32,
    pub hearts: u32,
    pub max_hearts: u32,
    pub mistakes: u32,
    pub feedback_message: String,
    pub feedback_mood: Mood,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<QuestionView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revealed_answer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub judgement: Option<Judgement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cultural_note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub story: Option<StoryContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<CompletionSummary>,
}
