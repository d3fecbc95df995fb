//! Content Store
//!
//! Read-only lesson registry. The built-in catalogue is authored as JSON,
//! embedded at compile time and validated once when the store is built, so the
//! session state machine never sees malformed content.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

use crate::types::{CefrLevel, Lesson, LessonType, Question};

const BUILTIN_LESSONS: &str = include_str!("../content/lessons.json");

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("failed to read lesson content: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed lesson content: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate lesson id {0}")]
    DuplicateLesson(String),
    #[error("lesson {0} has no questions")]
    EmptyLesson(String),
    #[error("lesson {lesson_id}: duplicate question id {question_id}")]
    DuplicateQuestion {
        lesson_id: String,
        question_id: String,
    },
    #[error("lesson {lesson_id}, question {question_id}: {reason}")]
    InvalidQuestion {
        lesson_id: String,
        question_id: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct ContentStore {
    lessons: Vec<Arc<Lesson>>,
    index: HashMap<String, usize>,
}

impl ContentStore {
    /// Store backed by the catalogue compiled into the crate
    pub fn builtin() -> Result<Self, ContentError> {
        Self::from_json(BUILTIN_LESSONS)
    }

    pub fn from_json(raw: &str) -> Result<Self, ContentError> {
        let lessons: Vec<Lesson> = serde_json::from_str(raw)?;
        Self::from_lessons(lessons)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ContentError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Validates every lesson and keeps them in authoring order
    pub fn from_lessons(lessons: Vec<Lesson>) -> Result<Self, ContentError> {
        let mut index = HashMap::with_capacity(lessons.len());
        for (position, lesson) in lessons.iter().enumerate() {
            validate_lesson(lesson)?;
            if index.insert(lesson.id.clone(), position).is_some() {
                return Err(ContentError::DuplicateLesson(lesson.id.clone()));
            }
        }

        tracing::debug!(lessons = lessons.len(), "lesson content loaded");

        Ok(Self {
            lessons: lessons.into_iter().map(Arc::new).collect(),
            index,
        })
    }

    /// `None` is the recoverable not-found signal
    pub fn get_lesson(&self, id: &str) -> Option<Arc<Lesson>> {
        self.index
            .get(id)
            .and_then(|&position| self.lessons.get(position))
            .cloned()
    }

    pub fn all_lessons(&self) -> &[Arc<Lesson>] {
        &self.lessons
    }

    pub fn len(&self) -> usize {
        self.lessons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lessons.is_empty()
    }

    /// Cards for the lesson path browser
    pub fn summaries(&self) -> Vec<LessonSummary> {
        self.lessons.iter().map(|l| LessonSummary::from(l.as_ref())).collect()
    }
}

fn validate_lesson(lesson: &Lesson) -> Result<(), ContentError> {
    if lesson.questions.is_empty() {
        return Err(ContentError::EmptyLesson(lesson.id.clone()));
    }

    let mut seen = HashSet::with_capacity(lesson.questions.len());
    for question in &lesson.questions {
        if !seen.insert(question.id.as_str()) {
            return Err(ContentError::DuplicateQuestion {
                lesson_id: lesson.id.clone(),
                question_id: question.id.clone(),
            });
        }
        validate_question(question).map_err(|reason| ContentError::InvalidQuestion {
            lesson_id: lesson.id.clone(),
            question_id: question.id.clone(),
            reason,
        })?;
    }

    Ok(())
}

fn validate_question(question: &Question) -> Result<(), String> {
    if question.question_type.is_arrangement() {
        let words = question
            .words
            .as_ref()
            .ok_or_else(|| "sentence-building question without words".to_string())?;
        if words.is_empty() {
            return Err("sentence-building question with no words".to_string());
        }
        let order = question
            .correct_order
            .as_ref()
            .ok_or_else(|| "sentence-building question without correctOrder".to_string())?;
        if !is_permutation(order, words.len()) {
            return Err(format!(
                "correctOrder {order:?} is not a permutation of 0..{}",
                words.len()
            ));
        }
        return Ok(());
    }

    if let Some(options) = &question.options {
        if !options.iter().any(|o| o == &question.correct_answer) {
            return Err(format!(
                "options do not contain the correct answer {:?}",
                question.correct_answer
            ));
        }
    }

    Ok(())
}

fn is_permutation(order: &[usize], len: usize) -> bool {
    if order.len() != len {
        return false;
    }
    let mut seen = vec![false; len];
    for &i in order {
        match seen.get_mut(i) {
            Some(slot) if !*slot => *slot = true,
            _ => return false,
        }
    }
    true
}

// ==================== Lesson path ====================

/// One card in the lesson path browser
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonSummary {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub lesson_type: LessonType,
    pub level: CefrLevel,
    pub meta_label: String,
    pub icon: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub question_count: usize,
    pub question_count_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cultural_note: Option<String>,
}

impl From<&Lesson> for LessonSummary {
    fn from(lesson: &Lesson) -> Self {
        let question_count = lesson.effective_question_count();
        Self {
            id: lesson.id.clone(),
            title: lesson.title.clone(),
            lesson_type: lesson.lesson_type,
            level: lesson.level,
            meta_label: format!(
                "{} • {question_count} questions",
                lesson.lesson_type.display_name()
            ),
            icon: lesson_icon(lesson.lesson_type),
            banner: lesson_banner(lesson.lesson_type),
            description: lesson.description.clone(),
            question_count,
            question_count_label: format!("{question_count} questions"),
            cultural_note: lesson.cultural_note.clone(),
        }
    }
}

pub fn lesson_icon(lesson_type: LessonType) -> &'static str {
    match lesson_type {
        LessonType::Alphabet => "🔤",
        LessonType::Regular => "📚",
        LessonType::Story => "📖",
        LessonType::Grammar => "📝",
        LessonType::Culture => "🏛️",
    }
}

pub fn lesson_banner(lesson_type: LessonType) -> Option<&'static str> {
    match lesson_type {
        LessonType::Alphabet => Some("🔤 Alphabet Learning • Letters & Sounds"),
        LessonType::Story => Some("📚 Cultural Story • Read & Answer Questions"),
        LessonType::Culture => Some("🏛️ Cultural Learning • Traditions & History"),
        LessonType::Regular | LessonType::Grammar => None,
    }
}
