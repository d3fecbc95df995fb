//! Common Types and Constants
//!
//! Lesson content model shared by the content store, the evaluator and the
//! session state machine.

use serde::{Deserialize, Serialize};

// ==================== Constants ====================

/// Hearts a learner starts every lesson with
pub const MAX_HEARTS: u32 = 5;

/// Questions played from a story lesson
pub const STORY_QUESTION_CAP: usize = 5;

/// Questions played from any other lesson
pub const DEFAULT_QUESTION_CAP: usize = 10;

/// XP awarded per correct answer at completion
pub const XP_PER_CORRECT: u32 = 25;

// ==================== Enumerations ====================

/// Lesson flavour, drives the question cap and the path-browser decoration
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LessonType {
    Alphabet,
    Regular,
    Story,
    Grammar,
    Culture,
}

impl LessonType {
    /// Capitalised name shown in lesson headers ("Story", "Grammar", ...)
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Alphabet => "Alphabet",
            Self::Regular => "Regular",
            Self::Story => "Story",
            Self::Grammar => "Grammar",
            Self::Culture => "Culture",
        }
    }

    pub fn max_questions(&self) -> usize {
        match self {
            Self::Story => STORY_QUESTION_CAP,
            _ => DEFAULT_QUESTION_CAP,
        }
    }
}

/// CEFR proficiency level
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CefrLevel {
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
}

impl CefrLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A1 => "A1",
            Self::A2 => "A2",
            Self::B1 => "B1",
            Self::B2 => "B2",
            Self::C1 => "C1",
            Self::C2 => "C2",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    MultipleChoice,
    Translation,
    Listening,
    SentenceBuilding,
    AudioMatch,
    AlphabetSound,
}

impl QuestionType {
    /// Whether the learner answers by arranging word chips instead of picking an option
    pub fn is_arrangement(&self) -> bool {
        matches!(self, Self::SentenceBuilding)
    }
}

// ==================== Content ====================

/// A single gradeable prompt
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    /// Prompt text
    pub question: String,
    /// Candidate answers in display order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    pub correct_answer: String,
    pub explanation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    /// Word chips, sentence-building only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub words: Option<Vec<String>>,
    /// Indices into `words` in the expected order, sentence-building only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_order: Option<Vec<usize>>,
    /// Letter shown on alphabet cards
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub letter: Option<String>,
    /// Sound the alphabet letter makes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sound: Option<String>,
}

/// Narrative attached to story lessons
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryContent {
    pub title: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
    /// Excerpt read aloud by the audio player
    pub audio_text: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub lesson_type: LessonType,
    pub level: CefrLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub story: Option<StoryContent>,
    pub questions: Vec<Question>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cultural_note: Option<String>,
}

impl Lesson {
    /// `min(len(questions), cap for the lesson type)`
    pub fn effective_question_count(&self) -> usize {
        self.questions.len().min(self.lesson_type.max_questions())
    }

    /// The questions actually played, in authoring order
    pub fn played_questions(&self) -> &[Question] {
        &self.questions[..self.effective_question_count()]
    }

    /// Header label such as "Story • A1"
    pub fn type_label(&self) -> String {
        format!("{} • {}", self.lesson_type.display_name(), self.level.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lesson(lesson_type: LessonType, question_count: usize) -> Lesson {
        Lesson {
            id: "l".to_string(),
            title: "Lesson".to_string(),
            lesson_type,
            level: CefrLevel::A1,
            description: None,
            story: None,
            questions: (0..question_count)
                .map(|i| Question {
                    id: i.to_string(),
                    question_type: QuestionType::MultipleChoice,
                    question: format!("q{i}"),
                    options: Some(vec!["a".to_string(), "b".to_string()]),
                    correct_answer: "a".to_string(),
                    explanation: String::new(),
                    audio_url: None,
                    words: None,
                    correct_order: None,
                    letter: None,
                    sound: None,
                })
                .collect(),
            cultural_note: None,
        }
    }

    #[test]
    fn test_story_lessons_are_capped_at_five() {
        assert_eq!(lesson(LessonType::Story, 8).effective_question_count(), 5);
        assert_eq!(lesson(LessonType::Story, 3).effective_question_count(), 3);
    }

    #[test]
    fn test_other_lessons_are_capped_at_ten() {
        assert_eq!(lesson(LessonType::Regular, 12).effective_question_count(), 10);
        assert_eq!(lesson(LessonType::Grammar, 5).effective_question_count(), 5);
        assert_eq!(lesson(LessonType::Regular, 12).played_questions().len(), 10);
    }

    #[test]
    fn test_question_type_wire_names() {
        let parsed: QuestionType = serde_json::from_str("\"sentence-building\"").unwrap();
        assert_eq!(parsed, QuestionType::SentenceBuilding);
        assert_eq!(
            serde_json::to_string(&QuestionType::AudioMatch).unwrap(),
            "\"audio-match\""
        );
    }

    #[test]
    fn test_type_label() {
        let mut story = lesson(LessonType::Story, 1);
        story.level = CefrLevel::A2;
        assert_eq!(story.type_label(), "Story • A2");
    }
}
