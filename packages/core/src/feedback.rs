//! Mascot feedback
//!
//! The lion mascot reacts to every transition with a mood and a short message.
//! Completion uses score-percentage tiers with fixed breakpoints at 100, 80 and 60.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Encouraging,
    Celebrating,
    Questioning,
    Sad,
}

/// What the mascot is currently saying
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub message: String,
    pub mood: Mood,
}

impl Feedback {
    pub fn new(message: impl Into<String>, mood: Mood) -> Self {
        Self {
            message: message.into(),
            mood,
        }
    }

    /// Shown when question `index` (zero-based) comes up
    pub fn question(index: usize, prompt: &str) -> Self {
        Self::new(format!("Question {}: {prompt}", index + 1), Mood::Questioning)
    }

    pub fn correct(explanation: &str) -> Self {
        Self::new(format!("Excellent! 🎉 {explanation}"), Mood::Celebrating)
    }

    /// `hearts_before` is the count prior to losing one for this answer
    pub fn incorrect(explanation: &str, hearts_before: u32) -> Self {
        let mood = if hearts_before <= 1 {
            Mood::Sad
        } else {
            Mood::Encouraging
        };
        Self::new(
            format!("Not quite right, but keep trying! 💪 {explanation}"),
            mood,
        )
    }

    pub fn game_over() -> Self {
        Self::new("Don't give up! Practice makes perfect! 💪", Mood::Encouraging)
    }

    pub fn hearts_restored() -> Self {
        Self::new(
            "Great! You've earned more hearts. Let's continue! 🦁",
            Mood::Happy,
        )
    }
}

/// Completion tier derived from the score percentage
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PerformanceTier {
    Perfect,
    Excellent,
    Good,
    KeepPracticing,
}

impl PerformanceTier {
    /// Integer comparisons keep the 100/80/60 breakpoints exact
    pub fn from_score(score: u32, total: u32) -> Self {
        let scaled = u64::from(score) * 100;
        let total = u64::from(total);
        if total > 0 && scaled == total * 100 {
            Self::Perfect
        } else if scaled >= total * 80 {
            Self::Excellent
        } else if scaled >= total * 60 {
            Self::Good
        } else {
            Self::KeepPracticing
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::Perfect => "Perfect! You're a star! 🌟",
            Self::Excellent => "Excellent work! 🎉",
            Self::Good => "Good job! Keep it up! 💪",
            Self::KeepPracticing => "Nice try! Practice makes perfect! 📚",
        }
    }

    /// Mascot mood on the completion screen
    pub fn mood(&self) -> Mood {
        match self {
            Self::Perfect | Self::Excellent => Mood::Celebrating,
            Self::Good => Mood::Encouraging,
            Self::KeepPracticing => Mood::Happy,
        }
    }
}

/// `round(score / total * 100)`, zero for an empty lesson
pub fn score_percentage(score: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    ((f64::from(score) / f64::from(total)) * 100.0).round() as u32
}
