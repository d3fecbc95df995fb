//! XP and badge rewards handed to the lesson-complete screen.

use serde::{Deserialize, Serialize};

use crate::feedback::{score_percentage, Mood, PerformanceTier};
use crate::types::{Lesson, XP_PER_CORRECT};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BadgeId {
    PerfectScore,
    FirstLesson,
    GrammarMaster,
}

impl BadgeId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PerfectScore => "perfect-score",
            Self::FirstLesson => "first-lesson",
            Self::GrammarMaster => "grammar-master",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "perfect-score" => Some(Self::PerfectScore),
            "first-lesson" => Some(Self::FirstLesson),
            "grammar-master" => Some(Self::GrammarMaster),
            _ => None,
        }
    }

    pub fn details(&self) -> Badge {
        match self {
            Self::PerfectScore => Badge {
                id: *self,
                name: "Perfect Score",
                description: "Got every question right!",
                icon: "🏆",
            },
            Self::FirstLesson => Badge {
                id: *self,
                name: "First Steps",
                description: "Completed your first lesson",
                icon: "🌟",
            },
            Self::GrammarMaster => Badge {
                id: *self,
                name: "Grammar Master",
                description: "Completed a grammar lesson",
                icon: "📚",
            },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub id: BadgeId,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
}

pub fn badge_catalog() -> Vec<Badge> {
    [BadgeId::PerfectScore, BadgeId::FirstLesson, BadgeId::GrammarMaster]
        .iter()
        .map(BadgeId::details)
        .collect()
}

pub fn xp_for_score(score: u32) -> u32 {
    score * XP_PER_CORRECT
}

/// Only a flawless run earns a badge
pub fn badge_for_score(score: u32, total: u32) -> Option<BadgeId> {
    (score == total).then_some(BadgeId::PerfectScore)
}

/// Final tally of a completed session
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionSummary {
    pub lesson_id: String,
    pub lesson_title: String,
    pub score: u32,
    /// The effective question count of the lesson
    pub total_questions: u32,
    pub xp_earned: u32,
    pub badge: Option<BadgeId>,
    pub score_percentage: u32,
    pub performance: PerformanceTier,
    pub message: &'static str,
    pub mood: Mood,
}

impl CompletionSummary {
    pub fn new(lesson: &Lesson, score: u32) -> Self {
        let total = u32::try_from(lesson.effective_question_count()).unwrap_or(u32::MAX);
        let performance = PerformanceTier::from_score(score, total);
        Self {
            lesson_id: lesson.id.clone(),
            lesson_title: lesson.title.clone(),
            score,
            total_questions: total,
            xp_earned: xp_for_score(score),
            badge: badge_for_score(score, total),
            score_percentage: score_percentage(score, total),
            performance,
            message: performance.message(),
            mood: performance.mood(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xp_is_flat_per_correct_answer() {
        assert_eq!(xp_for_score(0), 0);
        assert_eq!(xp_for_score(5), 125);
        assert_eq!(xp_for_score(10), 250);
    }

    #[test]
    fn test_badge_only_for_perfect_score() {
        assert_eq!(badge_for_score(5, 5), Some(BadgeId::PerfectScore));
        assert_eq!(badge_for_score(4, 5), None);
        assert_eq!(badge_for_score(0, 5), None);
    }

    #[test]
    fn test_badge_ids_round_trip_through_wire_names() {
        for badge in badge_catalog() {
            assert_eq!(BadgeId::parse(badge.id.as_str()), Some(badge.id));
            let json = serde_json::to_string(&badge.id).unwrap();
            assert_eq!(json, format!("\"{}\"", badge.id.as_str()));
        }
        assert_eq!(BadgeId::parse("week-streak"), None);
    }
}
