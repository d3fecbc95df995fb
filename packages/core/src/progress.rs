//! Home-screen progress stats. Held in memory only.

use serde::{Deserialize, Serialize};

use crate::reward::CompletionSummary;

pub const XP_PER_LEVEL: u32 = 300;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub xp: u32,
    pub level: u32,
    /// Consecutive days with a finished lesson
    pub streak: u32,
    pub badges: Vec<String>,
}

impl Default for UserStats {
    /// The demo learner shown on first launch
    fn default() -> Self {
        Self {
            xp: 1250,
            level: 5,
            streak: 7,
            badges: vec![
                "first-lesson".to_string(),
                "week-streak".to_string(),
                "grammar-master".to_string(),
            ],
        }
    }
}

impl UserStats {
    /// Adds the earned XP and records a newly earned badge once.
    /// Returns true when the level went up.
    pub fn apply_completion(&mut self, summary: &CompletionSummary) -> bool {
        let previous_level = self.level;
        self.xp = self.xp.saturating_add(summary.xp_earned);
        self.level = level_for_xp(self.xp).max(self.level);

        if let Some(badge) = summary.badge {
            if !self.badges.iter().any(|b| b == badge.as_str()) {
                self.badges.push(badge.as_str().to_string());
            }
        }

        self.level > previous_level
    }

    pub fn level_progress(&self) -> LevelProgress {
        LevelProgress::new(self.xp, self.level)
    }
}

pub fn level_for_xp(xp: u32) -> u32 {
    xp / XP_PER_LEVEL + 1
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelProgress {
    pub level: u32,
    pub next_level: u32,
    pub xp: u32,
    pub current_level_xp: u32,
    pub xp_to_next_level: u32,
    pub progress_percentage: f64,
}

impl LevelProgress {
    pub fn new(xp: u32, level: u32) -> Self {
        let current_level_xp = xp % XP_PER_LEVEL;
        Self {
            level,
            next_level: level + 1,
            xp,
            current_level_xp,
            xp_to_next_level: XP_PER_LEVEL - current_level_xp,
            progress_percentage: f64::from(current_level_xp) / f64::from(XP_PER_LEVEL) * 100.0,
        }
    }
}
