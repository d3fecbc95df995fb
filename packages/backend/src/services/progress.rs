use parking_lot::RwLock;
use serde::Serialize;
use tracing::info;

use nysh_core::{CompletionSummary, LevelProgress, UserStats};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressView {
    #[serde(flatten)]
    pub stats: UserStats,
    pub level_progress: LevelProgress,
}

/// Learner stats shown on the home screen, kept for the life of the process
pub struct ProgressTracker {
    stats: RwLock<UserStats>,
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new(UserStats::default())
    }
}

impl ProgressTracker {
    pub fn new(stats: UserStats) -> Self {
        Self {
            stats: RwLock::new(stats),
        }
    }

    pub fn view(&self) -> ProgressView {
        let stats = self.stats.read().clone();
        let level_progress = stats.level_progress();
        ProgressView {
            stats,
            level_progress,
        }
    }

    pub fn record_completion(&self, summary: &CompletionSummary) -> bool {
        let mut stats = self.stats.write();
        let leveled_up = stats.apply_completion(summary);
        info!(
            lesson_id = %summary.lesson_id,
            xp_earned = summary.xp_earned,
            total_xp = stats.xp,
            level = stats.level,
            leveled_up,
            "lesson completion recorded"
        );
        leveled_up
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nysh_core::ContentStore;

    #[test]
    fn test_record_completion_updates_view() {
        let store = ContentStore::builtin().unwrap();
        let lesson = store.get_lesson("3").unwrap();
        let tracker = ProgressTracker::default();

        let before = tracker.view();
        assert_eq!(before.stats.xp, 1250);
        assert_eq!(before.level_progress.current_level_xp, 50);

        let summary = CompletionSummary::new(&lesson, 5);
        assert!(!tracker.record_completion(&summary));

        let after = tracker.view();
        assert_eq!(after.stats.xp, 1375);
        assert!(after.stats.badges.iter().any(|b| b == "perfect-score"));
        assert_eq!(after.level_progress.xp_to_next_level, 125);
    }
}
