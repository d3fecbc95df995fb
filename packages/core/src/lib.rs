//! # nysh-core - lesson engine for the NYSH Farsi course
//!
//! Pure Rust, no I/O beyond optionally reading a content file:
//!
//! - **Content Store** - validated, read-only lesson catalogue
//! - **Question Evaluator** - one correctness contract for every question variant
//! - **Lesson Progress State Machine** - question traversal, score, hearts,
//!   game-over and practice recovery
//!
//! ## Modules
//!
//! - [`types`] - lesson/question model and constants
//! - [`content`] - content store and lesson path cards
//! - [`evaluator`] - answer checking
//! - [`session`] - the lesson session state machine and its snapshots
//! - [`feedback`] - mascot moods and messages
//! - [`reward`] - XP, badges and the completion summary
//! - [`progress`] - home-screen XP/level stats
//! - [`events`] - notifications emitted by transitions
//!
//! ## Example
//!
//! ```rust
//! use nysh_core::{open_lesson, Answer, ContentStore, Phase};
//!
//! let store = ContentStore::builtin().unwrap();
//! let mut session = open_lesson(&store, "3").unwrap();
//! session.submit_answer(&Answer::choice("سلام")).unwrap();
//! assert_eq!(session.phase(), Phase::ShowingExplanation);
//! assert_eq!(session.score(), 1);
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod content;
pub mod evaluator;
pub mod events;
pub mod feedback;
pub mod progress;
pub mod reward;
pub mod session;
pub mod types;

// ============================================================================
// Re-exports
// ============================================================================

pub use types::*;

pub use content::{ContentError, ContentStore, LessonSummary};

pub use evaluator::{check_answer, evaluate, Answer, AnswerError, Judgement};

pub use events::LessonEvent;

pub use feedback::{Feedback, Mood, PerformanceTier};

pub use progress::{LevelProgress, UserStats};

pub use reward::{Badge, BadgeId, CompletionSummary};

pub use session::{open_lesson, Action, LessonSession, Phase, QuestionView, SessionError, SessionSnapshot};
