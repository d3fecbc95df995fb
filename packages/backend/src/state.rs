use std::sync::Arc;
use std::time::{Instant, SystemTime};

use nysh_core::ContentStore;

use crate::core::EventBus;
use crate::services::progress::ProgressTracker;
use crate::services::session_registry::SessionRegistry;

#[derive(Clone)]
pub struct AppState {
    started_at: Instant,
    started_at_system: SystemTime,
    content: Arc<ContentStore>,
    sessions: Arc<SessionRegistry>,
    progress: Arc<ProgressTracker>,
    event_bus: Arc<EventBus>,
}

impl AppState {
    pub fn new(content: ContentStore, max_active_sessions: usize) -> Self {
        Self {
            started_at: Instant::now(),
            started_at_system: SystemTime::now(),
            content: Arc::new(content),
            sessions: Arc::new(SessionRegistry::new(max_active_sessions)),
            progress: Arc::new(ProgressTracker::default()),
            event_bus: Arc::new(EventBus::new()),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    pub fn started_at_system(&self) -> SystemTime {
        self.started_at_system
    }

    pub fn content(&self) -> Arc<ContentStore> {
        Arc::clone(&self.content)
    }

    pub fn sessions(&self) -> Arc<SessionRegistry> {
        Arc::clone(&self.sessions)
    }

    pub fn progress(&self) -> Arc<ProgressTracker> {
        Arc::clone(&self.progress)
    }

    pub fn event_bus(&self) -> Arc<EventBus> {
        Arc::clone(&self.event_bus)
    }
}
