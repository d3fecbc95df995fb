use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, info, warn};

use nysh_core::{
    open_lesson, Answer, ContentStore, LessonEvent, LessonSession, SessionError, SessionSnapshot,
};

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("lesson session {0} not found")]
    NotFound(String),
    #[error("too many active lesson sessions (limit {0})")]
    Full(usize),
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Result of a transition: the new view plus what it emitted
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUpdate {
    pub session_id: String,
    #[serde(flatten)]
    pub snapshot: SessionSnapshot,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<LessonEvent>,
    /// Completed sessions dropped to make room for this one
    #[serde(skip)]
    pub evicted: Vec<String>,
}

struct ActiveSession {
    session: LessonSession,
    opened_at: DateTime<Utc>,
}

/// In-memory set of running lesson sessions keyed by a generated id
pub struct SessionRegistry {
    sessions: Mutex<HashMap<String, ActiveSession>>,
    capacity: usize,
}

impl SessionRegistry {
    pub fn new(capacity: usize) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    pub fn open(&self, store: &ContentStore, lesson_id: &str) -> Result<SessionUpdate, RegistryError> {
        let session = open_lesson(store, lesson_id)?;
        let session_id = uuid::Uuid::new_v4().to_string();
        let snapshot = session.snapshot();
        let events = vec![session.question_presented()];

        let mut sessions = self.sessions.lock();
        let mut evicted = Vec::new();
        if sessions.len() >= self.capacity {
            // Finished sessions are only kept for review, so they go first
            evicted = sessions
                .iter()
                .filter(|(_, active)| active.session.is_completed())
                .map(|(id, _)| id.clone())
                .collect();
            for id in &evicted {
                sessions.remove(id);
            }
            if sessions.len() >= self.capacity {
                warn!(capacity = self.capacity, lesson_id = lesson_id, "lesson session limit reached");
                return Err(RegistryError::Full(self.capacity));
            }
        }
        sessions.insert(
            session_id.clone(),
            ActiveSession {
                session,
                opened_at: Utc::now(),
            },
        );

        info!(
            session_id = %session_id,
            lesson_id = lesson_id,
            evicted = evicted.len(),
            "lesson session started"
        );

        Ok(SessionUpdate {
            session_id,
            snapshot,
            events,
            evicted,
        })
    }

    pub fn snapshot(&self, session_id: &str) -> Result<SessionSnapshot, RegistryError> {
        let sessions = self.sessions.lock();
        sessions
            .get(session_id)
            .map(|active| active.session.snapshot())
            .ok_or_else(|| RegistryError::NotFound(session_id.to_string()))
    }

    /// Current view without emitting anything
    pub fn view(&self, session_id: &str) -> Result<SessionUpdate, RegistryError> {
        Ok(SessionUpdate {
            session_id: session_id.to_string(),
            snapshot: self.snapshot(session_id)?,
            events: Vec::new(),
            evicted: Vec::new(),
        })
    }

    pub fn submit_answer(&self, session_id: &str, answer: &Answer) -> Result<SessionUpdate, RegistryError> {
        self.transition(session_id, |session| session.submit_answer(answer))
    }

    pub fn advance(&self, session_id: &str) -> Result<SessionUpdate, RegistryError> {
        self.transition(session_id, LessonSession::advance)
    }

    pub fn practice_recover(&self, session_id: &str) -> Result<SessionUpdate, RegistryError> {
        self.transition(session_id, LessonSession::practice_recover)
    }

    pub fn remove(&self, session_id: &str) -> Result<(), RegistryError> {
        let removed = self.sessions.lock().remove(session_id);
        match removed {
            Some(active) => {
                let age = Utc::now() - active.opened_at;
                debug!(
                    session_id = session_id,
                    lesson_id = %active.session.lesson().id,
                    age_secs = age.num_seconds(),
                    "lesson session closed"
                );
                Ok(())
            }
            None => Err(RegistryError::NotFound(session_id.to_string())),
        }
    }

    pub fn contains(&self, session_id: &str) -> bool {
        self.sessions.lock().contains_key(session_id)
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn transition<F>(&self, session_id: &str, apply: F) -> Result<SessionUpdate, RegistryError>
    where
        F: FnOnce(&mut LessonSession) -> Result<Vec<LessonEvent>, SessionError>,
    {
        let mut sessions = self.sessions.lock();
        let active = sessions
            .get_mut(session_id)
            .ok_or_else(|| RegistryError::NotFound(session_id.to_string()))?;

        let events = apply(&mut active.session)?;

        Ok(SessionUpdate {
            session_id: session_id.to_string(),
            snapshot: active.session.snapshot(),
            events,
            evicted: Vec::new(),
        })
    }
}
