//! In-memory quiz sessions keyed by session id.
//!
//! Entries idle for longer than the configured timeout are pruned whenever
//! the store is touched, so abandoned attempts do not accumulate.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use quiz_core::QuizSession;
use uuid::Uuid;

struct SessionEntry {
    session: QuizSession,
    touched_at: DateTime<Utc>,
}

pub struct SessionStore {
    entries: HashMap<Uuid, SessionEntry>,
    idle_timeout: Duration,
}

impl SessionStore {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            idle_timeout,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove a session for mutation; put it back with [`SessionStore::insert`].
    pub fn take(&mut self, id: &Uuid, now: DateTime<Utc>) -> Option<QuizSession> {
        self.prune(now);
        self.entries.remove(id).map(|entry| entry.session)
    }

    pub fn get(&mut self, id: &Uuid, now: DateTime<Utc>) -> Option<&QuizSession> {
        self.get_mut(id, now).map(|session| &*session)
    }

    pub fn get_mut(&mut self, id: &Uuid, now: DateTime<Utc>) -> Option<&mut QuizSession> {
        self.prune(now);
        self.entries.get_mut(id).map(|entry| {
            entry.touched_at = now;
            &mut entry.session
        })
    }

    pub fn insert(&mut self, id: Uuid, session: QuizSession, now: DateTime<Utc>) {
        self.entries.insert(
            id,
            SessionEntry {
                session,
                touched_at: now,
            },
        );
    }

    pub fn remove(&mut self, id: &Uuid) -> Option<QuizSession> {
        self.entries.remove(id).map(|entry| entry.session)
    }

    /// Drop sessions idle past the timeout. Returns how many were dropped.
    pub fn prune(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        let cutoff = now - self.idle_timeout;
        self.entries.retain(|_, entry| entry.touched_at > cutoff);

        let pruned = before - self.entries.len();
        if pruned > 0 {
            tracing::debug!(pruned, remaining = self.entries.len(), "pruned idle quiz sessions");
        }
        pruned
    }
}
