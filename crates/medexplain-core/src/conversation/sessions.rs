//! Per-user conversation contexts keyed by session id.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::context::ConversationContext;

/// Owns one [`ConversationContext`] per session so users never share
/// follow-up state.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<Uuid, ConversationContext>,
    timeout_secs: Option<u64>,
    capacity: Option<usize>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry whose new contexts use the given limits.
    pub fn with_limits(timeout_secs: u64, capacity: usize) -> Self {
        Self {
            sessions: HashMap::new(),
            timeout_secs: Some(timeout_secs),
            capacity: Some(capacity),
        }
    }

    /// Open a new session and return its id.
    pub fn create(&mut self) -> Uuid {
        let id = Uuid::new_v4();
        let context = match (self.timeout_secs, self.capacity) {
            (Some(timeout), Some(capacity)) => ConversationContext::with_limits(timeout, capacity),
            _ => ConversationContext::new(),
        };
        self.sessions.insert(id, context);
        tracing::debug!(session = %id, "session created");
        id
    }

    pub fn get(&self, id: &Uuid) -> Option<&ConversationContext> {
        self.sessions.get(id)
    }

    pub fn get_mut(&mut self, id: &Uuid) -> Option<&mut ConversationContext> {
        self.sessions.get_mut(id)
    }

    pub fn remove(&mut self, id: &Uuid) -> Option<ConversationContext> {
        self.sessions.remove(id)
    }

    /// Drop sessions with no live context. Returns how many were removed.
    pub fn prune_expired(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, ctx| ctx.is_active_at(now));
        let removed = before - self.sessions.len();
        if removed > 0 {
            tracing::debug!(removed, "pruned expired sessions");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
