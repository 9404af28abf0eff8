use chrono::{DateTime, Duration as ChronoDuration, Utc};
use dashmap::DashMap;
use rand::RngCore;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

const TOKEN_BYTES: usize = 32;

/// Server-side record of a logged-in browser
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// In-memory session table keyed by the opaque cookie token.
///
/// Sessions do not survive a restart.
#[derive(Debug, Clone)]
pub struct SessionStore {
    sessions: Arc<DashMap<String, Session>>,
    ttl: ChronoDuration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        let ttl = ChronoDuration::from_std(ttl).unwrap_or_else(|_| ChronoDuration::hours(24));
        Self {
            sessions: Arc::new(DashMap::new()),
            ttl,
        }
    }

    /// Starts a session and returns its token.
    pub fn create(&self, user_id: Uuid) -> String {
        let mut bytes = [0u8; TOKEN_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        let token = hex::encode(bytes);

        let now = Utc::now();
        self.sessions.insert(
            token.clone(),
            Session {
                user_id,
                created_at: now,
                expires_at: now + self.ttl,
            },
        );
        token
    }

    /// Looks up a live session; an expired one is dropped on sight.
    pub fn get(&self, token: &str) -> Option<Session> {
        let now = Utc::now();
        let session = self.sessions.get(token).map(|entry| entry.value().clone())?;
        if session.is_expired_at(now) {
            self.sessions.remove(token);
            return None;
        }
        Some(session)
    }

    pub fn destroy(&self, token: &str) -> bool {
        self.sessions.remove(token).is_some()
    }

    /// Drops every session belonging to a user, e.g. after a password change.
    pub fn destroy_for_user(&self, user_id: Uuid, keep: Option<&str>) -> usize {
        let mut removed = 0;
        self.sessions.retain(|token, session| {
            let kept = session.user_id != user_id || Some(token.as_str()) == keep;
            if !kept {
                removed += 1;
            }
            kept
        });
        removed
    }

    /// Removes expired sessions and returns how many were dropped.
    pub fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut purged = 0;
        self.sessions.retain(|_, session| {
            let expired = session.is_expired_at(now);
            if expired {
                purged += 1;
            }
            !expired
        });
        if purged > 0 {
            debug!(purged, "Purged expired sessions");
        }
        purged
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Spawns the periodic purge task.
    pub fn spawn_sweeper(&self, every: Duration) -> tokio::task::JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            loop {
                interval.tick().await;
                store.purge_expired();
            }
        })
    }
}
