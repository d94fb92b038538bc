use crate::{
    models::{session_id::SessionId, user_id::UserId},
    session::session_handle::SessionHandle,
};
use log::{debug, trace};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

type Buckets = HashMap<UserId, HashMap<SessionId, SessionHandle>>;

/// Live, authenticated sessions grouped by user.
///
/// The lock is never held across an `.await` or a send: readers copy the
/// handles they need and release it before touching any session.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    buckets: RwLock<Buckets>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        ConnectionRegistry::default()
    }

    /// Adds `session` under `user_id`. Dropping the returned guard removes it
    /// again.
    ///
    /// Registering a session that is already present leaves the existing
    /// entry alone and returns an inert guard: only the first registration
    /// owns the entry.
    pub fn register(self: &Arc<Self>, user_id: UserId, session: SessionHandle) -> Registration {
        let session_id = session.id.clone();
        let owned = {
            let mut buckets = self.buckets.write();
            let bucket = buckets.entry(user_id).or_default();
            if bucket.contains_key(&session_id) {
                trace!("Session {session_id} was already registered for user {user_id}");
                false
            } else {
                bucket.insert(session_id.clone(), session);
                debug!(
                    "Registered session {session_id} for user {user_id} ({} open)",
                    bucket.len()
                );
                true
            }
        };

        Registration {
            registry: Arc::clone(self),
            user_id,
            session_id: owned.then_some(session_id),
        }
    }

    /// Removes `session_id` from `user_id`'s set. Unknown users or sessions
    /// are ignored.
    pub fn deregister(&self, user_id: UserId, session_id: &SessionId) {
        let mut buckets = self.buckets.write();
        let Some(bucket) = buckets.get_mut(&user_id) else {
            return;
        };

        if bucket.remove(session_id).is_some() {
            debug!(
                "Deregistered session {session_id} for user {user_id} ({} open)",
                bucket.len()
            );
        }

        if bucket.is_empty() {
            buckets.remove(&user_id);
        }
    }

    /// Snapshot of `user_id`'s sessions, safe to iterate while others
    /// register or deregister.
    pub fn sessions_for(&self, user_id: UserId) -> Vec<SessionHandle> {
        self.buckets
            .read()
            .get(&user_id)
            .map(|bucket| bucket.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Snapshot of every registered session.
    pub fn all_sessions(&self) -> Vec<SessionHandle> {
        self.buckets
            .read()
            .values()
            .flat_map(|bucket| bucket.values().cloned())
            .collect()
    }

    pub fn user_count(&self) -> usize {
        self.buckets.read().len()
    }

    pub fn session_count(&self) -> usize {
        self.buckets.read().values().map(HashMap::len).sum()
    }
}

/// Proof that a session is registered. Deregisters exactly once, either
/// through [`Registration::release`] or on drop. A guard handed out for a
/// duplicate registration owns nothing and does nothing.
#[derive(Debug)]
pub struct Registration {
    registry: Arc<ConnectionRegistry>,
    user_id: UserId,
    session_id: Option<SessionId>,
}

impl Registration {
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn release(mut self) {
        self.deregister();
    }

    fn deregister(&mut self) {
        if let Some(session_id) = self.session_id.take() {
            self.registry.deregister(self.user_id, &session_id);
        }
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        self.deregister();
    }
}
