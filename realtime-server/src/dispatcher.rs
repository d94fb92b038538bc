use crate::{message::Frame, models::user_id::UserId, registry::ConnectionRegistry};
use log::{debug, trace, warn};
use std::sync::Arc;

/// Entry point for every service that needs to notify a user in realtime.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<ConnectionRegistry>,
}

impl Dispatcher {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Dispatcher { registry }
    }

    /// Sends `event` to every session currently registered for `user_id`
    /// and returns how many sessions it was queued for.
    ///
    /// Best effort: an offline user gets nothing, a dead session is logged
    /// and skipped, nothing is retried.
    pub fn deliver(&self, user_id: UserId, event: &Frame) -> usize {
        let sessions = self.registry.sessions_for(user_id);
        if sessions.is_empty() {
            trace!("No open session for user {user_id}, dropping {}", event.action);
            return 0;
        }

        let json = match event.to_json() {
            Ok(json) => Arc::new(json),
            Err(error) => {
                warn!("Could not serialize {} for user {user_id}: {error}", event.action);
                return 0;
            }
        };

        let mut delivered = 0;
        for session in &sessions {
            match session.send(Arc::clone(&json)) {
                Ok(()) => delivered += 1,
                Err(error) => warn!("Could not deliver {} to user {user_id}: {error}", event.action),
            }
        }

        debug!(
            "Delivered {} to {delivered}/{} sessions of user {user_id}",
            event.action,
            sessions.len()
        );
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        message::CONVERSATION_SEND_MESS,
        models::session_id::SessionId,
        session::session_handle::SessionHandle,
    };
    use serde_json::json;
    use tokio::sync::mpsc;

    fn make_handle() -> (SessionHandle, mpsc::UnboundedReceiver<Arc<String>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (SessionHandle::new(SessionId::generate(), tx), rx)
    }

    fn event() -> Frame {
        Frame::new(CONVERSATION_SEND_MESS, json!({ "id": 7, "text": "woof" }))
    }

    #[test]
    fn offline_user_is_noop() {
        let dispatcher = Dispatcher::new(Arc::new(ConnectionRegistry::new()));
        assert_eq!(dispatcher.deliver(UserId(1), &event()), 0);
    }

    #[test]
    fn reaches_every_session_of_the_user_once() {
        let registry = Arc::new(ConnectionRegistry::new());
        let dispatcher = Dispatcher::new(Arc::clone(&registry));
        let (phone, mut phone_rx) = make_handle();
        let (laptop, mut laptop_rx) = make_handle();
        let (stranger, mut stranger_rx) = make_handle();
        let _a = registry.register(UserId(1), phone);
        let _b = registry.register(UserId(1), laptop);
        let _c = registry.register(UserId(2), stranger);

        assert_eq!(dispatcher.deliver(UserId(1), &event()), 2);

        let expected = event().to_json().unwrap();
        assert_eq!(phone_rx.try_recv().unwrap().as_str(), expected);
        assert_eq!(laptop_rx.try_recv().unwrap().as_str(), expected);
        assert!(phone_rx.try_recv().is_err());
        assert!(laptop_rx.try_recv().is_err());
        assert!(stranger_rx.try_recv().is_err());
    }

    #[test]
    fn dead_session_does_not_block_the_others() {
        let registry = Arc::new(ConnectionRegistry::new());
        let dispatcher = Dispatcher::new(Arc::clone(&registry));
        let (dead, dead_rx) = make_handle();
        let (alive, mut alive_rx) = make_handle();
        let _a = registry.register(UserId(1), dead);
        let _b = registry.register(UserId(1), alive);
        drop(dead_rx);

        assert_eq!(dispatcher.deliver(UserId(1), &event()), 1);
        assert!(alive_rx.try_recv().is_ok());
    }

    #[test]
    fn recipients_share_one_serialization() {
        let registry = Arc::new(ConnectionRegistry::new());
        let dispatcher = Dispatcher::new(Arc::clone(&registry));
        let (first, mut first_rx) = make_handle();
        let (second, mut second_rx) = make_handle();
        let _a = registry.register(UserId(1), first);
        let _b = registry.register(UserId(1), second);

        let _ = dispatcher.deliver(UserId(1), &event());

        let first = first_rx.try_recv().unwrap();
        let second = second_rx.try_recv().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }
}
