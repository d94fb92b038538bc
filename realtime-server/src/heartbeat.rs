use crate::{message::Frame, registry::ConnectionRegistry};
use log::{debug, error, info, trace};
use std::sync::Arc;
use std::time::Duration;
use tokio::time;
use tokio_util::sync::CancellationToken;

pub const DEFAULT_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(20);

/// Process-wide keep-alive: pushes `PIN` to every registered session on a
/// fixed period so idle connections survive proxies and load balancers.
#[derive(Debug, Clone)]
pub struct Heartbeat {
    registry: Arc<ConnectionRegistry>,
    interval: Duration,
}

impl Heartbeat {
    pub fn new(registry: Arc<ConnectionRegistry>, interval: Duration) -> Self {
        Heartbeat { registry, interval }
    }

    /// Sends one round of `PIN` frames, returns how many were queued.
    pub fn tick(&self) -> usize {
        let json = match Frame::pin().to_json() {
            Ok(json) => Arc::new(json),
            Err(error) => {
                error!("Could not serialize heartbeat: {error}");
                return 0;
            }
        };

        let sessions = self.registry.all_sessions();
        let mut sent = 0;
        for session in &sessions {
            match session.send(Arc::clone(&json)) {
                Ok(()) => sent += 1,
                Err(error) => debug!("Skipping heartbeat: {error}"),
            }
        }

        trace!("Heartbeat sent to {sent}/{} sessions", sessions.len());
        sent
    }

    /// Ticks until `shutdown` is cancelled.
    pub async fn run(self, shutdown: CancellationToken) {
        let mut interval = time::interval(self.interval);
        // The first tick of a tokio interval completes immediately.
        interval.tick().await;

        info!("Heartbeat running every {:?}", self.interval);
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let _ = self.tick();
                }

                () = shutdown.cancelled() => {
                    info!("Heartbeat stopped");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{session_id::SessionId, user_id::UserId},
        session::session_handle::SessionHandle,
    };
    use tokio::sync::mpsc;

    fn make_handle() -> (SessionHandle, mpsc::UnboundedReceiver<Arc<String>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (SessionHandle::new(SessionId::generate(), tx), rx)
    }

    #[test]
    fn tick_reaches_all_users() {
        let registry = Arc::new(ConnectionRegistry::new());
        let (first, mut first_rx) = make_handle();
        let (second, mut second_rx) = make_handle();
        let _a = registry.register(UserId(1), first);
        let _b = registry.register(UserId(2), second);

        let heartbeat = Heartbeat::new(Arc::clone(&registry), DEFAULT_HEARTBEAT_INTERVAL);
        assert_eq!(heartbeat.tick(), 2);
        assert_eq!(first_rx.try_recv().unwrap().as_str(), r#"{"action":"PIN"}"#);
        assert_eq!(second_rx.try_recv().unwrap().as_str(), r#"{"action":"PIN"}"#);
    }

    #[test]
    fn tick_skips_dead_sessions() {
        let registry = Arc::new(ConnectionRegistry::new());
        let (dead, dead_rx) = make_handle();
        let (alive, mut alive_rx) = make_handle();
        let _a = registry.register(UserId(1), dead);
        let _b = registry.register(UserId(1), alive);
        drop(dead_rx);

        let heartbeat = Heartbeat::new(Arc::clone(&registry), DEFAULT_HEARTBEAT_INTERVAL);
        assert_eq!(heartbeat.tick(), 1);
        assert!(alive_rx.try_recv().is_ok());
    }

    #[test]
    fn empty_registry_tick() {
        let heartbeat = Heartbeat::new(Arc::new(ConnectionRegistry::new()), DEFAULT_HEARTBEAT_INTERVAL);
        assert_eq!(heartbeat.tick(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn run_ticks_on_period_until_cancelled() {
        let registry = Arc::new(ConnectionRegistry::new());
        let (handle, mut rx) = make_handle();
        let _registration = registry.register(UserId(1), handle);

        let shutdown = CancellationToken::new();
        let heartbeat = Heartbeat::new(Arc::clone(&registry), Duration::from_secs(20));
        let task = tokio::spawn(heartbeat.run(shutdown.clone()));

        time::sleep(Duration::from_secs(41)).await;
        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());

        shutdown.cancel();
        task.await.unwrap();
    }
}
