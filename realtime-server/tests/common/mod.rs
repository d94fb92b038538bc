#![allow(dead_code)]

use futures::{SinkExt, StreamExt};
use realtime_server::{
    AccountResolver, AccountStatus, CredentialVerifier, SocketConfig, SocketServer, UserId,
    errors::{credential_error::CredentialError, resolve_error::ResolveError},
};
use serde_json::{Value, json};
use std::collections::HashSet;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, tungstenite::Message};
use tokio_util::sync::CancellationToken;

pub type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub const ALICE: UserId = UserId(1);
pub const BOB: UserId = UserId(2);
pub const MALLORY: UserId = UserId(3);

/// Accepts `token-<id>`, rejects `expired` as expired and anything else as
/// invalid. `slow` hangs for a minute, like a stalled token store.
pub struct TestCredentials;

impl CredentialVerifier for TestCredentials {
    async fn verify_token(&self, token: &str) -> Result<UserId, CredentialError> {
        if token == "slow" {
            tokio::time::sleep(Duration::from_secs(60)).await;
        }

        if token == "expired" {
            return Err(CredentialError::Expired);
        }

        token
            .strip_prefix("token-")
            .and_then(|id| id.parse::<i32>().ok())
            .map(UserId)
            .ok_or(CredentialError::Invalid)
    }
}

pub struct TestAccounts {
    pub blocked: HashSet<UserId>,
}

impl AccountResolver for TestAccounts {
    async fn resolve_account(&self, user_id: UserId) -> Result<AccountStatus, ResolveError> {
        if user_id.0 > 100 {
            return Ok(AccountStatus::NotFound);
        }

        if self.blocked.contains(&user_id) {
            return Ok(AccountStatus::Blocked);
        }

        Ok(AccountStatus::Active)
    }
}

pub struct TestServer {
    pub address: SocketAddr,
    pub server: SocketServer<TestCredentials, TestAccounts>,
    pub shutdown: CancellationToken,
    pub listening: JoinHandle<()>,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

pub async fn start_server(config: SocketConfig) -> TestServer {
    let _ = env_logger::builder().is_test(true).try_init();

    let accounts = TestAccounts {
        blocked: HashSet::from([MALLORY]),
    };
    let server = SocketServer::new(TestCredentials, accounts, config);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    let shutdown = CancellationToken::new();

    let accepting = server.clone();
    let token = shutdown.clone();
    let listening = tokio::spawn(async move { accepting.listen(listener, token).await });

    TestServer {
        address,
        server,
        shutdown,
        listening,
    }
}

pub async fn connect(address: SocketAddr) -> Client {
    let (client, _) = tokio_tungstenite::connect_async(format!("ws://{address}"))
        .await
        .unwrap();
    client
}

pub async fn send(client: &mut Client, frame: Value) {
    client
        .send(Message::text(frame.to_string()))
        .await
        .unwrap();
}

pub async fn send_binary(client: &mut Client, bytes: Vec<u8>) {
    client.send(Message::binary(bytes)).await.unwrap();
}

pub async fn send_connect(client: &mut Client, token: &str) {
    send(
        client,
        json!({ "action": "CONNECT_SOCKET", "data": format!("Bearer {token}") }),
    )
    .await;
}

/// Next JSON frame, or `None` if nothing arrives within `wait` or the
/// server closed the connection.
pub async fn next_frame_within(client: &mut Client, wait: Duration) -> Option<Value> {
    let deadline = tokio::time::Instant::now() + wait;
    loop {
        let received = tokio::time::timeout_at(deadline, client.next()).await.ok()??;
        match received {
            Ok(Message::Text(text)) => return serde_json::from_str(text.as_str()).ok(),
            Ok(Message::Close(_)) | Err(_) => return None,
            Ok(_) => continue,
        }
    }
}

pub async fn next_frame(client: &mut Client) -> Option<Value> {
    next_frame_within(client, Duration::from_secs(2)).await
}

/// Whether the server closes the connection within `wait` without sending
/// any application frame first.
pub async fn closed_by_server(client: &mut Client, wait: Duration) -> bool {
    let deadline = tokio::time::Instant::now() + wait;
    loop {
        match tokio::time::timeout_at(deadline, client.next()).await {
            Err(_) => return false,
            Ok(None) | Ok(Some(Err(_))) | Ok(Some(Ok(Message::Close(_)))) => return true,
            Ok(Some(Ok(Message::Text(_)))) => return false,
            Ok(Some(Ok(_))) => continue,
        }
    }
}

/// Connects and authenticates as `user_id`, returning once the handshake
/// acknowledgement arrived. Frames delivered ahead of the ack are skipped.
pub async fn authenticate(address: SocketAddr, user_id: UserId) -> Client {
    let mut client = connect(address).await;
    send_connect(&mut client, &format!("token-{}", user_id.0)).await;

    loop {
        let frame = next_frame(&mut client).await.unwrap();
        if frame["action"] == "STATUS_SOCKET" {
            assert_eq!(frame["data"], json!({ "messages": "success" }));
            return client;
        }
    }
}

/// Polls `condition` until it holds, panicking after two seconds.
pub async fn eventually(mut condition: impl FnMut() -> bool) {
    for _ in 0..200 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    panic!("condition not reached in time");
}
