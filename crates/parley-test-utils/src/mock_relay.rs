// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory relay for deterministic testing.
//!
//! `MockRelay` implements `RelayConnector` and routes each sent frame to the
//! connection of its `sent_to` user. Frames for users who are not connected
//! are held as backlog and delivered first when that user connects, like the
//! real relay does.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc, watch};

use parley_core::{
    AdapterType, Frame, HealthStatus, Identifier, ParleyError, PluginAdapter, RelayConnection,
    RelayConnector,
};

struct Peer {
    id: u64,
    tx: mpsc::UnboundedSender<String>,
}

#[derive(Default)]
struct HubState {
    online: HashMap<String, Peer>,
    backlog: HashMap<String, Vec<String>>,
    routed: Vec<String>,
    refuse_connections: bool,
    fail_sends: bool,
    next_id: u64,
}

impl HubState {
    fn route(&mut self, raw: String) {
        self.routed.push(raw.clone());
        // Unparseable frames are recorded but go nowhere.
        let Ok(frame) = Frame::decode(&raw) else {
            return;
        };
        if let Some(peer) = self.online.get(&frame.sent_to)
            && peer.tx.send(raw.clone()).is_ok()
        {
            return;
        }
        self.backlog.entry(frame.sent_to).or_default().push(raw);
    }
}

struct Shared {
    state: Mutex<HubState>,
    paused: watch::Sender<bool>,
    send_attempts: watch::Sender<usize>,
}

/// An in-process relay hub.
///
/// Fault injection:
/// - [`refuse_connections`](Self::refuse_connections): `open` fails with a connection error
/// - [`fail_sends`](Self::fail_sends): every `send` fails with a connection error
/// - [`pause_sends`](Self::pause_sends): `send` blocks until [`resume_sends`](Self::resume_sends)
/// - [`disconnect`](Self::disconnect): the relay drops a user's connection
pub struct MockRelay {
    shared: Arc<Shared>,
}

impl MockRelay {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(HubState::default()),
                paused: watch::Sender::new(false),
                send_attempts: watch::Sender::new(0),
            }),
        }
    }

    pub async fn refuse_connections(&self, refuse: bool) {
        self.shared.state.lock().await.refuse_connections = refuse;
    }

    pub async fn fail_sends(&self, fail: bool) {
        self.shared.state.lock().await.fail_sends = fail;
    }

    /// Hold every `send` after it has started until `resume_sends`.
    pub fn pause_sends(&self) {
        self.shared.paused.send_replace(true);
    }

    pub fn resume_sends(&self) {
        self.shared.paused.send_replace(false);
    }

    /// Wait until at least `count` sends have been attempted in total.
    pub async fn wait_for_send_attempts(&self, count: usize) {
        let mut rx = self.shared.send_attempts.subscribe();
        let _ = rx.wait_for(|n| *n >= count).await;
    }

    /// Close the relay side of `user`'s connection. Their `receive` drains
    /// what was already delivered and then reports end of stream.
    pub async fn disconnect(&self, user: &str) -> bool {
        self.shared.state.lock().await.online.remove(user).is_some()
    }

    /// Push a raw frame straight to `user`'s connection, bypassing routing.
    pub async fn inject(&self, user: &str, raw: &str) -> bool {
        let state = self.shared.state.lock().await;
        match state.online.get(user) {
            Some(peer) => peer.tx.send(raw.to_string()).is_ok(),
            None => false,
        }
    }

    /// Place a frame in `user`'s backlog as if it arrived while they were offline.
    pub async fn queue_offline(&self, user: &str, raw: &str) {
        self.shared
            .state
            .lock()
            .await
            .backlog
            .entry(user.to_string())
            .or_default()
            .push(raw.to_string());
    }

    /// Every frame the relay accepted, in arrival order.
    pub async fn routed_frames(&self) -> Vec<String> {
        self.shared.state.lock().await.routed.clone()
    }

    pub async fn backlog_len(&self, user: &str) -> usize {
        self.shared
            .state
            .lock()
            .await
            .backlog
            .get(user)
            .map_or(0, Vec::len)
    }

    pub async fn is_online(&self, user: &str) -> bool {
        self.shared.state.lock().await.online.contains_key(user)
    }
}

impl Default for MockRelay {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockRelay {
    fn name(&self) -> &str {
        "mock-relay"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Relay
    }

    async fn health_check(&self) -> Result<HealthStatus, ParleyError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), ParleyError> {
        self.shared.state.lock().await.online.clear();
        Ok(())
    }
}

#[async_trait]
impl RelayConnector for MockRelay {
    async fn open(&self, username: &Identifier) -> Result<Arc<dyn RelayConnection>, ParleyError> {
        let mut state = self.shared.state.lock().await;
        if state.refuse_connections {
            return Err(ParleyError::connection("mock relay refused the connection"));
        }

        let (tx, rx) = mpsc::unbounded_channel();
        for raw in state.backlog.remove(username.as_str()).unwrap_or_default() {
            let _ = tx.send(raw);
        }

        state.next_id += 1;
        let id = state.next_id;
        state
            .online
            .insert(username.as_str().to_string(), Peer { id, tx });

        Ok(Arc::new(MockConnection {
            user: username.as_str().to_string(),
            id,
            shared: Arc::clone(&self.shared),
            rx: Mutex::new(rx),
            closed: AtomicBool::new(false),
        }))
    }
}

/// One user's connection to a [`MockRelay`].
pub struct MockConnection {
    user: String,
    id: u64,
    shared: Arc<Shared>,
    rx: Mutex<mpsc::UnboundedReceiver<String>>,
    closed: AtomicBool,
}

impl MockConnection {
    pub fn user(&self) -> &str {
        &self.user
    }
}

#[async_trait]
impl RelayConnection for MockConnection {
    async fn send(&self, frame: &str) -> Result<(), ParleyError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(ParleyError::connection("mock connection is closed"));
        }

        self.shared.send_attempts.send_modify(|n| *n += 1);
        let mut gate = self.shared.paused.subscribe();
        let _ = gate.wait_for(|paused| !*paused).await;

        let mut state = self.shared.state.lock().await;
        if state.fail_sends {
            return Err(ParleyError::connection("injected send failure"));
        }
        if state.online.get(&self.user).is_none_or(|peer| peer.id != self.id) {
            return Err(ParleyError::connection("connection dropped by relay"));
        }
        state.route(frame.to_string());
        Ok(())
    }

    async fn receive(&self) -> Result<Option<String>, ParleyError> {
        if self.closed.load(Ordering::Acquire) {
            return Ok(None);
        }
        Ok(self.rx.lock().await.recv().await)
    }

    async fn close(&self) -> Result<(), ParleyError> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        let mut state = self.shared.state.lock().await;
        if state.online.get(&self.user).is_some_and(|peer| peer.id == self.id) {
            state.online.remove(&self.user);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(from: &str, to: &str, body: &str) -> String {
        Frame {
            sent_by: from.to_string(),
            sent_to: to.to_string(),
            chat_id: parley_core::chat_id(from, to),
            message: body.to_string(),
            timestamp: parley_core::types::timestamp_now(),
        }
        .encode()
        .unwrap()
    }

    fn ident(raw: &str) -> Identifier {
        Identifier::parse(raw).unwrap()
    }

    #[tokio::test]
    async fn routes_between_online_users() {
        let relay = MockRelay::new();
        let alice = relay.open(&ident("alice")).await.unwrap();
        let bob = relay.open(&ident("bob")).await.unwrap();

        let raw = frame("alice", "bob", "hi");
        alice.send(&raw).await.unwrap();
        assert_eq!(bob.receive().await.unwrap(), Some(raw.clone()));
        assert_eq!(relay.routed_frames().await, vec![raw]);
    }

    #[tokio::test]
    async fn offline_frames_are_delivered_on_connect() {
        let relay = MockRelay::new();
        let alice = relay.open(&ident("alice")).await.unwrap();
        let raw = frame("alice", "bob", "while you were out");
        alice.send(&raw).await.unwrap();
        assert_eq!(relay.backlog_len("bob").await, 1);

        let bob = relay.open(&ident("bob")).await.unwrap();
        assert_eq!(bob.receive().await.unwrap(), Some(raw));
        assert_eq!(relay.backlog_len("bob").await, 0);
    }

    #[tokio::test]
    async fn disconnect_ends_stream_and_breaks_sends() {
        let relay = MockRelay::new();
        let alice = relay.open(&ident("alice")).await.unwrap();
        assert!(relay.disconnect("alice").await);

        assert_eq!(alice.receive().await.unwrap(), None);
        let err = alice.send(&frame("alice", "bob", "x")).await.unwrap_err();
        assert!(err.is_connection());
    }

    #[tokio::test]
    async fn refused_and_failed_sends_are_connection_errors() {
        let relay = MockRelay::new();
        relay.refuse_connections(true).await;
        assert!(relay.open(&ident("alice")).await.err().unwrap().is_connection());

        relay.refuse_connections(false).await;
        let alice = relay.open(&ident("alice")).await.unwrap();
        relay.fail_sends(true).await;
        assert!(alice.send(&frame("alice", "bob", "x")).await.unwrap_err().is_connection());
        assert!(relay.routed_frames().await.is_empty());
    }

    #[tokio::test]
    async fn close_is_idempotent_and_takes_user_offline() {
        let relay = MockRelay::new();
        let alice = relay.open(&ident("alice")).await.unwrap();
        assert!(relay.is_online("alice").await);
        alice.close().await.unwrap();
        alice.close().await.unwrap();
        assert!(!relay.is_online("alice").await);
        assert_eq!(alice.receive().await.unwrap(), None);
    }
}
