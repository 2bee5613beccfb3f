// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session coordinator: owns the connection and both pipelines.
//!
//! Lifecycle: `Idle -> Connecting -> Active -> Draining -> Closed`. The
//! connection is closed only after both pipeline tasks have stopped, so the
//! outbound pipeline can never write to a released transport.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use parley_config::model::SessionConfig;
use parley_core::{Message, ParleyError, RelayConnection, RelayConnector, StorageAdapter};

use crate::inbound::InboundPipeline;
use crate::notify::{Notifier, StoreEvent};
use crate::outbound::OutboundPipeline;
use crate::session::{Session, SessionState};

type PipelineTask = JoinHandle<Result<(), ParleyError>>;

/// Starts sessions against a relay and a store.
///
/// The coordinator's [`Notifier`] is shared by every session it starts, so
/// callers can subscribe before `start` and see backlog delivered during
/// the handshake.
pub struct SessionCoordinator {
    connector: Arc<dyn RelayConnector>,
    store: Arc<dyn StorageAdapter>,
    notifier: Notifier,
    queue_capacity: usize,
    drain_timeout: Duration,
}

impl SessionCoordinator {
    pub fn new(
        connector: Arc<dyn RelayConnector>,
        store: Arc<dyn StorageAdapter>,
        config: &SessionConfig,
    ) -> Self {
        Self {
            connector,
            store,
            notifier: Notifier::new(config.notification_capacity),
            queue_capacity: config.outbound_queue_capacity.max(1),
            drain_timeout: config.drain_timeout(),
        }
    }

    /// Override the drain bound (sub-second values are useful in tests).
    pub fn with_drain_timeout(mut self, timeout: Duration) -> Self {
        self.drain_timeout = timeout;
        self
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Open the relay connection for `session.user` and start both pipelines.
    ///
    /// On handshake failure the session goes straight to `Closed`, the
    /// connection error is returned, and no pipeline is started.
    pub async fn start(&self, session: Session) -> Result<SessionHandle, ParleyError> {
        let session = Arc::new(session);
        let (state_tx, state_rx) = watch::channel(SessionState::Idle);

        self.store.ensure_user_log(session.user.as_str()).await?;

        transition(&state_tx, &session, SessionState::Connecting);
        let conn = match self.connector.open(&session.user).await {
            Ok(conn) => conn,
            Err(e) => {
                warn!(user = %session.user, error = %e, "relay handshake failed");
                transition(&state_tx, &session, SessionState::Closed);
                return Err(e);
            }
        };
        transition(&state_tx, &session, SessionState::Active);

        let (outbox, queue) = mpsc::channel(self.queue_capacity);
        let pipelines = CancellationToken::new();
        let outbound = tokio::spawn(
            OutboundPipeline::new(
                Arc::clone(&session),
                Arc::clone(&conn),
                Arc::clone(&self.store),
                self.notifier.clone(),
            )
            .run(queue, pipelines.clone()),
        );
        let inbound = tokio::spawn(
            InboundPipeline::new(
                Arc::clone(&session),
                Arc::clone(&conn),
                Arc::clone(&self.store),
                self.notifier.clone(),
            )
            .run(pipelines.clone()),
        );

        let shutdown = CancellationToken::new();
        let supervisor = tokio::spawn(supervise(Supervised {
            session: Arc::clone(&session),
            conn,
            state_tx,
            shutdown: shutdown.clone(),
            pipelines,
            outbound,
            inbound,
            drain_timeout: self.drain_timeout,
        }));

        Ok(SessionHandle {
            session,
            outbox,
            notifier: self.notifier.clone(),
            store: Arc::clone(&self.store),
            state: state_rx,
            shutdown,
            supervisor,
        })
    }
}

fn transition(tx: &watch::Sender<SessionState>, session: &Session, next: SessionState) {
    let prev = tx.send_replace(next);
    info!(user = %session.user, from = %prev, to = %next, "session state changed");
}

struct Supervised {
    session: Arc<Session>,
    conn: Arc<dyn RelayConnection>,
    state_tx: watch::Sender<SessionState>,
    shutdown: CancellationToken,
    pipelines: CancellationToken,
    outbound: PipelineTask,
    inbound: PipelineTask,
    drain_timeout: Duration,
}

/// Wait for a shutdown request or for either pipeline to end, then drain.
async fn supervise(mut s: Supervised) -> Result<(), ParleyError> {
    let mut outbound_result = None;
    let mut inbound_result = None;

    tokio::select! {
        _ = s.shutdown.cancelled() => {
            info!(user = %s.session.user, "shutdown requested");
        }
        joined = &mut s.outbound => {
            outbound_result = Some(flatten("outbound", joined));
        }
        joined = &mut s.inbound => {
            inbound_result = Some(flatten("inbound", joined));
        }
    }

    transition(&s.state_tx, &s.session, SessionState::Draining);
    s.pipelines.cancel();

    let deadline = Instant::now() + s.drain_timeout;
    let outbound_result = match outbound_result {
        Some(result) => result,
        None => join_by("outbound", s.outbound, deadline, s.drain_timeout).await,
    };
    let inbound_result = match inbound_result {
        Some(result) => result,
        None => join_by("inbound", s.inbound, deadline, s.drain_timeout).await,
    };

    // Both tasks have stopped; the transport is ours alone now.
    if let Err(e) = s.conn.close().await {
        warn!(error = %e, "closing relay connection failed");
    }
    transition(&s.state_tx, &s.session, SessionState::Closed);

    outbound_result.and(inbound_result)
}

fn flatten(
    name: &str,
    joined: Result<Result<(), ParleyError>, tokio::task::JoinError>,
) -> Result<(), ParleyError> {
    match joined {
        Ok(Ok(())) => {
            debug!(pipeline = name, "pipeline stopped");
            Ok(())
        }
        Ok(Err(e)) => {
            warn!(pipeline = name, error = %e, "pipeline failed");
            Err(e)
        }
        Err(e) => Err(ParleyError::Internal(format!("{name} pipeline panicked: {e}"))),
    }
}

async fn join_by(
    name: &str,
    mut task: PipelineTask,
    deadline: Instant,
    bound: Duration,
) -> Result<(), ParleyError> {
    match tokio::time::timeout_at(deadline, &mut task).await {
        Ok(joined) => flatten(name, joined),
        Err(_) => {
            warn!(pipeline = name, "pipeline did not stop within drain timeout, aborting");
            task.abort();
            let _ = task.await;
            Err(ParleyError::Timeout { duration: bound })
        }
    }
}

/// The presentation-facing side of a running session.
pub struct SessionHandle {
    session: Arc<Session>,
    outbox: mpsc::Sender<String>,
    notifier: Notifier,
    store: Arc<dyn StorageAdapter>,
    state: watch::Receiver<SessionState>,
    shutdown: CancellationToken,
    supervisor: JoinHandle<Result<(), ParleyError>>,
}

impl SessionHandle {
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Queue an authored body for the outbound pipeline.
    pub async fn send(&self, body: impl Into<String>) -> Result<(), ParleyError> {
        self.outbox
            .send(body.into())
            .await
            .map_err(|_| ParleyError::connection("session is no longer accepting messages"))
    }

    /// A sender for the outbound queue, for input sources on other tasks.
    pub fn outbox(&self) -> mpsc::Sender<String> {
        self.outbox.clone()
    }

    pub fn subscribe_store_updates(&self) -> broadcast::Receiver<StoreEvent> {
        self.notifier.subscribe_store_updates()
    }

    pub fn subscribe_active(&self) -> broadcast::Receiver<Message> {
        self.notifier.subscribe_active()
    }

    /// The stored active conversation, as seen from the user's log.
    pub async fn transcript(&self) -> Result<Vec<Message>, ParleyError> {
        self.store
            .query_conversation(self.session.user.as_str(), self.session.chat_id())
            .await
    }

    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    /// A receiver that observes every state change.
    pub fn watch_state(&self) -> watch::Receiver<SessionState> {
        self.state.clone()
    }

    /// Token that ends the session when cancelled; link it to signals or
    /// a quit command.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    /// Wait for the session to reach `Closed` and return the first
    /// pipeline error, if any.
    pub async fn wait(self) -> Result<(), ParleyError> {
        self.supervisor
            .await
            .map_err(|e| ParleyError::Internal(format!("session supervisor panicked: {e}")))?
    }
}
