// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound pipeline: authored body -> stamp -> transmit -> persist -> notify.
//!
//! Bodies arrive on the session's outbound queue, the single hand-off point
//! from whatever produces text. Cancellation is only observed while waiting
//! for the next body, so a message that is already being transmitted is
//! always persisted before the loop exits.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use parley_core::types::timestamp_now;
use parley_core::{Frame, ParleyError, RelayConnection, StorageAdapter};

use crate::notify::{Direction, Notifier, StoreEvent};
use crate::session::Session;

pub struct OutboundPipeline {
    session: Arc<Session>,
    conn: Arc<dyn RelayConnection>,
    store: Arc<dyn StorageAdapter>,
    notifier: Notifier,
}

impl OutboundPipeline {
    pub fn new(
        session: Arc<Session>,
        conn: Arc<dyn RelayConnection>,
        store: Arc<dyn StorageAdapter>,
        notifier: Notifier,
    ) -> Self {
        Self {
            session,
            conn,
            store,
            notifier,
        }
    }

    /// Runs until cancelled, until the queue closes, or until a message
    /// fails to go out.
    pub async fn run(
        self,
        mut queue: mpsc::Receiver<String>,
        cancel: CancellationToken,
    ) -> Result<(), ParleyError> {
        debug!(user = %self.session.user, "outbound pipeline started");
        loop {
            let body = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!("outbound pipeline cancelled");
                    return Ok(());
                }
                next = queue.recv() => match next {
                    Some(body) => body,
                    None => {
                        debug!("outbound queue closed");
                        return Ok(());
                    }
                },
            };
            self.deliver(body).await?;
        }
    }

    /// Send one body and record it in the user's log.
    ///
    /// Nothing is persisted when transmission fails.
    pub async fn deliver(&self, body: String) -> Result<i64, ParleyError> {
        let frame = Frame {
            sent_by: self.session.user.as_str().to_string(),
            sent_to: self.session.recipient.as_str().to_string(),
            chat_id: self.session.chat_id().to_string(),
            message: body,
            timestamp: timestamp_now(),
        };

        self.conn.send(&frame.encode()?).await?;

        let owner = self.session.user.as_str();
        let id = self.store.append_message(owner, &frame).await?;
        info!(user = %owner, message_id = id, "message sent");

        self.notifier.store_updated(StoreEvent {
            owner: owner.to_string(),
            message_id: id,
            chat_id: frame.chat_id,
            direction: Direction::Outbound,
        });
        Ok(id)
    }
}
