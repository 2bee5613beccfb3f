// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inbound pipeline: receive -> decode -> persist to the recipient's log -> notify.
//!
//! Backlog delivered right after connecting goes through the same path as
//! live traffic. Malformed frames are logged and skipped.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use parley_core::{Frame, Identifier, Message, ParleyError, RelayConnection, StorageAdapter};

use crate::notify::{Direction, Notifier, StoreEvent};
use crate::session::Session;

pub struct InboundPipeline {
    session: Arc<Session>,
    conn: Arc<dyn RelayConnection>,
    store: Arc<dyn StorageAdapter>,
    notifier: Notifier,
}

impl InboundPipeline {
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

    /// Runs until cancelled or until the relay ends the stream.
    ///
    /// End of stream is a normal exit. Cancellation only interrupts the
    /// wait for the next frame; a frame already read is persisted first.
    pub async fn run(self, cancel: CancellationToken) -> Result<(), ParleyError> {
        debug!(user = %self.session.user, "inbound pipeline started");
        loop {
            let received = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!("inbound pipeline cancelled");
                    return Ok(());
                }
                received = self.conn.receive() => received?,
            };
            let Some(raw) = received else {
                info!(user = %self.session.user, "relay ended the stream");
                return Ok(());
            };
            self.accept(&raw).await?;
        }
    }

    /// Persist one raw frame. Returns the stored id, or `None` if the
    /// frame was skipped.
    pub async fn accept(&self, raw: &str) -> Result<Option<i64>, ParleyError> {
        let frame = match Frame::decode(raw) {
            Ok(frame) => frame,
            Err(e) => {
                warn!(error = %e, "skipping malformed frame from relay");
                return Ok(None);
            }
        };
        if let Err(e) = Identifier::parse(&frame.sent_by) {
            warn!(error = %e, "skipping frame with unsafe sender");
            return Ok(None);
        }
        let owner = match Identifier::parse(&frame.sent_to) {
            Ok(owner) => owner,
            Err(e) => {
                warn!(error = %e, "skipping frame with unsafe recipient");
                return Ok(None);
            }
        };
        // chat_id must be the one derived from the participants.
        if frame.chat_id != parley_core::chat_id(&frame.sent_by, &frame.sent_to) {
            warn!(
                from = %frame.sent_by,
                to = %frame.sent_to,
                chat_id = %frame.chat_id,
                "skipping frame whose chat_id does not match its participants"
            );
            return Ok(None);
        }

        if owner != self.session.user {
            debug!(owner = %owner, "frame addressed to another local user");
            self.store.ensure_user_log(owner.as_str()).await?;
        }
        let id = self.store.append_message(owner.as_str(), &frame).await?;
        debug!(owner = %owner, message_id = id, from = %frame.sent_by, "message received");

        self.notifier.store_updated(StoreEvent {
            owner: owner.as_str().to_string(),
            message_id: id,
            chat_id: frame.chat_id.clone(),
            direction: Direction::Inbound,
        });

        if frame.chat_id == self.session.chat_id() {
            self.notifier.active_message(Message {
                id,
                sent_by: frame.sent_by,
                sent_to: frame.sent_to,
                chat_id: frame.chat_id,
                message: frame.message,
                timestamp: frame.timestamp,
            });
        }
        Ok(Some(id))
    }
}
