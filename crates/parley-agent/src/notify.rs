// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification hub: two independent broadcast channels.
//!
//! "Store updated" fires for every persisted message. "Active conversation"
//! fires only for inbound messages in the session's current conversation.
//! A subscriber of one never observes events meant for the other.

use tokio::sync::broadcast;

use parley_core::Message;

/// Which pipeline persisted a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Outbound,
    Inbound,
}

/// A message has been committed to a local log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreEvent {
    pub owner: String,
    pub message_id: i64,
    pub chat_id: String,
    pub direction: Direction,
}

/// Cloneable publisher for both notification channels.
///
/// Publishing never blocks and never fails: with no subscribers the event
/// is dropped, and a slow subscriber sees `RecvError::Lagged`.
#[derive(Debug, Clone)]
pub struct Notifier {
    store_tx: broadcast::Sender<StoreEvent>,
    active_tx: broadcast::Sender<Message>,
}

impl Notifier {
    pub fn new(capacity: usize) -> Self {
        let (store_tx, _) = broadcast::channel(capacity.max(1));
        let (active_tx, _) = broadcast::channel(capacity.max(1));
        Self { store_tx, active_tx }
    }

    pub fn subscribe_store_updates(&self) -> broadcast::Receiver<StoreEvent> {
        self.store_tx.subscribe()
    }

    pub fn subscribe_active(&self) -> broadcast::Receiver<Message> {
        self.active_tx.subscribe()
    }

    pub(crate) fn store_updated(&self, event: StoreEvent) {
        let _ = self.store_tx.send(event);
    }

    pub(crate) fn active_message(&self, message: Message) {
        let _ = self.active_tx.send(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(id: i64) -> Message {
        Message {
            id,
            sent_by: "bob".into(),
            sent_to: "alice".into(),
            chat_id: parley_core::chat_id("alice", "bob"),
            message: "hi".into(),
            timestamp: "2026-01-01T00:00:00.000000Z".into(),
        }
    }

    #[tokio::test]
    async fn channels_are_independent() {
        let notifier = Notifier::new(8);
        let mut store_rx = notifier.subscribe_store_updates();
        let mut active_rx = notifier.subscribe_active();

        notifier.store_updated(StoreEvent {
            owner: "alice".into(),
            message_id: 1,
            chat_id: "c".into(),
            direction: Direction::Outbound,
        });

        assert_eq!(store_rx.recv().await.unwrap().message_id, 1);
        assert!(matches!(
            active_rx.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));

        notifier.active_message(message(2));
        assert_eq!(active_rx.recv().await.unwrap().id, 2);
        assert!(matches!(
            store_rx.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[test]
    fn publishing_without_subscribers_is_harmless() {
        let notifier = Notifier::new(1);
        notifier.active_message(message(1));
        notifier.store_updated(StoreEvent {
            owner: "alice".into(),
            message_id: 1,
            chat_id: "c".into(),
            direction: Direction::Inbound,
        });
    }
}
