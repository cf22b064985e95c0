//! Per-room subscriber set.

use std::collections::BTreeMap;

use tokio::sync::mpsc;

use super::types::{RoomEvent, RoomMessage};
use crate::types::RoomId;

pub type SubscriberId = u64;

/// Handle through which a room delivers events to one observer.
///
/// Dropping the receiving half is how an observer disconnects; the room
/// notices on the next publish and forgets it. The battle is not affected.
#[derive(Debug, Clone)]
pub struct Subscriber {
    id: SubscriberId,
    tx: mpsc::UnboundedSender<RoomMessage>,
}

impl Subscriber {
    pub fn new(id: SubscriberId, tx: mpsc::UnboundedSender<RoomMessage>) -> Self {
        Self { id, tx }
    }

    /// Creates a subscriber together with the receiver its events arrive on.
    pub fn channel(id: SubscriberId) -> (Self, mpsc::UnboundedReceiver<RoomMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(id, tx), rx)
    }

    pub fn id(&self) -> SubscriberId {
        self.id
    }

    fn send(&self, message: RoomMessage) -> bool {
        self.tx.send(message).is_ok()
    }
}

/// Fan-out of one room's events to its current subscribers.
pub(crate) struct RoomBus {
    room: RoomId,
    subscribers: BTreeMap<SubscriberId, Subscriber>,
}

impl RoomBus {
    pub(crate) fn new(room: RoomId) -> Self {
        Self {
            room,
            subscribers: BTreeMap::new(),
        }
    }

    /// Registers `subscriber` and sends it `greeting` before anything else.
    ///
    /// Re-joining with the same id replaces the previous handle.
    pub(crate) fn subscribe(&mut self, subscriber: Subscriber, greeting: RoomEvent) {
        let delivered = subscriber.send(RoomMessage {
            room: self.room.clone(),
            event: greeting,
        });
        if delivered {
            self.subscribers.insert(subscriber.id(), subscriber);
        } else {
            tracing::debug!(
                target: "runtime::rooms",
                room = %self.room,
                subscriber = subscriber.id(),
                "Subscriber closed before join completed"
            );
        }
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        self.subscribers.remove(&id).is_some()
    }

    pub(crate) fn len(&self) -> usize {
        self.subscribers.len()
    }

    /// Sends `event` to every subscriber, dropping those whose channel closed.
    pub(crate) fn publish(&mut self, event: RoomEvent) {
        if self.subscribers.is_empty() {
            tracing::trace!(
                target: "runtime::rooms",
                room = %self.room,
                event = event.name(),
                "No subscribers for room event"
            );
            return;
        }

        let room = &self.room;
        self.subscribers.retain(|id, subscriber| {
            let delivered = subscriber.send(RoomMessage {
                room: room.clone(),
                event: event.clone(),
            });
            if !delivered {
                tracing::debug!(
                    target: "runtime::rooms",
                    room = %room,
                    subscriber = *id,
                    "Dropping disconnected subscriber"
                );
            }
            delivered
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greeting_precedes_broadcasts() {
        let mut bus = RoomBus::new(RoomId::from("r"));
        let (sub, mut rx) = Subscriber::channel(1);

        bus.subscribe(sub, RoomEvent::State(None));
        bus.publish(RoomEvent::State(None));

        let first = rx.try_recv().unwrap();
        assert_eq!(first.room, RoomId::from("r"));
        assert_eq!(first.event, RoomEvent::State(None));
        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn closed_subscribers_are_pruned() {
        let mut bus = RoomBus::new(RoomId::from("r"));
        let (alive, mut alive_rx) = Subscriber::channel(1);
        let (gone, gone_rx) = Subscriber::channel(2);
        bus.subscribe(alive, RoomEvent::State(None));
        bus.subscribe(gone, RoomEvent::State(None));
        assert_eq!(bus.len(), 2);

        drop(gone_rx);
        bus.publish(RoomEvent::State(None));

        assert_eq!(bus.len(), 1);
        assert_eq!(alive_rx.try_recv().unwrap().event, RoomEvent::State(None));
    }
}
