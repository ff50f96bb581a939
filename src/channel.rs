//! Latest-wins hand-off between the feed reader and the display.
//!
//! A single slot shared by exactly one [`Publisher`] and one [`Drain`].
//! Publishing never waits for the consumer: a message still pending when
//! the next one arrives is replaced. The consumer therefore always sees the
//! newest producer output and tolerates losing superseded ones.
//!
//! ```
//! use dbwatch::channel::latest_wins;
//!
//! let (publisher, drain) = latest_wins();
//! publisher.publish(10);
//! publisher.publish(20);
//! assert_eq!(drain.drain().collect::<Vec<_>>(), vec![20]);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

#[derive(Debug)]
struct Slot<T> {
    pending: Mutex<Option<T>>,
    superseded: AtomicU64,
}

/// Create a connected publisher/drain pair.
pub fn latest_wins<T>() -> (Publisher<T>, Drain<T>) {
    let slot = Arc::new(Slot {
        pending: Mutex::new(None),
        superseded: AtomicU64::new(0),
    });
    (Publisher { slot: slot.clone() }, Drain { slot })
}

/// Producer half. Not `Clone`: there is exactly one producer.
#[derive(Debug)]
pub struct Publisher<T> {
    slot: Arc<Slot<T>>,
}

impl<T> Publisher<T> {
    /// Put `message` in the slot, replacing anything still pending.
    ///
    /// Returns `true` if a pending message was replaced.
    pub fn publish(&self, message: T) -> bool {
        let replaced = self.slot.pending.lock().replace(message).is_some();
        if replaced {
            self.slot.superseded.fetch_add(1, Ordering::Relaxed);
        }
        replaced
    }

    /// Number of messages replaced before the consumer saw them.
    pub fn superseded(&self) -> u64 {
        self.slot.superseded.load(Ordering::Relaxed)
    }
}

/// Consumer half. Not `Clone`: there is exactly one consumer.
#[derive(Debug)]
pub struct Drain<T> {
    slot: Arc<Slot<T>>,
}

impl<T> Drain<T> {
    /// Take the pending message without waiting.
    pub fn try_take(&self) -> Option<T> {
        self.slot.pending.lock().take()
    }

    /// Yield the message buffered at the time of the call.
    ///
    /// Never waits. Takes at most one message, so a producer publishing
    /// while the result is consumed cannot keep the caller looping.
    pub fn drain(&self) -> impl Iterator<Item = T> {
        self.try_take().into_iter()
    }

    /// Number of messages replaced before the consumer saw them.
    pub fn superseded(&self) -> u64 {
        self.slot.superseded.load(Ordering::Relaxed)
    }

    /// Returns `true` once the publisher has been dropped.
    pub fn is_closed(&self) -> bool {
        Arc::strong_count(&self.slot) == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::ClassifiedMessage;

    #[test]
    fn test_last_publish_wins() {
        let (publisher, drain) = latest_wins();
        assert!(!publisher.publish(ClassifiedMessage::Value(10.0)));
        assert!(publisher.publish(ClassifiedMessage::Value(20.0)));
        assert!(publisher.publish(ClassifiedMessage::Status("x".to_string())));

        let drained: Vec<_> = drain.drain().collect();
        assert_eq!(drained, vec![ClassifiedMessage::Status("x".to_string())]);
        assert_eq!(drain.superseded(), 2);
    }

    #[test]
    fn test_drain_on_empty_slot_yields_nothing() {
        let (_publisher, drain) = latest_wins::<u32>();
        assert_eq!(drain.drain().count(), 0);
        assert_eq!(drain.try_take(), None);
    }

    #[test]
    fn test_drain_empties_the_slot() {
        let (publisher, drain) = latest_wins();
        publisher.publish(1);
        assert_eq!(drain.drain().count(), 1);
        assert_eq!(drain.drain().count(), 0);

        // Slot is reusable after a drain
        assert!(!publisher.publish(2));
        assert_eq!(drain.try_take(), Some(2));
        assert_eq!(publisher.superseded(), 0);
    }

    #[test]
    fn test_publish_from_other_thread_never_blocks() {
        let (publisher, drain) = latest_wins();
        let handle = std::thread::spawn(move || {
            for i in 0..10_000u32 {
                publisher.publish(i);
            }
            publisher
        });
        let publisher = handle.join().unwrap();

        let drained: Vec<_> = drain.drain().collect();
        assert_eq!(drained, vec![9_999]);
        assert_eq!(publisher.superseded(), 9_999);
    }

    #[test]
    fn test_drain_ignores_messages_published_meanwhile() {
        let (publisher, drain) = latest_wins();
        publisher.publish(1);

        let mut pending = drain.drain();
        assert_eq!(pending.next(), Some(1));
        publisher.publish(2);
        assert_eq!(pending.next(), None);

        // Picked up by the next drain instead
        assert_eq!(drain.drain().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn test_is_closed_after_publisher_drop() {
        let (publisher, drain) = latest_wins::<u8>();
        assert!(!drain.is_closed());
        drop(publisher);
        assert!(drain.is_closed());
    }
}
