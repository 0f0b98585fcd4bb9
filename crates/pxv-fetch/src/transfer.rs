//! Zero-capacity synchronous handoff.
//!
//! An [`ObjectTransfer`] pairs one producer thread with one consumer
//! thread over a single-slot mailbox: the producer blocks until the
//! consumer has actually taken the value, and the consumer blocks until a
//! value is there to take. Fetch workers use it to hand decoded planes to
//! render threads without ever buffering more than one plane in flight.
//!
//! # States
//!
//! Empty <-> Full, with at most one value in transit. The slot is cleared
//! the instant the value is collected, and the instance is reusable across
//! any number of transfers.
//!
//! # Blocking and timeouts
//!
//! - [`hand_off`](ObjectTransfer::hand_off) and
//!   [`collect`](ObjectTransfer::collect) wait without bound.
//! - [`hand_off_timeout`](ObjectTransfer::hand_off_timeout) bounds only
//!   the wait for the slot to empty; `Duration::ZERO` polls. Once the
//!   value is deposited the wait for collection is unbounded — a deposited
//!   value is always eventually collected.
//! - [`collect_timeout`](ObjectTransfer::collect_timeout) bounds the wait
//!   for a value and returns `None` on expiry.
//!
//! A peer that panics mid-wait poisons the mutex; the waiters here recover
//! the guard, drive the rendezvous to completion anyway, and the producer
//! reports [`FetchError::Interrupted`] only afterwards — the slot is never
//! left corrupted.

use crate::error::{FetchError, FetchResult};
use std::sync::{Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Outcome of a bounded hand-off attempt.
#[derive(Debug)]
pub enum HandOff<T> {
    /// The value was deposited and collected.
    Completed,
    /// The slot never emptied within the timeout; ownership of the value
    /// returns to the caller.
    TimedOut(T),
}

#[derive(Debug)]
struct Slot<T> {
    value: Option<T>,
    collections: u64,
}

/// Single-slot rendezvous channel.
#[derive(Debug)]
pub struct ObjectTransfer<T> {
    slot: Mutex<Slot<T>>,
    not_full: Condvar,
    not_empty: Condvar,
    collected: Condvar,
}

impl<T> Default for ObjectTransfer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ObjectTransfer<T> {
    /// Creates an empty channel.
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(Slot {
                value: None,
                collections: 0,
            }),
            not_full: Condvar::new(),
            not_empty: Condvar::new(),
            collected: Condvar::new(),
        }
    }

    /// Returns `true` when no value is in transit.
    pub fn is_empty(&self) -> bool {
        self.lock_slot().value.is_none()
    }

    /// Hands `value` to a consumer, blocking until it is collected.
    pub fn hand_off(&self, value: T) -> FetchResult<()> {
        match self.hand_off_inner(value, None)? {
            HandOff::Completed => Ok(()),
            // No deadline was set, so the empty-wait cannot expire.
            HandOff::TimedOut(_) => unreachable!("unbounded hand-off timed out"),
        }
    }

    /// Hands `value` to a consumer, waiting at most `timeout` for the slot
    /// to empty. `Duration::ZERO` polls. After the deposit the wait for
    /// collection is unbounded.
    pub fn hand_off_timeout(&self, value: T, timeout: Duration) -> FetchResult<HandOff<T>> {
        self.hand_off_inner(value, Some(timeout))
    }

    /// Collects the value in transit, blocking until one arrives.
    pub fn collect(&self) -> FetchResult<T> {
        match self.collect_inner(None)? {
            Some(value) => Ok(value),
            // No deadline was set, so the full-wait cannot expire.
            None => unreachable!("unbounded collect timed out"),
        }
    }

    /// Collects the value in transit, waiting at most `timeout`; `None`
    /// when nothing arrived in time.
    pub fn collect_timeout(&self, timeout: Duration) -> FetchResult<Option<T>> {
        self.collect_inner(Some(timeout))
    }

    fn hand_off_inner(&self, value: T, timeout: Option<Duration>) -> FetchResult<HandOff<T>> {
        let deadline = timeout.and_then(|t| Instant::now().checked_add(t));
        let mut guard = self.lock_slot();

        // Wait for the slot to empty, bounded by the deadline if one was
        // given.
        while guard.value.is_some() {
            match (timeout, deadline) {
                (Some(_), Some(deadline)) => {
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    if remaining.is_zero() {
                        return Ok(HandOff::TimedOut(value));
                    }
                    guard = self
                        .absorb_timed_wait(self.not_full.wait_timeout(guard, remaining))
                        .0;
                }
                _ => {
                    guard = self.absorb_wait(self.not_full.wait(guard)).0;
                }
            }
        }

        // Deposit, wake a collector, then wait without bound until the
        // value has actually been taken.
        guard.value = Some(value);
        let target = guard.collections + 1;
        self.not_empty.notify_one();
        let mut interrupted = false;
        while guard.collections < target {
            let (g, poisoned) = self.absorb_wait(self.collected.wait(guard));
            guard = g;
            interrupted |= poisoned;
        }
        drop(guard);
        if interrupted {
            Err(FetchError::Interrupted)
        } else {
            Ok(HandOff::Completed)
        }
    }

    fn collect_inner(&self, timeout: Option<Duration>) -> FetchResult<Option<T>> {
        let deadline = timeout.and_then(|t| Instant::now().checked_add(t));
        let mut guard = self.lock_slot();

        loop {
            if let Some(value) = guard.value.take() {
                guard.collections += 1;
                self.collected.notify_all();
                self.not_full.notify_one();
                return Ok(Some(value));
            }
            match (timeout, deadline) {
                (Some(_), Some(deadline)) => {
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    if remaining.is_zero() {
                        return Ok(None);
                    }
                    guard = self
                        .absorb_timed_wait(self.not_empty.wait_timeout(guard, remaining))
                        .0;
                }
                _ => {
                    guard = self.absorb_wait(self.not_empty.wait(guard)).0;
                }
            }
        }
    }

    /// Locks the slot, recovering from a peer's panic-poisoning so the
    /// channel state stays usable.
    fn lock_slot(&self) -> MutexGuard<'_, Slot<T>> {
        match self.slot.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                self.slot.clear_poison();
                poisoned.into_inner()
            }
        }
    }

    fn absorb_wait<'a>(
        &self,
        result: Result<
            MutexGuard<'a, Slot<T>>,
            std::sync::PoisonError<MutexGuard<'a, Slot<T>>>,
        >,
    ) -> (MutexGuard<'a, Slot<T>>, bool) {
        match result {
            Ok(guard) => (guard, false),
            Err(poisoned) => {
                self.slot.clear_poison();
                (poisoned.into_inner(), true)
            }
        }
    }

    fn absorb_timed_wait<'a>(
        &self,
        result: Result<
            (MutexGuard<'a, Slot<T>>, std::sync::WaitTimeoutResult),
            std::sync::PoisonError<(MutexGuard<'a, Slot<T>>, std::sync::WaitTimeoutResult)>,
        >,
    ) -> (MutexGuard<'a, Slot<T>>, bool) {
        match result {
            Ok((guard, _)) => (guard, false),
            Err(poisoned) => {
                self.slot.clear_poison();
                (poisoned.into_inner().0, true)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::{Duration, Instant};

    #[test]
    fn test_pairing_delivers_exactly_the_value() {
        let channel = Arc::new(ObjectTransfer::new());
        let consumer = {
            let channel = Arc::clone(&channel);
            thread::spawn(move || channel.collect().unwrap())
        };
        channel.hand_off(42u32).unwrap();
        assert_eq!(consumer.join().unwrap(), 42);
    }

    #[test]
    fn test_hand_off_blocks_until_collected() {
        let channel = Arc::new(ObjectTransfer::new());
        let consumer = {
            let channel = Arc::clone(&channel);
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(80));
                channel.collect().unwrap()
            })
        };
        let start = Instant::now();
        channel.hand_off("plane").unwrap();
        // The producer cannot return before the delayed collect happened.
        assert!(start.elapsed() >= Duration::from_millis(60));
        assert_eq!(consumer.join().unwrap(), "plane");
    }

    #[test]
    fn test_poll_against_full_slot_times_out_immediately() {
        let channel = Arc::new(ObjectTransfer::new());
        let producer = {
            let channel = Arc::clone(&channel);
            thread::spawn(move || channel.hand_off(1u8).unwrap())
        };
        // Wait for the first producer to occupy the slot.
        while channel.is_empty() {
            thread::yield_now();
        }
        let start = Instant::now();
        match channel.hand_off_timeout(2u8, Duration::ZERO).unwrap() {
            HandOff::TimedOut(value) => assert_eq!(value, 2),
            HandOff::Completed => panic!("poll against a full slot must not complete"),
        }
        assert!(start.elapsed() < Duration::from_millis(50));
        assert_eq!(channel.collect().unwrap(), 1);
        producer.join().unwrap();
    }

    #[test]
    fn test_timed_out_collector_leaves_slot_usable() {
        let channel: Arc<ObjectTransfer<u32>> = Arc::new(ObjectTransfer::new());
        assert!(
            channel
                .collect_timeout(Duration::from_millis(10))
                .unwrap()
                .is_none()
        );
        let producer = {
            let channel = Arc::clone(&channel);
            thread::spawn(move || channel.hand_off(7).unwrap())
        };
        assert_eq!(channel.collect().unwrap(), 7);
        producer.join().unwrap();
    }

    #[test]
    fn test_reuse_preserves_order() {
        let channel = Arc::new(ObjectTransfer::new());
        let producer = {
            let channel = Arc::clone(&channel);
            thread::spawn(move || {
                for i in 0..100u32 {
                    channel.hand_off(i).unwrap();
                }
            })
        };
        for i in 0..100u32 {
            assert_eq!(channel.collect().unwrap(), i);
        }
        producer.join().unwrap();
    }

    #[test]
    fn test_two_producers_serialize() {
        let channel = Arc::new(ObjectTransfer::new());
        let spawn_producer = |value: u32| {
            let channel = Arc::clone(&channel);
            thread::spawn(move || channel.hand_off(value).unwrap())
        };
        let a = spawn_producer(1);
        let b = spawn_producer(2);
        let mut received = vec![channel.collect().unwrap(), channel.collect().unwrap()];
        received.sort_unstable();
        assert_eq!(received, vec![1, 2]);
        a.join().unwrap();
        b.join().unwrap();
    }

    #[test]
    fn test_timeout_expires_against_occupied_slot() {
        let channel = Arc::new(ObjectTransfer::new());
        let producer = {
            let channel = Arc::clone(&channel);
            thread::spawn(move || channel.hand_off(9u8).unwrap())
        };
        while channel.is_empty() {
            thread::yield_now();
        }
        let start = Instant::now();
        match channel
            .hand_off_timeout(10u8, Duration::from_millis(30))
            .unwrap()
        {
            HandOff::TimedOut(value) => assert_eq!(value, 10),
            HandOff::Completed => panic!("slot never emptied"),
        }
        assert!(start.elapsed() >= Duration::from_millis(25));
        assert_eq!(channel.collect().unwrap(), 9);
        producer.join().unwrap();
    }
}
