//! Bounded fan-out for live value streams.
//!
//! Each subscriber owns a bounded queue. The broadcaster remembers the
//! latest published value so late subscribers start from it, and a
//! subscriber that stops draining its queue is dropped rather than allowed
//! to stall publishers.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crossbeam::channel::{
    Receiver, RecvError, RecvTimeoutError, Sender, TryRecvError, TrySendError,
};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StreamLimits {
    pub max_subscribers: usize,
    pub queue_capacity: usize,
}

impl Default for StreamLimits {
    fn default() -> Self {
        Self {
            max_subscribers: 64,
            queue_capacity: 256,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropReason {
    SubscriberLagged,
}

/// Receiving half of one subscriber's queue.
///
/// The stream never carries an error value: when the broadcaster goes away
/// or this subscriber is dropped for lagging, `recv` disconnects.
#[derive(Debug)]
pub struct Subscription<T> {
    receiver: Receiver<T>,
    drop_reason: Arc<Mutex<Option<DropReason>>>,
}

impl<T> Subscription<T> {
    pub fn recv(&self) -> Result<T, RecvError> {
        self.receiver.recv()
    }

    pub fn try_recv(&self) -> Result<T, TryRecvError> {
        self.receiver.try_recv()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Result<T, RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    pub fn drop_reason(&self) -> Option<DropReason> {
        self.drop_reason.lock().ok().and_then(|guard| *guard)
    }

    /// Consume the subscription, keeping only the raw receiver. Used where
    /// the queue is multiplexed with other channels.
    pub fn into_receiver(self) -> Receiver<T> {
        self.receiver
    }

    /// A stream that yields `seed` and then disconnects. Substituted where
    /// a real subscription could not be built but the caller's stream must
    /// not fail.
    pub(crate) fn detached(seed: T) -> Self {
        let (sender, receiver) = crossbeam::channel::bounded(1);
        let _ = sender.send(seed);
        Self {
            receiver,
            drop_reason: Arc::new(Mutex::new(None)),
        }
    }
}

#[derive(Clone)]
pub struct Broadcaster<T> {
    inner: Arc<Mutex<State<T>>>,
}

impl<T: Clone> Broadcaster<T> {
    pub fn new(limits: StreamLimits) -> Self {
        Self {
            inner: Arc::new(Mutex::new(State::new(limits))),
        }
    }

    /// Subscribe, seeding the queue with the latest published value if one
    /// exists.
    pub fn subscribe(&self) -> Result<Subscription<T>, StreamError> {
        let mut state = self.lock_state()?;
        let seed = state.latest.clone();
        state.add_subscriber(seed)
    }

    /// Subscribe with an explicit seed, overriding the remembered latest
    /// value. The store uses this so the seed and subscriber registration
    /// happen under its own commit lock.
    pub fn subscribe_with_seed(&self, seed: T) -> Result<Subscription<T>, StreamError> {
        let mut state = self.lock_state()?;
        state.add_subscriber(Some(seed))
    }

    pub fn publish(&self, value: T) -> Result<(), StreamError> {
        let mut state = self.lock_state()?;
        state.latest = Some(value.clone());

        let mut dropped = Vec::new();
        for (id, subscriber) in &state.subscribers {
            match subscriber.sender.try_send(value.clone()) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    subscriber.set_drop_reason(DropReason::SubscriberLagged);
                    dropped.push(*id);
                }
                Err(TrySendError::Disconnected(_)) => {
                    dropped.push(*id);
                }
            }
        }
        for id in dropped {
            state.subscribers.remove(&id);
        }
        Ok(())
    }

    pub fn subscriber_count(&self) -> Result<usize, StreamError> {
        let state = self.lock_state()?;
        Ok(state.subscribers.len())
    }

    fn lock_state(&self) -> Result<std::sync::MutexGuard<'_, State<T>>, StreamError> {
        self.inner.lock().map_err(|_| StreamError::LockPoisoned)
    }
}

struct State<T> {
    limits: StreamLimits,
    latest: Option<T>,
    next_subscriber_id: u64,
    subscribers: BTreeMap<u64, SubscriberState<T>>,
}

impl<T> State<T> {
    fn new(limits: StreamLimits) -> Self {
        Self {
            limits,
            latest: None,
            next_subscriber_id: 1,
            subscribers: BTreeMap::new(),
        }
    }

    fn add_subscriber(&mut self, seed: Option<T>) -> Result<Subscription<T>, StreamError> {
        if self.subscribers.len() >= self.limits.max_subscribers {
            return Err(StreamError::SubscriberLimitReached {
                max_subscribers: self.limits.max_subscribers,
            });
        }

        let capacity = self.limits.queue_capacity.max(1);
        let (sender, receiver) = crossbeam::channel::bounded(capacity);
        if let Some(seed) = seed {
            // Queue is empty, capacity >= 1: the seed always fits.
            let _ = sender.try_send(seed);
        }

        let drop_reason = Arc::new(Mutex::new(None));
        let id = self.next_subscriber_id;
        self.next_subscriber_id = self.next_subscriber_id.saturating_add(1);
        self.subscribers.insert(
            id,
            SubscriberState {
                sender,
                drop_reason: Arc::clone(&drop_reason),
            },
        );

        Ok(Subscription {
            receiver,
            drop_reason,
        })
    }
}

struct SubscriberState<T> {
    sender: Sender<T>,
    drop_reason: Arc<Mutex<Option<DropReason>>>,
}

impl<T> SubscriberState<T> {
    fn set_drop_reason(&self, reason: DropReason) {
        if let Ok(mut guard) = self.drop_reason.lock()
            && guard.is_none()
        {
            *guard = Some(reason);
        }
    }
}

#[derive(Debug, Error)]
pub enum StreamError {
    #[error("subscriber limit reached ({max_subscribers})")]
    SubscriberLimitReached { max_subscribers: usize },
    #[error("stream lock poisoned")]
    LockPoisoned,
}
