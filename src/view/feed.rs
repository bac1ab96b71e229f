//! Feed thread joining the task stream with the preference stream.
//!
//! One thread owns the join state and multiplexes both sources; every
//! recomputed model fans out through a broadcaster in emission order.

use std::thread::{self, JoinHandle};

use crossbeam::channel::Receiver;

use crate::core::{Task, UserPrefs};
use crate::store::PrefsSubscription;
use crate::stream::{Broadcaster, StreamError, StreamLimits, Subscription};

use super::{LatestJoin, TasksUiModel};

/// Handle to a running derived-view feed.
///
/// Dropping the handle detaches the thread; it keeps running until both
/// sources disconnect.
pub struct UiFeed {
    broadcaster: Broadcaster<TasksUiModel>,
    handle: Option<JoinHandle<()>>,
}

impl UiFeed {
    /// Spawn the feed over a task-list channel and a preference
    /// subscription.
    pub fn spawn(tasks_rx: Receiver<Vec<Task>>, prefs: PrefsSubscription) -> UiFeed {
        Self::spawn_with_limits(tasks_rx, prefs, StreamLimits::default())
    }

    pub fn spawn_with_limits(
        tasks_rx: Receiver<Vec<Task>>,
        prefs: PrefsSubscription,
        limits: StreamLimits,
    ) -> UiFeed {
        let broadcaster = Broadcaster::new(limits);
        let fanout = broadcaster.clone();
        let prefs_rx = prefs.into_receiver();
        let handle = thread::spawn(move || run_feed_loop(tasks_rx, prefs_rx, fanout));
        UiFeed {
            broadcaster,
            handle: Some(handle),
        }
    }

    /// Subscribe to the derived-view stream. A subscriber arriving after
    /// the first joint emission starts from the latest model.
    pub fn subscribe(&self) -> Result<Subscription<TasksUiModel>, StreamError> {
        self.broadcaster.subscribe()
    }

    /// Wait for the feed thread to finish (both sources disconnected).
    pub fn join(mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn run_feed_loop(
    tasks_rx: Receiver<Vec<Task>>,
    prefs_rx: Receiver<UserPrefs>,
    fanout: Broadcaster<TasksUiModel>,
) {
    let mut join = LatestJoin::new();
    let mut tasks_open = true;
    let mut prefs_open = true;

    while tasks_open && prefs_open {
        let emitted = crossbeam::select! {
            recv(tasks_rx) -> msg => match msg {
                Ok(tasks) => join.on_tasks(tasks),
                Err(_) => {
                    tasks_open = false;
                    None
                }
            },
            recv(prefs_rx) -> msg => match msg {
                Ok(prefs) => join.on_prefs(prefs),
                Err(_) => {
                    prefs_open = false;
                    None
                }
            },
        };
        if !publish(&fanout, emitted) {
            return;
        }
    }

    // One side is gone; keep pairing the other with its last seen value.
    while tasks_open {
        match tasks_rx.recv() {
            Ok(tasks) => {
                let emitted = join.on_tasks(tasks);
                if !publish(&fanout, emitted) {
                    return;
                }
            }
            Err(_) => tasks_open = false,
        }
    }
    while prefs_open {
        match prefs_rx.recv() {
            Ok(prefs) => {
                let emitted = join.on_prefs(prefs);
                if !publish(&fanout, emitted) {
                    return;
                }
            }
            Err(_) => prefs_open = false,
        }
    }
}

fn publish(fanout: &Broadcaster<TasksUiModel>, model: Option<TasksUiModel>) -> bool {
    match model {
        Some(model) => fanout.publish(model).is_ok(),
        None => true,
    }
}
