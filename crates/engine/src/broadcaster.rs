// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Status Broadcaster (§4.3): fans a `PoolSnapshot` out to every subscriber.
//! Delivery is at-most-once per subscriber per snapshot, and a slow
//! subscriber loses its *oldest* pending snapshot rather than blocking the
//! core or pinning memory — exactly `tokio::sync::broadcast`'s lagging
//! behavior, so that's what this wraps rather than hand-rolling a
//! bounded-queue-per-subscriber fanout.

use foreman_core::{TaskId, TaskStatus};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Default bound on each subscriber's pending-snapshot queue (§4.3: "e.g. 16").
pub const DEFAULT_CAPACITY: usize = 16;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub task_id: TaskId,
    pub status: TaskStatus,
    pub pid: Option<u32>,
    pub started_at_epoch_ms: Option<u64>,
    pub context_usage_percent: Option<u8>,
}

/// A full point-in-time view of the active session pool (§6's push channel
/// payload: `{sessions:[...], count, max_concurrent}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolSnapshot {
    pub sessions: Vec<SessionSnapshot>,
    pub count: usize,
    pub max_concurrent: usize,
}

pub struct Broadcaster {
    tx: broadcast::Sender<PoolSnapshot>,
}

impl Broadcaster {
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Registers a new subscriber. The receiver only sees snapshots
    /// published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<PoolSnapshot> {
        self.tx.subscribe()
    }

    /// Publishes a snapshot to every current subscriber. No-op (not an
    /// error) when there are no subscribers.
    pub fn publish(&self, snapshot: PoolSnapshot) {
        let _ = self.tx.send(snapshot);
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Broadcaster {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
#[path = "broadcaster_tests.rs"]
mod tests;
