//! # Activity Recorder
//!
//! Best-effort, non-blocking audit trail.
//!
//! ## Design
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Activity Recording Path                          │
//! │                                                                     │
//! │  Business operation (settlement, allocation, ...)                   │
//! │       │                                                             │
//! │       │ record()  - try_send, NEVER blocks, NEVER fails the caller  │
//! │       ▼                                                             │
//! │  mpsc channel (bounded)                                             │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ActivityWorker (background task)                                   │
//! │       │ insert into activity_log                                    │
//! │       └── failure? logged via tracing, dropped - the business       │
//! │           operation already succeeded and stays succeeded           │
//! │                                                                     │
//! │  A full channel or a dead worker increments `dropped_entries`,      │
//! │  surfacing silent audit gaps without ever conflating an audit       │
//! │  outage with business-transaction correctness.                      │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use welgama_core::{ActivityEntry, Actor};
use welgama_db::repository::activity::generate_activity_id;
use welgama_db::Database;

/// Default channel capacity. A small shop produces a handful of entries
/// per minute; 256 absorbs any realistic burst.
pub const DEFAULT_BUFFER: usize = 256;

/// One queued audit entry.
#[derive(Debug)]
pub struct ActivityRequest {
    pub actor_id: String,
    pub actor_name: String,
    pub action: String,
    pub description: String,
    pub metadata: serde_json::Value,
}

/// Creates a connected recorder/worker pair.
///
/// Spawn the worker (`tokio::spawn(worker.run())`) and hand the recorder
/// to [`crate::Pos`].
pub fn channel(db: Database, buffer: usize) -> (ActivityRecorder, ActivityWorker) {
    let (tx, rx) = mpsc::channel(buffer);
    let recorder = ActivityRecorder {
        tx,
        dropped: Arc::new(AtomicU64::new(0)),
    };
    let worker = ActivityWorker { db, rx };
    (recorder, worker)
}

// =============================================================================
// Recorder (caller side)
// =============================================================================

/// Fire-and-forget handle for recording audit entries.
#[derive(Debug, Clone)]
pub struct ActivityRecorder {
    tx: mpsc::Sender<ActivityRequest>,
    dropped: Arc<AtomicU64>,
}

impl ActivityRecorder {
    /// Records one audit entry. Fire and forget: no return value, no
    /// blocking, and no effect on the caller's success path.
    pub fn record(
        &self,
        actor: &Actor,
        action: &str,
        description: impl Into<String>,
        metadata: serde_json::Value,
    ) {
        let request = ActivityRequest {
            actor_id: actor.id.clone(),
            actor_name: actor.name.clone(),
            action: action.to_string(),
            description: description.into(),
            metadata,
        };

        if let Err(e) = self.tx.try_send(request) {
            // Full or closed channel: the entry is lost by design. Count
            // it so the gap is observable.
            self.dropped.fetch_add(1, Ordering::Relaxed);
            warn!(action = %action, error = %e, "Activity entry dropped");
        }
    }

    /// Number of entries lost to a full or closed channel since startup.
    /// A nonzero value means the audit trail has gaps.
    pub fn dropped_entries(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

// =============================================================================
// Worker (consumer side)
// =============================================================================

/// Background worker draining the channel into `activity_log`.
///
/// Exits when every recorder handle has been dropped.
pub struct ActivityWorker {
    db: Database,
    rx: mpsc::Receiver<ActivityRequest>,
}

impl ActivityWorker {
    /// Runs the worker until the channel closes.
    pub async fn run(mut self) {
        info!("Activity log worker started");

        while let Some(request) = self.rx.recv().await {
            let entry = ActivityEntry {
                id: generate_activity_id(),
                action: request.action,
                description: request.description,
                metadata: request.metadata.to_string(),
                actor_id: request.actor_id,
                actor_name: request.actor_name,
                created_at: Utc::now(),
            };

            if let Err(e) = self.db.activity().append(&entry).await {
                // The business operation already committed; an audit
                // write failure is logged and discarded.
                error!(action = %entry.action, error = %e, "Failed to write activity entry");
            }
        }

        info!("Activity channel closed, worker stopping");
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use welgama_db::DbConfig;

    fn actor() -> Actor {
        Actor::new("u1", "Test Cashier", "cashier")
    }

    #[tokio::test]
    async fn test_entries_reach_the_log() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let (recorder, worker) = channel(db.clone(), 16);

        recorder.record(
            &actor(),
            "sale.complete",
            "Sale 1",
            serde_json::json!({"totalCents": 10000}),
        );
        recorder.record(&actor(), "payment.record", "Payment", serde_json::json!({}));

        // Closing the channel lets the worker drain and exit
        drop(recorder);
        worker.run().await;

        let entries = db.activity().list(10, 0).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().any(|e| e.action == "sale.complete"));
    }

    #[tokio::test]
    async fn test_dead_worker_never_fails_the_caller() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let (recorder, worker) = channel(db, 16);

        // Worker never runs; dropping the receiver closes the channel
        drop(worker);

        recorder.record(&actor(), "sale.complete", "Sale", serde_json::json!({}));
        recorder.record(&actor(), "sale.credit", "Sale", serde_json::json!({}));

        // Both were silently dropped and counted
        assert_eq!(recorder.dropped_entries(), 2);
    }

    #[tokio::test]
    async fn test_full_channel_drops_and_counts() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let (recorder, _worker) = channel(db, 1);

        // Worker not started: first entry fills the buffer, second drops
        recorder.record(&actor(), "a", "first", serde_json::json!({}));
        recorder.record(&actor(), "b", "second", serde_json::json!({}));

        assert_eq!(recorder.dropped_entries(), 1);
    }
}
