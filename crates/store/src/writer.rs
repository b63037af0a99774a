//! Background draft persistence.
//!
//! [`DraftWriter`] owns a task that saves the latest `{step, formData}`
//! snapshot for one user. Callers enqueue snapshots without waiting; only the
//! newest pending snapshot is written, so a burst of edits costs one write.
//! [`DraftWriter::shutdown`] writes whatever is still pending before the task
//! exits.

use kismet_core::types::UserId;
use kismet_core::FormDraft;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::draft_store::DraftStore;

/// The state handed to the writer task.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftSnapshot {
    pub step: u8,
    pub form_data: FormDraft,
}

#[derive(Debug, Clone)]
struct Pending {
    generation: u64,
    snapshot: DraftSnapshot,
}

/// Handle to the background writer for one user.
pub struct DraftWriter {
    pending: watch::Sender<Option<Pending>>,
    saved: watch::Receiver<u64>,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl DraftWriter {
    /// Start the writer task on the current runtime.
    pub fn spawn(store: DraftStore, user_id: UserId) -> Self {
        let (pending, rx) = watch::channel(None);
        let (saved_tx, saved) = watch::channel(0);
        let cancel = CancellationToken::new();

        let handle = tokio::spawn(run(store, user_id, rx, saved_tx, cancel.clone()));

        Self {
            pending,
            saved,
            cancel,
            handle,
        }
    }

    /// Replace the pending snapshot. Never blocks.
    pub fn enqueue(&self, step: u8, form_data: FormDraft) {
        self.pending.send_modify(|slot| {
            let generation = slot.as_ref().map_or(1, |p| p.generation + 1);
            *slot = Some(Pending {
                generation,
                snapshot: DraftSnapshot { step, form_data },
            });
        });
    }

    /// Wait until everything enqueued so far has been written.
    pub async fn flush(&self) {
        let target = self.pending.borrow().as_ref().map_or(0, |p| p.generation);
        let mut saved = self.saved.clone();
        // Err means the task is gone; nothing left to wait for.
        let _ = saved.wait_for(|generation| *generation >= target).await;
    }

    /// Write the final pending snapshot, then stop the task.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        if let Err(e) = self.handle.await {
            tracing::error!(error = %e, "Draft writer task failed");
        }
    }
}

async fn run(
    store: DraftStore,
    user_id: UserId,
    mut rx: watch::Receiver<Option<Pending>>,
    saved: watch::Sender<u64>,
    cancel: CancellationToken,
) {
    tracing::debug!(user_id = %user_id, "Draft writer started");

    loop {
        tokio::select! {
            biased;
            changed = rx.changed() => {
                if changed.is_err() {
                    tracing::debug!(user_id = %user_id, "Draft writer handle dropped");
                    break;
                }
                write_latest(&store, &user_id, &mut rx, &saved).await;
            }
            _ = cancel.cancelled() => {
                if rx.has_changed().unwrap_or(false) {
                    write_latest(&store, &user_id, &mut rx, &saved).await;
                }
                tracing::debug!(user_id = %user_id, "Draft writer stopping");
                break;
            }
        }
    }
}

async fn write_latest(
    store: &DraftStore,
    user_id: &str,
    rx: &mut watch::Receiver<Option<Pending>>,
    saved: &watch::Sender<u64>,
) {
    let latest = rx.borrow_and_update().clone();
    if let Some(Pending {
        generation,
        snapshot,
    }) = latest
    {
        store
            .save(Some(user_id), snapshot.step, &snapshot.form_data)
            .await;
        saved.send_replace(generation);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::kv::MemoryStore;

    fn store() -> DraftStore {
        DraftStore::new(Arc::new(MemoryStore::new()))
    }

    fn draft(bio: &str) -> FormDraft {
        FormDraft {
            bio_en: bio.into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn flush_waits_for_latest_snapshot() {
        let store = store();
        let writer = DraftWriter::spawn(store.clone(), "9".into());

        writer.enqueue(1, draft("first"));
        writer.enqueue(2, draft("second"));
        writer.enqueue(3, draft("third"));
        writer.flush().await;

        let record = store.load(Some("9")).await.unwrap();
        assert_eq!(record.step, 3);
        assert_eq!(record.form_data.bio_en, "third");

        writer.shutdown().await;
    }

    #[tokio::test]
    async fn shutdown_writes_pending_snapshot() {
        let store = store();
        let writer = DraftWriter::spawn(store.clone(), "9".into());

        writer.enqueue(2, draft("pending"));
        writer.shutdown().await;

        let record = store.load(Some("9")).await.unwrap();
        assert_eq!(record.step, 2);
        assert_eq!(record.form_data.bio_en, "pending");
    }

    #[tokio::test]
    async fn flush_with_nothing_enqueued_returns() {
        let store = store();
        let writer = DraftWriter::spawn(store.clone(), "9".into());
        writer.flush().await;
        assert_eq!(store.load(Some("9")).await, None);
        writer.shutdown().await;
    }

    #[tokio::test]
    async fn writes_after_shutdown_do_not_resurrect_draft() {
        let store = store();
        let writer = DraftWriter::spawn(store.clone(), "9".into());
        writer.enqueue(1, draft("x"));
        writer.shutdown().await;

        store.clear(Some("9")).await;
        tokio::task::yield_now().await;
        assert_eq!(store.load(Some("9")).await, None);
    }
}
