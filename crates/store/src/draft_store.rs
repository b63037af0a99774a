//! Per-user persistence of the in-progress profile form.
//!
//! A draft is stored as one JSON record under `profile_form_draft_<userId>`:
//!
//! ```json
//! {"step": 2, "formData": {"bio_en": "...", "date_of_birth": "1998-03-07"}, "lastUpdated": "2024-06-01T10:00:00Z"}
//! ```
//!
//! Every operation is best effort. Storage and decoding failures are logged
//! and swallowed so the wizard keeps working without persistence.

use std::sync::Arc;

use chrono::{Duration, Utc};
use kismet_core::types::Timestamp;
use kismet_core::FormDraft;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::kv::KeyValueStore;

/// Prefix shared by every draft key.
pub const DRAFT_KEY_PREFIX: &str = "profile_form_draft_";

/// Storage key for `user_id`'s draft.
pub fn draft_key(user_id: &str) -> String {
    format!("{DRAFT_KEY_PREFIX}{user_id}")
}

/// A persisted snapshot of the wizard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftRecord {
    /// 1-based step number at the time of saving. Not range checked here.
    pub step: u8,
    pub form_data: FormDraft,
    pub last_updated: Timestamp,
}

impl DraftRecord {
    pub fn new(step: u8, form_data: FormDraft, last_updated: Timestamp) -> Self {
        Self {
            step,
            form_data,
            last_updated,
        }
    }

    pub fn age(&self, now: Timestamp) -> Duration {
        now - self.last_updated
    }

    /// True while the record is younger than `window`.
    pub fn is_fresh(&self, now: Timestamp, window: Duration) -> bool {
        self.age(now) < window
    }
}

/// Draft persistence over any [`KeyValueStore`].
///
/// Methods take an optional user id; without one every call is a no-op.
#[derive(Clone)]
pub struct DraftStore {
    kv: Arc<dyn KeyValueStore>,
}

impl DraftStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Save `form_data` at `step`, stamped with the current time.
    pub async fn save(&self, user_id: Option<&str>, step: u8, form_data: &FormDraft) {
        self.save_at(user_id, step, form_data, Utc::now()).await;
    }

    /// Save with an explicit `lastUpdated` stamp.
    pub async fn save_at(
        &self,
        user_id: Option<&str>,
        step: u8,
        form_data: &FormDraft,
        now: Timestamp,
    ) {
        let Some(user_id) = user_id else {
            return;
        };
        if let Err(e) = self.try_save(user_id, step, form_data, now).await {
            tracing::warn!(error = %e, user_id, step, "Failed to save profile draft");
        }
    }

    /// Load the stored record, if any. Corrupt records read as absent.
    pub async fn load(&self, user_id: Option<&str>) -> Option<DraftRecord> {
        let user_id = user_id?;
        match self.try_load(user_id).await {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(error = %e, user_id, "Failed to load profile draft");
                None
            }
        }
    }

    pub async fn clear(&self, user_id: Option<&str>) {
        let Some(user_id) = user_id else {
            return;
        };
        if let Err(e) = self.kv.remove(&draft_key(user_id)).await {
            tracing::warn!(error = %e, user_id, "Failed to clear profile draft");
        }
    }

    /// Remove every user's draft.
    pub async fn clear_all(&self) {
        match self.try_clear_all().await {
            Ok(0) => tracing::debug!("No profile drafts to clear"),
            Ok(removed) => tracing::info!(removed, "Cleared all profile drafts"),
            Err(e) => tracing::warn!(error = %e, "Failed to clear profile drafts"),
        }
    }

    async fn try_save(
        &self,
        user_id: &str,
        step: u8,
        form_data: &FormDraft,
        now: Timestamp,
    ) -> Result<(), StoreError> {
        let record = DraftRecord::new(step, form_data.clone(), now);
        let json = serde_json::to_string(&record)?;
        self.kv.set(&draft_key(user_id), json).await?;
        tracing::debug!(user_id, step, "Saved profile draft");
        Ok(())
    }

    async fn try_load(&self, user_id: &str) -> Result<Option<DraftRecord>, StoreError> {
        let Some(raw) = self.kv.get(&draft_key(user_id)).await? else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_str(&raw)?))
    }

    async fn try_clear_all(&self) -> Result<usize, StoreError> {
        let mut removed = 0;
        for key in self.kv.keys().await? {
            if key.starts_with(DRAFT_KEY_PREFIX) {
                self.kv.remove(&key).await?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
