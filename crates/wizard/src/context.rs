//! Application state shared with the wizard.

use std::sync::Arc;

use kismet_api::ProfileState;
use kismet_core::i18n::{EnglishOnly, Translator};
use kismet_core::types::UserId;
use tokio::sync::RwLock;

/// Signed-in user, their last known profile and the active translator.
///
/// Passed explicitly to [`FormEngine`](crate::engine::FormEngine); the engine
/// writes the refreshed profile back here after a successful submission.
pub struct AppContext {
    user_id: Option<UserId>,
    profile: RwLock<Option<ProfileState>>,
    translator: Arc<dyn Translator>,
}

impl AppContext {
    pub fn new(user_id: Option<UserId>, translator: Arc<dyn Translator>) -> Self {
        Self {
            user_id,
            profile: RwLock::new(None),
            translator,
        }
    }

    /// No user, English messages.
    pub fn anonymous() -> Self {
        Self::new(None, Arc::new(EnglishOnly))
    }

    pub fn with_profile(self, profile: ProfileState) -> Self {
        Self {
            profile: RwLock::new(Some(profile)),
            ..self
        }
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn translator(&self) -> &dyn Translator {
        self.translator.as_ref()
    }

    pub async fn profile(&self) -> Option<ProfileState> {
        self.profile.read().await.clone()
    }

    pub async fn set_profile(&self, profile: ProfileState) {
        *self.profile.write().await = Some(profile);
    }

    /// Avatar URL of the stored profile, if any.
    pub async fn avatar_url(&self) -> Option<String> {
        self.profile
            .read()
            .await
            .as_ref()
            .and_then(|p| p.avatar_url().map(str::to_string))
    }
}
