use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use kismet_core::payload::ZeroIdPolicy;

use crate::error::EngineError;

const DEFAULT_DRAFT_TTL_HOURS: i64 = 24;

/// Wizard configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone, PartialEq)]
pub struct WizardConfig {
    /// Base URL of the profile API (default: `http://localhost:8000/api`).
    pub api_url: String,
    /// Bearer token for the profile API, if signed in.
    pub api_token: Option<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub api_timeout_secs: u64,
    /// Directory holding persisted drafts (default: `data/drafts`).
    pub draft_dir: PathBuf,
    /// Age in hours after which a saved draft is discarded (default: `24`).
    pub draft_ttl_hours: i64,
    /// Largest accepted profile photo in bytes (default: 5 MiB).
    pub max_image_bytes: u64,
    /// How zero ids are sent (default: collapsed to `null`).
    pub zero_id_policy: ZeroIdPolicy,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8000/api".into(),
            api_token: None,
            api_timeout_secs: 30,
            draft_dir: PathBuf::from("data/drafts"),
            draft_ttl_hours: DEFAULT_DRAFT_TTL_HOURS,
            max_image_bytes: 5 * 1024 * 1024,
            zero_id_policy: ZeroIdPolicy::CollapseToNull,
        }
    }
}

impl WizardConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                     |
    /// |---------------------------|-----------------------------|
    /// | `KISMET_API_URL`          | `http://localhost:8000/api` |
    /// | `KISMET_API_TOKEN`        | unset                       |
    /// | `KISMET_API_TIMEOUT_SECS` | `30`                        |
    /// | `KISMET_DRAFT_DIR`        | `data/drafts`               |
    /// | `KISMET_DRAFT_TTL_HOURS`  | `24`                        |
    /// | `KISMET_MAX_IMAGE_BYTES`  | `5242880`                   |
    /// | `KISMET_KEEP_ZERO_IDS`    | `false`                     |
    ///
    /// Values that fail to parse are logged and replaced by the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let api_url = lookup("KISMET_API_URL")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.api_url);
        let api_token = lookup("KISMET_API_TOKEN").filter(|v| !v.trim().is_empty());
        let draft_dir = lookup("KISMET_DRAFT_DIR")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.draft_dir);

        let api_timeout_secs = parsed(&lookup, "KISMET_API_TIMEOUT_SECS", defaults.api_timeout_secs);
        let draft_ttl_hours = parsed_where(
            &lookup,
            "KISMET_DRAFT_TTL_HOURS",
            defaults.draft_ttl_hours,
            |hours| ttl_from_hours(*hours).is_some(),
        );
        let max_image_bytes = parsed(&lookup, "KISMET_MAX_IMAGE_BYTES", defaults.max_image_bytes);
        let keep_zero_ids = parsed(&lookup, "KISMET_KEEP_ZERO_IDS", false);

        Self {
            api_url,
            api_token,
            api_timeout_secs,
            draft_dir,
            draft_ttl_hours,
            max_image_bytes,
            zero_id_policy: if keep_zero_ids {
                ZeroIdPolicy::Keep
            } else {
                ZeroIdPolicy::CollapseToNull
            },
        }
    }

    pub fn api_timeout(&self) -> Duration {
        Duration::from_secs(self.api_timeout_secs)
    }

    /// Freshness window for saved drafts. Falls back to 24 hours when
    /// `draft_ttl_hours` is not a positive, representable duration.
    pub fn draft_ttl(&self) -> chrono::Duration {
        ttl_from_hours(self.draft_ttl_hours)
            .unwrap_or_else(|| chrono::Duration::hours(DEFAULT_DRAFT_TTL_HOURS))
    }
}

fn ttl_from_hours(hours: i64) -> Option<chrono::Duration> {
    if hours <= 0 {
        return None;
    }
    chrono::Duration::try_hours(hours)
}

fn parse_value<T: FromStr>(key: &'static str, raw: &str) -> Result<T, EngineError> {
    raw.trim().parse().map_err(|_| EngineError::InvalidConfig {
        key,
        value: raw.to_string(),
    })
}

fn parsed<T: FromStr + Copy + std::fmt::Debug>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> T {
    parsed_where(lookup, key, default, |_| true)
}

fn parsed_where<T: FromStr + Copy + std::fmt::Debug>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
    accept: impl Fn(&T) -> bool,
) -> T {
    let Some(raw) = lookup(key) else {
        return default;
    };
    let value = parse_value(key, &raw).and_then(|value: T| {
        if accept(&value) {
            Ok(value)
        } else {
            Err(EngineError::InvalidConfig {
                key,
                value: raw.clone(),
            })
        }
    });
    match value {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, default = ?default, "Falling back to default");
            default
        }
    }
}
