//! Multi-step profile completion wizard.
//!
//! - [`engine`]: the [`FormEngine`] state machine (navigation, validation,
//!   submission, photo selection).
//! - [`context`]: application state handed to the engine.
//! - [`presentation`]: aggregated error notices.
//! - [`config`] and [`telemetry`]: environment configuration and tracing setup.
//! - [`answers`]: prepared field answers for unattended runs.

pub mod answers;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod presentation;
pub mod telemetry;

pub use config::WizardConfig;
pub use context::AppContext;
pub use engine::{AdvanceOutcome, EnginePhase, FormEngine, SubmitOutcome};
pub use error::EngineError;
