//! Kismet profile wizard domain logic.
//!
//! Pure, I/O-free building blocks shared by the store, API client and wizard
//! engine crates:
//!
//! - [`draft`]: the working [`FormDraft`] and its field names.
//! - [`steps`]: the fixed step table and per-step field ownership.
//! - [`validation`]: rule interpreter, profile schema and cross-field checks.
//! - [`payload`]: normalization of a draft into the submission body.
//! - [`i18n`]: translation lookup with English fallbacks.

pub mod draft;
pub mod error;
pub mod i18n;
pub mod payload;
pub mod steps;
pub mod types;
pub mod validation;

pub use draft::FormDraft;
pub use error::CoreError;
