//! Local persistence for the profile wizard.
//!
//! - [`kv`]: the [`KeyValueStore`] seam plus memory and file backends.
//! - [`draft_store`]: per-user draft records on top of any backend.
//! - [`writer`]: background last-write-wins persistence of the working draft.

pub mod draft_store;
pub mod error;
pub mod kv;
pub mod writer;

pub use draft_store::{DraftRecord, DraftStore};
pub use error::StoreError;
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use writer::DraftWriter;
