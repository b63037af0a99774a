//! Client side of the remote profile API.
//!
//! The wizard depends only on the [`ProfileApi`] trait; [`HttpProfileApi`]
//! is the production implementation. Server-side validation failures
//! (HTTP 422) are kept distinct from every other failure in [`ApiError`].

pub mod client;
pub mod error;
pub mod profile;

pub use client::{HttpProfileApi, ProfileApi};
pub use error::ApiError;
pub use profile::{PhotoUpload, ProfileState};
