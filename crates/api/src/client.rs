//! REST client for the profile endpoints.
//!
//! [`ProfileApi`] is the seam the wizard engine talks to; [`HttpProfileApi`]
//! implements it over [`reqwest`]:
//!
//! | Operation              | Request                   |
//! |------------------------|---------------------------|
//! | `fetch_profile`        | `GET /profile`            |
//! | `update_profile`       | `POST /profile`           |
//! | `update_profile_photo` | `POST /profile/photo`     |
//! | `remove_profile_photo` | `DELETE /profile/photo`   |

use std::time::Duration;

use async_trait::async_trait;
use kismet_core::payload::SubmissionPayload;
use reqwest::{Method, RequestBuilder, StatusCode};

use crate::error::ApiError;
use crate::profile::{PhotoUpload, ProfileEnvelope, ProfileState};

/// Remote profile operations.
#[async_trait]
pub trait ProfileApi: Send + Sync {
    async fn fetch_profile(&self) -> Result<ProfileState, ApiError>;

    async fn update_profile(&self, payload: &SubmissionPayload) -> Result<(), ApiError>;

    async fn update_profile_photo(&self, upload: PhotoUpload) -> Result<(), ApiError>;

    async fn remove_profile_photo(&self) -> Result<(), ApiError>;
}

/// HTTP client for the profile backend.
#[derive(Debug, Clone)]
pub struct HttpProfileApi {
    client: reqwest::Client,
    api_url: String,
    token: Option<String>,
}

impl HttpProfileApi {
    /// Create a client with its own connection pool.
    ///
    /// * `api_url` - Base URL including any path prefix, e.g.
    ///   `http://localhost:8000/api`.
    pub fn new(api_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, api_url))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, api_url: impl Into<String>) -> Self {
        Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Attach a bearer token to every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    // ---- private helpers ----

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}{}", self.api_url, path))
            .header(reqwest::header::ACCEPT, "application/json");
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Returns the response unchanged on success. A 422 becomes
    /// [`ApiError::Validation`]; any other failure status becomes
    /// [`ApiError::Status`] with the body text.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());

        if status == StatusCode::UNPROCESSABLE_ENTITY {
            return Err(ApiError::from_unprocessable(body));
        }
        Err(ApiError::Status {
            status: status.as_u16(),
            body,
        })
    }

    async fn check_status(response: reqwest::Response) -> Result<(), ApiError> {
        Self::ensure_success(response).await?;
        Ok(())
    }
}

#[async_trait]
impl ProfileApi for HttpProfileApi {
    async fn fetch_profile(&self) -> Result<ProfileState, ApiError> {
        let response = self.request(Method::GET, "/profile").send().await?;
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<ProfileEnvelope>().await?.into_inner())
    }

    async fn update_profile(&self, payload: &SubmissionPayload) -> Result<(), ApiError> {
        let response = self
            .request(Method::POST, "/profile")
            .json(payload)
            .send()
            .await?;
        Self::check_status(response).await?;
        tracing::info!("Profile updated");
        Ok(())
    }

    async fn update_profile_photo(&self, upload: PhotoUpload) -> Result<(), ApiError> {
        let size = upload.len();
        let builder = self.request(Method::POST, "/profile/photo");
        let builder = match upload {
            PhotoUpload::Multipart {
                bytes,
                file_name,
                mime_type,
            } => {
                let part = reqwest::multipart::Part::bytes(bytes)
                    .file_name(file_name)
                    .mime_str(&mime_type)?;
                builder.multipart(reqwest::multipart::Form::new().part("photo", part))
            }
            PhotoUpload::Base64 { data, mime_type } => builder.json(&serde_json::json!({
                "photo": data,
                "type": mime_type,
            })),
        };

        let response = builder.send().await?;
        Self::check_status(response).await?;
        tracing::info!(bytes = size, "Profile photo uploaded");
        Ok(())
    }

    async fn remove_profile_photo(&self) -> Result<(), ApiError> {
        let response = self.request(Method::DELETE, "/profile/photo").send().await?;
        Self::check_status(response).await
    }
}
