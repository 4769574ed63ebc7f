use reqwest::{Client, StatusCode};
use shared::{
    domain::{Post, PostId},
    error::{ApiErrorBody, ApiRejection},
    protocol::{ContactRequest, PostResponse, PostsResponse},
};
use thiserror::Error;
use tracing::{debug, warn};

pub mod content;
pub mod fetch;
pub mod form;

#[derive(Debug, Error)]
pub enum ApiClientError {
    /// The request never produced an HTTP response.
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),
    /// The server answered with a non-success status.
    #[error("server returned HTTP status {status}")]
    Status { status: u16 },
    /// The response arrived but its body did not match the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(#[source] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum SubmitError {
    /// The submission never reached the server.
    #[error("contact submission failed to reach the server: {0}")]
    Transport(#[source] reqwest::Error),
    /// The server refused the submission with a non-2xx status.
    #[error("contact submission rejected: {0}")]
    Rejected(#[from] ApiRejection),
}

/// Thin client over the remote blog/contact API. Requests are
/// single-shot: no retries, no caching, no timeout beyond the HTTP
/// stack's own defaults.
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches the full post collection, in the order the server chose.
    pub async fn list_posts(&self) -> Result<Vec<Post>, ApiClientError> {
        let response = self
            .http
            .get(format!("{}/posts", self.base_url))
            .send()
            .await
            .map_err(ApiClientError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "post list request failed");
            return Err(ApiClientError::Status {
                status: status.as_u16(),
            });
        }

        let body: PostsResponse = response.json().await.map_err(ApiClientError::Decode)?;
        debug!(count = body.posts.len(), "fetched post list");
        Ok(body.posts)
    }

    /// Fetches one post by id. Both an HTTP 404 and a success body with
    /// a null `post` mean the id is unknown and map to `Ok(None)`.
    pub async fn fetch_post(&self, post_id: PostId) -> Result<Option<Post>, ApiClientError> {
        let response = self
            .http
            .get(format!("{}/posts/{}", self.base_url, post_id.0))
            .send()
            .await
            .map_err(ApiClientError::Transport)?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!(post_id = post_id.0, "post not found");
            return Ok(None);
        }

        let status = response.status();
        if !status.is_success() {
            warn!(
                post_id = post_id.0,
                status = status.as_u16(),
                "post detail request failed"
            );
            return Err(ApiClientError::Status {
                status: status.as_u16(),
            });
        }

        let body: PostResponse = response.json().await.map_err(ApiClientError::Decode)?;
        Ok(body.post)
    }

    /// Fetches raw image bytes from an absolute URL. Post thumbnails
    /// live on a CDN outside the API base path, so the URL is taken
    /// as served.
    pub async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, ApiClientError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(ApiClientError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), url, "image fetch failed");
            return Err(ApiClientError::Status {
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(ApiClientError::Decode)?;
        Ok(bytes.to_vec())
    }

    /// Submits a contact message. Any 2xx is success and the body is
    /// ignored; a non-2xx is reported with the server's `message` when
    /// its body parses as one, else the bare status.
    pub async fn submit_contact(&self, request: &ContactRequest) -> Result<(), SubmitError> {
        let response = self
            .http
            .post(format!("{}/contacts", self.base_url))
            .json(request)
            .send()
            .await
            .map_err(SubmitError::Transport)?;

        let status = response.status();
        if status.is_success() {
            debug!("contact submission accepted");
            return Ok(());
        }

        let message = response
            .json::<ApiErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message);
        warn!(
            status = status.as_u16(),
            has_server_message = message.is_some(),
            "contact submission rejected"
        );
        Err(SubmitError::Rejected(ApiRejection::new(
            status.as_u16(),
            message,
        )))
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
