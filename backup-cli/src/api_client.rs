use backup_core::SaveRequest;
use backup_http::models::{ErrorResponse, RetrieveProjectResponse, SaveProjectResponse};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("API error ({status}): {message}")]
    Api { status: StatusCode, message: String },
}

pub type ClientResult<T> = Result<T, ClientError>;

pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn project_url(&self) -> String {
        format!("{}/api/project", self.base_url)
    }

    pub async fn save_project(
        &self,
        request: &SaveRequest,
    ) -> ClientResult<SaveProjectResponse> {
        debug!("POST {}", self.project_url());
        let response = self
            .client
            .post(self.project_url())
            .json(request)
            .send()
            .await?;

        parse_response(response).await
    }

    pub async fn retrieve_project(&self, user_id: &str) -> ClientResult<RetrieveProjectResponse> {
        debug!("GET {} for {}", self.project_url(), user_id);
        let response = self
            .client
            .get(self.project_url())
            .query(&[("userId", user_id)])
            .send()
            .await?;

        parse_response(response).await
    }

    pub async fn health_check(&self) -> ClientResult<()> {
        let response = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(()),
            status => Err(ClientError::Api {
                status,
                message: status.to_string(),
            }),
        }
    }
}

/// Decode a success body, or turn the server's `{success, error}` reply into
/// [`ClientError::Api`]
async fn parse_response<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|error| error.error)
        .unwrap_or_else(|_| {
            if body.is_empty() {
                status.to_string()
            } else {
                body
            }
        });

    Err(ClientError::Api { status, message })
}
