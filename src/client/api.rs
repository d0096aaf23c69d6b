//! Inventory API Client
//!
//! Thin async wrapper over `reqwest` that decodes success bodies and turns
//! every failure into a [`ClientError`].

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::client::config::Config;
use crate::shared::ApiError;

/// Failure of a client request
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced an HTTP response
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-2xx status
    #[error("{0}")]
    Api(ApiError),

    /// A 2xx body could not be decoded
    #[error("Failed to parse response: {0}")]
    Decode(String),
}

impl ClientError {
    /// Structured form recorded in the request-state tracker
    pub fn to_api_error(&self) -> ApiError {
        match self {
            Self::Api(error) => error.clone(),
            Self::Transport(e) => ApiError::internal(
                e.status().map(|status| status.as_u16()).unwrap_or(0),
                "Could not reach the server.",
                e.to_string(),
            ),
            Self::Decode(message) => ApiError::internal(
                0,
                "The server sent an unexpected response.",
                message.clone(),
            ),
        }
    }

    /// Message shown to the user
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(error) => error.message().to_string(),
            other => other.to_api_error().message().to_string(),
        }
    }
}

/// Inventory API client
#[derive(Debug, Clone)]
pub struct ApiClient {
    config: Config,
    client: Client,
}

impl ApiClient {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let response = self.send(self.request(Method::GET, path)).await?;
        decode(response).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(self.request(Method::POST, path).json(body)).await?;
        decode(response).await
    }

    /// PUT whose success response carries no body
    pub async fn put<B>(&self, path: &str, body: &B) -> Result<(), ClientError>
    where
        B: Serialize + ?Sized,
    {
        self.send(self.request(Method::PUT, path).json(body)).await?;
        Ok(())
    }

    pub async fn delete(&self, path: &str) -> Result<(), ClientError> {
        self.send(self.request(Method::DELETE, path)).await?;
        Ok(())
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.config.api_url(path);
        tracing::debug!("{} {}", method, url);
        self.client.request(method, url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ClientError> {
        let response = request.send().await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.bytes().await?;
        let error = ApiError::from_response_body(status.as_u16(), &body);
        tracing::warn!("Request failed with {}: {}", status, error.message());
        Err(ClientError::Api(error))
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|e| ClientError::Decode(e.to_string()))
}
