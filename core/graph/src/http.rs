//! reqwest-backed transport.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{header, Client, RequestBuilder, StatusCode};
use std::sync::Arc;
use tracing::trace;

use cirrus_common::{AccessToken, Error, Result};

use crate::config::GraphConfig;
use crate::transport::{Header, Transport};

/// Source of bearer tokens for API requests.
///
/// Token refresh lives behind this trait; the transport asks for a token
/// before every request.
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn access_token(&self) -> Result<AccessToken>;
}

/// A token that never changes, e.g. one passed on the command line.
#[derive(Debug, Clone)]
pub struct StaticToken(AccessToken);

impl StaticToken {
    pub fn new(token: AccessToken) -> Self {
        Self(token)
    }
}

#[async_trait]
impl TokenSource for StaticToken {
    async fn access_token(&self) -> Result<AccessToken> {
        Ok(self.0.clone())
    }
}

/// HTTP transport for the Graph API.
pub struct HttpTransport {
    http: Client,
    base_url: String,
    tokens: Arc<dyn TokenSource>,
}

impl HttpTransport {
    /// Create a transport from the client configuration.
    ///
    /// # Errors
    /// - Invalid configuration
    /// - HTTP client could not be built
    pub fn new(config: &GraphConfig, tokens: Arc<dyn TokenSource>) -> Result<Self> {
        config.validate()?;

        let http = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            tokens,
        })
    }

    /// Absolute URL for a request path. Absolute URLs pass through so that
    /// continuation links from another host still work.
    fn url(&self, path: &str) -> String {
        if path.starts_with("https://") || path.starts_with("http://") {
            path.to_string()
        } else {
            format!("{}{}", self.base_url, path)
        }
    }

    /// Get authorization header.
    async fn auth_header(&self) -> Result<String> {
        let token = self.tokens.access_token().await?;
        Ok(format!("Bearer {}", token.secret()))
    }

    async fn send(&self, request: RequestBuilder, action: &str) -> Result<Bytes> {
        let auth = self.auth_header().await?;
        let response = request
            .header(header::AUTHORIZATION, auth)
            .send()
            .await
            .map_err(|e| Error::Network(format!("Failed to {}: {}", action, e)))?;

        self.handle_response(response, action).await
    }

    /// Handle API response with error checking.
    async fn handle_response(&self, response: reqwest::Response, action: &str) -> Result<Bytes> {
        let status = response.status();
        trace!(%status, action, "Received response");

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::Network(format!("Failed to read response: {}", e)))?;

        match status_error(status, action, &body) {
            Some(err) => Err(err),
            None => Ok(body),
        }
    }
}

/// Map a response status to an error. Success statuses, including
/// 206 Partial Content for range reads, map to `None`.
fn status_error(status: StatusCode, action: &str, body: &[u8]) -> Option<Error> {
    if status.is_success() {
        None
    } else if status == StatusCode::NOT_FOUND {
        Some(Error::NotFound(format!("Resource not found ({})", action)))
    } else if status == StatusCode::UNAUTHORIZED {
        Some(Error::Authentication("Invalid or expired token".to_string()))
    } else if status == StatusCode::FORBIDDEN {
        Some(Error::PermissionDenied("Access denied".to_string()))
    } else {
        Some(Error::Http {
            status: status.as_u16(),
            body: String::from_utf8_lossy(body).into_owned(),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, path: &str, headers: &[Header]) -> Result<Bytes> {
        let mut request = self.http.get(self.url(path));
        for h in headers {
            request = request.header(h.name.as_str(), h.value.as_str());
        }
        self.send(request, "get resource").await
    }

    async fn post(&self, path: &str, body: Vec<u8>) -> Result<Bytes> {
        let request = self
            .http
            .post(self.url(path))
            .header(header::CONTENT_TYPE, "application/json")
            .body(body);
        self.send(request, "create resource").await
    }

    async fn patch(&self, path: &str, body: Vec<u8>) -> Result<Bytes> {
        let request = self
            .http
            .patch(self.url(path))
            .header(header::CONTENT_TYPE, "application/json")
            .body(body);
        self.send(request, "update resource").await
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let request = self.http.delete(self.url(path));
        self.send(request, "delete resource").await.map(|_| ())
    }
}
