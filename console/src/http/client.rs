//! HTTP client implementation

use std::time::Duration;

use http::header;
use reqwest::{Client, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use station_api::models::ErrorResponse;
use tracing::{debug, error};
use url::Url;

use crate::errors::ConsoleError;

/// HTTP client for the station backend
pub struct HttpClient {
    client: Client,
    base_url: Url,
}

impl HttpClient {
    /// Create a new HTTP client; `timeout` of `None` waits indefinitely
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ConsoleError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ConsoleError::ConfigError(format!(
                "Backend URL cannot be a base: {}",
                base_url
            )));
        }

        Ok(Self {
            client: builder.build()?,
            base_url,
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build an endpoint URL; each segment is percent-encoded
    pub fn url(&self, segments: &[&str]) -> Result<Url, ConsoleError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ConsoleError::ConfigError("Backend URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Make a GET request and decode the JSON body
    pub async fn get<T: DeserializeOwned>(&self, segments: &[&str], cookie: &str) -> Result<T, ConsoleError> {
        let url = self.url(segments)?;
        debug!("GET {}", url);

        let response = self.execute("GET", self.client.get(url), cookie).await?;
        Ok(response.json().await?)
    }

    /// Make a POST request, ignoring the response body
    pub async fn post<B: Serialize>(&self, segments: &[&str], cookie: &str, body: &B) -> Result<(), ConsoleError> {
        let url = self.url(segments)?;
        debug!("POST {}", url);

        self.execute("POST", self.client.post(url).json(body), cookie).await?;
        Ok(())
    }

    /// Make a PUT request, ignoring the response body
    pub async fn put<B: Serialize>(&self, segments: &[&str], cookie: &str, body: &B) -> Result<(), ConsoleError> {
        let url = self.url(segments)?;
        debug!("PUT {}", url);

        self.execute("PUT", self.client.put(url).json(body), cookie).await?;
        Ok(())
    }

    /// Make a DELETE request
    pub async fn delete(&self, segments: &[&str], cookie: &str) -> Result<(), ConsoleError> {
        let url = self.url(segments)?;
        debug!("DELETE {}", url);

        self.execute("DELETE", self.client.delete(url), cookie).await?;
        Ok(())
    }

    /// Make a POST request and return the status code whatever it is
    pub async fn post_for_status<B: Serialize>(
        &self,
        segments: &[&str],
        cookie: &str,
        body: &B,
    ) -> Result<u16, ConsoleError> {
        let url = self.url(segments)?;
        debug!("POST {}", url);

        let response = with_cookie(self.client.post(url).json(body), cookie).send().await?;
        Ok(response.status().as_u16())
    }

    async fn execute(&self, method: &str, request: RequestBuilder, cookie: &str) -> Result<Response, ConsoleError> {
        let response = with_cookie(request, cookie).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("HTTP {} failed: {} - {}", method, status, body);
            return Err(ConsoleError::RequestError {
                status: status.as_u16(),
                message: ErrorResponse::message_from_body(&body),
            });
        }

        Ok(response)
    }
}

fn with_cookie(request: RequestBuilder, cookie: &str) -> RequestBuilder {
    if cookie.is_empty() {
        request
    } else {
        request.header(header::COOKIE, cookie)
    }
}
