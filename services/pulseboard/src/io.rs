//! reqwest-backed transport

use async_trait::async_trait;
use pulseboard_core::io::{HttpClient, HttpRequest, HttpResponse, Method};
use pulseboard_core::DashboardError;
use reqwest::header::CONTENT_TYPE;
use reqwest::Url;

/// Production HTTP client using reqwest
#[derive(Default)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn send(&self, request: HttpRequest) -> pulseboard_core::Result<HttpResponse> {
        let method = request.method;
        tracing::debug!("{} {}", method, request.url);

        let url = Url::parse_with_params(&request.url, &request.query)
            .map_err(|e| DashboardError::Http(format!("Invalid URL {}: {}", request.url, e)))?;

        let verb = match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(verb, url);
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = request.json_body {
            builder = builder.header(CONTENT_TYPE, "application/json").body(body);
        }

        let response = builder.send().await.map_err(|e| {
            DashboardError::Http(format!("{} {} failed: {}", method, request.url, e))
        })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| DashboardError::Http(format!("Reading response body: {}", e)))?;

        tracing::debug!(
            "{} {} -> {} ({} bytes)",
            method,
            request.url,
            status,
            body.len()
        );
        Ok(HttpResponse { status, body })
    }
}
