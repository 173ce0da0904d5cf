//! Shared request base for every resource client.
//!
//! # Design
//! `ApiBase` owns one immutable request template: the base URL, the `key`
//! and `token` query parameters, and JSON `Content-Type`/`Accept` headers.
//! Callers derive a `RequestSpec` from the template, optionally extend it,
//! and dispatch it. Dispatch returns the response to the caller and keeps
//! nothing behind; there is no "last response" to read back later.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::config::Config;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, RequestSpec};
use crate::transport::{Transport, UreqTransport};

const JSON: &str = "application/json";

#[derive(Clone)]
pub struct ApiBase {
    base_url: String,
    template: RequestSpec,
    transport: Arc<dyn Transport>,
}

impl ApiBase {
    /// Base that talks to the network through `ureq`.
    pub fn new(config: &Config) -> Self {
        Self::with_transport(config, Arc::new(UreqTransport::new()))
    }

    pub fn with_transport(config: &Config, transport: Arc<dyn Transport>) -> Self {
        let template = RequestSpec::default()
            .query_param("key", config.api_key())
            .query_param("token", config.api_token())
            .header("Content-Type", JSON)
            .header("Accept", JSON);
        Self {
            base_url: config.base_url().to_string(),
            template,
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The template alone.
    pub fn request(&self) -> RequestSpec {
        self.template.clone()
    }

    /// The template with a raw body attached.
    pub fn request_with_body(&self, body: impl Into<String>) -> RequestSpec {
        self.request().body(body)
    }

    /// The template with `body` serialized as JSON.
    pub fn request_with_json<T: Serialize>(&self, body: &T) -> Result<RequestSpec, ApiError> {
        let body =
            serde_json::to_string(body).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(self.request_with_body(body))
    }

    /// The template extended with extra headers, extra query parameters and
    /// an optional body. Extras are appended after the template's entries.
    pub fn custom_request(
        &self,
        extra_headers: Option<&[(&str, &str)]>,
        extra_params: Option<&[(&str, &str)]>,
        body: Option<String>,
    ) -> RequestSpec {
        let mut spec = self.request();
        for (name, value) in extra_headers.unwrap_or_default() {
            spec = spec.header(name, value);
        }
        for (name, value) in extra_params.unwrap_or_default() {
            spec = spec.query_param(name, value);
        }
        if let Some(body) = body {
            spec = spec.body(body);
        }
        spec
    }

    /// Dispatch with a verb given as text, e.g. `"post"`.
    ///
    /// The verb is validated before anything is sent; an unknown verb fails
    /// with `ApiError::UnsupportedMethod`.
    pub fn send_request(
        &self,
        endpoint: &str,
        method: &str,
        request: RequestSpec,
    ) -> Result<HttpResponse, ApiError> {
        let method: HttpMethod = method.parse()?;
        self.send(endpoint, method, request)
    }

    pub fn send(
        &self,
        endpoint: &str,
        method: HttpMethod,
        request: RequestSpec,
    ) -> Result<HttpResponse, ApiError> {
        let request = HttpRequest {
            method,
            url: self.url(endpoint),
            headers: request.headers,
            query: request.query,
            body: request.body,
        };
        debug!(method = %request.method, url = %request.url, "dispatching request");
        let response = self.transport.execute(&request)?;
        debug!(
            method = %request.method,
            url = %request.url,
            status = response.status,
            elapsed_ms = response.elapsed_ms() as u64,
            "request completed"
        );
        Ok(response)
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }
}
