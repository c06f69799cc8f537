use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use tasklist_core::{ApiRequest, Method, RawResponse, RequestError, Transport};
use tracing::{debug, warn};

const USER_AGENT: &str = concat!("tasklist/", env!("CARGO_PKG_VERSION"));

/// [`Transport`] backed by an async reqwest client. One request per call, no retries.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .context("failed building HTTP client for the task API")?;
        Ok(Self { client })
    }
}

fn to_reqwest(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
        Method::Patch => reqwest::Method::PATCH,
    }
}

#[async_trait(?Send)]
impl Transport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, RequestError> {
        debug!(method = request.method.as_str(), url = %request.url, "sending request");

        let mut builder = self
            .client
            .request(to_reqwest(request.method), request.url.as_str())
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(body) = request.body {
            builder = builder
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body);
        }

        let response = builder.send().await.map_err(|error| {
            warn!(url = %request.url, error = %error, "request did not complete");
            RequestError::transport(error)
        })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|error| {
            warn!(url = %request.url, status, error = %error, "failed reading response body");
            RequestError::transport(error)
        })?;

        debug!(status, bytes = body.len(), "response received");
        Ok(RawResponse { status, body })
    }
}
