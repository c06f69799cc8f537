use async_trait::async_trait;
use gloo::net::http::Request;
use tasklist_core::config::Config;
use tasklist_core::{
  ApiRequest,
  Method,
  RawResponse,
  RequestError,
  Transport
};

/// Defaults plus the build-time
/// `TASKLIST_API_BASE` override.
pub fn web_config() -> Config {
  let mut cfg = Config::defaults();
  if let Some(base) =
    option_env!("TASKLIST_API_BASE")
  {
    cfg.apply_overrides([(
      "api.base_url".to_string(),
      base.to_string()
    )]);
  }
  cfg
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FetchTransport;

#[async_trait(?Send)]
impl Transport for FetchTransport {
  async fn send(
    &self,
    request: ApiRequest
  ) -> Result<RawResponse, RequestError>
  {
    let url = request.url.as_str();
    let builder = match request.method {
      | Method::Get => Request::get(url),
      | Method::Post => {
        Request::post(url)
      }
      | Method::Put => Request::put(url),
      | Method::Delete => {
        Request::delete(url)
      }
      | Method::Patch => {
        Request::patch(url)
      }
    }
    .header(
      "Accept",
      "application/json"
    );

    let outgoing = match request.body {
      | Some(body) => {
        builder
          .header(
            "Content-Type",
            "application/json"
          )
          .body(body)
      }
      | None => builder.build()
    }
    .map_err(RequestError::transport)?;

    let response = outgoing
      .send()
      .await
      .map_err(|err| {
        tracing::warn!(
          url,
          error = %err,
          "fetch failed"
        );
        RequestError::transport(err)
      })?;

    let status = response.status();
    let body = response
      .text()
      .await
      .map_err(RequestError::transport)?;

    tracing::debug!(
      method = request.method.as_str(),
      url,
      status,
      "fetch completed"
    );
    Ok(RawResponse { status, body })
  }
}
