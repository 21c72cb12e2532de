use std::time::Duration;

use gloo::net::http::Request;
use gloo::timers::future::TimeoutFuture;
use shiftlog_core::api::{
  ApiRequest,
  ApiResponse,
  Method,
  RequestError,
  Transport
};
use shiftlog_core::{
  LocalFuture,
  Timer
};

/// Same-origin fetch through `gloo::net`.
pub struct FetchTransport;

impl Transport for FetchTransport {
  fn execute<'a>(
    &'a self,
    request: ApiRequest
  ) -> LocalFuture<
    'a,
    Result<ApiResponse, RequestError>
  > {
    Box::pin(async move {
      let mut builder = match request.method {
        | Method::Get => Request::get(&request.url),
        | Method::Post => Request::post(&request.url)
      };
      for (name, value) in &request.headers {
        builder = builder.header(name, value);
      }

      let sent = match request.body {
        | Some(body) => {
          builder
            .body(body)
            .map_err(network)?
            .send()
            .await
        }
        | None => builder.send().await
      };
      let response = sent.map_err(network)?;

      let status = response.status();
      let body = response
        .text()
        .await
        .map_err(network)?;
      Ok(ApiResponse { status, body })
    })
  }
}

fn network(
  err: gloo::net::Error
) -> RequestError {
  RequestError::Network(err.to_string())
}

pub struct BrowserTimer;

impl Timer for BrowserTimer {
  fn sleep<'a>(
    &'a self,
    duration: Duration
  ) -> LocalFuture<'a, ()> {
    let ms = u32::try_from(duration.as_millis())
      .unwrap_or(u32::MAX);
    Box::pin(TimeoutFuture::new(ms))
  }
}
