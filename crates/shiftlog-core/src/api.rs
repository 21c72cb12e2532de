use std::rc::Rc;

use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{
  debug,
  warn
};

use crate::LocalFuture;

pub const CSRF_HEADER: &str =
  "X-CSRFToken";

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum Method {
  Get,
  Post
}

impl Method {
  pub fn as_str(self) -> &'static str {
    match self {
      | Self::Get => "GET",
      | Self::Post => "POST"
    }
  }
}

/// The server routes this layer talks
/// to.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum Endpoint {
  NotificationCount,
  RecentNotifications,
  MarkRead(i64),
  MarkAllRead,
  TaskStatus(i64)
}

impl Endpoint {
  pub fn path(self) -> String {
    match self {
      | Self::NotificationCount => {
        "/api/notifications/count/"
          .to_string()
      }
      | Self::RecentNotifications => {
        "/api/notifications/recent/"
          .to_string()
      }
      | Self::MarkRead(id) => {
        format!(
          "/notifications/{id}/read/"
        )
      }
      | Self::MarkAllRead => {
        "/notifications/mark-all-read/"
          .to_string()
      }
      | Self::TaskStatus(id) => {
        format!(
          "/api/tasks/{id}/status/"
        )
      }
    }
  }

  /// Polling endpoints must never be
  /// served from a cache.
  pub fn is_polled(self) -> bool {
    matches!(
      self,
      Self::NotificationCount
        | Self::RecentNotifications
    )
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
  pub method:  Method,
  pub url:     String,
  pub headers: Vec<(String, String)>,
  pub body:    Option<String>
}

impl ApiRequest {
  pub fn header(
    &self,
    name: &str
  ) -> Option<&str> {
    self
      .headers
      .iter()
      .find(|(key, _)| {
        key.eq_ignore_ascii_case(name)
      })
      .map(|(_, value)| value.as_str())
  }

  /// Request url without the cache
  /// busting query.
  pub fn path(&self) -> &str {
    self
      .url
      .split_once('?')
      .map_or(self.url.as_str(), |(path, _)| {
        path
      })
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
  pub status: u16,
  pub body:   String
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  thiserror::Error,
)]
pub enum RequestError {
  #[error("network failure: {0}")]
  Network(String),
  #[error(
    "request rejected: CSRF token \
     missing or invalid"
  )]
  Csrf,
  #[error("server answered HTTP {0}")]
  Status(u16),
  #[error(
    "failed to decode response: {0}"
  )]
  Decode(String),
  #[error(
    "failed to encode request body: \
     {0}"
  )]
  Encode(String)
}

impl RequestError {
  pub fn is_csrf(&self) -> bool {
    matches!(self, Self::Csrf)
  }
}

/// Executes one request against the
/// server. Only transport failures are
/// errors here; HTTP statuses are
/// classified by [`ApiClient`].
pub trait Transport {
  fn execute<'a>(
    &'a self,
    request: ApiRequest
  ) -> LocalFuture<
    'a,
    Result<ApiResponse, RequestError>
  >;
}

/// First non-empty token wins: the
/// hidden form field, then the meta
/// tag.
pub fn resolve_csrf_token(
  hidden_field: Option<&str>,
  meta_tag: Option<&str>
) -> Option<String> {
  [hidden_field, meta_tag]
    .into_iter()
    .flatten()
    .map(str::trim)
    .find(|token| !token.is_empty())
    .map(str::to_string)
}

pub type CsrfLookup =
  Box<dyn Fn() -> Option<String>>;

pub struct ApiClient {
  transport: Rc<dyn Transport>,
  api_base:  String,
  csrf:      CsrfLookup
}

impl ApiClient {
  pub fn new(
    transport: Rc<dyn Transport>,
    api_base: impl Into<String>,
    csrf: CsrfLookup
  ) -> Self {
    Self {
      transport,
      api_base: api_base
        .into()
        .trim_end_matches('/')
        .to_string(),
      csrf
    }
  }

  pub async fn get_json<R>(
    &self,
    endpoint: Endpoint
  ) -> Result<R, RequestError>
  where
    R: DeserializeOwned
  {
    let request = self.build_request(
      Method::Get,
      endpoint,
      None,
      Utc::now().timestamp_millis()
    );
    self.send(request).await
  }

  pub async fn post_json<B, R>(
    &self,
    endpoint: Endpoint,
    body: &B
  ) -> Result<R, RequestError>
  where
    B: Serialize + ?Sized,
    R: DeserializeOwned
  {
    let payload =
      serde_json::to_string(body)
        .map_err(|e| {
          RequestError::Encode(
            e.to_string()
          )
        })?;
    let request = self.build_request(
      Method::Post,
      endpoint,
      Some(payload),
      Utc::now().timestamp_millis()
    );
    self.send(request).await
  }

  pub async fn post_empty<R>(
    &self,
    endpoint: Endpoint
  ) -> Result<R, RequestError>
  where
    R: DeserializeOwned
  {
    let request = self.build_request(
      Method::Post,
      endpoint,
      None,
      Utc::now().timestamp_millis()
    );
    self.send(request).await
  }

  pub fn build_request(
    &self,
    method: Method,
    endpoint: Endpoint,
    body: Option<String>,
    now_millis: i64
  ) -> ApiRequest {
    let mut url = format!(
      "{}{}",
      self.api_base,
      endpoint.path()
    );
    let mut headers = vec![(
      "X-Requested-With".to_string(),
      "XMLHttpRequest".to_string()
    )];

    match (self.csrf)() {
      | Some(token) => {
        headers.push((
          CSRF_HEADER.to_string(),
          token
        ))
      }
      | None => {
        warn!(
          path = %url,
          "no CSRF token on page; \
           sending request without it"
        )
      }
    }

    if method == Method::Get
      && endpoint.is_polled()
    {
      url.push_str(&format!(
        "?t={now_millis}"
      ));
      headers.push((
        "Cache-Control".to_string(),
        "no-cache".to_string()
      ));
      headers.push((
        "Pragma".to_string(),
        "no-cache".to_string()
      ));
    }

    if body.is_some() {
      headers.push((
        "Content-Type".to_string(),
        "application/json".to_string()
      ));
    }

    ApiRequest {
      method,
      url,
      headers,
      body
    }
  }

  #[tracing::instrument(
    skip(self, request),
    fields(
      method = request.method.as_str(),
      path = %request.path()
    )
  )]
  async fn send<R>(
    &self,
    request: ApiRequest
  ) -> Result<R, RequestError>
  where
    R: DeserializeOwned
  {
    let response = self
      .transport
      .execute(request)
      .await?;
    debug!(
      status = response.status,
      bytes = response.body.len(),
      "response received"
    );
    classify_response(response)
  }
}

pub fn classify_response<R>(
  response: ApiResponse
) -> Result<R, RequestError>
where
  R: DeserializeOwned
{
  match response.status {
    | 200..=299 => {
      serde_json::from_str(
        &response.body
      )
      .map_err(|e| {
        RequestError::Decode(
          e.to_string()
        )
      })
    }
    | 403 => Err(RequestError::Csrf),
    | status => {
      Err(RequestError::Status(status))
    }
  }
}

#[cfg(test)]
mod tests {
  use std::rc::Rc;

  use shiftlog_web_shared::{
    ActionResult,
    NotificationCount
  };

  use super::*;

  struct Unreachable;

  impl Transport for Unreachable {
    fn execute<'a>(
      &'a self,
      _request: ApiRequest
    ) -> LocalFuture<
      'a,
      Result<ApiResponse, RequestError>
    > {
      Box::pin(async {
        Err(RequestError::Network(
          "offline".to_string()
        ))
      })
    }
  }

  fn client(
    token: Option<&'static str>
  ) -> ApiClient {
    ApiClient::new(
      Rc::new(Unreachable),
      "",
      Box::new(move || {
        token.map(str::to_string)
      })
    )
  }

  #[test]
  fn csrf_token_prefers_hidden_field() {
    assert_eq!(
      resolve_csrf_token(
        Some("form-token"),
        Some("meta-token")
      )
      .as_deref(),
      Some("form-token")
    );
    assert_eq!(
      resolve_csrf_token(
        Some("  "),
        Some("meta-token")
      )
      .as_deref(),
      Some("meta-token")
    );
    assert_eq!(
      resolve_csrf_token(None, Some("")),
      None
    );
  }

  #[test]
  fn polled_get_is_cache_busted() {
    let request = client(Some("abc"))
      .build_request(
        Method::Get,
        Endpoint::NotificationCount,
        None,
        1_700_000_000_000
      );

    assert_eq!(
      request.url,
      "/api/notifications/count/?t=1700000000000"
    );
    assert_eq!(
      request.path(),
      "/api/notifications/count/"
    );
    assert_eq!(
      request.header("cache-control"),
      Some("no-cache")
    );
    assert_eq!(
      request.header("Pragma"),
      Some("no-cache")
    );
    assert_eq!(
      request.header(CSRF_HEADER),
      Some("abc")
    );
  }

  #[test]
  fn post_with_body_is_json_and_not_cache_busted()
   {
    let request = client(Some("abc"))
      .build_request(
        Method::Post,
        Endpoint::TaskStatus(12),
        Some(
          "{\"status\":\"completed\"}"
            .to_string()
        ),
        5
      );

    assert_eq!(
      request.url,
      "/api/tasks/12/status/"
    );
    assert_eq!(
      request.header("Content-Type"),
      Some("application/json")
    );
    assert_eq!(
      request.header("Cache-Control"),
      None
    );
    assert_eq!(
      request.header("X-Requested-With"),
      Some("XMLHttpRequest")
    );
  }

  #[test]
  fn missing_token_omits_header() {
    let request = client(None)
      .build_request(
        Method::Post,
        Endpoint::MarkRead(4),
        None,
        0
      );
    assert_eq!(
      request.header(CSRF_HEADER),
      None
    );
    assert_eq!(
      request.url,
      "/notifications/4/read/"
    );
  }

  #[test]
  fn api_base_is_prefixed_once() {
    let client = ApiClient::new(
      Rc::new(Unreachable),
      "/journal/",
      Box::new(|| None)
    );
    let request = client.build_request(
      Method::Post,
      Endpoint::MarkAllRead,
      None,
      0
    );
    assert_eq!(
      request.url,
      "/journal/notifications/mark-all-read/"
    );
  }

  #[test]
  fn responses_are_classified_by_status()
  {
    let ok: NotificationCount =
      classify_response(ApiResponse {
        status: 200,
        body:   "{\"count\": 3}"
          .to_string()
      })
      .expect("decode count");
    assert_eq!(ok.count, 3);

    let csrf = classify_response::<
      ActionResult
    >(ApiResponse {
      status: 403,
      body:   "Forbidden".to_string()
    })
    .expect_err("403");
    assert!(csrf.is_csrf());

    assert_eq!(
      classify_response::<ActionResult>(
        ApiResponse {
          status: 500,
          body:   "{}".to_string()
        }
      ),
      Err(RequestError::Status(500))
    );

    assert!(matches!(
      classify_response::<ActionResult>(
        ApiResponse {
          status: 200,
          body:   "<html>".to_string()
        }
      ),
      Err(RequestError::Decode(_))
    ));
  }
}
