#![allow(dead_code)]

use std::cell::{
  Cell,
  RefCell
};
use std::collections::{
  HashMap,
  VecDeque
};
use std::rc::Rc;
use std::time::Duration;

use shiftlog_core::alerts::{
  Alert,
  AlertKind,
  AlertSink
};
use shiftlog_core::api::{
  ApiClient,
  ApiRequest,
  ApiResponse,
  RequestError,
  Transport
};
use shiftlog_core::notifications::{
  FeedChange,
  NotificationFeed,
  NotificationView
};
use shiftlog_core::status::{
  StatusBadge,
  StatusControl
};
use shiftlog_core::{
  LocalFuture,
  Timer
};

pub fn init_tracing() {
  let _ = tracing_subscriber::fmt()
    .with_env_filter("debug")
    .with_test_writer()
    .try_init();
}

type Reply = Result<ApiResponse, RequestError>;

/// Scripted server. Each path answers
/// from its queue; once drained, the last
/// served reply repeats.
#[derive(Default)]
pub struct FakeServer {
  routes:   RefCell<HashMap<String, VecDeque<Reply>>>,
  served:   RefCell<HashMap<String, Reply>>,
  requests: RefCell<Vec<ApiRequest>>
}

impl FakeServer {
  pub fn reply(
    &self,
    path: &str,
    status: u16,
    body: serde_json::Value
  ) {
    self.push(
      path,
      Ok(ApiResponse {
        status,
        body: body.to_string()
      })
    );
  }

  pub fn fail(
    &self,
    path: &str,
    err: RequestError
  ) {
    self.push(path, Err(err));
  }

  fn push(&self, path: &str, reply: Reply) {
    self
      .routes
      .borrow_mut()
      .entry(path.to_string())
      .or_default()
      .push_back(reply);
  }

  pub fn requests(&self) -> Vec<ApiRequest> {
    self.requests.borrow().clone()
  }

  pub fn requests_to(
    &self,
    path: &str
  ) -> Vec<ApiRequest> {
    self
      .requests
      .borrow()
      .iter()
      .filter(|r| r.path() == path)
      .cloned()
      .collect()
  }
}

impl Transport for FakeServer {
  fn execute<'a>(
    &'a self,
    request: ApiRequest
  ) -> LocalFuture<'a, Reply> {
    let path = request.path().to_string();
    self.requests.borrow_mut().push(request);

    let next = self
      .routes
      .borrow_mut()
      .get_mut(&path)
      .and_then(VecDeque::pop_front);
    let reply = match next {
      | Some(reply) => {
        self
          .served
          .borrow_mut()
          .insert(path.clone(), reply.clone());
        Some(reply)
      }
      | None => self.served.borrow().get(&path).cloned()
    };

    Box::pin(async move {
      reply.unwrap_or_else(|| {
        Err(RequestError::Network(format!(
          "no scripted reply for {path}"
        )))
      })
    })
  }
}

#[derive(Default)]
pub struct InstantTimer {
  pub slept: RefCell<Vec<Duration>>
}

impl Timer for InstantTimer {
  fn sleep<'a>(
    &'a self,
    duration: Duration
  ) -> LocalFuture<'a, ()> {
    self.slept.borrow_mut().push(duration);
    Box::pin(async {})
  }
}

#[derive(Default)]
pub struct RecordedAlerts {
  pub shown: RefCell<Vec<Alert>>
}

impl RecordedAlerts {
  pub fn kinds(&self) -> Vec<AlertKind> {
    self.shown.borrow().iter().map(|a| a.kind).collect()
  }

  pub fn last(&self) -> Option<Alert> {
    self.shown.borrow().last().cloned()
  }
}

impl AlertSink for RecordedAlerts {
  fn show_alert(&self, alert: Alert) {
    self.shown.borrow_mut().push(alert);
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
  Busy(bool),
  HideMarkAll
}

/// Mirrors what the page would display.
#[derive(Default)]
pub struct RecordedView {
  pub renders:     RefCell<Vec<(NotificationFeed, FeedChange)>>,
  pub events:      RefCell<Vec<ViewEvent>>,
  pub placeholder: Cell<bool>,
  pub badge:       Cell<Option<u32>>
}

impl NotificationView for RecordedView {
  fn render_feed(
    &self,
    feed: &NotificationFeed,
    change: &FeedChange
  ) {
    self.placeholder.set(feed.is_empty());
    self.badge.set(feed.badge_count());
    self
      .renders
      .borrow_mut()
      .push((feed.clone(), change.clone()));
  }

  fn set_mark_all_busy(&self, busy: bool) {
    self.events.borrow_mut().push(ViewEvent::Busy(busy));
  }

  fn hide_mark_all(&self) {
    self.events.borrow_mut().push(ViewEvent::HideMarkAll);
  }
}

pub struct FakeSelect {
  pub task_id:  i64,
  pub value:    RefCell<String>,
  pub recorded: RefCell<String>,
  pub busy_log: RefCell<Vec<bool>>,
  pub badge:    RefCell<Option<StatusBadge>>
}

impl FakeSelect {
  pub fn new(task_id: i64, initial: &str) -> Self {
    Self {
      task_id,
      value: RefCell::new(initial.to_string()),
      recorded: RefCell::new(initial.to_string()),
      busy_log: RefCell::new(vec![]),
      badge: RefCell::new(None)
    }
  }

  /// What the user picks before the
  /// change event fires.
  pub fn choose(&self, value: &str) -> String {
    *self.value.borrow_mut() = value.to_string();
    value.to_string()
  }
}

impl StatusControl for FakeSelect {
  fn task_id(&self) -> i64 {
    self.task_id
  }

  fn recorded_value(&self) -> String {
    self.recorded.borrow().clone()
  }

  fn record_value(&self, value: &str) {
    *self.recorded.borrow_mut() = value.to_string();
  }

  fn set_busy(&self, busy: bool) {
    self.busy_log.borrow_mut().push(busy);
  }

  fn restore(&self, value: &str) {
    *self.value.borrow_mut() = value.to_string();
  }

  fn apply_badge(&self, badge: &StatusBadge) {
    *self.badge.borrow_mut() = Some(badge.clone());
  }
}

pub fn client(server: &Rc<FakeServer>) -> Rc<ApiClient> {
  let transport: Rc<dyn Transport> = server.clone();
  Rc::new(ApiClient::new(
    transport,
    "",
    Box::new(|| Some("test-token".to_string()))
  ))
}

pub fn notification(
  id: i64,
  title: &str,
  is_read: bool
) -> serde_json::Value {
  serde_json::json!({
    "id": id,
    "title": title,
    "message": format!("{title} details"),
    "is_read": is_read
  })
}
