use std::cell::{
  Cell,
  RefCell
};
use std::rc::Rc;
use std::time::Duration;

use shiftlog_web_shared::{
  ActionResult,
  MarkAllReadArgs,
  MarkAllReadResult,
  NotificationCount,
  NotificationDto,
  RecentNotifications
};
use tracing::{
  debug,
  error,
  info,
  warn
};

use crate::Timer;
use crate::alerts::{
  Alert,
  AlertSink
};
use crate::api::{
  ApiClient,
  Endpoint,
  RequestError
};
use crate::config::Labels;

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum NotificationKind {
  TaskAssigned,
  ShiftStarted,
  ShiftCompleted,
  TaskCompleted,
  Handover,
  Other
}

impl NotificationKind {
  pub fn from_wire(
    value: Option<&str>
  ) -> Self {
    match value {
      | Some("task_assigned") => {
        Self::TaskAssigned
      }
      | Some("shift_started") => {
        Self::ShiftStarted
      }
      | Some("shift_completed") => {
        Self::ShiftCompleted
      }
      | Some("task_completed") => {
        Self::TaskCompleted
      }
      | Some("handover") => {
        Self::Handover
      }
      | _ => Self::Other
    }
  }

  pub fn color(self) -> &'static str {
    match self {
      | Self::TaskAssigned => "primary",
      | Self::ShiftStarted
      | Self::TaskCompleted => "success",
      | Self::ShiftCompleted => "info",
      | Self::Handover => "warning",
      | Self::Other => "secondary"
    }
  }
}

pub fn read_state_class(
  notification: &NotificationDto
) -> &'static str {
  if notification.is_read {
    "text-muted"
  } else {
    "fw-bold"
  }
}

/// Active notification records, the
/// single source for every rendered
/// list.
#[derive(
  Debug, Clone, Default, PartialEq,
)]
pub struct NotificationFeed {
  records:      Vec<NotificationDto>,
  unread_count: u32
}

impl NotificationFeed {
  pub fn records(
    &self
  ) -> &[NotificationDto] {
    &self.records
  }

  pub fn ids(&self) -> Vec<i64> {
    self
      .records
      .iter()
      .map(|record| record.id)
      .collect()
  }

  pub fn is_empty(&self) -> bool {
    self.records.is_empty()
  }

  pub fn unread_count(&self) -> u32 {
    self.unread_count
  }

  /// Count to show on the badge;
  /// `None` hides it.
  pub fn badge_count(
    &self
  ) -> Option<u32> {
    (self.unread_count > 0)
      .then_some(self.unread_count)
  }

  pub fn set_unread_count(
    &mut self,
    count: u32
  ) {
    self.unread_count = count;
  }

  /// Swaps in a fresh server list and
  /// returns the ids that disappeared.
  pub fn replace(
    &mut self,
    records: Vec<NotificationDto>
  ) -> Vec<i64> {
    let gone = self
      .records
      .iter()
      .map(|record| record.id)
      .filter(|id| {
        !records
          .iter()
          .any(|next| next.id == *id)
      })
      .collect();
    self.records = records;
    gone
  }

  pub fn remove(
    &mut self,
    id: i64
  ) -> Option<NotificationDto> {
    let index = self
      .records
      .iter()
      .position(|record| record.id == id)?;
    let removed =
      self.records.remove(index);
    if !removed.is_read {
      self.unread_count =
        self.unread_count.saturating_sub(1);
    }
    Some(removed)
  }

  pub fn remove_many(
    &mut self,
    ids: &[i64]
  ) -> Vec<i64> {
    ids
      .iter()
      .filter_map(|id| {
        self.remove(*id).map(|r| r.id)
      })
      .collect()
  }

  pub fn clear(&mut self) -> Vec<i64> {
    let ids = self.ids();
    self.remove_many(&ids)
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedChange {
  Count,
  Replaced,
  Removed(Vec<i64>)
}

/// The page regions derived from a
/// [`NotificationFeed`].
pub trait NotificationView {
  fn render_feed(
    &self,
    feed: &NotificationFeed,
    change: &FeedChange
  );

  fn set_mark_all_busy(
    &self,
    busy: bool
  );

  fn hide_mark_all(&self);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkReadOutcome {
  Marked { remaining: usize },
  Refused,
  Failed(RequestError)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkAllOutcome {
  NothingToMark,
  Busy,
  Marked(Vec<i64>),
  Refused,
  Failed(RequestError)
}

pub struct NotificationPanel {
  api:             Rc<ApiClient>,
  view:            Rc<dyn NotificationView>,
  alerts:          Rc<dyn AlertSink>,
  timer:           Rc<dyn Timer>,
  labels:          Labels,
  reconcile_delay: Duration,
  feed:            RefCell<NotificationFeed>,
  /// Set once a server list has landed.
  loaded:          Cell<bool>,
  mark_all_busy:   Cell<bool>
}

impl NotificationPanel {
  pub fn new(
    api: Rc<ApiClient>,
    view: Rc<dyn NotificationView>,
    alerts: Rc<dyn AlertSink>,
    timer: Rc<dyn Timer>,
    labels: Labels,
    reconcile_delay: Duration
  ) -> Self {
    Self {
      api,
      view,
      alerts,
      timer,
      labels,
      reconcile_delay,
      feed: RefCell::new(
        NotificationFeed::default()
      ),
      loaded: Cell::new(false),
      mark_all_busy: Cell::new(false)
    }
  }

  /// Fills the feed from records already
  /// rendered by the server, so marking
  /// works before the first poll lands.
  /// Ignored once a server list exists.
  pub fn seed(
    &self,
    records: Vec<NotificationDto>
  ) {
    if self.loaded.get() {
      debug!("feed already loaded; seed ignored");
      return;
    }
    debug!(
      seeded = records.len(),
      "feed seeded from page"
    );
    self.feed.borrow_mut().replace(records);
  }

  pub fn feed_snapshot(
    &self
  ) -> NotificationFeed {
    self.feed.borrow().clone()
  }

  /// Poll tick: count, then list.
  pub async fn refresh(&self) {
    self.refresh_count().await;
    self.refresh_list().await;
  }

  #[tracing::instrument(skip(self))]
  pub async fn refresh_count(&self) {
    match self
      .api
      .get_json::<NotificationCount>(
        Endpoint::NotificationCount
      )
      .await
    {
      | Ok(reply) => {
        debug!(
          count = reply.count,
          "unread count refreshed"
        );
        self
          .feed
          .borrow_mut()
          .set_unread_count(reply.count);
        self.render(&FeedChange::Count);
      }
      | Err(err) => {
        error!(error = %err, "unread count refresh failed")
      }
    }
  }

  #[tracing::instrument(skip(self))]
  pub async fn refresh_list(&self) {
    match self
      .api
      .get_json::<RecentNotifications>(
        Endpoint::RecentNotifications
      )
      .await
    {
      | Ok(reply) => {
        self.loaded.set(true);
        let gone = self
          .feed
          .borrow_mut()
          .replace(reply.notifications);
        debug!(
          dropped = gone.len(),
          "recent notifications \
           refreshed"
        );
        self.render(&FeedChange::Replaced);
      }
      | Err(err) => {
        error!(error = %err, "recent notifications refresh failed")
      }
    }
  }

  #[tracing::instrument(skip(self))]
  pub async fn mark_read(
    &self,
    id: i64
  ) -> MarkReadOutcome {
    let result = self
      .api
      .post_empty::<ActionResult>(
        Endpoint::MarkRead(id)
      )
      .await;

    match result {
      | Ok(reply) if reply.success => {
        let listed = self
          .feed
          .borrow_mut()
          .remove(id)
          .is_some();
        // Ids outside the feed can still be
        // on the page (full history list).
        self.render(
          &FeedChange::Removed(vec![id])
        );
        let remaining =
          self.feed.borrow().records.len();
        info!(
          remaining,
          listed,
          "notification marked read"
        );

        self.reconcile().await;
        MarkReadOutcome::Marked {
          remaining
        }
      }
      | Ok(reply) => {
        warn!(error = ?reply.error, "server refused mark-read");
        self.alerts.show_alert(
          Alert::danger(with_detail(
            &self.labels.mark_read_failed,
            reply.error.as_deref()
          ))
        );
        MarkReadOutcome::Refused
      }
      | Err(err) => {
        error!(error = %err, "mark-read request failed");
        self.alert_request_failure(
          &err,
          &self.labels.mark_read_failed
        );
        MarkReadOutcome::Failed(err)
      }
    }
  }

  #[tracing::instrument(skip(self))]
  pub async fn mark_all_read(
    &self
  ) -> MarkAllOutcome {
    if self.mark_all_busy.get() {
      debug!(
        "mark-all already in flight; \
         ignoring"
      );
      return MarkAllOutcome::Busy;
    }

    let ids = self.feed.borrow().ids();
    if ids.is_empty() {
      self.alerts.show_alert(
        Alert::info(
          self
            .labels
            .nothing_to_mark
            .clone()
        )
      );
      return MarkAllOutcome::NothingToMark;
    }

    info!(
      count = ids.len(),
      "marking notifications read"
    );
    self.mark_all_busy.set(true);
    self.view.set_mark_all_busy(true);

    let result = self
      .api
      .post_json::<_, MarkAllReadResult>(
        Endpoint::MarkAllRead,
        &MarkAllReadArgs {
          notification_ids: ids
        }
      )
      .await;

    self.mark_all_busy.set(false);
    self.view.set_mark_all_busy(false);

    match result {
      | Ok(reply) if reply.success => {
        let removed = {
          let mut feed =
            self.feed.borrow_mut();
          match reply.marked_ids.as_deref()
          {
            | Some(marked) => {
              feed.remove_many(marked)
            }
            | None => feed.clear()
          }
        };
        self.render(&FeedChange::Removed(
          removed.clone()
        ));
        if self.feed.borrow().is_empty() {
          self.view.hide_mark_all();
        }
        self.alerts.show_alert(
          Alert::success(
            self
              .labels
              .mark_all_done
              .clone()
          )
        );

        self.reconcile().await;
        MarkAllOutcome::Marked(removed)
      }
      | Ok(reply) => {
        warn!(error = ?reply.error, "server refused mark-all");
        let detail = reply
          .error
          .filter(|e| !e.trim().is_empty())
          .unwrap_or_else(|| {
            self
              .labels
              .mark_all_unknown_error
              .clone()
          });
        self.alerts.show_alert(
          Alert::danger(with_detail(
            &self.labels.mark_all_failed,
            Some(&detail)
          ))
        );
        MarkAllOutcome::Refused
      }
      | Err(err) => {
        error!(error = %err, "mark-all request failed");
        self.alert_request_failure(
          &err,
          &self.labels.mark_all_failed
        );
        MarkAllOutcome::Failed(err)
      }
    }
  }

  async fn reconcile(&self) {
    self
      .timer
      .sleep(self.reconcile_delay)
      .await;
    self.refresh().await;
  }

  fn render(&self, change: &FeedChange) {
    let feed = self.feed.borrow();
    self.view.render_feed(&feed, change);
  }

  fn alert_request_failure(
    &self,
    err: &RequestError,
    generic: &str
  ) {
    let message = if err.is_csrf() {
      self.labels.csrf_failed.clone()
    } else {
      generic.to_string()
    };
    self
      .alerts
      .show_alert(Alert::danger(message));
  }
}

fn with_detail(
  generic: &str,
  detail: Option<&str>
) -> String {
  match detail.map(str::trim) {
    | Some(detail)
      if !detail.is_empty() =>
    {
      format!("{generic}: {detail}")
    }
    | _ => generic.to_string()
  }
}
