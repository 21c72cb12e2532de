use chrono::{
  DateTime,
  Duration,
  Utc
};
use tracing::{
  debug,
  info
};

use crate::config::AutoRefreshConfig;

/// Pages eligible for the inactivity
/// reload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoRefreshPolicy {
  include_paths:    Vec<String>,
  exclude_segments: Vec<String>
}

impl AutoRefreshPolicy {
  pub fn from_config(
    cfg: &AutoRefreshConfig
  ) -> Self {
    Self {
      include_paths:    cfg
        .include_paths
        .clone(),
      exclude_segments: cfg
        .exclude_segments
        .clone()
    }
  }

  pub fn applies_to(
    &self,
    path: &str
  ) -> bool {
    let is_form_page = self
      .exclude_segments
      .iter()
      .any(|seg| path.contains(seg.as_str()));
    if is_form_page {
      debug!(path, "form page; auto-refresh disabled");
      return false;
    }

    path == "/"
      || self
        .include_paths
        .iter()
        .any(|p| path.contains(p.as_str()))
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdleCheck {
  pub inactive:     Duration,
  pub remaining:    Duration,
  pub minutes_left: i64,
  pub reload:       bool
}

#[derive(Debug, Clone)]
pub struct IdleTracker {
  last_activity:    DateTime<Utc>,
  threshold:        Duration,
  reload_requested: bool
}

impl IdleTracker {
  pub fn new(
    now: DateTime<Utc>,
    threshold: Duration
  ) -> Self {
    Self {
      last_activity: now,
      threshold,
      reload_requested: false
    }
  }

  /// Any user input re-arms the reload.
  pub fn record_activity(
    &mut self,
    now: DateTime<Utc>
  ) {
    self.last_activity = now;
    self.reload_requested = false;
  }

  pub fn check(
    &mut self,
    now: DateTime<Utc>,
    page_visible: bool
  ) -> IdleCheck {
    let inactive =
      now - self.last_activity;
    let remaining =
      self.threshold - inactive;
    let minutes_left =
      (remaining.num_milliseconds() as f64
        / 60_000.0)
        .ceil() as i64;

    info!(
      minutes_left,
      inactive_secs = inactive.num_seconds(),
      "auto-refresh check"
    );

    let reload = page_visible
      && inactive >= self.threshold
      && !self.reload_requested;
    if reload {
      info!("reloading page after inactivity");
      self.reload_requested = true;
    }

    IdleCheck {
      inactive,
      remaining,
      minutes_left,
      reload
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  fn start() -> DateTime<Utc> {
    Utc
      .with_ymd_and_hms(2026, 10, 19, 8, 0, 0)
      .unwrap()
  }

  #[test]
  fn policy_covers_listing_pages_only() {
    let policy = AutoRefreshPolicy::from_config(
      &AutoRefreshConfig::default()
    );
    assert!(policy.applies_to("/"));
    assert!(policy.applies_to("/tasks/"));
    assert!(policy.applies_to("/shifts/12/"));
    assert!(policy.applies_to("/materials/"));
    assert!(!policy.applies_to("/tasks/create/"));
    assert!(!policy.applies_to("/notes/4/edit/"));
    assert!(!policy.applies_to("/profile/"));
    assert!(!policy.applies_to("/admin/"));
  }

  #[test]
  fn minutes_left_rounds_up() {
    let mut tracker = IdleTracker::new(
      start(),
      Duration::milliseconds(300_000)
    );
    let check = tracker.check(
      start() + Duration::seconds(61),
      true
    );
    assert_eq!(check.minutes_left, 4);
    assert_eq!(check.inactive.num_seconds(), 61);
    assert!(!check.reload);
  }

  #[test]
  fn activity_restarts_the_idle_clock() {
    let mut tracker = IdleTracker::new(
      start(),
      Duration::milliseconds(300_000)
    );
    tracker.record_activity(
      start() + Duration::minutes(4)
    );
    let check = tracker.check(
      start() + Duration::minutes(6),
      true
    );
    assert_eq!(check.inactive.num_minutes(), 2);
    assert_eq!(check.minutes_left, 3);
    assert!(!check.reload);
  }

  #[test]
  fn hidden_tab_is_not_reloaded() {
    let mut tracker = IdleTracker::new(
      start(),
      Duration::milliseconds(300_000)
    );
    let late =
      start() + Duration::minutes(10);
    assert!(!tracker.check(late, false).reload);
    assert!(tracker.check(late, true).reload);
  }
}
