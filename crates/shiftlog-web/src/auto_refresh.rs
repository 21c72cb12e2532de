use std::cell::RefCell;
use std::rc::Rc;

use chrono::Utc;
use gloo::events::EventListener;
use gloo::timers::callback::Interval;
use shiftlog_core::config::AutoRefreshConfig;
use shiftlog_core::idle::{
  AutoRefreshPolicy,
  IdleTracker
};

use crate::dom;
use crate::lifecycle::PageLifecycle;

const ACTIVITY_EVENTS: [&str; 5] = [
  "mousemove",
  "keydown",
  "scroll",
  "click",
  "touchstart"
];

fn reload() {
  if let Some(window) = web_sys::window()
    && let Err(err) = window.location().reload()
  {
    tracing::error!(error = ?err, "reload failed");
  }
}

pub fn bind(
  cfg: &AutoRefreshConfig,
  page: &mut PageLifecycle
) {
  let Some(path) = dom::current_path() else {
    return;
  };
  let policy = AutoRefreshPolicy::from_config(cfg);
  if !policy.applies_to(&path) {
    return;
  }
  let Some(document) = dom::document() else {
    return;
  };

  let tracker = Rc::new(RefCell::new(
    IdleTracker::new(
      Utc::now(),
      chrono::Duration::milliseconds(
        cfg.idle_threshold_ms.into()
      )
    )
  ));
  tracing::info!(
    path = %path,
    threshold_ms = cfg.idle_threshold_ms,
    "auto-refresh armed"
  );

  for event in ACTIVITY_EVENTS {
    let tracker = tracker.clone();
    page.listen(EventListener::new(
      &document,
      event,
      move |_| {
        tracker
          .borrow_mut()
          .record_activity(Utc::now());
      }
    ));
  }

  page.every(Interval::new(
    cfg.check_interval_ms,
    move || {
      let visible = !document.hidden();
      let check = tracker
        .borrow_mut()
        .check(Utc::now(), visible);
      if check.reload {
        reload();
      }
    }
  ));
}
