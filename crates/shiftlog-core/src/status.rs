use std::rc::Rc;

use serde::Deserialize;
use shiftlog_web_shared::{
  ActionResult,
  TaskStatus,
  TaskStatusArgs
};
use tracing::{
  error,
  info,
  warn
};

use crate::alerts::{
  Alert,
  AlertSink
};
use crate::api::{
  ApiClient,
  Endpoint
};
use crate::config::Labels;

pub const UNKNOWN_STATUS_COLOR: &str =
  "secondary";

#[derive(
  Debug, Clone, PartialEq, Deserialize,
)]
#[serde(default)]
pub struct StatusLabels {
  pub pending:     String,
  pub in_progress: String,
  pub completed:   String,
  pub cancelled:   String
}

impl Default for StatusLabels {
  fn default() -> Self {
    Self {
      pending:     "Pending".to_string(),
      in_progress: "In progress"
        .to_string(),
      completed:   "Completed"
        .to_string(),
      cancelled:   "Cancelled"
        .to_string()
    }
  }
}

impl StatusLabels {
  pub fn label(
    &self,
    status: TaskStatus
  ) -> &str {
    match status {
      | TaskStatus::Pending => {
        &self.pending
      }
      | TaskStatus::InProgress => {
        &self.in_progress
      }
      | TaskStatus::Completed => {
        &self.completed
      }
      | TaskStatus::Cancelled => {
        &self.cancelled
      }
    }
  }
}

pub fn status_color(
  value: &str
) -> &'static str {
  match TaskStatus::parse(value) {
    | Some(TaskStatus::Pending) => {
      "warning"
    }
    | Some(TaskStatus::InProgress) => {
      "info"
    }
    | Some(TaskStatus::Completed) => {
      "success"
    }
    | Some(TaskStatus::Cancelled) => {
      "danger"
    }
    | None => UNKNOWN_STATUS_COLOR
  }
}

/// Display text for a raw status
/// value; unknown values are echoed.
pub fn status_text(
  value: &str,
  labels: &StatusLabels
) -> String {
  TaskStatus::parse(value).map_or_else(
    || value.to_string(),
    |status| {
      labels.label(status).to_string()
    }
  )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBadge {
  pub color: &'static str,
  pub text:  String
}

impl StatusBadge {
  pub fn for_value(
    value: &str,
    labels: &StatusLabels
  ) -> Self {
    Self {
      color: status_color(value),
      text:  status_text(value, labels)
    }
  }

  pub fn css_class(&self) -> String {
    format!(
      "badge status-badge bg-{}",
      self.color
    )
  }
}

/// One task status select on the page.
pub trait StatusControl {
  fn task_id(&self) -> i64;

  /// Last value the server confirmed.
  fn recorded_value(&self) -> String;

  fn record_value(&self, value: &str);

  fn set_busy(&self, busy: bool);

  fn restore(&self, value: &str);

  fn apply_badge(
    &self,
    badge: &StatusBadge
  );
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusOutcome {
  Applied(StatusBadge),
  Reverted(String)
}

pub struct TaskStatusController {
  api:    Rc<ApiClient>,
  alerts: Rc<dyn AlertSink>,
  labels: Labels
}

impl TaskStatusController {
  pub fn new(
    api: Rc<ApiClient>,
    alerts: Rc<dyn AlertSink>,
    labels: Labels
  ) -> Self {
    Self {
      api,
      alerts,
      labels
    }
  }

  #[tracing::instrument(
    skip(self, control),
    fields(task_id = control.task_id())
  )]
  pub async fn change_status(
    &self,
    control: &dyn StatusControl,
    new_value: String
  ) -> StatusOutcome {
    control.set_busy(true);

    let result = self
      .api
      .post_json::<_, ActionResult>(
        Endpoint::TaskStatus(
          control.task_id()
        ),
        &TaskStatusArgs {
          status: new_value.clone()
        }
      )
      .await;

    let outcome = match result {
      | Ok(reply) if reply.success => {
        let badge = StatusBadge::for_value(
          &new_value,
          &self.labels.status
        );
        control.apply_badge(&badge);
        control.record_value(&new_value);
        info!(status = %new_value, "task status updated");
        self.alerts.show_alert(
          Alert::success(
            self
              .labels
              .status_updated
              .clone()
          )
        );
        StatusOutcome::Applied(badge)
      }
      | Ok(reply) => {
        warn!(
          status = %new_value,
          error = ?reply.error,
          "server refused status change"
        );
        self.revert(control, reply.error)
      }
      | Err(err) => {
        error!(
          status = %new_value,
          error = %err,
          "status change request failed"
        );
        self.revert(control, None)
      }
    };

    control.set_busy(false);
    outcome
  }

  fn revert(
    &self,
    control: &dyn StatusControl,
    detail: Option<String>
  ) -> StatusOutcome {
    let previous =
      control.recorded_value();
    control.restore(&previous);

    let generic =
      &self.labels.status_update_failed;
    let message = match detail {
      | Some(detail)
        if !detail.trim().is_empty() =>
      {
        format!("{generic}: {detail}")
      }
      | _ => generic.clone()
    };
    self
      .alerts
      .show_alert(Alert::danger(message));
    StatusOutcome::Reverted(previous)
  }
}
