use serde::{
  Deserialize,
  Serialize
};

#[derive(
  Debug,
  Clone,
  Copy,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
  Hash,
)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
  Pending,
  InProgress,
  Completed,
  Cancelled
}

impl TaskStatus {
  pub const ALL: [TaskStatus; 4] = [
    TaskStatus::Pending,
    TaskStatus::InProgress,
    TaskStatus::Completed,
    TaskStatus::Cancelled
  ];

  pub fn as_str(self) -> &'static str {
    match self {
      | Self::Pending => "pending",
      | Self::InProgress => {
        "in_progress"
      }
      | Self::Completed => "completed",
      | Self::Cancelled => "cancelled"
    }
  }

  pub fn parse(
    value: &str
  ) -> Option<Self> {
    Self::ALL
      .into_iter()
      .find(|status| {
        status.as_str() == value
      })
  }
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct NotificationDto {
  pub id:      i64,
  #[serde(default)]
  pub title:   String,
  #[serde(default)]
  pub message: String,
  #[serde(default)]
  pub is_read: bool,
  #[serde(
    rename = "type",
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub kind:    Option<String>,
  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub sent_at: Option<String>
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct NotificationCount {
  #[serde(default)]
  pub count: u32
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct RecentNotifications {
  #[serde(default)]
  pub notifications:
    Vec<NotificationDto>
}

/// Reply shape shared by mark-one-read
/// and task status updates.
#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct ActionResult {
  #[serde(default)]
  pub success: bool,
  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub error:   Option<String>
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct MarkAllReadArgs {
  pub notification_ids: Vec<i64>
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct MarkAllReadResult {
  #[serde(default)]
  pub success:    bool,
  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub error:      Option<String>,
  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub count:      Option<u32>,
  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub marked_ids: Option<Vec<i64>>
}

/// Body of a task status change. The
/// status travels as the raw select
/// value; the server owns validation.
#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct TaskStatusArgs {
  pub status: String
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn recent_notifications_accept_server_extras()
   {
    let raw = r#"{
      "notifications": [
        {
          "id": 7,
          "title": "Task assigned",
          "message": "Check pump 3",
          "type": "task_assigned",
          "is_read": false,
          "sent_at": "19.10.2026 08:15"
        },
        { "id": 8 }
      ]
    }"#;

    let parsed: RecentNotifications =
      serde_json::from_str(raw)
        .expect("decode recent");
    assert_eq!(
      parsed.notifications.len(),
      2
    );
    let first =
      &parsed.notifications[0];
    assert_eq!(
      first.kind.as_deref(),
      Some("task_assigned")
    );
    assert_eq!(
      first.sent_at.as_deref(),
      Some("19.10.2026 08:15")
    );
    let second =
      &parsed.notifications[1];
    assert!(second.title.is_empty());
    assert!(!second.is_read);
  }

  #[test]
  fn mark_all_args_use_server_field_name()
   {
    let body = serde_json::to_value(
      MarkAllReadArgs {
        notification_ids: vec![3, 5]
      }
    )
    .expect("encode");
    assert_eq!(
      body,
      serde_json::json!({
        "notification_ids": [3, 5]
      })
    );
  }

  #[test]
  fn mark_all_result_tolerates_error_only_reply()
   {
    let parsed: MarkAllReadResult =
      serde_json::from_str(
        r#"{"success": false, "error": "no profile"}"#
      )
      .expect("decode");
    assert!(!parsed.success);
    assert_eq!(
      parsed.error.as_deref(),
      Some("no profile")
    );
    assert!(
      parsed.marked_ids.is_none()
    );
  }

  #[test]
  fn task_status_wire_names_are_snake_case()
   {
    for status in TaskStatus::ALL {
      let encoded =
        serde_json::to_string(&status)
          .expect("encode");
      assert_eq!(
        encoded,
        format!("\"{}\"", status.as_str())
      );
      assert_eq!(
        TaskStatus::parse(
          status.as_str()
        ),
        Some(status)
      );
    }
    assert_eq!(
      TaskStatus::parse("archived"),
      None
    );
  }
}
