use std::time::Duration;

use anyhow::{
  Context,
  anyhow
};
use serde::Deserialize;
use tracing::{
  debug,
  info,
  warn
};

use crate::status::StatusLabels;

#[derive(
  Debug, Clone, PartialEq, Deserialize,
)]
#[serde(default)]
pub struct ClientConfig {
  pub endpoints:     EndpointConfig,
  pub notifications: NotificationConfig,
  pub auto_refresh:  AutoRefreshConfig,
  pub theme:         ThemeConfig,
  pub alerts:        AlertConfig,
  pub table:         TableConfig,
  pub labels:        Labels
}

#[derive(
  Debug,
  Clone,
  Default,
  PartialEq,
  Deserialize,
)]
#[serde(default)]
pub struct EndpointConfig {
  /// Prefix for every request path.
  /// Empty means same origin.
  pub api_base: String
}

#[derive(
  Debug, Clone, PartialEq, Deserialize,
)]
#[serde(default)]
pub struct NotificationConfig {
  pub poll_interval_ms:   u32,
  pub reconcile_delay_ms: u32,
  pub fade_ms:            u32
}

#[derive(
  Debug, Clone, PartialEq, Deserialize,
)]
#[serde(default)]
pub struct AutoRefreshConfig {
  pub check_interval_ms: u32,
  pub idle_threshold_ms: u32,
  pub include_paths:     Vec<String>,
  pub exclude_segments:  Vec<String>
}

#[derive(
  Debug, Clone, PartialEq, Deserialize,
)]
#[serde(default)]
pub struct ThemeConfig {
  pub storage_key:   String,
  pub transition_ms: u32
}

#[derive(
  Debug, Clone, PartialEq, Deserialize,
)]
#[serde(default)]
pub struct AlertConfig {
  pub dismiss_after_ms: u32
}

#[derive(
  Debug,
  Clone,
  Default,
  PartialEq,
  Deserialize,
)]
#[serde(default)]
pub struct TableConfig {
  /// BCP 47 tag for column sorting.
  /// Empty defers to the page's
  /// `<html lang>`.
  pub collation_locale: String
}

/// Every string the behavior layer
/// shows to a user.
#[derive(
  Debug, Clone, PartialEq, Deserialize,
)]
#[serde(default)]
pub struct Labels {
  pub status:                 StatusLabels,
  pub no_notifications:       String,
  pub nothing_to_mark:        String,
  pub mark_all_idle:          String,
  pub mark_all_busy:          String,
  pub mark_all_done:          String,
  pub mark_all_failed:        String,
  pub mark_all_unknown_error: String,
  pub mark_read_failed:       String,
  pub csrf_failed:            String,
  pub status_updated:         String,
  pub status_update_failed:   String
}

impl Default for NotificationConfig {
  fn default() -> Self {
    Self {
      poll_interval_ms:   30_000,
      reconcile_delay_ms: 100,
      fade_ms:            300
    }
  }
}

impl Default for AutoRefreshConfig {
  fn default() -> Self {
    Self {
      check_interval_ms: 60_000,
      idle_threshold_ms: 300_000,
      include_paths:     [
        "/shifts/",
        "/tasks/",
        "/projects/",
        "/notes/",
        "/materials/"
      ]
      .map(String::from)
      .to_vec(),
      exclude_segments:  [
        "/create/", "/edit/",
        "/form/", "/add/"
      ]
      .map(String::from)
      .to_vec()
    }
  }
}

impl Default for ThemeConfig {
  fn default() -> Self {
    Self {
      storage_key:   "theme"
        .to_string(),
      transition_ms: 300
    }
  }
}

impl Default for AlertConfig {
  fn default() -> Self {
    Self {
      dismiss_after_ms: 5_000
    }
  }
}

impl Default for Labels {
  fn default() -> Self {
    Self {
      status:                 StatusLabels::default(),
      no_notifications:       "No new notifications".to_string(),
      nothing_to_mark:        "No notifications to mark".to_string(),
      mark_all_idle:          "Mark all as read".to_string(),
      mark_all_busy:          "Processing...".to_string(),
      mark_all_done:          "All notifications marked as read".to_string(),
      mark_all_failed:        "Error marking notifications".to_string(),
      mark_all_unknown_error: "Unknown error".to_string(),
      mark_read_failed:       "Error marking notification as read".to_string(),
      csrf_failed:            "Security token rejected. Try reloading the page.".to_string(),
      status_updated:         "Task status updated".to_string(),
      status_update_failed:   "Error updating task status".to_string()
    }
  }
}

impl Default for ClientConfig {
  fn default() -> Self {
    Self {
      endpoints:     EndpointConfig::default(),
      notifications: NotificationConfig::default(),
      auto_refresh:  AutoRefreshConfig::default(),
      theme:         ThemeConfig::default(),
      alerts:        AlertConfig::default(),
      table:         TableConfig::default(),
      labels:        Labels::default()
    }
  }
}

impl ClientConfig {
  /// Parses an inline TOML document.
  /// Missing sections and keys keep
  /// their defaults.
  #[tracing::instrument(skip(text))]
  pub fn from_toml_str(
    text: &str
  ) -> anyhow::Result<Self> {
    let cfg: Self = toml::from_str(text)
      .context(
        "failed to parse client \
         config"
      )?;
    info!(
      api_base = %cfg.endpoints.api_base,
      "loaded client config"
    );
    Ok(cfg)
  }

  #[tracing::instrument(skip(
    self, overrides
  ))]
  pub fn apply_overrides<I>(
    &mut self,
    overrides: I
  ) -> anyhow::Result<()>
  where
    I: IntoIterator<
      Item = (String, String)
    >
  {
    for (k, v) in overrides {
      let key = k.trim();
      let value = v.trim();
      debug!(key = %key, value = %value, "applying override");

      match key {
        | "endpoints.api_base" => {
          self.endpoints.api_base =
            value.to_string();
        }
        | "notifications.poll_interval_ms" => {
          self
            .notifications
            .poll_interval_ms =
            parse_ms(key, value)?;
        }
        | "notifications.reconcile_delay_ms" => {
          self
            .notifications
            .reconcile_delay_ms =
            parse_ms(key, value)?;
        }
        | "notifications.fade_ms" => {
          self.notifications.fade_ms =
            parse_ms(key, value)?;
        }
        | "auto_refresh.check_interval_ms" => {
          self
            .auto_refresh
            .check_interval_ms =
            parse_ms(key, value)?;
        }
        | "auto_refresh.idle_threshold_ms" => {
          self
            .auto_refresh
            .idle_threshold_ms =
            parse_ms(key, value)?;
        }
        | "theme.storage_key" => {
          if value.is_empty() {
            return Err(anyhow!(
              "theme.storage_key \
               cannot be empty"
            ));
          }
          self.theme.storage_key =
            value.to_string();
        }
        | "theme.transition_ms" => {
          self.theme.transition_ms =
            parse_ms(key, value)?;
        }
        | "alerts.dismiss_after_ms" => {
          self.alerts.dismiss_after_ms =
            parse_ms(key, value)?;
        }
        | "table.collation_locale" => {
          self.table.collation_locale =
            value.to_string();
        }
        | _ => {
          warn!(key = %key, "unknown config override; skipping");
        }
      }
    }

    Ok(())
  }

  pub fn reconcile_delay(
    &self
  ) -> Duration {
    millis(
      self
        .notifications
        .reconcile_delay_ms
    )
  }
}

fn parse_ms(
  key: &str,
  value: &str
) -> anyhow::Result<u32> {
  value.parse::<u32>().with_context(
    || {
      format!(
        "invalid millisecond value \
         for {key}: {value}"
      )
    }
  )
}

pub(crate) fn millis(
  ms: u32
) -> Duration {
  Duration::from_millis(u64::from(ms))
}

#[cfg(test)]
mod tests {
  use std::time::Duration;

  use super::ClientConfig;

  #[test]
  fn defaults_match_page_contract() {
    let cfg = ClientConfig::default();
    assert_eq!(
      cfg.notifications.poll_interval_ms,
      30_000
    );
    assert_eq!(
      cfg
        .notifications
        .reconcile_delay_ms,
      100
    );
    assert_eq!(
      cfg.auto_refresh.idle_threshold_ms,
      300_000
    );
    assert_eq!(
      cfg.auto_refresh.check_interval_ms,
      60_000
    );
    assert_eq!(
      cfg.theme.storage_key,
      "theme"
    );
    assert_eq!(
      cfg.alerts.dismiss_after_ms,
      5_000
    );
    assert!(
      cfg.endpoints.api_base.is_empty()
    );
  }

  #[test]
  fn partial_toml_keeps_other_defaults()
  {
    let cfg =
      ClientConfig::from_toml_str(
        r#"
[notifications]
poll_interval_ms = 10000

[labels.status]
pending = "Ожидает"
"#
      )
      .expect("parse config");

    assert_eq!(
      cfg.notifications.poll_interval_ms,
      10_000
    );
    assert_eq!(
      cfg.notifications.fade_ms,
      300
    );
    assert_eq!(
      cfg.labels.status.pending,
      "Ожидает"
    );
    assert_eq!(
      cfg.labels.status.completed,
      "Completed"
    );
  }

  #[test]
  fn overrides_apply_known_keys_and_skip_unknown()
   {
    let mut cfg =
      ClientConfig::default();
    cfg
      .apply_overrides([
        (
          "endpoints.api_base"
            .to_string(),
          "/journal".to_string()
        ),
        (
          "auto_refresh.idle_threshold_ms"
            .to_string(),
          " 1000 ".to_string()
        ),
        (
          "table.collation_locale"
            .to_string(),
          "ru".to_string()
        ),
        (
          "unknown.key".to_string(),
          "x".to_string()
        )
      ])
      .expect("apply overrides");

    assert_eq!(
      cfg.endpoints.api_base,
      "/journal"
    );
    assert_eq!(
      cfg.table.collation_locale,
      "ru"
    );
    assert_eq!(
      cfg.auto_refresh.idle_threshold_ms,
      1_000
    );
  }

  #[test]
  fn reconcile_delay_follows_override() {
    let mut cfg =
      ClientConfig::default();
    assert_eq!(
      cfg.reconcile_delay(),
      Duration::from_millis(100)
    );
    cfg
      .apply_overrides([(
        "notifications.reconcile_delay_ms"
          .to_string(),
        "250".to_string()
      )])
      .expect("apply overrides");
    assert_eq!(
      cfg.reconcile_delay(),
      Duration::from_millis(250)
    );
  }

  #[test]
  fn non_numeric_interval_is_rejected()
  {
    let mut cfg =
      ClientConfig::default();
    let err = cfg
      .apply_overrides([(
        "notifications.poll_interval_ms"
          .to_string(),
        "soon".to_string()
      )])
      .expect_err("should fail");
    assert!(
      err
        .to_string()
        .contains("poll_interval_ms")
    );
  }

  #[test]
  fn malformed_toml_is_an_error() {
    assert!(
      ClientConfig::from_toml_str(
        "[notifications\n"
      )
      .is_err()
    );
  }
}
