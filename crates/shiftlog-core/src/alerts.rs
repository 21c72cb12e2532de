#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum AlertKind {
  Success,
  Info,
  Warning,
  Danger
}

impl AlertKind {
  pub fn as_str(self) -> &'static str {
    match self {
      | Self::Success => "success",
      | Self::Info => "info",
      | Self::Warning => "warning",
      | Self::Danger => "danger"
    }
  }
}

/// A dismissible banner shown in the
/// page's `.messages` region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
  pub kind:    AlertKind,
  pub message: String
}

impl Alert {
  pub fn success(
    message: impl Into<String>
  ) -> Self {
    Self {
      kind:    AlertKind::Success,
      message: message.into()
    }
  }

  pub fn info(
    message: impl Into<String>
  ) -> Self {
    Self {
      kind:    AlertKind::Info,
      message: message.into()
    }
  }

  pub fn danger(
    message: impl Into<String>
  ) -> Self {
    Self {
      kind:    AlertKind::Danger,
      message: message.into()
    }
  }

  pub fn css_class(&self) -> String {
    format!(
      "alert alert-{} \
       alert-dismissible fade show",
      self.kind.as_str()
    )
  }
}

pub trait AlertSink {
  fn show_alert(&self, alert: Alert);
}
