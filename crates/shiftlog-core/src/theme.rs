pub const THEME_ATTRIBUTE: &str =
  "data-theme";
pub const TRANSITION_CLASS: &str =
  "theme-transition";

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
)]
pub enum Theme {
  #[default]
  Light,
  Dark
}

impl Theme {
  /// Anything but a stored `dark`
  /// falls back to light.
  pub fn from_storage(
    stored: Option<&str>
  ) -> Self {
    match stored.map(str::trim) {
      | Some("dark") => Self::Dark,
      | _ => Self::Light
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      | Self::Light => "light",
      | Self::Dark => "dark"
    }
  }

  pub fn toggled(self) -> Self {
    match self {
      | Self::Light => Self::Dark,
      | Self::Dark => Self::Light
    }
  }

  pub fn icon_class(
    self
  ) -> &'static str {
    match self {
      | Self::Light => "bi-sun-fill",
      | Self::Dark => "bi-moon-fill"
    }
  }

  /// The icon class this theme replaces.
  pub fn stale_icon_class(
    self
  ) -> &'static str {
    self.toggled().icon_class()
  }
}

/// Page-wide theme state, handed to the
/// theme controller at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeSettings {
  current:     Theme,
  storage_key: String
}

impl ThemeSettings {
  pub fn new(
    stored: Option<&str>,
    storage_key: impl Into<String>
  ) -> Self {
    Self {
      current:     Theme::from_storage(
        stored
      ),
      storage_key: storage_key.into()
    }
  }

  pub fn current(&self) -> Theme {
    self.current
  }

  pub fn storage_key(&self) -> &str {
    &self.storage_key
  }

  pub fn toggle(&mut self) -> Theme {
    self.current = self.current.toggled();
    self.current
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_or_unknown_flag_is_light() {
    assert_eq!(
      Theme::from_storage(None),
      Theme::Light
    );
    assert_eq!(
      Theme::from_storage(Some("night")),
      Theme::Light
    );
    assert_eq!(
      Theme::from_storage(Some("dark")),
      Theme::Dark
    );
  }

  #[test]
  fn toggle_round_trips_symmetrically() {
    let mut settings =
      ThemeSettings::new(None, "theme");
    assert_eq!(
      settings.current().icon_class(),
      "bi-sun-fill"
    );

    let dark = settings.toggle();
    assert_eq!(dark, Theme::Dark);
    assert_eq!(dark.as_str(), "dark");
    assert_eq!(
      dark.icon_class(),
      "bi-moon-fill"
    );
    assert_eq!(
      dark.stale_icon_class(),
      "bi-sun-fill"
    );

    let light = settings.toggle();
    assert_eq!(light, Theme::Light);
    assert_eq!(light.as_str(), "light");
    assert_eq!(
      light.stale_icon_class(),
      "bi-moon-fill"
    );
  }
}
