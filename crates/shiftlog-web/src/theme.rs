use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::EventListener;
use shiftlog_core::config::ThemeConfig;
use shiftlog_core::theme::{
  THEME_ATTRIBUTE,
  TRANSITION_CLASS,
  Theme,
  ThemeSettings
};

use crate::dom;
use crate::lifecycle::{
  PageLifecycle,
  TimerSet
};

fn load_stored(key: &str) -> Option<String> {
  web_sys::window()
    .and_then(|window| {
      window
        .local_storage()
        .ok()
        .flatten()
    })
    .and_then(|storage| {
      storage.get_item(key).ok().flatten()
    })
}

fn save(key: &str, theme: Theme) {
  if let Some(storage) =
    web_sys::window().and_then(
      |window| {
        window
          .local_storage()
          .ok()
          .flatten()
      }
    )
  {
    let _ = storage.set_item(
      key,
      theme.as_str()
    );
  }
}

fn apply(theme: Theme) {
  let Some(document) = dom::document() else {
    return;
  };
  if let Some(root) = document.document_element()
  {
    let _ = root.set_attribute(
      THEME_ATTRIBUTE,
      theme.as_str()
    );
  }
  if let Some(icon) = dom::query("#themeIcon") {
    let classes = icon.class_list();
    let _ =
      classes.remove_1(theme.stale_icon_class());
    let _ = classes.add_1(theme.icon_class());
  }
}

fn flash_transition(
  timers: &TimerSet,
  duration_ms: u32
) {
  let Some(body) =
    dom::document().and_then(|doc| doc.body())
  else {
    return;
  };
  let _ = body.class_list().add_1(TRANSITION_CLASS);
  timers.schedule(duration_ms, move || {
    let _ = body
      .class_list()
      .remove_1(TRANSITION_CLASS);
  });
}

pub fn bind(
  cfg: &ThemeConfig,
  page: &mut PageLifecycle
) {
  let stored = load_stored(&cfg.storage_key);
  let settings = ThemeSettings::new(
    stored.as_deref(),
    cfg.storage_key.clone()
  );
  apply(settings.current());
  tracing::info!(
    theme = settings.current().as_str(),
    "theme applied"
  );

  let Some(toggle) = dom::query("#themeToggle")
  else {
    return;
  };
  let settings = Rc::new(RefCell::new(settings));
  let transition_ms = cfg.transition_ms;
  let timers = TimerSet::default();
  page.listen(EventListener::new(
    &toggle,
    "click",
    move |_| {
      let mut settings = settings.borrow_mut();
      let theme = settings.toggle();
      save(settings.storage_key(), theme);
      apply(theme);
      flash_transition(&timers, transition_ms);
      tracing::info!(theme = theme.as_str(), "theme toggled");
    }
  ));
}

#[cfg(test)]
mod tests {
  use wasm_bindgen_test::{
    wasm_bindgen_test,
    wasm_bindgen_test_configure
  };

  use super::*;

  wasm_bindgen_test_configure!(run_in_browser);

  fn body_has_transition() -> bool {
    dom::document()
      .and_then(|doc| doc.body())
      .is_some_and(|body| {
        body.class_list().contains(TRANSITION_CLASS)
      })
  }

  #[wasm_bindgen_test]
  async fn transition_class_clears_while_owner_lives() {
    let timers = TimerSet::default();
    flash_transition(&timers, 5);
    assert!(body_has_transition());

    gloo::timers::future::TimeoutFuture::new(30).await;
    assert!(!body_has_transition());
  }

  #[wasm_bindgen_test]
  async fn torn_down_owner_leaves_no_pending_transition() {
    let timers = TimerSet::default();
    flash_transition(&timers, 5);
    assert_eq!(timers.pending(), 1);
    drop(timers);

    gloo::timers::future::TimeoutFuture::new(30).await;
    assert!(body_has_transition());
    if let Some(body) =
      dom::document().and_then(|doc| doc.body())
    {
      let _ = body.class_list().remove_1(TRANSITION_CLASS);
    }
  }
}
