use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::EventListener;
use shiftlog_core::alerts::{
  Alert,
  AlertSink
};

use wasm_bindgen::JsCast;
use web_sys::Node;

use crate::dom;
use crate::lifecycle::TimerSet;

/// Bootstrap banners appended to the
/// page's `.messages` region, removed on
/// close or after a fixed delay. Timers
/// and close handlers live as long as the
/// sink does.
pub struct BannerAlerts {
  dismiss_after_ms: u32,
  timers:           TimerSet,
  close_handlers:   Rc<RefCell<Vec<EventListener>>>
}

impl BannerAlerts {
  pub fn new(dismiss_after_ms: u32) -> Self {
    Self {
      dismiss_after_ms,
      timers: TimerSet::default(),
      close_handlers: Rc::default()
    }
  }

  #[cfg(test)]
  fn pending_dismissals(&self) -> usize {
    self.timers.pending()
  }
}

impl AlertSink for BannerAlerts {
  fn show_alert(&self, alert: Alert) {
    let Some(container) = dom::query(".messages")
    else {
      tracing::warn!(
        kind = alert.kind.as_str(),
        message = %alert.message,
        "no .messages region; alert dropped"
      );
      return;
    };
    let Some(banner) =
      dom::create("div", &alert.css_class())
    else {
      return;
    };
    let _ = banner.set_attribute("role", "alert");
    dom::append_text(&banner, &alert.message);

    let close = dom::create("button", "btn-close");
    if let Some(button) = &close {
      let _ = button.set_attribute("type", "button");
      let _ = button
        .set_attribute("data-bs-dismiss", "alert");
      let _ =
        button.set_attribute("aria-label", "Close");
      let _ = banner.append_child(button);
    }
    if container.append_child(&banner).is_err() {
      tracing::warn!("could not attach alert banner");
      return;
    }
    tracing::debug!(
      kind = alert.kind.as_str(),
      "alert shown"
    );

    if let Some(button) = close {
      let banner = banner.clone();
      self.close_handlers.borrow_mut().push(
        EventListener::new(
          &button,
          "click",
          move |_| banner.remove()
        )
      );
    }

    let handlers = self.close_handlers.clone();
    self.timers.schedule(
      self.dismiss_after_ms,
      move || {
        banner.remove();
        // Handlers of detached banners.
        handlers.borrow_mut().retain(|handler| {
          handler
            .target()
            .dyn_ref::<Node>()
            .is_some_and(Node::is_connected)
        });
      }
    );
  }
}
