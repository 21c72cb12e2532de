mod alerts;
mod auto_refresh;
mod components;
mod config;
mod dom;
mod filters;
mod http;
mod lifecycle;
mod notifications;
mod table;
mod task_status;
mod theme;
mod uploads;

use std::rc::Rc;

use gloo::events::EventListener;
use shiftlog_core::alerts::AlertSink;
use shiftlog_core::api::ApiClient;
use shiftlog_core::config::ClientConfig;
use wasm_bindgen::JsCast;
use web_sys::PageTransitionEvent;

use crate::alerts::BannerAlerts;
use crate::http::FetchTransport;
use crate::lifecycle::PageLifecycle;

fn main() {
  console_error_panic_hook::set_once();
  wasm_tracing::set_as_global_default();

  tracing::info!(
    "starting shiftlog page controllers"
  );

  let cfg = Rc::new(config::load());
  boot(&cfg);

  let Some(window) = web_sys::window() else {
    return;
  };
  EventListener::new(
    &window,
    "pagehide",
    |_| lifecycle::teardown()
  )
  .forget();
  EventListener::new(
    &window,
    "pageshow",
    move |event| {
      let restored = event
        .dyn_ref::<PageTransitionEvent>()
        .is_some_and(|e| e.persisted());
      if restored {
        tracing::info!(
          "page restored from cache"
        );
        boot(&cfg);
      }
    }
  )
  .forget();
}

/// Binds every controller present on the
/// page and hands their listeners and
/// timers to the page lifecycle.
fn boot(cfg: &ClientConfig) {
  let mut page = PageLifecycle::default();

  let alerts: Rc<dyn AlertSink> = Rc::new(
    BannerAlerts::new(
      cfg.alerts.dismiss_after_ms
    )
  );
  let api = Rc::new(ApiClient::new(
    Rc::new(FetchTransport),
    cfg.endpoints.api_base.clone(),
    Box::new(dom::csrf_token)
  ));

  theme::bind(&cfg.theme, &mut page);
  notifications::bind(
    cfg,
    api.clone(),
    alerts.clone(),
    &mut page
  );
  task_status::bind(
    &cfg.labels,
    api,
    alerts,
    &mut page
  );
  uploads::bind(&mut page);
  filters::bind(&mut page);
  table::bind(&cfg.table, &mut page);
  auto_refresh::bind(
    &cfg.auto_refresh,
    &mut page
  );

  lifecycle::install(page);
}
