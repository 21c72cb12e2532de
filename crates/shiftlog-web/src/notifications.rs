use std::cell::{
  Cell,
  RefCell
};
use std::rc::Rc;

use gloo::events::{
  EventListener,
  EventListenerOptions
};
use gloo::timers::callback::{
  Interval,
  Timeout
};
use shiftlog_core::alerts::AlertSink;
use shiftlog_core::api::ApiClient;
use shiftlog_core::config::ClientConfig;
use shiftlog_core::notifications::{
  FeedChange,
  NotificationFeed,
  NotificationPanel,
  NotificationView
};
use shiftlog_web_shared::NotificationDto;
use wasm_bindgen::JsCast;
use web_sys::{
  Element,
  HtmlButtonElement
};
use yew::AppHandle;

use crate::components::{
  ListVariant,
  NotificationList,
  NotificationListProps
};
use crate::dom;
use crate::http::BrowserTimer;
use crate::lifecycle::{
  PageLifecycle,
  TimerSet
};

const BADGE: &str = "#notification-count";
const MENU: &str = "#notifications-menu";
const CARD_BODY: &str =
  "#notifications-card .card-body";
const MARK_ALL: &str = ".mark-all-read";
const MARK_ONE: &str = ".mark-read";
const ITEM: &str = ".notification-item";
const ID_ATTR: &str = "data-notification-id";

/// One region a notification list is
/// rendered into. Mounted lazily so the
/// server-rendered markup stays until
/// the first refresh lands.
struct MountedList {
  region:  Region,
  variant: ListVariant,
  /// Element yew renders into, once mounted.
  root:    Option<Element>,
  handle:  Option<AppHandle<NotificationList>>
}

enum Region {
  Menu(Element),
  CardBody(Element)
}

impl MountedList {
  fn show(
    &mut self,
    props: NotificationListProps
  ) {
    if let Some(handle) = &mut self.handle
    {
      handle.update(props);
      return;
    }

    let Some(root) = self.prepare_root()
    else {
      tracing::warn!(
        variant = ?self.variant,
        "notification region vanished"
      );
      return;
    };
    self.root = Some(root.clone());
    self.handle = Some(
      yew::Renderer::<NotificationList>::with_root_and_props(
        root, props
      )
      .render()
    );
  }

  fn owns(&self, node: &Element) -> bool {
    self
      .root
      .as_ref()
      .is_some_and(|root| root.contains(Some(node.as_ref())))
  }

  /// Strips the server-rendered items and
  /// returns the element yew renders into.
  fn prepare_root(
    &self
  ) -> Option<Element> {
    match &self.region {
      | Region::CardBody(body) => {
        body.set_inner_html("");
        Some(body.clone())
      }
      | Region::Menu(menu) => {
        for stale in dom::query_within(
          menu,
          ".notification-items"
        ) {
          stale.remove();
        }
        // The trailing item links to the
        // full history and survives.
        let mut items = dom::query_within(
          menu,
          ".dropdown-item"
        );
        items.pop();
        for item in items {
          match dom::closest(&item, "li") {
            | Some(li) => li.remove(),
            | None => item.remove()
          }
        }

        let holder = dom::create(
          "li",
          "notification-items"
        )?;
        let root = dom::create(
          "ul",
          "list-unstyled mb-0"
        )?;
        holder.append_child(&root).ok()?;

        let divider = dom::query_within(
          menu,
          ".dropdown-divider"
        )
        .into_iter()
        .next()
        .map(|divider| {
          dom::closest(&divider, "li")
            .unwrap_or(divider)
        });
        match divider {
          | Some(anchor) => {
            menu
              .insert_before(
                &holder,
                Some(&anchor)
              )
              .ok()?;
          }
          | None => {
            menu.append_child(&holder).ok()?;
          }
        }
        Some(root)
      }
    }
  }
}

pub struct DomNotificationView {
  badge:      Option<Element>,
  mark_all:   Vec<Element>,
  lists:      Rc<RefCell<Vec<MountedList>>>,
  /// Records the lists should settle on.
  shown:      Rc<RefCell<Vec<NotificationDto>>>,
  fading:     Rc<Cell<bool>>,
  fade:       RefCell<Option<Timeout>>,
  /// Fades of items outside the lists.
  retiring:   TimerSet,
  template:   NotificationListProps,
  idle_label: String,
  busy_label: String
}

impl DomNotificationView {
  pub fn from_page(
    cfg: &ClientConfig
  ) -> Self {
    let mut lists = Vec::new();
    if let Some(menu) = dom::query(MENU) {
      lists.push(MountedList {
        region:  Region::Menu(menu),
        variant: ListVariant::Dropdown,
        root:    None,
        handle:  None
      });
    }
    if let Some(body) = dom::query(CARD_BODY)
    {
      lists.push(MountedList {
        region:  Region::CardBody(body),
        variant: ListVariant::Card,
        root:    None,
        handle:  None
      });
    }

    Self {
      badge: dom::query(BADGE),
      mark_all: dom::query_all(MARK_ALL),
      lists: Rc::new(RefCell::new(lists)),
      shown: Rc::default(),
      fading: Rc::default(),
      fade: RefCell::new(None),
      retiring: TimerSet::default(),
      template: NotificationListProps {
        records:     vec![],
        fading:      vec![],
        fade_ms:     cfg
          .notifications
          .fade_ms,
        empty_label: cfg
          .labels
          .no_notifications
          .clone()
          .into(),
        variant:     ListVariant::Dropdown
      },
      idle_label: cfg
        .labels
        .mark_all_idle
        .clone(),
      busy_label: cfg
        .labels
        .mark_all_busy
        .clone()
    }
  }

  pub fn is_present(&self) -> bool {
    self.badge.is_some()
      || !self.lists.borrow().is_empty()
  }

  fn render_badge(
    &self,
    feed: &NotificationFeed
  ) {
    let Some(badge) = &self.badge else {
      return;
    };
    match feed.badge_count() {
      | Some(count) => {
        badge.set_text_content(Some(
          &count.to_string()
        ));
        dom::set_shown(badge, true);
      }
      | None => dom::set_shown(badge, false)
    }
  }

  /// Fades and removes page items for `ids`
  /// that no mounted list renders, such as
  /// the full history page.
  fn retire_static(&self, ids: &[i64]) {
    let lists = self.lists.borrow();
    let mut targets: Vec<Element> = Vec::new();
    for id in ids {
      let selector =
        format!("[{ID_ATTR}=\"{id}\"]");
      for marked in dom::query_all(&selector) {
        if lists.iter().any(|list| list.owns(&marked))
        {
          continue;
        }
        let target = dom::closest(&marked, ITEM)
          .unwrap_or(marked);
        if targets
          .iter()
          .any(|seen| seen.is_same_node(Some(target.as_ref())))
        {
          continue;
        }
        tracing::debug!(id, "retiring page item");
        targets.push(target);
      }
    }
    for target in targets {
      self.retire(target);
    }
  }

  fn retire(&self, target: Element) {
    let fade_ms = self.template.fade_ms;
    if fade_ms == 0 {
      target.remove();
      return;
    }
    let _ = target.set_attribute(
      "style",
      &format!(
        "opacity:0;transition:opacity {fade_ms}ms;"
      )
    );
    self
      .retiring
      .schedule(fade_ms, move || target.remove());
  }
}

/// Reads the server-rendered items so the
/// feed knows them before the first poll.
fn page_records() -> Vec<NotificationDto> {
  let mut records: Vec<NotificationDto> =
    Vec::new();
  for item in dom::query_all(ITEM) {
    let button = dom::query_within(&item, MARK_ONE)
      .into_iter()
      .next();
    let id = dom::data_i64(&item, ID_ATTR).or_else(|| {
      button
        .as_ref()
        .and_then(|button| dom::data_i64(button, ID_ATTR))
    });
    let Some(id) = id else {
      continue;
    };
    if records.iter().any(|known| known.id == id) {
      continue;
    }
    let text = |selector: &str| {
      dom::query_within(&item, selector)
        .into_iter()
        .next()
        .and_then(|node| node.text_content())
        .map(|text| text.trim().to_string())
        .unwrap_or_default()
    };
    records.push(NotificationDto {
      id,
      title: text("strong"),
      message: text("p"),
      is_read: button.is_none(),
      kind: None,
      sent_at: None
    });
  }
  records
}

fn with_records(
  template: &NotificationListProps,
  records: Vec<NotificationDto>,
  fading: Vec<i64>
) -> NotificationListProps {
  NotificationListProps {
    records,
    fading,
    ..template.clone()
  }
}

fn show_all(
  lists: &RefCell<Vec<MountedList>>,
  props: &NotificationListProps
) {
  for list in lists.borrow_mut().iter_mut() {
    list.show(NotificationListProps {
      variant: list.variant,
      ..props.clone()
    });
  }
}

impl NotificationView for DomNotificationView {
  fn render_feed(
    &self,
    feed: &NotificationFeed,
    change: &FeedChange
  ) {
    self.render_badge(feed);
    if matches!(change, FeedChange::Count) {
      return;
    }

    if let FeedChange::Removed(ids) = change {
      self.retire_static(ids);
    }

    let previous = self
      .shown
      .replace(feed.records().to_vec());

    match change {
      | FeedChange::Removed(ids)
        if !ids.is_empty()
          && self.template.fade_ms > 0 =>
      {
        show_all(
          &self.lists,
          &with_records(
            &self.template,
            previous,
            ids.clone()
          )
        );
        self.fading.set(true);

        let lists = self.lists.clone();
        let shown = self.shown.clone();
        let fading = self.fading.clone();
        let template = self.template.clone();
        let timeout = Timeout::new(
          self.template.fade_ms,
          move || {
            fading.set(false);
            let settled = with_records(
              &template,
              shown.borrow().clone(),
              vec![]
            );
            show_all(&lists, &settled);
          }
        );
        *self.fade.borrow_mut() = Some(timeout);
      }
      // The pending fade renders whatever
      // `shown` holds when it fires.
      | _ if self.fading.get() => {}
      | _ => show_all(
        &self.lists,
        &with_records(
          &self.template,
          feed.records().to_vec(),
          vec![]
        )
      )
    }
  }

  fn set_mark_all_busy(&self, busy: bool) {
    let (icon, label) = if busy {
      ("bi-hourglass-split", &self.busy_label)
    } else {
      ("bi-check-all", &self.idle_label)
    };
    for button in &self.mark_all {
      if let Some(button) =
        button.dyn_ref::<HtmlButtonElement>()
      {
        button.set_disabled(busy);
      }
      dom::set_icon_label(button, icon, label);
    }
  }

  fn hide_mark_all(&self) {
    for button in &self.mark_all {
      dom::set_shown(button, false);
    }
  }
}

/// Wires the badge, both lists, the
/// mark-read buttons, the mark-all
/// controls, and the poll timer.
pub fn bind(
  cfg: &ClientConfig,
  api: Rc<ApiClient>,
  alerts: Rc<dyn AlertSink>,
  page: &mut PageLifecycle
) {
  let view = DomNotificationView::from_page(cfg);
  if !view.is_present() {
    tracing::debug!(
      "no notification regions on page"
    );
    return;
  }
  let mark_all = view.mark_all.clone();

  let panel = Rc::new(NotificationPanel::new(
    api,
    Rc::new(view),
    alerts,
    Rc::new(BrowserTimer),
    cfg.labels.clone(),
    cfg.reconcile_delay()
  ));
  panel.seed(page_records());

  for button in mark_all {
    let panel = panel.clone();
    page.listen(EventListener::new_with_options(
      &button,
      "click",
      EventListenerOptions::enable_prevent_default(),
      move |event| {
        event.prevent_default();
        let panel = panel.clone();
        wasm_bindgen_futures::spawn_local(
          async move {
            let outcome =
              panel.mark_all_read().await;
            tracing::debug!(?outcome, "mark-all finished");
          }
        );
      }
    ));
  }

  if let Some(document) = dom::document() {
    let panel = panel.clone();
    page.listen(EventListener::new(
      &document,
      "click",
      move |event| {
        let Some(button) = event
          .target()
          .and_then(|target| {
            target.dyn_into::<Element>().ok()
          })
          .and_then(|target| {
            dom::closest(&target, MARK_ONE)
          })
        else {
          return;
        };
        let Some(id) =
          dom::data_i64(&button, ID_ATTR)
        else {
          tracing::warn!(
            "mark-read button without id"
          );
          return;
        };

        let panel = panel.clone();
        wasm_bindgen_futures::spawn_local(
          async move {
            let outcome =
              panel.mark_read(id).await;
            tracing::debug!(id, ?outcome, "mark-read finished");
          }
        );
      }
    ));
  }

  let first = panel.clone();
  wasm_bindgen_futures::spawn_local(
    async move {
      first.refresh().await;
    }
  );

  page.every(Interval::new(
    cfg.notifications.poll_interval_ms,
    move || {
      let panel = panel.clone();
      wasm_bindgen_futures::spawn_local(
        async move {
          panel.refresh().await;
        }
      );
    }
  ));
}
