use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::EventListener;
use shiftlog_core::alerts::AlertSink;
use shiftlog_core::api::ApiClient;
use shiftlog_core::config::Labels;
use shiftlog_core::status::{
  StatusBadge,
  StatusControl,
  TaskStatusController
};
use wasm_bindgen::JsCast;
use web_sys::{
  Element,
  HtmlSelectElement
};

use crate::dom;
use crate::lifecycle::PageLifecycle;

const ORIGINAL_VALUE: &str =
  "data-original-value";

struct SelectStatusControl {
  select:   HtmlSelectElement,
  task_id:  i64,
  recorded: RefCell<String>,
  spinner:  RefCell<Option<Element>>
}

impl SelectStatusControl {
  fn bind(element: Element) -> Option<Self> {
    let Some(task_id) =
      dom::data_i64(&element, "data-task-id")
    else {
      tracing::warn!(
        "status select without data-task-id"
      );
      return None;
    };
    let select = element
      .dyn_into::<HtmlSelectElement>()
      .ok()?;
    let recorded = select
      .get_attribute(ORIGINAL_VALUE)
      .unwrap_or_else(|| select.value());

    Some(Self {
      select,
      task_id,
      recorded: RefCell::new(recorded),
      spinner: RefCell::new(None)
    })
  }
}

impl StatusControl for SelectStatusControl {
  fn task_id(&self) -> i64 {
    self.task_id
  }

  fn recorded_value(&self) -> String {
    self.recorded.borrow().clone()
  }

  fn record_value(&self, value: &str) {
    let _ = self
      .select
      .set_attribute(ORIGINAL_VALUE, value);
    *self.recorded.borrow_mut() =
      value.to_string();
  }

  fn set_busy(&self, busy: bool) {
    self.select.set_disabled(busy);
    if let Some(spinner) =
      self.spinner.borrow_mut().take()
    {
      spinner.remove();
    }
    if busy
      && let Some(spinner) =
        dom::create("span", "loading ms-2")
    {
      let _ =
        self.select.after_with_node_1(&spinner);
      *self.spinner.borrow_mut() = Some(spinner);
    }
  }

  fn restore(&self, value: &str) {
    self.select.set_value(value);
  }

  fn apply_badge(&self, badge: &StatusBadge) {
    let Some(target) =
      dom::closest(&self.select, ".task-item")
        .and_then(|item| {
          dom::query_within(&item, ".status-badge")
            .into_iter()
            .next()
        })
    else {
      tracing::debug!(
        task_id = self.task_id,
        "no status badge next to select"
      );
      return;
    };
    target.set_class_name(&badge.css_class());
    target.set_text_content(Some(&badge.text));
  }
}

pub fn bind(
  labels: &Labels,
  api: Rc<ApiClient>,
  alerts: Rc<dyn AlertSink>,
  page: &mut PageLifecycle
) {
  let selects =
    dom::query_all(".task-status-select");
  if selects.is_empty() {
    return;
  }
  let controller = Rc::new(
    TaskStatusController::new(
      api,
      alerts,
      labels.clone()
    )
  );

  for element in selects {
    let Some(control) =
      SelectStatusControl::bind(element)
    else {
      continue;
    };
    let control = Rc::new(control);
    let target = control.select.clone();
    let controller = controller.clone();

    page.listen(EventListener::new(
      &target,
      "change",
      move |_| {
        let value = control.select.value();
        let control = control.clone();
        let controller = controller.clone();
        wasm_bindgen_futures::spawn_local(
          async move {
            controller
              .change_status(control.as_ref(), value)
              .await;
          }
        );
      }
    ));
  }
}
