use gloo::events::{
  EventListener,
  EventListenerOptions
};
use shiftlog_core::filters::{
  filter_url,
  reset_url
};
use wasm_bindgen::JsCast;
use web_sys::{
  FormData,
  HtmlFormElement
};

use crate::dom;
use crate::lifecycle::PageLifecycle;

/// Text fields of a form in document
/// order. File entries are skipped.
fn form_fields(
  form: &HtmlFormElement
) -> Vec<(String, String)> {
  let Ok(data) = FormData::new_with_form(form)
  else {
    return vec![];
  };
  let Ok(Some(entries)) = js_sys::try_iter(&data)
  else {
    return vec![];
  };

  entries
    .filter_map(Result::ok)
    .filter_map(|entry| {
      let pair: js_sys::Array = entry.into();
      Some((
        pair.get(0).as_string()?,
        pair.get(1).as_string()?
      ))
    })
    .collect()
}

fn go(target: anyhow::Result<String>) {
  match target {
    | Ok(url) => dom::navigate(&url),
    | Err(err) => {
      tracing::error!(error = ?err, "cannot build filter url")
    }
  }
}

pub fn bind(page: &mut PageLifecycle) {
  for element in dom::query_all(".filter-form") {
    let Ok(form) =
      element.dyn_into::<HtmlFormElement>()
    else {
      continue;
    };
    let target = form.clone();
    page.listen(EventListener::new_with_options(
      &target,
      "submit",
      EventListenerOptions::enable_prevent_default(),
      move |event| {
        event.prevent_default();
        let Some(href) = dom::current_href()
        else {
          return;
        };
        go(filter_url(&href, &form_fields(&form)));
      }
    ));
  }

  for reset in dom::query_all(".reset-filters") {
    page.listen(EventListener::new_with_options(
      &reset,
      "click",
      EventListenerOptions::enable_prevent_default(),
      |event| {
        event.prevent_default();
        if let Some(href) = dom::current_href() {
          go(reset_url(&href));
        }
      }
    ));
  }
}
