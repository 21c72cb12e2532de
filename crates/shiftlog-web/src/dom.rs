use shiftlog_core::api::resolve_csrf_token;
use wasm_bindgen::JsCast;
use web_sys::{
  Document,
  Element,
  HtmlElement,
  HtmlInputElement
};

pub fn document() -> Option<Document> {
  web_sys::window()
    .and_then(|window| window.document())
}

pub fn query(
  selector: &str
) -> Option<Element> {
  document()?
    .query_selector(selector)
    .ok()
    .flatten()
}

pub fn query_all(
  selector: &str
) -> Vec<Element> {
  let Some(document) = document() else {
    return vec![];
  };
  match document
    .query_selector_all(selector)
  {
    | Ok(list) => collect(&list),
    | Err(err) => {
      tracing::warn!(
        selector,
        error = ?err,
        "invalid selector"
      );
      vec![]
    }
  }
}

pub fn query_within(
  root: &Element,
  selector: &str
) -> Vec<Element> {
  root
    .query_selector_all(selector)
    .map(|list| collect(&list))
    .unwrap_or_default()
}

fn collect(
  list: &web_sys::NodeList
) -> Vec<Element> {
  (0..list.length())
    .filter_map(|i| list.get(i))
    .filter_map(|node| {
      node.dyn_into::<Element>().ok()
    })
    .collect()
}

pub fn closest(
  element: &Element,
  selector: &str
) -> Option<Element> {
  element.closest(selector).ok().flatten()
}

/// jQuery-style show/hide through the
/// inline display property.
pub fn set_shown(
  element: &Element,
  shown: bool
) {
  if let Some(el) =
    element.dyn_ref::<HtmlElement>()
  {
    let style = el.style();
    let _ = if shown {
      style.remove_property("display").map(|_| ())
    } else {
      style.set_property("display", "none")
    };
  }
}

pub fn create(
  tag: &str,
  class: &str
) -> Option<Element> {
  let element =
    document()?.create_element(tag).ok()?;
  if !class.is_empty() {
    element.set_class_name(class);
  }
  Some(element)
}

pub fn append_text(
  parent: &Element,
  text: &str
) {
  if let Some(document) = document() {
    let node = document.create_text_node(text);
    let _ = parent.append_child(&node);
  }
}

/// `<i class="bi ...">` followed by a
/// text label, replacing the children.
pub fn set_icon_label(
  element: &Element,
  icon: &str,
  label: &str
) {
  element.set_text_content(None);
  if let Some(i) =
    create("i", &format!("bi {icon}"))
  {
    let _ = element.append_child(&i);
  }
  append_text(element, &format!(" {label}"));
}

pub fn data_i64(
  element: &Element,
  name: &str
) -> Option<i64> {
  element
    .get_attribute(name)?
    .trim()
    .parse()
    .ok()
}

pub fn csrf_token() -> Option<String> {
  let hidden = query(
    "[name=csrfmiddlewaretoken]"
  )
  .and_then(|el| {
    el.dyn_into::<HtmlInputElement>().ok()
  })
  .map(|input| input.value());
  let meta = query("meta[name=csrf-token]")
    .and_then(|el| {
      el.get_attribute("content")
    });

  let token = resolve_csrf_token(
    hidden.as_deref(),
    meta.as_deref()
  );
  if token.is_none() {
    tracing::debug!("no CSRF token found on page");
  }
  token
}

pub fn current_href() -> Option<String> {
  web_sys::window()?.location().href().ok()
}

pub fn current_path() -> Option<String> {
  web_sys::window()?
    .location()
    .pathname()
    .ok()
}

pub fn navigate(url: &str) {
  tracing::info!(url, "navigating");
  if let Some(window) = web_sys::window()
    && let Err(err) =
      window.location().set_href(url)
  {
    tracing::error!(error = ?err, "navigation failed");
  }
}
