use std::rc::Rc;

use gloo::events::EventListener;
use shiftlog_core::config::TableConfig;
use shiftlog_core::table::{
  RowCollator,
  SortDirection,
  row_matches,
  sort_order
};
use wasm_bindgen::JsCast;
use web_sys::{
  Element,
  HtmlInputElement
};

use crate::dom;
use crate::lifecycle::PageLifecycle;

const CONTAINER: &str = ".table-container";
const ROWS: &str = "table tbody tr";
const CELLS: &str =
  ":scope > td, :scope > th";

/// Filters the rows of the table that
/// shares the input's container. Returns
/// the visible row count, or `None` when
/// the input sits outside a container.
fn filter_rows(
  input: &Element,
  query: &str
) -> Option<usize> {
  let container =
    dom::closest(input, CONTAINER)?;
  let mut visible = 0_usize;
  for row in dom::query_within(&container, ROWS)
  {
    let text =
      row.text_content().unwrap_or_default();
    let matched = row_matches(&text, query);
    visible += usize::from(matched);
    dom::set_shown(&row, matched);
  }
  Some(visible)
}

fn bind_search(page: &mut PageLifecycle) {
  for element in dom::query_all(".search-input") {
    let Ok(input) =
      element.dyn_into::<HtmlInputElement>()
    else {
      continue;
    };
    let target = input.clone();
    page.listen(EventListener::new(
      &target,
      "input",
      move |_| {
        match filter_rows(&input, &input.value()) {
          | Some(visible) => {
            tracing::debug!(visible, "table search applied")
          }
          | None => {
            tracing::warn!("search input outside .table-container")
          }
        }
      }
    ));
  }
}

fn column_index(header: &Element) -> Option<usize> {
  let row = dom::closest(header, "tr")?;
  dom::query_within(&row, CELLS)
    .iter()
    .position(|cell| {
      cell.is_same_node(Some(header.as_ref()))
    })
}

fn cell_text(
  row: &Element,
  index: usize
) -> String {
  dom::query_within(row, CELLS)
    .get(index)
    .and_then(|cell| cell.text_content())
    .map(|text| text.trim().to_string())
    .unwrap_or_default()
}

fn sort_by_header(
  header: &Element,
  collator: &RowCollator
) {
  let Some(table) = dom::closest(header, "table")
  else {
    return;
  };
  let Some(index) = column_index(header) else {
    return;
  };
  let Some(body) =
    dom::query_within(&table, "tbody")
      .into_iter()
      .next()
  else {
    return;
  };

  let direction = SortDirection::next(
    header.class_list().contains("asc")
  );
  for th in dom::query_within(&table, "th") {
    for class in SortDirection::CLASSES {
      let _ = th.class_list().remove_1(class);
    }
  }
  let _ = header
    .class_list()
    .add_1(direction.class());

  let rows =
    dom::query_within(&body, ":scope > tr");
  let keys: Vec<String> = rows
    .iter()
    .map(|row| cell_text(row, index))
    .collect();
  for i in sort_order(&keys, direction, collator) {
    let _ = body.append_child(&rows[i]);
  }
  tracing::debug!(
    column = index,
    direction = direction.class(),
    rows = rows.len(),
    "table sorted"
  );
}

/// Configured locale, else the page's
/// `<html lang>`, else root.
fn page_collator(
  cfg: &TableConfig
) -> Option<RowCollator> {
  let page_lang = dom::document()
    .and_then(|doc| doc.document_element())
    .and_then(|root| root.get_attribute("lang"))
    .unwrap_or_default();
  let wanted = if cfg.collation_locale.trim().is_empty()
  {
    page_lang
  } else {
    cfg.collation_locale.clone()
  };

  match RowCollator::new(&wanted) {
    | Ok(collator) => Some(collator),
    | Err(err) => {
      tracing::warn!(
        error = ?err,
        "falling back to root collation"
      );
      RowCollator::root()
        .map_err(|err| {
          tracing::error!(
            error = ?err,
            "no collation data; sorting disabled"
          );
        })
        .ok()
    }
  }
}

fn bind_sort(
  cfg: &TableConfig,
  page: &mut PageLifecycle
) {
  let headers = dom::query_all(".sortable");
  if headers.is_empty() {
    return;
  }
  let Some(collator) = page_collator(cfg) else {
    return;
  };
  let collator = Rc::new(collator);

  for header in headers {
    let target = header.clone();
    let collator = collator.clone();
    page.listen(EventListener::new(
      &target,
      "click",
      move |_| sort_by_header(&header, &collator)
    ));
  }
}

pub fn bind(
  cfg: &TableConfig,
  page: &mut PageLifecycle
) {
  bind_search(page);
  bind_sort(cfg, page);
}
