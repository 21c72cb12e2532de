use gloo::events::EventListener;
use shiftlog_core::uploads::UploadSelection;
use wasm_bindgen::JsCast;
use web_sys::{
  Element,
  HtmlInputElement
};

use crate::dom;
use crate::lifecycle::PageLifecycle;

fn preview_for(input: &Element) -> Option<Element> {
  let parent = input.parent_element()?;
  dom::query_within(&parent, ".file-preview")
    .into_iter()
    .next()
}

fn selected_file(
  input: &HtmlInputElement
) -> Option<UploadSelection> {
  let file = input.files()?.get(0)?;
  Some(UploadSelection {
    name: file.name(),
    size: file.size() as u64
  })
}

fn render_preview(
  preview: &Element,
  selection: &UploadSelection
) -> Option<()> {
  preview.set_text_content(None);
  let info = dom::create(
    "div",
    "file-info p-2 border rounded mb-2"
  )?;
  let icon = dom::create("i", "bi bi-file-earmark")?;
  info.append_child(&icon).ok()?;
  dom::append_text(&info, &format!(" {} ", selection.name));

  let size = dom::create("small", "text-muted")?;
  size.set_text_content(Some(&format!(
    "({})",
    selection.size_label()
  )));
  info.append_child(&size).ok()?;

  let remove = dom::create(
    "button",
    "btn btn-sm btn-outline-danger ms-2 remove-file"
  )?;
  remove.set_attribute("type", "button").ok()?;
  let x = dom::create("i", "bi bi-x")?;
  remove.append_child(&x).ok()?;
  info.append_child(&remove).ok()?;

  preview.append_child(&info).ok()?;
  Some(())
}

/// Preview line under every `.file-upload`
/// input, with a remove button that
/// clears the selection.
pub fn bind(page: &mut PageLifecycle) {
  for element in dom::query_all(".file-upload") {
    let Some(preview) = preview_for(&element)
    else {
      tracing::debug!("file input without .file-preview");
      continue;
    };
    let Ok(input) =
      element.dyn_into::<HtmlInputElement>()
    else {
      continue;
    };

    {
      let target = input.clone();
      let input = input.clone();
      let preview = preview.clone();
      page.listen(EventListener::new(
        &target,
        "change",
        move |_| match selected_file(&input) {
          | Some(selection) => {
            tracing::debug!(
              file = %selection.summary(),
              "upload selected"
            );
            if render_preview(&preview, &selection)
              .is_none()
            {
              tracing::warn!("could not render file preview");
            }
          }
          | None => preview.set_text_content(None)
        }
      ));
    }

    let target = preview.clone();
    page.listen(EventListener::new(
      &target,
      "click",
      move |event| {
        let clicked_remove = event
          .target()
          .and_then(|t| t.dyn_into::<Element>().ok())
          .and_then(|t| dom::closest(&t, ".remove-file"))
          .is_some();
        if clicked_remove {
          input.set_value("");
          preview.set_text_content(None);
        }
      }
    ));
  }
}
