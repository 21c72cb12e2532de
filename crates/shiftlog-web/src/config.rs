use anyhow::Context;
use shiftlog_core::config::ClientConfig;

use crate::dom;

const INLINE_CONFIG: &str = "#shiftlog-config";
const META_PREFIX: &str = "shiftlog:";

/// Inline TOML first, then `<meta>`
/// overrides. Any failure falls back to
/// the defaults.
pub fn load() -> ClientConfig {
  match try_load() {
    | Ok(cfg) => cfg,
    | Err(err) => {
      tracing::error!(
        error = ?err,
        "client config rejected; using defaults"
      );
      ClientConfig::default()
    }
  }
}

fn try_load() -> anyhow::Result<ClientConfig> {
  let inline = dom::query(INLINE_CONFIG)
    .and_then(|script| script.text_content())
    .filter(|text| !text.trim().is_empty());

  let mut cfg = match inline {
    | Some(text) => ClientConfig::from_toml_str(&text)
      .context("inline config block")?,
    | None => ClientConfig::default()
  };

  let overrides: Vec<(String, String)> =
    dom::query_all(&format!(
      "meta[name^=\"{META_PREFIX}\"]"
    ))
    .into_iter()
    .filter_map(|meta| {
      let name = meta.get_attribute("name")?;
      let key = name
        .strip_prefix(META_PREFIX)?
        .to_string();
      let value = meta
        .get_attribute("content")
        .unwrap_or_default();
      Some((key, value))
    })
    .collect();

  if !overrides.is_empty() {
    tracing::debug!(
      count = overrides.len(),
      "applying meta overrides"
    );
    cfg
      .apply_overrides(overrides)
      .context("meta overrides")?;
  }
  Ok(cfg)
}
