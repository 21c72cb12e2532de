use anyhow::Context;
use tracing::debug;
use url::Url;

/// Destination for a submitted filter
/// form: the current page with its query
/// replaced by the non-empty fields, in
/// form order.
#[tracing::instrument(skip(fields))]
pub fn filter_url(
  current: &str,
  fields: &[(String, String)]
) -> anyhow::Result<String> {
  let mut url = Url::parse(current)
    .with_context(|| {
      format!(
        "invalid page url: {current}"
      )
    })?;
  url.set_query(None);
  url.set_fragment(None);

  let kept: Vec<_> = fields
    .iter()
    .filter(|(_, value)| {
      !value.is_empty()
    })
    .collect();
  debug!(
    submitted = fields.len(),
    kept = kept.len(),
    "building filter query"
  );

  if !kept.is_empty() {
    let mut pairs =
      url.query_pairs_mut();
    for (name, value) in kept {
      pairs.append_pair(name, value);
    }
  }

  Ok(url.to_string())
}

/// Bare path of the current page.
pub fn reset_url(
  current: &str
) -> anyhow::Result<String> {
  let url = Url::parse(current)
    .with_context(|| {
      format!(
        "invalid page url: {current}"
      )
    })?;
  Ok(url.path().to_string())
}
