use std::cmp::Ordering;

use anyhow::anyhow;
use icu_collator::options::CollatorOptions;
use icu_collator::{
  Collator,
  CollatorBorrowed,
  CollatorPreferences
};
use icu_locale_core::Locale;
use tracing::debug;

const ROOT_LOCALE: &str = "und";

/// Case-insensitive substring match of
/// the search query against a row's text.
pub fn row_matches(
  row_text: &str,
  query: &str
) -> bool {
  row_text
    .to_lowercase()
    .contains(&query.to_lowercase())
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum SortDirection {
  Ascending,
  Descending
}

impl SortDirection {
  pub const CLASSES: [&'static str; 2] =
    ["asc", "desc"];

  /// A header already sorted ascending
  /// flips to descending; anything else
  /// starts ascending.
  pub fn next(
    header_is_ascending: bool
  ) -> Self {
    if header_is_ascending {
      Self::Descending
    } else {
      Self::Ascending
    }
  }

  pub fn class(self) -> &'static str {
    match self {
      | Self::Ascending => "asc",
      | Self::Descending => "desc"
    }
  }
}

/// Locale-aware string ordering for
/// table cells, backed by the CLDR
/// collation tables. An empty tag
/// collates with the root locale.
pub struct RowCollator {
  locale: String,
  inner:  CollatorBorrowed<'static>
}

impl RowCollator {
  pub fn new(
    locale: &str
  ) -> anyhow::Result<Self> {
    let tag = match locale.trim() {
      | "" => ROOT_LOCALE,
      | tag => tag
    };
    let parsed = Locale::try_from_str(tag)
      .map_err(|err| {
        anyhow!(
          "invalid collation locale \
           {tag:?}: {err}"
        )
      })?;
    let inner = Collator::try_new(
      CollatorPreferences::from(&parsed),
      CollatorOptions::default()
    )
    .map_err(|err| {
      anyhow!(
        "no collation data for \
         {tag}: {err}"
      )
    })?;
    debug!(locale = tag, "row collator ready");

    Ok(Self {
      locale: tag.to_string(),
      inner
    })
  }

  /// Root-locale collator; the root
  /// tables are always compiled in.
  pub fn root() -> anyhow::Result<Self> {
    Self::new(ROOT_LOCALE)
  }

  pub fn locale(&self) -> &str {
    &self.locale
  }

  pub fn compare(
    &self,
    a: &str,
    b: &str
  ) -> Ordering {
    self.inner.compare(a, b)
  }
}

/// Row permutation for the given cell
/// keys. Stable: equal keys keep their
/// current order in both directions.
pub fn sort_order(
  keys: &[String],
  direction: SortDirection,
  collator: &RowCollator
) -> Vec<usize> {
  let mut order: Vec<usize> =
    (0..keys.len()).collect();
  order.sort_by(|&a, &b| {
    let ord =
      collator.compare(&keys[a], &keys[b]);
    match direction {
      | SortDirection::Ascending => ord,
      | SortDirection::Descending => {
        ord.reverse()
      }
    }
  });
  order
}

#[cfg(test)]
mod tests {
  use super::*;

  fn keys(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|k| k.to_string()).collect()
  }

  fn root() -> RowCollator {
    RowCollator::root()
      .expect("root collation data")
  }

  fn sorted<'a>(
    raw: &[&'a str],
    collator: &RowCollator
  ) -> Vec<&'a str> {
    sort_order(
      &keys(raw),
      SortDirection::Ascending,
      collator
    )
    .into_iter()
    .map(|i| raw[i])
    .collect()
  }

  #[test]
  fn search_ignores_case() {
    assert!(row_matches(
      "Pump 3 Inspection  Ivanov",
      "inspection"
    ));
    assert!(!row_matches(
      "Pump 3 Inspection",
      "valve"
    ));
    assert!(row_matches("anything", ""));
  }

  #[test]
  fn two_clicks_toggle_direction() {
    let first = SortDirection::next(false);
    assert_eq!(
      first,
      SortDirection::Ascending
    );
    assert_eq!(first.class(), "asc");

    let second = SortDirection::next(
      first == SortDirection::Ascending
    );
    assert_eq!(
      second,
      SortDirection::Descending
    );
    assert_eq!(second.class(), "desc");
  }

  #[test]
  fn sort_order_follows_direction() {
    let cells =
      keys(&["beta", "Alpha", "gamma"]);
    assert_eq!(
      sort_order(
        &cells,
        SortDirection::Ascending,
        &root()
      ),
      vec![1, 0, 2]
    );
    assert_eq!(
      sort_order(
        &cells,
        SortDirection::Descending,
        &root()
      ),
      vec![2, 0, 1]
    );
  }

  #[test]
  fn equal_keys_keep_row_order() {
    let cells =
      keys(&["b", "a", "b", "a"]);
    assert_eq!(
      sort_order(
        &cells,
        SortDirection::Ascending,
        &root()
      ),
      vec![1, 3, 0, 2]
    );
    assert_eq!(
      sort_order(
        &cells,
        SortDirection::Descending,
        &root()
      ),
      vec![0, 2, 1, 3]
    );
  }

  #[test]
  fn cyrillic_yo_sorts_next_to_ye() {
    let russian = RowCollator::new("ru")
      .expect("ru collation data");
    assert_eq!(russian.locale(), "ru");
    assert_eq!(
      sorted(&["ж", "ё", "е"], &russian),
      vec!["е", "ё", "ж"]
    );
    assert_eq!(
      sorted(
        &["Жуков", "Ёлкин", "Егоров"],
        &russian
      ),
      vec!["Егоров", "Ёлкин", "Жуков"]
    );
  }

  #[test]
  fn accented_latin_sorts_with_base_letter()
   {
    assert_eq!(
      sorted(&["f", "é", "e"], &root()),
      vec!["e", "é", "f"]
    );
  }

  #[test]
  fn blank_locale_means_root_and_bad_tag_errors()
   {
    let blank = RowCollator::new("  ")
      .expect("blank locale");
    assert_eq!(blank.locale(), "und");
    assert!(RowCollator::new("not a tag!")
      .is_err());
  }
}
