//! Label normalization shared by the block parser and the dimension helpers.

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// Fold a sheet label into its comparison form: trimmed, lowercase,
/// diacritics stripped (NFD, combining marks dropped) and internal whitespace
/// collapsed to single spaces.
///
/// `"  Tasa de  variación\tanual "` becomes `"tasa de variacion anual"`.
pub fn normalize_label(raw: &str) -> String {
  let folded: String = raw
    .trim()
    .to_lowercase()
    .nfd()
    .filter(|c| !is_combining_mark(*c))
    .collect();

  folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn strips_accents_and_case() {
    assert_eq!(normalize_label("Acumulado en lo que va de AÑO"), "acumulado en lo que va de ano");
    assert_eq!(normalize_label("Tasa de variación anual"), "tasa de variacion anual");
  }

  #[test]
  fn collapses_whitespace() {
    assert_eq!(normalize_label("  Dato \t  base\n"), "dato base");
  }

  #[test]
  fn empty_stays_empty() {
    assert_eq!(normalize_label("   "), "");
  }
}
