//! Result ordering for batch reports

use std::cmp::Ordering;

use livegate_domain::EvaluationItem;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Locale-aware title comparison.
///
/// Compares base letters first (accents and case ignored), so `"Ángel"`
/// sorts between `"ana"` and `"Bruno"`. Ties are broken by accents, then by
/// the raw strings so the order stays total.
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    primary_key(a)
        .cmp(&primary_key(b))
        .then_with(|| a.to_lowercase().nfd().cmp(b.to_lowercase().nfd()))
        .then_with(|| a.cmp(b))
}

/// Sort items ascending by title.
pub fn sort_by_title(items: &mut [EvaluationItem]) {
    items.sort_by(|a, b| compare_titles(&a.title, &b.title));
}

fn primary_key(title: &str) -> String {
    title.nfd().filter(|c| !is_combining_mark(*c)).flat_map(char::to_lowercase).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(titles: &[&'static str]) -> Vec<&'static str> {
        let mut titles = titles.to_vec();
        titles.sort_by(|a, b| compare_titles(a, b));
        titles
    }

    #[test]
    fn folds_case_before_comparing() {
        assert_eq!(
            sorted(&["charlie", "Bravo", "alpha", "ALPHA"]),
            vec!["ALPHA", "alpha", "Bravo", "charlie"]
        );
    }

    #[test]
    fn accented_titles_sort_with_their_base_letter() {
        assert_eq!(
            sorted(&["Bruno", "Ángel", "ana", "Éric", "Fabio"]),
            vec!["ana", "Ángel", "Bruno", "Éric", "Fabio"]
        );
        assert_eq!(sorted(&["peña", "pena", "pens"]), vec!["pena", "peña", "pens"]);
    }

    #[test]
    fn unaccented_form_comes_first_on_ties() {
        assert_eq!(compare_titles("resume", "résumé"), Ordering::Less);
        assert_eq!(compare_titles("same", "same"), Ordering::Equal);
    }
}
