//! Tag name normalization, comparison, and de-duplication.

use std::cmp::Ordering;

use marker_domain::Tag;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Normalize user input into a tag name.
///
/// Trims surrounding whitespace; blank input yields `None`.
///
/// # Examples
/// ```
/// use marker_tags::normalize_tag_name;
/// assert_eq!(normalize_tag_name("  rust  "), Some("rust".to_string()));
/// assert_eq!(normalize_tag_name("   "), None);
/// ```
pub fn normalize_tag_name(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Case-folded identity key of a tag name.
pub fn fold_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Whether two names denote the same tag (case-insensitive).
pub fn names_equal(a: &str, b: &str) -> bool {
    fold_name(a) == fold_name(b)
}

/// Sort key ignoring case and accents ("base" sensitivity).
fn collation_key(name: &str) -> String {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Order names the way the tag dictionary is displayed.
///
/// Case and accents are ignored first; the raw strings break ties so the
/// ordering stays total and deterministic.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}

/// Whether `names` already holds `name` (case-insensitive).
pub fn contains_name<S: AsRef<str>>(names: &[S], name: &str) -> bool {
    names.iter().any(|n| names_equal(n.as_ref(), name))
}

/// Trim names, drop blanks, and keep the first spelling of each case-insensitive duplicate.
pub fn dedupe_names<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut result: Vec<String> = Vec::new();
    for name in names {
        if let Some(name) = normalize_tag_name(name.as_ref()) {
            if !contains_name(&result, &name) {
                result.push(name);
            }
        }
    }
    result
}

/// Keep the first tag of each case-insensitive name, preserving order.
pub fn dedupe_tags(tags: Vec<Tag>) -> Vec<Tag> {
    let mut result: Vec<Tag> = Vec::with_capacity(tags.len());
    for tag in tags {
        if !result.iter().any(|t| names_equal(&t.name, &tag.name)) {
            result.push(tag);
        }
    }
    result
}

/// Whether two tag lists carry the same names in the same order (case-insensitive).
pub fn same_tag_names(a: &[Tag], b: &[Tag]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| names_equal(&x.name, &y.name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("rust", Some("rust"))]
    #[case("  spaced out ", Some("spaced out"))]
    #[case("", None)]
    #[case(" \t ", None)]
    fn normalize(#[case] input: &str, #[case] expected: Option<&str>) {
        assert_eq!(normalize_tag_name(input), expected.map(str::to_string));
    }

    #[test]
    fn equality_ignores_case() {
        assert!(names_equal("Rust", "rust"));
        assert!(names_equal("RUST ", "rust"));
        assert!(!names_equal("rust", "rusty"));
    }

    #[test]
    fn ordering_ignores_case_and_accents() {
        let mut names = vec!["banana", "Apple", "éclair", "apple", "Eagle"];
        names.sort_by(|a, b| compare_names(a, b));
        assert_eq!(names, vec!["Apple", "apple", "banana", "Eagle", "éclair"]);
    }

    #[test]
    fn dedupe_keeps_first_spelling() {
        let names = dedupe_names(["Rust", "rust", " go ", "", "RUST", "Go"]);
        assert_eq!(names, vec!["Rust".to_string(), "go".to_string()]);
    }

    #[test]
    fn dedupe_tags_by_name() {
        let tags = vec![
            Tag::with_id("1", "News"),
            Tag::with_id("2", "news"),
            Tag::with_id("3", "tech"),
        ];
        let ids: Vec<String> = dedupe_tags(tags).into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["1".to_string(), "3".to_string()]);
    }

    #[test]
    fn same_names() {
        let a = vec![Tag::with_id("1", "A"), Tag::with_id("2", "b")];
        let b = vec![Tag::with_id("x", "a"), Tag::with_id("y", "B")];
        assert!(same_tag_names(&a, &b));
        assert!(!same_tag_names(&a, &b[..1]));
    }
}
