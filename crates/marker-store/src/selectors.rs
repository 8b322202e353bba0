//! Read-only queries over a snapshot.

use marker_domain::{Bookmark, Mark, Tag};
use marker_tags::{names_equal, TagDictionary};

use crate::state::State;

impl State {
    pub fn bookmark(&self, id: &str) -> Option<&Bookmark> {
        self.bookmarks.iter().find(|b| b.id == id)
    }

    pub fn mark(&self, id: &str) -> Option<&Mark> {
        self.marks.iter().find(|m| m.id == id)
    }

    pub fn tag(&self, id: &str) -> Option<&Tag> {
        self.tags.iter().find(|t| t.id == id)
    }

    /// Dictionary entry with this name (case-insensitive).
    pub fn tag_named(&self, name: &str) -> Option<&Tag> {
        self.tags.iter().find(|t| names_equal(&t.name, name))
    }

    /// Bookmarks grouped under `url`.
    pub fn bookmarks_for_url<'a>(&'a self, url: &'a str) -> impl Iterator<Item = &'a Bookmark> + 'a {
        self.bookmarks.iter().filter(move |b| b.url == url)
    }

    /// Marks grouped under `url`.
    pub fn marks_for_url<'a>(&'a self, url: &'a str) -> impl Iterator<Item = &'a Mark> + 'a {
        self.marks.iter().filter(move |m| m.url == url)
    }

    /// Sorted names for autocomplete.
    pub fn tag_dictionary(&self) -> TagDictionary {
        TagDictionary::from_tags(&self.tags)
    }

    /// Bookmarks matching the current search value.
    pub fn visible_bookmarks(&self) -> Vec<&Bookmark> {
        let needle = self.search_value.to_lowercase();
        self.bookmarks
            .iter()
            .filter(|b| {
                matches_search(
                    &needle,
                    [b.title.as_str(), b.url.as_str()],
                    &b.tags,
                )
            })
            .collect()
    }

    /// Marks matching the current search value.
    pub fn visible_marks(&self) -> Vec<&Mark> {
        let needle = self.search_value.to_lowercase();
        self.marks
            .iter()
            .filter(|m| {
                matches_search(
                    &needle,
                    [m.title.as_str(), m.url.as_str(), m.text.as_str()],
                    &m.tags,
                )
            })
            .collect()
    }

    /// Bookmarks carrying a tag (the tags view).
    pub fn bookmarks_tagged(&self, name: &str) -> Vec<&Bookmark> {
        self.bookmarks
            .iter()
            .filter(|b| b.tags.iter().any(|t| names_equal(&t.name, name)))
            .collect()
    }

    /// Marks carrying a tag (the tags view).
    pub fn marks_tagged(&self, name: &str) -> Vec<&Mark> {
        self.marks
            .iter()
            .filter(|m| m.tags.iter().any(|t| names_equal(&t.name, name)))
            .collect()
    }
}

/// Case-insensitive substring match over text fields and tag names.
/// An empty needle matches everything.
fn matches_search<'a>(
    needle: &str,
    fields: impl IntoIterator<Item = &'a str>,
    tags: &[Tag],
) -> bool {
    if needle.is_empty() {
        return true;
    }
    fields
        .into_iter()
        .any(|field| field.to_lowercase().contains(needle))
        || tags.iter().any(|t| t.name.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;
    use crate::reducer::reduce;
    use marker_domain::PageContext;

    fn state() -> State {
        let rust = Bookmark::new_for_page(&PageContext::new("https://rust-lang.org", "Rust"), true)
            .with_tags(vec![Tag::new("lang")]);
        let news = Bookmark::new_for_page(&PageContext::new("https://news.example", "News"), false)
            .with_tags(vec![Tag::new("daily")]);
        let quote = Mark::new_for_page(&PageContext::new("https://rust-lang.org", "Rust"), "fearless")
            .with_tags(vec![Tag::new("Lang")]);
        let state = reduce(&State::default(), Action::InitBookmarks(vec![rust, news]));
        let state = reduce(&state, Action::InitMarks(vec![quote]));
        reduce(&state, Action::InitTags(vec![Tag::new("lang"), Tag::new("daily")]))
    }

    #[test]
    fn lookup_by_url() {
        let state = state();
        assert_eq!(state.bookmarks_for_url("https://rust-lang.org").count(), 1);
        assert_eq!(state.marks_for_url("https://rust-lang.org").count(), 1);
        assert_eq!(state.marks_for_url("https://news.example").count(), 0);
    }

    #[test]
    fn empty_search_shows_everything() {
        let state = state();
        assert_eq!(state.visible_bookmarks().len(), 2);
        assert_eq!(state.visible_marks().len(), 1);
    }

    #[test]
    fn search_matches_title_url_and_tags() {
        let state = reduce(&state(), Action::SearchValueChanged("DAILY".into()));
        let titles: Vec<&str> = state.visible_bookmarks().iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["News"]);

        let state = reduce(&state, Action::SearchValueChanged("fearless".into()));
        assert!(state.visible_bookmarks().is_empty());
        assert_eq!(state.visible_marks().len(), 1);
    }

    #[test]
    fn tagged_ignores_case() {
        let state = state();
        assert_eq!(state.bookmarks_tagged("LANG").len(), 1);
        assert_eq!(state.marks_tagged("lang").len(), 1);
    }

    #[test]
    fn dictionary_from_tags() {
        let state = state();
        assert_eq!(state.tag_dictionary().names(), &["daily", "lang"]);
        assert_eq!(state.tag_named("Daily").map(|t| t.name.as_str()), Some("daily"));
    }
}
