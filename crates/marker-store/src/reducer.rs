//! The pure transition function.

use marker_domain::{Bookmark, Mark, Tag};
use marker_tags::{dedupe_tags, names_equal, normalize_tag_name};

use crate::action::Action;
use crate::state::State;

/// Compute the snapshot that follows `state` under `action`.
///
/// Total and side-effect free. Actions that cannot apply (an update for an
/// unknown id, a duplicate tag name) leave the collections untouched; every
/// call still records `last_action`.
pub fn reduce(state: &State, action: Action) -> State {
    let mut next = state.clone();
    next.last_action = Some(action.kind());

    match action {
        Action::InitMarks(marks) => {
            next.marks = marks.into_iter().map(normalize_mark).collect();
        }
        Action::AddMark(mark) => upsert(&mut next.marks, normalize_mark(mark), |m| &m.id),
        Action::UpdateMark(mark) => replace(&mut next.marks, normalize_mark(mark), |m| &m.id),
        Action::RemoveMark(id) => next.marks.retain(|m| m.id != id),

        Action::InitBookmarks(bookmarks) => {
            next.bookmarks = bookmarks.into_iter().map(normalize_bookmark).collect();
        }
        Action::AddBookmark(bookmark) => {
            upsert(&mut next.bookmarks, normalize_bookmark(bookmark), |b| &b.id)
        }
        Action::UpdateBookmark(bookmark) => {
            replace(&mut next.bookmarks, normalize_bookmark(bookmark), |b| &b.id)
        }
        Action::RemoveBookmark(id) => next.bookmarks.retain(|b| b.id != id),

        Action::InitTags(tags) => {
            next.tags = dedupe_tags(tags.into_iter().filter_map(normalize_tag).collect());
        }
        Action::AddTag(tag) => {
            if let Some(tag) = normalize_tag(tag) {
                let taken = next
                    .tags
                    .iter()
                    .any(|t| t.id == tag.id || names_equal(&t.name, &tag.name));
                if !taken {
                    next.tags.push(tag);
                }
            }
        }
        Action::UpdateTag(tag) => {
            if let Some(tag) = normalize_tag(tag) {
                let collides = next
                    .tags
                    .iter()
                    .any(|t| t.id != tag.id && names_equal(&t.name, &tag.name));
                if !collides {
                    replace(&mut next.tags, tag, |t| &t.id);
                }
            }
        }
        Action::RemoveTag(id) => next.tags.retain(|t| t.id != id),

        Action::NavigateToTab { view, search } => {
            next.active_view = view;
            next.search_value = search.unwrap_or_default();
        }
        Action::SearchValueChanged(value) => next.search_value = value.to_lowercase(),

        Action::SignedIn => next.signed_in = true,
        Action::SignedOut => {
            next.signed_in = false;
            next.marks.clear();
            next.bookmarks.clear();
            next.tags.clear();
        }
    }

    next
}

fn normalize_tag(tag: Tag) -> Option<Tag> {
    let name = normalize_tag_name(&tag.name)?;
    Some(Tag { name, ..tag })
}

fn normalize_tags(tags: Vec<Tag>) -> Vec<Tag> {
    dedupe_tags(tags.into_iter().filter_map(normalize_tag).collect())
}

fn normalize_mark(mark: Mark) -> Mark {
    Mark {
        tags: normalize_tags(mark.tags),
        ..mark
    }
}

fn normalize_bookmark(bookmark: Bookmark) -> Bookmark {
    Bookmark {
        tags: normalize_tags(bookmark.tags),
        ..bookmark
    }
}

/// Insert, or replace the entity carrying the same id.
fn upsert<T>(items: &mut Vec<T>, item: T, id: impl Fn(&T) -> &String) {
    match items.iter().position(|existing| id(existing) == id(&item)) {
        Some(index) => items[index] = item,
        None => items.push(item),
    }
}

/// Replace the entity carrying the same id; unknown ids are ignored.
fn replace<T>(items: &mut [T], item: T, id: impl Fn(&T) -> &String) {
    if let Some(index) = items.iter().position(|existing| id(existing) == id(&item)) {
        items[index] = item;
    }
}
