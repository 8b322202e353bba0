//! Named helpers that build an action and dispatch it.

use std::sync::Arc;

use marker_domain::{Bookmark, Mark, Tab, Tag};

use crate::action::Action;
use crate::state::State;
use crate::store::Store;

/// One method per action type. Each returns the snapshot installed by the dispatch.
pub trait ActionCreators {
    fn dispatch_action(&self, action: Action) -> Arc<State>;

    fn init_marks(&self, marks: Vec<Mark>) -> Arc<State> {
        self.dispatch_action(Action::InitMarks(marks))
    }

    fn add_mark(&self, mark: Mark) -> Arc<State> {
        self.dispatch_action(Action::AddMark(mark))
    }

    fn update_mark(&self, mark: Mark) -> Arc<State> {
        self.dispatch_action(Action::UpdateMark(mark))
    }

    fn remove_mark(&self, id: impl Into<String>) -> Arc<State> {
        self.dispatch_action(Action::RemoveMark(id.into()))
    }

    fn init_bookmarks(&self, bookmarks: Vec<Bookmark>) -> Arc<State> {
        self.dispatch_action(Action::InitBookmarks(bookmarks))
    }

    fn add_bookmark(&self, bookmark: Bookmark) -> Arc<State> {
        self.dispatch_action(Action::AddBookmark(bookmark))
    }

    fn update_bookmark(&self, bookmark: Bookmark) -> Arc<State> {
        self.dispatch_action(Action::UpdateBookmark(bookmark))
    }

    fn remove_bookmark(&self, id: impl Into<String>) -> Arc<State> {
        self.dispatch_action(Action::RemoveBookmark(id.into()))
    }

    fn init_tags(&self, tags: Vec<Tag>) -> Arc<State> {
        self.dispatch_action(Action::InitTags(tags))
    }

    fn add_tag(&self, tag: Tag) -> Arc<State> {
        self.dispatch_action(Action::AddTag(tag))
    }

    fn update_tag(&self, tag: Tag) -> Arc<State> {
        self.dispatch_action(Action::UpdateTag(tag))
    }

    fn remove_tag(&self, id: impl Into<String>) -> Arc<State> {
        self.dispatch_action(Action::RemoveTag(id.into()))
    }

    fn navigate_to_tab(&self, view: Tab, search: Option<String>) -> Arc<State> {
        self.dispatch_action(Action::NavigateToTab { view, search })
    }

    fn search_value_changed(&self, value: impl Into<String>) -> Arc<State> {
        self.dispatch_action(Action::SearchValueChanged(value.into()))
    }

    fn signed_in(&self) -> Arc<State> {
        self.dispatch_action(Action::SignedIn)
    }

    fn signed_out(&self) -> Arc<State> {
        self.dispatch_action(Action::SignedOut)
    }
}

impl ActionCreators for Store {
    fn dispatch_action(&self, action: Action) -> Arc<State> {
        self.dispatch(action)
    }
}
