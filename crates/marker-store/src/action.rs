//! The closed set of state transitions.

use marker_domain::{Bookmark, Mark, Tab, Tag};
use serde::{Deserialize, Serialize};

/// A requested state transition.
///
/// On the wire an action is `{"type": "UPDATE_MARK", "payload": {...}}`;
/// payload-less actions omit `payload`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    InitMarks(Vec<Mark>),
    AddMark(Mark),
    UpdateMark(Mark),
    /// Mark id
    RemoveMark(String),

    InitBookmarks(Vec<Bookmark>),
    AddBookmark(Bookmark),
    UpdateBookmark(Bookmark),
    /// Bookmark id
    RemoveBookmark(String),

    InitTags(Vec<Tag>),
    AddTag(Tag),
    UpdateTag(Tag),
    /// Tag id
    RemoveTag(String),

    NavigateToTab {
        view: Tab,
        #[serde(default)]
        search: Option<String>,
    },
    SearchValueChanged(String),

    SignedIn,
    SignedOut,
}

/// Payload-free name of an [`Action`], recorded as `lastAction`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionKind {
    InitMarks,
    AddMark,
    UpdateMark,
    RemoveMark,
    InitBookmarks,
    AddBookmark,
    UpdateBookmark,
    RemoveBookmark,
    InitTags,
    AddTag,
    UpdateTag,
    RemoveTag,
    NavigateToTab,
    SearchValueChanged,
    SignedIn,
    SignedOut,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::InitMarks => "INIT_MARKS",
            ActionKind::AddMark => "ADD_MARK",
            ActionKind::UpdateMark => "UPDATE_MARK",
            ActionKind::RemoveMark => "REMOVE_MARK",
            ActionKind::InitBookmarks => "INIT_BOOKMARKS",
            ActionKind::AddBookmark => "ADD_BOOKMARK",
            ActionKind::UpdateBookmark => "UPDATE_BOOKMARK",
            ActionKind::RemoveBookmark => "REMOVE_BOOKMARK",
            ActionKind::InitTags => "INIT_TAGS",
            ActionKind::AddTag => "ADD_TAG",
            ActionKind::UpdateTag => "UPDATE_TAG",
            ActionKind::RemoveTag => "REMOVE_TAG",
            ActionKind::NavigateToTab => "NAVIGATE_TO_TAB",
            ActionKind::SearchValueChanged => "SEARCH_VALUE_CHANGED",
            ActionKind::SignedIn => "SIGNED_IN",
            ActionKind::SignedOut => "SIGNED_OUT",
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors decoding an untrusted action descriptor.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("Malformed action descriptor: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::InitMarks(_) => ActionKind::InitMarks,
            Action::AddMark(_) => ActionKind::AddMark,
            Action::UpdateMark(_) => ActionKind::UpdateMark,
            Action::RemoveMark(_) => ActionKind::RemoveMark,
            Action::InitBookmarks(_) => ActionKind::InitBookmarks,
            Action::AddBookmark(_) => ActionKind::AddBookmark,
            Action::UpdateBookmark(_) => ActionKind::UpdateBookmark,
            Action::RemoveBookmark(_) => ActionKind::RemoveBookmark,
            Action::InitTags(_) => ActionKind::InitTags,
            Action::AddTag(_) => ActionKind::AddTag,
            Action::UpdateTag(_) => ActionKind::UpdateTag,
            Action::RemoveTag(_) => ActionKind::RemoveTag,
            Action::NavigateToTab { .. } => ActionKind::NavigateToTab,
            Action::SearchValueChanged(_) => ActionKind::SearchValueChanged,
            Action::SignedIn => ActionKind::SignedIn,
            Action::SignedOut => ActionKind::SignedOut,
        }
    }

    /// Decode a `{"type", "payload"}` descriptor, rejecting unknown types and
    /// ill-typed payloads before anything reaches the reducer.
    pub fn decode(descriptor: &str) -> Result<Self, DecodeError> {
        Ok(serde_json::from_str(descriptor)?)
    }

    /// Decode from an already-parsed JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, DecodeError> {
        Ok(serde_json::from_value(value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_wire_type() {
        let actions = vec![
            Action::RemoveMark("m1".into()),
            Action::SearchValueChanged("rust".into()),
            Action::NavigateToTab {
                view: Tab::TagsView,
                search: Some("rust".into()),
            },
            Action::SignedOut,
        ];
        for action in &actions {
            let json = serde_json::to_value(action).unwrap();
            assert_eq!(json["type"], serde_json::json!(action.kind().as_str()));
        }
    }

    #[test]
    fn decode_known_descriptor() {
        let action = Action::decode(r#"{"type":"ADD_TAG","payload":{"id":"t1","name":"rust"}}"#)
            .unwrap();
        assert_eq!(action, Action::AddTag(Tag::with_id("t1", "rust")));
    }

    #[test]
    fn decode_payload_free_descriptor() {
        assert_eq!(Action::decode(r#"{"type":"SIGNED_IN"}"#).unwrap(), Action::SignedIn);
        let nav = Action::decode(r#"{"type":"NAVIGATE_TO_TAB","payload":{"view":"mark-view"}}"#)
            .unwrap();
        assert_eq!(
            nav,
            Action::NavigateToTab {
                view: Tab::MarkView,
                search: None
            }
        );
    }

    #[test]
    fn decode_rejects_unknown_type() {
        let err = Action::decode(r#"{"type":"SHUFFLE_TAGS","payload":[]}"#).unwrap_err();
        assert!(err.to_string().contains("Malformed"));
    }

    #[test]
    fn decode_rejects_ill_typed_payload() {
        assert!(Action::decode(r#"{"type":"REMOVE_MARK","payload":42}"#).is_err());
    }

    #[test]
    fn kind_display() {
        assert_eq!(ActionKind::UpdateMark.to_string(), "UPDATE_MARK");
        assert_eq!(
            serde_json::to_string(&ActionKind::SearchValueChanged).unwrap(),
            "\"SEARCH_VALUE_CHANGED\""
        );
    }
}
