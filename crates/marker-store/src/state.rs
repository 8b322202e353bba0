use marker_domain::{Bookmark, Mark, Tab, Tag};
use serde::{Deserialize, Serialize};

use crate::action::ActionKind;

/// One immutable snapshot of everything the surfaces render.
///
/// Snapshots are replaced wholesale by [`crate::Store::dispatch`]; nothing
/// outside the reducer edits one in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct State {
    pub marks: Vec<Mark>,
    pub bookmarks: Vec<Bookmark>,
    /// Tag dictionary; no two entries share a case-insensitive name.
    pub tags: Vec<Tag>,
    pub active_view: Tab,
    pub search_value: String,
    /// Kind of the action that produced this snapshot (`None` only before the first dispatch).
    pub last_action: Option<ActionKind>,
    pub signed_in: bool,
}
