//! Chip-style tag entry.
//!
//! A text field followed by the committed tags ("chips"). Deleting the last
//! chip and submitting the form both need a confirming second keystroke:
//!
//! ```text
//!            Backspace (empty field)            Backspace
//!   Idle ───────────────────────────▶ PendingDelete ─────────▶ Idle (last chip removed)
//!    │  Enter (empty field)                          Enter
//!    └────────────────────────────▶ PendingSubmit ─────────▶ Idle (SubmitTriggered)
//! ```
//!
//! Typing any character returns to `Idle`. Enter with text commits a chip at once.

use serde::Serialize;

use crate::dictionary::TagDictionary;
use crate::name::{contains_name, dedupe_names, normalize_tag_name};

/// Keys the chip field reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChipKey {
    Char(char),
    Backspace,
    Enter,
}

/// Confirmation state of the chip field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputState {
    #[default]
    Idle,
    /// One Backspace seen on an empty field; the next removes the last chip.
    PendingDelete,
    /// One Enter seen on an empty field; the next submits.
    PendingSubmit,
}

/// Payload of the `tagsChanged` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagsChanged {
    /// Current chips, de-duplicated.
    pub chips: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_chip: Option<String>,
}

/// Events emitted by the chip field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChipEvent {
    TagsChanged(TagsChanged),
    SubmitTriggered { chips: Vec<String> },
}

/// State of one chip-list input.
#[derive(Debug, Clone, Default)]
pub struct ChipInput {
    chips: Vec<String>,
    input: String,
    state: InputState,
    /// Highlighted autocomplete entry, used instead of the typed text on Enter.
    autocomplete: Option<String>,
}

impl ChipInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with existing chips (e.g. the tags of the mark being edited).
    pub fn with_chips<I, S>(chips: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            chips: dedupe_names(chips),
            ..Self::default()
        }
    }

    pub fn chips(&self) -> &[String] {
        &self.chips
    }

    /// Text currently typed in the field.
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn state(&self) -> InputState {
        self.state
    }

    /// The chip that a confirming Backspace would remove.
    pub fn chip_marked_for_delete(&self) -> Option<&str> {
        match self.state {
            InputState::PendingDelete => self.chips.last().map(|c| c.as_str()),
            _ => None,
        }
    }

    /// Feed one keystroke.
    pub fn handle_key(&mut self, key: ChipKey) -> Option<ChipEvent> {
        match key {
            ChipKey::Char(c) => {
                self.input.push(c);
                self.autocomplete = None;
                self.state = InputState::Idle;
                None
            }
            ChipKey::Backspace => self.backspace(),
            ChipKey::Enter => self.enter(),
        }
    }

    fn backspace(&mut self) -> Option<ChipEvent> {
        if !self.input.is_empty() {
            self.input.pop();
            self.autocomplete = None;
            self.state = InputState::Idle;
            return None;
        }
        if self.chips.is_empty() {
            self.state = InputState::Idle;
            return None;
        }
        match self.state {
            InputState::PendingDelete => {
                self.state = InputState::Idle;
                let deleted = self.chips.pop();
                Some(self.changed(deleted))
            }
            InputState::Idle | InputState::PendingSubmit => {
                self.state = InputState::PendingDelete;
                None
            }
        }
    }

    fn enter(&mut self) -> Option<ChipEvent> {
        if self.input.trim().is_empty() {
            self.input.clear();
            return match self.state {
                InputState::PendingSubmit => {
                    self.state = InputState::Idle;
                    Some(ChipEvent::SubmitTriggered {
                        chips: self.chips.clone(),
                    })
                }
                InputState::Idle | InputState::PendingDelete => {
                    self.state = InputState::PendingSubmit;
                    None
                }
            };
        }

        let value = self
            .autocomplete
            .take()
            .unwrap_or_else(|| std::mem::take(&mut self.input));
        self.input.clear();
        self.state = InputState::Idle;
        self.commit(&value)
    }

    /// Highlight an autocomplete entry (keyboard navigation in the dropdown).
    pub fn set_autocomplete_candidate(&mut self, candidate: Option<String>) {
        self.autocomplete = candidate;
    }

    /// Commit an autocomplete entry picked with the mouse, bypassing the field.
    pub fn select_autocomplete(&mut self, value: &str) -> Option<ChipEvent> {
        self.input.clear();
        self.autocomplete = None;
        self.state = InputState::Idle;
        self.commit(value)
    }

    /// Remove a chip by name (the chip's own delete button).
    pub fn remove_chip(&mut self, chip: &str) -> Option<ChipEvent> {
        let before = self.chips.len();
        self.chips.retain(|c| c != chip);
        if self.chips.len() == before {
            return None;
        }
        self.state = InputState::Idle;
        Some(self.changed(Some(chip.to_string())))
    }

    /// Re-seed the chips from authoritative state without emitting events.
    pub fn replace_chips<I, S>(&mut self, chips: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.chips = dedupe_names(chips);
        self.state = InputState::Idle;
    }

    /// Autocomplete entries for the current field text.
    pub fn suggestions<'a>(&self, dictionary: &'a TagDictionary, limit: usize) -> Vec<&'a str> {
        dictionary
            .complete(&self.input, limit)
            .into_iter()
            .filter(|name| !contains_name(&self.chips, name))
            .collect()
    }

    fn commit(&mut self, value: &str) -> Option<ChipEvent> {
        let name = normalize_tag_name(value)?;
        if contains_name(&self.chips, &name) {
            return None;
        }
        self.chips.push(name);
        Some(self.changed(None))
    }

    fn changed(&self, deleted_chip: Option<String>) -> ChipEvent {
        ChipEvent::TagsChanged(TagsChanged {
            chips: self.chips.clone(),
            deleted_chip,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_text(input: &mut ChipInput, text: &str) {
        for c in text.chars() {
            assert_eq!(input.handle_key(ChipKey::Char(c)), None);
        }
    }

    #[test]
    fn enter_commits_trimmed_chip() {
        let mut input = ChipInput::new();
        type_text(&mut input, " rust ");
        let event = input.handle_key(ChipKey::Enter);
        assert_eq!(
            event,
            Some(ChipEvent::TagsChanged(TagsChanged {
                chips: vec!["rust".to_string()],
                deleted_chip: None,
            }))
        );
        assert_eq!(input.input(), "");
        assert_eq!(input.state(), InputState::Idle);
    }

    #[test]
    fn duplicate_chip_is_ignored_case_insensitively() {
        let mut input = ChipInput::with_chips(["Rust"]);
        type_text(&mut input, "rUST");
        assert_eq!(input.handle_key(ChipKey::Enter), None);
        assert_eq!(input.chips(), &["Rust"]);
        assert_eq!(input.input(), "");
    }

    #[test]
    fn empty_input_submits_nothing() {
        let mut input = ChipInput::with_chips(["a"]);
        assert_eq!(input.handle_key(ChipKey::Enter), None);
        assert_eq!(input.state(), InputState::PendingSubmit);
        assert_eq!(input.chips(), &["a"]);
    }

    #[test]
    fn two_backspaces_remove_last_chip() {
        let mut input = ChipInput::with_chips(["x", "y"]);
        assert_eq!(input.handle_key(ChipKey::Backspace), None);
        assert_eq!(input.state(), InputState::PendingDelete);
        assert_eq!(input.chip_marked_for_delete(), Some("y"));

        let event = input.handle_key(ChipKey::Backspace);
        assert_eq!(
            event,
            Some(ChipEvent::TagsChanged(TagsChanged {
                chips: vec!["x".to_string()],
                deleted_chip: Some("y".to_string()),
            }))
        );
        assert_eq!(input.chips(), &["x"]);
        assert_eq!(input.state(), InputState::Idle);
    }

    #[test]
    fn typing_cancels_pending_delete() {
        let mut input = ChipInput::with_chips(["x", "y"]);
        input.handle_key(ChipKey::Backspace);
        input.handle_key(ChipKey::Char('z'));
        assert_eq!(input.state(), InputState::Idle);
        // removes the typed char, then needs two more presses again
        assert_eq!(input.handle_key(ChipKey::Backspace), None);
        assert_eq!(input.handle_key(ChipKey::Backspace), None);
        assert_eq!(input.chips(), &["x", "y"]);
        assert!(input.handle_key(ChipKey::Backspace).is_some());
        assert_eq!(input.chips(), &["x"]);
    }

    #[test]
    fn backspace_without_chips_stays_idle() {
        let mut input = ChipInput::new();
        assert_eq!(input.handle_key(ChipKey::Backspace), None);
        assert_eq!(input.state(), InputState::Idle);
    }

    #[test]
    fn double_enter_submits() {
        let mut input = ChipInput::with_chips(["a", "b"]);
        assert_eq!(input.handle_key(ChipKey::Enter), None);
        assert_eq!(
            input.handle_key(ChipKey::Enter),
            Some(ChipEvent::SubmitTriggered {
                chips: vec!["a".to_string(), "b".to_string()],
            })
        );
        assert_eq!(input.state(), InputState::Idle);
    }

    #[test]
    fn autocomplete_candidate_wins_on_enter() {
        let mut input = ChipInput::new();
        type_text(&mut input, "re");
        input.set_autocomplete_candidate(Some("recipes".to_string()));
        input.handle_key(ChipKey::Enter);
        assert_eq!(input.chips(), &["recipes"]);
    }

    #[test]
    fn autocomplete_click_commits_directly() {
        let mut input = ChipInput::with_chips(["a"]);
        type_text(&mut input, "rea");
        let event = input.select_autocomplete("Reading");
        assert!(matches!(event, Some(ChipEvent::TagsChanged(_))));
        assert_eq!(input.chips(), &["a", "Reading"]);
        assert_eq!(input.input(), "");
    }

    #[test]
    fn remove_chip_reports_deleted() {
        let mut input = ChipInput::with_chips(["a", "b", "c"]);
        let event = input.remove_chip("b");
        assert_eq!(
            event,
            Some(ChipEvent::TagsChanged(TagsChanged {
                chips: vec!["a".to_string(), "c".to_string()],
                deleted_chip: Some("b".to_string()),
            }))
        );
        assert_eq!(input.remove_chip("missing"), None);
    }

    #[test]
    fn suggestions_skip_existing_chips() {
        let dictionary = TagDictionary::from_names(["rust", "recipes", "reading"]);
        let mut input = ChipInput::with_chips(["Rust"]);
        type_text(&mut input, "r");
        assert_eq!(input.suggestions(&dictionary, 10), vec!["reading", "recipes"]);
    }

    #[test]
    fn tags_changed_payload_shape() {
        let payload = TagsChanged {
            chips: vec!["a".to_string()],
            deleted_chip: None,
        };
        let json = serde_json::to_string(&payload).unwrap();
        assert_eq!(json, r#"{"chips":["a"]}"#);

        let payload = TagsChanged {
            chips: vec![],
            deleted_chip: Some("a".to_string()),
        };
        let json = serde_json::to_string(&payload).unwrap();
        assert_eq!(json, r#"{"chips":[],"deletedChip":"a"}"#);
    }
}
