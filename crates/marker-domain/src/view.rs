//! Named views of the popup

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A view the popup can navigate to
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tab {
    /// Bookmarks grouped per page
    #[default]
    AccordionView,
    /// Everything grouped by tag
    TagsView,
    /// Marks on the current page
    MarkView,
}

impl Tab {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tab::AccordionView => "accordion-view",
            Tab::TagsView => "tags-view",
            Tab::MarkView => "mark-view",
        }
    }
}

impl std::fmt::Display for Tab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown view: {0}")]
pub struct UnknownTab(pub String);

impl FromStr for Tab {
    type Err = UnknownTab;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "accordion-view" => Ok(Tab::AccordionView),
            "tags-view" => Ok(Tab::TagsView),
            "mark-view" => Ok(Tab::MarkView),
            other => Err(UnknownTab(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_view() {
        assert_eq!(Tab::default(), Tab::AccordionView);
    }

    #[test]
    fn display_matches_serde() {
        for tab in [Tab::AccordionView, Tab::TagsView, Tab::MarkView] {
            let json = serde_json::to_string(&tab).unwrap();
            assert_eq!(json, format!("\"{}\"", tab));
            assert_eq!(tab.as_str().parse::<Tab>().unwrap(), tab);
        }
    }

    #[test]
    fn unknown_view() {
        let err = "settings-view".parse::<Tab>().unwrap_err();
        assert!(err.to_string().contains("settings-view"));
    }
}
