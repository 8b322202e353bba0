//! The page a surface is attached to

use serde::{Deserialize, Serialize};

/// Location and title of the page currently shown in the browser tab.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageContext {
    pub url: String,
    pub title: String,
}

impl PageContext {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
        }
    }

    /// `scheme://host[:port]` of the page, or an empty string for URLs
    /// without a tuple origin (e.g. `about:blank`, unparsable input).
    pub fn origin(&self) -> String {
        match url::Url::parse(&self.url) {
            Ok(parsed) => {
                let origin = parsed.origin();
                if origin.is_tuple() {
                    origin.ascii_serialization()
                } else {
                    String::new()
                }
            }
            Err(_) => String::new(),
        }
    }

    /// Title to store on a bookmark: the trimmed page title, or the URL when blank.
    pub fn bookmark_title(&self) -> String {
        let title = self.title.trim();
        if title.is_empty() {
            self.url.clone()
        } else {
            title.to_string()
        }
    }
}
