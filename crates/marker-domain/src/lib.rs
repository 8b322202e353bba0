//! Page-annotation domain types shared by the web-marker surfaces
//!
//! This crate provides the plain value types the rest of the workspace passes around:
//! - Tag: a named label with a stable id
//! - Bookmark: a saved (optionally starred) page
//! - Mark: a highlighted text passage on a page
//! - PageContext: the page a surface is currently looking at
//! - Credentials: sign-in form input and its validation
//! - Tab: the named views of the popup

pub mod bookmark;
pub mod mark;
pub mod page;
pub mod tag;
pub mod user;
pub mod validation;
pub mod view;

pub use bookmark::*;
pub use mark::*;
pub use page::*;
pub use tag::*;
pub use user::*;
pub use validation::*;
pub use view::*;

/// Milliseconds since the Unix epoch, the timestamp unit of the persistence backend.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
