//! marker-tags: tag naming rules, autocomplete, and chip-style tag entry.
//!
//! Tag names are free text. Two names that differ only by case are the same
//! tag; ordering for display ignores case and accents.

pub mod chip;
pub mod dictionary;
pub mod name;

pub use chip::*;
pub use dictionary::*;
pub use name::*;
