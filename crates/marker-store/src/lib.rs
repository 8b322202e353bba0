pub mod action;
pub mod creators;
pub mod listener;
pub mod reducer;
pub mod selectors;
pub mod state;
pub mod store;

pub use action::*;
pub use creators::*;
pub use listener::*;
pub use reducer::*;
pub use state::*;
pub use store::*;
