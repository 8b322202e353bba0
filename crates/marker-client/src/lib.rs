//! # marker-client
//!
//! Persistence services for web-marker. Every mutating operation runs an
//! optimistic local dispatch, a remote call against a [`Backend`], and a
//! reconciliation that replaces the optimistic state with the server's.
//!
//! Tag edits on a bookmark (or mark) fan out to every mark (or bookmark)
//! sharing its URL; see [`propagation`].

pub mod backend;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod intent;
pub mod memory;
pub mod propagation;
pub mod services;
pub mod session;

pub use backend::Backend;
pub use client::MarkerClient;
pub use config::{ClientConfig, ConfigError};
pub use error::{ClientError, Result};
pub use http::HttpBackend;
pub use intent::*;
pub use memory::MemoryBackend;
pub use propagation::{PropagationFailure, PropagationReport, PropagationSource};
pub use services::{BookmarkService, MarkService, ServiceContext, TagService, UserService};
pub use session::TokenStore;
