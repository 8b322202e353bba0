//! Argument parsing for `marker`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Command-line client for web-marker bookmarks, marks and tags.
#[derive(Parser, Debug)]
#[command(name = "marker", version)]
#[command(about = "Command-line client for web-marker")]
pub struct Args {
    /// Configuration file (defaults to <config_dir>/web-marker/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List bookmarks
    Bookmarks,
    /// List marks
    Marks,
    /// List tag names, sorted
    Tags,
    /// Set the tags of the bookmark for URL, bookmarking the page if needed
    Tag {
        url: String,
        #[arg(required = true)]
        tags: Vec<String>,
    },
    /// Star the page at URL, bookmarking it if needed
    Star {
        url: String,
        /// Page title; several words are joined with spaces
        #[arg(required = true)]
        title: Vec<String>,
    },
}
