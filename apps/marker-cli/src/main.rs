//! marker - command-line client for web-marker
//!
//! Talks to the REST backend named in the configuration file. Set
//! `WEB_MARKER_PASSWORD` to sign in as the configured `email` first.

mod args;

use std::process::ExitCode;

use clap::Parser;
use marker_client::{ClientConfig, MarkerClient, SyncOutcome};
use marker_domain::{Bookmark, Credentials, PageContext};
use marker_store::Store;
use marker_tags::TagsChanged;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use args::{Args, Command};

const PASSWORD_ENV: &str = "WEB_MARKER_PASSWORD";

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> CliResult<()> {
    let config = match &args.config {
        Some(path) => ClientConfig::load(path)?.with_env_overrides(),
        None => ClientConfig::load_standard()?,
    };
    let client = MarkerClient::connect(&config, Store::new())?;

    sign_in(&client, &config).await?;
    client.load_all().await?;

    match args.command {
        Command::Bookmarks => print_json(&client.store().get_state().bookmarks),
        Command::Marks => print_json(&client.store().get_state().marks),
        Command::Tags => print_json(&client.tags.all_tag_names()),
        Command::Tag { url, tags } => {
            let bookmark = bookmark_for(&client, &url, "", false).await?;
            let event = TagsChanged {
                chips: tags,
                deleted_chip: None,
            };
            let outcome = client.bookmarks.apply_chips(&bookmark.id, &event).await?;
            print_json(&outcome)
        }
        Command::Star { url, title } => {
            let bookmark = bookmark_for(&client, &url, &title.join(" "), true).await?;
            let outcome = if bookmark.is_starred {
                SyncOutcome::committed(bookmark)
            } else {
                client.bookmarks.toggle_star(&bookmark.id).await?
            };
            print_json(&outcome)
        }
    }
}

async fn sign_in(client: &MarkerClient, config: &ClientConfig) -> CliResult<()> {
    let Some(email) = &config.email else {
        return Ok(());
    };
    match std::env::var(PASSWORD_ENV) {
        Ok(password) => {
            client
                .users
                .login(&Credentials::new(email.clone(), password))
                .await?
        }
        Err(_) => tracing::debug!(%email, "{PASSWORD_ENV} not set, continuing signed out"),
    }
    Ok(())
}

/// The stored bookmark for `url`, creating one if the page has none.
async fn bookmark_for(
    client: &MarkerClient,
    url: &str,
    title: &str,
    starred: bool,
) -> CliResult<Bookmark> {
    if let Some(existing) = client.store().get_state().bookmarks_for_url(url).next() {
        return Ok(existing.clone());
    }

    let fresh = client
        .bookmarks
        .create_new_bookmark(&PageContext::new(url, title), starred);
    let outcome = client.bookmarks.create_bookmark(fresh).await;
    match outcome.status.reason() {
        Some(reason) => Err(format!("could not bookmark {url}: {reason}").into()),
        None => Ok(outcome.value),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
