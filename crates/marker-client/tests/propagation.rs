//! Tag propagation between bookmarks and marks on the same page.

use std::sync::Arc;

use marker_client::{EntityRef, FailurePolicy, IntentStatus, MarkerClient, MemoryBackend};
use marker_domain::{tag_names, Bookmark, Mark, PageContext, Tag};
use marker_store::Store;
use marker_tags::{ChipEvent, ChipInput, ChipKey};

struct Fixture {
    backend: Arc<MemoryBackend>,
    client: MarkerClient,
    bookmark: Bookmark,
    marks: Vec<Mark>,
}

/// One bookmark and two marks on `https://x`, plus one mark elsewhere.
async fn fixture() -> Fixture {
    let here = PageContext::new("https://x", "X");
    let elsewhere = PageContext::new("https://y", "Y");

    let backend = Arc::new(MemoryBackend::new());
    let bookmark = Bookmark::new_for_page(&here, false);
    let marks = vec![
        Mark::new_for_page(&here, "first passage"),
        Mark::new_for_page(&here, "second passage"),
        Mark::new_for_page(&elsewhere, "unrelated"),
    ];
    backend.seed_bookmark(bookmark.clone());
    for mark in &marks {
        backend.seed_mark(mark.clone());
    }

    let client = MarkerClient::new(Store::new(), backend.clone(), FailurePolicy::Keep);
    client.load_all().await.unwrap();
    Fixture {
        backend,
        client,
        bookmark,
        marks,
    }
}

fn tags(names: &[&str]) -> Vec<Tag> {
    names.iter().map(|n| Tag::new(*n)).collect()
}

#[tokio::test]
async fn bookmark_tags_reach_marks_on_the_same_page() {
    let f = fixture().await;

    let edited = f.bookmark.clone().with_tags(tags(&["a", "b"]));
    let outcome = f.client.bookmarks.update_bookmark(edited).await;

    assert!(outcome.is_committed());
    let report = outcome.propagation.expect("tag count changed");
    assert_eq!(report.url, "https://x");
    assert_eq!(report.succeeded.len(), 2);
    assert!(report.is_complete());

    let state = f.client.store().get_state();
    for mark in &f.marks[..2] {
        assert_eq!(tag_names(&state.mark(&mark.id).unwrap().tags), vec!["a", "b"]);
    }
    assert!(state.mark(&f.marks[2].id).unwrap().tags.is_empty());

    // Both aggregates point at the same dictionary entries.
    let bookmark_tags = &state.bookmark(&f.bookmark.id).unwrap().tags;
    assert_eq!(bookmark_tags, &state.mark(&f.marks[0].id).unwrap().tags);
    assert_eq!(state.tags.len(), 2);
}

#[tokio::test]
async fn mark_tags_reach_the_bookmark() {
    let f = fixture().await;

    let edited = f.marks[0].clone().with_tags(tags(&["research"]));
    let outcome = f.client.marks.update_mark(edited).await;

    let report = outcome.propagation.expect("tag count changed");
    assert_eq!(report.succeeded, vec![EntityRef::bookmark(&f.bookmark.id)]);

    let stored = f.backend.bookmarks();
    assert_eq!(tag_names(&stored[0].tags), vec!["research"]);
    // Marks are not targets of a mark edit.
    assert!(f.backend.marks()[1].tags.is_empty());
}

#[tokio::test]
async fn unchanged_tag_count_does_not_propagate() {
    let f = fixture().await;

    let mut edited = f.bookmark.clone();
    edited.title = "New title".into();
    let outcome = f.client.bookmarks.update_bookmark(edited).await;

    assert!(outcome.is_committed());
    assert!(outcome.propagation.is_none());
}

#[tokio::test]
async fn one_failing_target_does_not_block_the_others() {
    let f = fixture().await;
    f.backend.fail_updates_for(f.marks[0].id.clone());

    let edited = f.bookmark.clone().with_tags(tags(&["a", "b"]));
    let outcome = f.client.bookmarks.update_bookmark(edited).await;

    // The source itself committed.
    assert!(outcome.is_committed());

    let report = outcome.propagation.unwrap();
    assert_eq!(report.succeeded, vec![EntityRef::mark(&f.marks[1].id)]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].target, EntityRef::mark(&f.marks[0].id));

    let marks = f.backend.marks();
    assert!(marks[0].tags.is_empty());
    assert_eq!(tag_names(&marks[1].tags), vec!["a", "b"]);

    assert!(matches!(
        f.client.intents().status(&EntityRef::mark(&f.marks[0].id)),
        Some(IntentStatus::Failed(_))
    ));
}

#[tokio::test]
async fn failed_source_update_skips_propagation() {
    let f = fixture().await;
    f.backend.fail_updates_for(f.bookmark.id.clone());

    let edited = f.bookmark.clone().with_tags(tags(&["a"]));
    let outcome = f.client.bookmarks.update_bookmark(edited).await;

    assert!(outcome.status.is_failure());
    assert!(outcome.propagation.is_none());
    assert!(f.backend.marks().iter().all(|m| m.tags.is_empty()));
}

#[tokio::test]
async fn chip_editor_drives_bookmark_tags() {
    let f = fixture().await;
    let mut input = ChipInput::new();

    let mut last = None;
    for key in "rust".chars().map(ChipKey::Char).chain([ChipKey::Enter]) {
        last = input.handle_key(key).or(last);
    }
    let Some(ChipEvent::TagsChanged(event)) = last else {
        panic!("expected a tagsChanged event");
    };

    let outcome = f
        .client
        .bookmarks
        .apply_chips(&f.bookmark.id, &event)
        .await
        .unwrap();
    assert!(outcome.is_committed());
    assert_eq!(outcome.propagation.map(|r| r.succeeded.len()), Some(2));

    // Re-applying the same chips is a no-op.
    let requests = f.backend.request_count();
    let again = f
        .client
        .bookmarks
        .apply_chips(&f.bookmark.id, &event)
        .await
        .unwrap();
    assert!(again.propagation.is_none());
    assert_eq!(f.backend.request_count(), requests);

    // Two backspaces on an empty field delete the chip.
    assert!(input.handle_key(ChipKey::Backspace).is_none());
    let Some(ChipEvent::TagsChanged(event)) = input.handle_key(ChipKey::Backspace) else {
        panic!("expected a tagsChanged event");
    };
    assert_eq!(event.deleted_chip.as_deref(), Some("rust"));

    f.client
        .bookmarks
        .apply_chips(&f.bookmark.id, &event)
        .await
        .unwrap();
    let state = f.client.store().get_state();
    assert!(state.marks_for_url("https://x").all(|m| m.tags.is_empty()));
}
