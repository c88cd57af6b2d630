use crate::{
    Binding, BindingCommitter, BindingStore, CommitError, MemoryBindingStore,
    tests::support::FakeStore,
};

use std::sync::Arc;

fn store() -> MemoryBindingStore {
    MemoryBindingStore::new([
        Binding::new("toggle_recording", "Ctrl+Shift+R", "Toggle recording"),
        Binding::new("transcribe", "ctrl+space", "Transcribe"),
    ])
}

/// WHAT: A valid chord is stored in canonical form
/// WHY: Stored chords must compare equal regardless of spelling
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_valid_chord_when_applying_then_canonical_chord_stored() {
    // Given
    let store = store();
    let committer = BindingCommitter::new(Arc::new(store.clone()));

    // When
    committer.apply("toggle_recording", "alt+k").await.unwrap();

    // Then
    assert_eq!(store.chord("toggle_recording").as_deref(), Some("Alt+K"));
}

/// WHAT: A chord held by another shortcut is a conflict
/// WHY: Two shortcuts must never share a chord
#[tokio::test]
async fn given_chord_used_elsewhere_when_applying_then_conflict() {
    // Given: transcribe holds ctrl+space (non-canonical spelling)
    let store = store();
    let committer = BindingCommitter::new(Arc::new(store.clone()));

    // When
    let result = committer.apply("toggle_recording", "Ctrl+Space").await;

    // Then
    assert!(matches!(
        &result,
        Err(CommitError::Conflict { conflicting_id, .. }) if conflicting_id == "transcribe"
    ));
    assert_eq!(
        store.chord("toggle_recording").as_deref(),
        Some("Ctrl+Shift+R")
    );
}

/// WHAT: Re-applying a shortcut's own chord is not a conflict
/// WHY: Restoring the original chord must always be possible
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_own_chord_when_applying_then_succeeds() {
    // Given
    let store = store();
    let committer = BindingCommitter::new(Arc::new(store.clone()));

    // When/Then
    committer
        .apply("toggle_recording", "Ctrl+Shift+R")
        .await
        .unwrap();
}

/// WHAT: Invalid chords and unknown shortcuts never reach the store
/// WHY: Validation happens before persistence
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_invalid_input_when_applying_then_nothing_written() {
    // Given: A store that logs writes
    let store = Arc::new(FakeStore::new(store().bindings().await.unwrap().into_values()));
    let committer = BindingCommitter::new(Arc::clone(&store) as Arc<dyn BindingStore>);

    // When
    let invalid = committer.apply("toggle_recording", "Ctrl+").await;
    let unknown = committer.apply("does_not_exist", "Ctrl+K").await;

    // Then
    assert!(matches!(invalid, Err(CommitError::InvalidChord { .. })));
    assert!(matches!(unknown, Err(CommitError::UnknownShortcut { .. })));
    assert!(store.writes().is_empty());
}

/// WHAT: Backend failures surface as Backend errors
/// WHY: The session decides whether to roll back
#[tokio::test]
async fn given_failing_store_when_applying_then_backend_error() {
    // Given
    let store = Arc::new(FakeStore::new([Binding::new("a", "Ctrl+A", "A")]));
    store.fail_writes_of("Ctrl+B");
    let committer = BindingCommitter::new(store);

    // When
    let result = committer.apply("a", "ctrl+b").await;

    // Then
    assert!(matches!(result, Err(CommitError::Backend { .. })));
}

/// WHAT: Restoring writes a stored chord back even if it duplicates another
/// WHY: Rollback must put back whatever was there, not re-judge it
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_hand_edited_duplicate_when_restoring_then_written_verbatim() {
    // Given: Two shortcuts hand-edited to the same chord
    let store = Arc::new(FakeStore::new([
        Binding::new("a", "ctrl+k", "A"),
        Binding::new("b", "Ctrl+K", "B"),
    ]));
    let committer = BindingCommitter::new(Arc::clone(&store) as Arc<dyn BindingStore>);

    // When
    committer.restore("a", "ctrl+k").await.unwrap();

    // Then: The exact stored text was written, no conflict raised
    assert_eq!(
        store.writes(),
        vec![("a".to_string(), "ctrl+k".to_string())]
    );
}
