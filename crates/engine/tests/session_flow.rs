use std::sync::Arc;

use sequencer_engine::{
    EditCommand, EditSession, InMemoryCollectionSource, JsonFileCollectionSource, LabelingService, RemoteCollectionSource,
    SessionAction, SessionDriver, SessionEvent, SessionPhase, ShortUniqueLabeler,
};
use sequencer_types::{DraftField, InputEntry, InputField, SequenceRecord};

fn record(id: &str, inputs: &[&str]) -> SequenceRecord {
    SequenceRecord {
        id: id.into(),
        enabled: true,
        output_key: format!("/seq/{id}"),
        output_width: 256,
        output_height: 256,
        inputs: inputs.iter().map(|key| InputEntry::with_defaults(*key)).collect(),
    }
}

fn action(action: SessionAction) -> SessionEvent {
    SessionEvent::Action(action)
}

fn set_input(field: InputField, value: &str) -> SessionEvent {
    action(SessionAction::Edit {
        command: EditCommand::SetInputField {
            field,
            value: value.into(),
        },
    })
}

/// Labels keys by their position, to observe what the session asks for.
struct IndexLabeler;

impl LabelingService for IndexLabeler {
    fn shorten_unique(&self, keys: &[String]) -> Vec<String> {
        (0..keys.len()).map(|index| format!("#{index}")).collect()
    }
}

#[tokio::test]
async fn edit_apply_round_trip_through_a_collection_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sequences.json");
    std::fs::write(
        &path,
        serde_json::to_string_pretty(&vec![record("front", &["/cam/left/raw", "/cam/right/raw"])]).unwrap(),
    )
    .unwrap();

    let source = Arc::new(JsonFileCollectionSource::open(&path).await.unwrap());
    let mut session = EditSession::new(Arc::new(ShortUniqueLabeler));
    session.set_source_keys(vec!["/cam/left/raw".into(), "/cam/rear/raw".into(), "/seq/front".into()]);
    let (mut driver, state_rx) = SessionDriver::new(session, source.clone());
    driver.sync().await.unwrap();

    driver.handle(action(SessionAction::Select { id: "front".into() })).await.unwrap();
    assert_eq!(state_rx.borrow().input_labels, vec!["...", "left/raw", "right/raw"]);

    driver.handle(action(SessionAction::SelectInput { row: 2 })).await.unwrap();
    driver
        .handle(action(SessionAction::AddInput { key: "/cam/rear/raw".into() }))
        .await
        .unwrap();
    driver.handle(set_input(InputField::MinDurationSeconds, "6.0")).await.unwrap();

    {
        let state = state_rx.borrow();
        assert_eq!(state.phase(), SessionPhase::Editing);
        assert_eq!(state.selected_input_index, Some(2));
        assert_eq!(state.input_labels.len(), 4);
        let rear = &state.draft.as_ref().unwrap().inputs[2];
        assert_eq!(rear.max_duration_seconds.as_str(), "7.0");
        assert!(state.is_field_dirty(DraftField::Inputs));
    }

    driver.handle(action(SessionAction::Apply)).await.unwrap();

    let state = state_rx.borrow().clone();
    assert_eq!(state.phase(), SessionPhase::Viewing);
    assert_eq!(state.selected_input_index, None);
    assert_eq!(state.preview_target().title, "front(output): /seq/front");

    let saved: Vec<SequenceRecord> = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let rear = &saved[0].inputs[2];
    assert_eq!(rear.source_key, "/cam/rear/raw");
    assert_eq!(rear.min_duration_seconds, 6.0);
    assert_eq!(rear.max_duration_seconds, 7.0);
}

#[tokio::test]
async fn pending_edits_survive_concurrent_remote_changes() {
    let source = Arc::new(InMemoryCollectionSource::new([record("s1", &["A", "B"])]));
    let (mut driver, _state_rx) = SessionDriver::new(EditSession::new(Arc::new(ShortUniqueLabeler)), source.clone());
    driver.sync().await.unwrap();
    driver.handle(action(SessionAction::Select { id: "s1".into() })).await.unwrap();
    driver
        .handle(action(SessionAction::Edit {
            command: EditCommand::SetOutputKey { value: "/seq/renamed".into() },
        }))
        .await
        .unwrap();

    source.replace_all([record("s1", &["A", "B", "C"])]).await;
    driver.handle(SessionEvent::Sync).await.unwrap();
    source.replace_all(Vec::new()).await;
    driver.handle(SessionEvent::Sync).await.unwrap();

    let state = driver.session().state();
    let draft = state.draft.as_ref().unwrap();
    assert_eq!(draft.output_key, "/seq/renamed");
    assert_eq!(draft.inputs.len(), 2);
    assert_eq!(state.phase(), SessionPhase::Editing);

    driver.handle(action(SessionAction::Apply)).await.unwrap();
    let stored = source.collection().await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].output_key, "/seq/renamed");
}

#[tokio::test]
async fn clean_draft_tracks_remote_and_keeps_identity_when_unchanged() {
    let source = Arc::new(InMemoryCollectionSource::new([record("s1", &["A", "B"])]));
    let (mut driver, _state_rx) = SessionDriver::new(EditSession::new(Arc::new(IndexLabeler)), source.clone());
    driver.sync().await.unwrap();
    driver.handle(action(SessionAction::Select { id: "s1".into() })).await.unwrap();
    let first = driver.session().state().draft.clone().unwrap();

    driver
        .handle(SessionEvent::RemotePush(vec![record("s1", &["A", "B"])]))
        .await
        .unwrap();
    assert!(Arc::ptr_eq(&first, driver.session().state().draft.as_ref().unwrap()));

    driver
        .handle(SessionEvent::RemotePush(vec![record("s1", &["A", "B", "C"])]))
        .await
        .unwrap();
    let state = driver.session().state();
    assert_eq!(state.draft.as_ref().unwrap().inputs.len(), 3);
    assert_eq!(state.input_labels, vec!["...", "#0", "#1", "#2"]);
}

#[tokio::test]
async fn new_records_are_created_and_deleted_without_touching_others() {
    let source = Arc::new(InMemoryCollectionSource::new([record("a", &[])]));
    let (mut driver, _state_rx) = SessionDriver::new(EditSession::new(Arc::new(ShortUniqueLabeler)), source.clone());
    driver.sync().await.unwrap();

    driver.handle(action(SessionAction::CreateNew)).await.unwrap();
    driver.handle(action(SessionAction::DeleteSelected)).await.unwrap();
    driver.handle(action(SessionAction::CreateNew)).await.unwrap();
    driver
        .handle(action(SessionAction::Edit {
            command: EditCommand::SetId { value: "rear".into() },
        }))
        .await
        .unwrap();
    driver.handle(action(SessionAction::Apply)).await.unwrap();

    let ids: Vec<_> = source.collection().await.unwrap().into_iter().map(|record| record.id).collect();
    assert_eq!(ids, vec!["a", "rear"]);
    assert_eq!(driver.session().sequence_ids(), vec!["a", "rear"]);

    driver.handle(action(SessionAction::DeleteSelected)).await.unwrap();
    driver.handle(SessionEvent::Sync).await.unwrap();
    assert_eq!(driver.session().sequence_ids(), vec!["a"]);
    assert_eq!(driver.session().phase(), SessionPhase::Empty);
}
