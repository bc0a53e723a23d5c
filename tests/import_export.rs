use todo_deck::{
    transfer::{self, TransferError, EXPORT_FILE_NAME},
    Action, App, MemorySlot, Priority, TaskDraft, TaskStore,
};

fn app(export_dir: &std::path::Path) -> App {
    let store = TaskStore::open(Box::new(MemorySlot::new())).unwrap();
    App::new(store, export_dir.to_path_buf(), "2024-06-01".into())
}

fn add(app: &mut App, text: &str, due: &str, priority: Priority) {
    app.form = TaskDraft::new(text, due, priority);
    app.dispatch(Action::Submit);
}

#[test]
fn export_then_import_reproduces_store() {
    let dir = tempfile::tempdir().unwrap();
    let mut source = app(dir.path());
    add(&mut source, "A", "2024-01-01", Priority::High);
    add(&mut source, "B", "", Priority::Low);
    source.dispatch(Action::Toggle(todo_deck::TaskRef(1)));
    source.dispatch(Action::Export);

    let exported = dir.path().join(EXPORT_FILE_NAME);
    assert!(exported.exists());

    let mut target = app(dir.path());
    target.dispatch(Action::Import(exported));
    assert_eq!(target.store().tasks(), source.store().tasks());
    assert_eq!(target.status_line.as_deref(), Some("Imported 2 tasks"));
}

#[test]
fn unrecognized_object_imports_as_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("foo.json");
    std::fs::write(&path, r#"{"foo": 1}"#).unwrap();

    let mut app = app(dir.path());
    add(&mut app, "A", "", Priority::High);
    app.dispatch(Action::Import(path));
    assert!(app.store().is_empty());
    assert!(app.model().is_empty());
}

#[test]
fn wrapped_import_keeps_free_form_fields() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wrapped.json");
    std::fs::write(
        &path,
        r#"{"tasks":[{"id":5,"text":"x","priority":"urgent","status":"blocked"},
                     {"id":5,"text":"y","priority":"low"}]}"#,
    )
    .unwrap();
    let tasks = transfer::import_file(&path).unwrap();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].priority.as_str(), "urgent");
    assert_eq!(tasks[0].status.as_str(), "blocked");
    assert_eq!(tasks[0].id, tasks[1].id);
}

#[test]
fn missing_import_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let err = transfer::import_file(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, TransferError::Read { .. }));
}
