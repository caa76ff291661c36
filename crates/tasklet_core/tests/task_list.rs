use serde_json::{json, Value};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tasklet_core::{
    MemorySettingsStore, SettingsStore, StoreError, StoreResult, TaskFilter, TaskListChange,
    TaskListController, TaskValidationError, TASKS_KEY,
};
use uuid::Uuid;

/// Store whose writes always fail; reads see an empty store.
#[derive(Default)]
struct FailingStore {
    write_attempts: Cell<usize>,
}

impl SettingsStore for FailingStore {
    fn read(&self, _key: &str) -> StoreResult<Option<Value>> {
        Ok(None)
    }

    fn write(&self, _key: &str, _value: &Value) -> StoreResult<()> {
        self.write_attempts.set(self.write_attempts.get() + 1);
        Err(StoreError::MissingSchema)
    }

    fn remove(&self, _key: &str) -> StoreResult<bool> {
        Ok(false)
    }
}

/// Memory store that counts writes.
#[derive(Default)]
struct CountingStore {
    inner: MemorySettingsStore,
    writes: Cell<usize>,
}

impl SettingsStore for CountingStore {
    fn read(&self, key: &str) -> StoreResult<Option<Value>> {
        self.inner.read(key)
    }

    fn write(&self, key: &str, value: &Value) -> StoreResult<()> {
        self.writes.set(self.writes.get() + 1);
        self.inner.write(key, value)
    }

    fn remove(&self, key: &str) -> StoreResult<bool> {
        self.inner.remove(key)
    }
}

fn texts<S: SettingsStore>(controller: &TaskListController<S>) -> Vec<&str> {
    controller
        .tasks()
        .iter()
        .map(|task| task.text.as_str())
        .collect()
}

#[test]
fn add_to_empty_list_creates_open_task() {
    let store = MemorySettingsStore::new();
    let mut controller = TaskListController::open(&store);

    let task = controller.add("Buy milk").unwrap();

    assert_eq!(controller.tasks().len(), 1);
    assert_eq!(controller.tasks()[0], task);
    assert_eq!(task.text, "Buy milk");
    assert!(!task.completed);
    assert!(task.completed_at.is_none());

    let counts = controller.counts();
    assert_eq!((counts.total, counts.completed, counts.remaining), (1, 0, 1));
}

#[test]
fn add_prepends_newest_first() {
    let store = MemorySettingsStore::new();
    let mut controller = TaskListController::new(&store);

    controller.add("A").unwrap();
    controller.add("B").unwrap();
    let c = controller.add("C").unwrap();

    assert_eq!(texts(&controller), vec!["C", "B", "A"]);
    assert_eq!(controller.tasks()[0].id, c.id);
}

#[test]
fn add_rejects_blank_text_without_writing() {
    let store = CountingStore::default();
    let mut controller = TaskListController::new(&store);

    assert_eq!(
        controller.add("   ").unwrap_err(),
        TaskValidationError::EmptyText
    );
    assert!(controller.is_empty());
    assert_eq!(store.writes.get(), 0);
}

#[test]
fn toggle_twice_restores_original_state() {
    let store = MemorySettingsStore::new();
    let mut controller = TaskListController::new(&store);
    let task = controller.add("A").unwrap();

    let done = controller.toggle(task.id).unwrap();
    assert!(done.completed);
    assert!(done.completed_at.is_some());
    let counts = controller.counts();
    assert_eq!((counts.total, counts.completed, counts.remaining), (1, 1, 0));

    let reopened = controller.toggle(task.id).unwrap();
    assert_eq!(reopened, task);
    let counts = controller.counts();
    assert_eq!((counts.total, counts.completed, counts.remaining), (1, 0, 1));
}

#[test]
fn toggle_and_delete_unknown_id_are_silent_noops() {
    let store = CountingStore::default();
    let mut controller = TaskListController::new(&store);
    controller.add("A").unwrap();
    let writes_after_add = store.writes.get();

    assert!(controller.toggle(Uuid::new_v4()).is_none());
    assert!(!controller.delete(Uuid::new_v4()));

    assert_eq!(texts(&controller), vec!["A"]);
    assert_eq!(store.writes.get(), writes_after_add);
}

#[test]
fn delete_is_idempotent() {
    let store = MemorySettingsStore::new();
    let mut controller = TaskListController::new(&store);
    let a = controller.add("A").unwrap();
    controller.add("B").unwrap();

    assert!(controller.delete(a.id));
    let after_first = controller.tasks().to_vec();
    assert!(!controller.delete(a.id));

    assert_eq!(controller.tasks(), after_first.as_slice());
    assert_eq!(texts(&controller), vec!["B"]);
}

#[test]
fn clear_completed_removes_only_completed_and_keeps_order() {
    let store = CountingStore::default();
    let mut controller = TaskListController::new(&store);
    let a = controller.add("A").unwrap();
    controller.add("B").unwrap();
    let c = controller.add("C").unwrap();
    controller.add("D").unwrap();
    controller.toggle(a.id).unwrap();
    controller.toggle(c.id).unwrap();
    let writes_before = store.writes.get();

    assert_eq!(controller.clear_completed(), 2);

    assert_eq!(texts(&controller), vec!["D", "B"]);
    assert!(!controller.has_completed());
    assert_eq!(store.writes.get(), writes_before + 1);
}

#[test]
fn clear_completed_scenario_leaves_only_open_task() {
    let store = MemorySettingsStore::new();
    let mut controller = TaskListController::new(&store);
    let a = controller.add("A").unwrap();
    controller.add("B").unwrap();

    controller.toggle(a.id).unwrap();
    controller.clear_completed();

    assert_eq!(texts(&controller), vec!["B"]);
}

#[test]
fn clear_completed_without_completed_tasks_writes_nothing() {
    let store = CountingStore::default();
    let mut controller = TaskListController::new(&store);
    controller.add("A").unwrap();
    let writes_before = store.writes.get();

    assert_eq!(controller.clear_completed(), 0);
    assert_eq!(store.writes.get(), writes_before);
}

#[test]
fn persisted_snapshot_matches_memory_after_each_mutation() {
    let store = MemorySettingsStore::new();
    let mut controller = TaskListController::new(&store);
    let a = controller.add("A").unwrap();
    controller.add("B").unwrap();
    controller.toggle(a.id).unwrap();

    let stored = store.read(TASKS_KEY).unwrap().unwrap();
    assert_eq!(stored, serde_json::to_value(controller.tasks()).unwrap());
}

#[test]
fn fresh_load_reconstructs_equal_sequence() {
    let store = MemorySettingsStore::new();
    let mut controller = TaskListController::new(&store);
    let a = controller.add("A").unwrap();
    controller.add("B").unwrap();
    controller.toggle(a.id).unwrap();
    assert!(controller.persist());
    let expected = controller.tasks().to_vec();
    drop(controller);

    let reloaded = TaskListController::open(&store);
    assert_eq!(reloaded.tasks(), expected.as_slice());
}

#[test]
fn load_from_empty_store_yields_empty_list() {
    let store = MemorySettingsStore::new();
    let mut controller = TaskListController::new(&store);

    assert_eq!(controller.load(), 0);
    assert!(controller.is_empty());
    assert_eq!(controller.counts().total, 0);
}

#[test]
fn load_skips_malformed_entries_and_non_array_snapshots() {
    let store = MemorySettingsStore::new();
    store
        .write(
            TASKS_KEY,
            &json!([
                {
                    "id": "11111111-2222-4333-8444-555555555555",
                    "text": "valid",
                    "completed": true,
                    "createdAt": "2026-01-01T08:00:00.000Z",
                    "completedAt": "2026-01-01T09:30:00.000Z"
                },
                { "id": 1700000000000.25, "text": "legacy id", "createdAt": "2026-01-01T08:00:00Z" },
                { "id": "22222222-2222-4333-8444-555555555555", "text": "   ", "createdAt": "2026-01-01T08:00:00Z" },
                { "id": "33333333-2222-4333-8444-555555555555", "text": "done without stamp", "completed": true, "createdAt": "2026-01-01T08:00:00Z" },
                "not an object",
                {
                    "id": "44444444-2222-4333-8444-555555555555",
                    "text": "missing completed flag",
                    "createdAt": "2026-01-02T08:00:00Z"
                }
            ]),
        )
        .unwrap();

    let controller = TaskListController::open(&store);
    assert_eq!(texts(&controller), vec!["valid", "missing completed flag"]);
    assert!(controller.tasks()[0].completed);
    assert!(!controller.tasks()[1].completed);

    store.write(TASKS_KEY, &json!({"broken": true})).unwrap();
    let controller = TaskListController::open(&store);
    assert!(controller.is_empty());
}

#[test]
fn store_failures_leave_memory_authoritative() {
    let store = FailingStore::default();
    let mut controller = TaskListController::open(&store);

    let a = controller.add("A").unwrap();
    controller.add("B").unwrap();
    controller.toggle(a.id).unwrap();
    assert_eq!(controller.clear_completed(), 1);

    assert_eq!(texts(&controller), vec!["B"]);
    assert!(!controller.persist());
    assert!(!controller.flush());
    assert_eq!(store.write_attempts.get(), 6);
}

#[test]
fn counts_stay_balanced_through_mixed_operations() {
    let store = MemorySettingsStore::new();
    let mut controller = TaskListController::new(&store);
    let mut ids = Vec::new();
    for index in 0..8 {
        ids.push(controller.add(&format!("task {index}")).unwrap().id);
        let counts = controller.counts();
        assert_eq!(counts.total, counts.completed + counts.remaining);
    }
    for id in ids.iter().step_by(3) {
        controller.toggle(*id);
        let counts = controller.counts();
        assert_eq!(counts.total, counts.completed + counts.remaining);
    }
    controller.delete(ids[1]);
    controller.clear_completed();

    let counts = controller.counts();
    assert_eq!(counts.total, counts.completed + counts.remaining);
    assert_eq!((counts.total, counts.completed), (4, 0));
}

#[test]
fn filtered_views_follow_completion() {
    let store = MemorySettingsStore::new();
    let mut controller = TaskListController::new(&store);
    let a = controller.add("A").unwrap();
    controller.add("B").unwrap();
    controller.toggle(a.id).unwrap();

    let active: Vec<_> = controller
        .filtered(TaskFilter::Active)
        .map(|task| task.text.clone())
        .collect();
    let completed: Vec<_> = controller
        .filtered(TaskFilter::Completed)
        .map(|task| task.text.clone())
        .collect();
    assert_eq!(active, vec!["B"]);
    assert_eq!(completed, vec!["A"]);
    assert_eq!(controller.filtered(TaskFilter::All).count(), 2);
    assert_eq!(controller.get(a.id).map(|task| task.completed), Some(true));
}

#[test]
fn subscribers_receive_changes_with_fresh_counts() {
    let store = MemorySettingsStore::new();
    let mut controller = TaskListController::new(&store);
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    let subscription = controller.subscribe(move |event| sink.borrow_mut().push(event.clone()));

    let a = controller.add("A").unwrap();
    controller.toggle(a.id).unwrap();
    controller.toggle(Uuid::new_v4());
    controller.clear_completed();

    {
        let seen = events.borrow();
        let changes: Vec<_> = seen.iter().map(|event| event.change.clone()).collect();
        assert_eq!(
            changes,
            vec![
                TaskListChange::Added(a.id),
                TaskListChange::Toggled {
                    id: a.id,
                    completed: true
                },
                TaskListChange::ClearedCompleted { removed: 1 },
            ]
        );
        assert!(seen.iter().all(|event| event.persisted));
        assert_eq!(seen[1].counts.completed, 1);
        assert_eq!(seen[2].counts.total, 0);
    }

    assert!(controller.unsubscribe(subscription));
    assert!(!controller.unsubscribe(subscription));
    controller.add("B").unwrap();
    assert_eq!(events.borrow().len(), 3);
}

#[test]
fn subscribers_see_load_without_persist_flag() {
    let store = MemorySettingsStore::new();
    TaskListController::new(&store).add("A").unwrap();

    let mut controller = TaskListController::new(&store);
    let loaded = Rc::new(Cell::new(None));
    let sink = Rc::clone(&loaded);
    controller.subscribe(move |event| {
        if let TaskListChange::Loaded { count } = event.change {
            sink.set(Some((count, event.persisted)));
        }
    });
    controller.load();

    assert_eq!(loaded.get(), Some((1, false)));
}
