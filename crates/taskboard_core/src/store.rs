//! The task store: canonical in-memory task list plus its persistence.
//!
//! # Invariants
//! - The persistence port is read at most once, before the first mutation.
//! - Every mutation rewrites the whole list to the port.
//! - Write failures are logged and remembered; the in-memory state is kept.
//! - Ids are unique and never reused; `created_at` is never modified.

use crate::clock::{Clock, SystemClock};
use crate::error::AppError;
use crate::filter::{TaskFilter, TaskStats};
use crate::model::{Task, TaskInput, TaskPatch};
use crate::seed::seed_tasks;
use crate::storage::PersistencePort;
use crate::storage::codec::{decode_tasks, encode_tasks};
use log::{debug, error, info, warn};
use uuid::Uuid;

pub struct TaskStore<P: PersistencePort> {
    persistence: P,
    clock: Box<dyn Clock>,
    tasks: Vec<Task>,
    loaded: bool,
    last_write_error: Option<AppError>,
}

impl<P: PersistencePort> TaskStore<P> {
    /// Wraps `persistence` without reading it; the first `load` or mutation does.
    fn new(persistence: P) -> Self {
        Self {
            persistence,
            clock: Box::new(SystemClock),
            tasks: Vec::new(),
            loaded: false,
            last_write_error: None,
        }
    }

    /// Wraps `persistence` and loads it, so reads see the stored or seeded list.
    pub fn open(persistence: P) -> Self {
        let mut store = Self::new(persistence);
        store.load();
        store
    }

    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Loads the persisted list on first call, falling back to the seed
    /// tasks when nothing usable is stored. Later calls return the cached list.
    pub fn load(&mut self) -> &[Task] {
        if !self.loaded {
            self.loaded = true;
            match self.read_persisted() {
                Ok(Some(tasks)) => {
                    info!(
                        "event=store_load module=store status=ok source=persisted count={}",
                        tasks.len()
                    );
                    self.tasks = tasks;
                }
                Ok(None) => {
                    info!("event=store_load module=store status=ok source=seed reason=absent");
                    self.adopt_seed();
                }
                Err(err) => {
                    warn!(
                        "event=store_load module=store status=fallback source=seed error_code={} error={}",
                        err.code(),
                        err.message()
                    );
                    self.adopt_seed();
                }
            }
        }
        &self.tasks
    }

    fn read_persisted(&self) -> Result<Option<Vec<Task>>, AppError> {
        match self.persistence.read()? {
            Some(bytes) => decode_tasks(&bytes).map(Some),
            None => Ok(None),
        }
    }

    fn adopt_seed(&mut self) {
        self.tasks = seed_tasks();
        self.persist();
    }

    /// Creates a task at the front of the list and returns it.
    pub fn add(&mut self, input: TaskInput) -> Task {
        self.load();

        let id = self.next_id();
        let task = Task::from_input(id, input, self.clock.now());
        self.tasks.insert(0, task.clone());
        info!(
            "event=task_add module=store status=ok id={} count={}",
            task.id,
            self.tasks.len()
        );
        self.persist();

        task
    }

    fn next_id(&self) -> String {
        loop {
            let id = Uuid::new_v4().to_string();
            if !self.tasks.iter().any(|task| task.id == id) {
                return id;
            }
        }
    }

    /// Merges `patch` into the task with `id`, keeping its position.
    ///
    /// # Errors
    /// - `NotFound` when no task has `id`; nothing is written in that case.
    pub fn update(&mut self, id: &str, patch: TaskPatch) -> Result<Task, AppError> {
        self.load();

        let now = self.clock.now();
        let task = self
            .tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or_else(|| AppError::not_found(format!("task '{id}' not found")))?;
        task.apply(patch, now);
        let updated = task.clone();

        info!("event=task_update module=store status=ok id={id}");
        self.persist();

        Ok(updated)
    }

    /// Removes the task with `id` if present. Persists either way.
    pub fn delete(&mut self, id: &str) -> Option<Task> {
        self.load();

        let index = self.tasks.iter().position(|task| task.id == id);
        let removed = index.map(|index| self.tasks.remove(index));
        match &removed {
            Some(_) => info!(
                "event=task_delete module=store status=ok id={id} count={}",
                self.tasks.len()
            ),
            None => info!("event=task_delete module=store status=noop id={id}"),
        }
        self.persist();

        removed
    }

    /// Current list, newest first.
    pub fn list(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn filtered(&self, filter: &TaskFilter) -> Vec<&Task> {
        filter.apply(&self.tasks)
    }

    /// Counts over the whole list, independent of any filter.
    pub fn stats(&self) -> TaskStats {
        TaskStats::from_tasks(&self.tasks)
    }

    /// Serializes the full list to the port.
    pub fn persist(&mut self) {
        self.load();
        let result = encode_tasks(&self.tasks).and_then(|bytes| self.persistence.write(&bytes));
        match result {
            Ok(()) => {
                debug!(
                    "event=store_persist module=store status=ok count={}",
                    self.tasks.len()
                );
                self.last_write_error = None;
            }
            Err(err) => {
                error!(
                    "event=store_persist module=store status=error error_code={} error={}",
                    err.code(),
                    err.message()
                );
                self.last_write_error = Some(err);
            }
        }
    }

    /// Most recent write failure, cleared by the next successful write.
    pub fn last_write_error(&self) -> Option<&AppError> {
        self.last_write_error.as_ref()
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    pub fn persistence_mut(&mut self) -> &mut P {
        &mut self.persistence
    }

    pub fn into_persistence(self) -> P {
        self.persistence
    }
}

#[cfg(test)]
mod tests {
    use super::TaskStore;
    use crate::clock::FixedClock;
    use crate::error::AppError;
    use crate::model::{TaskInput, TaskPatch, TaskPriority, TaskStatus};
    use crate::seed::seed_tasks;
    use crate::storage::MemoryStore;
    use crate::storage::codec::{decode_tasks, encode_tasks};
    use time::macros::datetime;

    fn input(title: &str) -> TaskInput {
        TaskInput::new(title, "", TaskStatus::Pending, TaskPriority::Low)
    }

    fn empty_store() -> TaskStore<MemoryStore> {
        TaskStore::open(MemoryStore::with_blob(b"[]".to_vec()))
    }

    fn persisted(store: &TaskStore<MemoryStore>) -> Vec<crate::model::Task> {
        decode_tasks(store.persistence().blob().unwrap()).unwrap()
    }

    #[test]
    fn load_without_blob_seeds_and_writes_back() {
        let mut store = TaskStore::new(MemoryStore::new());

        let loaded = store.load().to_vec();

        assert_eq!(loaded, seed_tasks());
        assert_eq!(persisted(&store), seed_tasks());
        assert_eq!(store.persistence().write_count(), 1);
    }

    #[test]
    fn load_with_blob_adopts_it_exactly() {
        let mut tasks = seed_tasks();
        tasks.truncate(2);
        let blob = encode_tasks(&tasks).unwrap();

        let store = TaskStore::open(MemoryStore::with_blob(blob));

        assert_eq!(store.list(), tasks.as_slice());
        assert_eq!(store.persistence().write_count(), 0);
    }

    #[test]
    fn load_with_malformed_blob_falls_back_to_seed() {
        let store = TaskStore::open(MemoryStore::with_blob(b"{ broken".to_vec()));

        assert_eq!(store.list(), seed_tasks().as_slice());
        assert_eq!(persisted(&store), seed_tasks());
    }

    #[test]
    fn load_with_read_failure_falls_back_to_seed() {
        let mut port = MemoryStore::new();
        port.set_fail_reads(true);

        let store = TaskStore::open(port);

        assert_eq!(store.list(), seed_tasks().as_slice());
        assert_eq!(persisted(&store), seed_tasks());
        assert_eq!(store.persistence().write_count(), 1);
        assert!(store.last_write_error().is_none());
    }

    #[test]
    fn load_reads_port_only_once() {
        let mut store = TaskStore::new(MemoryStore::new());

        store.load();
        store.add(input("first"));
        store.load();
        store.delete("1");

        assert_eq!(store.persistence().read_count(), 1);
    }

    #[test]
    fn mutation_before_load_loads_first() {
        let mut store = TaskStore::new(MemoryStore::new());

        store.add(input("X"));

        assert_eq!(store.list().len(), 6);
        assert_eq!(store.list()[0].title, "X");
    }

    #[test]
    fn add_prepends_and_sets_timestamps() {
        let now = datetime!(2026-01-02 3:04:05 UTC);
        let mut store = empty_store().with_clock(Box::new(FixedClock(now)));

        store.add(input("older"));
        let task = store.add(input("newer"));

        assert_eq!(store.list()[0].id, task.id);
        assert_eq!(store.list()[1].title, "older");
        assert_eq!(task.created_at, now);
        assert_eq!(task.updated_at, now);
        assert_eq!(persisted(&store), store.list());
    }

    #[test]
    fn add_keeps_optional_fields() {
        let mut store = empty_store();
        let mut new_task = input("with extras");
        new_task.assignee = Some("Sam".to_string());
        new_task.due_date = Some(datetime!(2026-02-01 0:00 UTC));

        let task = store.add(new_task);

        assert_eq!(task.assignee.as_deref(), Some("Sam"));
        assert_eq!(task.due_date, Some(datetime!(2026-02-01 0:00 UTC)));
    }

    #[test]
    fn odd_offset_due_date_still_persists() {
        let mut store = empty_store();
        let mut new_task = input("odd offset");
        new_task.due_date = Some(datetime!(2025-06-25 0:00 +01:00:30));

        store.add(new_task);
        store.add(input("plain"));

        assert!(store.last_write_error().is_none());
        assert_eq!(persisted(&store), store.list());
        assert_eq!(
            persisted(&store)[1].due_date,
            Some(datetime!(2025-06-24 22:59:30 UTC))
        );
    }

    #[test]
    fn out_of_range_year_still_persists() {
        let mut store = empty_store();
        let mut new_task = input("ancient");
        new_task.due_date = Some(
            time::Date::from_calendar_date(-1, time::Month::January, 1)
                .unwrap()
                .midnight()
                .assume_utc(),
        );

        store.add(new_task);

        assert!(store.last_write_error().is_none());
        assert_eq!(persisted(&store), store.list());
    }

    #[test]
    fn add_generates_distinct_ids() {
        let mut store = empty_store();
        for index in 0..50 {
            store.add(input(&format!("task {index}")));
        }

        let mut ids: Vec<_> = store.list().iter().map(|task| task.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn update_merges_and_touches_updated_at() {
        let now = datetime!(2026-01-02 0:00 UTC);
        let mut store = TaskStore::open(MemoryStore::new()).with_clock(Box::new(FixedClock(now)));

        let updated = store
            .update("2", TaskPatch::status(TaskStatus::Completed))
            .unwrap();

        assert_eq!(updated.status, TaskStatus::Completed);
        assert_eq!(updated.updated_at, now);
        assert_eq!(updated.created_at, datetime!(2025-06-16 0:00 UTC));
        assert_eq!(updated.title, "Implement Real-time Notifications");
        assert_eq!(store.list()[1], updated);
        assert_eq!(persisted(&store)[1], updated);
    }

    #[test]
    fn update_missing_id_reports_not_found_without_writing() {
        let mut store = TaskStore::open(MemoryStore::new());
        let writes_before = store.persistence().write_count();

        let err = store
            .update("missing", TaskPatch::status(TaskStatus::Completed))
            .unwrap_err();

        assert_eq!(err.code(), "not_found");
        assert_eq!(store.list(), seed_tasks().as_slice());
        assert_eq!(store.persistence().write_count(), writes_before);
    }

    #[test]
    fn delete_removes_once_and_persists_every_time() {
        let mut store = TaskStore::open(MemoryStore::new());
        let writes_before = store.persistence().write_count();

        let removed = store.delete("1");
        let again = store.delete("1");

        assert_eq!(removed.map(|task| task.id), Some("1".to_string()));
        assert!(again.is_none());
        assert_eq!(store.list().len(), 4);
        assert!(store.get("1").is_none());
        assert_eq!(store.persistence().write_count(), writes_before + 2);
    }

    #[test]
    fn write_failure_keeps_in_memory_change() {
        let mut store = empty_store();
        store.persistence_mut().set_fail_writes(true);

        let task = store.add(input("kept"));

        assert_eq!(store.list()[0].id, task.id);
        assert_eq!(store.persistence().blob(), Some(&b"[]"[..]));
        assert!(matches!(
            store.last_write_error(),
            Some(AppError::PersistenceWrite(_))
        ));

        store.persistence_mut().set_fail_writes(false);
        store.persist();
        assert!(store.last_write_error().is_none());
        assert_eq!(persisted(&store)[0].id, task.id);
    }

    #[test]
    fn stats_ignore_filters() {
        let store = TaskStore::open(MemoryStore::new());
        let filter = crate::filter::TaskFilter::new("api", Default::default());

        assert_eq!(store.filtered(&filter).len(), 1);
        assert_eq!(store.stats().total, 5);
    }
}
