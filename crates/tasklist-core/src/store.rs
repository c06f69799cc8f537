use tasklist_shared::{Task, TaskId};
use tracing::{debug, trace};

use crate::filter::Filter;

/// Single writable owner of the client-side task list.
///
/// Newly created tasks are kept at the front; replacements keep their position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskStore {
    tasks: Vec<Task>,
    filter: Filter,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_all(&mut self, tasks: Vec<Task>) {
        debug!(count = tasks.len(), "replacing task list");
        self.tasks = tasks;
    }

    /// Inserts at the front if `task.id` is new, otherwise replaces the entry in place.
    pub fn upsert(&mut self, task: Task) {
        match self.position(task.id) {
            Some(idx) => {
                trace!(id = task.id, idx, "replacing task");
                self.tasks[idx] = task;
            }
            None => {
                trace!(id = task.id, "inserting task at front");
                self.tasks.insert(0, task);
            }
        }
    }

    pub fn remove(&mut self, id: TaskId) -> Option<Task> {
        let idx = self.position(id)?;
        trace!(id, idx, "removing task");
        Some(self.tasks.remove(idx))
    }

    /// Patches only `completed`; every other field of the stored copy is kept.
    pub fn set_completed(&mut self, id: TaskId, completed: bool) -> bool {
        match self.tasks.iter_mut().find(|task| task.id == id) {
            Some(task) => {
                task.completed = completed;
                true
            }
            None => false,
        }
    }

    pub fn set_filter(&mut self, filter: Filter) {
        debug!(%filter, "filter changed");
        self.filter = filter;
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn filtered_view(&self) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|task| self.filter.matches(task))
            .collect()
    }

    pub fn count(&self) -> usize {
        self.tasks
            .iter()
            .filter(|task| self.filter.matches(task))
            .count()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rstest::rstest;
    use tasklist_shared::Task;

    use super::TaskStore;
    use crate::filter::Filter;

    fn task(id: u64, title: &str, completed: bool) -> Task {
        Task {
            id,
            title: title.to_string(),
            description: String::new(),
            completed,
            created_at: Some("2024-01-05T10:30:00".to_string()),
            updated_at: None,
        }
    }

    fn mixed_store() -> TaskStore {
        let mut store = TaskStore::new();
        store.set_all(vec![
            task(4, "d", false),
            task(3, "c", true),
            task(2, "b", false),
            task(1, "a", true),
        ]);
        store
    }

    #[test]
    fn empty_store_has_empty_view() {
        let store = TaskStore::new();
        assert_eq!(store.filter(), Filter::All);
        assert!(store.filtered_view().is_empty());
        assert_eq!(store.count(), 0);
    }

    #[rstest]
    #[case(Filter::All, vec![4, 3, 2, 1])]
    #[case(Filter::Completed, vec![3, 1])]
    #[case(Filter::Pending, vec![4, 2])]
    fn filtered_view_is_ordered_subset(#[case] filter: Filter, #[case] expected: Vec<u64>) {
        let mut store = mixed_store();
        store.set_filter(filter);

        let ids: Vec<u64> = store.filtered_view().iter().map(|t| t.id).collect();
        assert_eq!(ids, expected);
        assert_eq!(store.count(), expected.len());
        assert!(store.filtered_view().iter().all(|t| filter.matches(t)));
    }

    #[test]
    fn upsert_new_id_goes_to_front() {
        let mut store = mixed_store();
        store.upsert(task(9, "new", false));
        assert_eq!(store.tasks()[0].id, 9);
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn upsert_existing_id_keeps_position() {
        let mut store = mixed_store();
        store.upsert(task(2, "renamed", true));
        let ids: Vec<u64> = store.tasks().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![4, 3, 2, 1]);
        assert_eq!(store.get(2).map(|t| t.title.as_str()), Some("renamed"));
    }

    #[test]
    fn upsert_is_idempotent() {
        let mut store = mixed_store();
        store.upsert(task(9, "new", false));
        let once = store.clone();
        store.upsert(task(9, "new", false));
        assert_eq!(store, once);
    }

    #[test]
    fn remove_present_and_absent() {
        let mut store = mixed_store();
        assert_eq!(store.remove(3).map(|t| t.id), Some(3));
        assert!(store.get(3).is_none());

        let before = store.clone();
        assert!(store.remove(42).is_none());
        assert_eq!(store, before);
    }

    #[test]
    fn set_completed_touches_only_completion() {
        let mut store = mixed_store();
        let before = store.get(2).cloned();

        assert!(store.set_completed(2, true));
        let after = store.get(2).cloned();
        assert_eq!(after.as_ref().map(|t| t.completed), Some(true));
        assert_eq!(
            after.map(|t| (t.title, t.created_at)),
            before.map(|t| (t.title, t.created_at))
        );
        assert!(!store.set_completed(42, true));
    }

    fn store_strategy() -> impl Strategy<Value = TaskStore> {
        prop::collection::btree_map(0u64..64, any::<bool>(), 0..24)
            .prop_map(|entries| entries.into_iter().collect::<Vec<_>>())
            .prop_shuffle()
            .prop_map(|entries| {
                let mut store = TaskStore::new();
                store.set_all(
                    entries
                        .into_iter()
                        .map(|(id, completed)| task(id, &format!("task {id}"), completed))
                        .collect(),
                );
                store
            })
    }

    fn filter_strategy() -> impl Strategy<Value = Filter> {
        prop::sample::select(Filter::ALL.to_vec())
    }

    proptest! {
        #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

        #[test]
        fn any_filtered_view_is_exact_ordered_subset(
            mut store in store_strategy(),
            filter in filter_strategy(),
        ) {
            store.set_filter(filter);

            let expected: Vec<u64> = store
                .tasks()
                .iter()
                .filter(|t| filter.matches(t))
                .map(|t| t.id)
                .collect();
            let view: Vec<u64> = store.filtered_view().iter().map(|t| t.id).collect();

            prop_assert_eq!(&view, &expected);
            prop_assert_eq!(store.count(), store.filtered_view().len());
        }

        #[test]
        fn any_upsert_is_idempotent(
            mut store in store_strategy(),
            id in 0u64..96,
            completed in any::<bool>(),
            title in "[a-z]{1,12}",
        ) {
            let existed = store.get(id).is_some();
            let before = store.len();

            store.upsert(task(id, &title, completed));
            let once = store.clone();
            store.upsert(task(id, &title, completed));

            prop_assert_eq!(&store, &once);
            prop_assert_eq!(store.len(), if existed { before } else { before + 1 });
            prop_assert_eq!(store.get(id).map(|t| t.title.as_str()), Some(title.as_str()));
            if !existed {
                prop_assert_eq!(store.tasks()[0].id, id);
            }
        }

        #[test]
        fn removing_absent_id_leaves_store_unchanged(
            mut store in store_strategy(),
            id in 0u64..96,
        ) {
            prop_assume!(store.get(id).is_none());

            let before = store.clone();
            prop_assert!(store.remove(id).is_none());
            prop_assert_eq!(store, before);
        }
    }
}
