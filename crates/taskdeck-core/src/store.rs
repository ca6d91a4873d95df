use std::collections::HashSet;

use taskdeck_shared::{
  Task,
  TaskId
};
use tracing::{
  debug,
  info,
  instrument
};

use crate::api::TaskApi;
use crate::error::LoadError;

/// In-memory mirror of the backend task
/// list.
///
/// The list is only ever swapped whole:
/// readers see either the previous
/// snapshot or the new one.
#[derive(Debug, Clone, Default)]
pub struct TaskStore {
  tasks:      Option<Vec<Task>>,
  generation: u64
}

impl TaskStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Fetch the authoritative list and
  /// replace the store with it. On error
  /// the previous contents stay put.
  #[instrument(skip_all, fields(generation = self.generation))]
  pub async fn reload<A>(
    &mut self,
    api: &A
  ) -> Result<usize, LoadError>
  where
    A: TaskApi
  {
    let fetched = api.list_tasks().await?;
    self.replace(fetched)
  }

  /// Swap in a freshly fetched list.
  pub fn replace(
    &mut self,
    tasks: Vec<Task>
  ) -> Result<usize, LoadError> {
    let mut seen =
      HashSet::with_capacity(tasks.len());
    for task in &tasks {
      if !seen.insert(task.id) {
        return Err(LoadError::DuplicateId(
          task.id
        ));
      }
    }

    let count = tasks.len();
    self.tasks = Some(tasks);
    self.generation += 1;
    info!(
      count,
      generation = self.generation,
      "task store replaced"
    );
    Ok(count)
  }

  pub fn is_loaded(&self) -> bool {
    self.tasks.is_some()
  }

  /// `None` until the first successful
  /// load.
  pub fn tasks(&self) -> Option<&[Task]> {
    self.tasks.as_deref()
  }

  pub fn get(
    &self,
    id: TaskId
  ) -> Option<&Task> {
    let found = self
      .tasks
      .as_deref()?
      .iter()
      .find(|task| task.id == id);
    if found.is_none() {
      debug!(task_id = id, "task not in store");
    }
    found
  }

  pub fn len(&self) -> usize {
    self
      .tasks
      .as_ref()
      .map_or(0, Vec::len)
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Number of successful reloads so far.
  pub fn generation(&self) -> u64 {
    self.generation
  }
}

#[cfg(test)]
mod tests {
  use taskdeck_shared::Priority;

  use super::*;

  fn task(id: u64) -> Task {
    Task {
      id,
      title: format!("task {id}"),
      description: None,
      category: "General".to_string(),
      priority: Priority::Medium,
      due_date: None,
      completed: false,
      created_at: None
    }
  }

  #[test]
  fn unloaded_store_is_distinct_from_empty()
  {
    let mut store = TaskStore::new();
    assert!(store.tasks().is_none());
    assert!(!store.is_loaded());

    store
      .replace(vec![])
      .expect("replace with empty");
    assert_eq!(store.tasks(), Some(&[][..]));
    assert!(store.is_loaded());
    assert_eq!(store.generation(), 1);
  }

  #[test]
  fn replace_is_wholesale_and_lookup_works()
  {
    let mut store = TaskStore::new();
    store
      .replace(vec![task(1), task(2)])
      .expect("first load");
    store
      .replace(vec![task(3)])
      .expect("second load");

    assert_eq!(store.len(), 1);
    assert!(store.get(1).is_none());
    assert_eq!(
      store.get(3).map(|t| t.id),
      Some(3)
    );
  }

  #[test]
  fn duplicate_ids_are_rejected_without_damage()
  {
    let mut store = TaskStore::new();
    store
      .replace(vec![task(1)])
      .expect("first load");

    let err = store
      .replace(vec![task(2), task(2)])
      .expect_err("duplicate ids");
    assert_eq!(
      err,
      LoadError::DuplicateId(2)
    );
    assert_eq!(store.len(), 1);
    assert!(store.get(1).is_some());
    assert_eq!(store.generation(), 1);
  }
}
