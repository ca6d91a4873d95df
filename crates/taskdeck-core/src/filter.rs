use std::fmt;

use taskdeck_shared::{
  Priority,
  Task
};
use tracing::{
  trace,
  warn
};

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
)]
pub enum StatusFilter {
  #[default]
  All,
  Completed,
  Pending
}

impl StatusFilter {
  pub const ALL: [StatusFilter; 3] = [
    StatusFilter::All,
    StatusFilter::Completed,
    StatusFilter::Pending
  ];

  /// Read a status selector value.
  /// Anything unrecognized means `all`.
  pub fn parse(value: &str) -> Self {
    match value
      .trim()
      .to_ascii_lowercase()
      .as_str()
    {
      | "completed" => Self::Completed,
      | "pending" => Self::Pending,
      | "" | "all" => Self::All,
      | other => {
        warn!(
          status = other,
          "unknown status filter; \
           showing all tasks"
        );
        Self::All
      }
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      | Self::All => "all",
      | Self::Completed => "completed",
      | Self::Pending => "pending"
    }
  }

  pub fn matches(
    &self,
    task: &Task
  ) -> bool {
    match self {
      | Self::All => true,
      | Self::Completed => task.completed,
      | Self::Pending => !task.completed
    }
  }
}

impl fmt::Display for StatusFilter {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// The three independent selectors of
/// the filter bar. `None` means unset.
#[derive(
  Debug, Clone, PartialEq, Eq, Default,
)]
pub struct FilterSet {
  pub status:   StatusFilter,
  pub priority: Option<Priority>,
  pub category: Option<String>
}

impl FilterSet {
  /// Build from raw selector values,
  /// where an empty string is "unset".
  pub fn from_form(
    status: &str,
    priority: &str,
    category: &str
  ) -> Self {
    let priority = match priority.trim()
    {
      | "" => None,
      | raw => {
        match raw.parse::<Priority>() {
          | Ok(priority) => Some(priority),
          | Err(err) => {
            warn!(error = %err, "ignoring priority filter");
            None
          }
        }
      }
    };

    let category = Some(category)
      .filter(|value| !value.is_empty())
      .map(str::to_string);

    Self {
      status: StatusFilter::parse(
        status
      ),
      priority,
      category
    }
  }

  pub fn is_active(&self) -> bool {
    self.status != StatusFilter::All
      || self.priority.is_some()
      || self.category.is_some()
  }

  pub fn clear(&mut self) {
    *self = Self::default();
  }

  pub fn matches(
    &self,
    task: &Task
  ) -> bool {
    if !self.status.matches(task) {
      return false;
    }

    if let Some(priority) = self.priority
      && task.priority != priority
    {
      return false;
    }

    if let Some(category) =
      self.category.as_deref()
      && task.category != category
    {
      return false;
    }

    true
  }

  /// Tasks passing every active
  /// selector, in their original order.
  #[tracing::instrument(skip(
    self, tasks
  ))]
  pub fn apply<'a>(
    &self,
    tasks: &'a [Task]
  ) -> Vec<&'a Task> {
    let kept: Vec<&Task> = tasks
      .iter()
      .filter(|task| self.matches(task))
      .collect();
    trace!(
      input = tasks.len(),
      kept = kept.len(),
      "applied task filters"
    );
    kept
  }
}

#[cfg(test)]
mod tests {
  use taskdeck_shared::DEFAULT_CATEGORY;

  use super::*;

  fn task(
    id: u64,
    priority: Priority,
    category: &str,
    completed: bool
  ) -> Task {
    Task {
      id,
      title: format!("task {id}"),
      description: None,
      category: category.to_string(),
      priority,
      due_date: None,
      completed,
      created_at: None
    }
  }

  fn sample() -> Vec<Task> {
    vec![
      task(1, Priority::High, "Work", false),
      task(2, Priority::Low, "Home", true),
      task(3, Priority::Medium, "Work", true),
      task(4, Priority::High, "Home", false),
      task(
        5,
        Priority::Low,
        DEFAULT_CATEGORY,
        false
      ),
      task(6, Priority::High, "Work", true),
    ]
  }

  fn every_filter_set() -> Vec<FilterSet>
  {
    let priorities = [
      None,
      Some(Priority::Low),
      Some(Priority::Medium),
      Some(Priority::High)
    ];
    let categories = [
      None,
      Some("Work".to_string()),
      Some("Home".to_string()),
      Some("Missing".to_string())
    ];

    let mut sets = vec![];
    for status in StatusFilter::ALL {
      for priority in priorities {
        for category in &categories {
          sets.push(FilterSet {
            status,
            priority,
            category: category.clone()
          });
        }
      }
    }
    sets
  }

  fn is_subsequence(
    needle: &[&Task],
    haystack: &[Task]
  ) -> bool {
    let mut rest = haystack.iter();
    needle.iter().all(|wanted| {
      rest.any(|task| task.id == wanted.id)
    })
  }

  #[test]
  fn output_is_order_preserving_subsequence()
  {
    let tasks = sample();
    for filters in every_filter_set() {
      let kept = filters.apply(&tasks);
      assert!(
        is_subsequence(&kept, &tasks),
        "not a subsequence for \
         {filters:?}"
      );
      assert!(
        kept
          .iter()
          .all(|task| filters.matches(task))
      );
      let dropped = tasks
        .iter()
        .filter(|task| {
          !kept
            .iter()
            .any(|k| k.id == task.id)
        });
      assert!(
        dropped
          .into_iter()
          .all(|task| !filters.matches(task))
      );
    }
  }

  #[test]
  fn no_active_filters_is_identity() {
    let tasks = sample();
    let filters = FilterSet::default();
    assert!(!filters.is_active());

    let kept: Vec<u64> = filters
      .apply(&tasks)
      .iter()
      .map(|task| task.id)
      .collect();
    let all: Vec<u64> =
      tasks.iter().map(|task| task.id).collect();
    assert_eq!(kept, all);
  }

  #[test]
  fn single_pending_task_scenario() {
    let tasks = vec![task(
      1,
      Priority::High,
      DEFAULT_CATEGORY,
      false
    )];

    let pending = FilterSet::from_form(
      "pending", "", ""
    );
    assert_eq!(
      pending
        .apply(&tasks)
        .iter()
        .map(|task| task.id)
        .collect::<Vec<_>>(),
      vec![1]
    );

    let completed = FilterSet::from_form(
      "completed",
      "",
      ""
    );
    assert!(
      completed.apply(&tasks).is_empty()
    );
  }

  #[test]
  fn selectors_combine_conjunctively() {
    let tasks = sample();
    let filters = FilterSet::from_form(
      "completed",
      "High",
      "Work"
    );
    let ids: Vec<u64> = filters
      .apply(&tasks)
      .iter()
      .map(|task| task.id)
      .collect();
    assert_eq!(ids, vec![6]);
  }

  #[test]
  fn form_values_parse_leniently() {
    let filters = FilterSet::from_form(
      "bogus", "nope", ""
    );
    assert_eq!(filters, FilterSet::default());

    let mut filters = FilterSet::from_form(
      "PENDING",
      "low",
      "Home"
    );
    assert_eq!(
      filters.status,
      StatusFilter::Pending
    );
    assert_eq!(
      filters.priority,
      Some(Priority::Low)
    );
    assert!(filters.is_active());
    filters.clear();
    assert!(!filters.is_active());
  }
}
