//! The client session: every piece of mutable client state and the
//! user flows that drive it.
//!
//! A flow awaits its mutation to completion before issuing the reload
//! that depends on it. Failures are logged, raised as an error toast and
//! returned; nothing is patched in place, so a failed call leaves the
//! session exactly as it was.

use chrono::{
  DateTime,
  Utc
};
use taskdeck_shared::{
  Stats,
  Task,
  TaskId,
  TaskPatch
};
use tracing::{
  error,
  info,
  instrument,
  warn
};

use crate::api::TaskApi;
use crate::error::{
  ClientError,
  LoadError
};
use crate::filter::FilterSet;
use crate::modal::{
  CloseReason,
  DeleteConfirm,
  Submission,
  TaskEditor
};
use crate::notify::{
  Notifier,
  ToastKind
};
use crate::render::{
  CardRenderer,
  TaskView
};
use crate::store::TaskStore;

/// A key press as the surface saw it.
#[derive(
  Debug, Clone, PartialEq, Eq, Default,
)]
pub struct KeyPress {
  pub key:  String,
  pub ctrl: bool,
  pub meta: bool
}

impl KeyPress {
  pub fn new(key: impl Into<String>) -> Self {
    Self {
      key: key.into(),
      ..Self::default()
    }
  }

  pub fn with_ctrl(mut self) -> Self {
    self.ctrl = true;
    self
  }

  pub fn with_meta(mut self) -> Self {
    self.meta = true;
    self
  }

  /// The shortcut this press triggers,
  /// if any.
  pub fn command(
    &self
  ) -> Option<KeyCommand> {
    if self.key == "Escape" {
      return Some(KeyCommand::CloseModals);
    }

    if self.ctrl || self.meta {
      return match self.key.as_str() {
        | "n" => Some(KeyCommand::NewTask),
        | "r" => Some(KeyCommand::Reload),
        | _ => None
      };
    }

    None
  }
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum KeyCommand {
  CloseModals,
  NewTask,
  Reload
}

#[derive(Debug, Clone)]
pub struct Session<A> {
  api:           A,
  store:         TaskStore,
  filters:       FilterSet,
  categories:    Vec<String>,
  stats:         Option<Stats>,
  stats_visible: bool,
  loading:       bool,
  editor:        TaskEditor,
  confirm:       DeleteConfirm,
  notifier:      Notifier,
  renderer:      CardRenderer
}

impl<A> Session<A>
where
  A: TaskApi
{
  pub fn new(
    api: A,
    renderer: CardRenderer,
    notifier: Notifier
  ) -> Self {
    Self {
      api,
      store: TaskStore::new(),
      filters: FilterSet::default(),
      categories: vec![],
      stats: None,
      stats_visible: false,
      loading: false,
      editor: TaskEditor::new(),
      confirm: DeleteConfirm::new(),
      notifier,
      renderer
    }
  }

  pub fn api(&self) -> &A {
    &self.api
  }

  pub fn store(&self) -> &TaskStore {
    &self.store
  }

  pub fn filters(&self) -> &FilterSet {
    &self.filters
  }

  pub fn categories(&self) -> &[String] {
    &self.categories
  }

  pub fn stats(&self) -> Option<&Stats> {
    self.stats.as_ref()
  }

  pub fn stats_visible(&self) -> bool {
    self.stats_visible
  }

  pub fn is_loading(&self) -> bool {
    self.loading
  }

  pub fn editor(&self) -> &TaskEditor {
    &self.editor
  }

  pub fn editor_mut(
    &mut self
  ) -> &mut TaskEditor {
    &mut self.editor
  }

  pub fn confirm(&self) -> &DeleteConfirm {
    &self.confirm
  }

  pub fn notifier(&self) -> &Notifier {
    &self.notifier
  }

  pub fn notifier_mut(
    &mut self
  ) -> &mut Notifier {
    &mut self.notifier
  }

  pub fn renderer(&self) -> &CardRenderer {
    &self.renderer
  }

  /// The page body must not scroll while
  /// a dialog is up.
  pub fn scroll_locked(&self) -> bool {
    self.editor.is_open()
      || self.confirm.is_open()
  }

  /// Fold in the result of a flow that ran
  /// on `before`, a copy of this session
  /// taken when the flow started.
  ///
  /// Loaded data comes from `after`. A
  /// dialog changed here while the flow was
  /// out keeps that change; otherwise it
  /// takes the flow's outcome.
  pub fn absorb(
    &mut self,
    before: &Self,
    after: Self
  ) {
    let Self {
      store,
      categories,
      stats,
      stats_visible,
      loading,
      editor,
      confirm,
      notifier,
      ..
    } = after;

    self.store = store;
    self.categories = categories;
    self.stats = stats;
    self.stats_visible = stats_visible;
    self.loading = loading;

    if self.editor == before.editor {
      self.editor = editor;
    } else {
      info!("editor changed during flow; keeping local state");
    }
    if self.confirm == before.confirm {
      self.confirm = confirm;
    }

    self
      .notifier
      .absorb(&before.notifier, notifier);
  }

  fn notify(
    &mut self,
    kind: ToastKind,
    message: impl Into<String>
  ) {
    self.notifier.push(
      kind,
      message,
      Utc::now()
    );
  }

  fn report(
    &mut self,
    action: &'static str,
    label: &'static str,
    message: String
  ) {
    error!(action, kind = label, error = %message, "action failed");
    self.notify(ToastKind::Error, message);
  }

  fn report_client(
    &mut self,
    action: &'static str,
    err: &ClientError
  ) {
    self.report(
      action,
      err.as_label(),
      err.to_string()
    );
  }

  #[instrument(skip(self))]
  pub async fn load_tasks(
    &mut self
  ) -> Result<usize, LoadError> {
    self.loading = true;
    let result =
      self.store.reload(&self.api).await;
    self.loading = false;

    if let Err(err) = &result {
      self.report(
        "load_tasks",
        err.as_label(),
        err.to_string()
      );
    }
    result
  }

  #[instrument(skip(self))]
  pub async fn load_categories(
    &mut self
  ) -> Result<usize, ClientError> {
    match self.api.list_categories().await
    {
      | Ok(categories) => {
        let count = categories.len();
        self.categories = categories;
        Ok(count)
      }
      | Err(err) => {
        self.report_client(
          "load_categories",
          &err
        );
        Err(err)
      }
    }
  }

  /// Reload tasks, then categories. A
  /// failed task load does not stop the
  /// category reload.
  pub async fn refresh(
    &mut self
  ) -> Result<(), LoadError> {
    let tasks = self.load_tasks().await;
    let categories =
      self.load_categories().await;
    tasks?;
    categories?;
    Ok(())
  }

  // filters

  pub fn set_filters(
    &mut self,
    filters: FilterSet
  ) {
    info!(?filters, "filters changed");
    self.filters = filters;
  }

  pub fn clear_filters(&mut self) {
    self.filters.clear();
  }

  /// `None` until the first successful
  /// load; an empty vec is a real "no
  /// matches".
  pub fn visible_tasks(
    &self
  ) -> Option<Vec<&Task>> {
    self
      .store
      .tasks()
      .map(|tasks| self.filters.apply(tasks))
  }

  /// Rendered board, or `None` before the
  /// first load.
  pub fn board(
    &self,
    now: DateTime<Utc>
  ) -> Option<TaskView> {
    self.visible_tasks().map(|tasks| {
      self.renderer.render(tasks, now)
    })
  }

  // editor

  pub fn open_add(&mut self) {
    self.editor.open_add();
  }

  /// Open the editor on a stored task;
  /// returns false for an id not in the
  /// store.
  pub fn open_edit(
    &mut self,
    id: TaskId
  ) -> bool {
    let zone = self.renderer.zone();
    match self.store.get(id) {
      | Some(task) => {
        self.editor.open_edit(task, zone);
        true
      }
      | None => {
        warn!(task_id = id, "edit requested for unknown task");
        false
      }
    }
  }

  pub fn close_editor(
    &mut self,
    reason: CloseReason
  ) {
    self.editor.close(reason);
  }

  #[instrument(skip(self))]
  pub async fn submit_editor(
    &mut self
  ) -> Result<Task, ClientError> {
    let submission = match self
      .editor
      .prepare(self.renderer.zone())
    {
      | Ok(submission) => submission,
      | Err(err) => {
        self.report_client(
          "submit_task",
          &err
        );
        return Err(err);
      }
    };

    let (result, success) = match &submission
    {
      | Submission::Create(create) => {
        (
          self.api.create_task(create).await,
          "Task created successfully!"
        )
      }
      | Submission::Update(id, patch) => {
        (
          self
            .api
            .update_task(*id, patch)
            .await,
          "Task updated successfully!"
        )
      }
    };

    let saved = match result {
      | Ok(task) => task,
      | Err(err) => {
        self.report_client(
          "submit_task",
          &err
        );
        return Err(err);
      }
    };

    info!(task_id = saved.id, "task saved");
    self.notify(ToastKind::Success, success);
    self.editor.close(CloseReason::Completed);
    let _ = self.refresh().await;
    Ok(saved)
  }

  // completion

  #[instrument(skip(self))]
  pub async fn toggle_complete(
    &mut self,
    id: TaskId,
    completed: bool
  ) -> Result<Task, ClientError> {
    let patch =
      TaskPatch::completion(completed);
    let task = match self
      .api
      .update_task(id, &patch)
      .await
    {
      | Ok(task) => task,
      | Err(err) => {
        self.report_client(
          "toggle_complete",
          &err
        );
        return Err(err);
      }
    };

    self.notify(
      ToastKind::Success,
      if completed {
        "Task completed!"
      } else {
        "Task reopened!"
      }
    );
    let _ = self.load_tasks().await;
    Ok(task)
  }

  // deletion

  pub fn request_delete(
    &mut self,
    id: TaskId
  ) {
    self.confirm.open(id);
  }

  pub fn cancel_delete(
    &mut self,
    reason: CloseReason
  ) {
    self.confirm.close(reason);
  }

  /// Delete the pending target. The
  /// dialog closes whatever the outcome.
  #[instrument(skip(self))]
  pub async fn confirm_delete(
    &mut self
  ) -> Result<Option<TaskId>, ClientError>
  {
    let Some(id) = self.confirm.pending()
    else {
      return Ok(None);
    };

    let result =
      self.api.delete_task(id).await;
    match &result {
      | Ok(()) => {
        info!(task_id = id, "task deleted");
        self.notify(
          ToastKind::Success,
          "Task deleted successfully!"
        );
        let _ = self.refresh().await;
      }
      | Err(err) => {
        self.report_client(
          "delete_task",
          err
        );
      }
    }

    self.confirm.close(CloseReason::Completed);
    result.map(|()| Some(id))
  }

  // stats

  #[instrument(skip(self))]
  pub async fn load_stats(
    &mut self
  ) -> Result<&Stats, ClientError> {
    match self.api.stats().await {
      | Ok(stats) => {
        Ok(self.stats.insert(stats))
      }
      | Err(err) => {
        self.report_client(
          "load_stats",
          &err
        );
        Err(err)
      }
    }
  }

  /// Show the panel (loading fresh
  /// numbers first) or hide it.
  pub async fn toggle_stats(&mut self) {
    if self.stats_visible {
      self.stats_visible = false;
      return;
    }

    let _ = self.load_stats().await;
    self.stats_visible = true;
  }

  // keyboard

  pub async fn handle_key(
    &mut self,
    key: &KeyPress
  ) -> Option<KeyCommand> {
    let command = key.command()?;
    match command {
      | KeyCommand::CloseModals => {
        self.editor.close(CloseReason::Escape);
        self
          .confirm
          .close(CloseReason::Escape);
      }
      | KeyCommand::NewTask => {
        self.open_add()
      }
      | KeyCommand::Reload => {
        let _ = self.load_tasks().await;
      }
    }
    Some(command)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn shortcuts_resolve() {
    assert_eq!(
      KeyPress::new("Escape").command(),
      Some(KeyCommand::CloseModals)
    );
    assert_eq!(
      KeyPress::new("n").with_ctrl().command(),
      Some(KeyCommand::NewTask)
    );
    assert_eq!(
      KeyPress::new("r").with_meta().command(),
      Some(KeyCommand::Reload)
    );
    assert_eq!(
      KeyPress::new("n").command(),
      None
    );
    assert_eq!(
      KeyPress::new("x").with_ctrl().command(),
      None
    );
  }
}
