//! Dialog state machines.
//!
//! Both dialogs are either closed or open. Anything captured while open
//! (form values, the edit target, the pending delete target) lives inside
//! the `Open` state, so closing drops it and the next open starts clean.

use taskdeck_shared::{
  DEFAULT_CATEGORY,
  Priority,
  Task,
  TaskCreate,
  TaskId,
  TaskPatch
};
use tracing::{
  debug,
  info
};

use crate::datetime::{
  self,
  ViewerZone
};
use crate::error::ClientError;

pub const DELETE_PROMPT: &str =
  "Are you sure you want to delete this \
   task? This action cannot be undone.";

const EMPTY_TITLE: &str =
  "Please enter a task title";

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum CloseReason {
  /// Close or cancel button.
  Dismissed,
  /// Click on the backdrop outside the
  /// dialog surface.
  Backdrop,
  Escape,
  /// Successful submit or confirm.
  Completed
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum FormField {
  Title,
  Description,
  Category,
  Priority,
  DueDate
}

/// Raw editor field values, as typed.
#[derive(
  Debug, Clone, PartialEq, Eq, Default,
)]
pub struct TaskForm {
  pub title:       String,
  pub description: String,
  pub category:    String,
  pub priority:    Priority,
  /// `YYYY-MM-DDTHH:MM` in the viewer's
  /// zone, or empty.
  pub due_date:    String
}

impl TaskForm {
  pub fn from_task(
    task: &Task,
    zone: ViewerZone
  ) -> Self {
    Self {
      title:       task.title.clone(),
      description: task
        .description
        .clone()
        .unwrap_or_default(),
      category:    task.category.clone(),
      priority:    task.priority,
      due_date:    task
        .due_date
        .as_deref()
        .map(|raw| {
          datetime::to_input_value(
            raw, zone
          )
        })
        .unwrap_or_default()
    }
  }

  /// Trimmed, defaulted and validated
  /// field values.
  fn normalized(
    &self,
    zone: ViewerZone
  ) -> Result<TaskCreate, ClientError> {
    let title = self.title.trim();
    if title.is_empty() {
      return Err(ClientError::validation(
        EMPTY_TITLE
      ));
    }

    let category = match self
      .category
      .trim()
    {
      | "" => DEFAULT_CATEGORY,
      | value => value
    };

    let due = self.due_date.trim();
    let due_date = if due.is_empty() {
      None
    } else if datetime::parse_due(due, zone)
      .is_some()
    {
      Some(due.to_string())
    } else {
      return Err(ClientError::validation(
        format!(
          "Invalid due date: {due}"
        )
      ));
    };

    Ok(TaskCreate {
      title: title.to_string(),
      description: self
        .description
        .trim()
        .to_string(),
      category: category.to_string(),
      priority: self.priority,
      due_date
    })
  }
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum EditorMode {
  Add,
  Edit(TaskId)
}

/// What a validated editor submit asks the
/// backend to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
  Create(TaskCreate),
  Update(TaskId, TaskPatch)
}

#[derive(
  Debug, Clone, PartialEq, Eq, Default,
)]
enum EditorState {
  #[default]
  Closed,
  Open {
    mode:        EditorMode,
    form:        TaskForm,
    /// Due field as first shown; an edit
    /// leaves the stored date alone while
    /// the field still holds this.
    initial_due: String
  }
}

/// The add/edit task dialog.
#[derive(
  Debug, Clone, PartialEq, Eq, Default,
)]
pub struct TaskEditor {
  state: EditorState
}

impl TaskEditor {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_open(&self) -> bool {
    matches!(
      self.state,
      EditorState::Open { .. }
    )
  }

  pub fn mode(&self) -> Option<EditorMode> {
    match &self.state {
      | EditorState::Open {
        mode, ..
      } => Some(*mode),
      | EditorState::Closed => None
    }
  }

  pub fn heading(
    &self
  ) -> Option<&'static str> {
    self.mode().map(|mode| match mode {
      | EditorMode::Add => "Add New Task",
      | EditorMode::Edit(_) => "Edit Task"
    })
  }

  pub fn form(&self) -> Option<&TaskForm> {
    match &self.state {
      | EditorState::Open {
        form, ..
      } => Some(form),
      | EditorState::Closed => None
    }
  }

  pub fn form_mut(
    &mut self
  ) -> Option<&mut TaskForm> {
    match &mut self.state {
      | EditorState::Open {
        form, ..
      } => Some(form),
      | EditorState::Closed => None
    }
  }

  /// Field that takes focus while open.
  pub fn focus(&self) -> Option<FormField> {
    self
      .is_open()
      .then_some(FormField::Title)
  }

  pub fn open_add(&mut self) {
    debug!("opening add-task editor");
    self.state = EditorState::Open {
      mode:        EditorMode::Add,
      form:        TaskForm::default(),
      initial_due: String::new()
    };
  }

  pub fn open_edit(
    &mut self,
    task: &Task,
    zone: ViewerZone
  ) {
    debug!(task_id = task.id, "opening edit-task editor");
    let form =
      TaskForm::from_task(task, zone);
    self.state = EditorState::Open {
      mode: EditorMode::Edit(task.id),
      initial_due: form.due_date.clone(),
      form
    };
  }

  /// Returns whether the editor was open.
  pub fn close(
    &mut self,
    reason: CloseReason
  ) -> bool {
    let was_open = self.is_open();
    if was_open {
      info!(?reason, "task editor closed");
    }
    self.state = EditorState::Closed;
    was_open
  }

  /// Validate the form without closing.
  ///
  /// Edits send every field the form shows.
  /// The due date is only sent once the
  /// field differs from what it opened
  /// with, so a stored date the editor
  /// could not show survives a save.
  pub fn prepare(
    &self,
    zone: ViewerZone
  ) -> Result<Submission, ClientError> {
    let EditorState::Open {
      mode,
      form,
      initial_due
    } = &self.state
    else {
      return Err(ClientError::validation(
        "The task editor is not open"
      ));
    };

    let values = form.normalized(zone)?;
    Ok(match mode {
      | EditorMode::Add => {
        Submission::Create(values)
      }
      | EditorMode::Edit(id) => {
        Submission::Update(*id, TaskPatch {
          title:       Some(values.title),
          description: Some(
            values.description
          ),
          category:    Some(values.category),
          priority:    Some(values.priority),
          due_date:    (form.due_date.trim()
            != initial_due.trim())
          .then_some(values.due_date),
          completed:   None
        })
      }
    })
  }
}

/// The delete confirmation dialog.
#[derive(
  Debug, Clone, PartialEq, Eq, Default,
)]
pub struct DeleteConfirm {
  target: Option<TaskId>
}

impl DeleteConfirm {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn open(&mut self, id: TaskId) {
    debug!(task_id = id, "asking for delete confirmation");
    self.target = Some(id);
  }

  pub fn is_open(&self) -> bool {
    self.target.is_some()
  }

  pub fn pending(&self) -> Option<TaskId> {
    self.target
  }

  pub fn message(
    &self
  ) -> Option<&'static str> {
    self.target.map(|_| DELETE_PROMPT)
  }

  pub fn close(
    &mut self,
    reason: CloseReason
  ) -> bool {
    let was_open = self.target.take();
    if let Some(id) = was_open {
      info!(task_id = id, ?reason, "delete confirmation closed");
    }
    was_open.is_some()
  }
}
