//! In-memory backend for driving sessions in tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::collections::{BTreeMap, BTreeSet, HashSet};

use taskdeck_core::api::TaskApi;
use taskdeck_core::datetime::ViewerZone;
use taskdeck_core::error::ClientError;
use taskdeck_core::notify::Notifier;
use taskdeck_core::render::CardRenderer;
use taskdeck_core::session::Session;
use taskdeck_shared::{Priority, Stats, Task, TaskCreate, TaskId, TaskPatch};

#[derive(Debug, Default)]
struct State {
    tasks: Vec<Task>,
    next_id: TaskId,
    calls: Vec<String>,
    failing: HashSet<&'static str>,
}

/// Clones share one backend, like two handles on the same server.
#[derive(Debug, Default, Clone)]
pub struct FakeApi {
    state: Rc<RefCell<State>>,
}

impl FakeApi {
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let next_id = tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        Self {
            state: Rc::new(RefCell::new(State {
                tasks,
                next_id,
                ..State::default()
            })),
        }
    }

    /// Make every later call of `op` fail with a network error.
    pub fn fail(&self, op: &'static str) {
        self.state.borrow_mut().failing.insert(op);
    }

    pub fn recover(&self, op: &'static str) {
        self.state.borrow_mut().failing.remove(op);
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.borrow().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.state.borrow().tasks.clone()
    }

    fn record(&self, op: &'static str, call: String) -> Result<(), ClientError> {
        let mut state = self.state.borrow_mut();
        state.calls.push(call);
        if state.failing.contains(op) {
            return Err(ClientError::network("connection refused"));
        }
        Ok(())
    }
}

fn not_found() -> ClientError {
    ClientError::api(Some(404), "Task not found")
}

impl TaskApi for FakeApi {
    async fn list_tasks(&self) -> Result<Vec<Task>, ClientError> {
        self.record("list_tasks", "GET /tasks".to_string())?;
        Ok(self.state.borrow().tasks.clone())
    }

    async fn get_task(&self, id: TaskId) -> Result<Task, ClientError> {
        self.record("get_task", format!("GET /tasks/{id}"))?;
        self.state
            .borrow()
            .tasks
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(not_found)
    }

    async fn list_categories(&self) -> Result<Vec<String>, ClientError> {
        self.record("list_categories", "GET /categories".to_string())?;
        let set: BTreeSet<String> = self
            .state
            .borrow()
            .tasks
            .iter()
            .map(|t| t.category.clone())
            .collect();
        Ok(set.into_iter().collect())
    }

    async fn stats(&self) -> Result<Stats, ClientError> {
        self.record("stats", "GET /stats".to_string())?;
        let state = self.state.borrow();
        let total = state.tasks.len() as u64;
        let completed = state.tasks.iter().filter(|t| t.completed).count() as u64;
        let mut priority_stats = BTreeMap::new();
        let mut category_stats = BTreeMap::new();
        for task in &state.tasks {
            *priority_stats.entry(task.priority.to_string()).or_insert(0) += 1;
            *category_stats.entry(task.category.clone()).or_insert(0) += 1;
        }
        Ok(Stats {
            total,
            completed,
            pending: total - completed,
            completion_rate: if total == 0 {
                0.0
            } else {
                completed as f64 * 100.0 / total as f64
            },
            priority_stats,
            category_stats,
        })
    }

    async fn create_task(&self, create: &TaskCreate) -> Result<Task, ClientError> {
        self.record("create_task", "POST /tasks".to_string())?;
        let mut state = self.state.borrow_mut();
        let id = state.next_id.max(1);
        state.next_id = id + 1;
        let task = Task {
            id,
            title: create.title.clone(),
            description: Some(create.description.clone()),
            category: create.category.clone(),
            priority: create.priority,
            due_date: create.due_date.clone(),
            completed: false,
            created_at: None,
        };
        state.tasks.push(task.clone());
        Ok(task)
    }

    async fn update_task(&self, id: TaskId, patch: &TaskPatch) -> Result<Task, ClientError> {
        self.record("update_task", format!("PUT /tasks/{id}"))?;
        let mut state = self.state.borrow_mut();
        let task = state
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(not_found)?;
        if let Some(title) = &patch.title {
            task.title = title.clone();
        }
        if let Some(description) = &patch.description {
            task.description = Some(description.clone());
        }
        if let Some(category) = &patch.category {
            task.category = category.clone();
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        if let Some(due_date) = &patch.due_date {
            task.due_date = due_date.clone();
        }
        if let Some(completed) = patch.completed {
            task.completed = completed;
        }
        Ok(task.clone())
    }

    async fn delete_task(&self, id: TaskId) -> Result<(), ClientError> {
        self.record("delete_task", format!("DELETE /tasks/{id}"))?;
        let mut state = self.state.borrow_mut();
        let before = state.tasks.len();
        state.tasks.retain(|t| t.id != id);
        if state.tasks.len() == before {
            return Err(not_found());
        }
        Ok(())
    }
}

pub fn task(id: TaskId, title: &str, priority: Priority, completed: bool) -> Task {
    Task {
        id,
        title: title.to_string(),
        description: None,
        category: "General".to_string(),
        priority,
        due_date: None,
        completed,
        created_at: None,
    }
}

pub fn session(api: FakeApi) -> Session<FakeApi> {
    Session::new(
        api,
        CardRenderer::new(ViewerZone::Named(chrono_tz::UTC), "%Y-%m-%d"),
        Notifier::default(),
    )
}
