//! In-memory collaborator for testing.
//!
//! Keeps users and tasks in a [`parking_lot::Mutex`], assigns ids the way the
//! service does, and records every call so tests can assert on the exact
//! requests a controller issued. Failures are injected with
//! [`LoopbackCollaborator::fail_next`].

use std::collections::VecDeque;

use parking_lot::Mutex;
use taskboard_proto::task::{NewTask, Task, TaskId, TaskPatch};
use taskboard_proto::user::{NewUser, User, UserId, UserSummary};

use super::{ApiError, Collaborator};

/// A request the loopback received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    ListUsers,
    ListTasks,
    GetTask(TaskId),
    CreateTask(NewTask),
    UpdateTask(TaskId, TaskPatch),
    DeleteTask(TaskId),
    CreateUser(NewUser),
}

impl RecordedCall {
    /// `METHOD /path` form of the call, as the HTTP collaborator would send it.
    #[must_use]
    pub fn route(&self) -> String {
        match self {
            Self::ListUsers => "GET /user/".to_string(),
            Self::ListTasks => "GET /task/".to_string(),
            Self::GetTask(id) => format!("GET /task/{id}"),
            Self::CreateTask(_) => "POST /task/".to_string(),
            Self::UpdateTask(id, _) => format!("PATCH /task/{id}"),
            Self::DeleteTask(id) => format!("DELETE /task/{id}"),
            Self::CreateUser(_) => "POST /user/".to_string(),
        }
    }

    /// Returns `true` for calls that change server state.
    #[must_use]
    pub const fn is_mutation(&self) -> bool {
        matches!(
            self,
            Self::CreateTask(_) | Self::UpdateTask(..) | Self::DeleteTask(_) | Self::CreateUser(_)
        )
    }
}

#[derive(Debug, Default)]
struct Store {
    users: Vec<User>,
    tasks: Vec<Task>,
    next_user_id: u64,
    next_task_id: u64,
    calls: Vec<RecordedCall>,
    failures: VecDeque<ApiError>,
}

impl Store {
    fn task_mut(&mut self, id: TaskId) -> Result<&mut Task, ApiError> {
        self.tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(task_not_found)
    }
}

fn task_not_found() -> ApiError {
    ApiError::Rejected {
        status: 404,
        detail: Some("Tarefa não encontrada".to_string()),
    }
}

/// In-memory [`Collaborator`].
#[derive(Debug)]
pub struct LoopbackCollaborator {
    store: Mutex<Store>,
}

impl Default for LoopbackCollaborator {
    fn default() -> Self {
        Self::new()
    }
}

impl LoopbackCollaborator {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: Mutex::new(Store {
                next_user_id: 1,
                next_task_id: 1,
                ..Store::default()
            }),
        }
    }

    /// Seeds the store with users. Ids continue after the highest seeded id.
    #[must_use]
    pub fn with_users(self, users: impl IntoIterator<Item = User>) -> Self {
        {
            let mut store = self.store.lock();
            store.users.extend(users);
            let max = store.users.iter().map(|u| u.id.get()).max().unwrap_or(0);
            store.next_user_id = store.next_user_id.max(max + 1);
        }
        self
    }

    /// Seeds the store with tasks, in list order.
    #[must_use]
    pub fn with_tasks(self, tasks: impl IntoIterator<Item = Task>) -> Self {
        {
            let mut store = self.store.lock();
            store.tasks.extend(tasks);
            let max = store.tasks.iter().map(|t| t.id.get()).max().unwrap_or(0);
            store.next_task_id = store.next_task_id.max(max + 1);
        }
        self
    }

    /// Makes the next call fail with `error`. Queued failures are consumed in
    /// order, one per call.
    pub fn fail_next(&self, error: ApiError) {
        self.store.lock().failures.push_back(error);
    }

    /// All calls received so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.store.lock().calls.clone()
    }

    /// Number of calls that would have changed server state.
    #[must_use]
    pub fn mutation_count(&self) -> usize {
        self.store.lock().calls.iter().filter(|c| c.is_mutation()).count()
    }

    /// Forgets recorded calls, keeping the stored data.
    pub fn clear_calls(&self) {
        self.store.lock().calls.clear();
    }

    /// Snapshot of the stored tasks.
    #[must_use]
    pub fn tasks(&self) -> Vec<Task> {
        self.store.lock().tasks.clone()
    }

    /// Snapshot of the stored users.
    #[must_use]
    pub fn users(&self) -> Vec<User> {
        self.store.lock().users.clone()
    }

    /// Replaces a stored task directly, bypassing call recording.
    ///
    /// Simulates a change made by another client.
    pub fn put_task(&self, task: Task) {
        let mut store = self.store.lock();
        match store.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(existing) => *existing = task,
            None => store.tasks.push(task),
        }
    }

    /// Records `call` and runs `op` against the store unless a failure is
    /// queued.
    fn handle<T>(
        &self,
        call: RecordedCall,
        op: impl FnOnce(&mut Store) -> Result<T, ApiError>,
    ) -> Result<T, ApiError> {
        let mut store = self.store.lock();
        tracing::debug!(route = %call.route(), "loopback call");
        store.calls.push(call);
        if let Some(error) = store.failures.pop_front() {
            return Err(error);
        }
        op(&mut store)
    }
}

impl Collaborator for LoopbackCollaborator {
    async fn list_users(&self) -> Result<Vec<UserSummary>, ApiError> {
        self.handle(RecordedCall::ListUsers, |store| {
            Ok(store.users.iter().map(UserSummary::from).collect())
        })
    }

    async fn list_tasks(&self) -> Result<Vec<Task>, ApiError> {
        self.handle(RecordedCall::ListTasks, |store| Ok(store.tasks.clone()))
    }

    async fn get_task(&self, id: TaskId) -> Result<Task, ApiError> {
        self.handle(RecordedCall::GetTask(id), |store| {
            store.task_mut(id).map(|t| t.clone())
        })
    }

    async fn create_task(&self, task: &NewTask) -> Result<Task, ApiError> {
        self.handle(RecordedCall::CreateTask(task.clone()), |store| {
            if !store.users.is_empty() && !store.users.iter().any(|u| u.id == task.user) {
                return Err(ApiError::Rejected {
                    status: 400,
                    detail: Some("Usuário não encontrado".to_string()),
                });
            }
            let created = Task {
                id: TaskId::new(store.next_task_id),
                description: task.description.clone(),
                name_class: task.name_class.clone(),
                priority: task.priority,
                status: task.status,
                user: task.user,
                register_date: task.register_date,
                update_date: None,
            };
            store.next_task_id += 1;
            store.tasks.push(created.clone());
            Ok(created)
        })
    }

    async fn update_task(&self, id: TaskId, patch: &TaskPatch) -> Result<Task, ApiError> {
        self.handle(RecordedCall::UpdateTask(id, patch.clone()), |store| {
            let task = store.task_mut(id)?;
            patch.apply_to(task);
            Ok(task.clone())
        })
    }

    async fn delete_task(&self, id: TaskId) -> Result<(), ApiError> {
        self.handle(RecordedCall::DeleteTask(id), |store| {
            let index = store
                .tasks
                .iter()
                .position(|t| t.id == id)
                .ok_or_else(task_not_found)?;
            store.tasks.remove(index);
            Ok(())
        })
    }

    async fn create_user(&self, user: &NewUser) -> Result<User, ApiError> {
        self.handle(RecordedCall::CreateUser(user.clone()), |store| {
            if store.users.iter().any(|u| u.email == user.email) {
                return Err(ApiError::Rejected {
                    status: 400,
                    detail: Some("Email já cadastrado".to_string()),
                });
            }
            let created = User {
                id: UserId::new(store.next_user_id),
                name: user.name.clone(),
                email: user.email.clone(),
                phone: user.phone.clone(),
            };
            store.next_user_id += 1;
            store.users.push(created.clone());
            Ok(created)
        })
    }
}
