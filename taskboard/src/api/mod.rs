//! The remote task service, seen from the client.
//!
//! Defines the [`Collaborator`] trait that every backend must satisfy.
//! Implementations:
//! - [`http::HttpCollaborator`]: REST/JSON over `reqwest`
//! - [`loopback::LoopbackCollaborator`]: in-memory store for testing

pub mod http;
pub mod loopback;

use std::future::Future;
use std::sync::Arc;

use taskboard_proto::codec::CodecError;
use taskboard_proto::task::{NewTask, Task, TaskId, TaskPatch};
use taskboard_proto::user::{NewUser, User, UserSummary};

/// Errors returned by collaborator calls.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// No response arrived: connection refused, reset, or timed out.
    #[error("network error: {0}")]
    Network(String),

    /// The service answered with a non-2xx status.
    #[error("request rejected with status {status}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// The `detail` field of the error body, when present.
        detail: Option<String>,
    },

    /// A 2xx response whose body could not be decoded.
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// Returns `true` for errors where the service never answered.
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// The service-provided detail, if any.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Rejected { detail, .. } => detail.as_deref(),
            Self::Network(_) | Self::Decode(_) => None,
        }
    }
}

impl From<CodecError> for ApiError {
    fn from(err: CodecError) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Async CRUD seam over the task service.
///
/// Every method is a single request. Implementations never retry.
pub trait Collaborator: Send + Sync {
    /// `GET /user/`
    fn list_users(&self) -> impl Future<Output = Result<Vec<UserSummary>, ApiError>> + Send;

    /// `GET /task/`
    fn list_tasks(&self) -> impl Future<Output = Result<Vec<Task>, ApiError>> + Send;

    /// `GET /task/{id}`
    fn get_task(&self, id: TaskId) -> impl Future<Output = Result<Task, ApiError>> + Send;

    /// `POST /task/`
    fn create_task(
        &self,
        task: &NewTask,
    ) -> impl Future<Output = Result<Task, ApiError>> + Send;

    /// `PATCH /task/{id}`
    fn update_task(
        &self,
        id: TaskId,
        patch: &TaskPatch,
    ) -> impl Future<Output = Result<Task, ApiError>> + Send;

    /// `DELETE /task/{id}`. The response body is ignored.
    fn delete_task(&self, id: TaskId) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// `POST /user/`
    fn create_user(&self, user: &NewUser) -> impl Future<Output = Result<User, ApiError>> + Send;
}

impl<C: Collaborator> Collaborator for Arc<C> {
    fn list_users(&self) -> impl Future<Output = Result<Vec<UserSummary>, ApiError>> + Send {
        (**self).list_users()
    }

    fn list_tasks(&self) -> impl Future<Output = Result<Vec<Task>, ApiError>> + Send {
        (**self).list_tasks()
    }

    fn get_task(&self, id: TaskId) -> impl Future<Output = Result<Task, ApiError>> + Send {
        (**self).get_task(id)
    }

    fn create_task(
        &self,
        task: &NewTask,
    ) -> impl Future<Output = Result<Task, ApiError>> + Send {
        (**self).create_task(task)
    }

    fn update_task(
        &self,
        id: TaskId,
        patch: &TaskPatch,
    ) -> impl Future<Output = Result<Task, ApiError>> + Send {
        (**self).update_task(id, patch)
    }

    fn delete_task(&self, id: TaskId) -> impl Future<Output = Result<(), ApiError>> + Send {
        (**self).delete_task(id)
    }

    fn create_user(&self, user: &NewUser) -> impl Future<Output = Result<User, ApiError>> + Send {
        (**self).create_user(user)
    }
}
