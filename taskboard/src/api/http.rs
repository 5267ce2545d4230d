//! REST/JSON collaborator over `reqwest`.
//!
//! Bodies go through [`taskboard_proto::codec`]; non-2xx responses surface
//! as [`ApiError::Rejected`] carrying the error body's `detail`.

use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use taskboard_proto::codec;
use taskboard_proto::task::{NewTask, Task, TaskId, TaskPatch};
use taskboard_proto::user::{NewUser, User, UserSummary};
use url::Url;

use super::{ApiError, Collaborator};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const JSON: &str = "application/json";

/// Collaborator backed by the task service's REST endpoints.
#[derive(Debug, Clone)]
pub struct HttpCollaborator {
    client: Client,
    base_url: Url,
}

impl HttpCollaborator {
    /// Creates a collaborator rooted at `base_url` (e.g.
    /// `http://127.0.0.1:8000/api/v1/`).
    ///
    /// A missing trailing slash is added so that relative routes resolve
    /// beneath the base path.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Network`] if the HTTP client cannot be built.
    pub fn new(mut base_url: Url, timeout: Duration) -> Result<Self, ApiError> {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(Self { client, base_url })
    }

    /// The normalized base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn route(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::Network(format!("invalid route {path}: {e}")))
    }

    async fn call<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T, ApiError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let bytes = self.send(method, path, body).await?;
        Ok(codec::decode(&bytes)?)
    }

    async fn send<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Vec<u8>, ApiError>
    where
        B: Serialize + Sync,
    {
        let url = self.route(path)?;
        tracing::debug!(%method, %url, "sending request");

        let mut request = self.client.request(method.clone(), url).header(ACCEPT, JSON);
        if let Some(body) = body {
            request = request.header(CONTENT_TYPE, JSON).body(codec::encode(body)?);
        }

        let response = request.send().await.map_err(network_error)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(network_error)?;
        tracing::debug!(
            %method,
            path,
            status = status.as_u16(),
            len = bytes.len(),
            "response received"
        );

        if !status.is_success() {
            return Err(rejected(status, &bytes));
        }
        Ok(bytes.to_vec())
    }
}

fn network_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Network("request timed out".to_string())
    } else {
        ApiError::Network(err.to_string())
    }
}

fn rejected(status: StatusCode, body: &[u8]) -> ApiError {
    ApiError::Rejected {
        status: status.as_u16(),
        detail: codec::decode_error_detail(body),
    }
}

impl Collaborator for HttpCollaborator {
    async fn list_users(&self) -> Result<Vec<UserSummary>, ApiError> {
        self.call::<(), _>(Method::GET, "user/", None).await
    }

    async fn list_tasks(&self) -> Result<Vec<Task>, ApiError> {
        self.call::<(), _>(Method::GET, "task/", None).await
    }

    async fn get_task(&self, id: TaskId) -> Result<Task, ApiError> {
        let path = format!("task/{id}");
        self.call::<(), _>(Method::GET, &path, None).await
    }

    async fn create_task(&self, task: &NewTask) -> Result<Task, ApiError> {
        self.call(Method::POST, "task/", Some(task)).await
    }

    async fn update_task(&self, id: TaskId, patch: &TaskPatch) -> Result<Task, ApiError> {
        let path = format!("task/{id}");
        self.call(Method::PATCH, &path, Some(patch)).await
    }

    async fn delete_task(&self, id: TaskId) -> Result<(), ApiError> {
        let path = format!("task/{id}");
        self.send::<()>(Method::DELETE, &path, None).await.map(drop)
    }

    async fn create_user(&self, user: &NewUser) -> Result<User, ApiError> {
        self.call(Method::POST, "user/", Some(user)).await
    }
}
