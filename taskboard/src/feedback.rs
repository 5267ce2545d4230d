//! User-facing acknowledgments.
//!
//! Every collaborator outcome ends as exactly one [`Acknowledgment`]; errors
//! are never propagated past the form or board that caught them.

use std::fmt;

use crate::api::ApiError;

pub const TASK_CREATED: &str = "Task cadastrada com sucesso!";
pub const USER_CREATED: &str = "Usuário cadastrado com sucesso!";
pub const TASK_UPDATED: &str = "Tarefa atualizada com sucesso!";
pub const STATUS_UPDATED: &str = "Status atualizado com sucesso!";
pub const TASK_DELETED: &str = "Tarefa excluída com sucesso!";
pub const TASK_LOAD_FAILED: &str = "Erro ao carregar tarefa";
pub const CONNECTION_FAILED: &str = "Erro de conexão com o servidor.";

const FALLBACK_DETAIL: &str = "Verifique os dados";

/// Whether an acknowledgment reports success or failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckKind {
    Success,
    Error,
}

/// A one-shot message shown to the user after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acknowledgment {
    pub kind: AckKind,
    pub message: String,
}

impl Acknowledgment {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: AckKind::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: AckKind::Error,
            message: message.into(),
        }
    }

    /// Converts a collaborator failure into its acknowledgment.
    ///
    /// Network failures get the connectivity message; rejections show
    /// `Erro: <detail>` with a generic fallback when there is no detail.
    #[must_use]
    pub fn from_api_error(err: &ApiError) -> Self {
        if err.is_network() {
            return Self::error(CONNECTION_FAILED);
        }
        let detail = err.detail().unwrap_or(FALLBACK_DETAIL);
        Self::error(format!("Erro: {detail}"))
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.kind, AckKind::Success)
    }
}

impl fmt::Display for Acknowledgment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
