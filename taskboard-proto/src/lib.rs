//! Shared wire model for the `TaskBoard` REST collaborator.
//!
//! Tasks and users travel as JSON. Enum values use the literal tokens the
//! collaborator expects (`"todo"`, `"in_progress"`, `"mid"`, ...).

pub mod codec;
pub mod task;
pub mod user;
