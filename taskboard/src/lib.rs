//! `TaskBoard`: client for a kanban task service.
//!
//! Validates and normalizes form input before it reaches the service, drives
//! form submissions through an explicit submitting state, and keeps a board
//! of status columns reconciled with the service by re-fetching after every
//! mutation.

pub mod api;
pub mod board;
pub mod config;
pub mod feedback;
pub mod forms;
pub mod validation;
