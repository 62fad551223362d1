//! Use-case services over model and repository layers.
//!
//! # Responsibility
//! - Orchestrate draft, countdown and archive into sessions.
//! - Derive history views for calendar and list presentation.

pub mod history_service;
pub mod session_service;
