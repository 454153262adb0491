//! Application orchestration — views, request jobs, event loop plumbing, and
//! input handling.

pub mod columns;
pub mod event;
pub mod fetch_runtime;
pub mod handler;
pub mod list_view;
pub mod state;
