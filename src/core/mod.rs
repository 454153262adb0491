//! Core pieces – record types, typed errors, and the HTTP transport.
//!
//! Nothing in this module depends on any TUI or rendering crate.
//! Every type is `Send + Sync` so it can cross into request threads.

pub mod error;
pub mod record;
pub mod transport;
