//! Presentation layer and host integration for the `para` binary
//!
//! [`session::Session`] owns one project's catalog and control service
//! client. [`discovery::Discovery`] decides which project that is. Hosts
//! that track a current project attach a
//! [`ProjectSource`](para_core::ProjectSource) to the session and call
//! [`session::Session::apply_pending_changes`] to follow it.

pub mod commands;
pub mod config;
pub mod discovery;
pub mod output;
pub mod session;
