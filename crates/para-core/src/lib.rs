//! para-core - Core types for browsing WinCC OA datapoint configuration
//!
//! This crate holds the read-only data model mirrored from the project's
//! SQLite stores, the element type tags, and the hierarchy builder that turns
//! a flat parent-pointer element table into an expandable tree.

pub mod error;
pub mod hierarchy;
pub mod models;
pub mod path;
pub mod project;

pub use error::{ParaError, ParaResult};
pub use hierarchy::{children, element_path, find_by_path, root_element, ElementNode};
pub use models::*;
pub use path::DpePath;
pub use project::{ProjectChangeHandler, ProjectChannel, ProjectSource, Subscription};
