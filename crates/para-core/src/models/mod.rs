//! Read-only data models mirrored from the WinCC OA SQLite stores

mod config;
mod element_type;
mod structure;

pub use config::*;
pub use element_type::*;
pub use structure::*;
