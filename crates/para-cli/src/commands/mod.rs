//! Command implementations for para-cli

pub mod datapoints;
pub mod health;
pub mod project;
pub mod set;
pub mod show;
pub mod tree;
pub mod types;

pub use datapoints::datapoints;
pub use health::health;
pub use project::{project, select_project};
pub use set::set;
pub use show::show;
pub use tree::tree;
pub use types::types;

use anyhow::{Context, Result};
use para_core::DpePath;
use para_store::{Catalog, ResolvedDpe};

/// Resolve a `Datapoint.element` name or fail with a readable error
pub(crate) fn resolve_dpe(catalog: &Catalog, dpe: &str) -> Result<ResolvedDpe> {
    let path = DpePath::parse(dpe)?;
    catalog
        .resolve(&path)?
        .with_context(|| format!("Datapoint element not found: {}", dpe))
}
