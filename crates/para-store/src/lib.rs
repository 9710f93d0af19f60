//! para-store - Type catalog over a WinCC OA project's SQLite stores
//!
//! Three stores live under `<project>/db/wincc_oa/sqlite/` and are opened
//! read-only as one unit:
//!
//! - `ident.sqlite`: types, elements, datapoints, display names, units
//! - `config.sqlite`: address, alert, archive, range, smoothing, distribution
//! - `last_value.sqlite`: last known values
//!
//! ```rust,no_run
//! use para_store::Catalog;
//!
//! # fn main() -> para_store::StoreResult<()> {
//! let mut catalog = Catalog::new();
//! catalog.open("/opt/projects/Demo")?;
//! for dpt in catalog.dp_types()? {
//!     println!("{}", dpt.canonical_name);
//! }
//! # Ok(())
//! # }
//! ```

mod browse;
mod catalog;
mod error;
mod rows;

pub use browse::{ResolvedDpe, TreeNode};
pub use catalog::{Catalog, CatalogCounts};
pub use error::{StoreError, StoreResult};
