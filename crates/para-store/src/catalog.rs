//! Catalog: one owned handle group over the three read-only stores

use std::path::{Path, PathBuf};

use para_core::models::*;
use para_core::project::{sqlite_dir, CONFIG_DB, IDENT_DB, LAST_VALUE_DB};
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::error::{StoreError, StoreResult};
use crate::rows::{self, DATAPOINT_COLUMNS, DP_TYPE_COLUMNS, ELEMENT_COLUMNS};

struct Stores {
    project: PathBuf,
    ident: Connection,
    config: Connection,
    last_value: Connection,
}

/// Number of types and datapoints in the open project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogCounts {
    pub dp_types: usize,
    pub datapoints: usize,
}

/// Read-only lookups against a project's identity, configuration and
/// last-value stores
///
/// All three connections are opened and closed together. Lookups on a closed
/// catalog return [`StoreError::NotOpen`]; check [`Catalog::is_open`] first.
#[derive(Default)]
pub struct Catalog {
    stores: Option<Stores>,
}

/// Open one store read-only and read its header.
///
/// Opening is lazy in SQLite, so a file that is not a database only fails on
/// first read. The schema version query forces that read here.
fn open_readonly(path: PathBuf) -> StoreResult<Connection> {
    let opened = Connection::open_with_flags(
        &path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .and_then(|conn| {
        conn.query_row("PRAGMA schema_version", [], |row| row.get::<_, i64>(0))?;
        Ok(conn)
    });
    opened.map_err(|source| StoreError::Open { path, source })
}

impl Catalog {
    /// Create a catalog with nothing open
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the stores of `project`, closing any previously open set first
    ///
    /// On failure nothing is left open.
    #[instrument(skip(self, project), fields(project = %project.as_ref().display()))]
    pub fn open(&mut self, project: impl AsRef<Path>) -> StoreResult<()> {
        self.close();

        let project = project.as_ref().to_path_buf();
        let dir = sqlite_dir(&project);
        debug!("Opening stores in {}", dir.display());

        let ident = open_readonly(dir.join(IDENT_DB))?;
        let config = open_readonly(dir.join(CONFIG_DB))?;
        let last_value = open_readonly(dir.join(LAST_VALUE_DB))?;

        info!("Opened WinCC OA stores for {}", project.display());
        self.stores = Some(Stores {
            project,
            ident,
            config,
            last_value,
        });
        Ok(())
    }

    /// Close all stores; safe to call when already closed
    pub fn close(&mut self) {
        if let Some(stores) = self.stores.take() {
            debug!("Closing stores for {}", stores.project.display());
        }
    }

    pub fn is_open(&self) -> bool {
        self.stores.is_some()
    }

    /// Project directory of the open stores
    pub fn project_path(&self) -> Option<&Path> {
        self.stores.as_ref().map(|s| s.project.as_path())
    }

    fn stores(&self) -> StoreResult<&Stores> {
        self.stores.as_ref().ok_or(StoreError::NotOpen)
    }

    // =========================================================================
    // Datapoint types
    // =========================================================================

    /// All types ordered by name
    pub fn dp_types(&self) -> StoreResult<Vec<DpType>> {
        let sql = format!(
            "SELECT {} FROM datapoint_type ORDER BY canonical_name",
            DP_TYPE_COLUMNS
        );
        let mut stmt = self.stores()?.ident.prepare_cached(&sql)?;
        let rows = stmt.query_map([], rows::dp_type)?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    pub fn dp_type(&self, dpt_id: DptId) -> StoreResult<Option<DpType>> {
        let sql = format!(
            "SELECT {} FROM datapoint_type WHERE dpt_id = ?1",
            DP_TYPE_COLUMNS
        );
        let mut stmt = self.stores()?.ident.prepare_cached(&sql)?;
        Ok(stmt.query_row(params![dpt_id], rows::dp_type).optional()?)
    }

    pub fn dp_type_by_name(&self, name: &str) -> StoreResult<Option<DpType>> {
        let sql = format!(
            "SELECT {} FROM datapoint_type WHERE canonical_name = ?1",
            DP_TYPE_COLUMNS
        );
        let mut stmt = self.stores()?.ident.prepare_cached(&sql)?;
        Ok(stmt.query_row(params![name], rows::dp_type).optional()?)
    }

    // =========================================================================
    // Elements
    // =========================================================================

    /// Every element of a type, ordered by sibling position
    pub fn elements_of_type(&self, dpt_id: DptId) -> StoreResult<Vec<DpElement>> {
        let sql = format!(
            "SELECT {} FROM datapoint_element WHERE dpt_id = ?1 ORDER BY position_in_type",
            ELEMENT_COLUMNS
        );
        let mut stmt = self.stores()?.ident.prepare_cached(&sql)?;
        let rows = stmt.query_map(params![dpt_id], rows::element)?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    pub fn element(&self, dpt_id: DptId, el_id: ElId) -> StoreResult<Option<DpElement>> {
        let sql = format!(
            "SELECT {} FROM datapoint_element WHERE dpt_id = ?1 AND el_id = ?2",
            ELEMENT_COLUMNS
        );
        let mut stmt = self.stores()?.ident.prepare_cached(&sql)?;
        Ok(stmt
            .query_row(params![dpt_id, el_id], rows::element)
            .optional()?)
    }

    /// Element of the type a datapoint belongs to
    pub fn element_of_datapoint(&self, dp_id: DpId, el_id: ElId) -> StoreResult<Option<DpElement>> {
        match self.datapoint(dp_id)? {
            Some(dp) => self.element(dp.dpt_id, el_id),
            None => Ok(None),
        }
    }

    // =========================================================================
    // Datapoints
    // =========================================================================

    /// All datapoints ordered by name
    pub fn datapoints(&self) -> StoreResult<Vec<Datapoint>> {
        let sql = format!(
            "SELECT {} FROM datapoint ORDER BY canonical_name",
            DATAPOINT_COLUMNS
        );
        let mut stmt = self.stores()?.ident.prepare_cached(&sql)?;
        let rows = stmt.query_map([], rows::datapoint)?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    pub fn datapoints_of_type(&self, dpt_id: DptId) -> StoreResult<Vec<Datapoint>> {
        let sql = format!(
            "SELECT {} FROM datapoint WHERE dpt_id = ?1 ORDER BY canonical_name",
            DATAPOINT_COLUMNS
        );
        let mut stmt = self.stores()?.ident.prepare_cached(&sql)?;
        let rows = stmt.query_map(params![dpt_id], rows::datapoint)?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    pub fn datapoint(&self, dp_id: DpId) -> StoreResult<Option<Datapoint>> {
        let sql = format!("SELECT {} FROM datapoint WHERE dp_id = ?1", DATAPOINT_COLUMNS);
        let mut stmt = self.stores()?.ident.prepare_cached(&sql)?;
        Ok(stmt.query_row(params![dp_id], rows::datapoint).optional()?)
    }

    pub fn datapoint_by_name(&self, name: &str) -> StoreResult<Option<Datapoint>> {
        let sql = format!(
            "SELECT {} FROM datapoint WHERE canonical_name = ?1",
            DATAPOINT_COLUMNS
        );
        let mut stmt = self.stores()?.ident.prepare_cached(&sql)?;
        Ok(stmt.query_row(params![name], rows::datapoint).optional()?)
    }

    /// Type and datapoint totals, for connection summaries
    pub fn counts(&self) -> StoreResult<CatalogCounts> {
        let ident = &self.stores()?.ident;
        let dp_types: i64 =
            ident.query_row("SELECT COUNT(*) FROM datapoint_type", [], |row| row.get(0))?;
        let datapoints: i64 =
            ident.query_row("SELECT COUNT(*) FROM datapoint", [], |row| row.get(0))?;
        Ok(CatalogCounts {
            dp_types: dp_types as usize,
            datapoints: datapoints as usize,
        })
    }

    // =========================================================================
    // Display names and units
    // =========================================================================

    pub fn display_name(&self, dp_id: DpId, el_id: ElId) -> StoreResult<Option<DisplayName>> {
        let mut stmt = self.stores()?.ident.prepare_cached(
            "SELECT language_id, text FROM display_name \
             WHERE dp_id = ?1 AND el_id = ?2 ORDER BY language_id LIMIT 1",
        )?;
        Ok(stmt
            .query_row(params![dp_id, el_id], rows::display_name)
            .optional()?)
    }

    pub fn unit_and_format(&self, dp_id: DpId, el_id: ElId) -> StoreResult<Option<UnitAndFormat>> {
        let mut stmt = self.stores()?.ident.prepare_cached(
            "SELECT language_id, unit, format FROM unit_and_format \
             WHERE dp_id = ?1 AND el_id = ?2 ORDER BY language_id LIMIT 1",
        )?;
        Ok(stmt
            .query_row(params![dp_id, el_id], rows::unit_and_format)
            .optional()?)
    }

    // =========================================================================
    // Configs
    // =========================================================================

    pub fn address(&self, dp_id: DpId, el_id: ElId) -> StoreResult<Option<AddressConfig>> {
        let mut stmt = self
            .stores()?
            .config
            .prepare_cached("SELECT * FROM address WHERE dp_id = ?1 AND el_id = ?2")?;
        Ok(stmt
            .query_row(params![dp_id, el_id], rows::address)
            .optional()?)
    }

    pub fn alert_hdl(&self, dp_id: DpId, el_id: ElId) -> StoreResult<Option<AlertHdlConfig>> {
        let mut stmt = self
            .stores()?
            .config
            .prepare_cached("SELECT * FROM alert_hdl WHERE dp_id = ?1 AND el_id = ?2")?;
        Ok(stmt
            .query_row(params![dp_id, el_id], rows::alert_hdl)
            .optional()?)
    }

    /// Alert ranges ordered by detail number; empty when none are configured
    pub fn alert_hdl_details(&self, dp_id: DpId, el_id: ElId) -> StoreResult<Vec<AlertHdlDetail>> {
        let mut stmt = self.stores()?.config.prepare_cached(
            "SELECT * FROM alert_hdl_detail WHERE dp_id = ?1 AND el_id = ?2 ORDER BY detail_nr",
        )?;
        let rows = stmt.query_map(params![dp_id, el_id], rows::alert_hdl_detail)?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    pub fn archive(&self, dp_id: DpId, el_id: ElId) -> StoreResult<Option<ArchiveConfig>> {
        let mut stmt = self
            .stores()?
            .config
            .prepare_cached("SELECT * FROM archive WHERE dp_id = ?1 AND el_id = ?2")?;
        Ok(stmt
            .query_row(params![dp_id, el_id], rows::archive)
            .optional()?)
    }

    /// First archive detail by detail number
    pub fn archive_detail(&self, dp_id: DpId, el_id: ElId) -> StoreResult<Option<ArchiveDetail>> {
        let mut stmt = self.stores()?.config.prepare_cached(
            "SELECT * FROM archive_detail WHERE dp_id = ?1 AND el_id = ?2 ORDER BY detail_nr LIMIT 1",
        )?;
        Ok(stmt
            .query_row(params![dp_id, el_id], rows::archive_detail)
            .optional()?)
    }

    pub fn pv_range(&self, dp_id: DpId, el_id: ElId) -> StoreResult<Option<PvRangeConfig>> {
        let mut stmt = self
            .stores()?
            .config
            .prepare_cached("SELECT * FROM pv_range WHERE dp_id = ?1 AND el_id = ?2")?;
        Ok(stmt
            .query_row(params![dp_id, el_id], rows::pv_range)
            .optional()?)
    }

    pub fn smooth(&self, dp_id: DpId, el_id: ElId) -> StoreResult<Option<SmoothConfig>> {
        let mut stmt = self
            .stores()?
            .config
            .prepare_cached("SELECT * FROM smooth WHERE dp_id = ?1 AND el_id = ?2")?;
        Ok(stmt
            .query_row(params![dp_id, el_id], rows::smooth)
            .optional()?)
    }

    pub fn distrib(&self, dp_id: DpId, el_id: ElId) -> StoreResult<Option<DistribConfig>> {
        let mut stmt = self
            .stores()?
            .config
            .prepare_cached("SELECT * FROM distrib WHERE dp_id = ?1 AND el_id = ?2")?;
        Ok(stmt
            .query_row(params![dp_id, el_id], rows::distrib)
            .optional()?)
    }

    // =========================================================================
    // Last values
    // =========================================================================

    /// Last value at array index 0 in the default language
    pub fn last_value(&self, dp_id: DpId, el_id: ElId) -> StoreResult<Option<LastValue>> {
        let mut stmt = self.stores()?.last_value.prepare_cached(
            "SELECT * FROM last_value \
             WHERE dp_id = ?1 AND el_id = ?2 AND dyn_idx = 0 AND language_id = 0",
        )?;
        Ok(stmt
            .query_row(params![dp_id, el_id], rows::last_value)
            .optional()?)
    }

    /// Every configuration section of one element
    #[instrument(skip(self))]
    pub fn configs(&self, dp_id: DpId, el_id: ElId) -> StoreResult<DpeConfigs> {
        Ok(DpeConfigs {
            dp_id,
            el_id,
            address: self.address(dp_id, el_id)?,
            alert_hdl: self.alert_hdl(dp_id, el_id)?,
            alert_hdl_details: self.alert_hdl_details(dp_id, el_id)?,
            archive: self.archive(dp_id, el_id)?,
            archive_detail: self.archive_detail(dp_id, el_id)?,
            pv_range: self.pv_range(dp_id, el_id)?,
            smooth: self.smooth(dp_id, el_id)?,
            distrib: self.distrib(dp_id, el_id)?,
            last_value: self.last_value(dp_id, el_id)?,
            display_name: self.display_name(dp_id, el_id)?,
            unit_and_format: self.unit_and_format(dp_id, el_id)?,
        })
    }
}

impl Drop for Catalog {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_catalog_is_closed() {
        let catalog = Catalog::new();
        assert!(!catalog.is_open());
        assert!(catalog.project_path().is_none());
        assert!(matches!(catalog.dp_types(), Err(StoreError::NotOpen)));
        assert!(matches!(catalog.configs(1, 1), Err(StoreError::NotOpen)));
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut catalog = Catalog::new();
        catalog.close();
        catalog.close();
        assert!(!catalog.is_open());
    }

    #[test]
    fn test_open_missing_project_fails_closed() {
        let mut catalog = Catalog::new();
        let err = catalog.open("/nonexistent/winccoa/project").unwrap_err();
        match err {
            StoreError::Open { path, .. } => assert!(path.ends_with("ident.sqlite")),
            other => panic!("unexpected error: {other}"),
        }
        assert!(!catalog.is_open());
    }
}
