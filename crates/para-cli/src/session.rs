//! Connection to one project: catalog plus control service client

use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};

use anyhow::{bail, Context, Result};
use para_client::McpClient;
use para_core::project::{is_project_dir, sqlite_dir, ProjectSource, Subscription, IDENT_DB};
use para_store::{Catalog, CatalogCounts};
use tracing::{info, warn};

/// Owns the catalog and the client and reconnects both on project changes
pub struct Session {
    catalog: Catalog,
    client: McpClient,
    changes: Option<(Subscription, Receiver<Option<PathBuf>>)>,
}

impl Session {
    pub fn new() -> Result<Self> {
        Ok(Self {
            catalog: Catalog::new(),
            client: McpClient::new().context("Failed to create control service client")?,
            changes: None,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn client(&self) -> &McpClient {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut McpClient {
        &mut self.client
    }

    /// Open `project` and point the client at its control service.
    ///
    /// Whatever was connected before is dropped first. The health probe is
    /// advisory; an unreachable service does not fail the connection.
    pub async fn connect(&mut self, project: &Path) -> Result<CatalogCounts> {
        self.disconnect();

        if !is_project_dir(project) {
            bail!(
                "{} not found at {}",
                IDENT_DB,
                sqlite_dir(project).display()
            );
        }

        self.catalog
            .open(project)
            .with_context(|| format!("Failed to open project {}", project.display()))?;
        let counts = match self.catalog.counts() {
            Ok(counts) => counts,
            Err(e) => {
                self.catalog.close();
                return Err(e).context("Failed to read project stores");
            }
        };
        info!(
            project = %project.display(),
            types = counts.dp_types,
            datapoints = counts.datapoints,
            "Connected"
        );

        if self.client.configure(project) {
            self.client.check_health().await;
        }
        Ok(counts)
    }

    /// Close the catalog and forget the endpoint
    pub fn disconnect(&mut self) {
        self.catalog.close();
        self.client.reset();
    }

    /// Follow project changes announced by `source`.
    ///
    /// Notifications are queued and applied by
    /// [`Session::apply_pending_changes`]. A previous attachment is dropped.
    pub fn attach(&mut self, source: &dyn ProjectSource) {
        let (tx, rx) = channel();
        let subscription = source.on_project_changed(Box::new(move |project| {
            let _ = tx.send(project.map(Path::to_path_buf));
        }));
        self.changes = Some((subscription, rx));
    }

    /// Stop following project changes
    pub fn detach(&mut self) {
        self.changes = None;
    }

    /// Reconnect for every queued project change; returns how many were applied
    pub async fn apply_pending_changes(&mut self) -> usize {
        let pending: Vec<Option<PathBuf>> = match &self.changes {
            Some((_, rx)) => rx.try_iter().collect(),
            None => return 0,
        };

        for project in &pending {
            match project {
                Some(path) => {
                    if let Err(e) = self.connect(path).await {
                        warn!(project = %path.display(), error = %format!("{:#}", e), "Reconnect failed");
                    }
                }
                None => {
                    info!("Project cleared");
                    self.disconnect();
                }
            }
        }
        pending.len()
    }
}
