//! Project discovery
//!
//! First hit wins: explicit selection (`--project`, then the saved
//! `project_path`), then an attached [`ProjectSource`], then a scan of the
//! workspace roots for a directory holding the identity store.

use std::path::{Path, PathBuf};

use para_core::project::{is_project_dir, ProjectSource};
use serde::Serialize;
use tracing::debug;

/// Where a project directory came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectOrigin {
    Argument,
    Saved,
    Source,
    Workspace,
}

impl std::fmt::Display for ProjectOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Argument => "command line",
            Self::Saved => "saved setting",
            Self::Source => "project source",
            Self::Workspace => "workspace scan",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Discovered {
    pub path: PathBuf,
    pub origin: ProjectOrigin,
}

/// Inputs to [`discover`], in precedence order
#[derive(Default)]
pub struct Discovery<'a> {
    pub explicit: Option<&'a Path>,
    pub saved: Option<&'a Path>,
    pub source: Option<&'a dyn ProjectSource>,
    pub workspace_roots: &'a [PathBuf],
}

impl<'a> Discovery<'a> {
    /// Resolve the project directory.
    ///
    /// Explicit selections are returned as-is even when they do not hold a
    /// project; connecting reports that.
    pub fn discover(&self) -> Option<Discovered> {
        let found = |path: &Path, origin| Discovered {
            path: path.to_path_buf(),
            origin,
        };

        if let Some(path) = self.explicit.filter(|p| !p.as_os_str().is_empty()) {
            return Some(found(path, ProjectOrigin::Argument));
        }
        if let Some(path) = self.saved.filter(|p| !p.as_os_str().is_empty()) {
            return Some(found(path, ProjectOrigin::Saved));
        }
        if let Some(path) = self.source.and_then(|s| s.current_project()) {
            return Some(found(&path, ProjectOrigin::Source));
        }

        let hit = self.workspace_roots.iter().find(|root| {
            let is_project = is_project_dir(root);
            debug!(root = %root.display(), is_project, "Scanned workspace root");
            is_project
        })?;
        Some(found(hit, ProjectOrigin::Workspace))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use para_core::project::{sqlite_dir, IDENT_DB};
    use para_core::ProjectChannel;
    use pretty_assertions::assert_eq;

    fn make_project(dir: &Path) {
        let sqlite = sqlite_dir(dir);
        std::fs::create_dir_all(&sqlite).unwrap();
        std::fs::write(sqlite.join(IDENT_DB), b"").unwrap();
    }

    #[test]
    fn test_nothing_found() {
        assert_eq!(Discovery::default().discover(), None);
    }

    #[test]
    fn test_explicit_wins() {
        let channel = ProjectChannel::new();
        channel.set_project(Some(PathBuf::from("/from/source")));

        let discovery = Discovery {
            explicit: Some(Path::new("/from/arg")),
            saved: Some(Path::new("/from/config")),
            source: Some(&channel),
            workspace_roots: &[],
        };
        let found = discovery.discover().unwrap();
        assert_eq!(found.path, PathBuf::from("/from/arg"));
        assert_eq!(found.origin, ProjectOrigin::Argument);
    }

    #[test]
    fn test_saved_before_source() {
        let channel = ProjectChannel::new();
        channel.set_project(Some(PathBuf::from("/from/source")));

        let discovery = Discovery {
            saved: Some(Path::new("/from/config")),
            source: Some(&channel),
            ..Default::default()
        };
        assert_eq!(discovery.discover().unwrap().origin, ProjectOrigin::Saved);
    }

    #[test]
    fn test_source_before_workspace() {
        let workspace = tempfile::tempdir().unwrap();
        make_project(workspace.path());
        let roots = vec![workspace.path().to_path_buf()];

        let channel = ProjectChannel::new();
        let discovery = Discovery {
            source: Some(&channel),
            workspace_roots: &roots,
            ..Default::default()
        };
        // Source has no project yet
        assert_eq!(discovery.discover().unwrap().origin, ProjectOrigin::Workspace);

        channel.set_project(Some(PathBuf::from("/from/source")));
        let found = discovery.discover().unwrap();
        assert_eq!(found.origin, ProjectOrigin::Source);
        assert_eq!(found.path, PathBuf::from("/from/source"));
    }

    #[test]
    fn test_workspace_scan_skips_non_projects() {
        let plain = tempfile::tempdir().unwrap();
        let project = tempfile::tempdir().unwrap();
        make_project(project.path());
        let roots = vec![plain.path().to_path_buf(), project.path().to_path_buf()];

        let discovery = Discovery {
            workspace_roots: &roots,
            ..Default::default()
        };
        assert_eq!(discovery.discover().unwrap().path, project.path());
    }

    #[test]
    fn test_empty_explicit_ignored() {
        let discovery = Discovery {
            explicit: Some(Path::new("")),
            saved: Some(Path::new("/from/config")),
            ..Default::default()
        };
        assert_eq!(discovery.discover().unwrap().origin, ProjectOrigin::Saved);
    }
}
