//! Project command - show or select the WinCC OA project

use std::path::Path;

use anyhow::{bail, Result};
use para_core::project::{is_project_dir, sqlite_dir};

use crate::config::Config;
use crate::discovery::Discovered;
use crate::output::{or_dash, OutputContext};
use crate::session::Session;

/// Show the resolved project and connection summary
pub fn project(
    session: &Session,
    discovered: Option<&Discovered>,
    ctx: &OutputContext,
) -> Result<()> {
    let Some(discovered) = discovered else {
        ctx.warn("No WinCC OA project found. Use `para project --select <DIR>`.");
        return Ok(());
    };

    let catalog = session.catalog();
    let counts = if catalog.is_open() {
        Some(catalog.counts()?)
    } else {
        None
    };
    let client = session.client();

    let pairs = vec![
        ("Project", discovered.path.display().to_string()),
        ("Source", discovered.origin.to_string()),
        ("Stores", sqlite_dir(&discovered.path).display().to_string()),
        (
            "Status",
            if catalog.is_open() { "open" } else { "closed" }.to_string(),
        ),
        ("Types", or_dash(counts.map(|c| c.dp_types))),
        ("Datapoints", or_dash(counts.map(|c| c.datapoints))),
        (
            "Control service",
            or_dash(client.config().map(|c| c.base_url.to_string())),
        ),
        ("Reachability", client.reachability().to_string()),
    ];

    ctx.print_kv(&pairs);
    Ok(())
}

/// Save `dir` as the explicitly selected project
pub fn select_project(
    config: &mut Config,
    config_path: &Path,
    dir: &Path,
    ctx: &OutputContext,
) -> Result<()> {
    if !is_project_dir(dir) {
        bail!(
            "{} is not a WinCC OA project (no stores under {})",
            dir.display(),
            sqlite_dir(dir).display()
        );
    }

    let dir = std::fs::canonicalize(dir)?;
    config.project_path = Some(dir.clone());
    config.save_to(config_path)?;

    ctx.success(&format!("Selected project {}", dir.display()));
    Ok(())
}
