//! Health command - probe the project's control service

use std::path::Path;

use anyhow::Result;
use para_client::{env_file_path, McpClient};

use crate::output::{yes_no, OutputContext};

pub async fn health(client: &mut McpClient, project: &Path, ctx: &OutputContext) -> Result<()> {
    if !client.configure(project) {
        ctx.warn(&format!(
            "No control service configured ({} not found)",
            env_file_path(project).display()
        ));
        return Ok(());
    }

    let healthy = client.check_health().await;
    let Some(config) = client.config() else {
        return Ok(());
    };

    ctx.print_kv(&[
        ("Endpoint", config.base_url.to_string()),
        ("Token", yes_no(config.has_token())),
        ("Status", client.reachability().to_string()),
    ]);
    if healthy {
        ctx.success("Control service is reachable");
    } else {
        ctx.error("Control service is not reachable");
    }
    Ok(())
}
