//! Set command - write a value through the control service

use anyhow::{bail, Result};

use crate::output::OutputContext;
use crate::session::Session;

use super::{resolve_dpe, show::value_section};

/// Write `value` to an element and show the re-read value
pub async fn set(session: &Session, dpe: &str, value: &str, ctx: &OutputContext) -> Result<()> {
    let catalog = session.catalog();
    let resolved = resolve_dpe(catalog, dpe)?;
    let name = resolved.dpe_name();

    if !resolved.element.datatype.is_leaf() {
        bail!("{} is a {} element and holds no value", name, resolved.element.datatype);
    }

    let outcome = session.client().set_value(&name, value).await;
    if !outcome.success {
        bail!(
            "Failed to set {}: {}",
            name,
            outcome.error.unwrap_or_default()
        );
    }
    ctx.success(&format!("Set {} = {}", name, value));

    // The last-value store is written by the running system, so this may lag
    let configs = catalog.configs(resolved.datapoint.dp_id, resolved.element.el_id)?;
    value_section(configs.last_value.as_ref(), configs.unit()).print(ctx);
    ctx.info("(stored value may not reflect the write yet)");
    Ok(())
}
