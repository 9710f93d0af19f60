//! Datapoints command - list datapoints, optionally of one type

use std::collections::HashMap;

use anyhow::Result;
use para_core::ParaError;
use para_store::{Catalog, TreeNode};

use crate::output::{DatapointRow, OutputContext};

/// List datapoints
pub fn datapoints(
    catalog: &Catalog,
    dp_type: Option<&str>,
    show_internal: bool,
    ctx: &OutputContext,
) -> Result<()> {
    let rows = datapoint_rows(catalog, dp_type, show_internal)?;
    ctx.print(&rows);
    Ok(())
}

/// Datapoint rows, by name; `_`-prefixed datapoints only with `show_internal`
pub fn datapoint_rows(
    catalog: &Catalog,
    dp_type: Option<&str>,
    show_internal: bool,
) -> Result<Vec<DatapointRow>> {
    let nodes = match dp_type {
        Some(name) => {
            let dp_type = catalog
                .dp_type_by_name(name)?
                .ok_or_else(|| ParaError::TypeNotFound(name.to_string()))?;
            catalog.expand(&TreeNode::Type(dp_type))?
        }
        None => catalog.datapoint_nodes(show_internal)?,
    };

    let type_names: HashMap<i64, String> = catalog
        .dp_types()?
        .into_iter()
        .map(|t| (t.dpt_id, t.canonical_name))
        .collect();

    let rows = nodes
        .into_iter()
        .filter_map(|node| match node {
            TreeNode::Datapoint {
                datapoint,
                expandable,
            } if show_internal || !datapoint.is_internal() => Some(DatapointRow {
                dp_type: type_names
                    .get(&datapoint.dpt_id)
                    .cloned()
                    .unwrap_or_else(|| datapoint.dpt_id.to_string()),
                name: datapoint.canonical_name,
                id: datapoint.dp_id,
                expandable: if expandable { "yes" } else { "" }.to_string(),
            }),
            _ => None,
        })
        .collect();
    Ok(rows)
}
