//! Types command - list datapoint types

use anyhow::Result;
use para_store::{Catalog, TreeNode};

use crate::output::{format_epoch, OutputContext, TypeRow};

/// List datapoint types with their datapoint counts
pub fn types(catalog: &Catalog, show_internal: bool, ctx: &OutputContext) -> Result<()> {
    let mut rows = Vec::new();
    for node in catalog.root_nodes(show_internal)? {
        let TreeNode::Type(dp_type) = node else {
            continue;
        };
        let datapoints = catalog.datapoints_of_type(dp_type.dpt_id)?.len();
        rows.push(TypeRow {
            name: dp_type.canonical_name,
            id: dp_type.dpt_id,
            datapoints,
            modified: format_epoch(dp_type.modification_time),
        });
    }

    ctx.print(&rows);
    Ok(())
}
