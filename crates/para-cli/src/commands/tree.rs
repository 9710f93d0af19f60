//! Tree command - expand a type, datapoint or element

use anyhow::{bail, Result};
use para_core::{hierarchy, DpePath, ParaError};
use para_store::{Catalog, TreeNode};

use crate::output::{OutputContext, TreeRow};

/// Print the children of a node, `depth` levels deep
pub fn tree(
    catalog: &Catalog,
    target: &str,
    element: Option<&str>,
    depth: usize,
    ctx: &OutputContext,
) -> Result<()> {
    let start = start_node(catalog, target, element)?;
    if !start.is_expandable() {
        ctx.info(&format!("{} has no children", start.label()));
        return Ok(());
    }
    ctx.print(&rows_below(catalog, &start, depth)?);
    Ok(())
}

/// Rows under the named node in display order; empty for a leaf
pub fn tree_rows(
    catalog: &Catalog,
    target: &str,
    element: Option<&str>,
    depth: usize,
) -> Result<Vec<TreeRow>> {
    let start = start_node(catalog, target, element)?;
    if !start.is_expandable() {
        return Ok(Vec::new());
    }
    rows_below(catalog, &start, depth)
}

fn rows_below(catalog: &Catalog, start: &TreeNode, depth: usize) -> Result<Vec<TreeRow>> {
    let mut rows = Vec::new();
    walk(catalog, start, 0, depth.max(1), &mut rows)?;
    Ok(rows)
}

fn walk(
    catalog: &Catalog,
    node: &TreeNode,
    level: usize,
    depth: usize,
    rows: &mut Vec<TreeRow>,
) -> Result<()> {
    for child in catalog.expand(node)? {
        rows.push(row(&child, level));
        if level + 1 < depth && child.is_expandable() {
            walk(catalog, &child, level + 1, depth, rows)?;
        }
    }
    Ok(())
}

fn row(node: &TreeNode, level: usize) -> TreeRow {
    let (kind, id) = match node {
        TreeNode::Type(t) => ("type".to_string(), t.dpt_id),
        TreeNode::Datapoint { datapoint, .. } => ("datapoint".to_string(), datapoint.dp_id),
        TreeNode::Element { element, .. } => (element.datatype.to_string(), element.el_id),
    };
    TreeRow {
        name: format!("{}{}", "  ".repeat(level), node.label()),
        kind,
        expandable: if node.is_expandable() { "+" } else { "" }.to_string(),
        id,
        depth: level,
    }
}

/// Node named by the arguments: a datapoint (optionally with an element
/// path, given separately or dotted) or a datapoint type
fn start_node(catalog: &Catalog, target: &str, element: Option<&str>) -> Result<TreeNode> {
    let path = DpePath::parse(target)?;
    let element = element.unwrap_or(path.element.as_str());

    if let Some(datapoint) = catalog.datapoint_by_name(&path.datapoint)? {
        let elements = catalog.elements_of_type(datapoint.dpt_id)?;
        if element.is_empty() {
            return Ok(TreeNode::Datapoint {
                expandable: hierarchy::has_children(&elements),
                datapoint,
            });
        }
        let found = hierarchy::find_by_path(&elements, element).ok_or_else(|| {
            ParaError::ElementNotFound {
                owner: datapoint.canonical_name.clone(),
                path: element.to_string(),
            }
        })?;
        return Ok(TreeNode::Element {
            dp_id: datapoint.dp_id,
            expandable: hierarchy::is_expandable(&elements, found),
            element: found.clone(),
        });
    }

    match catalog.dp_type_by_name(&path.datapoint)? {
        Some(_) if !element.is_empty() => {
            bail!("Element paths apply to datapoints, not types: {}", target)
        }
        Some(dp_type) => Ok(TreeNode::Type(dp_type)),
        None => Err(ParaError::DatapointNotFound(path.datapoint.clone()).into()),
    }
}
