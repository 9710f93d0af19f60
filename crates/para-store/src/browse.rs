//! Tree navigation over the catalog: types → datapoints → elements
//!
//! Every expansion re-reads the element list of the owning type and derives
//! one level with [`para_core::hierarchy::children`].

use para_core::hierarchy;
use para_core::models::*;
use para_core::DpePath;
use serde::Serialize;
use tracing::{debug, warn};

use crate::catalog::Catalog;
use crate::error::StoreResult;

/// One node of the browse tree
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeNode {
    /// A datapoint type; expands to its datapoints
    Type(DpType),
    /// A datapoint; expands to the top-level elements of its type
    Datapoint { datapoint: Datapoint, expandable: bool },
    /// An element as seen through one datapoint
    Element {
        dp_id: DpId,
        element: DpElement,
        expandable: bool,
    },
}

impl TreeNode {
    pub fn label(&self) -> &str {
        match self {
            Self::Type(t) => &t.canonical_name,
            Self::Datapoint { datapoint, .. } => &datapoint.canonical_name,
            Self::Element { element, .. } => &element.canonical_name,
        }
    }

    pub fn is_expandable(&self) -> bool {
        match self {
            Self::Type(_) => true,
            Self::Datapoint { expandable, .. } | Self::Element { expandable, .. } => *expandable,
        }
    }
}

/// A datapoint element name resolved against the catalog
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedDpe {
    pub datapoint: Datapoint,
    pub element: DpElement,
    /// Dotted path below the root, empty for the root element
    pub element_path: String,
}

impl ResolvedDpe {
    /// Fully-qualified name as the control service expects it
    pub fn dpe_name(&self) -> String {
        DpePath::new(&self.datapoint.canonical_name, &self.element_path).to_string()
    }
}

impl Catalog {
    /// Top level of the type tree; internal (`_`) types hidden unless asked
    pub fn root_nodes(&self, show_internal: bool) -> StoreResult<Vec<TreeNode>> {
        if !self.is_open() {
            warn!("Catalog not open, no root nodes");
            return Ok(Vec::new());
        }

        let types = self.dp_types()?;
        let total = types.len();
        let nodes: Vec<TreeNode> = types
            .into_iter()
            .filter(|t| show_internal || !t.is_internal())
            .map(TreeNode::Type)
            .collect();
        debug!(total, shown = nodes.len(), "Listed datapoint types");
        Ok(nodes)
    }

    /// Flat list of datapoints across all types
    pub fn datapoint_nodes(&self, show_internal: bool) -> StoreResult<Vec<TreeNode>> {
        if !self.is_open() {
            return Ok(Vec::new());
        }

        let mut nodes = Vec::new();
        for dp in self.datapoints()? {
            if show_internal || !dp.is_internal() {
                nodes.push(self.datapoint_node(dp)?);
            }
        }
        Ok(nodes)
    }

    fn datapoint_node(&self, datapoint: Datapoint) -> StoreResult<TreeNode> {
        let elements = self.elements_of_type(datapoint.dpt_id)?;
        Ok(TreeNode::Datapoint {
            expandable: hierarchy::has_children(&elements),
            datapoint,
        })
    }

    /// Children of a node, recomputed from a fresh element snapshot
    pub fn expand(&self, node: &TreeNode) -> StoreResult<Vec<TreeNode>> {
        if !self.is_open() {
            return Ok(Vec::new());
        }

        match node {
            TreeNode::Type(t) => self
                .datapoints_of_type(t.dpt_id)?
                .into_iter()
                .map(|dp| self.datapoint_node(dp))
                .collect(),
            TreeNode::Datapoint { datapoint, .. } => {
                self.element_children(datapoint.dp_id, datapoint.dpt_id, ROOT_PARENT)
            }
            TreeNode::Element { dp_id, element, .. } => {
                self.element_children(*dp_id, element.dpt_id, element.el_id)
            }
        }
    }

    fn element_children(
        &self,
        dp_id: DpId,
        dpt_id: DptId,
        parent: ElId,
    ) -> StoreResult<Vec<TreeNode>> {
        let elements = self.elements_of_type(dpt_id)?;
        let nodes: Vec<TreeNode> = hierarchy::children(&elements, parent)
            .into_iter()
            .map(|n| TreeNode::Element {
                dp_id,
                element: n.element.clone(),
                expandable: n.expandable,
            })
            .collect();
        debug!(dp_id, dpt_id, parent, count = nodes.len(), "Expanded element");
        Ok(nodes)
    }

    /// Resolve `Datapoint.element.path` to ids; `None` when any part is unknown
    pub fn resolve(&self, path: &DpePath) -> StoreResult<Option<ResolvedDpe>> {
        let Some(datapoint) = self.datapoint_by_name(&path.datapoint)? else {
            return Ok(None);
        };
        let elements = self.elements_of_type(datapoint.dpt_id)?;
        let Some(element) = hierarchy::find_by_path(&elements, &path.element).cloned() else {
            return Ok(None);
        };
        let element_path = hierarchy::element_path(&elements, element.el_id)
            .unwrap_or_else(|| path.element.clone());

        Ok(Some(ResolvedDpe {
            datapoint,
            element,
            element_path,
        }))
    }

    /// Fully-qualified name of an element of a datapoint
    pub fn dpe_name(&self, dp_id: DpId, el_id: ElId) -> StoreResult<Option<String>> {
        let Some(datapoint) = self.datapoint(dp_id)? else {
            return Ok(None);
        };
        let elements = self.elements_of_type(datapoint.dpt_id)?;
        Ok(hierarchy::element_path(&elements, el_id)
            .map(|path| DpePath::new(datapoint.canonical_name, path).to_string()))
    }
}
