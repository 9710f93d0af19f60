//! Datapoint types, elements and datapoint instances

use serde::{Deserialize, Serialize};

use super::ElementType;

/// Identifier of a datapoint type
pub type DptId = i64;
/// Identifier of a datapoint instance
pub type DpId = i64;
/// Identifier of an element, unique only within its owning type
pub type ElId = i64;

/// Parent id carried by the synthetic root element of every type
pub const ROOT_PARENT: ElId = 0;

/// Prefix of system-internal type and datapoint names
pub const INTERNAL_PREFIX: char = '_';

/// Datapoint type (`datapoint_type`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DpType {
    pub dpt_id: DptId,
    /// Canonical dotted name
    pub canonical_name: String,
    /// Next free element id counter
    pub next_free_el_id: i64,
    pub modification_time: i64,
}

impl DpType {
    /// Internal types are hidden from listings by default
    pub fn is_internal(&self) -> bool {
        self.canonical_name.starts_with(INTERNAL_PREFIX)
    }
}

/// One element of a datapoint type (`datapoint_element`)
///
/// Elements of a type form a tree through `parent_el_id`; the shape is shared
/// by every datapoint of that type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DpElement {
    pub el_id: ElId,
    pub dpt_id: DptId,
    /// Ordinal position among siblings
    pub position_in_type: i64,
    /// Parent element, [`ROOT_PARENT`] for the type's root
    pub parent_el_id: ElId,
    pub datatype: ElementType,
    /// Referenced type for reference elements
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referenced_type: Option<DptId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_dpt_id: Option<DptId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_el_id: Option<ElId>,
    /// Name segment of this element
    pub canonical_name: String,
    pub modification_time: i64,
}

impl DpElement {
    /// True if this row carries the root sentinel as parent
    pub fn is_root(&self) -> bool {
        self.parent_el_id == ROOT_PARENT && self.el_id != ROOT_PARENT
    }
}

/// Datapoint instance (`datapoint`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Datapoint {
    pub dp_id: DpId,
    pub dpt_id: DptId,
    pub canonical_name: String,
    pub modification_time: i64,
}

impl Datapoint {
    pub fn is_internal(&self) -> bool {
        self.canonical_name.starts_with(INTERNAL_PREFIX)
    }
}
