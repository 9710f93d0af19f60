//! Element data type tags as stored in `datapoint_element.datatype`

use std::fmt;

use serde::{Deserialize, Serialize};

/// Offset between a scalar tag and its dyn (array) variant
pub const DYN_OFFSET: i64 = 32;

/// Leaf scalar kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Char,
    UInt,
    Int,
    Float,
    Bool,
    Bit32,
    Text,
    Time,
    DpId,
    Blob,
    Long,
    ULong,
    Bit64,
}

impl ScalarKind {
    fn from_tag(tag: i64) -> Option<Self> {
        Some(match tag {
            19 => Self::Char,
            20 => Self::UInt,
            21 => Self::Int,
            22 => Self::Float,
            23 => Self::Bool,
            24 => Self::Bit32,
            25 => Self::Text,
            26 => Self::Time,
            27 => Self::DpId,
            28 => Self::Blob,
            29 => Self::Long,
            30 => Self::ULong,
            31 => Self::Bit64,
            _ => return None,
        })
    }

    /// Numeric tag of the scalar form
    pub fn tag(self) -> i64 {
        match self {
            Self::Char => 19,
            Self::UInt => 20,
            Self::Int => 21,
            Self::Float => 22,
            Self::Bool => 23,
            Self::Bit32 => 24,
            Self::Text => 25,
            Self::Time => 26,
            Self::DpId => 27,
            Self::Blob => 28,
            Self::Long => 29,
            Self::ULong => 30,
            Self::Bit64 => 31,
        }
    }

    /// Human-readable name
    pub fn name(self) -> &'static str {
        match self {
            Self::Char => "char",
            Self::UInt => "uint",
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::Bit32 => "bit32",
            Self::Text => "string",
            Self::Time => "time",
            Self::DpId => "dpid",
            Self::Blob => "blob",
            Self::Long => "long",
            Self::ULong => "ulong",
            Self::Bit64 => "bit64",
        }
    }
}

/// Data type of a datapoint element
///
/// Serialized as the raw numeric tag so unknown values survive a round trip
/// through JSON output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum ElementType {
    /// Struct node; children follow via parent pointers
    Struct,
    /// Reference to another type's subtree
    Reference,
    /// Single scalar value
    Scalar(ScalarKind),
    /// Array of scalars (`dyn_*`)
    Dyn(ScalarKind),
    /// Tag this tool does not know about
    Unknown(i64),
}

impl ElementType {
    pub const STRUCT_TAG: i64 = 1;
    pub const REFERENCE_TAG: i64 = 41;

    /// Decode a stored tag
    pub fn from_tag(tag: i64) -> Self {
        match tag {
            Self::STRUCT_TAG => Self::Struct,
            Self::REFERENCE_TAG => Self::Reference,
            t if (DYN_OFFSET + 1..60).contains(&t) => match ScalarKind::from_tag(t - DYN_OFFSET) {
                Some(kind) => Self::Dyn(kind),
                None => Self::Unknown(t),
            },
            t => ScalarKind::from_tag(t).map_or(Self::Unknown(t), Self::Scalar),
        }
    }

    /// Stored tag value
    pub fn tag(self) -> i64 {
        match self {
            Self::Struct => Self::STRUCT_TAG,
            Self::Reference => Self::REFERENCE_TAG,
            Self::Scalar(kind) => kind.tag(),
            Self::Dyn(kind) => kind.tag() + DYN_OFFSET,
            Self::Unknown(t) => t,
        }
    }

    /// True for anything that is neither a struct nor a reference
    pub fn is_leaf(self) -> bool {
        !matches!(self, Self::Struct | Self::Reference)
    }

    /// Struct and reference nodes are always expandable
    pub fn is_container(self) -> bool {
        !self.is_leaf()
    }
}

impl From<i64> for ElementType {
    fn from(tag: i64) -> Self {
        Self::from_tag(tag)
    }
}

impl From<ElementType> for i64 {
    fn from(ty: ElementType) -> Self {
        ty.tag()
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Struct => f.write_str("struct"),
            Self::Reference => f.write_str("reference"),
            Self::Scalar(kind) => f.write_str(kind.name()),
            Self::Dyn(kind) => write!(f, "dyn_{}", kind.name()),
            // Array tags without a scalar base still render as dyn_<base>
            Self::Unknown(t) if (DYN_OFFSET + 1..60).contains(t) => {
                write!(f, "dyn_{}", Self::from_tag(t - DYN_OFFSET))
            }
            Self::Unknown(t) => write!(f, "unknown({})", t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_tags() {
        assert_eq!(ElementType::from_tag(1), ElementType::Struct);
        assert_eq!(ElementType::from_tag(41), ElementType::Reference);
        assert_eq!(
            ElementType::from_tag(22),
            ElementType::Scalar(ScalarKind::Float)
        );
        assert_eq!(ElementType::from_tag(22).to_string(), "float");
        assert_eq!(ElementType::from_tag(25).to_string(), "string");
    }

    #[test]
    fn test_dyn_tags() {
        assert_eq!(
            ElementType::from_tag(32 + 22),
            ElementType::Dyn(ScalarKind::Float)
        );
        assert_eq!(ElementType::from_tag(32 + 25).to_string(), "dyn_string");
        assert_eq!(ElementType::Dyn(ScalarKind::Int).tag(), 53);
    }

    #[test]
    fn test_unknown_tags_are_preserved() {
        let ty = ElementType::from_tag(7);
        assert_eq!(ty, ElementType::Unknown(7));
        assert_eq!(ty.tag(), 7);
        assert_eq!(ty.to_string(), "unknown(7)");
        // 33 would be dyn of struct, which does not exist
        assert_eq!(ElementType::from_tag(33), ElementType::Unknown(33));
    }

    #[test]
    fn test_unknown_array_tags_render_with_dyn_prefix() {
        assert_eq!(ElementType::from_tag(33).to_string(), "dyn_struct");
        assert_eq!(ElementType::from_tag(34).to_string(), "dyn_unknown(2)");
        assert_eq!(ElementType::from_tag(60).to_string(), "unknown(60)");
        assert!(ElementType::from_tag(33).is_leaf());
    }

    #[test]
    fn test_leaf_classification() {
        assert!(!ElementType::Struct.is_leaf());
        assert!(!ElementType::Reference.is_leaf());
        assert!(ElementType::Scalar(ScalarKind::Bool).is_leaf());
        assert!(ElementType::Dyn(ScalarKind::Bool).is_leaf());
        assert!(ElementType::Unknown(99).is_leaf());
    }

    #[test]
    fn test_serializes_as_tag() {
        let json = serde_json::to_string(&ElementType::Dyn(ScalarKind::Text)).unwrap();
        assert_eq!(json, "57");
        let ty: ElementType = serde_json::from_str("41").unwrap();
        assert_eq!(ty, ElementType::Reference);
    }
}
