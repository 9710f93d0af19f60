//! Per-element configuration records keyed by (datapoint id, element id)
//!
//! Every record is optional for a given element. Absence means the element
//! has no such config, which is a normal display state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{DpId, ElId, ElementType};

/// Driver address config (`address`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressConfig {
    /// Peripheral address reference string
    pub reference: String,
    pub subindex: i64,
    pub offset: i64,
    pub response_mode: i64,
    /// Transformation type used by the driver
    pub datatype: ElementType,
    pub drv_ident: String,
    pub poll_group: String,
    pub connection: String,
    pub modification_time: i64,
}

/// Alert handling config (`alert_hdl`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertHdlConfig {
    pub config_type: i64,
    pub variable_type: ElementType,
    pub active: bool,
    pub orig_hdl: i64,
    pub impulse: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ok_range: Option<i64>,
    pub discrete_states: bool,
    pub multi_instance: bool,
    pub min_prio: i64,
    pub panel: String,
    pub modification_time: i64,
}

impl AlertHdlConfig {
    /// Human-readable alert config type
    pub fn config_type_label(&self) -> String {
        match self.config_type {
            1 => "Analog (range-based)".to_string(),
            2 => "Digital (discrete)".to_string(),
            3 => "Summary alert".to_string(),
            other => other.to_string(),
        }
    }
}

/// One alert range (`alert_hdl_detail`), ordered by `detail_nr`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertHdlDetail {
    pub detail_nr: i64,
    pub range_type: i64,
    pub add_text: String,
    /// Alert class datapoint
    pub class_dp_id: DpId,
    pub class_el_id: ElId,
    pub hyst_type: i64,
    pub hyst_time: i64,
    pub l_hyst_limit: Option<f64>,
    pub u_hyst_limit: Option<f64>,
    pub l_limit: Option<f64>,
    pub l_incl: bool,
    pub u_limit: Option<f64>,
    pub u_incl: bool,
    #[serde(rename = "match")]
    pub match_pattern: Option<String>,
    pub neg: bool,
}

impl AlertHdlDetail {
    /// Interval notation of the limits, `-` when either side is open
    pub fn range_label(&self) -> String {
        match (self.l_limit, self.u_limit) {
            (Some(l), Some(u)) => format!(
                "{}{} .. {}{}",
                if self.l_incl { '[' } else { '(' },
                format_number(l),
                format_number(u),
                if self.u_incl { ']' } else { ')' }
            ),
            _ => "-".to_string(),
        }
    }

    /// Alert class as `dp_id:el_id`
    pub fn class_label(&self) -> String {
        format!("{}:{}", self.class_dp_id, self.class_el_id)
    }
}

/// Archive config (`archive`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// Archiving enabled
    pub archive: bool,
    pub modification_time: i64,
}

/// Archive processing detail (`archive_detail`), first detail only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchiveDetail {
    pub detail_nr: i64,
    pub proc_type: i64,
    pub round_inv: i64,
    pub round_val: f64,
    pub interv_type: i64,
    pub interv: i64,
    pub std_type: i64,
    pub std_tol: f64,
    pub std_time: i64,
    /// Archive class name
    pub class: String,
}

impl ArchiveDetail {
    pub fn proc_type_label(&self) -> String {
        match self.proc_type {
            0 => "None".to_string(),
            1 => "Value-based".to_string(),
            2 => "Time-based".to_string(),
            3 => "Value & time-based".to_string(),
            other => other.to_string(),
        }
    }
}

/// Process value range check (`pv_range`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PvRangeConfig {
    pub config_type: i64,
    pub variable_type: ElementType,
    pub ignor_inv: bool,
    pub neg: bool,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub incl_min: bool,
    pub incl_max: bool,
    #[serde(rename = "match")]
    pub match_pattern: Option<String>,
    pub modification_time: i64,
}

impl PvRangeConfig {
    /// Interval notation, open sides rendered as infinity
    pub fn range_label(&self) -> String {
        let min = match self.min {
            Some(v) => format!("{}{}", if self.incl_min { '[' } else { '(' }, format_number(v)),
            None => "(-inf".to_string(),
        };
        let max = match self.max {
            Some(v) => format!("{}{}", format_number(v), if self.incl_max { ']' } else { ')' }),
            None => "+inf)".to_string(),
        };
        format!("{} .. {}", min, max)
    }
}

/// Value smoothing (`smooth`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmoothConfig {
    #[serde(rename = "type")]
    pub smooth_type: i64,
    pub std_type: i64,
    pub std_time: Option<i64>,
    pub std_tol: Option<f64>,
    pub modification_time: i64,
}

impl SmoothConfig {
    pub fn type_label(&self) -> String {
        match self.smooth_type {
            0 => "None".to_string(),
            1 => "Old/New comparison".to_string(),
            2 => "Old/New + tolerance".to_string(),
            other => other.to_string(),
        }
    }
}

/// Distribution to a driver (`distrib`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistribConfig {
    pub driver_number: i64,
    pub modification_time: i64,
}

/// Localized display name (`display_name`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayName {
    pub language_id: i64,
    pub text: String,
}

/// Localized unit and format string (`unit_and_format`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitAndFormat {
    pub language_id: i64,
    pub unit: String,
    pub format: String,
}

/// Most recent value of a leaf element (`last_value`, index 0, default language)
///
/// Status and timestamps are 64-bit quantities that the store may keep as
/// decimal text; they are carried as exact integers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LastValue {
    pub value: serde_json::Value,
    pub variable_type: ElementType,
    /// Source time in nanoseconds since the Unix epoch
    pub original_time: Option<i64>,
    /// System time in nanoseconds since the Unix epoch
    pub system_time: Option<i64>,
    /// Status bitfield
    pub status_64: u64,
    pub user_id: i64,
    pub manager_id: i64,
}

impl LastValue {
    pub fn source_time(&self) -> Option<DateTime<Utc>> {
        self.original_time.map(DateTime::<Utc>::from_timestamp_nanos)
    }

    pub fn system_time_utc(&self) -> Option<DateTime<Utc>> {
        self.system_time.map(DateTime::<Utc>::from_timestamp_nanos)
    }

    /// Status bitfield as upper-case hex
    pub fn status_hex(&self) -> String {
        format!("0x{:X}", self.status_64)
    }

    /// Value as shown to the user; strings are not quoted
    pub fn value_text(&self) -> String {
        match &self.value {
            serde_json::Value::Null => "null".to_string(),
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// Every configuration section of one element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DpeConfigs {
    pub dp_id: DpId,
    pub el_id: ElId,
    pub address: Option<AddressConfig>,
    pub alert_hdl: Option<AlertHdlConfig>,
    /// Empty when no alert ranges are configured
    pub alert_hdl_details: Vec<AlertHdlDetail>,
    pub archive: Option<ArchiveConfig>,
    pub archive_detail: Option<ArchiveDetail>,
    pub pv_range: Option<PvRangeConfig>,
    pub smooth: Option<SmoothConfig>,
    pub distrib: Option<DistribConfig>,
    pub last_value: Option<LastValue>,
    pub display_name: Option<DisplayName>,
    pub unit_and_format: Option<UnitAndFormat>,
}

impl DpeConfigs {
    /// Aggregate with every section absent
    pub fn empty(dp_id: DpId, el_id: ElId) -> Self {
        Self {
            dp_id,
            el_id,
            address: None,
            alert_hdl: None,
            alert_hdl_details: Vec::new(),
            archive: None,
            archive_detail: None,
            pv_range: None,
            smooth: None,
            distrib: None,
            last_value: None,
            display_name: None,
            unit_and_format: None,
        }
    }

    /// Unit string, if one is configured and non-empty
    pub fn unit(&self) -> Option<&str> {
        self.unit_and_format
            .as_ref()
            .map(|u| u.unit.as_str())
            .filter(|u| !u.is_empty())
    }
}

/// Integral floats print without a fraction
fn format_number(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        v.to_string()
    }
}
