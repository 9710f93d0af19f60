//! Row decoding for every table the catalog reads
//!
//! Columns are read by name. Wide integers (timestamps, status bits) may be
//! stored as SQLite integers or as decimal text and are decoded exactly.

use para_core::models::*;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ValueRef};
use rusqlite::Row;

/// Signed 64-bit integer stored as INTEGER or decimal TEXT
pub(crate) struct WideInt(pub i64);

impl FromSql for WideInt {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Integer(i) => Ok(Self(i)),
            ValueRef::Text(t) => {
                let s = std::str::from_utf8(t).map_err(|e| FromSqlError::Other(Box::new(e)))?;
                s.trim()
                    .parse::<i64>()
                    .map(Self)
                    .map_err(|e| FromSqlError::Other(Box::new(e)))
            }
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

/// Unsigned 64-bit bitfield stored as INTEGER (two's complement) or decimal TEXT
pub(crate) struct WideBits(pub u64);

impl FromSql for WideBits {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Integer(i) => Ok(Self(i as u64)),
            ValueRef::Text(t) => {
                let s = std::str::from_utf8(t).map_err(|e| FromSqlError::Other(Box::new(e)))?;
                let s = s.trim();
                match s.parse::<u64>() {
                    Ok(v) => Ok(Self(v)),
                    Err(_) => s
                        .parse::<i64>()
                        .map(|v| Self(v as u64))
                        .map_err(|e| FromSqlError::Other(Box::new(e))),
                }
            }
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

/// Dynamically typed value column
pub(crate) struct DynValue(pub serde_json::Value);

impl FromSql for DynValue {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        use serde_json::Value;
        Ok(Self(match value {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(i) => Value::from(i),
            ValueRef::Real(f) => serde_json::Number::from_f64(f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            ValueRef::Text(t) => Value::String(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(b) => Value::String(hex::encode(b)),
        }))
    }
}

fn text(row: &Row<'_>, col: &str) -> rusqlite::Result<String> {
    Ok(row.get::<_, Option<String>>(col)?.unwrap_or_default())
}

fn flag(row: &Row<'_>, col: &str) -> rusqlite::Result<bool> {
    Ok(row.get::<_, Option<bool>>(col)?.unwrap_or(false))
}

fn wide(row: &Row<'_>, col: &str) -> rusqlite::Result<i64> {
    Ok(row.get::<_, Option<WideInt>>(col)?.map_or(0, |w| w.0))
}

fn opt_wide(row: &Row<'_>, col: &str) -> rusqlite::Result<Option<i64>> {
    Ok(row.get::<_, Option<WideInt>>(col)?.map(|w| w.0))
}

fn tag(row: &Row<'_>, col: &str) -> rusqlite::Result<ElementType> {
    Ok(ElementType::from_tag(
        row.get::<_, Option<i64>>(col)?.unwrap_or(0),
    ))
}

// =============================================================================
// Identity store
// =============================================================================

pub(crate) const DP_TYPE_COLUMNS: &str =
    "dpt_id, canonical_name, next_free_el_id, modification_time";

pub(crate) fn dp_type(row: &Row<'_>) -> rusqlite::Result<DpType> {
    Ok(DpType {
        dpt_id: row.get("dpt_id")?,
        canonical_name: text(row, "canonical_name")?,
        next_free_el_id: row.get::<_, Option<i64>>("next_free_el_id")?.unwrap_or(0),
        modification_time: wide(row, "modification_time")?,
    })
}

pub(crate) const ELEMENT_COLUMNS: &str = "el_id, dpt_id, position_in_type, parent_el_id, datatype, \
     referenced_type, source_dpt_id, source_el_id, canonical_name, modification_time";

pub(crate) fn element(row: &Row<'_>) -> rusqlite::Result<DpElement> {
    Ok(DpElement {
        el_id: row.get("el_id")?,
        dpt_id: row.get("dpt_id")?,
        position_in_type: row.get::<_, Option<i64>>("position_in_type")?.unwrap_or(0),
        parent_el_id: row
            .get::<_, Option<i64>>("parent_el_id")?
            .unwrap_or(ROOT_PARENT),
        datatype: tag(row, "datatype")?,
        referenced_type: row.get("referenced_type")?,
        source_dpt_id: row.get("source_dpt_id")?,
        source_el_id: row.get("source_el_id")?,
        canonical_name: text(row, "canonical_name")?,
        modification_time: wide(row, "modification_time")?,
    })
}

pub(crate) const DATAPOINT_COLUMNS: &str = "dp_id, dpt_id, canonical_name, modification_time";

pub(crate) fn datapoint(row: &Row<'_>) -> rusqlite::Result<Datapoint> {
    Ok(Datapoint {
        dp_id: row.get("dp_id")?,
        dpt_id: row.get("dpt_id")?,
        canonical_name: text(row, "canonical_name")?,
        modification_time: wide(row, "modification_time")?,
    })
}

pub(crate) fn display_name(row: &Row<'_>) -> rusqlite::Result<DisplayName> {
    Ok(DisplayName {
        language_id: row.get::<_, Option<i64>>("language_id")?.unwrap_or(0),
        text: text(row, "text")?,
    })
}

pub(crate) fn unit_and_format(row: &Row<'_>) -> rusqlite::Result<UnitAndFormat> {
    Ok(UnitAndFormat {
        language_id: row.get::<_, Option<i64>>("language_id")?.unwrap_or(0),
        unit: text(row, "unit")?,
        format: text(row, "format")?,
    })
}

// =============================================================================
// Configuration store
// =============================================================================

pub(crate) fn address(row: &Row<'_>) -> rusqlite::Result<AddressConfig> {
    Ok(AddressConfig {
        reference: text(row, "reference")?,
        subindex: row.get::<_, Option<i64>>("subindex")?.unwrap_or(0),
        offset: row.get::<_, Option<i64>>("offset")?.unwrap_or(0),
        response_mode: row.get::<_, Option<i64>>("response_mode")?.unwrap_or(0),
        datatype: tag(row, "datatype")?,
        drv_ident: text(row, "drv_ident")?,
        poll_group: text(row, "poll_group")?,
        connection: text(row, "connection")?,
        modification_time: wide(row, "modification_time")?,
    })
}

pub(crate) fn alert_hdl(row: &Row<'_>) -> rusqlite::Result<AlertHdlConfig> {
    Ok(AlertHdlConfig {
        config_type: row.get::<_, Option<i64>>("config_type")?.unwrap_or(0),
        variable_type: tag(row, "variable_type")?,
        active: flag(row, "active")?,
        orig_hdl: row.get::<_, Option<i64>>("orig_hdl")?.unwrap_or(0),
        impulse: flag(row, "impulse")?,
        ok_range: row.get("ok_range")?,
        discrete_states: flag(row, "discrete_states")?,
        multi_instance: flag(row, "multi_instance")?,
        min_prio: row.get::<_, Option<i64>>("min_prio")?.unwrap_or(0),
        panel: text(row, "panel")?,
        modification_time: wide(row, "modification_time")?,
    })
}

pub(crate) fn alert_hdl_detail(row: &Row<'_>) -> rusqlite::Result<AlertHdlDetail> {
    Ok(AlertHdlDetail {
        detail_nr: row.get("detail_nr")?,
        range_type: row.get::<_, Option<i64>>("range_type")?.unwrap_or(0),
        add_text: text(row, "add_text")?,
        class_dp_id: row.get::<_, Option<i64>>("class_dp_id")?.unwrap_or(0),
        class_el_id: row.get::<_, Option<i64>>("class_el_id")?.unwrap_or(0),
        hyst_type: row.get::<_, Option<i64>>("hyst_type")?.unwrap_or(0),
        hyst_time: wide(row, "hyst_time")?,
        l_hyst_limit: row.get("l_hyst_limit")?,
        u_hyst_limit: row.get("u_hyst_limit")?,
        l_limit: row.get("l_limit")?,
        l_incl: flag(row, "l_incl")?,
        u_limit: row.get("u_limit")?,
        u_incl: flag(row, "u_incl")?,
        match_pattern: row.get("match")?,
        neg: flag(row, "neg")?,
    })
}

pub(crate) fn archive(row: &Row<'_>) -> rusqlite::Result<ArchiveConfig> {
    Ok(ArchiveConfig {
        archive: flag(row, "archive")?,
        modification_time: wide(row, "modification_time")?,
    })
}

pub(crate) fn archive_detail(row: &Row<'_>) -> rusqlite::Result<ArchiveDetail> {
    Ok(ArchiveDetail {
        detail_nr: row.get::<_, Option<i64>>("detail_nr")?.unwrap_or(0),
        proc_type: row.get::<_, Option<i64>>("proc_type")?.unwrap_or(0),
        round_inv: row.get::<_, Option<i64>>("round_inv")?.unwrap_or(0),
        round_val: row.get::<_, Option<f64>>("round_val")?.unwrap_or(0.0),
        interv_type: row.get::<_, Option<i64>>("interv_type")?.unwrap_or(0),
        interv: wide(row, "interv")?,
        std_type: row.get::<_, Option<i64>>("std_type")?.unwrap_or(0),
        std_tol: row.get::<_, Option<f64>>("std_tol")?.unwrap_or(0.0),
        std_time: wide(row, "std_time")?,
        class: text(row, "class")?,
    })
}

pub(crate) fn pv_range(row: &Row<'_>) -> rusqlite::Result<PvRangeConfig> {
    Ok(PvRangeConfig {
        config_type: row.get::<_, Option<i64>>("config_type")?.unwrap_or(0),
        variable_type: tag(row, "variable_type")?,
        ignor_inv: flag(row, "ignor_inv")?,
        neg: flag(row, "neg")?,
        min: row.get("min")?,
        max: row.get("max")?,
        incl_min: flag(row, "incl_min")?,
        incl_max: flag(row, "incl_max")?,
        match_pattern: row.get("match")?,
        modification_time: wide(row, "modification_time")?,
    })
}

pub(crate) fn smooth(row: &Row<'_>) -> rusqlite::Result<SmoothConfig> {
    Ok(SmoothConfig {
        smooth_type: row.get::<_, Option<i64>>("type")?.unwrap_or(0),
        std_type: row.get::<_, Option<i64>>("std_type")?.unwrap_or(0),
        std_time: opt_wide(row, "std_time")?,
        std_tol: row.get("std_tol")?,
        modification_time: wide(row, "modification_time")?,
    })
}

pub(crate) fn distrib(row: &Row<'_>) -> rusqlite::Result<DistribConfig> {
    Ok(DistribConfig {
        driver_number: row.get::<_, Option<i64>>("driver_number")?.unwrap_or(0),
        modification_time: wide(row, "modification_time")?,
    })
}

// =============================================================================
// Last-value store
// =============================================================================

pub(crate) fn last_value(row: &Row<'_>) -> rusqlite::Result<LastValue> {
    Ok(LastValue {
        value: row.get::<_, DynValue>("value")?.0,
        variable_type: tag(row, "variable_type")?,
        original_time: opt_wide(row, "original_time")?,
        system_time: opt_wide(row, "system_time")?,
        status_64: row.get::<_, Option<WideBits>>("status_64")?.map_or(0, |b| b.0),
        user_id: row.get::<_, Option<i64>>("user_id")?.unwrap_or(0),
        manager_id: row.get::<_, Option<i64>>("manager_id")?.unwrap_or(0),
    })
}
