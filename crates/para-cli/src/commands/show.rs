//! Show command - full configuration of one datapoint element

use anyhow::Result;
use para_core::models::*;
use para_store::{Catalog, ResolvedDpe};
use serde::Serialize;

use crate::output::{format_epoch, or_dash, yes_no, AlertRangeRow, OutputContext, OutputFormat};

use super::resolve_dpe;

#[derive(Serialize)]
struct ShowJson<'a> {
    dpe: String,
    element: &'a DpElement,
    configs: &'a DpeConfigs,
}

/// One titled block of the detail view
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub title: &'static str,
    /// `None` renders as "not configured"
    pub pairs: Option<Vec<(&'static str, String)>>,
    /// Alert ranges, printed as a table below the pairs
    pub details: Vec<AlertRangeRow>,
}

impl Section {
    fn configured(title: &'static str, pairs: Vec<(&'static str, String)>) -> Self {
        Self {
            title,
            pairs: Some(pairs),
            details: Vec::new(),
        }
    }

    fn absent(title: &'static str) -> Self {
        Self {
            title,
            pairs: None,
            details: Vec::new(),
        }
    }

    fn build<T>(
        title: &'static str,
        record: Option<&T>,
        pairs: impl FnOnce(&T) -> Vec<(&'static str, String)>,
    ) -> Self {
        record.map_or_else(|| Self::absent(title), |r| Self::configured(title, pairs(r)))
    }

    pub fn print(&self, ctx: &OutputContext) {
        ctx.section(self.title);
        match &self.pairs {
            Some(pairs) => ctx.print_kv(pairs),
            None => ctx.not_configured(),
        }
        if !self.details.is_empty() {
            ctx.print(&self.details);
        }
    }
}

/// Everything the detail view shows for one element
#[derive(Debug, Clone, PartialEq)]
pub struct ElementReport {
    pub header: Vec<(&'static str, String)>,
    pub sections: Vec<Section>,
}

impl ElementReport {
    pub fn section(&self, title: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.title == title)
    }
}

/// Show header, current value and every config section of an element
pub fn show(catalog: &Catalog, dpe: &str, ctx: &OutputContext) -> Result<()> {
    let resolved = resolve_dpe(catalog, dpe)?;
    let configs = catalog.configs(resolved.datapoint.dp_id, resolved.element.el_id)?;

    if ctx.format == OutputFormat::Json {
        ctx.print_json(&ShowJson {
            dpe: resolved.dpe_name(),
            element: &resolved.element,
            configs: &configs,
        });
        return Ok(());
    }

    let report = element_report(&resolved, &configs);
    ctx.print_kv(&report.header);
    for section in &report.sections {
        section.print(ctx);
    }
    Ok(())
}

/// Build the detail view; the value block only exists for leaf elements
pub fn element_report(resolved: &ResolvedDpe, configs: &DpeConfigs) -> ElementReport {
    let element = &resolved.element;
    let header = vec![
        ("DPE", resolved.dpe_name()),
        ("Type", element.datatype.to_string()),
        ("DP ID", resolved.datapoint.dp_id.to_string()),
        ("Element ID", element.el_id.to_string()),
        ("Unit", or_dash(configs.unit())),
        (
            "Display name",
            or_dash(configs.display_name.as_ref().map(|d| d.text.as_str())),
        ),
        ("Modified", format_epoch(element.modification_time)),
    ];

    let mut sections = Vec::new();
    if element.datatype.is_leaf() {
        sections.push(value_section(configs.last_value.as_ref(), configs.unit()));
    }
    sections.push(Section::build("Address", configs.address.as_ref(), address_pairs));
    sections.push(alert_section(
        configs.alert_hdl.as_ref(),
        &configs.alert_hdl_details,
    ));
    sections.push(Section::build("Archive", configs.archive.as_ref(), |a| {
        archive_pairs(a, configs.archive_detail.as_ref())
    }));
    sections.push(Section::build("PV Range", configs.pv_range.as_ref(), |r| {
        vec![
            ("Range", r.range_label()),
            ("Negated", yes_no(r.neg)),
            ("Ignore invalid", yes_no(r.ignor_inv)),
            ("Match", or_dash(r.match_pattern.as_deref())),
            ("Modified", format_epoch(r.modification_time)),
        ]
    }));
    sections.push(Section::build("Smoothing", configs.smooth.as_ref(), |s| {
        vec![
            ("Type", s.type_label()),
            ("Time", or_dash(s.std_time)),
            ("Tolerance", or_dash(s.std_tol)),
            ("Modified", format_epoch(s.modification_time)),
        ]
    }));
    sections.push(Section::build("Distribution", configs.distrib.as_ref(), |d| {
        vec![
            ("Driver number", d.driver_number.to_string()),
            ("Modified", format_epoch(d.modification_time)),
        ]
    }));

    ElementReport { header, sections }
}

/// Current value block; also used after a successful write
pub fn value_section(value: Option<&LastValue>, unit: Option<&str>) -> Section {
    Section::build("Current Value", value, |value| {
        let text = match unit {
            Some(unit) => format!("{} {}", value.value_text(), unit),
            None => value.value_text(),
        };
        let timestamp = |t: Option<chrono::DateTime<chrono::Utc>>| {
            or_dash(t.map(|t| t.format("%Y-%m-%d %H:%M:%S%.3f").to_string()))
        };
        vec![
            ("Value", text),
            ("Type", value.variable_type.to_string()),
            ("Source time", timestamp(value.source_time())),
            ("System time", timestamp(value.system_time_utc())),
            ("Status", value.status_hex()),
            ("User", value.user_id.to_string()),
            ("Manager", value.manager_id.to_string()),
        ]
    })
}

fn address_pairs(a: &AddressConfig) -> Vec<(&'static str, String)> {
    vec![
        ("Reference", a.reference.clone()),
        ("Driver", a.drv_ident.clone()),
        ("Connection", a.connection.clone()),
        ("Poll group", a.poll_group.clone()),
        ("Datatype", a.datatype.to_string()),
        ("Subindex", a.subindex.to_string()),
        ("Offset", a.offset.to_string()),
        ("Response mode", a.response_mode.to_string()),
        ("Modified", format_epoch(a.modification_time)),
    ]
}

fn alert_section(alert: Option<&AlertHdlConfig>, details: &[AlertHdlDetail]) -> Section {
    let mut section = Section::build("Alert Handling", alert, |a| {
        vec![
            ("Type", a.config_type_label()),
            ("Active", yes_no(a.active)),
            ("Impulse", yes_no(a.impulse)),
            ("Discrete states", yes_no(a.discrete_states)),
            ("Multi instance", yes_no(a.multi_instance)),
            ("Min priority", a.min_prio.to_string()),
            ("Panel", a.panel.clone()),
            ("Modified", format_epoch(a.modification_time)),
        ]
    });
    if section.pairs.is_some() {
        section.details = details
            .iter()
            .map(|d| AlertRangeRow {
                nr: d.detail_nr,
                range: d.range_label(),
                class: d.class_label(),
                text: d.add_text.clone(),
                matches: or_dash(d.match_pattern.as_deref()),
            })
            .collect();
    }
    section
}

fn archive_pairs(a: &ArchiveConfig, detail: Option<&ArchiveDetail>) -> Vec<(&'static str, String)> {
    let mut pairs = vec![
        ("Archived", yes_no(a.archive)),
        ("Modified", format_epoch(a.modification_time)),
    ];
    if let Some(d) = detail {
        pairs.extend([
            ("Processing", d.proc_type_label()),
            ("Class", d.class.clone()),
            ("Interval", d.interv.to_string()),
            ("Tolerance", d.std_tol.to_string()),
            ("Time", d.std_time.to_string()),
            ("Round value", d.round_val.to_string()),
        ]);
    }
    pairs
}
