//! Fixture project with the three WinCC OA SQLite stores

#![allow(dead_code)]

use std::path::Path;

use rusqlite::{params, Connection};
use tempfile::TempDir;

const IDENT_SCHEMA: &str = r#"
    CREATE TABLE datapoint_type (
        dpt_id INTEGER PRIMARY KEY,
        canonical_name TEXT NOT NULL,
        next_free_el_id INTEGER,
        modification_time INTEGER
    );
    CREATE TABLE datapoint_element (
        el_id INTEGER NOT NULL,
        dpt_id INTEGER NOT NULL,
        position_in_type INTEGER,
        parent_el_id INTEGER,
        datatype INTEGER,
        referenced_type INTEGER,
        source_dpt_id INTEGER,
        source_el_id INTEGER,
        canonical_name TEXT,
        modification_time INTEGER
    );
    CREATE TABLE datapoint (
        dp_id INTEGER PRIMARY KEY,
        dpt_id INTEGER NOT NULL,
        canonical_name TEXT NOT NULL,
        modification_time INTEGER
    );
    CREATE TABLE display_name (
        dp_id INTEGER, el_id INTEGER, language_id INTEGER, text TEXT
    );
    CREATE TABLE unit_and_format (
        dp_id INTEGER, el_id INTEGER, language_id INTEGER, unit TEXT, format TEXT
    );
"#;

const CONFIG_SCHEMA: &str = r#"
    CREATE TABLE address (
        dp_id INTEGER, el_id INTEGER, reference TEXT, subindex INTEGER, offset INTEGER,
        response_mode INTEGER, datatype INTEGER, drv_ident TEXT, poll_group TEXT,
        connection TEXT, modification_time INTEGER
    );
    CREATE TABLE alert_hdl (
        dp_id INTEGER, el_id INTEGER, config_type INTEGER, variable_type INTEGER,
        active INTEGER, orig_hdl INTEGER, impulse INTEGER, ok_range INTEGER,
        discrete_states INTEGER, multi_instance INTEGER, min_prio INTEGER, panel TEXT,
        modification_time INTEGER
    );
    CREATE TABLE alert_hdl_detail (
        dp_id INTEGER, el_id INTEGER, detail_nr INTEGER, range_type INTEGER, add_text TEXT,
        class_dp_id INTEGER, class_el_id INTEGER, hyst_type INTEGER, hyst_time INTEGER,
        l_hyst_limit REAL, u_hyst_limit REAL, l_limit REAL, l_incl INTEGER,
        u_limit REAL, u_incl INTEGER, "match" TEXT, neg INTEGER
    );
    CREATE TABLE archive (
        dp_id INTEGER, el_id INTEGER, archive INTEGER, modification_time INTEGER
    );
    CREATE TABLE archive_detail (
        dp_id INTEGER, el_id INTEGER, detail_nr INTEGER, proc_type INTEGER,
        round_inv INTEGER, round_val REAL, interv_type INTEGER, interv INTEGER,
        std_type INTEGER, std_tol REAL, std_time INTEGER, class TEXT
    );
    CREATE TABLE pv_range (
        dp_id INTEGER, el_id INTEGER, config_type INTEGER, variable_type INTEGER,
        ignor_inv INTEGER, neg INTEGER, min REAL, max REAL, incl_min INTEGER,
        incl_max INTEGER, "match" TEXT, modification_time INTEGER
    );
    CREATE TABLE smooth (
        dp_id INTEGER, el_id INTEGER, type INTEGER, std_type INTEGER, std_time INTEGER,
        std_tol REAL, modification_time INTEGER
    );
    CREATE TABLE distrib (
        dp_id INTEGER, el_id INTEGER, driver_number INTEGER, modification_time INTEGER
    );
"#;

const LAST_VALUE_SCHEMA: &str = r#"
    CREATE TABLE last_value (
        dp_id INTEGER, el_id INTEGER, dyn_idx INTEGER, language_id INTEGER,
        value, variable_type INTEGER, original_time TEXT, system_time TEXT,
        status_64 TEXT, user_id INTEGER, manager_id INTEGER
    );
"#;

/// Temporary project directory with writable handles to its stores
pub struct FixtureProject {
    pub dir: TempDir,
    pub ident: Connection,
    pub config: Connection,
    pub last_value: Connection,
}

impl FixtureProject {
    /// Empty stores with the full schema
    pub fn empty() -> Self {
        let dir = TempDir::new().expect("temp dir");
        let sqlite = dir.path().join("db").join("wincc_oa").join("sqlite");
        std::fs::create_dir_all(&sqlite).expect("sqlite dir");

        let open = |name: &str, schema: &str| {
            let conn = Connection::open(sqlite.join(name)).expect("create store");
            conn.execute_batch(schema).expect("schema");
            conn
        };

        Self {
            ident: open("ident.sqlite", IDENT_SCHEMA),
            config: open("config.sqlite", CONFIG_SCHEMA),
            last_value: open("last_value.sqlite", LAST_VALUE_SCHEMA),
            dir,
        }
    }

    /// Stores populated with a small plant model:
    ///
    /// - `Pump` (dpt 10): root, `state` { `running`, `speed` }, `cmd`, `motor` (ref)
    /// - `ExampleDP_Float` (dpt 20): single float root
    /// - `_Internal` (dpt 30)
    /// - datapoints `Pump1`, `Pump2` (dpt 10), `ExampleDP_Arg1` (dpt 20), `_mp_Pump` (dpt 10)
    pub fn plant() -> Self {
        let fx = Self::empty();

        fx.dp_type(10, "Pump");
        fx.dp_type(20, "ExampleDP_Float");
        fx.dp_type(30, "_Internal");

        fx.element(10, 1, 0, 0, 1, "Pump");
        fx.element(10, 2, 1, 1, 1, "state");
        fx.element(10, 3, 2, 2, 23, "running");
        fx.element(10, 4, 3, 2, 22, "speed");
        fx.element(10, 5, 4, 1, 21, "cmd");
        fx.element(10, 6, 5, 1, 41, "motor");
        fx.element(20, 1, 0, 0, 22, "ExampleDP_Float");

        fx.datapoint(100, 10, "Pump1");
        fx.datapoint(101, 10, "Pump2");
        fx.datapoint(200, 20, "ExampleDP_Arg1");
        fx.datapoint(300, 10, "_mp_Pump");

        fx
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn dp_type(&self, dpt_id: i64, name: &str) {
        self.ident
            .execute(
                "INSERT INTO datapoint_type VALUES (?1, ?2, 100, 1700000000)",
                params![dpt_id, name],
            )
            .expect("insert type");
    }

    pub fn element(&self, dpt_id: i64, el_id: i64, pos: i64, parent: i64, datatype: i64, name: &str) {
        self.ident
            .execute(
                "INSERT INTO datapoint_element VALUES (?1, ?2, ?3, ?4, ?5, NULL, NULL, NULL, ?6, 1700000000)",
                params![el_id, dpt_id, pos, parent, datatype, name],
            )
            .expect("insert element");
    }

    pub fn datapoint(&self, dp_id: i64, dpt_id: i64, name: &str) {
        self.ident
            .execute(
                "INSERT INTO datapoint VALUES (?1, ?2, ?3, 1700000000)",
                params![dp_id, dpt_id, name],
            )
            .expect("insert datapoint");
    }
}
