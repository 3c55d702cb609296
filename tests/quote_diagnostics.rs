use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use itinerary_tools::diagnostics::{OutputFormat, fetch_hotels, fetch_routes, inspect, render_text, run};
use itinerary_tools::settings::DiagnosticsSettings;
use rusqlite::Connection;

const SCHEMA: &str = "
    create table dvi_itinerary_plan_details (
        itinerary_plan_ID integer primary key,
        itinerary_quote_ID text not null,
        arrival_location text,
        departure_location text
    );
    create table dvi_itinerary_route_details (
        itinerary_route_ID integer primary key,
        itinerary_plan_ID integer not null,
        itinerary_route_date text,
        location_name text,
        next_visiting_location text,
        deleted integer not null default 0
    );
    create table dvi_itinerary_plan_hotel_details (
        itinerary_plan_hotel_details_ID integer primary key,
        itinerary_plan_id integer not null,
        itinerary_route_id integer,
        hotel_id integer,
        itinerary_route_location text,
        group_type integer not null,
        deleted integer not null default 0
    );
    create table dvi_hotel (
        hotel_id integer primary key,
        hotel_name text,
        hotel_city text
    );
";

const SEED: &str = "
    insert into dvi_itinerary_plan_details values (17, 'DVI2025125', 'Chennai', 'Madurai');
    insert into dvi_itinerary_plan_details values (18, 'DVI2025126', 'Trichy', null);
    insert into dvi_itinerary_route_details values (5, 17, '2025-12-01', 'Mahabalipuram', 'Madurai', 0);
    insert into dvi_itinerary_route_details values (4, 17, '2025-11-30', 'Chennai', 'Mahabalipuram', 0);
    insert into dvi_itinerary_route_details values (6, 17, '2025-12-02', 'Madurai', 'Madurai', 1);
    insert into dvi_hotel values (100, 'Taj Coromandel', 'Chennai');
    insert into dvi_itinerary_plan_hotel_details values (1, 17, 5, 999, 'Mahabalipuram', 1, 0);
    insert into dvi_itinerary_plan_hotel_details values (2, 17, 4, 100, 'Chennai', 1, 0);
    insert into dvi_itinerary_plan_hotel_details values (3, 17, 4, 100, 'Chennai', 2, 0);
    insert into dvi_itinerary_plan_hotel_details values (4, 17, 5, 100, 'Mahabalipuram', 1, 1);
";

fn seeded() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(SCHEMA).unwrap();
    conn.execute_batch(SEED).unwrap();
    conn
}

fn seeded_file(dir: &Path) -> PathBuf {
    let path = dir.join("dvi_travels.db");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(SCHEMA).unwrap();
    conn.execute_batch(SEED).unwrap();
    path
}

fn settings(database: PathBuf, quote_id: &str) -> DiagnosticsSettings {
    DiagnosticsSettings { database, quote_id: quote_id.to_string(), group_type: 1 }
}

fn output(settings: &DiagnosticsSettings, format: OutputFormat) -> String {
    let mut out = Vec::new();
    run(settings, format, &mut out);
    String::from_utf8(out).unwrap()
}

#[test]
fn routes_are_live_and_ordered() {
    let conn = seeded();
    let routes = fetch_routes(&conn, 17).unwrap();
    let ids: Vec<i64> = routes.iter().map(|r| r.route_id).collect();
    assert_eq!(ids, vec![4, 5]);
    assert_eq!(routes[0].date, NaiveDate::from_ymd_opt(2025, 11, 30));
}

#[test]
fn hotels_filtered_by_group_and_joined() {
    let conn = seeded();
    let hotels = fetch_hotels(&conn, 17, 1).unwrap();
    assert_eq!(hotels.len(), 2);
    assert_eq!(hotels[0].hotel_name.as_deref(), Some("Taj Coromandel"));
    // no master row for hotel 999
    assert_eq!(hotels[1].hotel_id, Some(999));
    assert_eq!(hotels[1].hotel_name, None);
    assert_eq!(fetch_hotels(&conn, 17, 2).unwrap().len(), 1);
}

#[test]
fn text_report_layout() {
    let conn = seeded();
    let report = inspect(&conn, "DVI2025125", 1).unwrap();
    let mut out = Vec::new();
    render_text(&report, 1, &mut out).unwrap();
    let expected = "\
Plan: ID: 17, Quote: DVI2025125, Arrival: Chennai, Departure: Madurai

Routes:
Route ID: 4, Date: 2025-11-30, Location: Chennai, Next: Mahabalipuram
Route ID: 5, Date: 2025-12-01, Location: Mahabalipuram, Next: Madurai

Hotels (Group 1):
Route ID: 4, Hotel ID: 100, Name: Taj Coromandel, City: Chennai, Location in Row: Chennai
Route ID: 5, Hotel ID: 999, Name: None, City: None, Location in Row: Mahabalipuram
";
    assert_eq!(String::from_utf8(out).unwrap(), expected);
}

#[test]
fn plan_without_routes_prints_empty_sections() {
    let conn = seeded();
    let report = inspect(&conn, "DVI2025126", 1).unwrap();
    assert!(report.routes.is_empty());
    let mut out = Vec::new();
    render_text(&report, 1, &mut out).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "Plan: ID: 18, Quote: DVI2025126, Arrival: Trichy, Departure: None\n\nRoutes:\n\nHotels (Group 1):\n"
    );
}

#[test]
fn unknown_quote_skips_route_and_hotel_lookups() {
    // only the plan table exists, so any further query would fail
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "create table dvi_itinerary_plan_details (
            itinerary_plan_ID integer, itinerary_quote_ID text,
            arrival_location text, departure_location text);",
    )
    .unwrap();
    let report = inspect(&conn, "DVI0000000", 1).expect("no further queries");
    assert!(report.plan.is_none());
    assert!(report.routes.is_empty() && report.hotels.is_empty());
}

#[test]
fn run_prints_report_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let text = output(&settings(seeded_file(dir.path()), "DVI2025125"), OutputFormat::Text);
    assert!(text.starts_with("Plan: ID: 17,"), "got {text}");
    assert_eq!(text.lines().filter(|l| l.starts_with("Route ID:")).count(), 4);
}

#[test]
fn run_unknown_quote_prints_none() {
    let dir = tempfile::tempdir().unwrap();
    let text = output(&settings(seeded_file(dir.path()), "DVI0000000"), OutputFormat::Text);
    assert_eq!(text, "Plan: None\n");
}

#[test]
fn run_json_report() {
    let dir = tempfile::tempdir().unwrap();
    let text = output(&settings(seeded_file(dir.path()), "DVI2025125"), OutputFormat::Json);
    let value: serde_json::Value = serde_json::from_str(&text).expect("json");
    assert_eq!(value["plan"]["plan_id"], 17);
    assert_eq!(value["routes"].as_array().unwrap().len(), 2);
    assert_eq!(value["routes"][0]["date"], "2025-11-30");
    assert!(value["hotels"][1]["hotel_name"].is_null());
}

#[test]
fn missing_database_reported_as_text() {
    let dir = tempfile::tempdir().unwrap();
    let text = output(&settings(dir.path().join("missing.db"), "DVI2025125"), OutputFormat::Text);
    assert!(text.starts_with("Error: Database error: cannot open"), "got {text}");
    assert!(!dir.path().join("missing.db").exists(), "read-only open must not create the file");
}

#[test]
fn query_failure_reported_as_text() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.db");
    Connection::open(&path).unwrap().execute_batch("create table unrelated (id integer);").unwrap();
    let text = output(&settings(path, "DVI2025125"), OutputFormat::Text);
    assert!(text.starts_with("Error: Database error:"), "got {text}");
    assert!(text.contains("dvi_itinerary_plan_details"), "got {text}");
}
