//! Read-only diagnostics for one itinerary quote.
//!
//! Three lookups run in sequence against the itinerary database: the plan
//! row for the quote, the plan's live routes in order, and the plan's live
//! hotel rows of one group type together with the hotel master data. When no
//! plan matches the quote, the route and hotel lookups are never issued.
//!
//! The schema belongs to the planner; only the columns below are read.

use std::io::Write;
use std::path::Path;

use chrono::NaiveDate;
use rusqlite::{Connection, OpenFlags, OptionalExtension, Row, params};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{Result, ToolError};
use crate::settings::DiagnosticsSettings;

const PLAN_QUERY: &str = "
    select itinerary_plan_ID,
            itinerary_quote_ID,
            arrival_location,
            departure_location
        from dvi_itinerary_plan_details
        where itinerary_quote_ID = ?
";

const ROUTES_QUERY: &str = "
    select itinerary_route_ID,
            itinerary_route_date,
            location_name,
            next_visiting_location
        from dvi_itinerary_route_details
        where itinerary_plan_ID = ?
        and deleted = 0
        order by itinerary_route_ID asc
";

const HOTELS_QUERY: &str = "
    select h.itinerary_route_id,
            h.hotel_id,
            h.itinerary_route_location,
            m.hotel_name,
            m.hotel_city
        from dvi_itinerary_plan_hotel_details h
        left join dvi_hotel m
        on h.hotel_id = m.hotel_id
        where h.itinerary_plan_id = ?
        and h.deleted = 0
        and h.group_type = ?
        order by h.itinerary_route_id asc
";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plan {
    pub plan_id: i64,
    pub quote_id: String,
    pub arrival_location: Option<String>,
    pub departure_location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteStop {
    pub route_id: i64,
    pub date: Option<NaiveDate>,
    pub location: Option<String>,
    pub next_location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HotelStay {
    pub route_id: Option<i64>,
    pub hotel_id: Option<i64>,
    pub route_location: Option<String>,
    pub hotel_name: Option<String>,
    pub hotel_city: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QuoteReport {
    pub plan: Option<Plan>,
    pub routes: Vec<RouteStop>,
    pub hotels: Vec<HotelStay>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl Plan {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            plan_id: row.get(0)?,
            quote_id: row.get(1)?,
            arrival_location: row.get(2)?,
            departure_location: row.get(3)?,
        })
    }
}

impl RouteStop {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            route_id: row.get(0)?,
            date: row.get(1)?,
            location: row.get(2)?,
            next_location: row.get(3)?,
        })
    }
}

impl HotelStay {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            route_id: row.get(0)?,
            hotel_id: row.get(1)?,
            route_location: row.get(2)?,
            hotel_name: row.get(3)?,
            hotel_city: row.get(4)?,
        })
    }
}

/// Opens the database read-only; a missing file is an error, not a new database.
pub fn open(path: &Path) -> Result<Connection> {
    let connection = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(|e| ToolError::Database(format!("cannot open '{}': {e}", path.display())))?;
    debug!(path = %path.display(), "database opened");
    Ok(connection)
}

pub fn fetch_plan(connection: &Connection, quote_id: &str) -> Result<Option<Plan>> {
    let plan = connection
        .prepare(PLAN_QUERY)?
        .query_row(params![quote_id], Plan::from_row)
        .optional()?;
    Ok(plan)
}

pub fn fetch_routes(connection: &Connection, plan_id: i64) -> Result<Vec<RouteStop>> {
    let mut statement = connection.prepare(ROUTES_QUERY)?;
    let routes = statement
        .query_map(params![plan_id], RouteStop::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(routes)
}

pub fn fetch_hotels(connection: &Connection, plan_id: i64, group_type: i64) -> Result<Vec<HotelStay>> {
    let mut statement = connection.prepare(HOTELS_QUERY)?;
    let hotels = statement
        .query_map(params![plan_id, group_type], HotelStay::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(hotels)
}

pub fn inspect(connection: &Connection, quote_id: &str, group_type: i64) -> Result<QuoteReport> {
    let Some(plan) = fetch_plan(connection, quote_id)? else {
        info!(quote_id, "no plan for quote");
        return Ok(QuoteReport::default());
    };
    let routes = fetch_routes(connection, plan.plan_id)?;
    let hotels = fetch_hotels(connection, plan.plan_id, group_type)?;
    info!(
        quote_id,
        plan_id = plan.plan_id,
        routes = routes.len(),
        hotels = hotels.len(),
        "quote inspected"
    );
    Ok(QuoteReport { plan: Some(plan), routes, hotels })
}

fn show<T: std::fmt::Display>(value: &Option<T>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "None".to_string(),
    }
}

pub fn render_text(report: &QuoteReport, group_type: i64, out: &mut dyn Write) -> std::io::Result<()> {
    let Some(plan) = &report.plan else {
        return writeln!(out, "Plan: None");
    };
    writeln!(
        out,
        "Plan: ID: {}, Quote: {}, Arrival: {}, Departure: {}",
        plan.plan_id,
        plan.quote_id,
        show(&plan.arrival_location),
        show(&plan.departure_location)
    )?;
    writeln!(out, "\nRoutes:")?;
    for r in &report.routes {
        writeln!(
            out,
            "Route ID: {}, Date: {}, Location: {}, Next: {}",
            r.route_id,
            show(&r.date),
            show(&r.location),
            show(&r.next_location)
        )?;
    }
    writeln!(out, "\nHotels (Group {group_type}):")?;
    for h in &report.hotels {
        writeln!(
            out,
            "Route ID: {}, Hotel ID: {}, Name: {}, City: {}, Location in Row: {}",
            show(&h.route_id),
            show(&h.hotel_id),
            show(&h.hotel_name),
            show(&h.hotel_city),
            show(&h.route_location)
        )?;
    }
    Ok(())
}

pub fn render_json(report: &QuoteReport, out: &mut dyn Write) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out)?;
    Ok(())
}

fn inspect_and_render(settings: &DiagnosticsSettings, format: OutputFormat, out: &mut dyn Write) -> Result<()> {
    let connection = open(&settings.database)?;
    let report = inspect(&connection, &settings.quote_id, settings.group_type)?;
    match format {
        OutputFormat::Text => render_text(&report, settings.group_type, out)?,
        OutputFormat::Json => render_json(&report, out)?,
    }
    Ok(())
}

/// Runs the diagnostics and reports any failure as text on `out`. The
/// connection is dropped before this returns, on success and failure alike.
pub fn run(settings: &DiagnosticsSettings, format: OutputFormat, out: &mut dyn Write) {
    if let Err(e) = inspect_and_render(settings, format, out) {
        warn!(error = %e, "diagnostics failed");
        let _ = writeln!(out, "Error: {e}");
    }
}
