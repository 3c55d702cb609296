//! Itinerary tools – maintenance utilities for the itinerary planner.
//!
//! Two independent tools share this crate and nothing else but its ambient
//! plumbing (errors, settings, logging):
//!
//! * [`strip`] – removes `this.log(...)` calls from a TypeScript source file,
//!   then the log file field and the `fs` / `path` imports that no longer
//!   have a use. The file is rewritten through a temporary file and a rename.
//! * [`diagnostics`] – looks up one quote in the itinerary database and
//!   prints its plan, its live routes and its hotel rows for one group type.
//!
//! ## Modules
//! * [`error`] – The crate wide [`error::ToolError`] and `Result` alias.
//! * [`settings`] – Layered configuration (defaults, JSON file, environment).
//! * [`logging`] – `tracing` subscriber setup.
//!
//! ## Quick Start
//! ```
//! use itinerary_tools::strip::{strip, StripRules};
//! let source = "run() {\n    this.log('starting');\n    go();\n}\n";
//! let outcome = strip(source, &StripRules::default()).unwrap();
//! assert_eq!(outcome.text, "run() {\n    go();\n}\n");
//! assert_eq!(outcome.report.single_line_calls, 1);
//! ```
//!
//! ```
//! use rusqlite::Connection;
//! use itinerary_tools::diagnostics::inspect;
//! let conn = Connection::open_in_memory().unwrap();
//! conn.execute_batch("create table dvi_itinerary_plan_details (
//!     itinerary_plan_ID integer, itinerary_quote_ID text,
//!     arrival_location text, departure_location text);").unwrap();
//! let report = inspect(&conn, "DVI2025125", 1).unwrap();
//! assert!(report.plan.is_none());
//! ```

pub mod diagnostics;
pub mod error;
pub mod logging;
pub mod settings;
pub mod strip;
