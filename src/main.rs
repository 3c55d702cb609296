use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::error;

use itinerary_tools::diagnostics::{self, OutputFormat};
use itinerary_tools::error::Result;
use itinerary_tools::logging;
use itinerary_tools::settings::Settings;
use itinerary_tools::strip::{self, WriteMode};

#[derive(Parser, Debug)]
#[command(name = "itinerary-tools", version, about = "Maintenance tools for the itinerary planner")]
struct Cli {
    /// JSON settings file (defaults to ./itinerary-tools.json when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Remove logging calls and the imports they leave unused from a source file
    StripLogs {
        /// Source file to rewrite
        path: Option<PathBuf>,
        /// Report what would be removed without touching the file
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the plan, routes and hotels stored for a quote
    CheckQuote {
        quote_id: Option<String>,
        /// SQLite database file
        #[arg(long)]
        database: Option<PathBuf>,
        #[arg(long)]
        group_type: Option<i64>,
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Format {
    Text,
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
        }
    }
}

fn strip_logs(settings: &Settings, path: Option<PathBuf>, dry_run: bool) -> Result<()> {
    let path = path.unwrap_or_else(|| settings.strip.target.clone());
    let rules = settings.strip.rules();
    let mode = if dry_run { WriteMode::DryRun } else { WriteMode::InPlace };
    let report = strip::strip_file(&path, &rules, mode)?;
    let verb = if dry_run { "Would remove" } else { "Removed" };
    println!("{verb} all {}() calls from {}", rules.call, path.display());
    println!(
        "  calls: {} single-line, {} multi-line ({} lines); fields: {}; imports: {}",
        report.single_line_calls,
        report.multi_line_calls,
        report.lines_dropped,
        report.dead_fields,
        if report.pruned_imports.is_empty() {
            "none".to_string()
        } else {
            report.pruned_imports.join(", ")
        }
    );
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let mut settings = match Settings::load(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            logging::init(cli.debug, None);
            error!(error = %e, "cannot load settings");
            return ExitCode::FAILURE;
        }
    };
    logging::init(cli.debug, settings.log_level.as_deref());

    match cli.command {
        Command::StripLogs { path, dry_run } => match strip_logs(&settings, path, dry_run) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!(error = %e, "strip failed");
                ExitCode::FAILURE
            }
        },
        Command::CheckQuote { quote_id, database, group_type, format } => {
            settings.diagnostics.override_with(quote_id, database, group_type);
            let stdout = std::io::stdout();
            diagnostics::run(&settings.diagnostics, format.into(), &mut stdout.lock());
            ExitCode::SUCCESS
        }
    }
}
