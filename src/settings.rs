//! Layered settings for both tools.
//!
//! Sources, lowest priority first:
//! * built-in defaults (the values the tools were originally hard-wired to),
//! * an optional JSON file (`itinerary-tools.json` in the working directory,
//!   or the file given with `--config`, which then must exist),
//! * environment variables prefixed `ITINERARY_TOOLS`, nested with `__`
//!   (e.g. `ITINERARY_TOOLS__DIAGNOSTICS__QUOTE_ID=DVI2025126`).
//!
//! Command line arguments are applied on top by `main`.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, ToolError};
use crate::strip::{ImportRule, StripRules};

pub const DEFAULT_SETTINGS_FILE: &str = "itinerary-tools.json";
pub const ENV_PREFIX: &str = "ITINERARY_TOOLS";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub log_level: Option<String>,
    pub strip: StripSettings,
    pub diagnostics: DiagnosticsSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StripSettings {
    pub target: PathBuf,
    pub call: String,
    pub dead_fields: Vec<String>,
    pub imports: Vec<ImportRule>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DiagnosticsSettings {
    pub database: PathBuf,
    pub quote_id: String,
    pub group_type: i64,
}

impl Default for StripSettings {
    fn default() -> Self {
        let rules = StripRules::default();
        Self {
            target: PathBuf::from("src/modules/itineraries/engines/helpers/timeline.builder.ts"),
            call: rules.call,
            dead_fields: rules.dead_fields,
            imports: rules.imports,
        }
    }
}

impl Default for DiagnosticsSettings {
    fn default() -> Self {
        Self {
            database: PathBuf::from("dvi_travels.db"),
            quote_id: "DVI2025125".to_string(),
            group_type: 1,
        }
    }
}

impl DiagnosticsSettings {
    /// Command line values win over everything loaded from files or the environment.
    pub fn override_with(&mut self, quote_id: Option<String>, database: Option<PathBuf>, group_type: Option<i64>) {
        if let Some(quote_id) = quote_id {
            self.quote_id = quote_id;
        }
        if let Some(database) = database {
            self.database = database;
        }
        if let Some(group_type) = group_type {
            self.group_type = group_type;
        }
    }
}

impl StripSettings {
    pub fn rules(&self) -> StripRules {
        StripRules {
            call: self.call.clone(),
            dead_fields: self.dead_fields.clone(),
            imports: self.imports.clone(),
        }
    }
}

impl Settings {
    /// Load settings, reading `explicit` if given (it must exist) or the
    /// default settings file if present.
    pub fn load(explicit: Option<&Path>) -> Result<Settings> {
        let file = match explicit {
            Some(path) => File::from(path).format(FileFormat::Json).required(true),
            None => File::new(DEFAULT_SETTINGS_FILE, FileFormat::Json).required(false),
        };
        let settings = Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix(ENV_PREFIX).prefix_separator("__").separator("__").try_parsing(true))
            .build()?
            .try_deserialize::<Settings>()?;
        settings.validate()?;
        debug!(?settings, "settings loaded");
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.strip.call.trim().is_empty() {
            return Err(ToolError::Config("strip.call must name a call expression".to_string()));
        }
        Ok(())
    }
}
