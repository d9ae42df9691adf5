use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use roster_types::{Schedule, Weekday};
use tracing::info;

/// Errors raised while loading the roster file.
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error("Failed to read schedule file at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse schedule JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse schedule TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Unknown time zone '{0}'")]
    UnknownTimezone(String),

    #[error("Weekday {0} is listed more than once")]
    DuplicateWeekday(Weekday),

    #[error("Weekday {0} has no callers")]
    EmptyRoster(Weekday),
}

/// A validated roster together with its parsed time zone.
#[derive(Debug, Clone)]
pub struct ScheduleConfig {
    pub schedule: Schedule,
    pub tz: Tz,
}

impl ScheduleConfig {
    /// Validate a roster: known zone, one roster per weekday, no empty rosters.
    pub fn new(schedule: Schedule) -> Result<Self, ScheduleError> {
        let tz: Tz = schedule
            .timezone
            .parse()
            .map_err(|_| ScheduleError::UnknownTimezone(schedule.timezone.clone()))?;

        let mut seen = HashSet::new();
        for day in &schedule.days {
            if !seen.insert(day.key) {
                return Err(ScheduleError::DuplicateWeekday(day.key));
            }
            if day.callers.is_empty() {
                return Err(ScheduleError::EmptyRoster(day.key));
            }
        }

        Ok(Self { schedule, tz })
    }

    pub fn from_json(raw: &str) -> Result<Self, ScheduleError> {
        Self::new(serde_json::from_str(raw)?)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ScheduleError> {
        Self::new(toml::from_str(raw)?)
    }
}

/// Load and validate the roster file. `.toml` files are read as TOML, anything else as JSON.
pub fn load_schedule(path: &Path) -> Result<ScheduleConfig, ScheduleError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ScheduleError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let config = match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => ScheduleConfig::from_toml(&raw)?,
        _ => ScheduleConfig::from_json(&raw)?,
    };

    info!(
        path = %path.display(),
        timezone = config.tz.name(),
        weekdays = config.schedule.days.len(),
        "loaded volunteer schedule"
    );
    Ok(config)
}
