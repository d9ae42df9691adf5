use std::path::PathBuf;
use std::time::Duration;

/// Hour (local time) at which the on-call shift rotates.
pub const DEFAULT_SHIFT_HOUR: u32 = 17;

#[derive(Debug, Clone)]
pub struct Config {
    /// Port the webhook server listens on
    pub port: u16,
    /// Path to the SQLite database holding the forwarding number
    pub database_url: String,
    /// Roster file (JSON or TOML)
    pub schedule_path: PathBuf,
    /// Number used when the roster has nobody for today or the store is unreadable
    pub default_forward_number: String,
    /// Caller ID presented on forwarded calls
    pub caller_id: Option<String>,
    /// Caller numbers allowed into the administrator menu
    pub admin_numbers: Vec<String>,
    /// Local hour at which the shift changes over
    pub shift_hour: u32,
    /// How often the periodic refresher rewrites the forwarding number
    pub refresh_interval: Duration,
    /// Greeting played to public callers before the transfer
    pub greeting_audio_url: Option<String>,
    /// Text-to-speech voice for spoken prompts
    pub voice: String,
    /// Name of the hotline, spoken in the administrator menu
    pub hotline_name: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let default_forward_number = std::env::var("DEFAULT_FORWARD_NUMBER")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("DEFAULT_FORWARD_NUMBER must be set"))?;

        let shift_hour = env_parse("HOTLINE_SHIFT_HOUR", DEFAULT_SHIFT_HOUR)?;
        if shift_hour > 23 {
            return Err(anyhow::anyhow!(
                "Invalid HOTLINE_SHIFT_HOUR '{shift_hour}'. Expected 0-23"
            ));
        }

        Ok(Self {
            port: env_parse("HOTLINE_PORT", 8787)?,
            database_url: env_str("HOTLINE_DATABASE_URL", "sqlite:./data/hotline.db"),
            schedule_path: PathBuf::from(env_str("HOTLINE_SCHEDULE_PATH", "./schedule.json")),
            default_forward_number: default_forward_number.trim().to_string(),
            caller_id: env_opt("TWILIO_CALLER_ID"),
            admin_numbers: env_csv("HOTLINE_ADMIN_NUMBERS", &[]),
            shift_hour,
            refresh_interval: refresh_interval(env_parse("HOTLINE_REFRESH_INTERVAL_SECS", 3600)?)?,
            greeting_audio_url: env_opt("HOTLINE_GREETING_AUDIO_URL"),
            voice: env_str("HOTLINE_VOICE", "Polly.Joanna"),
            hotline_name: env_str("HOTLINE_NAME", "the hotline"),
        })
    }
}

fn refresh_interval(secs: u64) -> anyhow::Result<Duration> {
    if secs == 0 {
        return Err(anyhow::anyhow!(
            "Invalid HOTLINE_REFRESH_INTERVAL_SECS '0'. Expected a positive number of seconds"
        ));
    }
    Ok(Duration::from_secs(secs))
}

fn env_str(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> anyhow::Result<T>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(val) => val
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("Failed to parse env var {key}={val}: {e}")),
        Err(_) => Ok(default),
    }
}

fn env_csv(key: &str, default: &[&str]) -> Vec<String> {
    match std::env::var(key) {
        Ok(raw) => parse_csv(&raw),
        Err(_) => default.iter().map(|s| (*s).to_string()).collect(),
    }
}

fn parse_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}
