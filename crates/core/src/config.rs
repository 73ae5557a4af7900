use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calendar::{self, MovingDatePolicy};
use crate::errors::ApplicationError;

pub const DEFAULT_CONFIG_FILE: &str = "movequote.toml";
pub const NESTED_CONFIG_FILE: &str = "config/movequote.toml";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub calendar: CalendarConfig,
    pub submission: SubmissionConfig,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Debug)]
pub struct CalendarConfig {
    pub weekend_surcharge: String,
    /// Pins "today" for reproducible runs; the local date is used otherwise.
    pub today_override: Option<NaiveDate>,
}

#[derive(Clone, Debug)]
pub struct SubmissionConfig {
    pub output_dir: PathBuf,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
    pub today: Option<NaiveDate>,
    pub submission_output_dir: Option<PathBuf>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl From<ConfigError> for ApplicationError {
    fn from(value: ConfigError) -> Self {
        Self::Configuration(value.to_string())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
            calendar: CalendarConfig { weekend_surcharge: "+10%".to_string(), today_override: None },
            submission: SubmissionConfig { output_dir: PathBuf::from("quote-requests") },
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl CalendarConfig {
    pub fn today(&self) -> NaiveDate {
        self.today_override.unwrap_or_else(calendar::today)
    }

    pub fn date_policy(&self) -> MovingDatePolicy {
        MovingDatePolicy::new(self.today(), self.weekend_surcharge.clone())
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch)?;
        } else if options.require_file {
            let expected =
                options.config_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) -> Result<(), ConfigError> {
        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }

        if let Some(calendar) = patch.calendar {
            if let Some(weekend_surcharge) = calendar.weekend_surcharge {
                self.calendar.weekend_surcharge = weekend_surcharge;
            }
            if let Some(today) = calendar.today_override {
                self.calendar.today_override = Some(calendar::parse_iso_date(&today).map_err(
                    |_| {
                        ConfigError::Validation(format!(
                            "calendar.today_override must be a YYYY-MM-DD date, got `{today}`"
                        ))
                    },
                )?);
            }
        }

        if let Some(submission) = patch.submission {
            if let Some(output_dir) = submission.output_dir {
                self.submission.output_dir = output_dir;
            }
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        let log_level =
            read_env("MOVEQUOTE_LOGGING_LEVEL").or_else(|| read_env("MOVEQUOTE_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("MOVEQUOTE_LOGGING_FORMAT").or_else(|| read_env("MOVEQUOTE_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        if let Some(value) = read_env("MOVEQUOTE_CALENDAR_WEEKEND_SURCHARGE") {
            self.calendar.weekend_surcharge = value;
        }
        if let Some(value) = read_env("MOVEQUOTE_CALENDAR_TODAY") {
            self.calendar.today_override = Some(parse_date("MOVEQUOTE_CALENDAR_TODAY", &value)?);
        }

        if let Some(value) = read_env("MOVEQUOTE_SUBMISSION_OUTPUT_DIR") {
            self.submission.output_dir = PathBuf::from(value);
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(log_format) = overrides.log_format {
            self.logging.format = log_format;
        }
        if let Some(today) = overrides.today {
            self.calendar.today_override = Some(today);
        }
        if let Some(output_dir) = overrides.submission_output_dir {
            self.submission.output_dir = output_dir;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_logging(&self.logging)?;
        validate_calendar(&self.calendar)?;
        validate_submission(&self.submission)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from(NESTED_CONFIG_FILE)]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn validate_calendar(calendar: &CalendarConfig) -> Result<(), ConfigError> {
    if calendar.weekend_surcharge.trim().is_empty() {
        return Err(ConfigError::Validation(
            "calendar.weekend_surcharge must not be empty (e.g. `+10%`)".to_string(),
        ));
    }

    Ok(())
}

fn validate_submission(submission: &SubmissionConfig) -> Result<(), ConfigError> {
    if submission.output_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "submission.output_dir must point at a directory".to_string(),
        ));
    }

    Ok(())
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_date(key: &str, value: &str) -> Result<NaiveDate, ConfigError> {
    calendar::parse_iso_date(value).map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    logging: Option<LoggingPatch>,
    calendar: Option<CalendarPatch>,
    submission: Option<SubmissionPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

#[derive(Debug, Default, Deserialize)]
struct CalendarPatch {
    weekend_surcharge: Option<String>,
    today_override: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct SubmissionPatch {
    output_dir: Option<PathBuf>,
}
