use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use movequote_core::config::{
    AppConfig, LoadOptions, DEFAULT_CONFIG_FILE, NESTED_CONFIG_FILE,
};
use toml::Value;

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key_path: &str, env_keys: &[&str]| {
        field_source(key_path, env_keys, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];

    lines.push(render_line(
        "logging.level",
        &config.logging.level,
        source("logging.level", &["MOVEQUOTE_LOGGING_LEVEL", "MOVEQUOTE_LOG_LEVEL"]),
    ));
    lines.push(render_line(
        "logging.format",
        &format!("{:?}", config.logging.format),
        source("logging.format", &["MOVEQUOTE_LOGGING_FORMAT", "MOVEQUOTE_LOG_FORMAT"]),
    ));

    lines.push(render_line(
        "calendar.weekend_surcharge",
        &config.calendar.weekend_surcharge,
        source("calendar.weekend_surcharge", &["MOVEQUOTE_CALENDAR_WEEKEND_SURCHARGE"]),
    ));
    let today_override = config
        .calendar
        .today_override
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "<unset>".to_string());
    lines.push(render_line(
        "calendar.today_override",
        &today_override,
        source("calendar.today_override", &["MOVEQUOTE_CALENDAR_TODAY"]),
    ));

    lines.push(render_line(
        "submission.output_dir",
        &config.submission.output_dir.display().to_string(),
        source("submission.output_dir", &["MOVEQUOTE_SUBMISSION_OUTPUT_DIR"]),
    ));

    lines.join("\n")
}

fn detect_config_path() -> Option<PathBuf> {
    [PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from(NESTED_CONFIG_FILE)]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
