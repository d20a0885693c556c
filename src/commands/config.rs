//! Configuration commands.
//!
//! - `config show`: Display current configuration
//! - `config get`: Print a single value
//! - `config set`: Set a configuration value

use std::env;

use owo_colors::OwoColorize;
use serde_json::json;

use super::CommandOutput;
use crate::cli::OutputOptions;
use crate::config::{CONFIG_KEYS, Config};
use crate::error::Result;

/// Whether the API URL is currently coming from the environment
fn api_url_from_env() -> bool {
    env::var("EVENTBOARD_API_URL").is_ok_and(|v| !v.is_empty())
}

/// Show current configuration
pub fn cmd_config_show(output: OutputOptions) -> Result<()> {
    let config = Config::load()?;

    let mut values = serde_json::Map::new();
    for key in CONFIG_KEYS {
        values.insert((*key).to_string(), json!(config.get(key)?));
    }
    let json_output = json!({
        "values": values,
        "api_url_from_env": api_url_from_env(),
        "config_file": Config::config_path().to_string_lossy(),
    });

    let mut text_output = String::new();
    text_output.push_str(&format!("{}\n\n", "Configuration:".cyan().bold()));
    for key in CONFIG_KEYS {
        let mut line = format!("{}: {}", key.cyan(), config.get(key)?);
        if *key == "api_url" && api_url_from_env() {
            line.push_str(&format!(" {}", "(from EVENTBOARD_API_URL)".dimmed()));
        }
        text_output.push_str(&line);
        text_output.push('\n');
    }
    text_output.push('\n');
    text_output.push_str(&format!(
        "{}",
        format!("Config file: {}", Config::config_path().display()).dimmed()
    ));

    CommandOutput::new(json_output)
        .with_text(text_output)
        .print(output)
}

/// Set a configuration value
pub fn cmd_config_set(key: &str, value: &str, output: OutputOptions) -> Result<()> {
    let mut config = Config::load()?;
    config.set(key, value)?;
    config.save()?;

    let stored = config.get(key)?;
    let json_output = json!({
        "action": "config_set",
        "key": key,
        "value": stored,
        "success": true,
    });
    let mut text_output = format!("Set {} to {}", key.cyan(), stored);
    if key == "api_url" && api_url_from_env() {
        text_output.push_str(&format!(
            "\n{}",
            "Note: EVENTBOARD_API_URL is set and takes precedence".yellow()
        ));
    }

    CommandOutput::new(json_output)
        .with_text(text_output)
        .print(output)
}

/// Get a specific configuration value
pub fn cmd_config_get(key: &str, output: OutputOptions) -> Result<()> {
    let config = Config::load()?;
    let value = config.get(key)?;

    CommandOutput::new(json!({
        "key": key,
        "value": value,
    }))
    .with_text(value.clone())
    .print(output)
}
