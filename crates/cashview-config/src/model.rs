use serde::{de::Deserializer, Deserialize, Serialize};
use std::{
    fmt,
    path::{Path, PathBuf},
};
use uuid::Uuid;

use crate::ConfigError;

const MAX_REPORT_MONTHS: u32 = 120;

/// Stores user-configurable CLI preferences and report defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    #[serde(default = "Config::default_cash_flow_months")]
    pub cash_flow_months: u32,
    #[serde(default = "Config::default_savings_months")]
    pub savings_months: u32,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
    #[serde(default)]
    pub output: OutputFormat,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Profile used when no `--user` flag is given. Assigned on first use.
    pub default_user: Option<Uuid>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom data file. Defaults to `records.json` under the base directory.
    pub data_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-US".into(),
            currency: "USD".into(),
            cash_flow_months: Self::default_cash_flow_months(),
            savings_months: Self::default_savings_months(),
            ui_color_enabled: Self::default_ui_color_enabled(),
            output: OutputFormat::default(),
            default_user: None,
            data_file: None,
        }
    }
}

impl Config {
    pub const KEYS: [&'static str; 8] = [
        "locale",
        "currency",
        "cash_flow_months",
        "savings_months",
        "ui_color_enabled",
        "output",
        "default_user",
        "data_file",
    ];

    pub fn default_cash_flow_months() -> u32 {
        6
    }

    pub fn default_savings_months() -> u32 {
        12
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn resolve_data_file(&self, base: &Path) -> PathBuf {
        match &self.data_file {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => base.join(path),
            None => base.join("records.json"),
        }
    }

    /// Renders one key for display. Unset optional keys render as an empty string.
    pub fn get_value(&self, key: &str) -> Result<String, ConfigError> {
        let value = match key {
            "locale" => self.locale.clone(),
            "currency" => self.currency.clone(),
            "cash_flow_months" => self.cash_flow_months.to_string(),
            "savings_months" => self.savings_months.to_string(),
            "ui_color_enabled" => self.ui_color_enabled.to_string(),
            "output" => self.output.to_string(),
            "default_user" => self
                .default_user
                .map(|id| id.to_string())
                .unwrap_or_default(),
            "data_file" => self
                .data_file
                .as_ref()
                .map(|path| path.display().to_string())
                .unwrap_or_default(),
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        };
        Ok(value)
    }

    /// Parses and assigns one key. An empty value clears optional keys.
    pub fn set_value(&mut self, key: &str, raw: &str) -> Result<(), ConfigError> {
        let value = raw.trim();
        let invalid = |reason: &str| ConfigError::InvalidValue {
            key: key.to_string(),
            reason: reason.to_string(),
        };
        match key {
            "locale" | "currency" if value.is_empty() => return Err(invalid("must not be empty")),
            "locale" => self.locale = value.to_string(),
            "currency" => self.currency = value.to_ascii_uppercase(),
            "cash_flow_months" => self.cash_flow_months = parse_months(value).map_err(invalid)?,
            "savings_months" => self.savings_months = parse_months(value).map_err(invalid)?,
            "ui_color_enabled" => {
                self.ui_color_enabled = parse_flag(value).ok_or_else(|| invalid("expected on/off"))?
            }
            "output" => {
                self.output =
                    OutputFormat::parse(value).ok_or_else(|| invalid("expected table or json"))?
            }
            "default_user" if value.is_empty() => self.default_user = None,
            "default_user" => {
                self.default_user =
                    Some(Uuid::parse_str(value).map_err(|_| invalid("expected a UUID"))?)
            }
            "data_file" if value.is_empty() => self.data_file = None,
            "data_file" => self.data_file = Some(PathBuf::from(value)),
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }
}

fn parse_months(value: &str) -> Result<u32, &'static str> {
    match value.parse::<u32>() {
        Ok(months) if months <= MAX_REPORT_MONTHS => Ok(months),
        Ok(_) => Err("must be at most 120"),
        Err(_) => Err("expected a non-negative integer"),
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Some(true),
        "off" | "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

/// How the CLI renders reports when no `--json` flag is given.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "table" => Some(OutputFormat::Table),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }

    fn from_value(value: Option<String>) -> Self {
        value
            .as_deref()
            .and_then(OutputFormat::parse)
            .unwrap_or_default()
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OutputFormat::Table => "table",
            OutputFormat::Json => "json",
        };
        f.write_str(label)
    }
}

impl<'de> Deserialize<'de> for OutputFormat {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(OutputFormat::from_value(value))
    }
}
