use chrono::{DateTime, Utc};
use console::style;
use serde::Serialize;

use crate::error::{HmError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
    Jsonl,
}

impl OutputFormat {
    /// Robot-mode format named in config; unknown names fall back to JSON.
    #[must_use]
    pub fn from_robot_config(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "jsonl" => Self::Jsonl,
            _ => Self::Json,
        }
    }
}

#[derive(Serialize)]
pub struct RobotResponse<T> {
    pub status: RobotStatus,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub data: T,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RobotStatus {
    Ok,
    Error { code: String, message: String },
}

pub fn robot_ok<T: Serialize>(data: T) -> RobotResponse<T> {
    RobotResponse {
        status: RobotStatus::Ok,
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        data,
        warnings: Vec::new(),
    }
}

pub fn robot_error(
    code: impl Into<String>,
    message: impl Into<String>,
) -> RobotResponse<serde_json::Value> {
    RobotResponse {
        status: RobotStatus::Error {
            code: code.into(),
            message: message.into(),
        },
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        data: serde_json::Value::Null,
        warnings: Vec::new(),
    }
}

/// Stable machine-readable code for an error.
#[must_use]
pub const fn error_code(err: &HmError) -> &'static str {
    match err {
        HmError::Database(_) => "database",
        HmError::Io(_) => "io",
        HmError::Config(_) | HmError::MissingConfig(_) => "config",
        HmError::Serialization(_) => "serialization",
        HmError::ValidationFailed(_) => "validation_failed",
        HmError::SlugConflict { .. } => "slug_conflict",
        HmError::NotFound(_) => "not_found",
    }
}

/// Wrap `data` in an ok envelope and print it in `format`.
pub fn emit_robot<T: Serialize>(format: OutputFormat, data: T) -> Result<()> {
    let response = robot_ok(data);
    match format {
        OutputFormat::Jsonl => emit_json_line(&response),
        OutputFormat::Human | OutputFormat::Json => emit_json(&response),
    }
}

pub fn emit_json<T: Serialize>(value: &T) -> Result<()> {
    let payload = serde_json::to_string_pretty(value)
        .map_err(|err| HmError::Serialization(format!("serialize output: {err}")))?;
    println!("{payload}");
    Ok(())
}

pub fn emit_json_line<T: Serialize>(value: &T) -> Result<()> {
    let payload = serde_json::to_string(value)
        .map_err(|err| HmError::Serialization(format!("serialize output: {err}")))?;
    println!("{payload}");
    Ok(())
}

pub struct HumanLayout {
    lines: Vec<String>,
    key_width: usize,
}

impl Default for HumanLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl HumanLayout {
    pub const fn new() -> Self {
        Self {
            lines: Vec::new(),
            key_width: 18,
        }
    }

    pub fn title(&mut self, text: &str) -> &mut Self {
        self.lines.push(style(text).bold().to_string());
        self.lines.push(String::new());
        self
    }

    pub fn section(&mut self, text: &str) -> &mut Self {
        self.lines.push(String::new());
        self.lines.push(style(text).bold().to_string());
        self.lines.push("-".repeat(text.len().max(3)));
        self
    }

    pub fn kv(&mut self, key: &str, value: &str) -> &mut Self {
        let key_style = style(format!("{key:width$}", width = self.key_width))
            .dim()
            .to_string();
        self.lines.push(format!("{key_style} {value}"));
        self
    }

    pub fn bullet(&mut self, text: &str) -> &mut Self {
        self.lines.push(format!("- {text}"));
        self
    }

    pub fn push_line(&mut self, line: impl Into<String>) -> &mut Self {
        self.lines.push(line.into());
        self
    }

    pub fn build(self) -> String {
        self.lines.join("\n")
    }
}

pub fn emit_human(layout: HumanLayout) {
    println!("{}", layout.build());
}
