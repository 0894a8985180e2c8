// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2024 Jonathan Lee
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License version 3
// as published by the Free Software Foundation.
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see https://www.gnu.org/licenses/.

use crate::chart::ChartKind;
use crate::compatibility::{self, CompatibilitySet};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EaselError {
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Chart kind error: {0}")]
    ChartKind(#[from] ParseChartKindError),
}

/// Terminal failures of a single render call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("No data to render: the dataset is empty")]
    NoData,
    #[error("Chart kind '{requested}' is not compatible with this dataset (allowed: {allowed})")]
    IncompatibleChartKind {
        requested: ChartKind,
        allowed: CompatibilitySet,
    },
}

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Failed to parse dataset JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to read dataset file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Expected a JSON array of objects, found {found}")]
    UnexpectedShape { found: &'static str },
    #[error("Row {index} is not a JSON object (found {found})")]
    NonObjectRow { index: usize, found: &'static str },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Failed to parse JSON configuration: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unsupported configuration format for '{path}': expected .toml or .json")]
    UnsupportedFormat { path: String },
    #[error("Invalid configuration: {field}: {reason}")]
    Invalid { field: String, reason: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown chart kind '{input}': expected one of table, bar, line, area, pie, scatter")]
pub struct ParseChartKindError {
    pub input: String,
}

pub type Result<T> = std::result::Result<T, EaselError>;
pub type RenderResult<T> = std::result::Result<T, RenderError>;
pub type DatasetResult<T> = std::result::Result<T, DatasetError>;
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Wire form of a [`RenderError`], handed to the rendering surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub reason: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested: Option<ChartKind>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub allowed: Vec<ChartKind>,
}

impl RenderError {
    pub fn reason(&self) -> &'static str {
        match self {
            RenderError::NoData => "NoData",
            RenderError::IncompatibleChartKind { .. } => "IncompatibleChartKind",
        }
    }
    pub fn allowed(&self) -> Option<&CompatibilitySet> {
        match self {
            RenderError::NoData => None,
            RenderError::IncompatibleChartKind { allowed, .. } => Some(allowed),
        }
    }
    pub fn is_recoverable(&self) -> bool {
        matches!(self, RenderError::IncompatibleChartKind { .. })
    }
    pub fn to_failure(&self) -> Failure {
        match self {
            RenderError::NoData => Failure {
                reason: self.reason(),
                requested: None,
                allowed: Vec::new(),
            },
            RenderError::IncompatibleChartKind { requested, allowed } => Failure {
                reason: self.reason(),
                requested: Some(*requested),
                allowed: allowed.to_vec(),
            },
        }
    }
}

impl EaselError {
    pub fn is_recoverable(&self) -> bool {
        match self {
            EaselError::Render(err) => err.is_recoverable(),
            EaselError::ChartKind(_) => true,
            EaselError::Dataset(_) | EaselError::Config(_) => false,
        }
    }
    pub fn category(&self) -> &'static str {
        match self {
            EaselError::Render(_) => "Render",
            EaselError::Dataset(_) => "Dataset",
            EaselError::Config(_) => "Configuration",
            EaselError::ChartKind(_) => "Chart kind",
        }
    }
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            EaselError::Render(RenderError::NoData) => vec![
                "Check that the query returned at least one row".to_string(),
                "Try broadening the query filters".to_string(),
            ],
            EaselError::Render(RenderError::IncompatibleChartKind { requested, allowed }) => {
                let mut out = vec![format!("Try one of: {allowed}")];
                out.push(compatibility::requirement_text(*requested));
                out
            }
            EaselError::Dataset(DatasetError::UnexpectedShape { .. })
            | EaselError::Dataset(DatasetError::NonObjectRow { .. }) => vec![
                "Provide the query result as a JSON array of flat objects".to_string(),
            ],
            EaselError::ChartKind(_) => vec![format!(
                "Valid chart kinds: {}",
                ChartKind::ALL.iter().map(ChartKind::as_str).collect::<Vec<_>>().join(", ")
            )],
            EaselError::Config(ConfigError::Invalid { field, .. }) => {
                vec![format!("Fix the '{field}' entry in the configuration file")]
            }
            _ => vec!["Check the error message for specific guidance".to_string()],
        }
    }
    pub fn user_message(&self) -> String {
        match self {
            EaselError::Render(RenderError::NoData) => {
                "There is nothing to chart yet. Run a query that returns rows.".to_string()
            }
            EaselError::Render(RenderError::IncompatibleChartKind { requested, .. }) => format!(
                "A {} can't be drawn from this data. Pick another chart type.",
                requested.label()
            ),
            _ => self.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
}

impl ErrorSeverity {
    pub fn of(error: &EaselError) -> Self {
        match error {
            EaselError::Render(RenderError::NoData) => ErrorSeverity::Info,
            EaselError::Render(RenderError::IncompatibleChartKind { .. }) => ErrorSeverity::Warning,
            EaselError::ChartKind(_) => ErrorSeverity::Warning,
            EaselError::Dataset(_) | EaselError::Config(_) => ErrorSeverity::Error,
        }
    }
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorSeverity::Info => "INFO",
            ErrorSeverity::Warning => "WARNING",
            ErrorSeverity::Error => "ERROR",
        }
    }
    pub fn color_code(&self) -> &'static str {
        match self {
            ErrorSeverity::Info => "\x1b[36m",
            ErrorSeverity::Warning => "\x1b[33m",
            ErrorSeverity::Error => "\x1b[31m",
        }
    }
}

pub struct ErrorReporter {
    pub show_suggestions: bool,
    pub colored_output: bool,
}

impl ErrorReporter {
    pub fn new() -> Self {
        Self {
            show_suggestions: true,
            colored_output: true,
        }
    }
    pub fn plain() -> Self {
        Self {
            show_suggestions: true,
            colored_output: false,
        }
    }
    pub fn report(&self, error: &EaselError) -> String {
        let severity = ErrorSeverity::of(error);
        let mut output = String::new();
        if self.colored_output {
            output.push_str(severity.color_code());
        }
        output.push_str(&format!("[{}] {}\n", severity.as_str(), error));
        if self.colored_output {
            output.push_str("\x1b[0m");
        }
        if self.show_suggestions {
            let suggestions = error.suggestions();
            if !suggestions.is_empty() {
                output.push_str("\nSuggestions:\n");
                for suggestion in suggestions {
                    output.push_str(&format!("  • {suggestion}\n"));
                }
            }
        }
        output
    }
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn incompatible() -> RenderError {
        RenderError::IncompatibleChartKind {
            requested: ChartKind::Bar,
            allowed: compatibility::resolve(0, 2, true),
        }
    }

    #[test]
    fn failure_wire_form_for_no_data() {
        let json = serde_json::to_value(RenderError::NoData.to_failure()).unwrap();
        assert_eq!(json, serde_json::json!({ "reason": "NoData" }));
    }

    #[test]
    fn failure_wire_form_lists_allowed_kinds() {
        let json = serde_json::to_value(incompatible().to_failure()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "reason": "IncompatibleChartKind",
                "requested": "bar",
                "allowed": ["scatter", "table"]
            })
        );
    }

    #[test]
    fn only_incompatible_kind_is_recoverable() {
        assert!(!RenderError::NoData.is_recoverable());
        assert!(incompatible().is_recoverable());
        assert!(EaselError::from(incompatible()).is_recoverable());
    }

    #[test]
    fn reporter_lists_alternatives() {
        let report = ErrorReporter::plain().report(&EaselError::from(incompatible()));
        assert!(report.starts_with("[WARNING]"));
        assert!(report.contains("Try one of: scatter, table"));
        assert!(!report.contains('\x1b'));
    }
}
