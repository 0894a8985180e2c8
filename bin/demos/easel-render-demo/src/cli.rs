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

use clap::Parser;
use easel::{ChartKind, DisplaySettings};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "easel-render-demo")]
#[command(about = "Render a query result as chart-ready JSON for a given chart kind")]
#[command(version)]
pub struct Args {
    #[arg(long, help = "Query result as a JSON array of objects")]
    pub data: PathBuf,

    #[arg(
        long,
        default_value = "table",
        help = "Chart kind: table, bar, line, area, pie or scatter"
    )]
    pub kind: ChartKind,

    #[arg(long, help = "Display settings file (.toml or .json)")]
    pub settings: Option<PathBuf>,

    #[arg(long, help = "Engine configuration file (.toml)")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Override the colour palette index")]
    pub palette: Option<i64>,

    #[arg(long, help = "Hide the legend")]
    pub no_legend: bool,

    #[arg(long, help = "Hide the grid")]
    pub no_grid: bool,

    #[arg(long, help = "Show data labels")]
    pub labels: bool,

    #[arg(long, help = "Print a dataset summary to stderr before rendering")]
    pub summary: bool,

    #[arg(long, help = "Pretty-print the output JSON")]
    pub pretty: bool,

    #[arg(long, value_enum, default_value = "info", help = "Set the logging level")]
    pub log_level: LogLevel,
}

#[derive(clap::ValueEnum, Clone, Debug)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl Args {
    /// Command-line flags win over the settings file.
    pub fn apply_overrides(&self, mut settings: DisplaySettings) -> DisplaySettings {
        if let Some(index) = self.palette {
            settings.color_palette_index = index;
        }
        if self.no_legend {
            settings.show_legend = false;
        }
        if self.no_grid {
            settings.show_grid = false;
        }
        if self.labels {
            settings.show_data_labels = true;
        }
        settings
    }
}
