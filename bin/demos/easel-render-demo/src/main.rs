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

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Args;
use easel::{ChartEngine, DisplaySettings, EaselError, ErrorReporter, RawDataset};
use std::io::IsTerminal;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_level.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let engine = match &args.config {
        Some(path) => ChartEngine::from_config_file(path)
            .with_context(|| format!("Failed to load engine config '{}'", path.display()))?,
        None => ChartEngine::new(),
    };
    let settings = match &args.settings {
        Some(path) => DisplaySettings::load_from_file(path)
            .with_context(|| format!("Failed to load display settings '{}'", path.display()))?,
        None => DisplaySettings::default(),
    };
    let settings = args.apply_overrides(settings);

    let dataset = RawDataset::from_json_file(&args.data)
        .with_context(|| format!("Failed to load dataset '{}'", args.data.display()))?;
    info!(rows = dataset.len(), kind = %args.kind, "Loaded dataset");

    if args.summary {
        if let Ok(summary) = engine.inspect(&dataset) {
            eprintln!("{}", summary.report());
        }
    }

    match engine.render(&dataset, args.kind, &settings) {
        Ok(payload) => {
            let out = if args.pretty {
                serde_json::to_string_pretty(&payload)?
            } else {
                serde_json::to_string(&payload)?
            };
            println!("{out}");
            Ok(())
        }
        Err(err) => {
            let reporter = ErrorReporter {
                show_suggestions: true,
                colored_output: std::io::stderr().is_terminal(),
            };
            let failure = err.to_failure();
            eprint!("{}", reporter.report(&EaselError::from(err)));
            println!("{}", serde_json::to_string(&failure)?);
            std::process::exit(2);
        }
    }
}
