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

use crate::error::{ConfigError, ConfigResult};
use crate::palette::{builtin_palettes, Palette};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub palettes: Vec<Palette>,
    pub temporal_formats: Vec<String>,
    pub unnamed_label: String,
    /// Scatter points without a category are named "{prefix} {n}", 1-based.
    pub point_label_prefix: String,
    pub default_scatter_z: f64,
    pub default_scatter_series: String,
    /// Numeric keys offered to multi-series renderers.
    pub max_series: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            palettes: builtin_palettes(),
            temporal_formats: vec![
                "%Y-%m-%d".to_string(),
                "%Y-%m-%d %H:%M:%S".to_string(),
                "%Y-%m-%dT%H:%M:%S".to_string(),
                "%Y-%m-%dT%H:%M:%SZ".to_string(),
                "%m/%d/%Y".to_string(),
                "%d/%m/%Y".to_string(),
            ],
            unnamed_label: "Unnamed".to_string(),
            point_label_prefix: "Point".to_string(),
            default_scatter_z: 50.0,
            default_scatter_series: "current".to_string(),
            max_series: 3,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.palettes.is_empty() {
            return Err(invalid("palettes", "at least one palette is required"));
        }
        for palette in &self.palettes {
            if palette.name.trim().is_empty() {
                return Err(invalid("palettes", "palette names must not be empty"));
            }
            if palette.colors.is_empty() {
                return Err(invalid(
                    "palettes",
                    &format!("palette '{}' has no colours", palette.name),
                ));
            }
        }
        if self.temporal_formats.iter().any(|f| f.trim().is_empty()) {
            return Err(invalid("temporal_formats", "formats must not be empty"));
        }
        if self.max_series == 0 {
            return Err(invalid("max_series", "must be greater than 0"));
        }
        if !self.default_scatter_z.is_finite() {
            return Err(invalid("default_scatter_z", "must be a finite number"));
        }
        Ok(())
    }

    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file(config_path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(config_path).map_err(|source| ConfigError::Io {
            path: config_path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Reads day-first dates ("01/03/2024" is 1 March) before month-first.
    pub fn for_day_first_dates() -> Self {
        let mut config = Self::default();
        if let (Some(us), Some(eu)) = (
            config.temporal_formats.iter().position(|f| f == "%m/%d/%Y"),
            config.temporal_formats.iter().position(|f| f == "%d/%m/%Y"),
        ) {
            config.temporal_formats.swap(us, eu);
        }
        config
    }

    /// ISO 8601 dates only.
    pub fn for_iso_dates() -> Self {
        Self {
            temporal_formats: vec![
                "%Y-%m-%d".to_string(),
                "%Y-%m-%dT%H:%M:%S".to_string(),
            ],
            ..Default::default()
        }
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
