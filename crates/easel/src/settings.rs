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
use crate::classifier::{display_value, parse_temporal, FieldClassification};
use crate::compatibility::CompatibilitySet;
use crate::config::EngineConfig;
use crate::dataset::RawDataset;
use crate::error::{ConfigError, ConfigResult};
use crate::palette::{self, Palette};
use crate::transform::{Encoding, NormalizedRecord, Transformed};
use chrono::NaiveDate;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DateRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }
    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
    /// Inclusive on both ends.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |start| date >= start) && self.end.map_or(true, |end| date <= end)
    }
}

/// User-controlled rendering options. None of these affect field roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DisplaySettings {
    pub color_palette_index: i64,
    pub show_legend: bool,
    pub show_grid: bool,
    pub show_data_labels: bool,
    pub date_range: DateRange,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            color_palette_index: 0,
            show_legend: true,
            show_grid: true,
            show_data_labels: false,
            date_range: DateRange::default(),
        }
    }
}

impl DisplaySettings {
    pub fn with_palette(mut self, index: i64) -> Self {
        self.color_palette_index = index;
        self
    }
    pub fn with_legend(mut self, show: bool) -> Self {
        self.show_legend = show;
        self
    }
    pub fn with_grid(mut self, show: bool) -> Self {
        self.show_grid = show;
        self
    }
    pub fn with_data_labels(mut self, show: bool) -> Self {
        self.show_data_labels = show;
        self
    }
    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = range;
        self
    }

    /// Loads `.toml` or `.json` settings files.
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(toml::from_str(&content)?),
            Some("json") => Ok(serde_json::from_str(&content)?),
            _ => Err(ConfigError::UnsupportedFormat {
                path: path.display().to_string(),
            }),
        }
    }
}

/// Everything the chart-drawing surface needs for one render.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderPayload {
    pub kind: ChartKind,
    pub records: Vec<NormalizedRecord>,
    pub encoding: Encoding,
    pub palette: Option<Palette>,
    /// One colour per series (bar/line/area/scatter) or slice (pie).
    pub colors: Vec<String>,
    pub show_legend: bool,
    pub show_grid: bool,
    pub show_data_labels: bool,
    pub allowed: CompatibilitySet,
    /// Rows dropped by the date-range filter.
    pub filtered_out: usize,
}

pub struct SettingsApplicator<'a> {
    palettes: &'a [Palette],
    temporal_formats: &'a [String],
}

impl<'a> SettingsApplicator<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self {
            palettes: &config.palettes,
            temporal_formats: &config.temporal_formats,
        }
    }

    /// `transformed.records` must be index-aligned with `rows`.
    pub fn apply(
        &self,
        kind: ChartKind,
        transformed: Transformed,
        rows: &RawDataset,
        classes: &FieldClassification,
        allowed: CompatibilitySet,
        settings: &DisplaySettings,
    ) -> RenderPayload {
        let Transformed { records, encoding } = transformed;
        let before = records.len();
        let records = self.filter_dates(records, rows, classes, &settings.date_range);
        let filtered_out = before - records.len();
        if filtered_out > 0 {
            debug!(filtered_out, kept = records.len(), "date range filter applied");
        }

        let palette = palette::select(self.palettes, settings.color_palette_index).cloned();
        let slots = color_slots(&encoding, &records);
        let colors = palette
            .as_ref()
            .map(|p| p.assign(slots))
            .unwrap_or_default();

        RenderPayload {
            kind,
            records,
            encoding,
            palette,
            colors,
            show_legend: settings.show_legend,
            show_grid: settings.show_grid,
            show_data_labels: settings.show_data_labels,
            allowed,
            filtered_out,
        }
    }

    fn filter_dates(
        &self,
        records: Vec<NormalizedRecord>,
        rows: &RawDataset,
        classes: &FieldClassification,
        range: &DateRange,
    ) -> Vec<NormalizedRecord> {
        let Some(field) = classes.temporal.as_deref() else {
            return records;
        };
        if range.is_unbounded() {
            return records;
        }
        records
            .into_iter()
            .zip(rows.iter())
            .filter(|(_, row)| {
                row.get(field)
                    .and_then(display_value)
                    .and_then(|text| parse_temporal(&text, self.temporal_formats))
                    .is_some_and(|date| range.contains(date))
            })
            .map(|(record, _)| record)
            .collect()
    }
}

fn color_slots(encoding: &Encoding, records: &[NormalizedRecord]) -> usize {
    match encoding {
        Encoding::Series { series, .. } => series.len().max(1),
        Encoding::Pie { .. } => records.len(),
        Encoding::Scatter { .. } => records
            .iter()
            .filter_map(|record| match record {
                NormalizedRecord::Scatter(point) => Some(point.series.as_str()),
                _ => None,
            })
            .unique()
            .count(),
        Encoding::Table { .. } => 0,
    }
}
