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

//! Turns loosely typed query rows into chart-ready records.
//!
//! The pipeline is classify, check compatibility, reshape for the requested
//! chart kind, then apply display settings. Every step is pure.

pub mod chart;
pub mod classifier;
pub mod compatibility;
pub mod config;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod palette;
pub mod session;
pub mod settings;
pub mod summary;
pub mod transform;

pub use chart::ChartKind;
pub use classifier::{FieldClassification, FieldClassifier, FieldRole};
pub use compatibility::CompatibilitySet;
pub use config::EngineConfig;
pub use dataset::{RawDataset, RawRecord};
pub use engine::{render, ChartEngine};
pub use error::{
    ConfigError, DatasetError, EaselError, ErrorReporter, Failure, ParseChartKindError,
    RenderError, Result,
};
pub use palette::Palette;
pub use session::ChartSession;
pub use settings::{DateRange, DisplaySettings, RenderPayload, SettingsApplicator};
pub use summary::DatasetSummary;
pub use transform::{Encoding, NormalizedRecord, ScatterPoint, SeriesPoint};
