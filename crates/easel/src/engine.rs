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
use crate::classifier::{FieldClassification, FieldClassifier, FieldRole};
use crate::compatibility::{self, CompatibilitySet};
use crate::config::EngineConfig;
use crate::dataset::RawDataset;
use crate::error::{ConfigResult, RenderError, RenderResult};
use crate::settings::{DisplaySettings, RenderPayload, SettingsApplicator};
use crate::summary::DatasetSummary;
use crate::transform::{self, pie_value_key};
use std::path::Path;
use tracing::{debug, warn};

/// Classify, check, reshape, decorate. Holds configuration only, so one
/// engine can serve any number of renders.
#[derive(Debug, Clone)]
pub struct ChartEngine {
    config: EngineConfig,
    classifier: FieldClassifier,
}

impl ChartEngine {
    pub fn new() -> Self {
        let config = EngineConfig::default();
        Self {
            classifier: FieldClassifier::from_config(&config),
            config,
        }
    }

    pub fn with_config(config: EngineConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self {
            classifier: FieldClassifier::from_config(&config),
            config,
        })
    }

    pub fn from_config_file(path: &Path) -> ConfigResult<Self> {
        Self::with_config(EngineConfig::load_from_file(path)?)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn classify(&self, dataset: &RawDataset) -> FieldClassification {
        self.classifier.classify(dataset)
    }

    pub fn compatible_kinds(&self, dataset: &RawDataset) -> CompatibilitySet {
        compatibility::resolve_for(&self.classify(dataset), dataset)
    }

    pub fn render(
        &self,
        dataset: &RawDataset,
        kind: ChartKind,
        settings: &DisplaySettings,
    ) -> RenderResult<RenderPayload> {
        if dataset.is_empty() {
            return Err(RenderError::NoData);
        }
        let classes = self.classify(dataset);
        self.render_classified(dataset, &classes, kind, settings)
    }

    /// Render with roles that were already derived for this same dataset.
    pub fn render_classified(
        &self,
        dataset: &RawDataset,
        classes: &FieldClassification,
        kind: ChartKind,
        settings: &DisplaySettings,
    ) -> RenderResult<RenderPayload> {
        if dataset.is_empty() {
            return Err(RenderError::NoData);
        }
        let allowed = compatibility::resolve_for(classes, dataset);
        allowed.check(kind)?;
        debug!(%kind, rows = dataset.len(), %allowed, "rendering");

        if kind == ChartKind::Pie {
            if let Some(key) = pie_value_key(dataset) {
                if classes.role_of(&key) != Some(FieldRole::Numeric) {
                    warn!(field = %key, "pie value key is not a numeric field");
                }
            }
        }

        let transformed = transform::transform(kind, dataset, classes, &self.config);
        Ok(SettingsApplicator::new(&self.config).apply(
            kind,
            transformed,
            dataset,
            classes,
            allowed,
            settings,
        ))
    }

    pub fn inspect(&self, dataset: &RawDataset) -> RenderResult<DatasetSummary> {
        if dataset.is_empty() {
            return Err(RenderError::NoData);
        }
        let classes = self.classify(dataset);
        let compatible = compatibility::resolve_for(&classes, dataset);
        Ok(DatasetSummary::build(dataset, &classes, compatible))
    }
}

impl Default for ChartEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot render with the default configuration.
pub fn render(
    dataset: &RawDataset,
    kind: ChartKind,
    settings: &DisplaySettings,
) -> RenderResult<RenderPayload> {
    ChartEngine::new().render(dataset, kind, settings)
}
