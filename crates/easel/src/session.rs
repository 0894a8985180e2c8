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
use crate::classifier::FieldClassification;
use crate::compatibility::{self, CompatibilitySet};
use crate::dataset::RawDataset;
use crate::engine::ChartEngine;
use crate::error::RenderResult;
use crate::settings::{DisplaySettings, RenderPayload};

/// State behind one dashboard chart panel.
///
/// Roles are derived once per dataset and thrown away when the dataset is
/// replaced. Settings survive both dataset and kind changes.
#[derive(Debug, Clone)]
pub struct ChartSession {
    engine: ChartEngine,
    dataset: RawDataset,
    classes: FieldClassification,
    allowed: CompatibilitySet,
    kind: ChartKind,
    settings: DisplaySettings,
}

impl ChartSession {
    pub fn new(engine: ChartEngine, dataset: RawDataset) -> Self {
        let classes = engine.classify(&dataset);
        let allowed = compatibility::resolve_for(&classes, &dataset);
        Self {
            engine,
            dataset,
            classes,
            allowed,
            kind: ChartKind::Table,
            settings: DisplaySettings::default(),
        }
    }

    pub fn set_dataset(&mut self, dataset: RawDataset) {
        self.classes = self.engine.classify(&dataset);
        self.allowed = compatibility::resolve_for(&self.classes, &dataset);
        self.dataset = dataset;
    }

    /// The kind is taken as requested; an incompatible kind surfaces on render.
    pub fn set_kind(&mut self, kind: ChartKind) {
        self.kind = kind;
    }

    pub fn set_settings(&mut self, settings: DisplaySettings) {
        self.settings = settings;
    }

    pub fn kind(&self) -> ChartKind {
        self.kind
    }
    pub fn settings(&self) -> &DisplaySettings {
        &self.settings
    }
    pub fn dataset(&self) -> &RawDataset {
        &self.dataset
    }
    pub fn classification(&self) -> &FieldClassification {
        &self.classes
    }
    pub fn allowed(&self) -> &CompatibilitySet {
        &self.allowed
    }

    pub fn render(&self) -> RenderResult<RenderPayload> {
        self.engine
            .render_classified(&self.dataset, &self.classes, self.kind, &self.settings)
    }
}
