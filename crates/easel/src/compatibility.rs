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
use crate::dataset::RawDataset;
use crate::error::{RenderError, RenderResult};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Chart kinds that can be drawn from a dataset's field roles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompatibilitySet {
    kinds: BTreeSet<ChartKind>,
}

impl CompatibilitySet {
    pub fn contains(&self, kind: ChartKind) -> bool {
        self.kinds.contains(&kind)
    }
    pub fn iter(&self) -> impl Iterator<Item = ChartKind> + '_ {
        self.kinds.iter().copied()
    }
    pub fn len(&self) -> usize {
        self.kinds.len()
    }
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
    pub fn to_vec(&self) -> Vec<ChartKind> {
        self.iter().collect()
    }
    pub fn is_superset(&self, other: &CompatibilitySet) -> bool {
        self.kinds.is_superset(&other.kinds)
    }

    /// Fails with the full allowed set; never picks a substitute kind.
    pub fn check(&self, requested: ChartKind) -> RenderResult<()> {
        if self.contains(requested) {
            Ok(())
        } else {
            Err(RenderError::IncompatibleChartKind {
                requested,
                allowed: self.clone(),
            })
        }
    }
}

impl FromIterator<ChartKind> for CompatibilitySet {
    fn from_iter<I: IntoIterator<Item = ChartKind>>(iter: I) -> Self {
        Self {
            kinds: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for CompatibilitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            f.write_str("none")
        } else {
            write!(f, "{}", self.kinds.iter().join(", "))
        }
    }
}

pub fn resolve(categorical_count: usize, numeric_count: usize, has_rows: bool) -> CompatibilitySet {
    let mut kinds = BTreeSet::new();
    if categorical_count >= 1 && numeric_count >= 1 {
        kinds.extend([ChartKind::Bar, ChartKind::Line, ChartKind::Area, ChartKind::Pie]);
    }
    if numeric_count >= 2 {
        kinds.insert(ChartKind::Scatter);
    }
    if has_rows {
        kinds.insert(ChartKind::Table);
    }
    CompatibilitySet { kinds }
}

pub fn resolve_for(classification: &FieldClassification, dataset: &RawDataset) -> CompatibilitySet {
    resolve(
        classification.categorical_count(),
        classification.numeric_count(),
        !dataset.is_empty(),
    )
}

/// Minimum (categorical, numeric) field counts a kind needs.
pub fn requirement(kind: ChartKind) -> (usize, usize) {
    match kind {
        ChartKind::Bar | ChartKind::Line | ChartKind::Area | ChartKind::Pie => (1, 1),
        ChartKind::Scatter => (0, 2),
        ChartKind::Table => (0, 0),
    }
}

pub fn requirement_text(kind: ChartKind) -> String {
    match requirement(kind) {
        (0, 0) => format!("A {} only needs at least one row", kind.label()),
        (0, numeric) => format!("A {} needs at least {numeric} numeric fields", kind.label()),
        (categorical, numeric) => format!(
            "A {} needs at least {categorical} categorical and {numeric} numeric field",
            kind.label()
        ),
    }
}
