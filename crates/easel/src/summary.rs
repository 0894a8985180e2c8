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

use crate::classifier::{FieldClassification, FieldRole};
use crate::compatibility::CompatibilitySet;
use crate::dataset::RawDataset;
use crate::transform::pie_value_key;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub row_count: usize,
    pub field_count: usize,
    pub categorical: Vec<String>,
    pub numeric: Vec<String>,
    pub unclassified: Vec<String>,
    pub temporal: Option<String>,
    pub compatible: CompatibilitySet,
    pub pie_value_key: Option<String>,
    pub warnings: Vec<String>,
}

impl DatasetSummary {
    pub fn build(
        dataset: &RawDataset,
        classes: &FieldClassification,
        compatible: CompatibilitySet,
    ) -> Self {
        let pie_value_key = pie_value_key(dataset);
        let mut warnings = Vec::new();
        if let Some(key) = &pie_value_key {
            if classes.role_of(key) != Some(FieldRole::Numeric) {
                warnings.push(format!(
                    "pie slices would be sized by '{key}', which is not a numeric field"
                ));
            }
        }
        if !classes.unclassified.is_empty() {
            warnings.push(format!(
                "ignored fields with no usable value in the first row: {}",
                classes.unclassified.join(", ")
            ));
        }
        Self {
            row_count: dataset.len(),
            field_count: dataset.field_names().len(),
            categorical: classes.categorical.clone(),
            numeric: classes.numeric.clone(),
            unclassified: classes.unclassified.clone(),
            temporal: classes.temporal.clone(),
            compatible,
            pie_value_key,
            warnings,
        }
    }

    pub fn report(&self) -> String {
        let mut report = String::new();
        report.push_str("Dataset Summary\n===============\n");
        report.push_str(&format!("Rows: {}\n", self.row_count));
        report.push_str(&format!("Fields: {}\n", self.field_count));
        report.push_str(&format!("  - Categorical: {}\n", list(&self.categorical)));
        report.push_str(&format!("  - Numeric: {}\n", list(&self.numeric)));
        if !self.unclassified.is_empty() {
            report.push_str(&format!("  - Ignored: {}\n", list(&self.unclassified)));
        }
        if let Some(field) = &self.temporal {
            report.push_str(&format!("Date field: {field}\n"));
        }
        report.push_str(&format!("\nCompatible charts: {}\n", self.compatible));
        if !self.warnings.is_empty() {
            report.push_str("\nWarnings:\n");
            for warning in &self.warnings {
                report.push_str(&format!("  • {warning}\n"));
            }
        }
        report
    }
}

fn list(fields: &[String]) -> String {
    if fields.is_empty() {
        "-".to_string()
    } else {
        fields.join(", ")
    }
}

impl fmt::Display for DatasetSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Dataset: {} rows, {} categorical, {} numeric, charts: {}",
            self.row_count,
            self.categorical.len(),
            self.numeric.len(),
            self.compatible
        )
    }
}
