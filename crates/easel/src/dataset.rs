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

use crate::error::{DatasetError, DatasetResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// One result row. Key order is the order the fields arrived in.
pub type RawRecord = Map<String, Value>;

/// The rows of a single query response.
///
/// Rows are assumed, not checked, to share the first row's field set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawDataset {
    records: Vec<RawRecord>,
}

impl RawDataset {
    pub fn new(records: Vec<RawRecord>) -> Self {
        Self { records }
    }

    /// Accepts the decoded response body. `null` is treated as "no data".
    pub fn from_value(value: Value) -> DatasetResult<Self> {
        match value {
            Value::Null => Ok(Self::default()),
            Value::Array(rows) => rows
                .into_iter()
                .enumerate()
                .map(|(index, row)| match row {
                    Value::Object(record) => Ok(record),
                    other => Err(DatasetError::NonObjectRow {
                        index,
                        found: json_type_name(&other),
                    }),
                })
                .collect::<DatasetResult<Vec<_>>>()
                .map(Self::new),
            other => Err(DatasetError::UnexpectedShape {
                found: json_type_name(&other),
            }),
        }
    }

    pub fn from_json_str(body: &str) -> DatasetResult<Self> {
        let value: Value = serde_json::from_str(body)?;
        Self::from_value(value)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> DatasetResult<Self> {
        let path = path.as_ref();
        let body = fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&body)
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn records(&self) -> &[RawRecord] {
        &self.records
    }

    /// The representative record every inference is made from.
    pub fn first(&self) -> Option<&RawRecord> {
        self.records.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RawRecord> {
        self.records.iter()
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.first()
            .map(|record| record.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

impl From<Vec<RawRecord>> for RawDataset {
    fn from(records: Vec<RawRecord>) -> Self {
        Self::new(records)
    }
}

impl FromIterator<RawRecord> for RawDataset {
    fn from_iter<I: IntoIterator<Item = RawRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a RawDataset {
    type Item = &'a RawRecord;
    type IntoIter = std::slice::Iter<'a, RawRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
