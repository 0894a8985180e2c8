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

//! Kind-specific reshaping of raw rows.
//!
//! Every routine returns one output record per input row, in input order, so
//! later stages can look back at the source row by index.

use crate::chart::ChartKind;
use crate::classifier::{coerce_number, display_value, FieldClassification};
use crate::config::EngineConfig;
use crate::dataset::{RawDataset, RawRecord};
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

/// Category/value row for bar, line and area charts.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    pub name: String,
    pub value: f64,
    /// Every numeric field under its original key.
    pub fields: IndexMap<String, f64>,
}

impl SeriesPoint {
    /// Flat form: `name`, `value`, then the numeric fields. A numeric field
    /// named `name` or `value` overwrites in place.
    pub fn to_record(&self) -> RawRecord {
        let mut record = RawRecord::new();
        record.insert("name".to_string(), Value::String(self.name.clone()));
        record.insert("value".to_string(), Value::from(self.value));
        for (key, value) in &self.fields {
            record.insert(key.clone(), Value::from(*value));
        }
        record
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub series: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedRecord {
    Series(SeriesPoint),
    Scatter(ScatterPoint),
    /// Source row with its resolved `name`.
    Slice(RawRecord),
    Row(RawRecord),
}

impl NormalizedRecord {
    pub fn to_record(&self) -> RawRecord {
        match self {
            NormalizedRecord::Series(point) => point.to_record(),
            NormalizedRecord::Scatter(point) => {
                let mut record = RawRecord::new();
                record.insert("name".to_string(), Value::String(point.name.clone()));
                record.insert("x".to_string(), Value::from(point.x));
                record.insert("y".to_string(), Value::from(point.y));
                record.insert("z".to_string(), Value::from(point.z));
                record.insert("series".to_string(), Value::String(point.series.clone()));
                record
            }
            NormalizedRecord::Slice(record) | NormalizedRecord::Row(record) => record.clone(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            NormalizedRecord::Series(point) => Some(&point.name),
            NormalizedRecord::Scatter(point) => Some(&point.name),
            NormalizedRecord::Slice(record) | NormalizedRecord::Row(record) => {
                record.get("name").and_then(Value::as_str)
            }
        }
    }
}

impl Serialize for NormalizedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            NormalizedRecord::Scatter(point) => point.serialize(serializer),
            NormalizedRecord::Slice(record) | NormalizedRecord::Row(record) => {
                record.serialize(serializer)
            }
            NormalizedRecord::Series(point) => point.to_record().serialize(serializer),
        }
    }
}

/// Keys the renderer reads from the normalized records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Encoding {
    Series {
        category: String,
        series: Vec<String>,
    },
    Pie {
        category: String,
        /// Second key of the first source row, whatever its role.
        value: Option<String>,
    },
    Scatter {
        x_field: Option<String>,
        y_field: Option<String>,
        z_field: Option<String>,
    },
    Table {
        columns: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transformed {
    pub records: Vec<NormalizedRecord>,
    pub encoding: Encoding,
}

pub fn transform(
    kind: ChartKind,
    dataset: &RawDataset,
    classes: &FieldClassification,
    config: &EngineConfig,
) -> Transformed {
    match kind {
        ChartKind::Bar | ChartKind::Line | ChartKind::Area => Transformed {
            records: to_series(dataset, classes, config),
            encoding: Encoding::Series {
                category: "name".to_string(),
                series: classes
                    .numeric
                    .iter()
                    .take(config.max_series)
                    .cloned()
                    .collect(),
            },
        },
        ChartKind::Scatter => Transformed {
            records: to_scatter(dataset, classes, config),
            encoding: Encoding::Scatter {
                x_field: classes.numeric.first().cloned(),
                y_field: classes.numeric.get(1).cloned(),
                z_field: classes.numeric.get(2).cloned(),
            },
        },
        ChartKind::Pie => Transformed {
            records: to_pie(dataset, classes, config),
            encoding: Encoding::Pie {
                category: "name".to_string(),
                value: pie_value_key(dataset),
            },
        },
        ChartKind::Table => Transformed {
            records: to_table(dataset),
            encoding: Encoding::Table {
                columns: dataset.field_names().into_iter().map(str::to_string).collect(),
            },
        },
    }
}

pub fn to_series(
    dataset: &RawDataset,
    classes: &FieldClassification,
    config: &EngineConfig,
) -> Vec<NormalizedRecord> {
    let first_numeric = classes.numeric.first();
    dataset
        .iter()
        .map(|record| {
            let fields = classes
                .numeric
                .iter()
                .map(|key| (key.clone(), coerce_number(record.get(key))))
                .collect();
            NormalizedRecord::Series(SeriesPoint {
                name: category_name(record, classes, config),
                value: coerce_number(lookup(record, first_numeric)),
                fields,
            })
        })
        .collect()
}

pub fn to_scatter(
    dataset: &RawDataset,
    classes: &FieldClassification,
    config: &EngineConfig,
) -> Vec<NormalizedRecord> {
    let numeric = &classes.numeric;
    dataset
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let z = lookup(record, numeric.get(2))
                .or_else(|| lookup(record, numeric.first()))
                .map_or(config.default_scatter_z, |v| coerce_number(Some(v)));
            let name = lookup(record, classes.categorical.first())
                .and_then(display_value)
                .unwrap_or_else(|| format!("{} {}", config.point_label_prefix, index + 1));
            let series = record
                .get("series")
                .and_then(display_value)
                .unwrap_or_else(|| config.default_scatter_series.clone());
            NormalizedRecord::Scatter(ScatterPoint {
                name,
                x: coerce_number(lookup(record, numeric.first())),
                y: coerce_number(lookup(record, numeric.get(1))),
                z,
                series,
            })
        })
        .collect()
}

pub fn to_pie(
    dataset: &RawDataset,
    classes: &FieldClassification,
    config: &EngineConfig,
) -> Vec<NormalizedRecord> {
    dataset
        .iter()
        .map(|record| {
            let mut slice = record.clone();
            slice.insert(
                "name".to_string(),
                Value::String(category_name(record, classes, config)),
            );
            NormalizedRecord::Slice(slice)
        })
        .collect()
}

pub fn to_table(dataset: &RawDataset) -> Vec<NormalizedRecord> {
    dataset.iter().cloned().map(NormalizedRecord::Row).collect()
}

/// Slice sizes are read from the second key of the first row. This can be a
/// categorical field; callers that care should check its role.
pub fn pie_value_key(dataset: &RawDataset) -> Option<String> {
    dataset.first().and_then(|record| record.keys().nth(1).cloned())
}

fn category_name(record: &RawRecord, classes: &FieldClassification, config: &EngineConfig) -> String {
    lookup(record, classes.categorical.first())
        .and_then(display_value)
        .unwrap_or_else(|| config.unnamed_label.clone())
}

/// Field value, treating an explicit null like a missing key.
fn lookup<'a>(record: &'a RawRecord, key: Option<&String>) -> Option<&'a Value> {
    key.and_then(|k| record.get(k)).filter(|v| !v.is_null())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::FieldClassifier;
    use serde_json::json;

    fn run(kind: ChartKind, rows: Value) -> Transformed {
        let dataset = RawDataset::from_value(rows).unwrap();
        let classes = FieldClassifier::new().classify(&dataset);
        transform(kind, &dataset, &classes, &EngineConfig::default())
    }

    fn records_json(out: &Transformed) -> Value {
        serde_json::to_value(&out.records).unwrap()
    }

    #[test]
    fn series_copies_every_numeric_field() {
        let out = run(
            ChartKind::Line,
            json!([{ "month": "jan", "revenue": 100, "cost": "40", "note": "x" }]),
        );
        assert_eq!(
            records_json(&out),
            json!([{ "name": "jan", "value": 100.0, "revenue": 100.0, "cost": 40.0 }])
        );
        let keys: Vec<String> = out.records[0].to_record().keys().cloned().collect();
        assert_eq!(keys, vec!["name", "value", "revenue", "cost"]);
    }

    #[test]
    fn series_offers_at_most_three_numeric_keys() {
        let out = run(
            ChartKind::Area,
            json!([{ "k": "a", "n1": 1, "n2": 2, "n3": 3, "n4": 4 }]),
        );
        assert_eq!(
            out.encoding,
            Encoding::Series {
                category: "name".to_string(),
                series: vec!["n1".to_string(), "n2".to_string(), "n3".to_string()],
            }
        );
    }

    #[test]
    fn series_uses_placeholder_for_missing_category() {
        let out = run(
            ChartKind::Bar,
            json!([{ "k": "a", "n": 1 }, { "k": null, "n": "oops" }, { "n": 3 }]),
        );
        let names: Vec<_> = out.records.iter().filter_map(NormalizedRecord::name).collect();
        assert_eq!(names, vec!["a", "Unnamed", "Unnamed"]);
        assert_eq!(records_json(&out)[1]["value"], json!(0.0));
    }

    #[test]
    fn numeric_field_named_value_overwrites_in_place() {
        let out = run(ChartKind::Bar, json!([{ "k": "a", "total": 1, "value": 9 }]));
        let record = out.records[0].to_record();
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["name", "value", "total"]);
        assert_eq!(record["value"], json!(9.0));
    }

    #[test]
    fn scatter_reads_first_three_numeric_fields() {
        let out = run(
            ChartKind::Scatter,
            json!([{ "city": "oslo", "lat": 59.9, "lon": 10.7, "pop": 700, "series": "forecast" }]),
        );
        assert_eq!(
            records_json(&out),
            json!([{ "name": "oslo", "x": 59.9, "y": 10.7, "z": 700.0, "series": "forecast" }])
        );
    }

    #[test]
    fn scatter_z_falls_back_to_x_then_default() {
        let out = run(
            ChartKind::Scatter,
            json!([{ "a": 1, "b": 2 }, { "a": null, "b": 4 }]),
        );
        let json = records_json(&out);
        assert_eq!(json[0]["z"], json!(1.0));
        assert_eq!(json[1]["z"], json!(50.0));
        assert_eq!(json[1]["x"], json!(0.0));
    }

    #[test]
    fn scatter_names_points_by_position_and_defaults_series() {
        let out = run(ChartKind::Scatter, json!([{ "a": 1, "b": 2 }, { "a": 3, "b": 4 }]));
        let json = records_json(&out);
        assert_eq!(json[0]["name"], json!("Point 1"));
        assert_eq!(json[1]["name"], json!("Point 2"));
        assert_eq!(json[1]["series"], json!("current"));
    }

    #[test]
    fn pie_keeps_source_fields_and_adds_name() {
        let out = run(ChartKind::Pie, json!([{ "region": "east", "sales": 10, "flag": true }]));
        assert_eq!(
            records_json(&out),
            json!([{ "region": "east", "sales": 10, "flag": true, "name": "east" }])
        );
        assert_eq!(
            out.encoding,
            Encoding::Pie {
                category: "name".to_string(),
                value: Some("sales".to_string()),
            }
        );
    }

    #[test]
    fn pie_value_key_can_be_categorical() {
        let dataset =
            RawDataset::from_value(json!([{ "total": 4, "region": "east", "label": "x" }]))
                .unwrap();
        assert_eq!(pie_value_key(&dataset).as_deref(), Some("region"));
        let single = RawDataset::from_value(json!([{ "only": 1 }])).unwrap();
        assert_eq!(pie_value_key(&single), None);
    }

    #[test]
    fn table_is_identity() {
        let rows = json!([{ "a": 1, "b": null, "c": [1, 2] }, { "a": "x" }]);
        let out = run(ChartKind::Table, rows.clone());
        assert_eq!(records_json(&out), rows);
        assert_eq!(
            out.encoding,
            Encoding::Table {
                columns: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            }
        );
    }

    #[test]
    fn input_is_left_untouched() {
        let dataset =
            RawDataset::from_value(json!([{ "region": "east", "sales": 10 }])).unwrap();
        let before = dataset.clone();
        let classes = FieldClassifier::new().classify(&dataset);
        for kind in ChartKind::ALL {
            transform(kind, &dataset, &classes, &EngineConfig::default());
        }
        assert_eq!(dataset, before);
    }
}
