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

use crate::config::EngineConfig;
use crate::dataset::{RawDataset, RawRecord};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldRole {
    Categorical,
    Numeric,
}

impl FieldRole {
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldRole::Numeric)
    }
}

/// Field roles inferred from the first record of a dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FieldClassification {
    pub roles: IndexMap<String, FieldRole>,
    pub categorical: Vec<String>,
    pub numeric: Vec<String>,
    /// Fields that were neither numeric nor string in the first record.
    pub unclassified: Vec<String>,
    /// First categorical field whose value reads as a date.
    pub temporal: Option<String>,
}

impl FieldClassification {
    pub fn categorical_count(&self) -> usize {
        self.categorical.len()
    }
    pub fn numeric_count(&self) -> usize {
        self.numeric.len()
    }
    pub fn role_of(&self, field: &str) -> Option<FieldRole> {
        self.roles.get(field).copied()
    }
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct FieldClassifier {
    temporal_formats: Vec<String>,
}

impl FieldClassifier {
    pub fn new() -> Self {
        Self::from_config(&EngineConfig::default())
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            temporal_formats: config.temporal_formats.clone(),
        }
    }

    pub fn classify(&self, dataset: &RawDataset) -> FieldClassification {
        match dataset.first() {
            Some(record) => self.classify_record(record),
            None => FieldClassification::default(),
        }
    }

    pub fn classify_record(&self, record: &RawRecord) -> FieldClassification {
        let mut out = FieldClassification::default();
        for (field, value) in record {
            let is_date = self.is_date(value);
            let role = if is_date {
                Some(FieldRole::Categorical)
            } else {
                classify_value(value)
            };
            let Some(role) = role else {
                out.unclassified.push(field.clone());
                continue;
            };
            if role.is_numeric() {
                out.numeric.push(field.clone());
            } else {
                if is_date && out.temporal.is_none() {
                    out.temporal = Some(field.clone());
                }
                out.categorical.push(field.clone());
            }
            out.roles.insert(field.clone(), role);
        }
        debug!(
            categorical = out.categorical.len(),
            numeric = out.numeric.len(),
            unclassified = out.unclassified.len(),
            temporal = ?out.temporal,
            "classified fields"
        );
        out
    }

    /// A string that reads entirely as a date under the configured formats.
    /// Such values are categorical even though `parse_float` would take
    /// their leading year as a number.
    pub fn is_date(&self, value: &Value) -> bool {
        value
            .as_str()
            .and_then(|text| parse_temporal(text, &self.temporal_formats))
            .is_some()
    }
}

impl Default for FieldClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Role of a single representative value, or `None` when it has neither.
/// Dates are not recognised here; see [`FieldClassifier::is_date`].
pub fn classify_value(value: &Value) -> Option<FieldRole> {
    if parse_number(value).is_some() {
        Some(FieldRole::Numeric)
    } else if value.is_string() {
        Some(FieldRole::Categorical)
    } else {
        None
    }
}

/// Finite number carried by a JSON number or a string with a numeric prefix.
pub fn parse_number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_float(s),
        _ => None,
    };
    parsed.filter(|n| n.is_finite())
}

/// Longest-prefix float parse: `"12.5%"` is 12.5, `"20 units"` is 20.
///
/// Leading whitespace is skipped, then an optional sign followed by either
/// `Infinity` or a decimal literal with an optional exponent. Anything after
/// the literal is ignored. `None` when no digits are found.
pub fn parse_float(text: &str) -> Option<f64> {
    let text = text.trim_start_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
    let bytes = text.as_bytes();
    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));

    if text[end..].starts_with("Infinity") {
        return Some(if text.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;
    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits + frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits + frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }
    text[..end].parse::<f64>().ok()
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Unparseable and missing values become `0.0`.
pub fn coerce_number(value: Option<&Value>) -> f64 {
    value.and_then(parse_number).unwrap_or(0.0)
}

/// Label text for a value; `None` for null so callers can substitute.
pub fn display_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

pub fn parse_temporal(value: &str, formats: &[String]) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    formats.iter().find_map(|format| {
        NaiveDateTime::parse_from_str(value, format)
            .map(|dt| dt.date())
            .or_else(|_| NaiveDate::parse_from_str(value, format))
            .ok()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dataset(value: Value) -> RawDataset {
        RawDataset::from_value(value).unwrap()
    }

    #[test]
    fn numbers_and_numeric_strings_are_numeric() {
        assert_eq!(classify_value(&json!(10)), Some(FieldRole::Numeric));
        assert_eq!(classify_value(&json!(-2.5)), Some(FieldRole::Numeric));
        assert_eq!(classify_value(&json!(" 42 ")), Some(FieldRole::Numeric));
        assert_eq!(classify_value(&json!("1e3")), Some(FieldRole::Numeric));
    }

    #[test]
    fn non_finite_strings_are_categorical() {
        assert_eq!(classify_value(&json!("NaN")), Some(FieldRole::Categorical));
        assert_eq!(classify_value(&json!("inf")), Some(FieldRole::Categorical));
        assert_eq!(classify_value(&json!("")), Some(FieldRole::Categorical));
    }

    #[test]
    fn numeric_prefix_is_enough() {
        assert_eq!(parse_float("5%"), Some(5.0));
        assert_eq!(parse_float("12.5%"), Some(12.5));
        assert_eq!(parse_float("20 units"), Some(20.0));
        assert_eq!(parse_float("  -3.5e2kg"), Some(-350.0));
        assert_eq!(parse_float("1e"), Some(1.0));
        assert_eq!(parse_float(".5"), Some(0.5));
        assert_eq!(parse_float("7."), Some(7.0));
        assert_eq!(parse_float("0x10"), Some(0.0));
        assert_eq!(classify_value(&json!("5%")), Some(FieldRole::Numeric));
        assert_eq!(coerce_number(Some(&json!("20 units"))), 20.0);
    }

    #[test]
    fn strings_without_a_numeric_prefix_are_categorical() {
        assert_eq!(parse_float("abc"), None);
        assert_eq!(parse_float("."), None);
        assert_eq!(parse_float("-"), None);
        assert_eq!(parse_float("$5"), None);
        assert_eq!(classify_value(&json!("abc")), Some(FieldRole::Categorical));
        assert_eq!(classify_value(&json!("n/a")), Some(FieldRole::Categorical));
    }

    #[test]
    fn infinity_parses_but_is_not_numeric() {
        assert_eq!(parse_float("Infinity"), Some(f64::INFINITY));
        assert_eq!(parse_float("-Infinity and beyond"), Some(f64::NEG_INFINITY));
        assert_eq!(classify_value(&json!("Infinity")), Some(FieldRole::Categorical));
        assert_eq!(coerce_number(Some(&json!("-Infinity"))), 0.0);
    }

    #[test]
    fn percentages_make_a_numeric_field() {
        let classes = FieldClassifier::new().classify(&dataset(json!([
            { "region": "east", "growth": "5%" },
            { "region": "west", "growth": "12.5%" }
        ])));
        assert_eq!(classes.categorical, vec!["region"]);
        assert_eq!(classes.numeric, vec!["growth"]);
    }

    #[test]
    fn whole_dates_stay_categorical() {
        let classifier = FieldClassifier::new();
        assert!(classifier.is_date(&json!("2024-03-01")));
        assert!(classifier.is_date(&json!("03/01/2024")));
        assert!(!classifier.is_date(&json!("2024 revenue")));
        assert!(!classifier.is_date(&json!(20240301)));

        let classes = classifier.classify(&dataset(json!([
            { "day": "2024-03-01", "year": "2024 actuals", "n": 1 }
        ])));
        assert_eq!(classes.categorical, vec!["day"]);
        assert_eq!(classes.numeric, vec!["year", "n"]);
        assert_eq!(parse_number(&json!("2024-03-01")), Some(2024.0));
    }

    #[test]
    fn nulls_bools_and_nested_values_are_unclassified() {
        assert_eq!(classify_value(&Value::Null), None);
        assert_eq!(classify_value(&json!(true)), None);
        assert_eq!(classify_value(&json!([1, 2])), None);
        assert_eq!(classify_value(&json!({ "a": 1 })), None);
    }

    #[test]
    fn follows_first_record_key_order() {
        let classes = FieldClassifier::new().classify(&dataset(json!([
            { "b_num": 1, "a_cat": "x", "c_num": "3", "flag": false, "d_cat": "y" }
        ])));
        assert_eq!(classes.numeric, vec!["b_num", "c_num"]);
        assert_eq!(classes.categorical, vec!["a_cat", "d_cat"]);
        assert_eq!(classes.unclassified, vec!["flag"]);
        assert_eq!(
            classes.roles.keys().collect::<Vec<_>>(),
            vec!["b_num", "a_cat", "c_num", "d_cat"]
        );
    }

    #[test]
    fn only_first_record_is_inspected() {
        let classes = FieldClassifier::new().classify(&dataset(json!([
            { "k": "label", "v": 1 },
            { "k": 5, "v": "text" }
        ])));
        assert_eq!(classes.role_of("k"), Some(FieldRole::Categorical));
        assert_eq!(classes.role_of("v"), Some(FieldRole::Numeric));
    }

    #[test]
    fn empty_dataset_yields_empty_sets() {
        let classes = FieldClassifier::new().classify(&RawDataset::default());
        assert!(classes.is_empty());
        assert_eq!(classes.categorical_count(), 0);
        assert_eq!(classes.numeric_count(), 0);
    }

    #[test]
    fn marks_first_date_like_categorical_field() {
        let classes = FieldClassifier::new().classify(&dataset(json!([
            { "region": "east", "day": "2024-03-01", "ts": "2024-03-01T10:00:00Z", "n": 1 }
        ])));
        assert_eq!(classes.temporal.as_deref(), Some("day"));
    }

    #[test]
    fn parses_configured_date_formats() {
        let formats = EngineConfig::default().temporal_formats;
        let expected = NaiveDate::from_ymd_opt(2024, 3, 1);
        assert_eq!(parse_temporal("2024-03-01", &formats), expected);
        assert_eq!(parse_temporal("2024-03-01 08:30:00", &formats), expected);
        assert_eq!(parse_temporal("2024-03-01T23:59:59+02:00", &formats), expected);
        assert_eq!(parse_temporal("03/01/2024", &formats), expected);
        assert_eq!(parse_temporal("east", &formats), None);
    }

    #[test]
    fn coerces_bad_numbers_to_zero() {
        assert_eq!(coerce_number(Some(&json!("bad"))), 0.0);
        assert_eq!(coerce_number(Some(&Value::Null)), 0.0);
        assert_eq!(coerce_number(None), 0.0);
        assert_eq!(coerce_number(Some(&json!("7.5"))), 7.5);
    }

    #[test]
    fn display_value_keeps_null_distinct() {
        assert_eq!(display_value(&Value::Null), None);
        assert_eq!(display_value(&json!("east")).as_deref(), Some("east"));
        assert_eq!(display_value(&json!(12)).as_deref(), Some("12"));
        assert_eq!(display_value(&json!(true)).as_deref(), Some("true"));
    }
}
