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

use easel::{ChartEngine, ChartKind, DisplaySettings, RawDataset, RawRecord};
use proptest::prelude::*;
use serde_json::Value;

fn cell() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-1.0e6f64..1.0e6).prop_map(Value::from),
        any::<i32>().prop_map(Value::from),
        "[a-z]{0,6}".prop_map(Value::String),
        (-500i32..500).prop_map(|n| Value::String(n.to_string())),
        Just(Value::String("2024-01-15".to_string())),
    ]
}

/// Rows sharing one field list, like a real query result.
fn rows() -> impl Strategy<Value = RawDataset> {
    (0usize..5, 0usize..6).prop_flat_map(|(fields, count)| {
        prop::collection::vec(prop::collection::vec(cell(), fields), count).prop_map(
            move |grid| {
                grid.into_iter()
                    .map(|cells| {
                        cells
                            .into_iter()
                            .enumerate()
                            .map(|(i, v)| (format!("f{i}"), v))
                            .collect::<RawRecord>()
                    })
                    .collect::<RawDataset>()
            },
        )
    })
}

fn kind() -> impl Strategy<Value = ChartKind> {
    prop::sample::select(ChartKind::ALL.to_vec())
}

proptest! {
    #[test]
    fn rendering_is_deterministic(data in rows(), kind in kind(), palette in -2i64..8) {
        let engine = ChartEngine::new();
        let settings = DisplaySettings::default().with_palette(palette);
        let first = engine.render(&data, kind, &settings);
        let second = engine.render(&data, kind, &settings);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn compatible_kinds_always_render(data in rows()) {
        let engine = ChartEngine::new();
        for kind in engine.compatible_kinds(&data).iter() {
            let payload = engine.render(&data, kind, &DisplaySettings::default());
            prop_assert!(payload.is_ok(), "{} failed: {:?}", kind, payload);
            prop_assert_eq!(payload.unwrap().records.len(), data.len());
        }
    }

    #[test]
    fn adding_a_measure_never_shrinks_compatibility(data in rows(), measure in -100i32..100) {
        let engine = ChartEngine::new();
        let before = engine.compatible_kinds(&data);
        let widened: RawDataset = data
            .iter()
            .cloned()
            .map(|mut record| {
                record.insert("added_measure".to_string(), Value::from(measure));
                record
            })
            .collect();
        let after = engine.compatible_kinds(&widened);
        prop_assert!(after.is_superset(&before), "{} -> {}", before, after);
    }

    #[test]
    fn table_is_identity(data in rows()) {
        prop_assume!(!data.is_empty());
        let payload = ChartEngine::new()
            .render(&data, ChartKind::Table, &DisplaySettings::default())
            .unwrap();
        let records: Vec<RawRecord> = payload.records.iter().map(|r| r.to_record()).collect();
        prop_assert_eq!(records.as_slice(), data.records());
    }

    #[test]
    fn empty_data_never_renders(kind in kind()) {
        let result = ChartEngine::new().render(&RawDataset::default(), kind, &DisplaySettings::default());
        prop_assert_eq!(result.unwrap_err().reason(), "NoData");
    }
}
