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

use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub name: String,
    pub colors: Vec<String>,
}

impl Palette {
    pub fn new(name: &str, colors: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            colors: colors.iter().map(|c| (*c).to_string()).collect(),
        }
    }

    /// Colour for the `index`-th series or slice, cycling through the palette.
    pub fn color_at(&self, index: usize) -> Option<&str> {
        if self.colors.is_empty() {
            return None;
        }
        Some(self.colors[index % self.colors.len()].as_str())
    }

    pub fn assign(&self, slots: usize) -> Vec<String> {
        (0..slots)
            .filter_map(|i| self.color_at(i).map(str::to_string))
            .collect()
    }
}

pub fn builtin_palettes() -> Vec<Palette> {
    vec![
        Palette::new(
            "classic",
            &["#8884d8", "#82ca9d", "#ffc658", "#ff7300", "#0088fe"],
        ),
        Palette::new(
            "ocean",
            &["#03045e", "#0077b6", "#00b4d8", "#90e0ef", "#caf0f8"],
        ),
        Palette::new(
            "sunset",
            &["#ff6b6b", "#f06595", "#cc5de8", "#845ef7", "#5c7cfa"],
        ),
        Palette::new(
            "forest",
            &["#2b9348", "#55a630", "#80b918", "#aacc00", "#d4d700"],
        ),
        Palette::new(
            "monochrome",
            &["#212529", "#495057", "#868e96", "#adb5bd", "#dee2e6"],
        ),
    ]
}

/// Picks the palette for a user-selected index. An index outside the list
/// falls back to the first palette.
pub fn select(palettes: &[Palette], index: i64) -> Option<&Palette> {
    let picked = usize::try_from(index)
        .ok()
        .and_then(|i| palettes.get(i));
    if picked.is_none() {
        warn!(
            index,
            available = palettes.len(),
            "palette index out of range, using the first palette"
        );
    }
    picked.or_else(|| palettes.first())
}
