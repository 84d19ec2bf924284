use serde::Serialize;

use super::{
    scoring::{
        color_for,
        key_colors,
        strength,
        Rgb,
    },
    sort::{
        Classification,
        Coverage,
        GroupSection,
    },
};
use crate::core::{
    unicode::display_name,
    GridConfig,
    UnitProfile,
};

pub const UNREVIEWED_BACKGROUND: &str = "#FFF";
pub const MISSING_BACKGROUND: &str = "#EEE";
pub const TEXT_COLOR: &str = "#000";
pub const MISSING_TEXT_COLOR: &str = "#888";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TileKind {
    Scored,
    Unreviewed,
    Missing,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tile {
    pub glyph: char,
    pub index: usize,
    pub kind: TileKind,
    pub background: String,
    pub text_color: &'static str,
    pub tooltip: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    /// `None` for the single flat section.
    pub label: Option<String>,
    pub coverage: Option<Coverage>,
    pub tiles: Vec<Tile>,
    /// Present in grouped mode when unseen units are shown.
    pub missing: Option<Vec<Tile>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub title: String,
    pub language: String,
    pub key: Vec<Rgb>,
    /// Flat mode only: number of distinct units on the grid.
    pub total_units: Option<usize>,
    pub sections: Vec<Section>,
    pub source: Option<String>,
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn tooltip(
    glyph: char,
    index: usize,
    background: &str,
    unit: Option<&UnitProfile>,
    strong_interval: u32,
) -> String {
    let mut text = format!("Character: {}", display_name(glyph));
    if let Some(unit) = unit.filter(|unit| unit.is_reviewed()) {
        let score = if unit.avg_interval != 0.0 {
            round2(strength(unit.avg_interval, strong_interval)).to_string()
        } else {
            "NaN".to_string()
        };
        text.push_str(&format!(
            " | Count: {} | Avg Interval: {} | Score: {} | Background: {} | Index: {}",
            unit.count,
            round2(unit.avg_interval),
            score,
            background,
            index
        ));
    }
    text
}

pub struct TileBuilder<'c> {
    config: &'c GridConfig,
}

impl<'c> TileBuilder<'c> {
    pub fn new(config: &'c GridConfig) -> Self {
        Self { config }
    }

    pub fn unit_tile(&self, unit: &UnitProfile, index: usize) -> Tile {
        let (kind, background) = match unit.strength(self.config.strong_interval) {
            Some(score) => (TileKind::Scored, color_for(score).to_hex()),
            None => (TileKind::Unreviewed, UNREVIEWED_BACKGROUND.to_string()),
        };
        let tooltip = self.config.tooltips.then(|| {
            tooltip(unit.value, index, &background, Some(unit), self.config.strong_interval)
        });
        Tile { glyph: unit.value, index, kind, background, text_color: TEXT_COLOR, tooltip }
    }

    pub fn missing_tile(&self, glyph: char, index: usize) -> Tile {
        let tooltip = self.config.tooltips.then(|| {
            tooltip(glyph, index, MISSING_BACKGROUND, None, self.config.strong_interval)
        });
        Tile {
            glyph,
            index,
            kind: TileKind::Missing,
            background: MISSING_BACKGROUND.to_string(),
            text_color: MISSING_TEXT_COLOR,
            tooltip,
        }
    }

    fn unit_tiles(&self, units: &[&UnitProfile]) -> Vec<Tile> {
        units.iter().enumerate().map(|(index, unit)| self.unit_tile(unit, index)).collect()
    }

    fn grouped_section(&self, section: &GroupSection<'_>, with_missing: bool) -> Section {
        let missing = with_missing.then(|| {
            section
                .missing
                .iter()
                .enumerate()
                .map(|(index, glyph)| self.missing_tile(*glyph, index))
                .collect()
        });
        Section {
            label: Some(section.label.clone()),
            coverage: Some(section.coverage),
            tiles: self.unit_tiles(&section.units),
            missing,
        }
    }
}

pub fn build_report(classification: &Classification<'_>, config: &GridConfig) -> Report {
    let tiles = TileBuilder::new(config);
    let title = format!("Kanji Grid - {}", config.deck);

    match classification {
        Classification::Flat { units, .. } => Report {
            title,
            language: config.language.clone(),
            key: key_colors(),
            total_units: Some(units.len()),
            sections: vec![Section {
                label: None,
                coverage: None,
                tiles: tiles.unit_tiles(units),
                missing: None,
            }],
            source: None,
        },
        Classification::Grouped(view) => {
            let mut sections: Vec<Section> = view
                .sections
                .iter()
                .map(|section| tiles.grouped_section(section, config.show_unseen))
                .collect();
            sections.push(tiles.grouped_section(&view.other, false));

            Report {
                title,
                language: config.language.clone(),
                key: key_colors(),
                total_units: None,
                sections,
                source: Some(view.group.source.clone()),
            }
        }
    }
}
