//! Flattened PNG snapshot of a report.
//!
//! The key strip sits on top, followed by one block of tiles per section in
//! report order. Only tile colors are drawn, never glyphs.

use std::io::Cursor;

use image::{
    ImageFormat,
    Rgb as Pixel,
    RgbImage,
};

use super::{
    report::Report,
    scoring::Rgb,
};
use crate::core::KanjiGridError;

pub const TILE_SIZE: u32 = 24;
pub const COLUMNS: u32 = 40;
pub const MARGIN: u32 = 12;
pub const KEY_HEIGHT: u32 = 16;
const GAP: u32 = 2;
const SECTION_GAP: u32 = 16;

const PAGE: Rgb = Rgb(255, 255, 255);
const OUTLINE: Rgb = Rgb(0xDD, 0xDD, 0xDD);

fn pixel(color: Rgb) -> Pixel<u8> {
    Pixel([color.0, color.1, color.2])
}

fn rows(tiles: usize) -> u32 {
    (tiles as u32).div_ceil(COLUMNS)
}

fn fill(image: &mut RgbImage, x: u32, y: u32, width: u32, height: u32, color: Rgb) {
    for py in y..y + height {
        for px in x..x + width {
            image.put_pixel(px, py, pixel(color));
        }
    }
}

pub fn image_size(report: &Report) -> (u32, u32) {
    let width = MARGIN * 2 + COLUMNS * (TILE_SIZE + GAP) - GAP;
    let body: u32 = report
        .sections
        .iter()
        .map(|section| SECTION_GAP + rows(section.tiles.len()) * (TILE_SIZE + GAP))
        .sum();
    (width, MARGIN * 2 + KEY_HEIGHT + body)
}

/// Top-left corner of tile `index` in a block starting at `top`.
pub fn tile_origin(top: u32, index: usize) -> (u32, u32) {
    let index = index as u32;
    (MARGIN + (index % COLUMNS) * (TILE_SIZE + GAP), top + (index / COLUMNS) * (TILE_SIZE + GAP))
}

pub fn render_image(report: &Report) -> RgbImage {
    let (width, height) = image_size(report);
    let mut image = RgbImage::from_pixel(width, height, pixel(PAGE));

    let key_width = width - MARGIN * 2;
    let swatches = report.key.len().max(1) as u32;
    for (i, color) in report.key.iter().enumerate() {
        let x = MARGIN + i as u32 * key_width / swatches;
        fill(&mut image, x, MARGIN, key_width / swatches, KEY_HEIGHT, *color);
    }

    let mut top = MARGIN + KEY_HEIGHT + SECTION_GAP;
    for section in &report.sections {
        for (i, tile) in section.tiles.iter().enumerate() {
            let (x, y) = tile_origin(top, i);
            let color = Rgb::from_hex(&tile.background).unwrap_or(PAGE);
            fill(&mut image, x, y, TILE_SIZE, TILE_SIZE, OUTLINE);
            fill(&mut image, x + 1, y + 1, TILE_SIZE - 2, TILE_SIZE - 2, color);
        }
        top += rows(section.tiles.len()) * (TILE_SIZE + GAP) + SECTION_GAP;
    }

    image
}

pub fn render_png(report: &Report) -> Result<Vec<u8>, KanjiGridError> {
    let mut bytes = Vec::new();
    render_image(report).write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}
