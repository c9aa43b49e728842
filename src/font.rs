//! Glyph catalog: fixed-size opacity masks per character.

use crate::weights::WeightTable;
use crate::{PaintError, Result};
use fontdue::{Font, FontSettings};
use std::collections::BTreeMap;
use std::ops::Range;

/// One character rasterized into a `cell_width × cell_height` coverage mask.
#[derive(Clone, Debug, PartialEq)]
pub struct GlyphRecord {
    pub codepoint: char,
    pub text: String,
    /// Row-major ink coverage, 0 = background, 255 = full ink.
    pub mask: Vec<u8>,
    pub weight: f64,
}

impl GlyphRecord {
    pub fn new(codepoint: char, mask: Vec<u8>, weight: f64) -> Self {
        Self { codepoint, text: codepoint.to_string(), mask, weight }
    }

    /// Ink coverage at `index` in [0, 1], or `None` past the end of the mask.
    #[inline]
    pub fn opacity(&self, index: usize) -> Option<f64> {
        self.mask.get(index).map(|&v| v as f64 / 255.0)
    }
}

/// Glyphs sharing one cell size, ordered by codepoint.
#[derive(Clone, Debug, Default)]
pub struct GlyphCatalog {
    cell_width: usize,
    cell_height: usize,
    glyphs: Vec<GlyphRecord>,
}

impl GlyphCatalog {
    /// Build from caller-supplied records; a later duplicate codepoint replaces an earlier one.
    pub fn from_records(
        cell_width: usize,
        cell_height: usize,
        records: impl IntoIterator<Item = GlyphRecord>,
    ) -> Self {
        let by_codepoint: BTreeMap<char, GlyphRecord> =
            records.into_iter().map(|g| (g.codepoint, g)).collect();
        Self { cell_width, cell_height, glyphs: by_codepoint.into_values().collect() }
    }

    /// Analytic block-element catalog, needing no font data.
    pub fn builtin(cell_width: usize, cell_height: usize, weights: &WeightTable) -> Result<Self> {
        if cell_width == 0 || cell_height == 0 {
            return Err(PaintError::InvalidConfig("glyph dimensions must be non-zero".into()));
        }
        let records = BUILTIN_CHARS.iter().map(|&ch| {
            let mask = block_mask(ch, cell_width, cell_height);
            GlyphRecord::new(ch, mask, weights.get(ch))
        });
        Ok(Self::from_records(cell_width, cell_height, records))
    }

    pub fn cell_size(&self) -> (usize, usize) {
        (self.cell_width, self.cell_height)
    }

    pub fn glyphs(&self) -> &[GlyphRecord] {
        &self.glyphs
    }

    pub fn get(&self, ch: char) -> Option<&GlyphRecord> {
        self.glyphs
            .binary_search_by_key(&ch, |g| g.codepoint)
            .ok()
            .map(|i| &self.glyphs[i])
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

/// Rasterizes a TrueType/OpenType face into a [`GlyphCatalog`].
#[derive(Clone, Debug)]
pub struct CatalogBuilder {
    cell_width: usize,
    cell_height: usize,
    range: Range<u32>,
    weights: WeightTable,
}

impl CatalogBuilder {
    pub fn new(cell_width: usize, cell_height: usize) -> Self {
        Self { cell_width, cell_height, range: 32..95, weights: WeightTable::default() }
    }

    /// Half-open codepoint range to rasterize.
    pub fn with_range(mut self, range: Range<u32>) -> Self {
        self.range = range;
        self
    }

    /// Weights; any character listed here is rasterized even outside the range.
    pub fn with_weights(mut self, weights: WeightTable) -> Self {
        self.weights = weights;
        self
    }

    pub fn build(&self, font_data: &[u8]) -> Result<GlyphCatalog> {
        if self.cell_width == 0 || self.cell_height == 0 {
            return Err(PaintError::InvalidConfig("glyph dimensions must be non-zero".into()));
        }
        let font = Font::from_bytes(font_data, FontSettings::default())
            .map_err(|e| PaintError::Font(e.to_string()))?;

        let chars = self
            .range
            .clone()
            .filter_map(char::from_u32)
            .chain(self.weights.chars())
            .chain(std::iter::once(' '));

        let mut records = Vec::new();
        for ch in chars {
            if ch != ' ' && font.lookup_glyph_index(ch) == 0 {
                log::warn!("font has no glyph for {:?} (U+{:04X}), skipping", ch, ch as u32);
                continue;
            }
            let mask = self.rasterize(&font, ch);
            records.push(GlyphRecord::new(ch, mask, self.weights.get(ch)));
        }

        let catalog = GlyphCatalog::from_records(self.cell_width, self.cell_height, records);
        log::debug!(
            "built catalog of {} glyphs at {}x{}",
            catalog.len(),
            self.cell_width,
            self.cell_height
        );
        Ok(catalog)
    }

    fn rasterize(&self, font: &Font, ch: char) -> Vec<u8> {
        let (w, h) = (self.cell_width, self.cell_height);
        let mut mask = vec![0u8; w * h];

        let (metrics, bitmap) = font.rasterize(ch, h as f32);
        if metrics.width == 0 || metrics.height == 0 {
            return mask;
        }

        // Center by advance, baseline at 4/5 of the cell
        let origin_x = ((w as f32 - metrics.advance_width) / 2.0).round() as i32;
        let baseline_y = (h * 4 / 5) as i32;
        let x_offset = origin_x + metrics.xmin;
        let y_offset = baseline_y - metrics.height as i32 - metrics.ymin;

        for sy in 0..metrics.height {
            for sx in 0..metrics.width {
                let tx = x_offset + sx as i32;
                let ty = y_offset + sy as i32;
                if tx >= 0 && (tx as usize) < w && ty >= 0 && (ty as usize) < h {
                    mask[ty as usize * w + tx as usize] = bitmap[sy * metrics.width + sx];
                }
            }
        }
        mask
    }
}

const BUILTIN_CHARS: &[char] = &[
    ' ', '▀', '▁', '▂', '▃', '▄', '▅', '▆', '▇', '█', '▉', '▊', '▋', '▌', '▍', '▎', '▏', '▐',
    '░', '▒', '▓', '▔', '▕', '▖', '▗', '▘', '▙', '▚', '▛', '▜', '▝', '▞', '▟',
];

const UL: u8 = 1;
const UR: u8 = 2;
const LL: u8 = 4;
const LR: u8 = 8;

fn block_mask(ch: char, w: usize, h: usize) -> Vec<u8> {
    let mut m = vec![0u8; w * h];
    match ch {
        '▀' => fill_rect(&mut m, w, 0, 0, w, h / 2),
        '▁' => fill_rect(&mut m, w, 0, h * 7 / 8, w, h),
        '▂' => fill_rect(&mut m, w, 0, h * 3 / 4, w, h),
        '▃' => fill_rect(&mut m, w, 0, h * 5 / 8, w, h),
        '▄' => fill_rect(&mut m, w, 0, h / 2, w, h),
        '▅' => fill_rect(&mut m, w, 0, h * 3 / 8, w, h),
        '▆' => fill_rect(&mut m, w, 0, h / 4, w, h),
        '▇' => fill_rect(&mut m, w, 0, h / 8, w, h),
        '█' => fill_rect(&mut m, w, 0, 0, w, h),
        '▉' => fill_rect(&mut m, w, 0, 0, w * 7 / 8, h),
        '▊' => fill_rect(&mut m, w, 0, 0, w * 3 / 4, h),
        '▋' => fill_rect(&mut m, w, 0, 0, w * 5 / 8, h),
        '▌' => fill_rect(&mut m, w, 0, 0, w / 2, h),
        '▍' => fill_rect(&mut m, w, 0, 0, w * 3 / 8, h),
        '▎' => fill_rect(&mut m, w, 0, 0, w / 4, h),
        '▏' => fill_rect(&mut m, w, 0, 0, w / 8, h),
        '▐' => fill_rect(&mut m, w, w / 2, 0, w, h),
        '▔' => fill_rect(&mut m, w, 0, 0, w, h / 8),
        '▕' => fill_rect(&mut m, w, w * 7 / 8, 0, w, h),
        '░' => fill_pattern(&mut m, w, |x, y| (x + y) % 4 == 0),
        '▒' => fill_pattern(&mut m, w, |x, y| (x + y) % 2 == 0),
        '▓' => fill_pattern(&mut m, w, |x, y| (x + y) % 4 != 0),
        '▖' => fill_quadrants(&mut m, w, h, LL),
        '▗' => fill_quadrants(&mut m, w, h, LR),
        '▘' => fill_quadrants(&mut m, w, h, UL),
        '▙' => fill_quadrants(&mut m, w, h, UL | LL | LR),
        '▚' => fill_quadrants(&mut m, w, h, UL | LR),
        '▛' => fill_quadrants(&mut m, w, h, UL | UR | LL),
        '▜' => fill_quadrants(&mut m, w, h, UL | UR | LR),
        '▝' => fill_quadrants(&mut m, w, h, UR),
        '▞' => fill_quadrants(&mut m, w, h, UR | LL),
        '▟' => fill_quadrants(&mut m, w, h, UR | LL | LR),
        _ => {}
    }
    m
}

fn fill_rect(m: &mut [u8], w: usize, x0: usize, y0: usize, x1: usize, y1: usize) {
    for y in y0..y1 {
        m[y * w + x0..y * w + x1].fill(255);
    }
}

fn fill_pattern(m: &mut [u8], w: usize, on: impl Fn(usize, usize) -> bool) {
    for (i, v) in m.iter_mut().enumerate() {
        if on(i % w, i / w) {
            *v = 255;
        }
    }
}

fn fill_quadrants(m: &mut [u8], w: usize, h: usize, quads: u8) {
    let (mx, my) = (w / 2, h / 2);
    if quads & UL != 0 {
        fill_rect(m, w, 0, 0, mx, my);
    }
    if quads & UR != 0 {
        fill_rect(m, w, mx, 0, w, my);
    }
    if quads & LL != 0 {
        fill_rect(m, w, 0, my, mx, h);
    }
    if quads & LR != 0 {
        fill_rect(m, w, mx, my, w, h);
    }
}
