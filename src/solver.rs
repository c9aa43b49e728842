//! Per-cell glyph matching.
//!
//! Every eligible glyph is fitted to the cell by solving for the constant
//! foreground and background colors that best explain the sampled pixels
//! under the glyph's coverage mask. The glyph with the lowest squared error,
//! scaled by its preference weight, wins.

use crate::color::Rgba;
use crate::font::{GlyphCatalog, GlyphRecord};
use crate::layout::GridSize;
use crate::sampler::Sampler;
use std::collections::BTreeSet;

/// Background alpha below this is treated as fully transparent.
const BG_ALPHA_CUTOFF: f64 = 0.2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellTask {
    pub col: usize,
    pub row: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CellResult<'a> {
    pub col: usize,
    pub row: usize,
    /// Opaque ink color.
    pub fg: Rgba,
    /// Premultiplied background, alpha either 0 or 1.
    pub bg: Rgba,
    pub glyph: &'a GlyphRecord,
}

/// Stateless glyph search over one catalog and one image.
pub struct Solver<'a> {
    catalog: &'a GlyphCatalog,
    sampler: &'a dyn Sampler,
    forbidden: &'a BTreeSet<char>,
    stride_x: f64,
    stride_y: f64,
    short_masks: Vec<char>,
}

impl<'a> Solver<'a> {
    pub fn new(
        catalog: &'a GlyphCatalog,
        sampler: &'a dyn Sampler,
        forbidden: &'a BTreeSet<char>,
        (stride_x, stride_y): (f64, f64),
    ) -> Self {
        let (gw, gh) = catalog.cell_size();
        let short_masks = catalog
            .glyphs()
            .iter()
            .filter(|g| g.mask.len() < gw * gh)
            .map(|g| {
                log::warn!("glyph {:?} mask has {} of {} pixels, ignoring the rest", g.text, g.mask.len(), gw * gh);
                g.codepoint
            })
            .collect();
        Self { catalog, sampler, forbidden, stride_x, stride_y, short_masks }
    }

    /// Glyphs whose masks do not cover the whole cell; missing pixels are skipped.
    pub fn short_masks(&self) -> &[char] {
        &self.short_masks
    }

    /// Best glyph for `task`, or `None` when every glyph is forbidden.
    pub fn solve(&self, task: CellTask) -> Option<CellResult<'a>> {
        let observed = self.sample_cell(task);

        let mut best: Option<(f64, Rgba, Rgba, &'a GlyphRecord)> = None;
        for glyph in self.catalog.glyphs() {
            if self.forbidden.contains(&glyph.codepoint) {
                continue;
            }
            let (fg, bg) = fit_colors(glyph, &observed);
            let cost = match_error(glyph, fg, bg, &observed) * glyph.weight;

            if best.as_ref().map_or(true, |&(best_cost, ..)| cost < best_cost) {
                best = Some((cost, fg, bg, glyph));
            }
        }

        best.map(|(_, fg, bg, glyph)| CellResult { col: task.col, row: task.row, fg, bg, glyph })
    }

    /// Nearest-neighbor samples at each glyph pixel center, row-major.
    fn sample_cell(&self, task: CellTask) -> Vec<Rgba> {
        let (gw, gh) = self.catalog.cell_size();
        let x0 = task.col as f64 * self.stride_x;
        let y0 = task.row as f64 * self.stride_y;

        let mut samples = Vec::with_capacity(gw * gh);
        for y in 0..gh {
            let img_y = y0 + self.stride_y * (y as f64 + 0.5) / gh as f64;
            for x in 0..gw {
                let img_x = x0 + self.stride_x * (x as f64 + 0.5) / gw as f64;
                samples.push(self.sampler.sample(img_x, img_y));
            }
        }
        samples
    }
}

/// Coverage-weighted mean colors under and around the glyph's ink.
fn fit_colors(glyph: &GlyphRecord, observed: &[Rgba]) -> (Rgba, Rgba) {
    let (mut fg_sum, mut bg_sum) = (0.0, 0.0);
    let (mut fg, mut bg) = (Rgba::default(), Rgba::default());

    for (i, &color) in observed.iter().enumerate() {
        let Some(ink) = glyph.opacity(i) else { continue };
        fg_sum += ink;
        bg_sum += 1.0 - ink;
        fg = fg + color * ink;
        bg = bg + color * (1.0 - ink);
    }

    if fg_sum > 0.0 {
        fg = fg / fg_sum;
    }
    fg.a = 1.0;

    if bg_sum > 0.0 {
        bg = bg / bg_sum;
    }
    bg.a = if bg.a < BG_ALPHA_CUTOFF { 0.0 } else { 1.0 };
    (fg, bg.premultiplied())
}

fn match_error(glyph: &GlyphRecord, fg: Rgba, bg: Rgba, observed: &[Rgba]) -> f64 {
    observed
        .iter()
        .enumerate()
        .filter_map(|(i, &color)| {
            let ink = glyph.opacity(i)?;
            let d = color.premultiplied() - (fg * ink + bg * (1.0 - ink));
            Some(d.dot(d))
        })
        .sum()
}

/// RGBA8 image of the rendered grid, one glyph cell per character.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Canvas {
    width: usize,
    height: usize,
    bytes: Vec<u8>,
}

impl Canvas {
    pub fn new(grid: GridSize, (glyph_width, glyph_height): (usize, usize)) -> Self {
        let width = grid.cols * glyph_width;
        let height = grid.rows * glyph_height;
        Self { width, height, bytes: vec![0; width * height * 4] }
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Paint a solved cell by mixing its colors through the glyph mask.
    ///
    /// Each cell owns a disjoint block of the buffer.
    pub fn blit(&mut self, result: &CellResult<'_>, (gw, gh): (usize, usize)) {
        for y in 0..gh {
            let py = result.row * gh + y;
            for x in 0..gw {
                let px = result.col * gw + x;
                if px >= self.width || py >= self.height {
                    continue;
                }
                let ink = result.glyph.opacity(y * gw + x).unwrap_or(0.0);
                let color = result.fg * ink + result.bg * (1.0 - ink);
                let idx = (py * self.width + px) * 4;
                self.bytes[idx..idx + 4].copy_from_slice(&color.to_pixel().to_array());
            }
        }
    }
}
