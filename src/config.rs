//! Render configuration.

use crate::weights::WeightTable;
use crate::{PaintError, Result};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::ops::Range;
use std::path::Path;

/// Settings for one render pass. Set before a pass starts.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Output columns; derived from `height` when unset.
    pub width: Option<usize>,
    /// Output rows; derived from `width` when unset.
    pub height: Option<usize>,
    /// Extra stretch applied to the glyph cell's height/width ratio.
    pub aspect_ratio: f64,
    pub glyph_width: usize,
    pub glyph_height: usize,
    /// First codepoint to rasterize.
    pub rune_start: u32,
    /// One past the last codepoint to rasterize.
    pub rune_end: u32,
    pub threads: usize,
    pub forbidden: BTreeSet<char>,
    pub weights: WeightTable,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            aspect_ratio: 1.0,
            glyph_width: 7,
            glyph_height: 14,
            rune_start: 32,
            rune_end: 95,
            threads: 4,
            forbidden: BTreeSet::new(),
            weights: WeightTable::default(),
        }
    }
}

impl RenderConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let config: Self = serde_json::from_str(&std::fs::read_to_string(path)?)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| Err(PaintError::InvalidConfig(msg.to_string()));
        if self.glyph_width == 0 || self.glyph_height == 0 {
            return invalid("glyph dimensions must be non-zero");
        }
        if !(self.aspect_ratio > 0.0) {
            return invalid("aspect ratio must be positive");
        }
        if self.rune_start >= self.rune_end {
            return invalid("codepoint range is empty");
        }
        if self.threads == 0 {
            return invalid("thread count must be at least 1");
        }
        if let Some((ch, w)) = self.weights.iter().find(|&(_, w)| !(w > 0.0)) {
            return Err(PaintError::InvalidConfig(format!("weight {w} for {ch:?} must be positive")));
        }
        Ok(())
    }

    /// Height/width ratio of a `(width, height)` glyph cell, stretched by
    /// `aspect_ratio`.
    pub fn cell_aspect(&self, (width, height): (usize, usize)) -> f64 {
        height as f64 / width as f64 * self.aspect_ratio
    }

    pub fn rune_range(&self) -> Range<u32> {
        self.rune_start..self.rune_end
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_height(mut self, height: usize) -> Self {
        self.height = Some(height);
        self
    }

    pub fn with_aspect_ratio(mut self, ratio: f64) -> Self {
        self.aspect_ratio = ratio;
        self
    }

    pub fn with_glyph_size(mut self, width: usize, height: usize) -> Self {
        self.glyph_width = width;
        self.glyph_height = height;
        self
    }

    pub fn with_rune_range(mut self, range: Range<u32>) -> Self {
        self.rune_start = range.start;
        self.rune_end = range.end;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_weights(mut self, weights: WeightTable) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_forbidden(mut self, chars: impl IntoIterator<Item = char>) -> Self {
        self.forbidden.extend(chars);
        self
    }

    pub fn forbid(&mut self, ch: char) {
        self.forbidden.insert(ch);
    }

    pub fn allow(&mut self, ch: char) {
        self.forbidden.remove(&ch);
    }

    pub fn clear_forbidden(&mut self) {
        self.forbidden.clear();
    }

    pub fn is_forbidden(&self, ch: char) -> bool {
        self.forbidden.contains(&ch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = RenderConfig::default();
        config.validate().unwrap();
        assert_eq!(config.cell_aspect((config.glyph_width, config.glyph_height)), 2.0);
        assert_eq!(config.clone().with_aspect_ratio(1.5).cell_aspect((4, 8)), 3.0);
        assert_eq!(config.rune_range(), 32..95);
    }

    #[test]
    fn forbidden_set() {
        let mut config = RenderConfig::default().with_forbidden(['M', '@']);
        assert!(config.is_forbidden('M'));
        config.allow('M');
        assert!(!config.is_forbidden('M'));
        config.forbid('#');
        assert_eq!(config.forbidden.iter().copied().collect::<String>(), "#@");
        config.clear_forbidden();
        assert!(config.forbidden.is_empty());
    }

    #[test]
    fn rejects_bad_values() {
        assert!(RenderConfig::default().with_glyph_size(0, 14).validate().is_err());
        assert!(RenderConfig::default().with_aspect_ratio(0.0).validate().is_err());
        assert!(RenderConfig::default().with_threads(0).validate().is_err());
        assert!(RenderConfig::default().with_rune_range(50..50).validate().is_err());
        let weights = WeightTable::empty().with('x', 0.0);
        assert!(RenderConfig::default().with_weights(weights).validate().is_err());
    }

    #[test]
    fn loads_partial_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r##"{{"width": 120, "threads": 2, "forbidden": ["M"], "weights": {{"#": 0.5}}}}"##)
            .unwrap();

        let config = RenderConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.width, Some(120));
        assert_eq!(config.height, None);
        assert_eq!(config.threads, 2);
        assert!(config.is_forbidden('M'));
        assert_eq!(config.weights.get('#'), 0.5);
        assert_eq!(config.glyph_height, 14);
    }

    #[test]
    fn malformed_json_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ width: ").unwrap();
        assert!(matches!(RenderConfig::from_json_file(file.path()), Err(PaintError::Json(_))));
    }
}
