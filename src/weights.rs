//! Per-character preference weights.
//!
//! A weight in (0, 1] scales a glyph's match error, so lower weights make a
//! glyph easier to pick. Characters without an entry weigh 1.0.

use serde::Deserialize;
use std::collections::BTreeMap;

/// Block, shade and geometric glyphs that read well as pixels.
const PREFERRED: &[(char, f64)] = &[
    ('\u{E0B0}', 0.95),
    ('\u{E0B2}', 0.95),
    ('▁', 0.9),
    ('▂', 0.9),
    ('▃', 0.9),
    ('▄', 0.9),
    ('▅', 0.9),
    ('▆', 0.85),
    ('█', 0.85),
    ('▊', 0.95),
    ('▋', 0.95),
    ('▌', 0.95),
    ('▍', 0.95),
    ('▎', 0.95),
    ('▏', 0.95),
    ('●', 0.9),
    ('◀', 0.95),
    ('▲', 0.95),
    ('▶', 0.95),
    ('▼', 0.9),
    ('○', 0.8),
    ('◉', 0.95),
    ('◧', 0.9),
    ('◨', 0.9),
    ('◩', 0.9),
    ('◪', 0.9),
];

/// Immutable codepoint to weight map, fixed when a catalog is built.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct WeightTable(BTreeMap<char, f64>);

impl WeightTable {
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    pub fn with(mut self, ch: char, weight: f64) -> Self {
        self.0.insert(ch, weight);
        self
    }

    pub fn get(&self, ch: char) -> f64 {
        self.0.get(&ch).copied().unwrap_or(1.0)
    }

    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, f64)> + '_ {
        self.0.iter().map(|(&c, &w)| (c, w))
    }
}

impl Default for WeightTable {
    fn default() -> Self {
        Self(PREFERRED.iter().copied().collect())
    }
}
