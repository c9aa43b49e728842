//! Output grid sizing.

/// Columns used when neither width nor height is requested.
pub const FALLBACK_COLUMNS: usize = 40;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridSize {
    pub cols: usize,
    pub rows: usize,
}

impl GridSize {
    /// Resolve the character grid for an `img_w × img_h` image.
    ///
    /// `cell_aspect` is glyph height / glyph width times the user aspect ratio.
    /// An unset (`None` or zero) dimension is derived from the other; when both
    /// are set the grid is fit inside the requested box.
    pub fn resolve(
        img_w: u32,
        img_h: u32,
        req_w: Option<usize>,
        req_h: Option<usize>,
        cell_aspect: f64,
    ) -> GridSize {
        let ratio = img_h.max(1) as f64 / img_w.max(1) as f64;
        let rows_for = |cols: usize| ((ratio * cols as f64 / cell_aspect) as usize).max(1);
        let cols_for = |rows: usize| ((rows as f64 * cell_aspect / ratio) as usize).max(1);

        let req_w = req_w.filter(|&w| w > 0);
        let req_h = req_h.filter(|&h| h > 0);

        match (req_w, req_h) {
            (None, None) => GridSize { cols: FALLBACK_COLUMNS, rows: rows_for(FALLBACK_COLUMNS) },
            (Some(cols), None) => GridSize { cols, rows: rows_for(cols) },
            (None, Some(rows)) => GridSize { cols: cols_for(rows), rows },
            (Some(w), Some(h)) => {
                let rows = rows_for(w);
                if rows <= h {
                    GridSize { cols: w, rows }
                } else {
                    GridSize { cols: cols_for(h).min(w), rows: h }
                }
            }
        }
    }

    pub fn cells(&self) -> usize {
        self.cols * self.rows
    }
}

/// Image-space extent of one cell as (x, y).
///
/// The horizontal stride is snapped to whole glyph pixels so sub-pixel samples
/// fall on a regular lattice.
pub fn strides(img_w: u32, img_h: u32, grid: GridSize, glyph_width: usize) -> (f64, f64) {
    let gw = glyph_width.max(1) as f64;
    let stride_x = (img_w as f64 / grid.cols as f64 * gw).trunc() / gw;
    let stride_y = img_h as f64 / grid.rows as f64;
    (stride_x, stride_y)
}
