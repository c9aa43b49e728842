//! Turns a solved grid into ANSI text and source-code literals.

use crate::color::ANSI_RESET;
use crate::layout::GridSize;
use crate::solver::CellResult;

/// Render `cells` (row-major, `grid.cells()` long) as 24-bit ANSI text.
///
/// Color escapes are only written when they differ from the previous cell in
/// the same row. Every row ends with a reset and a newline, so the text
/// never ends in a blank line.
pub fn ansi_text(cells: &[Option<CellResult<'_>>], grid: GridSize) -> String {
    let mut out = String::new();

    for row in cells.chunks(grid.cols.max(1)).take(grid.rows) {
        let mut last_bg = ANSI_RESET.to_string();
        let mut last_fg = ANSI_RESET.to_string();

        for cell in row {
            let Some(cell) = cell else {
                out.push(' ');
                continue;
            };

            let bg = if cell.bg.a < 0.5 {
                ANSI_RESET.to_string()
            } else {
                cell.bg.to_pixel().ansi_bg()
            };
            if bg != last_bg {
                out.push_str(&bg);
                last_bg = bg;
            }

            let fg = cell.fg.to_pixel().ansi_fg();
            if fg != last_fg {
                out.push_str(&fg);
                last_fg = fg;
            }
            out.push_str(&cell.glyph.text);
        }

        out.push_str(ANSI_RESET);
        out.push('\n');
    }
    out
}

/// `char kAnsiArt[] = "..."` with ESC, newline and quote escaped.
pub fn c_literal(raw: &str) -> String {
    let escaped = raw.replace('\x1b', "\\033").replace('\n', "\\n").replace('"', "\\\"");
    format!("char kAnsiArt[] = \"{escaped}\"")
}

/// `echo -ne '...'` with backslash, ESC, newline and single quote escaped.
pub fn shell_literal(raw: &str) -> String {
    let escaped = raw
        .replace('\\', "\\\\")
        .replace('\x1b', "\\e")
        .replace('\n', "\\n")
        .replace('\'', "\\x27");
    format!("echo -ne '{escaped}'")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use crate::font::GlyphRecord;

    const RED: Rgba = Rgba::new(1.0, 0.0, 0.0, 1.0);
    const BLUE: Rgba = Rgba::new(0.0, 0.0, 1.0, 1.0);

    fn cell(col: usize, row: usize, fg: Rgba, bg: Rgba, glyph: &GlyphRecord) -> Option<CellResult<'_>> {
        Some(CellResult { col, row, fg, bg, glyph })
    }

    #[test]
    fn escapes_only_on_change() {
        let a = GlyphRecord::new('a', vec![], 1.0);
        let b = GlyphRecord::new('b', vec![], 1.0);
        let cells = vec![
            cell(0, 0, RED, BLUE, &a),
            cell(1, 0, RED, BLUE, &b),
            cell(2, 0, BLUE, BLUE, &a),
            cell(0, 1, RED, Rgba::TRANSPARENT, &b),
            None,
            cell(2, 1, RED, Rgba::TRANSPARENT, &a),
        ];
        let raw = ansi_text(&cells, GridSize { cols: 3, rows: 2 });

        let expected = concat!(
            "\x1b[48;2;0;0;255m\x1b[38;2;255;0;0mab\x1b[38;2;0;0;255ma\x1b[0m\n",
            "\x1b[38;2;255;0;0mb a\x1b[0m\n",
        );
        assert_eq!(raw, expected);
    }

    #[test]
    fn blank_grid_is_spaces_and_resets() {
        let cells: Vec<Option<CellResult<'_>>> = vec![None; 4];
        let raw = ansi_text(&cells, GridSize { cols: 2, rows: 2 });
        assert_eq!(raw, "  \x1b[0m\n  \x1b[0m\n");
    }

    #[test]
    fn newline_glyph_still_closes_its_row() {
        let newline = GlyphRecord::new('\n', vec![], 1.0);
        let cells = vec![
            cell(0, 0, RED, Rgba::TRANSPARENT, &newline),
            cell(0, 1, RED, Rgba::TRANSPARENT, &newline),
        ];
        let raw = ansi_text(&cells, GridSize { cols: 1, rows: 2 });
        let row = "\x1b[38;2;255;0;0m\n\x1b[0m\n";
        assert_eq!(raw, row.repeat(2));
    }

    #[test]
    fn zero_rows_is_empty() {
        assert_eq!(ansi_text(&[], GridSize { cols: 3, rows: 0 }), "");
    }

    #[test]
    fn literals() {
        let raw = "\x1b[0m\"it's\" \\\n";
        assert_eq!(c_literal(raw), "char kAnsiArt[] = \"\\033[0m\\\"it's\\\" \\\\n\"");
        assert_eq!(shell_literal(raw), "echo -ne '\\e[0m\"it\\x27s\" \\\\\\n'");
    }
}
