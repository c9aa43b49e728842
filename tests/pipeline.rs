//! End-to-end render passes through `Painter`.

use ansipaint::{GlyphCatalog, GlyphRecord, GridSize, Painter, RenderConfig, WeightTable};
use image::{DynamicImage, Rgba, RgbaImage};
use test_log::test;

fn gradient(w: u32, h: u32) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_fn(w, h, |x, y| {
        let r = (x * 255 / w.max(1)) as u8;
        let g = (y * 255 / h.max(1)) as u8;
        let a = if (x + y) % 7 == 0 { 0 } else { 255 };
        Rgba([r, g, 128, a])
    }))
}

fn blocks() -> GlyphCatalog {
    GlyphCatalog::builtin(4, 8, &WeightTable::default()).unwrap()
}

#[test]
fn white_and_black_pixels() {
    let mut img = RgbaImage::new(2, 1);
    img.put_pixel(0, 0, Rgba([255, 255, 255, 255]));
    img.put_pixel(1, 0, Rgba([0, 0, 0, 255]));

    let config = RenderConfig::default().with_width(2).with_glyph_size(1, 1);
    let mut painter = Painter::new(config);
    painter.set_catalog(GlyphCatalog::from_records(
        1,
        1,
        vec![GlyphRecord::new(' ', vec![0], 1.0), GlyphRecord::new('█', vec![255], 1.0)],
    ));
    painter.set_image(&DynamicImage::ImageRgba8(img));

    let out = painter.render().clone();
    assert_eq!(out.grid, Some(GridSize { cols: 2, rows: 1 }));
    assert_eq!((out.rgba_width, out.rgba_height), (2, 1));
    assert_eq!(&out.rgba[0..4], &[255, 255, 255, 255]);
    assert_eq!(&out.rgba[4..8], &[0, 0, 0, 255]);

    // Left cell is a white background behind a space.
    assert!(out.raw.starts_with("\x1b[48;2;255;255;255m\x1b[38;2;0;0;0m "));
    assert!(out.raw.ends_with("\x1b[0m\n"));
    assert_eq!(out.raw.lines().count(), 1);
}

#[test]
fn repeated_passes_are_identical() {
    let image = gradient(61, 37);
    let render = |threads| {
        let config = RenderConfig::default().with_width(23).with_glyph_size(4, 8).with_threads(threads);
        let mut painter = Painter::new(config);
        painter.set_catalog(blocks());
        painter.set_image(&image);
        painter.render().clone()
    };

    let first = render(4);
    assert!(!first.is_empty());
    assert_eq!(first, render(4));
    assert_eq!(first, render(1));
    assert_eq!(first.rgba.len(), first.rgba_width * first.rgba_height * 4);
}

#[test]
fn all_glyphs_forbidden_leaves_blank_text() {
    let catalog = blocks();
    let config = RenderConfig::default()
        .with_width(5)
        .with_height(3)
        .with_glyph_size(4, 8)
        .with_forbidden(catalog.glyphs().iter().map(|g| g.codepoint));
    let mut painter = Painter::new(config);
    painter.set_catalog(catalog);
    painter.set_image(&gradient(40, 40));

    let raw = painter.render().raw.clone();
    let grid = painter.output().grid.unwrap();
    let line = format!("{}\x1b[0m\n", " ".repeat(grid.cols));
    assert_eq!(raw, line.repeat(grid.rows));
    assert!(painter.result_rgba().iter().all(|&b| b == 0));
}

#[test]
fn forbidding_the_winner_changes_the_choice() {
    let mut img = RgbaImage::new(2, 2);
    img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
    img.put_pixel(0, 1, Rgba([255, 0, 0, 255]));
    img.put_pixel(1, 0, Rgba([0, 0, 255, 255]));
    img.put_pixel(1, 1, Rgba([0, 0, 255, 255]));
    let image = DynamicImage::ImageRgba8(img);

    let catalog = GlyphCatalog::from_records(
        2,
        2,
        vec![
            GlyphRecord::new(' ', vec![0; 4], 1.0),
            GlyphRecord::new('▀', vec![255, 255, 0, 0], 1.0),
            GlyphRecord::new('▌', vec![255, 0, 255, 0], 1.0),
        ],
    );
    let glyph_text = |forbid: &[char]| {
        let config = RenderConfig::default()
            .with_width(1)
            .with_glyph_size(2, 2)
            .with_forbidden(forbid.iter().copied());
        let mut painter = Painter::new(config);
        painter.set_catalog(catalog.clone());
        painter.set_image(&image);
        let raw = painter.render().raw.clone();
        raw.chars().filter(|c| matches!(c, ' ' | '▀' | '▌')).collect::<String>()
    };

    assert_eq!(glyph_text(&[]), "▌");
    assert_eq!(glyph_text(&['▌']), " ");
}

#[test]
fn literal_variants_wrap_raw_text() {
    let mut painter = Painter::new(RenderConfig::default().with_width(4).with_glyph_size(4, 8));
    painter.set_catalog(blocks());
    painter.set_image(&gradient(16, 16));
    painter.render();

    let raw = painter.result_raw();
    let c = painter.result_c();
    let bash = painter.result_bash();
    assert!(!raw.is_empty());
    assert!(!c.contains('\x1b') && !c.contains('\n'));
    assert!(!bash.contains('\x1b') && !bash.contains('\n'));
    assert!(c.ends_with("\\033[0m\\n\""));
    assert!(bash.ends_with("\\e[0m\\n'"));
}

#[test]
fn background_pass_reports_progress() {
    let config = RenderConfig::default().with_width(30).with_glyph_size(4, 8).with_threads(2);
    let mut painter = Painter::new(config);
    painter.set_catalog(blocks());
    painter.set_image(&gradient(90, 60));

    let handle = painter.start_render().unwrap();
    let mut seen = vec![handle.progress()];
    while !handle.is_finished() {
        seen.push(handle.progress());
        std::thread::sleep(std::time::Duration::from_millis(1));
    }
    let out = painter.finish(handle).unwrap();
    assert!(!out.is_empty());

    seen.push(painter.progress());
    assert!(seen.windows(2).all(|w| w[0] <= w[1]), "{seen:?}");
    assert_eq!(seen.last(), Some(&1.0));
}

#[test]
fn font_catalog_renders() {
    let font = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/DejaVuSansMono.ttf");
    let mut painter = Painter::new(RenderConfig::default().with_width(12).with_threads(3));
    painter.load_font(font).unwrap();
    assert_eq!(painter.catalog().cell_size(), (7, 14));
    assert!(painter.catalog().get('#').is_some());
    painter.set_image(&gradient(84, 56));

    let out = painter.render().clone();
    let grid = out.grid.unwrap();
    assert_eq!(grid.cols, 12);
    assert_eq!(out.raw.lines().count(), grid.rows);
    assert_eq!((out.rgba_width, out.rgba_height), (12 * 7, grid.rows * 14));
}
