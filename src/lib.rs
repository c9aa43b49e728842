//! Image to colored ANSI glyph art.
//!
//! Each output cell is matched against every glyph in a catalog, choosing the
//! glyph and the foreground/background pair that best reproduce the cell's
//! pixels.

pub mod assemble;
pub mod color;
pub mod config;
pub mod font;
pub mod layout;
pub mod progress;
pub mod sampler;
pub mod scheduler;
pub mod solver;
pub mod weights;

pub use config::RenderConfig;
pub use font::{CatalogBuilder, GlyphCatalog, GlyphRecord};
pub use layout::GridSize;
pub use progress::{Progress, ProgressSink};
pub use sampler::{ImageSampler, Sampler};
pub use weights::WeightTable;

use solver::{Canvas, Solver};
use std::path::Path;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Instant;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PaintError {
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Font error: {0}")]
    Font(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("Render thread panicked")]
    RenderPanicked,
}

pub type Result<T> = std::result::Result<T, PaintError>;

/// Everything one render pass produces.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderOutput {
    pub grid: Option<GridSize>,
    /// ANSI text, one line per row.
    pub raw: String,
    /// `raw` as a C string declaration.
    pub c: String,
    /// `raw` as an `echo -ne` command.
    pub bash: String,
    pub rgba: Vec<u8>,
    pub rgba_width: usize,
    pub rgba_height: usize,
}

impl RenderOutput {
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

/// Render state: configuration, inputs and the latest outputs.
pub struct Painter {
    config: RenderConfig,
    catalog: Arc<GlyphCatalog>,
    sampler: Option<Arc<dyn Sampler>>,
    progress: Arc<Progress>,
    output: RenderOutput,
}

impl Painter {
    pub fn new(config: RenderConfig) -> Self {
        Self {
            config,
            catalog: Arc::new(GlyphCatalog::default()),
            sampler: None,
            progress: Arc::new(Progress::new()),
            output: RenderOutput::default(),
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Takes effect on the next pass. Glyph size, codepoint range and weights
    /// only apply to fonts loaded afterwards.
    pub fn config_mut(&mut self) -> &mut RenderConfig {
        &mut self.config
    }

    pub fn load_font(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let data = std::fs::read(path)?;
        self.set_font(&data)
    }

    /// Rasterize `data` into a catalog using the current glyph settings.
    pub fn set_font(&mut self, data: &[u8]) -> Result<()> {
        self.config.validate()?;
        let catalog = CatalogBuilder::new(self.config.glyph_width, self.config.glyph_height)
            .with_range(self.config.rune_range())
            .with_weights(self.config.weights.clone())
            .build(data)?;
        self.catalog = Arc::new(catalog);
        Ok(())
    }

    pub fn set_catalog(&mut self, catalog: GlyphCatalog) {
        self.catalog = Arc::new(catalog);
    }

    pub fn catalog(&self) -> &GlyphCatalog {
        &self.catalog
    }

    pub fn load_image(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let image = image::open(path)?;
        self.set_image(&image);
        Ok(())
    }

    pub fn set_image(&mut self, image: &image::DynamicImage) {
        self.sampler = Some(Arc::new(ImageSampler::new(image)));
    }

    pub fn set_sampler(&mut self, sampler: Arc<dyn Sampler>) {
        self.sampler = Some(sampler);
    }

    /// Run a full pass on the calling thread.
    pub fn render(&mut self) -> &RenderOutput {
        let progress = self.next_pass();
        self.output = render_pass(&self.config, &self.catalog, self.sampler.as_deref(), &progress);
        &self.output
    }

    /// Run a pass on a background thread; poll the handle for progress.
    ///
    /// This painter's own outputs are untouched until [`Painter::finish`].
    /// Every pass gets its own progress counter, so starting another pass
    /// never rewinds the progress of a handle already running.
    pub fn start_render(&mut self) -> Result<RenderHandle> {
        let config = self.config.clone();
        let catalog = Arc::clone(&self.catalog);
        let sampler = self.sampler.clone();
        let progress = self.next_pass();

        let spawned = std::thread::Builder::new().name("ansipaint-render".into()).spawn({
            let progress = Arc::clone(&progress);
            move || render_pass(&config, &catalog, sampler.as_deref(), &progress)
        });
        match spawned {
            Ok(thread) => Ok(RenderHandle { progress, thread }),
            Err(e) => {
                progress.finish();
                Err(e.into())
            }
        }
    }

    /// Wait for a background pass and adopt its outputs.
    pub fn finish(&mut self, handle: RenderHandle) -> Result<&RenderOutput> {
        self.output = handle.wait()?;
        Ok(&self.output)
    }

    /// Fresh progress counter for a new pass; [`Painter::progress`] follows it.
    fn next_pass(&mut self) -> Arc<Progress> {
        self.progress = Arc::new(Progress::new());
        Arc::clone(&self.progress)
    }

    /// Fraction of the latest pass done; safe to call while a pass runs.
    pub fn progress(&self) -> f32 {
        self.progress.get()
    }

    pub fn output(&self) -> &RenderOutput {
        &self.output
    }

    pub fn result_raw(&self) -> &str {
        &self.output.raw
    }

    pub fn result_c(&self) -> &str {
        &self.output.c
    }

    pub fn result_bash(&self) -> &str {
        &self.output.bash
    }

    pub fn result_rgba(&self) -> &[u8] {
        &self.output.rgba
    }

    pub fn result_rgba_dimensions(&self) -> (usize, usize) {
        (self.output.rgba_width, self.output.rgba_height)
    }
}

/// A render pass running on its own thread.
pub struct RenderHandle {
    progress: Arc<Progress>,
    thread: JoinHandle<RenderOutput>,
}

impl RenderHandle {
    pub fn progress(&self) -> f32 {
        self.progress.get()
    }

    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    pub fn wait(self) -> Result<RenderOutput> {
        self.thread.join().map_err(|_| PaintError::RenderPanicked)
    }
}

fn render_pass(
    config: &RenderConfig,
    catalog: &GlyphCatalog,
    sampler: Option<&dyn Sampler>,
    progress: &Progress,
) -> RenderOutput {
    let _pass = progress.begin_pass();

    if let Err(e) = config.validate() {
        log::warn!("{e}, nothing to render");
        return RenderOutput::default();
    }

    let Some(sampler) = sampler else {
        log::warn!("no image loaded, nothing to render");
        return RenderOutput::default();
    };

    let fallback;
    let catalog = if catalog.is_empty() {
        log::warn!("glyph catalog is empty, falling back to built-in block elements");
        match GlyphCatalog::builtin(config.glyph_width, config.glyph_height, &config.weights) {
            Ok(c) => {
                fallback = c;
                &fallback
            }
            Err(e) => {
                log::warn!("fallback catalog unavailable: {e}");
                return RenderOutput::default();
            }
        }
    } else {
        catalog
    };

    let (img_w, img_h) = sampler.dimensions();
    if img_w == 0 || img_h == 0 {
        log::warn!("image has no pixels, nothing to render");
        return RenderOutput::default();
    }

    let cell = catalog.cell_size();
    if cell.0 == 0 || cell.1 == 0 {
        log::warn!("glyph catalog has empty cells, nothing to render");
        return RenderOutput::default();
    }
    let aspect = config.cell_aspect(cell);
    let grid = GridSize::resolve(img_w, img_h, config.width, config.height, aspect);
    let strides = layout::strides(img_w, img_h, grid, cell.0);

    log::debug!(
        "rendering {img_w}x{img_h} image as {}x{} cells with {} glyphs on {} threads",
        grid.cols,
        grid.rows,
        catalog.len(),
        config.threads
    );
    let started = Instant::now();

    let solver = Solver::new(catalog, sampler, &config.forbidden, strides);
    let mut canvas = Canvas::new(grid, cell);
    let cells = match scheduler::run(&solver, grid, aspect, config.threads, &mut canvas, cell, progress) {
        Ok(cells) => cells,
        Err(e) => {
            log::warn!("render pass aborted: {e}");
            return RenderOutput::default();
        }
    };

    let raw = assemble::ansi_text(&cells, grid);
    let (rgba_width, rgba_height) = canvas.dimensions();
    log::info!("rendered {}x{} cells in {:.2?}", grid.cols, grid.rows, started.elapsed());

    RenderOutput {
        grid: Some(grid),
        c: assemble::c_literal(&raw),
        bash: assemble::shell_literal(&raw),
        raw,
        rgba: canvas.into_bytes(),
        rgba_width,
        rgba_height,
    }
}
