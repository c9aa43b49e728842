//! ansipaint CLI - Render images as colored ANSI glyph art

use ansipaint::{PaintError, Painter, RenderConfig};
use clap::{Parser, ValueEnum};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    /// ANSI escape text
    Raw,
    /// C string literal
    C,
    /// `echo -ne` shell command
    Bash,
}

#[derive(Parser)]
#[command(name = "ansipaint", about = "Render images as colored ANSI glyph art")]
struct Args {
    /// Input image file
    input: PathBuf,
    /// TrueType/OpenType font to match glyphs from (built-in block elements if omitted)
    #[arg(short, long)]
    font: Option<PathBuf>,
    /// JSON render configuration; command-line options override it
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Output width in characters
    #[arg(short, long)]
    width: Option<usize>,
    /// Output height in characters
    #[arg(short = 'H', long)]
    height: Option<usize>,
    /// Extra vertical stretch of a character cell
    #[arg(long)]
    aspect: Option<f64>,
    /// Glyph cell width in pixels
    #[arg(long)]
    glyph_width: Option<usize>,
    /// Glyph cell height in pixels
    #[arg(long)]
    glyph_height: Option<usize>,
    /// Worker threads
    #[arg(short, long)]
    threads: Option<usize>,
    /// Characters never to use
    #[arg(long, default_value = "")]
    forbid: String,
    /// Output encoding
    #[arg(long, value_enum, default_value = "raw")]
    format: Format,
    /// Also write the rendered cells as a PNG
    #[arg(long)]
    png: Option<PathBuf>,
    /// Do not report progress on stderr
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<(), PaintError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => RenderConfig::from_json_file(path)?,
        None => RenderConfig::default(),
    };
    config.width = args.width.or(config.width);
    config.height = args.height.or(config.height);
    config.aspect_ratio = args.aspect.unwrap_or(config.aspect_ratio);
    config.glyph_width = args.glyph_width.unwrap_or(config.glyph_width);
    config.glyph_height = args.glyph_height.unwrap_or(config.glyph_height);
    config.threads = args.threads.unwrap_or(config.threads);
    config.forbidden.extend(args.forbid.chars());
    config.validate()?;

    let mut painter = Painter::new(config);
    if let Some(font) = &args.font {
        painter.load_font(font)?;
    }
    painter.load_image(&args.input)?;

    let handle = painter.start_render()?;
    while !handle.is_finished() {
        if !args.quiet {
            eprint!("\rRendering progress: {:.2}%", handle.progress() * 100.0);
        }
        std::thread::sleep(Duration::from_millis(100));
    }
    if !args.quiet {
        eprintln!("\rRendering progress: 100.00%");
    }
    let output = painter.finish(handle)?;

    let text = match args.format {
        Format::Raw => &output.raw,
        Format::C => &output.c,
        Format::Bash => &output.bash,
    };
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    if !matches!(args.format, Format::Raw) {
        writeln!(stdout)?;
    }

    if let Some(path) = &args.png {
        if output.rgba.is_empty() {
            log::warn!("nothing rendered, not writing {}", path.display());
            return Ok(());
        }
        image::save_buffer(
            path,
            &output.rgba,
            output.rgba_width as u32,
            output.rgba_height as u32,
            image::ColorType::Rgba8,
        )?;
    }
    Ok(())
}
