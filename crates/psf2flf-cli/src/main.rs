use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use psf2flf::{Font, FormatHeader, RenderMode};

use crate::convert::BatchOptions;
use crate::preview::render_text;
mod convert;
mod preview;

#[derive(Parser)]
#[command(
    name = "psf2flf",
    version,
    about = "Convert PSF console fonts to FIGlet fonts"
)]
struct Cli {
    /// PSF font (.psf or .psf.gz), or a directory of fonts with --all
    source: PathBuf,
    /// Output .flf file or directory
    #[arg(required_unless_present = "inspect")]
    dest: Option<PathBuf>,
    /// Convert every font directly inside SOURCE
    #[arg(long)]
    all: bool,
    /// One text line per pixel row instead of half blocks
    #[arg(long)]
    tall: bool,
    /// With --all: write every file on its own instead of merging charsets
    #[arg(long)]
    no_merge: bool,
    /// Print font metadata instead of converting
    #[arg(long)]
    inspect: bool,
    /// Print TEXT rendered with the converted font
    #[arg(long, value_name = "TEXT")]
    preview: Option<String>,
    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);
    let mode = RenderMode::from_tall(cli.tall);

    let fonts = match (cli.inspect, cli.all) {
        (true, false) => vec![convert::load_font(&cli.source)?],
        (true, true) => convert::load_dir(&cli.source, !cli.no_merge)?
            .fonts
            .into_iter()
            .map(|(font, _)| font)
            .collect(),
        (false, all) => {
            let Some(dest) = cli.dest.as_deref() else {
                bail!("missing output path");
            };
            if all {
                let options = BatchOptions {
                    mode,
                    merge: !cli.no_merge,
                };
                convert::convert_dir(&cli.source, dest, &options)?
            } else {
                vec![convert::convert_file(&cli.source, dest, mode)?]
            }
        }
    };

    if cli.inspect {
        for (idx, font) in fonts.iter().enumerate() {
            if idx > 0 {
                println!();
            }
            print_info(font);
        }
    }
    if let Some(text) = &cli.preview {
        for font in &fonts {
            if fonts.len() > 1 {
                println!("{}:", font.meta.flf_file_name());
            }
            println!("{}", render_text(font, text, mode)?);
        }
    }
    Ok(())
}

/// Initialize logging based on verbosity flag.
fn init_logger(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
}

fn print_info(font: &Font) {
    let meta = &font.meta;
    println!("Font: {}", meta.display_name());
    if let Some(file_name) = &meta.file_name {
        println!("  File: {file_name}");
    }
    if !meta.styles.is_empty() {
        let styles: Vec<&str> = meta.styles.iter().map(String::as_str).collect();
        println!("  Styles: {}", styles.join(", "));
    }
    println!("  Size: {}x{}", meta.width, meta.height);
    match meta.header {
        FormatHeader::Psf1 { mode } => println!("  Format: {} (mode {mode:#04x})", meta.format),
        FormatHeader::Psf2 {
            version,
            header_size,
            flags,
        } => println!(
            "  Format: {} (version {version}, header size {header_size}, flags {flags:#x})",
            meta.format
        ),
    }
    if let Some(charset) = &meta.charset {
        println!("  Charset: {charset}");
    }
    println!("  Bytes per glyph: {}", meta.char_size);
    println!("  Glyphs: {}", meta.glyph_count);
    println!("  Defined characters: {}", font.glyph_count());
}
