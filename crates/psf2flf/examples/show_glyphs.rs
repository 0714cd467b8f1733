//! Prints the FIGlet lines of some characters of a PSF font.
//!
//! cargo run -p psf2flf --example show_glyphs -- /usr/share/consolefonts/Uni2-Fixed16.psf.gz Hi

use std::path::PathBuf;

use psf2flf::{
    flf::{self, FlfHeader},
    Font, RenderMode,
};

fn main() -> psf2flf::Result<()> {
    let mut args = std::env::args().skip(1);
    let Some(path) = args.next().map(PathBuf::from) else {
        eprintln!("usage: show_glyphs FONT [TEXT]");
        return Ok(());
    };
    let text = args.next().unwrap_or_else(|| "A".to_string());

    let font = Font::load_file(&path)?;
    println!(
        "{}: {}x{}, {} glyphs",
        path.display(),
        font.width(),
        font.height(),
        font.glyph_count()
    );
    for mode in [RenderMode::Short, RenderMode::Tall] {
        let header = FlfHeader::for_font(&font, mode);
        println!("\n{mode:?}: {header}");
        for ch in text.chars() {
            match font.glyph(ch) {
                Some(glyph) => {
                    for line in flf::glyph_lines(glyph, &header, mode) {
                        println!("{line}");
                    }
                }
                None => println!("{ch:?} is not in the font"),
            }
        }
    }
    Ok(())
}
