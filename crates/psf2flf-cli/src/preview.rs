use psf2flf::{
    flf::{self, FlfHeader},
    Font, FontError, RenderMode, Result,
};

/// Lays out the FIGlet glyphs of `text` side by side, one block of lines
/// per input line. Hardblanks and end marks are stripped.
///
/// Unlike the `.flf` output this is not limited to ASCII: every codepoint the
/// font defines is drawn, everything else falls back to `?`.
pub fn render_text(font: &Font, text: &str, mode: RenderMode) -> Result<String> {
    let fallback = font
        .glyph(flf::FALLBACK_CHAR)
        .ok_or(FontError::MissingFallbackGlyph)?;
    let header = FlfHeader::for_font(font, mode);

    let mut out = Vec::new();
    for text_line in text.lines() {
        let mut rows = vec![String::new(); header.height];
        for ch in text_line.chars() {
            let glyph = font.glyph(ch).unwrap_or(fallback);
            for (row, line) in rows.iter_mut().zip(flf::glyph_lines(glyph, &header, mode)) {
                row.extend(
                    line.trim_end_matches(flf::END_MARK)
                        .chars()
                        .map(|c| if c == header.hard_blank { ' ' } else { c }),
                );
            }
        }
        out.extend(rows.into_iter().map(|row| row.trim_end().to_string()));
    }
    Ok(out.join("\n"))
}
