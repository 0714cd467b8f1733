//! FIGlet (.flf) font encoding.
//!
//! Every printable ASCII glyph is written as `height` lines of block
//! characters. Blank pixels and padding use the hardblank `$`; lines end in
//! `@`, the last line of a glyph in `@@`.
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use crate::{
    font::{Font, PRINTABLE_ASCII},
    glyph::{Bitmap, RenderMode},
    FontError, Result,
};

pub const SIGNATURE: &str = "flf2a";
pub const HARDBLANK: char = '$';
pub const END_MARK: char = '@';
/// Stands in for glyphs the font does not define.
pub const FALLBACK_CHAR: char = '?';

/// The first line of a FIGlet font.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlfHeader {
    pub hard_blank: char,
    pub height: usize,
    pub baseline: usize,
    pub max_length: usize,
    pub old_layout: i32,
    pub comment_lines: usize,
    pub print_direction: Option<u8>,
    pub full_layout: Option<u32>,
    pub codetag_count: Option<usize>,
}

impl FlfHeader {
    /// Header for `font` rendered in `mode`, declaring the 95 required glyphs.
    pub fn for_font(font: &Font, mode: RenderMode) -> Self {
        let height = mode.line_count(font.height());
        Self {
            hard_blank: HARDBLANK,
            height,
            baseline: height.saturating_sub(1),
            max_length: font.width(),
            old_layout: 0,
            comment_lines: 0,
            print_direction: Some(0),
            full_layout: Some(0),
            codetag_count: Some(PRINTABLE_ASCII.count()),
        }
    }
}

impl fmt::Display for FlfHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{SIGNATURE}{} {} {} {} {} {}",
            self.hard_blank,
            self.height,
            self.baseline,
            self.max_length,
            self.old_layout,
            self.comment_lines
        )?;
        let optional = [
            self.print_direction.map(u32::from),
            self.full_layout,
            self.codetag_count.map(|n| n as u32),
        ];
        for value in optional.iter().map_while(|v| *v) {
            write!(f, " {value}")?;
        }
        Ok(())
    }
}

impl FromStr for FlfHeader {
    type Err = FontError;

    fn from_str(line: &str) -> Result<Self> {
        let rest = line
            .strip_prefix(SIGNATURE)
            .ok_or_else(|| FontError::InvalidHeader("not a flf2a header".into()))?;
        let mut chars = rest.chars();
        let hard_blank = chars
            .next()
            .ok_or_else(|| FontError::InvalidHeader("missing hardblank".into()))?;
        let parts: Vec<&str> = chars.as_str().split_whitespace().collect();
        if parts.len() < 5 {
            return Err(FontError::InvalidHeader("incomplete header".into()));
        }
        fn field<T: FromStr>(parts: &[&str], idx: usize, name: &str) -> Result<Option<T>> {
            match parts.get(idx) {
                None => Ok(None),
                Some(s) => s
                    .parse()
                    .map(Some)
                    .map_err(|_| FontError::InvalidHeader(format!("bad {name} '{s}'"))),
            }
        }
        let required = |idx, name| {
            field::<usize>(&parts, idx, name)?
                .ok_or_else(|| FontError::InvalidHeader(format!("missing {name}")))
        };
        Ok(Self {
            hard_blank,
            height: required(0, "height")?,
            baseline: required(1, "baseline")?,
            max_length: required(2, "max length")?,
            old_layout: field(&parts, 3, "old layout")?.unwrap_or(0),
            comment_lines: required(4, "comment lines")?,
            print_direction: field(&parts, 5, "print direction")?,
            full_layout: field(&parts, 6, "full layout")?,
            codetag_count: field(&parts, 7, "codetag count")?,
        })
    }
}

/// Encodes the printable ASCII range of `font` as a FIGlet font.
///
/// Glyphs the font lacks are drawn with its `?` glyph. A font without `?`
/// or without pixel rows cannot be encoded.
pub fn encode(font: &Font, mode: RenderMode) -> Result<String> {
    if font.height() == 0 {
        return Err(FontError::InvalidDimensions {
            width: font.width(),
            height: 0,
        });
    }
    let fallback = font
        .glyph(FALLBACK_CHAR)
        .ok_or(FontError::MissingFallbackGlyph)?;
    let header = FlfHeader::for_font(font, mode);
    let mut out = header.to_string();
    out.push('\n');
    for ch in PRINTABLE_ASCII {
        let glyph = font.glyph(ch).unwrap_or(fallback);
        for line in glyph_lines(glyph, &header, mode) {
            out.push_str(&line);
            out.push('\n');
        }
    }
    Ok(out)
}

pub fn write<W: Write>(font: &Font, mode: RenderMode, mut out: W) -> Result<()> {
    let doc = encode(font, mode)?;
    out.write_all(doc.as_bytes())?;
    out.flush()?;
    Ok(())
}

pub fn write_file(font: &Font, mode: RenderMode, path: &Path) -> Result<()> {
    let doc = encode(font, mode)?;
    fs::write(path, doc)?;
    Ok(())
}

/// The `height` lines of one glyph, padded and terminated.
pub fn glyph_lines(glyph: &Bitmap, header: &FlfHeader, mode: RenderMode) -> Vec<String> {
    let mut rendered = glyph.render(mode);
    rendered.resize(header.height, String::new());
    let last = rendered.len().saturating_sub(1);
    rendered
        .into_iter()
        .enumerate()
        .map(|(i, line)| {
            let mut out: String = line
                .chars()
                .map(|c| if c == ' ' { header.hard_blank } else { c })
                .collect();
            let len = out.chars().count();
            out.extend(
                std::iter::repeat(header.hard_blank).take(header.max_length.saturating_sub(len)),
            );
            out.push(END_MARK);
            if i == last {
                out.push(END_MARK);
            }
            out
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::FontMeta;

    fn font(width: usize, height: usize, chars: &[char]) -> Font {
        let mut font = Font::new(FontMeta {
            width,
            height,
            ..Default::default()
        });
        for ch in chars {
            let mut rows = vec![vec![false; width]; height];
            rows[0][0] = true;
            font.set_glyph(*ch, Bitmap::from_rows(width, rows));
        }
        font
    }

    #[test]
    fn header_generation() {
        let header = FlfHeader::for_font(&font(8, 8, &[]), RenderMode::Short);
        assert_eq!(header.to_string(), "flf2a$ 4 3 8 0 0 0 0 95");
        let header = FlfHeader::for_font(&font(8, 15, &[]), RenderMode::Tall);
        assert_eq!(header.to_string(), "flf2a$ 15 14 8 0 0 0 0 95");
    }

    #[test]
    fn header_round_trip() {
        let input = "flf2a$ 6 5 20 15 0 0 143 229";
        let header: FlfHeader = input.parse().unwrap();
        assert_eq!(header.hard_blank, '$');
        assert_eq!(header.height, 6);
        assert_eq!(header.baseline, 5);
        assert_eq!(header.max_length, 20);
        assert_eq!(header.old_layout, 15);
        assert_eq!(header.full_layout, Some(143));
        assert_eq!(header.codetag_count, Some(229));
        assert_eq!(header.to_string(), input);
    }

    #[test]
    fn header_without_optional_fields() {
        let header: FlfHeader = "flf2a# 6 5 20 -1 2".parse().unwrap();
        assert_eq!(header.hard_blank, '#');
        assert_eq!(header.old_layout, -1);
        assert_eq!(header.comment_lines, 2);
        assert_eq!(header.print_direction, None);
        assert_eq!(header.to_string(), "flf2a# 6 5 20 -1 2");
    }

    #[test]
    fn header_rejects_garbage() {
        assert!(matches!(
            "tlf2a$ 1 1 1 0 0".parse::<FlfHeader>(),
            Err(FontError::InvalidHeader(_))
        ));
        assert!("flf2a$ 1 1".parse::<FlfHeader>().is_err());
        assert!("flf2a$ x 1 1 0 0".parse::<FlfHeader>().is_err());
    }

    #[test]
    fn glyph_lines_pad_and_terminate() {
        let f = font(3, 3, &['?']);
        let header = FlfHeader::for_font(&f, RenderMode::Short);
        let lines = glyph_lines(f.glyph('?').unwrap(), &header, RenderMode::Short);
        assert_eq!(lines, vec!["▀$$@", "$$$@@"]);
    }

    #[test]
    fn glyph_lines_fill_missing_rows() {
        let short = Bitmap::from_rows(2, vec![vec![true, true]]);
        let f = font(2, 3, &[]);
        let header = FlfHeader::for_font(&f, RenderMode::Tall);
        let lines = glyph_lines(&short, &header, RenderMode::Tall);
        assert_eq!(lines, vec!["██@", "$$@", "$$@@"]);
    }

    #[test]
    fn missing_glyphs_use_fallback() {
        let f = font(2, 2, &['?']);
        let doc = encode(&f, RenderMode::Tall).unwrap();
        let lines: Vec<&str> = doc.lines().collect();
        assert_eq!(lines.len(), 1 + 95 * 2);
        assert!(lines[1..].chunks(2).all(|g| g == ["█$@", "$$@@"]));
    }

    #[test]
    fn missing_fallback_is_fatal() {
        let f = font(2, 2, &['A']);
        assert!(matches!(
            encode(&f, RenderMode::Short),
            Err(FontError::MissingFallbackGlyph)
        ));
    }

    #[test]
    fn zero_height_is_rejected() {
        let mut f = font(8, 0, &[]);
        f.set_glyph('?', Bitmap::new(8, 0));
        assert!(matches!(
            encode(&f, RenderMode::Short),
            Err(FontError::InvalidDimensions { width: 8, height: 0 })
        ));
        assert!(write(&f, RenderMode::Tall, Vec::new()).is_err());
    }
}
