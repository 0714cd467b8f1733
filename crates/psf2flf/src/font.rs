use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::io::Read;
use std::path::Path;

use crate::{glyph::Bitmap, psf, FontError, Result};

/// Codepoints FIGlet requires in every font: printable ASCII.
pub const PRINTABLE_ASCII: std::ops::RangeInclusive<char> = ' '..='~';

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SourceFormat {
    #[default]
    Psf1,
    Psf2,
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceFormat::Psf1 => write!(f, "psf1"),
            SourceFormat::Psf2 => write!(f, "psf2"),
        }
    }
}

/// Header fields that only exist in one of the PSF variants.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FormatHeader {
    Psf1 { mode: u8 },
    Psf2 { version: u32, header_size: u32, flags: u32 },
}

impl Default for FormatHeader {
    fn default() -> Self {
        FormatHeader::Psf1 { mode: 0 }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FontMeta {
    /// Family name, empty when unknown.
    pub name: String,
    pub styles: BTreeSet<String>,
    pub width: usize,
    pub height: usize,
    pub format: SourceFormat,
    /// Unicode coverage tag such as `Uni1`.
    pub charset: Option<String>,
    pub header: FormatHeader,
    /// Glyph count declared by the source file.
    pub glyph_count: usize,
    /// Bytes per glyph declared by the source file.
    pub char_size: usize,
    pub file_name: Option<String>,
}

impl FontMeta {
    fn identity(&self) -> (&str, &BTreeSet<String>, usize, usize) {
        (&self.name, &self.styles, self.width, self.height)
    }

    /// `<name><Styles>`, falling back to `font` for unnamed fonts.
    pub fn display_name(&self) -> String {
        let mut out = if self.name.is_empty() {
            "font".to_string()
        } else {
            self.name.clone()
        };
        for style in &self.styles {
            out.push_str(style);
        }
        out
    }

    /// `<name><Styles>-<width>x<height>.flf`
    pub fn flf_file_name(&self) -> String {
        format!("{}-{}x{}.flf", self.display_name(), self.width, self.height)
    }
}

/// A bitmap font: metadata plus glyphs keyed by Unicode scalar value.
///
/// `==` compares everything. Use [`Font::is_equivalent`] to detect the same
/// typeface decoded from files with different Unicode coverage.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Font {
    pub meta: FontMeta,
    glyphs: BTreeMap<char, Bitmap>,
}

impl Font {
    pub fn new(meta: FontMeta) -> Self {
        Self {
            meta,
            glyphs: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.meta.name
    }

    pub fn styles(&self) -> &BTreeSet<String> {
        &self.meta.styles
    }

    pub fn width(&self) -> usize {
        self.meta.width
    }

    pub fn height(&self) -> usize {
        self.meta.height
    }

    pub fn charset(&self) -> Option<&str> {
        self.meta.charset.as_deref()
    }

    pub fn glyph(&self, ch: char) -> Option<&Bitmap> {
        self.glyphs.get(&ch)
    }

    pub fn has_char(&self, ch: char) -> bool {
        self.glyphs.contains_key(&ch)
    }

    /// Number of codepoints with a glyph.
    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    pub fn glyphs(&self) -> impl Iterator<Item = (char, &Bitmap)> {
        self.glyphs.iter().map(|(ch, b)| (*ch, b))
    }

    /// Inserts or replaces the glyph for `ch`.
    pub fn set_glyph(&mut self, ch: char, glyph: Bitmap) {
        self.glyphs.insert(ch, glyph);
    }

    /// Same family, styles and pixel size.
    pub fn is_mergeable_with(&self, other: &Font) -> bool {
        self.meta.identity() == other.meta.identity()
    }

    /// `Ok` when [`Font::merge`] with `other` would succeed.
    pub fn check_mergeable(&self, other: &Font) -> Result<()> {
        if self.is_mergeable_with(other) {
            return Ok(());
        }
        Err(FontError::IncompatibleFonts(format!(
            "{} {}x{} and {} {}x{}",
            self.meta.display_name(),
            self.width(),
            self.height(),
            other.meta.display_name(),
            other.width(),
            other.height()
        )))
    }

    /// True when both fonts have the same identity and every printable ASCII
    /// glyph they both define is pixel-identical. Glyphs outside that
    /// intersection are ignored.
    pub fn is_equivalent(&self, other: &Font) -> bool {
        if !self.is_mergeable_with(other) {
            return false;
        }
        for ch in PRINTABLE_ASCII {
            if let (Some(a), Some(b)) = (self.glyph(ch), other.glyph(ch)) {
                if a != b {
                    return false;
                }
            }
        }
        true
    }

    /// Fills codepoints missing from `self` with glyphs from `other`.
    ///
    /// Glyphs already present in `self` are never touched. Fails without
    /// modifying either font when the two do not share family, styles and size.
    pub fn merge(&mut self, other: &Font) -> Result<()> {
        self.check_mergeable(other)?;
        for (ch, glyph) in &other.glyphs {
            self.glyphs.entry(*ch).or_insert_with(|| glyph.clone());
        }
        self.meta.charset = match (self.meta.charset.take(), &other.meta.charset) {
            (Some(left), Some(right)) => Some(format!("{left}+{right}")),
            (left, right) => left.or_else(|| right.clone()),
        };
        self.meta.glyph_count = self.glyphs.len();
        Ok(())
    }

    /// Decode a PSF1 or PSF2 font from raw bytes.
    pub fn load(bytes: &[u8]) -> Result<Font> {
        psf::decode(bytes)
    }

    pub fn read<R: Read>(reader: R) -> Result<Font> {
        let mut buf = Vec::new();
        let mut reader = reader;
        reader.read_to_end(&mut buf)?;
        Self::load(&buf)
    }

    /// Read a font file, inflating it first when the name ends in `.gz`.
    pub fn load_file(path: &Path) -> Result<Font> {
        let mut font = psf::load_file(path)?;
        font.meta.file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());
        Ok(font)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(name: &str) -> FontMeta {
        FontMeta {
            name: name.into(),
            styles: BTreeSet::from(["Bold".to_string()]),
            width: 2,
            height: 2,
            ..Default::default()
        }
    }

    fn glyph(bits: [bool; 4]) -> Bitmap {
        Bitmap::from_rows(2, vec![vec![bits[0], bits[1]], vec![bits[2], bits[3]]])
    }

    fn font(name: &str, charset: Option<&str>, glyphs: &[(char, [bool; 4])]) -> Font {
        let mut font = Font::new(FontMeta {
            charset: charset.map(str::to_string),
            ..meta(name)
        });
        for (ch, bits) in glyphs {
            font.set_glyph(*ch, glyph(*bits));
        }
        font
    }

    const A: [bool; 4] = [true, false, false, true];
    const B: [bool; 4] = [false, true, true, false];

    #[test]
    fn equivalence_is_reflexive_and_symmetric() {
        let a = font("Test", None, &[('A', A), ('é', B)]);
        let b = font("Test", Some("Uni2"), &[('A', A), ('é', A), ('B', B)]);
        assert!(a.is_equivalent(&a));
        assert!(a.is_equivalent(&b));
        assert!(b.is_equivalent(&a));
        assert_ne!(a, b);
    }

    #[test]
    fn equivalence_detects_ascii_differences() {
        let a = font("Test", None, &[('A', A)]);
        let b = font("Test", None, &[('A', B)]);
        assert!(!a.is_equivalent(&b));
    }

    #[test]
    fn equivalence_requires_identity() {
        let a = font("Test", None, &[('A', A)]);
        let b = font("Other", None, &[('A', A)]);
        assert!(!a.is_equivalent(&b));
    }

    #[test]
    fn merge_gap_fills_and_joins_charsets() {
        let mut left = font("Test", Some("Uni1"), &[('A', A)]);
        let right = font("Test", Some("Uni2"), &[('A', B), ('B', B)]);
        left.merge(&right).unwrap();
        assert_eq!(left.glyph_count(), 2);
        assert_eq!(left.glyph('A'), Some(&glyph(A)));
        assert_eq!(left.glyph('B'), Some(&glyph(B)));
        assert_eq!(left.charset(), Some("Uni1+Uni2"));
        assert_eq!(left.meta.glyph_count, 2);
    }

    #[test]
    fn merge_keeps_single_charset() {
        let mut left = font("Test", None, &[('A', A)]);
        left.merge(&font("Test", Some("Uni2"), &[])).unwrap();
        assert_eq!(left.charset(), Some("Uni2"));

        let mut left = font("Test", Some("Uni1"), &[('A', A)]);
        left.merge(&font("Test", None, &[])).unwrap();
        assert_eq!(left.charset(), Some("Uni1"));
    }

    #[test]
    fn failed_merge_changes_nothing() {
        let mut left = font("Test", Some("Uni1"), &[('A', A)]);
        let mut right = font("Test", Some("Uni2"), &[('B', B)]);
        right.meta.height = 4;
        let (left_before, right_before) = (left.clone(), right.clone());
        assert!(matches!(
            left.merge(&right),
            Err(FontError::IncompatibleFonts(_))
        ));
        assert_eq!(left, left_before);
        assert_eq!(right, right_before);
    }

    #[test]
    fn display_name_appends_styles() {
        assert_eq!(meta("Terminus").display_name(), "TerminusBold");
        assert_eq!(FontMeta::default().display_name(), "font");
        assert_eq!(meta("Terminus").flf_file_name(), "TerminusBold-2x2.flf");
    }
}
