//! PSF console font decoding (PSF1 and PSF2).
//!
//! PSF1:
//! - 4 byte header: magic (0x36, 0x04), mode, charsize
//! - 256 or 512 glyphs, 8 pixels wide, one byte per row
//! - optional Unicode table of 16-bit little-endian values
//!
//! PSF2:
//! - 32 byte header: magic, version, header size, flags, glyph count,
//!   bytes per glyph, height, width (all little-endian u32)
//! - glyph rows padded to whole bytes
//! - optional Unicode table of UTF-8 sequences
//!
//! In both tables every glyph's entry ends with a separator; a start-sequence
//! marker introduces multi-codepoint sequences, which are skipped.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::{
    font::{Font, FontMeta, FormatHeader, SourceFormat},
    glyph::Bitmap,
    FontError, Result,
};

pub const PSF1_MAGIC: [u8; 2] = [0x36, 0x04];
pub const PSF2_MAGIC: u32 = 0x864A_B572;

const PSF1_HEADER_SIZE: usize = 4;
const PSF1_WIDTH: usize = 8;
const PSF1_MODE512: u8 = 0x01;
const PSF1_MODEHASTAB: u8 = 0x02;
const PSF1_MODESEQ: u8 = 0x04;
const PSF1_MODE_MASK: u8 = PSF1_MODE512 | PSF1_MODEHASTAB | PSF1_MODESEQ;
const PSF1_SEPARATOR: u16 = 0xFFFF;
const PSF1_STARTSEQ: u16 = 0xFFFE;

const PSF2_HEADER_SIZE: usize = 32;
const PSF2_HAS_UNICODE_TABLE: u32 = 0x01;
const PSF2_SEPARATOR: u8 = 0xFF;
const PSF2_STARTSEQ: u8 = 0xFE;

/// Glyphs without a table entry below this index map to the codepoint equal
/// to their index.
const IDENTITY_MAPPED: usize = 256;

/// Decode a PSF1 or PSF2 font, selected by its magic number.
pub fn decode(bytes: &[u8]) -> Result<Font> {
    if bytes.starts_with(&PSF1_MAGIC) {
        return decode_psf1(bytes);
    }
    if bytes.len() >= 4 && read_u32(bytes, 0) == PSF2_MAGIC {
        return decode_psf2(bytes);
    }
    Err(FontError::UnrecognizedMagic)
}

/// Read a font file from disk. Files ending in `.gz` are inflated first.
pub fn load_file(path: &Path) -> Result<Font> {
    let file = File::open(path)?;
    if is_gzip_path(path) {
        #[cfg(feature = "gzip")]
        {
            return Font::read(flate2::read::GzDecoder::new(file));
        }
        #[cfg(not(feature = "gzip"))]
        {
            return Err(FontError::Io(std::io::Error::new(
                std::io::ErrorKind::Unsupported,
                "gzip compressed fonts need the `gzip` feature",
            )));
        }
    }
    Font::read(BufReader::new(file))
}

fn is_gzip_path(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"))
}

fn decode_psf1(bytes: &[u8]) -> Result<Font> {
    require(bytes, PSF1_HEADER_SIZE)?;
    let mode = bytes[2];
    let char_size = bytes[3] as usize;
    if mode & !PSF1_MODE_MASK != 0 {
        return Err(FontError::UnknownMode(mode));
    }
    if char_size == 0 {
        return Err(FontError::InvalidDimensions {
            width: PSF1_WIDTH,
            height: 0,
        });
    }

    let glyph_count = if mode & PSF1_MODE512 != 0 { 512 } else { 256 };
    let table_start = PSF1_HEADER_SIZE + glyph_count * char_size;
    require(bytes, table_start)?;

    let glyphs = read_glyphs(
        &bytes[PSF1_HEADER_SIZE..table_start],
        glyph_count,
        PSF1_WIDTH,
        char_size,
        char_size,
    );
    let table = if mode & (PSF1_MODEHASTAB | PSF1_MODESEQ) != 0 {
        psf1_table(&bytes[table_start..], glyph_count)
    } else {
        Vec::new()
    };

    let font = assign_codepoints(
        FontMeta {
            width: PSF1_WIDTH,
            height: char_size,
            format: SourceFormat::Psf1,
            header: FormatHeader::Psf1 { mode },
            glyph_count,
            char_size,
            ..Default::default()
        },
        glyphs,
        &table,
    );
    Ok(font)
}

fn decode_psf2(bytes: &[u8]) -> Result<Font> {
    require(bytes, PSF2_HEADER_SIZE)?;
    let version = read_u32(bytes, 4);
    let header_size = read_u32(bytes, 8);
    let flags = read_u32(bytes, 12);
    let glyph_count = read_u32(bytes, 16);
    let char_size = read_u32(bytes, 20);
    let height = read_u32(bytes, 24);
    let width = read_u32(bytes, 28);

    if version != 0 {
        return Err(FontError::UnknownVersion(version));
    }
    if header_size as usize != PSF2_HEADER_SIZE {
        return Err(FontError::UnknownHeaderSize(header_size));
    }
    if width == 0 || height == 0 {
        return Err(FontError::InvalidDimensions {
            width: width as usize,
            height: height as usize,
        });
    }
    let expected = u64::from(height) * u64::from(width).div_ceil(8);
    if u64::from(char_size) != expected {
        return Err(FontError::SizeMismatch {
            char_size,
            expected,
        });
    }

    let glyph_block = u64::from(glyph_count) * u64::from(char_size);
    let table_start = usize::try_from(glyph_block + PSF2_HEADER_SIZE as u64).unwrap_or(usize::MAX);
    require(bytes, table_start)?;

    let (glyph_count, char_size) = (glyph_count as usize, char_size as usize);
    let (width, height) = (width as usize, height as usize);
    let glyphs = read_glyphs(
        &bytes[PSF2_HEADER_SIZE..table_start],
        glyph_count,
        width,
        height,
        char_size,
    );
    let table = if flags & PSF2_HAS_UNICODE_TABLE != 0 {
        psf2_table(&bytes[table_start..], glyph_count)
    } else {
        Vec::new()
    };

    let font = assign_codepoints(
        FontMeta {
            width,
            height,
            format: SourceFormat::Psf2,
            header: FormatHeader::Psf2 {
                version,
                header_size,
                flags,
            },
            glyph_count,
            char_size,
            ..Default::default()
        },
        glyphs,
        &table,
    );
    Ok(font)
}

fn require(bytes: &[u8], needed: usize) -> Result<()> {
    if bytes.len() < needed {
        return Err(FontError::Truncated {
            needed,
            actual: bytes.len(),
        });
    }
    Ok(())
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

fn read_glyphs(
    block: &[u8],
    glyph_count: usize,
    width: usize,
    height: usize,
    char_size: usize,
) -> Vec<Bitmap> {
    (0..glyph_count)
        .map(|i| {
            let start = i * char_size;
            Bitmap::from_packed(width, height, &block[start..start + char_size])
        })
        .collect()
}

/// PSF1 table: 16-bit little-endian codepoints. A trailing odd byte is ignored.
fn psf1_table(table: &[u8], glyph_count: usize) -> Vec<Vec<char>> {
    let mut entries = vec![Vec::new(); glyph_count];
    let mut glyph = 0;
    let mut in_sequence = false;
    for pair in table.chunks_exact(2) {
        if glyph >= glyph_count {
            break;
        }
        match u16::from_le_bytes([pair[0], pair[1]]) {
            PSF1_SEPARATOR => {
                glyph += 1;
                in_sequence = false;
            }
            PSF1_STARTSEQ => in_sequence = true,
            _ if in_sequence => {}
            value => match char::from_u32(u32::from(value)) {
                Some(ch) => entries[glyph].push(ch),
                None => log::trace!("psf1: glyph {glyph}: dropping non-scalar value {value:#06x}"),
            },
        }
    }
    entries
}

/// PSF2 table: UTF-8 codepoints. Undecodable sequences are dropped.
fn psf2_table(table: &[u8], glyph_count: usize) -> Vec<Vec<char>> {
    let mut entries = vec![Vec::new(); glyph_count];
    let mut glyph = 0;
    let mut in_sequence = false;
    let mut pos = 0;
    while pos < table.len() && glyph < glyph_count {
        match table[pos] {
            PSF2_SEPARATOR => {
                glyph += 1;
                in_sequence = false;
                pos += 1;
            }
            PSF2_STARTSEQ => {
                in_sequence = true;
                pos += 1;
            }
            lead => {
                let width = utf8_width(lead);
                let continuation = table[pos + 1..]
                    .iter()
                    .take(width.saturating_sub(1))
                    .take_while(|b| *b & 0xC0 == 0x80)
                    .count();
                let end = pos + 1 + continuation;
                if !in_sequence {
                    match std::str::from_utf8(&table[pos..end]) {
                        Ok(s) => entries[glyph].extend(s.chars()),
                        Err(err) => log::trace!("psf2: glyph {glyph}: dropping invalid utf-8 ({err})"),
                    }
                }
                pos = end;
            }
        }
    }
    entries
}

/// Encoded length announced by a UTF-8 lead byte; 0 for bytes that cannot
/// start a sequence.
fn utf8_width(lead: u8) -> usize {
    match lead {
        0x00..=0x7F => 1,
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => 0,
    }
}

fn assign_codepoints(meta: FontMeta, glyphs: Vec<Bitmap>, table: &[Vec<char>]) -> Font {
    let mut font = Font::new(meta);
    let mut dropped = 0;
    for (index, glyph) in glyphs.into_iter().enumerate() {
        match table.get(index).filter(|codepoints| !codepoints.is_empty()) {
            Some(codepoints) => {
                for ch in codepoints {
                    font.set_glyph(*ch, glyph.clone());
                }
            }
            None if index < IDENTITY_MAPPED => {
                if let Some(ch) = char::from_u32(index as u32) {
                    font.set_glyph(ch, glyph);
                }
            }
            None => dropped += 1,
        }
    }
    log::debug!(
        "decoded {} font {}x{}: {} glyphs, {} codepoints, {} unmapped",
        font.meta.format,
        font.width(),
        font.height(),
        font.meta.glyph_count,
        font.glyph_count(),
        dropped
    );
    font
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unknown_magic() {
        assert!(matches!(decode(b""), Err(FontError::UnrecognizedMagic)));
        assert!(matches!(decode(b"\x36"), Err(FontError::UnrecognizedMagic)));
        assert!(matches!(
            decode(b"flf2a$ 8 7 8 0 0"),
            Err(FontError::UnrecognizedMagic)
        ));
    }

    #[test]
    fn psf1_short_header_is_truncated() {
        assert!(matches!(
            decode(&[0x36, 0x04, 0x00]),
            Err(FontError::Truncated { needed: 4, actual: 3 })
        ));
    }

    #[test]
    fn psf1_unknown_mode() {
        assert!(matches!(
            decode(&[0x36, 0x04, 0x08, 0x08]),
            Err(FontError::UnknownMode(0x08))
        ));
    }

    #[test]
    fn psf1_table_skips_sequences() {
        let mut table = Vec::new();
        for value in [0x41u16, 0xFFFE, 0x42, 0x43, 0xFFFF, 0xD800, 0x44, 0xFFFF] {
            table.extend_from_slice(&value.to_le_bytes());
        }
        let entries = psf1_table(&table, 3);
        assert_eq!(entries, vec![vec!['A'], vec!['D'], vec![]]);
    }

    #[test]
    fn psf2_table_decodes_utf8() {
        let mut table = Vec::new();
        table.extend_from_slice("Aé".as_bytes());
        table.push(PSF2_STARTSEQ);
        table.extend_from_slice("e\u{301}".as_bytes());
        table.push(PSF2_SEPARATOR);
        // stray continuation byte and truncated sequence are dropped
        table.extend_from_slice(&[0x80, 0xE2, 0x82]);
        table.extend_from_slice("€".as_bytes());
        table.push(PSF2_SEPARATOR);
        let entries = psf2_table(&table, 2);
        assert_eq!(entries, vec![vec!['A', 'é'], vec!['€']]);
    }

    #[test]
    fn psf2_table_resyncs_after_stray_bytes() {
        let table = [b'A', 0x80, PSF2_SEPARATOR, 0xC3, 0xA9, 0xBF, b'B', PSF2_SEPARATOR];
        let entries = psf2_table(&table, 2);
        assert_eq!(entries, vec![vec!['A'], vec!['é', 'B']]);
    }

    #[test]
    fn utf8_widths() {
        assert_eq!(utf8_width(b'A'), 1);
        assert_eq!(utf8_width(0xC3), 2);
        assert_eq!(utf8_width(0xE2), 3);
        assert_eq!(utf8_width(0xF0), 4);
        assert_eq!(utf8_width(0x80), 0);
        assert_eq!(utf8_width(0xC0), 0);
    }

    #[test]
    fn table_longer_than_glyphs_is_ignored() {
        let table = [0x41, 0x00, 0xFF, 0xFF, 0x42, 0x00, 0xFF, 0xFF];
        assert_eq!(psf1_table(&table, 1), vec![vec!['A']]);
    }
}
