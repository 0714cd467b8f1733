//! Test support utilities for psf2flf.
//!
//! Builders for synthetic PSF1/PSF2 files, so tests and benchmarks do not
//! depend on console fonts installed on the machine.

use crate::{
    glyph::Bitmap,
    psf::{PSF1_MAGIC, PSF2_MAGIC},
};

/// Parses `#` as a set pixel, anything else as unset.
pub fn bitmap(rows: &[&str]) -> Bitmap {
    let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
    Bitmap::from_rows(
        width,
        rows.iter()
            .map(|r| r.chars().map(|c| c == '#').collect())
            .collect(),
    )
}

/// Builds PSF1 bytes. Glyphs start blank.
#[derive(Clone, Debug)]
pub struct Psf1Builder {
    mode: u8,
    char_size: u8,
    glyphs: Vec<u8>,
    table: Vec<u8>,
}

impl Psf1Builder {
    pub fn new(char_size: u8) -> Self {
        Self {
            mode: 0,
            char_size,
            glyphs: vec![0; 256 * char_size as usize],
            table: Vec::new(),
        }
    }

    pub fn glyph_count(&self) -> usize {
        if self.mode & 0x01 != 0 {
            512
        } else {
            256
        }
    }

    /// Raw mode byte, glyph storage follows the 512 flag.
    pub fn mode(mut self, mode: u8) -> Self {
        self.mode = mode;
        self.glyphs
            .resize(self.glyph_count() * self.char_size as usize, 0);
        self
    }

    /// Sets the rows of glyph `index`, one byte per row.
    pub fn glyph(mut self, index: usize, rows: &[u8]) -> Self {
        let size = self.char_size as usize;
        let start = index * size;
        let n = rows.len().min(size);
        self.glyphs[start..start + n].copy_from_slice(&rows[..n]);
        self
    }

    /// Unicode entries for the first glyphs; remaining glyphs get empty
    /// entries. Sets the table mode flag.
    pub fn unicode_entries(mut self, entries: &[&[u16]]) -> Self {
        self.mode |= 0x02;
        self.table.clear();
        for i in 0..self.glyph_count() {
            if let Some(entry) = entries.get(i) {
                for value in *entry {
                    self.table.extend_from_slice(&value.to_le_bytes());
                }
            }
            self.table.extend_from_slice(&0xFFFFu16.to_le_bytes());
        }
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(4 + self.glyphs.len() + self.table.len());
        bytes.extend_from_slice(&PSF1_MAGIC);
        bytes.push(self.mode);
        bytes.push(self.char_size);
        bytes.extend_from_slice(&self.glyphs);
        bytes.extend_from_slice(&self.table);
        bytes
    }
}

/// Builds PSF2 bytes. Header fields can be overridden to produce broken files.
#[derive(Clone, Debug)]
pub struct Psf2Builder {
    version: u32,
    header_size: u32,
    flags: u32,
    glyph_count: u32,
    char_size: u32,
    height: u32,
    width: u32,
    glyphs: Vec<u8>,
    table: Vec<u8>,
}

impl Psf2Builder {
    pub fn new(width: u32, height: u32, glyph_count: u32) -> Self {
        let char_size = height * width.div_ceil(8);
        Self {
            version: 0,
            header_size: 32,
            flags: 0,
            glyph_count,
            char_size,
            height,
            width,
            glyphs: vec![0; (glyph_count * char_size) as usize],
            table: Vec::new(),
        }
    }

    pub fn version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    pub fn header_size(mut self, header_size: u32) -> Self {
        self.header_size = header_size;
        self
    }

    /// Overrides the declared bytes per glyph without changing the data.
    pub fn char_size(mut self, char_size: u32) -> Self {
        self.char_size = char_size;
        self
    }

    /// Sets the packed rows of glyph `index` (`ceil(width / 8)` bytes per row).
    pub fn glyph(mut self, index: usize, data: &[u8]) -> Self {
        let size = (self.height * self.width.div_ceil(8)) as usize;
        let start = index * size;
        let n = data.len().min(size);
        self.glyphs[start..start + n].copy_from_slice(&data[..n]);
        self
    }

    /// One entry per leading glyph: every char of the string maps to that
    /// glyph. Remaining glyphs get empty entries.
    pub fn unicode_entries(mut self, entries: &[&str]) -> Self {
        self.flags |= 0x01;
        self.table.clear();
        for i in 0..self.glyph_count as usize {
            if let Some(entry) = entries.get(i) {
                self.table.extend_from_slice(entry.as_bytes());
            }
            self.table.push(0xFF);
        }
        self
    }

    /// Replaces the unicode table with raw bytes and sets the table flag.
    pub fn raw_table(mut self, table: &[u8]) -> Self {
        self.flags |= 0x01;
        self.table = table.to_vec();
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(32 + self.glyphs.len() + self.table.len());
        for field in [
            PSF2_MAGIC,
            self.version,
            self.header_size,
            self.flags,
            self.glyph_count,
            self.char_size,
            self.height,
            self.width,
        ] {
            bytes.extend_from_slice(&field.to_le_bytes());
        }
        bytes.extend_from_slice(&self.glyphs);
        bytes.extend_from_slice(&self.table);
        bytes
    }
}

/// An 8x8 PSF1 font whose glyph `i` has every row set to the byte `i`.
pub fn patterned_psf1() -> Vec<u8> {
    let mut builder = Psf1Builder::new(8);
    for i in 0..256 {
        builder = builder.glyph(i, &[i as u8; 8]);
    }
    builder.build()
}
