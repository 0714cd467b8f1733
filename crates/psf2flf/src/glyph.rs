//! Glyph bitmaps and their block-character rendering.

pub const FULL_BLOCK: char = '█';
pub const UPPER_HALF_BLOCK: char = '▀';
pub const LOWER_HALF_BLOCK: char = '▄';

/// Vertical resolution used when turning pixels into text.
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
pub enum RenderMode {
    /// Two pixel rows share one text line (half blocks).
    #[default]
    Short,
    /// Every pixel row becomes its own text line.
    Tall,
}

impl RenderMode {
    pub fn from_tall(tall: bool) -> Self {
        if tall {
            RenderMode::Tall
        } else {
            RenderMode::Short
        }
    }

    /// Number of text lines a glyph of `pixel_height` rows occupies.
    pub fn line_count(self, pixel_height: usize) -> usize {
        match self {
            RenderMode::Short => pixel_height.div_ceil(2),
            RenderMode::Tall => pixel_height,
        }
    }
}

/// A fixed-size grid of on/off pixels.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bitmap {
    width: usize,
    height: usize,
    rows: Vec<Vec<bool>>,
}

impl Bitmap {
    /// A blank bitmap.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            rows: vec![vec![false; width]; height],
        }
    }

    /// Builds a bitmap from explicit rows. Rows are padded with unset pixels
    /// or cut to `width`.
    pub fn from_rows(width: usize, rows: Vec<Vec<bool>>) -> Self {
        let height = rows.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, false);
                row
            })
            .collect();
        Self {
            width,
            height,
            rows,
        }
    }

    /// Unpacks PSF-style glyph data: `ceil(width / 8)` bytes per row, most
    /// significant bit first. Bytes missing from `data` read as zero.
    pub fn from_packed(width: usize, height: usize, data: &[u8]) -> Self {
        let row_bytes = width.div_ceil(8);
        let mut rows = Vec::with_capacity(height);
        for y in 0..height {
            let row = (0..width)
                .map(|x| {
                    let byte = data.get(y * row_bytes + x / 8).copied().unwrap_or(0);
                    byte & (0x80 >> (x % 8)) != 0
                })
                .collect();
            rows.push(row);
        }
        Self {
            width,
            height,
            rows,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn rows(&self) -> &[Vec<bool>] {
        &self.rows
    }

    /// Pixel at column `x`, row `y`. Anything outside the grid is unset.
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.rows
            .get(y)
            .and_then(|row| row.get(x))
            .copied()
            .unwrap_or(false)
    }

    /// Number of set pixels.
    pub fn ink(&self) -> usize {
        self.rows.iter().flatten().filter(|p| **p).count()
    }

    /// Renders the bitmap as lines of block characters, blank pixels as spaces.
    pub fn render(&self, mode: RenderMode) -> Vec<String> {
        match mode {
            RenderMode::Short => self.render_short(),
            RenderMode::Tall => self.render_tall(),
        }
    }

    fn render_short(&self) -> Vec<String> {
        (0..self.height)
            .step_by(2)
            .map(|y| {
                (0..self.width)
                    .map(|x| match (self.pixel(x, y), self.pixel(x, y + 1)) {
                        (true, true) => FULL_BLOCK,
                        (true, false) => UPPER_HALF_BLOCK,
                        (false, true) => LOWER_HALF_BLOCK,
                        (false, false) => ' ',
                    })
                    .collect()
            })
            .collect()
    }

    fn render_tall(&self) -> Vec<String> {
        (0..self.height)
            .map(|y| {
                (0..self.width)
                    .map(|x| if self.pixel(x, y) { FULL_BLOCK } else { ' ' })
                    .collect()
            })
            .collect()
    }
}
