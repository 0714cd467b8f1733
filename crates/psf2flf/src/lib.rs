//! psf2flf: PSF console fonts to FIGlet fonts.
//!
//! Decode PSF1/PSF2 bytes with [`Font::load`], combine partial fonts of one
//! family with [`Font::merge`] or a [`FontDir`], and write FIGlet fonts with
//! [`flf::encode`].

pub mod collection;
mod error;
pub mod filename;
pub mod flf;
mod font;
mod glyph;
pub mod psf;
pub use collection::{FontDir, StyleSet, TypeFace};
pub use error::{FontError, Result};
pub use filename::FontFileName;
pub use font::{Font, FontMeta, FormatHeader, SourceFormat, PRINTABLE_ASCII};
pub use glyph::{Bitmap, RenderMode, FULL_BLOCK, LOWER_HALF_BLOCK, UPPER_HALF_BLOCK};

// Test utilities
pub mod test_support;
