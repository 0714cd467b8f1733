use thiserror::Error;

#[derive(Debug, Error)]
pub enum FontError {
    #[error("unrecognized magic: not a PSF1 or PSF2 font")]
    UnrecognizedMagic,
    #[error("psf1: unknown mode 0x{0:02x}")]
    UnknownMode(u8),
    #[error("psf2: unknown version {0}")]
    UnknownVersion(u32),
    #[error("psf2: unknown header size {0}")]
    UnknownHeaderSize(u32),
    #[error("psf2: char size {char_size} does not match height * row bytes ({expected})")]
    SizeMismatch { char_size: u32, expected: u64 },
    #[error("invalid glyph size {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    #[error("truncated input: need {needed} bytes, got {actual}")]
    Truncated { needed: usize, actual: usize },
    #[error("cannot merge incompatible fonts: {0}")]
    IncompatibleFonts(String),
    #[error("family name mismatch: expected '{expected}', got '{actual}'")]
    FamilyNameMismatch { expected: String, actual: String },
    #[error("invalid flf header: {0}")]
    InvalidHeader(String),
    #[error("font has no '?' glyph to stand in for missing characters")]
    MissingFallbackGlyph,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FontError>;
