//! Grouping fonts by family, style and size.
//!
//! Console font packages ship one typeface split over several files, e.g.
//! `Uni1-Fixed15.psf.gz` and `Uni2-Fixed15.psf.gz`. Adding both to a
//! [`FontDir`] yields a single `Fixed` font covering both charsets.
use std::collections::{btree_map::Entry, BTreeMap, BTreeSet};

use crate::{font::Font, FontError, Result};

pub type StyleSet = BTreeSet<String>;

/// All style and size variants of one font family.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TypeFace {
    pub name: String,
    styles: BTreeMap<StyleSet, BTreeMap<usize, Font>>,
}

impl TypeFace {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            styles: BTreeMap::new(),
        }
    }

    pub fn from_font(font: Font) -> Self {
        let mut typeface = TypeFace::new(font.name());
        typeface.insert(font);
        typeface
    }

    /// Adds `font` at its style/height slot, gap-filling a font already
    /// stored there. The stored font keeps its glyphs.
    pub fn add(&mut self, font: Font) -> Result<()> {
        if font.name() != self.name {
            return Err(FontError::FamilyNameMismatch {
                expected: self.name.clone(),
                actual: font.name().to_string(),
            });
        }
        let slot = self
            .styles
            .entry(font.styles().clone())
            .or_default()
            .entry(font.height());
        match slot {
            Entry::Vacant(e) => {
                e.insert(font);
            }
            Entry::Occupied(mut e) => {
                let existing = e.get_mut();
                if existing.is_equivalent(&font) {
                    log::debug!(
                        "{} {}px: {:?} duplicates {:?}",
                        existing.meta.display_name(),
                        existing.height(),
                        font.meta.file_name,
                        existing.meta.file_name
                    );
                }
                existing.merge(&font)?;
            }
        }
        Ok(())
    }

    /// Adds every font of `other`. On error `self` is left unchanged.
    pub fn merge(&mut self, other: TypeFace) -> Result<()> {
        if other.name != self.name {
            return Err(FontError::FamilyNameMismatch {
                expected: self.name.clone(),
                actual: other.name,
            });
        }
        for font in other.fonts() {
            if let Some(existing) = self.get(font.styles(), font.height()) {
                existing.check_mergeable(font)?;
            }
        }
        for font in other.into_fonts() {
            self.add(font)?;
        }
        Ok(())
    }

    pub fn get(&self, styles: &StyleSet, height: usize) -> Option<&Font> {
        self.styles.get(styles).and_then(|sizes| sizes.get(&height))
    }

    pub fn styles(&self) -> impl Iterator<Item = &StyleSet> {
        self.styles.keys()
    }

    /// Heights available for `styles`, ascending.
    pub fn sizes(&self, styles: &StyleSet) -> impl Iterator<Item = usize> + '_ {
        self.styles
            .get(styles)
            .into_iter()
            .flat_map(|sizes| sizes.keys().copied())
    }

    pub fn fonts(&self) -> impl Iterator<Item = &Font> {
        self.styles.values().flat_map(|sizes| sizes.values())
    }

    pub fn into_fonts(self) -> impl Iterator<Item = Font> {
        self.styles.into_values().flat_map(|sizes| sizes.into_values())
    }

    pub fn len(&self) -> usize {
        self.styles.values().map(|sizes| sizes.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn insert(&mut self, font: Font) {
        self.styles
            .entry(font.styles().clone())
            .or_default()
            .insert(font.height(), font);
    }
}

/// Typefaces keyed by family name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FontDir {
    typefaces: BTreeMap<String, TypeFace>,
}

impl FontDir {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_font(&mut self, font: Font) -> Result<()> {
        match self.typefaces.entry(font.name().to_string()) {
            Entry::Vacant(e) => {
                e.insert(TypeFace::from_font(font));
                Ok(())
            }
            Entry::Occupied(mut e) => e.get_mut().add(font),
        }
    }

    pub fn add_typeface(&mut self, typeface: TypeFace) -> Result<()> {
        match self.typefaces.entry(typeface.name.clone()) {
            Entry::Vacant(e) => {
                e.insert(typeface);
                Ok(())
            }
            Entry::Occupied(mut e) => e.get_mut().merge(typeface),
        }
    }

    pub fn typeface(&self, name: &str) -> Option<&TypeFace> {
        self.typefaces.get(name)
    }

    pub fn typefaces(&self) -> impl Iterator<Item = &TypeFace> {
        self.typefaces.values()
    }

    pub fn fonts(&self) -> impl Iterator<Item = &Font> {
        self.typefaces.values().flat_map(TypeFace::fonts)
    }

    pub fn into_fonts(self) -> impl Iterator<Item = Font> {
        self.typefaces.into_values().flat_map(TypeFace::into_fonts)
    }

    /// Number of families.
    pub fn len(&self) -> usize {
        self.typefaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.typefaces.is_empty()
    }
}
