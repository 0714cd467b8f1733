//! Font metadata encoded in console font file names.
//!
//! Console font packages name their files
//! `<charset>-<Family><Styles><Size>.psf[.gz]`, e.g.
//! `CyrAsia-TerminusBold14.psf.gz` or `Arabic-VGA28x16.psf.gz`.
use std::collections::BTreeSet;

use crate::font::Font;

/// Segments recognised as style tags after the family name.
const STYLE_TAGS: &[&str] = &["Bold", "Italic", "Oblique", "Light", "Medium", "Thin", "Classic"];

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FontFileName {
    pub name: String,
    pub styles: BTreeSet<String>,
    /// Nominal size; the height for `<height>x<width>` names.
    pub size: Option<usize>,
    pub charset: Option<String>,
}

impl FontFileName {
    pub fn parse(file_name: &str) -> Self {
        let without_gz = strip_suffix_ignore_case(file_name, ".gz").unwrap_or(file_name);
        let Some(stem) = strip_suffix_ignore_case(without_gz, ".psf") else {
            return Self::plain(file_name.split('.').next().unwrap_or(file_name));
        };

        let (charset, rest) = match stem.split_once('-') {
            Some((charset, rest)) if !charset.is_empty() => (Some(charset), rest),
            _ => (None, stem),
        };
        let (body, size) = split_size(rest);
        let body = body.trim_end_matches('-');
        if body.is_empty() {
            return Self::plain(stem);
        }

        let mut segments = camel_segments(body).into_iter();
        let mut name = segments.next().unwrap_or_default().to_string();
        let mut styles = BTreeSet::new();
        for segment in segments {
            if styles.is_empty() && !STYLE_TAGS.contains(&segment) {
                name.push_str(segment);
            } else {
                styles.insert(segment.to_string());
            }
        }

        Self {
            name,
            styles,
            size,
            charset: charset.map(str::to_string),
        }
    }

    fn plain(stem: &str) -> Self {
        Self {
            name: stem.to_string(),
            ..Default::default()
        }
    }

    /// Attaches family name, styles and charset to a decoded font.
    pub fn apply(&self, font: &mut Font) {
        font.meta.name = self.name.clone();
        font.meta.styles = self.styles.clone();
        font.meta.charset = self.charset.clone();
    }
}

fn strip_suffix_ignore_case<'a>(s: &'a str, suffix: &str) -> Option<&'a str> {
    let split = s.len().checked_sub(suffix.len())?;
    if s.is_char_boundary(split) && s[split..].eq_ignore_ascii_case(suffix) {
        Some(&s[..split])
    } else {
        None
    }
}

fn digits_start(s: &str) -> usize {
    s.len() - s.bytes().rev().take_while(u8::is_ascii_digit).count()
}

/// Splits a trailing `<n>` or `<n>x<m>` size off `s`.
fn split_size(s: &str) -> (&str, Option<usize>) {
    let end = digits_start(s);
    if end == s.len() {
        return (s, None);
    }
    let mut start = end;
    let mut number = &s[end..];
    if let Some(before) = s[..end].strip_suffix('x') {
        let lead = digits_start(before);
        if lead < before.len() {
            start = lead;
            number = &before[lead..];
        }
    }
    (&s[..start], number.parse().ok())
}

/// `TerminusBoldVGA` -> `["Terminus", "Bold", "VGA"]`
fn camel_segments(s: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut prev_lower = false;
    for (i, c) in s.char_indices() {
        if c.is_uppercase() && prev_lower {
            segments.push(&s[start..i]);
            start = i;
        }
        prev_lower = c.is_lowercase();
    }
    segments.push(&s[start..]);
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(file: &str, name: &str, styles: &[&str], size: Option<usize>, charset: Option<&str>) {
        let parsed = FontFileName::parse(file);
        assert_eq!(parsed.name, name, "{file}");
        assert_eq!(
            parsed.styles,
            styles.iter().map(|s| s.to_string()).collect::<BTreeSet<_>>(),
            "{file}"
        );
        assert_eq!(parsed.size, size, "{file}");
        assert_eq!(parsed.charset.as_deref(), charset, "{file}");
    }

    #[test]
    fn console_setup_names() {
        check("Arabic-Fixed15.psf.gz", "Fixed", &[], Some(15), Some("Arabic"));
        check("Arabic-VGA28x16.psf.gz", "VGA", &[], Some(28), Some("Arabic"));
        check(
            "CyrAsia-TerminusBold14.psf.gz",
            "Terminus",
            &["Bold"],
            Some(14),
            Some("CyrAsia"),
        );
        check("Lat15-Fixed13.psf.gz", "Fixed", &[], Some(13), Some("Lat15"));
        check(
            "Vietnamese-TerminusBold32x16.psf.gz",
            "Terminus",
            &["Bold"],
            Some(32),
            Some("Vietnamese"),
        );
        check("Uni2-Terminus12x6.psf.gz", "Terminus", &[], Some(12), Some("Uni2"));
        check(
            "Uni3-TerminusBoldVGA16.psf.gz",
            "Terminus",
            &["Bold", "VGA"],
            Some(16),
            Some("Uni3"),
        );
        check("Uni1-VGA8.psf", "VGA", &[], Some(8), Some("Uni1"));
    }

    #[test]
    fn names_without_charset_or_size() {
        check("matrix.psf.gz", "matrix", &[], None, None);
        check("SomeFont.psf", "SomeFont", &[], None, None);
        check("Another-Font-10x20.psf", "Font", &[], Some(10), Some("Another"));
        check("GohaClassic-16.PSF", "GohaClassic-16", &[], None, None);
    }

    #[test]
    fn non_psf_names_keep_their_stem() {
        check("NoMatchHere.txt", "NoMatchHere", &[], None, None);
    }

    #[test]
    fn split_size_forms() {
        assert_eq!(split_size("VGA28x16"), ("VGA", Some(28)));
        assert_eq!(split_size("Fixed15"), ("Fixed", Some(15)));
        assert_eq!(split_size("Fix"), ("Fix", None));
        assert_eq!(split_size("Box16"), ("Box", Some(16)));
    }
}
