use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use psf2flf::{flf, Font, FontDir, FontFileName, RenderMode};
use rayon::prelude::*;
use walkdir::WalkDir;

pub struct BatchOptions {
    pub mode: RenderMode,
    pub merge: bool,
}

/// Loads a font and names it after its file.
pub fn load_font(path: &Path) -> Result<Font> {
    let mut font =
        Font::load_file(path).with_context(|| format!("failed to load {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    FontFileName::parse(&file_name).apply(&mut font);
    Ok(font)
}

/// `DEST` ending in `.flf` is the output file, anything else a directory.
fn output_path(font: &Font, dest: &Path) -> Result<PathBuf> {
    if is_flf_path(dest) {
        if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        return Ok(dest.to_path_buf());
    }
    fs::create_dir_all(dest).with_context(|| format!("failed to create {}", dest.display()))?;
    Ok(dest.join(font.meta.flf_file_name()))
}

fn is_flf_path(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("flf"))
}

pub fn convert_file(source: &Path, dest: &Path, mode: RenderMode) -> Result<Font> {
    let font = load_font(source)?;
    let out = output_path(&font, dest)?;
    flf::write_file(&font, mode, &out)
        .with_context(|| format!("failed to write {}", out.display()))?;
    log::info!("{} -> {}", source.display(), out.display());
    Ok(font)
}

fn is_psf_path(path: &Path) -> bool {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    name.ends_with(".psf") || name.ends_with(".psf.gz")
}

/// Font files directly inside `dir`, sorted by name.
fn font_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        bail!("{} is not a directory", dir.display());
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.with_context(|| format!("failed to read {}", dir.display()))?;
        if entry.file_type().is_file() && is_psf_path(entry.path()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// `Uni1-Fixed15.psf.gz` -> `Uni1-Fixed15`
fn source_stem(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let lower = name.to_ascii_lowercase();
    let len = [".psf.gz", ".psf"]
        .iter()
        .find(|ext| lower.ends_with(*ext))
        .map_or(name.len(), |ext| name.len() - ext.len());
    name[..len].to_string()
}

/// Fonts decoded from a directory, each paired with its output file name.
pub struct LoadedDir {
    pub fonts: Vec<(Font, String)>,
    /// Files that failed to decode or merge.
    pub failed: usize,
}

/// Decodes every font file in `dir` in parallel. With `merge`, fonts of the
/// same family, styles and height are combined in file name order.
///
/// Files that fail to decode or merge are logged and skipped.
pub fn load_dir(dir: &Path, merge: bool) -> Result<LoadedDir> {
    let files = font_files(dir)?;
    if files.is_empty() {
        bail!("no .psf or .psf.gz files in {}", dir.display());
    }
    let decoded: Vec<(PathBuf, Result<Font>)> = files
        .into_par_iter()
        .map(|path| {
            let font = load_font(&path);
            (path, font)
        })
        .collect();

    let mut failed = 0;
    let mut loaded = Vec::new();
    for (path, font) in decoded {
        match font {
            Ok(font) => loaded.push((path, font)),
            Err(err) => {
                log::error!("{err:#}");
                failed += 1;
            }
        }
    }

    if !merge {
        let fonts = loaded
            .into_iter()
            .map(|(path, font)| {
                let name = format!(
                    "{}-{}x{}.flf",
                    source_stem(&path),
                    font.width(),
                    font.height()
                );
                (font, name)
            })
            .collect();
        return Ok(LoadedDir { fonts, failed });
    }

    let mut font_dir = FontDir::new();
    for (path, font) in loaded {
        if let Err(err) = font_dir.add_font(font) {
            log::error!("{}: {err}", path.display());
            failed += 1;
        }
    }
    let fonts = font_dir
        .into_fonts()
        .map(|font| {
            let name = font.meta.flf_file_name();
            (font, name)
        })
        .collect();
    Ok(LoadedDir { fonts, failed })
}

/// Converts every font in `source` into `dest`. Returns the written fonts.
pub fn convert_dir(source: &Path, dest: &Path, options: &BatchOptions) -> Result<Vec<Font>> {
    let loaded = load_dir(source, options.merge)?;
    fs::create_dir_all(dest).with_context(|| format!("failed to create {}", dest.display()))?;

    let written: Vec<Option<Font>> = loaded
        .fonts
        .into_par_iter()
        .map(|(font, name)| {
            let out = dest.join(&name);
            match flf::write_file(&font, options.mode, &out) {
                Ok(()) => {
                    log::info!("wrote {}", out.display());
                    Some(font)
                }
                Err(err) => {
                    log::error!("{}: {err}", out.display());
                    None
                }
            }
        })
        .collect();
    let attempted = written.len();
    let written: Vec<Font> = written.into_iter().flatten().collect();
    let failed = loaded.failed + attempted - written.len();

    eprintln!(
        "Wrote {} FIGlet font(s) to {}, {} failure(s)",
        written.len(),
        dest.display(),
        failed
    );
    if written.is_empty() {
        bail!("no fonts converted from {}", source.display());
    }
    Ok(written)
}
