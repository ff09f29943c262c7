//! Font discovery for slide text.

use std::path::{Path, PathBuf};

use ab_glyph::FontArc;
use carelab_common::error::{CarelabError, CarelabResult};

/// System fonts probed when no font is configured, Arabic-capable first.
const CANDIDATE_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/noto/NotoNaskhArabic-Bold.ttf",
    "/usr/share/fonts/truetype/noto/NotoSansArabic-Bold.ttf",
    "/usr/share/fonts/opentype/noto/NotoSansArabic-Bold.ttf",
    "/usr/share/fonts/noto/NotoSansArabic-Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/Library/Fonts/Arial Unicode.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

/// Load a font file.
pub fn load_font_file(path: &Path) -> CarelabResult<FontArc> {
    if !path.exists() {
        return Err(CarelabError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let bytes = std::fs::read(path)?;
    FontArc::try_from_vec(bytes).map_err(|e| {
        CarelabError::config(format!("Invalid font {}: {e}", path.display()))
    })
}

/// Resolve the slide font.
///
/// An explicitly configured font must load; otherwise the first candidate
/// that parses wins, and `None` means text is left out of captures.
pub fn resolve_font(configured: Option<&Path>) -> CarelabResult<Option<(PathBuf, FontArc)>> {
    if let Some(path) = configured {
        let font = load_font_file(path)?;
        return Ok(Some((path.to_path_buf(), font)));
    }

    for candidate in CANDIDATE_FONTS {
        let path = Path::new(candidate);
        if !path.exists() {
            continue;
        }
        match load_font_file(path) {
            Ok(font) => return Ok(Some((path.to_path_buf(), font))),
            Err(e) => tracing::debug!(path = %path.display(), error = %e, "Skipping font"),
        }
    }

    Ok(None)
}
