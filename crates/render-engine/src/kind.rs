//! The three artifact kinds and their naming rules.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use carelab_catalog::catalog::Catalog;
use carelab_catalog::layout::LayoutTarget;
use carelab_common::error::CarelabError;

/// Which artifact an export produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportKind {
    /// Multi-page A4 PDF.
    Document,
    /// WebM reel of every slide.
    Video,
    /// ZIP of per-slide JPEGs.
    ImageArchive,
}

impl ExportKind {
    pub const ALL: [ExportKind; 3] = [
        ExportKind::Document,
        ExportKind::Video,
        ExportKind::ImageArchive,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ExportKind::Document => "document",
            ExportKind::Video => "video",
            ExportKind::ImageArchive => "images",
        }
    }

    /// Layout the pipeline captures.
    pub fn layout_target(self) -> LayoutTarget {
        match self {
            ExportKind::Document => LayoutTarget::PrintPage,
            ExportKind::Video | ExportKind::ImageArchive => LayoutTarget::Reel,
        }
    }

    /// Download name of the finished artifact.
    pub fn artifact_name(self, catalog: &Catalog) -> String {
        let brand = &catalog.brand;
        let year = &catalog.contact.year;
        match self {
            ExportKind::Document => format!("{brand}-Offers-{year}.pdf"),
            ExportKind::Video => format!("{brand}-Offers-Reels-{year}.webm"),
            ExportKind::ImageArchive => format!("{brand}-Offers-{year}-HD-Images.zip"),
        }
    }

    /// Blocking notice shown to the user when this export fails.
    pub fn failure_notice(self) -> &'static str {
        match self {
            ExportKind::Document => "حدث خطأ أثناء إنشاء ملف PDF. يرجى المحاولة مرة أخرى.",
            ExportKind::Video => "حدث خطأ أثناء إنشاء الفيديو. قد لا يدعم النظام هذه الخاصية.",
            ExportKind::ImageArchive => "حدث خطأ أثناء إنشاء الصور.",
        }
    }
}

impl fmt::Display for ExportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportKind {
    type Err = CarelabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pdf" | "document" => Ok(ExportKind::Document),
            "video" | "webm" | "reels" => Ok(ExportKind::Video),
            "images" | "zip" | "image_archive" => Ok(ExportKind::ImageArchive),
            other => Err(CarelabError::unsupported(format!(
                "Unknown export kind '{other}'"
            ))),
        }
    }
}

/// Entry name of the capture at `position` inside the image archive.
///
/// Package slides are numbered from 1; the last capture is the contact
/// slide and carries the year instead.
pub fn archive_entry_name(catalog: &Catalog, position: usize, total: usize) -> String {
    if position + 1 == total {
        format!("{}-Contact-{}.jpg", catalog.brand, catalog.contact.year)
    } else {
        format!("{}-Offer-{}.jpg", catalog.brand, position + 1)
    }
}
