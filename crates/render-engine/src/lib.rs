//! CareLab Render Engine
//!
//! Offline export pipelines that turn the offer catalog into three
//! downloadable artifacts: a paged PDF, a vertical WebM reel, and a ZIP of
//! high-resolution stills.
//!
//! # Pipeline Architecture
//!
//! ```text
//! Catalog ── layout nodes (print page | reel)
//!                  │
//!                  ▼
//!           CaptureAdapter  (one node at a time)
//!                  │
//!       ┌──────────┼───────────────┐
//!       ▼          ▼               ▼
//!   JPEG q90   SharedCanvas     JPEG q95
//!       │          │ dwell 3s      │
//!       ▼          ▼               ▼
//!   A4 pages   VideoRecorder   ZIP entries
//!       │          │               │
//!       └──────────┼───────────────┘
//!                  ▼
//!            ArtifactSink
//! ```
//!
//! All three pipelines share one [`ExportGate`]; a second export while one
//! is running fails with `Busy`.

pub mod archive;
pub mod compositor;
pub mod document;
pub mod encode;
pub mod export;
pub mod gate;
pub mod kind;
pub mod sink;
pub mod video;

pub use archive::{ArchiveAssembler, ArchiveFactory, ZipArchiveFactory};
pub use document::{DocumentAssembler, DocumentFactory, PageSetup, PdfDocumentFactory};
pub use export::*;
pub use gate::{ExportGate, ExportGuard, ExportState};
pub use kind::{archive_entry_name, ExportKind};
pub use sink::{ArtifactSink, DirectorySink};
pub use video::{FfmpegRecorderFactory, RecorderFactory, RecorderSettings, VideoRecorder};
