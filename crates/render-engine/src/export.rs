//! Export pipelines and job management.
//!
//! Each export builds the node sequence for its layout, captures the nodes
//! strictly one after another, assembles the captures into an artifact,
//! and hands it to the sink. The shared [`ExportGate`] keeps at most one
//! export running.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use image::Rgba;

use carelab_capture::backend::{CaptureAdapter, CaptureOptions};
use carelab_catalog::catalog::Catalog;
use carelab_catalog::layout::{layout_nodes_with_year, LayoutNode, LayoutTarget};
use carelab_common::clock::{current_year, VideoTiming};
use carelab_common::config::{AppConfig, VideoDefaults};
use carelab_common::error::{CarelabError, CarelabResult};

use crate::archive::{ArchiveFactory, ZipArchiveFactory};
use crate::compositor::{compute_schedule, SharedCanvas};
use crate::document::{DocumentFactory, PageSetup, PdfDocumentFactory};
use crate::encode::encode_jpeg;
use crate::gate::ExportGate;
use crate::kind::{archive_entry_name, ExportKind};
use crate::sink::ArtifactSink;
use crate::video::{FfmpegRecorderFactory, RecorderFactory, RecorderSettings};

const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Progress callback for export runs.
pub type ProgressCallback = Box<dyn Fn(ExportProgress) + Send + Sync>;

/// Export progress report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportProgress {
    pub kind: ExportKind,

    /// Current stage.
    pub stage: ExportStage,

    /// Nodes captured so far.
    pub nodes_done: usize,

    /// Nodes in the sequence.
    pub nodes_total: usize,
}

/// Stages of the export process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportStage {
    Preparing,
    Capturing,
    Assembling,
    Saving,
    Complete,
    Failed,
}

/// Finished artifact before it reaches the sink.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub kind: ExportKind,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Capture and encoding parameters for all three pipelines.
#[derive(Debug, Clone)]
pub struct ExportSettings {
    pub document_scale: f32,
    pub image_scale: f32,
    /// Scale of video captures. Frames are fitted to the reel canvas.
    pub video_scale: f32,
    pub document_jpeg_quality: u8,
    pub archive_jpeg_quality: u8,
    pub video: VideoDefaults,
}

impl ExportSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            document_scale: config.render.document_scale,
            image_scale: config.render.image_scale,
            video_scale: 1.0,
            document_jpeg_quality: config.render.document_jpeg_quality,
            archive_jpeg_quality: config.render.archive_jpeg_quality,
            video: config.video.clone(),
        }
    }
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

/// Receives the user-facing notice when an export fails.
pub trait Notifier: Send + Sync {
    fn notify_failure(&self, kind: ExportKind, notice: &str, error: &CarelabError);
}

/// Notifier that only logs.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify_failure(&self, kind: ExportKind, notice: &str, error: &CarelabError) {
        tracing::warn!(kind = kind.as_str(), error = %error, "{notice}");
    }
}

/// Runs exports of one catalog.
pub struct Exporter {
    catalog: Arc<Catalog>,
    settings: ExportSettings,
    gate: ExportGate,
    capture: Box<dyn CaptureAdapter>,
    documents: Box<dyn DocumentFactory>,
    recorders: Box<dyn RecorderFactory>,
    archives: Box<dyn ArchiveFactory>,
    sink: Box<dyn ArtifactSink>,
    notifier: Box<dyn Notifier>,
    progress: Option<ProgressCallback>,
    footer_year: i32,
}

impl Exporter {
    /// Exporter with PDF, ffmpeg, and ZIP assemblers and a logging notifier.
    pub fn new(
        catalog: Arc<Catalog>,
        settings: ExportSettings,
        capture: Box<dyn CaptureAdapter>,
        sink: Box<dyn ArtifactSink>,
    ) -> Self {
        Self {
            catalog,
            settings,
            gate: ExportGate::new(),
            capture,
            documents: Box::new(PdfDocumentFactory),
            recorders: Box::new(FfmpegRecorderFactory),
            archives: Box::new(ZipArchiveFactory),
            sink,
            notifier: Box::new(LogNotifier),
            progress: None,
            footer_year: current_year(),
        }
    }

    /// Share `gate` with other exporters.
    pub fn with_gate(mut self, gate: ExportGate) -> Self {
        self.gate = gate;
        self
    }

    pub fn with_document_factory(mut self, documents: Box<dyn DocumentFactory>) -> Self {
        self.documents = documents;
        self
    }

    pub fn with_recorder_factory(mut self, recorders: Box<dyn RecorderFactory>) -> Self {
        self.recorders = recorders;
        self
    }

    pub fn with_archive_factory(mut self, archives: Box<dyn ArchiveFactory>) -> Self {
        self.archives = archives;
        self
    }

    pub fn with_notifier(mut self, notifier: Box<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_progress(mut self, progress: ProgressCallback) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Year printed in the document's closing footer.
    pub fn with_footer_year(mut self, year: i32) -> Self {
        self.footer_year = year;
        self
    }

    pub fn gate(&self) -> &ExportGate {
        &self.gate
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn is_busy(&self) -> bool {
        self.gate.is_busy()
    }

    /// Run one export and return where the artifact was saved.
    ///
    /// Fails with [`CarelabError::Busy`] without side effects when another
    /// export holds the gate. Any other failure is logged, reported to the
    /// notifier, and returned.
    pub async fn export(&self, kind: ExportKind) -> CarelabResult<PathBuf> {
        let _guard = self.gate.try_begin(kind)?;
        let total = self.catalog.slide_count();
        let started = Instant::now();
        tracing::info!(
            kind = kind.as_str(),
            slides = total,
            capture = self.capture.name(),
            "Starting export"
        );
        self.report(kind, ExportStage::Preparing, 0, total);

        let result = match self.run(kind).await {
            Ok(artifact) => {
                self.report(kind, ExportStage::Saving, total, total);
                self.sink.save(&artifact.file_name, &artifact.bytes)
            }
            Err(err) => Err(err),
        };

        match result {
            Ok(path) => {
                self.report(kind, ExportStage::Complete, total, total);
                tracing::info!(
                    kind = kind.as_str(),
                    path = %path.display(),
                    elapsed_secs = started.elapsed().as_secs_f64(),
                    "Export finished"
                );
                Ok(path)
            }
            Err(err) => {
                tracing::error!(kind = kind.as_str(), error = %err, "Export failed");
                self.report(kind, ExportStage::Failed, 0, total);
                self.notifier.notify_failure(kind, kind.failure_notice(), &err);
                Err(err)
            }
        }
    }

    /// Run every export kind back to back. Each acquires the gate on its
    /// own, so a failure does not stop the next one.
    pub async fn export_all(&self) -> Vec<(ExportKind, CarelabResult<PathBuf>)> {
        let mut results = Vec::with_capacity(ExportKind::ALL.len());
        for kind in ExportKind::ALL {
            results.push((kind, self.export(kind).await));
        }
        results
    }

    /// Build the artifact for `kind` without saving it.
    pub async fn run(&self, kind: ExportKind) -> CarelabResult<ExportArtifact> {
        let nodes = layout_nodes_with_year(&self.catalog, kind.layout_target(), self.footer_year);
        let bytes = match kind {
            ExportKind::Document => self.build_document(&nodes).await?,
            ExportKind::Video => self.build_video(&nodes).await?,
            ExportKind::ImageArchive => self.build_archive(&nodes).await?,
        };
        Ok(ExportArtifact {
            kind,
            file_name: kind.artifact_name(&self.catalog),
            bytes,
        })
    }

    async fn build_document(&self, nodes: &[LayoutNode]) -> CarelabResult<Vec<u8>> {
        let kind = ExportKind::Document;
        let options = CaptureOptions::new(self.settings.document_scale);
        let title = format!("{} - {}", self.catalog.lab_name, self.catalog.headline);
        let mut doc = self.documents.begin(&PageSetup::a4_portrait(), &title)?;
        let (page_w, page_h) = doc.page_size_mm();

        let total = nodes.len();
        for (i, node) in nodes.iter().enumerate() {
            let frame = self.capture.capture(node, &options).await?;
            let jpeg = encode_jpeg(&frame, self.settings.document_jpeg_quality)?;
            doc.add_image(&jpeg, 0.0, 0.0, page_w, page_h)?;
            if i + 1 < total {
                doc.add_page()?;
            }
            self.report(kind, ExportStage::Capturing, i + 1, total);
        }

        self.report(kind, ExportStage::Assembling, total, total);
        tracing::debug!(pages = doc.page_count(), "Finishing document");
        doc.finish()
    }

    async fn build_video(&self, nodes: &[LayoutNode]) -> CarelabResult<Vec<u8>> {
        let kind = ExportKind::Video;
        let (width, height) = LayoutTarget::Reel.size();
        let timing = VideoTiming::new(self.settings.video.fps);
        let settings = RecorderSettings::new(width, height, &self.settings.video);
        let options = CaptureOptions::new(self.settings.video_scale);
        let schedule = compute_schedule(nodes.len(), &timing);
        let held = timing.frames_per_dwell();

        tracing::info!(
            recorder = self.recorders.name(),
            frames = schedule.len(),
            duration_secs = timing.duration_secs(schedule.len() as u64),
            "Video plan built"
        );

        let mut canvas = SharedCanvas::new(width, height, BACKGROUND);
        let mut recorder = self.recorders.create(&settings)?;
        recorder.start()?;

        let total = nodes.len();
        for (i, node) in nodes.iter().enumerate() {
            let frame = self.capture.capture(node, &options).await?;
            canvas.draw(&frame);
            recorder.push_repeated(canvas.image(), held)?;
            self.report(kind, ExportStage::Capturing, i + 1, total);
        }

        self.report(kind, ExportStage::Assembling, total, total);
        let bytes = recorder.stop()?;
        tracing::debug!(
            frames = recorder.frames_written(),
            mime = recorder.mime_type(),
            "Video recorded"
        );
        Ok(bytes)
    }

    async fn build_archive(&self, nodes: &[LayoutNode]) -> CarelabResult<Vec<u8>> {
        let kind = ExportKind::ImageArchive;
        let options = CaptureOptions::new(self.settings.image_scale);
        let mut archive = self.archives.create()?;

        let total = nodes.len();
        for (i, node) in nodes.iter().enumerate() {
            let frame = self.capture.capture(node, &options).await?;
            let jpeg = encode_jpeg(&frame, self.settings.archive_jpeg_quality)?;
            let name = archive_entry_name(&self.catalog, i, total);
            archive.add_file(&name, &jpeg.data)?;
            self.report(kind, ExportStage::Capturing, i + 1, total);
        }

        self.report(kind, ExportStage::Assembling, total, total);
        archive.finalize()
    }

    fn report(&self, kind: ExportKind, stage: ExportStage, nodes_done: usize, nodes_total: usize) {
        if let Some(cb) = &self.progress {
            cb(ExportProgress {
                kind,
                stage,
                nodes_done,
                nodes_total,
            });
        }
    }
}
