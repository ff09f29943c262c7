//! End-to-end runs of the three export pipelines with in-memory doubles.

use std::io::Cursor;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use image::{Rgba, RgbaImage};

use carelab_capture::backend::{CaptureAdapter, CaptureOptions, RasterCapture};
use carelab_catalog::catalog::Catalog;
use carelab_catalog::layout::LayoutNode;
use carelab_common::error::{CarelabError, CarelabResult};
use carelab_render::document::{DocumentAssembler, DocumentFactory, PageSetup};
use carelab_render::encode::EncodedImage;
use carelab_render::video::{RecorderFactory, RecorderSettings, VideoRecorder};
use carelab_render::{
    ArtifactSink, ExportGate, ExportKind, ExportSettings, ExportStage, Exporter, Notifier,
};

type Log = Arc<Mutex<Vec<String>>>;

fn small_settings() -> ExportSettings {
    ExportSettings {
        document_scale: 0.1,
        image_scale: 0.05,
        video_scale: 0.1,
        ..ExportSettings::default()
    }
}

#[derive(Clone, Default)]
struct MemorySink {
    saved: Arc<Mutex<Vec<(String, Vec<u8>)>>>,
}

impl ArtifactSink for MemorySink {
    fn save(&self, file_name: &str, bytes: &[u8]) -> CarelabResult<PathBuf> {
        self.saved
            .lock()
            .unwrap()
            .push((file_name.to_string(), bytes.to_vec()));
        Ok(PathBuf::from("memory").join(file_name))
    }
}

#[derive(Clone, Default)]
struct RecordingNotifier {
    notices: Arc<Mutex<Vec<(ExportKind, String)>>>,
}

impl Notifier for RecordingNotifier {
    fn notify_failure(&self, kind: ExportKind, notice: &str, _error: &CarelabError) {
        self.notices.lock().unwrap().push((kind, notice.to_string()));
    }
}

/// Solid-colour captures that log each call; fails at `fail_at` if set.
struct SolidCapture {
    log: Log,
    fail_at: Option<usize>,
}

#[async_trait::async_trait]
impl CaptureAdapter for SolidCapture {
    async fn capture(
        &self,
        node: &LayoutNode,
        options: &CaptureOptions,
    ) -> CarelabResult<RgbaImage> {
        if self.fail_at == Some(node.position) {
            return Err(CarelabError::capture("node never painted"));
        }
        self.log
            .lock()
            .unwrap()
            .push(format!("capture {}", node.position));
        let (w, h) = node.target.size();
        let (pw, ph) = options.output_size(w, h);
        let shade = (node.position * 20) as u8;
        Ok(RgbaImage::from_pixel(pw, ph, Rgba([shade, 74, 110, 255])))
    }

    fn name(&self) -> &str {
        "solid"
    }
}

struct LogRecorderFactory {
    log: Log,
}

struct LogRecorder {
    log: Log,
    settings: RecorderSettings,
    frames: u64,
}

impl RecorderFactory for LogRecorderFactory {
    fn create(&self, settings: &RecorderSettings) -> CarelabResult<Box<dyn VideoRecorder>> {
        Ok(Box::new(LogRecorder {
            log: self.log.clone(),
            settings: settings.clone(),
            frames: 0,
        }))
    }

    fn is_available(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "log"
    }
}

impl VideoRecorder for LogRecorder {
    fn start(&mut self) -> CarelabResult<()> {
        self.log.lock().unwrap().push("start".to_string());
        Ok(())
    }

    fn push_frame(&mut self, frame: &RgbaImage) -> CarelabResult<()> {
        assert_eq!(frame.dimensions(), (self.settings.width, self.settings.height));
        self.frames += 1;
        let mut log = self.log.lock().unwrap();
        match log.last_mut() {
            Some(last) if last.starts_with("frames ") => {
                *last = format!("frames {}", last[7..].parse::<u64>().unwrap() + 1);
            }
            _ => log.push("frames 1".to_string()),
        }
        Ok(())
    }

    fn stop(&mut self) -> CarelabResult<Vec<u8>> {
        self.log.lock().unwrap().push("stop".to_string());
        Ok(format!("webm:{}", self.frames).into_bytes())
    }

    fn frames_written(&self) -> u64 {
        self.frames
    }

    fn mime_type(&self) -> &str {
        "video/webm"
    }
}

struct CountingDocumentFactory {
    pages: Arc<Mutex<Vec<Vec<(u32, u32, f32, f32)>>>>,
}

struct CountingDocument {
    pages: Arc<Mutex<Vec<Vec<(u32, u32, f32, f32)>>>>,
    page_mm: (f32, f32),
}

impl DocumentFactory for CountingDocumentFactory {
    fn begin(&self, setup: &PageSetup, _title: &str) -> CarelabResult<Box<dyn DocumentAssembler>> {
        self.pages.lock().unwrap().push(Vec::new());
        Ok(Box::new(CountingDocument {
            pages: self.pages.clone(),
            page_mm: setup.page_mm(),
        }))
    }

    fn name(&self) -> &str {
        "counting"
    }
}

impl DocumentAssembler for CountingDocument {
    fn page_size_mm(&self) -> (f32, f32) {
        self.page_mm
    }

    fn add_image(
        &mut self,
        image: &EncodedImage,
        _x: f32,
        _y: f32,
        w: f32,
        h: f32,
    ) -> CarelabResult<()> {
        let mut pages = self.pages.lock().unwrap();
        pages
            .last_mut()
            .unwrap()
            .push((image.width, image.height, w, h));
        Ok(())
    }

    fn add_page(&mut self) -> CarelabResult<()> {
        self.pages.lock().unwrap().push(Vec::new());
        Ok(())
    }

    fn page_count(&self) -> usize {
        self.pages.lock().unwrap().len()
    }

    fn finish(self: Box<Self>) -> CarelabResult<Vec<u8>> {
        Ok(b"doc".to_vec())
    }
}

fn raster_exporter(sink: MemorySink) -> Exporter {
    Exporter::new(
        Arc::new(Catalog::builtin()),
        small_settings(),
        Box::new(RasterCapture::new(None)),
        Box::new(sink),
    )
    .with_footer_year(2025)
}

#[tokio::test]
async fn test_document_has_one_full_bleed_page_per_slide() {
    let pages = Arc::new(Mutex::new(Vec::new()));
    let sink = MemorySink::default();
    let exporter = raster_exporter(sink.clone()).with_document_factory(Box::new(
        CountingDocumentFactory {
            pages: pages.clone(),
        },
    ));

    let path = exporter.export(ExportKind::Document).await.unwrap();
    assert_eq!(path, PathBuf::from("memory/CareLab-Offers-2025.pdf"));

    let pages = pages.lock().unwrap();
    assert_eq!(pages.len(), 11);
    for page in pages.iter() {
        assert_eq!(page.len(), 1);
        let (px_w, px_h, w, h) = page[0];
        assert_eq!((px_w, px_h), (79, 112));
        assert_eq!((w, h), (210.0, 297.0));
    }
}

#[tokio::test]
async fn test_document_writes_pdf_bytes() {
    let sink = MemorySink::default();
    let exporter = raster_exporter(sink.clone());

    exporter.export(ExportKind::Document).await.unwrap();

    let saved = sink.saved.lock().unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].0, "CareLab-Offers-2025.pdf");
    assert!(saved[0].1.starts_with(b"%PDF-"));
}

#[tokio::test]
async fn test_image_archive_names_and_order() {
    let sink = MemorySink::default();
    let exporter = raster_exporter(sink.clone());

    exporter.export(ExportKind::ImageArchive).await.unwrap();

    let saved = sink.saved.lock().unwrap();
    assert_eq!(saved[0].0, "CareLab-Offers-2025-HD-Images.zip");

    let mut zip = zip::ZipArchive::new(Cursor::new(saved[0].1.clone())).unwrap();
    assert_eq!(zip.len(), 11);
    for i in 0..10 {
        assert_eq!(
            zip.by_index(i).unwrap().name(),
            format!("CareLab-Offer-{}.jpg", i + 1)
        );
    }
    assert_eq!(zip.by_index(10).unwrap().name(), "CareLab-Contact-2025.jpg");

    let mut first = Vec::new();
    std::io::Read::read_to_end(&mut zip.by_index(0).unwrap(), &mut first).unwrap();
    let decoded = image::load_from_memory(&first).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (54, 96));
}

#[tokio::test]
async fn test_video_holds_each_slide_for_dwell() {
    let log: Log = Arc::default();
    let sink = MemorySink::default();
    let exporter = Exporter::new(
        Arc::new(Catalog::builtin()),
        small_settings(),
        Box::new(SolidCapture {
            log: log.clone(),
            fail_at: None,
        }),
        Box::new(sink.clone()),
    )
    .with_recorder_factory(Box::new(LogRecorderFactory { log: log.clone() }));

    exporter.export(ExportKind::Video).await.unwrap();

    let log = log.lock().unwrap();
    assert_eq!(log.first().map(String::as_str), Some("start"));
    assert_eq!(log.last().map(String::as_str), Some("stop"));

    // start, then (capture, 90 frames) per slide, then stop
    assert_eq!(log.len(), 2 + 11 * 2);
    for slide in 0..11 {
        assert_eq!(log[1 + slide * 2], format!("capture {slide}"));
        assert_eq!(log[2 + slide * 2], "frames 90");
    }

    let saved = sink.saved.lock().unwrap();
    assert_eq!(saved[0].0, "CareLab-Offers-Reels-2025.webm");
    assert_eq!(saved[0].1, b"webm:990");
}

#[tokio::test]
async fn test_gate_busy_only_while_exporting() {
    let gate = ExportGate::new();
    let observed = Arc::new(Mutex::new(Vec::new()));
    let watched = gate.clone();
    let seen = observed.clone();

    let exporter = raster_exporter(MemorySink::default())
        .with_gate(gate.clone())
        .with_progress(Box::new(move |p| {
            seen.lock().unwrap().push((p.stage, watched.is_busy()));
        }));

    assert!(!gate.is_busy());
    exporter.export(ExportKind::ImageArchive).await.unwrap();
    assert!(!gate.is_busy());

    let observed = observed.lock().unwrap();
    assert_eq!(observed.first().map(|o| o.0), Some(ExportStage::Preparing));
    assert_eq!(observed.last().map(|o| o.0), Some(ExportStage::Complete));
    assert!(observed.iter().all(|(_, busy)| *busy));
    assert_eq!(
        observed
            .iter()
            .filter(|(stage, _)| *stage == ExportStage::Capturing)
            .count(),
        11
    );
}

#[tokio::test]
async fn test_failure_notifies_and_releases_gate() {
    let log: Log = Arc::default();
    let sink = MemorySink::default();
    let notifier = RecordingNotifier::default();
    let exporter = Exporter::new(
        Arc::new(Catalog::builtin()),
        small_settings(),
        Box::new(SolidCapture {
            log: log.clone(),
            fail_at: Some(3),
        }),
        Box::new(sink.clone()),
    )
    .with_notifier(Box::new(notifier.clone()));

    let err = exporter.export(ExportKind::ImageArchive).await.unwrap_err();
    assert!(matches!(err, CarelabError::Capture { .. }));
    assert!(!exporter.is_busy());

    // Nodes after the failing one are never captured.
    assert_eq!(log.lock().unwrap().len(), 3);
    assert!(sink.saved.lock().unwrap().is_empty());

    let notices = notifier.notices.lock().unwrap();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].0, ExportKind::ImageArchive);
    assert_eq!(notices[0].1, ExportKind::ImageArchive.failure_notice());
}

#[tokio::test]
async fn test_video_failure_mid_sequence_releases_gate() {
    let log: Log = Arc::default();
    let sink = MemorySink::default();
    let notifier = RecordingNotifier::default();
    let exporter = Exporter::new(
        Arc::new(Catalog::builtin()),
        small_settings(),
        Box::new(SolidCapture {
            log: log.clone(),
            fail_at: Some(4),
        }),
        Box::new(sink.clone()),
    )
    .with_recorder_factory(Box::new(LogRecorderFactory { log: log.clone() }))
    .with_notifier(Box::new(notifier.clone()));

    let err = exporter.export(ExportKind::Video).await.unwrap_err();
    assert!(matches!(err, CarelabError::Capture { .. }));
    assert!(!exporter.is_busy());

    // start, then (capture, 90 frames) for the four slides before the failure
    let log = log.lock().unwrap();
    assert_eq!(log.len(), 1 + 4 * 2);
    assert_eq!(log[0], "start");
    assert_eq!(log[7], "capture 3");
    assert_eq!(log[8], "frames 90");
    assert!(!log.iter().any(|entry| entry == "stop"));
    assert!(sink.saved.lock().unwrap().is_empty());

    let notices = notifier.notices.lock().unwrap();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].0, ExportKind::Video);
    assert_eq!(notices[0].1, ExportKind::Video.failure_notice());
}

#[tokio::test]
async fn test_document_failure_releases_gate() {
    let log: Log = Arc::default();
    let pages = Arc::new(Mutex::new(Vec::new()));
    let sink = MemorySink::default();
    let notifier = RecordingNotifier::default();
    let exporter = Exporter::new(
        Arc::new(Catalog::builtin()),
        small_settings(),
        Box::new(SolidCapture {
            log: log.clone(),
            fail_at: Some(5),
        }),
        Box::new(sink.clone()),
    )
    .with_document_factory(Box::new(CountingDocumentFactory {
        pages: pages.clone(),
    }))
    .with_notifier(Box::new(notifier.clone()));

    let err = exporter.export(ExportKind::Document).await.unwrap_err();
    assert!(matches!(err, CarelabError::Capture { .. }));
    assert!(!exporter.is_busy());

    // Five filled pages plus the blank one opened after the last capture.
    assert_eq!(log.lock().unwrap().len(), 5);
    assert_eq!(pages.lock().unwrap().len(), 6);
    assert!(sink.saved.lock().unwrap().is_empty());

    let notices = notifier.notices.lock().unwrap();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].0, ExportKind::Document);
    assert_eq!(notices[0].1, ExportKind::Document.failure_notice());
    assert!(exporter.gate().try_begin(ExportKind::Video).is_ok());
}

#[tokio::test]
async fn test_second_export_rejected_while_busy() {
    let notifier = RecordingNotifier::default();
    let sink = MemorySink::default();
    let exporter = raster_exporter(sink.clone()).with_notifier(Box::new(notifier.clone()));

    let _held = exporter.gate().try_begin(ExportKind::Video).unwrap();
    let err = exporter.export(ExportKind::Document).await.unwrap_err();
    assert!(err.is_busy());

    assert!(sink.saved.lock().unwrap().is_empty());
    assert!(notifier.notices.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_export_all_runs_each_kind() {
    let log: Log = Arc::default();
    let sink = MemorySink::default();
    let exporter = raster_exporter(sink.clone())
        .with_recorder_factory(Box::new(LogRecorderFactory { log }));

    let results = exporter.export_all().await;
    assert_eq!(results.len(), 3);
    assert!(results.iter().all(|(_, r)| r.is_ok()));

    let names: Vec<String> = sink
        .saved
        .lock()
        .unwrap()
        .iter()
        .map(|(n, _)| n.clone())
        .collect();
    assert_eq!(
        names,
        vec![
            "CareLab-Offers-2025.pdf",
            "CareLab-Offers-Reels-2025.webm",
            "CareLab-Offers-2025-HD-Images.zip",
        ]
    );
}
