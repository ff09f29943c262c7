//! Export the offers to PDF, video, and image bundles.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use carelab_common::config::AppConfig;
use carelab_common::error::CarelabError;
use carelab_render::{
    DirectorySink, ExportKind, ExportProgress, ExportSettings, ExportStage, Exporter, Notifier,
};

/// Prints the localized failure notice the way a blocking alert would.
struct CliNotifier;

impl Notifier for CliNotifier {
    fn notify_failure(&self, _kind: ExportKind, notice: &str, error: &CarelabError) {
        eprintln!("\n{notice}");
        eprintln!("  ({error})");
    }
}

/// One export kind, or `None` for all of them.
fn parse_selection(kind: &str) -> anyhow::Result<Option<ExportKind>> {
    if kind.eq_ignore_ascii_case("all") {
        return Ok(None);
    }
    kind.parse::<ExportKind>()
        .map(Some)
        .map_err(|_| anyhow::anyhow!("Unknown export kind: {kind}. Use: pdf, video, images, all"))
}

pub async fn run(
    mut config: AppConfig,
    kind: String,
    output: Option<PathBuf>,
    catalog: Option<PathBuf>,
    font: Option<PathBuf>,
) -> anyhow::Result<()> {
    let selection = parse_selection(&kind)?;
    let catalog = Arc::new(super::load_catalog(catalog, &config)?);
    if font.is_some() {
        config.render.font_path = font;
    }
    let output_dir = output.unwrap_or_else(|| config.output_dir.clone());
    tracing::debug!(kind = ?selection, output = %output_dir.display(), "Export requested");

    println!("Exporting {} offers for {}", catalog.len(), catalog.brand);
    println!("  Output: {}", output_dir.display());

    let capture = carelab_capture::get_backend(&config.render)?;
    let progress_cb: Box<dyn Fn(ExportProgress) + Send + Sync> = Box::new(|p| {
        let label = match p.stage {
            ExportStage::Preparing => "preparing",
            ExportStage::Capturing => "capturing",
            ExportStage::Assembling => "assembling",
            ExportStage::Saving => "saving",
            ExportStage::Complete => "done",
            ExportStage::Failed => "failed",
        };
        print!(
            "\r  {}: {} ({}/{} slides)    ",
            p.kind, label, p.nodes_done, p.nodes_total
        );
        std::io::stdout().flush().ok();
    });

    let exporter = Exporter::new(
        catalog,
        ExportSettings::from_config(&config),
        capture,
        Box::new(DirectorySink::new(output_dir)),
    )
    .with_notifier(Box::new(CliNotifier))
    .with_progress(progress_cb);

    let results = match selection {
        Some(kind) => vec![(kind, exporter.export(kind).await)],
        None => exporter.export_all().await,
    };

    let mut failures = 0usize;
    for (kind, result) in results {
        match result {
            Ok(path) => println!("\n  Saved {}: {}", kind, path.display()),
            Err(e) => {
                println!("\n  Export {kind} failed: {e}");
                failures += 1;
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} export(s) failed");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_selection() {
        assert_eq!(parse_selection("all").unwrap(), None);
        assert_eq!(parse_selection("ALL").unwrap(), None);
        assert_eq!(parse_selection("pdf").unwrap(), Some(ExportKind::Document));
        assert_eq!(
            parse_selection("images").unwrap(),
            Some(ExportKind::ImageArchive)
        );
        assert!(parse_selection("mp4").is_err());
    }
}
