//! Check system capabilities.

use std::path::Path;

use carelab_capture::fonts::resolve_font;
use carelab_common::config::{config_file_path, AppConfig};
use carelab_render::video::{command_exists, list_encoders, select_codec};

/// Where the running config came from. An explicit `--config` file has
/// already been loaded by the time this runs.
fn config_status(explicit: Option<&Path>) -> String {
    match explicit {
        Some(path) => format!("[OK] Config: {}", path.display()),
        None => {
            let path = config_file_path();
            if path.exists() {
                format!("[OK] Config: {}", path.display())
            } else {
                format!("[OK] Config: defaults ({} not found)", path.display())
            }
        }
    }
}

pub fn run(config: &AppConfig, config_path: Option<&Path>) -> anyhow::Result<()> {
    println!("CareLab System Check");
    println!("{}", "=".repeat(50));

    let mut ready = true;

    println!("{}", config_status(config_path));

    match resolve_font(config.render.font_path.as_deref()) {
        Ok(Some((path, _))) => println!("[OK] Font: {}", path.display()),
        Ok(None) => println!("[WARN] Font: none found, slides will be exported without text"),
        Err(e) => {
            println!("[FAIL] Font: {e}");
            ready = false;
        }
    }

    if command_exists("ffmpeg") {
        let video = &config.video;
        match list_encoders() {
            Ok(listing) => {
                match select_codec(&listing, &video.preferred_codec, &video.fallback_codec) {
                    Some(codec) => println!("[OK] Video encoder: {codec}"),
                    None => {
                        println!(
                            "[FAIL] Video encoder: ffmpeg has neither {} nor {}",
                            video.preferred_codec, video.fallback_codec
                        );
                        ready = false;
                    }
                }
            }
            Err(e) => {
                println!("[FAIL] Video encoder: {e}");
                ready = false;
            }
        }
    } else {
        println!("[FAIL] ffmpeg: not found in PATH (video export unavailable)");
        ready = false;
    }

    let out = &config.output_dir;
    match std::fs::create_dir_all(out) {
        Ok(()) => println!("[OK] Output directory: {}", out.display()),
        Err(e) => {
            println!("[FAIL] Output directory {}: {e}", out.display());
            ready = false;
        }
    }

    println!();
    if ready {
        println!("All exports are available. CareLab is ready.");
    } else {
        println!("Some exports are unavailable. See above for fixes.");
    }

    Ok(())
}
