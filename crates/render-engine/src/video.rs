//! Streaming video recorder.
//!
//! Frames are pushed one at a time onto an encoder that runs for the whole
//! video export. The default recorder pipes raw RGBA frames into an ffmpeg
//! child process and collects the WebM container it writes to stdout.

use std::io::{BufReader, Read, Write};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread::JoinHandle;

use image::RgbaImage;

use carelab_common::config::VideoDefaults;
use carelab_common::error::{CarelabError, CarelabResult};

/// Parameters fixed for the lifetime of a recorder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecorderSettings {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub bitrate_kbps: u32,
    pub preferred_codec: String,
    pub fallback_codec: String,
}

impl RecorderSettings {
    pub fn new(width: u32, height: u32, video: &VideoDefaults) -> Self {
        Self {
            width,
            height,
            fps: video.fps.max(1),
            bitrate_kbps: video.bitrate_kbps,
            preferred_codec: video.preferred_codec.clone(),
            fallback_codec: video.fallback_codec.clone(),
        }
    }

    /// Byte length of one raw RGBA frame.
    pub fn frame_len(&self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

/// A recorder that samples frames onto a video timeline.
pub trait VideoRecorder: Send {
    /// Begin recording. Must be called before the first frame.
    fn start(&mut self) -> CarelabResult<()>;

    /// Append one frame at the recorder's frame rate.
    fn push_frame(&mut self, frame: &RgbaImage) -> CarelabResult<()>;

    /// Hold `frame` for `count` consecutive frames.
    fn push_repeated(&mut self, frame: &RgbaImage, count: u64) -> CarelabResult<()> {
        for _ in 0..count {
            self.push_frame(frame)?;
        }
        Ok(())
    }

    /// Finish recording and return the encoded container.
    fn stop(&mut self) -> CarelabResult<Vec<u8>>;

    fn frames_written(&self) -> u64;

    /// MIME type of the bytes returned by [`stop`](Self::stop).
    fn mime_type(&self) -> &str;
}

/// Creates a recorder per video export.
pub trait RecorderFactory: Send + Sync {
    fn create(&self, settings: &RecorderSettings) -> CarelabResult<Box<dyn VideoRecorder>>;

    /// Check if this recorder can run on the system.
    fn is_available(&self) -> bool;

    fn name(&self) -> &str;
}

/// ffmpeg-backed WebM recorder factory.
#[derive(Debug, Default, Clone, Copy)]
pub struct FfmpegRecorderFactory;

impl RecorderFactory for FfmpegRecorderFactory {
    fn create(&self, settings: &RecorderSettings) -> CarelabResult<Box<dyn VideoRecorder>> {
        if !self.is_available() {
            return Err(CarelabError::unsupported(
                "No video recorder found (expected ffmpeg in PATH)",
            ));
        }
        let encoders = list_encoders()?;
        let codec = select_codec(&encoders, &settings.preferred_codec, &settings.fallback_codec)
            .ok_or_else(|| {
                CarelabError::unsupported(format!(
                    "ffmpeg supports neither {} nor {}",
                    settings.preferred_codec, settings.fallback_codec
                ))
            })?;
        tracing::info!(codec = %codec, "Selected video encoder");
        Ok(Box::new(FfmpegRecorder::new(settings.clone(), codec)))
    }

    fn is_available(&self) -> bool {
        command_exists("ffmpeg")
    }

    fn name(&self) -> &str {
        "ffmpeg"
    }
}

/// Pick the first of `preferred`/`fallback` listed in `ffmpeg -encoders`
/// output.
pub fn select_codec(encoders_output: &str, preferred: &str, fallback: &str) -> Option<String> {
    let listed: Vec<&str> = encoders_output
        .lines()
        .filter_map(|line| {
            let mut cols = line.split_whitespace();
            let flags = cols.next()?;
            // Encoder rows start with a six-character capability column.
            if flags.len() == 6 && flags.starts_with('V') {
                cols.next()
            } else {
                None
            }
        })
        .collect();

    [preferred, fallback]
        .into_iter()
        .find(|codec| listed.contains(codec))
        .map(str::to_string)
}

/// Raw `ffmpeg -encoders` listing.
pub fn list_encoders() -> CarelabResult<String> {
    let output = Command::new("ffmpeg")
        .args(["-hide_banner", "-encoders"])
        .output()
        .map_err(|e| CarelabError::unsupported(format!("Failed to probe ffmpeg encoders: {e}")))?;
    if !output.status.success() {
        return Err(CarelabError::unsupported(format!(
            "ffmpeg encoder probe failed (status {})",
            output.status
        )));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Arguments that turn raw RGBA on stdin into WebM on stdout.
pub fn recorder_args(settings: &RecorderSettings, codec: &str) -> Vec<String> {
    let mut args: Vec<String> = [
        "-hide_banner",
        "-loglevel",
        "error",
        "-f",
        "rawvideo",
        "-pix_fmt",
        "rgba",
        "-s",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    args.push(format!("{}x{}", settings.width, settings.height));
    args.push("-r".to_string());
    args.push(settings.fps.to_string());
    args.extend(["-i", "pipe:0", "-an", "-c:v"].iter().map(|s| s.to_string()));
    args.push(codec.to_string());
    args.push("-b:v".to_string());
    args.push(format!("{}k", settings.bitrate_kbps));
    if codec == "libvpx-vp9" {
        args.extend(["-row-mt", "1", "-deadline", "realtime"].iter().map(|s| s.to_string()));
    }
    args.extend(["-pix_fmt", "yuv420p", "-f", "webm", "pipe:1"].iter().map(|s| s.to_string()));
    args
}

pub struct FfmpegRecorder {
    settings: RecorderSettings,
    codec: String,
    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stdout_task: Option<JoinHandle<std::io::Result<Vec<u8>>>>,
    stderr_task: Option<JoinHandle<String>>,
    frames: u64,
}

impl FfmpegRecorder {
    pub fn new(settings: RecorderSettings, codec: String) -> Self {
        Self {
            settings,
            codec,
            child: None,
            stdin: None,
            stdout_task: None,
            stderr_task: None,
            frames: 0,
        }
    }
}

impl VideoRecorder for FfmpegRecorder {
    fn start(&mut self) -> CarelabResult<()> {
        if self.child.is_some() {
            return Err(CarelabError::assembly("Recorder already started"));
        }
        let args = recorder_args(&self.settings, &self.codec);
        tracing::debug!(args = ?args, "Running ffmpeg");

        let mut child = Command::new("ffmpeg")
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| CarelabError::assembly(format!("Failed to start ffmpeg: {e}")))?;

        tracing::info!(
            pid = child.id(),
            codec = %self.codec,
            width = self.settings.width,
            height = self.settings.height,
            fps = self.settings.fps,
            "ffmpeg recorder started"
        );

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| CarelabError::assembly("Failed to open ffmpeg stdin"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| CarelabError::assembly("Failed to capture ffmpeg stdout"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| CarelabError::assembly("Failed to capture ffmpeg stderr"))?;

        // Both pipes are drained concurrently so ffmpeg never blocks on a
        // full pipe while we are still writing frames.
        self.stdout_task = Some(std::thread::spawn(move || -> std::io::Result<Vec<u8>> {
            let mut reader = BufReader::new(stdout);
            let mut container = Vec::new();
            reader.read_to_end(&mut container)?;
            Ok(container)
        }));
        self.stderr_task = Some(std::thread::spawn(move || -> String {
            let mut reader = BufReader::new(stderr);
            let mut output = String::new();
            match reader.read_to_string(&mut output) {
                Ok(_) => output,
                Err(err) => format!("<failed to read ffmpeg stderr: {err}>"),
            }
        }));
        self.stdin = Some(stdin);
        self.child = Some(child);
        Ok(())
    }

    fn push_frame(&mut self, frame: &RgbaImage) -> CarelabResult<()> {
        if frame.dimensions() != (self.settings.width, self.settings.height) {
            return Err(CarelabError::assembly(format!(
                "Frame is {}x{}, recorder expects {}x{}",
                frame.width(),
                frame.height(),
                self.settings.width,
                self.settings.height
            )));
        }
        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| CarelabError::assembly("Recorder is not running"))?;
        stdin
            .write_all(frame.as_raw())
            .map_err(|e| CarelabError::assembly(format!("Failed to feed ffmpeg: {e}")))?;
        self.frames += 1;
        Ok(())
    }

    fn stop(&mut self) -> CarelabResult<Vec<u8>> {
        // Closing stdin signals end of stream.
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| CarelabError::assembly("Recorder is not running"))?;

        let status = child
            .wait()
            .map_err(|e| CarelabError::assembly(format!("Failed to wait on ffmpeg: {e}")))?;
        let stderr_output = self
            .stderr_task
            .take()
            .map(|task| {
                task.join()
                    .unwrap_or_else(|_| "<failed to join stderr reader>".to_string())
            })
            .unwrap_or_default();
        let stdout = self
            .stdout_task
            .take()
            .ok_or_else(|| CarelabError::assembly("ffmpeg stdout reader missing"))?
            .join()
            .map_err(|_| CarelabError::assembly("Failed to join ffmpeg stdout reader"))?
            .map_err(|e| CarelabError::assembly(format!("Failed reading ffmpeg output: {e}")))?;

        if !status.success() {
            return Err(CarelabError::assembly(format!(
                "ffmpeg recording failed (status {}): {}",
                status,
                stderr_output.trim()
            )));
        }

        tracing::info!(
            frames = self.frames,
            bytes = stdout.len(),
            "ffmpeg recorder stopped"
        );
        Ok(stdout)
    }

    fn frames_written(&self) -> u64 {
        self.frames
    }

    fn mime_type(&self) -> &str {
        "video/webm"
    }
}

impl Drop for FfmpegRecorder {
    fn drop(&mut self) {
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            tracing::warn!(pid = child.id(), "Killing unfinished ffmpeg recorder");
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

pub fn command_exists(binary: &str) -> bool {
    Command::new("sh")
        .arg("-c")
        .arg(format!("command -v {binary} >/dev/null 2>&1"))
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}
