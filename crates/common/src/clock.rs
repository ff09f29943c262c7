//! Timing utilities for offline video recording.
//!
//! The video exporter never sleeps: a slide is "held" by writing the same
//! canvas for as many frames as the dwell lasts at the recorder rate. This
//! module keeps the arithmetic between frames, seconds, and slides in one
//! place.

use chrono::Datelike;

/// Seconds each slide stays on screen in the exported video.
pub const DWELL_SECS: u32 = 3;

/// Frame-rate and dwell pairing used by the video recorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoTiming {
    fps: u32,
    dwell_secs: u32,
}

impl VideoTiming {
    /// Create timing for the given sampling rate and the fixed dwell.
    pub fn new(fps: u32) -> Self {
        Self {
            fps: fps.max(1),
            dwell_secs: DWELL_SECS,
        }
    }

    /// Sampling rate in frames per second.
    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Dwell per slide in seconds.
    pub fn dwell_secs(&self) -> u32 {
        self.dwell_secs
    }

    /// Frames written while a single slide is held.
    pub fn frames_per_dwell(&self) -> u64 {
        self.fps as u64 * self.dwell_secs as u64
    }

    /// Frames for a whole sequence of `slides` held one after another.
    pub fn frames_for(&self, slides: usize) -> u64 {
        self.frames_per_dwell() * slides as u64
    }

    /// Interval between two sampled frames.
    pub fn frame_interval_ns(&self) -> u64 {
        1_000_000_000 / self.fps as u64
    }

    /// Presentation time of a frame index in seconds.
    pub fn frame_time_secs(&self, frame: u64) -> f64 {
        frame as f64 / self.fps as f64
    }

    /// Duration covered by `frames` sampled frames.
    pub fn duration_secs(&self, frames: u64) -> f64 {
        self.frame_time_secs(frames)
    }
}

impl Default for VideoTiming {
    fn default() -> Self {
        Self::new(30)
    }
}

/// Calendar year used in footers that print "the current year".
pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames_per_dwell() {
        let timing = VideoTiming::new(30);
        assert_eq!(timing.frames_per_dwell(), 90);
        assert_eq!(timing.frames_for(11), 990);
    }

    #[test]
    fn test_duration_meets_dwell_floor() {
        let timing = VideoTiming::new(24);
        let frames = timing.frames_for(11);
        assert!(timing.duration_secs(frames) >= 33.0);
    }

    #[test]
    fn test_zero_fps_is_clamped() {
        let timing = VideoTiming::new(0);
        assert_eq!(timing.fps(), 1);
        assert_eq!(timing.frame_interval_ns(), 1_000_000_000);
    }

    #[test]
    fn test_current_year_is_plausible() {
        assert!(current_year() >= 2024);
    }
}
