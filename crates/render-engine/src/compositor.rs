//! Frame compositor for the video recorder.
//!
//! Every capture is drawn onto one shared canvas at the reel resolution;
//! the recorder samples that canvas while a slide is held. The schedule
//! maps recorded frames back to the slide visible in them.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use carelab_common::clock::VideoTiming;

/// The single backing canvas sampled by the recorder.
pub struct SharedCanvas {
    image: RgbaImage,
    background: Rgba<u8>,
}

impl SharedCanvas {
    /// Canvas of `width`×`height` cleared to `background`.
    pub fn new(width: u32, height: u32, background: Rgba<u8>) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, background),
            background,
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn clear(&mut self) {
        let background = self.background;
        self.image.pixels_mut().for_each(|p| *p = background);
    }

    /// Replace the canvas content with `capture`, stretched to fit when its
    /// size differs from the canvas.
    pub fn draw(&mut self, capture: &RgbaImage) {
        self.clear();
        let (w, h) = self.image.dimensions();
        if capture.dimensions() == (w, h) {
            imageops::overlay(&mut self.image, capture, 0, 0);
        } else {
            let fitted = imageops::resize(capture, w, h, FilterType::Triangle);
            imageops::overlay(&mut self.image, &fitted, 0, 0);
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }
}

/// Which slide a recorded frame shows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameComposition {
    /// Frame number.
    pub frame_index: u64,

    /// Time in seconds.
    pub time_secs: f64,

    /// Position of the visible slide in the export sequence.
    pub slide_index: usize,
}

/// Compute the composition for each frame of a video holding `slides`
/// slides one after another.
pub fn compute_schedule(slides: usize, timing: &VideoTiming) -> Vec<FrameComposition> {
    let per_slide = timing.frames_per_dwell();
    let total_frames = timing.frames_for(slides);
    (0..total_frames)
        .map(|frame| FrameComposition {
            frame_index: frame,
            time_secs: timing.frame_time_secs(frame),
            slide_index: (frame / per_slide) as usize,
        })
        .collect()
}
