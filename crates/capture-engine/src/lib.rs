//! CareLab Capture Engine
//!
//! Turns off-screen layout nodes into raster images. The export pipelines
//! only see the [`CaptureAdapter`] trait, so the rendering technology can
//! be swapped without touching pipeline code.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │             CaptureAdapter               │
//! │  ┌──────────────┐   ┌─────────────────┐  │
//! │  │ RasterCapture│──▶│ Painter         │  │
//! │  │ (font, node) │   │ (imageproc)     │  │
//! │  └──────────────┘   └────────┬────────┘  │
//! │                              ▼           │
//! │                        RgbaImage         │
//! └──────────────────────────────────────────┘
//! ```

pub mod backend;
pub mod fonts;
pub mod paint;
pub mod palette;

pub use backend::*;
