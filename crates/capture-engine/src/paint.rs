//! Drawing primitives in layout pixels.
//!
//! Callers describe shapes in the node's layout coordinates; the painter
//! multiplies by the capture scale so the same layout code serves every
//! resolution.

use ab_glyph::{FontArc, PxScale};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;

use crate::palette::mix;

/// Horizontal anchor for a line of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

pub struct Painter<'a> {
    canvas: RgbaImage,
    scale: f32,
    font: Option<&'a FontArc>,
}

impl<'a> Painter<'a> {
    /// Canvas of `width`×`height` layout pixels filled with `background`.
    pub fn new(
        width: u32,
        height: u32,
        scale: f32,
        background: Rgba<u8>,
        font: Option<&'a FontArc>,
    ) -> Self {
        let pw = ((width as f32 * scale).round() as u32).max(1);
        let ph = ((height as f32 * scale).round() as u32).max(1);
        Self {
            canvas: RgbaImage::from_pixel(pw, ph, background),
            scale,
            font,
        }
    }

    pub fn finish(self) -> RgbaImage {
        self.canvas
    }

    fn px(&self, v: f32) -> i32 {
        (v * self.scale).round() as i32
    }

    fn len(&self, v: f32) -> u32 {
        (v * self.scale).round().max(0.0) as u32
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba<u8>) {
        let (pw, ph) = (self.len(w), self.len(h));
        if pw == 0 || ph == 0 {
            return;
        }
        let rect = Rect::at(self.px(x), self.px(y)).of_size(pw, ph);
        draw_filled_rect_mut(&mut self.canvas, rect, color);
    }

    /// Rectangle with quarter-circle corners.
    pub fn fill_rounded_rect(&mut self, x: f32, y: f32, w: f32, h: f32, r: f32, color: Rgba<u8>) {
        let r = r.min(w / 2.0).min(h / 2.0).max(0.0);
        self.fill_rect(x + r, y, w - 2.0 * r, h, color);
        self.fill_rect(x, y + r, w, h - 2.0 * r, color);
        for (cx, cy) in [
            (x + r, y + r),
            (x + w - r, y + r),
            (x + r, y + h - r),
            (x + w - r, y + h - r),
        ] {
            self.fill_circle(cx, cy, r, color);
        }
    }

    /// Rectangle shaded from `start` (top-left) to `end` (bottom-right).
    pub fn fill_diagonal_gradient(
        &mut self,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        start: Rgba<u8>,
        end: Rgba<u8>,
    ) {
        let (x0, y0) = (self.px(x).max(0) as u32, self.px(y).max(0) as u32);
        let x1 = (self.px(x + w).max(0) as u32).min(self.canvas.width());
        let y1 = (self.px(y + h).max(0) as u32).min(self.canvas.height());
        if x1 <= x0 || y1 <= y0 {
            return;
        }
        let (span_x, span_y) = ((x1 - x0) as f32, (y1 - y0) as f32);
        for py in y0..y1 {
            for px in x0..x1 {
                let t = ((px - x0) as f32 / span_x + (py - y0) as f32 / span_y) / 2.0;
                self.canvas.put_pixel(px, py, mix(start, end, t));
            }
        }
    }

    /// Rectangle shaded from `top` to `bottom`.
    pub fn fill_vertical_gradient(
        &mut self,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        top: Rgba<u8>,
        bottom: Rgba<u8>,
    ) {
        let rows = self.len(h).max(1);
        let row_h = h / rows as f32;
        for row in 0..rows {
            let t = row as f32 / rows as f32;
            self.fill_rect(x, y + row as f32 * row_h, w, row_h, mix(top, bottom, t));
        }
    }

    pub fn fill_circle(&mut self, cx: f32, cy: f32, r: f32, color: Rgba<u8>) {
        let radius = self.px(r);
        if radius <= 0 {
            return;
        }
        let center = (self.px(cx), self.px(cy));
        draw_filled_circle_mut(&mut self.canvas, center, radius, color);
    }

    /// Width of `text` in layout pixels at `size`, 0 without a font.
    pub fn text_width(&self, text: &str, size: f32) -> f32 {
        match self.font {
            Some(font) => {
                let (w, _) = text_size(PxScale::from(size * self.scale), font, text);
                w as f32 / self.scale
            }
            None => 0.0,
        }
    }

    /// Largest size not above `size` at which `text` fits in `max_width`.
    pub fn fit_size(&self, text: &str, size: f32, max_width: f32) -> f32 {
        let mut size = size;
        while size > 8.0 && self.text_width(text, size) > max_width {
            size *= 0.9;
        }
        size
    }

    /// Draw one line with its top edge at `y`, anchored at `x` per `align`.
    /// Returns the layout width drawn.
    pub fn text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        size: f32,
        align: Align,
        color: Rgba<u8>,
    ) -> f32 {
        let Some(font) = self.font else {
            return 0.0;
        };
        let width = self.text_width(text, size);
        let left = match align {
            Align::Left => x,
            Align::Center => x - width / 2.0,
            Align::Right => x - width,
        };
        let (px, py) = (self.px(left), self.px(y));
        let scale = PxScale::from(size * self.scale);
        draw_text_mut(&mut self.canvas, color, px, py, scale, font, text);
        width
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::{BRAND_900, WHITE};

    #[test]
    fn test_canvas_is_scaled() {
        let painter = Painter::new(100, 50, 2.0, WHITE, None);
        let image = painter.finish();
        assert_eq!(image.dimensions(), (200, 100));
    }

    #[test]
    fn test_fill_rect_uses_scaled_coordinates() {
        let mut painter = Painter::new(100, 100, 2.0, WHITE, None);
        painter.fill_rect(10.0, 10.0, 5.0, 5.0, BRAND_900);
        let image = painter.finish();
        assert_eq!(*image.get_pixel(25, 25), BRAND_900);
        assert_eq!(*image.get_pixel(19, 19), WHITE);
        assert_eq!(*image.get_pixel(30, 30), WHITE);
    }

    #[test]
    fn test_zero_sized_rect_is_ignored() {
        let mut painter = Painter::new(10, 10, 1.0, WHITE, None);
        painter.fill_rect(2.0, 2.0, 0.0, 4.0, BRAND_900);
        assert!(painter.finish().pixels().all(|p| *p == WHITE));
    }

    #[test]
    fn test_text_without_font_is_noop() {
        let mut painter = Painter::new(10, 10, 1.0, WHITE, None);
        assert_eq!(painter.text("hello", 0.0, 0.0, 12.0, Align::Left, BRAND_900), 0.0);
        assert_eq!(painter.fit_size("hello", 40.0, 1.0), 40.0);
    }

    #[test]
    fn test_gradient_endpoints() {
        let black = Rgba([0, 0, 0, 255]);
        let mut painter = Painter::new(10, 10, 1.0, WHITE, None);
        painter.fill_diagonal_gradient(0.0, 0.0, 10.0, 10.0, black, WHITE);
        let image = painter.finish();
        assert_eq!(*image.get_pixel(0, 0), black);
        assert!(image.get_pixel(9, 9).0[0] > 200);
    }
}
