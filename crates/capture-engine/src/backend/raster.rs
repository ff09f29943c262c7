//! Software rasteriser for layout nodes.
//!
//! Draws the slide design (header band, offer card or CTA block, footer
//! band) with `imageproc` primitives. Text is drawn left-to-right without
//! shaping; when no font is available only the shapes are drawn.

use std::sync::Arc;

use ab_glyph::FontArc;
use image::RgbaImage;

use carelab_catalog::catalog::PackageRecord;
use carelab_catalog::layout::{CallToActionCopy, LayoutNode, NodeContent, NodeFooter};
use carelab_common::config::RenderDefaults;
use carelab_common::error::{CarelabError, CarelabResult};

use super::{CaptureAdapter, CaptureOptions};
use crate::fonts::resolve_font;
use crate::paint::{Align, Painter};
use crate::palette::*;

/// Capture backend that rasterises nodes in-process.
#[derive(Clone)]
pub struct RasterCapture {
    font: Option<Arc<FontArc>>,
}

impl RasterCapture {
    /// Backend drawing text with `font`, or shapes only when `None`.
    pub fn new(font: Option<FontArc>) -> Self {
        Self {
            font: font.map(Arc::new),
        }
    }

    /// Backend using the configured font or the first system font found.
    pub fn from_config(render: &RenderDefaults) -> CarelabResult<Self> {
        match resolve_font(render.font_path.as_deref())? {
            Some((path, font)) => {
                tracing::info!(font = %path.display(), "Raster capture font loaded");
                Ok(Self {
                    font: Some(Arc::new(font)),
                })
            }
            None => {
                tracing::warn!("No usable font found; captures will contain shapes only");
                Ok(Self::new(None))
            }
        }
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }
}

#[async_trait::async_trait]
impl CaptureAdapter for RasterCapture {
    async fn capture(
        &self,
        node: &LayoutNode,
        options: &CaptureOptions,
    ) -> CarelabResult<RgbaImage> {
        options.validate()?;

        let node = node.clone();
        let options = *options;
        let font = self.font.clone();
        let position = node.position;

        let started = std::time::Instant::now();
        let image = tokio::task::spawn_blocking(move || {
            render_node(&node, &options, font.as_deref())
        })
        .await
        .map_err(|e| {
            CarelabError::capture(format!("Capture task for node {position} failed: {e}"))
        })?;

        tracing::debug!(
            node = position,
            width = image.width(),
            height = image.height(),
            elapsed_ms = started.elapsed().as_millis(),
            "Captured node"
        );
        Ok(image)
    }

    fn name(&self) -> &str {
        "raster"
    }
}

/// Rasterise a node synchronously.
pub fn render_node(
    node: &LayoutNode,
    options: &CaptureOptions,
    font: Option<&FontArc>,
) -> RgbaImage {
    let (w, h) = node.target.size();
    let (w, h) = (w as f32, h as f32);
    let mut painter = Painter::new(
        node.target.size().0,
        node.target.size().1,
        options.scale,
        options.background,
        font,
    );

    let header_h = h * 0.15;
    let footer_h = h * 0.11;
    draw_header(&mut painter, node, w, header_h);
    draw_footer(&mut painter, &node.footer, w, h - footer_h, footer_h);

    let body_top = header_h + h * 0.02;
    let body_h = h - footer_h - body_top - h * 0.02;
    match &node.content {
        NodeContent::Package(package) => {
            draw_offer_card(
                &mut painter,
                package,
                &node.watermark,
                w * 0.07,
                body_top,
                w * 0.86,
                body_h,
            );
        }
        NodeContent::CallToAction(copy) => {
            draw_call_to_action(&mut painter, copy, w, body_top, body_h);
        }
    }

    painter.finish()
}

fn draw_header(painter: &mut Painter<'_>, node: &LayoutNode, w: f32, h: f32) {
    painter.fill_vertical_gradient(0.0, 0.0, w, h, BRAND_900, BRAND_700);
    // rounded bottom edge
    painter.fill_rounded_rect(0.0, h * 0.6, w, h * 0.5, h * 0.25, BRAND_700);

    let title_size = painter.fit_size(&node.header_title, h * 0.3, w * 0.9);
    match &node.header_subtitle {
        Some(subtitle) => {
            painter.text(&node.header_title, w / 2.0, h * 0.16, title_size, Align::Center, WHITE);
            let size = painter.fit_size(subtitle, h * 0.2, w * 0.9);
            painter.text(subtitle, w / 2.0, h * 0.56, size, Align::Center, ACCENT_GOLD);
        }
        None => {
            painter.text(&node.header_title, w / 2.0, h * 0.32, title_size, Align::Center, WHITE);
        }
    }
}

fn draw_footer(painter: &mut Painter<'_>, footer: &NodeFooter, w: f32, y: f32, h: f32) {
    painter.fill_rect(0.0, y, w, h, GRAY_100);
    painter.fill_rect(0.0, y, w, (h * 0.02).max(1.0), GRAY_200);

    match footer {
        NodeFooter::Contact {
            phone_label,
            phone,
            address_label,
            address,
        } => {
            let badge_r = h * 0.18;
            // phone block on the left, address block on the right
            painter.fill_circle(w * 0.08, y + h / 2.0, badge_r, BRAND_300);
            painter.text(phone_label, w * 0.14, y + h * 0.2, h * 0.2, Align::Left, BRAND_900);
            painter.text(phone, w * 0.14, y + h * 0.48, h * 0.26, Align::Left, BRAND_900);

            painter.fill_circle(w * 0.92, y + h / 2.0, badge_r, BRAND_300);
            painter.text(address_label, w * 0.86, y + h * 0.2, h * 0.2, Align::Right, BRAND_900);
            let size = painter.fit_size(address, h * 0.22, w * 0.36);
            painter.text(address, w * 0.86, y + h * 0.5, size, Align::Right, BRAND_900);
        }
        NodeFooter::Caption(text) => {
            let size = painter.fit_size(text, h * 0.28, w * 0.9);
            painter.text(text, w / 2.0, y + h * 0.34, size, Align::Center, BRAND_900);
        }
    }
}

fn draw_offer_card(
    painter: &mut Painter<'_>,
    package: &PackageRecord,
    watermark: &str,
    x: f32,
    y: f32,
    w: f32,
    h: f32,
) {
    let (start, end) = package.icon_type.gradient();
    let (start, end) = (rgb(start), rgb(end));
    let radius = w * 0.06;

    // border, then the card itself
    painter.fill_rounded_rect(x - 2.0, y - 2.0, w + 4.0, h + 4.0, radius, GRAY_200);
    painter.fill_rounded_rect(x, y, w, h, radius, WHITE);

    let head_h = h * 0.27;
    let price_h = h * 0.17;
    let body_y = y + head_h;
    let body_h = h - head_h - price_h;

    let watermark_size = painter.fit_size(watermark, w * 0.16, w * 0.9);
    painter.text(
        watermark,
        x + w / 2.0,
        body_y + body_h / 2.0 - watermark_size / 2.0,
        watermark_size,
        Align::Center,
        GRAY_100,
    );

    // card header with icon badge and title
    painter.fill_diagonal_gradient(x, y + radius, w, head_h - radius, start, end);
    painter.fill_rounded_rect(x, y, w, radius * 2.0, radius, start);
    let icon_r = head_h * 0.2;
    let icon_cy = y + head_h * 0.32;
    painter.fill_circle(x + w / 2.0, icon_cy, icon_r, mix(start, WHITE, 0.35));
    draw_medical_cross(painter, x + w / 2.0, icon_cy, icon_r * 0.55);
    let title_size = painter.fit_size(&package.title, head_h * 0.22, w * 0.9);
    painter.text(&package.title, x + w / 2.0, y + head_h * 0.6, title_size, Align::Center, WHITE);

    // discount badge in the top-left corner
    let badge = format!("خصم {}%", package.discount_percent());
    let badge_h = head_h * 0.24;
    let badge_w = w * 0.3;
    painter.fill_rounded_rect(x, y, badge_w, badge_h, badge_h * 0.3, end);
    let badge_size = painter.fit_size(&badge, badge_h * 0.55, badge_w * 0.85);
    painter.text(&badge, x + badge_w / 2.0, y + badge_h * 0.2, badge_size, Align::Center, WHITE);

    // test items, right-aligned with a check mark on the right
    if !package.items.is_empty() {
        let pad = w * 0.07;
        let row_h = ((body_h - pad) / package.items.len() as f32).min(h * 0.075);
        let text_size = row_h * 0.5;
        for (i, item) in package.items.iter().enumerate() {
            let row_y = body_y + pad * 0.6 + i as f32 * row_h;
            let check_r = text_size * 0.45;
            let check_cx = x + w - pad - check_r;
            painter.fill_circle(check_cx, row_y + row_h * 0.4, check_r, GRAY_400);
            painter.fill_circle(check_cx, row_y + row_h * 0.4, check_r * 0.5, WHITE);
            let size = painter.fit_size(item, text_size, w - pad * 3.0);
            painter.text(
                item,
                check_cx - check_r * 2.0,
                row_y + row_h * 0.15,
                size,
                Align::Right,
                GRAY_800,
            );
        }
    }

    // price footer: old price struck through on the left, new price on the right
    let price_y = y + h - price_h;
    painter.fill_rounded_rect(x, price_y, w, price_h, radius, GRAY_50);
    painter.fill_rect(x, price_y, w, price_h * 0.5, GRAY_50);
    painter.fill_rect(x, price_y, w, 1.0, GRAY_100);

    let old = format!("{} ج.م", package.old_price);
    let old_size = price_h * 0.22;
    let old_y = price_y + price_h * 0.2;
    let old_w = painter.text(&old, x + w * 0.06, old_y, old_size, Align::Left, GRAY_500);
    if old_w > 0.0 {
        let strike = (old_size * 0.1).max(1.0);
        painter.fill_rect(x + w * 0.06, old_y + old_size * 0.5, old_w, strike, RED_400);
    }
    painter.text(
        "بدلاً من",
        x + w * 0.06,
        old_y + old_size * 1.4,
        price_h * 0.17,
        Align::Left,
        GRAY_400,
    );

    let price = package.price.to_string();
    let price_size = price_h * 0.55;
    let currency_w = painter.text(
        "جنية",
        x + w * 0.94,
        price_y + price_h * 0.45,
        price_h * 0.22,
        Align::Right,
        GRAY_600,
    );
    painter.text(
        &price,
        x + w * 0.92 - currency_w,
        price_y + price_h * 0.2,
        price_size,
        Align::Right,
        end,
    );
}

fn draw_call_to_action(painter: &mut Painter<'_>, copy: &CallToActionCopy, w: f32, y: f32, h: f32) {
    let cx = w / 2.0;
    let unit = h / 20.0;

    // calendar badge
    painter.fill_circle(cx, y + unit * 2.6, unit * 2.2, BRAND_50);
    painter.fill_rounded_rect(
        cx - unit * 1.1,
        y + unit * 1.7,
        unit * 2.2,
        unit * 1.9,
        unit * 0.25,
        BRAND_600,
    );
    painter.fill_rect(cx - unit * 0.9, y + unit * 2.3, unit * 1.8, unit * 1.1, WHITE);

    let size = painter.fit_size(&copy.valid_until_label, unit * 1.3, w * 0.9);
    painter.text(&copy.valid_until_label, cx, y + unit * 5.3, size, Align::Center, BRAND_900);
    let size = painter.fit_size(&copy.offer_deadline, unit * 1.3, w * 0.9);
    painter.text(&copy.offer_deadline, cx, y + unit * 7.0, size, Align::Center, ACCENT_RED);

    let bar_y = y + unit * 8.8;
    painter.fill_vertical_gradient(cx - w * 0.2, bar_y, w * 0.4, unit * 0.25, BRAND_300, BRAND_600);

    painter.text(&copy.book_now_label, cx, y + unit * 9.6, unit * 0.9, Align::Center, GRAY_600);
    let size = painter.fit_size(&copy.phone, unit * 1.4, w * 0.8);
    painter.text(&copy.phone, cx, y + unit * 11.0, size, Align::Center, BRAND_800);

    // WhatsApp pill
    let pill_w = w * 0.7;
    let pill_h = unit * 2.0;
    let pill_y = y + unit * 13.2;
    painter.fill_rounded_rect(
        cx - pill_w / 2.0 - 3.0,
        pill_y - 3.0,
        pill_w + 6.0,
        pill_h + 6.0,
        pill_h / 2.0 + 3.0,
        WHITE,
    );
    painter.fill_rounded_rect(cx - pill_w / 2.0, pill_y, pill_w, pill_h, pill_h / 2.0, WHATSAPP);
    let size = painter.fit_size(&copy.whatsapp_label, unit * 0.9, pill_w * 0.85);
    painter.text(&copy.whatsapp_label, cx, pill_y + pill_h * 0.25, size, Align::Center, WHITE);

    let size = painter.fit_size(&copy.closing_line, unit * 0.8, w * 0.8);
    let line_y = y + unit * 17.0;
    let line_w = painter.text(&copy.closing_line, cx, line_y, size, Align::Center, GRAY_500);
    let dot_x = cx + line_w / 2.0 + unit * 0.6;
    painter.fill_circle(dot_x, line_y + size * 0.5, unit * 0.35, BRAND_600);
}

fn draw_medical_cross(painter: &mut Painter<'_>, cx: f32, cy: f32, r: f32) {
    let bar = r * 0.45;
    painter.fill_rect(cx - bar / 2.0, cy - r, bar, r * 2.0, WHITE);
    painter.fill_rect(cx - r, cy - bar / 2.0, r * 2.0, bar, WHITE);
}

#[cfg(test)]
mod tests {
    use super::*;
    use carelab_catalog::catalog::Catalog;
    use carelab_catalog::layout::{layout_nodes_with_year, LayoutTarget};

    #[test]
    fn test_render_matches_target_and_scale() {
        let catalog = Catalog::builtin();
        let nodes = layout_nodes_with_year(&catalog, LayoutTarget::PrintPage, 2025);
        let image = render_node(&nodes[0], &CaptureOptions::new(0.5), None);
        assert_eq!(image.dimensions(), (397, 562));
    }

    #[test]
    fn test_header_band_is_brand_colored() {
        let catalog = Catalog::builtin();
        let nodes = layout_nodes_with_year(&catalog, LayoutTarget::Reel, 2025);
        let image = render_node(&nodes[3], &CaptureOptions::new(0.25), None);
        assert_eq!(*image.get_pixel(2, 0), BRAND_900);
    }

    #[test]
    fn test_render_is_deterministic() {
        let catalog = Catalog::builtin();
        let nodes = layout_nodes_with_year(&catalog, LayoutTarget::Reel, 2025);
        let options = CaptureOptions::new(0.2);
        for node in [&nodes[1], nodes.last().unwrap()] {
            let a = render_node(node, &options, None);
            let b = render_node(node, &options, None);
            assert_eq!(a.as_raw(), b.as_raw());
        }
    }

    #[test]
    fn test_packages_use_their_accent() {
        let catalog = Catalog::builtin();
        let nodes = layout_nodes_with_year(&catalog, LayoutTarget::Reel, 2025);
        let options = CaptureOptions::new(0.2);
        let first = render_node(&nodes[0], &options, None);
        let second = render_node(&nodes[1], &options, None);
        assert_ne!(first.as_raw(), second.as_raw());
    }

    #[tokio::test]
    async fn test_capture_rejects_invalid_scale() {
        let catalog = Catalog::builtin();
        let nodes = layout_nodes_with_year(&catalog, LayoutTarget::Reel, 2025);
        let backend = RasterCapture::new(None);
        let err = backend
            .capture(&nodes[0], &CaptureOptions::new(-1.0))
            .await
            .unwrap_err();
        assert!(matches!(err, CarelabError::Capture { .. }));
    }

    #[tokio::test]
    async fn test_capture_runs_off_thread() {
        let catalog = Catalog::builtin();
        let nodes = layout_nodes_with_year(&catalog, LayoutTarget::Reel, 2025);
        let backend = RasterCapture::new(None);
        let image = backend
            .capture(nodes.last().unwrap(), &CaptureOptions::new(0.1))
            .await
            .unwrap();
        assert_eq!(image.dimensions(), (108, 192));
        assert!(!backend.has_font());
    }
}
