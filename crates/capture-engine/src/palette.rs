//! Fixed colors of the slide design.

use image::Rgba;

pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const BRAND_50: Rgba<u8> = Rgba([240, 249, 255, 255]);
pub const BRAND_300: Rgba<u8> = Rgba([125, 211, 252, 255]);
pub const BRAND_600: Rgba<u8> = Rgba([2, 132, 199, 255]);
pub const BRAND_700: Rgba<u8> = Rgba([3, 105, 161, 255]);
pub const BRAND_800: Rgba<u8> = Rgba([7, 89, 133, 255]);
pub const BRAND_900: Rgba<u8> = Rgba([12, 74, 110, 255]);
pub const ACCENT_GOLD: Rgba<u8> = Rgba([251, 191, 36, 255]);
pub const ACCENT_RED: Rgba<u8> = Rgba([220, 38, 38, 255]);
pub const RED_400: Rgba<u8> = Rgba([248, 113, 113, 255]);
pub const WHATSAPP: Rgba<u8> = Rgba([37, 211, 102, 255]);
pub const GRAY_50: Rgba<u8> = Rgba([249, 250, 251, 255]);
pub const GRAY_100: Rgba<u8> = Rgba([243, 244, 246, 255]);
pub const GRAY_200: Rgba<u8> = Rgba([229, 231, 235, 255]);
pub const GRAY_400: Rgba<u8> = Rgba([156, 163, 175, 255]);
pub const GRAY_500: Rgba<u8> = Rgba([107, 114, 128, 255]);
pub const GRAY_600: Rgba<u8> = Rgba([75, 85, 99, 255]);
pub const GRAY_800: Rgba<u8> = Rgba([31, 41, 55, 255]);

/// Opaque color from an sRGB triple.
pub fn rgb(triple: [u8; 3]) -> Rgba<u8> {
    Rgba([triple[0], triple[1], triple[2], 255])
}

/// Linear blend of two opaque colors, `t` in `[0, 1]`.
pub fn mix(a: Rgba<u8>, b: Rgba<u8>, t: f32) -> Rgba<u8> {
    let t = t.clamp(0.0, 1.0);
    let channel = |i: usize| (a.0[i] as f32 + (b.0[i] as f32 - a.0[i] as f32) * t).round() as u8;
    Rgba([channel(0), channel(1), channel(2), 255])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mix_endpoints() {
        assert_eq!(mix(WHITE, BRAND_900, 0.0), WHITE);
        assert_eq!(mix(WHITE, BRAND_900, 1.0), BRAND_900);
        assert_eq!(mix(WHITE, BRAND_900, 7.0), BRAND_900);
    }

    #[test]
    fn test_mix_midpoint() {
        let mid = mix(Rgba([0, 0, 0, 255]), Rgba([200, 100, 50, 255]), 0.5);
        assert_eq!(mid, Rgba([100, 50, 25, 255]));
    }
}
