//! Owned RGBA drawing surface with the few primitives composition needs

use crate::compose::layout::{CanvasSize, CellRect};
use crate::io::configuration::MAX_CANVAS_DIMENSION;
use crate::io::error::{Result, surface_unavailable};
use font8x8::{BASIC_FONTS, UnicodeFonts};
use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};

/// Pixel size of one unscaled glyph
pub const GLYPH_SIZE: u32 = 8;

/// Drawing target exclusively owned by one export
#[derive(Debug, Clone)]
pub struct Surface {
    pixels: RgbaImage,
}

impl Surface {
    /// Obtain a surface for `canvas`
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is zero or exceeds
    /// `MAX_CANVAS_DIMENSION`
    pub fn acquire(canvas: CanvasSize) -> Result<Self> {
        let CanvasSize { width, height } = canvas;
        if width == 0 || height == 0 {
            return Err(surface_unavailable(width, height, &"canvas has no area"));
        }
        if width > MAX_CANVAS_DIMENSION || height > MAX_CANVAS_DIMENSION {
            return Err(surface_unavailable(
                width,
                height,
                &format!("dimensions are limited to {MAX_CANVAS_DIMENSION} pixels"),
            ));
        }
        Ok(Self {
            pixels: RgbaImage::new(width, height),
        })
    }

    /// Surface width
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Surface height
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Read-only pixel access
    pub const fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Give up the surface and keep its pixels
    pub fn into_image(self) -> RgbaImage {
        self.pixels
    }

    /// Paint every pixel with `color`
    pub fn fill(&mut self, color: Rgba<u8>) {
        for pixel in self.pixels.pixels_mut() {
            *pixel = color;
        }
    }

    fn clip(&self, rect: CellRect) -> (u32, u32, u32, u32) {
        let x0 = rect.x.min(self.width());
        let y0 = rect.y.min(self.height());
        let x1 = rect.x.saturating_add(rect.width).min(self.width());
        let y1 = rect.y.saturating_add(rect.height).min(self.height());
        (x0, y0, x1, y1)
    }

    /// Overwrite `rect` with `color`, clipped to the surface
    pub fn fill_rect(&mut self, rect: CellRect, color: Rgba<u8>) {
        let (x0, y0, x1, y1) = self.clip(rect);
        for y in y0..y1 {
            for x in x0..x1 {
                self.pixels.put_pixel(x, y, color);
            }
        }
    }

    /// Alpha-blend `color` over `rect`, clipped to the surface
    pub fn blend_rect(&mut self, rect: CellRect, color: Rgba<u8>) {
        let (x0, y0, x1, y1) = self.clip(rect);
        for y in y0..y1 {
            for x in x0..x1 {
                self.blend_pixel(x, y, color);
            }
        }
    }

    fn blend_pixel(&mut self, x: u32, y: u32, color: Rgba<u8>) {
        if x >= self.width() || y >= self.height() {
            return;
        }
        let alpha = u32::from(color[3]);
        let dst = self.pixels.get_pixel_mut(x, y);
        for channel in 0..3 {
            let src = u32::from(color[channel]);
            let old = u32::from(dst[channel]);
            dst[channel] = ((src * alpha + old * (255 - alpha)) / 255) as u8;
        }
        dst[3] = dst[3].max(color[3]);
    }

    /// Draw `image` scaled and center-cropped to cover `rect` exactly
    pub fn draw_image_cover(&mut self, image: &DynamicImage, rect: CellRect) {
        if rect.width == 0 || rect.height == 0 {
            return;
        }
        let covered = image
            .resize_to_fill(rect.width, rect.height, FilterType::Triangle)
            .to_rgba8();
        imageops::overlay(
            &mut self.pixels,
            &covered,
            i64::from(rect.x),
            i64::from(rect.y),
        );
    }

    /// Draw `text` with its top-left corner at (`x`, `y`) using the 8x8 bitmap font
    pub fn draw_text(&mut self, x: u32, y: u32, text: &str, color: Rgba<u8>, scale: u32) {
        let scale = scale.max(1);
        let mut cursor_x = x;
        for ch in text.chars() {
            let glyph = BASIC_FONTS.get(ch).or_else(|| BASIC_FONTS.get('?'));
            if let Some(glyph) = glyph {
                for (row, &bits) in (0u32..).zip(glyph.iter()) {
                    for column in 0..GLYPH_SIZE {
                        if (bits >> column) & 1 == 0 {
                            continue;
                        }
                        let px = cursor_x + column * scale;
                        let py = y + row * scale;
                        for sy in 0..scale {
                            for sx in 0..scale {
                                self.blend_pixel(px + sx, py + sy, color);
                            }
                        }
                    }
                }
            }
            cursor_x = cursor_x.saturating_add(GLYPH_SIZE * scale);
        }
    }

    /// Draw `text` centered in `rect`, shortened with `..` if it would overflow
    pub fn draw_text_centered(&mut self, rect: CellRect, text: &str, color: Rgba<u8>, scale: u32) {
        let scale = scale.max(1);
        let fitted = fit_text(text, rect.width, scale);
        let width = text_width(&fitted, scale);
        let height = GLYPH_SIZE * scale;
        let x = rect.x + rect.width.saturating_sub(width) / 2;
        let y = rect.y + rect.height.saturating_sub(height) / 2;
        self.draw_text(x, y, &fitted, color, scale);
    }
}

/// Rendered width of `text` at `scale`
pub fn text_width(text: &str, scale: u32) -> u32 {
    let chars = u32::try_from(text.chars().count()).unwrap_or(u32::MAX);
    chars.saturating_mul(GLYPH_SIZE * scale.max(1))
}

/// Longest prefix of `text` that fits `max_width`, marked with `..` when cut
pub fn fit_text(text: &str, max_width: u32, scale: u32) -> String {
    if text_width(text, scale) <= max_width {
        return text.to_string();
    }
    let glyph = GLYPH_SIZE * scale.max(1);
    let capacity = (max_width / glyph) as usize;
    if capacity <= 2 {
        return text.chars().take(capacity).collect();
    }
    let mut fitted: String = text.chars().take(capacity - 2).collect();
    fitted.push_str("..");
    fitted
}

/// Glyph scale that keeps text legible but small relative to `rect`
pub fn text_scale_for(rect: CellRect) -> u32 {
    (rect.width.min(rect.height) / 160).clamp(1, 3)
}
