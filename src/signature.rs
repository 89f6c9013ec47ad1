//! Freehand signature capture on a fixed-aspect raster surface.

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use tracing::warn;

use crate::artifact::ImageArtifact;

/// Ink color, the slate the report renders signatures in (`#0f172a`).
pub const INK_RGBA: [u8; 4] = [0x0f, 0x17, 0x2a, 0xff];
/// Stroke width in logical pixels.
pub const STROKE_WIDTH: f32 = 2.0;

/// One point in the surface's logical coordinate space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// Offset from the surface's left edge.
    pub x: f32,
    /// Offset from the surface's top edge.
    pub y: f32,
}

/// Persistent raster surface accumulating pen strokes.
///
/// The buffer holds the complete drawing, not a stroke log: every emitted
/// artifact reflects all strokes so far, never a single stroke in isolation.
/// Consumers only ever see the current complete signature, or absent.
pub struct SignatureSurface {
    width: u32,
    height: u32,
    scale: f32,
    pixels: Vec<u8>,
    stroke_cursor: Option<Point>,
    empty: bool,
}

impl SignatureSurface {
    /// Creates an empty surface of `width`×`height` logical pixels, scaled by
    /// the device pixel ratio so strokes stay crisp on dense displays.
    pub fn new(width: u32, height: u32, device_pixel_ratio: f32) -> Self {
        let scale = if device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            1.0
        };
        let device_width = ((width as f32 * scale).round() as u32).max(1);
        let device_height = ((height as f32 * scale).round() as u32).max(1);
        Self {
            width: device_width,
            height: device_height,
            scale,
            pixels: vec![0; (device_width * device_height * 4) as usize],
            stroke_cursor: None,
            empty: true,
        }
    }

    /// Creates a surface with `base` rendered as the bottom layer, scaled to
    /// the surface, so further strokes extend the prior drawing.
    pub fn with_base(
        width: u32,
        height: u32,
        device_pixel_ratio: f32,
        base: &ImageArtifact,
    ) -> Self {
        let mut surface = Self::new(width, height, device_pixel_ratio);
        let decoded = base
            .decode_bytes()
            .and_then(|bytes| image::load_from_memory(&bytes).ok());
        match decoded {
            Some(img) => {
                let img = image::imageops::resize(
                    &img.to_rgba8(),
                    surface.width,
                    surface.height,
                    image::imageops::FilterType::Triangle,
                );
                surface.pixels.copy_from_slice(img.as_raw());
                surface.empty = false;
            }
            None => warn!("undecodable signature base, starting blank"),
        }
        surface
    }

    /// Raster dimensions in device pixels.
    pub fn raster_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// True until ink has been laid (or a base layer rendered).
    pub fn is_empty(&self) -> bool {
        self.empty
    }

    /// Starts a stroke at `p`. An already-active stroke is restarted.
    pub fn begin_stroke(&mut self, p: Point) {
        self.stroke_cursor = Some(p);
    }

    /// Extends the active stroke to `p`, rendering the segment into the
    /// buffer immediately. No-op when no stroke is active.
    pub fn extend_stroke(&mut self, p: Point) {
        let Some(from) = self.stroke_cursor else {
            return;
        };
        self.draw_segment(from, p);
        self.stroke_cursor = Some(p);
        self.empty = false;
    }

    /// Ends the active stroke and emits the full accumulated drawing.
    ///
    /// Returns `None` when no stroke was active, or when the buffer holds no
    /// ink at all.
    pub fn end_stroke(&mut self) -> Option<ImageArtifact> {
        self.stroke_cursor.take()?;
        self.artifact()
    }

    /// Wipes the buffer and marks the surface empty; the emitted artifact
    /// becomes absent.
    pub fn clear(&mut self) {
        self.pixels.fill(0);
        self.stroke_cursor = None;
        self.empty = true;
    }

    /// The current complete signature as a lossless artifact, or `None` when
    /// the surface is empty.
    pub fn artifact(&self) -> Option<ImageArtifact> {
        if self.empty {
            return None;
        }
        self.encode_png()
    }

    fn encode_png(&self) -> Option<ImageArtifact> {
        let mut encoded = Vec::new();
        if let Err(err) = PngEncoder::new(&mut encoded).write_image(
            &self.pixels,
            self.width,
            self.height,
            ExtendedColorType::Rgba8,
        ) {
            warn!(err = %err, "signature raster encode failed");
            return None;
        }
        Some(ImageArtifact::png(&encoded))
    }

    fn draw_segment(&mut self, from: Point, to: Point) {
        let x0 = from.x * self.scale;
        let y0 = from.y * self.scale;
        let x1 = to.x * self.scale;
        let y1 = to.y * self.scale;
        let radius = STROKE_WIDTH * self.scale / 2.0;

        let dx = x1 - x0;
        let dy = y1 - y0;
        let length = (dx * dx + dy * dy).sqrt();
        // Stamp round discs at sub-pixel steps; caps and joins come out round.
        let steps = (length / 0.5).ceil().max(1.0) as u32;
        for step in 0..=steps {
            let t = step as f32 / steps as f32;
            self.stamp_disc(x0 + dx * t, y0 + dy * t, radius);
        }
    }

    fn stamp_disc(&mut self, cx: f32, cy: f32, radius: f32) {
        let r = radius.max(0.5);
        let min_x = ((cx - r).floor().max(0.0)) as u32;
        let min_y = ((cy - r).floor().max(0.0)) as u32;
        let max_x = ((cx + r).ceil().max(0.0) as u32).min(self.width.saturating_sub(1));
        let max_y = ((cy + r).ceil().max(0.0) as u32).min(self.height.saturating_sub(1));

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                if dx * dx + dy * dy <= r * r {
                    let idx = ((y * self.width + x) * 4) as usize;
                    self.pixels[idx..idx + 4].copy_from_slice(&INK_RGBA);
                }
            }
        }
    }
}
