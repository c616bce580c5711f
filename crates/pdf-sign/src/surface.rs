//! Off-screen rendering of drag payloads
//!
//! Each render composites onto a temporary surface acquired as a guard. The
//! guard owns the surface's pixels and is released when it drops, whether
//! rendering succeeded or not.

use crate::composer::TextRasterizer;
use crate::constants::SURFACE_PADDING_PX;
use crate::geometry::PixelSize;
use crate::payload::{DragPayload, DrawnImage, encode_png};
use crate::types::*;
use image::imageops::{self, FilterType};
use image::RgbaImage;
use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

/// Tracks render surfaces currently alive
#[derive(Debug, Default)]
pub struct SurfaceRegistry {
    active: AtomicUsize,
    next_id: AtomicU64,
}

impl SurfaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire(&self) -> RenderSurface<'_> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.active.fetch_add(1, Ordering::SeqCst);
        log::debug!("Acquired render surface {}", id);
        RenderSurface {
            registry: self,
            id,
            pixels: RgbaImage::new(0, 0),
        }
    }

    /// Number of surfaces not yet released
    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }
}

/// Invisible surface a single payload is rendered on
pub struct RenderSurface<'a> {
    registry: &'a SurfaceRegistry,
    id: u64,
    pixels: RgbaImage,
}

impl RenderSurface<'_> {
    /// Resize the surface to fit `content` plus `padding` transparent pixels
    /// on every side, then draw `content` onto it
    pub fn paint(&mut self, content: &RgbaImage, padding: u32) {
        let mut pixels = RgbaImage::new(content.width() + 2 * padding, content.height() + 2 * padding);
        imageops::overlay(&mut pixels, content, padding as i64, padding as i64);
        self.pixels = pixels;
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// Hand out the rendered pixels and release the surface
    pub fn into_image(mut self) -> RgbaImage {
        std::mem::replace(&mut self.pixels, RgbaImage::new(0, 0))
    }
}

impl Drop for RenderSurface<'_> {
    fn drop(&mut self) {
        self.registry.active.fetch_sub(1, Ordering::SeqCst);
        log::debug!("Released render surface {}", self.id);
    }
}

/// A rendered signature ready to be placed
#[derive(Debug, Clone)]
pub struct RasterizedSignature {
    pub image: Arc<RgbaImage>,
    pub png: Arc<Vec<u8>>,
}

pub struct SignatureRenderer<T> {
    text: T,
    surfaces: SurfaceRegistry,
    scale: f32,
    timeout: Duration,
}

impl<T: TextRasterizer> SignatureRenderer<T> {
    pub fn new(text: T, scale: f32, timeout: Duration) -> Self {
        Self {
            text,
            surfaces: SurfaceRegistry::new(),
            scale,
            timeout,
        }
    }

    pub fn surfaces(&self) -> &SurfaceRegistry {
        &self.surfaces
    }

    /// Render a payload at the configured scale.
    ///
    /// Waits for fonts (and, for drawn payloads, for the image to decode);
    /// either wait exceeding the timeout fails the render.
    pub async fn render(&self, payload: &DragPayload) -> Result<RasterizedSignature> {
        let mut surface = self.surfaces.acquire();

        tokio::time::timeout(self.timeout, self.text.fonts_ready())
            .await
            .map_err(|_| {
                SignError::Rasterization(format!("fonts not ready after {:?}", self.timeout))
            })??;

        match payload {
            DragPayload::Typed(style) => {
                if style.text.trim().is_empty() {
                    return Err(SignError::EmptySignature);
                }
                // Text layout already pads for glyph overhang
                surface.paint(&self.text.rasterize_text(style, self.scale)?, 0);
            }
            DragPayload::Drawn(drawn) => {
                let decoded = tokio::time::timeout(self.timeout, decode_drawn(drawn.clone()))
                    .await
                    .map_err(|_| {
                        SignError::Rasterization(format!(
                            "signature image not decoded after {:?}",
                            self.timeout
                        ))
                    })??;
                lay_out_drawn(&mut surface, &decoded, drawn.width_px, self.scale);
            }
        }

        let image = surface.into_image();
        let png = encode_png(&image)?;
        Ok(RasterizedSignature {
            image: Arc::new(image),
            png: Arc::new(png),
        })
    }
}

async fn decode_drawn(drawn: DrawnImage) -> Result<RgbaImage> {
    tokio::task::spawn_blocking(move || drawn.decode()).await?
}

/// Scale a drawn image to `width_px * scale` wide and paint it with the same
/// padding as typed text
fn lay_out_drawn(surface: &mut RenderSurface<'_>, image: &RgbaImage, width_px: f32, scale: f32) {
    let target_width = (width_px * scale).round().max(1.0) as u32;
    let aspect = image.height() as f32 / image.width().max(1) as f32;
    let target_height = (target_width as f32 * aspect).round().max(1.0) as u32;
    let resized = imageops::resize(image, target_width, target_height, FilterType::Triangle);

    surface.paint(&resized, (SURFACE_PADDING_PX * scale).round() as u32);
}

/// Natural pixel size of an encoded signature, read from its PNG header
pub fn probe_natural_size(png: &[u8]) -> Result<PixelSize> {
    let (width, height) =
        image::ImageReader::with_format(Cursor::new(png), image::ImageFormat::Png).into_dimensions()?;
    Ok(PixelSize::new(width as f32, height as f32))
}
