//! Signature composer - the not-yet-placed candidate signature
//!
//! Typed and drawn drafts live side by side; switching modes never discards
//! the other mode's work.

mod drawn;
mod typed;

pub use drawn::{PenStroke, StrokeCanvas};
pub use typed::{FontLibrary, FontdueRasterizer, TextRasterizer, TypedStyle, render_text};

use crate::constants::*;
use crate::geometry::PixelPoint;
use crate::payload::{DragPayload, DrawnImage};
use crate::types::*;
use image::RgbaImage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComposerMode {
    #[default]
    Typed,
    Drawn,
}

#[derive(Debug, Clone)]
pub struct Composer {
    mode: ComposerMode,
    style: TypedStyle,
    canvas: StrokeCanvas,
    generated: Option<RgbaImage>,
}

impl Default for Composer {
    fn default() -> Self {
        Self::new()
    }
}

impl Composer {
    pub fn new() -> Self {
        let (width, height) = DRAW_SURFACE_SIZE;
        Self {
            mode: ComposerMode::default(),
            style: TypedStyle::default(),
            canvas: StrokeCanvas::new(width, height),
            generated: None,
        }
    }

    pub fn mode(&self) -> ComposerMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: ComposerMode) {
        self.mode = mode;
    }

    /// Typed style; size, color and opacity also apply to drawn signatures
    pub fn style(&self) -> &TypedStyle {
        &self.style
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.style.text = text.into();
    }

    pub fn set_font(&mut self, font: ScriptFont) {
        self.style.font = font;
    }

    pub fn set_font_size(&mut self, size: f32) {
        self.style.font_size = size.clamp(FONT_SIZE_MIN, FONT_SIZE_MAX);
    }

    /// Pen and text color. A generated drawing is invalidated since it was
    /// painted with the previous color.
    pub fn set_color(&mut self, color: Rgb) {
        if self.style.color != color {
            self.style.color = color;
            self.generated = None;
        }
    }

    pub fn set_opacity(&mut self, opacity: f32) {
        self.style.opacity = opacity.clamp(OPACITY_MIN, OPACITY_MAX);
    }

    pub fn strokes(&self) -> &StrokeCanvas {
        &self.canvas
    }

    pub fn begin_stroke(&mut self, point: PixelPoint) {
        self.canvas.begin_stroke(point);
        self.generated = None;
    }

    pub fn extend_stroke(&mut self, point: PixelPoint) {
        if self.canvas.extend_stroke(point) {
            self.generated = None;
        }
    }

    pub fn end_stroke(&mut self) {
        self.canvas.end_stroke();
    }

    pub fn clear_drawing(&mut self) {
        self.canvas.clear();
        self.generated = None;
    }

    /// Rasterize the current strokes
    pub fn generate(&mut self) -> Result<&RgbaImage> {
        if self.canvas.is_empty() {
            return Err(SignError::EmptySignature);
        }
        let image = self.canvas.rasterize(self.style.color)?;
        Ok(self.generated.insert(image))
    }

    pub fn generated(&self) -> Option<&RgbaImage> {
        self.generated.as_ref()
    }

    /// Build the payload for a drag leaving the composer.
    ///
    /// In drawn mode the strokes are rasterized now if nothing has been
    /// generated since the last change.
    pub fn drag_payload(&mut self) -> Result<DragPayload> {
        match self.mode {
            ComposerMode::Typed => {
                if self.style.text.trim().is_empty() {
                    return Err(SignError::EmptySignature);
                }
                Ok(DragPayload::Typed(self.style.clone()))
            }
            ComposerMode::Drawn => {
                if self.generated.is_none() {
                    self.generate()?;
                }
                let image = self.generated.as_ref().ok_or(SignError::EmptySignature)?;
                let drawn = DrawnImage::from_image(
                    image,
                    self.style.font_size * DRAWN_WIDTH_PER_FONT_PX,
                    self.style.opacity,
                )?;
                Ok(DragPayload::Drawn(drawn))
            }
        }
    }
}
