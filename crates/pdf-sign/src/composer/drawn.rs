//! Freehand signatures captured as pen strokes

use crate::constants::PEN_WIDTH_PX;
use crate::geometry::PixelPoint;
use crate::types::*;
use image::{Rgba, RgbaImage};
use tiny_skia::{FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};

/// One continuous pen movement
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PenStroke {
    pub points: Vec<PixelPoint>,
}

/// Fixed-size drawing surface collecting pen strokes
#[derive(Debug, Clone)]
pub struct StrokeCanvas {
    width: u32,
    height: u32,
    strokes: Vec<PenStroke>,
    pen_down: bool,
}

impl StrokeCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            strokes: Vec::new(),
            pen_down: false,
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn strokes(&self) -> &[PenStroke] {
        &self.strokes
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.iter().all(|s| s.points.is_empty())
    }

    pub fn begin_stroke(&mut self, point: PixelPoint) {
        let point = self.clamp(point);
        self.strokes.push(PenStroke { points: vec![point] });
        self.pen_down = true;
    }

    /// Extend the stroke in progress; ignored while the pen is up
    pub fn extend_stroke(&mut self, point: PixelPoint) -> bool {
        if !self.pen_down {
            return false;
        }
        let point = self.clamp(point);
        match self.strokes.last_mut() {
            Some(stroke) => {
                stroke.points.push(point);
                true
            }
            None => false,
        }
    }

    pub fn end_stroke(&mut self) {
        self.pen_down = false;
    }

    pub fn clear(&mut self) {
        self.strokes.clear();
        self.pen_down = false;
    }

    fn clamp(&self, point: PixelPoint) -> PixelPoint {
        PixelPoint::new(
            point.x.clamp(0.0, self.width as f32),
            point.y.clamp(0.0, self.height as f32),
        )
    }

    /// Paint the strokes onto a transparent raster the size of the surface
    pub fn rasterize(&self, pen: Rgb) -> Result<RgbaImage> {
        let mut pixmap = Pixmap::new(self.width, self.height)
            .ok_or_else(|| SignError::Rasterization("drawing surface has no area".to_string()))?;

        let mut paint = Paint::default();
        paint.set_color_rgba8(pen.r, pen.g, pen.b, 255);
        paint.anti_alias = true;

        let stroke = Stroke {
            width: PEN_WIDTH_PX,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };

        for pen_stroke in &self.strokes {
            match pen_stroke.points.as_slice() {
                [] => {}
                [dot] => {
                    if let Some(path) = PathBuilder::from_circle(dot.x, dot.y, PEN_WIDTH_PX / 2.0) {
                        pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
                    }
                }
                [first, rest @ ..] => {
                    let mut builder = PathBuilder::new();
                    builder.move_to(first.x, first.y);
                    for point in rest {
                        builder.line_to(point.x, point.y);
                    }
                    if let Some(path) = builder.finish() {
                        pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
                    }
                }
            }
        }

        let mut image = RgbaImage::new(self.width, self.height);
        for (dst, src) in image.pixels_mut().zip(pixmap.pixels()) {
            let color = src.demultiply();
            *dst = Rgba([color.red(), color.green(), color.blue(), color.alpha()]);
        }
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_are_clamped_to_the_surface() {
        let mut canvas = StrokeCanvas::new(240, 120);
        canvas.begin_stroke(PixelPoint::new(-10.0, 50.0));
        canvas.extend_stroke(PixelPoint::new(300.0, 500.0));
        let points = &canvas.strokes()[0].points;
        assert_eq!(points[0], PixelPoint::new(0.0, 50.0));
        assert_eq!(points[1], PixelPoint::new(240.0, 120.0));
    }

    #[test]
    fn extend_without_pen_down_is_ignored() {
        let mut canvas = StrokeCanvas::new(240, 120);
        assert!(!canvas.extend_stroke(PixelPoint::new(1.0, 1.0)));
        assert!(canvas.is_empty());
    }

    #[test]
    fn rasterized_strokes_leave_background_transparent() {
        let mut canvas = StrokeCanvas::new(40, 20);
        canvas.begin_stroke(PixelPoint::new(5.0, 10.0));
        canvas.extend_stroke(PixelPoint::new(35.0, 10.0));
        canvas.end_stroke();

        let image = canvas.rasterize(Rgb::new(0, 0, 255)).unwrap();
        assert_eq!(image.dimensions(), (40, 20));
        assert_eq!(image.get_pixel(0, 0).0[3], 0);
        let ink = image.get_pixel(20, 10);
        assert!(ink.0[3] > 0);
        assert!(ink.0[2] > ink.0[0]);
    }
}
