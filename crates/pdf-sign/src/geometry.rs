//! Pixel and normalized coordinates
//!
//! Annotations are stored as fractions of the page's rendered size. Pixel
//! positions only exist transiently, derived from whatever size the page is
//! currently drawn at.

use serde::{Deserialize, Serialize};

/// Position in page-local (or container-local) pixels, origin top-left
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelPoint {
    pub x: f32,
    pub y: f32,
}

impl PixelPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn offset_from(self, origin: PixelPoint) -> PixelPoint {
        PixelPoint::new(self.x - origin.x, self.y - origin.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelSize {
    pub width: f32,
    pub height: f32,
}

impl PixelSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// Box expressed as fractions of the page width and height, top-left anchor
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NormRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl NormRect {
    /// Convert a pixel box on a page of size `page` into normalized form.
    ///
    /// The size is capped at the page size and the origin is then clamped so
    /// the whole box stays on the page.
    pub fn from_pixels(origin: PixelPoint, size: PixelSize, page: PixelSize) -> Self {
        let width = (size.width / page.width).clamp(0.0, 1.0);
        let height = (size.height / page.height).clamp(0.0, 1.0);
        let x = (origin.x / page.width).clamp(0.0, 1.0 - width);
        let y = (origin.y / page.height).clamp(0.0, 1.0 - height);
        Self { x, y, width, height }
    }

    pub fn origin_px(&self, page: PixelSize) -> PixelPoint {
        PixelPoint::new(self.x * page.width, self.y * page.height)
    }

    pub fn size_px(&self, page: PixelSize) -> PixelSize {
        PixelSize::new(self.width * page.width, self.height * page.height)
    }

    pub fn contains_px(&self, point: PixelPoint, page: PixelSize) -> bool {
        let origin = self.origin_px(page);
        let size = self.size_px(page);
        point.x >= origin.x
            && point.y >= origin.y
            && point.x <= origin.x + size.width
            && point.y <= origin.y + size.height
    }

    pub fn is_within_unit(&self) -> bool {
        let unit = 0.0..=1.0;
        unit.contains(&self.x)
            && unit.contains(&self.y)
            && unit.contains(&self.width)
            && unit.contains(&self.height)
            && self.x + self.width <= 1.0 + f32::EPSILON
            && self.y + self.height <= 1.0 + f32::EPSILON
    }
}

/// Clamp a top-left origin so a box of `item` size stays inside `container`.
///
/// Lower bound 0, upper bound `container - item`; an item larger than the
/// container is pinned to 0.
pub fn clamp_origin(origin: PixelPoint, item: PixelSize, container: PixelSize) -> PixelPoint {
    let max_x = (container.width - item.width).max(0.0);
    let max_y = (container.height - item.height).max(0.0);
    PixelPoint::new(origin.x.clamp(0.0, max_x), origin.y.clamp(0.0, max_y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_pins_oversized_item_to_origin() {
        let clamped = clamp_origin(
            PixelPoint::new(30.0, -5.0),
            PixelSize::new(500.0, 10.0),
            PixelSize::new(400.0, 300.0),
        );
        assert_eq!(clamped, PixelPoint::new(0.0, 0.0));
    }

    #[test]
    fn from_pixels_caps_size_to_page() {
        let rect = NormRect::from_pixels(
            PixelPoint::new(10.0, 10.0),
            PixelSize::new(1200.0, 50.0),
            PixelSize::new(800.0, 1000.0),
        );
        assert_eq!(rect.width, 1.0);
        assert_eq!(rect.x, 0.0);
        assert!(rect.is_within_unit());
    }
}
