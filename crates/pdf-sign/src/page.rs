//! Page rasterization and the active-page rail
//!
//! Rendering itself is delegated to a [`PageRasterizer`]; this module keeps
//! the resulting pages, their thumbnails and which page is active, and
//! discards results from loads that have since been superseded.

use crate::geometry::PixelSize;
use crate::types::*;
use image::RgbaImage;
use std::sync::Arc;

/// Raw output of a rasterizer for one page
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Renders every page of a PDF document to RGBA
pub trait PageRasterizer: Send + Sync {
    /// Render all pages, in order, at `scale` pixels per PDF point.
    ///
    /// Implementations render one page at a time and only return once each
    /// page's raster is complete.
    fn rasterize(&self, pdf: &[u8], scale: f32) -> Result<Vec<RenderedPage>>;
}

/// A rendered page of the current document
#[derive(Debug, Clone)]
pub struct Page {
    pub index: usize,
    pub width_px: f32,
    pub height_px: f32,
    pub image: Arc<RgbaImage>,
    pub thumbnail: Arc<RgbaImage>,
}

impl Page {
    pub fn from_rendered(index: usize, rendered: RenderedPage, thumbnail_width: u32) -> Result<Self> {
        if rendered.width == 0 || rendered.height == 0 {
            return Err(SignError::DocumentLoad(format!("page {} has no area", index + 1)));
        }
        let (width, height) = (rendered.width, rendered.height);
        let image = RgbaImage::from_raw(width, height, rendered.rgba).ok_or_else(|| {
            SignError::DocumentLoad(format!("page {} raster does not match {width}x{height}", index + 1))
        })?;

        let thumb_width = thumbnail_width.min(width).max(1);
        let thumb_height = ((height as f32 * thumb_width as f32 / width as f32).round() as u32).max(1);
        let thumbnail = image::imageops::thumbnail(&image, thumb_width, thumb_height);

        Ok(Self {
            index,
            width_px: width as f32,
            height_px: height as f32,
            image: Arc::new(image),
            thumbnail: Arc::new(thumbnail),
        })
    }

    pub fn size(&self) -> PixelSize {
        PixelSize::new(self.width_px, self.height_px)
    }
}

/// Rasterize a whole document off the async executor
pub async fn rasterize_document<R>(
    rasterizer: Arc<R>,
    pdf: Vec<u8>,
    scale: f32,
    thumbnail_width: u32,
) -> Result<Vec<Page>>
where
    R: PageRasterizer + ?Sized + 'static,
{
    let pages = tokio::task::spawn_blocking(move || {
        let rendered = rasterizer.rasterize(&pdf, scale)?;
        if rendered.is_empty() {
            return Err(SignError::DocumentLoad("document has no pages".to_string()));
        }
        rendered
            .into_iter()
            .enumerate()
            .map(|(index, page)| Page::from_rendered(index, page, thumbnail_width))
            .collect::<Result<Vec<_>>>()
    })
    .await??;
    log::info!("Rasterized {} pages", pages.len());
    Ok(pages)
}

/// Identifies one document load; only the newest ticket may install pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket(pub u64);

/// Pages of the current document plus the active page
#[derive(Debug, Default)]
pub struct PageSet {
    pages: Vec<Page>,
    active: usize,
    generation: u64,
    revision: u64,
}

impl PageSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new load. Any load started earlier becomes stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        LoadTicket(self.generation)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Changes whenever the installed pages are replaced or cleared, and only
    /// then. Starting a load leaves it alone.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.0 == self.generation
    }

    /// Replace all pages with the result of a load.
    ///
    /// Returns `false` and leaves the set untouched when the ticket is stale.
    pub fn install(&mut self, ticket: LoadTicket, pages: Vec<Page>) -> bool {
        if !self.is_current(ticket) {
            log::warn!(
                "Discarding pages from stale load {} (current {})",
                ticket.0,
                self.generation
            );
            return false;
        }
        self.pages = pages;
        self.active = 0;
        self.revision += 1;
        true
    }

    /// Drop every page, e.g. after a failed load
    pub fn clear(&mut self, ticket: LoadTicket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.pages.clear();
        self.active = 0;
        self.revision += 1;
        true
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active(&self) -> Option<&Page> {
        self.pages.get(self.active)
    }

    pub fn select(&mut self, index: usize) -> Result<()> {
        if index >= self.pages.len() {
            return Err(SignError::NoSuchPage(index));
        }
        self.active = index;
        Ok(())
    }

    pub fn thumbnails(&self) -> impl Iterator<Item = (usize, &Arc<RgbaImage>)> {
        self.pages.iter().map(|page| (page.index, &page.thumbnail))
    }
}
