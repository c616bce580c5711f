//! Placement canvas: the active page plus the signatures placed on it
//!
//! Drag protocol:
//! - `begin_new_drag` encodes a composer payload (idle -> dragging-new)
//! - `drop_payload` captures where it landed; the payload is rasterized
//!   elsewhere and `commit_drop` turns the result into an annotation
//! - `begin_move` / `pointer_move` / `pointer_up` reposition an existing
//!   annotation (idle -> dragging-existing -> idle)

use crate::composer::TextRasterizer;
use crate::geometry::{NormRect, PixelPoint, PixelSize, clamp_origin};
use crate::page::{LoadTicket, Page, PageSet};
use crate::payload::DragPayload;
use crate::store::{AnnotationId, AnnotationStore, SignatureAnnotation};
use crate::surface::{RasterizedSignature, SignatureRenderer, probe_natural_size};
use crate::types::*;

/// Reposition drag in progress
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveDrag {
    pub id: AnnotationId,
    /// Pointer offset inside the annotation box, fixed for the whole drag
    pub grab_offset: PixelPoint,
    pub container: PixelSize,
    pub size: PixelSize,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    /// Encoded payload travelling from the composer
    DraggingNew(String),
    DraggingExisting(MoveDrag),
}

/// A drop that is waiting for its payload to be rasterized
#[derive(Debug, Clone, PartialEq)]
pub struct PendingDrop {
    pub payload: DragPayload,
    pub page: usize,
    /// Drop point relative to the rendered page's top-left corner
    pub point: PixelPoint,
    /// Size the page was rendered at when the drop happened
    pub view: PixelSize,
    pub generation: u64,
}

#[derive(Debug, Default)]
pub struct PlacementCanvas {
    pages: PageSet,
    annotations: AnnotationStore,
    drag: DragState,
    editing: Option<AnnotationId>,
}

impl PlacementCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pages(&self) -> &PageSet {
        &self.pages
    }

    pub fn annotations(&self) -> &AnnotationStore {
        &self.annotations
    }

    pub fn drag_state(&self) -> &DragState {
        &self.drag
    }

    pub fn editing(&self) -> Option<AnnotationId> {
        self.editing
    }

    pub fn active_page(&self) -> Option<&Page> {
        self.pages.active()
    }

    // ---------------------------------------------------------------------
    // Document lifecycle
    // ---------------------------------------------------------------------

    pub fn begin_load(&mut self) -> LoadTicket {
        self.pages.begin_load()
    }

    /// Install the pages of a newly loaded document.
    ///
    /// Annotations of the previous document are dropped with it. A stale
    /// ticket leaves everything untouched and returns `false`.
    pub fn install_pages(&mut self, ticket: LoadTicket, pages: Vec<Page>) -> bool {
        if !self.pages.install(ticket, pages) {
            return false;
        }
        self.annotations.clear();
        self.editing = None;
        self.drag = DragState::Idle;
        true
    }

    /// Record a failed load; the canvas falls back to showing no document
    pub fn fail_load(&mut self, ticket: LoadTicket) -> bool {
        if !self.pages.clear(ticket) {
            return false;
        }
        self.annotations.clear();
        self.editing = None;
        self.drag = DragState::Idle;
        true
    }

    /// Thumbnail selection
    pub fn select_page(&mut self, index: usize) -> Result<()> {
        self.pages.select(index)?;
        self.drag = DragState::Idle;
        self.editing = None;
        Ok(())
    }

    /// Annotations drawn on the active page
    pub fn visible_annotations(&self) -> impl Iterator<Item = &SignatureAnnotation> {
        self.annotations.on_page(self.pages.active_index())
    }

    // ---------------------------------------------------------------------
    // New signatures
    // ---------------------------------------------------------------------

    pub fn begin_new_drag(&mut self, payload: &DragPayload) -> Result<()> {
        self.drag = DragState::DraggingNew(payload.encode()?);
        Ok(())
    }

    /// Abandon a new-signature drag released outside the page
    pub fn cancel_new_drag(&mut self) {
        if matches!(self.drag, DragState::DraggingNew(_)) {
            self.drag = DragState::Idle;
        }
    }

    /// Accept a drop at `point` on the active page rendered at `view` size.
    ///
    /// Returns to idle in every case.
    pub fn drop_payload(&mut self, point: PixelPoint, view: PixelSize) -> Result<PendingDrop> {
        let DragState::DraggingNew(encoded) = std::mem::take(&mut self.drag) else {
            return Err(SignError::InvalidDragState("no signature is being dragged"));
        };
        let page = self
            .pages
            .active()
            .ok_or(SignError::NoSuchPage(self.pages.active_index()))?
            .index;
        if view.is_empty() {
            return Err(SignError::InvalidDragState("page has not been rendered"));
        }

        Ok(PendingDrop {
            payload: DragPayload::decode(&encoded)?,
            page,
            point,
            view,
            generation: self.pages.generation(),
        })
    }

    /// Place a rasterized drop. Returns the new annotation's id.
    pub fn commit_drop(&mut self, pending: PendingDrop, raster: RasterizedSignature) -> Result<AnnotationId> {
        if pending.generation != self.pages.generation() {
            return Err(SignError::StaleDocument);
        }
        if self.pages.get(pending.page).is_none() {
            return Err(SignError::NoSuchPage(pending.page));
        }

        let size = probe_natural_size(&raster.png)?;
        let rect = NormRect::from_pixels(pending.point, size, pending.view);
        let annotation = SignatureAnnotation::new(
            pending.page,
            raster.image,
            raster.png,
            rect,
            pending.payload.opacity(),
        );
        let id = self.annotations.insert(annotation);
        log::info!(
            "Placed signature {} on page {} at ({:.3}, {:.3})",
            id,
            pending.page + 1,
            rect.x,
            rect.y
        );
        Ok(id)
    }

    /// Drop, rasterize and place in one go
    pub async fn drop_and_place<T: TextRasterizer>(
        &mut self,
        point: PixelPoint,
        view: PixelSize,
        renderer: &SignatureRenderer<T>,
    ) -> Result<AnnotationId> {
        let pending = self.drop_payload(point, view)?;
        let raster = renderer.render(&pending.payload).await?;
        self.commit_drop(pending, raster)
    }

    // ---------------------------------------------------------------------
    // Repositioning
    // ---------------------------------------------------------------------

    /// Start dragging annotation `id` grabbed at `pointer` (container pixels)
    pub fn begin_move(&mut self, id: AnnotationId, pointer: PixelPoint, container: PixelSize) -> Result<()> {
        let annotation = self
            .annotations
            .get(id)
            .filter(|a| a.page == self.pages.active_index())
            .ok_or(SignError::NoSuchAnnotation(id))?;
        if container.is_empty() {
            return Err(SignError::InvalidDragState("page has not been rendered"));
        }

        let origin = annotation.rect.origin_px(container);
        self.drag = DragState::DraggingExisting(MoveDrag {
            id,
            grab_offset: pointer.offset_from(origin),
            container,
            size: annotation.rect.size_px(container),
        });
        Ok(())
    }

    /// Follow the pointer during a reposition drag.
    ///
    /// Returns the annotation's new normalized box, or `None` when no
    /// reposition drag is active.
    pub fn pointer_move(&mut self, pointer: PixelPoint) -> Option<NormRect> {
        let DragState::DraggingExisting(drag) = self.drag else {
            return None;
        };

        let origin = clamp_origin(pointer.offset_from(drag.grab_offset), drag.size, drag.container);
        let x = origin.x / drag.container.width;
        let y = origin.y / drag.container.height;
        if !self.annotations.move_to(drag.id, x, y) {
            self.drag = DragState::Idle;
            return None;
        }
        self.annotations.get(drag.id).map(|a| a.rect)
    }

    /// Pointer released; ends any drag. Returns whether a drag was active.
    pub fn pointer_up(&mut self) -> bool {
        !matches!(std::mem::take(&mut self.drag), DragState::Idle)
    }

    // ---------------------------------------------------------------------
    // Selection
    // ---------------------------------------------------------------------

    pub fn click_annotation(&mut self, id: AnnotationId) {
        if self.annotations.contains(id) {
            self.editing = Some(id);
        }
    }

    pub fn click_background(&mut self) {
        self.editing = None;
    }

    /// Remove an annotation. Unknown ids are ignored.
    pub fn delete(&mut self, id: AnnotationId) -> bool {
        if self.editing == Some(id) {
            self.editing = None;
        }
        if matches!(self.drag, DragState::DraggingExisting(drag) if drag.id == id) {
            self.drag = DragState::Idle;
        }
        self.annotations.remove(id)
    }
}
