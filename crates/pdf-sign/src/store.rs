//! In-memory collection of placed signatures
//!
//! Every mutation builds a fresh vector and swaps the shared snapshot, so a
//! reader holding a snapshot never observes a half-applied change.

use crate::geometry::NormRect;
use image::RgbaImage;
use std::sync::Arc;

/// Unique identifier for a placed signature
pub type AnnotationId = uuid::Uuid;

/// A signature image placed on one page
#[derive(Debug, Clone)]
pub struct SignatureAnnotation {
    pub id: AnnotationId,
    pub page: usize,
    pub image: Arc<RgbaImage>,
    /// PNG encoding of `image`, sent to the backend on export
    pub png: Arc<Vec<u8>>,
    pub rect: NormRect,
    pub opacity: f32,
}

impl SignatureAnnotation {
    pub fn new(page: usize, image: Arc<RgbaImage>, png: Arc<Vec<u8>>, rect: NormRect, opacity: f32) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            page,
            image,
            png,
            rect,
            opacity,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AnnotationStore {
    items: Arc<Vec<SignatureAnnotation>>,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current contents; unaffected by later mutations
    pub fn snapshot(&self) -> Arc<Vec<SignatureAnnotation>> {
        Arc::clone(&self.items)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SignatureAnnotation> {
        self.items.iter()
    }

    pub fn get(&self, id: AnnotationId) -> Option<&SignatureAnnotation> {
        self.items.iter().find(|a| a.id == id)
    }

    pub fn contains(&self, id: AnnotationId) -> bool {
        self.get(id).is_some()
    }

    /// Annotations on `page`, in insertion order
    pub fn on_page(&self, page: usize) -> impl Iterator<Item = &SignatureAnnotation> {
        self.items.iter().filter(move |a| a.page == page)
    }

    pub fn insert(&mut self, annotation: SignatureAnnotation) -> AnnotationId {
        let id = annotation.id;
        let mut next = Vec::with_capacity(self.items.len() + 1);
        next.extend(self.items.iter().cloned());
        next.push(annotation);
        self.items = Arc::new(next);
        id
    }

    /// Move an annotation's top-left corner. Returns `false` for unknown ids.
    pub fn move_to(&mut self, id: AnnotationId, x: f32, y: f32) -> bool {
        if !self.contains(id) {
            return false;
        }
        let next = self
            .items
            .iter()
            .map(|a| {
                if a.id == id {
                    SignatureAnnotation {
                        rect: NormRect { x, y, ..a.rect },
                        ..a.clone()
                    }
                } else {
                    a.clone()
                }
            })
            .collect();
        self.items = Arc::new(next);
        true
    }

    /// Remove by id. Removing an id that is not present is a no-op.
    pub fn remove(&mut self, id: AnnotationId) -> bool {
        if !self.contains(id) {
            return false;
        }
        let next = self.items.iter().filter(|a| a.id != id).cloned().collect();
        self.items = Arc::new(next);
        true
    }

    pub fn clear(&mut self) {
        self.items = Arc::new(Vec::new());
    }
}
