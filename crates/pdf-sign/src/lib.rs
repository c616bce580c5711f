//! PDF e-signature core: page rasterization, signature composition,
//! drag-and-drop placement and export to a signing backend.

pub mod canvas;
pub mod composer;
pub mod constants;
pub mod export;
pub mod geometry;
mod options;
pub mod page;
pub mod payload;
pub mod session;
pub mod store;
pub mod surface;
mod types;

pub use canvas::{DragState, MoveDrag, PendingDrop, PlacementCanvas};
pub use composer::{
    Composer, ComposerMode, FontLibrary, FontdueRasterizer, StrokeCanvas, TextRasterizer, TypedStyle,
};
pub use export::{ExportGateway, Placement, SignRequest};
pub use geometry::{NormRect, PixelPoint, PixelSize};
pub use options::SignerConfig;
pub use page::{LoadTicket, Page, PageRasterizer, PageSet, RenderedPage, rasterize_document};
pub use payload::{DragPayload, DrawnImage};
pub use session::{DocumentRef, Session, SessionState};
pub use store::{AnnotationId, AnnotationStore, SignatureAnnotation};
pub use surface::{RasterizedSignature, SignatureRenderer, SurfaceRegistry, probe_natural_size};
pub use types::*;
