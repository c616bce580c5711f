//! Shared constants for page rendering and signature placement
//!
//! Pixel values are CSS-style logical pixels unless noted otherwise.

// =============================================================================
// Page Rendering
// =============================================================================

/// Scale applied to PDF points when rendering pages for display
pub const DISPLAY_SCALE: f32 = 0.9;

/// Width of the thumbnails shown in the page rail
pub const THUMBNAIL_WIDTH_PX: u32 = 64;

/// Canvas size used before any page has been rendered (width, height)
pub const FALLBACK_CANVAS_SIZE: (f32, f32) = (800.0, 1000.0);

// =============================================================================
// Signature Rasterization
// =============================================================================

/// Pixel density multiplier for rasterized signatures
pub const RASTER_SCALE: f32 = 2.0;

/// Transparent padding around a rendered signature, per side
pub const SURFACE_PADDING_PX: f32 = 8.0;

/// Line height of typed signatures, relative to the font size
pub const LINE_HEIGHT: f32 = 1.5;

/// A drawn signature is laid out at `font_size * DRAWN_WIDTH_PER_FONT_PX` wide
pub const DRAWN_WIDTH_PER_FONT_PX: f32 = 4.0;

/// Default upper bound on waiting for fonts and images (milliseconds)
pub const DEFAULT_RASTER_TIMEOUT_MS: u64 = 5000;

// =============================================================================
// Composer Limits
// =============================================================================

pub const FONT_SIZE_MIN: f32 = 8.0;
pub const FONT_SIZE_MAX: f32 = 72.0;
pub const FONT_SIZE_DEFAULT: f32 = 20.0;

pub const OPACITY_MIN: f32 = 0.1;
pub const OPACITY_MAX: f32 = 1.0;

/// Size of the freehand drawing surface (width, height)
pub const DRAW_SURFACE_SIZE: (u32, u32) = (240, 120);

/// Pen width on the drawing surface
pub const PEN_WIDTH_PX: f32 = 2.0;

// =============================================================================
// Backend
// =============================================================================

pub const LOGIN_ENDPOINT: &str = "/api/auth/login";
pub const LOGOUT_ENDPOINT: &str = "/api/auth/logout";
pub const UPLOAD_ENDPOINT: &str = "/api/upload";
pub const SIGN_ENDPOINT: &str = "/api/sign-pdf";

/// Multipart field name the upload endpoint expects
pub const UPLOAD_FIELD: &str = "pdf";

/// File name given to the downloaded signed document
pub const SIGNED_PDF_FILE_NAME: &str = "signed.pdf";

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:4000";
