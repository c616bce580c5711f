use std::path::PathBuf;
use std::sync::Arc;

// Re-export types from the signing core
pub use pdf_sign::{
    DocumentRef, LoadTicket, Page, PendingDrop, RasterizedSignature, SignatureAnnotation,
};

/// Commands sent from UI to worker
#[derive(Debug)]
pub enum SignCommand {
    /// Fetch and rasterize a document. Only the newest queued load runs.
    LoadDocument {
        doc: DocumentRef,
        ticket: LoadTicket,
    },
    /// Rasterize a dropped payload so the UI can place it
    RasterizeSignature {
        pending: PendingDrop,
    },
    Login {
        email: String,
        password: String,
    },
    Logout,
    Upload {
        path: PathBuf,
    },
    /// Request the signed document for a snapshot of the placed signatures
    Export {
        doc: DocumentRef,
        annotations: Arc<Vec<SignatureAnnotation>>,
    },
}

/// Updates sent from worker to UI
#[derive(Debug, Clone)]
pub enum SignUpdate {
    Progress {
        operation: String,
        current: usize,
        total: usize,
    },
    DocumentLoaded {
        ticket: LoadTicket,
        pages: Vec<Page>,
    },
    DocumentLoadFailed {
        ticket: LoadTicket,
        message: String,
    },
    SignatureRasterized {
        pending: PendingDrop,
        raster: RasterizedSignature,
    },
    LoggedIn {
        email: String,
    },
    LoggedOut,
    Uploaded {
        doc: DocumentRef,
    },
    ExportComplete {
        path: PathBuf,
    },
    ExportFailed {
        message: String,
    },
    Error {
        message: String,
    },
}

impl SignUpdate {
    pub fn error(message: impl Into<String>) -> Self {
        SignUpdate::Error {
            message: message.into(),
        }
    }
}
