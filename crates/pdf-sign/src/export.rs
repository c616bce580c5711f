//! Export gateway: ask the backend to composite the placed signatures

use crate::constants::{SIGN_ENDPOINT, SIGNED_PDF_FILE_NAME};
use crate::session::{DocumentRef, Session, describe};
use crate::store::SignatureAnnotation;
use crate::types::*;
use base64::{Engine, engine::general_purpose::STANDARD};
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};

/// One placed signature as the backend expects it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub id: String,
    pub page: usize,
    /// PNG data URL
    pub image_base64: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub opacity: f32,
}

impl From<&SignatureAnnotation> for Placement {
    fn from(annotation: &SignatureAnnotation) -> Self {
        Self {
            id: annotation.id.to_string(),
            page: annotation.page,
            image_base64: format!("data:image/png;base64,{}", STANDARD.encode(annotation.png.as_slice())),
            x: annotation.rect.x,
            y: annotation.rect.y,
            width: annotation.rect.width,
            height: annotation.rect.height,
            opacity: annotation.opacity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignRequest {
    pub file_url: String,
    pub coords: Vec<Placement>,
}

impl SignRequest {
    /// Build a request covering every annotation, on every page
    pub fn new(doc: &DocumentRef, annotations: &[SignatureAnnotation]) -> Result<Self> {
        let file_url = doc
            .remote_url()
            .ok_or_else(|| SignError::Export("document has not been uploaded".to_string()))?;
        Ok(Self {
            file_url: file_url.to_string(),
            coords: annotations.iter().map(Placement::from).collect(),
        })
    }
}

pub struct ExportGateway<'a> {
    session: &'a Session,
    download_dir: PathBuf,
}

impl<'a> ExportGateway<'a> {
    pub fn new(session: &'a Session, download_dir: impl Into<PathBuf>) -> Self {
        Self {
            session,
            download_dir: download_dir.into(),
        }
    }

    /// Send one sign request and return the composited PDF
    pub fn request(&self, request: &SignRequest) -> Result<Vec<u8>> {
        log::info!(
            "Requesting signed PDF for {} with {} signatures",
            request.file_url,
            request.coords.len()
        );
        let response = self
            .session
            .agent()
            .post(&self.session.endpoint(SIGN_ENDPOINT))
            .send_json(request)
            .map_err(|e| SignError::Export(describe(e)))?;

        let mut bytes = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut bytes)
            .map_err(|e| SignError::Export(e.to_string()))?;
        Ok(bytes)
    }

    /// Request the signed PDF and save it as `signed.pdf` in the download
    /// directory
    pub fn export(&self, doc: &DocumentRef, annotations: &[SignatureAnnotation]) -> Result<PathBuf> {
        let request = SignRequest::new(doc, annotations)?;
        let bytes = self.request(&request)?;
        let path = self.download_dir.join(SIGNED_PDF_FILE_NAME);
        save_download(&path, &bytes)?;
        log::info!("Saved signed PDF to {}", path.display());
        Ok(path)
    }
}

fn save_download(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bytes)?;
    Ok(())
}
