pub mod account;
pub mod document;
pub mod export;
pub mod signature;

use pdf_sign::{FontLibrary, FontdueRasterizer, Session, SignatureRenderer, SignerConfig};
use std::sync::Arc;

use crate::viewer::PdfiumRasterizer;

/// Everything the worker owns between commands
pub struct WorkerContext {
    pub config: SignerConfig,
    /// Blocking client; handlers clone it into `spawn_blocking`. Clones share
    /// the agent and with it the login cookies.
    pub session: Session,
    pub pages: Arc<PdfiumRasterizer>,
    pub renderer: SignatureRenderer<FontdueRasterizer>,
}

impl WorkerContext {
    pub fn new(config: SignerConfig) -> Self {
        let fonts = FontLibrary::new(config.font_dir.clone());
        Self {
            session: Session::new(config.backend_url.clone()),
            pages: Arc::new(PdfiumRasterizer),
            renderer: SignatureRenderer::new(
                FontdueRasterizer::new(fonts),
                config.raster_scale,
                config.raster_timeout(),
            ),
            config,
        }
    }
}
