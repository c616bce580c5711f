use pdf_async_runtime::{DocumentRef, LoadTicket, Page, SignUpdate};
use pdf_sign::rasterize_document;
use tokio::sync::mpsc;

use super::WorkerContext;

pub async fn handle_load(
    doc: DocumentRef,
    ticket: LoadTicket,
    ctx: &WorkerContext,
    update_tx: &mpsc::UnboundedSender<SignUpdate>,
) {
    let _ = update_tx.send(SignUpdate::Progress {
        operation: format!("Loading {}", doc),
        current: 0,
        total: 2,
    });

    match load_pages(&doc, ctx, update_tx).await {
        Ok(pages) => {
            log::info!("Loaded {} with {} pages", doc, pages.len());
            let _ = update_tx.send(SignUpdate::DocumentLoaded { ticket, pages });
        }
        Err(e) => {
            log::error!("Failed to load {}: {}", doc, e);
            let _ = update_tx.send(SignUpdate::DocumentLoadFailed {
                ticket,
                message: e.to_string(),
            });
        }
    }
}

async fn load_pages(
    doc: &DocumentRef,
    ctx: &WorkerContext,
    update_tx: &mpsc::UnboundedSender<SignUpdate>,
) -> pdf_sign::Result<Vec<Page>> {
    let session = ctx.session.clone();
    let fetch = doc.clone();
    let bytes = tokio::task::spawn_blocking(move || session.fetch_document(&fetch)).await??;

    let _ = update_tx.send(SignUpdate::Progress {
        operation: "Rendering pages".to_string(),
        current: 1,
        total: 2,
    });
    rasterize_document(
        ctx.pages.clone(),
        bytes,
        ctx.config.display_scale,
        ctx.config.thumbnail_width,
    )
    .await
}
