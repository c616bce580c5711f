use pdf_async_runtime::{PendingDrop, SignUpdate};
use tokio::sync::mpsc;

use super::WorkerContext;

pub async fn handle_rasterize(
    pending: PendingDrop,
    ctx: &WorkerContext,
    update_tx: &mpsc::UnboundedSender<SignUpdate>,
) {
    match ctx.renderer.render(&pending.payload).await {
        Ok(raster) => {
            let _ = update_tx.send(SignUpdate::SignatureRasterized { pending, raster });
        }
        Err(e) => {
            log::warn!("Signature rasterization failed: {}", e);
            let _ = update_tx.send(SignUpdate::error(format!("Failed to place signature: {e}")));
        }
    }
}
