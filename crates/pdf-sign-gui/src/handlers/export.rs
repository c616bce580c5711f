use pdf_async_runtime::{DocumentRef, SignUpdate, SignatureAnnotation};
use pdf_sign::ExportGateway;
use std::sync::Arc;
use tokio::sync::mpsc;

use super::WorkerContext;

pub async fn handle_export(
    doc: DocumentRef,
    annotations: Arc<Vec<SignatureAnnotation>>,
    ctx: &WorkerContext,
    update_tx: &mpsc::UnboundedSender<SignUpdate>,
) {
    let _ = update_tx.send(SignUpdate::Progress {
        operation: format!("Signing {} signatures", annotations.len()),
        current: 0,
        total: 1,
    });

    let session = ctx.session.clone();
    let download_dir = ctx.config.download_dir.clone();
    match tokio::task::spawn_blocking(move || {
        ExportGateway::new(&session, download_dir).export(&doc, &annotations)
    })
    .await
    {
        Ok(Ok(path)) => {
            let _ = update_tx.send(SignUpdate::ExportComplete { path });
        }
        Ok(Err(e)) => {
            log::error!("Export failed: {}", e);
            let _ = update_tx.send(SignUpdate::ExportFailed {
                message: e.to_string(),
            });
        }
        Err(e) => {
            let _ = update_tx.send(SignUpdate::error(format!("Task join error: {e}")));
        }
    }
}
