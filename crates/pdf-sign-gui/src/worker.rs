use pdf_async_runtime::{SignCommand, SignUpdate};
use pdf_sign::SignerConfig;
use tokio::sync::mpsc;

use crate::handlers::{self, WorkerContext};

/// Async worker task that processes signing commands and sends updates
pub async fn worker_task(
    mut command_rx: mpsc::UnboundedReceiver<SignCommand>,
    update_tx: mpsc::UnboundedSender<SignUpdate>,
    config: SignerConfig,
) {
    let mut ctx = WorkerContext::new(config);

    while let Some(cmd) = command_rx.recv().await {
        process_command(cmd, &mut ctx, &mut command_rx, &update_tx).await;
    }
    log::debug!("Worker stopped: command channel closed");
}

async fn process_command(
    cmd: SignCommand,
    ctx: &mut WorkerContext,
    command_rx: &mut mpsc::UnboundedReceiver<SignCommand>,
    update_tx: &mpsc::UnboundedSender<SignUpdate>,
) {
    match cmd {
        SignCommand::LoadDocument {
            mut doc,
            mut ticket,
        } => {
            // Only the most recent queued load matters; older tickets are stale anyway
            while let Ok(next_cmd) = command_rx.try_recv() {
                if let SignCommand::LoadDocument {
                    doc: new_doc,
                    ticket: new_ticket,
                } = next_cmd
                {
                    log::debug!("Discarding queued load of {}, using newer request", doc);
                    doc = new_doc;
                    ticket = new_ticket;
                } else {
                    // Can't put it back, so run it before the load
                    Box::pin(process_command(next_cmd, ctx, command_rx, update_tx)).await;
                }
            }

            handlers::document::handle_load(doc, ticket, ctx, update_tx).await;
        }
        SignCommand::RasterizeSignature { pending } => {
            handlers::signature::handle_rasterize(pending, ctx, update_tx).await;
        }
        SignCommand::Login { email, password } => {
            handlers::account::handle_login(email, password, ctx, update_tx).await;
        }
        SignCommand::Logout => {
            handlers::account::handle_logout(ctx, update_tx).await;
        }
        SignCommand::Upload { path } => {
            handlers::account::handle_upload(path, ctx, update_tx).await;
        }
        SignCommand::Export { doc, annotations } => {
            handlers::export::handle_export(doc, annotations, ctx, update_tx).await;
        }
    }
}
