use pdf_async_runtime::SignUpdate;
use std::path::PathBuf;
use tokio::sync::mpsc;

use super::WorkerContext;

pub async fn handle_login(
    email: String,
    password: String,
    ctx: &mut WorkerContext,
    update_tx: &mpsc::UnboundedSender<SignUpdate>,
) {
    let mut session = ctx.session.clone();
    let result = tokio::task::spawn_blocking(move || {
        session.login(&email, &password).map(|()| (session, email))
    })
    .await;

    match result {
        Ok(Ok((session, email))) => {
            ctx.session = session;
            let _ = update_tx.send(SignUpdate::LoggedIn { email });
        }
        Ok(Err(e)) => {
            let _ = update_tx.send(SignUpdate::error(format!("Login failed: {e}")));
        }
        Err(e) => {
            let _ = update_tx.send(SignUpdate::error(format!("Task join error: {e}")));
        }
    }
}

pub async fn handle_logout(ctx: &mut WorkerContext, update_tx: &mpsc::UnboundedSender<SignUpdate>) {
    let mut session = ctx.session.clone();
    match tokio::task::spawn_blocking(move || {
        session.logout();
        session
    })
    .await
    {
        Ok(session) => ctx.session = session,
        Err(e) => log::warn!("Logout task failed: {}", e),
    }
    let _ = update_tx.send(SignUpdate::LoggedOut);
}

pub async fn handle_upload(
    path: PathBuf,
    ctx: &WorkerContext,
    update_tx: &mpsc::UnboundedSender<SignUpdate>,
) {
    let _ = update_tx.send(SignUpdate::Progress {
        operation: format!("Uploading {}", path.display()),
        current: 0,
        total: 1,
    });

    let session = ctx.session.clone();
    match tokio::task::spawn_blocking(move || session.upload(&path)).await {
        Ok(Ok(doc)) => {
            let _ = update_tx.send(SignUpdate::Uploaded { doc });
        }
        Ok(Err(e)) => {
            let _ = update_tx.send(SignUpdate::error(format!("Upload failed: {e}")));
        }
        Err(e) => {
            let _ = update_tx.send(SignUpdate::error(format!("Task join error: {e}")));
        }
    }
}
