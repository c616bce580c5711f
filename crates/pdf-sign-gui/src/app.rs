use eframe::egui;
use pdf_async_runtime::{SignCommand, SignUpdate};
use pdf_sign::{Composer, DocumentRef, DragState, PlacementCanvas, ScriptFont, SessionState, SignerConfig};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::logger::AppLogger;
use crate::views::{
    ComposerPanel, PageTextures, UploadAction, UploadForm, show_canvas, show_composer, show_log_panel,
    show_no_document, show_thumbnail_rail, show_upload,
};

#[derive(Default, PartialEq, Clone, Copy)]
enum View {
    #[default]
    Upload,
    Sign,
}

#[derive(Clone)]
struct ProgressState {
    operation: String,
    current: usize,
    total: usize,
}

pub struct SignApp {
    view: View,
    status: String,
    /// Shown as a modal until dismissed
    alert: Option<String>,
    logger: AppLogger,
    show_log: bool,

    // Async infrastructure
    command_tx: mpsc::UnboundedSender<SignCommand>,
    update_rx: mpsc::UnboundedReceiver<SignUpdate>,
    progress: Option<ProgressState>,

    // Account and document
    session: SessionState,
    upload_form: UploadForm,
    document: Option<DocumentRef>,

    // Signing state, owned by the UI thread
    canvas: PlacementCanvas,
    composer: Composer,
    composer_panel: ComposerPanel,
    textures: PageTextures,
    script_fonts: HashSet<ScriptFont>,

    _tokio_handle: tokio::runtime::Handle,
}

impl SignApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        tokio_handle: tokio::runtime::Handle,
        config: SignerConfig,
        logger: AppLogger,
    ) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        let script_fonts = install_script_fonts(&cc.egui_ctx, &config.font_dir);
        tokio_handle.spawn(crate::worker::worker_task(command_rx, update_tx, config));

        Self {
            view: View::default(),
            status: String::new(),
            alert: None,
            logger,
            show_log: false,
            command_tx,
            update_rx,
            progress: None,
            session: SessionState::default(),
            upload_form: UploadForm::default(),
            document: None,
            canvas: PlacementCanvas::new(),
            composer: Composer::new(),
            composer_panel: ComposerPanel::default(),
            textures: PageTextures::default(),
            script_fonts,
            _tokio_handle: tokio_handle,
        }
    }

    fn send(&mut self, command: SignCommand) {
        if self.command_tx.send(command).is_err() {
            self.status = "Error: background worker has stopped".to_string();
        }
    }

    fn open_document(&mut self, doc: DocumentRef) {
        let ticket = self.canvas.begin_load();
        self.status = format!("Loading {}...", doc);
        self.document = Some(doc.clone());
        self.view = View::Sign;
        self.send(SignCommand::LoadDocument { doc, ticket });
    }

    fn upload_or_open(&mut self, path: PathBuf) {
        if matches!(self.session, SessionState::LoggedIn { .. }) {
            self.status = format!("Uploading {}...", path.display());
            self.send(SignCommand::Upload { path });
        } else {
            self.open_document(DocumentRef::Local(path));
        }
    }

    fn handle_upload_action(&mut self, action: UploadAction) {
        match action {
            UploadAction::Login => {
                let email = self.upload_form.email.trim().to_string();
                let password = std::mem::take(&mut self.upload_form.password);
                self.status = format!("Logging in as {email}...");
                self.send(SignCommand::Login { email, password });
            }
            UploadAction::Logout => self.send(SignCommand::Logout),
            UploadAction::Upload(path) => self.upload_or_open(path),
            UploadAction::OpenLocal(path) => self.open_document(DocumentRef::Local(path)),
        }
    }

    fn export(&mut self) {
        let Some(doc) = self.document.clone() else {
            return;
        };
        let annotations = self.canvas.annotations().snapshot();
        self.status = format!("Requesting signed PDF with {} signatures...", annotations.len());
        self.send(SignCommand::Export { doc, annotations });
    }

    fn handle_update(&mut self, ctx: &egui::Context, update: SignUpdate) {
        match update {
            SignUpdate::Progress {
                operation,
                current,
                total,
            } => {
                self.progress = Some(ProgressState {
                    operation,
                    current,
                    total,
                });
                ctx.request_repaint();
            }
            SignUpdate::DocumentLoaded { ticket, pages } => {
                let count = pages.len();
                if self.canvas.install_pages(ticket, pages) {
                    self.status = format!("Loaded document with {} pages", count);
                    self.progress = None;
                }
            }
            SignUpdate::DocumentLoadFailed { ticket, message } => {
                if self.canvas.fail_load(ticket) {
                    self.document = None;
                    self.status = format!("Error: {message}");
                    self.progress = None;
                }
            }
            SignUpdate::SignatureRasterized { pending, raster } => {
                match self.canvas.commit_drop(pending, raster) {
                    Ok(_) => self.status = "Signature placed".to_string(),
                    Err(e) => self.status = format!("Signature discarded: {e}"),
                }
            }
            SignUpdate::LoggedIn { email } => {
                self.status = format!("Logged in as {email}");
                self.session = SessionState::LoggedIn { email };
            }
            SignUpdate::LoggedOut => {
                self.session = SessionState::LoggedOut;
                self.status = "Logged out".to_string();
            }
            SignUpdate::Uploaded { doc } => {
                self.progress = None;
                self.open_document(doc);
            }
            SignUpdate::ExportComplete { path } => {
                self.status = format!("Signed PDF saved → {}", path.display());
                self.progress = None;
            }
            SignUpdate::ExportFailed { message } => {
                self.status = "Export failed".to_string();
                self.alert = Some(message);
                self.progress = None;
            }
            SignUpdate::Error { message } => {
                self.status = format!("Error: {message}");
                self.progress = None;
            }
        }
    }

    fn show_sign_view(&mut self, ctx: &egui::Context) {
        let Some(doc) = self.document.clone() else {
            egui::CentralPanel::default().show(ctx, |ui| {
                if show_no_document(ui) {
                    self.view = View::Upload;
                }
            });
            return;
        };

        self.textures.sync(ctx, &self.canvas);

        egui::SidePanel::left("thumbnails")
            .resizable(false)
            .exact_width(96.0)
            .show(ctx, |ui| {
                show_thumbnail_rail(ui, &mut self.canvas, &self.textures, &mut self.status);
            });

        egui::SidePanel::right("composer")
            .default_width(280.0)
            .show(ctx, |ui| {
                show_composer(
                    ui,
                    &mut self.composer,
                    &mut self.composer_panel,
                    &mut self.canvas,
                    &self.script_fonts,
                    &mut self.status,
                );
            });

        let mut export_clicked = false;
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                let pages = self.canvas.pages();
                if !pages.is_empty() {
                    ui.label(format!("Page {} of {}", pages.active_index() + 1, pages.len()));
                    ui.separator();
                }
                ui.label(format!("{} signatures placed", self.canvas.annotations().len()));
                ui.separator();

                let signable = doc.remote_url().is_some() && !self.canvas.annotations().is_empty();
                export_clicked = ui
                    .add_enabled(signable, egui::Button::new("⬇ Download signed PDF"))
                    .on_disabled_hover_text("Upload the document and place at least one signature")
                    .clicked();
            });
            ui.separator();

            show_canvas(
                ui,
                &mut self.canvas,
                &mut self.textures,
                &self.command_tx,
                &mut self.status,
            );
        });

        if export_clicked {
            self.export();
        }
    }
}

impl eframe::App for SignApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Handle drag-and-drop of PDF files from the desktop
        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|file| file.path.clone())
                .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("pdf"))
                .collect()
        });
        if let Some(path) = dropped.into_iter().next() {
            self.upload_or_open(path);
        }

        // Process all pending updates from worker
        while let Ok(update) = self.update_rx.try_recv() {
            self.handle_update(ctx, update);
        }

        egui::TopBottomPanel::top("menu").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.selectable_value(&mut self.view, View::Upload, "📤 Upload");
                ui.selectable_value(&mut self.view, View::Sign, "✍ Sign");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.toggle_value(&mut self.show_log, "Log");
                    if let SessionState::LoggedIn { email } = &self.session {
                        ui.label(email);
                    }
                });
            });
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            if let Some(ref progress) = self.progress {
                ui.label(&progress.operation);
                ui.add(
                    egui::ProgressBar::new(progress.current as f32 / progress.total.max(1) as f32)
                        .show_percentage(),
                );
                ctx.request_repaint();
            }
            if !self.status.is_empty() {
                ui.label(&self.status);
            } else if let Some(problem) = self.logger.latest_problem() {
                ui.colored_label(ui.visuals().warn_fg_color, problem);
            }
            if self.show_log {
                ui.separator();
                show_log_panel(ui, &self.logger);
            }
        });

        match self.view {
            View::Upload => {
                let mut action = None;
                egui::CentralPanel::default().show(ctx, |ui| {
                    action = show_upload(ui, &mut self.upload_form, &self.session);
                });
                if let Some(action) = action {
                    self.handle_upload_action(action);
                }
            }
            View::Sign => self.show_sign_view(ctx),
        }

        if let Some(message) = &self.alert {
            let modal = egui::Modal::new(egui::Id::new("export-alert")).show(ctx, |ui| {
                ui.heading("Could not sign the document");
                ui.add_space(8.0);
                ui.label(message);
                ui.add_space(8.0);
                ui.button("OK").clicked()
            });
            if modal.inner || modal.should_close() {
                self.alert = None;
            }
        }

        // A composer drag released anywhere but the page is abandoned
        if matches!(self.canvas.drag_state(), DragState::DraggingNew(_)) {
            if ctx.input(|i| i.pointer.any_released()) {
                self.canvas.cancel_new_drag();
            } else {
                ctx.set_cursor_icon(egui::CursorIcon::Grabbing);
            }
        }
    }
}

/// Register the script fonts with egui so previews use the real faces.
/// Returns the fonts that could be loaded.
fn install_script_fonts(ctx: &egui::Context, dir: &Path) -> HashSet<ScriptFont> {
    let mut definitions = egui::FontDefinitions::default();
    let fallback = definitions
        .families
        .get(&egui::FontFamily::Proportional)
        .cloned()
        .unwrap_or_default();

    let mut installed = HashSet::new();
    for font in ScriptFont::ALL {
        let path = dir.join(font.file_name());
        match std::fs::read(&path) {
            Ok(bytes) => {
                let name = font.label().to_string();
                definitions
                    .font_data
                    .insert(name.clone(), Arc::new(egui::FontData::from_owned(bytes)));
                let mut family = vec![name];
                family.extend(fallback.iter().cloned());
                definitions
                    .families
                    .insert(egui::FontFamily::Name(font.label().into()), family);
                installed.insert(font);
            }
            Err(e) => log::debug!("No preview face for {}: {}", path.display(), e),
        }
    }

    ctx.set_fonts(definitions);
    installed
}
