use eframe::egui;
use pdf_sign::SessionState;
use std::path::PathBuf;

#[derive(Default)]
pub struct UploadForm {
    pub email: String,
    pub password: String,
}

pub enum UploadAction {
    Login,
    Logout,
    Upload(PathBuf),
    /// View a local file without uploading; it cannot be signed
    OpenLocal(PathBuf),
}

fn pick_pdf() -> Option<PathBuf> {
    rfd::FileDialog::new().add_filter("PDF", &["pdf"]).pick_file()
}

pub fn show_upload(ui: &mut egui::Ui, form: &mut UploadForm, session: &SessionState) -> Option<UploadAction> {
    let mut action = None;

    ui.vertical_centered(|ui| {
        ui.add_space(50.0);
        ui.heading("Upload a document");
        ui.add_space(20.0);

        match session {
            SessionState::LoggedOut => {
                ui.label("Log in to upload and sign documents");
                ui.add_space(10.0);
                egui::Grid::new("login-form")
                    .num_columns(2)
                    .spacing([8.0, 6.0])
                    .show(ui, |ui| {
                        ui.label("Email");
                        ui.text_edit_singleline(&mut form.email);
                        ui.end_row();

                        ui.label("Password");
                        let password = ui.add(egui::TextEdit::singleline(&mut form.password).password(true));
                        ui.end_row();

                        let submitted =
                            password.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                        let ready = !form.email.trim().is_empty() && !form.password.is_empty();
                        ui.label("");
                        if (ui.add_enabled(ready, egui::Button::new("Log in")).clicked() || submitted)
                            && ready
                        {
                            action = Some(UploadAction::Login);
                        }
                        ui.end_row();
                    });
            }
            SessionState::LoggedIn { email } => {
                ui.horizontal(|ui| {
                    ui.label(format!("Logged in as {email}"));
                    if ui.small_button("Log out").clicked() {
                        action = Some(UploadAction::Logout);
                    }
                });
                ui.add_space(20.0);
                ui.label("Drop a PDF file here or click to choose one");
                ui.add_space(10.0);
                if ui.button("Choose PDF...").clicked() {
                    action = pick_pdf().map(UploadAction::Upload);
                }
            }
        }

        ui.add_space(30.0);
        if ui
            .small_button("Open a local PDF (view only)")
            .on_hover_text("Local documents must be uploaded before they can be signed")
            .clicked()
        {
            action = pick_pdf().map(UploadAction::OpenLocal);
        }
    });

    action
}
