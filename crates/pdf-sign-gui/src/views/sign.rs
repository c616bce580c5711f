use eframe::egui;
use pdf_async_runtime::SignCommand;
use pdf_sign::{AnnotationId, PixelPoint, PixelSize, PlacementCanvas, SignatureAnnotation};
use std::collections::HashMap;
use tokio::sync::mpsc;

use crate::ui_components::{FULL_UV, load_texture};

const DELETE_BUTTON_SIZE: f32 = 18.0;

/// egui drag-and-drop marker for a signature leaving the composer. The
/// payload itself travels encoded inside the canvas drag state.
#[derive(Debug, Clone, Copy)]
pub struct ComposerDrag;

/// GPU textures for the current page set and placed signatures
#[derive(Default)]
pub struct PageTextures {
    revision: Option<u64>,
    pages: Vec<egui::TextureHandle>,
    thumbnails: Vec<egui::TextureHandle>,
    signatures: HashMap<AnnotationId, egui::TextureHandle>,
}

impl PageTextures {
    /// Upload textures for a newly installed page set and drop those of
    /// deleted annotations
    pub fn sync(&mut self, ctx: &egui::Context, canvas: &PlacementCanvas) {
        let pages = canvas.pages();
        if self.revision != Some(pages.revision()) {
            self.pages = pages
                .pages()
                .iter()
                .map(|page| load_texture(ctx, &format!("page-{}", page.index), &page.image))
                .collect();
            self.thumbnails = pages
                .pages()
                .iter()
                .map(|page| load_texture(ctx, &format!("thumb-{}", page.index), &page.thumbnail))
                .collect();
            self.revision = Some(pages.revision());
        }
        self.signatures
            .retain(|id, _| canvas.annotations().contains(*id));
    }

    fn signature(&mut self, ctx: &egui::Context, annotation: &SignatureAnnotation) -> egui::TextureId {
        self.signatures
            .entry(annotation.id)
            .or_insert_with(|| load_texture(ctx, &format!("signature-{}", annotation.id), &annotation.image))
            .id()
    }
}

pub fn show_thumbnail_rail(
    ui: &mut egui::Ui,
    canvas: &mut PlacementCanvas,
    textures: &PageTextures,
    status: &mut String,
) {
    let active = canvas.pages().active_index();
    let mut selected = None;

    egui::ScrollArea::vertical().show(ui, |ui| {
        for (index, texture) in textures.thumbnails.iter().enumerate() {
            ui.vertical_centered(|ui| {
                let image = egui::Image::new((texture.id(), texture.size_vec2()));
                if ui
                    .add(egui::Button::image(image).selected(index == active))
                    .clicked()
                {
                    selected = Some(index);
                }
                ui.small(format!("{}", index + 1));
            });
        }
    });

    if let Some(index) = selected {
        if let Err(e) = canvas.select_page(index) {
            *status = e.to_string();
        }
    }
}

/// Active page with its signatures; accepts composer drops and moves
pub fn show_canvas(
    ui: &mut egui::Ui,
    canvas: &mut PlacementCanvas,
    textures: &mut PageTextures,
    command_tx: &mpsc::UnboundedSender<SignCommand>,
    status: &mut String,
) {
    let Some(page_texture) = canvas
        .active_page()
        .and_then(|page| textures.pages.get(page.index))
        .cloned()
    else {
        ui.centered_and_justified(|ui| {
            ui.spinner();
        });
        return;
    };

    egui::ScrollArea::both().show(ui, |ui| {
        let (page_rect, page_response) =
            ui.allocate_exact_size(page_texture.size_vec2(), egui::Sense::click());
        ui.painter()
            .image(page_texture.id(), page_rect, FULL_UV, egui::Color32::WHITE);

        let view = PixelSize::new(page_rect.width(), page_rect.height());
        let to_page = |pos: egui::Pos2| PixelPoint::new(pos.x - page_rect.min.x, pos.y - page_rect.min.y);

        if page_response.dnd_release_payload::<ComposerDrag>().is_some() {
            if let Some(pos) = ui.ctx().pointer_interact_pos() {
                match canvas.drop_payload(to_page(pos), view) {
                    Ok(pending) => {
                        let _ = command_tx.send(SignCommand::RasterizeSignature { pending });
                        *status = "Placing signature...".to_string();
                    }
                    Err(e) => *status = format!("Drop rejected: {e}"),
                }
            }
        } else if page_response.dnd_hover_payload::<ComposerDrag>().is_some() {
            ui.painter().rect_stroke(
                page_rect,
                0.0,
                ui.visuals().selection.stroke,
                egui::StrokeKind::Inside,
            );
        }
        if page_response.clicked() {
            canvas.click_background();
        }

        let visible: Vec<SignatureAnnotation> = canvas.visible_annotations().cloned().collect();
        let editing = canvas.editing();
        for annotation in &visible {
            let origin = annotation.rect.origin_px(view);
            let size = annotation.rect.size_px(view);
            let box_rect = egui::Rect::from_min_size(
                page_rect.min + egui::vec2(origin.x, origin.y),
                egui::vec2(size.width, size.height),
            );

            let texture = textures.signature(ui.ctx(), annotation);
            let tint = egui::Color32::from_white_alpha((annotation.opacity * 255.0).round() as u8);
            ui.painter().image(texture, box_rect, FULL_UV, tint);

            let response = ui.interact(
                box_rect,
                ui.id().with(("signature", annotation.id)),
                egui::Sense::click_and_drag(),
            );
            if response.drag_started() {
                if let Some(pos) = response.interact_pointer_pos() {
                    if let Err(e) = canvas.begin_move(annotation.id, to_page(pos), view) {
                        *status = e.to_string();
                    }
                }
            } else if response.dragged() {
                if let Some(pos) = response.interact_pointer_pos() {
                    canvas.pointer_move(to_page(pos));
                }
            }
            if response.drag_stopped() {
                canvas.pointer_up();
            }
            if response.clicked() {
                canvas.click_annotation(annotation.id);
            }
            if response.hovered() || response.dragged() {
                ui.ctx().set_cursor_icon(egui::CursorIcon::Grab);
            }

            if editing == Some(annotation.id) {
                ui.painter().rect_stroke(
                    box_rect,
                    2.0,
                    ui.visuals().selection.stroke,
                    egui::StrokeKind::Outside,
                );
                let delete_rect = egui::Rect::from_center_size(
                    box_rect.right_top(),
                    egui::Vec2::splat(DELETE_BUTTON_SIZE),
                );
                if ui
                    .put(delete_rect, egui::Button::new("✖").small())
                    .on_hover_text("Remove signature")
                    .clicked()
                {
                    canvas.delete(annotation.id);
                }
            }
        }
    });
}

/// Shown in the sign view until a document is chosen. Returns true when
/// the user asks to go to the upload view.
pub fn show_no_document(ui: &mut egui::Ui) -> bool {
    ui.vertical_centered(|ui| {
        ui.add_space(80.0);
        ui.heading("No document selected");
        ui.add_space(10.0);
        ui.label("Upload a PDF to start placing signatures.");
        ui.add_space(20.0);
        ui.button("Go to upload").clicked()
    })
    .inner
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdf_sign::{Page, RenderedPage};

    fn page(width: u32, height: u32) -> Page {
        let rendered = RenderedPage {
            width,
            height,
            rgba: vec![255; (width * height * 4) as usize],
        };
        Page::from_rendered(0, rendered, 64).unwrap()
    }

    #[test]
    fn reload_with_same_page_count_replaces_textures() {
        let ctx = egui::Context::default();
        let mut canvas = PlacementCanvas::new();
        let mut textures = PageTextures::default();

        let first = canvas.begin_load();
        assert!(canvas.install_pages(first, vec![page(100, 100)]));
        textures.sync(&ctx, &canvas);
        assert_eq!(textures.pages[0].size(), [100, 100]);

        // Frames keep drawing while the next document loads
        let second = canvas.begin_load();
        textures.sync(&ctx, &canvas);
        assert_eq!(textures.pages[0].size(), [100, 100]);

        assert!(canvas.install_pages(second, vec![page(600, 800)]));
        textures.sync(&ctx, &canvas);
        assert_eq!(textures.pages[0].size(), [600, 800]);
        assert_eq!(textures.thumbnails[0].size(), [64, 85]);
    }

    #[test]
    fn failed_load_drops_page_textures() {
        let ctx = egui::Context::default();
        let mut canvas = PlacementCanvas::new();
        let mut textures = PageTextures::default();

        let first = canvas.begin_load();
        assert!(canvas.install_pages(first, vec![page(100, 100)]));
        textures.sync(&ctx, &canvas);

        let second = canvas.begin_load();
        assert!(canvas.fail_load(second));
        textures.sync(&ctx, &canvas);
        assert!(textures.pages.is_empty());
        assert!(textures.thumbnails.is_empty());
    }
}
