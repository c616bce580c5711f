use eframe::egui;
use pdf_sign::constants::{FONT_SIZE_MAX, FONT_SIZE_MIN, OPACITY_MAX, OPACITY_MIN, PEN_WIDTH_PX};
use pdf_sign::{Composer, ComposerMode, PixelPoint, PlacementCanvas, Rgb, ScriptFont};
use std::collections::HashSet;

use super::sign::ComposerDrag;
use crate::ui_components::{button_group, font_selector, load_texture, script_family, slider_row};

const DRAG_HANDLE_SIZE: egui::Vec2 = egui::vec2(240.0, 72.0);

/// Preview of the generated drawing, kept while the drawing is unchanged
#[derive(Default)]
pub struct ComposerPanel {
    preview: Option<egui::TextureHandle>,
}

pub fn show_composer(
    ui: &mut egui::Ui,
    composer: &mut Composer,
    panel: &mut ComposerPanel,
    canvas: &mut PlacementCanvas,
    script_fonts: &HashSet<ScriptFont>,
    status: &mut String,
) {
    ui.heading("Signature");

    let mut mode = composer.mode();
    if button_group(
        ui,
        &mut mode,
        &[(ComposerMode::Typed, "Type"), (ComposerMode::Drawn, "Draw")],
    ) {
        composer.set_mode(mode);
    }
    ui.separator();

    match composer.mode() {
        ComposerMode::Typed => show_typed(ui, composer, script_fonts),
        ComposerMode::Drawn => show_drawn(ui, composer, panel, status),
    }
    show_style(ui, composer);

    ui.separator();
    show_drag_handle(ui, composer, panel, canvas, script_fonts, status);
}

fn show_typed(ui: &mut egui::Ui, composer: &mut Composer, script_fonts: &HashSet<ScriptFont>) {
    let mut text = composer.style().text.clone();
    if ui
        .add(egui::TextEdit::singleline(&mut text).hint_text("Type your name"))
        .changed()
    {
        composer.set_text(text);
    }

    let mut font = composer.style().font;
    if font_selector(ui, &mut font, &composer.style().text, script_fonts) {
        composer.set_font(font);
    }
}

fn show_drawn(ui: &mut egui::Ui, composer: &mut Composer, panel: &mut ComposerPanel, status: &mut String) {
    let (width, height) = composer.strokes().size();
    let (rect, response) =
        ui.allocate_exact_size(egui::vec2(width as f32, height as f32), egui::Sense::drag());
    let to_surface = |pos: egui::Pos2| PixelPoint::new(pos.x - rect.min.x, pos.y - rect.min.y);

    if response.drag_started() {
        if let Some(pos) = response.interact_pointer_pos() {
            composer.begin_stroke(to_surface(pos));
        }
    } else if response.dragged() {
        if let Some(pos) = response.interact_pointer_pos() {
            composer.extend_stroke(to_surface(pos));
        }
    }
    if response.drag_stopped() {
        composer.end_stroke();
    }
    if response.hovered() {
        ui.ctx().set_cursor_icon(egui::CursorIcon::Crosshair);
    }

    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 4.0, egui::Color32::WHITE);
    painter.rect_stroke(
        rect,
        4.0,
        ui.visuals().widgets.noninteractive.bg_stroke,
        egui::StrokeKind::Inside,
    );
    let Rgb { r, g, b } = composer.style().color;
    let pen = egui::Color32::from_rgb(r, g, b);
    for stroke in composer.strokes().strokes() {
        let points: Vec<egui::Pos2> = stroke
            .points
            .iter()
            .map(|p| rect.min + egui::vec2(p.x, p.y))
            .collect();
        match points.as_slice() {
            [] => {}
            [dot] => {
                painter.circle_filled(*dot, PEN_WIDTH_PX / 2.0, pen);
            }
            _ => {
                painter.add(egui::Shape::line(points, egui::Stroke::new(PEN_WIDTH_PX, pen)));
            }
        }
    }

    ui.horizontal(|ui| {
        if ui.button("Clear").clicked() {
            composer.clear_drawing();
        }
        if ui.button("Generate").clicked() {
            if let Err(e) = composer.generate() {
                *status = e.to_string();
            }
        }
    });

    // Dragging also generates, so follow whatever the composer holds
    match composer.generated() {
        None => panel.preview = None,
        Some(image) if panel.preview.is_none() => {
            panel.preview = Some(load_texture(ui.ctx(), "drawn-signature", image));
        }
        Some(_) => {}
    }
}

fn show_style(ui: &mut egui::Ui, composer: &mut Composer) {
    let mut size = composer.style().font_size;
    if slider_row(ui, "Size", &mut size, FONT_SIZE_MIN..=FONT_SIZE_MAX, " px") {
        composer.set_font_size(size);
    }

    let mut color = composer.style().color.to_array();
    ui.horizontal(|ui| {
        ui.label("Color");
        if ui.color_edit_button_srgb(&mut color).changed() {
            composer.set_color(Rgb::from(color));
        }
    });

    let mut opacity = composer.style().opacity;
    if slider_row(ui, "Opacity", &mut opacity, OPACITY_MIN..=OPACITY_MAX, "") {
        composer.set_opacity(opacity);
    }
}

/// Preview box the user drags onto the page
fn show_drag_handle(
    ui: &mut egui::Ui,
    composer: &mut Composer,
    panel: &ComposerPanel,
    canvas: &mut PlacementCanvas,
    script_fonts: &HashSet<ScriptFont>,
    status: &mut String,
) {
    let style = composer.style().clone();
    let Rgb { r, g, b } = style.color;
    let color = egui::Color32::from_rgb(r, g, b).gamma_multiply(style.opacity);

    let frame = egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_min_size(DRAG_HANDLE_SIZE);
        ui.centered_and_justified(|ui| match (composer.mode(), &panel.preview) {
            (ComposerMode::Typed, _) if !style.text.trim().is_empty() => {
                ui.label(
                    egui::RichText::new(&style.text)
                        .family(script_family(style.font, script_fonts))
                        .size(style.font_size)
                        .color(color),
                );
            }
            (ComposerMode::Drawn, Some(texture)) => {
                let tint = egui::Color32::from_white_alpha((style.opacity * 255.0).round() as u8);
                ui.add(egui::Image::new((texture.id(), texture.size_vec2())).tint(tint));
            }
            (ComposerMode::Typed, _) => {
                ui.weak("Type a signature above");
            }
            (ComposerMode::Drawn, None) => {
                ui.weak("Draw a signature above");
            }
        });
    });

    let response = ui
        .interact(
            frame.response.rect,
            ui.id().with("signature-drag-handle"),
            egui::Sense::drag(),
        )
        .on_hover_text("Drag onto the page");
    if response.hovered() {
        ui.ctx().set_cursor_icon(egui::CursorIcon::Grab);
    }
    if response.drag_started() {
        match composer
            .drag_payload()
            .and_then(|payload| canvas.begin_new_drag(&payload))
        {
            Ok(()) => egui::DragAndDrop::set_payload(ui.ctx(), ComposerDrag),
            Err(e) => *status = e.to_string(),
        }
    }
}
