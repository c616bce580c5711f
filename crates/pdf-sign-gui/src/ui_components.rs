use eframe::egui;
use image::RgbaImage;
use pdf_sign::ScriptFont;
use std::collections::HashSet;

/// Whole-texture UV rectangle
pub const FULL_UV: egui::Rect = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));

pub fn color_image(image: &RgbaImage) -> egui::ColorImage {
    egui::ColorImage::from_rgba_unmultiplied(
        [image.width() as usize, image.height() as usize],
        image.as_raw(),
    )
}

pub fn load_texture(ctx: &egui::Context, name: &str, image: &RgbaImage) -> egui::TextureHandle {
    ctx.load_texture(name, color_image(image), egui::TextureOptions::LINEAR)
}

/// Labeled slider that never leaves its range
pub fn slider_row<T>(
    ui: &mut egui::Ui,
    label: &str,
    value: &mut T,
    range: std::ops::RangeInclusive<T>,
    suffix: &str,
) -> bool
where
    T: egui::emath::Numeric,
{
    ui.horizontal(|ui| {
        ui.label(label);
        ui.add(
            egui::Slider::new(value, range)
                .clamping(egui::SliderClamping::Always)
                .suffix(suffix),
        )
        .changed()
    })
    .inner
}

/// Horizontal button group for enum selection
pub fn button_group<T>(ui: &mut egui::Ui, value: &mut T, options: &[(T, &str)]) -> bool
where
    T: PartialEq + Clone,
{
    ui.horizontal(|ui| {
        options.iter().fold(false, |changed, (option, text)| {
            ui.selectable_value(value, option.clone(), *text).changed() || changed
        })
    })
    .inner
}

/// Egui family for a script font, when its file could be installed
pub fn script_family(font: ScriptFont, installed: &HashSet<ScriptFont>) -> egui::FontFamily {
    if installed.contains(&font) {
        egui::FontFamily::Name(font.label().into())
    } else {
        egui::FontFamily::Proportional
    }
}

const FONT_SAMPLE_PLACEHOLDER: &str = "Your Signature";
const FONT_GRID_COLUMNS: usize = 2;

/// Text shown in each font option: the typed name, or a placeholder while
/// the name is blank
pub fn font_sample(text: &str) -> &str {
    let text = text.trim();
    if text.is_empty() { FONT_SAMPLE_PLACEHOLDER } else { text }
}

/// Font picker previewing `sample` in every script face
pub fn font_selector(
    ui: &mut egui::Ui,
    value: &mut ScriptFont,
    sample: &str,
    installed: &HashSet<ScriptFont>,
) -> bool {
    let sample = font_sample(sample);
    let mut changed = false;
    ui.label("Font");
    egui::Grid::new("script-font-grid")
        .num_columns(FONT_GRID_COLUMNS)
        .spacing([6.0, 6.0])
        .show(ui, |ui| {
            for (i, font) in ScriptFont::ALL.into_iter().enumerate() {
                let text = egui::RichText::new(sample)
                    .family(script_family(font, installed))
                    .size(20.0);
                changed |= ui
                    .selectable_value(value, font, text)
                    .on_hover_text(font.label())
                    .changed();
                if (i + 1) % FONT_GRID_COLUMNS == 0 {
                    ui.end_row();
                }
            }
        });
    changed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_sample_previews_typed_name() {
        assert_eq!(font_sample("  Jane Doe "), "Jane Doe");
        assert_eq!(font_sample("   "), FONT_SAMPLE_PLACEHOLDER);
    }
}
