use fontdue::{Font, FontSettings};
use pdf_sign::composer::render_text;
use pdf_sign::constants::SURFACE_PADDING_PX;
use pdf_sign::*;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/DejaVuSans.ttf")
}

fn fixture_font() -> Font {
    let bytes = std::fs::read(fixture()).unwrap();
    Font::from_bytes(bytes, FontSettings::default()).unwrap()
}

fn style(text: &str, font: ScriptFont) -> TypedStyle {
    TypedStyle {
        text: text.to_string(),
        font,
        font_size: 20.0,
        color: Rgb::new(0x1a, 0x2b, 0x3c),
        opacity: 1.0,
    }
}

/// Inclusive (min_x, min_y, max_x, max_y) of every pixel with any alpha
fn ink_bounds(image: &image::RgbaImage) -> (u32, u32, u32, u32) {
    let mut bounds = (u32::MAX, u32::MAX, 0, 0);
    for (x, y, pixel) in image.enumerate_pixels() {
        if pixel.0[3] > 0 {
            bounds.0 = bounds.0.min(x);
            bounds.1 = bounds.1.min(y);
            bounds.2 = bounds.2.max(x);
            bounds.3 = bounds.3.max(y);
        }
    }
    assert!(bounds.0 <= bounds.2, "no ink rendered");
    bounds
}

/// A library directory holding only the fixture, saved under `font`'s file name
fn library_with(font: ScriptFont) -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::copy(fixture(), dir.path().join(font.file_name())).unwrap();
    dir
}

#[test]
fn test_render_text_keeps_ink_inside_padding() {
    let font = fixture_font();
    let scale = 2.0;
    let image = render_text(&font, &style("Jane Doe", ScriptFont::Pacifico), scale).unwrap();
    let padding = (SURFACE_PADDING_PX * scale) as u32;
    let (width, height) = image.dimensions();

    // 20px text at 2x on a 1.5 line height, padded on both sides
    assert_eq!(height, 92);

    let (min_x, min_y, max_x, max_y) = ink_bounds(&image);
    assert!(min_x >= padding, "ink starts at x={min_x}");
    assert!(min_y >= padding, "ink starts at y={min_y}");
    // One pixel of slack for glyph position rounding
    assert!(max_x < width - padding + 1, "ink ends at x={max_x} of {width}");
    assert!(max_y < height - padding, "ink ends at y={max_y} of {height}");

    for pixel in image.pixels().filter(|p| p.0[3] > 0) {
        assert_eq!(&pixel.0[..3], &[0x1a, 0x2b, 0x3c]);
    }
}

#[test]
fn test_render_text_scales_with_density() {
    let font = fixture_font();
    let typed = style("Jane Doe", ScriptFont::Pacifico);
    let single = render_text(&font, &typed, 1.0).unwrap();
    let double = render_text(&font, &typed, 2.0).unwrap();

    let text_single = single.width() as f32 - 2.0 * SURFACE_PADDING_PX;
    let text_double = double.width() as f32 - 4.0 * SURFACE_PADDING_PX;
    assert!(
        (text_double - 2.0 * text_single).abs() <= 4.0,
        "{text_single} at 1x vs {text_double} at 2x"
    );
    assert_eq!(double.height(), 2 * single.height());
}

#[tokio::test]
async fn test_library_loads_present_fonts_and_skips_missing() {
    let dir = library_with(ScriptFont::Pacifico);
    let library = FontLibrary::new(dir.path());

    library.ready().await.unwrap();
    assert_eq!(library.loaded(), vec![ScriptFont::Pacifico]);
    assert!(library.get(ScriptFont::DancingScript).is_none());
}

#[tokio::test]
async fn test_library_without_fonts_fails() {
    let dir = TempDir::new().unwrap();
    let library = FontLibrary::new(dir.path());

    let result = library.ready().await;
    assert!(matches!(result, Err(SignError::Rasterization(_))));
    assert!(library.loaded().is_empty());
}

#[tokio::test]
async fn test_renderer_with_fontdue_pads_typed_signature() {
    let dir = library_with(ScriptFont::Pacifico);
    let rasterizer = FontdueRasterizer::new(FontLibrary::new(dir.path()));
    let renderer = SignatureRenderer::new(rasterizer, 2.0, Duration::from_secs(5));

    let raster = renderer
        .render(&DragPayload::Typed(style("Jane Doe", ScriptFont::Pacifico)))
        .await
        .unwrap();
    assert_eq!(raster.image.height(), 92);
    let (min_x, min_y, _, _) = ink_bounds(&raster.image);
    assert!(min_x >= 16 && min_y >= 16);
    assert_eq!(
        probe_natural_size(&raster.png).unwrap(),
        PixelSize::new(raster.image.width() as f32, 92.0)
    );

    let missing = renderer
        .render(&DragPayload::Typed(style("Jane Doe", ScriptFont::DancingScript)))
        .await;
    assert!(matches!(missing, Err(SignError::Rasterization(_))));
}
