mod support;

use pdf_sign::*;
use std::time::Duration;
use support::BlockText;

fn scribble(composer: &mut Composer) {
    composer.begin_stroke(PixelPoint::new(20.0, 60.0));
    composer.extend_stroke(PixelPoint::new(80.0, 30.0));
    composer.extend_stroke(PixelPoint::new(160.0, 90.0));
    composer.end_stroke();
}

#[test]
fn test_switching_modes_keeps_both_drafts() {
    let mut composer = Composer::new();
    composer.set_text("Jane Doe");
    composer.set_mode(ComposerMode::Drawn);
    scribble(&mut composer);

    composer.set_mode(ComposerMode::Typed);
    assert_eq!(composer.style().text, "Jane Doe");
    composer.set_mode(ComposerMode::Drawn);
    assert!(!composer.strokes().is_empty());
}

#[test]
fn test_style_values_are_clamped() {
    let mut composer = Composer::new();
    composer.set_font_size(500.0);
    assert_eq!(composer.style().font_size, 72.0);
    composer.set_font_size(1.0);
    assert_eq!(composer.style().font_size, 8.0);
    composer.set_opacity(0.0);
    assert_eq!(composer.style().opacity, 0.1);
    composer.set_opacity(3.0);
    assert_eq!(composer.style().opacity, 1.0);
}

#[test]
fn test_empty_typed_signature_cannot_be_dragged() {
    let mut composer = Composer::new();
    composer.set_text("   ");
    assert!(matches!(composer.drag_payload(), Err(SignError::EmptySignature)));
}

#[test]
fn test_empty_drawing_cannot_be_generated() {
    let mut composer = Composer::new();
    composer.set_mode(ComposerMode::Drawn);
    assert!(matches!(composer.generate(), Err(SignError::EmptySignature)));
    assert!(matches!(composer.drag_payload(), Err(SignError::EmptySignature)));
}

#[test]
fn test_drawn_drag_generates_on_demand() {
    let mut composer = Composer::new();
    composer.set_mode(ComposerMode::Drawn);
    composer.set_font_size(30.0);
    composer.set_opacity(0.5);
    scribble(&mut composer);
    assert!(composer.generated().is_none());

    let DragPayload::Drawn(drawn) = composer.drag_payload().unwrap() else {
        panic!("expected a drawn payload");
    };
    assert!(composer.generated().is_some());
    assert_eq!(drawn.width_px, 120.0);
    assert_eq!(drawn.opacity, 0.5);
    assert_eq!(drawn.decode().unwrap().dimensions(), (240, 120));
}

#[test]
fn test_edits_invalidate_generated_drawing() {
    let mut composer = Composer::new();
    composer.set_mode(ComposerMode::Drawn);
    scribble(&mut composer);
    composer.generate().unwrap();

    composer.set_color(Rgb::new(0, 0, 255));
    assert!(composer.generated().is_none());

    composer.generate().unwrap();
    scribble(&mut composer);
    assert!(composer.generated().is_none());

    composer.generate().unwrap();
    composer.clear_drawing();
    assert!(composer.generated().is_none());
    assert!(composer.strokes().is_empty());
}

#[test]
fn test_payload_survives_transfer_encoding() {
    let mut composer = Composer::new();
    composer.set_text("Jane Doe");
    composer.set_font(ScriptFont::GreatVibes);
    composer.set_color("#1a2b3c".parse().unwrap());
    let payload = composer.drag_payload().unwrap();

    let encoded = payload.encode().unwrap();
    assert!(encoded.contains("\"type\":\"typed\""));
    assert!(encoded.contains("\"color\":\"#1a2b3c\""));
    assert_eq!(DragPayload::decode(&encoded).unwrap(), payload);
}

#[test]
fn test_garbage_payload_is_rejected() {
    assert!(matches!(
        DragPayload::decode("{\"type\":\"stamp\"}"),
        Err(SignError::Payload(_))
    ));
    assert!(matches!(DragPayload::decode("not json"), Err(SignError::Payload(_))));
}

#[tokio::test]
async fn test_renderer_lays_out_drawn_payload_at_raster_scale() {
    let mut composer = Composer::new();
    composer.set_mode(ComposerMode::Drawn);
    composer.set_font_size(20.0);
    scribble(&mut composer);
    let payload = composer.drag_payload().unwrap();

    let renderer = SignatureRenderer::new(BlockText, 2.0, Duration::from_secs(1));
    let raster = renderer.render(&payload).await.unwrap();

    // 80px layout width at 2x, aspect 2:1, 16px padding on each side
    assert_eq!(raster.image.dimensions(), (192, 112));
    assert_eq!(probe_natural_size(&raster.png).unwrap(), PixelSize::new(192.0, 112.0));
    assert_eq!(renderer.surfaces().active(), 0);
}

#[tokio::test]
async fn test_renderer_rejects_blank_typed_text() {
    let renderer = SignatureRenderer::new(BlockText, 2.0, Duration::from_secs(1));
    let payload = DragPayload::Typed(TypedStyle::default());
    assert!(matches!(renderer.render(&payload).await, Err(SignError::EmptySignature)));
    assert_eq!(renderer.surfaces().active(), 0);
}
