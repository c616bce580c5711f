use image::RgbaImage;
use pdf_sign::*;
use std::sync::Arc;

fn annotation(page: usize, x: f32, y: f32) -> SignatureAnnotation {
    let image = RgbaImage::new(20, 10);
    let png = pdf_sign::payload::encode_png(&image).unwrap();
    SignatureAnnotation::new(
        page,
        Arc::new(image),
        Arc::new(png),
        NormRect {
            x,
            y,
            width: 0.1,
            height: 0.05,
        },
        1.0,
    )
}

#[test]
fn test_insert_assigns_unique_ids() {
    let mut store = AnnotationStore::new();
    let a = store.insert(annotation(0, 0.1, 0.1));
    let b = store.insert(annotation(0, 0.1, 0.1));
    assert_ne!(a, b);
    assert_eq!(store.len(), 2);
}

#[test]
fn test_delete_is_idempotent() {
    let mut store = AnnotationStore::new();
    let keep = store.insert(annotation(0, 0.1, 0.1));
    let gone = store.insert(annotation(1, 0.5, 0.5));

    assert!(store.remove(gone));
    assert!(!store.remove(gone));
    assert_eq!(store.len(), 1);
    assert!(store.contains(keep));
}

#[test]
fn test_move_leaves_other_annotations_untouched() {
    let mut store = AnnotationStore::new();
    let moved = store.insert(annotation(0, 0.1, 0.1));
    let other = store.insert(annotation(0, 0.4, 0.4));
    let before = store.get(other).unwrap().rect;

    assert!(store.move_to(moved, 0.3, 0.6));
    let rect = store.get(moved).unwrap().rect;
    assert_eq!((rect.x, rect.y), (0.3, 0.6));
    assert_eq!((rect.width, rect.height), (0.1, 0.05));
    assert_eq!(store.get(other).unwrap().rect, before);
}

#[test]
fn test_move_unknown_id_is_rejected() {
    let mut store = AnnotationStore::new();
    store.insert(annotation(0, 0.1, 0.1));
    assert!(!store.move_to(uuid::Uuid::new_v4(), 0.5, 0.5));
}

#[test]
fn test_snapshot_is_unaffected_by_later_mutations() {
    let mut store = AnnotationStore::new();
    let id = store.insert(annotation(0, 0.1, 0.1));
    let snapshot = store.snapshot();

    store.move_to(id, 0.9, 0.9);
    store.insert(annotation(2, 0.2, 0.2));

    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].rect.x, 0.1);
    assert_eq!(store.len(), 2);
}

#[test]
fn test_on_page_filters_by_page() {
    let mut store = AnnotationStore::new();
    store.insert(annotation(0, 0.1, 0.1));
    store.insert(annotation(1, 0.1, 0.1));
    store.insert(annotation(1, 0.2, 0.2));
    assert_eq!(store.on_page(0).count(), 1);
    assert_eq!(store.on_page(1).count(), 2);
    assert_eq!(store.on_page(5).count(), 0);
}

#[test]
fn test_from_pixels_keeps_box_inside_page() {
    let page = PixelSize::new(800.0, 1000.0);
    let rect = NormRect::from_pixels(PixelPoint::new(700.0, 980.0), PixelSize::new(200.0, 50.0), page);
    assert!(rect.is_within_unit());
    assert!((rect.x - 0.75).abs() < 1e-6);
    assert!((rect.y - 0.95).abs() < 1e-6);

    let oversized = NormRect::from_pixels(PixelPoint::new(10.0, 10.0), PixelSize::new(1600.0, 50.0), page);
    assert_eq!(oversized.width, 1.0);
    assert_eq!(oversized.x, 0.0);
}
