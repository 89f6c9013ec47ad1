use reportero::{
    artifact::ImageArtifact,
    signature::{INK_RGBA, Point, SignatureSurface},
};

fn decode_rgba(artifact: &ImageArtifact) -> image::RgbaImage {
    let bytes = artifact.decode_bytes().expect("base64");
    image::load_from_memory(&bytes).expect("png").to_rgba8()
}

fn inked(img: &image::RgbaImage, x: u32, y: u32) -> bool {
    img.get_pixel(x, y).0 == INK_RGBA
}

fn stroke(surface: &mut SignatureSurface, from: Point, to: Point) -> Option<ImageArtifact> {
    surface.begin_stroke(from);
    surface.extend_stroke(to);
    surface.end_stroke()
}

#[test]
fn stroke_end_emits_the_full_buffer() {
    let mut surface = SignatureSurface::new(300, 100, 1.0);
    assert!(surface.is_empty());
    assert!(surface.artifact().is_none());

    let artifact = stroke(
        &mut surface,
        Point { x: 10.0, y: 50.0 },
        Point { x: 60.0, y: 50.0 },
    )
    .expect("artifact");

    assert!(!surface.is_empty());
    let img = decode_rgba(&artifact);
    assert_eq!((img.width(), img.height()), (300, 100));
    assert!(inked(&img, 30, 50));
    assert!(!inked(&img, 200, 50));
}

#[test]
fn clear_then_stroke_contains_only_the_new_stroke() {
    let mut surface = SignatureSurface::new(300, 100, 1.0);
    stroke(
        &mut surface,
        Point { x: 10.0, y: 20.0 },
        Point { x: 100.0, y: 20.0 },
    )
    .expect("first stroke");

    surface.clear();
    assert!(surface.is_empty());
    assert!(surface.artifact().is_none());

    let artifact = stroke(
        &mut surface,
        Point { x: 10.0, y: 80.0 },
        Point { x: 100.0, y: 80.0 },
    )
    .expect("second stroke");

    let img = decode_rgba(&artifact);
    assert!(inked(&img, 50, 80));
    assert!(!inked(&img, 50, 20));
}

#[test]
fn artifact_accumulates_all_strokes() {
    let mut surface = SignatureSurface::new(300, 100, 1.0);
    stroke(
        &mut surface,
        Point { x: 10.0, y: 20.0 },
        Point { x: 100.0, y: 20.0 },
    )
    .expect("first stroke");
    let artifact = stroke(
        &mut surface,
        Point { x: 10.0, y: 80.0 },
        Point { x: 100.0, y: 80.0 },
    )
    .expect("second stroke");

    let img = decode_rgba(&artifact);
    assert!(inked(&img, 50, 20), "earlier stroke must stay in the raster");
    assert!(inked(&img, 50, 80));
}

#[test]
fn extend_and_end_without_begin_are_noops() {
    let mut surface = SignatureSurface::new(300, 100, 1.0);
    surface.extend_stroke(Point { x: 50.0, y: 50.0 });
    assert!(surface.end_stroke().is_none());
    assert!(surface.is_empty());
}

#[test]
fn base_layer_stays_under_new_strokes() {
    let mut first = SignatureSurface::new(300, 100, 1.0);
    let base = stroke(
        &mut first,
        Point { x: 10.0, y: 20.0 },
        Point { x: 100.0, y: 20.0 },
    )
    .expect("base stroke");

    let mut resumed = SignatureSurface::with_base(300, 100, 1.0, &base);
    assert!(!resumed.is_empty());

    let artifact = stroke(
        &mut resumed,
        Point { x: 10.0, y: 80.0 },
        Point { x: 100.0, y: 80.0 },
    )
    .expect("new stroke");

    let img = decode_rgba(&artifact);
    assert!(inked(&img, 50, 20), "base layer must remain");
    assert!(inked(&img, 50, 80));
}

#[test]
fn device_pixel_ratio_scales_the_raster() {
    let mut surface = SignatureSurface::new(300, 100, 2.0);
    assert_eq!(surface.raster_size(), (600, 200));

    let artifact = stroke(
        &mut surface,
        Point { x: 10.0, y: 50.0 },
        Point { x: 60.0, y: 50.0 },
    )
    .expect("artifact");

    let img = decode_rgba(&artifact);
    assert_eq!((img.width(), img.height()), (600, 200));
    assert!(inked(&img, 60, 100));
}
