use super::*;

fn canvas(n: u32) -> CanvasSize {
    CanvasSize::new(n).unwrap()
}

fn gradient(width: u32, height: u32) -> RasterImage {
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            data.extend_from_slice(&[(x * 3) as u8, (y * 5) as u8, 120, 255]);
        }
    }
    RasterImage::from_rgba8(width, height, data).unwrap()
}

#[test]
fn placement_scales_longest_side_and_centers() {
    assert_eq!(
        Placement::fit(100, 50, canvas(128)),
        Placement {
            left: 0,
            top: 32,
            width: 128,
            height: 64
        }
    );
    assert_eq!(
        Placement::fit(200, 200, canvas(128)),
        Placement {
            left: 0,
            top: 0,
            width: 128,
            height: 128
        }
    );
    let tall = Placement::fit(30, 90, canvas(90));
    assert_eq!((tall.left, tall.top, tall.width, tall.height), (30, 0, 30, 90));
}

#[test]
fn masked_output_is_always_canvas_sized() {
    for shape in [MaskShape::Circle, MaskShape::Heart] {
        for src in [gradient(100, 50), gradient(200, 200), gradient(7, 300)] {
            let out = composite(&src, canvas(128), shape).unwrap();
            assert_eq!((out.width, out.height), (128, 128));
            assert_eq!(out.data.len(), 128 * 128 * 4);
        }
    }
}

#[test]
fn none_is_passthrough() {
    let src = gradient(33, 17);
    let out = composite(&src, canvas(128), MaskShape::None).unwrap();
    assert_eq!(out, src);
}

#[test]
fn circle_clears_corners_and_keeps_center() {
    let src = RasterImage::solid(64, 64, [200, 30, 30, 255]);
    let out = composite(&src, canvas(128), MaskShape::Circle).unwrap();

    for (x, y) in [(0, 0), (127, 0), (0, 127), (127, 127), (5, 5)] {
        assert_eq!(out.pixel(x, y).unwrap()[3], 0, "corner ({x},{y})");
    }
    let center = out.pixel(64, 64).unwrap();
    assert_eq!(center[3], 255);
    for (got, want) in center[..3].iter().zip([200u8, 30, 30]) {
        assert!(got.abs_diff(want) <= 2, "{got} vs {want}");
    }
}

#[test]
fn heart_clears_outside_notch_and_keeps_center() {
    let src = RasterImage::solid(64, 64, [10, 200, 90, 255]);
    let out = composite(&src, canvas(128), MaskShape::Heart).unwrap();

    for (x, y) in [(0, 0), (127, 0), (0, 127), (127, 127), (64, 10)] {
        assert_eq!(out.pixel(x, y).unwrap()[3], 0, "({x},{y})");
    }
    assert_eq!(out.pixel(64, 64).unwrap()[3], 255);
    assert_eq!(out.pixel(64, 100).unwrap()[3], 255);
}

#[test]
fn aspect_ratio_is_preserved_not_stretched() {
    // 100x50 lands in rows 32..96; rows above show the backdrop inside the circle.
    let src = RasterImage::solid(100, 50, [255, 255, 255, 255]);
    let out = composite(&src, canvas(128), MaskShape::Circle).unwrap();
    assert_eq!(out.pixel(64, 16), Some([0, 0, 0, 255]));
    assert_eq!(out.pixel(64, 40), Some([255, 255, 255, 255]));
    assert_eq!(out.pixel(0, 0).unwrap()[3], 0);
}

#[test]
fn backdrop_color_is_configurable() {
    let src = RasterImage::solid(50, 100, [255, 255, 255, 255]);
    let out = CpuCompositor::new()
        .with_backdrop_rgba([10, 20, 200, 255])
        .composite(&src, canvas(128), MaskShape::Heart)
        .unwrap();
    // 50x100 lands in columns 32..96; the heart is wider than that at its center row.
    let backdrop = out.pixel(20, 50).unwrap();
    for (got, want) in backdrop.iter().zip([10u8, 20, 200, 255]) {
        assert!(got.abs_diff(want) <= 1, "{backdrop:?}");
    }
    assert_eq!(out.pixel(64, 64), Some([255, 255, 255, 255]));
}

#[test]
fn composite_is_deterministic_across_calls_and_reuse() {
    let src = gradient(90, 60);
    let a = composite(&src, canvas(96), MaskShape::Heart).unwrap();
    let b = composite(&src, canvas(96), MaskShape::Heart).unwrap();
    assert_eq!(a.data, b.data);

    let mut compositor = CpuCompositor::new();
    let _ = compositor
        .composite(&src, canvas(48), MaskShape::Circle)
        .unwrap();
    let c = compositor
        .composite(&src, canvas(96), MaskShape::Heart)
        .unwrap();
    let d = compositor
        .composite(&src, canvas(96), MaskShape::Heart)
        .unwrap();
    assert_eq!(a.data, c.data);
    assert_eq!(c.data, d.data);
}

#[test]
fn empty_source_yields_masked_backdrop() {
    let src = RasterImage::from_rgba8(0, 0, Vec::new()).unwrap();
    let out = composite(&src, canvas(16), MaskShape::Circle).unwrap();
    assert_eq!((out.width, out.height), (16, 16));
    assert_eq!(out.pixel(0, 0), Some([0, 0, 0, 0]));
    assert_eq!(out.pixel(8, 8), Some([0, 0, 0, 255]));
}

#[test]
fn mask_apply_alpha_scales_src_by_mask_alpha() {
    let src = vec![200u8, 100, 50, 255];
    let mask = vec![0u8, 0, 0, 128];
    let mut dst = vec![0u8; 4];
    mask_apply_alpha(&src, &mask, &mut dst);
    assert_eq!(dst, vec![100, 50, 25, 128]);
}
