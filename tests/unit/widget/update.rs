use std::io::Cursor;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use super::*;
use crate::widget::prefs::MemoryPrefs;

#[derive(Default)]
struct RecordingHost {
    layout: (u32, u32),
    views: Vec<(i64, WidgetView)>,
}

impl WidgetHost for RecordingHost {
    fn default_thumbnail(&self) -> String {
        "not base64 at all!".to_string()
    }

    fn measure_layout(&self) -> (u32, u32) {
        self.layout
    }

    fn update_widget(&mut self, widget_id: i64, view: WidgetView) -> WidgetResult<()> {
        self.views.push((widget_id, view));
        Ok(())
    }
}

fn png_b64(width: u32, height: u32) -> String {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([30, 60, 90, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    STANDARD.encode(buf)
}

#[test]
fn canvas_is_larger_layout_side() {
    let mut prefs = MemoryPrefs::new();
    prefs.set("1_thumbnail", png_b64(10, 20).into());
    prefs.set("1_shape", 1i64.into());
    let mut host = RecordingHost {
        layout: (40, 72),
        ..Default::default()
    };

    let stats = update_widgets(&[1], &mut prefs, &mut host, &WidgetOpts::default()).unwrap();
    assert_eq!(stats.updated, 1);
    let (_, view) = &host.views[0];
    assert_eq!((view.image.width, view.image.height), (72, 72));
}

#[test]
fn unmasked_widget_shows_decoded_thumbnail() {
    let mut prefs = MemoryPrefs::new();
    prefs.set("4_thumbnail", png_b64(12, 8).into());
    let mut host = RecordingHost {
        layout: (100, 100),
        ..Default::default()
    };

    update_widgets(&[4], &mut prefs, &mut host, &WidgetOpts::default()).unwrap();
    let (_, view) = &host.views[0];
    assert_eq!((view.image.width, view.image.height), (12, 8));
    assert_eq!(view.image.pixel(0, 0), Some([30, 60, 90, 255]));
}

#[test]
fn undecodable_thumbnail_draws_placeholder() {
    let mut prefs = MemoryPrefs::new();
    prefs.set("2_shape", 1i64.into());
    let mut host = RecordingHost {
        layout: (32, 32),
        ..Default::default()
    };
    let opts = WidgetOpts::default().with_placeholder_rgba([1, 2, 3, 255]);

    let stats = update_widgets(&[2], &mut prefs, &mut host, &opts).unwrap();
    assert_eq!(
        stats,
        UpdateStats {
            updated: 1,
            placeholders: 1,
            failed: 0
        }
    );
    let (id, view) = &host.views[0];
    assert_eq!(*id, 2);
    assert_eq!(view.image.pixel(0, 0).unwrap()[3], 0);
    let center = view.image.pixel(16, 16).unwrap();
    assert_eq!(center[3], 255);
    for (got, want) in center[..3].iter().zip([1u8, 2, 3]) {
        assert!(got.abs_diff(want) <= 1, "{got} vs {want}");
    }
}

#[test]
fn backdrop_option_fills_uncovered_mask_area() {
    let mut prefs = MemoryPrefs::new();
    prefs.set("6_shape", 1i64.into());
    prefs.set("6_thumbnail", png_b64(40, 20).into());
    let mut host = RecordingHost {
        layout: (64, 64),
        ..Default::default()
    };

    update_widgets(&[6], &mut prefs, &mut host, &WidgetOpts::default()).unwrap();
    // 40x20 lands in rows 16..48.
    assert_eq!(host.views[0].1.image.pixel(32, 8), Some([0, 0, 0, 255]));

    let opts = WidgetOpts::default().with_backdrop_rgba([255, 255, 255, 255]);
    update_widgets(&[6], &mut prefs, &mut host, &opts).unwrap();
    let image = &host.views[1].1.image;
    assert_eq!(image.pixel(32, 8), Some([255, 255, 255, 255]));
    assert_eq!(image.pixel(0, 0).unwrap()[3], 0);
}

#[test]
fn zero_layout_fails_widget_without_aborting_batch() {
    let mut prefs = MemoryPrefs::new();
    prefs.set("8_thumbnail", png_b64(4, 4).into());
    let mut host = RecordingHost::default();

    let stats = update_widgets(&[8, 9], &mut prefs, &mut host, &WidgetOpts::default()).unwrap();
    assert_eq!(stats.failed, 2);
    assert!(host.views.is_empty());

    let opts = WidgetOpts::default().with_canvas(Some(CanvasSize::new(16).unwrap()));
    let stats = update_widgets(&[8, 9], &mut prefs, &mut host, &opts).unwrap();
    assert_eq!(stats.updated, 2);
    assert_eq!(stats.placeholders, 1);
}

#[test]
fn writes_back_last_widget_id_and_batch_size() {
    let mut prefs = MemoryPrefs::new();
    let mut host = RecordingHost {
        layout: (8, 8),
        ..Default::default()
    };
    update_widgets(&[3, 11, 5], &mut prefs, &mut host, &WidgetOpts::default()).unwrap();
    assert_eq!(prefs.get(WIDGET_ID_KEY), Some(PrefValue::Int(5)));
    assert_eq!(prefs.get(WIDGET_SIZE_KEY), Some(PrefValue::Int(3)));
    let ids: Vec<i64> = host.views.iter().map(|(id, _)| *id).collect();
    assert_eq!(ids, vec![3, 11, 5]);
}

#[test]
fn opts_builders() {
    let budget = SizeBudget::new(1000).unwrap();
    let opts = WidgetOpts::default().with_size_budget(budget);
    assert_eq!(opts.size_budget(), budget);
    assert_eq!(WidgetOpts::default().size_budget(), SizeBudget::DEFAULT);
}
