//! homewidget renders the thumbnail of a home-screen photo widget.
//!
//! A configuring app stores a base64 thumbnail and a few fields per widget in a shared
//! key/value store. An update pass turns those into pixels:
//!
//! 1. **Decode**: base64 or data-URI -> [`RasterImage`], re-encoded as JPEG at decreasing
//!    quality while its footprint exceeds the [`SizeBudget`] ([`decode_and_fit`])
//! 2. **Composite**: scale, center and clip to a [`MaskShape`] on a square canvas
//!    ([`composite`], [`CpuCompositor`])
//! 3. **Present**: hand the image and a [`LaunchIntent`] to a [`WidgetHost`]
//!    ([`update_widgets`])
//!
//! Decoding and compositing are pure, synchronous and deterministic. Output rasters are
//! straight-alpha RGBA8.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod foundation;
mod render;
mod widget;

pub use crate::assets::decode::{
    Compression, FittedImage, QUALITY_STEP, START_QUALITY, decode_and_fit,
    decode_and_fit_report, decode_base64, decode_raster, encode_jpeg, strip_data_uri,
};
pub use crate::foundation::core::{Affine, BezPath, CanvasSize, Point, RasterImage, SizeBudget};
pub use crate::foundation::error::{DecodeError, WidgetError, WidgetResult};
pub use crate::render::cpu::{CpuCompositor, DEFAULT_BACKDROP_RGBA, Placement, composite};
pub use crate::render::shape::{MaskShape, circle_path, heart_path};
pub use crate::widget::intent::{LAUNCH_BASE, LaunchIntent};
pub use crate::widget::prefs::{MemoryPrefs, PrefValue, PreferenceStore};
pub use crate::widget::state::{WIDGET_ID_KEY, WIDGET_SIZE_KEY, WidgetState, widget_key};
pub use crate::widget::update::{UpdateStats, WidgetHost, WidgetOpts, WidgetView, update_widgets};
