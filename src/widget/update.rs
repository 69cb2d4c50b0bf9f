use crate::assets::decode::decode_and_fit_report;
use crate::foundation::core::{CanvasSize, RasterImage, SizeBudget};
use crate::foundation::error::WidgetResult;
use crate::render::cpu::{CpuCompositor, DEFAULT_BACKDROP_RGBA};
use crate::widget::intent::LaunchIntent;
use crate::widget::prefs::{PrefValue, PreferenceStore};
use crate::widget::state::{WIDGET_ID_KEY, WIDGET_SIZE_KEY, WidgetState};

/// Options for an update pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WidgetOpts {
    pub(crate) size_budget: SizeBudget,
    pub(crate) placeholder_rgba: [u8; 4],
    pub(crate) backdrop_rgba: [u8; 4],
    pub(crate) canvas_override: Option<CanvasSize>,
}

impl Default for WidgetOpts {
    fn default() -> Self {
        Self {
            size_budget: SizeBudget::DEFAULT,
            placeholder_rgba: [0xE0, 0xE0, 0xE0, 0xFF],
            backdrop_rgba: DEFAULT_BACKDROP_RGBA,
            canvas_override: None,
        }
    }
}

impl WidgetOpts {
    /// Return options with a different decode budget.
    pub fn with_size_budget(mut self, budget: SizeBudget) -> Self {
        self.size_budget = budget;
        self
    }

    /// Return options with the straight RGBA color drawn when a thumbnail cannot be decoded.
    pub fn with_placeholder_rgba(mut self, rgba: [u8; 4]) -> Self {
        self.placeholder_rgba = rgba;
        self
    }

    /// Return options with the straight RGBA color filled inside the mask under the image.
    pub fn with_backdrop_rgba(mut self, rgba: [u8; 4]) -> Self {
        self.backdrop_rgba = rgba;
        self
    }

    /// Return options that skip layout measurement and use a fixed canvas.
    pub fn with_canvas(mut self, canvas: Option<CanvasSize>) -> Self {
        self.canvas_override = canvas;
        self
    }

    /// Decode budget in use.
    pub fn size_budget(&self) -> SizeBudget {
        self.size_budget
    }
}

/// What the host displays for one widget.
#[derive(Clone, Debug)]
pub struct WidgetView {
    /// Final (masked) thumbnail.
    pub image: RasterImage,
    /// Tap target.
    pub launch: LaunchIntent,
}

/// Platform side of the widget: layout measurement, default content and the view surface.
pub trait WidgetHost {
    /// Thumbnail used when the store has none for a widget.
    fn default_thumbnail(&self) -> String;

    /// Natural `(width, height)` of the widget layout; the canvas is the larger of the two.
    fn measure_layout(&self) -> (u32, u32);

    /// Present `view` for `widget_id`.
    fn update_widget(&mut self, widget_id: i64, view: WidgetView) -> WidgetResult<()>;
}

/// Counters for one update pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UpdateStats {
    /// Widgets handed to the host.
    pub updated: usize,
    /// Widgets shown with the placeholder because their thumbnail did not decode.
    pub placeholders: usize,
    /// Widgets whose update failed and were skipped.
    pub failed: usize,
}

/// Run one update pass over `widget_ids`, in order.
///
/// Each widget's failure is logged and counted; it does not stop the batch.
#[tracing::instrument(skip(store, host, opts))]
pub fn update_widgets(
    widget_ids: &[i64],
    store: &mut dyn PreferenceStore,
    host: &mut dyn WidgetHost,
    opts: &WidgetOpts,
) -> WidgetResult<UpdateStats> {
    let mut stats = UpdateStats::default();
    let mut compositor = CpuCompositor::new().with_backdrop_rgba(opts.backdrop_rgba);
    let default_thumbnail = host.default_thumbnail();

    for &widget_id in widget_ids {
        store.set(WIDGET_ID_KEY, PrefValue::Int(widget_id));
        store.set(WIDGET_SIZE_KEY, PrefValue::Int(widget_ids.len() as i64));

        let state = WidgetState::load(store, widget_id, &default_thumbnail);
        match update_one(&state, host, opts, &mut compositor) {
            Ok(placeholder) => {
                stats.updated += 1;
                if placeholder {
                    stats.placeholders += 1;
                }
            }
            Err(err) => {
                tracing::warn!(widget_id, error = %err, "widget update failed");
                stats.failed += 1;
            }
        }
    }

    tracing::debug!(?stats, "update pass finished");
    Ok(stats)
}

// Returns whether the placeholder was drawn.
fn update_one(
    state: &WidgetState,
    host: &mut dyn WidgetHost,
    opts: &WidgetOpts,
    compositor: &mut CpuCompositor,
) -> WidgetResult<bool> {
    let launch = LaunchIntent::for_state(state)?;
    let canvas = match opts.canvas_override {
        Some(canvas) => canvas,
        None => {
            let (w, h) = host.measure_layout();
            CanvasSize::new(w.max(h))?
        }
    };

    let (source, placeholder) = match decode_and_fit_report(&state.thumbnail, opts.size_budget) {
        Ok(fitted) => (fitted.image, false),
        Err(err) => {
            tracing::warn!(
                widget_id = state.widget_id,
                error = %err,
                "thumbnail did not decode, drawing placeholder"
            );
            let side = canvas.get();
            (RasterImage::solid(side, side, opts.placeholder_rgba), true)
        }
    };

    let image = compositor.composite(&source, canvas, state.shape)?;
    host.update_widget(state.widget_id, WidgetView { image, launch })?;
    Ok(placeholder)
}

#[cfg(test)]
#[path = "../../tests/unit/widget/update.rs"]
mod tests;
