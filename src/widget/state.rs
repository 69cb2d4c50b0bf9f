use crate::render::shape::MaskShape;
use crate::widget::prefs::PreferenceStore;

/// Store key receiving the id of the widget being updated.
pub const WIDGET_ID_KEY: &str = "widget_id";
/// Store key receiving the number of widgets in the current update batch.
pub const WIDGET_SIZE_KEY: &str = "widget_size";

/// Per-widget store key, `{widget_id}_{field}`.
pub fn widget_key(widget_id: i64, field: &str) -> String {
    format!("{widget_id}_{field}")
}

/// Fields the configuring app stores for one widget.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WidgetState {
    /// Widget identifier.
    pub widget_id: i64,
    /// Collection the thumbnail belongs to (`{id}_collection`).
    pub collection: String,
    /// Content type discriminator (`{id}_type`).
    pub content_type: i64,
    /// Thumbnail identifier (`{id}_thumbnail_id`).
    pub thumbnail_id: i64,
    /// Whether the content is remote (`{id}_remote`).
    pub remote: bool,
    /// Mask shape (`{id}_shape`, selector 0/1/2).
    pub shape: MaskShape,
    /// Base64 or data-URI thumbnail (`{id}_thumbnail`).
    pub thumbnail: String,
}

impl WidgetState {
    /// Read the widget's fields, using `default_thumbnail` when none is stored.
    pub fn load(store: &dyn PreferenceStore, widget_id: i64, default_thumbnail: &str) -> Self {
        let key = |field: &str| widget_key(widget_id, field);
        Self {
            widget_id,
            collection: store.get_string(&key("collection"), ""),
            content_type: store.get_int(&key("type"), 0),
            thumbnail_id: store.get_int(&key("thumbnail_id"), 0),
            remote: store.get_bool(&key("remote"), false),
            shape: MaskShape::from_selector(store.get_int(&key("shape"), 0)),
            thumbnail: store.get_string(&key("thumbnail"), default_thumbnail),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/widget/state.rs"]
mod tests;
