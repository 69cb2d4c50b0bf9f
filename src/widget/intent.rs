use crate::foundation::error::{WidgetError, WidgetResult};
use crate::widget::state::WidgetState;

/// Base of the URI the host app opens when the widget is tapped.
pub const LAUNCH_BASE: &str = "homescreenwidget://view";

/// Tap-to-launch target carrying the widget's content identifiers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LaunchIntent {
    uri: url::Url,
}

impl LaunchIntent {
    /// Build `homescreenwidget://view?type=..&id=..&collection=..&remote=..` for `state`.
    pub fn for_state(state: &WidgetState) -> WidgetResult<Self> {
        let params = [
            ("type", state.content_type.to_string()),
            ("id", state.thumbnail_id.to_string()),
            ("collection", state.collection.clone()),
            ("remote", state.remote.to_string()),
        ];
        let uri = url::Url::parse_with_params(LAUNCH_BASE, &params)
            .map_err(|e| WidgetError::validation(format!("launch uri: {e}")))?;
        Ok(Self { uri })
    }

    /// The URI as a string.
    pub fn as_str(&self) -> &str {
        self.uri.as_str()
    }

    /// Decoded value of query parameter `name`.
    pub fn param(&self, name: &str) -> Option<String> {
        self.uri
            .query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    }
}

impl std::fmt::Display for LaunchIntent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/widget/intent.rs"]
mod tests;
