use kurbo::Shape as _;

use crate::foundation::core::{BezPath, Point};

// Curve flattening tolerance, in pixels.
const PATH_TOLERANCE: f64 = 0.1;

/// Mask applied to the widget thumbnail.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum MaskShape {
    /// No mask; the thumbnail is passed through untouched.
    #[default]
    None,
    /// Circle inscribed in the canvas.
    Circle,
    /// Heart inscribed in the same bounding circle.
    Heart,
}

impl MaskShape {
    /// Map the stored selector (`0` none, `1` circle, `2` heart).
    ///
    /// Unknown selectors fall back to [`MaskShape::None`].
    pub fn from_selector(selector: i64) -> Self {
        match selector {
            0 => Self::None,
            1 => Self::Circle,
            2 => Self::Heart,
            other => {
                tracing::warn!(selector = other, "unknown shape selector, drawing unmasked");
                Self::None
            }
        }
    }

    /// Stored selector value for this shape.
    pub fn selector(self) -> i64 {
        match self {
            Self::None => 0,
            Self::Circle => 1,
            Self::Heart => 2,
        }
    }

    /// Clip path for this shape centered on `center` with bounding radius `radius`.
    ///
    /// Returns `None` for [`MaskShape::None`].
    pub fn path(self, center: Point, radius: f64) -> Option<BezPath> {
        match self {
            Self::None => None,
            Self::Circle => Some(circle_path(center, radius)),
            Self::Heart => Some(heart_path(center, radius)),
        }
    }
}

/// Circle of `radius` around `center`.
pub fn circle_path(center: Point, radius: f64) -> BezPath {
    kurbo::Circle::new(center, radius).to_path(PATH_TOLERANCE)
}

/// Symmetric heart inside the circle of `radius` around `center`.
///
/// Two mirrored cubics run from the top notch down to the bottom point.
pub fn heart_path(center: Point, radius: f64) -> BezPath {
    // Unit-space points, y pointing down; mirrored on x for the right half.
    const NOTCH: (f64, f64) = (0.0, -0.5);
    const LOBE_CTRL: (f64, f64) = (0.55, -1.3);
    const SIDE_CTRL: (f64, f64) = (1.5, -0.2);
    const TIP: (f64, f64) = (0.0, 1.0);
    // Keeps the lobes inside the bounding circle.
    const FIT: f64 = 0.95;

    let at = |(x, y): (f64, f64), side: f64| {
        Point::new(
            center.x + side * x * radius * FIT,
            center.y + y * radius * FIT + radius * (1.0 - FIT),
        )
    };

    let mut p = BezPath::new();
    p.move_to(at(NOTCH, 1.0));
    p.curve_to(at(LOBE_CTRL, -1.0), at(SIDE_CTRL, -1.0), at(TIP, 1.0));
    p.curve_to(at(SIDE_CTRL, 1.0), at(LOBE_CTRL, 1.0), at(NOTCH, 1.0));
    p.close_path();
    p
}

#[cfg(test)]
#[path = "../../tests/unit/render/shape.rs"]
mod tests;
