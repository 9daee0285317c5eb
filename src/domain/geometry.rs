//! Node extents and the predicates the renderer consumes.

use std::borrow::Cow;
use std::f64::consts::{PI, TAU};
use std::fmt;

use serde::Serialize;

/// Rings beyond this outer radius are off the chart.
pub const VISIBLE_RADIUS_MAX: f64 = 3.0;
/// Rings inside this inner radius sit under the center disc.
pub const VISIBLE_RADIUS_MIN: f64 = 1.0;
/// Minimum normalized angular area for a readable label.
pub const LABEL_AREA_MIN: f64 = 0.03;

/// Angular (radians) and radial (ring units) bounds of a node.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Extents {
    pub angle_start: f64,
    pub angle_end: f64,
    pub radius_start: f64,
    pub radius_end: f64,
}

impl Extents {
    pub fn new(angle_start: f64, angle_end: f64, radius_start: f64, radius_end: f64) -> Self {
        Self {
            angle_start,
            angle_end,
            radius_start,
            radius_end,
        }
    }

    pub fn angle_span(&self) -> f64 {
        self.angle_end - self.angle_start
    }

    pub fn radial_span(&self) -> f64 {
        self.radius_end - self.radius_start
    }

    pub fn is_visible(&self) -> bool {
        self.in_visible_rings() && self.angle_end > self.angle_start
    }

    pub fn label_visible(&self) -> bool {
        self.in_visible_rings() && self.radial_span() * self.angle_span() > LABEL_AREA_MIN
    }

    fn in_visible_rings(&self) -> bool {
        self.radius_end <= VISIBLE_RADIUS_MAX && self.radius_start >= VISIBLE_RADIUS_MIN
    }

    /// Re-expresses these extents with `focus` centered: the focus span
    /// stretches to the full circle and its ring becomes the center.
    ///
    /// Angles outside the focus span clamp to its edges and so collapse
    /// to zero width. `focus` must have a positive angular span.
    pub fn relative_to(&self, focus: &Extents) -> Extents {
        let span = focus.angle_span();
        let remap = |angle: f64| ((angle - focus.angle_start) / span).clamp(0.0, 1.0) * TAU;
        Extents {
            angle_start: remap(self.angle_start),
            angle_end: remap(self.angle_end),
            radius_start: (self.radius_start - focus.radius_start).max(0.0),
            radius_end: (self.radius_end - focus.radius_start).max(0.0),
        }
    }

    /// Component-wise linear interpolation, `t` in `[0, 1]`.
    pub fn lerp(&self, to: &Extents, t: f64) -> Extents {
        let mix = |a: f64, b: f64| a + (b - a) * t;
        Extents {
            angle_start: mix(self.angle_start, to.angle_start),
            angle_end: mix(self.angle_end, to.angle_end),
            radius_start: mix(self.radius_start, to.radius_start),
            radius_end: mix(self.radius_end, to.radius_end),
        }
    }

    /// Placement of the node's label on a chart whose rings are `chart_radius` wide.
    pub fn label_transform(&self, chart_radius: f64) -> LabelTransform {
        let mid_angle = (self.angle_start + self.angle_end) / 2.0 * 180.0 / PI;
        LabelTransform {
            rotate: mid_angle - 90.0,
            translate: (self.radius_start + self.radius_end) / 2.0 * chart_radius,
            flip: mid_angle >= 180.0,
        }
    }
}

/// Rotate, push out along the radius, then flip labels on the left half upright.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LabelTransform {
    /// Degrees
    pub rotate: f64,
    /// Distance from the center in chart units
    pub translate: f64,
    pub flip: bool,
}

impl fmt::Display for LabelTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rotate({}) translate({}, 0) rotate({})",
            self.rotate,
            self.translate,
            if self.flip { 180 } else { 0 }
        )
    }
}

/// Text drawn on a segment: intensity ratings `1` to `5` render as that many dots.
pub fn label_text(name: &str) -> Cow<'_, str> {
    match name.trim().parse::<usize>() {
        Ok(n @ 1..=5) => Cow::Owned(vec!["●"; n].join(" ")),
        _ => Cow::Borrowed(name),
    }
}

/// Cubic ease-in-out over `[0, 1]`.
pub fn ease_cubic_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0) * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility_window() {
        assert!(Extents::new(0.0, 1.0, 1.0, 2.0).is_visible());
        assert!(Extents::new(0.0, 1.0, 2.0, 3.0).is_visible());
        assert!(!Extents::new(0.0, 1.0, 0.0, 1.0).is_visible());
        assert!(!Extents::new(0.0, 1.0, 3.0, 4.0).is_visible());
        assert!(!Extents::new(1.0, 1.0, 1.0, 2.0).is_visible());
    }

    #[test]
    fn test_label_needs_area() {
        assert!(Extents::new(0.0, 0.05, 1.0, 2.0).label_visible());
        assert!(!Extents::new(0.0, 0.02, 1.0, 2.0).label_visible());
    }

    #[test]
    fn test_relative_to_collapses_outside_nodes() {
        let focus = Extents::new(PI, 1.5 * PI, 1.0, 2.0);
        let inside = Extents::new(PI, 1.25 * PI, 2.0, 3.0).relative_to(&focus);
        assert!((inside.angle_start - 0.0).abs() < 1e-12);
        assert!((inside.angle_end - PI).abs() < 1e-12);
        assert_eq!(inside.radius_start, 1.0);

        let outside = Extents::new(0.0, 0.5 * PI, 1.0, 2.0).relative_to(&focus);
        assert_eq!(outside.angle_span(), 0.0);
        assert_eq!(outside.radius_start, 0.0);
        assert_eq!(outside.radius_end, 1.0);
    }

    #[test]
    fn test_easing_endpoints() {
        assert_eq!(ease_cubic_in_out(0.0), 0.0);
        assert_eq!(ease_cubic_in_out(1.0), 1.0);
        assert!((ease_cubic_in_out(0.5) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_label_text_renders_ratings_as_dots() {
        assert_eq!(label_text("1"), "●");
        assert_eq!(label_text("3"), "● ● ●");
        assert_eq!(label_text("5"), "● ● ● ● ●");
        assert_eq!(label_text("0"), "0");
        assert_eq!(label_text("6"), "6");
        assert_eq!(label_text("Jasmine"), "Jasmine");
    }

    #[test]
    fn test_label_transform_flips_left_half() {
        let right = Extents::new(0.0, 0.5, 1.0, 2.0).label_transform(100.0);
        assert!(!right.flip);
        assert_eq!(right.translate, 150.0);
        let left = Extents::new(PI, 1.5 * PI, 1.0, 2.0).label_transform(100.0);
        assert!(left.flip);
        assert_eq!(left.to_string(), format!("rotate({}) translate(150, 0) rotate(180)", left.rotate));
    }
}
