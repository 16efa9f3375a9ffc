//! Utility functions: shared pixel geometry and crop-rectangle handling.

pub mod safe_cast;

use opencv::core::{Point, Rect};
use safe_cast::f32_to_i32_clamp;

/// Euclidean distance between two pixel points
#[must_use]
pub fn point_distance(a: Point, b: Point) -> f64 {
    f64::from(a.x - b.x).hypot(f64::from(a.y - b.y))
}

/// Expand a detected hand box by `margin`, square it, and clamp it to the
/// frame, producing the crop rectangle for the landmark model.
#[allow(clippy::cast_precision_loss)] // Precision loss acceptable for box dimensions
#[must_use]
pub fn refine_hand_box(bbox: Rect, frame_width: i32, frame_height: i32, margin: f32) -> Rect {
    let x_pad = f32_to_i32_clamp(bbox.width as f32 * margin, 0, frame_width);
    let y_pad = f32_to_i32_clamp(bbox.height as f32 * margin, 0, frame_height);

    let mut refined = bbox;
    refined.x = (refined.x - x_pad).max(0);
    refined.y = (refined.y - y_pad).max(0);
    refined.width = (refined.width + 2 * x_pad).min(frame_width - refined.x);
    refined.height = (refined.height + 2 * y_pad).min(frame_height - refined.y);

    // Square crop, as the landmark model expects
    let side = refined.width.max(refined.height).min(frame_width).min(frame_height);
    refined.width = side;
    refined.height = side;

    if refined.x + refined.width > frame_width {
        refined.x = frame_width - refined.width;
    }
    if refined.y + refined.height > frame_height {
        refined.y = frame_height - refined.height;
    }

    refined
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_distance() {
        assert_eq!(point_distance(Point::new(0, 0), Point::new(3, 4)), 5.0);
        assert_eq!(point_distance(Point::new(-1, -1), Point::new(-1, -1)), 0.0);
        assert_eq!(point_distance(Point::new(10, 0), Point::new(0, 0)), 10.0);
    }

    #[test]
    fn test_refine_produces_square_within_frame() {
        let refined = refine_hand_box(Rect::new(10, 10, 50, 80), 640, 480, 0.25);

        assert_eq!(refined.width, refined.height);
        assert!(refined.x >= 0 && refined.y >= 0);
        assert!(refined.x + refined.width <= 640);
        assert!(refined.y + refined.height <= 480);
        assert!(refined.width > 80);
    }

    #[test]
    fn test_refine_clamps_at_frame_edges() {
        let refined = refine_hand_box(Rect::new(600, 440, 60, 60), 640, 480, 0.5);

        assert!(refined.x >= 0 && refined.y >= 0);
        assert!(refined.x + refined.width <= 640);
        assert!(refined.y + refined.height <= 480);
        assert_eq!(refined.width, refined.height);
    }

    #[test]
    fn test_refine_handles_box_larger_than_frame() {
        let refined = refine_hand_box(Rect::new(0, 0, 640, 480), 640, 480, 0.5);

        assert!(refined.width <= 640);
        assert!(refined.height <= 480);
        assert!(refined.x >= 0 && refined.y >= 0);
    }
}
