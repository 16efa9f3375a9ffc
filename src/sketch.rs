//! Stroke data model: the persistent, editable set of freehand vector
//! strokes owned by the engine.

use crate::utils::point_distance;
use opencv::core::Point;

/// An ordered, append-growable sequence of points.
///
/// Insertion order is drawing order is rendering order. A stroke with fewer
/// than two points is valid data but not drawable as a line.
#[derive(Debug, Clone, Default)]
pub struct Stroke {
    points: Vec<Point>,
}

impl Stroke {
    /// Create a stroke seeded with its first point
    #[must_use]
    pub fn starting_at(point: Point) -> Self {
        Self { points: vec![point] }
    }

    /// Append a point, unconditionally
    pub fn push(&mut self, point: Point) {
        self.points.push(point);
    }

    /// The most recently appended point
    #[must_use]
    pub fn last(&self) -> Option<Point> {
        self.points.last().copied()
    }

    /// All points in drawing order
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Number of points
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when the stroke has no points
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// True when the stroke has enough points to render as a line
    #[must_use]
    pub fn is_drawable(&self) -> bool {
        self.points.len() >= 2
    }

    /// Rigidly translate every point, preserving order and count
    pub fn translate(&mut self, dx: i32, dy: i32) {
        for p in &mut self.points {
            p.x += dx;
            p.y += dy;
        }
    }
}

/// The ordered stroke collection owned by the engine.
///
/// Insertion order is z-order (later strokes draw on top). Indices are
/// stable for the lifetime of the process; strokes are never removed.
#[derive(Debug, Clone, Default)]
pub struct StrokeStore {
    strokes: Vec<Stroke>,
}

impl StrokeStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stroke and return its stable index
    pub fn push_stroke(&mut self, stroke: Stroke) -> usize {
        self.strokes.push(stroke);
        self.strokes.len() - 1
    }

    /// Stroke at an index
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Stroke> {
        self.strokes.get(index)
    }

    /// Mutable stroke at an index
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Stroke> {
        self.strokes.get_mut(index)
    }

    /// Read-only iteration in z-order, for rendering
    pub fn iter(&self) -> impl Iterator<Item = &Stroke> {
        self.strokes.iter()
    }

    /// Number of strokes
    #[must_use]
    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    /// True when the store holds no strokes
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    /// Find the stroke owning the point closest to `target`, considering
    /// only points strictly within `radius`.
    ///
    /// Scans every point of every stroke; ties go to the first-encountered
    /// point in store iteration order (lowest stroke index, then lowest
    /// point index). Returns `None` when nothing is in range, including on
    /// an empty store.
    #[must_use]
    pub fn nearest_stroke_within(&self, target: Point, radius: f64) -> Option<usize> {
        let mut best: Option<(f64, usize)> = None;
        for (index, stroke) in self.strokes.iter().enumerate() {
            for &p in stroke.points() {
                let d = point_distance(p, target);
                if d < radius && best.map_or(true, |(best_d, _)| d < best_d) {
                    best = Some((d, index));
                }
            }
        }
        best.map(|(_, index)| index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stroke_growth_and_order() {
        let mut stroke = Stroke::starting_at(Point::new(0, 0));
        stroke.push(Point::new(5, 0));
        stroke.push(Point::new(5, 5));

        assert_eq!(stroke.len(), 3);
        assert_eq!(stroke.points(), &[Point::new(0, 0), Point::new(5, 0), Point::new(5, 5)]);
        assert_eq!(stroke.last(), Some(Point::new(5, 5)));
    }

    #[test]
    fn test_single_point_stroke_not_drawable() {
        let stroke = Stroke::starting_at(Point::new(3, 4));
        assert!(!stroke.is_drawable());
        assert_eq!(stroke.len(), 1);

        let mut stroke = stroke;
        stroke.push(Point::new(10, 4));
        assert!(stroke.is_drawable());
    }

    #[test]
    fn test_translate_preserves_order_and_count() {
        let mut stroke = Stroke::starting_at(Point::new(1, 1));
        stroke.push(Point::new(2, 2));
        stroke.translate(10, -5);

        assert_eq!(stroke.points(), &[Point::new(11, -4), Point::new(12, -3)]);
    }

    #[test]
    fn test_translate_by_zero_is_identity() {
        let mut stroke = Stroke::starting_at(Point::new(7, 9));
        stroke.push(Point::new(8, 10));
        let before = stroke.points().to_vec();

        stroke.translate(0, 0);
        assert_eq!(stroke.points(), before.as_slice());
    }

    #[test]
    fn test_store_indices_are_stable() {
        let mut store = StrokeStore::new();
        let a = store.push_stroke(Stroke::starting_at(Point::new(0, 0)));
        let b = store.push_stroke(Stroke::starting_at(Point::new(100, 100)));

        assert_eq!(a, 0);
        assert_eq!(b, 1);
        assert_eq!(store.get(a).unwrap().last(), Some(Point::new(0, 0)));
        assert_eq!(store.get(b).unwrap().last(), Some(Point::new(100, 100)));
    }

    #[test]
    fn test_nearest_picks_globally_closest() {
        let mut store = StrokeStore::new();
        store.push_stroke(Stroke::starting_at(Point::new(0, 20)));
        store.push_stroke(Stroke::starting_at(Point::new(0, 10)));

        // Both within radius, second stroke's point is closer
        assert_eq!(store.nearest_stroke_within(Point::new(0, 0), 26.0), Some(1));
    }

    #[test]
    fn test_nearest_tie_goes_to_first_stroke() {
        let mut store = StrokeStore::new();
        store.push_stroke(Stroke::starting_at(Point::new(0, 10)));
        store.push_stroke(Stroke::starting_at(Point::new(10, 0)));

        assert_eq!(store.nearest_stroke_within(Point::new(0, 0), 26.0), Some(0));
    }

    #[test]
    fn test_nearest_radius_is_strict() {
        let mut store = StrokeStore::new();
        store.push_stroke(Stroke::starting_at(Point::new(26, 0)));

        // Exactly at the capture radius does not qualify
        assert_eq!(store.nearest_stroke_within(Point::new(0, 0), 26.0), None);
        assert_eq!(store.nearest_stroke_within(Point::new(1, 0), 26.0), Some(0));
    }

    #[test]
    fn test_nearest_on_empty_store() {
        let store = StrokeStore::new();
        assert_eq!(store.nearest_stroke_within(Point::new(0, 0), 26.0), None);
    }
}
