//! Gesture classification from hand landmark geometry.
//!
//! A gesture is a per-frame boolean classification derived from the current
//! landmark set only; nothing here carries state between frames.

use crate::constants::{
    DEFAULT_PINCH_THRESHOLD, INDEX_PIP, INDEX_TIP, MIDDLE_PIP, MIDDLE_TIP, NUM_HAND_LANDMARKS, PINKY_PIP, PINKY_TIP,
    RING_PIP, RING_TIP, THUMB_TIP,
};
use crate::utils::point_distance;
use crate::{Error, Result};
use opencv::core::Point;

/// One frame's 21 hand keypoints in frame pixel coordinates.
///
/// Produced fresh each frame by the landmark detector and discarded at frame
/// end; there is no identity across frames.
#[derive(Debug, Clone)]
pub struct LandmarkSet {
    points: [Point; NUM_HAND_LANDMARKS],
}

impl LandmarkSet {
    /// Build a landmark set from detector output.
    ///
    /// # Errors
    ///
    /// Returns an error if the slice does not contain exactly 21 points.
    pub fn from_points(points: &[Point]) -> Result<Self> {
        let points: [Point; NUM_HAND_LANDMARKS] = points.try_into().map_err(|_| {
            Error::LandmarkValidation(format!(
                "Expected {NUM_HAND_LANDMARKS} hand landmarks, got {}",
                points.len()
            ))
        })?;
        Ok(Self { points })
    }

    /// Keypoint at a landmark index (wrist = 0 .. pinky tip = 20)
    #[must_use]
    pub fn point(&self, index: usize) -> Point {
        self.points[index]
    }

    /// All keypoints, for skeleton drawing
    #[must_use]
    pub fn points(&self) -> &[Point; NUM_HAND_LANDMARKS] {
        &self.points
    }

    /// The draw cursor: the index fingertip
    #[must_use]
    pub fn cursor(&self) -> Point {
        self.points[INDEX_TIP]
    }

    /// The grab point: the midpoint between thumb tip and index tip.
    ///
    /// Integer midpoint with truncating division, distinct from the draw
    /// cursor.
    #[must_use]
    pub fn grab_point(&self) -> Point {
        let thumb = self.points[THUMB_TIP];
        let index = self.points[INDEX_TIP];
        Point::new((thumb.x + index.x) / 2, (thumb.y + index.y) / 2)
    }
}

/// Per-frame gesture flags.
///
/// `point` and `fist` are mutually exclusive by definition; `pinch` is
/// independent and may co-occur with either.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GestureState {
    /// Thumb tip and index tip are close together
    pub pinch: bool,
    /// Index extended, the other fingers curled
    pub point: bool,
    /// No finger extended
    pub fist: bool,
}

/// Stateless gesture classifier
#[derive(Debug, Clone)]
pub struct GestureClassifier {
    pinch_threshold: f64,
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_PINCH_THRESHOLD)
    }
}

impl GestureClassifier {
    /// Create a classifier with a pinch distance threshold in pixels.
    ///
    /// The threshold is resolution-dependent and should scale with the
    /// capture frame size.
    #[must_use]
    pub fn new(pinch_threshold: f64) -> Self {
        Self { pinch_threshold }
    }

    /// Classify one frame's landmarks into gesture flags.
    ///
    /// Total and pure; when no hand is present this is simply not called.
    #[must_use]
    pub fn classify(&self, lm: &LandmarkSet) -> GestureState {
        let index = Self::finger_extended(lm, INDEX_TIP, INDEX_PIP);
        let middle = Self::finger_extended(lm, MIDDLE_TIP, MIDDLE_PIP);
        let ring = Self::finger_extended(lm, RING_TIP, RING_PIP);
        let pinky = Self::finger_extended(lm, PINKY_TIP, PINKY_PIP);

        let pinch = point_distance(lm.point(THUMB_TIP), lm.point(INDEX_TIP)) < self.pinch_threshold;
        let point = index && !middle && !ring && !pinky;
        let fist = !index && !middle && !ring && !pinky;

        GestureState { pinch, point, fist }
    }

    /// A finger counts as extended when its tip sits above its PIP joint in
    /// screen coordinates (smaller y). Orientation-dependent heuristic,
    /// valid for an upright hand facing the camera.
    fn finger_extended(lm: &LandmarkSet, tip: usize, pip: usize) -> bool {
        lm.point(tip).y < lm.point(pip).y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::NUM_HAND_LANDMARKS;

    /// Neutral hand with all fingers curled (tips below their PIP joints)
    fn curled_hand() -> Vec<Point> {
        let mut points = vec![Point::new(100, 200); NUM_HAND_LANDMARKS];
        for &(tip, pip) in &[
            (INDEX_TIP, INDEX_PIP),
            (MIDDLE_TIP, MIDDLE_PIP),
            (RING_TIP, RING_PIP),
            (PINKY_TIP, PINKY_PIP),
        ] {
            points[pip] = Point::new(100, 150);
            points[tip] = Point::new(100, 180);
        }
        points[THUMB_TIP] = Point::new(60, 190);
        points
    }

    fn extend_finger(points: &mut [Point], tip: usize, pip: usize) {
        points[pip] = Point::new(100, 150);
        points[tip] = Point::new(100, 100);
    }

    #[test]
    fn test_point_gesture() {
        let mut points = curled_hand();
        extend_finger(&mut points, INDEX_TIP, INDEX_PIP);
        let lm = LandmarkSet::from_points(&points).unwrap();

        let g = GestureClassifier::default().classify(&lm);
        assert!(g.point);
        assert!(!g.fist);
    }

    #[test]
    fn test_fist_gesture() {
        let lm = LandmarkSet::from_points(&curled_hand()).unwrap();

        let g = GestureClassifier::default().classify(&lm);
        assert!(g.fist);
        assert!(!g.point);
    }

    #[test]
    fn test_point_requires_other_fingers_curled() {
        let mut points = curled_hand();
        extend_finger(&mut points, INDEX_TIP, INDEX_PIP);
        extend_finger(&mut points, MIDDLE_TIP, MIDDLE_PIP);
        let lm = LandmarkSet::from_points(&points).unwrap();

        let g = GestureClassifier::default().classify(&lm);
        assert!(!g.point);
        assert!(!g.fist);
    }

    #[test]
    fn test_pinch_threshold_boundary() {
        let mut points = curled_hand();
        points[THUMB_TIP] = Point::new(100, 100);

        // Exactly at the threshold is not a pinch
        points[INDEX_TIP] = Point::new(132, 100);
        let lm = LandmarkSet::from_points(&points).unwrap();
        assert!(!GestureClassifier::default().classify(&lm).pinch);

        // One pixel inside is
        points[INDEX_TIP] = Point::new(131, 100);
        let lm = LandmarkSet::from_points(&points).unwrap();
        assert!(GestureClassifier::default().classify(&lm).pinch);
    }

    #[test]
    fn test_pinch_independent_of_point() {
        let mut points = curled_hand();
        extend_finger(&mut points, INDEX_TIP, INDEX_PIP);
        points[THUMB_TIP] = Point::new(100, 105);
        let lm = LandmarkSet::from_points(&points).unwrap();

        let g = GestureClassifier::default().classify(&lm);
        assert!(g.pinch);
        assert!(g.point);
    }

    #[test]
    fn test_grab_point_midpoint() {
        let mut points = curled_hand();
        points[THUMB_TIP] = Point::new(10, 21);
        points[INDEX_TIP] = Point::new(21, 30);
        let lm = LandmarkSet::from_points(&points).unwrap();

        // Truncating integer midpoint
        assert_eq!(lm.grab_point(), Point::new(15, 25));
        assert_eq!(lm.cursor(), Point::new(21, 30));
    }

    #[test]
    fn test_wrong_cardinality_rejected() {
        let points = vec![Point::new(0, 0); 20];
        assert!(LandmarkSet::from_points(&points).is_err());

        let points = vec![Point::new(0, 0); 22];
        assert!(LandmarkSet::from_points(&points).is_err());
    }
}
