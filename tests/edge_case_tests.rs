//! Edge case tests for the engine, stroke store and landmark validation


use hand_sketch::engine::SketchEngine;
use hand_sketch::gesture::LandmarkSet;
use hand_sketch::sketch::{Stroke, StrokeStore};
use opencv::core::Point;
use test_helpers::{pinching_hand, pointing_hand};

#[test]
fn test_pinch_over_empty_store_is_a_noop() {
    let mut engine = SketchEngine::new();

    for _ in 0..3 {
        engine.step(Some(&pinching_hand(Point::new(100, 100))));
    }

    assert_eq!(engine.grabbed_stroke(), None);
    assert!(engine.strokes().is_empty());
}

#[test]
fn test_empty_pinch_retries_until_in_range() {
    let mut engine = SketchEngine::new();
    engine.step(Some(&pointing_hand(Point::new(0, 0))));
    engine.step(None);

    // Holding an empty pinch keeps scanning; once the grab point drifts
    // into range the stroke is captured without releasing first
    engine.step(Some(&pinching_hand(Point::new(100, 0))));
    assert_eq!(engine.grabbed_stroke(), None);
    engine.step(Some(&pinching_hand(Point::new(10, 0))));
    assert_eq!(engine.grabbed_stroke(), Some(0));
}

#[test]
fn test_no_hand_frames_leave_store_untouched() {
    let mut engine = SketchEngine::new();
    engine.step(Some(&pointing_hand(Point::new(0, 0))));

    for _ in 0..10 {
        engine.step(None);
    }

    assert_eq!(engine.strokes().len(), 1);
    assert_eq!(engine.strokes().get(0).unwrap().points(), &[Point::new(0, 0)]);
}

#[test]
fn test_landmark_cardinality_is_validated() {
    for count in [0, 1, 20, 22, 42] {
        let points = vec![Point::new(0, 0); count];
        let result = LandmarkSet::from_points(&points);
        assert!(result.is_err(), "cardinality {count} should be rejected");

        let message = result.unwrap_err().to_string();
        assert!(message.contains("21"), "error should name the expected count");
    }

    let points = vec![Point::new(0, 0); 21];
    assert!(LandmarkSet::from_points(&points).is_ok());
}

#[test]
fn test_negative_coordinates_are_valid_stroke_data() {
    let mut store = StrokeStore::new();
    let mut stroke = Stroke::starting_at(Point::new(5, 5));
    stroke.push(Point::new(15, 5));
    let index = store.push_stroke(stroke);

    // Dragging off-canvas is allowed; the store holds any integer points
    store.get_mut(index).unwrap().translate(-100, -100);
    assert_eq!(
        store.get(index).unwrap().points(),
        &[Point::new(-95, -95), Point::new(-85, -95)]
    );

    // And the stroke can be grabbed back from there
    assert_eq!(store.nearest_stroke_within(Point::new(-90, -95), 26.0), Some(index));
}

#[test]
fn test_grab_during_draw_gesture_overlap() {
    // A pinch whose index fingertip is also raised classifies as both
    // point and pinch; both controllers act on the same frame
    let mut engine = SketchEngine::new();
    engine.step(Some(&pointing_hand(Point::new(50, 50))));
    engine.step(None);

    let mut points = test_helpers::neutral_hand(Point::new(50, 55));
    points[hand_sketch::constants::INDEX_PIP] = Point::new(50, 105);
    points[hand_sketch::constants::INDEX_TIP] = Point::new(50, 55);
    points[hand_sketch::constants::THUMB_TIP] = Point::new(60, 55);
    let lm = LandmarkSet::from_points(&points).unwrap();

    let output = engine.step(Some(&lm));
    let gesture = output.gesture.unwrap();
    assert!(gesture.point && gesture.pinch);

    // The point gesture started stroke 1 while the pinch grabbed the
    // nearest stroke; single-hand input makes this a benign overlap
    assert_eq!(engine.strokes().len(), 2);
    assert!(engine.grabbed_stroke().is_some());
}

#[test]
fn test_very_long_stroke_grab_scan() {
    let mut store = StrokeStore::new();
    let mut stroke = Stroke::starting_at(Point::new(0, 0));
    for x in 1..5000 {
        stroke.push(Point::new(x, 0));
    }
    store.push_stroke(stroke);

    assert_eq!(store.nearest_stroke_within(Point::new(4999, 10), 26.0), Some(0));
    assert_eq!(store.nearest_stroke_within(Point::new(4999, 100), 26.0), None);
}
