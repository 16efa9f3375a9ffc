//! Constants used throughout the application

/// Number of keypoints in a hand landmark set
pub const NUM_HAND_LANDMARKS: usize = 21;

/// Hand landmark indices (`MediaPipe` hand layout)
pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

/// Hand skeleton bone pairs for overlay drawing
pub const HAND_SKELETON: [(usize, usize); 21] = [
    (WRIST, THUMB_CMC),
    (THUMB_CMC, THUMB_MCP),
    (THUMB_MCP, THUMB_IP),
    (THUMB_IP, THUMB_TIP),
    (WRIST, INDEX_MCP),
    (INDEX_MCP, INDEX_PIP),
    (INDEX_PIP, INDEX_DIP),
    (INDEX_DIP, INDEX_TIP),
    (WRIST, MIDDLE_MCP),
    (MIDDLE_MCP, MIDDLE_PIP),
    (MIDDLE_PIP, MIDDLE_DIP),
    (MIDDLE_DIP, MIDDLE_TIP),
    (WRIST, RING_MCP),
    (RING_MCP, RING_PIP),
    (RING_PIP, RING_DIP),
    (RING_DIP, RING_TIP),
    (WRIST, PINKY_MCP),
    (PINKY_MCP, PINKY_PIP),
    (PINKY_PIP, PINKY_DIP),
    (PINKY_DIP, PINKY_TIP),
    (INDEX_MCP, MIDDLE_MCP),
];

/// Thumb-tip to index-tip distance below which a pinch is recognized,
/// in pixels at the reference 640x480 capture resolution
pub const DEFAULT_PINCH_THRESHOLD: f64 = 32.0;

/// Maximum distance at which a pinch onset may claim a stroke, in pixels
pub const DEFAULT_CAPTURE_RADIUS: f64 = 26.0;

/// Minimum spacing between consecutive stroke points, in pixels
pub const DEFAULT_MIN_STROKE_SPACING: f64 = 4.0;

/// Image normalization constants for the palm detector
pub const IMAGE_NORMALIZATION_OFFSET: f32 = 127.5;
pub const IMAGE_NORMALIZATION_SCALE: f32 = 128.0;

/// Default brightness adjustment value
pub const DEFAULT_BRIGHTNESS: i32 = 0;

/// Default bounding-box expansion margin before the landmark crop
pub const DEFAULT_BOX_MARGIN: f32 = 0.25;

/// Default window sizes for filters
pub const DEFAULT_MOVING_AVERAGE_WINDOW: usize = 5;

/// Default filter parameters
pub const DEFAULT_EXPONENTIAL_ALPHA: f64 = 0.5;
pub const DEFAULT_ONE_EURO_MIN_CUTOFF: f64 = 1.0;
pub const DEFAULT_ONE_EURO_BETA: f64 = 0.15;
