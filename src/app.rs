//! Main application module: camera capture, hand tracking, and the overlay
//! renderer around the sketch engine.

use crate::{
    config::Config,
    constants::{HAND_SKELETON, WRIST},
    engine::{FrameOutput, SketchEngine},
    error::Result,
    filters::PointFilter,
    gesture::LandmarkSet,
    hand_detection::{HandDetection, HandDetector},
    landmark_detection::{landmarks_to_frame, HandLandmarkDetector},
    utils::refine_hand_box,
};
use log::{info, warn};
use opencv::{
    core::{Mat, Point, Scalar, Vector, CV_8UC3},
    highgui::{self, WINDOW_NORMAL},
    imgproc::{self, FONT_HERSHEY_SIMPLEX, LINE_8, LINE_AA},
    prelude::*,
    videoio::{self, VideoCapture, CAP_PROP_BUFFERSIZE},
};
use std::time::{Duration, Instant};

/// Stroke glow rendering passes: (thickness, blend alpha)
const GLOW_PASSES: [(i32, f64); 3] = [(18, 0.12), (8, 0.22), (3, 0.95)];

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Camera index or video file path
    pub video_source: VideoSource,
    /// GUI display mode
    pub gui_mode: GuiMode,
    /// Image inversion mode
    pub invert_mode: InvertMode,
    /// Brightness adjustment value
    pub brightness: f32,
    /// Models, thresholds and display settings
    pub settings: Config,
}

/// Video source type
#[derive(Debug, Clone)]
pub enum VideoSource {
    /// Webcam index
    Camera(i32),
    /// Video file path
    File(String),
}

/// GUI display mode
#[derive(Debug, Clone, PartialEq)]
pub enum GuiMode {
    /// Camera with the sketch overlay
    All,
    /// Raw camera only
    Camera,
    /// No GUI (headless)
    None,
}

/// Image inversion mode
#[derive(Debug, Clone, PartialEq)]
pub enum InvertMode {
    /// No inversion
    None,
    /// Mirror horizontally (selfie view)
    X,
    /// Flip vertically
    Y,
    /// Both horizontal and vertical
    XY,
}

/// Main application struct
pub struct SketchApp {
    config: AppConfig,
    hand_detector: HandDetector,
    landmark_detector: HandLandmarkDetector,
    engine: SketchEngine,
    landmark_filter: Box<dyn PointFilter>,
    video_capture: VideoCapture,
}

impl SketchApp {
    /// Create a new hand sketching application
    pub fn new(config: AppConfig) -> Result<Self> {
        info!("Initializing Hand Sketch application");

        let mut video_capture = match &config.video_source {
            VideoSource::Camera(index) => {
                info!("Opening camera {}", index);
                let mut cap = VideoCapture::new(*index, videoio::CAP_ANY)?;

                // Reduce buffer size for lower latency (webcam only)
                cap.set(CAP_PROP_BUFFERSIZE, 1.0)?;

                cap
            }
            VideoSource::File(path) => {
                info!("Opening video file: {}", path);
                VideoCapture::from_file(path, videoio::CAP_ANY)?
            }
        };

        let settings = &config.settings;
        let hand_detector = HandDetector::new(
            &settings.models.palm_detector,
            settings.hand_detection.confidence_threshold,
            settings.hand_detection.iou_threshold,
        )?;
        let landmark_detector = HandLandmarkDetector::new(&settings.models.hand_landmarks)?;

        let engine = SketchEngine::with_config(&settings.gestures);
        let landmark_filter = settings.create_filter()?;
        info!("Landmark smoothing: {}", landmark_filter.name());

        // Probe one frame so a dead source fails at startup, not mid-loop
        let mut probe = Mat::default();
        if !video_capture.read(&mut probe)? || probe.empty() {
            warn!("Video source produced no initial frame");
        }

        if config.gui_mode != GuiMode::None {
            highgui::named_window("Hand Sketch", WINDOW_NORMAL)?;
            highgui::resize_window("Hand Sketch", settings.display.window_width, settings.display.window_height)?;
        }

        Ok(Self {
            config,
            hand_detector,
            landmark_detector,
            engine,
            landmark_filter,
            video_capture,
        })
    }

    /// Run the main application loop
    pub fn run(&mut self) -> Result<()> {
        info!("Starting main application loop");

        let mut frame_count = 0u32;
        let start_time = Instant::now();
        let mut last_fps_update = Instant::now();
        let mut fps = 0.0;

        // Key-wait doubles as the frame pacing delay
        let frame_delay = (1000 / self.config.settings.display.target_fps.max(1)).max(1) as i32;

        loop {
            let mut frame = Mat::default();
            if !self.video_capture.read(&mut frame)? || frame.empty() {
                if matches!(self.config.video_source, VideoSource::File(_)) {
                    info!("End of video file reached");
                    break;
                }
                warn!("Failed to read frame, retrying...");
                continue;
            }

            self.apply_transformations(&mut frame)?;

            let result = self.process_frame(&frame)?;

            frame_count += 1;
            if last_fps_update.elapsed() >= Duration::from_secs(1) {
                fps = f64::from(frame_count) / start_time.elapsed().as_secs_f64();
                last_fps_update = Instant::now();
            }

            if self.config.gui_mode != GuiMode::None {
                self.display_results(&frame, &result, fps)?;

                let key = highgui::wait_key(frame_delay)?;
                if key == 27 || key == i32::from(b'q') {
                    info!("Exit requested by user");
                    break;
                }
            }
        }

        info!(
            "Application shutting down with {} strokes on the canvas",
            self.engine.strokes().len()
        );
        Ok(())
    }

    /// Apply image transformations (brightness, inversion)
    fn apply_transformations(&self, frame: &mut Mat) -> Result<()> {
        if self.config.brightness != 0.0 {
            let brightness_scalar = Scalar::all(f64::from(self.config.brightness));
            let temp = frame.clone();
            opencv::core::add(&temp, &brightness_scalar, frame, &Mat::default(), -1)?;
        }

        match self.config.invert_mode {
            InvertMode::None => {}
            InvertMode::X => {
                let temp = frame.clone();
                opencv::core::flip(&temp, frame, 1)?;
            }
            InvertMode::Y => {
                let temp = frame.clone();
                opencv::core::flip(&temp, frame, 0)?;
            }
            InvertMode::XY => {
                let temp = frame.clone();
                opencv::core::flip(&temp, frame, -1)?;
            }
        }

        Ok(())
    }

    /// Process a single frame: track the hand and step the engine.
    ///
    /// A frame whose landmark regression fails is rejected whole: the
    /// engine is not stepped, so no state mutates on malformed tracking
    /// output.
    fn process_frame(&mut self, frame: &Mat) -> Result<FrameResult> {
        let detections = self.hand_detector.detect(frame)?;
        let detection = detections.into_iter().next();
        if let Some(hand) = &detection {
            log::debug!("Hand at {:?} (score {:.2})", hand.bbox, hand.score);
        }

        let landmarks = match &detection {
            Some(hand) => match self.track_landmarks(frame, hand) {
                Ok(lm) => Some(lm),
                Err(e) => {
                    warn!("Dropping frame, landmark tracking failed: {e}");
                    return Ok(FrameResult {
                        detection,
                        landmarks: None,
                        output: FrameOutput::default(),
                    });
                }
            },
            None => {
                // Forget smoothing history across hand loss
                self.landmark_filter.reset();
                None
            }
        };

        let output = self.engine.step(landmarks.as_ref());

        Ok(FrameResult {
            detection,
            landmarks,
            output,
        })
    }

    /// Crop, regress and smooth the landmark set for one detected hand
    fn track_landmarks(&mut self, frame: &Mat, hand: &HandDetection) -> Result<LandmarkSet> {
        let crop_rect = refine_hand_box(
            hand.bbox,
            frame.cols(),
            frame.rows(),
            self.config.settings.hand_detection.box_margin,
        );
        if crop_rect.width <= 0 || crop_rect.height <= 0 {
            return Err(crate::error::Error::InvalidInput(
                "Degenerate hand crop rectangle".to_string(),
            ));
        }

        let crop = Mat::roi(frame, crop_rect)?.try_clone()?;
        let marks = self.landmark_detector.detect(&crop)?;
        let lm = landmarks_to_frame(&marks, crop_rect, frame.cols(), frame.rows())?;

        Ok(self.smooth_landmarks(lm, frame.cols(), frame.rows()))
    }

    /// Shift the whole landmark set by the filter's wrist displacement.
    ///
    /// Filtering every landmark independently would bend the hand and
    /// disturb the classifier's relative geometry; one rigid displacement
    /// keeps the pose intact while still absorbing frame-to-frame jitter.
    fn smooth_landmarks(&mut self, lm: LandmarkSet, frame_width: i32, frame_height: i32) -> LandmarkSet {
        let wrist = lm.point(WRIST);
        let (fx, fy) = self.landmark_filter.apply(f64::from(wrist.x), f64::from(wrist.y));

        #[allow(clippy::cast_possible_truncation)] // Displacements are at pixel scale
        let (dx, dy) = ((fx - f64::from(wrist.x)).round() as i32, (fy - f64::from(wrist.y)).round() as i32);
        if dx == 0 && dy == 0 {
            return lm;
        }

        let shifted: Vec<Point> = lm
            .points()
            .iter()
            .map(|p| {
                Point::new(
                    (p.x + dx).clamp(0, frame_width.saturating_sub(1)),
                    (p.y + dy).clamp(0, frame_height.saturating_sub(1)),
                )
            })
            .collect();

        // Cardinality is preserved by construction
        LandmarkSet::from_points(&shifted).unwrap_or(lm)
    }

    /// Display the camera frame with the sketch overlay
    fn display_results(&self, frame: &Mat, result: &FrameResult, fps: f64) -> Result<()> {
        let mut out = frame.clone();

        if self.config.gui_mode == GuiMode::All {
            let mut overlay = Mat::zeros(frame.rows(), frame.cols(), CV_8UC3)?.to_mat()?;

            self.draw_strokes(&mut overlay)?;

            if self.config.settings.display.show_skeleton {
                if let Some(lm) = &result.landmarks {
                    Self::draw_skeleton(&mut overlay, lm)?;
                }
            }
            Self::draw_markers(&mut overlay, &result.output)?;

            let blended = out.clone();
            opencv::core::add_weighted(&blended, 1.0, &overlay, 1.0, 0.0, &mut out, -1)?;

            imgproc::put_text(
                &mut out,
                "ESC to quit | point=draw | pinch=grab",
                Point::new(14, 28),
                FONT_HERSHEY_SIMPLEX,
                0.7,
                Scalar::new(255.0, 255.0, 255.0, 0.0),
                2,
                LINE_AA,
                false,
            )?;
        }

        let fps_text = format!("FPS: {fps:.1}");
        imgproc::put_text(
            &mut out,
            &fps_text,
            Point::new(14, 56),
            FONT_HERSHEY_SIMPLEX,
            0.6,
            Scalar::new(0.0, 255.0, 0.0, 0.0),
            2,
            LINE_8,
            false,
        )?;

        highgui::imshow("Hand Sketch", &out)?;
        Ok(())
    }

    /// Render all drawable strokes with layered glow passes
    fn draw_strokes(&self, overlay: &mut Mat) -> Result<()> {
        let mut polylines: Vector<Vector<Point>> = Vector::new();
        for stroke in self.engine.strokes().iter() {
            if !stroke.is_drawable() {
                continue;
            }
            let mut line: Vector<Point> = Vector::new();
            for &p in stroke.points() {
                line.push(p);
            }
            polylines.push(line);
        }
        if polylines.is_empty() {
            return Ok(());
        }

        for (thickness, alpha) in GLOW_PASSES {
            // Wide white halos under a bright amber core
            let color = if thickness == 3 {
                Scalar::new(70.0, 200.0, 255.0, 0.0)
            } else {
                Scalar::new(255.0, 255.0, 255.0, 0.0)
            };

            let mut pass = overlay.clone();
            imgproc::polylines(&mut pass, &polylines, false, color, thickness, LINE_AA, 0)?;

            let base = overlay.clone();
            opencv::core::add_weighted(&base, 1.0, &pass, alpha, 0.0, overlay, -1)?;
        }

        Ok(())
    }

    /// Draw the hand skeleton for feedback
    fn draw_skeleton(overlay: &mut Mat, lm: &LandmarkSet) -> Result<()> {
        let color = Scalar::new(180.0, 180.0, 180.0, 0.0);
        for &(a, b) in &HAND_SKELETON {
            imgproc::line(overlay, lm.point(a), lm.point(b), color, 1, LINE_AA, 0)?;
        }
        for &p in lm.points() {
            imgproc::circle(overlay, p, 2, color, -1, LINE_AA, 0)?;
        }
        Ok(())
    }

    /// Draw the ephemeral cursor and grab-point markers
    fn draw_markers(overlay: &mut Mat, output: &FrameOutput) -> Result<()> {
        if let Some(cursor) = output.cursor {
            imgproc::circle(
                overlay,
                cursor,
                8,
                Scalar::new(255.0, 255.0, 255.0, 0.0),
                -1,
                LINE_AA,
                0,
            )?;
        }
        if let Some(grab_point) = output.grab_point {
            imgproc::circle(
                overlay,
                grab_point,
                10,
                Scalar::new(0.0, 255.0, 255.0, 0.0),
                2,
                LINE_AA,
                0,
            )?;
        }
        Ok(())
    }
}

/// Result of processing a single frame
pub struct FrameResult {
    /// Best hand detection, if any
    pub detection: Option<HandDetection>,
    /// Tracked landmark set in frame coordinates, if any
    pub landmarks: Option<LandmarkSet>,
    /// Engine output for the frame
    pub output: FrameOutput,
}
