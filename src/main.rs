//! Hand sketching application: point to draw, pinch to grab and move strokes.

use anyhow::Result;
use clap::Parser;
use hand_sketch::app::{AppConfig, GuiMode, InvertMode, SketchApp, VideoSource};
use log::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Camera index to use
    #[arg(long, default_value = "0")]
    cam: i32,

    /// Video file to process
    #[arg(short, long)]
    video: Option<String>,

    /// Landmark smoothing filter (none, moving_average, exponential, one_euro)
    #[arg(short, long)]
    filter: Option<String>,

    /// GUI display mode (all, cam, none); overrides the config file
    #[arg(short, long)]
    gui: Option<String>,

    /// Invert image (none, x, y, xy); x gives the mirror/selfie view
    #[arg(short, long)]
    inv: Option<String>,

    /// Brightness adjustment value (0 to disable, typical: 30)
    #[arg(short, long)]
    brightness: Option<f32>,

    /// Hide the hand skeleton overlay
    #[arg(long)]
    no_skeleton: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    info!("Hand Sketch - gesture-driven freehand drawing");

    // Load configuration if provided
    let mut settings = if let Some(config_path) = &args.config {
        info!("Loading configuration from: {}", config_path);
        match hand_sketch::config::Config::from_file(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                log::warn!("Failed to load config file: {}. Using defaults.", e);
                hand_sketch::config::Config::default()
            }
        }
    } else {
        hand_sketch::config::Config::default()
    };

    // Command line switches override the file settings
    if let Some(filter) = args.filter {
        settings.filter.default_filter = filter;
    }
    if args.no_skeleton {
        settings.display.show_skeleton = false;
    }

    let gui = args.gui.unwrap_or_else(|| settings.display.gui_mode.clone());
    let invert_mode = match args.inv.as_deref() {
        Some("none") => InvertMode::None,
        Some("y") => InvertMode::Y,
        Some("xy") => InvertMode::XY,
        Some(_) => InvertMode::X,
        None => match (settings.display.flip_x, settings.display.flip_y) {
            (true, true) => InvertMode::XY,
            (true, false) => InvertMode::X,
            (false, true) => InvertMode::Y,
            (false, false) => InvertMode::None,
        },
    };
    let brightness = args.brightness.unwrap_or(settings.display.brightness as f32);

    let config = AppConfig {
        video_source: if let Some(video_path) = args.video {
            VideoSource::File(video_path)
        } else {
            VideoSource::Camera(args.cam)
        },
        gui_mode: match gui.as_str() {
            "cam" => GuiMode::Camera,
            "none" => GuiMode::None,
            _ => GuiMode::All,
        },
        invert_mode,
        brightness,
        settings,
    };

    let mut app = SketchApp::new(config)?;
    app.run()?;

    Ok(())
}
