// Command-line options and the validated run configuration built from them.

use clap::Parser;

use crate::detector::DetectorSettings;
use crate::error::Error;
use crate::mode::Mode;

#[derive(Parser, Debug)]
#[command(name = "hand-pointer", about = "Drive the mouse (or a sketch pad) with your hand")]
pub struct Args {
    /// Control mode
    #[arg(long, value_enum, default_value_t = Mode::Mouse)]
    pub mode: Mode,

    /// Camera index
    #[arg(long, default_value_t = 0)]
    pub camera: u32,

    /// Requested capture width
    #[arg(long, default_value_t = 320)]
    pub width: u32,

    /// Requested capture height
    #[arg(long, default_value_t = 240)]
    pub height: u32,

    /// Cursor travel per unit of hand travel
    #[arg(long, default_value_t = 0.5)]
    pub sensitivity: f32,

    /// Consecutive frames a click gesture must be held before it clicks
    #[arg(long, default_value_t = 3)]
    pub stability_frames: u32,

    /// Smoothing weight of the newest target, in (0, 1]; smaller = smoother but laggier
    #[arg(long, default_value_t = 0.2)]
    pub smoothing_alpha: f32,

    #[arg(long, default_value_t = 0.5)]
    pub min_detection_confidence: f32,

    #[arg(long, default_value_t = 0.5)]
    pub min_tracking_confidence: f32,

    /// Hands the detector may report (only the first one is used)
    #[arg(long, default_value_t = 2)]
    pub max_hands: u32,

    /// Landmark detector command line
    #[arg(long, default_value = "hand-landmarks")]
    pub detector: String,

    /// Show the camera unmirrored
    #[arg(long)]
    pub no_mirror: bool,

    /// Stroke width in Draw mode (pixels)
    #[arg(long, default_value_t = 5)]
    pub brush_width: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub mode: Mode,
    pub camera_index: u32,
    pub camera_size: (u32, u32),
    pub mirror: bool,
    pub sensitivity: f32,
    pub stability_frames: u32,
    pub smoothing_alpha: f32,
    pub detector: DetectorSettings,
    pub brush_color: u32,
    pub brush_width: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: Mode::Mouse,
            camera_index: 0,
            camera_size: (320, 240),
            mirror: true,
            sensitivity: 0.5,
            stability_frames: 3,
            smoothing_alpha: 0.2,
            detector: DetectorSettings {
                command: "hand-landmarks".into(),
                max_hands: 2,
                min_detection_confidence: 0.5,
                min_tracking_confidence: 0.5,
            },
            brush_color: 0x00FF_0000,
            brush_width: 5,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), Error> {
        let bad = |msg: String| Err(Error::Config(msg));
        if !(self.smoothing_alpha > 0.0 && self.smoothing_alpha <= 1.0) {
            return bad(format!("smoothing alpha must be in (0, 1], got {}", self.smoothing_alpha));
        }
        if !(self.sensitivity > 0.0 && self.sensitivity.is_finite()) {
            return bad(format!("sensitivity must be positive, got {}", self.sensitivity));
        }
        for (name, v) in [
            ("detection", self.detector.min_detection_confidence),
            ("tracking", self.detector.min_tracking_confidence),
        ] {
            if !(0.0..=1.0).contains(&v) {
                return bad(format!("min {name} confidence must be in [0, 1], got {v}"));
            }
        }
        if self.camera_size.0 == 0 || self.camera_size.1 == 0 {
            return bad("camera size must be non-zero".into());
        }
        if self.brush_width == 0 {
            return bad("brush width must be at least 1".into());
        }
        if self.detector.max_hands == 0 {
            return bad("max hands must be at least 1".into());
        }
        if self.detector.command.trim().is_empty() {
            return bad("detector command is empty".into());
        }
        Ok(())
    }
}

impl TryFrom<Args> for Config {
    type Error = Error;

    fn try_from(args: Args) -> Result<Self, Error> {
        let config = Config {
            mode: args.mode,
            camera_index: args.camera,
            camera_size: (args.width, args.height),
            mirror: !args.no_mirror,
            sensitivity: args.sensitivity,
            stability_frames: args.stability_frames,
            smoothing_alpha: args.smoothing_alpha,
            detector: DetectorSettings {
                command: args.detector,
                max_hands: args.max_hands,
                min_detection_confidence: args.min_detection_confidence,
                min_tracking_confidence: args.min_tracking_confidence,
            },
            brush_width: args.brush_width,
            ..Config::default()
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Result<Config, Error> {
        let args = Args::try_parse_from(std::iter::once("hand-pointer").chain(argv.iter().copied()))
            .expect("arguments parse");
        Config::try_from(args)
    }

    #[test]
    fn defaults_match_the_documented_values() {
        let config = parse(&[]).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.camera_size, (320, 240));
        assert_eq!(config.sensitivity, 0.5);
        assert_eq!(config.stability_frames, 3);
        assert_eq!(config.smoothing_alpha, 0.2);
        assert_eq!(config.detector.min_detection_confidence, 0.5);
        assert_eq!(config.detector.min_tracking_confidence, 0.5);
    }

    #[test]
    fn mode_and_tuning_come_from_flags() {
        let config = parse(&["--mode", "draw", "--smoothing-alpha", "1", "--stability-frames", "5", "--no-mirror"])
            .unwrap();
        assert_eq!(config.mode, Mode::Draw);
        assert_eq!(config.smoothing_alpha, 1.0);
        assert_eq!(config.stability_frames, 5);
        assert!(!config.mirror);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        assert!(matches!(parse(&["--smoothing-alpha", "0"]), Err(Error::Config(_))));
        assert!(matches!(parse(&["--smoothing-alpha", "1.5"]), Err(Error::Config(_))));
        assert!(matches!(parse(&["--sensitivity", "0"]), Err(Error::Config(_))));
        assert!(matches!(parse(&["--min-detection-confidence", "2"]), Err(Error::Config(_))));
        assert!(matches!(parse(&["--width", "0"]), Err(Error::Config(_))));
        assert!(matches!(parse(&["--brush-width", "0"]), Err(Error::Config(_))));
    }
}
