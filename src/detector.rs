//! Hand landmark detection through an external detector process.
//!
//! The detector is started once with its confidence settings and must print
//! `READY`. For each frame we write a little-endian header
//! (`width`, `height`, `channels = 3`, all `u32`) followed by packed RGB bytes,
//! and read back one JSON line:
//!
//! ```text
//! {"hands":[{"handedness":"Right","score":0.93,"landmarks":[{"x":0.5,"y":0.4,"z":-0.02}, ...]}],"error":null}
//! ```

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use log::{debug, info, warn};
use serde::Deserialize;

use crate::error::Error;
use crate::types::{FrameBuffer, Hand, Landmark};

/// Turns one frame into zero or one hand.
pub trait HandDetector {
    fn detect(&mut self, frame: &FrameBuffer) -> Result<Option<Hand>, Error>;
}

/// Settings forwarded to the detector process.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectorSettings {
    /// Program followed by its own arguments, split on whitespace.
    pub command: String,
    pub max_hands: u32,
    pub min_detection_confidence: f32,
    pub min_tracking_confidence: f32,
}

#[derive(Deserialize, Debug)]
struct LandmarkJson {
    x: f32,
    y: f32,
    z: f32,
}

#[derive(Deserialize, Debug)]
struct HandJson {
    #[serde(default)]
    handedness: String,
    score: f32,
    landmarks: Vec<LandmarkJson>,
}

#[derive(Deserialize, Debug)]
struct DetectionReply {
    hands: Vec<HandJson>,
    #[serde(default)]
    error: Option<String>,
}

/// Parse one reply line and keep the first hand that is confident enough and complete.
pub fn parse_reply(line: &str, min_score: f32) -> Result<Option<Hand>, Error> {
    let reply: DetectionReply = serde_json::from_str(line.trim())
        .map_err(|e| Error::Detector(format!("bad reply {line:?}: {e}")))?;

    if let Some(err) = reply.error {
        return Err(Error::Detector(err));
    }

    for hand in reply.hands {
        if hand.score < min_score {
            continue;
        }
        let points: Vec<Landmark> =
            hand.landmarks.iter().map(|l| Landmark::new(l.x, l.y, l.z)).collect();
        match Hand::from_slice(&points) {
            Some(h) => {
                debug!("Hand detected: {} (score={:.2})", hand.handedness, hand.score);
                return Ok(Some(h));
            }
            None => warn!("Expected 21 landmarks, got {}", points.len()),
        }
    }
    Ok(None)
}

/// Header + packed RGB bytes for one frame.
pub fn encode_frame(frame: &FrameBuffer) -> Vec<u8> {
    let mut out = Vec::with_capacity(12 + frame.pixels.len() * 3);
    out.extend_from_slice(&(frame.width as u32).to_le_bytes());
    out.extend_from_slice(&(frame.height as u32).to_le_bytes());
    out.extend_from_slice(&3u32.to_le_bytes());
    for &px in &frame.pixels {
        out.extend_from_slice(&[(px >> 16) as u8, (px >> 8) as u8, px as u8]);
    }
    out
}

pub struct SubprocessDetector {
    process: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    min_score: f32,
}

impl SubprocessDetector {
    /// Start the detector and wait for its `READY` line.
    pub fn spawn(settings: &DetectorSettings) -> Result<Self, Error> {
        let mut parts = settings.command.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| Error::Detector("empty detector command".into()))?;

        info!("Starting hand detector: {}", settings.command);
        let mut process = Command::new(program)
            .args(parts)
            .arg("--max-num-hands")
            .arg(settings.max_hands.to_string())
            .arg("--min-detection-confidence")
            .arg(settings.min_detection_confidence.to_string())
            .arg("--min-tracking-confidence")
            .arg(settings.min_tracking_confidence.to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| Error::Detector(format!("start {program}: {e}")))?;

        let stdin = process.stdin.take().ok_or_else(|| Error::Detector("no stdin".into()))?;
        let stdout = process.stdout.take().ok_or_else(|| Error::Detector("no stdout".into()))?;
        let mut stdout = BufReader::new(stdout);

        let mut ready = String::new();
        stdout
            .read_line(&mut ready)
            .map_err(|e| Error::Detector(format!("waiting for READY: {e}")))?;
        if ready.trim() != "READY" {
            let _ = process.kill();
            return Err(Error::Detector(format!("detector did not signal ready, got {ready:?}")));
        }
        info!("Hand detector ready");

        Ok(Self { process, stdin, stdout, min_score: settings.min_detection_confidence })
    }
}

impl HandDetector for SubprocessDetector {
    fn detect(&mut self, frame: &FrameBuffer) -> Result<Option<Hand>, Error> {
        if frame.pixels.is_empty() {
            return Ok(None);
        }

        self.stdin
            .write_all(&encode_frame(frame))
            .and_then(|_| self.stdin.flush())
            .map_err(|e| Error::Detector(format!("send frame: {e}")))?;

        let mut line = String::new();
        let n = self
            .stdout
            .read_line(&mut line)
            .map_err(|e| Error::Detector(format!("read reply: {e}")))?;
        if n == 0 {
            return Err(Error::Detector("detector closed its output".into()));
        }
        parse_reply(&line, self.min_score)
    }
}

impl Drop for SubprocessDetector {
    fn drop(&mut self) {
        let _ = self.process.kill();
        let _ = self.process.wait();
    }
}
