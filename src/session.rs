// One processing iteration: latest frame -> detector -> active mode.
// Each published frame is processed once; re-reads of it are only for display.
// Kept free of the window so the loop logic can be driven by tests.

use std::sync::Arc;

use log::{info, warn};

use crate::canvas::DrawSurface;
use crate::detector::HandDetector;
use crate::engine::GestureEngine;
use crate::frame_slot::FrameSlot;
use crate::mode::{ControlMode, Outputs};
use crate::types::{FrameBuffer, Hand};

pub enum Tick {
    /// Nothing captured yet; the caller should poll again.
    NoFrame,
    /// The camera has not published since the last tick; nothing was updated.
    Repeat { frame: Arc<FrameBuffer> },
    Frame { frame: Arc<FrameBuffer>, hand: Option<Hand> },
}

pub struct Session<D: HandDetector> {
    slot: FrameSlot,
    detector: D,
    engine: GestureEngine,
    mode: Box<dyn ControlMode>,
    detector_failing: bool,
    last_seq: Option<u64>,
}

impl<D: HandDetector> Session<D> {
    pub fn new(slot: FrameSlot, detector: D, engine: GestureEngine, mode: Box<dyn ControlMode>) -> Self {
        Self { slot, detector, engine, mode, detector_failing: false, last_seq: None }
    }

    pub fn tick(&mut self, out: &mut Outputs<'_>) -> Tick {
        let Some((seq, frame)) = self.slot.latest() else {
            return Tick::NoFrame;
        };
        if self.last_seq == Some(seq) {
            return Tick::Repeat { frame };
        }
        self.last_seq = Some(seq);

        // A failed detection only costs this frame.
        let hand = match self.detector.detect(&frame) {
            Ok(hand) => {
                if self.detector_failing {
                    info!("Hand detector recovered");
                    self.detector_failing = false;
                }
                hand
            }
            Err(e) => {
                if !self.detector_failing {
                    warn!("{e}; treating frames as handless until it recovers");
                    self.detector_failing = true;
                }
                None
            }
        };

        self.mode.step(&mut self.engine, hand.as_ref(), out);
        Tick::Frame { frame, hand }
    }

    /// The clear key; only Draw mode acts on it.
    pub fn clear(&mut self, surface: &mut dyn DrawSurface) {
        self.mode.clear(surface);
    }

    pub fn mode_name(&self) -> &'static str {
        self.mode.name()
    }

    pub fn status(&self) -> String {
        self.mode.status(&self.engine)
    }

    pub fn engine(&self) -> &GestureEngine {
        &self.engine
    }
}
