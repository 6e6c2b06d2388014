// Opens the camera and runs the capture producer thread.
// The thread owns the device and keeps overwriting the shared FrameSlot with the
// newest frame; the processing loop never waits on it.

use std::thread;

use crossbeam_channel::bounded;
use log::{debug, error, info, warn};

use crate::error::Error;
use crate::frame_slot::FrameSlot;
use crate::types::FrameBuffer;

// Bring in nokhwa types for camera control.
use nokhwa::{
    Camera,
    pixel_format::RgbFormat,
    utils::{
        CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
    },
};

use image::{RgbImage, imageops::flip_horizontal_in_place};

/// Consecutive failed reads after which the device is treated as gone.
pub const MAX_CONSECUTIVE_FAILURES: u32 = 30;

/// Anything that yields frames. `Ok(None)` means end of stream.
pub trait FrameSource {
    fn next_frame(&mut self) -> Result<Option<FrameBuffer>, Error>;
    fn resolution(&self) -> (u32, u32);
}

// A small wrapper around nokhwa::Camera so the capture thread stays clean.
pub struct CameraCapture {
    cam: Camera,
    width: u32,
    height: u32,
    mirror: bool,
}

impl CameraCapture {
    /// Open camera `index` near the requested resolution (falls back if not exact).
    pub fn new(index: u32, width: u32, height: u32, mirror: bool) -> Result<Self, Error> {
        let idx = CameraIndex::Index(index);

        let fmt = CameraFormat::new(
            Resolution::new(width, height),
            FrameFormat::YUYV, // uncompressed; cheap to convert to RGB
            30,                // target FPS
        );

        // Ask for RGB frames at the format closest to our request.
        let req = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(fmt));

        let mut cam = Camera::new(idx, req)
            .map_err(|e| Error::CameraInit(format!("Create camera: {e}")))?;

        cam.open_stream()
            .map_err(|e| Error::CameraInit(format!("Open stream: {e}")))?;

        // The actual stream might choose a slightly different resolution.
        let actual = cam.resolution();

        Ok(Self { cam, width: actual.width(), height: actual.height(), mirror })
    }
}

impl FrameSource for CameraCapture {
    /// Grab one frame (blocks until the device delivers) and convert it to 0x00RRGGBB.
    fn next_frame(&mut self) -> Result<Option<FrameBuffer>, Error> {
        let frame = self
            .cam
            .frame()
            .map_err(|e| Error::CameraFrame(format!("Fetch frame: {e}")))?;

        let decoded = frame
            .decode_image::<RgbFormat>()
            .map_err(|e| Error::CameraFrame(format!("Decode RGB: {e}")))?;

        // Rewrap the bytes in our own image type (nokhwa may pin another `image` version).
        let (w, h) = decoded.dimensions();
        let mut rgb_img = RgbImage::from_raw(w, h, decoded.into_raw())
            .ok_or_else(|| Error::CameraFrame(format!("Short RGB buffer for {w}x{h}")))?;

        // Selfie view: moving your hand right moves it right on screen.
        if self.mirror {
            flip_horizontal_in_place(&mut rgb_img);
        }

        let pixels = rgb_img
            .pixels()
            .map(|p| ((p[0] as u32) << 16) | ((p[1] as u32) << 8) | p[2] as u32)
            .collect();

        Ok(Some(FrameBuffer { width: w as usize, height: h as usize, pixels }))
    }

    fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Start the detached capture thread. `open` runs on that thread (camera handles are
/// not always `Send`); its result comes back before this returns.
/// Returns the actual frame resolution.
pub fn spawn_capture<S, F>(open: F, slot: FrameSlot) -> Result<(u32, u32), Error>
where
    S: FrameSource,
    F: FnOnce() -> Result<S, Error> + Send + 'static,
{
    let (ready_tx, ready_rx) = bounded::<Result<(u32, u32), Error>>(1);

    thread::Builder::new()
        .name("capture".into())
        .spawn(move || {
            let mut source = match open() {
                Ok(source) => source,
                Err(e) => {
                    let _ = ready_tx.send(Err(e));
                    return;
                }
            };
            if ready_tx.send(Ok(source.resolution())).is_err() {
                return;
            }
            pump_frames(&mut source, &slot);
        })
        .map_err(|e| Error::CameraInit(format!("Spawn capture thread: {e}")))?;

    ready_rx
        .recv()
        .map_err(|_| Error::CameraInit("capture thread exited before opening".into()))?
}

/// Producer loop: publish until end of stream or a run of failed reads.
fn pump_frames<S: FrameSource>(source: &mut S, slot: &FrameSlot) {
    let mut failures = 0u32;
    loop {
        match source.next_frame() {
            Ok(Some(frame)) => {
                failures = 0;
                slot.publish(frame);
            }
            Ok(None) => {
                info!("Camera stream ended");
                return;
            }
            Err(e) => {
                failures += 1;
                debug!("Ignoring empty camera frame: {e}");
                if failures >= MAX_CONSECUTIVE_FAILURES {
                    error!("Camera stopped delivering frames after {failures} attempts: {e}");
                    return;
                }
                if failures == 1 {
                    warn!("Camera read failed, retrying: {e}");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::time::{Duration, Instant};

    struct Scripted {
        reads: VecDeque<Result<Option<FrameBuffer>, Error>>,
    }

    impl FrameSource for Scripted {
        fn next_frame(&mut self) -> Result<Option<FrameBuffer>, Error> {
            self.reads.pop_front().unwrap_or(Ok(None))
        }
        fn resolution(&self) -> (u32, u32) {
            (4, 2)
        }
    }

    fn tagged(tag: u32) -> Result<Option<FrameBuffer>, Error> {
        Ok(Some(FrameBuffer { width: 4, height: 2, pixels: vec![tag; 8] }))
    }

    fn wait_for(slot: &FrameSlot, tag: u32) -> bool {
        let deadline = Instant::now() + Duration::from_secs(2);
        while Instant::now() < deadline {
            if slot.latest().map(|(_, f)| f.pixels[0]) == Some(tag) {
                return true;
            }
            thread::sleep(Duration::from_millis(1));
        }
        false
    }

    #[test]
    fn open_failure_is_reported_once() {
        let res = spawn_capture(
            || -> Result<Scripted, Error> { Err(Error::CameraInit("no device".into())) },
            FrameSlot::new(),
        );
        assert!(matches!(res, Err(Error::CameraInit(_))));
    }

    #[test]
    fn frames_flow_into_the_slot_and_skip_bad_reads() {
        let slot = FrameSlot::new();
        let reads = VecDeque::from(vec![
            tagged(1),
            Err(Error::CameraFrame("glitch".into())),
            tagged(2),
        ]);
        let res = spawn_capture(move || Ok(Scripted { reads }), slot.clone());
        assert_eq!(res.unwrap(), (4, 2));
        assert!(wait_for(&slot, 2));
    }

    #[test]
    fn persistent_failure_stops_the_producer() {
        let mut reads: VecDeque<_> = (0..MAX_CONSECUTIVE_FAILURES)
            .map(|_| Err(Error::CameraFrame("gone".into())))
            .collect();
        // Never reached: the loop gives up first.
        reads.push_back(tagged(9));
        let mut source = Scripted { reads };
        let slot = FrameSlot::new();
        pump_frames(&mut source, &slot);
        assert!(slot.latest().is_none());
        assert_eq!(source.reads.len(), 1);
    }
}
