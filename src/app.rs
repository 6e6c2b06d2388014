// The run loop: camera thread -> latest frame -> detector -> mode -> window.

use std::time::{Duration, Instant};

use log::{debug, info};

use crate::analyzer::HandReading;
use crate::camera::{CameraCapture, spawn_capture};
use crate::canvas::Canvas;
use crate::config::Config;
use crate::detector::SubprocessDetector;
use crate::draw::{Drawer, draw_crosshair, draw_hand, draw_text_5x7};
use crate::engine::GestureEngine;
use crate::error::Error;
use crate::frame_slot::FrameSlot;
use crate::mode::{self, Mode, Outputs, screen_to_surface};
use crate::pointer::EnigoPointer;
use crate::session::{Session, Tick};
use crate::smoother::ScreenMapping;
use crate::types::{FrameBuffer, Hand};

const WINDOW_FPS: usize = 60;
const BONE_COLOR: u32 = 0x00FF_FFFF;
const JOINT_COLOR: u32 = 0x00FF_3030;
const CROSSHAIR_COLOR: u32 = 0x00FF_CC33;
const CAPTION_COLOR: u32 = 0x0000_FF00;
const HUD_COLOR: u32 = 0x00FF_FFFF;

pub fn run(config: Config) -> Result<(), Error> {
    /* --- Output side first: no point opening the camera without a mouse --- */
    let mut pointer = EnigoPointer::new()?;
    let screen = pointer.screen_size()?;

    /* --- Capture thread ---
       Opens the device on its own thread; failure here ends the run. */
    let slot = FrameSlot::new();
    let (index, (w, h), mirror) = (config.camera_index, config.camera_size, config.mirror);
    let (cam_w, cam_h) = spawn_capture(move || CameraCapture::new(index, w, h, mirror), slot.clone())?;
    info!("Camera {index} streaming at {cam_w}x{cam_h}; screen {}x{}", screen.0, screen.1);

    let detector = SubprocessDetector::spawn(&config.detector)?;

    let mapping = ScreenMapping { camera: (cam_w, cam_h), screen, sensitivity: config.sensitivity };
    let engine = GestureEngine::new(mapping, config.smoothing_alpha, config.stability_frames);
    let mode = mode::build(config.mode, config.brush_color, config.brush_width);
    let mut session = Session::new(slot, detector, engine, mode);

    let (fw, fh) = (cam_w as usize, cam_h as usize);
    let mut drawer = Drawer::new("Hand Pointer", fw, fh, WINDOW_FPS)?;
    let mut screen_fb = FrameBuffer::new(fw, fh);
    let mut canvas = Canvas::new(fw, fh);

    let hint = match config.mode {
        Mode::Mouse => "Q: quit",
        Mode::Draw => "C: clear  Q: quit",
    };

    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;
    let mut hud_fps_text = String::from("FPS: 0.0");
    // Hand from the newest processed frame; redrawn while the camera has nothing new.
    let mut shown_hand: Option<Hand> = None;

    info!("{} mode running", session.mode_name());

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.quit_pressed() {
        if drawer.c_pressed_once() {
            session.clear(&mut canvas);
        }

        /* 1) Newest frame through the detector and the active mode. */
        let tick = {
            let mut out = Outputs { pointer: &mut pointer, surface: &mut canvas };
            session.tick(&mut out)
        };
        let frame = match tick {
            Tick::NoFrame => {
                // Nothing captured yet: keep the window responsive and poll again.
                drawer.pump();
                continue;
            }
            Tick::Repeat { frame } => frame,
            Tick::Frame { frame, hand } => {
                shown_hand = hand;
                frame
            }
        };

        /* 2) Compose: live camera, ink, skeleton, cursor. */
        if frame.width == screen_fb.width && frame.height == screen_fb.height {
            screen_fb.pixels.copy_from_slice(&frame.pixels);
        } else {
            screen_fb = (*frame).clone();
        }
        canvas.composite_onto(&mut screen_fb);

        if let Some(hand) = &shown_hand {
            draw_hand(&mut screen_fb, hand, BONE_COLOR, JOINT_COLOR);
        }
        if session.engine().has_seen_hand() {
            let at = screen_to_surface(
                session.engine().cursor(),
                session.engine().screen(),
                (screen_fb.width, screen_fb.height),
            );
            draw_crosshair(&mut screen_fb, at, 8, CROSSHAIR_COLOR);
        }

        /* 3) Text: hand caption, then the mode/FPS line. */
        if let Some(caption) = shown_hand.as_ref().map(HandReading::of).and_then(|r| r.caption()) {
            draw_text_5x7(&mut screen_fb, 8, 20, &caption, CAPTION_COLOR);
        }
        let hud = format!("{} {} | {} | {}", session.mode_name(), session.status(), hint, hud_fps_text);
        draw_text_5x7(&mut screen_fb, 8, 8, &hud, HUD_COLOR);

        /* 4) Present. */
        drawer.present(&screen_fb)?;

        /* 5) FPS (log + HUD once per second) */
        frames_this_second += 1;
        let now = Instant::now();
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let secs = now.duration_since(last_fps_time).as_secs_f32();
            let fps = frames_this_second as f32 / secs;
            debug!("FPS: {:.1}", fps);
            hud_fps_text = format!("FPS: {:.1}", fps);
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    info!("Quit");
    Ok(())
}
