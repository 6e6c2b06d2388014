// One error type for the whole app.
// Every variant states *where* things went wrong.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Window init error: {0}")]
    WindowInit(String), // Creating the window failed
    #[error("Window update error: {0}")]
    WindowUpdate(String), // Updating the window buffer failed
    #[error("Camera init error: {0}")]
    CameraInit(String), // Opening/starting the camera failed
    #[error("Camera frame error: {0}")]
    CameraFrame(String), // Grabbing/decoding a frame failed
    #[error("Detector error: {0}")]
    Detector(String), // Talking to the landmark detector failed
    #[error("Pointer error: {0}")]
    Pointer(String), // Setting up OS mouse injection failed
    #[error("Config error: {0}")]
    Config(String), // A command-line value is out of range
}
