// Latest-wins handoff between the capture thread and the processing loop.
// The lock covers only the Arc swap/clone; decoding and detection happen outside it.
// Every publish bumps a sequence number so readers can tell a new frame from a re-read.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::types::FrameBuffer;

#[derive(Default)]
struct Slot {
    seq: u64,
    frame: Option<Arc<FrameBuffer>>,
}

#[derive(Clone, Default)]
pub struct FrameSlot {
    inner: Arc<Mutex<Slot>>,
}

impl FrameSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace whatever is in the slot. Unread frames are dropped.
    pub fn publish(&self, frame: FrameBuffer) {
        let frame = Arc::new(frame);
        let mut slot = self.lock();
        slot.seq = slot.seq.wrapping_add(1);
        slot.frame = Some(frame);
    }

    /// Newest frame with its publish number, if one ever arrived.
    /// Reading does not empty the slot; the same number comes back until the next publish.
    pub fn latest(&self) -> Option<(u64, Arc<FrameBuffer>)> {
        let slot = self.lock();
        slot.frame.clone().map(|frame| (slot.seq, frame))
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        // A panicking writer leaves a whole Arc or none; the value is still usable.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
