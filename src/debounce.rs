// Press debouncing for one mouse button.
// A press needs `threshold` consecutive trigger frames; a release happens on the
// first frame without the trigger.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    Pressed,
    Released,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonPhase {
    Idle,
    Arming(u32),
    Pressed,
}

#[derive(Debug, Clone)]
pub struct ClickDebouncer {
    threshold: u32,
    counter: u32,
    pressed: bool,
}

impl ClickDebouncer {
    /// A threshold of 0 behaves like 1.
    pub fn new(threshold: u32) -> Self {
        Self { threshold: threshold.max(1), counter: 0, pressed: false }
    }

    /// Feed one frame. Returns an event only on the frame the state flips.
    pub fn update(&mut self, trigger: bool) -> Option<ButtonEvent> {
        if !trigger {
            let was_pressed = self.pressed;
            self.counter = 0;
            self.pressed = false;
            return was_pressed.then_some(ButtonEvent::Released);
        }

        // Held: the count stops at the threshold.
        if self.pressed {
            return None;
        }
        self.counter += 1;
        if self.counter >= self.threshold {
            self.pressed = true;
            return Some(ButtonEvent::Pressed);
        }
        None
    }

    pub fn phase(&self) -> ButtonPhase {
        match (self.pressed, self.counter) {
            (true, _) => ButtonPhase::Pressed,
            (false, 0) => ButtonPhase::Idle,
            (false, n) => ButtonPhase::Arming(n),
        }
    }
}
