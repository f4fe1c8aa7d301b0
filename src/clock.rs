/// Simulation clock plus the two other things the source dialog has to
/// suspend: audio playback and pointer capture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimClock {
    time_scale: f32,
    audio_paused: bool,
    pointer_captured: bool,
}

/// State saved when the dialog opens, restored verbatim when it closes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockSnapshot(SimClock);

impl SimClock {
    pub fn new(pointer_captured: bool) -> Self {
        Self {
            time_scale: 1.0,
            audio_paused: false,
            pointer_captured,
        }
    }

    /// Scale a frame's real delta into simulation time.
    pub fn scale(&self, dt: f32) -> f32 {
        dt * self.time_scale
    }

    pub fn is_running(&self) -> bool {
        self.time_scale > 0.0
    }

    pub fn audio_paused(&self) -> bool {
        self.audio_paused
    }

    pub fn pointer_captured(&self) -> bool {
        self.pointer_captured
    }

    pub fn pause(&mut self) {
        self.time_scale = 0.0;
        self.audio_paused = true;
    }

    /// Freeze time and audio and hand the pointer back to the user.
    pub fn suspend_for_dialog(&mut self) -> ClockSnapshot {
        let snapshot = ClockSnapshot(*self);
        self.pause();
        self.pointer_captured = false;
        tracing::debug!(was_running = snapshot.0.is_running(), "clock suspended for dialog");
        snapshot
    }

    pub fn restore(&mut self, snapshot: ClockSnapshot) {
        *self = snapshot.0;
        tracing::debug!(running = self.is_running(), "clock restored after dialog");
    }
}
