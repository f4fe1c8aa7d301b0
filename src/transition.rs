/// Which way a navigation request moves through the deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Next,
    Previous,
}

impl Step {
    pub fn apply(self, index: usize, len: usize) -> usize {
        match self {
            Step::Next => (index + 1) % len,
            Step::Previous => (index + len - 1) % len,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FadePhase {
    FadingOut,
    FadingIn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionEvent {
    None,
    Swap,
    Finished,
}

/// Two-phase fade: dim to `dim_level`, swap the image, brighten back.
/// Both halves last `duration` seconds.
#[derive(Debug, Clone)]
pub struct Transition {
    pub step: Step,
    phase: FadePhase,
    timer: f32,
    duration: f32,
    dim_level: f32,
}

impl Transition {
    pub fn new(step: Step, duration: f32, dim_level: f32) -> Self {
        Self {
            step,
            phase: FadePhase::FadingOut,
            timer: 0.0,
            duration,
            dim_level,
        }
    }

    pub fn update(&mut self, dt: f32) -> TransitionEvent {
        self.timer += dt;
        if self.timer < self.duration {
            return TransitionEvent::None;
        }
        match self.phase {
            FadePhase::FadingOut => {
                self.phase = FadePhase::FadingIn;
                self.timer = 0.0;
                TransitionEvent::Swap
            }
            FadePhase::FadingIn => {
                self.timer = self.duration;
                TransitionEvent::Finished
            }
        }
    }

    /// Tint brightness for the current frame, 1.0 being untouched.
    pub fn brightness(&self) -> f32 {
        let t = if self.duration > 0.0 {
            (self.timer / self.duration).min(1.0)
        } else {
            1.0
        };
        match self.phase {
            FadePhase::FadingOut => lerp(1.0, self.dim_level, t),
            FadePhase::FadingIn => lerp(self.dim_level, 1.0, t),
        }
    }
}

fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}
