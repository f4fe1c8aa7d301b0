/// Rehearsal stopwatch shown in the corner of the screen.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PresentationTimer {
    elapsed: f32,
    running: bool,
}

impl PresentationTimer {
    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Stop and go back to 00:00.
    pub fn reset(&mut self) {
        self.running = false;
        self.elapsed = 0.0;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    #[cfg(test)]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn tick(&mut self, dt: f32) {
        if self.running {
            self.elapsed += dt;
        }
    }

    pub fn label(&self) -> String {
        let total = self.elapsed.max(0.0) as u64;
        format!("{:02}:{:02}", total / 60, total % 60)
    }
}
