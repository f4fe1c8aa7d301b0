#[derive(Debug, PartialEq, Clone, Copy)]
pub enum PresenterState {
    Empty,         // No slides to show (nothing loaded yet, or a load in progress)
    Idle,          // Showing the current slide
    Transitioning, // Fading between two slides, navigation is ignored
}
