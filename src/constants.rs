pub const RENDER_WIDTH: i32 = 1920;           // Initial window width (doubled render size of the old framebuffer)
pub const RENDER_HEIGHT: i32 = 1080;          // Initial window height
pub const FPS: u32 = 60;                      // Frames per second

pub const FADE_DURATION: f32 = 0.5;           // Duration of each half of a slide transition (seconds)
pub const DIM_LEVEL: f32 = 0.5;               // Brightness at the darkest point of a transition
pub const SETTLE_DELAY: f32 = 0.5;            // Wait after the rasterizer exits before listing its output (seconds)
pub const SCREEN_FILL: f32 = 0.9;             // Fraction of the window a slide may cover

pub const COUGH_FIRST_DELAY: f32 = 10.0;      // First cough cue (seconds)
pub const COUGH_INTERVAL: f32 = 40.0;         // Time between cough cues (seconds)
pub const PHONE_FIRST_DELAY: f32 = 5.0;       // First phone cue (seconds)
pub const PHONE_INTERVAL: f32 = 60.0;         // Time between phone cues (seconds)

pub const PDF_OUTPUT_DIR_NAME: &str = "pdf_slides";
pub const PDF_PAGE_PATTERN: &str = "slide_%d.png";
