use raylib::prelude::*;

use crate::constants::SCREEN_FILL;

/// A decoded slide living on the GPU.
pub struct Slide {
    image: Texture2D,
}

impl Slide {
    pub fn new(image: Texture2D) -> Self {
        Self { image }
    }

    /// Draw centered, scaled to fit the window, dimmed by `brightness`.
    pub fn draw(&self, d: &mut RaylibDrawHandle, brightness: f32) {
        let screen_width = d.get_screen_width() as f32;
        let screen_height = d.get_screen_height() as f32;

        let tex_width = self.image.width() as f32;
        let tex_height = self.image.height() as f32;
        if tex_width <= 0.0 || tex_height <= 0.0 {
            return;
        }

        let scale = fit_scale(tex_width, tex_height, screen_width, screen_height);
        let scaled_width = tex_width * scale;
        let scaled_height = tex_height * scale;

        // Origin at the center of the destination rectangle
        let origin = Vector2::new(scaled_width * 0.5, scaled_height * 0.5);

        let level = (brightness.clamp(0.0, 1.0) * 255.0) as u8;

        d.draw_texture_pro(
            &self.image,
            Rectangle::new(0.0, 0.0, tex_width, tex_height),
            Rectangle::new(screen_width * 0.5, screen_height * 0.5, scaled_width, scaled_height),
            origin,
            0.0,
            Color::new(level, level, level, 255),
        );
    }
}

/// Largest scale keeping the image inside `SCREEN_FILL` of the screen.
/// Small slides are enlarged as well.
pub fn fit_scale(width: f32, height: f32, screen_width: f32, screen_height: f32) -> f32 {
    let by_width = screen_width * SCREEN_FILL / width;
    let by_height = screen_height * SCREEN_FILL / height;
    by_width.min(by_height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_slide_is_bound_by_width() {
        let scale = fit_scale(3840.0, 1080.0, 1920.0, 1080.0);
        assert!((scale - 0.45).abs() < 1e-6);
    }

    #[test]
    fn small_slide_is_enlarged() {
        let scale = fit_scale(960.0, 540.0, 1920.0, 1080.0);
        assert!((scale - 1.8).abs() < 1e-5);
    }
}
