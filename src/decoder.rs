use std::path::Path;

use raylib::prelude::*;

use crate::slide::Slide;
use crate::texture_loader::load_texture_with_exif_rotation;

/// Turns an image file into whatever the display backend draws.
/// The presenter only ever sees slides through this seam.
pub trait SlideDecoder {
    type Slide;

    fn decode(&mut self, path: &Path) -> anyhow::Result<Self::Slide>;
}

/// Decodes slides straight into GPU textures. Built fresh every frame
/// because it borrows the raylib handle.
pub struct TextureDecoder<'a> {
    rl: &'a mut RaylibHandle,
    thread: &'a RaylibThread,
}

impl<'a> TextureDecoder<'a> {
    pub fn new(rl: &'a mut RaylibHandle, thread: &'a RaylibThread) -> Self {
        Self { rl, thread }
    }
}

impl SlideDecoder for TextureDecoder<'_> {
    type Slide = Slide;

    fn decode(&mut self, path: &Path) -> anyhow::Result<Slide> {
        let texture = load_texture_with_exif_rotation(self.rl, self.thread, path)?;
        Ok(Slide::new(texture))
    }
}
