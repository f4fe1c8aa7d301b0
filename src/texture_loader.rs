use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use exif::{In, Reader, Tag, Value};
use raylib::prelude::*;

use crate::error::SlideError;

const SLIDE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

// --- Helper: List Slide Images in Presentation Order ---
pub fn list_slide_images(dir_path: &Path) -> crate::error::Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    let entries = fs::read_dir(dir_path).map_err(|e| SlideError::io(dir_path, e))?;

    for entry in entries {
        let entry = entry.map_err(|e| SlideError::io(dir_path, e))?;
        let path = entry.path();
        if path.is_file() && is_slide_image(&path) {
            paths.push(path);
        }
    }

    Ok(order_slide_paths(paths))
}

fn is_slide_image(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| SLIDE_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
}

/// Sort by the first number in each file name so `slide_2` comes before
/// `slide_10`. Names without digits count as 0; ties keep their input order.
pub fn order_slide_paths(mut paths: Vec<PathBuf>) -> Vec<PathBuf> {
    paths.sort_by_cached_key(|path| {
        path.file_name()
            .and_then(|s| s.to_str())
            .map_or(0, slide_number)
    });
    paths
}

/// First run of ASCII digits in `file_name`; 0 when there is none or it
/// does not fit in a `u64`.
pub fn slide_number(file_name: &str) -> u64 {
    let digits: String = file_name
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();

    digits.parse().unwrap_or(0)
}

// --- Load Image, Apply EXIF Rotation, Create Texture ---
pub fn load_texture_with_exif_rotation(
    rl: &mut RaylibHandle,
    thread: &RaylibThread,
    image_path: &Path,
) -> Result<Texture2D> {
    let file_bytes = fs::read(image_path).with_context(|| format!("failed to read {}", image_path.display()))?;

    let extension = image_path.extension().and_then(|s| s.to_str()).unwrap_or("").to_lowercase();

    // EXIF is only read for JPEG; exported slides are usually PNG and upright
    let orientation = if extension == "jpg" || extension == "jpeg" {
        exif_orientation(image_path, &file_bytes)
    } else {
        1
    };

    let mut image = Image::load_image_from_mem(&(".".to_string() + &extension), &file_bytes)
        .map_err(|e| anyhow!("failed to decode {}: {}", image_path.display(), e))?;

    // 3 = 180 deg, 6 = 90 deg clockwise, 8 = 90 deg counter-clockwise.
    // Flipped orientations are left alone.
    match orientation {
        3 => {
            image.rotate_cw();
            image.rotate_cw();
        }
        6 => image.rotate_cw(),
        8 => image.rotate_ccw(),
        _ => {}
    }
    if orientation != 1 {
        tracing::debug!(path = %image_path.display(), orientation, "applied EXIF orientation");
    }

    let texture = rl
        .load_texture_from_image(thread, &image)
        .map_err(|e| anyhow!("failed to create texture for {}: {}", image_path.display(), e))?;

    // CPU copy is no longer needed once the texture is uploaded
    drop(image);

    Ok(texture)
}

fn exif_orientation(image_path: &Path, file_bytes: &[u8]) -> u16 {
    match Reader::new().read_from_container(&mut Cursor::new(file_bytes)) {
        Ok(exif) => match exif.get_field(Tag::Orientation, In::PRIMARY).map(|field| &field.value) {
            Some(Value::Short(values)) if !values.is_empty() => values[0],
            _ => 1,
        },
        Err(e) => {
            tracing::debug!(path = %image_path.display(), "no usable EXIF data: {}", e);
            1
        }
    }
}
