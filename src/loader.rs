use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use crate::decoder::SlideDecoder;
use crate::texture_loader::list_slide_images;

#[derive(Debug)]
enum LoadStage {
    // Waiting for the rasterizer's files to land before listing the folder
    Settling { remaining: f32 },
    Decoding { pending: VecDeque<PathBuf> },
}

/// What one tick of a load job produced.
#[derive(Debug, PartialEq)]
pub enum LoadStep<S> {
    Pending,
    Decoded(S),
    Skipped,
    Finished,
}

/// A folder load spread across frames: at most one image is decoded per
/// `step`, so the host loop keeps rendering while a long deck comes in.
#[derive(Debug)]
pub struct LoadJob {
    dir: PathBuf,
    stage: LoadStage,
    start_at: usize,
    total: usize,
    processed: usize,
}

impl LoadJob {
    /// Start decoding an already listed folder.
    pub fn decoding(dir: PathBuf, paths: Vec<PathBuf>, start_at: usize) -> Self {
        Self {
            dir,
            total: paths.len(),
            stage: LoadStage::Decoding { pending: paths.into() },
            start_at,
            processed: 0,
        }
    }

    /// Wait `delay` seconds of ticks, then list and decode `dir`.
    pub fn settling(dir: PathBuf, delay: f32, start_at: usize) -> Self {
        Self {
            dir,
            stage: LoadStage::Settling { remaining: delay },
            start_at,
            total: 0,
            processed: 0,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn start_at(&self) -> usize {
        self.start_at
    }

    #[cfg(test)]
    pub fn is_settling(&self) -> bool {
        matches!(self.stage, LoadStage::Settling { .. })
    }

    /// `(processed, total)` once the folder has been listed.
    pub fn progress(&self) -> Option<(usize, usize)> {
        match self.stage {
            LoadStage::Settling { .. } => None,
            LoadStage::Decoding { .. } => Some((self.processed, self.total)),
        }
    }

    pub fn step<D: SlideDecoder>(&mut self, dt: f32, decoder: &mut D) -> LoadStep<D::Slide> {
        match &mut self.stage {
            LoadStage::Settling { remaining } => {
                *remaining -= dt;
                if *remaining > 0.0 {
                    return LoadStep::Pending;
                }
                match list_slide_images(&self.dir) {
                    Ok(paths) => {
                        tracing::info!(dir = %self.dir.display(), count = paths.len(), "listed converted pages");
                        self.total = paths.len();
                        self.stage = LoadStage::Decoding { pending: paths.into() };
                        LoadStep::Pending
                    }
                    Err(e) => {
                        tracing::error!("failed to list converted pages: {e}");
                        LoadStep::Finished
                    }
                }
            }
            LoadStage::Decoding { pending } => {
                let Some(path) = pending.pop_front() else {
                    return LoadStep::Finished;
                };
                self.processed += 1;
                match decoder.decode(&path) {
                    Ok(slide) => {
                        tracing::debug!(path = %path.display(), "loaded slide {}/{}", self.processed, self.total);
                        LoadStep::Decoded(slide)
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), "skipping slide: {e:#}");
                        LoadStep::Skipped
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::tests::NameDecoder;
    use tempfile::TempDir;

    #[test]
    fn decodes_one_file_per_step() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("slide_1.png"), "x").unwrap();
        std::fs::write(dir.path().join("slide_2.png"), "corrupt").unwrap();
        let paths = list_slide_images(dir.path()).unwrap();

        let mut job = LoadJob::decoding(dir.path().to_path_buf(), paths, 0);
        assert_eq!(job.progress(), Some((0, 2)));
        assert_eq!(job.step(0.016, &mut NameDecoder), LoadStep::Decoded("slide_1.png".to_string()));
        assert_eq!(job.step(0.016, &mut NameDecoder), LoadStep::Skipped);
        assert_eq!(job.progress(), Some((2, 2)));
        assert_eq!(job.step(0.016, &mut NameDecoder), LoadStep::Finished);
    }

    #[test]
    fn settling_waits_before_listing() {
        let dir = TempDir::new().unwrap();
        let mut job = LoadJob::settling(dir.path().to_path_buf(), 0.5, 0);

        assert_eq!(job.step(0.3, &mut NameDecoder), LoadStep::Pending);
        assert!(job.is_settling());

        // Pages appear during the settle delay
        std::fs::write(dir.path().join("slide_1.png"), "x").unwrap();

        assert_eq!(job.step(0.3, &mut NameDecoder), LoadStep::Pending);
        assert_eq!(job.progress(), Some((0, 1)));
        assert_eq!(job.step(0.016, &mut NameDecoder), LoadStep::Decoded("slide_1.png".to_string()));
        assert_eq!(job.step(0.016, &mut NameDecoder), LoadStep::Finished);
    }

    #[test]
    fn settling_on_vanished_folder_finishes() {
        let dir = TempDir::new().unwrap();
        let gone = dir.path().join("gone");
        let mut job = LoadJob::settling(gone, 0.0, 0);
        assert_eq!(job.step(0.016, &mut NameDecoder), LoadStep::Finished);
    }
}
