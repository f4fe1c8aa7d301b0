use std::path::{Path, PathBuf};

use crate::config::{PresentationSettings, RasterizerSettings};
use crate::decoder::SlideDecoder;
use crate::error::{Result, SlideError};
use crate::loader::{LoadJob, LoadStep};
use crate::rasterizer::{Rasterizer, ToolLocator};
use crate::source::SlideSource;
use crate::state::PresenterState;
use crate::texture_loader::list_slide_images;
use crate::transition::{Step, Transition, TransitionEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenterEvent {
    /// A load finished with this many slides and the start slide is showing.
    DeckReady { len: usize },
    /// A transition swapped the displayed slide.
    Committed(usize),
}

/// Owns the slide deck and drives loading, display and navigation.
///
/// Everything happens on the host's frame loop: `load` does the quick
/// (or, for a PDF, blocking) preparation and `tick` advances loading and
/// fading one frame at a time.
pub struct SlidePresenter<S> {
    deck: Vec<S>,
    position: usize,
    state: PresenterState,
    shown: Option<usize>,
    // Last slide of the replaced deck, on screen until the new one is ready
    retired: Option<S>,
    transition: Option<Transition>,
    job: Option<LoadJob>,

    fade_secs: f32,
    dim_level: f32,
    settle_delay: f32,
    locator: ToolLocator,
    output_dir: PathBuf,
}

impl<S> SlidePresenter<S> {
    pub fn new(presentation: &PresentationSettings, rasterizer: &RasterizerSettings) -> Self {
        Self {
            deck: Vec::new(),
            position: 0,
            state: PresenterState::Empty,
            shown: None,
            retired: None,
            transition: None,
            job: None,
            fade_secs: presentation.fade_secs,
            dim_level: presentation.dim_level,
            settle_delay: presentation.settle_delay_secs,
            locator: ToolLocator::from_settings(rasterizer),
            output_dir: rasterizer.output_dir(),
        }
    }

    pub fn with_locator(mut self, locator: ToolLocator) -> Self {
        self.locator = locator;
        self
    }

    pub fn initialize(&mut self) {
        tracing::info!(
            fade_secs = self.fade_secs,
            output_dir = %self.output_dir.display(),
            "slide presenter ready"
        );
    }

    /// Replace the deck with the slides found at `path`.
    ///
    /// On error nothing changes. On success the presenter is `Empty` until
    /// the new deck has been decoded, then shows slide `start_at` (or the
    /// first slide when `start_at` is out of range). The outgoing slide stays
    /// displayed until then, and for good if the new deck turns out empty.
    pub fn load(&mut self, path: &Path, start_at: usize) -> Result<()> {
        match SlideSource::resolve(path)? {
            SlideSource::Folder(dir) => {
                let paths = list_slide_images(&dir)?;
                self.reset();
                if paths.is_empty() {
                    tracing::warn!("{}", SlideError::NoImagesFound(dir));
                    return Ok(());
                }
                tracing::info!(dir = %dir.display(), count = paths.len(), "loading slides");
                self.job = Some(LoadJob::decoding(dir, paths, start_at));
            }
            SlideSource::Pdf(pdf) => {
                let tool = self.locator.locate()?;
                Rasterizer::new(tool).convert(&pdf, &self.output_dir)?;
                self.reset();
                self.job = Some(LoadJob::settling(self.output_dir.clone(), self.settle_delay, start_at));
            }
        }
        Ok(())
    }

    fn reset(&mut self) {
        if let Some(index) = self.shown.take() {
            if index < self.deck.len() {
                self.retired = Some(self.deck.swap_remove(index));
            }
        }
        self.deck.clear();
        self.position = 0;
        self.state = PresenterState::Empty;
        self.transition = None;
        self.job = None;
    }

    pub fn next(&mut self) -> bool {
        self.navigate(Step::Next)
    }

    pub fn previous(&mut self) -> bool {
        self.navigate(Step::Previous)
    }

    /// Start a transition; ignored unless a deck is showing and idle.
    pub fn navigate(&mut self, step: Step) -> bool {
        if self.state != PresenterState::Idle || self.deck.is_empty() {
            tracing::debug!(state = ?self.state, ?step, "navigation ignored");
            return false;
        }
        self.transition = Some(Transition::new(step, self.fade_secs, self.dim_level));
        self.state = PresenterState::Transitioning;
        true
    }

    pub fn tick<D>(&mut self, dt: f32, decoder: &mut D) -> Vec<PresenterEvent>
    where
        D: SlideDecoder<Slide = S>,
    {
        let mut events = Vec::new();

        if let Some(job) = self.job.as_mut() {
            match job.step(dt, decoder) {
                LoadStep::Pending | LoadStep::Skipped => {}
                LoadStep::Decoded(slide) => self.deck.push(slide),
                LoadStep::Finished => {
                    if let Some(job) = self.job.take() {
                        events.extend(self.finish_load(&job));
                    }
                }
            }
        }

        if let Some(transition) = self.transition.as_mut() {
            match transition.update(dt) {
                TransitionEvent::None => {}
                TransitionEvent::Swap => {
                    self.position = transition.step.apply(self.position, self.deck.len());
                    self.shown = Some(self.position);
                    tracing::info!("slide {}/{}", self.position + 1, self.deck.len());
                    events.push(PresenterEvent::Committed(self.position));
                }
                TransitionEvent::Finished => {
                    self.transition = None;
                    self.state = PresenterState::Idle;
                }
            }
        }

        events
    }

    fn finish_load(&mut self, job: &LoadJob) -> Option<PresenterEvent> {
        if self.deck.is_empty() {
            tracing::warn!("{}", SlideError::NoImagesFound(job.dir().to_path_buf()));
            return None;
        }
        self.position = if job.start_at() < self.deck.len() { job.start_at() } else { 0 };
        self.state = PresenterState::Idle;
        self.shown = Some(self.position);
        self.retired = None;
        tracing::info!(
            "presentation ready: {} slides, showing {}",
            self.deck.len(),
            self.position + 1
        );
        Some(PresenterEvent::DeckReady { len: self.deck.len() })
    }

    pub fn state(&self) -> PresenterState {
        self.state
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn deck(&self) -> &[S] {
        &self.deck
    }

    pub fn is_loading(&self) -> bool {
        self.job.is_some()
    }

    /// `(processed, total)` for the running load, if it has listed its files.
    pub fn loading_progress(&self) -> Option<(usize, usize)> {
        self.job.as_ref().and_then(LoadJob::progress)
    }

    pub fn brightness(&self) -> f32 {
        self.transition.as_ref().map_or(1.0, Transition::brightness)
    }

    /// The slide currently on the display surface and its tint.
    pub fn displayed(&self) -> Option<(&S, f32)> {
        match self.shown.and_then(|index| self.deck.get(index)) {
            Some(slide) => Some((slide, self.brightness())),
            None => self.retired.as_ref().map(|slide| (slide, 1.0)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::tests::NameDecoder;
    use tempfile::TempDir;

    const DT: f32 = 0.1;

    fn presenter(dir: &Path, tool: Option<PathBuf>) -> SlidePresenter<String> {
        let rasterizer = RasterizerSettings {
            custom_path: tool,
            bundled_path: dir.join("no-bundled-tool"),
            output_dir: Some(dir.join("pdf_slides")),
        };
        let locator = ToolLocator::from_settings(&rasterizer)
            .with_search_path(None)
            .with_fallbacks(Vec::new());
        SlidePresenter::new(&PresentationSettings::default(), &rasterizer).with_locator(locator)
    }

    fn slide_folder(root: &Path, name: &str, files: &[&str]) -> PathBuf {
        let dir = root.join(name);
        std::fs::create_dir_all(&dir).unwrap();
        for file in files {
            std::fs::write(dir.join(file), "x").unwrap();
        }
        dir
    }

    /// Tick until nothing is loading or fading.
    fn settle(presenter: &mut SlidePresenter<String>) -> Vec<PresenterEvent> {
        let mut events = Vec::new();
        for _ in 0..1000 {
            if !presenter.is_loading() && presenter.state() != PresenterState::Transitioning {
                break;
            }
            events.extend(presenter.tick(DT, &mut NameDecoder));
        }
        events
    }

    fn loaded(root: &Path, files: &[&str]) -> SlidePresenter<String> {
        let dir = slide_folder(root, "deck", files);
        let mut presenter = presenter(root, None);
        presenter.load(&dir, 0).unwrap();
        settle(&mut presenter);
        presenter
    }

    #[test]
    fn folder_loads_in_numeric_order_and_shows_first() {
        let root = TempDir::new().unwrap();
        let dir = slide_folder(root.path(), "deck", &["slide_10.png", "slide_2.png"]);
        let mut presenter = presenter(root.path(), None);

        presenter.load(&dir, 0).unwrap();
        assert_eq!(presenter.state(), PresenterState::Empty);
        assert!(presenter.displayed().is_none());

        let events = settle(&mut presenter);
        assert_eq!(events, [PresenterEvent::DeckReady { len: 2 }]);
        assert_eq!(presenter.deck(), ["slide_2.png", "slide_10.png"]);
        assert_eq!(presenter.state(), PresenterState::Idle);
        assert_eq!(presenter.displayed(), Some((&"slide_2.png".to_string(), 1.0)));
    }

    #[test]
    fn partial_progress_is_visible_while_loading() {
        let root = TempDir::new().unwrap();
        let dir = slide_folder(root.path(), "deck", &["1.png", "2.png", "3.png"]);
        let mut presenter = presenter(root.path(), None);

        presenter.load(&dir, 0).unwrap();
        presenter.tick(DT, &mut NameDecoder);
        assert_eq!(presenter.deck().len(), 1);
        assert_eq!(presenter.loading_progress(), Some((1, 3)));
    }

    #[test]
    fn outgoing_slide_stays_displayed_until_new_deck_is_ready() {
        let root = TempDir::new().unwrap();
        let mut presenter = loaded(root.path(), &["1.png", "2.png"]);
        presenter.next();
        settle(&mut presenter);
        let other = slide_folder(root.path(), "other", &["a_1.png", "a_2.png", "a_3.png"]);

        presenter.load(&other, 0).unwrap();
        presenter.tick(DT, &mut NameDecoder);
        assert_eq!(presenter.loading_progress(), Some((1, 3)));
        assert_eq!(presenter.displayed(), Some((&"2.png".to_string(), 1.0)));

        settle(&mut presenter);
        assert_eq!(presenter.displayed(), Some((&"a_1.png".to_string(), 1.0)));
    }

    #[test]
    fn next_wraps_from_last_and_previous_wraps_from_first() {
        let root = TempDir::new().unwrap();
        let mut presenter = loaded(root.path(), &["1.png", "2.png", "3.png"]);

        assert!(presenter.previous());
        let events = settle(&mut presenter);
        assert_eq!(events, [PresenterEvent::Committed(2)]);
        assert_eq!(presenter.position(), 2);

        assert!(presenter.next());
        settle(&mut presenter);
        assert_eq!(presenter.position(), 0);
        assert_eq!(presenter.displayed(), Some((&"1.png".to_string(), 1.0)));
    }

    #[test]
    fn navigation_during_transition_is_dropped() {
        let root = TempDir::new().unwrap();
        let mut presenter = loaded(root.path(), &["1.png", "2.png", "3.png"]);

        assert!(presenter.next());
        presenter.tick(DT, &mut NameDecoder);
        assert!(!presenter.next());
        assert_eq!(presenter.state(), PresenterState::Transitioning);

        settle(&mut presenter);
        assert_eq!(presenter.position(), 1);
        assert_eq!(presenter.state(), PresenterState::Idle);
    }

    #[test]
    fn brightness_dips_during_transition() {
        let root = TempDir::new().unwrap();
        let mut presenter = loaded(root.path(), &["1.png", "2.png"]);

        presenter.next();
        presenter.tick(0.25, &mut NameDecoder);
        let (_, brightness) = presenter.displayed().unwrap();
        assert!(brightness < 1.0 && brightness > 0.5);
    }

    #[test]
    fn empty_presenter_ignores_navigation() {
        let root = TempDir::new().unwrap();
        let mut presenter = presenter(root.path(), None);
        assert!(!presenter.next());
        assert!(!presenter.previous());
        assert_eq!(presenter.state(), PresenterState::Empty);
    }

    #[test]
    fn folder_without_images_gives_empty_deck_and_keeps_display() {
        let root = TempDir::new().unwrap();
        let mut presenter = loaded(root.path(), &["1.png", "2.png"]);
        let empty = slide_folder(root.path(), "empty", &["notes.txt"]);

        presenter.load(&empty, 0).unwrap();
        let events = settle(&mut presenter);

        assert!(events.is_empty());
        assert!(presenter.deck().is_empty());
        assert_eq!(presenter.state(), PresenterState::Empty);
        assert_eq!(presenter.displayed(), Some((&"1.png".to_string(), 1.0)));
        assert!(!presenter.next());
    }

    #[test]
    fn unsupported_source_changes_nothing() {
        let root = TempDir::new().unwrap();
        let mut presenter = loaded(root.path(), &["1.png", "2.png"]);
        presenter.next();
        settle(&mut presenter);

        let notes = root.path().join("notes.txt");
        std::fs::write(&notes, "x").unwrap();
        assert!(matches!(presenter.load(&notes, 0), Err(SlideError::UnsupportedSource(_))));
        assert_eq!(presenter.deck().len(), 2);
        assert_eq!(presenter.position(), 1);
    }

    #[test]
    fn missing_tool_changes_nothing() {
        let root = TempDir::new().unwrap();
        let mut presenter = loaded(root.path(), &["1.png", "2.png"]);
        let pdf = root.path().join("talk.pdf");
        std::fs::write(&pdf, "%PDF").unwrap();

        assert!(matches!(presenter.load(&pdf, 0), Err(SlideError::ToolNotFound { .. })));
        assert_eq!(presenter.deck().len(), 2);
        assert_eq!(presenter.state(), PresenterState::Idle);
    }

    #[test]
    fn load_abandons_running_transition() {
        let root = TempDir::new().unwrap();
        let mut presenter = loaded(root.path(), &["1.png", "2.png"]);
        let other = slide_folder(root.path(), "other", &["a_1.png", "a_2.png", "a_3.png"]);

        presenter.next();
        presenter.tick(DT, &mut NameDecoder);
        presenter.load(&other, 0).unwrap();
        assert_eq!(presenter.state(), PresenterState::Empty);

        settle(&mut presenter);
        assert_eq!(presenter.deck(), ["a_1.png", "a_2.png", "a_3.png"]);
        assert_eq!(presenter.position(), 0);
        assert_eq!(presenter.brightness(), 1.0);
    }

    #[test]
    fn resume_index_is_used_when_in_range() {
        let root = TempDir::new().unwrap();
        let dir = slide_folder(root.path(), "deck", &["1.png", "2.png", "3.png"]);
        let mut presenter = presenter(root.path(), None);

        presenter.load(&dir, 2).unwrap();
        settle(&mut presenter);
        assert_eq!(presenter.position(), 2);

        presenter.load(&dir, 7).unwrap();
        settle(&mut presenter);
        assert_eq!(presenter.position(), 0);
    }

    #[test]
    fn undecodable_slides_are_skipped() {
        let root = TempDir::new().unwrap();
        let dir = slide_folder(root.path(), "deck", &["1.png", "3.png"]);
        std::fs::write(dir.join("2.png"), "corrupt").unwrap();
        let mut presenter = presenter(root.path(), None);

        presenter.load(&dir, 0).unwrap();
        settle(&mut presenter);
        assert_eq!(presenter.deck(), ["1.png", "3.png"]);
    }

    #[cfg(unix)]
    #[test]
    fn failed_conversion_keeps_previous_deck_and_position() {
        use crate::rasterizer::tests::fake_tool;

        let root = TempDir::new().unwrap();
        let tools = root.path().join("tools");
        std::fs::create_dir_all(&tools).unwrap();
        let tool = fake_tool(&tools, "echo 'broken xref' >&2\nexit 1");
        let dir = slide_folder(root.path(), "deck", &["1.png", "2.png", "3.png"]);
        let pdf = root.path().join("talk.pdf");
        std::fs::write(&pdf, "%PDF").unwrap();

        let mut presenter = presenter(root.path(), Some(tool));
        presenter.load(&dir, 0).unwrap();
        settle(&mut presenter);
        presenter.next();
        settle(&mut presenter);

        let err = presenter.load(&pdf, 0).unwrap_err();
        assert!(matches!(err, SlideError::ConversionFailed { ref stderr, .. } if stderr == "broken xref"));
        assert_eq!(presenter.deck(), ["1.png", "2.png", "3.png"]);
        assert_eq!(presenter.position(), 1);
        assert_eq!(presenter.state(), PresenterState::Idle);
    }

    #[cfg(unix)]
    #[test]
    fn converted_pdf_loads_after_settle_delay() {
        use crate::rasterizer::tests::fake_tool;

        let root = TempDir::new().unwrap();
        let tools = root.path().join("tools");
        std::fs::create_dir_all(&tools).unwrap();
        let tool = fake_tool(
            &tools,
            r#"dir=$(dirname "$3")
for n in 1 2 10; do echo page > "$dir/slide_$n.png"; done"#,
        );
        let pdf = root.path().join("talk.pdf");
        std::fs::write(&pdf, "%PDF").unwrap();

        let mut presenter = presenter(root.path(), Some(tool));
        presenter.load(&pdf, 0).unwrap();
        assert!(presenter.is_loading());
        assert_eq!(presenter.loading_progress(), None);

        // Still inside the settle delay
        presenter.tick(DT, &mut NameDecoder);
        assert!(presenter.deck().is_empty());

        let events = settle(&mut presenter);
        assert_eq!(events, [PresenterEvent::DeckReady { len: 3 }]);
        assert_eq!(presenter.deck(), ["slide_1.png", "slide_2.png", "slide_10.png"]);
    }

    #[cfg(unix)]
    #[test]
    fn failed_conversion_does_not_touch_pages_still_loading() {
        use crate::rasterizer::tests::fake_tool;

        let root = TempDir::new().unwrap();
        let tools = root.path().join("tools");
        std::fs::create_dir_all(&tools).unwrap();
        let tool = fake_tool(
            &tools,
            r#"dir=$(dirname "$3")
for n in 1 2 3; do echo page > "$dir/slide_$n.png"; done"#,
        );
        let first = root.path().join("first.pdf");
        let second = root.path().join("second.pdf");
        std::fs::write(&first, "%PDF").unwrap();
        std::fs::write(&second, "%PDF").unwrap();

        let mut presenter = presenter(root.path(), Some(tool));
        presenter.load(&first, 0).unwrap();
        while presenter.loading_progress() != Some((1, 3)) {
            presenter.tick(DT, &mut NameDecoder);
        }

        // Second document writes one unreadable page, then crashes
        fake_tool(
            &tools,
            r#"dir=$(dirname "$3")
printf corrupt > "$dir/slide_2.png"
exit 1"#,
        );
        assert!(matches!(presenter.load(&second, 0), Err(SlideError::ConversionFailed { .. })));

        settle(&mut presenter);
        assert_eq!(presenter.deck(), ["slide_1.png", "slide_2.png", "slide_3.png"]);
        assert_eq!(presenter.state(), PresenterState::Idle);
    }
}
