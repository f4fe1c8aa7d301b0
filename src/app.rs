use std::path::{Path, PathBuf};

use crate::clock::{ClockSnapshot, SimClock};
use crate::config::Config;
use crate::decoder::SlideDecoder;
use crate::dialog::{PromptOutcome, SourcePrompt};
use crate::error::SlideError;
use crate::input::Action;
use crate::noise::{NoiseCue, NoiseSchedule};
use crate::presenter::{PresenterEvent, SlidePresenter};
use crate::session::{SLIDE_KEY, SOURCE_KEY, SessionStore};
use crate::source::is_pdf;
use crate::timer::PresentationTimer;

/// Everything the host loop drives: the presenter plus the clock, dialog,
/// timer, noise schedule and session that surround it.
pub struct App<S> {
    presenter: SlidePresenter<S>,
    clock: SimClock,
    prompt: SourcePrompt,
    snapshot: Option<ClockSnapshot>,
    pending: Option<(PathBuf, usize)>,
    timer: PresentationTimer,
    noise: NoiseSchedule,
    session: SessionStore,
}

impl<S> App<S> {
    pub fn new(config: &Config, session: SessionStore) -> Self {
        Self {
            presenter: SlidePresenter::new(&config.presentation, &config.rasterizer),
            clock: SimClock::new(config.presentation.capture_pointer),
            prompt: SourcePrompt::default(),
            snapshot: None,
            pending: None,
            timer: PresentationTimer::default(),
            noise: NoiseSchedule::new(&config.environment),
            session,
        }
    }

    /// Run once before the first tick. An explicit `source` wins over the
    /// one remembered from the last session, which resumes at its last slide.
    pub fn initialize(&mut self, source: Option<PathBuf>) {
        self.presenter.initialize();
        tracing::info!(noise = ?self.noise.level(), "presenter initialized");

        self.pending = match source {
            Some(path) => Some((path, 0)),
            None => self.session.get(SOURCE_KEY).map(|saved| {
                let slide = self
                    .session
                    .get(SLIDE_KEY)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(0);
                tracing::info!(source = saved, slide, "resuming last session");
                (PathBuf::from(saved), slide)
            }),
        };
    }

    pub fn handle(&mut self, action: Action) {
        if self.prompt.is_open() {
            return;
        }
        match action {
            Action::NextSlide => {
                self.presenter.next();
            }
            Action::PreviousSlide => {
                self.presenter.previous();
            }
            Action::OpenSource => self.open_dialog(),
            Action::StartTimer => self.timer.start(),
            Action::PauseTimer => self.timer.pause(),
            Action::ResetTimer => self.timer.reset(),
        }
    }

    pub fn open_dialog(&mut self) {
        if self.prompt.is_open() {
            return;
        }
        self.snapshot = Some(self.clock.suspend_for_dialog());
        self.prompt.open(self.session.get(SOURCE_KEY));
        tracing::info!("source dialog opened, simulation paused");
    }

    /// Keyboard editing of the open prompt.
    pub fn prompt_mut(&mut self) -> &mut SourcePrompt {
        &mut self.prompt
    }

    /// Close the prompt with its path. The load itself runs on the next
    /// tick so the host gets a frame to show it is busy.
    pub fn confirm_dialog(&mut self) {
        let outcome = self.prompt.confirm();
        self.close_dialog(outcome);
    }

    pub fn cancel_dialog(&mut self) {
        let outcome = self.prompt.cancel();
        self.close_dialog(outcome);
    }

    fn close_dialog(&mut self, outcome: PromptOutcome) {
        if let Some(snapshot) = self.snapshot.take() {
            self.clock.restore(snapshot);
        }
        match outcome {
            PromptOutcome::Chosen(path) => {
                tracing::info!(path = %path.display(), "source selected");
                self.pending = Some((path, 0));
            }
            PromptOutcome::Cancelled => tracing::info!("source selection cancelled"),
        }
    }

    pub fn tick<D>(&mut self, dt: f32, decoder: &mut D) -> Vec<NoiseCue>
    where
        D: SlideDecoder<Slide = S>,
    {
        if let Some((path, start_at)) = self.pending.take() {
            self.load(&path, start_at);
        }

        let sim_dt = self.clock.scale(dt);
        for event in self.presenter.tick(sim_dt, decoder) {
            match event {
                PresenterEvent::Committed(index) => self.session.set(SLIDE_KEY, index.to_string()),
                PresenterEvent::DeckReady { len } => {
                    tracing::debug!(len, "deck ready, saving start slide");
                    self.session.set(SLIDE_KEY, self.presenter.position().to_string())
                }
            }
        }

        self.timer.tick(sim_dt);
        self.noise.tick(sim_dt)
    }

    fn load(&mut self, path: &Path, start_at: usize) {
        match self.presenter.load(path, start_at) {
            Ok(()) => self.session.set(SOURCE_KEY, path.to_string_lossy()),
            Err(e @ SlideError::UnsupportedSource(_)) => tracing::warn!("{e}"),
            Err(e) => tracing::error!("failed to load slides: {e}"),
        }
    }

    pub fn presenter(&self) -> &SlidePresenter<S> {
        &self.presenter
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn prompt(&self) -> &SourcePrompt {
        &self.prompt
    }

    pub fn timer(&self) -> &PresentationTimer {
        &self.timer
    }

    /// A PDF is queued and the next tick will block on the rasterizer.
    pub fn is_converting(&self) -> bool {
        self.pending.as_ref().is_some_and(|(path, _)| is_pdf(path))
    }
}
