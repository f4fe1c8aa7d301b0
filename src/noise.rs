use serde::{Deserialize, Serialize};

use crate::config::EnvironmentSettings;
use crate::constants::{COUGH_FIRST_DELAY, PHONE_FIRST_DELAY};

/// How noisy the simulated audience is.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoiseLevel {
    #[default]
    None,
    Low,
    Medium,
    High,
}

/// Continuous background sounds, started once and looped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmbientLoop {
    Background,
    Environment,
    PeopleTalking,
}

/// One-shot sounds fired on a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoiseCue {
    Cough,
    Phone,
}

impl NoiseLevel {
    pub fn loops(self) -> &'static [AmbientLoop] {
        match self {
            NoiseLevel::None => &[],
            NoiseLevel::Low => &[AmbientLoop::Background],
            NoiseLevel::Medium => &[AmbientLoop::Background, AmbientLoop::Environment],
            NoiseLevel::High => &[
                AmbientLoop::Background,
                AmbientLoop::Environment,
                AmbientLoop::PeopleTalking,
            ],
        }
    }

    pub fn cues(self) -> &'static [NoiseCue] {
        match self {
            NoiseLevel::None => &[],
            NoiseLevel::Low => &[NoiseCue::Cough],
            NoiseLevel::Medium | NoiseLevel::High => &[NoiseCue::Cough, NoiseCue::Phone],
        }
    }
}

#[derive(Debug, Clone)]
struct Periodic {
    cue: NoiseCue,
    countdown: f32,
    interval: f32,
}

/// Decides when the one-shot audience noises fire. Fed with simulation
/// time, so it stands still while the clock is paused.
#[derive(Debug, Clone)]
pub struct NoiseSchedule {
    level: NoiseLevel,
    periodic: Vec<Periodic>,
}

impl NoiseSchedule {
    pub fn new(settings: &EnvironmentSettings) -> Self {
        let periodic = settings
            .noise_level
            .cues()
            .iter()
            .map(|cue| match cue {
                NoiseCue::Cough => Periodic {
                    cue: NoiseCue::Cough,
                    countdown: COUGH_FIRST_DELAY,
                    interval: settings.cough_interval_secs,
                },
                NoiseCue::Phone => Periodic {
                    cue: NoiseCue::Phone,
                    countdown: PHONE_FIRST_DELAY,
                    interval: settings.phone_interval_secs,
                },
            })
            .collect();
        Self {
            level: settings.noise_level,
            periodic,
        }
    }

    pub fn level(&self) -> NoiseLevel {
        self.level
    }

    /// Cues that came due during the last `dt` seconds; at most one per kind.
    pub fn tick(&mut self, dt: f32) -> Vec<NoiseCue> {
        let mut due = Vec::new();
        for periodic in &mut self.periodic {
            periodic.countdown -= dt;
            if periodic.countdown <= 0.0 {
                due.push(periodic.cue);
                periodic.countdown += periodic.interval.max(f32::EPSILON);
            }
        }
        due
    }
}
