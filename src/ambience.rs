use std::path::Path;

use raylib::prelude::*;

use crate::config::{EnvironmentSettings, SoundFiles};
use crate::noise::{AmbientLoop, NoiseCue};

/// Plays the audience noise: looping streams for the ambient layers and
/// one-shot sounds for scheduled cues. Sounds that fail to load are
/// skipped so a missing file never stops a rehearsal.
pub struct Ambience<'aud> {
    loops: Vec<(AmbientLoop, Music<'aud>)>,
    cues: Vec<(NoiseCue, Sound<'aud>)>,
    paused: bool,
}

impl<'aud> Ambience<'aud> {
    pub fn new(audio: &'aud RaylibAudio, settings: &EnvironmentSettings) -> Self {
        let level = settings.noise_level;
        let sounds = &settings.sounds;

        let loops = level
            .loops()
            .iter()
            .filter_map(|kind| {
                let path = loop_file(sounds, *kind)?;
                let music = audio
                    .new_music(path_str(path)?)
                    .map_err(|e| tracing::warn!(path = %path.display(), "failed to load ambient loop: {}", e))
                    .ok()?;
                Some((*kind, music))
            })
            .collect();

        let cues = level
            .cues()
            .iter()
            .filter_map(|cue| {
                let path = cue_file(sounds, *cue)?;
                let sound = audio
                    .new_sound(path_str(path)?)
                    .map_err(|e| tracing::warn!(path = %path.display(), "failed to load noise cue: {}", e))
                    .ok()?;
                Some((*cue, sound))
            })
            .collect();

        tracing::info!(?level, "audience noise configured");
        Self {
            loops,
            cues,
            paused: false,
        }
    }

    pub fn start(&self) {
        for (kind, music) in &self.loops {
            tracing::debug!(?kind, "starting ambient loop");
            music.play_stream();
        }
    }

    /// Call once per frame: feeds the streams, follows the pause flag and
    /// fires any cues that came due.
    pub fn update(&mut self, audio_paused: bool, due: &[NoiseCue]) {
        if audio_paused != self.paused {
            self.paused = audio_paused;
            for (_, music) in &self.loops {
                if audio_paused {
                    music.pause_stream();
                } else {
                    music.resume_stream();
                }
            }
        }

        for (_, music) in &self.loops {
            music.update_stream();
        }

        if audio_paused {
            return;
        }
        for cue in due {
            if let Some((_, sound)) = self.cues.iter().find(|(kind, _)| kind == cue) {
                tracing::debug!(?cue, "playing noise cue");
                sound.play();
            }
        }
    }
}

fn loop_file(sounds: &SoundFiles, kind: AmbientLoop) -> Option<&Path> {
    let path = match kind {
        AmbientLoop::Background => &sounds.background,
        AmbientLoop::Environment => &sounds.environment,
        AmbientLoop::PeopleTalking => &sounds.people_talking,
    };
    if path.is_none() {
        tracing::debug!(?kind, "no sound file configured for ambient loop");
    }
    path.as_deref()
}

fn cue_file(sounds: &SoundFiles, cue: NoiseCue) -> Option<&Path> {
    let path = match cue {
        NoiseCue::Cough => &sounds.cough,
        NoiseCue::Phone => &sounds.phone,
    };
    if path.is_none() {
        tracing::debug!(?cue, "no sound file configured for noise cue");
    }
    path.as_deref()
}

fn path_str(path: &Path) -> Option<&str> {
    let s = path.to_str();
    if s.is_none() {
        tracing::warn!(path = %path.display(), "sound path is not valid UTF-8");
    }
    s
}
