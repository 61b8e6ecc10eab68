//! Background clip rotation and one-shot cues.

use crate::random::RandomSource;
use crate::timer::Timer;
use anyhow::Result;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[cfg(feature = "rodio")]
mod rodio_mixer;
#[cfg(feature = "rodio")]
pub use rodio_mixer::RodioMixer;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Channel {
    /// Single voice; starting a clip restarts it from the beginning.
    Background,
    /// Independent voice per play.
    Effect,
}

pub trait Mixer {
    /// Starts playback. An error means the clip did not start.
    fn play(&mut self, clip: &Path, channel: Channel) -> Result<()>;
}

/// Mixer for builds without an audio backend.
#[derive(Default, Debug)]
pub struct SilentMixer;

impl Mixer for SilentMixer {
    fn play(&mut self, clip: &Path, channel: Channel) -> Result<()> {
        debug!("(silent) {:?} {}", channel, clip.display());
        Ok(())
    }
}

/// Rotates through the configured clips, waiting `delay` after each one
/// starts before moving on to the next.
pub struct Soundtrack {
    clips: Vec<PathBuf>,
    index: usize,
    next: Timer,
}

impl Soundtrack {
    pub fn new(clips: Vec<PathBuf>, delay: Duration) -> Self {
        Self {
            clips,
            index: 0,
            next: Timer::once(delay),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_waiting(&self) -> bool {
        self.next.is_running()
    }

    /// Plays the current clip. Rotation continues only if playback started.
    pub fn start(&mut self, now: Duration, mixer: &mut impl Mixer) {
        let Some(clip) = self.clips.get(self.index) else {
            return;
        };
        match mixer.play(clip, Channel::Background) {
            Ok(()) => {
                debug!("background clip {} started", clip.display());
                self.next.start(now);
            }
            Err(err) => {
                warn!("waiting for user interaction: {err:#}");
                self.next.stop();
            }
        }
    }

    pub fn stop(&mut self) {
        self.next.stop();
    }

    pub fn poll(&mut self, now: Duration, mixer: &mut impl Mixer) {
        if self.next.poll(now) {
            self.index = (self.index + 1) % self.clips.len();
            self.start(now, mixer);
        }
    }
}

/// Plays one randomly picked clip on its own voice. Failures are not
/// reported to the caller.
pub fn play_cue(clips: &[PathBuf], mixer: &mut impl Mixer, rng: &mut impl RandomSource) {
    if clips.is_empty() {
        return;
    }
    let clip = &clips[rng.index(clips.len())];
    if let Err(err) = mixer.play(clip, Channel::Effect) {
        debug!("cue {} did not play: {err:#}", clip.display());
    }
}

/// Logs which backend the binary was built with.
pub fn describe_backend() {
    if cfg!(feature = "rodio") {
        info!("audio backend: rodio");
    } else {
        info!("audio backend: silent");
    }
}
