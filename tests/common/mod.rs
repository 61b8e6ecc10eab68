#![allow(dead_code)]

use anyhow::{Result, bail};
use coinworks::{Channel, Mixer, ParticleConfig, RandomSource, ShowConfig};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const FRAME: Duration = Duration::from_micros(16_667);

/// Replays `values` in a loop.
pub struct ScriptedRandom {
    values: Vec<f32>,
    next: usize,
}

impl ScriptedRandom {
    pub fn new(values: &[f32]) -> Self {
        Self {
            values: values.to_vec(),
            next: 0,
        }
    }

    pub fn constant(value: f32) -> Self {
        Self::new(&[value])
    }
}

impl RandomSource for ScriptedRandom {
    fn next_f32(&mut self) -> f32 {
        let value = self.values[self.next % self.values.len()];
        self.next += 1;
        value
    }
}

#[derive(Default)]
pub struct RecordingMixer {
    pub played: Vec<(PathBuf, Channel)>,
    pub reject: bool,
}

impl RecordingMixer {
    pub fn rejecting() -> Self {
        Self {
            played: Vec::new(),
            reject: true,
        }
    }

    pub fn on(&self, channel: Channel) -> Vec<PathBuf> {
        self.played
            .iter()
            .filter(|(_, c)| *c == channel)
            .map(|(clip, _)| clip.clone())
            .collect()
    }
}

impl Mixer for RecordingMixer {
    fn play(&mut self, clip: &Path, channel: Channel) -> Result<()> {
        if self.reject {
            bail!("playback blocked");
        }
        self.played.push((clip.to_path_buf(), channel));
        Ok(())
    }
}

/// Coins that stay where they are spawned.
pub fn still_particles() -> ParticleConfig {
    ParticleConfig {
        spread: 0.0,
        friction: 1.0,
        gravity: 0.0,
        ..ParticleConfig::default()
    }
}

pub fn test_config() -> ShowConfig {
    ShowConfig {
        clips: (1..=4).map(|i| PathBuf::from(format!("clip{i}.ogg"))).collect(),
        ..ShowConfig::default()
    }
}
