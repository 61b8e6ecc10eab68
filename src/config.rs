//! Show configuration loaded from YAML.
//!
//! Every field is optional; a file only needs to name what it overrides.
//!
//! ```yaml
//! burst_size: 25            # coins per explosion
//! auto_launch_ms: 800       # auto-launcher period
//! rotation_delay_ms: 5000   # gap between background clips
//! background: [0, 0, 0]
//! clips:
//!   - audio/boom1.mp3
//!   - audio/boom2.mp3
//!   - audio/boom3.mp3
//!   - audio/boom4.mp3
//!
//! rocket:
//!   apex: 0.6               # share of the launch height climbed before the fuse burns out
//!   fuse_ms: 3000
//!   trail_cap: 20
//!
//! particle:
//!   spread: 1.2             # velocity components are (r - 0.5) * spread
//!   friction: 0.995
//!   gravity: 0.004
//!   fade_step: 0.001        # opacity lost per frame
//!   radius: 3.0
//! ```

use anyhow::{Context, Result, ensure};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::effects::FRAME_STEP;

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RocketConfig {
    pub apex: f32,
    pub fuse_ms: u64,
    pub trail_cap: usize,
}

impl Default for RocketConfig {
    fn default() -> Self {
        Self {
            apex: 0.6,
            fuse_ms: 3000,
            trail_cap: 20,
        }
    }
}

impl RocketConfig {
    pub fn fuse(&self) -> Duration {
        Duration::from_millis(self.fuse_ms)
    }

    /// Upward speed in pixels per frame for a rocket launched `climb` pixels
    /// below the top edge, so that its fuse burns out `apex` of the way up.
    pub fn speed_for(&self, climb: f32) -> f32 {
        let fuse_frames = self.fuse().as_secs_f32() / FRAME_STEP.as_secs_f32();
        if fuse_frames > 0.0 {
            climb * self.apex / fuse_frames
        } else {
            0.0
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ParticleConfig {
    pub spread: f32,
    pub friction: f32,
    pub gravity: f32,
    pub fade_step: f32,
    pub radius: f32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            spread: 1.2,
            friction: 0.995,
            gravity: 0.004,
            fade_step: 0.001,
            radius: 3.0,
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ShowConfig {
    pub burst_size: usize,
    pub auto_launch_ms: u64,
    pub rotation_delay_ms: u64,
    pub background: (u8, u8, u8),
    pub clips: Vec<PathBuf>,
    pub rocket: RocketConfig,
    pub particle: ParticleConfig,
}

impl Default for ShowConfig {
    fn default() -> Self {
        Self {
            burst_size: 25,
            auto_launch_ms: 800,
            rotation_delay_ms: 5000,
            background: (0, 0, 0),
            clips: (1..=4)
                .map(|i| PathBuf::from(format!("audio/boom{i}.mp3")))
                .collect(),
            rocket: RocketConfig::default(),
            particle: ParticleConfig::default(),
        }
    }
}

impl ShowConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("failed to open config {}", path.display()))?;
        let config: ShowConfig = serde_yaml::from_reader(BufReader::new(file))
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: ShowConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.burst_size > 0, "burst_size must be positive");
        ensure!(self.auto_launch_ms > 0, "auto_launch_ms must be positive");
        ensure!(self.rotation_delay_ms > 0, "rotation_delay_ms must be positive");
        ensure!(!self.clips.is_empty(), "at least one audio clip is required");
        ensure!(self.rocket.trail_cap > 0, "rocket.trail_cap must be positive");
        ensure!(
            self.rocket.apex > 0.0 && self.rocket.apex <= 1.0,
            "rocket.apex must be in (0, 1], got {}",
            self.rocket.apex
        );
        ensure!(
            self.particle.fade_step > 0.0,
            "particle.fade_step must be positive, got {}",
            self.particle.fade_step
        );
        ensure!(self.particle.radius > 0.0, "particle.radius must be positive");
        Ok(())
    }

    pub fn auto_launch_period(&self) -> Duration {
        Duration::from_millis(self.auto_launch_ms)
    }

    pub fn rotation_delay(&self) -> Duration {
        Duration::from_millis(self.rotation_delay_ms)
    }
}
