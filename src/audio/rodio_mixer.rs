use super::{Channel, Mixer};
use anyhow::{Context, Result, anyhow};
use log::warn;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Plays clips on the default output device.
pub struct RodioMixer {
    output: Option<(OutputStream, OutputStreamHandle)>,
    background: Option<Sink>,
}

impl RodioMixer {
    /// Never fails: without an output device every `play` is rejected.
    pub fn new() -> Self {
        let output = match OutputStream::try_default() {
            Ok(output) => Some(output),
            Err(err) => {
                warn!("no audio output device: {err}");
                None
            }
        };
        Self {
            output,
            background: None,
        }
    }
}

impl Default for RodioMixer {
    fn default() -> Self {
        Self::new()
    }
}

impl Mixer for RodioMixer {
    fn play(&mut self, clip: &Path, channel: Channel) -> Result<()> {
        let (_, handle) = self
            .output
            .as_ref()
            .ok_or_else(|| anyhow!("audio output unavailable"))?;

        let file = File::open(clip).with_context(|| format!("failed to open {}", clip.display()))?;
        let source = Decoder::new(BufReader::new(file))
            .with_context(|| format!("failed to decode {}", clip.display()))?;
        let sink = Sink::try_new(handle)?;
        sink.append(source);

        match channel {
            Channel::Background => {
                if let Some(previous) = self.background.replace(sink) {
                    previous.stop();
                }
            }
            Channel::Effect => sink.detach(),
        }
        Ok(())
    }
}
