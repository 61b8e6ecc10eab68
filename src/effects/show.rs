use super::Effect;
use super::particle::Particle;
use super::rocket::Rocket;
use crate::audio::{self, Mixer, Soundtrack};
use crate::canvas::Canvas;
use crate::config::ShowConfig;
use crate::random::RandomSource;
use crate::timer::Timer;
use crossterm::event::{Event, KeyCode, KeyEventKind, MouseButton, MouseEventKind};
use log::{debug, info};
use std::io::{self, Write};
use std::time::Duration;

// Per-frame veil that turns old frames into trails
const FADE_ALPHA: f32 = 0.1;

const START_LABEL: &str = " Click or press Enter to start ";

/// The control that gates the auto-launcher and the soundtrack. Laid out in
/// terminal cells, centred on the screen.
#[derive(Clone, Debug)]
pub struct StartButton {
    label: &'static str,
}

impl StartButton {
    fn new() -> Self {
        Self { label: START_LABEL }
    }

    /// `(column, row, width)` of the button for a surface of the given pixel
    /// size.
    pub fn bounds(&self, width: usize, height: usize) -> (usize, usize, usize) {
        let cols = width;
        let rows = height.div_ceil(2);
        let len = self.label.chars().count();
        (cols.saturating_sub(len) / 2, rows / 2, len)
    }

    pub fn contains(&self, width: usize, height: usize, column: usize, row: usize) -> bool {
        let (col0, row0, len) = self.bounds(width, height);
        row == row0 && column >= col0 && column < col0 + len
    }

    fn draw<W: Write>(&self, width: usize, height: usize, out: &mut W) -> io::Result<()> {
        let (col, row, _) = self.bounds(width, height);
        write!(
            out,
            "\x1b[{};{}H\x1b[48;2;184;115;51m\x1b[38;2;0;0;0m{}\x1b[0m",
            row + 1,
            col + 1,
            self.label
        )
    }
}

/// All state of a running fireworks show.
pub struct FireworksShow<M: Mixer, R: RandomSource> {
    config: ShowConfig,
    canvas: Canvas,
    rockets: Vec<Rocket>,
    particles: Vec<Particle>,
    clock: Duration,
    launcher: Timer,
    soundtrack: Soundtrack,
    start_button: Option<StartButton>,
    mixer: M,
    rng: R,
}

impl<M: Mixer, R: RandomSource> FireworksShow<M, R> {
    pub fn new(width: usize, height: usize, config: ShowConfig, mixer: M, rng: R) -> Self {
        let canvas = Canvas::new(width, height, config.background);
        let launcher = Timer::repeating(config.auto_launch_period());
        let soundtrack = Soundtrack::new(config.clips.clone(), config.rotation_delay());

        Self {
            config,
            canvas,
            rockets: Vec::new(),
            particles: Vec::new(),
            clock: Duration::ZERO,
            launcher,
            soundtrack,
            start_button: Some(StartButton::new()),
            mixer,
            rng,
        }
    }

    pub fn clock(&self) -> Duration {
        self.clock
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn rockets(&self) -> &[Rocket] {
        &self.rockets
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn mixer(&self) -> &M {
        &self.mixer
    }

    pub fn mixer_mut(&mut self) -> &mut M {
        &mut self.mixer
    }

    pub fn soundtrack(&self) -> &Soundtrack {
        &self.soundtrack
    }

    pub fn start_button(&self) -> Option<&StartButton> {
        self.start_button.as_ref()
    }

    pub fn is_started(&self) -> bool {
        self.start_button.is_none()
    }

    /// Removes the start control and begins the soundtrack and the
    /// auto-launcher. Later calls do nothing.
    pub fn activate(&mut self) {
        if self.start_button.take().is_none() {
            return;
        }
        info!("show started at {:?}", self.clock);
        self.soundtrack.start(self.clock, &mut self.mixer);
        self.launcher.start(self.clock);
    }

    /// Launches a rocket from the bottom edge at column `x`.
    pub fn launch(&mut self, x: f32) {
        let height = self.canvas.height() as f32;
        let target_y = height * self.rng.range(0.15, 0.3);
        debug!("rocket launched at x={x:.1}");
        self.rockets
            .push(Rocket::new(x, height, target_y, self.clock, &self.config.rocket));
    }

    fn launch_random(&mut self) {
        let x = self.rng.range(0.0, self.canvas.width() as f32);
        self.launch(x);
    }

    /// Spawns one burst of coins at `(x, y)`.
    pub fn create_firework(&mut self, x: f32, y: f32) {
        self.particles.reserve(self.config.burst_size);
        for _ in 0..self.config.burst_size {
            self.particles
                .push(Particle::new(x, y, &self.config.particle, &mut self.rng));
        }
    }

    /// Pointer click at a terminal cell.
    pub fn click(&mut self, column: usize, row: usize) {
        let (width, height) = (self.canvas.width(), self.canvas.height());
        let on_button = self
            .start_button
            .as_ref()
            .is_some_and(|button| button.contains(width, height, column, row));
        if on_button {
            self.activate();
            return;
        }

        audio::play_cue(&self.config.clips, &mut self.mixer, &mut self.rng);
        self.launch(column as f32);
    }

    /// Draws and advances one frame of rockets and particles.
    pub fn frame(&mut self) {
        let background = self.canvas.background();
        self.canvas.fade(background, FADE_ALPHA);

        let canvas = &mut self.canvas;
        let now = self.clock;
        let mut bursts = Vec::new();

        self.rockets.retain_mut(|rocket| {
            rocket.draw(canvas);
            if rocket.update(now) {
                bursts.push((rocket.x, rocket.y));
                false
            } else {
                true
            }
        });

        for (x, y) in bursts {
            self.create_firework(x, y);
        }

        let canvas = &mut self.canvas;
        self.particles.retain_mut(|particle| {
            if particle.is_spent() {
                return false;
            }
            particle.update();
            particle.draw(canvas);
            true
        });
    }
}

impl<M: Mixer, R: RandomSource> Effect for FireworksShow<M, R> {
    fn update(&mut self, dt: Duration) {
        self.clock += dt;

        if self.launcher.poll(self.clock) {
            self.launch_random();
        }
        self.soundtrack.poll(self.clock, &mut self.mixer);

        self.frame();
    }

    fn render<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        self.canvas.present(out)?;
        if let Some(button) = &self.start_button {
            button.draw(self.canvas.width(), self.canvas.height(), out)?;
        }
        out.flush()
    }

    fn handle_event(&mut self, event: &Event) {
        match event {
            Event::Mouse(mouse_event) => {
                if let MouseEventKind::Down(MouseButton::Left) = mouse_event.kind {
                    self.click(mouse_event.column as usize, mouse_event.row as usize);
                }
            }
            Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                if matches!(key_event.code, KeyCode::Enter | KeyCode::Char(' ')) {
                    self.activate();
                }
            }
            _ => {}
        }
    }

    fn resize(&mut self, width: usize, height: usize) {
        self.canvas.resize(width, height);
    }
}
