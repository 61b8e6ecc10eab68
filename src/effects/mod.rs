use crossterm::event::Event;
use std::io::{self, Write};
use std::time::Duration;

pub mod particle;
pub mod rocket;
pub mod show;

/// Fixed simulation step; per-frame kinematics assume 60 steps a second.
pub const FRAME_STEP: Duration = Duration::from_micros(16_667);

pub trait Effect {
    fn update(&mut self, dt: Duration);
    fn render<W: Write>(&mut self, out: &mut W) -> io::Result<()>;
    fn handle_event(&mut self, _event: &Event) {}
    /// Called with the new surface size in pixels.
    fn resize(&mut self, width: usize, height: usize);
}
