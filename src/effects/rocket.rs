use crate::canvas::{Canvas, WHITE};
use crate::config::RocketConfig;
use std::collections::VecDeque;
use std::time::Duration;

const TRAIL_MARK: f32 = 1.0;
const BODY_WIDTH: f32 = 1.0;
const BODY_HEIGHT: f32 = 2.0;

/// A shell climbing at constant speed until its fuse burns out. The speed
/// is picked at launch from the height below it.
#[derive(Clone, Debug)]
pub struct Rocket {
    pub x: f32,
    pub y: f32,
    origin: (f32, f32),
    target_y: f32,
    speed: f32,
    trail: VecDeque<(f32, f32)>,
    trail_cap: usize,
    born: Duration,
    fuse: Duration,
}

impl Rocket {
    pub fn new(x: f32, y: f32, target_y: f32, born: Duration, config: &RocketConfig) -> Self {
        Self {
            x,
            y,
            origin: (x, y),
            target_y,
            speed: config.speed_for(y),
            trail: VecDeque::with_capacity(config.trail_cap + 1),
            trail_cap: config.trail_cap,
            born,
            fuse: config.fuse(),
        }
    }

    pub fn origin(&self) -> (f32, f32) {
        self.origin
    }

    /// Height hint picked at launch. The burst is timed by the fuse, not by
    /// reaching this height.
    pub fn target_y(&self) -> f32 {
        self.target_y
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn born(&self) -> Duration {
        self.born
    }

    pub fn trail(&self) -> &VecDeque<(f32, f32)> {
        &self.trail
    }

    /// Advances one frame. Returns true once the fuse has burnt out at `now`.
    pub fn update(&mut self, now: Duration) -> bool {
        self.trail.push_back((self.x, self.y));
        while self.trail.len() > self.trail_cap {
            self.trail.pop_front();
        }
        self.y -= self.speed;
        now.saturating_sub(self.born) >= self.fuse
    }

    pub fn draw(&self, canvas: &mut Canvas) {
        let len = self.trail.len() as f32;
        for (i, &(x, y)) in self.trail.iter().enumerate() {
            canvas.scoped(|c| {
                c.set_alpha(i as f32 / len);
                c.fill_rect(x, y, TRAIL_MARK, TRAIL_MARK, WHITE);
            });
        }
        canvas.fill_rect(self.x, self.y, BODY_WIDTH, BODY_HEIGHT, WHITE);
    }
}
