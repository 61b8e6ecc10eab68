use crate::canvas::{BLACK, Canvas, Rgb};
use crate::config::ParticleConfig;
use crate::random::RandomSource;

// Copper coin palette
const COPPER_LIGHT: Rgb = (0xCD, 0x7F, 0x32);
const COPPER: Rgb = (0xB8, 0x73, 0x33);
const COPPER_DARK: Rgb = (0x8B, 0x45, 0x13);

const COIN_GRADIENT: [(f32, Rgb); 3] = [(0.0, COPPER_LIGHT), (0.7, COPPER), (1.0, COPPER_DARK)];

const SPIN: f32 = 0.005;

/// A single coin thrown out by an explosion.
#[derive(Clone, Debug)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    opacity: f32,
    rotation: f32,
    radius: f32,
    friction: f32,
    gravity: f32,
    fade_step: f32,
}

impl Particle {
    pub fn new(x: f32, y: f32, config: &ParticleConfig, rng: &mut impl RandomSource) -> Self {
        let vx = (rng.next_f32() - 0.5) * config.spread;
        let vy = (rng.next_f32() - 0.5) * config.spread;
        let rotation = rng.next_f32() * std::f32::consts::PI * 2.0;

        Self {
            x,
            y,
            vx,
            vy,
            opacity: 1.0,
            rotation,
            radius: config.radius,
            friction: config.friction,
            gravity: config.gravity,
            fade_step: config.fade_step,
        }
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn is_spent(&self) -> bool {
        self.opacity <= 0.0
    }

    pub fn update(&mut self) {
        self.vx *= self.friction;
        self.vy *= self.friction;
        self.vy += self.gravity;
        self.x += self.vx;
        self.y += self.vy;
        self.opacity -= self.fade_step;
        self.rotation += SPIN;
    }

    /// Draws a square-holed copper coin centred on the particle.
    pub fn draw(&self, canvas: &mut Canvas) {
        let r = self.radius;
        canvas.scoped(|c| {
            c.set_alpha(self.opacity);
            c.translate(self.x, self.y);
            c.rotate(self.rotation);

            c.fill_radial_disc(0.0, 0.0, r, &COIN_GRADIENT);

            let hole = r * 0.3;
            c.fill_rect(-hole, -hole, hole * 2.0, hole * 2.0, BLACK);

            c.stroke_circle(0.0, 0.0, r * 0.8, 1.0, COPPER_DARK);

            // Inscription marks at the four cardinal points
            let mark = r * 0.4;
            let long = mark / 1.5;
            let short = mark / 2.0;
            c.fill_rect(-mark / 3.0, -r * 0.7, long, short, COPPER_DARK);
            c.fill_rect(-mark / 3.0, r * 0.7 - short, long, short, COPPER_DARK);
            c.fill_rect(-r * 0.7, -mark / 3.0, short, long, COPPER_DARK);
            c.fill_rect(r * 0.7 - short, -mark / 3.0, short, long, COPPER_DARK);
        });
    }
}
