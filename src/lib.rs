pub mod audio;
pub mod canvas;
pub mod config;
pub mod effects;
pub mod random;
pub mod timer;

pub use audio::{Channel, Mixer, SilentMixer, Soundtrack};
pub use canvas::{Canvas, Rgb};
pub use config::{ParticleConfig, RocketConfig, ShowConfig};
pub use effects::{Effect, FRAME_STEP};
pub use effects::particle::Particle;
pub use effects::rocket::Rocket;
pub use effects::show::{FireworksShow, StartButton};
pub use random::RandomSource;
pub use timer::Timer;
