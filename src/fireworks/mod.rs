//! Rocket and particle fireworks drawn onto a persistent canvas.
//!
//! The engine knows nothing about why it is running. `start` lets rockets
//! launch, `stop` lets whatever is in flight burn out, and the frame loop
//! shuts itself off once nothing is left.

pub mod canvas;
pub mod particle;
pub mod rocket;

use std::time::Duration;

use crate::Rgb;
use crate::schedule::Scheduler;

pub use canvas::{BlendMode, Canvas, Viewport};
pub use particle::Particle;
pub use rocket::Rocket;

pub const COLORS: [Rgb; 12] = [
    (0x66, 0x7e, 0xea), // periwinkle
    (0x76, 0x4b, 0xa2), // purple
    (0xf0, 0x93, 0xfb), // orchid
    (0xf5, 0x57, 0x6c), // coral red
    (0xfd, 0xa0, 0x85), // peach
    (0xf6, 0xd3, 0x65), // gold
    (0xa8, 0xed, 0xea), // aqua
    (0xfe, 0xd6, 0xe3), // blush
    (0xff, 0x9a, 0x9e), // salmon
    (0xfe, 0xcf, 0xef), // pink
    (0xff, 0xec, 0xd2), // cream
    (0xfc, 0xb6, 0x9f), // apricot
];

pub const SPAWN_CHANCE: f32 = 0.15;
pub const TRAIL_PERSISTENCE_FADE: f32 = 0.15;
/// How long after `stop` the leftover glow is wiped.
pub const CLEAR_DELAY: Duration = Duration::from_millis(3000);

pub fn random_color(rng: &mut fastrand::Rng) -> Rgb {
    COLORS[rng.usize(0..COLORS.len())]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EngineTask {
    ClearCanvas,
}

pub struct FireworksEngine {
    canvas: Canvas,
    rng: fastrand::Rng,
    active: bool,
    running: bool,
    rockets: Vec<Rocket>,
    particles: Vec<Particle>,
    timers: Scheduler<EngineTask>,
    frames: u64,
}

impl FireworksEngine {
    pub fn new(width: usize, height: usize, rng: fastrand::Rng) -> Self {
        Self {
            canvas: Canvas::new(width, height),
            rng,
            active: false,
            running: false,
            rockets: Vec::new(),
            particles: Vec::new(),
            timers: Scheduler::new(),
            frames: 0,
        }
    }

    pub fn with_seed(width: usize, height: usize, seed: u64) -> Self {
        Self::new(width, height, fastrand::Rng::with_seed(seed))
    }

    pub fn start(&mut self) {
        // A clear left over from an earlier stop would wipe this show.
        self.timers.cancel_all();
        self.active = true;
        if !self.running {
            tracing::debug!("fireworks loop started");
        }
        self.running = true;
    }

    pub fn stop(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        self.timers.schedule(CLEAR_DELAY, EngineTask::ClearCanvas);
        tracing::debug!(
            rockets = self.rockets.len(),
            particles = self.particles.len(),
            "fireworks stopped, draining"
        );
    }

    pub fn clear(&mut self) {
        self.active = false;
        self.running = false;
        self.rockets.clear();
        self.particles.clear();
        self.timers.cancel_all();
        self.canvas.clear();
        tracing::debug!("fireworks cleared");
    }

    /// Reallocate the canvas for a new terminal size. The old contents are
    /// lost; rockets and particles keep their positions.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.canvas = Canvas::new(width, height);
    }

    /// Advance timers by `dt` seconds, then run one frame if the loop is
    /// alive.
    pub fn update(&mut self, dt: f32) {
        self.timers.advance(dt);
        while let Some(task) = self.timers.pop_due() {
            match task {
                EngineTask::ClearCanvas => {
                    tracing::debug!("clearing fireworks canvas");
                    self.canvas.clear();
                }
            }
        }

        if self.running {
            self.tick();
        }
    }

    pub fn tick(&mut self) {
        if !self.running {
            return;
        }
        self.frames += 1;

        self.canvas.set_blend(BlendMode::DestinationOut);
        self.canvas.fill((0, 0, 0), TRAIL_PERSISTENCE_FADE);
        self.canvas.set_blend(BlendMode::Lighter);

        if self.active && self.rng.f32() < SPAWN_CHANCE {
            let rocket = Rocket::new(self.canvas.viewport(), &mut self.rng);
            tracing::trace!(x = rocket.x, target_y = rocket.target_y, "rocket launched");
            self.rockets.push(rocket);
        }

        let mut bursts = Vec::new();
        let canvas = &mut self.canvas;
        let rng = &mut self.rng;
        self.rockets.retain_mut(|rocket| {
            if let Some(burst) = rocket.advance(rng) {
                bursts.extend(burst);
            }
            rocket.draw(canvas);
            !rocket.is_done()
        });
        self.particles.extend(bursts);

        self.particles.retain_mut(|particle| {
            particle.advance();
            particle.draw(canvas);
            !particle.is_expired()
        });

        if !self.active && self.rockets.is_empty() && self.particles.is_empty() {
            self.running = false;
            // No more fade passes will run, so whatever glow is left stays
            // until a clear. If the deferred one already fired, clear now.
            if self.timers.is_empty() {
                self.canvas.clear();
            }
            tracing::debug!(frames = self.frames, "fireworks loop finished");
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn has_pending_clear(&self) -> bool {
        !self.timers.is_empty()
    }

    pub fn rockets(&self) -> &[Rocket] {
        &self.rockets
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }
}
