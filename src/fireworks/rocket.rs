use std::collections::VecDeque;

use super::canvas::{Canvas, Viewport};
use super::particle::Particle;
use super::random_color;
use crate::Rgb;

pub const TRAIL_CAPACITY: usize = 8;
const TRAIL_FADE: f32 = 0.08;
const TRAIL_RADIUS: f32 = 2.0;
const DRAG: f32 = 0.98;
/// Drag alone never stops a rocket. On a canvas of the usual logical height
/// every target is reached first, but a rocket below this climb speed bursts
/// where it is rather than hover forever.
pub const STALL_SPEED: f32 = 0.5;

#[derive(Debug, Clone, Copy)]
pub struct TrailPoint {
    pub x: f32,
    pub y: f32,
    pub alpha: f32,
}

#[derive(Debug, Clone)]
pub struct Rocket {
    pub x: f32,
    pub y: f32,
    pub target_y: f32,
    pub vy: f32,
    pub color: Rgb,
    exploded: bool,
    trail: VecDeque<TrailPoint>,
}

impl Rocket {
    pub fn new(viewport: Viewport, rng: &mut fastrand::Rng) -> Self {
        Self {
            x: rng.f32() * viewport.width,
            y: viewport.height,
            // Somewhere in the top 10-50% of the screen
            target_y: rng.f32() * viewport.height * 0.4 + viewport.height * 0.1,
            vy: -(rng.f32() * 4.0 + 6.0),
            color: random_color(rng),
            exploded: false,
            trail: VecDeque::with_capacity(TRAIL_CAPACITY + 1),
        }
    }

    /// Step one tick. Returns the burst if the rocket exploded on this tick.
    pub fn advance(&mut self, rng: &mut fastrand::Rng) -> Option<Vec<Particle>> {
        let mut burst = None;

        if !self.exploded {
            self.trail.push_back(TrailPoint {
                x: self.x,
                y: self.y,
                alpha: 1.0,
            });
            if self.trail.len() > TRAIL_CAPACITY {
                self.trail.pop_front();
            }

            self.y += self.vy;
            self.vy *= DRAG;

            if self.y <= self.target_y || self.vy.abs() < STALL_SPEED {
                burst = Some(self.explode(rng));
            }
        }

        for point in self.trail.iter_mut() {
            point.alpha -= TRAIL_FADE;
        }
        self.trail.retain(|point| point.alpha > 0.0);

        burst
    }

    /// Detonate at the current position. Calling this on a rocket that has
    /// already exploded yields nothing.
    pub fn explode(&mut self, rng: &mut fastrand::Rng) -> Vec<Particle> {
        if self.exploded {
            return Vec::new();
        }
        self.exploded = true;

        let count = 60 + rng.usize(0..40);
        tracing::trace!(x = self.x, y = self.y, count, "rocket exploded");
        (0..count)
            .map(|_| Particle::new(self.x, self.y, self.color, rng))
            .collect()
    }

    pub fn is_exploded(&self) -> bool {
        self.exploded
    }

    pub fn is_done(&self) -> bool {
        self.exploded && self.trail.is_empty()
    }

    pub fn trail(&self) -> impl Iterator<Item = &TrailPoint> {
        self.trail.iter()
    }

    pub fn draw(&self, canvas: &mut Canvas) {
        for point in &self.trail {
            canvas.fill_circle(point.x, point.y, TRAIL_RADIUS, self.color, point.alpha.max(0.0));
        }
    }
}
