use std::f32::consts::TAU;

use super::canvas::Canvas;
use crate::Rgb;

pub const GRAVITY: f32 = 0.05;
const SHRINK: f32 = 0.98;

#[derive(Debug, Clone)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub color: Rgb,
    pub alpha: f32,
    pub decay: f32,
    pub size: f32,
}

impl Particle {
    pub fn new(x: f32, y: f32, color: Rgb, rng: &mut fastrand::Rng) -> Self {
        let angle = rng.f32() * TAU;
        let speed = rng.f32() * 5.0 + 2.0; // 2 to 7
        Self {
            x,
            y,
            vx: angle.cos() * speed,
            vy: angle.sin() * speed,
            color,
            alpha: 1.0,
            decay: rng.f32() * 0.02 + 0.015,
            size: rng.f32() * 3.0 + 1.0,
        }
    }

    pub fn advance(&mut self) {
        self.x += self.vx;
        self.y += self.vy;
        self.vy += GRAVITY;
        self.alpha -= self.decay;
        self.size *= SHRINK;
    }

    pub fn is_expired(&self) -> bool {
        self.alpha <= 0.0
    }

    pub fn draw(&self, canvas: &mut Canvas) {
        canvas.fill_circle(self.x, self.y, self.size, self.color, self.alpha.max(0.0));
    }
}
