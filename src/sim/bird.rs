use crate::{constants::game, sim::Aabb};

#[derive(Debug, Clone)]
pub struct Bird {
    pub x: f32,
    pub y: f32,
    pub vy: f32,
    pub radius: f32,
    /// Seconds alive this round, drives skin animation.
    pub time: f32,
    pub alive: bool,
}

impl Bird {
    pub fn new(x: f32, y: f32) -> Self {
        Bird { x, y, vy: 0.0, radius: game::BIRD_RADIUS, time: 0.0, alive: true }
    }

    /// Resets vertical velocity to the fixed upward impulse, whatever
    /// the bird was doing before.
    pub fn flap(&mut self) {
        self.vy = game::FLAP_VELOCITY;
    }

    /// Frame-stepped integration: gravity and displacement are applied
    /// per tick, `dt` only advances the animation clock.
    pub fn update(&mut self, dt: f32) {
        self.time += dt;
        self.vy += game::GRAVITY;
        self.y += self.vy;
    }

    /// Collision shape: bounding square centered on the position with
    /// side `2 * radius`.
    pub fn aabb(&self) -> Aabb {
        Aabb {
            left: self.x - self.radius,
            top: self.y - self.radius,
            right: self.x + self.radius,
            bottom: self.y + self.radius,
        }
    }
}
