//! Lifetime-based pools for short-lived objects
//!
//! Bullets and particles churn far faster than entities, so they live in
//! bounded pools keyed on an absolute expiry time. A full pool evicts its
//! oldest item.

use std::collections::VecDeque;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use crate::colors::Color;
use crate::consts::*;

/// Anything with an absolute expiry time
pub trait Expiring {
    fn expires_at(&self) -> f64;

    fn is_expired(&self, now: f64) -> bool {
        now >= self.expires_at()
    }
}

/// Bounded FIFO pool
#[derive(Debug, Clone)]
pub struct Pool<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T: Expiring> Pool<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Insert, evicting the oldest item when full
    pub fn push(&mut self, item: T) {
        if self.capacity == 0 {
            return;
        }
        if self.items.len() >= self.capacity {
            self.items.pop_front();
        }
        self.items.push_back(item);
    }

    /// Drop everything past its expiry time
    pub fn expire(&mut self, now: f64) {
        self.items.retain(|item| !item.is_expired(now));
    }

    pub fn retain(&mut self, keep: impl FnMut(&T) -> bool) {
        self.items.retain(keep);
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.items.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Cosmetic particle (never collides)
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub color: Color,
    pub expires_at: f64,
}

impl Expiring for Particle {
    fn expires_at(&self) -> f64 {
        self.expires_at
    }
}

/// Burst of debris flying outward from a death
pub fn spawn_debris(pool: &mut Pool<Particle>, rng: &mut Pcg32, pos: Vec2, color: Color, now: f64) {
    for _ in 0..DEBRIS_COUNT {
        let angle = rng.random_range(0.0..std::f32::consts::TAU);
        let speed = DEBRIS_SPEED * rng.random_range(0.3..1.0);
        let lifetime = DEBRIS_LIFETIME * rng.random_range(0.5..1.0);
        pool.push(Particle {
            pos,
            vel: Vec2::from_angle(angle) * speed,
            radius: rng.random_range(1.0..3.5),
            color,
            expires_at: now + lifetime,
        });
    }
}

/// Exhaust puff behind a thrusting ship
pub fn spawn_thrust(pool: &mut Pool<Particle>, rng: &mut Pcg32, pos: Vec2, aim: Vec2, now: f64) {
    let spread = rng.random_range(-0.35..0.35);
    let dir = Vec2::from_angle(spread).rotate(-aim);
    pool.push(Particle {
        pos,
        vel: dir * rng.random_range(80.0..160.0),
        radius: rng.random_range(2.0..4.0),
        color: Color::THRUST,
        expires_at: now + THRUST_PARTICLE_LIFETIME,
    });
}

/// Move particles, bleed off speed, drop expired ones
pub fn update_particles(pool: &mut Pool<Particle>, dt: f32, now: f64) {
    let drag = (1.0 - 3.0 * dt).max(0.0);
    for p in pool.iter_mut() {
        p.pos += p.vel * dt;
        p.vel *= drag;
    }
    pool.expire(now);
}
