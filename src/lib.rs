//! Hyper Hexagon - combat simulation core for a circular arena shooter
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (steering, physics, collisions, projectiles, buffs)
//! - `audio`: Sound cue seam consumed by the host audio backend
//! - `settings`: JSON-backed runtime configuration
//! - `colors`: Shared palette
//! - `error`: Configuration errors

pub mod audio;
pub mod colors;
pub mod error;
pub mod settings;
pub mod sim;

pub use error::ConfigError;
pub use settings::{QualityPreset, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep used by the headless runner (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Default arena radius
    pub const ARENA_RADIUS: f32 = 600.0;
    /// Velocity kept after bouncing off the arena edge
    pub const RESTITUTION: f32 = 0.8;

    /// Seconds between two damage instances on the same entity
    pub const INVULNERABILITY_SECS: f64 = 0.5;
    /// Damage flash duration after a hit
    pub const FLASH_SECS: f64 = 0.15;
    /// Health lost per body collision
    pub const BOUNCE_DAMAGE: i32 = 1;
    /// Health lost per laser tick
    pub const LASER_DAMAGE: i32 = 1;
    pub const MAX_SHIELD: u32 = 3;

    /// Debris particles per death burst
    pub const DEBRIS_COUNT: usize = 40;
    pub const DEBRIS_SPEED: f32 = 220.0;
    pub const DEBRIS_LIFETIME: f64 = 0.6;
    pub const THRUST_PARTICLE_LIFETIME: f64 = 0.25;

    /// Bullet defaults
    pub const BULLET_RADIUS: f32 = 4.0;
    pub const BULLET_SPEED: f32 = 700.0;
    pub const BULLET_DAMAGE: i32 = 1;
    pub const BULLET_LIFETIME: f64 = 1.5;

    /// Player firing
    pub const FIRE_COOLDOWN: f64 = 0.25;
    pub const RAPID_FIRE_COOLDOWN: f64 = 0.08;
    pub const BIG_THRUST_FACTOR: f32 = 2.0;

    /// Steering thresholds
    pub const RUNNER_FLEE_DISTANCE: f32 = 180.0;
    pub const GUNNER_FLEE_DISTANCE: f32 = 120.0;
    pub const GUNNER_RANGE: f32 = 320.0;
    pub const GUNNER_FIRE_INTERVAL: f64 = 1.2;
    pub const DRONE_RANGE: f32 = 300.0;
    pub const DRONE_FIRE_INTERVAL: f64 = 0.6;
    pub const POWER_UP_SUCTION_RANGE: f32 = 160.0;

    /// Drones beyond this count push out the oldest one
    pub const MAX_PLAYER_DRONES: usize = 6;
}

/// Wrap an angle in degrees to [0, 360)
#[inline]
pub fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Convert polar (r, degrees) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, degrees: f32) -> Vec2 {
    let theta = degrees.to_radians();
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert cartesian (x, y) to polar (r, degrees in [0, 360))
#[inline]
pub fn cartesian_to_polar(pos: Vec2) -> (f32, f32) {
    (pos.length(), wrap_degrees(pos.y.atan2(pos.x).to_degrees()))
}
