//! Combat simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering
//! and platform code:
//! - Caller-supplied `dt` per frame
//! - Seeded RNG lent through the frame context
//! - Removals only in the death sweep, spawns only through the pending buffer

pub mod collision;
pub mod entity;
pub mod geom;
pub mod loot;
pub mod player;
pub mod pool;
pub mod projectile;
pub mod state;
pub mod steering;
pub mod tick;

pub use collision::{EdgeMode, PairRule, fire_laser, pair_rule, resolve_collisions};
pub use entity::{Archetype, Drone, Entity, EntityId, Faction, HitOutcome, Kind, PowerUpKind, Shape};
pub use player::{Buffs, PlayerState};
pub use pool::{Particle, Pool};
pub use projectile::{Bullet, BulletProfile};
pub use state::{HudState, World};
pub use tick::{FrameContext, ScreenRect, StepParams, TickInput, step};
