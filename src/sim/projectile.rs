//! Bullets
//!
//! Bullets live in their own pool, integrate independently and test against
//! every live entity each frame (O(bullets × entities)).

use glam::Vec2;

use super::entity::{Entity, EntityId, Faction, Kind, PowerUpKind};
use super::pool::{Expiring, Pool};
use crate::audio::{AudioSink, SoundCue};
use crate::colors::Color;
use crate::consts::BULLET_LIFETIME;

/// Visual and damage parameters captured when a bullet is fired
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BulletProfile {
    pub radius: f32,
    pub damage: i32,
    pub speed: f32,
    pub color: Color,
}

/// Gunner shots
pub const ENEMY_BULLET: BulletProfile = BulletProfile {
    radius: 5.0,
    damage: 1,
    speed: 420.0,
    color: Color::GREEN,
};

/// Armed drone shots
pub const DRONE_BULLET: BulletProfile = BulletProfile {
    radius: 3.0,
    damage: 1,
    speed: 600.0,
    color: Color::BLUE,
};

#[derive(Debug, Clone)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    pub owner: EntityId,
    /// Owner faction at fire time (the owner may die before the bullet lands)
    pub faction: Faction,
    pub radius: f32,
    pub damage: i32,
    pub color: Color,
    pub expires_at: f64,
}

impl Expiring for Bullet {
    fn expires_at(&self) -> f64 {
        self.expires_at
    }
}

impl Bullet {
    /// Spawn a bullet at the shooter's rim heading along `dir`
    pub fn fire(
        owner: EntityId,
        faction: Faction,
        origin: Vec2,
        owner_radius: f32,
        dir: Vec2,
        profile: BulletProfile,
        now: f64,
    ) -> Self {
        let dir = dir.normalize_or_zero();
        Self {
            pos: origin + dir * (owner_radius + profile.radius),
            vel: dir * profile.speed,
            owner,
            faction,
            radius: profile.radius,
            damage: profile.damage,
            color: profile.color,
            expires_at: now + BULLET_LIFETIME,
        }
    }

    /// Whether this bullet may strike `target`
    fn can_hit(&self, target: &Entity) -> bool {
        if target.id == self.owner || !target.is_tangible() {
            return false;
        }
        match target.faction() {
            Faction::Neutral => self.faction == Faction::Player,
            other => other != self.faction,
        }
    }
}

/// What the bullet pass produced
#[derive(Debug, Default)]
pub struct BulletOutcome {
    pub score: u64,
    /// Power-ups shot by the player, to be applied by the world
    pub collected: Vec<PowerUpKind>,
}

/// Advance bullets, resolve hits and award score
pub fn update_bullets(
    bullets: &mut Pool<Bullet>,
    entities: &mut [Entity],
    arena_radius: f32,
    dt: f32,
    now: f64,
    audio: &mut dyn AudioSink,
) -> BulletOutcome {
    let mut outcome = BulletOutcome::default();
    let arena_sq = arena_radius * arena_radius;

    bullets.retain(|b| !b.is_expired(now));
    for bullet in bullets.iter_mut() {
        bullet.pos += bullet.vel * dt;
        if bullet.pos.length_squared() > arena_sq {
            bullet.expires_at = now;
        }
    }

    for bullet in bullets.iter_mut() {
        if bullet.is_expired(now) {
            continue;
        }
        let Some(target) = entities.iter_mut().find(|e| {
            bullet.can_hit(e) && e.pos.distance(bullet.pos) < e.radius + bullet.radius
        }) else {
            continue;
        };

        bullet.expires_at = now;

        if let Kind::PowerUp(kind) = target.kind {
            target.health = 0;
            target.silent = true;
            outcome.collected.push(kind);
            continue;
        }

        let was_alive = !target.is_dead();
        target.take_direct_hit(bullet.damage, now);
        if !target.silent && !target.is_drone() {
            audio.play(SoundCue::Hit);
        }
        if was_alive && target.is_dead() && bullet.faction == Faction::Player {
            let points = target.kill_score();
            log::debug!(
                "{:?} {:?} destroyed by {:?} for {} points",
                target.archetype(),
                target.id,
                bullet.owner,
                points
            );
            outcome.score += points;
        }
    }

    bullets.retain(|b| !b.is_expired(now));
    outcome
}
