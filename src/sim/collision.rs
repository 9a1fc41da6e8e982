//! Physics integration and body collisions
//!
//! All-pairs overlap test over the live set. Pairs are filtered by faction
//! before anything physical happens; qualifying pairs are pushed apart by
//! exactly their overlap, exchange normal velocity as equal masses, and
//! damage each other when hostile.

use serde::{Deserialize, Serialize};

use super::entity::{Archetype, Entity, Faction, HitOutcome, Kind, PowerUpKind};
use super::geom::{circle_contact, elastic_exchange, reflect, segment_intersects_circle};
use crate::audio::{AudioSink, SoundCue};
use crate::consts::*;

/// Arena boundary policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EdgeMode {
    /// Reflect off the wall, losing some energy
    #[default]
    Bounce,
    /// Reappear on the opposite side of the arena
    Portal,
}

/// Integrate velocity and position, then spin
pub fn integrate(entity: &mut Entity, dt: f32) {
    entity.vel += entity.acc * dt;
    let max_speed = entity.stats().max_speed;
    entity.vel = entity.vel.clamp_length_max(max_speed);
    entity.pos += entity.vel * dt;
    entity.spin(dt);
}

/// Keep an entity inside the arena circle
pub fn apply_boundary(entity: &mut Entity, arena_radius: f32, mode: EdgeMode) {
    let dist = entity.pos.length();
    if dist <= arena_radius {
        return;
    }
    let normal = entity.pos / dist;
    match mode {
        EdgeMode::Bounce => {
            entity.pos = normal * arena_radius;
            if entity.vel.dot(normal) > 0.0 {
                entity.vel = reflect(entity.vel, normal) * RESTITUTION;
            }
        }
        EdgeMode::Portal => {
            entity.pos = normal * -arena_radius;
        }
    }
}

/// How a pair of entities interacts on contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairRule {
    Ignore,
    /// Physical bounce; `damage` when the factions are hostile
    Bounce { damage: bool },
    /// The first entity of the pair is a power-up collected by the second
    CollectFirst,
    CollectSecond,
}

/// Faction filter for a pair
pub fn pair_rule(a: &Entity, b: &Entity) -> PairRule {
    if a.is_dead() || b.is_dead() {
        return PairRule::Ignore;
    }

    let (fa, fb) = (a.faction(), b.faction());
    match (a.archetype(), b.archetype()) {
        (Archetype::PowerUp, Archetype::PowerUp) => return PairRule::Ignore,
        (Archetype::PowerUp, _) => {
            return if fb == Faction::Player {
                PairRule::CollectFirst
            } else {
                PairRule::Ignore
            };
        }
        (_, Archetype::PowerUp) => {
            return if fa == Faction::Player {
                PairRule::CollectSecond
            } else {
                PairRule::Ignore
            };
        }
        _ => {}
    }

    if a.is_phasing() || b.is_phasing() {
        return PairRule::Ignore;
    }
    if fa == Faction::Player && fb == Faction::Player {
        return PairRule::Ignore;
    }
    let enemy_drone_pair = fa == Faction::Enemy
        && fb == Faction::Enemy
        && (a.archetype() == Archetype::EnemyDrone || b.archetype() == Archetype::EnemyDrone);
    if enemy_drone_pair {
        return PairRule::Ignore;
    }

    PairRule::Bounce {
        damage: fa.hostile_to(fb),
    }
}

fn mark_collected(power_up: &mut Entity) -> Option<PowerUpKind> {
    let Kind::PowerUp(kind) = power_up.kind else {
        return None;
    };
    power_up.health = 0;
    power_up.silent = true;
    Some(kind)
}

fn report_hit(outcome: HitOutcome, entity: &Entity, audio: &mut dyn AudioSink) {
    if outcome == HitOutcome::Absorbed && !entity.silent {
        audio.play(SoundCue::ShieldHit);
    }
}

/// Resolve one overlapping pair in place
fn resolve_pair(a: &mut Entity, b: &mut Entity, now: f64, audio: &mut dyn AudioSink) -> Option<PowerUpKind> {
    let rule = pair_rule(a, b);
    if rule == PairRule::Ignore {
        return None;
    }
    let contact = circle_contact(a.pos, a.radius, b.pos, b.radius)?;

    let damage = match rule {
        PairRule::Ignore => return None,
        PairRule::CollectFirst => return mark_collected(a),
        PairRule::CollectSecond => return mark_collected(b),
        PairRule::Bounce { damage } => damage,
    };

    if damage {
        let hit_a = a.take_bounce_hit(now);
        let hit_b = b.take_bounce_hit(now);
        report_hit(hit_a, a, audio);
        report_hit(hit_b, b, audio);
        log::trace!(
            "{:?} {:?} <-> {:?} {:?}: {:?}/{:?}",
            a.archetype(),
            a.id,
            b.archetype(),
            b.id,
            hit_a,
            hit_b
        );
    }

    let correction = contact.normal * (contact.penetration * 0.5);
    a.pos -= correction;
    b.pos += correction;

    let (va, vb) = elastic_exchange(a.vel, b.vel, contact.normal);
    a.vel = va;
    b.vel = vb;
    None
}

/// All-pairs collision pass
///
/// Returns power-ups collected by contact, for the world to apply.
pub fn resolve_collisions(entities: &mut [Entity], now: f64, audio: &mut dyn AudioSink) -> Vec<PowerUpKind> {
    let mut collected = Vec::new();
    for j in 1..entities.len() {
        let (left, right) = entities.split_at_mut(j);
        let b = &mut right[0];
        for a in left.iter_mut() {
            if let Some(kind) = resolve_pair(a, b, now, audio) {
                collected.push(kind);
            }
        }
    }
    collected
}

/// Continuous beam from the player along the aim
///
/// Strips shields from every enemy it touches and deals laser damage once per
/// invulnerability window. Returns how many entities the beam touched.
pub fn fire_laser(entities: &mut [Entity], player_index: usize, arena_radius: f32, now: f64) -> usize {
    let Some(player) = entities.get(player_index) else {
        return 0;
    };
    let Some(state) = player.player_state() else {
        return 0;
    };
    // Health can hit zero earlier in the frame, before the sweep marks the player dead
    if player.is_dead() || !state.laser_active() {
        return 0;
    }
    let start = player.pos;
    let end = start + state.aim * (2.0 * arena_radius);

    let mut touched = 0;
    for e in entities.iter_mut() {
        if e.faction() != Faction::Enemy || e.is_dead() {
            continue;
        }
        if !segment_intersects_circle(start, end, e.pos, e.radius) {
            continue;
        }
        touched += 1;
        e.shield = 0;
        if !e.is_invulnerable(now) {
            e.health -= LASER_DAMAGE;
            e.last_hit = Some(now);
            e.shield_bypass = true;
        }
    }
    touched
}
