//! AI steering
//!
//! Each archetype maps to a desired acceleration of fixed magnitude. The
//! decision is computed from a read-only view of the live set and applied
//! afterwards, so no entity sees another's half-updated state.

use glam::Vec2;

use super::entity::{Entity, EntityId, Faction, Kind};
use super::geom::heading_degrees;
use super::projectile::{Bullet, BulletProfile, DRONE_BULLET, ENEMY_BULLET};
use crate::consts::*;

/// What one entity wants to do this frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Steering {
    pub accel: Vec2,
    /// Replacement for a stale target or owner
    pub retarget: Option<EntityId>,
    /// Unit direction of a shot to fire now
    pub fire: Option<Vec2>,
}

/// Look up a live entity by id
pub fn find_live(entities: &[Entity], id: EntityId) -> Option<&Entity> {
    entities.iter().find(|e| e.id == id && !e.is_dead())
}

fn find_any(entities: &[Entity], id: EntityId) -> Option<&Entity> {
    entities.iter().find(|e| e.id == id)
}

/// Unit vector from `from` to `to` scaled by `thrust`
fn seek(from: Vec2, to: Vec2, thrust: f32) -> Vec2 {
    (to - from).normalize_or_zero() * thrust
}

/// Approach until inside `flee_distance`, then run directly away
fn hit_and_run(from: Vec2, to: Vec2, thrust: f32, flee_distance: f32) -> Vec2 {
    if from.distance_squared(to) >= flee_distance * flee_distance {
        seek(from, to, thrust)
    } else {
        seek(to, from, thrust)
    }
}

fn cooled_down(last_fire: Option<f64>, now: f64, interval: f64) -> bool {
    last_fire.is_none_or(|t| now - t >= interval)
}

/// Resolve a pursuit target, falling back to the player when it is gone
fn pursue<'a>(
    entities: &'a [Entity],
    target: EntityId,
    player: EntityId,
) -> (Option<&'a Entity>, Option<EntityId>) {
    match find_live(entities, target) {
        Some(t) => (Some(t), None),
        None => {
            let retarget = (target != player).then_some(player);
            (find_any(entities, player), retarget)
        }
    }
}

/// Nearest live hostile within `range`
fn nearest_hostile(entities: &[Entity], me: &Entity, range: f32) -> Option<Vec2> {
    let faction = me.faction();
    entities
        .iter()
        .filter(|e| e.faction().hostile_to(faction) && e.is_tangible())
        .map(|e| e.pos)
        .filter(|p| p.distance_squared(me.pos) < range * range)
        .min_by(|a, b| {
            a.distance_squared(me.pos)
                .partial_cmp(&b.distance_squared(me.pos))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}

/// Decide the acceleration (and optional shot) for one entity
pub fn desired(entity: &Entity, entities: &[Entity], player: EntityId, now: f64) -> Steering {
    let thrust = entity.stats().thrust;
    let mut out = Steering::default();

    match &entity.kind {
        Kind::Player(state) => {
            out.accel = state.thrust(thrust);
        }
        Kind::Asteroid => {}
        Kind::Orbiter { anchor } => {
            out.accel = seek(entity.pos, *anchor, thrust);
        }
        Kind::Chaser { target } => {
            let (target, retarget) = pursue(entities, *target, player);
            out.retarget = retarget;
            if let Some(t) = target {
                out.accel = seek(entity.pos, t.pos, thrust);
            }
        }
        Kind::Runner { target } => {
            let (target, retarget) = pursue(entities, *target, player);
            out.retarget = retarget;
            if let Some(t) = target {
                out.accel = hit_and_run(entity.pos, t.pos, thrust, RUNNER_FLEE_DISTANCE);
            }
        }
        Kind::Gunner { target, last_fire } => {
            let (target, retarget) = pursue(entities, *target, player);
            out.retarget = retarget;
            if let Some(t) = target {
                out.accel = hit_and_run(entity.pos, t.pos, thrust, GUNNER_FLEE_DISTANCE);
                let in_range = entity.pos.distance_squared(t.pos) < GUNNER_RANGE * GUNNER_RANGE;
                if in_range && t.is_tangible() && cooled_down(*last_fire, now, GUNNER_FIRE_INTERVAL) {
                    out.fire = Some((t.pos - entity.pos).normalize_or_zero());
                }
            }
        }
        Kind::PlayerDrone(drone) | Kind::EnemyDrone(drone) => {
            let owner = match find_live(entities, drone.owner) {
                Some(o) => Some(o),
                // Enemy drones are adopted by the player, player drones stay put
                None if entity.faction() == Faction::Enemy && drone.owner != player => {
                    out.retarget = Some(player);
                    find_any(entities, player)
                }
                None => find_any(entities, drone.owner),
            };
            if let Some(o) = owner {
                out.accel = seek(entity.pos, o.pos, thrust);
            }
            if drone.armed && cooled_down(drone.last_fire, now, DRONE_FIRE_INTERVAL) {
                out.fire = nearest_hostile(entities, entity, DRONE_RANGE)
                    .map(|p| (p - entity.pos).normalize_or_zero());
            }
        }
        Kind::PowerUp(_) => {
            if let Some(p) = find_live(entities, player) {
                let reach = POWER_UP_SUCTION_RANGE;
                if p.pos.distance_squared(entity.pos) < reach * reach {
                    out.accel = seek(entity.pos, p.pos, thrust);
                }
            }
        }
    }

    out
}

/// Apply a steering decision; returns a bullet when the entity fired
pub fn apply(entity: &mut Entity, steering: Steering, now: f64) -> Option<Bullet> {
    entity.acc = steering.accel;

    if let Some(new_target) = steering.retarget {
        match &mut entity.kind {
            Kind::Chaser { target } | Kind::Runner { target } | Kind::Gunner { target, .. } => {
                *target = new_target;
            }
            Kind::EnemyDrone(drone) => {
                log::debug!("{:?} lost its owner; now escorting {:?}", entity.id, new_target);
                drone.owner = new_target;
            }
            _ => {}
        }
    }

    // Pursuers face where they are heading; spinners and the player manage their own angle
    if matches!(
        entity.kind,
        Kind::Chaser { .. } | Kind::Runner { .. } | Kind::Gunner { .. }
    ) && steering.accel != Vec2::ZERO
    {
        entity.angle = heading_degrees(steering.accel);
    }

    let dir = steering.fire?;
    if dir == Vec2::ZERO {
        return None;
    }
    let profile: BulletProfile = match &mut entity.kind {
        Kind::Gunner { last_fire, .. } => {
            *last_fire = Some(now);
            ENEMY_BULLET
        }
        Kind::PlayerDrone(drone) | Kind::EnemyDrone(drone) => {
            drone.last_fire = Some(now);
            DRONE_BULLET
        }
        _ => return None,
    };
    Some(Bullet::fire(
        entity.id,
        entity.faction(),
        entity.pos,
        entity.radius,
        dir,
        profile,
        now,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAYER: EntityId = EntityId(1);

    fn with_id(mut e: Entity, id: u32) -> Entity {
        e.id = EntityId(id);
        e
    }

    fn player_at(pos: Vec2) -> Entity {
        with_id(Entity::player(pos), 1)
    }

    #[test]
    fn test_chaser_seeks_target() {
        let entities = vec![
            player_at(Vec2::new(100.0, 0.0)),
            with_id(Entity::chaser(Vec2::ZERO, PLAYER), 2),
        ];
        let s = desired(&entities[1], &entities, PLAYER, 0.0);
        let thrust = entities[1].stats().thrust;
        assert!((s.accel - Vec2::new(thrust, 0.0)).length() < 1e-3);
        assert_eq!(s.retarget, None);
    }

    #[test]
    fn test_runner_flees_inside_threshold() {
        let near = vec![
            player_at(Vec2::new(RUNNER_FLEE_DISTANCE - 1.0, 0.0)),
            with_id(Entity::runner(Vec2::ZERO, PLAYER), 2),
        ];
        assert!(desired(&near[1], &near, PLAYER, 0.0).accel.x < 0.0);

        let far = vec![
            player_at(Vec2::new(RUNNER_FLEE_DISTANCE, 0.0)),
            with_id(Entity::runner(Vec2::ZERO, PLAYER), 2),
        ];
        assert!(desired(&far[1], &far, PLAYER, 0.0).accel.x > 0.0);
    }

    #[test]
    fn test_gunner_fires_along_separation() {
        let entities = vec![
            player_at(Vec2::new(0.0, 200.0)),
            with_id(Entity::gunner(Vec2::ZERO, PLAYER), 2),
        ];
        let s = desired(&entities[1], &entities, PLAYER, 5.0);
        assert_eq!(s.fire, Some(Vec2::Y));
        assert!(s.accel.y > 0.0);

        let mut gunner = entities[1].clone();
        let bullet = apply(&mut gunner, s, 5.0).expect("gunner fires");
        assert_eq!(bullet.faction, Faction::Enemy);
        assert!(bullet.vel.y > 0.0);

        // Cadence blocks an immediate second shot
        let again = desired(&gunner, &entities, PLAYER, 5.1);
        assert_eq!(again.fire, None);
    }

    #[test]
    fn test_gunner_holds_fire_out_of_range() {
        let entities = vec![
            player_at(Vec2::new(GUNNER_RANGE + 10.0, 0.0)),
            with_id(Entity::gunner(Vec2::ZERO, PLAYER), 2),
        ];
        assert_eq!(desired(&entities[1], &entities, PLAYER, 0.0).fire, None);
    }

    #[test]
    fn test_orbiter_seeks_anchor() {
        let e = with_id(Entity::orbiter(Vec2::ZERO, Vec2::new(0.0, -50.0)), 2);
        let s = desired(&e, std::slice::from_ref(&e), PLAYER, 0.0);
        assert!(s.accel.y < 0.0);
    }

    #[test]
    fn test_dead_target_retargets_player() {
        let mut victim = with_id(Entity::asteroid(Vec2::new(-100.0, 0.0), Vec2::ZERO), 3);
        victim.health = 0;
        let entities = vec![
            player_at(Vec2::new(100.0, 0.0)),
            victim,
            with_id(Entity::chaser(Vec2::ZERO, EntityId(3)), 2),
        ];
        let s = desired(&entities[2], &entities, PLAYER, 0.0);
        assert_eq!(s.retarget, Some(PLAYER));
        assert!(s.accel.x > 0.0);

        let mut chaser = entities[2].clone();
        apply(&mut chaser, s, 0.0);
        assert!(matches!(chaser.kind, Kind::Chaser { target } if target == PLAYER));
    }

    #[test]
    fn test_missing_target_retargets_player() {
        let entities = vec![
            player_at(Vec2::new(0.0, 50.0)),
            with_id(Entity::runner(Vec2::ZERO, EntityId(42)), 2),
        ];
        let s = desired(&entities[1], &entities, PLAYER, 0.0);
        assert_eq!(s.retarget, Some(PLAYER));
    }

    #[test]
    fn test_orphan_enemy_drone_adopted_by_player() {
        let entities = vec![
            player_at(Vec2::new(50.0, 0.0)),
            with_id(Entity::enemy_drone(Vec2::ZERO, EntityId(9)), 2),
        ];
        let s = desired(&entities[1], &entities, PLAYER, 0.0);
        assert_eq!(s.retarget, Some(PLAYER));
        let mut drone = entities[1].clone();
        apply(&mut drone, s, 0.0);
        assert_eq!(drone.drone().map(|d| d.owner), Some(PLAYER));
        assert!(drone.acc.x > 0.0);
    }

    #[test]
    fn test_armed_drone_targets_nearest_hostile() {
        let mut drone = with_id(Entity::player_drone(Vec2::ZERO, PLAYER), 2);
        if let Some(d) = drone.drone_mut() {
            d.armed = true;
        }
        let entities = vec![
            player_at(Vec2::new(10.0, 0.0)),
            drone.clone(),
            with_id(Entity::chaser(Vec2::new(0.0, -80.0), PLAYER), 3),
            with_id(Entity::chaser(Vec2::new(0.0, 200.0), PLAYER), 4),
        ];
        let s = desired(&entities[1], &entities, PLAYER, 0.0);
        assert_eq!(s.fire, Some(Vec2::NEG_Y));
        let bullet = apply(&mut drone, s, 0.0).expect("drone fires");
        assert_eq!(bullet.faction, Faction::Player);
    }

    #[test]
    fn test_power_up_suction() {
        let near = vec![
            player_at(Vec2::new(POWER_UP_SUCTION_RANGE - 1.0, 0.0)),
            with_id(Entity::power_up(Vec2::ZERO, crate::sim::PowerUpKind::Damage), 2),
        ];
        assert!(desired(&near[1], &near, PLAYER, 0.0).accel.x > 0.0);

        let far = vec![
            player_at(Vec2::new(POWER_UP_SUCTION_RANGE + 1.0, 0.0)),
            with_id(Entity::power_up(Vec2::ZERO, crate::sim::PowerUpKind::Damage), 2),
        ];
        assert_eq!(desired(&far[1], &far, PLAYER, 0.0).accel, Vec2::ZERO);
    }
}
