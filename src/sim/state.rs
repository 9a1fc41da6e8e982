//! World state
//!
//! The world owns the live entity set, the bullet and particle pools and the
//! player handle. Entities created during a step go into a pending buffer
//! and join the live set once the death sweep is done, so index-based passes
//! never see the set change underneath them.

use glam::Vec2;

use super::entity::{Archetype, Entity, EntityId, Kind, PowerUpKind};
use super::pool::{Particle, Pool};
use super::projectile::Bullet;
use crate::consts::*;

/// Maximum live bullets
pub const MAX_BULLETS: usize = 512;

/// Scalar state for the HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HudState {
    pub score: u64,
    pub health: i32,
    pub max_health: i32,
    pub shield: u32,
    pub dead: bool,
    pub drones: usize,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct World {
    /// Live entities (unordered)
    pub entities: Vec<Entity>,
    pub bullets: Pool<Bullet>,
    pub particles: Pool<Particle>,
    /// The player is always present in `entities`
    pub player: EntityId,
    /// Simulation clock (seconds)
    pub time: f64,
    pub score: u64,
    pending: Vec<Entity>,
    next_id: u32,
}

impl World {
    /// Create a world with the player at the arena centre
    pub fn new(max_particles: usize) -> Self {
        let mut world = Self {
            entities: Vec::new(),
            bullets: Pool::with_capacity(MAX_BULLETS),
            particles: Pool::with_capacity(max_particles),
            player: EntityId(0),
            time: 0.0,
            score: 0,
            pending: Vec::new(),
            next_id: 1,
        };
        world.player = world.spawn(Entity::player(Vec2::ZERO));
        world
    }

    /// Allocate a new entity ID
    fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Insert an entity between frames
    pub fn spawn(&mut self, mut entity: Entity) -> EntityId {
        let id = self.next_entity_id();
        entity.id = id;
        self.entities.push(entity);
        id
    }

    /// Insert an entity from inside a step; it joins the live set on flush
    pub fn queue_spawn(&mut self, mut entity: Entity) -> EntityId {
        let id = self.next_entity_id();
        entity.id = id;
        self.pending.push(entity);
        id
    }

    /// Merge pending spawns into the live set
    pub fn flush_pending(&mut self) {
        self.entities.append(&mut self.pending);
    }

    pub fn index_of(&self, id: EntityId) -> Option<usize> {
        self.entities.iter().position(|e| e.id == id)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    pub fn player(&self) -> Option<&Entity> {
        self.get(self.player)
    }

    pub fn player_mut(&mut self) -> Option<&mut Entity> {
        let id = self.player;
        self.get_mut(id)
    }

    /// Live player drones
    pub fn player_drones(&self) -> impl Iterator<Item = &Entity> {
        self.entities
            .iter()
            .filter(|e| e.archetype() == Archetype::PlayerDrone && !e.is_dead())
    }

    /// Apply a collected power-up to the player
    pub fn apply_power_up(&mut self, kind: PowerUpKind) {
        let player_id = self.player;
        let Some(player) = self.player_mut() else {
            return;
        };
        if player.is_dead() {
            return;
        }
        log::info!("Power-up collected: {kind:?}");

        if let Some(state) = player.player_state_mut()
            && state.buffs.grant(kind)
        {
            return;
        }

        match kind {
            PowerUpKind::Health => {
                player.max_health += 1;
                player.health += 1;
            }
            PowerUpKind::Shield => player.shield = MAX_SHIELD,
            PowerUpKind::Drone => {
                let pos = player.pos;
                self.grant_drone(player_id, pos);
            }
            PowerUpKind::DroneShield | PowerUpKind::DroneGun => {
                for e in self.entities.iter_mut() {
                    if e.archetype() != Archetype::PlayerDrone || e.is_dead() {
                        continue;
                    }
                    if kind == PowerUpKind::DroneShield {
                        e.shield = MAX_SHIELD;
                    } else if let Some(drone) = e.drone_mut() {
                        drone.armed = true;
                    }
                }
            }
            // Timed and per-shot kinds were handled by the buff grant
            _ => {}
        }
    }

    /// Spawn a player drone, silently retiring the oldest past the cap
    fn grant_drone(&mut self, owner: EntityId, pos: Vec2) {
        let live = self.player_drones().count() + self.pending_drones();
        if live >= MAX_PLAYER_DRONES
            && let Some(oldest) = self
                .entities
                .iter_mut()
                .filter(|e| e.archetype() == Archetype::PlayerDrone && !e.is_dead())
                .min_by_key(|e| e.id)
        {
            oldest.silent = true;
            oldest.health = 0;
            log::debug!("Drone cap reached; retiring {:?}", oldest.id);
        }
        let offset = crate::polar_to_cartesian(30.0, 60.0 * live as f32);
        let id = self.queue_spawn(Entity::player_drone(pos + offset, owner));
        log::info!("Drone {id:?} joined the player");
    }

    fn pending_drones(&self) -> usize {
        self.pending
            .iter()
            .filter(|e| matches!(e.kind, Kind::PlayerDrone(_)))
            .count()
    }

    /// Snapshot for the HUD
    pub fn hud(&self) -> HudState {
        let (health, max_health, shield, dead) = self
            .player()
            .map(|p| (p.health.max(0), p.max_health, p.shield, p.is_dead()))
            .unwrap_or((0, 0, 0, true));
        HudState {
            score: self.score,
            health,
            max_health,
            shield,
            dead,
            drones: self.player_drones().count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::player::DAMAGE_SHOTS;

    #[test]
    fn test_new_world_has_player() {
        let world = World::new(100);
        let player = world.player().expect("player exists");
        assert_eq!(player.archetype(), Archetype::Player);
        assert_eq!(world.entities.len(), 1);
        assert_eq!(world.particles.capacity(), 100);
    }

    #[test]
    fn test_ids_are_unique() {
        let mut world = World::new(0);
        let a = world.spawn(Entity::asteroid(Vec2::ZERO, Vec2::ZERO));
        let b = world.queue_spawn(Entity::asteroid(Vec2::ZERO, Vec2::ZERO));
        assert_ne!(a, b);
        assert_ne!(a, world.player);
        assert!(world.get(b).is_none());
        world.flush_pending();
        assert!(world.get(b).is_some());
    }

    #[test]
    fn test_drone_power_up_adds_one_drone() {
        let mut world = World::new(0);
        world.apply_power_up(PowerUpKind::Drone);
        world.flush_pending();
        assert_eq!(world.player_drones().count(), 1);
        let buffs = &world.player().unwrap().player_state().unwrap().buffs;
        assert_eq!(*buffs, Default::default());
    }

    #[test]
    fn test_drone_cap_retires_oldest() {
        let mut world = World::new(0);
        for _ in 0..MAX_PLAYER_DRONES {
            world.apply_power_up(PowerUpKind::Drone);
        }
        world.flush_pending();
        let oldest = world.player_drones().map(|e| e.id).min().unwrap();
        world.apply_power_up(PowerUpKind::Drone);
        world.flush_pending();
        let retired = world.get(oldest).unwrap();
        assert!(retired.is_dead() && retired.silent);
        assert_eq!(world.player_drones().count(), MAX_PLAYER_DRONES);
    }

    #[test]
    fn test_health_and_shield_power_ups() {
        let mut world = World::new(0);
        let before = world.player().unwrap().max_health;
        world.apply_power_up(PowerUpKind::Health);
        world.apply_power_up(PowerUpKind::Shield);
        let player = world.player().unwrap();
        assert_eq!(player.max_health, before + 1);
        assert_eq!(player.health, before + 1);
        assert_eq!(player.shield, MAX_SHIELD);
    }

    #[test]
    fn test_drone_flags_apply_to_live_drones() {
        let mut world = World::new(0);
        world.apply_power_up(PowerUpKind::Drone);
        world.apply_power_up(PowerUpKind::Drone);
        world.flush_pending();
        world.apply_power_up(PowerUpKind::DroneShield);
        world.apply_power_up(PowerUpKind::DroneGun);
        for drone in world.player_drones() {
            assert_eq!(drone.shield, MAX_SHIELD);
            assert!(drone.drone().unwrap().armed);
        }
    }

    #[test]
    fn test_timed_power_up_goes_to_buffs() {
        let mut world = World::new(0);
        world.apply_power_up(PowerUpKind::Damage);
        let buffs = &world.player().unwrap().player_state().unwrap().buffs;
        assert_eq!(buffs.bullet_damage, DAMAGE_SHOTS);
    }

    #[test]
    fn test_dead_player_ignores_power_ups() {
        let mut world = World::new(0);
        world.player_mut().unwrap().player_state_mut().unwrap().dead = true;
        world.apply_power_up(PowerUpKind::Shield);
        assert_eq!(world.player().unwrap().shield, 0);
    }

    #[test]
    fn test_hud_snapshot() {
        let mut world = World::new(0);
        world.score = 42;
        let hud = world.hud();
        assert_eq!(hud.score, 42);
        assert!(!hud.dead);
        assert_eq!(hud.health, Archetype::Player.stats().max_health);
    }
}
