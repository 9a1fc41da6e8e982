//! Entity model
//!
//! Every simulated actor is an [`Entity`]: shared kinematics and combat state
//! plus a closed [`Kind`] variant carrying archetype-specific data. Cross
//! references between entities (drone owner, pursuit target) are plain
//! [`EntityId`]s looked up in the live set on every use.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::player::PlayerState;
use crate::colors::Color;
use crate::consts::*;
use crate::wrap_degrees;

/// Stable entity handle (never reused within a world)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Collision/damage grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Faction {
    Player,
    Enemy,
    /// Power-ups belong to nobody
    Neutral,
}

impl Faction {
    /// Whether members of the two factions damage each other
    pub fn hostile_to(self, other: Faction) -> bool {
        matches!(
            (self, other),
            (Faction::Player, Faction::Enemy) | (Faction::Enemy, Faction::Player)
        )
    }
}

/// Archetype tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Archetype {
    Player,
    PlayerDrone,
    EnemyDrone,
    Asteroid,
    Orbiter,
    Runner,
    Chaser,
    Gunner,
    PowerUp,
}

/// Fixed per-archetype constants
#[derive(Debug, Clone, Copy)]
pub struct ArchetypeStats {
    pub radius: f32,
    pub max_health: i32,
    /// Steering acceleration magnitude
    pub thrust: f32,
    pub max_speed: f32,
    /// Spin in degrees per second
    pub turn_rate: f32,
    /// Score multiplier awarded on a player kill
    pub type_score: u64,
    /// Chance of dropping a power-up on death
    pub drop_rate: f64,
    pub color: Color,
    pub shape: Shape,
}

impl Archetype {
    pub fn faction(self) -> Faction {
        match self {
            Archetype::Player | Archetype::PlayerDrone => Faction::Player,
            Archetype::EnemyDrone
            | Archetype::Asteroid
            | Archetype::Orbiter
            | Archetype::Runner
            | Archetype::Chaser
            | Archetype::Gunner => Faction::Enemy,
            Archetype::PowerUp => Faction::Neutral,
        }
    }

    pub fn is_drone(self) -> bool {
        matches!(self, Archetype::PlayerDrone | Archetype::EnemyDrone)
    }

    pub fn stats(self) -> ArchetypeStats {
        let (radius, max_health, thrust, max_speed, turn_rate, type_score, drop_rate, color, shape) =
            match self {
                Archetype::Player => (20.0, 5, 600.0, 450.0, 0.0, 0, 0.0, Color::CYAN, Shape::Triangle),
                Archetype::PlayerDrone => (10.0, 1, 900.0, 500.0, 180.0, 0, 0.0, Color::BLUE, Shape::Square),
                Archetype::EnemyDrone => (10.0, 1, 700.0, 400.0, -180.0, 1, 0.0, Color::RED, Shape::Square),
                Archetype::Asteroid => (40.0, 3, 0.0, 200.0, 20.0, 1, 0.10, Color::WHITE, Shape::Hexagon),
                Archetype::Orbiter => (30.0, 2, 120.0, 180.0, 90.0, 2, 0.15, Color::MAGENTA, Shape::Hexagon),
                Archetype::Runner => (24.0, 2, 420.0, 360.0, 0.0, 3, 0.20, Color::YELLOW, Shape::Triangle),
                Archetype::Chaser => (26.0, 2, 300.0, 260.0, 0.0, 2, 0.15, Color::RED, Shape::Square),
                Archetype::Gunner => (30.0, 3, 240.0, 220.0, 0.0, 4, 0.25, Color::GREEN, Shape::Hexagon),
                Archetype::PowerUp => (14.0, 1, 500.0, 300.0, 45.0, 0, 0.0, Color::WHITE, Shape::Square),
            };
        ArchetypeStats {
            radius,
            max_health,
            thrust,
            max_speed,
            turn_rate,
            type_score,
            drop_rate,
            color,
            shape,
        }
    }
}

/// Outline family; the side count doubles as the shape score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shape {
    Triangle,
    Square,
    Hexagon,
}

/// Outline vertices at a nominal radius of 40
const TRIANGLE_POINTS: [[f32; 2]; 3] = [[0.0, -40.0], [35.0, 20.0], [-35.0, 20.0]];
const SQUARE_POINTS: [[f32; 2]; 4] = [[0.0, -40.0], [40.0, 0.0], [0.0, 40.0], [-40.0, 0.0]];
const HEXAGON_POINTS: [[f32; 2]; 6] = [
    [0.0, -40.0],
    [35.0, -20.0],
    [35.0, 20.0],
    [0.0, 40.0],
    [-35.0, 20.0],
    [-35.0, -20.0],
];

impl Shape {
    pub fn score(self) -> u64 {
        self.points().len() as u64
    }

    fn points(self) -> &'static [[f32; 2]] {
        match self {
            Shape::Triangle => &TRIANGLE_POINTS,
            Shape::Square => &SQUARE_POINTS,
            Shape::Hexagon => &HEXAGON_POINTS,
        }
    }

    /// World-space outline for a body of the given radius and heading
    pub fn outline(self, pos: Vec2, radius: f32, angle_degrees: f32) -> Vec<Vec2> {
        let scale = radius / 40.0;
        let rot = Vec2::from_angle(angle_degrees.to_radians());
        self.points()
            .iter()
            .map(|&[x, y]| pos + rot.rotate(Vec2::new(x, y) * scale))
            .collect()
    }
}

/// Power-up effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    Damage,
    RapidFire,
    BulletSpeed,
    BigThrust,
    Phase,
    Laser,
    Health,
    Shield,
    Drone,
    DroneShield,
    DroneGun,
}

impl PowerUpKind {
    pub fn color(self) -> Color {
        match self {
            PowerUpKind::Damage => Color::RED,
            PowerUpKind::RapidFire => Color::MAGENTA,
            PowerUpKind::BulletSpeed => Color::YELLOW,
            PowerUpKind::BigThrust => Color(255, 128, 0),
            PowerUpKind::Phase => Color(128, 128, 255),
            PowerUpKind::Laser => Color::GREEN,
            PowerUpKind::Health => Color::WHITE,
            PowerUpKind::Shield | PowerUpKind::DroneShield => Color::CYAN,
            PowerUpKind::Drone | PowerUpKind::DroneGun => Color::BLUE,
        }
    }
}

/// Drone state shared by both factions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drone {
    pub owner: EntityId,
    /// Fires at nearby hostiles when set
    pub armed: bool,
    pub last_fire: Option<f64>,
}

/// Archetype-specific data
#[derive(Debug, Clone)]
pub enum Kind {
    Player(PlayerState),
    PlayerDrone(Drone),
    EnemyDrone(Drone),
    Asteroid,
    Orbiter { anchor: Vec2 },
    Runner { target: EntityId },
    Chaser { target: EntityId },
    Gunner { target: EntityId, last_fire: Option<f64> },
    PowerUp(PowerUpKind),
}

impl Kind {
    pub fn archetype(&self) -> Archetype {
        match self {
            Kind::Player(_) => Archetype::Player,
            Kind::PlayerDrone(_) => Archetype::PlayerDrone,
            Kind::EnemyDrone(_) => Archetype::EnemyDrone,
            Kind::Asteroid => Archetype::Asteroid,
            Kind::Orbiter { .. } => Archetype::Orbiter,
            Kind::Runner { .. } => Archetype::Runner,
            Kind::Chaser { .. } => Archetype::Chaser,
            Kind::Gunner { .. } => Archetype::Gunner,
            Kind::PowerUp(_) => Archetype::PowerUp,
        }
    }
}

/// Outcome of a body collision on one side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Still inside the invulnerability window
    Ignored,
    /// Shield absorbed the hit
    Absorbed,
    /// Health was reduced
    Wounded,
}

/// A simulated actor
#[derive(Debug, Clone)]
pub struct Entity {
    /// Assigned by the world on spawn
    pub id: EntityId,
    pub kind: Kind,
    pub shape: Shape,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Desired acceleration written by steering
    pub acc: Vec2,
    /// Heading in degrees [0, 360)
    pub angle: f32,
    pub turn_rate: f32,
    pub radius: f32,
    pub health: i32,
    pub max_health: i32,
    pub shield: u32,
    /// Simulation time of the last damage taken
    pub last_hit: Option<f64>,
    /// The last hit ignored the shield
    pub shield_bypass: bool,
    /// Suppress death effects
    pub silent: bool,
    pub color: Color,
}

impl Entity {
    /// Build an entity with its archetype defaults (id is assigned on spawn)
    pub fn new(kind: Kind, pos: Vec2) -> Self {
        let stats = kind.archetype().stats();
        let color = match &kind {
            Kind::PowerUp(p) => p.color(),
            _ => stats.color,
        };
        Self {
            id: EntityId(0),
            kind,
            shape: stats.shape,
            pos,
            vel: Vec2::ZERO,
            acc: Vec2::ZERO,
            angle: 0.0,
            turn_rate: stats.turn_rate,
            radius: stats.radius,
            health: stats.max_health,
            max_health: stats.max_health,
            shield: 0,
            last_hit: None,
            shield_bypass: false,
            silent: false,
            color,
        }
    }

    pub fn player(pos: Vec2) -> Self {
        Self::new(Kind::Player(PlayerState::default()), pos)
    }

    pub fn asteroid(pos: Vec2, vel: Vec2) -> Self {
        Self::new(Kind::Asteroid, pos).with_velocity(vel)
    }

    pub fn orbiter(pos: Vec2, anchor: Vec2) -> Self {
        Self::new(Kind::Orbiter { anchor }, pos)
    }

    pub fn runner(pos: Vec2, target: EntityId) -> Self {
        Self::new(Kind::Runner { target }, pos)
    }

    pub fn chaser(pos: Vec2, target: EntityId) -> Self {
        Self::new(Kind::Chaser { target }, pos)
    }

    pub fn gunner(pos: Vec2, target: EntityId) -> Self {
        Self::new(
            Kind::Gunner {
                target,
                last_fire: None,
            },
            pos,
        )
    }

    pub fn player_drone(pos: Vec2, owner: EntityId) -> Self {
        Self::new(
            Kind::PlayerDrone(Drone {
                owner,
                armed: false,
                last_fire: None,
            }),
            pos,
        )
    }

    pub fn enemy_drone(pos: Vec2, owner: EntityId) -> Self {
        Self::new(
            Kind::EnemyDrone(Drone {
                owner,
                armed: false,
                last_fire: None,
            }),
            pos,
        )
    }

    pub fn power_up(pos: Vec2, kind: PowerUpKind) -> Self {
        Self::new(Kind::PowerUp(kind), pos)
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.shape = shape;
        self
    }

    pub fn with_shield(mut self, shield: u32) -> Self {
        self.shield = shield.min(MAX_SHIELD);
        self
    }

    pub fn archetype(&self) -> Archetype {
        self.kind.archetype()
    }

    pub fn faction(&self) -> Faction {
        self.archetype().faction()
    }

    pub fn stats(&self) -> ArchetypeStats {
        self.archetype().stats()
    }

    pub fn is_drone(&self) -> bool {
        self.archetype().is_drone()
    }

    pub fn player_state(&self) -> Option<&PlayerState> {
        match &self.kind {
            Kind::Player(p) => Some(p),
            _ => None,
        }
    }

    pub fn player_state_mut(&mut self) -> Option<&mut PlayerState> {
        match &mut self.kind {
            Kind::Player(p) => Some(p),
            _ => None,
        }
    }

    pub fn drone(&self) -> Option<&Drone> {
        match &self.kind {
            Kind::PlayerDrone(d) | Kind::EnemyDrone(d) => Some(d),
            _ => None,
        }
    }

    pub fn drone_mut(&mut self) -> Option<&mut Drone> {
        match &mut self.kind {
            Kind::PlayerDrone(d) | Kind::EnemyDrone(d) => Some(d),
            _ => None,
        }
    }

    /// Dead entities are skipped by steering and collisions until swept
    pub fn is_dead(&self) -> bool {
        match &self.kind {
            Kind::Player(p) => p.dead || self.health <= 0,
            _ => self.health <= 0,
        }
    }

    /// Player with an active phase buff who is thrusting
    pub fn is_phasing(&self) -> bool {
        self.player_state().is_some_and(PlayerState::is_phasing)
    }

    /// Whether anything can touch this entity this frame
    pub fn is_tangible(&self) -> bool {
        !self.is_dead() && !self.is_phasing()
    }

    /// Inside the invulnerability window of the last hit
    pub fn is_invulnerable(&self, now: f64) -> bool {
        self.last_hit
            .is_some_and(|t| now - t < INVULNERABILITY_SECS)
    }

    /// Damage flash for renderers
    pub fn is_flashing(&self, now: f64) -> bool {
        self.last_hit.is_some_and(|t| now - t < FLASH_SECS)
    }

    /// Body colour with the damage flash applied
    pub fn render_color(&self, now: f64) -> Color {
        if self.is_flashing(now) {
            self.color.tint(Color::DAMAGE_FLASH)
        } else {
            self.color
        }
    }

    /// Apply one body-collision hit: shield first, then health
    pub fn take_bounce_hit(&mut self, now: f64) -> HitOutcome {
        if self.is_invulnerable(now) {
            return HitOutcome::Ignored;
        }
        self.last_hit = Some(now);
        self.shield_bypass = false;
        if self.shield > 0 {
            self.shield -= 1;
            HitOutcome::Absorbed
        } else {
            self.health -= BOUNCE_DAMAGE;
            HitOutcome::Wounded
        }
    }

    /// Apply damage that ignores the shield (bullets)
    pub fn take_direct_hit(&mut self, damage: i32, now: f64) {
        self.health -= damage;
        self.last_hit = Some(now);
        self.shield_bypass = true;
    }

    /// Score for killing this entity with a player shot
    pub fn kill_score(&self) -> u64 {
        let shield_bonus = if self.shield > 0 { 2 } else { 1 };
        self.shape.score() * self.stats().type_score * shield_bonus
    }

    /// Advance spin
    pub fn spin(&mut self, dt: f32) {
        if self.turn_rate != 0.0 {
            self.angle = wrap_degrees(self.angle + self.turn_rate * dt);
        }
    }

    /// World-space outline for renderers
    pub fn outline(&self) -> Vec<Vec2> {
        self.shape.outline(self.pos, self.radius, self.angle)
    }
}
