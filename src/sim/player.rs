//! Player buff state machine and firing
//!
//! Buffs are independent countdowns. Timed buffs (`big_thrust`, `phase`,
//! `laser`) only run down while the player thrusts, since that is when their
//! effect is live. Per-shot buffs count remaining shots and drop by one each
//! time the player fires.

use glam::Vec2;

use super::entity::{Entity, PowerUpKind};
use super::projectile::{Bullet, BulletProfile};
use crate::colors::Color;
use crate::consts::*;

/// Shots granted per pickup
pub const DAMAGE_SHOTS: u32 = 12;
pub const RAPID_FIRE_SHOTS: u32 = 40;
pub const BULLET_SPEED_SHOTS: u32 = 25;
/// Seconds of thrust granted per pickup
pub const BIG_THRUST_SECS: f32 = 6.0;
pub const PHASE_SECS: f32 = 4.0;
pub const LASER_SECS: f32 = 5.0;

/// Active buff counters (all zero when inactive)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Buffs {
    /// Shots left with boosted damage
    pub bullet_damage: u32,
    /// Shots left with the short cooldown
    pub rapid_fire: u32,
    /// Shots left with boosted speed
    pub bullet_speed: u32,
    /// Thrust seconds left at the boosted multiplier
    pub big_thrust: f32,
    /// Thrust seconds left phasing through everything
    pub phase: f32,
    /// Thrust seconds left firing the beam
    pub laser: f32,
}

impl Buffs {
    /// Boost the counter for a timed or per-shot kind
    ///
    /// Returns false for one-shot kinds, which the world applies itself.
    pub fn grant(&mut self, kind: PowerUpKind) -> bool {
        match kind {
            PowerUpKind::Damage => self.bullet_damage += DAMAGE_SHOTS,
            PowerUpKind::RapidFire => self.rapid_fire += RAPID_FIRE_SHOTS,
            PowerUpKind::BulletSpeed => self.bullet_speed += BULLET_SPEED_SHOTS,
            PowerUpKind::BigThrust => self.big_thrust += BIG_THRUST_SECS,
            PowerUpKind::Phase => self.phase += PHASE_SECS,
            PowerUpKind::Laser => self.laser += LASER_SECS,
            PowerUpKind::Health
            | PowerUpKind::Shield
            | PowerUpKind::Drone
            | PowerUpKind::DroneShield
            | PowerUpKind::DroneGun => return false,
        }
        true
    }

    /// Run down the timed buffs
    pub fn decay(&mut self, dt: f32) {
        self.big_thrust = (self.big_thrust - dt).max(0.0);
        self.phase = (self.phase - dt).max(0.0);
        self.laser = (self.laser - dt).max(0.0);
    }

    /// Spend one shot from each per-shot buff
    pub fn consume_shot(&mut self) {
        self.bullet_damage = self.bullet_damage.saturating_sub(1);
        self.rapid_fire = self.rapid_fire.saturating_sub(1);
        self.bullet_speed = self.bullet_speed.saturating_sub(1);
    }

    pub fn fire_cooldown(&self) -> f64 {
        if self.rapid_fire > 0 {
            RAPID_FIRE_COOLDOWN
        } else {
            FIRE_COOLDOWN
        }
    }

    pub fn thrust_multiplier(&self) -> f32 {
        if self.big_thrust > 0.0 {
            BIG_THRUST_FACTOR
        } else {
            1.0
        }
    }

    /// Bullet look and punch for the next shot
    pub fn bullet_profile(&self) -> BulletProfile {
        let mut profile = BulletProfile {
            radius: BULLET_RADIUS,
            damage: BULLET_DAMAGE,
            speed: BULLET_SPEED,
            color: Color::WHITE,
        };
        if self.bullet_speed > 0 {
            profile.speed *= 1.6;
            profile.color = Color::YELLOW;
        }
        if self.rapid_fire > 0 {
            profile.color = Color::MAGENTA;
        }
        if self.bullet_damage > 0 {
            profile.damage *= 2;
            profile.radius *= 1.75;
            profile.color = Color::RED;
        }
        profile
    }
}

/// Player-only state carried in [`super::entity::Kind::Player`]
#[derive(Debug, Clone)]
pub struct PlayerState {
    pub buffs: Buffs,
    /// Terminal state; the player is never removed from the world
    pub dead: bool,
    pub thrusting: bool,
    pub firing: bool,
    /// Unit aim direction
    pub aim: Vec2,
    pub last_fire: Option<f64>,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            buffs: Buffs::default(),
            dead: false,
            thrusting: false,
            firing: false,
            aim: Vec2::X,
            last_fire: None,
        }
    }
}

impl PlayerState {
    pub fn is_phasing(&self) -> bool {
        !self.dead && self.thrusting && self.buffs.phase > 0.0
    }

    pub fn laser_active(&self) -> bool {
        !self.dead && self.thrusting && self.buffs.laser > 0.0
    }

    /// Steering acceleration for the player
    pub fn thrust(&self, base_thrust: f32) -> Vec2 {
        if self.dead || !self.thrusting {
            return Vec2::ZERO;
        }
        self.aim * base_thrust * self.buffs.thrust_multiplier()
    }

    /// Whether a shot may leave the barrel at `now`
    pub fn can_fire(&self, now: f64) -> bool {
        // The beam replaces the gun only while it is actually firing
        if self.dead || !self.firing || self.laser_active() {
            return false;
        }
        self.last_fire
            .is_none_or(|t| now - t >= self.buffs.fire_cooldown())
    }
}

/// Fire the player's gun if the trigger is held and the cooldown allows
pub fn try_fire(player: &mut Entity, now: f64) -> Option<Bullet> {
    let (id, pos, radius) = (player.id, player.pos, player.radius);
    let faction = player.faction();
    let state = player.player_state_mut()?;
    if !state.can_fire(now) {
        return None;
    }
    let profile = state.buffs.bullet_profile();
    state.buffs.consume_shot();
    state.last_fire = Some(now);
    Some(Bullet::fire(id, faction, pos, radius, state.aim, profile, now))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_grant_timed_and_per_shot() {
        let mut buffs = Buffs::default();
        assert!(buffs.grant(PowerUpKind::Phase));
        assert!(buffs.grant(PowerUpKind::Phase));
        assert_eq!(buffs.phase, PHASE_SECS * 2.0);
        assert!(buffs.grant(PowerUpKind::RapidFire));
        assert_eq!(buffs.rapid_fire, RAPID_FIRE_SHOTS);
        assert!(!buffs.grant(PowerUpKind::Drone));
        assert!(!buffs.grant(PowerUpKind::Shield));
    }

    #[test]
    fn test_profile_snapshot_reflects_buffs() {
        let mut buffs = Buffs::default();
        let base = buffs.bullet_profile();
        assert_eq!(base.color, Color::WHITE);
        buffs.grant(PowerUpKind::Damage);
        let boosted = buffs.bullet_profile();
        assert_eq!(boosted.damage, BULLET_DAMAGE * 2);
        assert!(boosted.radius > base.radius);
        assert_eq!(boosted.color, Color::RED);
    }

    #[test]
    fn test_rapid_fire_shortens_cooldown() {
        let mut state = PlayerState {
            firing: true,
            last_fire: Some(1.0),
            ..Default::default()
        };
        assert!(!state.can_fire(1.0 + RAPID_FIRE_COOLDOWN));
        state.buffs.grant(PowerUpKind::RapidFire);
        assert!(state.can_fire(1.0 + RAPID_FIRE_COOLDOWN));
    }

    #[test]
    fn test_laser_suppresses_bullets_only_while_beaming() {
        let mut state = PlayerState {
            firing: true,
            ..Default::default()
        };
        assert!(state.can_fire(0.0));
        state.buffs.grant(PowerUpKind::Laser);
        assert!(state.can_fire(0.0));
        state.thrusting = true;
        assert!(!state.can_fire(0.0));
    }

    #[test]
    fn test_try_fire_consumes_shot() {
        let mut player = Entity::player(Vec2::ZERO);
        {
            let state = player.player_state_mut().unwrap();
            state.firing = true;
            state.aim = Vec2::Y;
            state.buffs.grant(PowerUpKind::BulletSpeed);
        }
        let bullet = try_fire(&mut player, 2.0).expect("should fire");
        assert!(bullet.vel.y > BULLET_SPEED);
        assert_eq!(bullet.color, Color::YELLOW);
        let state = player.player_state().unwrap();
        assert_eq!(state.buffs.bullet_speed, BULLET_SPEED_SHOTS - 1);
        assert_eq!(state.last_fire, Some(2.0));
        // Cooldown blocks the next shot
        assert!(try_fire(&mut player, 2.0).is_none());
    }

    #[test]
    fn test_phase_requires_thrust() {
        let mut state = PlayerState::default();
        state.buffs.grant(PowerUpKind::Phase);
        assert!(!state.is_phasing());
        state.thrusting = true;
        assert!(state.is_phasing());
        state.dead = true;
        assert!(!state.is_phasing());
    }

    #[test]
    fn test_big_thrust_multiplier() {
        let mut state = PlayerState {
            thrusting: true,
            ..Default::default()
        };
        let base = state.thrust(100.0);
        state.buffs.grant(PowerUpKind::BigThrust);
        assert_eq!(state.thrust(100.0), base * BIG_THRUST_FACTOR);
    }

    proptest! {
        #[test]
        fn prop_buffs_never_negative(
            grants in proptest::collection::vec(0usize..6, 0..8),
            steps in proptest::collection::vec(0.0f32..2.0, 0..40),
            shots in 0usize..80,
        ) {
            let kinds = [
                PowerUpKind::Damage,
                PowerUpKind::RapidFire,
                PowerUpKind::BulletSpeed,
                PowerUpKind::BigThrust,
                PowerUpKind::Phase,
                PowerUpKind::Laser,
            ];
            let mut buffs = Buffs::default();
            for g in grants {
                buffs.grant(kinds[g]);
            }
            for dt in steps {
                buffs.decay(dt);
            }
            for _ in 0..shots {
                buffs.consume_shot();
            }
            prop_assert!(buffs.big_thrust >= 0.0);
            prop_assert!(buffs.phase >= 0.0);
            prop_assert!(buffs.laser >= 0.0);
        }
    }
}
