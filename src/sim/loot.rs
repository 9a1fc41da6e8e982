//! Power-up drops on enemy death

use rand::Rng;
use rand_pcg::Pcg32;

use super::entity::{Archetype, Faction, PowerUpKind};

/// Extra kinds in the pool when the victim died shielded
const SHIELD_LOOT: [PowerUpKind; 2] = [PowerUpKind::Shield, PowerUpKind::DroneShield];

/// Base loot table per archetype (empty for things that never drop)
pub fn loot_table(archetype: Archetype) -> &'static [PowerUpKind] {
    use PowerUpKind::*;
    match archetype {
        Archetype::Asteroid => &[Damage, BulletSpeed, Health],
        Archetype::Orbiter => &[RapidFire, Phase, Drone],
        Archetype::Runner => &[BigThrust, Phase, RapidFire],
        Archetype::Chaser => &[Damage, Drone, Health],
        Archetype::Gunner => &[Laser, RapidFire, DroneGun],
        Archetype::Player | Archetype::PlayerDrone | Archetype::EnemyDrone | Archetype::PowerUp => &[],
    }
}

/// Roll for a drop from a dying entity
///
/// Only enemy-faction, non-drone archetypes drop anything.
pub fn roll_drop(rng: &mut Pcg32, archetype: Archetype, shielded: bool) -> Option<PowerUpKind> {
    if archetype.faction() != Faction::Enemy || archetype.is_drone() {
        return None;
    }
    let base = loot_table(archetype);
    if base.is_empty() || !rng.random_bool(archetype.stats().drop_rate) {
        return None;
    }
    let extra: &[PowerUpKind] = if shielded { &SHIELD_LOOT } else { &[] };
    let index = rng.random_range(0..base.len() + extra.len());
    base.get(index)
        .or_else(|| extra.get(index - base.len()))
        .copied()
}
