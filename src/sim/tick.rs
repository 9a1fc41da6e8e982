//! Frame step
//!
//! Advances the world by one variable `dt` frame. Order: input, steering,
//! firing, integration and boundary, body collisions, laser, death sweep,
//! pending merge, bullets, particles, buff decay.

use glam::Vec2;
use rand_pcg::Pcg32;

use super::collision::{EdgeMode, apply_boundary, fire_laser, integrate, resolve_collisions};
use super::entity::{Entity, Faction, PowerUpKind};
use super::geom::heading_degrees;
use super::loot::roll_drop;
use super::player::try_fire;
use super::pool::{spawn_debris, spawn_thrust, update_particles};
use super::projectile::update_bullets;
use super::state::World;
use super::steering;
use crate::Settings;
use crate::audio::{AudioSink, SoundCue};

/// Player commands for a single frame
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    pub thrust: bool,
    pub fire: bool,
    /// World-space point to aim at (the pointer); `None` keeps the last aim
    pub aim: Option<Vec2>,
}

/// Per-frame simulation parameters
#[derive(Debug, Clone, Copy)]
pub struct StepParams {
    pub dt: f32,
    pub arena_radius: f32,
    pub edge_mode: EdgeMode,
    /// Emit exhaust particles behind the thrusting player
    pub thrust_trail: bool,
}

impl StepParams {
    pub fn from_settings(settings: &Settings, dt: f32) -> Self {
        Self {
            dt,
            arena_radius: settings.arena_radius,
            edge_mode: settings.edge_mode,
            thrust_trail: settings.particles && settings.quality.thrust_trail(),
        }
    }
}

/// Visible world-space rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    pub min: Vec2,
    pub max: Vec2,
}

impl ScreenRect {
    /// Square view centred on `center`
    pub fn around(center: Vec2, half_extent: f32) -> Self {
        Self {
            min: center - Vec2::splat(half_extent),
            max: center + Vec2::splat(half_extent),
        }
    }

    pub fn contains(&self, pos: Vec2) -> bool {
        pos.cmpge(self.min).all() && pos.cmple(self.max).all()
    }
}

/// Caller-owned collaborators lent to one frame
pub struct FrameContext<'a> {
    pub rng: &'a mut Pcg32,
    pub audio: &'a mut dyn AudioSink,
    pub screen: ScreenRect,
}

/// Advance the world by one frame; returns the score gained
pub fn step(world: &mut World, params: &StepParams, input: &TickInput, ctx: &mut FrameContext<'_>) -> u64 {
    let dt = params.dt;
    world.time += dt as f64;
    let now = world.time;
    let player_id = world.player;

    apply_input(world, input);

    // Every decision sees the same snapshot; writes happen afterwards
    let decisions: Vec<_> = world
        .entities
        .iter()
        .map(|e| (!e.is_dead()).then(|| steering::desired(e, &world.entities, player_id, now)))
        .collect();
    for (e, decision) in world.entities.iter_mut().zip(decisions) {
        let Some(decision) = decision else {
            continue;
        };
        if let Some(bullet) = steering::apply(e, decision, now) {
            let cue = if bullet.faction == Faction::Enemy {
                SoundCue::EnemyShoot
            } else {
                SoundCue::Shoot
            };
            ctx.audio.play(cue);
            world.bullets.push(bullet);
        }
    }

    if let Some(bullet) = world.player_mut().and_then(|p| try_fire(p, now)) {
        ctx.audio.play(SoundCue::Shoot);
        world.bullets.push(bullet);
    }

    for e in world.entities.iter_mut().filter(|e| !e.is_dead()) {
        integrate(e, dt);
        apply_boundary(e, params.arena_radius, params.edge_mode);
    }

    if params.thrust_trail
        && let Some(player) = world.player()
        && let Some(state) = player.player_state()
        && state.thrusting
        && !player.is_dead()
    {
        let exhaust = player.pos - state.aim * player.radius;
        let aim = state.aim;
        spawn_thrust(&mut world.particles, ctx.rng, exhaust, aim, now);
    }

    let collected = resolve_collisions(&mut world.entities, now, ctx.audio);
    apply_power_ups(world, &collected, ctx.audio);

    if let Some(index) = world.index_of(player_id) {
        fire_laser(&mut world.entities, index, params.arena_radius, now);
    }

    sweep_dead(world, ctx, now);
    world.flush_pending();

    // Bullet kills stay in the set as dead bodies until the next sweep
    let outcome = update_bullets(
        &mut world.bullets,
        &mut world.entities,
        params.arena_radius,
        dt,
        now,
        ctx.audio,
    );
    apply_power_ups(world, &outcome.collected, ctx.audio);
    world.flush_pending();

    update_particles(&mut world.particles, dt, now);

    if let Some(state) = world.player_mut().and_then(Entity::player_state_mut)
        && state.thrusting
    {
        state.buffs.decay(dt);
    }

    world.score += outcome.score;
    outcome.score
}

/// Copy frame input onto the player
fn apply_input(world: &mut World, input: &TickInput) {
    let Some(player) = world.player_mut() else {
        return;
    };
    let pos = player.pos;
    let dead = player.is_dead();
    let Some(state) = player.player_state_mut() else {
        return;
    };
    state.thrusting = input.thrust && !dead;
    state.firing = input.fire && !dead;
    if let Some(point) = input.aim {
        let aim = (point - pos).normalize_or_zero();
        if aim != Vec2::ZERO {
            state.aim = aim;
        }
    }
    let aim = state.aim;
    player.angle = heading_degrees(aim);
}

fn apply_power_ups(world: &mut World, kinds: &[PowerUpKind], audio: &mut dyn AudioSink) {
    for &kind in kinds {
        audio.play(SoundCue::PowerUp);
        world.apply_power_up(kind);
    }
}

/// Remove dead entities, emitting their death effects and loot
fn sweep_dead(world: &mut World, ctx: &mut FrameContext<'_>, now: f64) {
    let player_id = world.player;

    if let Some(player) = world.entities.iter_mut().find(|e| e.id == player_id)
        && player.health <= 0
    {
        let (pos, color) = (player.pos, player.color);
        player.health = 0;
        if let Some(state) = player.player_state_mut()
            && !state.dead
        {
            state.dead = true;
            state.thrusting = false;
            state.firing = false;
            log::info!("Player destroyed at t={now:.2}");
            spawn_debris(&mut world.particles, ctx.rng, pos, color, now);
            ctx.audio.play(SoundCue::PlayerDeath);
        }
    }

    let mut drops = Vec::new();
    let particles = &mut world.particles;
    world.entities.retain(|e| {
        if e.id == player_id || !e.is_dead() {
            return true;
        }
        log::debug!("{:?} {:?} removed", e.archetype(), e.id);
        if !e.silent {
            spawn_debris(particles, &mut *ctx.rng, e.pos, e.color, now);
            if e.shield_bypass || ctx.screen.contains(e.pos) {
                ctx.audio.play(SoundCue::Break);
            }
            if let Some(kind) = roll_drop(&mut *ctx.rng, e.archetype(), e.shield > 0) {
                drops.push((e.pos, kind));
            }
        }
        false
    });

    for (pos, kind) in drops {
        let id = world.queue_spawn(Entity::power_up(pos, kind));
        log::debug!("{kind:?} dropped as {id:?}");
    }
}
