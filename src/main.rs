//! Hyper Hexagon headless runner
//!
//! Loads settings, fills a demo arena and runs the simulation at a fixed
//! timestep with a scripted pilot, logging progress. Hosts with a window and
//! audio backend drive `sim::step` the same way.

#[cfg(not(target_arch = "wasm32"))]
mod runner {
    use glam::Vec2;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use hyper_hexagon::audio::AudioManager;
    use hyper_hexagon::consts::*;
    use hyper_hexagon::polar_to_cartesian;
    use hyper_hexagon::sim::{Entity, Faction, FrameContext, ScreenRect, StepParams, TickInput, World, step};
    use hyper_hexagon::Settings;

    /// Simulated run length
    const RUN_SECS: f32 = 30.0;
    /// Host frame times cycled by the runner (a jittery 60 Hz display)
    const FRAME_TIMES: [f32; 4] = [0.016, 0.017, 0.021, 0.012];

    struct Game {
        world: World,
        settings: Settings,
        rng: Pcg32,
        audio: AudioManager,
        accumulator: f32,
    }

    impl Game {
        fn new(settings: Settings) -> Self {
            let mut rng = Pcg32::seed_from_u64(settings.seed);
            let mut world = World::new(settings.max_particles());
            populate(&mut world, &mut rng, settings.arena_radius);
            let audio = AudioManager::from_settings(&settings);
            Self {
                world,
                settings,
                rng,
                audio,
                accumulator: 0.0,
            }
        }

        /// Aim at the nearest enemy, keep firing, thrust when it is far away
        fn pilot(&self) -> TickInput {
            let Some(player) = self.world.player() else {
                return TickInput::default();
            };
            let nearest = self
                .world
                .entities
                .iter()
                .filter(|e| e.faction() == Faction::Enemy && !e.is_dead())
                .min_by(|a, b| {
                    a.pos
                        .distance_squared(player.pos)
                        .partial_cmp(&b.pos.distance_squared(player.pos))
                        .unwrap_or(std::cmp::Ordering::Equal)
                });
            match nearest {
                Some(target) => TickInput {
                    thrust: target.pos.distance(player.pos) > 250.0,
                    fire: true,
                    aim: Some(target.pos),
                },
                None => TickInput::default(),
            }
        }

        /// Run simulation steps for one host frame
        fn update(&mut self, frame_dt: f32) {
            let frame_dt = frame_dt.min(0.1);
            self.accumulator += frame_dt;
            let params = StepParams::from_settings(&self.settings, SIM_DT);

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.pilot();
                let screen = match self.world.player() {
                    Some(p) => ScreenRect::around(p.pos, self.settings.arena_radius * 0.75),
                    None => ScreenRect::around(Vec2::ZERO, self.settings.arena_radius),
                };
                let mut ctx = FrameContext {
                    rng: &mut self.rng,
                    audio: &mut self.audio,
                    screen,
                };
                let gained = step(&mut self.world, &params, &input, &mut ctx);
                if gained > 0 {
                    log::debug!("+{gained} (total {})", self.world.score);
                }
                self.accumulator -= SIM_DT;
                substeps += 1;
            }

            // Stand-in for the host audio backend
            for (cue, volume) in self.audio.drain() {
                log::trace!("play {} at {volume:.2}", cue.id());
            }
        }
    }

    /// Ring of enemies around the player with a few drifting asteroids
    fn populate(world: &mut World, rng: &mut Pcg32, arena_radius: f32) {
        let player = world.player;
        let ring = arena_radius * 0.7;
        for i in 0..8 {
            let pos = polar_to_cartesian(ring, i as f32 * 45.0);
            let entity = match i % 4 {
                0 => Entity::chaser(pos, player),
                1 => Entity::runner(pos, player),
                2 => Entity::gunner(pos, player).with_shield(1),
                _ => Entity::orbiter(pos, Vec2::ZERO),
            };
            let owner = world.spawn(entity);
            if i % 4 == 2 {
                world.spawn(Entity::enemy_drone(pos + Vec2::new(20.0, 0.0), owner));
            }
        }
        for _ in 0..4 {
            let pos = polar_to_cartesian(rng.random_range(ring * 0.3..ring), rng.random_range(0.0..360.0));
            let vel = polar_to_cartesian(rng.random_range(20.0..80.0), rng.random_range(0.0..360.0));
            world.spawn(Entity::asteroid(pos, vel));
        }
        log::info!("Arena populated with {} entities", world.entities.len());
    }

    pub fn run() {
        let settings = match std::env::args().nth(1) {
            Some(path) => Settings::load_or_default(path),
            None => Settings::default(),
        };
        log::info!(
            "Quality {}, arena radius {}, edge mode {:?}, seed {:#x}",
            settings.quality.as_str(),
            settings.arena_radius,
            settings.edge_mode,
            settings.seed
        );

        let mut game = Game::new(settings);
        let mut elapsed = 0.0;
        let mut frame = 0;
        while elapsed < RUN_SECS {
            let frame_dt = FRAME_TIMES[frame % FRAME_TIMES.len()];
            game.update(frame_dt);
            elapsed += frame_dt;
            frame += 1;

            if frame % 300 == 0 {
                let hud = game.world.hud();
                log::info!(
                    "t={:.1}s score={} health={}/{} shield={} drones={} entities={} bullets={} particles={}",
                    game.world.time,
                    hud.score,
                    hud.health,
                    hud.max_health,
                    hud.shield,
                    hud.drones,
                    game.world.entities.len(),
                    game.world.bullets.len(),
                    game.world.particles.len()
                );
            }
            if game.world.hud().dead {
                log::info!("Player destroyed after {:.1}s", game.world.time);
                break;
            }
        }

        let hud = game.world.hud();
        log::info!("Final score: {}", hud.score);
        println!("{}", hud.score);
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_populate_fits_any_valid_arena() {
            for radius in [50.0, 200.0, ARENA_RADIUS] {
                let mut world = World::new(0);
                let mut rng = Pcg32::seed_from_u64(1);
                populate(&mut world, &mut rng, radius);
                assert_eq!(world.entities.len(), 1 + 8 + 2 + 4);
                assert!(world.entities.iter().all(|e| e.pos.length() <= radius));
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Hyper Hexagon (headless) starting...");
    runner::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The web host drives the library directly; there is no wasm runner
}
