//! Boar Hell entry point
//!
//! Headless native driver: runs an autopilot session through the same
//! fixed-timestep accumulator a windowed frontend would use, logs the HUD
//! events, and prints the final render snapshot as JSON.
//!
//! Usage: `boar-hell [settings.json] [max_ticks]`

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::time::{SystemTime, UNIX_EPOCH};

    use boar_hell::Settings;
    use boar_hell::consts::MAX_SUBSTEPS;
    use boar_hell::sim::{GameEvent, GameState, RenderSnapshot, TickInput, tick};

    /// Simulated frame length (a 30 Hz display drives two ticks per frame)
    const FRAME_DT: f32 = 1.0 / 30.0;
    const DEFAULT_MAX_TICKS: u64 = 60 * 60 * 5;

    /// Game instance holding all state
    struct Game {
        state: GameState,
        accumulator: f32,
        dt: f32,
        input: TickInput,
    }

    impl Game {
        fn new(settings: &Settings, seed: u64) -> Self {
            Self {
                state: GameState::new(settings, seed),
                accumulator: 0.0,
                dt: settings.dt(),
                input: TickInput {
                    autopilot: true,
                    ..TickInput::default()
                },
            }
        }

        /// Run simulation ticks
        fn update(&mut self, frame_dt: f32) {
            self.accumulator += frame_dt.min(0.1);

            let mut substeps = 0;
            while self.accumulator >= self.dt && substeps < MAX_SUBSTEPS {
                tick(&mut self.state, &self.input);
                self.accumulator -= self.dt;
                substeps += 1;

                for event in &self.state.events {
                    report(event);
                }

                // Clear one-shot inputs after processing
                self.input.fire_click = false;
                self.input.restart = false;
                self.input.quit = false;
            }
        }
    }

    fn report(event: &GameEvent) {
        match event {
            GameEvent::WeaponTierUp { tier } => {
                log::info!("Stellanator level {} unlocked", tier);
            }
            GameEvent::HealthChanged { .. } | GameEvent::PickupSpawned { .. } => {
                log::trace!("{:?}", event);
            }
            _ => log::debug!("{:?}", event),
        }
    }

    fn clock_seed() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    }

    pub fn run() {
        let mut args = std::env::args().skip(1);
        let settings = args.next().map(Settings::load).unwrap_or_default();
        let max_ticks = match args.next().map(|s| s.parse::<u64>()) {
            Some(Ok(n)) => n,
            Some(Err(e)) => {
                log::warn!("Invalid tick limit: {} - using {}", e, DEFAULT_MAX_TICKS);
                DEFAULT_MAX_TICKS
            }
            None => DEFAULT_MAX_TICKS,
        };

        let seed = settings.seed.unwrap_or_else(clock_seed);
        log::info!("Boar Hell (headless) starting with seed {}", seed);

        let mut game = Game::new(&settings, seed);
        while !game.state.is_over() && game.state.time_ticks < max_ticks {
            game.update(FRAME_DT);
        }

        let state = &game.state;
        log::info!(
            "Session ended after {} ticks: {:?}, exp {}, tier {}, {} shots fired",
            state.time_ticks,
            state.phase,
            state.exp,
            state.player.weapon_tier,
            state.bullets_shot
        );

        match serde_json::to_string_pretty(&RenderSnapshot::capture(state)) {
            Ok(json) => println!("{json}"),
            Err(e) => log::error!("Could not serialize snapshot: {}", e),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser frontend drives the library directly
}
