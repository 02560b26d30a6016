use std::time::{Duration, Instant};

use anyhow::Result;
use rand::{rngs::SmallRng, seq::IndexedRandom, SeedableRng};
use thousands::Separable;
use tracing::{debug, event, info, warn};

use crate::config::GameConfig;
use crate::constants::LOOP_TIME;
use crate::events::GameEvent;
use crate::input::{Bindings, Key};
use crate::session::Session;

/// Keys the autopilot presses; the configured scheme decides which ones do anything.
const AUTOPILOT_KEYS: [Key; 8] = [Key::Up, Key::Down, Key::Left, Key::Right, Key::W, Key::A, Key::S, Key::D];

/// Ticks between autopilot key presses.
const AUTOPILOT_PERIOD: u64 = 20;

/// Headless driver: runs a session at a fixed rate with an autopilot standing in for a player.
pub struct App {
    session: Session,
    bindings: Bindings,
    autopilot: SmallRng,
    last_tick: Instant,
    ticks: u64,
}

impl App {
    pub fn new(config: GameConfig) -> Result<Self> {
        let bindings = Bindings::new(config);
        let mut session = Session::new();

        if let Some(command) = bindings.command_for(Key::Enter) {
            session.handle(command)?;
        }

        let autopilot = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed.wrapping_add(1)),
            None => SmallRng::from_os_rng(),
        };

        Ok(Self {
            session,
            bindings,
            autopilot,
            last_tick: Instant::now(),
            ticks: 0,
        })
    }

    /// Runs one frame. Returns false once the run is over.
    pub fn run(&mut self) -> Result<bool> {
        let start = Instant::now();

        if self.ticks % AUTOPILOT_PERIOD == 0 {
            if let Some(&key) = AUTOPILOT_KEYS.choose(&mut self.autopilot) {
                if let Some(command) = self.bindings.command_for(key) {
                    self.session.handle(command)?;
                }
            }
        }

        let dt = self.last_tick.elapsed().as_secs_f32();
        self.last_tick = Instant::now();

        for game_event in self.session.tick(dt) {
            match game_event {
                GameEvent::ItemCollected { .. } => {}
                GameEvent::PhaseChanged { from, to } => debug!(%from, %to, "Phase changed"),
                other => info!(event = ?other, "Game event"),
            }
        }
        self.ticks += 1;

        if start.elapsed() < LOOP_TIME {
            let time = LOOP_TIME.saturating_sub(start.elapsed());
            if time != Duration::ZERO {
                spin_sleep::sleep(time);
            }
        } else {
            event!(
                tracing::Level::WARN,
                "Game loop behind schedule by: {:?}",
                start.elapsed() - LOOP_TIME
            );
        }

        Ok(self.session.is_active())
    }

    /// A one-line account of the finished (or current) run.
    pub fn summary(&mut self) -> String {
        match self.session.snapshot() {
            Some(snapshot) => format!(
                "Score {} on level {} after {} ticks",
                snapshot.run.score.separate_with_commas(),
                snapshot.run.level,
                self.ticks.separate_with_commas()
            ),
            None => {
                warn!("No run to summarize");
                "No run".to_string()
            }
        }
    }
}
