//! This module contains the simulation context for a single run.

use bevy_ecs::event::{EventRegistry, Events};
use bevy_ecs::query::With;
use bevy_ecs::schedule::{ExecutorKind, IntoScheduleConfigs, Schedule};
use bevy_ecs::world::World;
use glam::Vec2;
use tracing::{debug, info};

use crate::config::GameConfig;
use crate::constants::{timing::READY_SECONDS, MAX_DELTA_SECONDS, RAW_BOARD};
use crate::error::GameResult;
use crate::events::GameEvent;
use crate::map::builder::Maze;
use crate::map::direction::Direction;
use crate::systems::{
    collision_system, deferred_action_system, is_running, item_system, phase_system, player_bundle, player_movement_system,
    pursuer_bundle, pursuer_movement_system, speed_system, try_turn, BufferedDirection, Collectibles, DeferredActions,
    DeltaTime, Phase, PhaseScheduler, PlayerControlled, Position, Pursuer, PursuerState, RunState, SimRng, SpeedTable,
    Velocity,
};

/// A read-only view of an agent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentSnapshot {
    pub position: Vec2,
    pub heading: Option<Direction>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PursuerSnapshot {
    pub index: usize,
    pub agent: AgentSnapshot,
    pub state: PursuerState,
}

/// Everything a renderer or HUD needs to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub player: AgentSnapshot,
    /// Ordered by index.
    pub pursuers: Vec<PursuerSnapshot>,
    pub items: Collectibles,
    pub phase: Phase,
    /// Seconds left in the phase, if it is timed.
    pub phase_remaining: Option<f32>,
    pub run: RunState,
}

/// The `Game` struct owns one run of the simulation.
///
/// All state lives in the ECS world; one call to [`Game::tick`] runs the system schedule once.
pub struct Game {
    pub world: World,
    pub schedule: Schedule,
    stopped: bool,
}

impl Game {
    /// Builds a fresh run and enters its opening Ready phase.
    pub fn new(config: &GameConfig) -> GameResult<Game> {
        config.validate()?;

        let mut world = World::default();
        let mut schedule = Schedule::default();
        schedule.set_executor_kind(ExecutorKind::SingleThreaded);

        EventRegistry::register_event::<GameEvent>(&mut world);

        let maze = Maze::new(RAW_BOARD)?;
        let settings = config.settings();
        let speeds = SpeedTable::new(&settings);

        world.spawn(player_bundle(&maze, &speeds));
        for index in 0..config.pursuers as usize {
            world.spawn(pursuer_bundle(&maze, &speeds, index));
        }

        let mut scheduler = PhaseScheduler::default();
        let transition = scheduler.enter_ready(READY_SECONDS);

        world.insert_resource(Collectibles::for_maze(&maze));
        world.insert_resource(maze);
        world.insert_resource(settings);
        world.insert_resource(speeds);
        world.insert_resource(scheduler);
        world.insert_resource(RunState::new(config.lives));
        world.insert_resource(DeferredActions::default());
        world.insert_resource(DeltaTime::default());
        world.insert_resource(SimRng::new(config.seed));

        world.send_event(GameEvent::from(transition));

        schedule.add_systems(
            (
                deferred_action_system,
                phase_system.run_if(is_running),
                speed_system.run_if(is_running),
                player_movement_system.run_if(is_running),
                pursuer_movement_system.run_if(is_running),
                item_system.run_if(is_running),
                collision_system.run_if(is_running),
            )
                .chain(),
        );

        info!(
            difficulty = %config.difficulty,
            pursuers = config.pursuers,
            lives = config.lives,
            seed = ?config.seed,
            "Game started"
        );

        Ok(Game {
            world,
            schedule,
            stopped: false,
        })
    }

    /// Advances the simulation by `dt` seconds and returns the events it produced.
    ///
    /// `dt` is clamped to `0..=MAX_DELTA_SECONDS`, and a non-finite `dt` counts as zero. A stopped
    /// game does nothing.
    pub fn tick(&mut self, dt: f32) -> Vec<GameEvent> {
        if !self.stopped {
            let dt = if dt.is_finite() { dt.clamp(0.0, MAX_DELTA_SECONDS) } else { 0.0 };
            self.world.insert_resource(DeltaTime::from_seconds(dt));
            self.schedule.run(&mut self.world);
        }
        self.drain_events()
    }

    /// Takes every event emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.world
            .get_resource_mut::<Events<GameEvent>>()
            .map(|mut events| events.drain().collect())
            .unwrap_or_default()
    }

    /// Queues a direction for the player.
    ///
    /// A stopped player turns immediately if the way is open; otherwise the direction is taken at
    /// the next tile center that allows it.
    pub fn queue_direction(&mut self, direction: Direction) {
        if self.stopped || !self.run_state().is_some_and(|run| run.running) {
            return;
        }

        let Some(maze) = self.world.get_resource::<Maze>().cloned() else {
            return;
        };
        let mut players = self
            .world
            .query_filtered::<(&mut Position, &mut Velocity, &mut BufferedDirection), With<PlayerControlled>>();
        for (mut position, mut velocity, mut buffered) in players.iter_mut(&mut self.world) {
            buffered.0 = Some(direction);
            if try_turn(&maze, &mut position.0, &mut velocity.heading, direction) {
                debug!(direction = direction.as_ref(), "Player turned from a stop");
            }
        }
    }

    /// Freezes the run. Nothing advances after this, deferred actions included.
    pub fn stop(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        if let Some(mut run) = self.world.get_resource_mut::<RunState>() {
            run.running = false;
        }
        info!("Game stopped");
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn phase(&self) -> Phase {
        self.world
            .get_resource::<PhaseScheduler>()
            .map_or(Phase::Boot, PhaseScheduler::phase)
    }

    pub fn run_state(&self) -> Option<RunState> {
        self.world.get_resource::<RunState>().copied()
    }

    /// Captures the current state for a renderer or HUD.
    pub fn snapshot(&mut self) -> Snapshot {
        let mut players = self
            .world
            .query_filtered::<(&Position, &Velocity), With<PlayerControlled>>();
        let player = players
            .iter(&self.world)
            .next()
            .map(|(position, velocity)| AgentSnapshot {
                position: position.0,
                heading: velocity.heading,
            })
            .unwrap_or(AgentSnapshot {
                position: Vec2::ZERO,
                heading: None,
            });

        let mut query = self.world.query::<(&Pursuer, &PursuerState, &Position, &Velocity)>();
        let mut pursuers: Vec<PursuerSnapshot> = query
            .iter(&self.world)
            .map(|(pursuer, state, position, velocity)| PursuerSnapshot {
                index: pursuer.index,
                agent: AgentSnapshot {
                    position: position.0,
                    heading: velocity.heading,
                },
                state: *state,
            })
            .collect();
        pursuers.sort_by_key(|pursuer| pursuer.index);

        let scheduler = self.world.get_resource::<PhaseScheduler>().cloned().unwrap_or_default();

        Snapshot {
            player,
            pursuers,
            items: self.world.get_resource::<Collectibles>().cloned().unwrap_or_default(),
            phase: scheduler.phase(),
            phase_remaining: scheduler.remaining(),
            run: self.run_state().unwrap_or(RunState::new(0)),
        }
    }
}
