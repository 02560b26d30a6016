//! Level lifecycle: actor placement, level advance and actions deferred on the simulation clock.

use bevy_ecs::{
    event::EventWriter,
    query::{With, Without},
    resource::Resource,
    system::{Query, Res, ResMut},
};
use smallvec::SmallVec;
use tracing::{debug, info};

use crate::config::DifficultySettings;
use crate::constants::{
    speed::{PLAYER_LEVEL_SCALE, PURSUER_LEVEL_SCALE},
    timing::READY_SECONDS,
};
use crate::events::GameEvent;
use crate::map::builder::Maze;
use crate::map::direction::Direction;
use crate::systems::components::{
    BufferedDirection, DeltaTime, PlayerBundle, PlayerControlled, Position, PreviousDirection, Pursuer, PursuerBundle,
    PursuerState, RunState, Velocity,
};
use crate::systems::item::Collectibles;
use crate::systems::phase::PhaseScheduler;

/// The player and its movement state.
pub type PlayerActors<'w, 's> = Query<
    'w,
    's,
    (&'static mut Position, &'static mut Velocity, &'static mut BufferedDirection),
    With<PlayerControlled>,
>;

/// Every pursuer with its movement state.
pub type PursuerActors<'w, 's> = Query<
    'w,
    's,
    (
        &'static Pursuer,
        &'static mut PursuerState,
        &'static mut Position,
        &'static mut Velocity,
        &'static mut PreviousDirection,
    ),
    Without<PlayerControlled>,
>;

/// Base speeds for the current level, in pixels per second.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct SpeedTable {
    pub player: f32,
    pub pursuer: f32,
}

impl SpeedTable {
    pub fn new(settings: &DifficultySettings) -> Self {
        Self {
            player: settings.player_speed,
            pursuer: settings.pursuer_speed,
        }
    }

    /// Speeds grow with every level; pursuers faster than the player.
    pub fn scale_for_next_level(&mut self) {
        self.player *= PLAYER_LEVEL_SCALE;
        self.pursuer *= PURSUER_LEVEL_SCALE;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredAction {
    /// Build the next level and enter Ready.
    AdvanceLevel,
    /// Tell the front-end the run is over.
    ReturnToMenu,
}

/// One-shot actions waiting on the simulation clock.
///
/// These keep counting while the run is not `running`, which is what lets a cleared level
/// resume itself.
#[derive(Resource, Debug, Default)]
pub struct DeferredActions {
    pending: Vec<(f32, DeferredAction)>,
}

impl DeferredActions {
    pub fn schedule(&mut self, action: DeferredAction, delay: f32) {
        debug!(?action, delay, "Deferred action scheduled");
        self.pending.push((delay, action));
    }

    /// Advances every pending timer and returns the actions that came due, in scheduling order.
    pub fn tick(&mut self, seconds: f32) -> SmallVec<[DeferredAction; 2]> {
        let mut due = SmallVec::new();
        self.pending.retain_mut(|(remaining, action)| {
            *remaining -= seconds;
            if *remaining <= 0.0 {
                due.push(*action);
                false
            } else {
                true
            }
        });
        due
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn contains(&self, action: DeferredAction) -> bool {
        self.pending.iter().any(|(_, pending)| *pending == action)
    }
}

/// The heading a pursuer leaves its spawn tile with: alternating right and left by index.
pub fn initial_heading(index: usize) -> Direction {
    if index % 2 == 0 {
        Direction::Right
    } else {
        Direction::Left
    }
}

pub fn player_bundle(maze: &Maze, speeds: &SpeedTable) -> PlayerBundle {
    PlayerBundle {
        player: PlayerControlled,
        position: Position(Maze::tile_center(maze.player_start())),
        velocity: Velocity {
            heading: None,
            speed: speeds.player,
        },
        buffered_direction: BufferedDirection(Some(Direction::Right)),
    }
}

pub fn pursuer_bundle(maze: &Maze, speeds: &SpeedTable, index: usize) -> PursuerBundle {
    let heading = initial_heading(index);
    PursuerBundle {
        pursuer: Pursuer { index },
        state: PursuerState::Normal,
        position: Position(Maze::tile_center(maze.pursuer_spawn(index))),
        velocity: Velocity {
            heading: Some(heading),
            speed: speeds.pursuer,
        },
        previous_direction: PreviousDirection(Some(heading)),
    }
}

/// Returns every agent to its start tile with its starting heading; pursuers become normal.
pub fn reset_actors(maze: &Maze, players: &mut PlayerActors, pursuers: &mut PursuerActors) {
    for (mut position, mut velocity, mut buffered) in players.iter_mut() {
        position.0 = Maze::tile_center(maze.player_start());
        velocity.heading = None;
        buffered.0 = Some(Direction::Right);
    }

    for (pursuer, mut state, mut position, mut velocity, mut previous) in pursuers.iter_mut() {
        let heading = initial_heading(pursuer.index);
        *state = PursuerState::Normal;
        position.0 = Maze::tile_center(maze.pursuer_spawn(pursuer.index));
        velocity.heading = Some(heading);
        previous.0 = Some(heading);
    }
}

pub fn is_running(run: Res<RunState>) -> bool {
    run.running
}

/// Fires deferred actions whose delay has elapsed. Runs whether or not the run is `running`.
#[allow(clippy::too_many_arguments)]
pub fn deferred_action_system(
    delta_time: Res<DeltaTime>,
    maze: Res<Maze>,
    mut deferred: ResMut<DeferredActions>,
    mut run: ResMut<RunState>,
    mut scheduler: ResMut<PhaseScheduler>,
    mut speeds: ResMut<SpeedTable>,
    mut collectibles: ResMut<Collectibles>,
    mut events: EventWriter<GameEvent>,
    mut players: PlayerActors,
    mut pursuers: PursuerActors,
) {
    for action in deferred.tick(delta_time.seconds) {
        match action {
            DeferredAction::AdvanceLevel => {
                run.level += 1;
                run.combo = 0;
                speeds.scale_for_next_level();
                *collectibles = Collectibles::for_maze(&maze);
                reset_actors(&maze, &mut players, &mut pursuers);

                let transition = scheduler.enter_ready(READY_SECONDS);
                run.running = true;

                info!(
                    level = run.level,
                    player_speed = speeds.player,
                    pursuer_speed = speeds.pursuer,
                    "Level started"
                );
                events.write(transition.into());
                events.write(GameEvent::LevelStarted { level: run.level });
            }
            DeferredAction::ReturnToMenu => {
                debug!(score = run.score, "Returning to menu");
                events.write(GameEvent::ReturnToMenu);
            }
        }
    }
}
