use std::collections::HashSet;

use bevy_ecs::{
    event::EventWriter,
    query::With,
    resource::Resource,
    system::{Query, Res, ResMut},
};
use glam::IVec2;
use tracing::{debug, info, trace};

use crate::config::DifficultySettings;
use crate::constants::{
    scoring::{PELLET_POINTS, POWER_PELLET_POINTS},
    timing::LEVEL_ADVANCE_DELAY_SECONDS,
};
use crate::events::GameEvent;
use crate::map::builder::Maze;
use crate::systems::components::{PlayerControlled, Position, PursuerState, RunState};
use crate::systems::lifecycle::{DeferredAction, DeferredActions};
use crate::systems::phase::PhaseScheduler;

/// The items left on the board. Items are only ever removed within a level.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct Collectibles {
    pub pellets: HashSet<IVec2>,
    pub power: HashSet<IVec2>,
}

impl Collectibles {
    /// Lays out a fresh level.
    ///
    /// Every `.` cell gets an ordinary item and every `o` cell a power item. Blank floor gets a
    /// sparse checkerboard of ordinary items, limited to cells the player can actually reach and
    /// never on the player's start tile.
    pub fn for_maze(maze: &Maze) -> Self {
        let start = maze.player_start();
        let reachable = maze.reachable_from(start);

        let sparse = maze
            .blank_cells()
            .filter(|cell| (cell.x + cell.y) % 2 == 0)
            .filter(|cell| *cell != start && reachable.contains(cell));

        let pellets: HashSet<IVec2> = maze.pellet_cells().iter().copied().chain(sparse).collect();
        let power: HashSet<IVec2> = maze.power_cells().iter().copied().collect();

        debug!(pellets = pellets.len(), power = power.len(), "Collectibles laid out");
        Self { pellets, power }
    }

    /// True once neither kind of item is left.
    pub fn is_empty(&self) -> bool {
        self.pellets.is_empty() && self.power.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.pellets.len() + self.power.len()
    }
}

/// Picks up the item under the player and ends the level once the board is clear.
///
/// A power item also opens a Vulnerable window: every pursuer that is not captured becomes
/// vulnerable and the capture combo starts over.
#[allow(clippy::too_many_arguments)]
pub fn item_system(
    maze: Res<Maze>,
    settings: Res<DifficultySettings>,
    mut collectibles: ResMut<Collectibles>,
    mut run: ResMut<RunState>,
    mut scheduler: ResMut<PhaseScheduler>,
    mut deferred: ResMut<DeferredActions>,
    players: Query<&Position, With<PlayerControlled>>,
    mut pursuers: Query<&mut PursuerState>,
    mut events: EventWriter<GameEvent>,
) {
    let Ok(position) = players.single() else {
        return;
    };
    let tile = maze.normalize(Maze::pixel_to_tile(position.0));

    if collectibles.pellets.remove(&tile) {
        run.score += PELLET_POINTS;
        trace!(%tile, score = run.score, "Item collected");
        events.write(GameEvent::ItemCollected {
            tile,
            points: PELLET_POINTS,
        });
    } else if collectibles.power.remove(&tile) {
        run.score += POWER_PELLET_POINTS;
        run.combo = 0;

        let seconds = settings.vulnerable_seconds;
        for mut state in pursuers.iter_mut() {
            if !state.is_captured() {
                *state = PursuerState::Vulnerable { remaining: seconds };
            }
        }
        let transition = scheduler.enter_vulnerable(seconds);

        debug!(%tile, score = run.score, seconds, "Power item collected");
        events.write(GameEvent::PowerItemCollected {
            tile,
            points: POWER_PELLET_POINTS,
        });
        events.write(transition.into());
    }

    if collectibles.is_empty() {
        run.running = false;
        let transition = scheduler.enter_level_cleared();
        deferred.schedule(DeferredAction::AdvanceLevel, LEVEL_ADVANCE_DELAY_SECONDS);

        info!(level = run.level, score = run.score, "Level cleared");
        events.write(transition.into());
        events.write(GameEvent::LevelCleared { level: run.level });
    }
}
