//! Pursuer behavior: target seeking, random walks and the trip home after capture.

use bevy_ecs::{
    query::{With, Without},
    system::{Query, Res, ResMut},
};
use glam::{IVec2, Vec2};
use rand::{seq::IndexedRandom, Rng};
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::constants::{collider::HOME_ARRIVAL_RADIUS, PATROL_CORNERS};
use crate::map::builder::Maze;
use crate::map::direction::Direction;
use crate::systems::components::{
    DeltaTime, PlayerControlled, Position, Pursuer, PursuerState, SimRng, Velocity,
};
use crate::systems::lifecycle::{initial_heading, PursuerActors};
use crate::systems::movement::advance;
use crate::systems::phase::{Phase, PhaseScheduler};

/// The reverse of the way a pursuer is facing, or was facing before it stopped.
fn reverse_of(heading: Option<Direction>, previous: Option<Direction>) -> Option<Direction> {
    heading.or(previous).map(Direction::opposite)
}

/// The tile a pursuing pursuer aims for: two tiles ahead of the player.
///
/// The result may lie inside a wall or off the board; it is only used as a distance reference.
pub fn pursue_target(player_tile: IVec2, player_heading: Option<Direction>) -> IVec2 {
    player_tile + player_heading.map_or(IVec2::ZERO, |dir| dir.as_ivec2() * 2)
}

/// The corner a patrolling pursuer heads for.
pub fn patrol_target(index: usize) -> IVec2 {
    PATROL_CORNERS[index % PATROL_CORNERS.len()]
}

/// Picks the step from `tile` that lands closest to `target`.
///
/// Reversing is excluded unless nothing else is open; earlier entries of
/// [`Direction::SEEK_ORDER`] win ties.
pub fn seek_step(
    maze: &Maze,
    tile: IVec2,
    heading: Option<Direction>,
    previous: Option<Direction>,
    target: IVec2,
) -> Option<Direction> {
    let reverse = reverse_of(heading, previous);
    let candidates: SmallVec<[Direction; 4]> = Direction::SEEK_ORDER
        .into_iter()
        .filter(|&dir| Some(dir) != reverse)
        .filter(|dir| maze.is_passable(tile + dir.as_ivec2()))
        .collect();

    if candidates.is_empty() {
        return reverse.filter(|dir| maze.is_passable(tile + dir.as_ivec2()));
    }

    let target = target.as_vec2();
    let mut best = candidates[0];
    let mut best_distance = f32::INFINITY;
    for dir in candidates {
        let distance = (tile + dir.as_ivec2()).as_vec2().distance(target);
        if distance < best_distance {
            best_distance = distance;
            best = dir;
        }
    }
    Some(best)
}

/// Picks a random open step from `tile`, never reversing unless it is the only way out.
///
/// Going straight on is twice as likely as any single turn.
pub fn random_step<R: Rng + ?Sized>(
    maze: &Maze,
    tile: IVec2,
    heading: Option<Direction>,
    previous: Option<Direction>,
    rng: &mut R,
) -> Option<Direction> {
    let reverse = reverse_of(heading, previous);
    let mut pool: SmallVec<[Direction; 5]> = Direction::SEEK_ORDER
        .into_iter()
        .filter(|&dir| Some(dir) != reverse)
        .filter(|dir| maze.is_passable(tile + dir.as_ivec2()))
        .collect();

    if pool.is_empty() {
        return reverse.filter(|dir| maze.is_passable(tile + dir.as_ivec2()));
    }

    if let Some(straight) = heading.filter(|dir| pool.contains(dir)) {
        pool.push(straight);
    }
    pool.choose(rng).copied()
}

/// Moves straight toward `home`, ignoring the grid. Never overshoots.
pub fn steer_home(position: &mut Vec2, home: Vec2, distance: f32) {
    let delta = home - *position;
    let length = delta.length();
    if length <= distance {
        *position = home;
    } else {
        *position += delta / length * distance;
    }
}

/// Moves every pursuer according to its state and the global phase.
///
/// Pursuers are handled in index order so that random choices are reproducible for a given seed.
pub fn pursuer_movement_system(
    maze: Res<Maze>,
    delta_time: Res<DeltaTime>,
    scheduler: Res<PhaseScheduler>,
    mut rng: ResMut<SimRng>,
    players: Query<(&Position, &Velocity), (With<PlayerControlled>, Without<Pursuer>)>,
    mut pursuers: PursuerActors,
) {
    let Ok((player_position, player_velocity)) = players.single() else {
        return;
    };
    let player_tile = maze.normalize(Maze::pixel_to_tile(player_position.0));
    let player_heading = player_velocity.heading;
    let phase = scheduler.phase();

    let mut ordered: SmallVec<[_; 4]> = pursuers.iter_mut().collect();
    ordered.sort_by_key(|(pursuer, ..)| pursuer.index);

    for (pursuer, mut state, mut position, mut velocity, mut previous) in ordered {
        let distance = velocity.speed * delta_time.seconds;

        if state.is_captured() {
            let home = maze.house_center();
            steer_home(&mut position.0, home, distance);

            if position.0.distance(home) < HOME_ARRIVAL_RADIUS {
                let heading = initial_heading(pursuer.index);
                *state = PursuerState::Normal;
                position.0 = Maze::tile_center(maze.pursuer_spawn(pursuer.index));
                velocity.heading = Some(heading);
                previous.0 = Some(heading);
                debug!(index = pursuer.index, "Captured pursuer respawned");
            }
            continue;
        }

        let last = previous.0;
        let target = match (*state, phase) {
            (PursuerState::Normal, Phase::Patrol) => Some(patrol_target(pursuer.index)),
            (PursuerState::Normal, Phase::Pursue) => Some(pursue_target(player_tile, player_heading)),
            _ => None,
        };

        match target {
            Some(target) => {
                advance(&maze, &mut position.0, &mut velocity.heading, distance, |tile, heading| {
                    seek_step(&maze, tile, heading, last, target)
                });
            }
            None => {
                advance(&maze, &mut position.0, &mut velocity.heading, distance, |tile, heading| {
                    random_step(&maze, tile, heading, last, &mut rng.0)
                });
            }
        }

        if velocity.heading.is_some() {
            previous.0 = velocity.heading;
        } else {
            trace!(index = pursuer.index, "Pursuer stopped");
        }
    }
}
