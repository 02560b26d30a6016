use bevy_ecs::{
    query::With,
    system::{Query, Res},
};
use glam::{IVec2, Vec2};

use crate::constants::{BOARD_PIXEL_SIZE, CELL_SIZE, CENTER_EPSILON};
use crate::map::builder::Maze;
use crate::map::direction::Direction;
use crate::systems::components::{BufferedDirection, DeltaTime, PlayerControlled, Position, Velocity};

/// True when `position` lies within [`CENTER_EPSILON`] of its tile center on both axes.
pub fn is_center_aligned(position: Vec2) -> bool {
    let center = Maze::tile_center(Maze::pixel_to_tile(position));
    let offset = (position - center).abs();
    offset.x <= CENTER_EPSILON && offset.y <= CENTER_EPSILON
}

/// Distance along `direction` to the next tile center that lies ahead of `position`.
///
/// A center closer than [`CENTER_EPSILON`] counts as already reached, so the one after it is returned.
pub fn distance_to_next_center(position: Vec2, direction: Direction) -> f32 {
    let center = Maze::tile_center(Maze::pixel_to_tile(position));
    let ahead = (center - position).dot(direction.as_vec2());
    if ahead > CENTER_EPSILON {
        ahead
    } else {
        ahead + CELL_SIZE as f32
    }
}

/// Re-enters an agent that has left the board through a tunnel at the opposite edge.
///
/// Only applies on tunnel rows. Fractional progress past the edge is kept.
pub fn wrap_tunnel(maze: &Maze, position: &mut Vec2) {
    let row = Maze::pixel_to_tile(*position).y;
    if !maze.is_tunnel_row(row) {
        return;
    }

    let half = CELL_SIZE as f32 / 2.0;
    let width = BOARD_PIXEL_SIZE.x as f32;
    if position.x < -half {
        position.x += width;
    } else if position.x > width - half {
        position.x -= width;
    }
}

/// Moves an agent `distance` pixels through the maze.
///
/// Travel is split at tile centers. At every center the agent reaches (and at the starting
/// position, if it is already centered) `steer` is asked for a heading given the current tile and
/// heading; a heading into an impassable tile is discarded and the agent stops. Any change of
/// heading snaps the agent onto the tile center, so perpendicular drift never accumulates.
pub fn advance<F>(maze: &Maze, position: &mut Vec2, heading: &mut Option<Direction>, distance: f32, mut steer: F)
where
    F: FnMut(IVec2, Option<Direction>) -> Option<Direction>,
{
    let mut remaining = distance.max(0.0);

    loop {
        if is_center_aligned(*position) {
            let raw_tile = Maze::pixel_to_tile(*position);
            let tile = maze.normalize(raw_tile);
            let choice = steer(tile, *heading).filter(|dir| maze.is_passable(tile + dir.as_ivec2()));
            if choice != *heading {
                *position = Maze::tile_center(raw_tile);
            }
            *heading = choice;
        }

        let Some(direction) = *heading else {
            break;
        };
        if remaining <= 0.0 {
            break;
        }

        let step = remaining.min(distance_to_next_center(*position, direction));
        *position += direction.as_vec2() * step;
        remaining -= step;
        wrap_tunnel(maze, position);
    }
}

/// Attempts an immediate turn for a stopped, centered agent.
///
/// Returns true if the heading was changed.
pub fn try_turn(maze: &Maze, position: &mut Vec2, heading: &mut Option<Direction>, direction: Direction) -> bool {
    if heading.is_some() || !is_center_aligned(*position) {
        return false;
    }

    let raw_tile = Maze::pixel_to_tile(*position);
    if !maze.is_passable(maze.normalize(raw_tile) + direction.as_ivec2()) {
        return false;
    }

    *position = Maze::tile_center(raw_tile);
    *heading = Some(direction);
    true
}

/// Moves the player, applying the buffered direction at each tile center.
///
/// The buffered direction is kept until it is superseded, so a turn requested early is taken at the
/// first junction that allows it. When neither the request nor the current heading is open, the
/// player stops.
pub fn player_movement_system(
    maze: Res<Maze>,
    delta_time: Res<DeltaTime>,
    mut players: Query<(&mut Position, &mut Velocity, &BufferedDirection), With<PlayerControlled>>,
) {
    for (mut position, mut velocity, buffered) in players.iter_mut() {
        let distance = velocity.speed * delta_time.seconds;
        let requested = buffered.0;

        advance(&maze, &mut position.0, &mut velocity.heading, distance, |tile, heading| {
            requested
                .filter(|dir| maze.is_passable(tile + dir.as_ivec2()))
                .or(heading)
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::RAW_BOARD;

    fn maze() -> Maze {
        Maze::new(RAW_BOARD).unwrap()
    }

    #[test]
    fn test_center_alignment() {
        assert!(is_center_aligned(Vec2::new(12.0, 12.0)));
        assert!(is_center_aligned(Vec2::new(12.4, 11.6)));
        assert!(!is_center_aligned(Vec2::new(13.0, 12.0)));
        assert!(!is_center_aligned(Vec2::new(12.0, 0.0)));
    }

    #[test]
    fn test_distance_to_next_center() {
        assert_eq!(distance_to_next_center(Vec2::new(12.0, 12.0), Direction::Right), 24.0);
        assert_eq!(distance_to_next_center(Vec2::new(20.0, 12.0), Direction::Right), 16.0);
        assert_eq!(distance_to_next_center(Vec2::new(20.0, 12.0), Direction::Left), 8.0);
    }

    #[test]
    fn test_advance_stops_at_wall() {
        let maze = maze();
        // (1, 1) is a corner: wall above and to the left.
        let mut position = Maze::tile_center(IVec2::new(2, 1));
        let mut heading = Some(Direction::Left);

        advance(&maze, &mut position, &mut heading, 100.0, |_, heading| heading);

        assert_eq!(heading, None);
        assert_eq!(position, Maze::tile_center(IVec2::new(1, 1)));
    }

    #[test]
    fn test_advance_splits_at_centers() {
        let maze = maze();
        let mut position = Maze::tile_center(IVec2::new(1, 1));
        let mut heading = Some(Direction::Right);
        let mut visited = Vec::new();

        advance(&maze, &mut position, &mut heading, 60.0, |tile, heading| {
            visited.push(tile);
            heading
        });

        assert_eq!(visited, vec![IVec2::new(1, 1), IVec2::new(2, 1), IVec2::new(3, 1)]);
        assert_eq!(position, Vec2::new(96.0, 36.0));
    }

    #[test]
    fn test_try_turn_requires_stop() {
        let maze = maze();
        let mut position = Maze::tile_center(IVec2::new(1, 1));
        let mut heading = None;

        assert!(!try_turn(&maze, &mut position, &mut heading, Direction::Up));
        assert!(try_turn(&maze, &mut position, &mut heading, Direction::Down));
        assert_eq!(heading, Some(Direction::Down));
        assert!(!try_turn(&maze, &mut position, &mut heading, Direction::Right));
    }

    #[test]
    fn test_wrap_tunnel_ignores_other_rows() {
        let maze = maze();
        let mut position = Vec2::new(-13.0, 36.0);
        wrap_tunnel(&maze, &mut position);
        assert_eq!(position.x, -13.0);
    }
}
