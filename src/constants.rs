//! This module contains all the constants used by the simulation.

use std::time::Duration;

use glam::{IVec2, UVec2};

pub const LOOP_TIME: Duration = Duration::from_nanos((1_000_000_000.0 / 60.0) as u64);

/// The size of each cell, in pixels.
pub const CELL_SIZE: u32 = 24;
/// The size of the game board, in cells.
pub const BOARD_CELL_SIZE: UVec2 = UVec2::new(28, 31);
/// The size of the game board, in pixels.
pub const BOARD_PIXEL_SIZE: UVec2 = UVec2::new(BOARD_CELL_SIZE.x * CELL_SIZE, BOARD_CELL_SIZE.y * CELL_SIZE);

/// Largest frame delta the simulation accepts, in seconds.
///
/// Longer stalls (a backgrounded window, a debugger pause) are clamped to this so a single tick
/// never carries an agent further than a fraction of a tile.
pub const MAX_DELTA_SECONDS: f32 = 0.05;

/// Distance from a tile center, in pixels, under which an agent counts as aligned on an axis.
pub const CENTER_EPSILON: f32 = 0.5;

/// The maximum number of pursuers a run can hold.
pub const MAX_PURSUERS: usize = 4;
/// Pursuers in a run when none is configured.
pub const DEFAULT_PURSUERS: u8 = 3;

/// The fixed patrol corners, assigned by pursuer index modulo their count.
pub const PATROL_CORNERS: [IVec2; 4] = [
    IVec2::new(1, 1),
    IVec2::new(BOARD_CELL_SIZE.x as i32 - 2, 1),
    IVec2::new(1, BOARD_CELL_SIZE.y as i32 - 3),
    IVec2::new(BOARD_CELL_SIZE.x as i32 - 2, BOARD_CELL_SIZE.y as i32 - 3),
];

pub mod scoring {
    /// Points for an ordinary item.
    pub const PELLET_POINTS: u32 = 10;
    /// Points for a power item.
    pub const POWER_PELLET_POINTS: u32 = 50;
    /// Points for the first capture in a combo window; doubled for every capture after it.
    pub const CAPTURE_BASE_POINTS: u32 = 200;
    /// The combo counter never exceeds this, capping the capture multiplier at 8x.
    pub const MAX_COMBO: u8 = 3;
}

pub mod timing {
    /// Length of the Ready phase at the start of a run or a level.
    pub const READY_SECONDS: f32 = 2.0;
    /// Length of the Ready phase that follows a lost life.
    pub const RESPAWN_READY_SECONDS: f32 = 1.2;
    /// Length of the LifeLost phase.
    pub const LIFE_LOST_SECONDS: f32 = 1.5;
    /// Delay between clearing a level and the next level starting.
    pub const LEVEL_ADVANCE_DELAY_SECONDS: f32 = 1.5;
    /// Delay between game over and the return-to-menu notification.
    pub const RETURN_TO_MENU_DELAY_SECONDS: f32 = 1.2;
}

pub mod speed {
    /// Player speed multiplier while the Vulnerable phase is active.
    pub const PLAYER_VULNERABLE_FACTOR: f32 = 1.05;
    /// Speed multiplier for a vulnerable pursuer.
    pub const PURSUER_VULNERABLE_FACTOR: f32 = 0.7;
    /// Speed multiplier for a captured pursuer returning home.
    pub const PURSUER_CAPTURED_FACTOR: f32 = 1.2;
    /// Player speed growth per level.
    pub const PLAYER_LEVEL_SCALE: f32 = 1.02;
    /// Pursuer speed growth per level.
    pub const PURSUER_LEVEL_SCALE: f32 = 1.04;
}

pub mod collider {
    use super::CELL_SIZE;

    /// Center distance under which the player and a pursuer are in contact.
    pub const CONTACT_DISTANCE: f32 = CELL_SIZE as f32 * 0.6;
    /// Radius around the ghost-house center at which a captured pursuer counts as home.
    pub const HOME_ARRIVAL_RADIUS: f32 = 6.0;
}

/// An enum representing the different kinds of tiles on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileKind {
    /// Impassable for every agent.
    Wall,
    /// Walkable floor.
    Open,
    /// Reserved pursuer territory; blocks normal movement.
    GhostHouse,
    /// A wrap cell at the edge of a tunnel row.
    Tunnel,
}

/// The raw layout of the game board, as a 2D array of characters.
///
/// `#` wall, `.` ordinary item, `o` power item, ` ` open floor, `T` tunnel end,
/// `=` house door, `G` house interior, `0` player start, `1`-`4` pursuer spawns.
pub const RAW_BOARD: [&str; BOARD_CELL_SIZE.y as usize] = [
    "############################",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#o####.#####.##.#####.####o#",
    "#.####.#####.##.#####.####.#",
    "#..........................#",
    "#.####.##.########.##.####.#",
    "#.####.##.########.##.####.#",
    "#......##....##....##......#",
    "######.##### ## #####.######",
    "     #.##### ## #####.#     ",
    "     #.##   3124   ##.#     ",
    "     #.## ###==### ##.#     ",
    "######.## #GGGGGG# ##.######",
    "T     .   #GGGGGG#   .     T",
    "######.## #GGGGGG# ##.######",
    "     #.## ######## ##.#     ",
    "     #.##          ##.#     ",
    "     #.## ######## ##.#     ",
    "######.## ######## ##.######",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#.####.#####.##.#####.####.#",
    "#o..##.......0 .......##..o#",
    "###.##.##.########.##.##.###",
    "###.##.##.########.##.##.###",
    "#......##....##....##......#",
    "#.##########.##.##########.#",
    "#.##########.##.##########.#",
    "#..........................#",
    "############################",
];
