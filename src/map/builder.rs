//! Map construction and spatial queries.

use crate::constants::{TileKind, BOARD_CELL_SIZE, CELL_SIZE, MAX_PURSUERS};
use crate::error::{GameResult, MapError};
use crate::map::direction::Direction;
use crate::map::parser::MapTileParser;
use bevy_ecs::resource::Resource;
use glam::{IVec2, Vec2};
use pathfinding::prelude::bfs_reach;
use std::collections::HashSet;
use tracing::debug;

/// The static maze: tile classification plus the fixed landmarks parsed from the layout.
#[derive(Resource, Debug, Clone)]
pub struct Maze {
    tiles: [[TileKind; BOARD_CELL_SIZE.y as usize]; BOARD_CELL_SIZE.x as usize],
    pellet_cells: Vec<IVec2>,
    power_cells: Vec<IVec2>,
    player_start: IVec2,
    pursuer_spawns: [IVec2; MAX_PURSUERS],
    house_center: Vec2,
}

impl Maze {
    /// Creates a new `Maze` from a raw board layout.
    ///
    /// # Errors
    ///
    /// Fails if the layout does not parse, or lacks the player start, a pursuer spawn or a
    /// ghost-house interior.
    pub fn new(raw_board: [&str; BOARD_CELL_SIZE.y as usize]) -> GameResult<Maze> {
        let parsed = MapTileParser::parse_board(raw_board)?;

        let player_start = parsed.player_start.ok_or(MapError::MissingPlayerStart)?;

        let mut pursuer_spawns = [IVec2::ZERO; MAX_PURSUERS];
        for (slot, spawn) in pursuer_spawns.iter_mut().zip(parsed.pursuer_spawns) {
            *slot = spawn.ok_or(MapError::MissingPursuerSpawns)?;
        }

        if parsed.house_interior.is_empty() {
            return Err(MapError::MissingGhostHouse.into());
        }
        let house_center = parsed
            .house_interior
            .iter()
            .map(|&cell| Self::tile_center(cell))
            .sum::<Vec2>()
            / parsed.house_interior.len() as f32;

        debug!(
            player_start = %player_start,
            house_center = %house_center,
            pellets = parsed.pellets.len(),
            power = parsed.power_pellets.len(),
            "Maze built"
        );

        Ok(Maze {
            tiles: parsed.tiles,
            pellet_cells: parsed.pellets,
            power_cells: parsed.power_pellets,
            player_start,
            pursuer_spawns,
            house_center,
        })
    }

    /// Returns the kind of the tile at `tile`; anything off the board is a wall.
    pub fn classify(&self, tile: IVec2) -> TileKind {
        if tile.x < 0 || tile.y < 0 || tile.x >= BOARD_CELL_SIZE.x as i32 || tile.y >= BOARD_CELL_SIZE.y as i32 {
            return TileKind::Wall;
        }
        self.tiles[tile.x as usize][tile.y as usize]
    }

    /// True when an agent may occupy `tile`. Columns on tunnel rows wrap first.
    pub fn is_passable(&self, tile: IVec2) -> bool {
        !matches!(self.classify(self.normalize(tile)), TileKind::Wall | TileKind::GhostHouse)
    }

    /// True when both edge cells of `row` are tunnel cells.
    pub fn is_tunnel_row(&self, row: i32) -> bool {
        self.classify(IVec2::new(0, row)) == TileKind::Tunnel
            && self.classify(IVec2::new(BOARD_CELL_SIZE.x as i32 - 1, row)) == TileKind::Tunnel
    }

    /// Wraps the column of a tile on a tunnel row back onto the board. Other tiles are returned as-is.
    pub fn normalize(&self, tile: IVec2) -> IVec2 {
        if self.is_tunnel_row(tile.y) {
            IVec2::new(tile.x.rem_euclid(BOARD_CELL_SIZE.x as i32), tile.y)
        } else {
            tile
        }
    }

    /// Converts a pixel position to the tile containing it.
    pub fn pixel_to_tile(position: Vec2) -> IVec2 {
        (position / CELL_SIZE as f32).floor().as_ivec2()
    }

    /// Returns the pixel position of a tile's center.
    pub fn tile_center(tile: IVec2) -> Vec2 {
        (tile * CELL_SIZE as i32).as_vec2() + Vec2::splat(CELL_SIZE as f32 / 2.0)
    }

    /// Every tile reachable from `start` through passable four-neighbour steps, tunnels included.
    pub fn reachable_from(&self, start: IVec2) -> HashSet<IVec2> {
        if !self.is_passable(start) {
            return HashSet::new();
        }
        bfs_reach(self.normalize(start), move |&tile| {
            Direction::DIRECTIONS
                .into_iter()
                .map(move |dir| self.normalize(tile + dir.as_ivec2()))
                .filter(move |&next| self.is_passable(next))
        })
        .collect()
    }

    /// Open tiles with no layout marker of their own (blank floor).
    pub fn blank_cells(&self) -> impl Iterator<Item = IVec2> + '_ {
        (0..BOARD_CELL_SIZE.y as i32)
            .flat_map(|y| (0..BOARD_CELL_SIZE.x as i32).map(move |x| IVec2::new(x, y)))
            .filter(move |&tile| self.classify(tile) == TileKind::Open)
            .filter(move |tile| !self.pellet_cells.contains(tile) && !self.power_cells.contains(tile))
    }

    /// Cells marked for an ordinary item in the layout.
    pub fn pellet_cells(&self) -> &[IVec2] {
        &self.pellet_cells
    }

    /// Cells marked for a power item in the layout.
    pub fn power_cells(&self) -> &[IVec2] {
        &self.power_cells
    }

    pub fn player_start(&self) -> IVec2 {
        self.player_start
    }

    /// The spawn tile of the pursuer with the given index.
    pub fn pursuer_spawn(&self, index: usize) -> IVec2 {
        self.pursuer_spawns[index % MAX_PURSUERS]
    }

    /// The pixel center of the ghost-house interior; captured pursuers steer here.
    pub fn house_center(&self) -> Vec2 {
        self.house_center
    }
}
