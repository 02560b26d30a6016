//! Map parsing functionality for converting raw board layouts into structured data.

use crate::constants::{TileKind, BOARD_CELL_SIZE, MAX_PURSUERS};
use crate::error::ParseError;
use glam::IVec2;

/// Represents the parsed data from a raw board layout.
#[derive(Debug)]
pub struct ParsedMap {
    /// The parsed tile layout, indexed `[x][y]`.
    pub tiles: [[TileKind; BOARD_CELL_SIZE.y as usize]; BOARD_CELL_SIZE.x as usize],
    /// Cells holding an ordinary item at level start.
    pub pellets: Vec<IVec2>,
    /// Cells holding a power item at level start.
    pub power_pellets: Vec<IVec2>,
    /// The player's starting position.
    pub player_start: Option<IVec2>,
    /// Pursuer spawn positions, by marker `1`-`4`.
    pub pursuer_spawns: [Option<IVec2>; MAX_PURSUERS],
    /// Interior cells of the ghost house (the door is excluded).
    pub house_interior: Vec<IVec2>,
}

/// Parser for converting raw board layouts into structured map data.
pub struct MapTileParser;

impl MapTileParser {
    /// Parses a single character into a tile kind.
    ///
    /// Item and start markers are floor tiles; the caller records what they mark.
    pub fn parse_character(c: char) -> Result<TileKind, ParseError> {
        match c {
            '#' => Ok(TileKind::Wall),
            '.' | 'o' | ' ' => Ok(TileKind::Open),
            '0'..='4' => Ok(TileKind::Open),
            'T' => Ok(TileKind::Tunnel),
            '=' | 'G' => Ok(TileKind::GhostHouse),
            _ => Err(ParseError::UnknownCharacter(c)),
        }
    }

    /// Parses a raw board layout into structured map data.
    ///
    /// # Errors
    ///
    /// Returns an error if a row has the wrong width, the board contains unknown characters,
    /// a start marker appears twice, or a row holds tunnel cells anywhere but its two edges.
    pub fn parse_board(raw_board: [&str; BOARD_CELL_SIZE.y as usize]) -> Result<ParsedMap, ParseError> {
        let width = BOARD_CELL_SIZE.x as usize;
        let mut tiles = [[TileKind::Wall; BOARD_CELL_SIZE.y as usize]; BOARD_CELL_SIZE.x as usize];
        let mut pellets = Vec::new();
        let mut power_pellets = Vec::new();
        let mut player_start: Option<IVec2> = None;
        let mut pursuer_spawns = [None; MAX_PURSUERS];
        let mut house_interior = Vec::new();

        for (y, line) in raw_board.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(ParseError::RowWidth {
                    row: y,
                    found,
                    expected: width,
                });
            }

            let mut tunnel_columns = Vec::new();
            for (x, character) in line.chars().enumerate() {
                let tile = Self::parse_character(character)?;
                let position = IVec2::new(x as i32, y as i32);

                match character {
                    '.' => pellets.push(position),
                    'o' => power_pellets.push(position),
                    'G' => house_interior.push(position),
                    'T' => tunnel_columns.push(x),
                    '0' => {
                        if player_start.replace(position).is_some() {
                            return Err(ParseError::DuplicateMarker(character));
                        }
                    }
                    '1'..='4' => {
                        let slot = character as usize - '1' as usize;
                        if pursuer_spawns[slot].replace(position).is_some() {
                            return Err(ParseError::DuplicateMarker(character));
                        }
                    }
                    _ => {}
                }

                tiles[x][y] = tile;
            }

            if !tunnel_columns.is_empty() && tunnel_columns != [0, width - 1] {
                return Err(ParseError::InvalidTunnelRow(y));
            }
        }

        Ok(ParsedMap {
            tiles,
            pellets,
            power_pellets,
            player_start,
            pursuer_spawns,
            house_interior,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::RAW_BOARD;

    #[test]
    fn test_parse_character() {
        assert_eq!(MapTileParser::parse_character('#'), Ok(TileKind::Wall));
        assert_eq!(MapTileParser::parse_character('.'), Ok(TileKind::Open));
        assert_eq!(MapTileParser::parse_character('o'), Ok(TileKind::Open));
        assert_eq!(MapTileParser::parse_character(' '), Ok(TileKind::Open));
        assert_eq!(MapTileParser::parse_character('T'), Ok(TileKind::Tunnel));
        assert_eq!(MapTileParser::parse_character('='), Ok(TileKind::GhostHouse));
        assert_eq!(MapTileParser::parse_character('G'), Ok(TileKind::GhostHouse));
        assert_eq!(MapTileParser::parse_character('0'), Ok(TileKind::Open));

        assert_eq!(MapTileParser::parse_character('Z'), Err(ParseError::UnknownCharacter('Z')));
    }

    #[test]
    fn test_parse_board() {
        let parsed = MapTileParser::parse_board(RAW_BOARD).unwrap();

        assert_eq!(parsed.tiles.len(), BOARD_CELL_SIZE.x as usize);
        assert_eq!(parsed.tiles[0].len(), BOARD_CELL_SIZE.y as usize);
        assert_eq!(parsed.player_start, Some(IVec2::new(13, 23)));
        assert!(parsed.pursuer_spawns.iter().all(Option::is_some));
        assert_eq!(parsed.power_pellets.len(), 4);
        assert_eq!(parsed.house_interior.len(), 18);
        assert_eq!(parsed.tiles[0][14], TileKind::Tunnel);
        assert_eq!(parsed.tiles[27][14], TileKind::Tunnel);
    }

    #[test]
    fn test_parse_board_invalid_character() {
        let mut invalid_board = RAW_BOARD;
        invalid_board[0] = "###########################Z";

        let result = MapTileParser::parse_board(invalid_board);
        assert_eq!(result.unwrap_err(), ParseError::UnknownCharacter('Z'));
    }

    #[test]
    fn test_parse_board_short_row() {
        let mut invalid_board = RAW_BOARD;
        invalid_board[3] = "#o####";

        let result = MapTileParser::parse_board(invalid_board);
        assert!(matches!(result.unwrap_err(), ParseError::RowWidth { row: 3, found: 6, .. }));
    }

    #[test]
    fn test_parse_board_misplaced_tunnel() {
        let mut invalid_board = RAW_BOARD;
        invalid_board[14] = "T     .   #GGGGGG#   .  T   ";

        let result = MapTileParser::parse_board(invalid_board);
        assert_eq!(result.unwrap_err(), ParseError::InvalidTunnelRow(14));
    }

    #[test]
    fn test_parse_board_duplicate_marker() {
        let mut invalid_board = RAW_BOARD;
        invalid_board[29] = "#............0.............#";

        let result = MapTileParser::parse_board(invalid_board);
        assert_eq!(result.unwrap_err(), ParseError::DuplicateMarker('0'));
    }
}
