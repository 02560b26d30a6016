//! Centralized error types for the simulation.
//!
//! Ticking the simulation never fails; every error here is raised while a run is being
//! constructed (parsing the board layout, validating or loading configuration).

/// Main error type for the simulation.
///
/// This is the primary error type that should be used in public APIs.
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    #[error("Map parsing error: {0}")]
    MapParse(#[from] ParseError),

    #[error("Map error: {0}")]
    Map(#[from] MapError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Error type for map parsing operations.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown character in board: {0:?}")]
    UnknownCharacter(char),
    #[error("Row {row} has {found} columns, expected {expected}")]
    RowWidth { row: usize, found: usize, expected: usize },
    #[error("Duplicate start marker: {0:?}")]
    DuplicateMarker(char),
    #[error("Tunnel row {0} must have exactly one tunnel cell at each edge")]
    InvalidTunnelRow(usize),
}

/// Errors related to map construction.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum MapError {
    #[error("Player starting position not found")]
    MissingPlayerStart,

    #[error("No pursuer spawn positions found")]
    MissingPursuerSpawns,

    #[error("Ghost house has no interior")]
    MissingGhostHouse,
}

/// Errors related to loading or validating run configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Failed to extract configuration: {0}")]
    Extract(#[from] Box<figment::Error>),

    #[error("Pursuer count must be between 1 and {max}, found {found}")]
    PursuerCount { found: u8, max: usize },

    #[error("Starting lives must be at least 1")]
    NoLives,
}

/// Result type for simulation construction.
pub type GameResult<T> = Result<T, GameError>;
