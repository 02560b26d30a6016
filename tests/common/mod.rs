#![allow(dead_code)]

use bevy_ecs::{
    entity::Entity,
    event::Events,
    query::With,
    world::World,
};
use glam::{IVec2, Vec2};
use mazechase::{
    config::{Difficulty, GameConfig},
    constants::RAW_BOARD,
    events::GameEvent,
    game::Game,
    map::{builder::Maze, direction::Direction},
    systems::{
        BufferedDirection, Collectibles, DeferredActions, DeltaTime, PhaseScheduler, PlayerBundle, PlayerControlled,
        Position, PreviousDirection, Pursuer, PursuerBundle, PursuerState, RunState, SimRng, SpeedTable, Velocity,
    },
};

pub const TEST_SEED: u64 = 42;

/// One frame at 60 FPS.
pub const FRAME: f32 = 1.0 / 60.0;

/// Default configuration with a fixed seed.
pub fn test_config() -> GameConfig {
    GameConfig {
        seed: Some(TEST_SEED),
        ..GameConfig::default()
    }
}

pub fn create_test_game() -> Game {
    create_game_with(test_config())
}

pub fn create_game_with(config: GameConfig) -> Game {
    Game::new(&config).expect("Failed to create test game")
}

/// Creates a test map using the default RAW_BOARD
pub fn create_test_map() -> Maze {
    Maze::new(RAW_BOARD).expect("Failed to create test map")
}

/// Creates a world holding every resource the systems read, with no entities and no items.
pub fn create_test_world() -> World {
    let mut world = World::new();
    let settings = Difficulty::Normal.settings();

    world.insert_resource(Events::<GameEvent>::default());
    world.insert_resource(create_test_map());
    world.insert_resource(settings);
    world.insert_resource(SpeedTable::new(&settings));
    world.insert_resource(PhaseScheduler::default());
    world.insert_resource(RunState::new(3));
    world.insert_resource(Collectibles::default());
    world.insert_resource(DeferredActions::default());
    world.insert_resource(DeltaTime::from_ticks(1));
    world.insert_resource(SimRng::new(Some(TEST_SEED)));

    world
}

/// Spawns a player centered on `tile`.
pub fn spawn_test_player(world: &mut World, tile: IVec2, heading: Option<Direction>) -> Entity {
    world
        .spawn(PlayerBundle {
            player: PlayerControlled,
            position: Position(Maze::tile_center(tile)),
            velocity: Velocity { heading, speed: 90.0 },
            buffered_direction: BufferedDirection(None),
        })
        .id()
}

/// Spawns a pursuer centered on `tile`.
pub fn spawn_test_pursuer(world: &mut World, index: usize, tile: IVec2, state: PursuerState) -> Entity {
    world
        .spawn(PursuerBundle {
            pursuer: Pursuer { index },
            state,
            position: Position(Maze::tile_center(tile)),
            velocity: Velocity {
                heading: Some(Direction::Right),
                speed: 80.0,
            },
            previous_direction: PreviousDirection(Some(Direction::Right)),
        })
        .id()
}

/// Takes every pending game event out of a bare world.
pub fn drain_events(world: &mut World) -> Vec<GameEvent> {
    world.resource_mut::<Events<GameEvent>>().drain().collect()
}

/// Parks the player on `tile`, stopped and with nothing buffered.
pub fn place_player(game: &mut Game, tile: IVec2) {
    let mut query = game
        .world
        .query_filtered::<(&mut Position, &mut Velocity, &mut BufferedDirection), With<PlayerControlled>>();
    for (mut position, mut velocity, mut buffered) in query.iter_mut(&mut game.world) {
        position.0 = Maze::tile_center(tile);
        velocity.heading = None;
        buffered.0 = None;
    }
}

/// Moves pursuer `index` onto an exact pixel position.
pub fn place_pursuer(game: &mut Game, index: usize, position: Vec2) {
    let mut query = game.world.query::<(&Pursuer, &mut Position)>();
    for (pursuer, mut pos) in query.iter_mut(&mut game.world) {
        if pursuer.index == index {
            pos.0 = position;
        }
    }
}

pub fn player_position(game: &mut Game) -> Vec2 {
    game.snapshot().player.position
}

pub fn pursuer_states(game: &mut Game) -> Vec<PursuerState> {
    game.snapshot().pursuers.iter().map(|pursuer| pursuer.state).collect()
}

/// Expires the opening Ready phase without moving anything.
pub fn skip_ready(game: &mut Game) {
    let mut scheduler = game.world.resource_mut::<PhaseScheduler>();
    let remaining = scheduler.remaining().unwrap_or_default();
    scheduler.tick(remaining);
}

/// Ticks `frames` frames of [`FRAME`] seconds, collecting every event.
pub fn run_frames(game: &mut Game, frames: usize) -> Vec<GameEvent> {
    (0..frames).flat_map(|_| game.tick(FRAME)).collect()
}
