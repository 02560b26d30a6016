//! Key bindings between the front-end and the session.

use std::collections::HashMap;

use bitflags::bitflags;
use tracing::trace;

use crate::config::GameConfig;
use crate::events::GameCommand;
use crate::map::direction::Direction;

/// The keys the simulation understands, independent of any windowing library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    W,
    A,
    S,
    D,
    Enter,
    Escape,
}

bitflags! {
    /// Which key groups may steer the player.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ControlScheme: u8 {
        const ARROWS = 1 << 0;
        const WASD = 1 << 1;
        const BOTH = Self::ARROWS.bits() | Self::WASD.bits();
    }
}

#[derive(Debug, Clone)]
pub struct Bindings {
    key_bindings: HashMap<Key, GameCommand>,
}

impl Bindings {
    /// Bindings for a run with the given configuration.
    ///
    /// Movement keys outside the configured scheme are left unbound. Enter starts a run with
    /// `config`; Escape stops it.
    pub fn new(config: GameConfig) -> Self {
        let scheme = config.controls.scheme();
        let mut key_bindings = HashMap::new();

        if scheme.contains(ControlScheme::ARROWS) {
            key_bindings.insert(Key::Up, GameCommand::MovePlayer(Direction::Up));
            key_bindings.insert(Key::Down, GameCommand::MovePlayer(Direction::Down));
            key_bindings.insert(Key::Left, GameCommand::MovePlayer(Direction::Left));
            key_bindings.insert(Key::Right, GameCommand::MovePlayer(Direction::Right));
        }
        if scheme.contains(ControlScheme::WASD) {
            key_bindings.insert(Key::W, GameCommand::MovePlayer(Direction::Up));
            key_bindings.insert(Key::S, GameCommand::MovePlayer(Direction::Down));
            key_bindings.insert(Key::A, GameCommand::MovePlayer(Direction::Left));
            key_bindings.insert(Key::D, GameCommand::MovePlayer(Direction::Right));
        }

        key_bindings.insert(Key::Enter, GameCommand::Start(config));
        key_bindings.insert(Key::Escape, GameCommand::Stop);

        Self { key_bindings }
    }

    /// The command bound to `key`, if any.
    pub fn command_for(&self, key: Key) -> Option<GameCommand> {
        let command = self.key_bindings.get(&key).copied();
        if command.is_none() {
            trace!(?key, "Ignoring unbound key");
        }
        command
    }
}

impl Default for Bindings {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}
