use bevy_ecs::event::Event;
use glam::IVec2;

use crate::config::GameConfig;
use crate::map::direction::Direction;
use crate::systems::phase::{Phase, PhaseTransition};

/// Requests from the front-end to the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameCommand {
    /// Queue a direction for the player.
    MovePlayer(Direction),
    /// Discard any current run and start a new one.
    Start(GameConfig),
    /// Stop the current run and return to the menu.
    Stop,
}

/// Notifications emitted by the simulation, drained after every tick.
#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    ItemCollected { tile: IVec2, points: u32 },
    PowerItemCollected { tile: IVec2, points: u32 },
    PursuerCaptured { index: usize, points: u32 },
    LifeLost { remaining: u8 },
    LevelCleared { level: u32 },
    LevelStarted { level: u32 },
    GameOver { score: u32 },
    PhaseChanged { from: Phase, to: Phase },
    /// The game-over delay has elapsed; the front-end should show the menu.
    ReturnToMenu,
}

impl From<PhaseTransition> for GameEvent {
    fn from(transition: PhaseTransition) -> Self {
        GameEvent::PhaseChanged {
            from: transition.from,
            to: transition.to,
        }
    }
}
