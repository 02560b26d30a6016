//! The session: owns at most one run and routes front-end commands to it.

use tracing::{debug, info};

use crate::config::GameConfig;
use crate::error::GameResult;
use crate::events::{GameCommand, GameEvent};
use crate::game::{Game, Snapshot};
use crate::systems::Phase;

/// Wraps the current [`Game`], if any. With no game the session is in Boot.
#[derive(Default)]
pub struct Session {
    game: Option<Game>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any current run with a brand-new one.
    pub fn start(&mut self, config: GameConfig) -> GameResult<()> {
        let game = Game::new(&config)?;
        if self.game.replace(game).is_some() {
            debug!("Previous game discarded");
        }
        Ok(())
    }

    /// Stops the current run. The final state stays readable.
    pub fn stop(&mut self) {
        if let Some(game) = self.game.as_mut() {
            game.stop();
        }
    }

    pub fn handle(&mut self, command: GameCommand) -> GameResult<()> {
        match command {
            GameCommand::MovePlayer(direction) => {
                if let Some(game) = self.game.as_mut() {
                    game.queue_direction(direction);
                }
            }
            GameCommand::Start(config) => self.start(config)?,
            GameCommand::Stop => self.stop(),
        }
        Ok(())
    }

    /// Ticks the current run. Once the run announces the return to the menu it is stopped.
    pub fn tick(&mut self, dt: f32) -> Vec<GameEvent> {
        let Some(game) = self.game.as_mut() else {
            return Vec::new();
        };

        let events = game.tick(dt);
        if events.contains(&GameEvent::ReturnToMenu) {
            info!("Run finished");
            game.stop();
        }
        events
    }

    pub fn phase(&self) -> Phase {
        self.game.as_ref().map_or(Phase::Boot, Game::phase)
    }

    /// True while a run exists and has not been stopped.
    pub fn is_active(&self) -> bool {
        self.game.as_ref().is_some_and(|game| !game.is_stopped())
    }

    pub fn game(&self) -> Option<&Game> {
        self.game.as_ref()
    }

    pub fn game_mut(&mut self) -> Option<&mut Game> {
        self.game.as_mut()
    }

    pub fn snapshot(&mut self) -> Option<Snapshot> {
        self.game.as_mut().map(Game::snapshot)
    }
}
