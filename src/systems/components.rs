use bevy_ecs::{bundle::Bundle, component::Component, resource::Resource};
use glam::Vec2;
use rand::{rngs::SmallRng, SeedableRng};

use crate::map::direction::Direction;

/// A tag component for the entity that is controlled by the player.
#[derive(Default, Component)]
pub struct PlayerControlled;

/// Continuous pixel position of an agent's center.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct Position(pub Vec2);

/// Heading and speed of an agent. A `None` heading means the agent is stopped.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Velocity {
    pub heading: Option<Direction>,
    /// Pixels per second.
    pub speed: f32,
}

/// The direction the player most recently asked for, applied at the next center alignment.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BufferedDirection(pub Option<Direction>);

/// Identity of a pursuer. Pursuers are processed in ascending index order.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Pursuer {
    pub index: usize,
}

/// Behavior state of a pursuer.
///
/// Patrol and pursue are both `Normal`; which one applies is decided by the global phase.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub enum PursuerState {
    #[default]
    Normal,
    /// Capturable. `remaining` mirrors the global phase timer and is for display only.
    Vulnerable { remaining: f32 },
    /// Caught while vulnerable; heading home to respawn.
    Captured,
}

impl PursuerState {
    pub fn is_vulnerable(&self) -> bool {
        matches!(self, PursuerState::Vulnerable { .. })
    }

    pub fn is_captured(&self) -> bool {
        matches!(self, PursuerState::Captured)
    }
}

/// The last non-`None` heading of a pursuer, used to avoid reversing after a stop.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PreviousDirection(pub Option<Direction>);

#[derive(Bundle)]
pub struct PlayerBundle {
    pub player: PlayerControlled,
    pub position: Position,
    pub velocity: Velocity,
    pub buffered_direction: BufferedDirection,
}

#[derive(Bundle)]
pub struct PursuerBundle {
    pub pursuer: Pursuer,
    pub state: PursuerState,
    pub position: Position,
    pub velocity: Velocity,
    pub previous_direction: PreviousDirection,
}

#[derive(Resource, Debug, Clone, Copy)]
pub struct DeltaTime {
    /// Floating-point delta time in seconds
    pub seconds: f32,
}

impl DeltaTime {
    /// Creates a new DeltaTime from a floating-point delta time in seconds
    pub fn from_seconds(seconds: f32) -> Self {
        Self { seconds }
    }

    /// Creates a new DeltaTime from an integer tick delta, assuming 60 ticks per second
    pub fn from_ticks(ticks: u32) -> Self {
        Self {
            seconds: ticks as f32 / 60.0,
        }
    }
}

impl Default for DeltaTime {
    fn default() -> Self {
        Self::from_ticks(0)
    }
}

/// Score, level, lives and combo for the current run.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunState {
    pub score: u32,
    /// Starts at 1.
    pub level: u32,
    pub lives: u8,
    /// Captures made in the current vulnerable window, capped.
    pub combo: u8,
    /// Phase timers, movement and collisions only advance while this is set.
    pub running: bool,
}

impl RunState {
    pub fn new(lives: u8) -> Self {
        Self {
            score: 0,
            level: 1,
            lives,
            combo: 0,
            running: true,
        }
    }
}

/// Random source for pursuer decisions.
#[derive(Resource, Debug)]
pub struct SimRng(pub SmallRng);

impl SimRng {
    /// A reproducible generator when a seed is given, an OS-seeded one otherwise.
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self(SmallRng::seed_from_u64(seed)),
            None => Self(SmallRng::from_os_rng()),
        }
    }
}
