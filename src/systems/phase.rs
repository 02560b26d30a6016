//! The global phase scheduler.
//!
//! A single timed phase is active at any moment. Ready hands off to a fixed patrol/pursue
//! schedule; power items preempt it with Vulnerable, which resumes the interrupted phase with
//! whatever time it had left.

use bevy_ecs::{
    event::EventWriter,
    query::{With, Without},
    resource::Resource,
    system::{Query, Res, ResMut},
};
use strum_macros::Display;
use tracing::debug;

use crate::constants::{
    speed::{PLAYER_VULNERABLE_FACTOR, PURSUER_CAPTURED_FACTOR, PURSUER_VULNERABLE_FACTOR},
    timing::{LIFE_LOST_SECONDS, RESPAWN_READY_SECONDS},
};
use crate::events::GameEvent;
use crate::systems::components::{DeltaTime, PlayerControlled, PursuerState, RunState, Velocity};
use crate::systems::lifecycle::SpeedTable;

/// The global mode of the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Phase {
    /// No run has started yet.
    Boot,
    Ready,
    Patrol,
    Pursue,
    Vulnerable,
    LifeLost,
    LevelCleared,
    GameOver,
}

/// The patrol/pursue schedule, walked in order after every Ready phase.
pub const PHASE_SCHEDULE: [(Phase, f32); 6] = [
    (Phase::Patrol, 7.0),
    (Phase::Pursue, 20.0),
    (Phase::Patrol, 7.0),
    (Phase::Pursue, 20.0),
    (Phase::Patrol, 5.0),
    (Phase::Pursue, 20.0),
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PhaseTimer {
    /// Seconds left before the phase expires.
    Finite(f32),
    Indefinite,
}

impl PhaseTimer {
    pub fn remaining(self) -> Option<f32> {
        match self {
            PhaseTimer::Finite(seconds) => Some(seconds),
            PhaseTimer::Indefinite => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseTransition {
    pub from: Phase,
    pub to: Phase,
}

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct PhaseScheduler {
    phase: Phase,
    timer: PhaseTimer,
    /// Index into [`PHASE_SCHEDULE`]; past the end means pursue indefinitely.
    cursor: usize,
    /// The phase a Vulnerable window interrupted, with the time it had left.
    resume: Option<(Phase, PhaseTimer)>,
}

impl Default for PhaseScheduler {
    fn default() -> Self {
        Self {
            phase: Phase::Boot,
            timer: PhaseTimer::Indefinite,
            cursor: 0,
            resume: None,
        }
    }
}

impl PhaseScheduler {
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn timer(&self) -> PhaseTimer {
        self.timer
    }

    /// Seconds left in the current phase, if it is timed.
    pub fn remaining(&self) -> Option<f32> {
        self.timer.remaining()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The phase that will resume once the current Vulnerable window ends.
    pub fn resume_phase(&self) -> Option<Phase> {
        self.resume.map(|(phase, _)| phase)
    }

    fn set(&mut self, phase: Phase, timer: PhaseTimer) -> PhaseTransition {
        let from = self.phase;
        self.phase = phase;
        self.timer = timer;
        PhaseTransition { from, to: phase }
    }

    fn enter_schedule(&mut self, cursor: usize) -> PhaseTransition {
        self.cursor = cursor;
        match PHASE_SCHEDULE.get(cursor) {
            Some(&(phase, seconds)) => self.set(phase, PhaseTimer::Finite(seconds)),
            None => self.set(Phase::Pursue, PhaseTimer::Indefinite),
        }
    }

    /// Enters Ready. Its expiry restarts the schedule from the first entry.
    pub fn enter_ready(&mut self, seconds: f32) -> PhaseTransition {
        self.resume = None;
        self.set(Phase::Ready, PhaseTimer::Finite(seconds))
    }

    /// Preempts the current phase with a Vulnerable window.
    ///
    /// A window opened while one is already running only restarts the timer; the phase to resume
    /// stays the one the first window interrupted.
    pub fn enter_vulnerable(&mut self, seconds: f32) -> PhaseTransition {
        if self.phase != Phase::Vulnerable {
            self.resume = Some((self.phase, self.timer));
        }
        self.set(Phase::Vulnerable, PhaseTimer::Finite(seconds))
    }

    pub fn enter_life_lost(&mut self) -> PhaseTransition {
        self.resume = None;
        self.set(Phase::LifeLost, PhaseTimer::Finite(LIFE_LOST_SECONDS))
    }

    /// Level clear holds until the level-advance action replaces it.
    pub fn enter_level_cleared(&mut self) -> PhaseTransition {
        self.resume = None;
        self.set(Phase::LevelCleared, PhaseTimer::Indefinite)
    }

    pub fn enter_game_over(&mut self) -> PhaseTransition {
        self.resume = None;
        self.set(Phase::GameOver, PhaseTimer::Indefinite)
    }

    /// Advances the phase timer by `seconds`, returning the transition if the phase expired.
    pub fn tick(&mut self, seconds: f32) -> Option<PhaseTransition> {
        let PhaseTimer::Finite(remaining) = self.timer else {
            return None;
        };

        let remaining = remaining - seconds;
        if remaining > 0.0 {
            self.timer = PhaseTimer::Finite(remaining);
            return None;
        }

        let transition = match self.phase {
            Phase::Ready => self.enter_schedule(0),
            Phase::Patrol | Phase::Pursue => self.enter_schedule(self.cursor + 1),
            Phase::Vulnerable => match self.resume.take() {
                Some((phase, timer)) => self.set(phase, timer),
                None => self.enter_schedule(self.cursor),
            },
            Phase::LifeLost => self.set(Phase::Ready, PhaseTimer::Finite(RESPAWN_READY_SECONDS)),
            Phase::Boot | Phase::LevelCleared | Phase::GameOver => {
                self.timer = PhaseTimer::Indefinite;
                return None;
            }
        };

        Some(transition)
    }
}

/// Advances the phase timer and applies the side effects of expiries.
///
/// The end of a Vulnerable window resets the capture combo and returns every still-vulnerable
/// pursuer to normal. While the window is open, pursuer countdowns mirror the phase timer.
pub fn phase_system(
    delta_time: Res<DeltaTime>,
    mut scheduler: ResMut<PhaseScheduler>,
    mut run: ResMut<RunState>,
    mut pursuers: Query<&mut PursuerState>,
    mut events: EventWriter<GameEvent>,
) {
    if let Some(transition) = scheduler.tick(delta_time.seconds) {
        if transition.from == Phase::Vulnerable {
            run.combo = 0;
            for mut state in pursuers.iter_mut() {
                if state.is_vulnerable() {
                    *state = PursuerState::Normal;
                }
            }
        }

        debug!(from = %transition.from, to = %transition.to, cursor = scheduler.cursor(), "Phase changed");
        events.write(transition.into());
    }

    if let (Phase::Vulnerable, Some(remaining)) = (scheduler.phase(), scheduler.remaining()) {
        for mut state in pursuers.iter_mut() {
            if let PursuerState::Vulnerable { remaining: countdown } = &mut *state {
                *countdown = remaining;
            }
        }
    }
}

/// Derives every agent's speed from the level's base speeds, the phase and pursuer state.
pub fn speed_system(
    speeds: Res<SpeedTable>,
    scheduler: Res<PhaseScheduler>,
    mut players: Query<&mut Velocity, With<PlayerControlled>>,
    mut pursuers: Query<(&PursuerState, &mut Velocity), Without<PlayerControlled>>,
) {
    let player_factor = if scheduler.phase() == Phase::Vulnerable {
        PLAYER_VULNERABLE_FACTOR
    } else {
        1.0
    };
    for mut velocity in players.iter_mut() {
        velocity.speed = speeds.player * player_factor;
    }

    for (state, mut velocity) in pursuers.iter_mut() {
        let factor = match state {
            PursuerState::Normal => 1.0,
            PursuerState::Vulnerable { .. } => PURSUER_VULNERABLE_FACTOR,
            PursuerState::Captured => PURSUER_CAPTURED_FACTOR,
        };
        velocity.speed = speeds.pursuer * factor;
    }
}
