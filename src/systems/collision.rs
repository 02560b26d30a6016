use bevy_ecs::{
    event::EventWriter,
    system::{Res, ResMut},
};
use smallvec::SmallVec;
use tracing::{debug, info};

use crate::constants::{
    collider::CONTACT_DISTANCE,
    scoring::{CAPTURE_BASE_POINTS, MAX_COMBO},
    timing::RETURN_TO_MENU_DELAY_SECONDS,
};
use crate::events::GameEvent;
use crate::map::builder::Maze;
use crate::systems::components::{PursuerState, RunState};
use crate::systems::lifecycle::{reset_actors, DeferredAction, DeferredActions, PlayerActors, PursuerActors};
use crate::systems::phase::{Phase, PhaseScheduler};

/// Points for a capture made with the given combo count: 200, 400, 800, then 1600 thereafter.
pub fn capture_points(combo: u8) -> u32 {
    CAPTURE_BASE_POINTS << combo.min(MAX_COMBO)
}

/// True when the center distance between two agents counts as contact.
pub fn in_contact(a: glam::Vec2, b: glam::Vec2) -> bool {
    a.distance(b) < CONTACT_DISTANCE
}

/// Resolves contact between the player and pursuers, in pursuer index order.
///
/// Touching a vulnerable pursuer captures it. Touching a normal one outside Ready and LifeLost
/// costs a life and ends the check for this tick; captured pursuers are harmless.
#[allow(clippy::too_many_arguments)]
pub fn collision_system(
    maze: Res<Maze>,
    mut run: ResMut<RunState>,
    mut scheduler: ResMut<PhaseScheduler>,
    mut deferred: ResMut<DeferredActions>,
    mut events: EventWriter<GameEvent>,
    mut players: PlayerActors,
    mut pursuers: PursuerActors,
) {
    let Ok((player_position, ..)) = players.single() else {
        return;
    };
    let player_position = player_position.0;
    let lethal_phase = !matches!(scheduler.phase(), Phase::Ready | Phase::LifeLost);

    let mut caught = false;
    {
        let mut ordered: SmallVec<[_; 4]> = pursuers.iter_mut().collect();
        ordered.sort_by_key(|(pursuer, ..)| pursuer.index);

        for (pursuer, mut state, position, ..) in ordered {
            if !in_contact(player_position, position.0) {
                continue;
            }

            match *state {
                PursuerState::Vulnerable { .. } => {
                    let points = capture_points(run.combo);
                    run.score += points;
                    run.combo = (run.combo + 1).min(MAX_COMBO);
                    *state = PursuerState::Captured;

                    debug!(index = pursuer.index, points, combo = run.combo, "Pursuer captured");
                    events.write(GameEvent::PursuerCaptured {
                        index: pursuer.index,
                        points,
                    });
                }
                PursuerState::Normal if lethal_phase => {
                    debug!(index = pursuer.index, "Player caught");
                    caught = true;
                    break;
                }
                _ => {}
            }
        }
    }

    if !caught {
        return;
    }

    run.lives = run.lives.saturating_sub(1);
    run.combo = 0;
    events.write(GameEvent::LifeLost { remaining: run.lives });

    if run.lives == 0 {
        run.running = false;
        let transition = scheduler.enter_game_over();
        deferred.schedule(DeferredAction::ReturnToMenu, RETURN_TO_MENU_DELAY_SECONDS);

        info!(score = run.score, level = run.level, "Game over");
        events.write(transition.into());
        events.write(GameEvent::GameOver { score: run.score });
    } else {
        reset_actors(&maze, &mut players, &mut pursuers);
        let transition = scheduler.enter_life_lost();

        info!(lives = run.lives, "Life lost");
        events.write(transition.into());
    }
}
