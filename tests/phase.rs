use bevy_ecs::system::RunSystemOnce;
use glam::IVec2;
use mazechase::{
    events::GameEvent,
    systems::{
        phase_system, speed_system, DeltaTime, Phase, PhaseScheduler, PhaseTimer, PhaseTransition, PursuerState, RunState,
        Velocity, PHASE_SCHEDULE,
    },
};
use pretty_assertions::assert_eq;
use speculoos::prelude::*;

mod common;

fn scheduler_in_patrol() -> PhaseScheduler {
    let mut scheduler = PhaseScheduler::default();
    scheduler.enter_ready(2.0);
    scheduler.tick(2.0);
    scheduler
}

#[test]
fn test_ready_hands_off_to_first_patrol() {
    let scheduler = scheduler_in_patrol();

    assert_that(&scheduler.phase()).is_equal_to(Phase::Patrol);
    assert_that(&scheduler.cursor()).is_equal_to(0);
    assert_that(&scheduler.timer()).is_equal_to(PhaseTimer::Finite(7.0));
}

#[test]
fn test_schedule_walks_in_order_then_pursues_forever() {
    let mut scheduler = scheduler_in_patrol();
    let mut visited = vec![(scheduler.phase(), scheduler.remaining())];

    for (_, seconds) in PHASE_SCHEDULE {
        scheduler.tick(seconds);
        visited.push((scheduler.phase(), scheduler.remaining()));
    }

    let mut expected: Vec<_> = PHASE_SCHEDULE
        .iter()
        .map(|&(phase, seconds)| (phase, Some(seconds)))
        .collect();
    expected.push((Phase::Pursue, None));
    assert_eq!(visited, expected);

    // Indefinite pursuit never expires.
    assert_that(&scheduler.tick(1000.0)).is_none();
    assert_that(&scheduler.phase()).is_equal_to(Phase::Pursue);
}

#[test]
fn test_vulnerable_resumes_interrupted_phase_with_time_left() {
    let mut scheduler = scheduler_in_patrol();
    scheduler.tick(3.0);

    let transition = scheduler.enter_vulnerable(6.0);
    assert_that(&transition).is_equal_to(PhaseTransition {
        from: Phase::Patrol,
        to: Phase::Vulnerable,
    });
    assert_that(&scheduler.resume_phase()).is_equal_to(Some(Phase::Patrol));

    let transition = scheduler.tick(6.0);
    assert_that(&transition).is_equal_to(Some(PhaseTransition {
        from: Phase::Vulnerable,
        to: Phase::Patrol,
    }));
    assert_that(&scheduler.remaining()).is_equal_to(Some(4.0));
    // Interrupts do not move the schedule cursor.
    assert_that(&scheduler.cursor()).is_equal_to(0);
}

#[test]
fn test_second_power_window_restarts_timer_but_keeps_resume_point() {
    let mut scheduler = scheduler_in_patrol();
    scheduler.tick(7.0);
    assert_that(&scheduler.phase()).is_equal_to(Phase::Pursue);

    scheduler.enter_vulnerable(6.0);
    scheduler.tick(4.0);
    scheduler.enter_vulnerable(6.0);

    assert_that(&scheduler.remaining()).is_equal_to(Some(6.0));
    assert_that(&scheduler.resume_phase()).is_equal_to(Some(Phase::Pursue));

    scheduler.tick(6.0);
    assert_that(&scheduler.phase()).is_equal_to(Phase::Pursue);
    assert_that(&scheduler.remaining()).is_equal_to(Some(20.0));
    assert_that(&scheduler.cursor()).is_equal_to(1);
}

#[test]
fn test_life_lost_leads_to_short_ready() {
    let mut scheduler = scheduler_in_patrol();
    scheduler.enter_life_lost();
    assert_that(&scheduler.remaining()).is_equal_to(Some(1.5));

    scheduler.tick(1.5);
    assert_that(&scheduler.phase()).is_equal_to(Phase::Ready);
    assert_that(&scheduler.remaining()).is_equal_to(Some(1.2));

    scheduler.tick(1.2);
    assert_that(&scheduler.phase()).is_equal_to(Phase::Patrol);
    assert_that(&scheduler.cursor()).is_equal_to(0);
}

#[test]
fn test_terminal_phases_hold() {
    let mut scheduler = scheduler_in_patrol();
    scheduler.enter_level_cleared();
    assert_that(&scheduler.tick(100.0)).is_none();
    assert_that(&scheduler.phase()).is_equal_to(Phase::LevelCleared);

    scheduler.enter_game_over();
    assert_that(&scheduler.tick(100.0)).is_none();
    assert_that(&scheduler.phase()).is_equal_to(Phase::GameOver);
}

#[test]
fn test_expiry_reverts_every_vulnerable_pursuer_and_resets_combo() {
    let mut world = common::create_test_world();
    common::spawn_test_player(&mut world, IVec2::new(1, 5), None);
    let first = common::spawn_test_pursuer(&mut world, 0, IVec2::new(6, 5), PursuerState::Vulnerable { remaining: 6.0 });
    // Slaved to the global timer even when its own countdown says otherwise.
    let second = common::spawn_test_pursuer(&mut world, 1, IVec2::new(9, 5), PursuerState::Vulnerable { remaining: 60.0 });
    let captured = common::spawn_test_pursuer(&mut world, 2, IVec2::new(12, 5), PursuerState::Captured);

    world.insert_resource(scheduler_in_patrol());
    world.resource_mut::<PhaseScheduler>().enter_vulnerable(0.01);
    world.resource_mut::<RunState>().combo = 2;
    world.insert_resource(DeltaTime::from_seconds(0.05));

    world.run_system_once(phase_system).expect("System should run successfully");

    assert_that(world.get::<PursuerState>(first).unwrap()).is_equal_to(&PursuerState::Normal);
    assert_that(world.get::<PursuerState>(second).unwrap()).is_equal_to(&PursuerState::Normal);
    assert_that(world.get::<PursuerState>(captured).unwrap()).is_equal_to(&PursuerState::Captured);
    assert_that(&world.resource::<RunState>().combo).is_equal_to(0);
    assert_that(&world.resource::<PhaseScheduler>().phase()).is_equal_to(Phase::Patrol);

    let events = common::drain_events(&mut world);
    assert_that(&events).contains(GameEvent::PhaseChanged {
        from: Phase::Vulnerable,
        to: Phase::Patrol,
    });
}

#[test]
fn test_vulnerable_countdown_mirrors_phase_timer() {
    let mut world = common::create_test_world();
    common::spawn_test_player(&mut world, IVec2::new(1, 5), None);
    let pursuer = common::spawn_test_pursuer(&mut world, 0, IVec2::new(6, 5), PursuerState::Vulnerable { remaining: 6.0 });

    world.insert_resource(scheduler_in_patrol());
    world.resource_mut::<PhaseScheduler>().enter_vulnerable(6.0);
    world.insert_resource(DeltaTime::from_seconds(0.5));

    world.run_system_once(phase_system).expect("System should run successfully");

    assert_that(world.get::<PursuerState>(pursuer).unwrap()).is_equal_to(&PursuerState::Vulnerable { remaining: 5.5 });
}

#[test]
fn test_speed_follows_phase_and_state() {
    let mut world = common::create_test_world();
    let player = common::spawn_test_player(&mut world, IVec2::new(1, 5), None);
    let normal = common::spawn_test_pursuer(&mut world, 0, IVec2::new(6, 5), PursuerState::Normal);
    let vulnerable = common::spawn_test_pursuer(&mut world, 1, IVec2::new(9, 5), PursuerState::Vulnerable { remaining: 6.0 });
    let captured = common::spawn_test_pursuer(&mut world, 2, IVec2::new(12, 5), PursuerState::Captured);

    world.insert_resource(scheduler_in_patrol());
    world.run_system_once(speed_system).expect("System should run successfully");
    assert_that(&world.get::<Velocity>(player).unwrap().speed).is_equal_to(90.0);
    assert_that(&world.get::<Velocity>(normal).unwrap().speed).is_equal_to(80.0);
    assert_that(&(world.get::<Velocity>(vulnerable).unwrap().speed - 56.0).abs()).is_less_than(1e-3);
    assert_that(&(world.get::<Velocity>(captured).unwrap().speed - 96.0).abs()).is_less_than(1e-3);

    world.resource_mut::<PhaseScheduler>().enter_vulnerable(6.0);
    world.run_system_once(speed_system).expect("System should run successfully");
    assert_that(&(world.get::<Velocity>(player).unwrap().speed - 94.5).abs()).is_less_than(1e-3);
}
