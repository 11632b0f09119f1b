use super::*;
use crate::rng::FixedSequence;

fn running_session() -> GameSession {
    let config = GameConfig::default().with_canvas(800.0, 600.0);
    let mut session = GameSession::new(config, 0xDEAD_BEEF).expect("default config is valid");
    assert!(session.start());
    session
}

fn rock(x: f64, y: f64, size: f64) -> Asteroid {
    Asteroid {
        x,
        y,
        size,
        speed: 2.0,
        rotation: 0.0,
        rotation_speed: 0.0,
        color: "#8b7355",
    }
}

const UP: InputState = InputState {
    up: true,
    down: false,
};

const DOWN: InputState = InputState {
    up: false,
    down: true,
};

#[test]
fn update_is_a_no_op_until_started() {
    let config = GameConfig::default();
    let mut session = GameSession::new(config, 7).unwrap();
    let stars_before = session.stars().to_vec();

    assert_eq!(session.update(0.1, UP), UpdateOutcome::default());
    assert_eq!(session.elapsed(), 0.0);
    assert_eq!(session.ship().y, 280.0);
    assert_eq!(session.stars(), stars_before.as_slice());
}

#[test]
fn five_short_frames_spawn_exactly_once() {
    let mut session = running_session();
    let mut spawned = Vec::new();
    for _ in 0..5 {
        let outcome = session.update(0.1, InputState::IDLE);
        assert_eq!(outcome.collision, None);
        spawned.push(outcome.spawned);
    }

    assert!((session.elapsed() - 0.5).abs() < 1e-9);
    assert_eq!(spawned, vec![false, false, false, false, true]);
    assert_eq!(session.asteroids().len(), 1);
    assert_eq!(session.spawn_timer(), 0.0);
    assert_eq!(session.state(), SessionState::Running);
}

#[test]
fn collision_ends_the_run_and_skips_spawning() {
    let mut session = running_session();
    session.spawn_timer = 10.0;
    session.insert_asteroid(rock(600.0, 10.0, 30.0));
    session.insert_asteroid(rock(70.0, 290.0, 20.0));

    let outcome = session.update(0.0, InputState::IDLE);
    assert_eq!(outcome.collision, Some(1));
    assert!(!outcome.spawned);
    assert_eq!(session.state(), SessionState::GameOver);
    assert_eq!(session.asteroids().len(), 2);
    assert_eq!(session.spawn_timer(), 10.0);

    // Frozen until restarted.
    assert_eq!(session.update(1.0, UP), UpdateOutcome::default());
}

#[test]
fn off_screen_asteroids_are_pruned_once() {
    let mut session = running_session();
    session.insert_asteroid(rock(-20.0, 0.0, 20.0));
    session.insert_asteroid(rock(-19.0, 0.0, 20.0));
    session.insert_asteroid(rock(-50.0, 0.0, 25.0));

    let first = session.update(0.0, InputState::IDLE);
    assert_eq!(first.pruned, 2);
    assert_eq!(session.asteroids().len(), 1);
    assert_eq!(session.asteroids()[0].x, -19.0);

    let second = session.update(0.0, InputState::IDLE);
    assert_eq!(second.pruned, 0);
    assert_eq!(session.asteroids().len(), 1);
}

#[test]
fn pruning_keeps_survivors_in_order() {
    let mut session = running_session();
    for x in [-30.0, 300.0, -40.0, 400.0, 500.0, -60.0] {
        session.insert_asteroid(rock(x, 0.0, 20.0));
    }

    let outcome = session.update(0.0, InputState::IDLE);
    assert_eq!(outcome.pruned, 3);
    let xs: Vec<f64> = session.asteroids().iter().map(|a| a.x).collect();
    assert_eq!(xs, vec![300.0, 400.0, 500.0]);
}

#[test]
fn only_off_screen_asteroids_empty_in_one_update() {
    let mut session = running_session();
    session.insert_asteroid(rock(-20.0, 0.0, 20.0));
    session.insert_asteroid(rock(-100.0, 300.0, 30.0));
    session.insert_asteroid(rock(-45.0, 500.0, 25.0));

    let outcome = session.update(0.0, InputState::IDLE);
    assert_eq!(outcome.pruned, 3);
    assert!(session.asteroids().is_empty());
}

#[test]
fn inactive_updates_leave_ship_and_asteroids_alone() {
    fn frozen(session: &mut GameSession) {
        let ship = *session.ship();
        let asteroids = session.asteroids().to_vec();
        let elapsed = session.elapsed();

        assert_eq!(session.update(1.0, UP), UpdateOutcome::default());
        assert_eq!(*session.ship(), ship);
        assert_eq!(session.asteroids(), asteroids.as_slice());
        assert_eq!(session.elapsed(), elapsed);
    }

    let mut paused = running_session();
    paused.insert_asteroid(rock(400.0, 100.0, 20.0));
    paused.update(0.1, DOWN);
    assert!(paused.pause());
    frozen(&mut paused);

    let mut over = running_session();
    over.spawn_timer = 10.0;
    over.insert_asteroid(rock(600.0, 10.0, 30.0));
    over.insert_asteroid(rock(70.0, 290.0, 20.0));
    over.update(0.0, InputState::IDLE);
    assert_eq!(over.state(), SessionState::GameOver);
    frozen(&mut over);
}

#[test]
fn asteroids_move_and_spin_with_time() {
    let mut session = running_session();
    let mut asteroid = rock(700.0, 0.0, 20.0);
    asteroid.rotation_speed = 1.5;
    session.insert_asteroid(asteroid);

    session.update(0.1, InputState::IDLE);
    let moved = &session.asteroids()[0];
    // 2 * 60 * 0.1
    assert!((moved.x - 688.0).abs() < 1e-9);
    assert!((moved.rotation - 0.15).abs() < 1e-9);
}

#[test]
fn ship_is_clamped_to_the_play_area() {
    // No spawns, so nothing can end the run while the ship drifts.
    let config = GameConfig {
        spawn_interval_base: 1.0e9,
        spawn_interval_min: 1.0e9,
        ..GameConfig::default()
    };
    let mut session = GameSession::new(config, 3).unwrap();
    session.start();

    for _ in 0..100 {
        session.update(0.1, UP);
    }
    assert_eq!(session.ship().y, 0.0);

    for _ in 0..100 {
        session.update(0.1, DOWN);
    }
    assert_eq!(session.ship().y, 560.0);

    let mut still = running_session();
    still.update(
        0.1,
        InputState {
            up: true,
            down: true,
        },
    );
    assert_eq!(still.ship().y, 280.0);
}

#[test]
fn bad_deltas_count_as_zero() {
    let mut session = running_session();
    for dt in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY, -0.5] {
        let outcome = session.update(dt, DOWN);
        assert!(!outcome.spawned);
    }
    assert_eq!(session.elapsed(), 0.0);
    assert_eq!(session.ship().y, 280.0);
}

#[test]
fn state_transitions_follow_the_lifecycle() {
    let mut session = GameSession::new(GameConfig::default(), 1).unwrap();
    assert!(!session.pause());
    assert!(!session.resume());
    assert!(!session.toggle_pause());

    assert!(session.start());
    assert!(!session.start());
    assert!(!session.resume());

    assert!(session.pause());
    assert!(!session.pause());
    assert_eq!(session.update(0.5, UP), UpdateOutcome::default());
    assert!(session.toggle_pause());
    assert_eq!(session.state(), SessionState::Running);

    session.insert_asteroid(rock(70.0, 290.0, 20.0));
    session.update(0.0, InputState::IDLE);
    assert_eq!(session.state(), SessionState::GameOver);
    assert!(!session.start());
    assert!(!session.pause());
    assert!(!session.toggle_pause());

    session.restart();
    assert_eq!(session.state(), SessionState::Running);
}

#[test]
fn restart_resets_run_state_exactly() {
    let mut session = running_session();
    for _ in 0..30 {
        session.update(0.05, UP);
    }
    session.insert_asteroid(rock(300.0, 500.0, 40.0));
    session.set_high_score(42);
    session.pause();

    session.restart();
    assert!(session.asteroids().is_empty());
    assert_eq!(*session.ship(), Ship::centered(session.config()));
    assert_eq!(session.elapsed(), 0.0);
    assert_eq!(session.spawn_timer(), 0.0);
    assert_eq!(session.state(), SessionState::Running);
    assert_eq!(session.high_score(), 42);
}

#[test]
fn same_seed_replays_identically() {
    let run = |seed: u32| {
        let mut session = GameSession::new(GameConfig::default(), seed).unwrap();
        session.start();
        for frame in 0..600 {
            let input = if frame % 40 < 20 { UP } else { DOWN };
            session.update(1.0 / 60.0, input);
        }
        (session.state(), session.elapsed(), session.asteroids().to_vec())
    };

    assert_eq!(run(0xC0FFEE), run(0xC0FFEE));
}

#[test]
fn injected_draws_place_spawns_exactly() {
    let config = GameConfig::default().with_canvas(800.0, 600.0);
    let mut session = GameSession::with_rng(config, FixedSequence::constant(0.0)).unwrap();
    session.start();
    session.update(0.5, InputState::IDLE);

    let spawned = &session.asteroids()[0];
    assert_eq!(spawned.size, 20.0);
    assert_eq!(spawned.y, 0.0);
    assert_eq!(spawned.x, 820.0);
}

#[test]
fn score_rounds_survival_time() {
    let mut session = running_session();
    session.elapsed = 12.4;
    assert_eq!(session.score(), 12);
    session.elapsed = 12.5;
    assert_eq!(session.score(), 13);
}

#[test]
fn view_borrows_current_state() {
    let mut session = running_session();
    session.set_high_score(-3);
    session.update(0.1, InputState::IDLE);

    let view = session.view();
    assert_eq!(view.width, 800.0);
    assert_eq!(view.meta.state, SessionState::Running);
    assert_eq!(view.meta.high_score, 0);
    assert_eq!(view.stars.len(), session.stars().len());
    assert!((view.meta.elapsed - 0.1).abs() < 1e-12);
}
