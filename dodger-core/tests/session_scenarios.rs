use std::time::Duration;

use asteroid_dodger_core::audio::NullAudio;
use asteroid_dodger_core::collision::first_collision;
use asteroid_dodger_core::controller::ManualScheduler;
use asteroid_dodger_core::render::{CommandRecorder, SurfaceRenderer, TextSurface};
use asteroid_dodger_core::scoreboard::InMemoryScoreBoard;
use asteroid_dodger_core::{
    GameConfig, GameController, GameSession, InputState, ManualClock, ScoreBoard, SessionState,
};

fn new_session(seed: u32) -> GameSession {
    let config = GameConfig::default().with_canvas(800.0, 600.0);
    GameSession::new(config, seed).expect("800x600 config must validate")
}

#[test]
fn five_frames_at_a_tenth_of_a_second() {
    let mut session = new_session(0xDEAD_BEEF);
    session.start();

    let mut collisions = 0;
    let mut spawns = 0;
    for _ in 0..5 {
        let outcome = session.update(0.1, InputState::IDLE);
        collisions += usize::from(outcome.collision.is_some());
        spawns += usize::from(outcome.spawned);
    }

    assert!((session.elapsed() - 0.5).abs() < 1e-9);
    assert_eq!(collisions, 0);
    assert_eq!(spawns, 1);
    assert_eq!(session.state(), SessionState::Running);
}

#[test]
fn spawned_asteroids_stay_in_bounds_across_a_long_run() {
    let mut session = new_session(0x1234_5678);
    session.start();

    for frame in 0..3_600 {
        let input = InputState {
            up: frame % 90 < 30,
            down: frame % 90 >= 60,
        };
        session.update(1.0 / 60.0, input);
        for asteroid in session.asteroids() {
            assert!(asteroid.y >= 0.0);
            assert!(asteroid.y + asteroid.size <= 600.0);
            assert!(asteroid.x + asteroid.size > 0.0);
        }
        let ship = session.ship();
        assert!(ship.y >= 0.0 && ship.y <= 560.0);
        if session.state() == SessionState::GameOver {
            assert!(first_collision(ship, session.asteroids()).is_some());
            break;
        }
    }
}

#[test]
fn inactive_sessions_ignore_updates() {
    let mut session = new_session(5);
    let before = (session.elapsed(), *session.ship(), session.asteroids().len());
    session.update(1.0, InputState { up: true, down: false });
    assert_eq!(
        (session.elapsed(), *session.ship(), session.asteroids().len()),
        before
    );

    session.start();
    session.pause();
    session.update(1.0, InputState { up: true, down: false });
    assert_eq!(session.elapsed(), 0.0);
}

#[test]
fn controller_plays_a_recorded_headless_run() {
    let clock = ManualClock::new();
    let mut board = InMemoryScoreBoard::new();
    board.submit_score("grace", 4).expect("seed score");

    let mut game = GameController::new(
        new_session(0xC0FFEE),
        SurfaceRenderer::new(CommandRecorder::new()),
        NullAudio,
        board,
        clock.clone(),
    )
    .with_player("ada");
    let mut scheduler = ManualScheduler::new(clock, Duration::from_millis(50));

    assert!(game.start());
    let summary = game.run_frames(&mut scheduler, |_| InputState::IDLE, 20_000);

    // Sitting still in the middle lane cannot survive forever.
    assert!(summary.game_over);
    assert_eq!(game.state(), SessionState::GameOver);
    assert_eq!(game.session().high_score(), 4);
    assert_eq!(game.renderer().frames(), summary.frames);

    let texts = game.renderer().surface().texts();
    assert!(texts.contains(&"GAME OVER!"));

    let score = game.session().score();
    assert_eq!(game.scores().scores_for("ada"), &[score]);
    let top = game.scores_mut().top_scores().expect("in-memory board");
    assert_eq!(top.len(), 2);
}

#[test]
fn text_surface_renders_a_live_frame() {
    let clock = ManualClock::new();
    let mut game = GameController::new(
        new_session(9),
        SurfaceRenderer::new(TextSurface::new(80, 24)),
        NullAudio,
        InMemoryScoreBoard::new(),
        clock.clone(),
    );
    game.start();
    clock.advance(Duration::from_millis(100));
    game.tick(&InputState::IDLE);

    let screen = game.renderer().surface().render();
    assert!(screen.contains("Time: 0.1s"));
    assert!(screen.contains("High Score: 0.0s"));
    assert!(screen.contains('>'));
}
