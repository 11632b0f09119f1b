use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::audio::{AudioSettings, AudioSink};
use crate::input::{InputProvider, InputState};
use crate::render::RenderSink;
use crate::scoreboard::{resolve_high_score, ScoreBoard};
use crate::session::{GameSession, SessionState, UpdateOutcome};

/// Monotonic time source for frame deltas.
pub trait Clock {
    fn now(&self) -> Duration;
}

#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Simulated clock; clones share the same time.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    nanos: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, step: Duration) {
        let step = u64::try_from(step.as_nanos()).unwrap_or(u64::MAX);
        self.nanos.fetch_add(step, Ordering::Relaxed);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::Relaxed))
    }
}

/// Decides when the next frame may run.
pub trait FrameScheduler {
    fn wait_for_next_frame(&mut self);
}

/// Real-time pacing: sleeps until the next fixed deadline.
#[derive(Clone, Debug)]
pub struct FixedRateScheduler {
    period: Duration,
    next_deadline: Option<Instant>,
}

impl FixedRateScheduler {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next_deadline: None,
        }
    }

    pub fn per_second(frames: u32) -> Self {
        Self::new(Duration::from_secs(1) / frames.max(1))
    }
}

impl FrameScheduler for FixedRateScheduler {
    fn wait_for_next_frame(&mut self) {
        let now = Instant::now();
        let deadline = self.next_deadline.unwrap_or(now);
        if deadline > now {
            thread::sleep(deadline - now);
        }
        // A late frame does not try to catch up.
        self.next_deadline = Some(deadline.max(now) + self.period);
    }
}

/// Headless pacing: advances a [`ManualClock`] by one fixed step.
#[derive(Clone, Debug)]
pub struct ManualScheduler {
    clock: ManualClock,
    step: Duration,
}

impl ManualScheduler {
    pub fn new(clock: ManualClock, step: Duration) -> Self {
        Self { clock, step }
    }
}

impl FrameScheduler for ManualScheduler {
    fn wait_for_next_frame(&mut self) {
        self.clock.advance(self.step);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct FrameReport {
    pub delta: f64,
    pub outcome: UpdateOutcome,
    pub state: SessionState,
    /// Score accepted by the board on the frame the run ended.
    pub submitted_score: Option<i64>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub frames: u64,
    pub spawned: u64,
    pub game_over: bool,
    pub elapsed: f64,
}

/// Drives a [`GameSession`] frame by frame and fans side effects out to the
/// render, audio and score-board collaborators.
pub struct GameController<R, A, S, C> {
    session: GameSession,
    renderer: R,
    audio: A,
    scores: S,
    clock: C,
    audio_settings: AudioSettings,
    player_name: Option<String>,
    last_frame: Option<Duration>,
}

impl<R, A, S, C> GameController<R, A, S, C>
where
    R: RenderSink,
    A: AudioSink,
    S: ScoreBoard,
    C: Clock,
{
    pub fn new(session: GameSession, renderer: R, audio: A, scores: S, clock: C) -> Self {
        Self {
            session,
            renderer,
            audio,
            scores,
            clock,
            audio_settings: AudioSettings::default(),
            player_name: None,
            last_frame: None,
        }
    }

    pub fn with_player(mut self, name: impl Into<String>) -> Self {
        self.set_player(Some(name.into()));
        self
    }

    /// Blank names clear the active player.
    pub fn set_player(&mut self, name: Option<String>) {
        self.player_name = name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());
    }

    pub fn player(&self) -> Option<&str> {
        self.player_name.as_deref()
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn scores(&self) -> &S {
        &self.scores
    }

    pub fn scores_mut(&mut self) -> &mut S {
        &mut self.scores
    }

    pub fn audio_settings(&self) -> AudioSettings {
        self.audio_settings
    }

    pub fn audio_settings_mut(&mut self) -> &mut AudioSettings {
        &mut self.audio_settings
    }

    pub fn into_parts(self) -> (GameSession, R, A, S) {
        (self.session, self.renderer, self.audio, self.scores)
    }

    pub fn start(&mut self) -> bool {
        if self.session.state() != SessionState::NotStarted {
            return false;
        }
        self.refresh_high_score();
        self.session.start();
        self.last_frame = Some(self.clock.now());
        self.audio.start_background();
        tracing::debug!(high_score = self.session.high_score(), "session started");
        true
    }

    pub fn pause(&mut self) -> bool {
        if !self.session.pause() {
            return false;
        }
        self.audio.pause_background();
        tracing::debug!(elapsed = self.session.elapsed(), "session paused");
        true
    }

    pub fn resume(&mut self) -> bool {
        if !self.session.resume() {
            return false;
        }
        self.last_frame = Some(self.clock.now());
        self.audio.resume_background();
        tracing::debug!(elapsed = self.session.elapsed(), "session resumed");
        true
    }

    pub fn toggle_pause(&mut self) -> bool {
        match self.session.state() {
            SessionState::Running => self.pause(),
            SessionState::Paused => self.resume(),
            _ => false,
        }
    }

    pub fn restart(&mut self) {
        self.session.restart();
        self.refresh_high_score();
        self.last_frame = Some(self.clock.now());
        self.audio.stop_background();
        self.audio.start_background();
        tracing::debug!(high_score = self.session.high_score(), "session restarted");
    }

    /// Leaves an active run without reporting a score.
    pub fn end_session(&mut self) -> bool {
        match self.session.state() {
            SessionState::Running | SessionState::Paused => {
                self.session.pause();
                self.audio.stop_background();
                tracing::debug!(elapsed = self.session.elapsed(), "session ended");
                true
            }
            SessionState::NotStarted | SessionState::GameOver => false,
        }
    }

    /// Runs one frame: update with the clock delta, then render.
    pub fn tick(&mut self, input: &dyn InputProvider) -> FrameReport {
        let now = self.clock.now();
        let raw_delta = self
            .last_frame
            .map(|previous| now.saturating_sub(previous).as_secs_f64())
            .unwrap_or(0.0);
        self.last_frame = Some(now);

        let delta = match self.session.config().max_frame_delta {
            Some(max_delta) => raw_delta.min(max_delta),
            None => raw_delta,
        };

        let outcome = self.session.update(delta, input.input_state());
        let mut submitted_score = None;
        if outcome.collision.is_some() {
            submitted_score = self.finish_run();
        }

        self.renderer.draw(&self.session.view());

        FrameReport {
            delta,
            outcome,
            state: self.session.state(),
            submitted_score,
        }
    }

    /// Ticks until the run ends or `max_frames` frames have been drawn.
    pub fn run_frames<F>(
        &mut self,
        scheduler: &mut impl FrameScheduler,
        mut policy: F,
        max_frames: u64,
    ) -> RunSummary
    where
        F: FnMut(&GameSession) -> InputState,
    {
        let mut summary = RunSummary::default();
        while summary.frames < max_frames {
            scheduler.wait_for_next_frame();
            let input = policy(&self.session);
            let report = self.tick(&input);
            summary.frames += 1;
            summary.spawned += u64::from(report.outcome.spawned);
            if report.state == SessionState::GameOver {
                summary.game_over = true;
                break;
            }
        }
        summary.elapsed = self.session.elapsed();
        summary
    }

    fn finish_run(&mut self) -> Option<i64> {
        self.audio
            .play_collision(self.audio_settings.collision_volume());
        self.audio.stop_background();

        let score = self.session.score();
        tracing::debug!(score, "session over");

        let player = self.player_name.as_deref()?;
        match self.scores.submit_score(player, score) {
            Ok(()) => Some(score),
            Err(err) => {
                tracing::warn!(player, score, "failed to submit score: {err}");
                None
            }
        }
    }

    fn refresh_high_score(&mut self) {
        let high_score = resolve_high_score(&mut self.scores);
        self.session.set_high_score(high_score);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::entities::Asteroid;
    use crate::error::ScoreBoardError;
    use crate::render::NullRenderer;
    use crate::scoreboard::{InMemoryScoreBoard, OfflineScoreBoard as OfflineBoard, ScoreEntry};

    #[derive(Debug, Default)]
    struct RecordingAudio {
        events: Vec<String>,
    }

    impl AudioSink for RecordingAudio {
        fn start_background(&mut self) {
            self.events.push("start".to_string());
        }
        fn pause_background(&mut self) {
            self.events.push("pause".to_string());
        }
        fn resume_background(&mut self) {
            self.events.push("resume".to_string());
        }
        fn stop_background(&mut self) {
            self.events.push("stop".to_string());
        }
        fn play_collision(&mut self, volume: f64) {
            self.events.push(format!("collision:{volume}"));
        }
    }

    struct FailingBoard;

    impl ScoreBoard for FailingBoard {
        fn top_scores(&mut self) -> Result<Vec<ScoreEntry>, ScoreBoardError> {
            Err(ScoreBoardError::Unavailable("down".to_string()))
        }

        fn submit_score(&mut self, _player: &str, _score: i64) -> Result<(), ScoreBoardError> {
            Err(ScoreBoardError::Unavailable("down".to_string()))
        }
    }

    fn blocker() -> Asteroid {
        Asteroid {
            x: 70.0,
            y: 290.0,
            size: 20.0,
            speed: 0.0,
            rotation: 0.0,
            rotation_speed: 0.0,
            color: "#6b5b4b",
        }
    }

    fn controller<S: ScoreBoard>(
        scores: S,
    ) -> (
        GameController<NullRenderer, RecordingAudio, S, ManualClock>,
        ManualClock,
    ) {
        let clock = ManualClock::new();
        let session = GameSession::new(GameConfig::default(), 11).unwrap();
        let controller = GameController::new(
            session,
            NullRenderer,
            RecordingAudio::default(),
            scores,
            clock.clone(),
        );
        (controller, clock)
    }

    #[test]
    fn start_fetches_high_score_once() {
        let mut board = InMemoryScoreBoard::new();
        board.submit_score("ada", 17).unwrap();
        let (mut game, _clock) = controller(board);

        assert!(game.start());
        assert!(!game.start());
        assert_eq!(game.session().high_score(), 17);
        assert_eq!(game.audio().events, vec!["start"]);
    }

    #[test]
    fn unreachable_board_is_not_fatal() {
        let (mut game, clock) = controller(FailingBoard);
        game = game.with_player("ada");
        assert!(game.start());
        assert_eq!(game.session().high_score(), 0);

        clock.advance(Duration::from_millis(500));
        game.session.insert_asteroid(blocker());
        let report = game.tick(&InputState::IDLE);
        assert_eq!(report.state, SessionState::GameOver);
        assert_eq!(report.submitted_score, None);
    }

    #[test]
    fn collision_plays_sound_stops_music_and_submits() {
        let (mut game, clock) = controller(InMemoryScoreBoard::new());
        game = game.with_player("  Ada ");
        game.start();

        for _ in 0..13 {
            clock.advance(Duration::from_millis(200));
            game.tick(&InputState::IDLE);
        }
        assert_eq!(game.state(), SessionState::Running);
        game.session.insert_asteroid(blocker());
        clock.advance(Duration::from_millis(16));
        let report = game.tick(&InputState::IDLE);

        assert_eq!(report.outcome.collision, Some(0));
        assert_eq!(report.submitted_score, Some(3));
        assert_eq!(game.scores().scores_for("ada"), &[3]);
        assert_eq!(game.audio().events, vec!["start", "collision:1", "stop"]);
    }

    #[test]
    fn muted_collision_is_silent_and_anonymous_runs_are_not_submitted() {
        let (mut game, _clock) = controller(InMemoryScoreBoard::new());
        game.audio_settings_mut().toggle_mute();
        game.start();
        game.session.insert_asteroid(blocker());

        let report = game.tick(&InputState::IDLE);
        assert_eq!(report.submitted_score, None);
        assert!(game.audio().events.contains(&"collision:0".to_string()));
        assert!(game.scores_mut().top_scores().unwrap().is_empty());
    }

    #[test]
    fn frame_delta_is_clamped() {
        let (mut game, clock) = controller(OfflineBoard);
        game.start();
        clock.advance(Duration::from_secs(3));
        let report = game.tick(&InputState::IDLE);
        assert_eq!(report.delta, 0.25);
        assert_eq!(game.session().elapsed(), 0.25);
    }

    #[test]
    fn pause_and_resume_drive_background_audio() {
        let (mut game, clock) = controller(OfflineBoard);
        assert!(!game.pause());
        game.start();
        assert!(game.toggle_pause());
        assert!(!game.pause());

        clock.advance(Duration::from_secs(10));
        let report = game.tick(&InputState::IDLE);
        assert_eq!(report.outcome, UpdateOutcome::default());
        assert!(game.resume());

        // Resuming resets the frame clock, so the pause is not simulated.
        clock.advance(Duration::from_millis(100));
        let report = game.tick(&InputState::IDLE);
        assert!((report.delta - 0.1).abs() < 1e-9);
        assert_eq!(game.audio().events, vec!["start", "pause", "resume"]);
    }

    #[test]
    fn restart_refetches_high_score_and_restarts_music() {
        let (mut game, _clock) = controller(InMemoryScoreBoard::new());
        game.start();
        game.scores_mut().submit_score("grace", 9).unwrap();
        game.session.insert_asteroid(blocker());
        game.tick(&InputState::IDLE);
        assert_eq!(game.state(), SessionState::GameOver);

        game.restart();
        assert_eq!(game.state(), SessionState::Running);
        assert_eq!(game.session().high_score(), 9);
        assert!(game.session().asteroids().is_empty());
        assert_eq!(
            game.audio().events[game.audio().events.len() - 2..],
            ["stop".to_string(), "start".to_string()]
        );
    }

    #[test]
    fn end_session_pauses_without_reporting() {
        let (mut game, _clock) = controller(InMemoryScoreBoard::new());
        game = game.with_player("ada");
        assert!(!game.end_session());
        game.start();
        assert!(game.end_session());
        assert_eq!(game.state(), SessionState::Paused);
        assert!(game.scores().scores_for("ada").is_empty());
    }

    #[test]
    fn run_frames_stops_at_game_over_or_limit() {
        let (mut game, clock) = controller(OfflineBoard);
        let mut scheduler = ManualScheduler::new(clock, Duration::from_millis(100));
        game.start();

        let summary = game.run_frames(&mut scheduler, |_| InputState::IDLE, 5);
        assert_eq!(summary.frames, 5);
        assert_eq!(summary.spawned, 1);
        assert!(!summary.game_over);
        assert!((summary.elapsed - 0.5).abs() < 1e-9);

        game.session.insert_asteroid(blocker());
        let summary = game.run_frames(&mut scheduler, |_| InputState::IDLE, 100);
        assert_eq!(summary.frames, 1);
        assert!(summary.game_over);
    }
}
