use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use api_server::Store;
use asteroid_dodger_core::audio::NullAudio;
use asteroid_dodger_core::controller::{FrameScheduler, ManualScheduler};
use asteroid_dodger_core::input::{decode_input_byte, encode_input_byte};
use asteroid_dodger_core::render::{NullRenderer, SurfaceRenderer, TextSurface};
use asteroid_dodger_core::scoreboard::OfflineScoreBoard;
use asteroid_dodger_core::{
    GameConfig, GameController, GameSession, InputState, ManualClock, ScoreBoard,
    ScoreBoardError, ScoreEntry, SessionState,
};
use serde::{Deserialize, Serialize};

use crate::pilots::{create_pilot, Pilot};

pub const SCREEN_COLUMNS: usize = 80;
pub const SCREEN_ROWS: usize = 24;

/// Where finished runs report their score.
#[derive(Clone, Copy)]
pub enum RunBoard<'a> {
    Offline,
    Store(&'a Store),
}

impl ScoreBoard for RunBoard<'_> {
    fn top_scores(&mut self) -> Result<Vec<ScoreEntry>, ScoreBoardError> {
        match self {
            Self::Offline => OfflineScoreBoard.top_scores(),
            Self::Store(store) => ScoreBoard::top_scores(store),
        }
    }

    fn submit_score(&mut self, player: &str, score: i64) -> Result<(), ScoreBoardError> {
        match self {
            Self::Offline => OfflineScoreBoard.submit_score(player, score),
            Self::Store(store) => ScoreBoard::submit_score(store, player, score),
        }
    }
}

#[derive(Clone, Debug)]
pub struct RunOptions {
    pub pilot: String,
    pub seed: u32,
    pub max_frames: u64,
    pub step: Duration,
    pub config: GameConfig,
    pub player: Option<String>,
    /// Capture an ASCII screen every N frames (and on the last frame).
    pub render_every: Option<u64>,
}

impl RunOptions {
    pub fn new(pilot: impl Into<String>, seed: u32, max_frames: u64) -> Self {
        Self {
            pilot: pilot.into(),
            seed,
            max_frames,
            step: Duration::from_millis(16),
            config: GameConfig::default(),
            player: None,
            render_every: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RunMetrics {
    pub pilot: String,
    pub seed: u32,
    pub max_frames: u64,
    pub step_ms: u64,
    pub frame_count: u64,
    pub elapsed_s: f64,
    pub final_score: i64,
    pub high_score_at_start: i64,
    pub submitted_score: Option<i64>,
    pub game_over: bool,
    pub asteroids_spawned: u64,
    pub asteroids_on_screen: usize,
    pub up_frames: u64,
    pub down_frames: u64,
}

#[derive(Clone, Debug)]
pub struct RunArtifact {
    pub metrics: RunMetrics,
    /// One encoded input byte per frame.
    pub inputs: Vec<u8>,
    pub screens: Vec<String>,
}

/// Everything needed to reproduce a run frame for frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InputLog {
    pub seed: u32,
    pub step_ms: u64,
    pub config: GameConfig,
    pub inputs: Vec<u8>,
}

impl InputLog {
    pub fn from_run(options: &RunOptions, artifact: &RunArtifact) -> Self {
        Self {
            seed: options.seed,
            step_ms: options.step.as_millis() as u64,
            config: options.config.clone(),
            inputs: artifact.inputs.clone(),
        }
    }
}

pub fn run_pilot(options: &RunOptions, board: RunBoard<'_>) -> Result<RunArtifact> {
    let mut pilot =
        create_pilot(&options.pilot).ok_or_else(|| anyhow!("unknown pilot '{}'", options.pilot))?;
    run_pilot_instance(pilot.as_mut(), options, board)
}

pub fn run_pilot_instance(
    pilot: &mut dyn Pilot,
    options: &RunOptions,
    board: RunBoard<'_>,
) -> Result<RunArtifact> {
    if options.max_frames == 0 {
        return Err(anyhow!("max_frames must be > 0"));
    }
    if options.step.is_zero() {
        return Err(anyhow!("frame step must be > 0"));
    }
    // Input logs record the step in whole milliseconds.
    if options.step.subsec_nanos() % 1_000_000 != 0 {
        return Err(anyhow!(
            "frame step must be a whole number of milliseconds, got {:?}",
            options.step
        ));
    }

    pilot.reset(options.seed);
    let session = GameSession::new(options.config.clone(), options.seed)
        .map_err(|err| anyhow!("game config rejected: {err}"))?;

    let clock = ManualClock::new();
    let mut scheduler = ManualScheduler::new(clock.clone(), options.step);
    let mut game = GameController::new(
        session,
        SurfaceRenderer::new(TextSurface::new(SCREEN_COLUMNS, SCREEN_ROWS)),
        NullAudio,
        board,
        clock,
    );
    game.set_player(options.player.clone());
    game.start();
    let high_score_at_start = game.session().high_score();

    let mut inputs = Vec::with_capacity(options.max_frames.min(1 << 16) as usize);
    let mut screens = Vec::new();
    let mut asteroids_spawned = 0;
    let mut submitted_score = None;
    let mut up_frames = 0;
    let mut down_frames = 0;

    while (inputs.len() as u64) < options.max_frames {
        scheduler.wait_for_next_frame();
        let input = pilot.next_input(game.session());
        inputs.push(encode_input_byte(input));
        up_frames += u64::from(input.up);
        down_frames += u64::from(input.down);

        let report = game.tick(&input);
        asteroids_spawned += u64::from(report.outcome.spawned);

        let frame = inputs.len() as u64;
        let finished = report.state == SessionState::GameOver || frame == options.max_frames;
        if let Some(every) = options.render_every.filter(|every| *every > 0) {
            if frame % every == 0 || finished {
                screens.push(game.renderer().surface().render());
            }
        }
        if report.state == SessionState::GameOver {
            submitted_score = report.submitted_score;
            break;
        }
    }

    let session = game.session();
    let metrics = RunMetrics {
        pilot: pilot.id().to_string(),
        seed: options.seed,
        max_frames: options.max_frames,
        step_ms: options.step.as_millis() as u64,
        frame_count: inputs.len() as u64,
        elapsed_s: session.elapsed(),
        final_score: session.score(),
        high_score_at_start,
        submitted_score,
        game_over: session.state() == SessionState::GameOver,
        asteroids_spawned,
        asteroids_on_screen: session.asteroids().len(),
        up_frames,
        down_frames,
    };
    tracing::debug!(
        pilot = %metrics.pilot,
        seed = metrics.seed,
        frames = metrics.frame_count,
        score = metrics.final_score,
        game_over = metrics.game_over,
        "run finished"
    );

    Ok(RunArtifact {
        metrics,
        inputs,
        screens,
    })
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ReplayResult {
    pub frame_count: u64,
    pub elapsed_s: f64,
    pub final_score: i64,
    pub game_over: bool,
}

/// Feeds a recorded input log back through a fresh, offline session.
pub fn replay(log: &InputLog) -> Result<ReplayResult> {
    if log.step_ms == 0 {
        return Err(anyhow!("input log step_ms must be > 0"));
    }
    let session = GameSession::new(log.config.clone(), log.seed)
        .map_err(|err| anyhow!("game config rejected: {err}"))?;

    let clock = ManualClock::new();
    let mut scheduler = ManualScheduler::new(clock.clone(), Duration::from_millis(log.step_ms));
    let mut game = GameController::new(session, NullRenderer, NullAudio, RunBoard::Offline, clock);
    game.start();

    let mut recorded = log.inputs.iter().copied().map(decode_input_byte);
    let summary = game.run_frames(
        &mut scheduler,
        |_| recorded.next().unwrap_or(InputState::IDLE),
        log.inputs.len() as u64,
    );

    Ok(ReplayResult {
        frame_count: summary.frames,
        elapsed_s: summary.elapsed,
        final_score: game.session().score(),
        game_over: summary.game_over,
    })
}

pub fn write_input_log(path: &Path, log: &InputLog) -> Result<()> {
    crate::util::write_json(path, log)
}

pub fn read_input_log(path: &Path) -> Result<InputLog> {
    let data =
        fs::read(path).with_context(|| format!("failed reading input log {}", path.display()))?;
    serde_json::from_slice(&data)
        .with_context(|| format!("invalid input log {}", path.display()))
}
