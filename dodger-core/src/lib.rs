pub mod audio;
pub mod catalog;
pub mod collision;
pub mod config;
pub mod constants;
pub mod controller;
pub mod entities;
pub mod error;
pub mod input;
pub mod render;
pub mod rng;
pub mod scoreboard;
pub mod session;
pub mod spawner;

pub use config::GameConfig;
pub use controller::{Clock, FrameReport, GameController, ManualClock, RunSummary, SystemClock};
pub use error::{ConfigError, ScoreBoardError};
pub use input::{InputProvider, InputState};
pub use render::{FrameView, RenderSink};
pub use scoreboard::{ScoreBoard, ScoreEntry};
pub use session::{GameSession, SessionState, UpdateOutcome};
