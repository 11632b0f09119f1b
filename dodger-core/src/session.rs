use serde::Serialize;

use crate::collision::first_collision;
use crate::config::GameConfig;
use crate::entities::{generate_stars, scroll_stars, Asteroid, Ship, Star};
use crate::error::ConfigError;
use crate::input::InputState;
use crate::render::{FrameView, SessionMeta};
use crate::rng::{SeededRng, UnitRandom};
use crate::spawner::{spawn, spawn_interval};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum SessionState {
    NotStarted,
    Running,
    Paused,
    GameOver,
}

impl SessionState {
    /// Anything past the title screen.
    #[inline]
    pub fn is_started(self) -> bool {
        self != Self::NotStarted
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct UpdateOutcome {
    pub spawned: bool,
    /// Index into `asteroids()` of the hazard that ended the run.
    pub collision: Option<usize>,
    pub pruned: usize,
}

/// All transient state of one play-through.
#[derive(Clone, Debug)]
pub struct GameSession<R = SeededRng> {
    config: GameConfig,
    rng: R,
    state: SessionState,
    ship: Ship,
    asteroids: Vec<Asteroid>,
    stars: Vec<Star>,
    elapsed: f64,
    spawn_timer: f64,
    high_score: i64,
}

impl GameSession<SeededRng> {
    pub fn new(config: GameConfig, seed: u32) -> Result<Self, ConfigError> {
        Self::with_rng(config, SeededRng::new(seed))
    }
}

impl<R: UnitRandom> GameSession<R> {
    pub fn with_rng(config: GameConfig, mut rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let stars = generate_stars(&mut rng, &config);
        Ok(Self {
            ship: Ship::centered(&config),
            config,
            rng,
            state: SessionState::NotStarted,
            asteroids: Vec::new(),
            stars,
            elapsed: 0.0,
            spawn_timer: 0.0,
            high_score: 0,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn ship(&self) -> &Ship {
        &self.ship
    }

    pub fn asteroids(&self) -> &[Asteroid] {
        &self.asteroids
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn spawn_timer(&self) -> f64 {
        self.spawn_timer
    }

    pub fn high_score(&self) -> i64 {
        self.high_score
    }

    pub fn set_high_score(&mut self, high_score: i64) {
        self.high_score = high_score.max(0);
    }

    /// Whole seconds survived, as reported to the score board.
    pub fn score(&self) -> i64 {
        self.elapsed.round() as i64
    }

    /// Places a hazard directly, bypassing the spawner.
    pub fn insert_asteroid(&mut self, asteroid: Asteroid) {
        self.asteroids.push(asteroid);
    }

    pub fn start(&mut self) -> bool {
        if self.state != SessionState::NotStarted {
            return false;
        }
        self.state = SessionState::Running;
        true
    }

    pub fn pause(&mut self) -> bool {
        if self.state != SessionState::Running {
            return false;
        }
        self.state = SessionState::Paused;
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.state != SessionState::Paused {
            return false;
        }
        self.state = SessionState::Running;
        true
    }

    pub fn toggle_pause(&mut self) -> bool {
        match self.state {
            SessionState::Running => self.pause(),
            SessionState::Paused => self.resume(),
            _ => false,
        }
    }

    /// Back to a fresh run from any state. The star field and RNG carry over.
    pub fn restart(&mut self) {
        self.asteroids.clear();
        self.ship = Ship::centered(&self.config);
        self.elapsed = 0.0;
        self.spawn_timer = 0.0;
        self.state = SessionState::Running;
    }

    /// Advances the simulation by `delta_time` seconds.
    pub fn update(&mut self, delta_time: f64, input: InputState) -> UpdateOutcome {
        let mut outcome = UpdateOutcome::default();
        if self.state != SessionState::Running {
            return outcome;
        }
        let dt = sanitize_delta(delta_time);
        self.elapsed += dt;

        let time_scale = self.config.time_scale;
        let max_y = self.ship.max_y(self.config.canvas_height);
        self.ship.y = (self.ship.y + input.vertical_axis() * self.ship.speed * time_scale * dt)
            .clamp(0.0, max_y);

        scroll_stars(&mut self.stars, &self.config, dt);

        for asteroid in &mut self.asteroids {
            asteroid.x -= asteroid.speed * time_scale * dt;
            asteroid.rotation += asteroid.rotation_speed * dt;
        }
        let before = self.asteroids.len();
        self.asteroids.retain(|asteroid| !asteroid.is_off_screen());
        outcome.pruned = before - self.asteroids.len();

        if let Some(index) = first_collision(&self.ship, &self.asteroids) {
            self.state = SessionState::GameOver;
            outcome.collision = Some(index);
            return outcome;
        }

        self.spawn_timer += dt;
        if self.spawn_timer >= spawn_interval(&self.config, self.elapsed) {
            spawn(
                &mut self.asteroids,
                &mut self.rng,
                &self.config,
                self.config.canvas_width,
                self.config.canvas_height,
                self.elapsed,
            );
            self.spawn_timer = 0.0;
            outcome.spawned = true;
        }

        outcome
    }

    pub fn meta(&self) -> SessionMeta {
        SessionMeta {
            elapsed: self.elapsed,
            high_score: self.high_score,
            state: self.state,
        }
    }

    pub fn view(&self) -> FrameView<'_> {
        FrameView {
            width: self.config.canvas_width,
            height: self.config.canvas_height,
            ship: &self.ship,
            asteroids: &self.asteroids,
            stars: &self.stars,
            meta: self.meta(),
        }
    }
}

#[inline]
fn sanitize_delta(delta_time: f64) -> f64 {
    if delta_time.is_finite() && delta_time > 0.0 {
        delta_time
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests;
