use serde::{Deserialize, Serialize};

use crate::constants::{
    ASTEROID_MAX_SPIN, ASTEROID_MIN_SIZE, ASTEROID_SIZE_VARIATION, ASTEROID_SPEED_BASE,
    ASTEROID_SPEED_GROWTH, ASTEROID_SPEED_VARIATION, CANVAS_HEIGHT_DEFAULT, CANVAS_WIDTH_DEFAULT,
    MAX_FRAME_DELTA_DEFAULT, SHIP_HEIGHT, SHIP_SPEED, SHIP_WIDTH, SHIP_X, SPAWN_INTERVAL_BASE,
    SPAWN_INTERVAL_DECAY, SPAWN_INTERVAL_MIN, STAR_COUNT, STAR_MAX_SIZE, STAR_SPEED, TIME_SCALE,
};
use crate::error::{ConfigError, ConfigField};

/// Tunables for one game session.
///
/// Every field defaults to the matching constant, so a partial JSON document
/// only overrides what it names.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub canvas_width: f64,
    pub canvas_height: f64,

    pub asteroid_min_size: f64,
    pub asteroid_size_variation: f64,
    pub asteroid_speed_base: f64,
    pub asteroid_speed_variation: f64,
    pub asteroid_speed_growth: f64,
    pub asteroid_max_spin: f64,
    pub time_scale: f64,

    pub spawn_interval_base: f64,
    pub spawn_interval_decay: f64,
    pub spawn_interval_min: f64,

    pub ship_x: f64,
    pub ship_width: f64,
    pub ship_height: f64,
    pub ship_speed: f64,

    pub star_count: usize,
    pub star_speed: f64,
    pub star_max_size: f64,

    /// `None` feeds wall-clock deltas through unclamped.
    pub max_frame_delta: Option<f64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            canvas_width: CANVAS_WIDTH_DEFAULT,
            canvas_height: CANVAS_HEIGHT_DEFAULT,
            asteroid_min_size: ASTEROID_MIN_SIZE,
            asteroid_size_variation: ASTEROID_SIZE_VARIATION,
            asteroid_speed_base: ASTEROID_SPEED_BASE,
            asteroid_speed_variation: ASTEROID_SPEED_VARIATION,
            asteroid_speed_growth: ASTEROID_SPEED_GROWTH,
            asteroid_max_spin: ASTEROID_MAX_SPIN,
            time_scale: TIME_SCALE,
            spawn_interval_base: SPAWN_INTERVAL_BASE,
            spawn_interval_decay: SPAWN_INTERVAL_DECAY,
            spawn_interval_min: SPAWN_INTERVAL_MIN,
            ship_x: SHIP_X,
            ship_width: SHIP_WIDTH,
            ship_height: SHIP_HEIGHT,
            ship_speed: SHIP_SPEED,
            star_count: STAR_COUNT,
            star_speed: STAR_SPEED,
            star_max_size: STAR_MAX_SIZE,
            max_frame_delta: Some(MAX_FRAME_DELTA_DEFAULT),
        }
    }
}

impl GameConfig {
    pub fn with_canvas(mut self, width: f64, height: f64) -> Self {
        self.canvas_width = width;
        self.canvas_height = height;
        self
    }

    /// Largest asteroid a spawn can produce (exclusive upper bound).
    #[inline]
    pub fn max_asteroid_size(&self) -> f64 {
        self.asteroid_min_size + self.asteroid_size_variation
    }

    /// Rejects configurations under which spawning could place an asteroid
    /// outside the vertical bounds or any arithmetic could go degenerate.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite_fields = [
            (ConfigField::CanvasWidth, self.canvas_width),
            (ConfigField::CanvasHeight, self.canvas_height),
            (ConfigField::AsteroidSize, self.asteroid_min_size),
            (ConfigField::AsteroidSize, self.asteroid_size_variation),
            (ConfigField::AsteroidSpeed, self.asteroid_speed_base),
            (ConfigField::AsteroidSpeed, self.asteroid_speed_variation),
            (ConfigField::AsteroidSpeed, self.asteroid_speed_growth),
            (ConfigField::AsteroidSpeed, self.asteroid_max_spin),
            (ConfigField::TimeScale, self.time_scale),
            (ConfigField::SpawnInterval, self.spawn_interval_base),
            (ConfigField::SpawnInterval, self.spawn_interval_decay),
            (ConfigField::SpawnInterval, self.spawn_interval_min),
            (ConfigField::ShipSize, self.ship_x),
            (ConfigField::ShipSize, self.ship_width),
            (ConfigField::ShipSize, self.ship_height),
            (ConfigField::ShipSpeed, self.ship_speed),
            (ConfigField::StarField, self.star_speed),
            (ConfigField::StarField, self.star_max_size),
        ];
        for (field, value) in finite_fields {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field });
            }
        }

        let positive_fields = [
            (ConfigField::CanvasWidth, self.canvas_width),
            (ConfigField::CanvasHeight, self.canvas_height),
            (ConfigField::AsteroidSize, self.asteroid_min_size),
            (ConfigField::AsteroidSpeed, self.asteroid_speed_base),
            (ConfigField::TimeScale, self.time_scale),
            (ConfigField::SpawnInterval, self.spawn_interval_min),
            (ConfigField::ShipSize, self.ship_width),
            (ConfigField::ShipSize, self.ship_height),
        ];
        for (field, value) in positive_fields {
            if value <= 0.0 {
                return Err(ConfigError::NotPositive { field, value });
            }
        }

        let non_negative_fields = [
            (ConfigField::AsteroidSize, self.asteroid_size_variation),
            (ConfigField::AsteroidSpeed, self.asteroid_speed_variation),
            (ConfigField::AsteroidSpeed, self.asteroid_speed_growth),
            (ConfigField::AsteroidSpeed, self.asteroid_max_spin),
            (ConfigField::SpawnInterval, self.spawn_interval_decay),
            (ConfigField::ShipSpeed, self.ship_speed),
            (ConfigField::StarField, self.star_speed),
            (ConfigField::StarField, self.star_max_size),
        ];
        for (field, value) in non_negative_fields {
            if value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }

        if self.spawn_interval_min > self.spawn_interval_base {
            return Err(ConfigError::IntervalBoundsInverted {
                min: self.spawn_interval_min,
                base: self.spawn_interval_base,
            });
        }

        let required = self.max_asteroid_size().max(self.ship_height);
        if self.canvas_height < required {
            return Err(ConfigError::CanvasTooShort {
                canvas_height: self.canvas_height,
                required,
            });
        }

        if let Some(max_delta) = self.max_frame_delta {
            if !max_delta.is_finite() {
                return Err(ConfigError::NotFinite {
                    field: ConfigField::MaxFrameDelta,
                });
            }
            if max_delta <= 0.0 {
                return Err(ConfigError::NotPositive {
                    field: ConfigField::MaxFrameDelta,
                    value: max_delta,
                });
            }
        }

        Ok(())
    }
}
