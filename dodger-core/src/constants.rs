// Asteroid spawn attributes (px, frame-normalized speed units)
pub const ASTEROID_MIN_SIZE: f64 = 20.0;
pub const ASTEROID_SIZE_VARIATION: f64 = 30.0;
pub const ASTEROID_SPEED_BASE: f64 = 2.0;
pub const ASTEROID_SPEED_VARIATION: f64 = 2.0;
pub const ASTEROID_SPEED_GROWTH: f64 = 0.05; // per survived second
pub const ASTEROID_MAX_SPIN: f64 = 2.0; // rad/s, either direction

// Frame-normalized speed -> px/s
pub const TIME_SCALE: f64 = 60.0;

// Spawn cadence (seconds)
pub const SPAWN_INTERVAL_BASE: f64 = 0.45;
pub const SPAWN_INTERVAL_DECAY: f64 = 0.005;
pub const SPAWN_INTERVAL_MIN: f64 = 0.2;

// Ship
pub const SHIP_X: f64 = 50.0;
pub const SHIP_WIDTH: f64 = 60.0;
pub const SHIP_HEIGHT: f64 = 40.0;
pub const SHIP_SPEED: f64 = 3.0;

// Ship hit box, as fractions of the sprite box
pub const HIT_BOX_X_INSET: f64 = 0.25;
pub const HIT_BOX_Y_INSET: f64 = 0.2;
pub const HIT_BOX_WIDTH_SCALE: f64 = 0.5;
pub const HIT_BOX_HEIGHT_SCALE: f64 = 0.6;

// Background star field
pub const STAR_COUNT: usize = 100;
pub const STAR_SPEED: f64 = 50.0; // px/s
pub const STAR_MAX_SIZE: f64 = 2.0;

// Play area used when nothing else is configured
pub const CANVAS_WIDTH_DEFAULT: f64 = 800.0;
pub const CANVAS_HEIGHT_DEFAULT: f64 = 600.0;

// Longest wall-clock delta fed into a single update
pub const MAX_FRAME_DELTA_DEFAULT: f64 = 0.25;

pub const TOP_SCORES_LIMIT: usize = 5;

pub const ASTEROID_PALETTE: [&str; 6] = [
    "#8b7355", "#a0826d", "#6b5b4b", "#9c8b7a", "#7a6a5a", "#b39b82",
];
