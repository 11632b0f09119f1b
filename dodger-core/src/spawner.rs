use core::f64::consts::TAU;

use crate::config::GameConfig;
use crate::constants::ASTEROID_PALETTE;
use crate::entities::Asteroid;
use crate::rng::UnitRandom;

/// Seconds between automatic spawns after `elapsed_time` seconds survived.
#[inline]
pub fn spawn_interval(config: &GameConfig, elapsed_time: f64) -> f64 {
    (config.spawn_interval_base - elapsed_time * config.spawn_interval_decay)
        .max(config.spawn_interval_min)
}

/// Draws one asteroid entering from the right edge.
///
/// The asteroid is fully off-screen to the right and fully inside the
/// vertical bounds; its speed grows with `elapsed_time`.
pub fn new_asteroid(
    rng: &mut impl UnitRandom,
    config: &GameConfig,
    canvas_width: f64,
    canvas_height: f64,
    elapsed_time: f64,
) -> Asteroid {
    let size = rng.next_unit() * config.asteroid_size_variation + config.asteroid_min_size;
    let y = rng.next_unit() * (canvas_height - size).max(0.0);
    let speed = rng.next_unit() * config.asteroid_speed_variation
        + config.asteroid_speed_base
        + elapsed_time.max(0.0) * config.asteroid_speed_growth;

    let rotation = rng.next_unit() * TAU;
    let rotation_speed = (rng.next_unit() * 2.0 - 1.0) * config.asteroid_max_spin;
    let palette_index =
        ((rng.next_unit() * ASTEROID_PALETTE.len() as f64) as usize).min(ASTEROID_PALETTE.len() - 1);

    Asteroid {
        x: canvas_width + size,
        y,
        size,
        speed,
        rotation,
        rotation_speed,
        color: ASTEROID_PALETTE[palette_index],
    }
}

/// Appends one freshly drawn asteroid to `asteroids`.
pub fn spawn(
    asteroids: &mut Vec<Asteroid>,
    rng: &mut impl UnitRandom,
    config: &GameConfig,
    canvas_width: f64,
    canvas_height: f64,
    elapsed_time: f64,
) {
    asteroids.push(new_asteroid(
        rng,
        config,
        canvas_width,
        canvas_height,
        elapsed_time,
    ));
}
