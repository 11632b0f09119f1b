use serde::Serialize;

use crate::config::GameConfig;
use crate::rng::UnitRandom;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Ship {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub speed: f64,
}

impl Ship {
    /// Ship parked at its horizontal anchor, vertically centered.
    pub fn centered(config: &GameConfig) -> Self {
        Self {
            x: config.ship_x,
            y: Self::center_y(config),
            width: config.ship_width,
            height: config.ship_height,
            speed: config.ship_speed,
        }
    }

    #[inline]
    pub fn center_y(config: &GameConfig) -> f64 {
        config.canvas_height / 2.0 - config.ship_height / 2.0
    }

    /// Lowest `y` that keeps the whole ship inside the play area.
    #[inline]
    pub fn max_y(&self, canvas_height: f64) -> f64 {
        (canvas_height - self.height).max(0.0)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Asteroid {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub speed: f64,
    pub rotation: f64,
    pub rotation_speed: f64,
    pub color: &'static str,
}

impl Asteroid {
    #[inline]
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.size / 2.0, self.y + self.size / 2.0)
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.size / 2.0
    }

    /// True once the trailing edge has crossed the left boundary.
    #[inline]
    pub fn is_off_screen(&self) -> bool {
        self.x + self.size <= 0.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Star {
    pub x: f64,
    pub y: f64,
    pub size: f64,
}

pub fn generate_stars(rng: &mut impl UnitRandom, config: &GameConfig) -> Vec<Star> {
    (0..config.star_count)
        .map(|_| Star {
            x: rng.next_unit() * config.canvas_width,
            y: rng.next_unit() * config.canvas_height,
            size: rng.next_unit() * config.star_max_size,
        })
        .collect()
}

pub fn scroll_stars(stars: &mut [Star], config: &GameConfig, delta_time: f64) {
    for star in stars {
        star.x -= config.star_speed * delta_time;
        if star.x < 0.0 {
            star.x = config.canvas_width;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SeededRng;

    #[test]
    fn centered_ship_uses_half_height_offset() {
        let config = GameConfig::default().with_canvas(800.0, 600.0);
        let ship = Ship::centered(&config);
        assert_eq!(ship.y, 280.0);
        assert_eq!(ship.max_y(600.0), 560.0);
    }

    #[test]
    fn stars_wrap_to_right_edge() {
        let config = GameConfig::default();
        let mut stars = vec![Star {
            x: 1.0,
            y: 10.0,
            size: 1.0,
        }];
        scroll_stars(&mut stars, &config, 0.1);
        assert_eq!(stars[0].x, config.canvas_width);
    }

    #[test]
    fn generated_stars_fill_the_canvas() {
        let config = GameConfig::default();
        let mut rng = SeededRng::new(99);
        let stars = generate_stars(&mut rng, &config);
        assert_eq!(stars.len(), config.star_count);
        for star in &stars {
            assert!((0.0..config.canvas_width).contains(&star.x));
            assert!((0.0..config.canvas_height).contains(&star.y));
            assert!((0.0..config.star_max_size).contains(&star.size));
        }
    }
}
