use crate::constants::{
    HIT_BOX_HEIGHT_SCALE, HIT_BOX_WIDTH_SCALE, HIT_BOX_X_INSET, HIT_BOX_Y_INSET,
};
use crate::entities::{Asteroid, Ship};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitCircle {
    pub cx: f64,
    pub cy: f64,
    pub radius: f64,
}

impl HitCircle {
    /// Strict overlap: circles that exactly touch do not collide.
    #[inline]
    pub fn overlaps(&self, other: &HitCircle) -> bool {
        let distance = (self.cx - other.cx).hypot(self.cy - other.cy);
        distance < self.radius + other.radius
    }
}

/// Circle inscribed in the ship's inset hit box (50% width, 60% height,
/// centered on the sprite box).
#[inline]
pub fn ship_hit_circle(ship: &Ship) -> HitCircle {
    let rx = ship.x + ship.width * HIT_BOX_X_INSET;
    let ry = ship.y + ship.height * HIT_BOX_Y_INSET;
    let rw = ship.width * HIT_BOX_WIDTH_SCALE;
    let rh = ship.height * HIT_BOX_HEIGHT_SCALE;

    HitCircle {
        cx: rx + rw / 2.0,
        cy: ry + rh / 2.0,
        radius: rw.min(rh) / 2.0,
    }
}

#[inline]
pub fn asteroid_hit_circle(asteroid: &Asteroid) -> HitCircle {
    let (cx, cy) = asteroid.center();
    HitCircle {
        cx,
        cy,
        radius: asteroid.radius(),
    }
}

#[inline]
pub fn is_colliding(ship: &Ship, asteroid: &Asteroid) -> bool {
    ship_hit_circle(ship).overlaps(&asteroid_hit_circle(asteroid))
}

/// Index of the first asteroid touching the ship, in collection order.
pub fn first_collision(ship: &Ship, asteroids: &[Asteroid]) -> Option<usize> {
    let ship_circle = ship_hit_circle(ship);
    asteroids
        .iter()
        .position(|asteroid| ship_circle.overlaps(&asteroid_hit_circle(asteroid)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ship_at(y: f64) -> Ship {
        Ship {
            x: 50.0,
            y,
            width: 60.0,
            height: 40.0,
            speed: 3.0,
        }
    }

    fn asteroid_at(x: f64, y: f64, size: f64) -> Asteroid {
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

    #[test]
    fn hit_circle_is_inset_and_centered() {
        let circle = ship_hit_circle(&ship_at(280.0));
        assert_eq!(circle.cx, 80.0);
        assert_eq!(circle.cy, 300.0);
        // min(30, 24) / 2
        assert_eq!(circle.radius, 12.0);
    }

    #[test]
    fn exact_touch_is_not_a_collision() {
        let ship = ship_at(280.0);
        // Asteroid radius 10, center at (102, 300): distance 22 == 12 + 10.
        let touching = asteroid_at(92.0, 290.0, 20.0);
        assert!(!is_colliding(&ship, &touching));
    }

    #[test]
    fn epsilon_either_side_of_touch() {
        let ship = ship_at(280.0);
        let eps = 1e-9;
        assert!(is_colliding(&ship, &asteroid_at(92.0 - eps, 290.0, 20.0)));
        assert!(!is_colliding(&ship, &asteroid_at(92.0 + eps, 290.0, 20.0)));
    }

    #[test]
    fn sprite_corner_overlap_without_hit_circle_overlap_is_safe() {
        let ship = ship_at(280.0);
        // Overlaps the 60x40 sprite box at its top-right corner only.
        let corner = asteroid_at(100.0, 262.0, 20.0);
        assert!(!is_colliding(&ship, &corner));
    }

    #[test]
    fn first_collision_reports_earliest_index() {
        let ship = ship_at(280.0);
        let asteroids = vec![
            asteroid_at(600.0, 10.0, 30.0),
            asteroid_at(70.0, 290.0, 20.0),
            asteroid_at(72.0, 292.0, 20.0),
        ];
        assert_eq!(first_collision(&ship, &asteroids), Some(1));
        assert_eq!(first_collision(&ship, &asteroids[..1]), None);
    }
}
