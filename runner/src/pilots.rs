//! Input policies that fly the ship without a keyboard.

use asteroid_dodger_core::entities::{Asteroid, Ship};
use asteroid_dodger_core::{GameSession, InputState};

const UP: InputState = InputState {
    up: true,
    down: false,
};
const DOWN: InputState = InputState {
    up: false,
    down: true,
};

pub trait Pilot {
    fn id(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn reset(&mut self, seed: u32);
    fn next_input(&mut self, session: &GameSession) -> InputState;
}

pub fn pilot_ids() -> Vec<&'static str> {
    vec!["idle", "sweeper", "navigator"]
}

pub fn describe_pilots() -> Vec<(&'static str, &'static str)> {
    pilot_ids()
        .into_iter()
        .filter_map(create_pilot)
        .map(|pilot| (pilot.id(), pilot.description()))
        .collect()
}

pub fn create_pilot(id: &str) -> Option<Box<dyn Pilot>> {
    match id {
        "idle" => Some(Box::new(IdlePilot)),
        "sweeper" => Some(Box::new(SweeperPilot::new())),
        "navigator" => Some(Box::new(NavigatorPilot::new())),
        _ => None,
    }
}

pub struct IdlePilot;

impl Pilot for IdlePilot {
    fn id(&self) -> &'static str {
        "idle"
    }

    fn description(&self) -> &'static str {
        "Never touches the controls."
    }

    fn reset(&mut self, _seed: u32) {}

    fn next_input(&mut self, _session: &GameSession) -> InputState {
        InputState::IDLE
    }
}

/// Holds a direction until the ship reaches an edge, then reverses.
pub struct SweeperPilot {
    heading_up: bool,
}

impl SweeperPilot {
    pub fn new() -> Self {
        Self { heading_up: true }
    }
}

impl Default for SweeperPilot {
    fn default() -> Self {
        Self::new()
    }
}

impl Pilot for SweeperPilot {
    fn id(&self) -> &'static str {
        "sweeper"
    }

    fn description(&self) -> &'static str {
        "Sweeps the full height of the canvas, bouncing off the edges."
    }

    fn reset(&mut self, seed: u32) {
        self.heading_up = seed & 1 == 0;
    }

    fn next_input(&mut self, session: &GameSession) -> InputState {
        let ship = session.ship();
        let max_y = ship.max_y(session.config().canvas_height);
        if self.heading_up && ship.y <= 0.0 {
            self.heading_up = false;
        } else if !self.heading_up && ship.y >= max_y {
            self.heading_up = true;
        }
        if self.heading_up {
            UP
        } else {
            DOWN
        }
    }
}

/// Scores each of idle/up/down by how much incoming rock the ship would
/// overlap if it held that input until each asteroid arrives.
pub struct NavigatorPilot {
    horizon_s: f64,
    margin_px: f64,
    center_weight: f64,
}

impl NavigatorPilot {
    pub fn new() -> Self {
        Self {
            horizon_s: 1.2,
            margin_px: 12.0,
            center_weight: 0.15,
        }
    }

    fn danger(&self, session: &GameSession, input: InputState) -> f64 {
        let config = session.config();
        let ship = session.ship();
        let max_y = ship.max_y(config.canvas_height);
        let vy = input.vertical_axis() * ship.speed * config.time_scale;

        let threat: f64 = session
            .asteroids()
            .iter()
            .filter_map(|asteroid| {
                let arrival = arrival_time(ship, asteroid, config.time_scale)?;
                if arrival > self.horizon_s {
                    return None;
                }
                let predicted_y = (ship.y + vy * arrival).clamp(0.0, max_y);
                let overlap = vertical_overlap(
                    predicted_y - self.margin_px,
                    predicted_y + ship.height + self.margin_px,
                    asteroid.y,
                    asteroid.y + asteroid.size,
                );
                Some(overlap * (1.0 - arrival / self.horizon_s))
            })
            .sum();

        // One frame's worth of drift towards the middle as a tie-breaker.
        let next_y = (ship.y + vy / 60.0).clamp(0.0, max_y);
        let center = max_y / 2.0;
        let off_center = if center > 0.0 {
            (next_y - center).abs() / center
        } else {
            0.0
        };

        threat + off_center * self.center_weight
    }
}

impl Default for NavigatorPilot {
    fn default() -> Self {
        Self::new()
    }
}

impl Pilot for NavigatorPilot {
    fn id(&self) -> &'static str {
        "navigator"
    }

    fn description(&self) -> &'static str {
        "Predicts where each asteroid crosses the ship column and steers to the emptiest lane."
    }

    fn reset(&mut self, _seed: u32) {}

    fn next_input(&mut self, session: &GameSession) -> InputState {
        let mut best = (InputState::IDLE, self.danger(session, InputState::IDLE));
        for candidate in [UP, DOWN] {
            let danger = self.danger(session, candidate);
            if danger < best.1 {
                best = (candidate, danger);
            }
        }
        best.0
    }
}

/// Seconds until the asteroid's leading edge reaches the ship's nose, or
/// `None` once it has already passed the ship.
fn arrival_time(ship: &Ship, asteroid: &Asteroid, time_scale: f64) -> Option<f64> {
    if asteroid.x + asteroid.size < ship.x {
        return None;
    }
    let px_per_s = asteroid.speed * time_scale;
    if px_per_s <= 0.0 {
        return None;
    }
    let gap = asteroid.x - (ship.x + ship.width);
    Some((gap / px_per_s).max(0.0))
}

/// Overlap of `[a0, a1]` and `[b0, b1]` as a fraction of the shorter span.
fn vertical_overlap(a0: f64, a1: f64, b0: f64, b1: f64) -> f64 {
    let shared = (a1.min(b1) - a0.max(b0)).max(0.0);
    let shortest = (a1 - a0).min(b1 - b0);
    if shortest <= 0.0 {
        0.0
    } else {
        shared / shortest
    }
}
