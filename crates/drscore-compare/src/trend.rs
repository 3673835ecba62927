use serde::{Deserialize, Serialize};

const EPSILON: f64 = 1e-5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Flat,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trend {
    pub delta_score: f64,
    pub delta_percent: f64,
    pub direction: Direction,
    pub from: f64,
    pub to: f64,
}

impl Trend {
    /// Movement from `previous` to `current`; percent is 0 when `previous` is ~0.
    pub fn compute(previous: f64, current: f64) -> Self {
        let delta = current - previous;
        let delta_percent = if previous.abs() > EPSILON {
            delta / previous * 100.0
        } else {
            0.0
        };
        let direction = if delta > EPSILON {
            Direction::Up
        } else if delta < -EPSILON {
            Direction::Down
        } else {
            Direction::Flat
        };

        Self {
            delta_score: round2(delta),
            delta_percent: round2(delta_percent),
            direction,
            from: round2(previous),
            to: round2(current),
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
