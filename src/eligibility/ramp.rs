use super::config::RampConfig;

/// Which side of the threshold earns credit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    HigherIsBetter,
    LowerIsBetter,
}

/// Piecewise-linear partial-credit scale shared by every criterion.
///
/// Full credit once the value reaches `full_at`; otherwise
/// `0.5 + distance / band` where distance is measured from `threshold`
/// towards the good side, clamped to [0, 1].
#[derive(Debug, Clone, Copy)]
pub struct Ramp {
    pub threshold: f64,
    pub full_at: f64,
    pub band: f64,
    pub direction: Direction,
}

impl Ramp {
    pub fn new(config: &RampConfig, direction: Direction) -> Self {
        Self {
            threshold: config.threshold,
            full_at: config.full_at,
            band: config.band,
            direction,
        }
    }

    /// Weight in [0, 1] for `value`. Total over every f64 except NaN, which
    /// scores 0.
    pub fn weight(&self, value: f64) -> f64 {
        let (fully_met, distance) = match self.direction {
            Direction::HigherIsBetter => (value >= self.full_at, value - self.threshold),
            Direction::LowerIsBetter => (value <= self.full_at, self.threshold - value),
        };

        if fully_met {
            return 1.0;
        }

        let weight = 0.5 + distance / self.band;
        if weight.is_nan() {
            0.0
        } else {
            weight.clamp(0.0, 1.0)
        }
    }
}
