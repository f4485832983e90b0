use std::f64::consts::LN_2;

/// Height added by a single edit before saturation.
pub const HEAT_INCREMENT: f64 = 1.0;

/// Multiplier that decays a heat value across `elapsed_ms` with the given half-life.
///
/// Negative intervals do not decay (factor 1.0).
pub fn decay_factor(elapsed_ms: f64, half_life_ms: f64) -> f64 {
    if elapsed_ms <= 0.0 {
        return 1.0;
    }
    (-elapsed_ms * LN_2 / half_life_ms).exp()
}

/// Value after one edit lands on a pixel whose decayed height is `current`.
///
/// The increment is scaled by `exp(-current / scale_height)`; `scale_height = inf` gives a fixed
/// increment.
pub fn saturating_increment(current: f64, scale_height: f64) -> f64 {
    current + HEAT_INCREMENT * (-current / scale_height).exp()
}
