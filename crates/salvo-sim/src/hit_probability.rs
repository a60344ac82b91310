//! Beam hit probability.
//!
//! ```text
//! size_score     = 0.5 * (1 - mass / 1000)        (mass floored at 100)
//! maneuver_score = acceleration / 1000 + turn_speed / 500
//! defender_score = size_score + maneuver_score + ecm_bonus
//! net_score      = (base_accuracy + sensor_bonus) - (falloff * surface_distance + defender_score)
//! hit_chance     = sigmoid(net_score)
//! ```
//!
//! The distance term must be the ray–surface distance from the firing
//! solution. Center-to-center distance biases every result low.

use salvo_core::components::ShipProfile;
use salvo_core::constants::*;

/// Beam parameters that feed the model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeamAccuracy {
    pub base_accuracy: f64,
    pub accuracy_falloff: f64,
    /// The attacker's sensor bonus.
    pub sensor_bonus: f64,
}

/// Logistic function, strictly increasing, in `(0, 1)` for finite input.
pub fn sigmoid(x: f64) -> f64 {
    // Split on sign so neither branch overflows exp().
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Smaller hulls are harder to hit.
pub fn size_score(profile: &ShipProfile) -> f64 {
    SIZE_SCORE_WEIGHT * (1.0 - profile.effective_mass() / REFERENCE_MASS)
}

pub fn maneuver_score(profile: &ShipProfile) -> f64 {
    profile.acceleration.max(0.0) / ACCELERATION_NORMALIZER
        + profile.turn_speed.max(0.0) / TURN_SPEED_NORMALIZER
}

pub fn defender_score(profile: &ShipProfile) -> f64 {
    size_score(profile) + maneuver_score(profile) + profile.ecm_bonus.max(0.0)
}

/// Pre-sigmoid score for a beam shot at `distance_to_surface`.
pub fn net_score(beam: &BeamAccuracy, distance_to_surface: f64, defender: &ShipProfile) -> f64 {
    let range_penalty = beam.accuracy_falloff * distance_to_surface;
    (beam.base_accuracy + beam.sensor_bonus) - (range_penalty + defender_score(defender))
}

/// Probability that a beam shot hits.
pub fn hit_chance(beam: &BeamAccuracy, distance_to_surface: f64, defender: &ShipProfile) -> f64 {
    sigmoid(net_score(beam, distance_to_surface, defender))
}
