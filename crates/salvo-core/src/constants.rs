//! Simulation constants and tuning parameters.

// --- Hull geometry ---

/// Masses below this are raised to it before any radius or size computation.
pub const MIN_DEFENDER_MASS: f64 = 100.0;

/// Collision radius of a hull with `REFERENCE_MASS`.
pub const RADIUS_SCALE: f64 = 40.0;

/// Mass that maps to a collision radius of exactly `RADIUS_SCALE`.
pub const REFERENCE_MASS: f64 = 1000.0;

// --- Hit probability model ---

/// Weight of the size term in the defender score.
pub const SIZE_SCORE_WEIGHT: f64 = 0.5;

/// Acceleration that contributes 1.0 to the maneuver score.
pub const ACCELERATION_NORMALIZER: f64 = 1000.0;

/// Turn speed that contributes 1.0 to the maneuver score.
pub const TURN_SPEED_NORMALIZER: f64 = 500.0;

// --- Arcs ---

/// Half-angles at or above this are omnidirectional.
pub const OMNIDIRECTIONAL_HALF_ANGLE: f64 = 180.0;

// --- Intercept solver ---

/// Quadratic coefficients below this magnitude are treated as zero.
pub const SOLVER_EPSILON: f64 = 1e-9;

/// Distances below this are degenerate geometry (attacker on top of target).
pub const MIN_SEPARATION: f64 = 1e-6;

// --- Guidance ---

/// Bearing error beyond which turn commands are damped.
pub const GUIDANCE_DAMPING_THRESHOLD_DEG: f64 = 90.0;

/// Bearing error beyond which the chosen turn direction is latched.
pub const GUIDANCE_LATCH_THRESHOLD_DEG: f64 = 150.0;

/// Ticks a latched turn direction is held before it may be re-evaluated.
pub const GUIDANCE_LATCH_TICKS: u32 = 12;

/// Lower bound on the damped turn scale so a munition never stops turning.
pub const GUIDANCE_MIN_TURN_SCALE: f64 = 0.35;
