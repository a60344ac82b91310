//! Guidance and flight integration for spawned munitions.
//!
//! Seekers turn toward their target's bearing at a limited rate. Near-180°
//! bearing errors are damped and the turn direction is latched so the command
//! cannot flip-flop while the error oscillates across ±180°. Ballistic rounds
//! fly straight. Both integrate one tick of motion, burn range and endurance,
//! and report impact or expiry.

use salvo_core::components::{MunitionState, TurnLatch};
use salvo_core::enums::{ExpiryReason, MunitionKind, TurnDirection};
use salvo_core::types::{KinematicState, Vector2, VectorExt};

use crate::config::{GuidanceConfig, ImpactConfig};
use crate::firing_solution::TargetView;
use crate::geometry::{angle_difference, normalize_angle, surface_distance};

/// Turn to apply this tick and the latch state to carry forward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteeringCommand {
    /// Signed degrees, counter-clockwise positive.
    pub turn_deg: f64,
    pub latch: Option<TurnLatch>,
}

/// Fraction of the turn rate allowed at bearing error `error_deg` (absolute).
///
/// Full authority up to the damping threshold, then a cosine roll-off that
/// reaches zero at 180°, floored at `min_turn_scale`.
pub fn turn_scale(error_deg: f64, cfg: &GuidanceConfig) -> f64 {
    let threshold = cfg.damping_threshold_deg.clamp(0.0, 179.0);
    if error_deg <= threshold {
        return 1.0;
    }
    let excess = (error_deg - threshold) / (180.0 - threshold);
    let scale = (excess.min(1.0) * std::f64::consts::FRAC_PI_2).cos();
    scale.max(cfg.min_turn_scale).min(1.0)
}

/// Compute the rate-limited turn from `heading_deg` toward `bearing_deg`.
pub fn steer(
    heading_deg: f64,
    bearing_deg: f64,
    turn_rate: f64,
    latch: Option<TurnLatch>,
    cfg: &GuidanceConfig,
) -> SteeringCommand {
    let delta = angle_difference(heading_deg, bearing_deg);
    let error = delta.abs();

    let (direction, latch) = if error > cfg.latch_threshold_deg {
        match latch {
            Some(held) if held.ticks_remaining > 0 => (
                held.direction,
                Some(TurnLatch {
                    direction: held.direction,
                    ticks_remaining: held.ticks_remaining - 1,
                }),
            ),
            _ => {
                let direction = TurnDirection::of(delta);
                (
                    direction,
                    Some(TurnLatch {
                        direction,
                        ticks_remaining: cfg.latch_ticks,
                    }),
                )
            }
        }
    } else {
        (TurnDirection::of(delta), None)
    };

    let authority = turn_rate.max(0.0) * turn_scale(error, cfg);
    let magnitude = authority.min(error);
    SteeringCommand {
        turn_deg: direction.sign() * magnitude,
        latch,
    }
}

/// Result of advancing one munition by one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FlightOutcome {
    Flying,
    Impacted { position: Vector2 },
    Expired(ExpiryReason),
}

/// Advance a munition one tick.
///
/// `target` is `None` when the target no longer exists; the munition then
/// holds its last heading and can only expire. Once lost, a target is never
/// reacquired.
pub fn advance_munition(
    kinematics: &mut KinematicState,
    state: &mut MunitionState,
    target: Option<&TargetView>,
    guidance: &GuidanceConfig,
    impact: &ImpactConfig,
) -> FlightOutcome {
    let target = if state.target_lost { None } else { target };
    if target.is_none() {
        state.target_lost = true;
        state.latch = None;
    }

    let mut turn_deg = 0.0;
    if let (MunitionKind::Seeker, Some(target)) = (state.kind, target) {
        let offset = target.position - kinematics.position;
        if offset.is_finite() && offset.length_squared() > 0.0 {
            let command = steer(
                kinematics.heading_deg(),
                offset.angle_deg(),
                state.turn_rate,
                state.latch,
                guidance,
            );
            turn_deg = command.turn_deg;
            state.latch = command.latch;
        }
    }
    if turn_deg != 0.0 {
        kinematics.heading = normalize_angle(kinematics.heading_deg() + turn_deg).to_radians();
    }
    kinematics.angular_velocity = turn_deg.to_radians();

    let direction = kinematics.forward();
    let start = kinematics.position;
    kinematics.velocity = direction * state.speed;
    kinematics.position = start + kinematics.velocity;

    state.remaining_range -= state.speed;
    if let Some(endurance) = state.remaining_endurance.as_mut() {
        *endurance = endurance.saturating_sub(1);
    }

    if let Some(target) = target {
        if let Some(position) = impact_point(start, kinematics.position, direction, state.speed, target, impact) {
            return FlightOutcome::Impacted { position };
        }
    }
    if state.remaining_range <= 0.0 {
        return FlightOutcome::Expired(ExpiryReason::RangeExhausted);
    }
    if state.remaining_endurance == Some(0) {
        return FlightOutcome::Expired(ExpiryReason::EnduranceExhausted);
    }
    FlightOutcome::Flying
}

/// Where this tick's flight touched the target circle, if it did.
fn impact_point(
    start: Vector2,
    end: Vector2,
    direction: Vector2,
    step: f64,
    target: &TargetView,
    impact: &ImpactConfig,
) -> Option<Vector2> {
    if end.distance(target.position) <= target.radius {
        return Some(end);
    }
    if !impact.swept {
        return None;
    }
    surface_distance(start, direction, target.position, target.radius, step).map(|t| start + direction * t)
}
