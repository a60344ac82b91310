//! Firing solutions: can this weapon reach this target, and how.
//!
//! Beams fire along the hull heading and resolve to the distance at which that
//! ray meets the target's surface; a ray that passes the target dissipates at
//! range and yields no solution. Travel-time weapons
//! resolve to an intercept aim point from the constant-velocity lead equation
//! `|target_pos + target_vel * t - origin| = projectile_speed * t`.

use serde::{Deserialize, Serialize};
use tracing::debug;

use salvo_core::components::{WeaponDescriptor, WeaponKind};
use salvo_core::constants::{MIN_SEPARATION, SOLVER_EPSILON};
use salvo_core::types::{KinematicState, Vector2, VectorExt};

use crate::geometry::{in_arc, surface_distance};

/// What the solver needs to know about a target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetView {
    pub position: Vector2,
    pub velocity: Vector2,
    pub radius: f64,
}

/// Outcome of evaluating one weapon against one target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FiringSolution {
    Impossible,
    /// Beam weapons: distance from the muzzle to the target's surface.
    Instant { distance_to_surface: f64 },
    /// Travel-time weapons: where to aim and how long the flight takes.
    Intercept { aim_point: Vector2, time_to_impact: f64 },
}

impl FiringSolution {
    pub fn is_possible(&self) -> bool {
        !matches!(self, FiringSolution::Impossible)
    }
}

/// Why a solution came out impossible. Logged, never surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejection {
    NoTarget,
    UnusableWeapon,
    DegenerateGeometry,
    OutOfRange,
    OutOfArc,
    BeamMissesSurface,
}

/// Evaluate `weapon`, mounted on `attacker`, against `target`.
pub fn solve(
    attacker: &KinematicState,
    weapon: &WeaponDescriptor,
    target: Option<&TargetView>,
) -> FiringSolution {
    match evaluate(attacker, weapon, target) {
        Ok(solution) => solution,
        Err(reason) => {
            debug!(weapon = %weapon.name, ?reason, "no firing solution");
            FiringSolution::Impossible
        }
    }
}

fn evaluate(
    attacker: &KinematicState,
    weapon: &WeaponDescriptor,
    target: Option<&TargetView>,
) -> Result<FiringSolution, Rejection> {
    let target = target.ok_or(Rejection::NoTarget)?;
    if !weapon.is_usable() {
        return Err(Rejection::UnusableWeapon);
    }

    let origin = attacker.position;
    let rel_pos = target.position - origin;
    if !rel_pos.is_finite() || !target.velocity.is_finite() || !target.radius.is_finite() {
        return Err(Rejection::DegenerateGeometry);
    }
    let center_distance = rel_pos.length();
    if center_distance < MIN_SEPARATION {
        return Err(Rejection::DegenerateGeometry);
    }

    // Range policy matches hit geometry: measure to the surface, not the center.
    if center_distance - target.radius > weapon.range {
        return Err(Rejection::OutOfRange);
    }
    if !in_arc(attacker.heading_deg(), rel_pos.angle_deg(), weapon.arc_half_angle) {
        return Err(Rejection::OutOfArc);
    }

    match weapon.kind {
        WeaponKind::Beam { .. } => {
            surface_distance(origin, attacker.forward(), target.position, target.radius, weapon.range)
                .map(|distance_to_surface| FiringSolution::Instant {
                    distance_to_surface,
                })
                .ok_or(Rejection::BeamMissesSurface)
        }
        WeaponKind::Ballistic { projectile_speed }
        | WeaponKind::Seeker {
            projectile_speed, ..
        } => Ok(lead_solution(
            target,
            rel_pos,
            center_distance,
            projectile_speed,
        )),
    }
}

/// Intercept for a travel-time weapon, falling back to direct aim at the
/// target's current position when no positive intercept time exists.
fn lead_solution(
    target: &TargetView,
    rel_pos: Vector2,
    center_distance: f64,
    projectile_speed: f64,
) -> FiringSolution {
    match intercept_time(rel_pos, target.velocity, projectile_speed) {
        Some(t) => FiringSolution::Intercept {
            aim_point: target.position + target.velocity * t,
            time_to_impact: t,
        },
        None => FiringSolution::Intercept {
            aim_point: target.position,
            time_to_impact: center_distance / projectile_speed,
        },
    }
}

/// Smallest positive `t` with `|rel_pos + target_vel * t| = speed * t`.
///
/// Expands to `a t² + b t + c = 0` with `a = speed² - |v|²`,
/// `b = -2 (rel_pos · v)`, `c = -|rel_pos|²`. When `a` vanishes the equation
/// is linear; when `b` also vanishes the motion is parallel and non-closing.
pub fn intercept_time(rel_pos: Vector2, target_vel: Vector2, speed: f64) -> Option<f64> {
    let a = speed * speed - target_vel.length_squared();
    let b = -2.0 * rel_pos.dot(target_vel);
    let c = -rel_pos.length_squared();

    if a.abs() < SOLVER_EPSILON {
        if b.abs() < SOLVER_EPSILON {
            return None;
        }
        let t = -c / b;
        return (t.is_finite() && t > 0.0).then_some(t);
    }

    let discriminant = b * b - 4.0 * a * c;
    if !discriminant.is_finite() || discriminant < 0.0 {
        return None;
    }
    let root = discriminant.sqrt();
    let t1 = (-b - root) / (2.0 * a);
    let t2 = (-b + root) / (2.0 * a);
    [t1, t2]
        .into_iter()
        .filter(|t| t.is_finite() && *t > 0.0)
        .min_by(|x, y| x.total_cmp(y))
}
