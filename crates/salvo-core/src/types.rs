//! Fundamental geometric and simulation types.
//!
//! Angles exposed in degrees follow the math convention: 0° points along +x,
//! positive rotation is counter-clockwise.

use std::fmt;

use serde::{Deserialize, Serialize};

/// 2D vector in simulation space (world units).
pub type Vector2 = glam::DVec2;

/// Degree-based helpers on [`Vector2`].
pub trait VectorExt: Sized {
    /// Unit vector pointing along `degrees`.
    fn from_angle_deg(degrees: f64) -> Self;
    /// Direction of this vector in degrees, normalized to `[0, 360)`.
    fn angle_deg(self) -> f64;
    /// This vector rotated counter-clockwise by `degrees`.
    fn rotated_deg(self, degrees: f64) -> Self;
}

impl VectorExt for Vector2 {
    fn from_angle_deg(degrees: f64) -> Self {
        let rad = degrees.to_radians();
        Vector2::new(rad.cos(), rad.sin())
    }

    fn angle_deg(self) -> f64 {
        self.y.atan2(self.x).to_degrees().rem_euclid(360.0)
    }

    fn rotated_deg(self, degrees: f64) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Vector2::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }
}

/// Position, velocity and orientation of a ship or munition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct KinematicState {
    pub position: Vector2,
    /// World units per tick.
    pub velocity: Vector2,
    /// Radians, 0 = +x, counter-clockwise.
    pub heading: f64,
    /// Radians per tick.
    pub angular_velocity: f64,
}

impl KinematicState {
    pub fn new(position: Vector2, velocity: Vector2, heading: f64) -> Self {
        Self {
            position,
            velocity,
            heading,
            angular_velocity: 0.0,
        }
    }

    /// A motionless body at `position` facing `heading_deg`.
    pub fn stationary(position: Vector2, heading_deg: f64) -> Self {
        Self::new(position, Vector2::ZERO, heading_deg.to_radians())
    }

    /// Heading in degrees, `[0, 360)`.
    pub fn heading_deg(&self) -> f64 {
        self.heading.to_degrees().rem_euclid(360.0)
    }

    /// Unit vector along the current heading.
    pub fn forward(&self) -> Vector2 {
        Vector2::new(self.heading.cos(), self.heading.sin())
    }
}

/// Stable identifier of a ship, assigned by the engine's registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShipId(pub u32);

impl fmt::Display for ShipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ship#{}", self.0)
    }
}

/// Identifier of a spawned munition. Monotonic in spawn order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MunitionId(pub u64);

impl fmt::Display for MunitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "munition#{}", self.0)
    }
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
}

impl SimTime {
    /// Advance by one tick.
    pub fn advance(&mut self) {
        self.tick += 1;
    }
}
