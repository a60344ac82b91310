//! Enumeration types used throughout the engine.

use serde::{Deserialize, Serialize};

/// Capability tag of a weapon, without its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponClass {
    /// Instantaneous hit-scan weapon resolved by a probability roll.
    Beam,
    /// Unguided travel-time projectile.
    Ballistic,
    /// Guided homing munition.
    Seeker,
}

/// Kind of a spawned munition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MunitionKind {
    /// Flies straight at its launch aim point.
    Ballistic,
    /// Steers toward its target every tick.
    Seeker,
}

/// Munition lifecycle state. `Impacted` and `Expired` are terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MunitionPhase {
    #[default]
    Flying,
    Impacted,
    Expired,
}

impl MunitionPhase {
    pub fn is_terminal(self) -> bool {
        !matches!(self, MunitionPhase::Flying)
    }
}

/// Rotation sense of a guidance turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnDirection {
    /// Counter-clockwise (positive angle).
    Left,
    /// Clockwise (negative angle).
    Right,
}

impl TurnDirection {
    /// Direction of a signed angle; zero and +180 count as left.
    pub fn of(delta_deg: f64) -> Self {
        if delta_deg < 0.0 {
            TurnDirection::Right
        } else {
            TurnDirection::Left
        }
    }

    pub fn sign(self) -> f64 {
        match self {
            TurnDirection::Left => 1.0,
            TurnDirection::Right => -1.0,
        }
    }
}

/// Why a munition expired without impact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpiryReason {
    RangeExhausted,
    EnduranceExhausted,
}
