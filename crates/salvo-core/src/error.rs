//! Fatal engine errors.
//!
//! Per-shot and per-munition anomalies never reach this type; they resolve to
//! a miss or an `Impossible` solution. What remains are broken roll streams
//! and defense data that violates its contract.

use thiserror::Error;

use crate::types::ShipId;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("roll source exhausted after {drawn} draws")]
    RollsExhausted { drawn: u64 },

    #[error("roll source produced {value}, expected a value in [0, 1)")]
    InvalidRoll { value: f64 },

    #[error("{ship} has no core defense layer")]
    MissingCoreLayer { ship: ShipId },

    #[error("{ship} layer '{layer}' has invalid hit points {hp}")]
    InvalidHitPoints { ship: ShipId, layer: String, hp: f64 },

    #[error("{ship} is already registered")]
    DuplicateShip { ship: ShipId },

    #[error("{ship} is not registered")]
    UnknownShip { ship: ShipId },
}

pub type Result<T> = std::result::Result<T, EngineError>;
