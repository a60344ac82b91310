//! Events and damage reports emitted by the engine each tick.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::{MunitionId, ShipId, Vector2};

/// What delivered a batch of damage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DamageSource {
    Beam { attacker: ShipId, weapon_slot: usize },
    Munition { munition: MunitionId, attacker: ShipId },
}

/// Hit points removed from one layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerLoss {
    pub layer: String,
    pub amount: f64,
}

/// Result of applying one damage quantity to one target.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DamageReport {
    pub raw_amount: f64,
    pub absorbed_by_shield: f64,
    /// Discarded by flat-reduction armor; never reaches any layer.
    pub reduced_by_armor: f64,
    pub layer_losses: Vec<LayerLoss>,
    /// Left over after every layer was emptied.
    pub overkill: f64,
    pub destroyed: bool,
}

impl DamageReport {
    /// Sum of all layer losses.
    pub fn structural_damage(&self) -> f64 {
        self.layer_losses.iter().map(|l| l.amount).sum()
    }

    /// Damage accounted for by shield and structure.
    pub fn total_applied(&self) -> f64 {
        self.absorbed_by_shield + self.structural_damage()
    }
}

/// A damage report tagged with who took it and what caused it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageEvent {
    pub target: ShipId,
    pub source: DamageSource,
    pub report: DamageReport,
}

/// Engagement telemetry for UI, logging and statistical capture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EngagementEvent {
    /// A beam resolved its roll this tick.
    BeamFired {
        attacker: ShipId,
        weapon_slot: usize,
        target: ShipId,
        hit_chance: f64,
        roll: f64,
        hit: bool,
    },
    MunitionSpawned {
        munition: MunitionId,
        kind: MunitionKind,
        attacker: ShipId,
        weapon_slot: usize,
        target: ShipId,
        aim_point: Vector2,
        time_to_impact: f64,
    },
    MunitionImpacted {
        munition: MunitionId,
        target: ShipId,
        position: Vector2,
    },
    MunitionExpired {
        munition: MunitionId,
        reason: ExpiryReason,
    },
    /// The munition's target disappeared; it continues unguided.
    TargetLost { munition: MunitionId, target: ShipId },
    ShipDestroyed { ship: ShipId },
}
