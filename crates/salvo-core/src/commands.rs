//! Fire commands supplied by the AI/command layer.
//!
//! Commands are collected per tick and processed in `(ship, weapon_slot)` order.

use serde::{Deserialize, Serialize};

use crate::types::ShipId;

/// Order for one weapon slot of one ship for the current tick.
/// A missing command means the weapon is idle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FireCommand {
    pub ship: ShipId,
    pub weapon_slot: usize,
    pub target: ShipId,
    /// `false` holds fire while keeping the lock.
    #[serde(default = "default_fire")]
    pub fire: bool,
}

fn default_fire() -> bool {
    true
}

impl FireCommand {
    pub fn fire(ship: ShipId, weapon_slot: usize, target: ShipId) -> Self {
        Self {
            ship,
            weapon_slot,
            target,
            fire: true,
        }
    }

    /// Sort key giving the deterministic processing order.
    pub fn order_key(&self) -> (ShipId, usize) {
        (self.ship, self.weapon_slot)
    }
}
