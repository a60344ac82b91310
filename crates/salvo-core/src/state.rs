//! Per-tick output handed to the wider simulation loop.

use serde::{Deserialize, Serialize};

use crate::events::{DamageEvent, EngagementEvent};

/// Everything that happened during one engine tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    /// The tick that was just processed.
    pub tick: u64,
    pub damage: Vec<DamageEvent>,
    pub events: Vec<EngagementEvent>,
}

impl TickReport {
    pub fn is_quiet(&self) -> bool {
        self.damage.is_empty() && self.events.is_empty()
    }
}

/// Running totals since the engine was created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementStats {
    pub beam_shots: u32,
    pub beam_hits: u32,
    pub beam_misses: u32,
    pub munitions_launched: u32,
    pub munitions_impacted: u32,
    pub munitions_expired: u32,
    pub ships_destroyed: u32,
}
