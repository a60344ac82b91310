//! Scenario definitions loaded from TOML.
//!
//! A scenario lists ships with their loadouts, standing fire orders and the
//! seed and tick count to run with. Between ticks the runner stands in for
//! the physics layer and drifts every ship along its velocity.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use salvo_core::commands::FireCommand;
use salvo_core::components::*;
use salvo_core::error::EngineError;
use salvo_core::state::{EngagementStats, TickReport};
use salvo_core::types::{KinematicState, ShipId, Vector2};

use crate::config::EngineConfig;
use crate::engine::EngagementEngine;
use crate::rolls::RollSource;
use crate::world_setup::ShipLoadout;

/// Scenario loading and running errors.
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("failed to read scenario: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse scenario: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("engine error: {0}")]
    Engine(#[from] EngineError),
}

/// A complete scenario file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioDef {
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_ticks")]
    pub ticks: u64,
    #[serde(default)]
    pub config: EngineConfig,
    #[serde(default)]
    pub ships: Vec<ShipDef>,
    #[serde(default)]
    pub orders: Vec<OrderDef>,
}

fn default_seed() -> u64 {
    42
}

fn default_ticks() -> u64 {
    100
}

/// One ship in a scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipDef {
    pub id: ShipId,
    #[serde(default)]
    pub name: String,
    pub position: Vector2,
    #[serde(default)]
    pub velocity: Vector2,
    #[serde(default)]
    pub heading_deg: f64,
    pub profile: ShipProfile,
    #[serde(default)]
    pub weapons: Vec<WeaponDescriptor>,
    pub layers: Vec<LayerDef>,
}

/// A defense layer; starts at full health unless `current_hp` is given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerDef {
    pub name: String,
    pub max_hp: f64,
    #[serde(default)]
    pub current_hp: Option<f64>,
    #[serde(default)]
    pub modifiers: Vec<ArmorModifier>,
}

/// A fire command repeated every tick in `[start_tick, end_tick)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDef {
    pub ship: ShipId,
    pub weapon_slot: usize,
    pub target: ShipId,
    #[serde(default)]
    pub start_tick: u64,
    #[serde(default)]
    pub end_tick: Option<u64>,
}

impl OrderDef {
    pub fn active_at(&self, tick: u64) -> bool {
        tick >= self.start_tick && self.end_tick.map_or(true, |end| tick < end)
    }
}

impl ShipDef {
    pub fn loadout(&self) -> ShipLoadout {
        let kinematics = KinematicState::new(self.position, self.velocity, self.heading_deg.to_radians());
        let layers = self
            .layers
            .iter()
            .map(|def| DefenseLayer {
                name: def.name.clone(),
                current_hp: def.current_hp.unwrap_or(def.max_hp),
                max_hp: def.max_hp,
                modifiers: def.modifiers.clone(),
            })
            .collect();
        ShipLoadout {
            kinematics,
            profile: self.profile,
            weapons: self.weapons.clone(),
            layers,
        }
    }
}

impl ScenarioDef {
    pub fn from_toml_str(content: &str) -> Result<Self, ScenarioError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Create an engine with every ship registered.
    pub fn build(&self) -> Result<EngagementEngine, ScenarioError> {
        let mut engine = EngagementEngine::new(self.config);
        for ship in &self.ships {
            engine.add_ship_with_id(ship.id, ship.loadout())?;
        }
        info!(scenario = %self.name, ships = self.ships.len(), "scenario built");
        Ok(engine)
    }

    /// Fire commands for `tick`.
    pub fn commands_at(&self, tick: u64) -> Vec<FireCommand> {
        self.orders
            .iter()
            .filter(|o| o.active_at(tick))
            .map(|o| FireCommand::fire(o.ship, o.weapon_slot, o.target))
            .collect()
    }

    /// Run `ticks` ticks on `engine`, handing every report to `on_tick`.
    pub fn run<R: RollSource + ?Sized>(
        &self,
        engine: &mut EngagementEngine,
        ticks: u64,
        rolls: &mut R,
        mut on_tick: impl FnMut(&TickReport),
    ) -> Result<EngagementStats, ScenarioError> {
        for _ in 0..ticks {
            let commands = self.commands_at(engine.time().tick);
            let report = engine.tick(&commands, rolls)?;
            on_tick(&report);
            drift_ships(engine)?;
        }
        Ok(engine.stats())
    }
}

/// Move every surviving ship one tick along its velocity.
pub fn drift_ships(engine: &mut EngagementEngine) -> Result<(), EngineError> {
    let ids: Vec<ShipId> = engine.ship_ids().collect();
    for id in ids {
        if engine.is_destroyed(id) {
            continue;
        }
        if let Some(mut kin) = engine.kinematics(id) {
            if kin.velocity == Vector2::ZERO {
                continue;
            }
            kin.position += kin.velocity;
            engine.update_kinematics(id, kin)?;
        }
    }
    Ok(())
}
