//! Weapon engagement and damage resolution engine for SALVO.
//!
//! Owns the hecs world of ships and munitions, resolves fire commands and
//! munition flight once per tick, and reports damage and engagement events.

pub mod config;
pub mod damage;
pub mod engine;
pub mod firing_solution;
pub mod geometry;
pub mod guidance;
pub mod hit_probability;
pub mod rolls;
pub mod scenario;
pub mod spatial;
pub mod systems;
pub mod world_setup;

pub use salvo_core as core;
pub use config::EngineConfig;
pub use engine::EngagementEngine;
pub use rolls::{RollSource, ScriptedRolls, SeededRolls};
pub use world_setup::ShipLoadout;

#[cfg(test)]
mod tests;
