//! Engagement engine: the per-tick orchestrator.
//!
//! `EngagementEngine` owns the hecs world holding ships and munitions, the
//! ship id index, and running stats. It never owns randomness: every tick is
//! handed a [`RollSource`]. Completely headless and deterministic for a given
//! roll stream and command sequence.

use std::borrow::Cow;
use std::collections::BTreeMap;

use hecs::{Entity, World};
use tracing::{debug, info};

use salvo_core::commands::FireCommand;
use salvo_core::components::*;
use salvo_core::error::{EngineError, Result};
use salvo_core::events::EngagementEvent;
use salvo_core::state::{EngagementStats, TickReport};
use salvo_core::types::{KinematicState, ShipId, SimTime, Vector2};

use crate::config::EngineConfig;
use crate::rolls::RollSource;
use crate::spatial::{RayHit, SpatialIndex};
use crate::systems;
use crate::world_setup::{self, ShipLoadout};

/// The engagement engine. Owns the ECS world and all engine state.
pub struct EngagementEngine {
    world: World,
    ships: BTreeMap<ShipId, Entity>,
    index: SpatialIndex,
    /// Set by registry changes; the index is rebuilt at the next tick.
    index_dirty: bool,
    config: EngineConfig,
    time: SimTime,
    next_ship_id: u32,
    next_munition_id: u64,
    stats: EngagementStats,
    despawn_buffer: Vec<Entity>,
}

impl Default for EngagementEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl EngagementEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            world: World::new(),
            ships: BTreeMap::new(),
            index: SpatialIndex::default(),
            index_dirty: false,
            config,
            time: SimTime::default(),
            next_ship_id: 0,
            next_munition_id: 0,
            stats: EngagementStats::default(),
            despawn_buffer: Vec::new(),
        }
    }

    // ---- Ship registry ----

    /// Register a ship under the next free id.
    pub fn add_ship(&mut self, loadout: ShipLoadout) -> Result<ShipId> {
        let id = ShipId(self.next_ship_id);
        self.add_ship_with_id(id, loadout)?;
        Ok(id)
    }

    /// Register a ship under a caller-chosen id.
    pub fn add_ship_with_id(&mut self, id: ShipId, loadout: ShipLoadout) -> Result<()> {
        if self.ships.contains_key(&id) {
            return Err(EngineError::DuplicateShip { ship: id });
        }
        let entity = world_setup::spawn_ship(&mut self.world, id, loadout);
        self.ships.insert(id, entity);
        self.next_ship_id = self.next_ship_id.max(id.0.saturating_add(1));
        self.index_dirty = true;
        info!(ship = %id, "ship registered");
        Ok(())
    }

    /// Remove a ship. Munitions locked onto it lose their target on the next tick.
    pub fn remove_ship(&mut self, id: ShipId) -> Result<()> {
        let entity = self.ships.remove(&id).ok_or(EngineError::UnknownShip { ship: id })?;
        let _ = self.world.despawn(entity);
        self.index_dirty = true;
        info!(ship = %id, "ship removed");
        Ok(())
    }

    /// Overwrite a ship's kinematic state from the physics layer.
    pub fn update_kinematics(&mut self, id: ShipId, kinematics: KinematicState) -> Result<()> {
        let entity = self.entity(id)?;
        *self
            .world
            .get::<&mut KinematicState>(entity)
            .map_err(|_| EngineError::UnknownShip { ship: id })? = kinematics;
        self.index_dirty = true;
        Ok(())
    }

    /// Rebuild a ship's weapons and defenses after its components changed.
    pub fn refit(&mut self, id: ShipId, weapons: Vec<WeaponDescriptor>, layers: Vec<DefenseLayer>) -> Result<()> {
        let entity = self.entity(id)?;
        world_setup::refit_ship(&mut self.world, entity, id, weapons, layers)
            .map_err(|_| EngineError::UnknownShip { ship: id })?;
        debug!(ship = %id, "ship refitted");
        Ok(())
    }

    /// Replace a ship's hull scalars.
    pub fn update_profile(&mut self, id: ShipId, profile: ShipProfile) -> Result<()> {
        let entity = self.entity(id)?;
        *self
            .world
            .get::<&mut ShipProfile>(entity)
            .map_err(|_| EngineError::UnknownShip { ship: id })? = profile;
        self.index_dirty = true;
        Ok(())
    }

    // ---- Tick ----

    /// Advance the engine by one tick.
    ///
    /// Order: shield regeneration, spatial index rebuild, fire commands in
    /// `(ship, weapon_slot)` order, munitions in spawn order, cleanup. An
    /// error aborts the tick; the engine state is then unspecified.
    pub fn tick<R: RollSource + ?Sized>(&mut self, commands: &[FireCommand], rolls: &mut R) -> Result<TickReport> {
        let mut report = TickReport {
            tick: self.time.tick,
            ..Default::default()
        };

        systems::shields::run(&mut self.world);
        self.index.rebuild(&self.world);
        self.index_dirty = false;

        let mut ordered = commands.to_vec();
        ordered.sort_by_key(FireCommand::order_key);
        ordered.dedup_by_key(|c| c.order_key());

        systems::fire_control::run(
            &mut self.world,
            &self.ships,
            &self.index,
            &ordered,
            rolls,
            &mut self.next_munition_id,
            &mut report,
            &mut self.stats,
        )?;
        systems::munitions::run(
            &mut self.world,
            &self.ships,
            &self.index,
            &self.config,
            &mut report,
            &mut self.stats,
        )?;
        systems::cleanup::run(&mut self.world, &mut self.despawn_buffer);

        if report
            .events
            .iter()
            .any(|e| matches!(e, EngagementEvent::ShipDestroyed { .. }))
        {
            self.index_dirty = true;
        }

        self.time.advance();
        Ok(report)
    }

    // ---- Queries ----

    /// Current hit probability for a beam in `slot` of `attacker` against
    /// `target`, without drawing a roll. `None` when either ship is missing or
    /// destroyed, the slot is not a beam, or there is no firing solution.
    pub fn hit_probability(&self, attacker: ShipId, slot: usize, target: ShipId) -> Option<f64> {
        let attacker_entity = *self.ships.get(&attacker)?;
        let target_entity = *self.ships.get(&target)?;
        if systems::strike::is_destroyed(&self.world, attacker_entity)
            || systems::strike::is_destroyed(&self.world, target_entity)
        {
            return None;
        }
        let weapon = self.world.get::<&Armament>(attacker_entity).ok()?.weapons.get(slot)?.clone();
        let attacker_kin = *self.world.get::<&KinematicState>(attacker_entity).ok()?;
        let attacker_profile = *self.world.get::<&ShipProfile>(attacker_entity).ok()?;
        let view = self.current_index().target_view(target)?;
        let defender = *self.world.get::<&ShipProfile>(target_entity).ok()?;
        systems::fire_control::beam_hit_chance(&attacker_kin, &attacker_profile, &weapon, &view, &defender)
    }

    /// Nearest ship surface along a ray, from the current spatial index.
    pub fn cast_ray(&self, origin: Vector2, direction: Vector2, max_range: f64, ignore: Option<ShipId>) -> Option<RayHit> {
        self.current_index().cast_ray(origin, direction, max_range, ignore)
    }

    /// Registered ship ids in ascending order.
    pub fn ship_ids(&self) -> impl Iterator<Item = ShipId> + '_ {
        self.ships.keys().copied()
    }

    pub fn kinematics(&self, id: ShipId) -> Option<KinematicState> {
        let entity = *self.ships.get(&id)?;
        self.world.get::<&KinematicState>(entity).ok().map(|k| *k)
    }

    pub fn defenses(&self, id: ShipId) -> Option<Defenses> {
        let entity = *self.ships.get(&id)?;
        self.world.get::<&Defenses>(entity).ok().map(|d| Defenses::clone(&d))
    }

    pub fn is_destroyed(&self, id: ShipId) -> bool {
        self.ships
            .get(&id)
            .is_some_and(|&entity| systems::strike::is_destroyed(&self.world, entity))
    }

    /// Live munitions, in spawn order.
    pub fn munitions(&self) -> Vec<(KinematicState, MunitionState)> {
        world_setup::munition_order(&self.world)
            .into_iter()
            .filter_map(|(_, entity)| {
                let kin = *self.world.get::<&KinematicState>(entity).ok()?;
                let state = self.world.get::<&MunitionState>(entity).ok().map(|s| MunitionState::clone(&s))?;
                Some((kin, state))
            })
            .collect()
    }

    pub fn stats(&self) -> EngagementStats {
        self.stats
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// The spatial index as of now, built fresh if the registry changed
    /// since the last tick.
    fn current_index(&self) -> Cow<'_, SpatialIndex> {
        if self.index_dirty {
            Cow::Owned(SpatialIndex::build(&self.world))
        } else {
            Cow::Borrowed(&self.index)
        }
    }

    fn entity(&self, id: ShipId) -> Result<Entity> {
        self.ships.get(&id).copied().ok_or(EngineError::UnknownShip { ship: id })
    }
}
