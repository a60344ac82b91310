//! Entity spawn factories for ships and munitions.
//!
//! Ships and munitions are plain hecs entities with component bundles from
//! `salvo_core::components`.

use hecs::{Entity, World};
use serde::{Deserialize, Serialize};
use tracing::warn;

use salvo_core::components::*;
use salvo_core::types::{KinematicState, MunitionId, ShipId};

/// Everything the data layer supplies to register one ship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipLoadout {
    pub kinematics: KinematicState,
    pub profile: ShipProfile,
    #[serde(default)]
    pub weapons: Vec<WeaponDescriptor>,
    /// Outermost first; the last layer is the core.
    pub layers: Vec<DefenseLayer>,
}

/// Spawn a ship entity with its weapons and defenses.
pub fn spawn_ship(world: &mut World, id: ShipId, loadout: ShipLoadout) -> Entity {
    warn_unusable_weapons(id, &loadout.weapons);
    world.spawn((
        Ship { id },
        loadout.kinematics,
        loadout.profile,
        Armament {
            weapons: loadout.weapons,
        },
        Defenses::from_stack(DefenseLayerStack::new(loadout.layers)),
    ))
}

/// Replace a ship's weapons and defenses after its components changed.
///
/// Layer hit points come from the new stack. The shield pool is rebuilt from
/// the new crystalline modifiers but keeps its current charge, capped at the
/// new maximum.
pub fn refit_ship(
    world: &mut World,
    entity: Entity,
    id: ShipId,
    weapons: Vec<WeaponDescriptor>,
    layers: Vec<DefenseLayer>,
) -> Result<(), hecs::ComponentError> {
    warn_unusable_weapons(id, &weapons);
    world.get::<&mut Armament>(entity)?.weapons = weapons;

    let mut defenses = world.get::<&mut Defenses>(entity)?;
    let previous_charge = defenses.shield.map(|s| s.current);
    let mut rebuilt = Defenses::from_stack(DefenseLayerStack::new(layers));
    if let (Some(shield), Some(charge)) = (rebuilt.shield.as_mut(), previous_charge) {
        shield.current = charge.min(shield.max);
    }
    *defenses = rebuilt;
    Ok(())
}

/// Spawn an engine-owned munition.
pub fn spawn_munition(world: &mut World, kinematics: KinematicState, state: MunitionState) -> Entity {
    world.spawn((Munition, kinematics, state))
}

/// Live munitions in processing (spawn) order.
pub fn munition_order(world: &World) -> Vec<(MunitionId, Entity)> {
    let mut order: Vec<_> = world
        .query::<(&Munition, &MunitionState)>()
        .iter()
        .filter(|(_, (_, state))| !state.phase.is_terminal())
        .map(|(entity, (_, state))| (state.id, entity))
        .collect();
    order.sort_by_key(|(id, _)| *id);
    order
}

fn warn_unusable_weapons(ship: ShipId, weapons: &[WeaponDescriptor]) {
    for (slot, weapon) in weapons.iter().enumerate() {
        if !weapon.is_usable() {
            warn!(%ship, slot, weapon = %weapon.name, "weapon data is invalid; it will never fire");
        }
    }
}
