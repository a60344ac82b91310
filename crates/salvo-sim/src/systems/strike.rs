//! Delivering resolved damage to a ship entity.

use hecs::{Entity, World};
use tracing::{debug, info};

use salvo_core::components::{Defenses, Destroyed};
use salvo_core::error::{EngineError, Result};
use salvo_core::events::{DamageEvent, DamageSource, EngagementEvent};
use salvo_core::state::{EngagementStats, TickReport};
use salvo_core::types::ShipId;

use crate::damage::apply_damage;

/// Whether `entity` has already been marked destroyed.
pub fn is_destroyed(world: &World, entity: Entity) -> bool {
    world.get::<&Destroyed>(entity).is_ok()
}

/// Apply `amount` to `target`, record the damage event and, on the first
/// destruction, mark the ship and emit `ShipDestroyed`.
pub fn deliver(
    world: &mut World,
    entity: Entity,
    target: ShipId,
    source: DamageSource,
    amount: f64,
    report: &mut TickReport,
    stats: &mut EngagementStats,
) -> Result<()> {
    let damage = {
        let mut defenses = world
            .get::<&mut Defenses>(entity)
            .map_err(|_| EngineError::UnknownShip { ship: target })?;
        apply_damage(target, &mut defenses, amount)?
    };
    debug!(
        %target,
        raw = damage.raw_amount,
        shield = damage.absorbed_by_shield,
        structural = damage.structural_damage(),
        "damage applied"
    );

    let destroyed = damage.destroyed;
    report.damage.push(DamageEvent {
        target,
        source,
        report: damage,
    });

    if destroyed && !is_destroyed(world, entity) {
        world
            .insert_one(entity, Destroyed { at_tick: report.tick })
            .map_err(|_| EngineError::UnknownShip { ship: target })?;
        report.events.push(EngagementEvent::ShipDestroyed { ship: target });
        stats.ships_destroyed += 1;
        info!(ship = %target, tick = report.tick, "ship destroyed");
    }
    Ok(())
}
