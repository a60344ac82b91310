//! Cleanup system: removes munitions that impacted or expired this tick.

use hecs::{Entity, World};

use salvo_core::components::{Munition, MunitionState};

/// Despawn munitions in a terminal phase.
/// Uses a pre-allocated buffer to avoid per-tick allocation.
pub fn run(world: &mut World, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();

    for (entity, (_munition, state)) in world.query_mut::<(&Munition, &MunitionState)>() {
        if state.phase.is_terminal() {
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
