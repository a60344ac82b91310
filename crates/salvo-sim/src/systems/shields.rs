//! Shield regeneration, run before any combat resolution.

use hecs::World;

use salvo_core::components::{Defenses, Destroyed};

use crate::damage::regenerate_shields;

/// Restore every surviving ship's absorption pool by its regen rate.
pub fn run(world: &mut World) {
    let pools = world
        .query_mut::<(&mut Defenses, Option<&Destroyed>)>()
        .into_iter()
        .filter(|(_, (_, destroyed))| destroyed.is_none())
        .map(|(_, (defenses, _))| defenses);
    regenerate_shields(pools);
}
