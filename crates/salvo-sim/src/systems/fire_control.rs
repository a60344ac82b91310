//! Fire control system: resolves this tick's fire commands.
//!
//! Commands arrive sorted by `(ship, weapon_slot)`. Beams roll against the
//! hit model and apply damage immediately; travel-time weapons spawn a
//! munition that flies from the next step of the same tick.

use std::collections::BTreeMap;

use hecs::{Entity, World};
use tracing::debug;

use salvo_core::commands::FireCommand;
use salvo_core::components::*;
use salvo_core::enums::MunitionKind;
use salvo_core::error::Result;
use salvo_core::events::{DamageSource, EngagementEvent};
use salvo_core::state::{EngagementStats, TickReport};
use salvo_core::types::{KinematicState, MunitionId, ShipId, Vector2, VectorExt};

use crate::firing_solution::{solve, FiringSolution, TargetView};
use crate::hit_probability::{hit_chance, BeamAccuracy};
use crate::rolls::RollSource;
use crate::spatial::SpatialIndex;
use crate::systems::strike;
use crate::world_setup::spawn_munition;

/// Hit chance of `weapon` against `target`, or `None` when the weapon is not
/// a beam or has no solution.
pub fn beam_hit_chance(
    attacker: &KinematicState,
    attacker_profile: &ShipProfile,
    weapon: &WeaponDescriptor,
    target: &TargetView,
    defender: &ShipProfile,
) -> Option<f64> {
    let WeaponKind::Beam {
        base_accuracy,
        accuracy_falloff,
    } = weapon.kind
    else {
        return None;
    };
    match solve(attacker, weapon, Some(target)) {
        FiringSolution::Instant {
            distance_to_surface,
        } => {
            let beam = BeamAccuracy {
                base_accuracy,
                accuracy_falloff,
                sensor_bonus: attacker_profile.sensor_bonus,
            };
            Some(hit_chance(&beam, distance_to_surface, defender))
        }
        _ => None,
    }
}

/// Run the fire control system for one tick.
#[allow(clippy::too_many_arguments)]
pub fn run<R: RollSource + ?Sized>(
    world: &mut World,
    ships: &BTreeMap<ShipId, Entity>,
    index: &SpatialIndex,
    commands: &[FireCommand],
    rolls: &mut R,
    next_munition_id: &mut u64,
    report: &mut TickReport,
    stats: &mut EngagementStats,
) -> Result<()> {
    for command in commands {
        if !command.fire {
            continue;
        }
        let Some(shot) = prepare_shot(world, ships, index, command) else {
            continue;
        };

        match solve(&shot.attacker, &shot.weapon, Some(&shot.target)) {
            FiringSolution::Impossible => {}
            FiringSolution::Instant {
                distance_to_surface,
            } => fire_beam(world, command, &shot, distance_to_surface, rolls, report, stats)?,
            FiringSolution::Intercept {
                aim_point,
                time_to_impact,
            } => launch(
                world,
                command,
                &shot,
                aim_point,
                time_to_impact,
                next_munition_id,
                report,
                stats,
            ),
        }
    }
    Ok(())
}

/// Everything a command needs, copied out of the world.
struct Shot {
    attacker: KinematicState,
    attacker_profile: ShipProfile,
    weapon: WeaponDescriptor,
    target_entity: Entity,
    target: TargetView,
}

/// Look up attacker, weapon and target. `None` means the weapon stays idle.
fn prepare_shot(
    world: &World,
    ships: &BTreeMap<ShipId, Entity>,
    index: &SpatialIndex,
    command: &FireCommand,
) -> Option<Shot> {
    let Some(&attacker_entity) = ships.get(&command.ship) else {
        debug!(ship = %command.ship, "fire command from unknown ship");
        return None;
    };
    if strike::is_destroyed(world, attacker_entity) {
        return None;
    }
    let weapon = world
        .get::<&Armament>(attacker_entity)
        .ok()
        .and_then(|armament| armament.weapons.get(command.weapon_slot).cloned());
    let Some(weapon) = weapon else {
        debug!(ship = %command.ship, slot = command.weapon_slot, "no weapon in slot");
        return None;
    };
    let attacker = *world.get::<&KinematicState>(attacker_entity).ok()?;
    let attacker_profile = *world.get::<&ShipProfile>(attacker_entity).ok()?;

    // Ships destroyed earlier this tick are still in the index.
    let Some(indexed) = index.get(command.target) else {
        debug!(ship = %command.ship, target = %command.target, "target not present");
        return None;
    };
    if strike::is_destroyed(world, indexed.entity) {
        return None;
    }

    Some(Shot {
        attacker,
        attacker_profile,
        weapon,
        target_entity: indexed.entity,
        target: indexed.view(),
    })
}

fn fire_beam<R: RollSource + ?Sized>(
    world: &mut World,
    command: &FireCommand,
    shot: &Shot,
    distance_to_surface: f64,
    rolls: &mut R,
    report: &mut TickReport,
    stats: &mut EngagementStats,
) -> Result<()> {
    let WeaponKind::Beam {
        base_accuracy,
        accuracy_falloff,
    } = shot.weapon.kind
    else {
        return Ok(());
    };
    let Ok(defender) = world.get::<&ShipProfile>(shot.target_entity).map(|p| *p) else {
        return Ok(());
    };

    let beam = BeamAccuracy {
        base_accuracy,
        accuracy_falloff,
        sensor_bonus: shot.attacker_profile.sensor_bonus,
    };
    let chance = hit_chance(&beam, distance_to_surface, &defender);
    let roll = rolls.next_roll()?;
    let hit = roll < chance;

    stats.beam_shots += 1;
    if hit {
        stats.beam_hits += 1;
    } else {
        stats.beam_misses += 1;
    }
    debug!(
        attacker = %command.ship,
        slot = command.weapon_slot,
        target = %command.target,
        chance,
        roll,
        hit,
        "beam fired"
    );
    report.events.push(EngagementEvent::BeamFired {
        attacker: command.ship,
        weapon_slot: command.weapon_slot,
        target: command.target,
        hit_chance: chance,
        roll,
        hit,
    });

    if hit {
        strike::deliver(
            world,
            shot.target_entity,
            command.target,
            DamageSource::Beam {
                attacker: command.ship,
                weapon_slot: command.weapon_slot,
            },
            shot.weapon.damage,
            report,
            stats,
        )?;
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn launch(
    world: &mut World,
    command: &FireCommand,
    shot: &Shot,
    aim_point: Vector2,
    time_to_impact: f64,
    next_munition_id: &mut u64,
    report: &mut TickReport,
    stats: &mut EngagementStats,
) {
    let (kind, speed, turn_rate, endurance) = match shot.weapon.kind {
        WeaponKind::Ballistic { projectile_speed } => (MunitionKind::Ballistic, projectile_speed, 0.0, None),
        WeaponKind::Seeker {
            projectile_speed,
            turn_rate,
            endurance,
        } => (MunitionKind::Seeker, projectile_speed, turn_rate, Some(endurance)),
        WeaponKind::Beam { .. } => return,
    };

    let origin = shot.attacker.position;
    let heading_deg = (aim_point - origin).angle_deg();
    let direction = Vector2::from_angle_deg(heading_deg);
    let kinematics = KinematicState::new(origin, direction * speed, heading_deg.to_radians());

    let id = MunitionId(*next_munition_id);
    *next_munition_id += 1;
    let state = MunitionState {
        id,
        kind,
        phase: Default::default(),
        owner: command.ship,
        weapon_slot: command.weapon_slot,
        target: command.target,
        damage: shot.weapon.damage,
        speed,
        turn_rate,
        remaining_range: shot.weapon.range,
        remaining_endurance: endurance,
        target_lost: false,
        latch: None,
    };
    spawn_munition(world, kinematics, state);

    stats.munitions_launched += 1;
    debug!(
        munition = %id,
        ?kind,
        attacker = %command.ship,
        target = %command.target,
        time_to_impact,
        "munition launched"
    );
    report.events.push(EngagementEvent::MunitionSpawned {
        munition: id,
        kind,
        attacker: command.ship,
        weapon_slot: command.weapon_slot,
        target: command.target,
        aim_point,
        time_to_impact,
    });
}
