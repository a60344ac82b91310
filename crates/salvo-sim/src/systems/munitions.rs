//! Munition system: flies every live munition one tick, in spawn order.

use std::collections::BTreeMap;

use hecs::{Entity, World};
use tracing::debug;

use salvo_core::components::MunitionState;
use salvo_core::enums::MunitionPhase;
use salvo_core::error::Result;
use salvo_core::events::{DamageSource, EngagementEvent};
use salvo_core::state::{EngagementStats, TickReport};
use salvo_core::types::{KinematicState, ShipId};

use crate::config::EngineConfig;
use crate::firing_solution::TargetView;
use crate::guidance::{advance_munition, FlightOutcome};
use crate::spatial::SpatialIndex;
use crate::systems::strike;
use crate::world_setup::munition_order;

/// Run the munition system for one tick.
pub fn run(
    world: &mut World,
    ships: &BTreeMap<ShipId, Entity>,
    index: &SpatialIndex,
    config: &EngineConfig,
    report: &mut TickReport,
    stats: &mut EngagementStats,
) -> Result<()> {
    for (_, entity) in munition_order(world) {
        let Ok((mut kin, mut state)) = world
            .query_one_mut::<(&KinematicState, &MunitionState)>(entity)
            .map(|(k, s)| (*k, s.clone()))
        else {
            continue;
        };

        let target = live_target(world, ships, index, state.target);
        let was_lost = state.target_lost;
        let view = target.map(|(_, view)| view);
        let outcome = advance_munition(&mut kin, &mut state, view.as_ref(), &config.guidance, &config.impact);

        if state.target_lost && !was_lost {
            debug!(munition = %state.id, target = %state.target, "target lost");
            report.events.push(EngagementEvent::TargetLost {
                munition: state.id,
                target: state.target,
            });
        }

        match outcome {
            FlightOutcome::Flying => {}
            FlightOutcome::Impacted { position } => {
                state.phase = MunitionPhase::Impacted;
                stats.munitions_impacted += 1;
                debug!(munition = %state.id, target = %state.target, "munition impacted");
                report.events.push(EngagementEvent::MunitionImpacted {
                    munition: state.id,
                    target: state.target,
                    position,
                });
            }
            FlightOutcome::Expired(reason) => {
                state.phase = MunitionPhase::Expired;
                stats.munitions_expired += 1;
                debug!(munition = %state.id, ?reason, "munition expired");
                report.events.push(EngagementEvent::MunitionExpired {
                    munition: state.id,
                    reason,
                });
            }
        }

        let impact = match (outcome, target) {
            (FlightOutcome::Impacted { .. }, Some((target_entity, _))) => Some((
                target_entity,
                state.target,
                DamageSource::Munition {
                    munition: state.id,
                    attacker: state.owner,
                },
                state.damage,
            )),
            _ => None,
        };

        if let Ok((k, s)) = world.query_one_mut::<(&mut KinematicState, &mut MunitionState)>(entity) {
            *k = kin;
            *s = state;
        }

        if let Some((target_entity, target_id, source, damage)) = impact {
            strike::deliver(world, target_entity, target_id, source, damage, report, stats)?;
        }
    }
    Ok(())
}

/// Current position of a munition's target, unless it is gone or destroyed.
fn live_target(
    world: &World,
    ships: &BTreeMap<ShipId, Entity>,
    index: &SpatialIndex,
    target: ShipId,
) -> Option<(Entity, TargetView)> {
    ships.get(&target)?;
    let indexed = index.get(target)?;
    if strike::is_destroyed(world, indexed.entity) {
        return None;
    }
    Some((indexed.entity, indexed.view()))
}
