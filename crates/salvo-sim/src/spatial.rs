//! Per-tick spatial index over live ships.
//!
//! Rebuilt once at the start of every tick and read-only while the tick runs.
//! Entries are kept sorted by ship id so lookups and ray casts visit ships in
//! a stable order.

use hecs::{Entity, World};

use salvo_core::components::{Destroyed, Ship, ShipProfile};
use salvo_core::types::{KinematicState, ShipId, Vector2};

use crate::firing_solution::TargetView;
use crate::geometry::surface_distance;

/// One ship as seen by this tick's queries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexedShip {
    pub id: ShipId,
    pub entity: Entity,
    pub position: Vector2,
    pub velocity: Vector2,
    pub radius: f64,
}

impl IndexedShip {
    pub fn view(&self) -> TargetView {
        TargetView {
            position: self.position,
            velocity: self.velocity,
            radius: self.radius,
        }
    }
}

/// Nearest surface struck by a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub ship: ShipId,
    pub distance: f64,
}

#[derive(Debug, Clone, Default)]
pub struct SpatialIndex {
    entries: Vec<IndexedShip>,
}

impl SpatialIndex {
    /// Snapshot every ship that is not destroyed.
    pub fn build(world: &World) -> Self {
        let mut index = Self::default();
        index.rebuild(world);
        index
    }

    pub fn rebuild(&mut self, world: &World) {
        self.entries.clear();
        let mut query = world.query::<(&Ship, &KinematicState, &ShipProfile, Option<&Destroyed>)>();
        for (entity, (ship, kin, profile, destroyed)) in query.iter() {
            if destroyed.is_some() {
                continue;
            }
            self.entries.push(IndexedShip {
                id: ship.id,
                entity,
                position: kin.position,
                velocity: kin.velocity,
                radius: profile.collision_radius(),
            });
        }
        self.entries.sort_by_key(|e| e.id);
    }

    pub fn get(&self, id: ShipId) -> Option<&IndexedShip> {
        self.entries
            .binary_search_by_key(&id, |e| e.id)
            .ok()
            .map(|i| &self.entries[i])
    }

    /// Target data for `id`, or `None` if it is gone or destroyed.
    pub fn target_view(&self, id: ShipId) -> Option<TargetView> {
        self.get(id).map(IndexedShip::view)
    }

    pub fn iter(&self) -> impl Iterator<Item = &IndexedShip> {
        self.entries.iter()
    }

    /// Nearest ship surface along `direction` within `max_range`, skipping
    /// `ignore`. `direction` need not be normalized; a zero or non-finite
    /// direction hits nothing.
    pub fn cast_ray(
        &self,
        origin: Vector2,
        direction: Vector2,
        max_range: f64,
        ignore: Option<ShipId>,
    ) -> Option<RayHit> {
        let direction = direction.try_normalize()?;
        if !origin.is_finite() {
            return None;
        }
        self.entries
            .iter()
            .filter(|e| Some(e.id) != ignore)
            .filter_map(|e| {
                surface_distance(origin, direction, e.position, e.radius, max_range).map(|distance| RayHit {
                    ship: e.id,
                    distance,
                })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}
