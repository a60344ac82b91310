//! ECS components for hecs entities.
//!
//! Components are plain data with small derived-value helpers.
//! Combat logic lives in the sim crate, not here.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::*;
use crate::types::{MunitionId, ShipId};

/// Marks an entity as a registered ship.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Ship {
    pub id: ShipId,
}

/// Weapon parameters that depend on its capability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WeaponKind {
    Beam {
        /// Base hit quality, `[0, 1]`.
        base_accuracy: f64,
        /// Net-score penalty per unit of surface distance.
        accuracy_falloff: f64,
    },
    Ballistic {
        /// World units per tick.
        projectile_speed: f64,
    },
    Seeker {
        /// World units per tick.
        projectile_speed: f64,
        /// Degrees per tick.
        turn_rate: f64,
        /// Flight time budget in ticks.
        endurance: u32,
    },
}

/// One installed weapon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponDescriptor {
    pub name: String,
    pub damage: f64,
    pub range: f64,
    /// Degrees either side of the heading; 180 or more is omnidirectional.
    #[serde(default = "omnidirectional")]
    pub arc_half_angle: f64,
    pub kind: WeaponKind,
}

fn omnidirectional() -> f64 {
    OMNIDIRECTIONAL_HALF_ANGLE
}

impl WeaponDescriptor {
    pub fn beam(name: &str, damage: f64, range: f64, base_accuracy: f64, accuracy_falloff: f64) -> Self {
        Self {
            name: name.to_string(),
            damage,
            range,
            arc_half_angle: OMNIDIRECTIONAL_HALF_ANGLE,
            kind: WeaponKind::Beam {
                base_accuracy,
                accuracy_falloff,
            },
        }
    }

    pub fn ballistic(name: &str, damage: f64, range: f64, projectile_speed: f64) -> Self {
        Self {
            name: name.to_string(),
            damage,
            range,
            arc_half_angle: OMNIDIRECTIONAL_HALF_ANGLE,
            kind: WeaponKind::Ballistic { projectile_speed },
        }
    }

    pub fn seeker(
        name: &str,
        damage: f64,
        range: f64,
        projectile_speed: f64,
        turn_rate: f64,
        endurance: u32,
    ) -> Self {
        Self {
            name: name.to_string(),
            damage,
            range,
            arc_half_angle: OMNIDIRECTIONAL_HALF_ANGLE,
            kind: WeaponKind::Seeker {
                projectile_speed,
                turn_rate,
                endurance,
            },
        }
    }

    /// Restrict the firing arc.
    pub fn with_arc(mut self, half_angle_deg: f64) -> Self {
        self.arc_half_angle = half_angle_deg;
        self
    }

    pub fn class(&self) -> WeaponClass {
        match self.kind {
            WeaponKind::Beam { .. } => WeaponClass::Beam,
            WeaponKind::Ballistic { .. } => WeaponClass::Ballistic,
            WeaponKind::Seeker { .. } => WeaponClass::Seeker,
        }
    }

    /// Projectile speed for travel-time weapons.
    pub fn projectile_speed(&self) -> Option<f64> {
        match self.kind {
            WeaponKind::Beam { .. } => None,
            WeaponKind::Ballistic { projectile_speed } => Some(projectile_speed),
            WeaponKind::Seeker {
                projectile_speed, ..
            } => Some(projectile_speed),
        }
    }

    /// Whether the descriptor satisfies its data invariants.
    /// Weapons that fail this always resolve to an impossible firing solution.
    pub fn is_usable(&self) -> bool {
        let base_ok = self.range.is_finite()
            && self.range > 0.0
            && self.damage.is_finite()
            && self.damage >= 0.0
            && !self.arc_half_angle.is_nan();
        let kind_ok = match self.kind {
            WeaponKind::Beam {
                base_accuracy,
                accuracy_falloff,
            } => (0.0..=1.0).contains(&base_accuracy) && accuracy_falloff >= 0.0,
            WeaponKind::Ballistic { projectile_speed } => {
                projectile_speed.is_finite() && projectile_speed > 0.0
            }
            WeaponKind::Seeker {
                projectile_speed,
                turn_rate,
                ..
            } => projectile_speed.is_finite() && projectile_speed > 0.0 && turn_rate >= 0.0,
        };
        base_ok && kind_ok
    }
}

/// Installed weapons, indexed by slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Armament {
    pub weapons: Vec<WeaponDescriptor>,
}

/// Hull scalars feeding the hit model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShipProfile {
    pub mass: f64,
    pub acceleration: f64,
    pub turn_speed: f64,
    #[serde(default)]
    pub ecm_bonus: f64,
    /// Added to the base accuracy of this ship's beams.
    #[serde(default)]
    pub sensor_bonus: f64,
}

impl ShipProfile {
    pub fn with_mass(mass: f64) -> Self {
        Self {
            mass,
            acceleration: 0.0,
            turn_speed: 0.0,
            ecm_bonus: 0.0,
            sensor_bonus: 0.0,
        }
    }

    /// Mass floored at `MIN_DEFENDER_MASS`.
    pub fn effective_mass(&self) -> f64 {
        if self.mass.is_nan() {
            MIN_DEFENDER_MASS
        } else {
            self.mass.max(MIN_DEFENDER_MASS)
        }
    }

    /// Radius of the collision circle.
    pub fn collision_radius(&self) -> f64 {
        collision_radius(self.mass)
    }
}

/// `40 * (mass / 1000)^(1/3)` with mass floored at 100.
pub fn collision_radius(mass: f64) -> f64 {
    let mass = if mass.is_nan() {
        MIN_DEFENDER_MASS
    } else {
        mass.max(MIN_DEFENDER_MASS)
    };
    RADIUS_SCALE * (mass / REFERENCE_MASS).cbrt()
}

/// Special armor behavior attached to a defense layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ArmorModifier {
    /// Subtracted from every hit that reaches the structural layers.
    FlatReduction { amount: f64 },
    /// Contributes to the absorption pool that is consulted before structure.
    Crystalline { capacity: f64, regen_rate: f64 },
}

/// A named band of hit points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefenseLayer {
    pub name: String,
    pub current_hp: f64,
    pub max_hp: f64,
    #[serde(default)]
    pub modifiers: Vec<ArmorModifier>,
}

impl DefenseLayer {
    /// A layer at full health.
    pub fn new(name: &str, max_hp: f64) -> Self {
        Self {
            name: name.to_string(),
            current_hp: max_hp,
            max_hp,
            modifiers: Vec::new(),
        }
    }

    pub fn with_modifier(mut self, modifier: ArmorModifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    pub fn is_depleted(&self) -> bool {
        self.current_hp <= 0.0
    }
}

/// Layers ordered outermost first; the last layer is the core.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefenseLayerStack {
    pub layers: Vec<DefenseLayer>,
}

impl DefenseLayerStack {
    pub fn new(layers: Vec<DefenseLayer>) -> Self {
        Self { layers }
    }

    pub fn core(&self) -> Option<&DefenseLayer> {
        self.layers.last()
    }

    /// True once the core layer is at zero. A stack without a core is not
    /// considered destroyed here; damage resolution reports it as an error.
    pub fn is_destroyed(&self) -> bool {
        self.core().is_some_and(DefenseLayer::is_depleted)
    }

    /// Total flat reduction from modifiers on the outermost layer.
    pub fn flat_reduction(&self) -> f64 {
        self.layers
            .first()
            .map(|outer| {
                outer
                    .modifiers
                    .iter()
                    .filter_map(|m| match m {
                        ArmorModifier::FlatReduction { amount } => Some(amount.max(0.0)),
                        ArmorModifier::Crystalline { .. } => None,
                    })
                    .sum()
            })
            .unwrap_or(0.0)
    }

    pub fn total_hp(&self) -> f64 {
        self.layers.iter().map(|l| l.current_hp).sum()
    }

    pub fn layer(&self, name: &str) -> Option<&DefenseLayer> {
        self.layers.iter().find(|l| l.name == name)
    }
}

/// Absorption pool fed by crystalline armor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShieldPool {
    pub current: f64,
    pub max: f64,
    /// Restored every tick, up to `max`.
    pub regen_rate: f64,
}

impl ShieldPool {
    /// A full pool.
    pub fn new(max: f64, regen_rate: f64) -> Self {
        Self {
            current: max,
            max,
            regen_rate,
        }
    }

    /// Sum crystalline modifiers across all layers into one full pool.
    pub fn from_stack(stack: &DefenseLayerStack) -> Option<Self> {
        let (capacity, regen) = stack
            .layers
            .iter()
            .flat_map(|l| l.modifiers.iter())
            .fold((0.0, 0.0), |(cap, regen), m| match m {
                ArmorModifier::Crystalline {
                    capacity,
                    regen_rate,
                } => (cap + capacity.max(0.0), regen + regen_rate.max(0.0)),
                ArmorModifier::FlatReduction { .. } => (cap, regen),
            });
        (capacity > 0.0).then(|| Self::new(capacity, regen))
    }

    pub fn regenerate(&mut self) {
        self.current = (self.current + self.regen_rate).min(self.max);
    }
}

/// Everything that stands between incoming damage and the core.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Defenses {
    pub shield: Option<ShieldPool>,
    pub stack: DefenseLayerStack,
}

impl Defenses {
    /// Build defenses, deriving the shield pool from crystalline modifiers.
    pub fn from_stack(stack: DefenseLayerStack) -> Self {
        Self {
            shield: ShieldPool::from_stack(&stack),
            stack,
        }
    }
}

/// Set on a ship once its core layer reaches zero. Destroyed ships stay
/// registered until removed but can neither fire nor be targeted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destroyed {
    pub at_tick: u64,
}

/// Turn direction held while the bearing error sits near 180°.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TurnLatch {
    pub direction: TurnDirection,
    pub ticks_remaining: u32,
}

/// Marks an entity as an engine-owned munition.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Munition;

/// Flight state of a spawned munition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MunitionState {
    pub id: MunitionId,
    pub kind: MunitionKind,
    pub phase: MunitionPhase,
    pub owner: ShipId,
    pub weapon_slot: usize,
    /// Looked up by id every tick; the ship may be gone.
    pub target: ShipId,
    pub damage: f64,
    /// World units per tick.
    pub speed: f64,
    /// Degrees per tick; zero for ballistic rounds.
    pub turn_rate: f64,
    pub remaining_range: f64,
    /// `None` for ballistic rounds, which are limited by range alone.
    pub remaining_endurance: Option<u32>,
    pub target_lost: bool,
    pub latch: Option<TurnLatch>,
}
