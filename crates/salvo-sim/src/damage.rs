//! Damage resolution against a ship's layered defenses.
//!
//! Order: absorption pool, then flat armor reduction on the outermost layer,
//! then an overflow cascade from the outermost layer to the core.
//! `absorbed_by_shield + structural damage + reduced_by_armor + overkill`
//! always equals the clamped raw amount.

use salvo_core::components::Defenses;
use salvo_core::error::{EngineError, Result};
use salvo_core::events::{DamageReport, LayerLoss};
use salvo_core::types::ShipId;

/// Apply `raw_amount` to `defenses` of `ship`.
///
/// Negative or non-finite amounts are treated as zero. Fails only when the
/// defense data breaks its contract: no layers at all, or a layer left with
/// negative or non-finite hit points.
pub fn apply_damage(ship: ShipId, defenses: &mut Defenses, raw_amount: f64) -> Result<DamageReport> {
    if defenses.stack.layers.is_empty() {
        return Err(EngineError::MissingCoreLayer { ship });
    }

    let raw_amount = if raw_amount.is_finite() && raw_amount > 0.0 {
        raw_amount
    } else {
        0.0
    };
    let mut report = DamageReport {
        raw_amount,
        ..Default::default()
    };
    let mut remaining = raw_amount;

    if let Some(shield) = defenses.shield.as_mut() {
        let absorbed = remaining.min(shield.current.max(0.0));
        shield.current -= absorbed;
        remaining -= absorbed;
        report.absorbed_by_shield = absorbed;
    }

    if remaining > 0.0 {
        let reduced = defenses.stack.flat_reduction().min(remaining);
        remaining -= reduced;
        report.reduced_by_armor = reduced;
    }

    for layer in defenses.stack.layers.iter_mut() {
        if remaining <= 0.0 {
            break;
        }
        let loss = remaining.min(layer.current_hp.max(0.0));
        if loss > 0.0 {
            layer.current_hp -= loss;
            remaining -= loss;
            report.layer_losses.push(LayerLoss {
                layer: layer.name.clone(),
                amount: loss,
            });
        }
    }
    report.overkill = remaining.max(0.0);

    if let Some(bad) = defenses
        .stack
        .layers
        .iter()
        .find(|l| !l.current_hp.is_finite() || l.current_hp < 0.0)
    {
        return Err(EngineError::InvalidHitPoints {
            ship,
            layer: bad.name.clone(),
            hp: bad.current_hp,
        });
    }

    report.destroyed = defenses.stack.is_destroyed();
    Ok(report)
}

/// Restore every shield pool by its regeneration rate.
pub fn regenerate_shields<'a>(pools: impl IntoIterator<Item = &'a mut Defenses>) {
    for defenses in pools {
        if let Some(shield) = defenses.shield.as_mut() {
            shield.regenerate();
        }
    }
}
