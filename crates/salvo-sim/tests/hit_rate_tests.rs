//! Statistical acceptance of the beam hit model.

use salvo_sim::core::commands::FireCommand;
use salvo_sim::core::components::{DefenseLayer, ShipProfile, WeaponDescriptor};
use salvo_sim::core::types::{KinematicState, Vector2};
use salvo_sim::{EngagementEngine, RollSource, SeededRolls, ShipLoadout};

const TRIALS: u32 = 500;

fn loadout(x: f64, weapons: Vec<WeaponDescriptor>) -> ShipLoadout {
    ShipLoadout {
        kinematics: KinematicState::stationary(Vector2::new(x, 0.0), 0.0),
        profile: ShipProfile::with_mass(400.0),
        weapons,
        // Deep enough that 500 hits never destroy it.
        layers: vec![DefenseLayer::new("core", 1.0e6)],
    }
}

#[test]
fn test_reference_beam_hit_rate_within_binomial_band() {
    let mut engine = EngagementEngine::default();
    let beam = WeaponDescriptor::beam("laser", 10.0, 500.0, 0.5, 0.002);
    let attacker = engine.add_ship(loadout(0.0, vec![beam])).unwrap();
    let target = engine.add_ship(loadout(50.0, Vec::new())).unwrap();

    let p = engine.hit_probability(attacker, 0, target).unwrap();
    assert!((p - 0.5396).abs() < 1e-3, "hit chance {p}");

    let mut rolls = SeededRolls::from_seed(2024);
    let command = [FireCommand::fire(attacker, 0, target)];
    for _ in 0..TRIALS {
        engine.tick(&command, &mut rolls).unwrap();
    }

    let stats = engine.stats();
    assert_eq!(stats.beam_shots, TRIALS);
    assert_eq!(rolls.drawn(), u64::from(TRIALS));
    assert!(
        (208..=271).contains(&stats.beam_hits),
        "{} hits out of {TRIALS} is outside the 3-sigma band",
        stats.beam_hits
    );
    assert_eq!(stats.beam_hits + stats.beam_misses, TRIALS);
}

#[test]
fn test_hit_probability_query_does_not_consume_rolls() {
    let mut engine = EngagementEngine::default();
    let beam = WeaponDescriptor::beam("laser", 10.0, 500.0, 0.5, 0.002);
    let attacker = engine.add_ship(loadout(0.0, vec![beam])).unwrap();
    let target = engine.add_ship(loadout(50.0, Vec::new())).unwrap();

    let before = engine.hit_probability(attacker, 0, target).unwrap();
    let mut rolls = SeededRolls::from_seed(1);
    engine.tick(&[], &mut rolls).unwrap();
    assert_eq!(rolls.drawn(), 0);
    assert_eq!(engine.hit_probability(attacker, 0, target), Some(before));
}

#[test]
fn test_hit_probability_falls_with_distance() {
    let mut engine = EngagementEngine::default();
    let beam = WeaponDescriptor::beam("laser", 10.0, 1000.0, 0.5, 0.002);
    let attacker = engine.add_ship(loadout(0.0, vec![beam])).unwrap();
    let target = engine.add_ship(loadout(50.0, Vec::new())).unwrap();

    let mut last = 1.0;
    for x in [50.0, 150.0, 400.0, 900.0] {
        engine
            .update_kinematics(target, KinematicState::stationary(Vector2::new(x, 0.0), 0.0))
            .unwrap();
        let p = engine.hit_probability(attacker, 0, target).unwrap();
        assert!(p < last, "hit chance should fall with distance: {p} at {x}");
        last = p;
    }
}
