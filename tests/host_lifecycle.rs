mod common;

use biotope_lib::model::config::AppConfig;
use biotope_lib::{ChangeKind, CreatureChange, GameHost, GatherFlags};
use common::HostBuilder;
use std::sync::{Arc, Mutex};

fn seeded(seed: u64) -> AppConfig {
    let mut config = AppConfig::default();
    config.world.seed = Some(seed);
    config.world.initial_creatures = 30;
    config.world.initial_food = 60;
    config
}

#[test]
fn test_reset_is_idempotent() {
    let mut host = GameHost::with_generated_world(seeded(1)).unwrap();
    let creatures = host.step.creatures.clone();
    let food = host.step.food.clone();

    host.reset_step(creatures.clone(), food.clone());
    let first = (host.step.config.clone(), host.step.creatures.len(), host.step.food.len());
    host.reset_step(creatures, food);
    let second = (host.step.config.clone(), host.step.creatures.len(), host.step.food.len());

    assert_eq!(first, second);
    assert_eq!(host.tick, 0);
    assert!(host.pending_actions().is_empty());
}

#[test]
fn test_reset_clears_tracking_and_notifies() {
    let changes: Arc<Mutex<Vec<CreatureChange>>> = Arc::default();
    let sink = Arc::clone(&changes);

    let mut host = HostBuilder::new()
        .with_creature(100.0, 100.0)
        .with_creature(400.0, 400.0)
        .build();
    host.subscribe(move |change| sink.lock().unwrap().push(*change));

    host.set_selected_creature(Some(1));
    host.set_selected_creature(Some(1));
    host.advance(GatherFlags::NONE).unwrap();
    let creatures = host.step.creatures.clone();
    host.reset_step(creatures, Vec::new());

    let log = changes.lock().unwrap();
    assert_eq!(
        *log,
        vec![
            CreatureChange { kind: ChangeKind::Selected, old: None, new: Some(1) },
            CreatureChange { kind: ChangeKind::Best, old: None, new: Some(0) },
            CreatureChange { kind: ChangeKind::Best, old: Some(0), new: None },
            CreatureChange { kind: ChangeKind::Selected, old: Some(1), new: None },
        ]
    );
}

#[test]
fn test_best_requires_more_food_and_more_children() {
    let mut host = HostBuilder::new()
        .with_creature(100.0, 100.0)
        .with_creature_mod(400.0, 400.0, |c| c.counters.food_eaten = 5)
        .with_creature_mod(700.0, 700.0, |c| {
            c.counters.food_eaten = 5;
            c.counters.times_reproduced = 1;
        })
        .build();

    host.advance(GatherFlags::NONE).unwrap();
    // Creature 0 takes the empty slot; 1 only has more food, 2 has both.
    assert_eq!(host.best_creature(), Some(2));
}

#[test]
fn test_selected_and_best_diagnostics() {
    let mut host = HostBuilder::new()
        .with_creature(100.0, 100.0)
        .with_creature(400.0, 400.0)
        .with_creature(700.0, 700.0)
        .build();
    host.set_selected_creature(Some(2));

    let result = host
        .advance(GatherFlags {
            best: true,
            selected: true,
            ..GatherFlags::default()
        })
        .unwrap();
    let ids: Vec<_> = result.diagnostics.iter().map(|d| d.creature_id).collect();
    assert_eq!(ids, vec![0, 2]);
    assert!(result.diagnostics[0].is_best);
    assert!(result.diagnostics[1].is_selected);

    let info = &result.diagnostics[1];
    let brain = &host.step.creature(2).unwrap().brain;
    for node in &info.nodes {
        let touching = brain
            .connections
            .iter()
            .filter(|c| c.source == node.id || c.target == node.id)
            .count();
        assert_eq!(node.connections.len(), touching);
    }
}

#[test]
fn test_same_seed_same_history() {
    let run = |seed| {
        let mut host = GameHost::with_generated_world(seeded(seed)).unwrap();
        for _ in 0..30 {
            host.advance(GatherFlags::NONE).unwrap();
        }
        host.step.creatures
    };
    assert_eq!(run(5), run(5));
}

#[test]
fn test_generation_runs_and_counts() {
    let mut config = seeded(3);
    config.generation.iterations_per_generation = 25;
    let mut host = GameHost::with_generated_world(config).unwrap();

    let summary = host.run_generation().unwrap();
    assert_eq!(summary.generation, 0);
    assert!(summary.ticks <= 25);
    assert!(summary.extinct || summary.ticks == 25);
    assert!(summary.peak_population >= 30);
    assert_eq!(host.generation, 1);
    assert!(host.metrics.tick_count() >= summary.ticks);
}

#[test]
fn test_extinction_reseeds_population() {
    let mut config = seeded(4);
    config.generation.iterations_per_generation = 5;
    config.creature.min_max_age = 1;
    config.creature.max_max_age = 1;
    config.evolution.max_offspring = 0;
    let mut host = GameHost::with_generated_world(config).unwrap();

    let summary = host.run_generation().unwrap();
    assert!(summary.extinct);
    assert_eq!(host.step.creatures.len(), 30);
}
