mod common;

use biotope_lib::model::persistence::{self, IoError};
use biotope_lib::model::state::CreatureAction;
use biotope_lib::GatherFlags;
use common::{act, HostBuilder};
use std::path::PathBuf;

fn scratch_file(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("biotope_{}_{}.json", name, std::process::id()))
}

#[test]
fn test_step_round_trip_preserves_world() {
    let mut host = HostBuilder::new()
        .with_creature(100.0, 100.0)
        .with_creature(300.0, 200.0)
        .with_config(|c| {
            c.world.initial_food = 5;
        })
        .build();
    let food = host.generate_food();
    let creatures = host.step.creatures.clone();
    host.reset_step(creatures, food);
    host.next_step(&[act(0, CreatureAction::MoveForward)], GatherFlags::NONE)
        .unwrap();
    assert!(!host.step.cache.visible_food.is_empty());

    let path = scratch_file("round_trip");
    persistence::save_step(&host.step, &path).unwrap();
    let loaded = persistence::load_step(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(loaded.creatures, host.step.creatures);
    assert_eq!(loaded.food, host.step.food);
    assert_eq!(loaded.next_creature_id, host.step.next_creature_id);
    assert_eq!(loaded.config, host.step.config);
    assert!(loaded.cache.visible_food.is_empty());
}

#[test]
fn test_loading_prunes_unknown_tags() {
    let host = HostBuilder::new().with_creature(100.0, 100.0).build();
    let mut value = serde_json::to_value(&host.step).unwrap();

    let brain = &mut value["creatures"][0]["brain"];
    let (renamed, _) = brain["nodes"]
        .as_object()
        .unwrap()
        .iter()
        .find(|(_, n)| !n["input"].is_null())
        .map(|(k, n)| (k.clone(), n.clone()))
        .unwrap();
    brain["nodes"][&renamed]["input"] = serde_json::json!("Echolocation");
    let renamed_id: u64 = renamed.parse().unwrap();

    let loaded = persistence::load_step_from_str(&value.to_string()).unwrap();
    let net = &loaded.creatures[0].brain;
    let original = &host.step.creatures[0].brain;
    assert_eq!(net.nodes.len(), original.nodes.len() - 1);
    assert!(!net.nodes.contains_key(&(renamed_id as usize)));
    assert!(net
        .connections
        .iter()
        .all(|c| c.source != renamed_id as usize && c.target != renamed_id as usize));
}

#[test]
fn test_loading_missing_file_fails() {
    let result = persistence::load_step(scratch_file("never_written"));
    assert!(matches!(result, Err(IoError::NotFound(_))));
}

#[test]
fn test_loading_malformed_json_fails() {
    let path = scratch_file("malformed");
    std::fs::write(&path, "{\"creatures\": [").unwrap();
    let result = persistence::load_step(&path);
    std::fs::remove_file(&path).unwrap();
    assert!(result.is_err());
}

#[test]
fn test_loaded_step_resumes_in_host() {
    let mut host = HostBuilder::new().with_creature(100.0, 100.0).build();
    host.advance(GatherFlags::NONE).unwrap();
    let saved = persistence::to_json(&host.step).unwrap();

    let mut other = HostBuilder::new().build();
    other.load_step(persistence::load_step_from_str(&saved).unwrap()).unwrap();
    assert_eq!(other.step.creatures.len(), 1);
    assert!(other.best_creature().is_none());
    other.advance(GatherFlags::NONE).unwrap();
    assert_eq!(other.best_creature(), Some(0));
}
