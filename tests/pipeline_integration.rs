//! End-to-end pipeline runs against a scripted generator

mod common;

use adventure_codex::core::config::IntegrityPolicy;
use adventure_codex::core::error::CodexError;
use adventure_codex::input::{AdventureInput, LoreText};
use adventure_codex::pipeline::{GenerationSession, Pipeline, PromptContext, SessionState, Stage};
use adventure_codex::validation::IntegrityValidator;
use adventure_codex::world::{classify, EntityKind, IdOrigin, WorldIndex};
use common::{expanded_json, foundation_json, ok, ScriptedGenerator};
use serde_json::json;

fn input() -> AdventureInput {
    let mut input = AdventureInput::new("The characters wake in Justitian. Ada hands them a map.")
        .unwrap();
    input.add_lore(LoreText::new("clans.md", "The Chroniclers hoard data."));
    input
}

#[tokio::test]
async fn test_full_run_replaces_world_with_expansion() {
    let generator = ScriptedGenerator::new(vec![ok(&foundation_json()), ok(&expanded_json())]);
    let pipeline = Pipeline::new(generator);
    let mut session = GenerationSession::new();

    session.run(&pipeline, &input()).await;

    let world = session.world().expect("run should succeed");
    assert_eq!(world.scenes.len(), 2);
    assert_eq!(world.locations.len(), 2);
    assert_eq!(world.npcs.len(), 3);
    assert_eq!(world.threads.len(), 2);
    assert_eq!(world.adventure_features.len(), 1);

    let hub_npcs: Vec<_> = world
        .npcs
        .iter()
        .filter(|n| classify(&n.id).origin == IdOrigin::OptionalHub)
        .collect();
    assert_eq!(hub_npcs.len(), 1);
    assert_eq!(world.scenes[0].branch_for("Find the map"), Some("SCENE-OPT-1"));
}

#[tokio::test]
async fn test_prompts_carry_input_lore_and_foundation() {
    let generator = ScriptedGenerator::new(vec![ok(&foundation_json()), ok(&expanded_json())]);
    let pipeline = Pipeline::new(generator);
    pipeline.run(&input()).await.unwrap();

    let prompts = pipeline.generator().prompts();
    assert_eq!(prompts.len(), 2);

    let foundation = &prompts[0];
    assert!(foundation.contains("Ada hands them a map."));
    assert!(foundation.contains("--- START OF clans.md ---"));
    assert!(foundation.contains("The Chroniclers hoard data."));
    assert!(foundation.contains("--- END OF clans.md ---"));

    let expansion = &prompts[1];
    assert!(expansion.contains(r#""id":"SCENE-1""#));
    assert!(expansion.contains("**1 new optional SCENE(s)**"));
    assert!(expansion.contains("**1 new optional NPC(s)**"));
    assert!(expansion.contains("--- START OF clans.md ---"));
}

#[tokio::test]
async fn test_game_system_reaches_prompts() {
    let generator = ScriptedGenerator::new(vec![ok(&foundation_json()), ok(&expanded_json())]);
    let pipeline = Pipeline::new(generator)
        .with_context(PromptContext::new(Some("Degenesis: Rebirth".into())));
    pipeline.run(&input()).await.unwrap();

    for prompt in pipeline.generator().prompts() {
        assert!(prompt.contains("Degenesis: Rebirth"));
    }
}

#[tokio::test]
async fn test_foundation_failure_skips_expansion() {
    let generator = ScriptedGenerator::new(vec![
        Err(CodexError::Transport("connection reset".into())),
        ok(&expanded_json()),
    ]);
    let pipeline = Pipeline::new(generator);
    let mut session = GenerationSession::new();

    session.run(&pipeline, &input()).await;

    assert!(session.world().is_none());
    let message = session.error().unwrap();
    assert!(message.starts_with("Failed to generate world state: "));
    assert!(message.contains("Foundation stage failed"));
    assert!(message.contains("connection reset"));

    assert_eq!(pipeline.generator().prompts().len(), 1);
    assert_eq!(pipeline.generator().remaining(), 1);
}

#[tokio::test]
async fn test_malformed_json_fails_with_parse_error() {
    let generator = ScriptedGenerator::new(vec![Ok("I'm sorry, here is {not json".into())]);
    let pipeline = Pipeline::new(generator);

    let err = pipeline.run(&input()).await.unwrap_err();
    assert!(matches!(
        err,
        CodexError::Generation {
            stage: Stage::Foundation,
            ..
        }
    ));
    assert!(matches!(err.root(), CodexError::Parse(_)));
}

#[tokio::test]
async fn test_fenced_response_is_accepted() {
    let fenced = format!("```json\n{}\n```", foundation_json());
    let generator = ScriptedGenerator::new(vec![Ok(fenced), ok(&expanded_json())]);
    let pipeline = Pipeline::new(generator);

    let foundation = pipeline
        .generate_foundation(&input().primary, &[])
        .await
        .unwrap();
    assert_eq!(foundation.scenes[0].id, "SCENE-1");
}

#[tokio::test]
async fn test_expansion_failure_is_stage_wrapped() {
    let generator = ScriptedGenerator::new(vec![
        ok(&foundation_json()),
        Err(CodexError::Transport("HTTP 503".into())),
    ]);
    let pipeline = Pipeline::new(generator);

    let err = pipeline.run(&input()).await.unwrap_err();
    assert!(err.to_string().starts_with("Expansion stage failed"));
    assert!(matches!(err.root(), CodexError::Transport(_)));
}

fn unresolved_foundation() -> serde_json::Value {
    let mut world = foundation_json();
    world["scenes"][0]["locationId"] = json!("LOC-9");
    world
}

#[tokio::test]
async fn test_unresolved_location_rejected_by_default() {
    let generator =
        ScriptedGenerator::new(vec![ok(&unresolved_foundation()), ok(&expanded_json())]);
    let pipeline = Pipeline::new(generator);

    let err = pipeline.run(&input()).await.unwrap_err();
    match err.root() {
        CodexError::Integrity(summary) => {
            assert!(summary.contains("scene SCENE-1 references location LOC-9"))
        }
        other => panic!("Expected integrity error, got {:?}", other),
    }
    assert_eq!(pipeline.generator().prompts().len(), 1);
}

#[tokio::test]
async fn test_empty_location_rejected() {
    let mut world = foundation_json();
    world["scenes"][0]["locationId"] = json!("");
    let generator = ScriptedGenerator::new(vec![ok(&world)]);
    let pipeline = Pipeline::new(generator);

    let err = pipeline.run(&input()).await.unwrap_err();
    assert!(err.to_string().contains("scene SCENE-1 has no locationId"));
}

#[tokio::test]
async fn test_reask_recovers_with_one_correction() {
    let generator = ScriptedGenerator::new(vec![
        ok(&unresolved_foundation()),
        ok(&foundation_json()),
        ok(&expanded_json()),
    ]);
    let pipeline = Pipeline::new(generator).with_policy(IntegrityPolicy::Reask);

    let world = pipeline.run(&input()).await.unwrap();
    assert_eq!(world.scenes.len(), 2);

    let prompts = pipeline.generator().prompts();
    assert_eq!(prompts.len(), 3);
    assert!(prompts[1].contains("breaks mandatory integrity rules"));
    assert!(prompts[1].contains("LOC-9"));
}

#[tokio::test]
async fn test_reask_gives_up_after_one_correction() {
    let generator = ScriptedGenerator::new(vec![
        ok(&unresolved_foundation()),
        ok(&unresolved_foundation()),
        ok(&expanded_json()),
    ]);
    let pipeline = Pipeline::new(generator).with_policy(IntegrityPolicy::Reask);

    let err = pipeline.run(&input()).await.unwrap_err();
    assert!(matches!(err.root(), CodexError::Integrity(_)));
    assert_eq!(pipeline.generator().prompts().len(), 2);
}

#[tokio::test]
async fn test_dangling_references_are_tolerated() {
    let mut expanded = expanded_json();
    expanded["scenes"][0]["associatedThreads"] = json!(["Thread-404"]);
    let generator = ScriptedGenerator::new(vec![ok(&foundation_json()), ok(&expanded)]);
    let pipeline = Pipeline::new(generator);

    let world = pipeline.run(&input()).await.unwrap();
    assert_eq!(world.scenes[0].associated_threads, vec!["Thread-404"]);
}

#[tokio::test]
async fn test_rerun_discards_previous_world() {
    let generator = ScriptedGenerator::new(vec![
        ok(&foundation_json()),
        ok(&expanded_json()),
        Err(CodexError::Transport("timeout".into())),
    ]);
    let pipeline = Pipeline::new(generator);
    let mut session = GenerationSession::new();

    session.run(&pipeline, &input()).await;
    assert!(session.world().is_some());

    let state = session.run(&pipeline, &input()).await;
    assert!(matches!(state, SessionState::Failed(_)));
    assert!(session.world().is_none());

    session.reset();
    assert_eq!(session.state(), &SessionState::Idle);
}

#[tokio::test]
async fn test_expansion_keeps_foundation_ids() {
    let generator = ScriptedGenerator::new(vec![ok(&foundation_json()), ok(&expanded_json())]);
    let pipeline = Pipeline::new(generator);
    let world = pipeline.run(&input()).await.unwrap();

    for id in ["SCENE-1", "LOC-1", "NPC-1"] {
        let kind = classify(id).kind.unwrap();
        let present = match kind {
            EntityKind::Scene => world.scenes.iter().any(|s| s.id == id),
            EntityKind::Location => world.locations.iter().any(|l| l.id == id),
            EntityKind::Npc => world.npcs.iter().any(|n| n.id == id),
            _ => false,
        };
        assert!(present, "{} missing after expansion", id);
    }
}

#[tokio::test]
async fn test_one_scene_adventure_grows_optional_scenes_with_resolvable_locations() {
    let generator = ScriptedGenerator::new(vec![ok(&foundation_json()), ok(&expanded_json())]);
    let pipeline = Pipeline::new(generator);

    let foundation = pipeline
        .generate_foundation(&input().primary, &input().lore)
        .await
        .unwrap();
    assert_eq!(foundation.scenes.len(), 1);
    let foundation_index = WorldIndex::new(&foundation);
    assert!(foundation_index
        .location(&foundation.scenes[0].location_id)
        .is_some());

    let foundation_scene_ids: Vec<String> =
        foundation.scenes.iter().map(|s| s.id.clone()).collect();
    let expanded = pipeline
        .generate_expansion(foundation, &input().lore)
        .await
        .unwrap();
    assert!(expanded.scenes.len() >= 2);
    assert_eq!(IntegrityValidator::validate(&expanded).hard_violations().count(), 0);

    let index = WorldIndex::new(&expanded);
    let new_scenes: Vec<_> = expanded
        .scenes
        .iter()
        .filter(|s| !foundation_scene_ids.contains(&s.id))
        .collect();
    assert!(!new_scenes.is_empty());
    for scene in new_scenes {
        assert!(classify(&scene.id).origin.is_optional(), "{} lacks OPT", scene.id);
        assert!(!scene.location_id.is_empty());
        assert!(
            index.location(&scene.location_id).is_some(),
            "{} points at missing {}",
            scene.id,
            scene.location_id
        );
    }
}

#[tokio::test]
async fn test_expansion_scene_with_missing_location_is_rejected() {
    let mut expanded = expanded_json();
    expanded["scenes"][1]["locationId"] = json!("LOC-OPT-9");
    let script = || ScriptedGenerator::new(vec![ok(&foundation_json()), ok(&expanded)]);

    let mut session = GenerationSession::new();
    session.run(&Pipeline::new(script()), &input()).await;
    assert!(session.world().is_none());
    assert!(session.error().unwrap().contains("Expansion stage failed"));

    let pipeline = Pipeline::new(script());
    let err = pipeline.run(&input()).await.unwrap_err();
    assert!(matches!(
        err,
        CodexError::Generation {
            stage: Stage::Expansion,
            ..
        }
    ));
    match err.root() {
        CodexError::Integrity(summary) => {
            assert!(summary.contains("scene SCENE-OPT-1 references location LOC-OPT-9"))
        }
        other => panic!("Expected integrity error, got {:?}", other),
    }
}
