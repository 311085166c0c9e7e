//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::future::Future;
use std::sync::Mutex;

use adventure_codex::core::error::{CodexError, Result};
use adventure_codex::llm::StructuredGenerator;
use adventure_codex::schema::SchemaNode;
use serde_json::{json, Value};

/// Replays canned responses in order and records every prompt it sees
pub struct ScriptedGenerator {
    responses: Mutex<VecDeque<Result<String>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn new(responses: Vec<Result<String>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn remaining(&self) -> usize {
        self.responses.lock().unwrap().len()
    }
}

impl StructuredGenerator for ScriptedGenerator {
    fn generate(
        &self,
        prompt: &str,
        _schema: &SchemaNode,
    ) -> impl Future<Output = Result<String>> + Send {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let next = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(CodexError::Transport("script exhausted".into())));
        async move { next }
    }
}

pub fn scene(id: &str, location_id: &str) -> Value {
    json!({
        "id": id,
        "title": format!("Title of {}", id),
        "locationId": location_id,
        "setup": "The characters arrive following the clue.",
        "obstacles": [],
        "mechanics": [],
        "milestones": [],
        "encounters": [],
        "associatedNpcs": [],
        "associatedThreads": [],
        "branching": []
    })
}

pub fn location(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": "Rust and ash.",
        "tone": "Tense",
        "associatedNpcs": [],
        "associatedThreads": [],
        "secrets": [],
        "links": []
    })
}

pub fn npc(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": "Weathered.",
        "disposition": "Wary",
        "motivation": "Survive the winter",
        "secrets": "Owes the Spitalians"
    })
}

pub fn thread(id: &str, goal: &str) -> Value {
    json!({
        "id": id,
        "goal": goal,
        "description": "Someone wants something."
    })
}

/// One scene at the hub, one NPC
pub fn foundation_json() -> Value {
    let mut arrival = scene("SCENE-1", "LOC-1");
    arrival["milestones"] = json!(["Find the map"]);
    arrival["associatedNpcs"] = json!(["NPC-1"]);
    json!({
        "threads": [],
        "npcs": [npc("NPC-1", "Ada")],
        "adventureFeatures": [{
            "id": "AF-1",
            "feature": "Spore Tide",
            "description": "The spores rise every night."
        }],
        "scenes": [arrival],
        "locations": [location("LOC-1", "Justitian")]
    })
}

/// The foundation plus hub and general optional content
pub fn expanded_json() -> Value {
    let mut world = foundation_json();

    world["scenes"][0]["branching"] = json!([
        { "milestone": "Find the map", "nextSceneId": "SCENE-OPT-1" }
    ]);
    world["scenes"]
        .as_array_mut()
        .unwrap()
        .push(scene("SCENE-OPT-1", "LOC-OPT-1"));

    let hub = &mut world["locations"][0];
    hub["associatedNpcs"] = json!(["NPC-OPT-HUB-1"]);
    hub["associatedThreads"] = json!(["Thread-OPT-HUB-1"]);
    hub["links"] = json!([{ "description": "Scrap tunnel", "locationId": "LOC-OPT-1" }]);
    hub["sublocations"] = json!([
        { "name": "Market", "description": "Stalls of salvage.", "significance": "Trade" }
    ]);
    world["locations"]
        .as_array_mut()
        .unwrap()
        .push(location("LOC-OPT-1", "Sunken Depot"));

    let npcs = world["npcs"].as_array_mut().unwrap();
    npcs.push(npc("NPC-OPT-HUB-1", "Brother Kell"));
    npcs.push(npc("NPC-OPT-1", "Vex"));

    let mut hub_thread = thread("Thread-OPT-HUB-1", "Recover the stolen seed stock");
    hub_thread["location"] = json!("LOC-1");
    hub_thread["npcs"] = json!(["NPC-OPT-HUB-1"]);
    let threads = world["threads"].as_array_mut().unwrap();
    threads.push(hub_thread);
    threads.push(thread("Thread-OPT-1", "Map the depot"));

    world
}

pub fn ok(value: &Value) -> Result<String> {
    Ok(value.to_string())
}
