//! World State data model
//!
//! Field names serialize in camelCase to match the schema sent to the model.
//! Optional fields are skipped when absent so export round-trips exactly.

use serde::{Deserialize, Serialize};

/// The complete generated adventure document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldState {
    pub threads: Vec<Thread>,
    pub npcs: Vec<Npc>,
    pub adventure_features: Vec<AdventureFeature>,
    pub scenes: Vec<Scene>,
    pub locations: Vec<Location>,
}

/// A plot thread the players can pursue
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thread {
    pub id: String,
    pub goal: String,
    pub description: String,
    /// Location id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// NPC ids
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub npcs: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Npc {
    pub id: String,
    pub name: String,
    pub description: String,
    pub disposition: String,
    pub motivation: String,
    pub secrets: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stat_block_suggestion: Option<String>,
}

/// Anything special to the adventure that could seed an encounter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdventureFeature {
    pub id: String,
    pub feature: String,
    pub description: String,
}

/// A pre-scripted encounter inside a scene
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Encounter {
    pub name: String,
    /// Condition that activates the encounter
    pub trigger: String,
    pub description: String,
    /// Enemy suggestions, e.g. "3x Scrapper Gangers"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stat_block_suggestions: Option<Vec<String>>,
}

/// Milestone text leading to another scene
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub milestone: String,
    pub next_scene_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub id: String,
    pub title: String,
    /// Mandatory link to the location the scene plays out in
    pub location_id: String,
    pub setup: String,
    pub obstacles: Vec<String>,
    pub mechanics: Vec<String>,
    pub milestones: Vec<String>,
    pub encounters: Vec<Encounter>,
    pub associated_npcs: Vec<String>,
    pub associated_threads: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enemy_profile: Option<String>,
    pub branching: Vec<Branch>,
}

impl Scene {
    /// Branch target for a milestone, matched on exact text
    pub fn branch_for(&self, milestone: &str) -> Option<&str> {
        self.branching
            .iter()
            .find(|b| b.milestone == milestone)
            .map(|b| b.next_scene_id.as_str())
    }
}

/// Exit from one location to another
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationLink {
    pub description: String,
    pub location_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubLocation {
    pub name: String,
    pub description: String,
    pub significance: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: String,
    pub name: String,
    pub description: String,
    pub tone: String,
    pub associated_npcs: Vec<String>,
    pub associated_threads: Vec<String>,
    pub secrets: Vec<String>,
    pub links: Vec<LocationLink>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sublocations: Option<Vec<SubLocation>>,
}

/// Sizes of the five collections
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectionCounts {
    pub scenes: usize,
    pub locations: usize,
    pub npcs: usize,
    pub threads: usize,
    pub features: usize,
}

impl WorldState {
    pub fn counts(&self) -> CollectionCounts {
        CollectionCounts {
            scenes: self.scenes.len(),
            locations: self.locations.len(),
            npcs: self.npcs.len(),
            threads: self.threads.len(),
            features: self.adventure_features.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.threads.is_empty()
            && self.npcs.is_empty()
            && self.adventure_features.is_empty()
            && self.scenes.is_empty()
            && self.locations.is_empty()
    }
}

impl std::fmt::Display for CollectionCounts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} scenes, {} locations, {} NPCs, {} threads, {} features",
            self.scenes, self.locations, self.npcs, self.threads, self.features
        )
    }
}
