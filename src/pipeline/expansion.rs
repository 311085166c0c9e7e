//! Expansion stage: grow the foundation with optional, cross-linked content

use crate::core::error::Result;
use crate::input::LoreText;
use crate::llm::StructuredGenerator;
use crate::validation::ExpansionAudit;
use crate::world::WorldState;

use super::prompts::expansion_prompt;
use super::{Pipeline, Stage};

/// Minimum new sublocations requested for the hub
pub const MIN_HUB_SUBLOCATIONS: usize = 10;
/// Minimum new hub-resident NPCs requested
pub const MIN_HUB_NPCS: usize = 10;
/// Range of minor hub threads requested
pub const HUB_THREADS_MIN: usize = 2;
pub const HUB_THREADS_MAX: usize = 3;

/// How many new general optional entities to request per collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpansionTargets {
    pub scenes: usize,
    pub locations: usize,
    pub npcs: usize,
    pub threads: usize,
}

/// Roughly double a collection, asking for at least one new entry
pub fn target_for(existing: usize) -> usize {
    existing.max(1)
}

impl ExpansionTargets {
    pub fn from_foundation(foundation: &WorldState) -> Self {
        Self {
            scenes: target_for(foundation.scenes.len()),
            locations: target_for(foundation.locations.len()),
            npcs: target_for(foundation.npcs.len()),
            threads: target_for(foundation.threads.len()),
        }
    }
}

impl<G: StructuredGenerator> Pipeline<G> {
    /// Run the expansion stage
    ///
    /// Consumes the foundation: the returned World State replaces it
    /// entirely. No local merge happens; the model is trusted to return
    /// the union, and the audit only logs where it did not.
    pub async fn generate_expansion(
        &self,
        foundation: WorldState,
        lore: &[LoreText],
    ) -> Result<WorldState> {
        let targets = ExpansionTargets::from_foundation(&foundation);
        tracing::info!(
            scenes = targets.scenes,
            locations = targets.locations,
            npcs = targets.npcs,
            threads = targets.threads,
            "starting expansion stage"
        );

        let prompt = expansion_prompt(&foundation, lore, &targets, &self.context)
            .map_err(|e| e.in_stage(Stage::Expansion))?;
        let expanded = self
            .request_world(Stage::Expansion, &prompt)
            .await
            .map_err(|e| e.in_stage(Stage::Expansion))?;

        ExpansionAudit::compare(&foundation, &expanded).log();
        tracing::info!(counts = %expanded.counts(), "expansion stage complete");
        Ok(expanded)
    }
}
