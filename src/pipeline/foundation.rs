//! Foundation stage: extract the baseline World State from the source text

use crate::core::error::Result;
use crate::input::LoreText;
use crate::llm::StructuredGenerator;
use crate::world::WorldState;

use super::prompts::foundation_prompt;
use super::{Pipeline, Stage};

impl<G: StructuredGenerator> Pipeline<G> {
    /// Run the foundation stage
    ///
    /// Any failure comes back wrapped with the foundation stage context.
    pub async fn generate_foundation(
        &self,
        primary: &str,
        lore: &[LoreText],
    ) -> Result<WorldState> {
        tracing::info!(lore_files = lore.len(), "starting foundation stage");
        let prompt = foundation_prompt(primary, lore, &self.context);

        let world = self
            .request_world(Stage::Foundation, &prompt)
            .await
            .map_err(|e| e.in_stage(Stage::Foundation))?;

        tracing::info!(counts = %world.counts(), "foundation stage complete");
        Ok(world)
    }
}
