//! Two-stage World State generation
//!
//! Foundation extracts a baseline World State from the adventure text;
//! expansion feeds that state back to the model and asks for optional,
//! cross-linked content. The stages run strictly in sequence: expansion
//! needs the complete foundation as input, and a failed foundation means
//! no expansion request is ever sent.

pub mod expansion;
pub mod foundation;
pub mod prompts;
pub mod session;

pub use expansion::{target_for, ExpansionTargets};
pub use prompts::PromptContext;
pub use session::{GenerationSession, SessionState};

use std::fmt;

use crate::core::config::{GeneratorConfig, IntegrityPolicy};
use crate::core::error::{CodexError, Result};
use crate::input::AdventureInput;
use crate::llm::{parse_world_state, StructuredGenerator};
use crate::schema::{world_state_schema, SchemaNode};
use crate::validation::IntegrityValidator;
use crate::world::WorldState;

/// Pipeline stage, used as error context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Foundation,
    Expansion,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Foundation => f.write_str("Foundation"),
            Stage::Expansion => f.write_str("Expansion"),
        }
    }
}

/// The generation pipeline over some structured generator
pub struct Pipeline<G> {
    generator: G,
    schema: SchemaNode,
    policy: IntegrityPolicy,
    context: PromptContext,
}

impl<G: StructuredGenerator> Pipeline<G> {
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            schema: world_state_schema(),
            policy: IntegrityPolicy::default(),
            context: PromptContext::default(),
        }
    }

    /// Build a pipeline with the policy and setting from a config
    pub fn from_config(generator: G, config: &GeneratorConfig) -> Self {
        Self::new(generator)
            .with_policy(config.integrity_policy)
            .with_context(PromptContext::new(config.game_system.clone()))
    }

    pub fn with_policy(mut self, policy: IntegrityPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_context(mut self, context: PromptContext) -> Self {
        self.context = context;
        self
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Foundation then expansion
    pub async fn run(&self, input: &AdventureInput) -> Result<WorldState> {
        let foundation = self.generate_foundation(&input.primary, &input.lore).await?;
        self.generate_expansion(foundation, &input.lore).await
    }

    /// One request with the shared schema, parsed and integrity-checked
    async fn request_world(&self, stage: Stage, prompt: &str) -> Result<WorldState> {
        let text = self.generator.generate(prompt, &self.schema).await?;
        let world = parse_world_state(&text)?;

        let report = IntegrityValidator::validate(&world);
        for warning in report.warnings() {
            tracing::warn!(%stage, "{}", warning);
        }
        if report.is_valid() {
            return Ok(world);
        }

        match self.policy {
            IntegrityPolicy::Reject => Err(CodexError::Integrity(report.hard_summary())),
            IntegrityPolicy::Reask => {
                tracing::warn!(
                    %stage,
                    violations = report.hard_violations().count(),
                    "integrity violations, requesting correction"
                );
                let prompt = prompts::correction_prompt(&world, &report)?;
                let text = self.generator.generate(&prompt, &self.schema).await?;
                let corrected = parse_world_state(&text)?;

                let report = IntegrityValidator::validate(&corrected);
                if report.is_valid() {
                    Ok(corrected)
                } else {
                    Err(CodexError::Integrity(report.hard_summary()))
                }
            }
        }
    }
}
