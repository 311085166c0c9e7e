//! Caller-owned generation state
//!
//! A session holds at most one World State. Each run replaces it wholesale
//! on success and leaves nothing behind on failure.

use crate::core::error::{CodexError, Result};
use crate::input::AdventureInput;
use crate::llm::StructuredGenerator;
use crate::world::WorldState;

use super::Pipeline;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum SessionState {
    /// Waiting for input
    #[default]
    Idle,
    InProgress,
    Succeeded(WorldState),
    /// Terminal error with the user-facing message
    Failed(String),
}

#[derive(Debug, Default)]
pub struct GenerationSession {
    state: SessionState,
}

impl GenerationSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The generated World State, if the last run succeeded
    pub fn world(&self) -> Option<&WorldState> {
        match &self.state {
            SessionState::Succeeded(world) => Some(world),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            SessionState::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn into_world(self) -> Option<WorldState> {
        match self.state {
            SessionState::Succeeded(world) => Some(world),
            _ => None,
        }
    }

    /// The World State, or the failure message as a session error
    pub fn into_result(self) -> Result<WorldState> {
        match self.state {
            SessionState::Succeeded(world) => Ok(world),
            SessionState::Failed(message) => Err(CodexError::Session(message)),
            SessionState::Idle | SessionState::InProgress => Err(CodexError::Session(
                "world state generation has not finished".into(),
            )),
        }
    }

    /// Run both stages, ending in `Succeeded` or `Failed`
    ///
    /// Any previously generated World State is discarded up front.
    pub async fn run<G: StructuredGenerator>(
        &mut self,
        pipeline: &Pipeline<G>,
        input: &AdventureInput,
    ) -> &SessionState {
        self.state = SessionState::InProgress;

        self.state = match pipeline.run(input).await {
            Ok(world) => SessionState::Succeeded(world),
            Err(e) => {
                tracing::error!(error = %e, "world state generation failed");
                SessionState::Failed(format!("Failed to generate world state: {}", e))
            }
        };
        &self.state
    }

    /// Back to the initial input-collection state
    ///
    /// Does not cancel anything; a run borrows the session mutably, so no
    /// run can be in flight while reset is callable.
    pub fn reset(&mut self) {
        self.state = SessionState::Idle;
    }
}
