//! Adventure Codex - World State generation for tabletop adventures
//!
//! Turns a free-text adventure (plus optional lore documents) into a
//! structured, cross-linked World State of scenes, locations, NPCs, plot
//! threads and adventure features, using a two-stage structured LLM
//! pipeline, and presents the result as a navigable document.

pub mod core;
pub mod export;
pub mod input;
pub mod llm;
pub mod pipeline;
pub mod presenter;
pub mod schema;
pub mod validation;
pub mod world;
