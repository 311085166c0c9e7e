//! World State export and import as pretty-printed JSON

use std::path::Path;

use crate::core::error::Result;
use crate::world::WorldState;

/// File name used when no output path is given
pub const DEFAULT_EXPORT_FILE: &str = "world-state.json";

/// Serialize verbatim, two-space indented
pub fn to_pretty_json(world: &WorldState) -> Result<String> {
    Ok(serde_json::to_string_pretty(world)?)
}

pub fn from_json(json: &str) -> Result<WorldState> {
    Ok(serde_json::from_str(json)?)
}

pub fn write_world_state(path: &Path, world: &WorldState) -> Result<()> {
    std::fs::write(path, to_pretty_json(world)?)?;
    tracing::info!(path = %path.display(), counts = %world.counts(), "world state exported");
    Ok(())
}

pub fn read_world_state(path: &Path) -> Result<WorldState> {
    let json = std::fs::read_to_string(path)?;
    from_json(&json)
}
