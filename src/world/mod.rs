//! The World State document and its id conventions

pub mod ids;
pub mod index;
pub mod model;

pub use ids::{classify, EntityKind, IdInfo, IdOrigin};
pub use index::WorldIndex;
pub use model::{
    AdventureFeature, Branch, CollectionCounts, Encounter, Location, LocationLink, Npc, Scene,
    SubLocation, Thread, WorldState,
};
