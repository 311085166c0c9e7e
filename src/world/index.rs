//! Id lookups over a World State

use ahash::AHashMap;

use crate::world::model::{AdventureFeature, Location, Npc, Scene, Thread, WorldState};

/// Borrowed id -> entity maps for each collection
///
/// When a collection repeats an id the first occurrence wins, matching
/// the order the entities are listed in.
pub struct WorldIndex<'a> {
    pub scenes: AHashMap<&'a str, &'a Scene>,
    pub locations: AHashMap<&'a str, &'a Location>,
    pub npcs: AHashMap<&'a str, &'a Npc>,
    pub threads: AHashMap<&'a str, &'a Thread>,
    pub features: AHashMap<&'a str, &'a AdventureFeature>,
}

fn first_wins<'a, T>(
    items: &'a [T],
    id: impl Fn(&'a T) -> &'a str,
) -> AHashMap<&'a str, &'a T> {
    let mut map = AHashMap::with_capacity(items.len());
    for item in items {
        map.entry(id(item)).or_insert(item);
    }
    map
}

impl<'a> WorldIndex<'a> {
    pub fn new(world: &'a WorldState) -> Self {
        Self {
            scenes: first_wins(&world.scenes, |s| s.id.as_str()),
            locations: first_wins(&world.locations, |l| l.id.as_str()),
            npcs: first_wins(&world.npcs, |n| n.id.as_str()),
            threads: first_wins(&world.threads, |t| t.id.as_str()),
            features: first_wins(&world.adventure_features, |f| f.id.as_str()),
        }
    }

    pub fn scene(&self, id: &str) -> Option<&'a Scene> {
        self.scenes.get(id).copied()
    }

    pub fn location(&self, id: &str) -> Option<&'a Location> {
        self.locations.get(id).copied()
    }

    pub fn npc(&self, id: &str) -> Option<&'a Npc> {
        self.npcs.get(id).copied()
    }

    pub fn thread(&self, id: &str) -> Option<&'a Thread> {
        self.threads.get(id).copied()
    }

    pub fn feature(&self, id: &str) -> Option<&'a AdventureFeature> {
        self.features.get(id).copied()
    }
}
