//! Compare an expansion result against the foundation it was built from
//!
//! The expansion stage trusts the model to return the union of old and new
//! content. The audit records where it did not, without failing the stage.

use ahash::AHashSet;

use crate::world::{ids, EntityKind, WorldState};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionAudit {
    /// Ids present only in the expansion
    pub added: Vec<(EntityKind, String)>,
    /// Foundation ids the expansion no longer contains
    pub dropped: Vec<(EntityKind, String)>,
    /// Added ids without the `OPT` marker
    pub unmarked: Vec<(EntityKind, String)>,
}

fn ids_of(world: &WorldState, kind: EntityKind) -> Vec<&str> {
    match kind {
        EntityKind::Scene => world.scenes.iter().map(|s| s.id.as_str()).collect(),
        EntityKind::Location => world.locations.iter().map(|l| l.id.as_str()).collect(),
        EntityKind::Npc => world.npcs.iter().map(|n| n.id.as_str()).collect(),
        EntityKind::Thread => world.threads.iter().map(|t| t.id.as_str()).collect(),
        EntityKind::Feature => world
            .adventure_features
            .iter()
            .map(|f| f.id.as_str())
            .collect(),
    }
}

impl ExpansionAudit {
    pub fn compare(foundation: &WorldState, expanded: &WorldState) -> Self {
        let mut audit = Self::default();

        for kind in EntityKind::ALL {
            let before: AHashSet<&str> = ids_of(foundation, kind).into_iter().collect();
            let after_ids = ids_of(expanded, kind);
            let after: AHashSet<&str> = after_ids.iter().copied().collect();

            for id in &after_ids {
                if !before.contains(id) {
                    audit.added.push((kind, id.to_string()));
                    if !ids::is_optional(id) {
                        audit.unmarked.push((kind, id.to_string()));
                    }
                }
            }
            for id in ids_of(foundation, kind) {
                if !after.contains(id) {
                    audit.dropped.push((kind, id.to_string()));
                }
            }
        }

        audit
    }

    pub fn added_count(&self, kind: EntityKind) -> usize {
        self.added.iter().filter(|(k, _)| *k == kind).count()
    }

    /// True when the expansion kept all foundation content and marked every addition
    pub fn is_clean(&self) -> bool {
        self.dropped.is_empty() && self.unmarked.is_empty()
    }

    /// Emit warnings for dropped and unmarked ids
    pub fn log(&self) {
        tracing::info!(
            scenes = self.added_count(EntityKind::Scene),
            locations = self.added_count(EntityKind::Location),
            npcs = self.added_count(EntityKind::Npc),
            threads = self.added_count(EntityKind::Thread),
            "expansion added content"
        );
        for (kind, id) in &self.dropped {
            tracing::warn!(%kind, %id, "expansion dropped foundation entity");
        }
        for (kind, id) in &self.unmarked {
            tracing::warn!(%kind, %id, "expansion entity lacks OPT marker");
        }
    }
}
