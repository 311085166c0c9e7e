//! Reference validation: scene anchoring, id uniqueness, dangling links

use ahash::AHashSet;

use super::{IntegrityReport, IntegrityViolation};
use crate::world::{EntityKind, WorldIndex, WorldState};

pub struct IntegrityValidator;

impl IntegrityValidator {
    /// Run every check over a World State
    pub fn validate(world: &WorldState) -> IntegrityReport {
        let mut report = IntegrityReport::new();
        report.extend(Self::validate_unique_ids(world));
        report.extend(Self::validate_scene_locations(world));
        report.extend(Self::validate_references(world));
        report
    }

    /// Every scene must name an existing location
    pub fn validate_scene_locations(world: &WorldState) -> Vec<IntegrityViolation> {
        let index = WorldIndex::new(world);
        let mut errors = Vec::new();

        for scene in &world.scenes {
            let location_id = scene.location_id.trim();
            if location_id.is_empty() {
                errors.push(IntegrityViolation::MissingSceneLocation {
                    scene_id: scene.id.clone(),
                });
            } else if index.location(&scene.location_id).is_none() {
                errors.push(IntegrityViolation::UnresolvedSceneLocation {
                    scene_id: scene.id.clone(),
                    location_id: scene.location_id.clone(),
                });
            }
        }

        errors
    }

    /// Ids must be pairwise distinct within each collection
    pub fn validate_unique_ids(world: &WorldState) -> Vec<IntegrityViolation> {
        let mut errors = Vec::new();
        let collections: [(EntityKind, Vec<&str>); 5] = [
            (
                EntityKind::Scene,
                world.scenes.iter().map(|s| s.id.as_str()).collect(),
            ),
            (
                EntityKind::Location,
                world.locations.iter().map(|l| l.id.as_str()).collect(),
            ),
            (
                EntityKind::Npc,
                world.npcs.iter().map(|n| n.id.as_str()).collect(),
            ),
            (
                EntityKind::Thread,
                world.threads.iter().map(|t| t.id.as_str()).collect(),
            ),
            (
                EntityKind::Feature,
                world.adventure_features.iter().map(|f| f.id.as_str()).collect(),
            ),
        ];

        for (kind, ids) in collections {
            let mut seen = AHashSet::with_capacity(ids.len());
            let mut reported = AHashSet::new();
            for id in ids {
                if !seen.insert(id) && reported.insert(id) {
                    errors.push(IntegrityViolation::DuplicateId {
                        kind,
                        id: id.to_string(),
                    });
                }
            }
        }

        errors
    }

    /// Cross-references that do not resolve
    ///
    /// These are tolerated everywhere; the presenter shows the bare id.
    pub fn validate_references(world: &WorldState) -> Vec<IntegrityViolation> {
        let index = WorldIndex::new(world);
        let mut errors = Vec::new();

        let mut check = |from: &str, field: &'static str, kind: EntityKind, target: &str| {
            let resolves = match kind {
                EntityKind::Scene => index.scene(target).is_some(),
                EntityKind::Location => index.location(target).is_some(),
                EntityKind::Npc => index.npc(target).is_some(),
                EntityKind::Thread => index.thread(target).is_some(),
                EntityKind::Feature => index.feature(target).is_some(),
            };
            if !resolves {
                errors.push(IntegrityViolation::DanglingReference {
                    from: from.to_string(),
                    field,
                    target_kind: kind,
                    target_id: target.to_string(),
                });
            }
        };

        for scene in &world.scenes {
            for npc in &scene.associated_npcs {
                check(&scene.id, "associatedNpcs", EntityKind::Npc, npc);
            }
            for thread in &scene.associated_threads {
                check(&scene.id, "associatedThreads", EntityKind::Thread, thread);
            }
            for branch in &scene.branching {
                check(&scene.id, "branching", EntityKind::Scene, &branch.next_scene_id);
            }
        }

        for location in &world.locations {
            for npc in &location.associated_npcs {
                check(&location.id, "associatedNpcs", EntityKind::Npc, npc);
            }
            for thread in &location.associated_threads {
                check(&location.id, "associatedThreads", EntityKind::Thread, thread);
            }
            for link in &location.links {
                check(&location.id, "links", EntityKind::Location, &link.location_id);
            }
        }

        for thread in &world.threads {
            if let Some(location) = &thread.location {
                check(&thread.id, "location", EntityKind::Location, location);
            }
            for npc in thread.npcs.iter().flatten() {
                check(&thread.id, "npcs", EntityKind::Npc, npc);
            }
        }

        errors
    }
}
