//! Integrity checks for generated World States
//!
//! The model is told to keep every scene anchored to a location and to
//! keep ids unique, but compliance is not guaranteed. These checks run
//! after every generation request.

mod audit;
mod references;
mod report;

pub use audit::ExpansionAudit;
pub use references::IntegrityValidator;
pub use report::IntegrityReport;

use std::fmt;

use crate::world::EntityKind;

/// Integrity finding types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityViolation {
    /// Scene has an empty `locationId`
    MissingSceneLocation { scene_id: String },
    /// Scene `locationId` names no location in the document
    UnresolvedSceneLocation {
        scene_id: String,
        location_id: String,
    },
    /// Same id used twice within one collection
    DuplicateId { kind: EntityKind, id: String },
    /// Cross-reference to an id that does not exist (tolerated)
    DanglingReference {
        from: String,
        field: &'static str,
        target_kind: EntityKind,
        target_id: String,
    },
}

impl IntegrityViolation {
    /// Hard violations fail a stage; the rest are warnings
    pub fn is_hard(&self) -> bool {
        !matches!(self, IntegrityViolation::DanglingReference { .. })
    }
}

impl fmt::Display for IntegrityViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrityViolation::MissingSceneLocation { scene_id } => {
                write!(f, "scene {} has no locationId", scene_id)
            }
            IntegrityViolation::UnresolvedSceneLocation {
                scene_id,
                location_id,
            } => write!(
                f,
                "scene {} references location {} which does not exist",
                scene_id, location_id
            ),
            IntegrityViolation::DuplicateId { kind, id } => {
                write!(f, "{} id {} is used more than once", kind, id)
            }
            IntegrityViolation::DanglingReference {
                from,
                field,
                target_kind,
                target_id,
            } => write!(
                f,
                "{}.{} references unknown {} {}",
                from, field, target_kind, target_id
            ),
        }
    }
}
