//! Entity id classification
//!
//! Ids look like `SCENE-3`, `LOC-OPT-2` or `NPC-OPT-HUB-7`. The first
//! segment names the collection; `OPT` marks expansion content and `HUB`
//! marks content tied to the adventure's starting settlement.

use std::fmt;

/// Which collection an id prefix belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Scene,
    Location,
    Npc,
    Thread,
    Feature,
}

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Scene,
        EntityKind::Location,
        EntityKind::Npc,
        EntityKind::Thread,
        EntityKind::Feature,
    ];

    /// Canonical id prefix used in prompts
    pub fn prefix(&self) -> &'static str {
        match self {
            EntityKind::Scene => "SCENE",
            EntityKind::Location => "LOC",
            EntityKind::Npc => "NPC",
            EntityKind::Thread => "Thread",
            EntityKind::Feature => "AF",
        }
    }

    pub fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix.to_ascii_uppercase().as_str() {
            "SCENE" => Some(EntityKind::Scene),
            "LOC" | "LOCATION" => Some(EntityKind::Location),
            "NPC" => Some(EntityKind::Npc),
            "THREAD" => Some(EntityKind::Thread),
            "AF" => Some(EntityKind::Feature),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Scene => "Scene",
            EntityKind::Location => "Location",
            EntityKind::Npc => "NPC",
            EntityKind::Thread => "Thread",
            EntityKind::Feature => "Adventure Feature",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which stage an id claims to come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdOrigin {
    /// Extracted from the source text
    Foundation,
    /// Invented during expansion
    Optional,
    /// Invented during expansion for the hub location
    OptionalHub,
}

impl IdOrigin {
    pub fn is_optional(&self) -> bool {
        !matches!(self, IdOrigin::Foundation)
    }
}

/// Parsed view of an id string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdInfo {
    pub kind: Option<EntityKind>,
    pub origin: IdOrigin,
}

/// Classify an id by its prefix and marker segments
pub fn classify(id: &str) -> IdInfo {
    let mut segments = id.split('-');
    let kind = segments.next().and_then(EntityKind::from_prefix);

    let mut optional = false;
    let mut hub = false;
    for segment in segments {
        if segment.eq_ignore_ascii_case("OPT") {
            optional = true;
        } else if segment.eq_ignore_ascii_case("HUB") {
            hub = true;
        }
    }

    let origin = match (optional, hub) {
        (true, true) => IdOrigin::OptionalHub,
        (true, false) => IdOrigin::Optional,
        // HUB without OPT is not a marker the protocol defines
        (false, _) => IdOrigin::Foundation,
    };

    IdInfo { kind, origin }
}

/// True when the id carries the `OPT` marker
pub fn is_optional(id: &str) -> bool {
    classify(id).origin.is_optional()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_foundation_ids() {
        let info = classify("SCENE-01");
        assert_eq!(info.kind, Some(EntityKind::Scene));
        assert_eq!(info.origin, IdOrigin::Foundation);

        assert_eq!(classify("LOC-3").kind, Some(EntityKind::Location));
        assert_eq!(classify("AF-1").kind, Some(EntityKind::Feature));
        assert_eq!(classify("Thread-2").kind, Some(EntityKind::Thread));
    }

    #[test]
    fn test_classify_optional_markers() {
        assert_eq!(classify("SCENE-OPT-1").origin, IdOrigin::Optional);
        assert_eq!(classify("NPC-OPT-HUB-4").origin, IdOrigin::OptionalHub);
        assert_eq!(classify("Thread-opt-hub-2").origin, IdOrigin::OptionalHub);
        assert_eq!(classify("NPC-HUB-4").origin, IdOrigin::Foundation);
    }

    #[test]
    fn test_unknown_prefix() {
        let info = classify("ITEM-4");
        assert_eq!(info.kind, None);
        assert!(!is_optional("ITEM-4"));
        assert!(is_optional("ITEM-OPT-4"));
    }

    #[test]
    fn test_prefix_round_trip() {
        for kind in EntityKind::ALL {
            assert_eq!(EntityKind::from_prefix(kind.prefix()), Some(kind));
        }
    }
}
