//! Read-only browsing over a finished World State
//!
//! The presenter resolves an active [`Selection`] into a [`DetailView`].
//! Every id a view mentions is exposed as a numbered [`Link`]; following a
//! link makes its target the new selection. Ids that do not resolve are
//! shown bare, and selecting a missing id yields a not-found view rather
//! than an error.

pub mod browser;
mod detail;
pub mod markdown;

use std::fmt;

use crate::world::{classify, EntityKind, WorldIndex, WorldState};

pub use browser::{Browser, BrowserCommand, BrowserOutcome};

/// Tagged reference to one entity by id
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selection {
    Scene(String),
    Location(String),
    Npc(String),
    Thread(String),
    Feature(String),
}

impl Selection {
    pub fn new(kind: EntityKind, id: impl Into<String>) -> Self {
        let id = id.into();
        match kind {
            EntityKind::Scene => Selection::Scene(id),
            EntityKind::Location => Selection::Location(id),
            EntityKind::Npc => Selection::Npc(id),
            EntityKind::Thread => Selection::Thread(id),
            EntityKind::Feature => Selection::Feature(id),
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            Selection::Scene(_) => EntityKind::Scene,
            Selection::Location(_) => EntityKind::Location,
            Selection::Npc(_) => EntityKind::Npc,
            Selection::Thread(_) => EntityKind::Thread,
            Selection::Feature(_) => EntityKind::Feature,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Selection::Scene(id)
            | Selection::Location(id)
            | Selection::Npc(id)
            | Selection::Thread(id)
            | Selection::Feature(id) => id,
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), self.id())
    }
}

/// A navigable reference inside a detail view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub label: String,
    pub target: Selection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Text(String),
    Item(String),
    /// Index into the view's links
    Link(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: &'static str,
    pub lines: Vec<Line>,
}

/// Full detail of one entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDetail {
    pub selection: Selection,
    pub heading: String,
    pub sections: Vec<Section>,
    pub links: Vec<Link>,
}

impl EntityDetail {
    pub fn section(&self, title: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.title == title)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailView {
    /// Nothing selected
    Empty,
    /// The selected id is not in its collection
    NotFound(Selection),
    Entity(EntityDetail),
}

impl DetailView {
    pub fn links(&self) -> &[Link] {
        match self {
            DetailView::Entity(detail) => &detail.links,
            _ => &[],
        }
    }
}

impl fmt::Display for DetailView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetailView::Empty => writeln!(f, "Select an item to view its details."),
            DetailView::NotFound(selection) => {
                writeln!(f, "{} not found: {}", selection.kind(), selection.id())
            }
            DetailView::Entity(detail) => {
                writeln!(f, "== {} ==", detail.heading)?;
                for section in &detail.sections {
                    writeln!(f)?;
                    writeln!(f, "{}", section.title)?;
                    for line in &section.lines {
                        match line {
                            Line::Text(text) => writeln!(f, "  {}", text)?,
                            Line::Item(item) => writeln!(f, "  - {}", item)?,
                            Line::Link(index) => match detail.links.get(*index) {
                                Some(link) => writeln!(f, "  - {} [{}]", link.label, index + 1)?,
                                None => continue,
                            },
                        }
                    }
                }
                Ok(())
            }
        }
    }
}

/// One sidebar entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavEntry {
    pub selection: Selection,
    pub label: String,
}

/// One collection in the sidebar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavGroup {
    pub kind: EntityKind,
    pub title: &'static str,
    pub entries: Vec<NavEntry>,
}

/// Selection state plus lookups over a World State
pub struct Presenter<'a> {
    world: &'a WorldState,
    index: WorldIndex<'a>,
    selection: Option<Selection>,
}

impl<'a> Presenter<'a> {
    /// Start on the first scene, if there is one
    pub fn new(world: &'a WorldState) -> Self {
        Self {
            world,
            index: WorldIndex::new(world),
            selection: world.scenes.first().map(|s| Selection::Scene(s.id.clone())),
        }
    }

    pub fn world(&self) -> &'a WorldState {
        self.world
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn select(&mut self, selection: Selection) {
        self.selection = Some(selection);
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Detail of the active selection
    pub fn detail(&self) -> DetailView {
        match &self.selection {
            Some(selection) => self.detail_for(selection),
            None => DetailView::Empty,
        }
    }

    /// Detail of any selection
    pub fn detail_for(&self, selection: &Selection) -> DetailView {
        detail::build(&self.index, selection)
    }

    /// Follow link `index` of the current view
    ///
    /// Returns the new selection, or `None` (selection unchanged) when the
    /// view has no such link.
    pub fn navigate(&mut self, index: usize) -> Option<&Selection> {
        let target = self.detail().links().get(index)?.target.clone();
        self.selection = Some(target);
        self.selection.as_ref()
    }

    /// Work out which collection an id belongs to
    ///
    /// Existing entities win; otherwise the id prefix decides.
    pub fn resolve_id(&self, id: &str) -> Option<Selection> {
        let found = if self.index.scene(id).is_some() {
            Some(EntityKind::Scene)
        } else if self.index.location(id).is_some() {
            Some(EntityKind::Location)
        } else if self.index.npc(id).is_some() {
            Some(EntityKind::Npc)
        } else if self.index.thread(id).is_some() {
            Some(EntityKind::Thread)
        } else if self.index.feature(id).is_some() {
            Some(EntityKind::Feature)
        } else {
            classify(id).kind
        };
        found.map(|kind| Selection::new(kind, id))
    }

    /// Every collection with display labels, in document order
    pub fn sidebar(&self) -> Vec<NavGroup> {
        let world = self.world;
        vec![
            NavGroup {
                kind: EntityKind::Scene,
                title: "Scenes",
                entries: world
                    .scenes
                    .iter()
                    .map(|s| nav_entry(Selection::Scene(s.id.clone()), &s.title))
                    .collect(),
            },
            NavGroup {
                kind: EntityKind::Location,
                title: "Locations",
                entries: world
                    .locations
                    .iter()
                    .map(|l| nav_entry(Selection::Location(l.id.clone()), &l.name))
                    .collect(),
            },
            NavGroup {
                kind: EntityKind::Npc,
                title: "NPCs",
                entries: world
                    .npcs
                    .iter()
                    .map(|n| nav_entry(Selection::Npc(n.id.clone()), &n.name))
                    .collect(),
            },
            NavGroup {
                kind: EntityKind::Thread,
                title: "Threads",
                entries: world
                    .threads
                    .iter()
                    .map(|t| nav_entry(Selection::Thread(t.id.clone()), &t.goal))
                    .collect(),
            },
            NavGroup {
                kind: EntityKind::Feature,
                title: "Adventure Features",
                entries: world
                    .adventure_features
                    .iter()
                    .map(|af| nav_entry(Selection::Feature(af.id.clone()), &af.feature))
                    .collect(),
            },
        ]
    }
}

fn nav_entry(selection: Selection, label: &str) -> NavEntry {
    let label = if label.trim().is_empty() {
        selection.id().to_string()
    } else {
        label.to_string()
    };
    NavEntry { selection, label }
}
