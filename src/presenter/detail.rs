//! Detail view construction per entity kind

use super::{DetailView, EntityDetail, Line, Link, Section, Selection};
use crate::world::{AdventureFeature, Location, Npc, Scene, Thread, WorldIndex};

pub(super) fn build(index: &WorldIndex<'_>, selection: &Selection) -> DetailView {
    let detail = match selection {
        Selection::Scene(id) => index.scene(id).map(|s| scene_detail(index, s)),
        Selection::Location(id) => index.location(id).map(|l| location_detail(index, l)),
        Selection::Npc(id) => index.npc(id).map(npc_detail),
        Selection::Thread(id) => index.thread(id).map(|t| thread_detail(index, t)),
        Selection::Feature(id) => index.feature(id).map(feature_detail),
    };
    match detail {
        Some(detail) => DetailView::Entity(detail),
        None => DetailView::NotFound(selection.clone()),
    }
}

struct DetailBuilder {
    selection: Selection,
    heading: String,
    sections: Vec<Section>,
    links: Vec<Link>,
}

impl DetailBuilder {
    fn new(selection: Selection, name: &str) -> Self {
        let heading = format!("{}: {}", selection.id(), name);
        Self {
            selection,
            heading,
            sections: Vec::new(),
            links: Vec::new(),
        }
    }

    fn link(&mut self, label: String, target: Selection) -> Line {
        self.links.push(Link { label, target });
        Line::Link(self.links.len() - 1)
    }

    fn section(&mut self, title: &'static str, lines: Vec<Line>) {
        self.sections.push(Section { title, lines });
    }

    fn text(&mut self, title: &'static str, text: &str) {
        self.section(title, vec![Line::Text(text.to_string())]);
    }

    fn items(&mut self, title: &'static str, items: &[String]) {
        self.section(title, items.iter().cloned().map(Line::Item).collect());
    }

    fn finish(self) -> EntityDetail {
        EntityDetail {
            selection: self.selection,
            heading: self.heading,
            sections: self.sections,
            links: self.links,
        }
    }
}

fn enriched(id: &str, name: Option<&str>) -> String {
    match name {
        Some(name) => format!("{}: {}", id, name),
        None => id.to_string(),
    }
}

fn npc_links(b: &mut DetailBuilder, index: &WorldIndex<'_>, ids: &[String]) -> Vec<Line> {
    ids.iter()
        .map(|id| {
            let label = enriched(id, index.npc(id).map(|n| n.name.as_str()));
            b.link(label, Selection::Npc(id.clone()))
        })
        .collect()
}

fn thread_links(b: &mut DetailBuilder, index: &WorldIndex<'_>, ids: &[String]) -> Vec<Line> {
    ids.iter()
        .map(|id| {
            let label = enriched(id, index.thread(id).map(|t| t.goal.as_str()));
            b.link(label, Selection::Thread(id.clone()))
        })
        .collect()
}

fn location_link(b: &mut DetailBuilder, index: &WorldIndex<'_>, id: &str) -> Line {
    let label = enriched(id, index.location(id).map(|l| l.name.as_str()));
    b.link(label, Selection::Location(id.to_string()))
}

fn scene_detail(index: &WorldIndex<'_>, scene: &Scene) -> EntityDetail {
    let mut b = DetailBuilder::new(Selection::Scene(scene.id.clone()), &scene.title);

    let location = location_link(&mut b, index, &scene.location_id);
    b.section("Location", vec![location]);
    b.text("Setup", &scene.setup);
    b.items("Obstacles", &scene.obstacles);
    b.items("Mechanics & Tests", &scene.mechanics);

    let mut milestones = Vec::with_capacity(scene.milestones.len());
    for milestone in &scene.milestones {
        let line = match scene.branch_for(milestone) {
            Some(next) => b.link(
                format!("{} -> {}", milestone, next),
                Selection::Scene(next.to_string()),
            ),
            None => Line::Item(milestone.clone()),
        };
        milestones.push(line);
    }
    b.section("Milestones & Exits", milestones);

    // Branches whose milestone text matches no listed milestone
    let unmatched: Vec<_> = scene
        .branching
        .iter()
        .filter(|branch| !scene.milestones.contains(&branch.milestone))
        .collect();
    if !unmatched.is_empty() {
        let lines = unmatched
            .into_iter()
            .map(|branch| {
                b.link(
                    format!("{} -> {}", branch.milestone, branch.next_scene_id),
                    Selection::Scene(branch.next_scene_id.clone()),
                )
            })
            .collect();
        b.section("Other Exits", lines);
    }

    if !scene.encounters.is_empty() {
        let mut lines = Vec::new();
        for encounter in &scene.encounters {
            lines.push(Line::Item(encounter.name.clone()));
            lines.push(Line::Text(format!("Trigger: {}", encounter.trigger)));
            lines.push(Line::Text(encounter.description.clone()));
            if let Some(suggestions) = &encounter.stat_block_suggestions {
                if !suggestions.is_empty() {
                    lines.push(Line::Text(format!(
                        "Suggested enemies: {}",
                        suggestions.join("; ")
                    )));
                }
            }
        }
        b.section("Encounters", lines);
    }

    if let Some(profile) = &scene.enemy_profile {
        b.text("Enemy Profile", profile);
    }

    let npcs = npc_links(&mut b, index, &scene.associated_npcs);
    b.section("Associated NPCs", npcs);
    let threads = thread_links(&mut b, index, &scene.associated_threads);
    b.section("Associated Threads", threads);

    b.finish()
}

fn location_detail(index: &WorldIndex<'_>, location: &Location) -> EntityDetail {
    let mut b = DetailBuilder::new(Selection::Location(location.id.clone()), &location.name);

    b.text("Description", &location.description);
    b.text("Tone/Atmosphere", &location.tone);
    b.items("Secrets", &location.secrets);

    let links = location
        .links
        .iter()
        .map(|link| {
            b.link(
                format!("{} -> {}", link.description, link.location_id),
                Selection::Location(link.location_id.clone()),
            )
        })
        .collect();
    b.section("Links", links);

    if let Some(sublocations) = &location.sublocations {
        if !sublocations.is_empty() {
            let mut lines = Vec::new();
            for sub in sublocations {
                lines.push(Line::Item(format!("{}: {}", sub.name, sub.description)));
                lines.push(Line::Text(format!("Significance: {}", sub.significance)));
            }
            b.section("Sublocations", lines);
        }
    }

    let npcs = npc_links(&mut b, index, &location.associated_npcs);
    b.section("Associated NPCs", npcs);
    let threads = thread_links(&mut b, index, &location.associated_threads);
    b.section("Associated Threads", threads);

    b.finish()
}

fn npc_detail(npc: &Npc) -> EntityDetail {
    let mut b = DetailBuilder::new(Selection::Npc(npc.id.clone()), &npc.name);
    b.text("Description", &npc.description);
    b.text("Disposition", &npc.disposition);
    b.text("Motivation", &npc.motivation);
    b.text("Secrets", &npc.secrets);
    if let Some(stat_block) = &npc.stat_block_suggestion {
        b.text("Stat Block Suggestion", stat_block);
    }
    b.finish()
}

fn thread_detail(index: &WorldIndex<'_>, thread: &Thread) -> EntityDetail {
    let mut b = DetailBuilder::new(Selection::Thread(thread.id.clone()), &thread.goal);
    b.text("Description", &thread.description);
    if let Some(location) = &thread.location {
        let line = location_link(&mut b, index, location);
        b.section("Associated Location", vec![line]);
    }
    if let Some(npcs) = &thread.npcs {
        if !npcs.is_empty() {
            let lines = npc_links(&mut b, index, npcs);
            b.section("Associated NPCs", lines);
        }
    }
    b.finish()
}

fn feature_detail(feature: &AdventureFeature) -> EntityDetail {
    let mut b = DetailBuilder::new(Selection::Feature(feature.id.clone()), &feature.feature);
    b.text("Description", &feature.description);
    b.finish()
}
