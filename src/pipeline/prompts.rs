//! Prompt construction for both generation stages
//!
//! Business rules the model must follow live here as instruction text.
//! The one rule that can be checked mechanically (scene anchoring) is
//! also enforced after each request, see `crate::validation`.

use crate::core::error::Result;
use crate::input::LoreText;
use crate::validation::IntegrityReport;
use crate::world::WorldState;

use super::expansion::{
    ExpansionTargets, HUB_THREADS_MAX, HUB_THREADS_MIN, MIN_HUB_NPCS, MIN_HUB_SUBLOCATIONS,
};

/// Setting details woven into the prompts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptContext {
    /// Name of the game system, e.g. "Degenesis: Rebirth"
    pub game_system: Option<String>,
}

impl PromptContext {
    pub fn new(game_system: Option<String>) -> Self {
        Self { game_system }
    }

    fn game_master_role(&self) -> String {
        match &self.game_system {
            Some(system) => format!("an expert Game Master for {}", system),
            None => "an expert tabletop RPG Game Master".to_string(),
        }
    }

    fn designer_role(&self) -> String {
        match &self.game_system {
            Some(system) => format!("a creative Level Designer for a {} campaign", system),
            None => "a creative Level Designer for a tabletop RPG campaign".to_string(),
        }
    }

    fn setting(&self) -> String {
        match &self.game_system {
            Some(system) => format!("the world of {}", system),
            None => "the adventure's setting".to_string(),
        }
    }
}

/// Lore documents, each delimited by its name; empty when there are none
pub fn format_lore(lore: &[LoreText], context: &PromptContext) -> String {
    if lore.is_empty() {
        return String::new();
    }

    let documents = lore
        .iter()
        .map(|doc| {
            format!(
                "--- START OF {name} ---\n{content}\n--- END OF {name} ---",
                name = doc.name,
                content = doc.content
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "**ADDITIONAL TEXTS (FOR LORE & RULES ENRICHMENT):**\n\
         Use the following texts to enrich the adventure. Cross-reference them for terminology, \
         atmosphere, item stats, NPC details and mechanical suggestions. They are your \
         sourcebooks for {setting}.\n\n{documents}\n",
        setting = context.setting(),
        documents = documents
    )
}

/// First-stage prompt: extract, do not invent
pub fn foundation_prompt(primary: &str, lore: &[LoreText], context: &PromptContext) -> String {
    format!(
        r#"You are {role}. Analyze the INPUT TEXT and transform it into a foundational "World State" JSON object. Your focus is accuracy and faithful representation of the source material.

**GUIDING PRINCIPLE: CLARITY & ACCURACY**
Every description, goal and piece of information MUST be clear, detailed, and directly extracted or logically inferred from the INPUT TEXT.

**MANDATES:**
1.  **THE PATH OF CLUES:** For every scene, embed the tangible clue that enables progress to the next scene. A scene's 'setup' MUST explain HOW the characters arrived, referencing the clue from the previous scene. Milestones MUST be actionable and name the clues they reveal.
2.  **EXTRACT ENCOUNTERS:** Identify every pre-scripted encounter (combat, social, traps) in the text and record it in the 'encounters' field of the scene it belongs to.
3.  **ADVENTURE FEATURES:** Identify the adventure's unique events, hazards and thematic elements (e.g. "Wandering Scrapper Gangs", "Spore Infestation Level Rising") and describe each in detail.
4.  **LORE INTEGRATION:** Use the ADDITIONAL TEXTS, when present, to enrich descriptions with the setting's own terminology and atmosphere instead of generic terms.
5.  **SCENE LOCATION INTEGRITY (MANDATORY):** Every 'scene' object MUST have a 'locationId' that matches the 'id' of an object in 'locations'. Before answering, check every scene: its 'locationId' must be non-empty and must match a location id. If a scene fails this check, correct it before answering.
6.  **UNIQUE IDS:** Ids must be unique within each list. Use SCENE-<n>, LOC-<n>, NPC-<n>, Thread-<n> and AF-<n>.

{lore}
**INPUT TEXT (The Adventure):**
---
{primary}
---

Generate the foundational World State as a single valid JSON object based *only* on the INPUT TEXT, enriched by the ADDITIONAL TEXTS. Do NOT add new scenes, locations or characters yet.
"#,
        role = context.game_master_role(),
        lore = format_lore(lore, context),
        primary = primary
    )
}

/// Second-stage prompt: grow the world around the foundation
pub fn expansion_prompt(
    foundation: &WorldState,
    lore: &[LoreText],
    targets: &ExpansionTargets,
    context: &PromptContext,
) -> Result<String> {
    let foundation_json = serde_json::to_string(foundation)?;

    Ok(format!(
        r#"You are {role}. You have been given a foundational "World State" JSON object. Your SOLE TASK is to expand this world creatively so that it feels like a living, breathing and dangerous place.

**YOUR CANVAS:**
The foundational World State JSON below is your starting point. You add to it; you never remove from it.

**YOUR PALETTE:**
The ADDITIONAL TEXTS are your source of inspiration for all new content. Everything you create must be consistent with the tone and lore of {setting}.

**PRIMARY DIRECTIVE: CREATE A LIVING HUB**
1.  Identify the adventure's starting location in the foundational state. This is the hub: the settlement or home base the characters return to.
2.  Expand this single hub location so that it feels like a real, functioning place.
3.  Add at least {min_sublocations} new sublocations to the hub's 'sublocations' array.
4.  Add at least {min_hub_npcs} new optional NPCs who live in the hub. Add them to the top-level 'npcs' array AND to the hub location's 'associatedNpcs' array. Their ids MUST start with 'NPC-OPT-HUB-'. Give each a detailed description, motivation and secrets.
5.  Add {hub_threads_min}-{hub_threads_max} new optional minor threads tied to the new hub NPCs and sublocations. Their ids MUST start with 'Thread-OPT-HUB-'.

**SECONDARY DIRECTIVE: GENERAL EXPANSION**
After the hub, add optional content throughout the rest of the adventure:
*   **{scenes} new optional SCENE(s)** that branch off existing scenes as side-quests or detours.
*   **{locations} new optional LOCATION(s)** such as in-between places or hidden areas. This is mandatory.
*   **{npcs} new optional NPC(s)** found outside the hub.
*   **{threads} new optional THREAD(s)** linked to the new general content.

**INTEGRATION RULES:**
Use the 'OPT' marker in the id of all new general content (SCENE-OPT-<n>, LOC-OPT-<n>, NPC-OPT-<n>, Thread-OPT-<n>).
*   Link new scenes by adding entries to the 'branching' array of existing scenes.
*   Link new locations by adding entries to the 'links' array of existing locations.
*   Place new NPCs by adding them to the 'associatedNpcs' array of the relevant location.
*   Every new scene, hub-related or general, MUST have a 'locationId' matching an id in 'locations'.
*   Every new NPC, thread, scene and location MUST appear in its top-level array.
*   Ids must stay unique within each array.

{lore}
**FOUNDATIONAL WORLD STATE JSON:**
---
{foundation}
---

Return the complete, expanded World State as a single valid JSON object. It must contain all of the original foundational data AND all of the new, integrated optional content, including the expanded hub.
"#,
        role = context.designer_role(),
        setting = context.setting(),
        min_sublocations = MIN_HUB_SUBLOCATIONS,
        min_hub_npcs = MIN_HUB_NPCS,
        hub_threads_min = HUB_THREADS_MIN,
        hub_threads_max = HUB_THREADS_MAX,
        scenes = targets.scenes,
        locations = targets.locations,
        npcs = targets.npcs,
        threads = targets.threads,
        lore = format_lore(lore, context),
        foundation = foundation_json
    ))
}

/// Corrective prompt sent once under the re-ask policy
pub fn correction_prompt(rejected: &WorldState, report: &IntegrityReport) -> Result<String> {
    let rejected_json = serde_json::to_string(rejected)?;

    Ok(format!(
        r#"The World State JSON below breaks mandatory integrity rules:
{violations}

Fix exactly these problems:
*   Every scene MUST have a 'locationId' that matches the 'id' of an object in 'locations'. If the scene's place is missing from 'locations', add that location.
*   Ids MUST be unique within each array. Rename duplicates and update every reference to them.
Keep all other content unchanged.

**WORLD STATE JSON:**
---
{world}
---

Return the complete, corrected World State as a single valid JSON object.
"#,
        violations = report.hard_summary(),
        world = rejected_json
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::IntegrityValidator;
    use crate::world::Scene;

    #[test]
    fn test_format_lore_empty() {
        assert_eq!(format_lore(&[], &PromptContext::default()), "");
    }

    #[test]
    fn test_format_lore_delimits_each_document() {
        let lore = vec![
            LoreText::new("cults.md", "The Spitalians heal."),
            LoreText::new("regions.txt", "Franka is cold."),
        ];
        let text = format_lore(&lore, &PromptContext::new(Some("Degenesis: Rebirth".into())));
        assert!(text.contains(
            "--- START OF cults.md ---\nThe Spitalians heal.\n--- END OF cults.md ---"
        ));
        assert!(text.contains("--- START OF regions.txt ---"));
        assert!(text.contains("the world of Degenesis: Rebirth"));
        assert!(text.find("cults.md").unwrap() < text.find("regions.txt").unwrap());
    }

    #[test]
    fn test_foundation_prompt_embeds_text_verbatim() {
        let primary = "The characters wake in a flooded bunker.\nA radio crackles.";
        let prompt = foundation_prompt(primary, &[], &PromptContext::default());
        assert!(prompt.contains(primary));
        assert!(prompt.contains("locationId"));
        assert!(prompt.contains("Do NOT add new scenes"));
        assert!(!prompt.contains("ADDITIONAL TEXTS (FOR LORE"));
    }

    #[test]
    fn test_expansion_prompt_contains_targets_and_foundation() {
        let foundation = WorldState {
            scenes: vec![Scene {
                id: "SCENE-1".into(),
                location_id: "LOC-1".into(),
                ..Scene::default()
            }],
            ..WorldState::default()
        };
        let targets = ExpansionTargets::from_foundation(&foundation);
        let prompt =
            expansion_prompt(&foundation, &[], &targets, &PromptContext::default()).unwrap();
        assert!(prompt.contains("\"id\":\"SCENE-1\""));
        assert!(prompt.contains("**1 new optional SCENE(s)**"));
        assert!(prompt.contains("at least 10 new sublocations"));
        assert!(prompt.contains("NPC-OPT-HUB-"));
        assert!(prompt.contains("Thread-OPT-HUB-"));
        assert!(prompt.contains("2-3 new optional minor threads"));
    }

    #[test]
    fn test_correction_prompt_lists_violations() {
        let rejected = WorldState {
            scenes: vec![Scene {
                id: "SCENE-1".into(),
                location_id: "LOC-7".into(),
                ..Scene::default()
            }],
            ..WorldState::default()
        };
        let report = IntegrityValidator::validate(&rejected);
        let prompt = correction_prompt(&rejected, &report).unwrap();
        assert!(prompt.contains("scene SCENE-1 references location LOC-7 which does not exist"));
        assert!(prompt.contains("\"locationId\":\"LOC-7\""));
    }
}
