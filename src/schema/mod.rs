//! Response schema shared by both generation stages
//!
//! The World State shape is declared once as a [`SchemaNode`] tree and
//! rendered into whichever dialect the endpoint understands. Both stages
//! send the identical tree, so expansion output is structurally
//! interchangeable with foundation output.

use serde_json::{json, Map, Value};

/// Schema dialect accepted by a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaDialect {
    /// Gemini `responseSchema` (OpenAPI subset, upper-case type names)
    Gemini,
    /// Plain JSON Schema (OpenAI `response_format`, prompt embedding)
    JsonSchema,
}

/// A node in the declared response shape
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    String {
        description: Option<&'static str>,
    },
    Array {
        items: Box<SchemaNode>,
        description: Option<&'static str>,
    },
    Object {
        properties: Vec<Property>,
        description: Option<&'static str>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: &'static str,
    pub node: SchemaNode,
    pub required: bool,
}

fn string() -> SchemaNode {
    SchemaNode::String { description: None }
}

fn described(description: &'static str) -> SchemaNode {
    SchemaNode::String {
        description: Some(description),
    }
}

fn list(items: SchemaNode) -> SchemaNode {
    SchemaNode::Array {
        items: Box::new(items),
        description: None,
    }
}

fn described_list(items: SchemaNode, description: &'static str) -> SchemaNode {
    SchemaNode::Array {
        items: Box::new(items),
        description: Some(description),
    }
}

fn object(properties: Vec<Property>) -> SchemaNode {
    SchemaNode::Object {
        properties,
        description: None,
    }
}

fn required(name: &'static str, node: SchemaNode) -> Property {
    Property {
        name,
        node,
        required: true,
    }
}

fn optional(name: &'static str, node: SchemaNode) -> Property {
    Property {
        name,
        node,
        required: false,
    }
}

impl SchemaNode {
    /// Render in the given dialect
    pub fn render(&self, dialect: SchemaDialect) -> Value {
        let type_name = |lower: &str| match dialect {
            SchemaDialect::Gemini => Value::String(lower.to_ascii_uppercase()),
            SchemaDialect::JsonSchema => Value::String(lower.to_string()),
        };

        let mut out = Map::new();
        let description = match self {
            SchemaNode::String { description } => {
                out.insert("type".into(), type_name("string"));
                description
            }
            SchemaNode::Array { items, description } => {
                out.insert("type".into(), type_name("array"));
                out.insert("items".into(), items.render(dialect));
                description
            }
            SchemaNode::Object {
                properties,
                description,
            } => {
                out.insert("type".into(), type_name("object"));
                let rendered: Map<String, Value> = properties
                    .iter()
                    .map(|p| (p.name.to_string(), p.node.render(dialect)))
                    .collect();
                out.insert("properties".into(), Value::Object(rendered));
                let required: Vec<Value> = properties
                    .iter()
                    .filter(|p| p.required)
                    .map(|p| Value::String(p.name.to_string()))
                    .collect();
                out.insert("required".into(), Value::Array(required));
                match dialect {
                    SchemaDialect::Gemini => {
                        // Gemini emits keys in this order, which keeps ids first
                        let order: Vec<Value> = properties
                            .iter()
                            .map(|p| Value::String(p.name.to_string()))
                            .collect();
                        out.insert("propertyOrdering".into(), Value::Array(order));
                    }
                    SchemaDialect::JsonSchema => {
                        out.insert("additionalProperties".into(), json!(false));
                    }
                }
                description
            }
        };
        if let Some(text) = description {
            out.insert("description".into(), Value::String((*text).to_string()));
        }
        Value::Object(out)
    }

    /// Names of the required properties of an object node
    pub fn required_names(&self) -> Vec<&'static str> {
        match self {
            SchemaNode::Object { properties, .. } => properties
                .iter()
                .filter(|p| p.required)
                .map(|p| p.name)
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Child node of an object property, or the item node of an array
    pub fn child(&self, name: &str) -> Option<&SchemaNode> {
        match self {
            SchemaNode::Object { properties, .. } => properties
                .iter()
                .find(|p| p.name == name)
                .map(|p| &p.node),
            SchemaNode::Array { items, .. } if name == "[]" => Some(items),
            _ => None,
        }
    }
}

fn thread_schema() -> SchemaNode {
    object(vec![
        required(
            "id",
            described("Unique ID, e.g., 'Thread-1' or 'Thread-OPT-1' for optional threads."),
        ),
        required("goal", string()),
        required(
            "description",
            described(
                "A clear, actionable summary of the thread's goal. Explain its importance and \
                 hint at the first logical step.",
            ),
        ),
        optional("location", described("ID of the associated Location")),
        optional("npcs", list(described("ID of an associated NPC"))),
    ])
}

fn npc_schema() -> SchemaNode {
    object(vec![
        required(
            "id",
            described("Unique ID, e.g., 'NPC-1' or 'NPC-OPT-1' for optional NPCs."),
        ),
        required("name", string()),
        required(
            "description",
            described(
                "Visuals and demeanor, immediate actions, notable gear and personality.",
            ),
        ),
        required("disposition", string()),
        required(
            "motivation",
            described(
                "What this NPC wants in the short term (within the scene) and the long term \
                 (in the adventure), including allies and enemies among other NPCs.",
            ),
        ),
        required("secrets", string()),
        optional(
            "statBlockSuggestion",
            described("Suggested stat block with its source, e.g. 'Veteran Guard (Core p. 112)'"),
        ),
    ])
}

fn feature_schema() -> SchemaNode {
    object(vec![
        required("id", described("Unique ID, e.g., 'AF-1'")),
        required(
            "feature",
            described(
                "Anything special or unique in this adventure that could form an encounter",
            ),
        ),
        required("description", string()),
    ])
}

fn encounter_schema() -> SchemaNode {
    object(vec![
        required("name", described("A concise name, e.g., 'Ganger Ambush'.")),
        required(
            "trigger",
            described("The condition that causes the encounter, e.g., 'Opening the crate'."),
        ),
        required(
            "description",
            described("Enemy placement, tactics, potential dialogue and the immediate situation."),
        ),
        optional(
            "statBlockSuggestions",
            described_list(
                string(),
                "Stat block suggestions for the enemies involved, e.g., '3x Gangers (Core p. 250)'",
            ),
        ),
    ])
}

fn scene_schema() -> SchemaNode {
    object(vec![
        required(
            "id",
            described("Unique ID, e.g., 'SCENE-01' or 'SCENE-OPT-1' for optional scenes."),
        ),
        required("title", string()),
        required(
            "locationId",
            described(
                "The ID of the Location where this scene takes place. This is a mandatory link. \
                 Every scene MUST have a locationId.",
            ),
        ),
        required(
            "setup",
            described(
                "Immersive setup. For scenes after the first it MUST explain how the characters \
                 arrived, referencing the clue from the previous scene, and establish the \
                 immediate situation and objective.",
            ),
        ),
        required("obstacles", list(string())),
        required(
            "mechanics",
            list(described("e.g., 'Tech (Ego + Intellect) to bypass console'")),
        ),
        required(
            "milestones",
            list(described(
                "A concrete objective. If it provides a clue to another scene it MUST say so, \
                 e.g. '... (leads to SCENE-02)'.",
            )),
        ),
        required(
            "encounters",
            described_list(
                encounter_schema(),
                "Pre-defined combat, social or environmental encounters within this scene.",
            ),
        ),
        required("associatedNpcs", list(described("ID of an NPC in this scene."))),
        required(
            "associatedThreads",
            list(described("ID of a Thread in this scene.")),
        ),
        optional("enemyProfile", string()),
        required(
            "branching",
            described_list(
                object(vec![
                    required(
                        "milestone",
                        described("The EXACT milestone text that triggers the branch."),
                    ),
                    required("nextSceneId", described("The ID of the scene to branch to.")),
                ]),
                "Links from a milestone to the next Scene ID.",
            ),
        ),
    ])
}

fn location_schema() -> SchemaNode {
    object(vec![
        required(
            "id",
            described("Unique ID, e.g., 'LOC-01' or 'LOC-OPT-1' for optional locations."),
        ),
        required("name", string()),
        required(
            "description",
            described(
                "Functional and atmospheric description with key features, points of \
                 interaction and visible exits.",
            ),
        ),
        required(
            "tone",
            described("Atmosphere, e.g., 'Desperate, primal, and decaying'"),
        ),
        required("associatedNpcs", list(string())),
        required("associatedThreads", list(string())),
        required("secrets", list(string())),
        required(
            "links",
            described_list(
                object(vec![
                    required(
                        "description",
                        described("Informative exit description, e.g., 'Rusted door North'"),
                    ),
                    required(
                        "locationId",
                        described("The ID of the location this exit leads to."),
                    ),
                ]),
                "Exits to other locations.",
            ),
        ),
        optional(
            "sublocations",
            list(object(vec![
                required("name", string()),
                required("description", string()),
                required("significance", string()),
            ])),
        ),
    ])
}

/// The World State response schema
pub fn world_state_schema() -> SchemaNode {
    object(vec![
        required("threads", list(thread_schema())),
        required("npcs", list(npc_schema())),
        required("adventureFeatures", list(feature_schema())),
        required("scenes", list(scene_schema())),
        required("locations", list(location_schema())),
    ])
}
