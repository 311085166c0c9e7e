//! Line-oriented navigation commands over a presenter

use std::path::PathBuf;

use super::{DetailView, Presenter, Selection};
use crate::export;
use crate::world::{EntityKind, WorldState};

pub const HELP: &str = "\
Commands:
  <n>               - Follow link [n] of the current view
  open <ID> / o     - Show the entity with that id
  list [kind] / l   - List scenes, locations, npcs, threads, features
  back / b          - Return to the previous view
  show / s          - Redisplay the current view
  export [path]     - Write the World State as JSON (default world-state.json)
  help / h          - Show this help
  quit / q          - Exit";

/// A parsed browser command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowserCommand {
    /// One-based link number as shown in the view
    Follow(usize),
    Open(String),
    List(Option<EntityKind>),
    Back,
    Show,
    Export(PathBuf),
    Help,
    Quit,
}

impl BrowserCommand {
    pub fn parse(input: &str) -> Result<Self, String> {
        let input = input.trim();
        let (word, rest) = match input.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (input, ""),
        };

        if let Ok(n) = word.parse::<usize>() {
            return if n == 0 || !rest.is_empty() {
                Err(format!("No such link: {}", input))
            } else {
                Ok(BrowserCommand::Follow(n))
            };
        }

        match word.to_ascii_lowercase().as_str() {
            "open" | "o" if !rest.is_empty() => Ok(BrowserCommand::Open(rest.to_string())),
            "open" | "o" => Err("Usage: open <ID>".into()),
            "list" | "l" if rest.is_empty() => Ok(BrowserCommand::List(None)),
            "list" | "l" => parse_kind(rest)
                .map(|kind| BrowserCommand::List(Some(kind)))
                .ok_or_else(|| format!("Unknown collection: {}", rest)),
            "back" | "b" => Ok(BrowserCommand::Back),
            "show" | "s" => Ok(BrowserCommand::Show),
            "export" if rest.is_empty() => Ok(BrowserCommand::Export(PathBuf::from(
                export::DEFAULT_EXPORT_FILE,
            ))),
            "export" => Ok(BrowserCommand::Export(PathBuf::from(rest))),
            "help" | "h" | "?" => Ok(BrowserCommand::Help),
            "quit" | "q" | "exit" => Ok(BrowserCommand::Quit),
            _ => Err(format!("Unknown command: {} (try 'help')", input)),
        }
    }
}

fn parse_kind(name: &str) -> Option<EntityKind> {
    match name.to_ascii_lowercase().as_str() {
        "scene" | "scenes" => Some(EntityKind::Scene),
        "location" | "locations" | "loc" => Some(EntityKind::Location),
        "npc" | "npcs" => Some(EntityKind::Npc),
        "thread" | "threads" => Some(EntityKind::Thread),
        "feature" | "features" | "af" => Some(EntityKind::Feature),
        _ => None,
    }
}

/// Result of executing one command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowserOutcome {
    /// Text to print
    Output(String),
    Quit,
}

/// Presenter plus a back-stack of earlier selections
pub struct Browser<'a> {
    presenter: Presenter<'a>,
    history: Vec<Selection>,
}

impl<'a> Browser<'a> {
    pub fn new(world: &'a WorldState) -> Self {
        Self {
            presenter: Presenter::new(world),
            history: Vec::new(),
        }
    }

    pub fn presenter(&self) -> &Presenter<'a> {
        &self.presenter
    }

    pub fn current_view(&self) -> DetailView {
        self.presenter.detail()
    }

    /// Parse and execute one input line
    pub fn execute_line(&mut self, line: &str) -> BrowserOutcome {
        match BrowserCommand::parse(line) {
            Ok(command) => self.execute(command),
            Err(message) => BrowserOutcome::Output(message),
        }
    }

    pub fn execute(&mut self, command: BrowserCommand) -> BrowserOutcome {
        let output = match command {
            BrowserCommand::Follow(n) => {
                let previous = self.presenter.selection().cloned();
                let moved = n
                    .checked_sub(1)
                    .and_then(|index| self.presenter.navigate(index))
                    .is_some();
                if moved {
                    self.history.extend(previous);
                    self.current_view().to_string()
                } else {
                    format!("No such link: {}", n)
                }
            }
            BrowserCommand::Open(id) => match self.presenter.resolve_id(&id) {
                Some(selection) => {
                    self.go_to(selection);
                    self.current_view().to_string()
                }
                None => format!("Unrecognised id: {}", id),
            },
            BrowserCommand::List(kind) => self.list(kind),
            BrowserCommand::Back => match self.history.pop() {
                Some(selection) => {
                    self.presenter.select(selection);
                    self.current_view().to_string()
                }
                None => "Nothing to go back to.".to_string(),
            },
            BrowserCommand::Show => self.current_view().to_string(),
            BrowserCommand::Export(path) => {
                match export::write_world_state(&path, self.presenter.world()) {
                    Ok(()) => format!("Wrote {}", path.display()),
                    Err(e) => format!("Export failed: {}", e),
                }
            }
            BrowserCommand::Help => HELP.to_string(),
            BrowserCommand::Quit => return BrowserOutcome::Quit,
        };
        BrowserOutcome::Output(output)
    }

    fn go_to(&mut self, selection: Selection) {
        if let Some(previous) = self.presenter.selection().cloned() {
            if previous != selection {
                self.history.push(previous);
            }
        }
        self.presenter.select(selection);
    }

    fn list(&self, kind: Option<EntityKind>) -> String {
        let mut out = String::new();
        for group in self.presenter.sidebar() {
            if kind.is_some_and(|k| k != group.kind) {
                continue;
            }
            out.push_str(&format!("{} ({})\n", group.title, group.entries.len()));
            for entry in &group.entries {
                out.push_str(&format!("  {:<16} {}\n", entry.selection.id(), entry.label));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{Branch, Npc, Scene};

    fn world() -> WorldState {
        WorldState {
            scenes: vec![
                Scene {
                    id: "SCENE-1".into(),
                    title: "Arrival".into(),
                    location_id: "LOC-1".into(),
                    milestones: vec!["Pass the gate".into()],
                    branching: vec![Branch {
                        milestone: "Pass the gate".into(),
                        next_scene_id: "SCENE-2".into(),
                    }],
                    ..Scene::default()
                },
                Scene {
                    id: "SCENE-2".into(),
                    title: "The Market".into(),
                    location_id: "LOC-1".into(),
                    ..Scene::default()
                },
            ],
            npcs: vec![Npc {
                id: "NPC-1".into(),
                name: "Ada".into(),
                ..Npc::default()
            }],
            ..WorldState::default()
        }
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(BrowserCommand::parse("2"), Ok(BrowserCommand::Follow(2)));
        assert_eq!(
            BrowserCommand::parse("open NPC-1"),
            Ok(BrowserCommand::Open("NPC-1".into()))
        );
        assert_eq!(
            BrowserCommand::parse("l npcs"),
            Ok(BrowserCommand::List(Some(EntityKind::Npc)))
        );
        assert_eq!(BrowserCommand::parse("Q"), Ok(BrowserCommand::Quit));
        assert!(BrowserCommand::parse("0").is_err());
        assert!(BrowserCommand::parse("open").is_err());
        assert!(BrowserCommand::parse("list dragons").is_err());
        assert!(BrowserCommand::parse("dance").is_err());
    }

    #[test]
    fn test_follow_and_back() {
        let world = world();
        let mut browser = Browser::new(&world);

        // Link 1 is the location, link 2 the milestone exit
        browser.execute(BrowserCommand::Follow(2));
        assert_eq!(
            browser.presenter().selection(),
            Some(&Selection::Scene("SCENE-2".into()))
        );

        browser.execute(BrowserCommand::Back);
        assert_eq!(
            browser.presenter().selection(),
            Some(&Selection::Scene("SCENE-1".into()))
        );
        assert_eq!(
            browser.execute(BrowserCommand::Back),
            BrowserOutcome::Output("Nothing to go back to.".into())
        );
    }

    #[test]
    fn test_follow_zero_is_no_such_link() {
        let world = world();
        let mut browser = Browser::new(&world);
        assert_eq!(
            browser.execute(BrowserCommand::Follow(0)),
            BrowserOutcome::Output("No such link: 0".into())
        );
        assert_eq!(
            browser.presenter().selection(),
            Some(&Selection::Scene("SCENE-1".into()))
        );
        assert_eq!(
            browser.execute(BrowserCommand::Back),
            BrowserOutcome::Output("Nothing to go back to.".into())
        );
    }

    #[test]
    fn test_open_unknown_id_reports_not_found() {
        let world = world();
        let mut browser = Browser::new(&world);
        match browser.execute_line("open NPC-7") {
            BrowserOutcome::Output(text) => assert_eq!(text, "NPC not found: NPC-7\n"),
            BrowserOutcome::Quit => panic!("unexpected quit"),
        }
    }

    #[test]
    fn test_list_filters_by_kind() {
        let world = world();
        let browser = Browser::new(&world);
        let text = browser.list(Some(EntityKind::Npc));
        assert!(text.starts_with("NPCs (1)"));
        assert!(text.contains("Ada"));
        assert!(!text.contains("Scenes"));
    }

    #[test]
    fn test_quit() {
        let world = world();
        let mut browser = Browser::new(&world);
        assert_eq!(browser.execute_line("quit"), BrowserOutcome::Quit);
    }
}
