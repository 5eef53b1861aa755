/// Navigation graph: screens, their cube faces and the buttons linking them
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use crate::error::{MenuError, Result};
use crate::transform::Face;

/// One of the four fixed attachment points on a face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slot {
    Top,
    Right,
    Bottom,
    Left,
}

impl Slot {
    pub const ALL: [Slot; 4] = [Slot::Top, Slot::Right, Slot::Bottom, Slot::Left];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Slot::Top => "top",
            Slot::Right => "right",
            Slot::Bottom => "bottom",
            Slot::Left => "left",
        }
    }
}

impl FromStr for Slot {
    type Err = MenuError;

    fn from_str(s: &str) -> Result<Self> {
        Slot::ALL
            .into_iter()
            .find(|slot| slot.keyword().eq_ignore_ascii_case(s))
            .ok_or_else(|| MenuError::Parse(format!("unknown slot '{}'", s)))
    }
}

/// A labelled link from one screen to another
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Button {
    pub label: String,
    pub next_screen_id: String,
    pub slot: Slot,
}

impl Button {
    pub fn new(label: impl Into<String>, next_screen_id: impl Into<String>, slot: Slot) -> Self {
        Self {
            label: label.into(),
            next_screen_id: next_screen_id.into(),
            slot,
        }
    }
}

/// A menu screen hosted on one cube face
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Screen {
    /// Filled from the table key when a JSON screen omits it
    #[serde(default, skip_serializing)]
    pub id: String,
    pub face_index: Face,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub buttons: Vec<Button>,
}

impl Screen {
    pub fn new(id: impl Into<String>, face: Face) -> Self {
        Self {
            id: id.into(),
            face_index: face,
            title: None,
            description: None,
            buttons: Vec::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_button(mut self, label: &str, next_screen_id: &str, slot: Slot) -> Self {
        self.buttons.push(Button::new(label, next_screen_id, slot));
        self
    }

    pub fn face(&self) -> Face {
        self.face_index
    }

    /// The button occupying `slot`, if any
    pub fn button_at(&self, slot: Slot) -> Option<&Button> {
        self.buttons.iter().find(|button| button.slot == slot)
    }
}

/// Whether `id` can be written bare in a text menu
pub fn is_identifier(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Immutable table of screens keyed by id
///
/// Serialises as a JSON object keyed by screen id, with the id itself left
/// out of each value. Keys are kept sorted so a graph writes out the same
/// way every time.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct NavigationGraph {
    screens: BTreeMap<String, Screen>,
}

impl NavigationGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a screen under its own id, returning any screen it replaced
    pub fn insert(&mut self, screen: Screen) -> Option<Screen> {
        self.screens.insert(screen.id.clone(), screen)
    }

    /// Look up a screen. Unknown ids are an expected outcome, not an error.
    pub fn lookup(&self, screen_id: &str) -> Option<&Screen> {
        self.screens.get(screen_id)
    }

    pub fn contains(&self, screen_id: &str) -> bool {
        self.screens.contains_key(screen_id)
    }

    pub fn screens(&self) -> impl Iterator<Item = &Screen> {
        self.screens.values()
    }

    pub fn len(&self) -> usize {
        self.screens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.screens.is_empty()
    }

    /// Startup validation pass.
    ///
    /// Rejects empty graphs, ids outside `[A-Za-z0-9_-]`, screens filed
    /// under a key other than their id, two buttons sharing a slot, and
    /// buttons pointing at unknown screens.
    pub fn validate(&self) -> Result<()> {
        if self.screens.is_empty() {
            return Err(MenuError::EmptyGraph);
        }

        for (key, screen) in &self.screens {
            if !is_identifier(key) {
                return Err(MenuError::InvalidId(key.clone()));
            }
            if key != &screen.id {
                return Err(MenuError::IdMismatch {
                    key: key.clone(),
                    id: screen.id.clone(),
                });
            }

            let mut used = HashSet::new();
            for button in &screen.buttons {
                if !used.insert(button.slot) {
                    return Err(MenuError::DuplicateSlot {
                        screen: screen.id.clone(),
                        slot: button.slot,
                    });
                }

                if !self.contains(&button.next_screen_id) {
                    return Err(MenuError::DanglingTarget {
                        screen: screen.id.clone(),
                        label: button.label.clone(),
                        target: button.next_screen_id.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The built-in portfolio menu
    pub fn portfolio() -> Self {
        let mut graph = Self::new();

        graph.insert(
            Screen::new("home", Face::Front)
                .with_title("Welcome")
                .with_description("Max's Portfolio")
                .with_button("Projects", "projects", Slot::Right)
                .with_button("Contact", "contact", Slot::Bottom)
                .with_button("About", "about", Slot::Left),
        );
        graph.insert(
            Screen::new("projects", Face::Right)
                .with_title("My Projects")
                .with_button("Web Apps", "web-apps", Slot::Top)
                .with_button("Back", "home", Slot::Left),
        );
        graph.insert(
            Screen::new("web-apps", Face::Top)
                .with_title("Web Applications")
                .with_button("Back", "projects", Slot::Bottom),
        );
        graph.insert(
            Screen::new("about", Face::Left)
                .with_title("About Me")
                .with_description("Full-stack web developer passionate about creating engaging UIs")
                .with_button("Back", "home", Slot::Right),
        );
        graph.insert(
            Screen::new("contact", Face::Bottom)
                .with_title("Get In Touch")
                .with_description("Email: hello@maxca.dev | GitHub | LinkedIn")
                .with_button("Back", "home", Slot::Top),
        );

        graph
    }
}

impl<'de> Deserialize<'de> for NavigationGraph {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(GraphVisitor)
    }
}

/// Reads the id-keyed screen table, refusing repeated keys
struct GraphVisitor;

impl<'de> Visitor<'de> for GraphVisitor {
    type Value = NavigationGraph;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of screen ids to screens")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Self::Value, A::Error> {
        let mut screens = BTreeMap::new();

        while let Some((key, mut screen)) = map.next_entry::<String, Screen>()? {
            if screens.contains_key(&key) {
                return Err(de::Error::custom(format_args!(
                    "screen '{}' is defined more than once",
                    key
                )));
            }
            if screen.id.is_empty() {
                screen.id = key.clone();
            }
            screens.insert(key, screen);
        }

        Ok(NavigationGraph { screens })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_portfolio_is_valid() {
        let graph = NavigationGraph::portfolio();
        assert!(graph.validate().is_ok());
        assert_eq!(graph.len(), 5);
    }

    #[test]
    fn test_every_target_resolves() {
        let graph = NavigationGraph::portfolio();
        for screen in graph.screens() {
            assert!(screen.face().index() <= 5);
            for button in &screen.buttons {
                assert!(graph.lookup(&button.next_screen_id).is_some());
            }
        }
    }

    #[test]
    fn test_unknown_lookup_is_none() {
        let graph = NavigationGraph::portfolio();
        assert!(graph.lookup("blog").is_none());
        assert!(graph.lookup("").is_none());
    }

    #[test]
    fn test_dangling_target_rejected() {
        let mut graph = NavigationGraph::new();
        graph.insert(Screen::new("home", Face::Front).with_button("Blog", "blog", Slot::Top));

        match graph.validate() {
            Err(MenuError::DanglingTarget { screen, target, .. }) => {
                assert_eq!(screen, "home");
                assert_eq!(target, "blog");
            }
            other => panic!("expected dangling target, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_slot_rejected() {
        let mut graph = NavigationGraph::new();
        graph.insert(
            Screen::new("home", Face::Front)
                .with_button("A", "home", Slot::Left)
                .with_button("B", "home", Slot::Left),
        );
        assert!(matches!(
            graph.validate(),
            Err(MenuError::DuplicateSlot { slot: Slot::Left, .. })
        ));
    }

    #[test]
    fn test_empty_graph_rejected() {
        assert!(matches!(
            NavigationGraph::new().validate(),
            Err(MenuError::EmptyGraph)
        ));
    }

    #[test]
    fn test_json_shape() {
        let json = r#"{
            "home": {
                "id": "home",
                "faceIndex": 0,
                "buttons": [
                    { "label": "Projects", "nextScreenId": "projects", "slot": "Right" }
                ]
            },
            "projects": { "id": "projects", "faceIndex": 3, "buttons": [] }
        }"#;

        let graph = NavigationGraph::from_json(json).unwrap();
        let home = graph.lookup("home").unwrap();
        assert_eq!(home.face(), Face::Front);
        assert_eq!(home.buttons[0].slot, Slot::Right);
        assert_eq!(graph.lookup("projects").unwrap().face(), Face::Right);

        let reparsed = NavigationGraph::from_json(&graph.to_json().unwrap()).unwrap();
        assert_eq!(reparsed, graph);
    }

    #[test]
    fn test_json_without_ids_takes_keys() {
        let json = r#"{ "home": { "faceIndex": 0, "buttons": [
            { "label": "P", "nextScreenId": "home", "slot": "Right" } ] } }"#;

        let graph = NavigationGraph::from_json(json).unwrap();
        assert_eq!(graph.lookup("home").unwrap().id, "home");
        assert!(graph.validate().is_ok());

        let written = graph.to_json().unwrap();
        assert!(!written.contains("\"id\""), "{}", written);
        assert_eq!(NavigationGraph::from_json(&written).unwrap(), graph);
    }

    #[test]
    fn test_json_id_differing_from_key_rejected() {
        let json = r#"{ "home": { "id": "start", "faceIndex": 0, "buttons": [] } }"#;
        let graph = NavigationGraph::from_json(json).unwrap();
        assert!(matches!(
            graph.validate(),
            Err(MenuError::IdMismatch { key, id }) if key == "home" && id == "start"
        ));
    }

    #[test]
    fn test_json_repeated_screen_key_rejected() {
        let json = r#"{ "home": { "faceIndex": 0 }, "home": { "faceIndex": 1 } }"#;
        match NavigationGraph::from_json(json) {
            Err(MenuError::Json(e)) => assert!(e.to_string().contains("'home'"), "{}", e),
            other => panic!("expected duplicate screen error, got {:?}", other),
        }
    }

    #[test]
    fn test_id_with_space_rejected() {
        let json = r#"{ "web apps": { "faceIndex": 4, "buttons": [] } }"#;
        let graph = NavigationGraph::from_json(json).unwrap();
        assert!(matches!(
            graph.validate(),
            Err(MenuError::InvalidId(id)) if id == "web apps"
        ));
    }

    #[test]
    fn test_json_face_out_of_range() {
        let json = r#"{ "home": { "id": "home", "faceIndex": 9, "buttons": [] } }"#;
        assert!(matches!(
            NavigationGraph::from_json(json),
            Err(MenuError::Json(_))
        ));
    }

    #[test]
    fn test_dangling_target_is_not_a_parse_error() {
        let json = r#"{ "home": { "id": "home", "faceIndex": 0,
            "buttons": [ { "label": "Blog", "nextScreenId": "blog", "slot": "Top" } ] } }"#;
        let graph = NavigationGraph::from_json(json).unwrap();
        assert!(graph.validate().is_err());
    }

    #[test]
    fn test_slot_from_str() {
        assert_eq!("Bottom".parse::<Slot>().unwrap(), Slot::Bottom);
        assert_eq!("left".parse::<Slot>().unwrap(), Slot::Left);
        assert!("middle".parse::<Slot>().is_err());
    }
}
