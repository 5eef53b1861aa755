/// Scene composition and input dispatch
///
/// [`CubeScene`] owns the current screen id and everything that moves the
/// cube. A frontend drives it with two kinds of calls on one thread:
/// navigation requests from clicks ([`CubeScene::on_navigate`],
/// [`CubeScene::click_slot`]) and one [`CubeScene::frame`] per rendered
/// frame, after that frame's input. [`CubeScene::compose`] then describes
/// what to draw.

use nalgebra::{Matrix4, Vector3};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::breathing::{Breathing, BreathingConfig};
use crate::error::{MenuError, Result};
use crate::gate::{GateState, NavigationGate};
use crate::navigation::{NavigationGraph, Screen, Slot};
use crate::snap::{SnapConfig, SnapController, SnapStatus};
use crate::transform::{ButtonLayout, CubeObject, Face};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub start_screen: String,
    pub snap: SnapConfig,
    pub breathing: BreathingConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            start_screen: "home".to_string(),
            snap: SnapConfig::default(),
            breathing: BreathingConfig::default(),
        }
    }
}

/// Result of a navigation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigateOutcome {
    Accepted,
    /// A snap or its lockout is still running
    Locked,
    /// The id does not name a screen; the request is dropped
    UnknownScreen,
    /// Already showing that screen
    AlreadyThere,
    /// No button in the clicked slot
    NoButton,
    /// The scene was torn down
    Closed,
}

/// One button to draw and hit-test
#[derive(Debug, Clone, PartialEq)]
pub struct ButtonNode {
    pub label: String,
    pub next_screen_id: String,
    pub slot: Slot,
    pub local_position: Vector3<f32>,
    pub local_rotation: Vector3<f32>,
    /// Cube model matrix times the button's local matrix
    pub world_transform: Matrix4<f32>,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct SceneFrame {
    pub screen_id: String,
    pub face: Face,
    pub title: Option<String>,
    pub description: Option<String>,
    pub cube: CubeObject,
    pub buttons: Vec<ButtonNode>,
    /// False while a snap is running; buttons should ignore clicks
    pub clickable: bool,
}

pub struct CubeScene {
    graph: NavigationGraph,
    layout: ButtonLayout,
    config: SceneConfig,
    current_screen_id: String,
    /// Screen the controller was last asked to snap to
    snapped_screen_id: String,
    snap: SnapController,
    breathing: Breathing,
    gate: NavigationGate,
    clock_origin_ms: Option<f64>,
}

impl CubeScene {
    /// Validate the graph and layout and start on `config.start_screen`
    pub fn new(graph: NavigationGraph, config: SceneConfig) -> Result<Self> {
        graph.validate()?;
        let layout = ButtonLayout::standard();
        layout.validate()?;

        if graph.lookup(&config.start_screen).is_none() {
            return Err(MenuError::UnknownScreen(config.start_screen));
        }

        Ok(Self {
            layout,
            current_screen_id: config.start_screen.clone(),
            snapped_screen_id: config.start_screen.clone(),
            snap: SnapController::new(config.snap),
            breathing: Breathing::new(config.breathing),
            gate: NavigationGate::from_config(&config.snap),
            clock_origin_ms: None,
            graph,
            config,
        })
    }

    pub fn graph(&self) -> &NavigationGraph {
        &self.graph
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn snap(&self) -> &SnapController {
        &self.snap
    }

    pub fn gate(&self) -> &NavigationGate {
        &self.gate
    }

    pub fn current_screen_id(&self) -> &str {
        &self.current_screen_id
    }

    pub fn current_screen(&self) -> &Screen {
        self.graph
            .lookup(&self.current_screen_id)
            .unwrap_or_else(|| unreachable!("current screen id always resolves"))
    }

    pub fn cube(&self) -> Option<&CubeObject> {
        self.snap.object()
    }

    pub fn is_animating(&self) -> bool {
        self.snap.is_animating()
    }

    /// Register a callback fired once per finished snap
    pub fn on_snap_complete(&mut self, callback: impl FnMut(Face) + 'static) {
        self.snap.set_on_complete(callback);
    }

    /// Create the cube, facing the current screen. Called by the frontend
    /// once its object exists; until then snaps and breathing are no-ops.
    pub fn bind_cube(&mut self) {
        let face = self.current_screen().face();
        self.snap.bind(CubeObject::facing(face));
        debug!(?face, "cube bound");
    }

    /// Handle a click on a button leading to `next_screen_id`.
    ///
    /// Unknown ids are dropped without touching the gate or the current
    /// screen.
    pub fn on_navigate(&mut self, next_screen_id: &str, now_ms: f64) -> NavigateOutcome {
        self.gate.poll(now_ms);
        if self.gate.state() == GateState::Closed {
            return NavigateOutcome::Closed;
        }
        if self.gate.is_locked() || self.snap.is_animating() {
            debug!(next_screen_id, "navigation rejected while animating");
            return NavigateOutcome::Locked;
        }
        if self.graph.lookup(next_screen_id).is_none() {
            warn!(next_screen_id, "navigation to unknown screen dropped");
            return NavigateOutcome::UnknownScreen;
        }
        if next_screen_id == self.current_screen_id {
            return NavigateOutcome::AlreadyThere;
        }
        if !self.gate.try_acquire(now_ms) {
            return NavigateOutcome::Locked;
        }

        info!(from = %self.current_screen_id, to = next_screen_id, "navigating");
        self.current_screen_id = next_screen_id.to_string();
        self.sync_snap(now_ms);
        NavigateOutcome::Accepted
    }

    /// Route a click on the current screen's `slot` button
    pub fn click_slot(&mut self, slot: Slot, now_ms: f64) -> NavigateOutcome {
        let Some(target) = self
            .current_screen()
            .button_at(slot)
            .map(|button| button.next_screen_id.clone())
        else {
            return NavigateOutcome::NoButton;
        };
        self.on_navigate(&target, now_ms)
    }

    /// React to a screen change with exactly one snap
    fn sync_snap(&mut self, now_ms: f64) {
        if self.snapped_screen_id == self.current_screen_id {
            return;
        }
        let face = self.current_screen().face();
        self.snap.snap_to_face(face, now_ms);
        self.snapped_screen_id = self.current_screen_id.clone();
    }

    /// Per-frame update: fire a due gate release, then either advance the
    /// snap or breathe, never both.
    pub fn frame(&mut self, now_ms: f64) -> SnapStatus {
        self.gate.poll(now_ms);
        let origin = *self.clock_origin_ms.get_or_insert(now_ms);

        if self.snap.is_animating() {
            return self.snap.update_rotation(now_ms);
        }

        let rest = self.snap.rest_rotation();
        let elapsed_secs = (now_ms - origin) / 1000.0;
        if let Some(cube) = self.snap.object_mut() {
            self.breathing.apply(cube, &rest, elapsed_secs);
        }
        SnapStatus::Idle
    }

    /// Describe the current frame, or `None` before the cube is bound
    pub fn compose(&self) -> Option<SceneFrame> {
        let cube = *self.snap.object()?;
        let screen = self.current_screen();
        let model = cube.model_matrix();

        let buttons = screen
            .buttons
            .iter()
            .map(|button| {
                let placement = self.layout.placement(screen.face(), button.slot);
                ButtonNode {
                    label: button.label.clone(),
                    next_screen_id: button.next_screen_id.clone(),
                    slot: button.slot,
                    local_position: placement.position,
                    local_rotation: placement.rotation,
                    world_transform: model * placement.local_matrix(),
                }
            })
            .collect();

        Some(SceneFrame {
            screen_id: screen.id.clone(),
            face: screen.face(),
            title: screen.title.clone(),
            description: screen.description.clone(),
            cube,
            buttons,
            clickable: !self.snap.is_animating() && !self.gate.is_locked(),
        })
    }

    /// Cancel the pending lockout release and drop the cube
    pub fn teardown(&mut self) {
        self.gate.close();
        self.snap.unbind();
        debug!("scene torn down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene() -> CubeScene {
        let mut scene = CubeScene::new(NavigationGraph::portfolio(), SceneConfig::default()).unwrap();
        scene.bind_cube();
        scene
    }

    #[test]
    fn test_unknown_start_screen_rejected() {
        let config = SceneConfig {
            start_screen: "blog".to_string(),
            ..SceneConfig::default()
        };
        assert!(matches!(
            CubeScene::new(NavigationGraph::portfolio(), config),
            Err(MenuError::UnknownScreen(id)) if id == "blog"
        ));
    }

    #[test]
    fn test_unbound_scene_composes_nothing() {
        let scene = CubeScene::new(NavigationGraph::portfolio(), SceneConfig::default()).unwrap();
        assert!(scene.compose().is_none());
    }

    #[test]
    fn test_navigation_before_bind_changes_screen_without_snapping() {
        let mut scene = CubeScene::new(NavigationGraph::portfolio(), SceneConfig::default()).unwrap();
        assert_eq!(scene.on_navigate("about", 0.0), NavigateOutcome::Accepted);
        assert!(!scene.is_animating());

        scene.bind_cube();
        assert_eq!(scene.cube().unwrap().rotation, Face::Left.rotation());
    }

    #[test]
    fn test_unknown_target_is_dropped() {
        let mut scene = scene();
        assert_eq!(scene.on_navigate("blog", 0.0), NavigateOutcome::UnknownScreen);
        assert_eq!(scene.current_screen_id(), "home");
        assert!(!scene.gate().is_locked());
    }

    #[test]
    fn test_already_there() {
        let mut scene = scene();
        assert_eq!(scene.on_navigate("home", 0.0), NavigateOutcome::AlreadyThere);
        assert!(!scene.is_animating());
    }

    #[test]
    fn test_click_empty_slot() {
        let mut scene = scene();
        assert_eq!(scene.click_slot(Slot::Top, 0.0), NavigateOutcome::NoButton);
    }

    #[test]
    fn test_compose_lists_current_buttons() {
        let scene = scene();
        let frame = scene.compose().unwrap();

        assert_eq!(frame.screen_id, "home");
        assert_eq!(frame.title.as_deref(), Some("Welcome"));
        assert!(frame.clickable);
        let labels: Vec<_> = frame.buttons.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, ["Projects", "Contact", "About"]);
    }

    #[test]
    fn test_buttons_face_the_viewer_after_snap() {
        let mut scene = scene();
        scene.click_slot(Slot::Right, 0.0);
        scene.frame(0.0);
        scene.frame(500.0);
        scene.frame(525.0);

        let frame = scene.compose().unwrap();
        assert_eq!(frame.face, Face::Right);
        for button in &frame.buttons {
            let anchor = button.world_transform.transform_point(&nalgebra::Point3::origin());
            assert!((anchor.z - crate::transform::SURFACE_OFFSET).abs() < 1e-5);
        }
    }

    #[test]
    fn test_not_clickable_while_animating() {
        let mut scene = scene();
        scene.on_navigate("projects", 0.0);
        scene.frame(100.0);
        assert!(!scene.compose().unwrap().clickable);
    }

    #[test]
    fn test_teardown_closes_navigation() {
        let mut scene = scene();
        scene.on_navigate("projects", 0.0);
        scene.teardown();

        assert!(!scene.gate().timer().is_pending());
        assert!(scene.cube().is_none());
        assert_eq!(scene.on_navigate("home", 5_000.0), NavigateOutcome::Closed);
        assert_eq!(scene.frame(5_000.0), SnapStatus::Idle);
    }
}
