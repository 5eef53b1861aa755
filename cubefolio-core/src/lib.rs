/// Cubefolio Core - navigation and motion for a cube-shaped menu
///
/// Each cube face hosts one menu screen. Clicking a button snaps the cube
/// to the face of the button's target screen with an eased rotation. This
/// crate holds the navigation graph, the snap state machine and the scene
/// glue; drawing and input delivery belong to a frontend.

pub mod breathing;
pub mod error;
pub mod gate;
pub mod geometry;
pub mod menu;
pub mod navigation;
pub mod projection;
pub mod scene;
pub mod snap;
pub mod transform;

// Re-export commonly used types
pub use error::{MenuError, Result};
pub use geometry::{Mesh, Triangle, Vertex};
pub use navigation::{Button, NavigationGraph, Screen, Slot};
pub use projection::Camera;
pub use scene::{ButtonNode, CubeScene, NavigateOutcome, SceneConfig, SceneFrame};
pub use snap::{SnapConfig, SnapController, SnapStatus};
pub use transform::{ButtonLayout, CubeObject, Face, Transform};
