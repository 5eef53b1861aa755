/// Cubefolio Web - WASM bindings for the cube menu
///
/// Exposes the scene to a JavaScript renderer. The host draws the cube and
/// labels from the transforms returned here and forwards clicks and frame
/// timestamps back in.
use cubefolio_core::{CubeScene, MenuError, NavigateOutcome, NavigationGraph, SceneConfig, Slot};
use wasm_bindgen::prelude::*;

fn to_js(err: MenuError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Milliseconds from `performance.now()`, or zero outside a browser window
fn performance_now() -> f64 {
    web_sys::window()
        .and_then(|window| window.performance())
        .map(|performance| performance.now())
        .unwrap_or(0.0)
}

#[wasm_bindgen]
pub struct WebCubeMenu {
    scene: CubeScene,
}

#[wasm_bindgen]
impl WebCubeMenu {
    /// Build a menu from a JSON graph, or the portfolio menu when `menu_json`
    /// is omitted
    #[wasm_bindgen(constructor)]
    pub fn new(menu_json: Option<String>) -> Result<WebCubeMenu, JsValue> {
        let graph = match menu_json {
            Some(json) => NavigationGraph::from_json(&json).map_err(to_js)?,
            None => NavigationGraph::portfolio(),
        };
        let scene = CubeScene::new(graph, SceneConfig::default()).map_err(to_js)?;
        Ok(WebCubeMenu { scene })
    }

    /// Call once the host has created its cube object
    pub fn bind(&mut self) {
        self.scene.bind_cube();
    }

    /// Returns true when the navigation was accepted
    pub fn navigate(&mut self, next_screen_id: &str, now_ms: f64) -> bool {
        self.scene.on_navigate(next_screen_id, now_ms) == NavigateOutcome::Accepted
    }

    #[wasm_bindgen(js_name = navigateNow)]
    pub fn navigate_now(&mut self, next_screen_id: &str) -> bool {
        self.navigate(next_screen_id, performance_now())
    }

    /// Click the button in slot `slot` (0 top, 1 right, 2 bottom, 3 left)
    #[wasm_bindgen(js_name = clickSlot)]
    pub fn click_slot(&mut self, slot: u8, now_ms: f64) -> bool {
        let Some(slot) = Slot::ALL.get(slot as usize).copied() else {
            return false;
        };
        self.scene.click_slot(slot, now_ms) == NavigateOutcome::Accepted
    }

    /// Advance one frame. Returns true while the cube is snapping.
    pub fn frame(&mut self, now_ms: f64) -> bool {
        self.scene.frame(now_ms);
        self.scene.is_animating()
    }

    #[wasm_bindgen(js_name = frameNow)]
    pub fn frame_now(&mut self) -> bool {
        self.frame(performance_now())
    }

    /// Cube Euler rotation (XYZ order), empty before `bind`
    pub fn rotation(&self) -> Vec<f32> {
        self.scene
            .cube()
            .map(|cube| cube.rotation.as_slice().to_vec())
            .unwrap_or_default()
    }

    pub fn position(&self) -> Vec<f32> {
        self.scene
            .cube()
            .map(|cube| cube.position.as_slice().to_vec())
            .unwrap_or_default()
    }

    #[wasm_bindgen(js_name = isAnimating)]
    pub fn is_animating(&self) -> bool {
        self.scene.is_animating()
    }

    #[wasm_bindgen(js_name = currentScreen)]
    pub fn current_screen(&self) -> String {
        self.scene.current_screen_id().to_string()
    }

    pub fn title(&self) -> Option<String> {
        self.scene.current_screen().title.clone()
    }

    pub fn description(&self) -> Option<String> {
        self.scene.current_screen().description.clone()
    }

    #[wasm_bindgen(js_name = buttonCount)]
    pub fn button_count(&self) -> usize {
        self.scene.current_screen().buttons.len()
    }

    #[wasm_bindgen(js_name = buttonLabel)]
    pub fn button_label(&self, index: usize) -> Option<String> {
        self.scene
            .current_screen()
            .buttons
            .get(index)
            .map(|button| button.label.clone())
    }

    #[wasm_bindgen(js_name = buttonTarget)]
    pub fn button_target(&self, index: usize) -> Option<String> {
        self.scene
            .current_screen()
            .buttons
            .get(index)
            .map(|button| button.next_screen_id.clone())
    }

    /// Column-major world matrix of button `index`, empty before `bind`
    #[wasm_bindgen(js_name = buttonTransform)]
    pub fn button_transform(&self, index: usize) -> Vec<f32> {
        self.scene
            .compose()
            .and_then(|frame| frame.buttons.get(index).map(|b| b.world_transform))
            .map(|matrix| matrix.as_slice().to_vec())
            .unwrap_or_default()
    }

    /// Whether labels should currently accept clicks
    pub fn clickable(&self) -> bool {
        self.scene
            .compose()
            .map(|frame| frame.clickable)
            .unwrap_or(false)
    }

    pub fn teardown(&mut self) {
        self.scene.teardown();
    }
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_portfolio_menu_exposes_home_buttons() {
        let mut menu = WebCubeMenu::new(None).unwrap();
        assert!(menu.rotation().is_empty());

        menu.bind();
        assert_eq!(menu.current_screen(), "home");
        assert_eq!(menu.rotation(), vec![0.0, 0.0, 0.0]);
        assert_eq!(menu.button_count(), 3);
        assert_eq!(menu.button_transform(0).len(), 16);
        assert!(menu.button_label(3).is_none());
    }

    #[test]
    fn test_click_slot_navigates() {
        let mut menu = WebCubeMenu::new(None).unwrap();
        menu.bind();

        assert!(!menu.click_slot(9, 0.0));
        assert!(menu.click_slot(1, 0.0));
        assert_eq!(menu.current_screen(), "projects");
        assert!(menu.frame(16.0));
        assert!(!menu.clickable());
    }
}
