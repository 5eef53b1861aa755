/// ASCII rasterizer for the menu cube and its button labels
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use cubefolio_core::projection::ScreenPoint;
use cubefolio_core::{Camera, Face, Mesh, Slot, Triangle};
use nalgebra::Matrix4;
use std::io::Write;

/// Pointer-over colour for clickable labels
const HOVER_COLOR: Color = Color::Rgb {
    r: 255,
    g: 165,
    b: 0,
};

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Screen cells covered by a drawn button label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitRegion {
    pub slot: Slot,
    pub row: u16,
    pub col_start: u16,
    pub col_end: u16,
}

impl HitRegion {
    pub fn contains(&self, col: u16, row: u16) -> bool {
        row == self.row && col >= self.col_start && col <= self.col_end
    }
}

/// How a button label is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelStyle {
    /// A snap is running; clicks are ignored
    Disabled,
    Enabled,
    Hovered,
}

impl LabelStyle {
    fn color(self) -> Color {
        match self {
            LabelStyle::Disabled => Color::DarkYellow,
            LabelStyle::Enabled => Color::Yellow,
            LabelStyle::Hovered => HOVER_COLOR,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    character: char,
    color: Color,
}

const BLANK: Cell = Cell {
    character: ' ',
    color: Color::DarkGrey,
};

/// ASCII renderer that converts the cube mesh to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    cells: Vec<Cell>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            cells: vec![BLANK; size],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height);
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.cells.fill(BLANK);
    }

    /// Draw the cube, picking out `highlight` (the current screen's face)
    pub fn render_mesh(
        &mut self,
        mesh: &Mesh,
        model_matrix: &Matrix4<f32>,
        camera: &Camera,
        highlight: Face,
    ) {
        for triangle in &mesh.triangles {
            self.render_triangle(triangle, model_matrix, camera, highlight);
        }
    }

    fn render_triangle(
        &mut self,
        triangle: &Triangle,
        model_matrix: &Matrix4<f32>,
        camera: &Camera,
        highlight: Face,
    ) {
        let mut screen_coords = [ScreenPoint {
            x: 0.0,
            y: 0.0,
            depth: 0.0,
        }; 3];
        for (slot, vertex) in screen_coords.iter_mut().zip(&triangle.vertices) {
            match camera.project_to_screen(&vertex.position, model_matrix, self.width, self.height) {
                Some(point) => *slot = point,
                None => return, // Triangle is clipped
            }
        }

        // Shade by how squarely the rotated face looks at the camera
        let normal = model_matrix.transform_vector(&triangle.calculate_normal());
        let to_camera = (camera.position - camera.target).normalize();
        let brightness = normal.dot(&to_camera);
        if brightness <= 0.0 {
            return; // Facing away
        }

        let character = shade(brightness);
        let color = if triangle.face == highlight {
            Color::Cyan
        } else {
            Color::Grey
        };

        self.rasterize_triangle(&screen_coords, Cell { character, color });
    }

    fn rasterize_triangle(&mut self, coords: &[ScreenPoint; 3], cell: Cell) {
        let [v0, v1, v2] = *coords;

        // Bounding box
        let min_x = v0.x.min(v1.x).min(v2.x).floor() as i32;
        let max_x = v0.x.max(v1.x).max(v2.x).ceil() as i32;
        let min_y = v0.y.min(v1.y).min(v2.y).floor() as i32;
        let max_y = v0.y.max(v1.y).max(v2.y).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = (x as f32 + 0.5, y as f32 + 0.5);

                if let Some((w0, w1, w2)) =
                    barycentric((v0.x, v0.y), (v1.x, v1.y), (v2.x, v2.y), p)
                {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        let depth = w0 * v0.depth + w1 * v1.depth + w2 * v2.depth;

                        let idx = y as usize * self.width + x as usize;
                        if depth < self.depth_buffer[idx] {
                            self.depth_buffer[idx] = depth;
                            self.cells[idx] = cell;
                        }
                    }
                }
            }
        }
    }

    /// Overlay a label centred on `anchor`, returning the cells it covers.
    /// Labels are drawn over the cube regardless of depth.
    pub fn render_label(
        &mut self,
        text: &str,
        anchor: &ScreenPoint,
        slot: Slot,
        style: LabelStyle,
    ) -> Option<HitRegion> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        let row = anchor.y.floor() as i64;
        if row < 0 || row >= self.height as i64 {
            return None;
        }

        let label: Vec<char> = format!("[{}]", text).chars().collect();
        let len = label.len().min(self.width);
        let start = (anchor.x.round() as i64 - len as i64 / 2).clamp(0, (self.width - len) as i64);

        let color = style.color();
        let base = row as usize * self.width + start as usize;
        for (offset, character) in label.iter().take(len).enumerate() {
            self.cells[base + offset] = Cell {
                character: *character,
                color,
            };
        }

        Some(HitRegion {
            slot,
            row: row as u16,
            col_start: start as u16,
            col_end: (start as usize + len - 1) as u16,
        })
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let mut current = None;
        for y in 0..self.height {
            for x in 0..self.width {
                let cell = self.cells[y * self.width + x];
                if current != Some(cell.color) {
                    writer.queue(SetForegroundColor(cell.color))?;
                    current = Some(cell.color);
                }
                writer.queue(Print(cell.character))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }

    #[cfg(test)]
    fn char_at(&self, x: usize, y: usize) -> char {
        self.cells[y * self.width + x].character
    }

    #[cfg(test)]
    fn color_at(&self, x: usize, y: usize) -> Color {
        self.cells[y * self.width + x].color
    }
}

/// Map a brightness in (0, 1] onto the luminosity ramp, skipping the blank
fn shade(brightness: f32) -> char {
    let steps = LUMINOSITY_RAMP.len() - 1;
    let index = 1 + (brightness.clamp(0.0, 1.0) * (steps - 1) as f32).round() as usize;
    LUMINOSITY_RAMP[index.min(steps)]
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cubefolio_core::CubeObject;

    #[test]
    fn test_front_face_fills_centre() {
        let mut renderer = AsciiRenderer::new(80, 24);
        let camera = Camera::new(80.0 / (24.0 * 2.0));
        let model = CubeObject::facing(Face::Front).model_matrix();

        renderer.render_mesh(&Mesh::menu_cube(1.0), &model, &camera, Face::Front);
        assert_ne!(renderer.char_at(40, 12), ' ');
        assert_eq!(renderer.char_at(0, 0), ' ');
    }

    #[test]
    fn test_label_is_clamped_to_screen() {
        let mut renderer = AsciiRenderer::new(20, 5);
        let anchor = ScreenPoint {
            x: 19.0,
            y: 2.0,
            depth: 0.0,
        };
        let region = renderer.render_label("Projects", &anchor, Slot::Right, LabelStyle::Enabled).unwrap();

        assert_eq!(region.col_end, 19);
        assert_eq!(region.col_start, 10);
        assert!(region.contains(15, 2));
        assert!(!region.contains(15, 3));
        assert_eq!(renderer.char_at(10, 2), '[');
    }

    #[test]
    fn test_label_off_screen_is_skipped() {
        let mut renderer = AsciiRenderer::new(20, 5);
        let anchor = ScreenPoint {
            x: 5.0,
            y: 7.0,
            depth: 0.0,
        };
        assert!(renderer.render_label("Back", &anchor, Slot::Top, LabelStyle::Enabled).is_none());
    }

    #[test]
    fn test_label_colour_follows_style() {
        let mut renderer = AsciiRenderer::new(20, 5);
        let anchor = ScreenPoint {
            x: 10.0,
            y: 1.0,
            depth: 0.0,
        };

        renderer.render_label("About", &anchor, Slot::Left, LabelStyle::Hovered);
        assert_eq!(renderer.color_at(10, 1), HOVER_COLOR);

        renderer.render_label("About", &anchor, Slot::Left, LabelStyle::Disabled);
        assert_eq!(renderer.color_at(10, 1), Color::DarkYellow);
    }

    #[test]
    fn test_shade_never_blank_for_visible_faces() {
        assert_ne!(shade(0.01), ' ');
        assert_eq!(shade(1.0), '@');
    }
}
