/// Terminal frontend for the cube menu
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use cubefolio_core::{Camera, CubeScene, Mesh, NavigateOutcome, SceneFrame, Slot};
use nalgebra::Point3;
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub mod logging;
pub mod renderer;
pub mod settings;

pub use renderer::{AsciiRenderer, HitRegion, LabelStyle};

/// Terminal cells are roughly twice as tall as they are wide
const CELL_ASPECT: f32 = 2.0;

/// Rows reserved for the header and footer
const HEADER_ROWS: u16 = 2;
const FOOTER_ROWS: u16 = 1;

/// Main application struct for terminal rendering
pub struct TerminalApp {
    scene: CubeScene,
    mesh: Mesh,
    camera: Camera,
    renderer: AsciiRenderer,
    hit_regions: Vec<HitRegion>,
    hovered: Option<Slot>,
    running: bool,
    started: Instant,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(scene: CubeScene) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        let (view_width, view_height) = viewport(width, height);

        Ok(Self {
            scene,
            mesh: Mesh::menu_cube(1.0),
            camera: Camera::new(aspect(view_width, view_height)),
            renderer: AsciiRenderer::new(view_width, view_height),
            hit_regions: Vec::new(),
            hovered: None,
            running: true,
            started: Instant::now(),
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide
        )?;

        // The cube exists from the first rendered frame on
        self.scene.bind_cube();
        let result = self.main_loop();

        // Cleanup
        self.scene.teardown();
        terminal::disable_raw_mode()?;
        execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;

        result
    }

    fn now_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            // Input first, then animation, then drawing
            while event::poll(Duration::from_millis(0))? {
                self.handle_input()?;
            }

            self.update();
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        match event::read()? {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) => match code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.running = false;
                }
                KeyCode::Up | KeyCode::Char('w') => self.click(Slot::Top),
                KeyCode::Right | KeyCode::Char('d') => self.click(Slot::Right),
                KeyCode::Down | KeyCode::Char('s') => self.click(Slot::Bottom),
                KeyCode::Left | KeyCode::Char('a') => self.click(Slot::Left),
                _ => {}
            },
            Event::Mouse(MouseEvent {
                kind, column, row, ..
            }) => match kind {
                MouseEventKind::Down(MouseButton::Left) => {
                    if let Some(slot) = slot_at(&self.hit_regions, column, row) {
                        self.click(slot);
                    }
                }
                MouseEventKind::Moved => {
                    self.hovered = slot_at(&self.hit_regions, column, row);
                }
                _ => {}
            },
            Event::Resize(width, height) => {
                let (view_width, view_height) = viewport(width, height);
                self.renderer.resize(view_width, view_height);
                self.camera.aspect = aspect(view_width, view_height);
                execute!(stdout(), terminal::Clear(ClearType::All))?;
            }
            _ => {}
        }
        Ok(())
    }

    fn click(&mut self, slot: Slot) {
        let now = self.now_ms();
        let outcome = self.scene.click_slot(slot, now);
        match outcome {
            NavigateOutcome::Accepted => {
                info!(?slot, screen = self.scene.current_screen_id(), "button clicked");
            }
            other => debug!(?slot, ?other, "click ignored"),
        }
    }

    fn update(&mut self) {
        let now = self.now_ms();
        self.scene.frame(now);
    }

    fn render(&mut self) -> io::Result<()> {
        let Some(frame) = self.scene.compose() else {
            return Ok(());
        };

        self.renderer.clear();
        self.renderer
            .render_mesh(&self.mesh, &frame.cube.model_matrix(), &self.camera, frame.face);
        self.hit_regions = self.render_labels(&frame);

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, HEADER_ROWS))?;
        self.renderer.draw(&mut stdout)?;
        self.draw_overlay(&mut stdout, &frame)?;

        stdout.flush()?;
        Ok(())
    }

    /// Project each button anchor and draw its label
    fn render_labels(&mut self, frame: &SceneFrame) -> Vec<HitRegion> {
        let (width, height) = (self.renderer.width(), self.renderer.height());
        let hovered = self.hovered;

        frame
            .buttons
            .iter()
            .filter_map(|button| {
                let anchor = self.camera.project_to_screen(
                    &Point3::origin(),
                    &button.world_transform,
                    width,
                    height,
                )?;
                let style = if !frame.clickable {
                    LabelStyle::Disabled
                } else if hovered == Some(button.slot) {
                    LabelStyle::Hovered
                } else {
                    LabelStyle::Enabled
                };
                self.renderer
                    .render_label(&button.label, &anchor, button.slot, style)
            })
            .collect()
    }

    fn draw_overlay<W: Write>(&self, out: &mut W, frame: &SceneFrame) -> io::Result<()> {
        let (width, height) = terminal::size()?;
        let title = frame.title.as_deref().unwrap_or(&frame.screen_id);

        queue!(
            out,
            cursor::MoveTo(0, 0),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            Print(fit(
                &format!("Cubefolio | {} | FPS: {:.1}", title, self.fps),
                width
            )),
            cursor::MoveTo(0, 1),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::Grey),
            Print(fit(frame.description.as_deref().unwrap_or(""), width)),
            cursor::MoveTo(0, height.saturating_sub(FOOTER_ROWS)),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::DarkGrey),
            Print(fit(
                "Click a label or use Arrows/WASD to pick the Top/Right/Bottom/Left button | Q=Quit",
                width
            )),
            ResetColor
        )?;
        Ok(())
    }
}

/// Label under a terminal cell. Header rows sit above the viewport and
/// never hit a label.
fn slot_at(regions: &[HitRegion], column: u16, row: u16) -> Option<Slot> {
    let row = row.checked_sub(HEADER_ROWS)?;
    regions
        .iter()
        .find(|region| region.contains(column, row))
        .map(|region| region.slot)
}

/// Cube viewport size for a terminal of `width` x `height` cells
fn viewport(width: u16, height: u16) -> (usize, usize) {
    let rows = height.saturating_sub(HEADER_ROWS + FOOTER_ROWS);
    (width as usize, rows as usize)
}

fn aspect(width: usize, height: usize) -> f32 {
    if height == 0 {
        return 1.0;
    }
    width as f32 / (height as f32 * CELL_ASPECT)
}

fn fit(text: &str, width: u16) -> String {
    text.chars().take(width as usize).collect()
}
