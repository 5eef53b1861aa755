/// Cubefolio Terminal - Cube Menu Navigator
///
/// Renders the portfolio menu as an ASCII cube. Each screen lives on one
/// face and its buttons sit in the top, right, bottom and left slots of
/// that same face.
/// Controls:
///   - Mouse click on a label: Follow that button
///   - Arrow Keys / WASD: Follow the Top/Right/Bottom/Left button
///   - Q/ESC: Quit
use clap::Parser;
use cubefolio_core::{menu, CubeScene, NavigationGraph};
use cubefolio_terminal::{logging, settings, TerminalApp};
use std::io;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "cubefolio-terminal", version, about = "Navigate a menu on the faces of a cube")]
struct Args {
    /// Menu file (JSON or text). Uses the built-in portfolio when omitted.
    #[arg(short, long)]
    menu: Option<PathBuf>,

    /// TOML settings file
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Screen to start on
    #[arg(long)]
    start: Option<String>,

    /// Snap animation length in milliseconds
    #[arg(long)]
    duration_ms: Option<f64>,

    /// Pause after a snap before the next navigation is accepted
    #[arg(long)]
    settle_ms: Option<f64>,
}

fn invalid_data(err: impl std::error::Error + Send + Sync + 'static) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, err)
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    logging::init_tracing();

    let mut config = match &args.settings {
        Some(path) => settings::load(path).map_err(invalid_data)?,
        None => Default::default(),
    };
    if let Some(start) = args.start {
        config.start_screen = start;
    }
    if let Some(duration_ms) = args.duration_ms {
        config.snap.duration_ms = duration_ms;
    }
    if let Some(settle_ms) = args.settle_ms {
        config.snap.settle_delay_ms = settle_ms;
    }
    settings::validate(&config).map_err(invalid_data)?;

    let graph = match &args.menu {
        Some(path) => menu::load_menu(path).map_err(invalid_data)?,
        None => NavigationGraph::portfolio(),
    };
    info!(screens = graph.len(), start = %config.start_screen, "menu loaded");

    let scene = CubeScene::new(graph, config).map_err(invalid_data)?;

    let mut app = TerminalApp::new(scene)?;
    app.run()?;

    info!("terminal closed");
    Ok(())
}
