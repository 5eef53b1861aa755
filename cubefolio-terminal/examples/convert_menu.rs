/// Example: Convert a menu file between the JSON and text formats
///
/// Usage: cargo run --example convert_menu -- path/to/menu.json
///
/// JSON input is printed as text and text input as JSON. Without an
/// argument the built-in portfolio menu is printed in both formats.
use cubefolio_core::{menu, NavigationGraph};
use std::env;
use std::fs;
use std::io;

fn to_io(err: cubefolio_core::MenuError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, err)
}

fn main() -> io::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <menu-file>", args[0]);
        eprintln!("\nNo menu file provided, using the portfolio menu...");
        let graph = NavigationGraph::portfolio();
        println!("{}", menu::to_text(&graph).map_err(to_io)?);
        println!("{}", graph.to_json().map_err(to_io)?);
        return Ok(());
    }

    let menu_path = &args[1];
    let data = fs::read(menu_path)?;
    let graph = menu::parse_menu(&data).map_err(to_io)?;
    graph.validate().map_err(to_io)?;

    eprintln!("Loaded {} screens from {}", graph.len(), menu_path);

    if String::from_utf8_lossy(&data).trim_start().starts_with('{') {
        print!("{}", menu::to_text(&graph).map_err(to_io)?);
    } else {
        println!("{}", graph.to_json().map_err(to_io)?);
    }

    Ok(())
}
