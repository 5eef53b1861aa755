/// Menu file parsing for JSON and the plain-text menu format
///
/// The text format lists one block per screen:
///
/// ```text
/// # comments run to end of line
/// screen home face 0
///   title "Welcome"
///   description "Say \"hi\""
///   button right "Projects" -> projects
/// endscreen
/// ```
///
/// Quoted strings take `\"`, `\\` and `\n` escapes. Screen ids and targets
/// are bare identifiers.
use nom::{
    branch::alt,
    bytes::complete::{escaped_transform, is_not, tag, tag_no_case, take_while, take_while1},
    character::complete::{char, digit1, multispace1, space0, space1},
    combinator::{all_consuming, cut, map, map_res, opt, value},
    multi::many0,
    sequence::{delimited, preceded},
    IResult,
};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::{MenuError, Result};
use crate::navigation::{is_identifier, Button, NavigationGraph, Screen, Slot};
use crate::transform::Face;

/// Screen as written in a text menu, before its face index is checked
struct RawScreen {
    id: String,
    face: u8,
    properties: Vec<Property>,
}

enum Property {
    Title(String),
    Description(String),
    Button(Button),
}

/// Parse a JSON menu. Targets are not checked here; see
/// [`NavigationGraph::validate`].
pub fn parse_json_menu(input: &str) -> Result<NavigationGraph> {
    NavigationGraph::from_json(input)
}

/// Parse a text menu
pub fn parse_text_menu(input: &str) -> Result<NavigationGraph> {
    let raw = match all_consuming(menu)(input) {
        Ok((_, raw)) => raw,
        Err(e) => return Err(describe_failure(input, e)),
    };

    let mut graph = NavigationGraph::new();
    for raw_screen in raw {
        let mut screen = Screen::new(raw_screen.id, Face::try_from(raw_screen.face)?);
        for property in raw_screen.properties {
            match property {
                Property::Title(title) => screen.title = Some(title),
                Property::Description(description) => screen.description = Some(description),
                Property::Button(button) => screen.buttons.push(button),
            }
        }

        let id = screen.id.clone();
        if graph.insert(screen).is_some() {
            return Err(MenuError::DuplicateScreen(id));
        }
    }

    Ok(graph)
}

/// Detect and parse a menu file (JSON or text)
pub fn parse_menu(data: &[u8]) -> Result<NavigationGraph> {
    let text = std::str::from_utf8(data)
        .map_err(|e| MenuError::Parse(format!("menu is not valid UTF-8: {}", e)))?;

    if text.trim_start().starts_with('{') {
        parse_json_menu(text)
    } else {
        parse_text_menu(text)
    }
}

/// Read, parse and validate a menu file
pub fn load_menu(path: impl AsRef<Path>) -> Result<NavigationGraph> {
    let path = path.as_ref();
    let data = fs::read(path)?;
    let graph = parse_menu(&data)?;
    graph.validate()?;

    debug!(path = %path.display(), screens = graph.len(), "loaded menu");
    Ok(graph)
}

/// Write a graph in the text format. Fails on ids the format cannot hold
/// bare.
pub fn to_text(graph: &NavigationGraph) -> Result<String> {
    let mut out = String::new();

    for screen in graph.screens() {
        check_identifier(&screen.id)?;
        let _ = writeln!(out, "screen {} face {}", screen.id, screen.face().index());
        if let Some(title) = &screen.title {
            let _ = writeln!(out, "  title \"{}\"", escape(title));
        }
        if let Some(description) = &screen.description {
            let _ = writeln!(out, "  description \"{}\"", escape(description));
        }
        for button in &screen.buttons {
            check_identifier(&button.next_screen_id)?;
            let _ = writeln!(
                out,
                "  button {} \"{}\" -> {}",
                button.slot.keyword(),
                escape(&button.label),
                button.next_screen_id
            );
        }
        out.push_str("endscreen\n");
    }

    Ok(out)
}

fn check_identifier(id: &str) -> Result<()> {
    if is_identifier(id) {
        Ok(())
    } else {
        Err(MenuError::InvalidId(id.to_string()))
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn describe_failure(source: &str, err: nom::Err<nom::error::Error<&str>>) -> MenuError {
    match err {
        nom::Err::Error(e) | nom::Err::Failure(e) => {
            let offset = source.len() - e.input.len();
            let line = source[..offset].matches('\n').count() + 1;
            let near: String = e.input.lines().next().unwrap_or("").chars().take(24).collect();
            MenuError::Parse(format!("line {}: unexpected input near {:?}", line, near))
        }
        nom::Err::Incomplete(_) => MenuError::Parse("unexpected end of input".to_string()),
    }
}

/// Whitespace and `#` comments
fn blank(input: &str) -> IResult<&str, ()> {
    value(
        (),
        many0(alt((
            multispace1,
            preceded(char('#'), take_while(|c: char| c != '\n')),
        ))),
    )(input)
}

fn menu(input: &str) -> IResult<&str, Vec<RawScreen>> {
    let (input, screens) = many0(preceded(blank, screen))(input)?;
    let (input, _) = blank(input)?;
    Ok((input, screens))
}

fn screen(input: &str) -> IResult<&str, RawScreen> {
    let (input, _) = tag("screen")(input)?;
    cut(screen_body)(input)
}

fn screen_body(input: &str) -> IResult<&str, RawScreen> {
    let (input, id) = preceded(space1, identifier)(input)?;
    let (input, _) = preceded(space1, tag("face"))(input)?;
    let (input, face) = preceded(space1, map_res(digit1, |s: &str| s.parse::<u8>()))(input)?;
    let (input, properties) = many0(preceded(blank, property))(input)?;
    let (input, _) = preceded(blank, tag("endscreen"))(input)?;

    Ok((
        input,
        RawScreen {
            id: id.to_string(),
            face,
            properties,
        },
    ))
}

fn property(input: &str) -> IResult<&str, Property> {
    alt((
        map(preceded(tag("title"), preceded(space1, quoted)), Property::Title),
        map(
            preceded(tag("description"), preceded(space1, quoted)),
            Property::Description,
        ),
        map(button, Property::Button),
    ))(input)
}

fn button(input: &str) -> IResult<&str, Button> {
    let (input, _) = tag("button")(input)?;
    let (input, slot) = preceded(space1, slot)(input)?;
    let (input, label) = preceded(space1, quoted)(input)?;
    let (input, _) = delimited(space0, tag("->"), space0)(input)?;
    let (input, target) = identifier(input)?;
    Ok((input, Button::new(label, target, slot)))
}

fn slot(input: &str) -> IResult<&str, Slot> {
    alt((
        value(Slot::Top, tag_no_case("top")),
        value(Slot::Right, tag_no_case("right")),
        value(Slot::Bottom, tag_no_case("bottom")),
        value(Slot::Left, tag_no_case("left")),
    ))(input)
}

fn identifier(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_')(input)
}

fn quoted(input: &str) -> IResult<&str, String> {
    let body = escaped_transform(
        is_not("\\\"\n"),
        '\\',
        alt((
            value("\\", char('\\')),
            value("\"", char('"')),
            value("\n", char('n')),
        )),
    );
    delimited(char('"'), map(opt(body), Option::unwrap_or_default), char('"'))(input)
}
