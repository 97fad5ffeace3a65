//! Line-oriented interaction scripts.
//!
//! One command per line; blank lines and `#` comments are skipped.

use inkboard_core::{ToolKind, TextKey, TextModifiers};
use kurbo::Point;

/// A parsed script command.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptCommand {
    Tool(ToolKind),
    /// Primary-button press at a screen position.
    Down(Point),
    Move(Point),
    /// Interpolated moves from the last pointer position.
    Drag(Point),
    Up(Point),
    /// Wheel scroll with the given vertical delta.
    Wheel(f64),
    ZoomIn,
    ZoomOut,
    Clear,
    /// Delete the selected element.
    Delete,
    /// Start editing the selected element.
    Edit,
    /// Insert text into the open edit.
    Type(String),
    Key(TextKey, TextModifiers),
    /// Focus loss: commit the open edit.
    Blur,
    Save(String),
    Load(String),
    /// Print the JSON snapshot.
    Export,
    /// Print a summary of the canvas.
    Print,
}

/// Parse one line. `Ok(None)` for blank lines and comments.
pub fn parse_line(line: &str) -> Result<Option<ScriptCommand>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word {
        "tool" => ScriptCommand::Tool(rest.parse::<ToolKind>().map_err(|e| e.to_string())?),
        "down" => ScriptCommand::Down(parse_point(rest)?),
        "move" => ScriptCommand::Move(parse_point(rest)?),
        "drag" => ScriptCommand::Drag(parse_point(rest)?),
        "up" => ScriptCommand::Up(parse_point(rest)?),
        "wheel" => ScriptCommand::Wheel(parse_number(rest)?),
        "zoom-in" => no_args(rest, ScriptCommand::ZoomIn)?,
        "zoom-out" => no_args(rest, ScriptCommand::ZoomOut)?,
        "clear" => no_args(rest, ScriptCommand::Clear)?,
        "delete" => no_args(rest, ScriptCommand::Delete)?,
        "edit" => no_args(rest, ScriptCommand::Edit)?,
        "blur" => no_args(rest, ScriptCommand::Blur)?,
        "export" => no_args(rest, ScriptCommand::Export)?,
        "print" => no_args(rest, ScriptCommand::Print)?,
        "type" if !rest.is_empty() => ScriptCommand::Type(rest.to_string()),
        "key" => {
            let (key, modifiers) = parse_key(rest)?;
            ScriptCommand::Key(key, modifiers)
        }
        "save" => ScriptCommand::Save(board_name(rest)?),
        "load" => ScriptCommand::Load(board_name(rest)?),
        "type" => return Err("type needs text".to_string()),
        other => return Err(format!("unknown command `{}`", other)),
    };
    Ok(Some(command))
}

fn no_args(rest: &str, command: ScriptCommand) -> Result<ScriptCommand, String> {
    if rest.is_empty() {
        Ok(command)
    } else {
        Err(format!("unexpected arguments `{}`", rest))
    }
}

fn parse_number(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|_| format!("invalid number `{}`", s))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("invalid number `{}`", s))
    }
}

fn parse_point(rest: &str) -> Result<Point, String> {
    let mut parts = rest.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(x), Some(y), None) => Ok(Point::new(parse_number(x)?, parse_number(y)?)),
        _ => Err(format!("expected `X Y`, got `{}`", rest)),
    }
}

fn board_name(rest: &str) -> Result<String, String> {
    if rest.is_empty() {
        Err("missing board name".to_string())
    } else {
        Ok(rest.to_string())
    }
}

fn parse_key(name: &str) -> Result<(TextKey, TextModifiers), String> {
    let none = TextModifiers::default();
    let parsed = match name {
        "enter" => (TextKey::Enter, none),
        "shift-enter" => (TextKey::Enter, TextModifiers::SHIFT),
        "escape" => (TextKey::Escape, none),
        "backspace" => (TextKey::Backspace, none),
        "delete" => (TextKey::Delete, none),
        "left" => (TextKey::Left, none),
        "right" => (TextKey::Right, none),
        "home" => (TextKey::Home, none),
        "end" => (TextKey::End, none),
        other => return Err(format!("unknown key `{}`", other)),
    };
    Ok(parsed)
}
