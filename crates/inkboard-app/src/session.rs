//! Plays script commands against a canvas.

use crate::error::ScriptError;
use crate::script::{ScriptCommand, parse_line};
use inkboard_core::{
    Canvas, Command, CommandOutcome, MouseButton, PointerEvent, Storage, TextEditResult, TextKey,
    TextModifiers,
};
use kurbo::{Point, Vec2};
use std::io::Write;

/// Number of intermediate moves a `drag` produces.
const DRAG_STEPS: usize = 8;

/// A canvas, its board storage and the output sink for `print`.
#[derive(Debug)]
pub struct Session<W: Write> {
    canvas: Canvas,
    storage: Box<dyn Storage>,
    out: W,
    pointer: Point,
}

impl<W: Write> Session<W> {
    pub fn new(canvas: Canvas, storage: Box<dyn Storage>, out: W) -> Self {
        Self {
            canvas,
            storage,
            out,
            pointer: Point::ZERO,
        }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Parse the whole script, then run it.
    ///
    /// Nothing runs if any line fails to parse.
    pub fn run_script(&mut self, source: &str) -> Result<(), ScriptError> {
        let mut commands = Vec::new();
        for (index, line) in source.lines().enumerate() {
            let parsed = parse_line(line).map_err(|message| ScriptError::Parse {
                line: index + 1,
                message,
            })?;
            commands.extend(parsed);
        }
        log::debug!("Running {} commands", commands.len());
        for command in commands {
            self.run(command)?;
        }
        Ok(())
    }

    /// Run one command. Failed loads, saves and edits are reported on the
    /// output and do not stop the session.
    pub fn run(&mut self, command: ScriptCommand) -> Result<(), ScriptError> {
        match command {
            ScriptCommand::Tool(tool) => {
                self.canvas.apply(Command::SetTool(tool))?;
            }
            ScriptCommand::Down(position) => self.send(PointerEvent::Down {
                position,
                button: MouseButton::Left,
            }),
            ScriptCommand::Move(position) => self.send(PointerEvent::Move { position }),
            ScriptCommand::Drag(target) => {
                let start = self.pointer;
                for step in 1..=DRAG_STEPS {
                    let t = step as f64 / DRAG_STEPS as f64;
                    self.send(PointerEvent::Move {
                        position: start.lerp(target, t),
                    });
                }
            }
            ScriptCommand::Up(position) => self.send(PointerEvent::Up {
                position,
                button: MouseButton::Left,
            }),
            ScriptCommand::Wheel(dy) => self.send(PointerEvent::Scroll {
                position: self.pointer,
                delta: Vec2::new(0.0, dy),
            }),
            ScriptCommand::ZoomIn => {
                self.canvas.apply(Command::ZoomIn)?;
            }
            ScriptCommand::ZoomOut => {
                self.canvas.apply(Command::ZoomOut)?;
            }
            ScriptCommand::Clear => {
                self.canvas.apply(Command::Clear)?;
            }
            ScriptCommand::Delete => {
                if self.canvas.apply(Command::DeleteSelected)? == CommandOutcome::Deleted(false) {
                    writeln!(self.out, "nothing selected")?;
                }
            }
            ScriptCommand::Edit => self.begin_edit()?,
            ScriptCommand::Type(text) => self.key(&TextKey::Character(text), TextModifiers::default())?,
            ScriptCommand::Key(key, modifiers) => self.key(&key, modifiers)?,
            ScriptCommand::Blur => {
                self.canvas.commit_edit();
            }
            ScriptCommand::Save(name) => {
                if let Err(err) = self.canvas.save_to(self.storage.as_ref(), &name) {
                    writeln!(self.out, "save failed: {}", err)?;
                }
            }
            ScriptCommand::Load(name) => {
                if let Err(err) = self.canvas.load_from(self.storage.as_ref(), &name) {
                    writeln!(self.out, "load failed: {}", err)?;
                }
            }
            ScriptCommand::Export => {
                if let CommandOutcome::Exported(json) = self.canvas.apply(Command::Export)? {
                    writeln!(self.out, "{}", json)?;
                }
            }
            ScriptCommand::Print => self.print()?,
        }
        Ok(())
    }

    fn send(&mut self, event: PointerEvent) {
        self.pointer = event.position();
        self.canvas.handle_pointer_event(event);
    }

    fn begin_edit(&mut self) -> Result<(), ScriptError> {
        let Some(id) = self.canvas.selection().cloned() else {
            writeln!(self.out, "nothing selected")?;
            return Ok(());
        };
        if let Err(err) = self.canvas.begin_edit(&id) {
            writeln!(self.out, "edit failed: {}", err)?;
        }
        Ok(())
    }

    fn key(&mut self, key: &TextKey, modifiers: TextModifiers) -> Result<(), ScriptError> {
        if self.canvas.edit_key(key, modifiers) == TextEditResult::NotHandled {
            writeln!(self.out, "not editing")?;
        }
        Ok(())
    }

    /// One status line, then one line per element back to front.
    fn print(&mut self) -> Result<(), ScriptError> {
        let view = self.canvas.view();
        let offset = view.camera.offset;
        let selection = view.selection.map_or("none", |id| id.as_str());
        let editing = view.editing.map_or("none", |s| s.id().as_str());
        writeln!(
            self.out,
            "tool={} zoom={:.2} offset=({}, {}) selection={} editing={}",
            self.canvas.tool(),
            view.camera.zoom(),
            offset.x,
            offset.y,
            selection,
            editing
        )?;
        for e in view.elements {
            write!(
                self.out,
                "{} {} ({}, {}) {}x{}",
                e.id,
                e.kind.name(),
                e.x,
                e.y,
                e.width,
                e.height
            )?;
            if let Some(color) = e.color {
                write!(self.out, " {}", color.name())?;
            }
            if let Some(content) = &e.content {
                write!(self.out, " {:?}", content)?;
            }
            writeln!(self.out)?;
        }
        Ok(())
    }
}
