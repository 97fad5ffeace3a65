//! Discrete toolbar actions.

use crate::canvas::Canvas;
use crate::store::SnapshotError;
use crate::tools::ToolKind;
use thiserror::Error;

/// Actions that can be triggered by the toolbar.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Change the current tool.
    SetTool(ToolKind),
    ZoomIn,
    ZoomOut,
    /// Additive zoom change, clamped.
    ZoomBy(f64),
    /// Remove all elements.
    Clear,
    /// Serialize the board.
    Export,
    /// Replace the board with a JSON snapshot.
    Import(String),
    /// Delete the selected element, if any.
    DeleteSelected,
}

/// Result of a successful command.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    Done,
    Cleared,
    /// New zoom level.
    Zoomed(f64),
    /// Serialized board.
    Exported(String),
    /// Number of imported elements.
    Imported(usize),
    /// Whether anything was deleted.
    Deleted(bool),
}

impl CommandOutcome {
    /// Short confirmation for a toast or status line, if the action warrants one.
    pub fn notice(&self) -> Option<&'static str> {
        match self {
            CommandOutcome::Cleared => Some("Canvas cleared"),
            CommandOutcome::Exported(_) => Some("Exported successfully"),
            CommandOutcome::Imported(_) => Some("Imported successfully"),
            CommandOutcome::Done | CommandOutcome::Zoomed(_) | CommandOutcome::Deleted(_) => None,
        }
    }
}

/// Command failures.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Import failed: {0}")]
    Import(#[source] SnapshotError),
    #[error("Export failed: {0}")]
    Export(#[source] SnapshotError),
}

impl Canvas {
    /// Dispatch a toolbar command.
    pub fn apply(&mut self, command: Command) -> Result<CommandOutcome, CommandError> {
        log::debug!("Command {:?}", command);
        let outcome = match command {
            Command::SetTool(tool) => {
                self.set_tool(tool);
                CommandOutcome::Done
            }
            Command::ZoomIn => CommandOutcome::Zoomed(self.zoom_in()),
            Command::ZoomOut => CommandOutcome::Zoomed(self.zoom_out()),
            Command::ZoomBy(delta) => CommandOutcome::Zoomed(self.zoom_by(delta)),
            Command::Clear => {
                self.clear_all();
                CommandOutcome::Cleared
            }
            Command::Export => {
                CommandOutcome::Exported(self.export_snapshot().map_err(CommandError::Export)?)
            }
            Command::Import(json) => {
                CommandOutcome::Imported(self.import_snapshot(&json).map_err(CommandError::Import)?)
            }
            Command::DeleteSelected => CommandOutcome::Deleted(self.delete_selected().is_some()),
        };
        Ok(outcome)
    }
}
