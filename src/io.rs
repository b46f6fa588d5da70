//! Output sink abstraction.
//!
//! The shell never formats text for a terminal itself. Everything it has to
//! show goes through an [`OutputSink`], which the host implements for its
//! display (stdout, a UART, a GUI widget, a test recorder, ...).

use crate::error::ParseError;
use crate::output::{CommandView, DirectoryView};
use crate::tree::completion::Suggestions;

/// Receiver of everything the shell displays.
///
/// Methods are called synchronously from `Shell::execute()` and
/// `Shell::autocomplete()`, in display order.
pub trait OutputSink {
    /// Platform-specific error type
    type Error;

    /// Banner shown on activation.
    fn welcome(&mut self, message: &str) -> Result<(), Self::Error>;

    /// An empty line was submitted.
    fn blank_line(&mut self) -> Result<(), Self::Error>;

    /// One line of command output.
    fn line(&mut self, text: &str) -> Result<(), Self::Error>;

    /// Completion candidates or "did you mean" hints.
    fn suggestions(&mut self, suggestions: &Suggestions) -> Result<(), Self::Error>;

    /// Directory listing.
    fn directory_view(&mut self, view: &DirectoryView) -> Result<(), Self::Error>;

    /// Command help.
    fn command_view(&mut self, view: &CommandView) -> Result<(), Self::Error>;

    /// The line couldn't be resolved or bound.
    fn parse_error(&mut self, error: &ParseError) -> Result<(), Self::Error>;

    /// Completion found no candidates.
    fn autocomplete_not_possible(&mut self, message: &str) -> Result<(), Self::Error>;

    /// A command failed with a declared, user-facing error.
    fn execution_error(&mut self, command: &str, message: &str) -> Result<(), Self::Error>;

    /// A command failed unexpectedly; `detail` is diagnostic text.
    fn unhandled_error(&mut self, command: &str, detail: &str) -> Result<(), Self::Error>;

    /// Replace the editable command line (after completion, or cleared after
    /// a run or a blank line).
    ///
    /// Default implementation ignores the update, for hosts without an editable line.
    fn command_line(&mut self, line: &str) -> Result<(), Self::Error> {
        let _ = line;
        Ok(())
    }
}
