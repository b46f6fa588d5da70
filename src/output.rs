//! Command output.
//!
//! Actions don't write to the sink directly. They append to an
//! [`OutputBuffer`], which the shell flushes to the sink after the action
//! returns, before any error report. Besides plain lines the buffer can hold
//! structured views that the sink renders however it likes.

use alloc::string::String;
use alloc::vec::Vec;

use crate::io::OutputSink;

/// One parameter of a command, as shown by help.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamView {
    /// Parameter name
    pub name: String,
    /// Parameter description
    pub description: String,
    /// Kind label ("integer", "flag", ...)
    pub kind: &'static str,
    /// True if the parameter may be omitted
    pub optional: bool,
    /// Rendered default, if any
    pub default: Option<String>,
}

/// A command, as shown by help and directory listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandView {
    /// Command name
    pub name: String,
    /// Command description
    pub description: String,
    /// Parameters in declaration order
    pub params: Vec<ParamView>,
}

/// A directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryView {
    /// Path of the listed directory, or bare name for unexpanded children
    pub name: String,
    /// Directory description
    pub description: String,
    /// Child directories (expanded only for recursive listings)
    pub directories: Vec<DirectoryView>,
    /// Commands of the directory
    pub commands: Vec<CommandView>,
}

/// Buffered output item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputEntry {
    /// Plain text line
    Line(String),
    /// Directory listing
    Directory(DirectoryView),
    /// Command help
    Command(CommandView),
}

/// Output collected while a command runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputBuffer {
    entries: Vec<OutputEntry>,
}

impl OutputBuffer {
    /// Empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line of text.
    pub fn line(&mut self, text: impl Into<String>) {
        self.entries.push(OutputEntry::Line(text.into()));
    }

    /// Append a directory listing.
    pub fn directory_view(&mut self, view: DirectoryView) {
        self.entries.push(OutputEntry::Directory(view));
    }

    /// Append a command help view.
    pub fn command_view(&mut self, view: CommandView) {
        self.entries.push(OutputEntry::Command(view));
    }

    /// True if nothing was written.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Buffered entries, in order.
    pub fn entries(&self) -> &[OutputEntry] {
        &self.entries
    }

    /// Send every entry to `sink`, in order, and empty the buffer.
    pub fn flush_to<O: OutputSink>(&mut self, sink: &mut O) -> Result<(), O::Error> {
        for entry in self.entries.drain(..) {
            match &entry {
                OutputEntry::Line(text) => sink.line(text)?,
                OutputEntry::Directory(view) => sink.directory_view(view)?,
                OutputEntry::Command(view) => sink.command_view(view)?,
            }
        }
        Ok(())
    }
}
