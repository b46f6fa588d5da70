//! Shell orchestration and command processing.
//!
//! The `Shell` owns an output sink and a shared [`Hierarchy`] and runs the
//! two entry points a host calls:
//!
//! - [`Shell::execute`]: resolve the command path, bind arguments, run the
//!   action, flush its output, then report any error.
//! - [`Shell::autocomplete`]: complete the last word of a partial line and
//!   push the new line (and suggestions) to the sink.
//!
//! Parse failures never escape as `Err`; they are reported through the sink
//! and returned in [`LineOutcome`]. `Err` is reserved for sink failures.

use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::marker::PhantomData;

use log::{debug, error, info};

use crate::config::{DefaultConfig, RebindPolicy, ShellConfig};
use crate::error::{ArgumentError, ExecuteError, ParseError, PathError};
use crate::io::OutputSink;
use crate::output::OutputBuffer;
use crate::param::args::{complete_args, parse_args};
use crate::param::CommandArgs;
use crate::tree::completion::{AutoComplete, AutoCompleteOutcome, CompletionKind, Suggestions};
use crate::tree::path::DELIMITER;
use crate::tree::{Command, CommandId, Hierarchy};
use crate::trie::Trie;

// Sub-modules
pub mod system;

/// How an executed command ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// Action returned `Ok`
    Completed,

    /// Action returned `ExecuteError::Failed` with this message
    Failed(String),

    /// Action returned `ExecuteError::Unhandled` or panicked; diagnostic detail
    Unhandled(String),
}

/// Result of submitting one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// Empty or whitespace-only line
    Blank,

    /// Line couldn't be resolved or bound; nothing ran
    ParseFailure(ParseError),

    /// A command ran
    Executed(ExecutionOutcome),
}

/// Interactive shell over a command hierarchy.
///
/// Generic over:
/// - `O`: OutputSink implementation
/// - `C`: ShellConfig implementation
pub struct Shell<O: OutputSink, C: ShellConfig = DefaultConfig> {
    /// Command hierarchy (shared with system commands)
    hierarchy: Arc<Hierarchy>,

    /// Output sink
    sink: O,

    /// Config type marker (zero-size)
    _config: PhantomData<C>,
}

impl<O: OutputSink, C: ShellConfig> core::fmt::Debug for Shell<O, C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Shell")
            .field("working_directory", &self.working_directory_path())
            .finish_non_exhaustive()
    }
}

impl<O: OutputSink, C: ShellConfig> Shell<O, C> {
    /// Create a shell writing to `sink`.
    pub fn new(hierarchy: Arc<Hierarchy>, sink: O) -> Self {
        Self {
            hierarchy,
            sink,
            _config: PhantomData,
        }
    }

    /// Show the welcome banner.
    pub fn activate(&mut self) -> Result<(), O::Error> {
        info!("shell activated at {}", self.working_directory_path());
        self.sink.welcome(C::MSG_WELCOME)
    }

    /// The hierarchy this shell runs.
    pub fn hierarchy(&self) -> &Arc<Hierarchy> {
        &self.hierarchy
    }

    /// Output sink.
    pub fn sink(&self) -> &O {
        &self.sink
    }

    /// Mutable output sink.
    pub fn sink_mut(&mut self) -> &mut O {
        &mut self.sink
    }

    /// Consume the shell and return its sink.
    pub fn into_sink(self) -> O {
        self.sink
    }

    /// Absolute path of the working directory.
    pub fn working_directory_path(&self) -> String {
        self.hierarchy.path_of(self.hierarchy.working_directory())
    }

    /// Prompt text, e.g. `/system> `.
    pub fn prompt(&self) -> String {
        format!("{}> ", self.working_directory_path())
    }

    /// Parse and run one command line.
    ///
    /// Output written by the action is always flushed before an error is
    /// reported, so partial output shows up first.
    pub fn execute(&mut self, raw: &str) -> Result<LineOutcome, O::Error> {
        let line = raw.trim();
        if line.is_empty() {
            self.sink.command_line("")?;
            self.sink.blank_line()?;
            return Ok(LineOutcome::Blank);
        }

        if line.len() > C::MAX_INPUT {
            let error = ParseError::InputTooLong { max: C::MAX_INPUT };
            self.sink.parse_error(&error)?;
            return Ok(LineOutcome::ParseFailure(error));
        }

        let hierarchy = Arc::clone(&self.hierarchy);
        let (id, args) = match self.parse_line(&hierarchy, line) {
            Ok(parsed) => parsed,
            Err((error, suggestions)) => {
                debug!("parse failed for '{}': {}", line, error);
                self.sink.parse_error(&error)?;
                if let Some(suggestions) = suggestions {
                    self.sink.suggestions(&suggestions)?;
                }
                return Ok(LineOutcome::ParseFailure(error));
            }
        };

        self.sink.command_line("")?;

        let command = hierarchy.cmd(id);
        let name = command.name();
        debug!("executing {}", hierarchy.command_path(id));

        let mut output = OutputBuffer::new();
        let outcome = match invoke(command, &args, &mut output) {
            Ok(()) => {
                if output.is_empty() {
                    output.line(format!("Command '{}' executed successfully.", name));
                }
                output.flush_to(&mut self.sink)?;
                ExecutionOutcome::Completed
            }
            Err(ExecuteError::Failed(message)) => {
                debug!("command '{}' failed: {}", name, message);
                output.flush_to(&mut self.sink)?;
                self.sink.execution_error(name, &message)?;
                ExecutionOutcome::Failed(message)
            }
            Err(ExecuteError::Unhandled(detail)) => {
                error!("command '{}' terminated with an unhandled error: {}", name, detail);
                output.line(format!(
                    "Command '{}' terminated with an unhandled error!",
                    name
                ));
                output.flush_to(&mut self.sink)?;
                self.sink.unhandled_error(name, &detail)?;
                ExecutionOutcome::Unhandled(detail)
            }
        };

        Ok(LineOutcome::Executed(outcome))
    }

    /// Complete the last word of a partial line.
    ///
    /// Returns the new command line when something could be completed; it
    /// has also been sent to the sink.
    pub fn autocomplete(&mut self, raw: &str) -> Result<Option<String>, O::Error> {
        if raw.len() > C::MAX_INPUT {
            self.sink
                .parse_error(&ParseError::InputTooLong { max: C::MAX_INPUT })?;
            return Ok(None);
        }

        let completion = match complete_line(&self.hierarchy, raw, C::REBIND_POLICY) {
            Ok(completion) => completion,
            Err(error) => {
                debug!("completion failed for '{}': {}", raw, error);
                self.sink.parse_error(&error)?;
                return Ok(None);
            }
        };

        match completion.outcome() {
            AutoCompleteOutcome::NotPossible => {
                let message = format!("No completions for '{}'", completion.prefix());
                self.sink.autocomplete_not_possible(&message)?;
                Ok(None)
            }
            AutoCompleteOutcome::Single { addition, .. } => {
                let line = format!("{}{}", raw, addition);
                self.sink.command_line(&line)?;
                Ok(Some(line))
            }
            AutoCompleteOutcome::Multiple {
                addition,
                mut suggestions,
            } => {
                let line = format!("{}{}", raw, addition);
                self.sink.command_line(&line)?;
                suggestions.truncate(C::MAX_SUGGESTIONS);
                self.sink.suggestions(&suggestions)?;
                Ok(Some(line))
            }
        }
    }

    #[allow(clippy::result_large_err)]
    fn parse_line(
        &self,
        hierarchy: &Hierarchy,
        line: &str,
    ) -> Result<(CommandId, CommandArgs), (ParseError, Option<Suggestions>)> {
        let mut tokens = line.split_whitespace();
        let path = tokens.next().unwrap_or_default();
        let rest: Vec<&str> = tokens.collect();

        let id = hierarchy.resolve_command(path).map_err(|e| {
            let suggestions = self.path_suggestions(hierarchy, &e);
            (ParseError::Path(e), suggestions)
        })?;

        let command = hierarchy.cmd(id);
        let args = parse_args(hierarchy, command, &rest, C::REBIND_POLICY).map_err(|e| {
            let suggestions = self.argument_suggestions(hierarchy, command, &e);
            (e, suggestions)
        })?;

        Ok((id, args))
    }

    /// Entries close to an unresolvable path.
    fn path_suggestions(&self, hierarchy: &Hierarchy, error: &PathError) -> Option<Suggestions> {
        let candidates = match error {
            PathError::UnknownDirectory { scope, name } => hierarchy
                .complete_directory_path(&join(scope, name))
                .ok()?
                .possibilities()
                .clone(),
            PathError::UnknownCommand { scope, name } => {
                let local = hierarchy.complete_path(&join(scope, name)).ok()?;
                let globals = hierarchy
                    .globals()
                    .sub_trie(name)
                    .map_values(|_| CompletionKind::Command);
                local.possibilities().union(&globals)
            }
            _ => return None,
        };
        self.capped(&candidates)
    }

    /// Parameter names or values close to a rejected argument.
    fn argument_suggestions(
        &self,
        hierarchy: &Hierarchy,
        command: &Command,
        error: &ParseError,
    ) -> Option<Suggestions> {
        let candidates = match error {
            ParseError::Argument(ArgumentError::UnknownParameterName { name, .. }) => {
                let names: Trie<CompletionKind> = command
                    .params()
                    .iter()
                    .map(|p| (p.name(), CompletionKind::ParameterName))
                    .collect();
                let close = names.sub_trie(name);
                if close.is_empty() { names } else { close }
            }
            ParseError::Argument(ArgumentError::InvalidValue { param, .. }) => command
                .find_param(param)?
                .complete_value("", hierarchy)
                .ok()?
                .possibilities()
                .clone(),
            _ => return None,
        };
        self.capped(&candidates)
    }

    fn capped(&self, candidates: &Trie<CompletionKind>) -> Option<Suggestions> {
        let mut suggestions = Suggestions::from_candidates(candidates);
        suggestions.truncate(C::MAX_SUGGESTIONS);
        (!suggestions.is_empty()).then_some(suggestions)
    }
}

fn join(scope: &str, name: &str) -> String {
    if scope.ends_with(DELIMITER) {
        format!("{}{}", scope, name)
    } else {
        format!("{}{}{}", scope, DELIMITER, name)
    }
}

/// Split a partial line into words, keeping an empty last word when the line
/// is empty or ends in whitespace.
fn completion_words(raw: &str) -> Vec<&str> {
    let mut words: Vec<&str> = raw.split_whitespace().collect();
    if words.is_empty() || raw.ends_with(char::is_whitespace) {
        words.push("");
    }
    words
}

/// Complete the last word of `raw`: a path when it's the first word,
/// otherwise an argument of the command the first word names.
pub fn complete_line(
    hierarchy: &Hierarchy,
    raw: &str,
    policy: RebindPolicy,
) -> Result<AutoComplete, ParseError> {
    let words = completion_words(raw);
    match words.split_first() {
        Some((path, [])) => Ok(hierarchy.complete_path(path)?),
        Some((path, args)) => {
            let id = hierarchy.resolve_command(path)?;
            complete_args(hierarchy, hierarchy.cmd(id), args, policy)
        }
        None => Ok(hierarchy.complete_path("")?),
    }
}

#[cfg(feature = "std")]
fn invoke(
    command: &Command,
    args: &CommandArgs,
    output: &mut OutputBuffer,
) -> Result<(), ExecuteError> {
    use std::panic::{AssertUnwindSafe, catch_unwind};

    catch_unwind(AssertUnwindSafe(|| command.execute(args, output))).unwrap_or_else(|payload| {
        let detail = payload
            .downcast_ref::<&str>()
            .map(|s| String::from(*s))
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| String::from("panic"));
        Err(ExecuteError::Unhandled(format!("panicked: {}", detail)))
    })
}

#[cfg(not(feature = "std"))]
fn invoke(
    command: &Command,
    args: &CommandArgs,
    output: &mut OutputBuffer,
) -> Result<(), ExecuteError> {
    command.execute(args, output)
}
