//! Test fixtures and utilities for trie-shell testing.
//!
//! Provides:
//! - `MockSink`: Test implementation of OutputSink that records every event
//! - `Level`: Enum parameter type using the derive macro
//! - `test_hierarchy()`: Sample command hierarchy for testing

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use trie_shell::{
    CommandDef, CommandView, DirectoryView, ExecuteError, Hierarchy, HierarchyBuilder,
    OutputSink, Param, ParamEnum, ParseError, Suggestions,
};

// ============================================================================
// MockSink - Test OutputSink Implementation
// ============================================================================

/// One call made on the sink.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Welcome(String),
    Blank,
    Line(String),
    Suggestions(Suggestions),
    Directory(DirectoryView),
    Command(CommandView),
    ParseError(ParseError),
    NotPossible(String),
    ExecutionError { command: String, message: String },
    Unhandled { command: String, detail: String },
    CommandLine(String),
}

/// Mock sink for testing.
///
/// Captures every call in order.
#[derive(Debug, Default)]
pub struct MockSink {
    events: Vec<Event>,
}

impl MockSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// All captured events.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Take captured events, leaving the sink empty.
    pub fn take(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    /// Clear captured events.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Text of every `line` call.
    pub fn lines(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Line(text) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }
}

impl OutputSink for MockSink {
    type Error = ();

    fn welcome(&mut self, message: &str) -> Result<(), Self::Error> {
        self.events.push(Event::Welcome(message.to_string()));
        Ok(())
    }

    fn blank_line(&mut self) -> Result<(), Self::Error> {
        self.events.push(Event::Blank);
        Ok(())
    }

    fn line(&mut self, text: &str) -> Result<(), Self::Error> {
        self.events.push(Event::Line(text.to_string()));
        Ok(())
    }

    fn suggestions(&mut self, suggestions: &Suggestions) -> Result<(), Self::Error> {
        self.events.push(Event::Suggestions(suggestions.clone()));
        Ok(())
    }

    fn directory_view(&mut self, view: &DirectoryView) -> Result<(), Self::Error> {
        self.events.push(Event::Directory(view.clone()));
        Ok(())
    }

    fn command_view(&mut self, view: &CommandView) -> Result<(), Self::Error> {
        self.events.push(Event::Command(view.clone()));
        Ok(())
    }

    fn parse_error(&mut self, error: &ParseError) -> Result<(), Self::Error> {
        self.events.push(Event::ParseError(error.clone()));
        Ok(())
    }

    fn autocomplete_not_possible(&mut self, message: &str) -> Result<(), Self::Error> {
        self.events.push(Event::NotPossible(message.to_string()));
        Ok(())
    }

    fn execution_error(&mut self, command: &str, message: &str) -> Result<(), Self::Error> {
        self.events.push(Event::ExecutionError {
            command: command.to_string(),
            message: message.to_string(),
        });
        Ok(())
    }

    fn unhandled_error(&mut self, command: &str, detail: &str) -> Result<(), Self::Error> {
        self.events.push(Event::Unhandled {
            command: command.to_string(),
            detail: detail.to_string(),
        });
        Ok(())
    }

    fn command_line(&mut self, line: &str) -> Result<(), Self::Error> {
        self.events.push(Event::CommandLine(line.to_string()));
        Ok(())
    }
}

// ============================================================================
// Level - Enum Parameter for Testing
// ============================================================================

/// Log level used by `config/level`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ParamEnum)]
pub enum Level {
    Low,
    High,
    #[param(rename = "max")]
    Maximum,
}

// ============================================================================
// Test Hierarchy
// ============================================================================

/// Number of times the `math/random` default supplier ran.
pub static SEED_CALLS: AtomicUsize = AtomicUsize::new(0);

/// Sample hierarchy:
///
/// ```text
/// /
/// ├── cmd mandatoryInt optionalFlag
/// ├── crash
/// ├── panic
/// ├── config/
/// │   └── level level [persist=false]
/// ├── math/
/// │   ├── add a b
/// │   ├── divide a b
/// │   └── random [seed]
/// └── system/
///     ├── status
///     └── network/
///         └── ping host [count=4] [verbose]
/// globals: cd, echo, help, ls, man, pwd
/// ```
pub fn test_hierarchy() -> Arc<Hierarchy> {
    let mut builder = HierarchyBuilder::with_system_commands();

    builder
        .global_command(
            CommandDef::new("echo", "Print text", |args, out| {
                out.line(args.string("text")?);
                Ok(())
            })
            .param(Param::string("text", "Text to print")),
        )
        .unwrap();

    builder
        .command(
            "/",
            CommandDef::new("cmd", "Sample command", |args, out| {
                out.line(format!(
                    "{} {}",
                    args.integer("mandatoryInt")?,
                    args.boolean("optionalFlag")?
                ));
                Ok(())
            })
            .param(Param::integer("mandatoryInt", "Some integer"))
            .param(Param::flag("optionalFlag", "Some flag")),
        )
        .unwrap();

    builder
        .command(
            "/",
            CommandDef::new("crash", "Fails unexpectedly", |_, out| {
                out.line("starting");
                Err(ExecuteError::unhandled("sensor offline"))
            }),
        )
        .unwrap();

    builder
        .command(
            "/",
            CommandDef::new("panic", "Panics", |_, _| panic!("index out of range")),
        )
        .unwrap();

    builder.directory("system", "System commands").unwrap();
    builder
        .command(
            "system",
            CommandDef::new("status", "Show system status", |_, out| {
                out.line("System OK");
                Ok(())
            }),
        )
        .unwrap();

    builder.directory("system/network", "Network commands").unwrap();
    builder
        .command(
            "system/network",
            CommandDef::new("ping", "Ping a host", |args, out| {
                out.line(format!(
                    "PING {} x{}",
                    args.string("host")?,
                    args.integer("count")?
                ));
                if args.boolean("verbose")? {
                    out.line("verbose");
                }
                Ok(())
            })
            .param(Param::string("host", "Host name"))
            .param(Param::integer("count", "Echo requests").optional(4))
            .param(Param::flag("verbose", "Print more")),
        )
        .unwrap();

    builder.directory("math", "Arithmetic").unwrap();
    builder
        .command(
            "math",
            CommandDef::new("add", "Add two integers", |args, out| {
                out.line(format!("{}", args.integer("a")? + args.integer("b")?));
                Ok(())
            })
            .params([
                Param::integer("a", "First operand"),
                Param::integer("b", "Second operand"),
            ]),
        )
        .unwrap();
    builder
        .command(
            "math",
            CommandDef::new("divide", "Divide two reals", |args, out| {
                let b = args.real("b")?;
                if b == 0.0 {
                    return Err(ExecuteError::failed("Division by zero"));
                }
                out.line(format!("{}", args.real("a")? / b));
                Ok(())
            })
            .params([Param::real("a", "Dividend"), Param::real("b", "Divisor")]),
        )
        .unwrap();
    builder
        .command(
            "math",
            CommandDef::new("random", "Print the seed in use", |args, out| {
                out.line(format!("seed {}", args.integer("seed")?));
                Ok(())
            })
            .param(Param::integer("seed", "Seed").optional_with(|| {
                SEED_CALLS.fetch_add(1, Ordering::SeqCst) as i64
            })),
        )
        .unwrap();

    builder.directory("config", "Settings").unwrap();
    builder
        .command(
            "config",
            CommandDef::new("level", "Set the log level", |args, out| {
                let level: Level = args.enumeration("level")?;
                out.line(format!("level {:?}", level));
                Ok(())
            })
            .param(Param::enumeration::<Level>("level", "New level"))
            .param(Param::boolean("persist", "Save to flash").optional(false)),
        )
        .unwrap();

    builder.build().unwrap()
}

/// Route `log` output through the test harness.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
