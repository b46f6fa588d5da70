//! # trie-shell
//!
//! Embeddable interactive command engine with trie-based autocompletion.
//!
//! **Key features:**
//! - **Hierarchical commands** - Directories and commands addressed by Unix-style paths
//! - **Typed parameters** - Strings, enums, numbers, booleans, flags, path references
//! - **Flexible binding** - Positional, `name=value` and flag tokens, with lazy defaults
//! - **Autocompletion** - Paths, parameter names and values, all backed by tries
//! - **Pluggable output** - Everything is displayed through an `OutputSink` trait
//!
//! ## Example
//!
//! ```rust
//! use trie_shell::{CommandDef, HierarchyBuilder, LineOutcome, Param, Shell};
//! # use trie_shell::{CommandView, DirectoryView, OutputSink, ParseError, Suggestions};
//! # #[derive(Default)]
//! # struct Lines(Vec<String>);
//! # impl OutputSink for Lines {
//! #     type Error = ();
//! #     fn welcome(&mut self, _: &str) -> Result<(), ()> { Ok(()) }
//! #     fn blank_line(&mut self) -> Result<(), ()> { Ok(()) }
//! #     fn line(&mut self, text: &str) -> Result<(), ()> { self.0.push(text.into()); Ok(()) }
//! #     fn suggestions(&mut self, _: &Suggestions) -> Result<(), ()> { Ok(()) }
//! #     fn directory_view(&mut self, _: &DirectoryView) -> Result<(), ()> { Ok(()) }
//! #     fn command_view(&mut self, _: &CommandView) -> Result<(), ()> { Ok(()) }
//! #     fn parse_error(&mut self, _: &ParseError) -> Result<(), ()> { Ok(()) }
//! #     fn autocomplete_not_possible(&mut self, _: &str) -> Result<(), ()> { Ok(()) }
//! #     fn execution_error(&mut self, _: &str, _: &str) -> Result<(), ()> { Ok(()) }
//! #     fn unhandled_error(&mut self, _: &str, _: &str) -> Result<(), ()> { Ok(()) }
//! # }
//!
//! let mut builder = HierarchyBuilder::with_system_commands();
//! builder
//!     .command(
//!         "math",
//!         CommandDef::new("add", "Add two integers", |args, out| {
//!             let sum = args.integer("a")? + args.integer("b")?;
//!             out.line(format!("{}", sum));
//!             Ok(())
//!         })
//!         .param(Param::integer("a", "First operand"))
//!         .param(Param::integer("b", "Second operand")),
//!     )
//!     .unwrap();
//!
//! let mut shell: Shell<Lines> = Shell::new(builder.build().unwrap(), Lines::default());
//! assert!(matches!(shell.execute("math/add 2 b=3"), Ok(LineOutcome::Executed(_))));
//! assert_eq!(shell.sink().0, vec!["5".to_string()]);
//! assert_eq!(shell.autocomplete("math/a").unwrap().as_deref(), Some("math/add "));
//! ```
//!
//! ## Optional Features
//!
//! - `std` (default) - Panics raised by command actions are caught and reported
//!   as unhandled failures
//!
//! The library provides a `#[derive(ParamEnum)]` macro that's always available.
//!
//! This library is `no_std` compatible (it needs `alloc`).

#![no_std]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![allow(clippy::result_large_err)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

// Re-export derive macro (always available)
pub use trie_shell_macros::ParamEnum;

// ============================================================================
// Module Declarations
// ============================================================================

pub mod config;
pub mod error;
pub mod io;
pub mod output;
pub mod param;
pub mod shell;
pub mod tree;
pub mod trie;

// ============================================================================
// Re-exports - Public API
// ============================================================================

// Output
pub use io::OutputSink;
pub use output::{CommandView, DirectoryView, OutputBuffer, OutputEntry, ParamView};

// Configuration
pub use config::{DefaultConfig, MinimalConfig, RebindPolicy, ShellConfig};

// Error types
pub use error::{ArgumentError, BuildError, ExecuteError, ParseError, PathError};

// Parameters
pub use param::{CommandArgs, DefaultValue, Param, ParamKind, Value};

// Hierarchy
pub use tree::builder::{CommandDef, HierarchyBuilder};
pub use tree::completion::{AutoComplete, AutoCompleteOutcome, CompletionKind, Suggestions};
pub use tree::handle::HierarchyHandle;
pub use tree::{Command, CommandId, Directory, DirectoryId, Hierarchy, Node};

// Shell
pub use shell::{ExecutionOutcome, LineOutcome, Shell};

// Trie
pub use trie::Trie;

// ============================================================================
// Library Metadata
// ============================================================================

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
