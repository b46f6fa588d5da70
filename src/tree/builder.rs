//! Hierarchy construction.
//!
//! [`HierarchyBuilder`] collects directories, commands and global commands,
//! validates them, and freezes the result into an [`Arc<Hierarchy>`].
//!
//! # Example
//!
//! ```rust
//! use trie_shell::param::Param;
//! use trie_shell::tree::builder::{CommandDef, HierarchyBuilder};
//!
//! let mut builder = HierarchyBuilder::new();
//! builder.directory("system", "System commands").unwrap();
//! builder
//!     .command(
//!         "system",
//!         CommandDef::new("echo", "Print a message", |args, out| {
//!             out.line(args.string("message")?);
//!             Ok(())
//!         })
//!         .param(Param::string("message", "Text to print")),
//!     )
//!     .unwrap();
//!
//! let hierarchy = builder.build().unwrap();
//! assert!(hierarchy.resolve_command("/system/echo").is_ok());
//! ```

use alloc::borrow::ToOwned;
use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;
use core::sync::atomic::AtomicUsize;

use crate::error::{BuildError, ExecuteError};
use crate::output::OutputBuffer;
use crate::param::{CommandArgs, DefaultValue, Param, Value};
use crate::tree::handle::HierarchyHandle;
use crate::tree::path::{DELIMITER, PARENT, THIS};
use crate::tree::{Action, Command, CommandId, Directory, DirectoryId, Hierarchy};
use crate::trie::Trie;

/// Scope name used in errors about global commands.
const GLOBAL_SCOPE: &str = "global";

/// Command definition: name, description, parameters and action.
pub struct CommandDef {
    name: String,
    description: String,
    params: Vec<Param>,
    action: Action,
}

impl CommandDef {
    /// Command without parameters.
    pub fn new<F>(name: &str, description: &str, action: F) -> Self
    where
        F: Fn(&CommandArgs, &mut OutputBuffer) -> Result<(), ExecuteError> + Send + Sync + 'static,
    {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            params: Vec::new(),
            action: Box::new(action),
        }
    }

    /// Append a parameter.
    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    /// Append several parameters.
    pub fn params<I: IntoIterator<Item = Param>>(mut self, params: I) -> Self {
        self.params.extend(params);
        self
    }

    /// Command name
    pub fn name(&self) -> &str {
        &self.name
    }

    fn into_command(self, parent: Option<DirectoryId>) -> Command {
        Command {
            name: self.name,
            description: self.description,
            parent,
            params: self.params,
            action: self.action,
        }
    }
}

impl fmt::Debug for CommandDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDef")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Default)]
struct PendingDirectory {
    description: String,
    directories: BTreeMap<String, PendingDirectory>,
    commands: BTreeMap<String, CommandDef>,
}

impl PendingDirectory {
    fn has_entry(&self, name: &str) -> bool {
        self.directories.contains_key(name) || self.commands.contains_key(name)
    }

    /// Path of the first directory (depth first) holding an entry named `name`.
    fn find_entry(&self, name: &str, path: &str) -> Option<String> {
        if self.has_entry(name) {
            return Some(display_path(path));
        }
        self.directories.iter().find_map(|(child, dir)| {
            let mut child_path = path.to_owned();
            child_path.push(DELIMITER);
            child_path.push_str(child);
            dir.find_entry(name, &child_path)
        })
    }
}

fn display_path(path: &str) -> String {
    if path.is_empty() {
        "/".to_string()
    } else {
        path.to_string()
    }
}

/// Reject names that couldn't be typed back as a path segment or argument.
fn validate_name(name: &str) -> Result<(), BuildError> {
    let malformed = name.is_empty()
        || name == THIS
        || name == PARENT
        || name.contains(|c: char| c == DELIMITER || c == '=' || c.is_whitespace());
    if malformed {
        return Err(BuildError::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(())
}

fn validate_command(def: &CommandDef) -> Result<(), BuildError> {
    validate_name(&def.name)?;

    for (i, param) in def.params.iter().enumerate() {
        validate_name(param.name())?;

        if def.params[..i].iter().any(|p| p.name() == param.name()) {
            return Err(BuildError::DuplicateParameter {
                command: def.name.clone(),
                param: param.name().to_string(),
            });
        }

        if let Some(DefaultValue::Constant(Value::Directory(_) | Value::Command(_))) =
            param.default_value()
        {
            return Err(BuildError::ConstantReferenceDefault {
                command: def.name.clone(),
                param: param.name().to_string(),
            });
        }

        if let Some(DefaultValue::Constant(value)) = param.default_value()
            && !param.accepts(value)
        {
            return Err(BuildError::DefaultKindMismatch {
                command: def.name.clone(),
                param: param.name().to_string(),
            });
        }
    }
    Ok(())
}

/// Builder for [`Hierarchy`].
#[derive(Debug, Default)]
pub struct HierarchyBuilder {
    root: PendingDirectory,
    globals: BTreeMap<String, CommandDef>,
    handle: HierarchyHandle,
}

impl HierarchyBuilder {
    /// Empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pre-loaded with the `cd`, `ls`, `pwd`, `help` and `man` global commands.
    pub fn with_system_commands() -> Self {
        let mut builder = Self::new();
        for def in crate::shell::system::commands(&builder.handle) {
            builder.globals.insert(def.name.clone(), def);
        }
        builder
    }

    /// Handle that resolves to the built hierarchy once `build()` succeeds.
    pub fn handle(&self) -> HierarchyHandle {
        self.handle.clone()
    }

    /// Create a directory (and any missing ancestors) and set its description.
    ///
    /// Paths are relative to the root; `/` or an empty path names the root.
    pub fn directory(&mut self, path: &str, description: &str) -> Result<&mut Self, BuildError> {
        let (dir, _) = self.ensure_directory(path)?;
        dir.description = description.to_string();
        Ok(self)
    }

    /// Add a command to the directory at `path`, creating it if needed.
    pub fn command(&mut self, path: &str, def: CommandDef) -> Result<&mut Self, BuildError> {
        validate_command(&def)?;

        let (dir, scope) = self.ensure_directory(path)?;
        if dir.has_entry(&def.name) {
            return Err(BuildError::DuplicateEntry {
                directory: scope,
                name: def.name,
            });
        }
        dir.commands.insert(def.name.clone(), def);
        Ok(self)
    }

    /// Add a command reachable by bare name from every directory.
    pub fn global_command(&mut self, def: CommandDef) -> Result<&mut Self, BuildError> {
        validate_command(&def)?;

        if self.globals.contains_key(&def.name) {
            return Err(BuildError::DuplicateEntry {
                directory: GLOBAL_SCOPE.to_string(),
                name: def.name,
            });
        }
        self.globals.insert(def.name.clone(), def);
        Ok(self)
    }

    fn ensure_directory(&mut self, path: &str) -> Result<(&mut PendingDirectory, String), BuildError> {
        let trimmed = path.trim_matches(DELIMITER);
        let mut current = &mut self.root;
        let mut walked = String::new();
        if trimmed.is_empty() {
            return Ok((current, display_path(&walked)));
        }

        for name in trimmed.split(DELIMITER) {
            validate_name(name)?;
            if current.commands.contains_key(name) {
                return Err(BuildError::DuplicateEntry {
                    directory: display_path(&walked),
                    name: name.to_string(),
                });
            }
            current = current.directories.entry(name.to_string()).or_default();
            walked.push(DELIMITER);
            walked.push_str(name);
        }
        Ok((current, walked))
    }

    /// Validate global names and freeze the hierarchy.
    ///
    /// Binds the builder's [`HierarchyHandle`].
    pub fn build(self) -> Result<Arc<Hierarchy>, BuildError> {
        for name in self.globals.keys() {
            if let Some(directory) = self.root.find_entry(name, "") {
                return Err(BuildError::GlobalCollision {
                    name: name.clone(),
                    directory,
                });
            }
        }

        let mut directories = Vec::new();
        let mut commands = Vec::new();
        let mut globals = Trie::new();
        for (name, def) in self.globals {
            globals.insert(&name, CommandId(commands.len()));
            commands.push(def.into_command(None));
        }
        flatten(&mut directories, &mut commands, self.root, String::new(), None);

        let hierarchy = Arc::new(Hierarchy {
            directories,
            commands,
            globals,
            working_directory: AtomicUsize::new(DirectoryId::ROOT.0),
        });
        self.handle.bind(&hierarchy)?;

        log::info!(
            "hierarchy built: {} directories, {} commands ({} global)",
            hierarchy.directory_count(),
            hierarchy.command_count(),
            hierarchy.globals.len()
        );
        Ok(hierarchy)
    }
}

fn flatten(
    directories: &mut Vec<Directory>,
    commands: &mut Vec<Command>,
    pending: PendingDirectory,
    name: String,
    parent: Option<DirectoryId>,
) -> DirectoryId {
    let id = DirectoryId(directories.len());
    directories.push(Directory {
        name,
        description: pending.description,
        parent,
        directories: Trie::new(),
        commands: Trie::new(),
    });

    for (command_name, def) in pending.commands {
        let command_id = CommandId(commands.len());
        commands.push(def.into_command(Some(id)));
        directories[id.0].commands.insert(&command_name, command_id);
    }

    for (child_name, child) in pending.directories {
        let child_id = flatten(directories, commands, child, child_name.clone(), Some(id));
        directories[id.0].directories.insert(&child_name, child_id);
    }

    id
}
