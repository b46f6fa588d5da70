//! Command hierarchy data structures.
//!
//! The hierarchy is an arena: directories and commands live in two vectors and
//! refer to each other by [`DirectoryId`] / [`CommandId`]. Every directory keeps
//! its child directories and commands in two [`Trie`]s, which gives lookup,
//! prefix completion and lexicographic listing from the same structure.
//!
//! A [`Hierarchy`] is assembled by [`builder::HierarchyBuilder`] and is immutable
//! afterwards except for the working directory, which is a single atomic cell.

use alloc::boxed::Box;
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;
use core::sync::atomic::{AtomicUsize, Ordering};

use crate::error::ExecuteError;
use crate::output::{CommandView, DirectoryView, OutputBuffer, ParamView};
use crate::param::{CommandArgs, DefaultValue, Param, Value};
use crate::trie::Trie;

// Sub-modules
pub mod builder;
pub mod completion;
pub mod handle;
pub mod path;

/// Action run when a command executes.
pub type Action =
    Box<dyn Fn(&CommandArgs, &mut OutputBuffer) -> Result<(), ExecuteError> + Send + Sync>;

/// Index of a directory in its hierarchy.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DirectoryId(pub(crate) usize);

impl DirectoryId {
    /// The root directory of every hierarchy.
    pub const ROOT: DirectoryId = DirectoryId(0);
}

impl fmt::Display for DirectoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "directory#{}", self.0)
    }
}

/// Index of a command in its hierarchy.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CommandId(pub(crate) usize);

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "command#{}", self.0)
    }
}

/// Resolved hierarchy entry (command or directory).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Node {
    /// Command entry
    Command(CommandId),

    /// Directory entry
    Directory(DirectoryId),
}

impl Node {
    /// Check if this node is a command.
    pub fn is_command(&self) -> bool {
        matches!(self, Node::Command(_))
    }

    /// Check if this node is a directory.
    pub fn is_directory(&self) -> bool {
        matches!(self, Node::Directory(_))
    }
}

/// Directory: a named container of directories and commands.
#[derive(Debug)]
pub struct Directory {
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) parent: Option<DirectoryId>,
    pub(crate) directories: Trie<DirectoryId>,
    pub(crate) commands: Trie<CommandId>,
}

impl Directory {
    /// Directory name (empty for the root).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Directory description (shown in ls and help)
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Parent directory, `None` for the root.
    pub fn parent(&self) -> Option<DirectoryId> {
        self.parent
    }

    /// Child directories by name.
    pub fn directories(&self) -> &Trie<DirectoryId> {
        &self.directories
    }

    /// Child commands by name.
    pub fn commands(&self) -> &Trie<CommandId> {
        &self.commands
    }

    /// Find a child directory by name.
    pub fn find_directory(&self, name: &str) -> Option<DirectoryId> {
        self.directories.get(name).copied()
    }

    /// Find a child command by name.
    pub fn find_command(&self, name: &str) -> Option<CommandId> {
        self.commands.get(name).copied()
    }
}

/// Command: a named action with declared parameters.
pub struct Command {
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) parent: Option<DirectoryId>,
    pub(crate) params: Vec<Param>,
    pub(crate) action: Action,
}

impl Command {
    /// Command name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Command description (shown in ls and help)
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Containing directory, `None` for global commands.
    pub fn parent(&self) -> Option<DirectoryId> {
        self.parent
    }

    /// True for commands reachable by bare name from anywhere.
    pub fn is_global(&self) -> bool {
        self.parent.is_none()
    }

    /// Declared parameters, in declaration order.
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Find a parameter by name.
    pub fn find_param(&self, name: &str) -> Option<&Param> {
        self.params.iter().find(|p| p.name() == name)
    }

    /// Run the action with bound arguments.
    pub fn execute(&self, args: &CommandArgs, output: &mut OutputBuffer) -> Result<(), ExecuteError> {
        (self.action)(args, output)
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("parent", &self.parent)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Immutable command hierarchy plus the shared working directory.
#[derive(Debug)]
pub struct Hierarchy {
    pub(crate) directories: Vec<Directory>,
    pub(crate) commands: Vec<Command>,
    pub(crate) globals: Trie<CommandId>,
    pub(crate) working_directory: AtomicUsize,
}

impl Hierarchy {
    /// Root directory id.
    pub fn root(&self) -> DirectoryId {
        DirectoryId::ROOT
    }

    /// Look up a directory by id.
    pub fn directory(&self, id: DirectoryId) -> Option<&Directory> {
        self.directories.get(id.0)
    }

    /// Look up a command by id.
    pub fn command(&self, id: CommandId) -> Option<&Command> {
        self.commands.get(id.0)
    }

    /// Global commands by name.
    pub fn globals(&self) -> &Trie<CommandId> {
        &self.globals
    }

    /// Number of directories, root included.
    pub fn directory_count(&self) -> usize {
        self.directories.len()
    }

    /// Number of commands, globals included.
    pub fn command_count(&self) -> usize {
        self.commands.len()
    }

    /// Current working directory.
    pub fn working_directory(&self) -> DirectoryId {
        DirectoryId(self.working_directory.load(Ordering::Acquire))
    }

    /// Change the working directory.
    ///
    /// Ids not belonging to this hierarchy are ignored.
    pub fn set_working_directory(&self, id: DirectoryId) {
        if id.0 >= self.directories.len() {
            log::warn!("ignoring working directory change to unknown {}", id);
            return;
        }
        self.working_directory.store(id.0, Ordering::Release);
        log::debug!("working directory is now {}", self.path_of(id));
    }

    // Ids handed out by this hierarchy always index its arenas.
    pub(crate) fn dir(&self, id: DirectoryId) -> &Directory {
        &self.directories[id.0]
    }

    pub(crate) fn cmd(&self, id: CommandId) -> &Command {
        &self.commands[id.0]
    }

    /// Absolute path of a directory: `/` for the root, `/a/b` otherwise.
    pub fn path_of(&self, id: DirectoryId) -> String {
        let mut names = Vec::new();
        let mut current = Some(id);
        while let Some(dir) = current.and_then(|id| self.directory(id)) {
            if dir.parent.is_some() {
                names.push(dir.name.as_str());
            }
            current = dir.parent;
        }

        if names.is_empty() {
            return "/".to_string();
        }
        names.iter().rev().fold(String::new(), |mut path, name| {
            path.push('/');
            path.push_str(name);
            path
        })
    }

    /// Path of a command: its bare name for globals, absolute otherwise.
    pub fn command_path(&self, id: CommandId) -> String {
        let Some(command) = self.command(id) else {
            return String::new();
        };
        match command.parent {
            None => command.name.clone(),
            Some(DirectoryId::ROOT) => format!("/{}", command.name),
            Some(parent) => format!("{}/{}", self.path_of(parent), command.name),
        }
    }

    /// Render a value for display, turning references into paths.
    pub fn render_value(&self, value: &Value) -> String {
        match value {
            Value::Directory(id) => self.path_of(*id),
            Value::Command(id) => self.command_path(*id),
            other => other.to_string(),
        }
    }

    /// Help view of one command, `None` for an id this hierarchy didn't issue.
    pub fn command_view(&self, id: CommandId) -> Option<CommandView> {
        let command = self.command(id)?;
        Some(CommandView {
            name: command.name.clone(),
            description: command.description.clone(),
            params: command.params.iter().map(|p| self.param_view(p)).collect(),
        })
    }

    fn param_view(&self, param: &Param) -> ParamView {
        let default = param.default_value().map(|default| match default {
            DefaultValue::Constant(value) => self.render_value(value),
            DefaultValue::Supplier(_) => "<computed>".to_string(),
        });
        ParamView {
            name: param.name().to_string(),
            description: param.description().to_string(),
            kind: param.kind().label(),
            optional: param.is_optional(),
            default,
        }
    }

    /// Listing of a directory. Child directories are expanded only when
    /// `recursive` is set.
    ///
    /// `None` for an id this hierarchy didn't issue.
    pub fn directory_view(&self, id: DirectoryId, recursive: bool) -> Option<DirectoryView> {
        let dir = self.directory(id)?;
        let directories = dir
            .directories
            .values()
            .into_iter()
            .filter_map(|child| {
                if recursive {
                    self.directory_view(*child, true)
                } else {
                    self.shallow_view(*child)
                }
            })
            .collect();

        Some(DirectoryView {
            name: self.path_of(id),
            description: dir.description.clone(),
            directories,
            commands: self.command_views(dir.commands.values()),
        })
    }

    fn shallow_view(&self, id: DirectoryId) -> Option<DirectoryView> {
        let dir = self.directory(id)?;
        Some(DirectoryView {
            name: dir.name.clone(),
            description: dir.description.clone(),
            directories: Vec::new(),
            commands: Vec::new(),
        })
    }

    fn command_views(&self, ids: Vec<&CommandId>) -> Vec<CommandView> {
        ids.into_iter().filter_map(|id| self.command_view(*id)).collect()
    }

    /// Listing of the global commands.
    pub fn globals_view(&self) -> DirectoryView {
        DirectoryView {
            name: "global".to_string(),
            description: "Commands available from every directory".to_string(),
            directories: Vec::new(),
            commands: self.command_views(self.globals.values()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::builder::{CommandDef, HierarchyBuilder};

    fn noop() -> CommandDef {
        CommandDef::new("noop", "does nothing", |_, _| Ok(()))
    }

    fn sample() -> alloc::sync::Arc<Hierarchy> {
        let mut builder = HierarchyBuilder::new();
        builder.directory("system/network", "Network settings").unwrap();
        builder
            .command("system", CommandDef::new("reboot", "Reboot", |_, _| Ok(())))
            .unwrap();
        builder.command("system/network", noop()).unwrap();
        builder.global_command(CommandDef::new("help", "Help", |_, _| Ok(()))).unwrap();
        builder.build().unwrap()
    }

    #[test]
    fn test_hierarchy_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Hierarchy>();
    }

    #[test]
    fn test_path_of() {
        let h = sample();
        assert_eq!(h.path_of(DirectoryId::ROOT), "/");

        let system = h.dir(DirectoryId::ROOT).find_directory("system").unwrap();
        let network = h.dir(system).find_directory("network").unwrap();
        assert_eq!(h.path_of(system), "/system");
        assert_eq!(h.path_of(network), "/system/network");
        assert_eq!(h.dir(network).parent(), Some(system));
    }

    #[test]
    fn test_command_path() {
        let h = sample();
        let system = h.dir(DirectoryId::ROOT).find_directory("system").unwrap();
        let reboot = h.dir(system).find_command("reboot").unwrap();
        assert_eq!(h.command_path(reboot), "/system/reboot");

        let help = *h.globals().get("help").unwrap();
        assert_eq!(h.command_path(help), "help");
        assert!(h.cmd(help).is_global());
    }

    #[test]
    fn test_working_directory() {
        let h = sample();
        assert_eq!(h.working_directory(), DirectoryId::ROOT);

        let system = h.dir(DirectoryId::ROOT).find_directory("system").unwrap();
        h.set_working_directory(system);
        assert_eq!(h.working_directory(), system);

        h.set_working_directory(DirectoryId(999));
        assert_eq!(h.working_directory(), system);
    }

    #[test]
    fn test_directory_view() {
        let h = sample();
        let shallow = h.directory_view(DirectoryId::ROOT, false).unwrap();
        assert_eq!(shallow.name, "/");
        assert_eq!(shallow.directories.len(), 1);
        assert!(shallow.directories[0].directories.is_empty());

        let deep = h.directory_view(DirectoryId::ROOT, true).unwrap();
        let system = &deep.directories[0];
        assert_eq!(system.commands[0].name, "reboot");
        assert_eq!(system.directories[0].name, "/system/network");
        assert_eq!(system.directories[0].commands[0].name, "noop");
    }

    #[test]
    fn test_command_view_renders_defaults() {
        let mut builder = HierarchyBuilder::new();
        builder
            .command(
                "/",
                CommandDef::new("run", "Run", |_, _| Ok(()))
                    .param(Param::integer("count", "How many").optional(3))
                    .param(Param::flag("dry", "Dry run"))
                    .param(Param::string("label", "Label").optional_with(|| "x")),
            )
            .unwrap();
        let h = builder.build().unwrap();
        let run = h.dir(DirectoryId::ROOT).find_command("run").unwrap();

        let view = h.command_view(run).unwrap();
        assert_eq!(view.params.len(), 3);
        assert_eq!(view.params[0].kind, "integer");
        assert_eq!(view.params[0].default.as_deref(), Some("3"));
        assert_eq!(view.params[1].default.as_deref(), Some("false"));
        assert_eq!(view.params[2].default.as_deref(), Some("<computed>"));
    }

    #[test]
    fn test_views_of_foreign_ids() {
        let h = sample();
        assert!(h.directory_view(DirectoryId(h.directory_count()), false).is_none());
        assert!(h.command_view(CommandId(h.command_count())).is_none());
    }
}
