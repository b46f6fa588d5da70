//! Built-in global commands: `cd`, `ls`, `pwd`, `help` and `man`.
//!
//! Registered by `HierarchyBuilder::with_system_commands()`. The actions reach
//! the hierarchy they belong to through a [`HierarchyHandle`].

use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;

use crate::error::ExecuteError;
use crate::param::Param;
use crate::tree::builder::CommandDef;
use crate::tree::handle::HierarchyHandle;
use crate::tree::{DirectoryId, Hierarchy};

fn hierarchy(handle: &HierarchyHandle) -> Result<Arc<Hierarchy>, ExecuteError> {
    handle
        .get()
        .ok_or_else(|| ExecuteError::unhandled("hierarchy is not available"))
}

pub(crate) fn commands(handle: &HierarchyHandle) -> Vec<CommandDef> {
    vec![cd(handle), ls(handle), pwd(handle), help(handle), man(handle)]
}

fn cd(handle: &HierarchyHandle) -> CommandDef {
    let handle = handle.clone();
    CommandDef::new("cd", "Change the working directory", move |args, out| {
        let h = hierarchy(&handle)?;
        let target = args.directory("path")?;
        h.set_working_directory(target);
        out.line(h.path_of(target));
        Ok(())
    })
    .param(Param::directory("path", "Directory to change to"))
}

fn ls(handle: &HierarchyHandle) -> CommandDef {
    let action_handle = handle.clone();
    let default_handle = handle.clone();
    CommandDef::new("ls", "List a directory", move |args, out| {
        let h = hierarchy(&action_handle)?;
        let dir = args.directory("path")?;
        let view = h
            .directory_view(dir, args.boolean("recursive")?)
            .ok_or_else(|| ExecuteError::unhandled(format_args!("unknown {}", dir)))?;
        out.directory_view(view);
        Ok(())
    })
    .param(
        Param::directory("path", "Directory to list").optional_with(move || {
            default_handle
                .get()
                .map_or(DirectoryId::ROOT, |h| h.working_directory())
        }),
    )
    .param(Param::flag("recursive", "Expand subdirectories"))
}

fn pwd(handle: &HierarchyHandle) -> CommandDef {
    let handle = handle.clone();
    CommandDef::new("pwd", "Print the working directory", move |_, out| {
        let h = hierarchy(&handle)?;
        out.line(h.path_of(h.working_directory()));
        Ok(())
    })
}

fn help(handle: &HierarchyHandle) -> CommandDef {
    let handle = handle.clone();
    CommandDef::new("help", "List the global commands", move |_, out| {
        out.directory_view(hierarchy(&handle)?.globals_view());
        Ok(())
    })
}

fn man(handle: &HierarchyHandle) -> CommandDef {
    let handle = handle.clone();
    CommandDef::new("man", "Describe a command and its parameters", move |args, out| {
        let h = hierarchy(&handle)?;
        let id = args.command("command")?;
        let view = h
            .command_view(id)
            .ok_or_else(|| ExecuteError::unhandled(format_args!("unknown {}", id)))?;
        out.command_view(view);
        Ok(())
    })
    .param(Param::command("command", "Command to describe"))
}
