//! Path parsing and resolution.
//!
//! Provides Unix-style path resolution with support for absolute and relative paths,
//! parent navigation (`..`), and current directory (`.`).
//!
//! A single leading delimiter makes a path absolute and a single trailing
//! delimiter is ignored. Any other empty segment (`a//b`) is an error.
//!
//! # Example
//!
//! ```rust
//! use trie_shell::tree::path::{Path, Segment};
//!
//! let path = Path::parse("/system/reboot").unwrap();
//! assert!(path.is_absolute());
//! assert_eq!(path.segments(), &[Segment::Name("system"), Segment::Name("reboot")]);
//!
//! let path = Path::parse("../network/").unwrap();
//! assert!(!path.is_absolute());
//! assert_eq!(path.segments(), &[Segment::Parent, Segment::Name("network")]);
//! ```

use alloc::string::ToString;

use crate::error::PathError;
use crate::tree::{CommandId, DirectoryId, Hierarchy, Node};

/// Maximum number of segments in one path.
pub const MAX_PATH_DEPTH: usize = 16;

/// Path delimiter
pub const DELIMITER: char = '/';

/// Segment naming the current directory
pub const THIS: &str = ".";

/// Segment naming the parent directory
pub const PARENT: &str = "..";

/// One path segment.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    /// `.`
    This,

    /// `..`
    Parent,

    /// Child directory (or, last in a command path, command) name
    Name(&'a str),
}

/// Parsed path.
///
/// Zero-allocation: segments borrow from the input string.
#[derive(Debug, PartialEq)]
pub struct Path<'a> {
    /// Original path string
    original: &'a str,

    /// Whether this is an absolute path (starts with `/`)
    is_absolute: bool,

    /// Path segments, `.` and `..` included
    segments: heapless::Vec<Segment<'a>, MAX_PATH_DEPTH>,
}

impl<'a> Path<'a> {
    /// Parse a path string.
    ///
    /// # Returns
    ///
    /// - `Ok(Path)` - Successfully parsed (`/` alone has no segments)
    /// - `Err(PathError::InvalidPath)` - Empty path or empty segment
    /// - `Err(PathError::PathTooDeep)` - Exceeds MAX_PATH_DEPTH
    pub fn parse(input: &'a str) -> Result<Self, PathError> {
        let invalid = || PathError::InvalidPath {
            path: input.to_string(),
        };

        if input.is_empty() {
            return Err(invalid());
        }

        let is_absolute = input.starts_with(DELIMITER);
        let mut body = input.strip_prefix(DELIMITER).unwrap_or(input);

        let mut segments = heapless::Vec::new();

        // "/" is the root
        if body.is_empty() {
            return Ok(Self {
                original: input,
                is_absolute,
                segments,
            });
        }

        body = body.strip_suffix(DELIMITER).unwrap_or(body);
        if body.is_empty() {
            return Err(invalid());
        }

        for raw in body.split(DELIMITER) {
            let segment = match raw {
                "" => return Err(invalid()),
                THIS => Segment::This,
                PARENT => Segment::Parent,
                name => Segment::Name(name),
            };
            segments
                .push(segment)
                .map_err(|_| PathError::PathTooDeep { max: MAX_PATH_DEPTH })?;
        }

        Ok(Self {
            original: input,
            is_absolute,
            segments,
        })
    }

    /// The string this path was parsed from.
    pub fn original(&self) -> &'a str {
        self.original
    }

    /// Check if this is an absolute path (starts with `/`).
    pub fn is_absolute(&self) -> bool {
        self.is_absolute
    }

    /// Path segments, in order.
    pub fn segments(&self) -> &[Segment<'a>] {
        &self.segments
    }

    /// Get number of segments in path.
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }
}

impl Hierarchy {
    /// Resolve a directory path against the working directory.
    pub fn resolve_directory(&self, raw: &str) -> Result<DirectoryId, PathError> {
        let path = Path::parse(raw)?;
        let start = if path.is_absolute() {
            DirectoryId::ROOT
        } else {
            self.working_directory()
        };
        self.walk(start, path.segments())
    }

    /// Resolve a command path.
    ///
    /// A bare name is looked up among the global commands first, then in the
    /// working directory. Otherwise everything up to the last delimiter is
    /// resolved as a directory and the remainder names a command in it.
    pub fn resolve_command(&self, raw: &str) -> Result<CommandId, PathError> {
        if raw.is_empty() {
            return Err(PathError::InvalidPath {
                path: raw.to_string(),
            });
        }

        let (scope, name) = match raw.rfind(DELIMITER) {
            None => {
                if let Some(id) = self.globals.get(raw) {
                    return Ok(*id);
                }
                (self.working_directory(), raw)
            }
            Some(idx) if idx + 1 == raw.len() => {
                return Err(PathError::InvalidCommandPath {
                    path: raw.to_string(),
                });
            }
            Some(idx) => (self.resolve_directory(&raw[..=idx])?, &raw[idx + 1..]),
        };

        self.dir(scope)
            .find_command(name)
            .ok_or_else(|| PathError::UnknownCommand {
                scope: self.path_of(scope),
                name: name.to_string(),
            })
    }

    /// Resolve a path to either a command or a directory.
    ///
    /// Paths ending with the delimiter or in `.`/`..` only denote directories.
    /// Otherwise a command wins over a directory failure.
    pub fn resolve(&self, raw: &str) -> Result<Node, PathError> {
        let last = raw.rsplit(DELIMITER).next().unwrap_or(raw);
        if raw.ends_with(DELIMITER) || last == THIS || last == PARENT {
            return self.resolve_directory(raw).map(Node::Directory);
        }

        match self.resolve_command(raw) {
            Ok(id) => Ok(Node::Command(id)),
            Err(command_error) => self
                .resolve_directory(raw)
                .map(Node::Directory)
                .map_err(|_| command_error),
        }
    }

    /// Walk segments from `start`.
    pub(crate) fn walk(
        &self,
        start: DirectoryId,
        segments: &[Segment<'_>],
    ) -> Result<DirectoryId, PathError> {
        let mut current = start;
        for segment in segments {
            current = match segment {
                Segment::This => current,
                Segment::Parent => self.dir(current).parent.ok_or_else(|| PathError::NoParent {
                    directory: self.path_of(current),
                })?,
                Segment::Name(name) => {
                    self.dir(current)
                        .find_directory(name)
                        .ok_or_else(|| PathError::UnknownDirectory {
                            scope: self.path_of(current),
                            name: name.to_string(),
                        })?
                }
            };
        }
        Ok(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::builder::{CommandDef, HierarchyBuilder};
    use alloc::string::String;
    use alloc::sync::Arc;

    fn invalid(path: &str) -> PathError {
        PathError::InvalidPath {
            path: path.to_string(),
        }
    }

    fn sample() -> Arc<Hierarchy> {
        let mut builder = HierarchyBuilder::new();
        builder.directory("a/b", "").unwrap();
        builder.directory("a/c", "").unwrap();
        builder
            .command("a", CommandDef::new("run", "", |_, _| Ok(())))
            .unwrap();
        builder
            .command("a/b", CommandDef::new("deep", "", |_, _| Ok(())))
            .unwrap();
        builder
            .global_command(CommandDef::new("help", "", |_, _| Ok(())))
            .unwrap();
        builder.build().unwrap()
    }

    fn dir(h: &Hierarchy, path: &str) -> DirectoryId {
        h.resolve_directory(path).unwrap()
    }

    #[test]
    fn test_empty_path_is_invalid() {
        assert_eq!(Path::parse(""), Err(invalid("")));
    }

    #[test]
    fn test_absolute_root() {
        let path = Path::parse("/").unwrap();
        assert!(path.is_absolute());
        assert_eq!(path.segment_count(), 0);
    }

    #[test]
    fn test_segments() {
        let path = Path::parse("../system/./network").unwrap();
        assert!(!path.is_absolute());
        assert_eq!(
            path.segments(),
            &[
                Segment::Parent,
                Segment::Name("system"),
                Segment::This,
                Segment::Name("network")
            ]
        );
        assert_eq!(path.original(), "../system/./network");
    }

    #[test]
    fn test_single_trailing_slash_ignored() {
        let path = Path::parse("/system/").unwrap();
        assert_eq!(path.segments(), &[Segment::Name("system")]);

        let path = Path::parse("network/").unwrap();
        assert_eq!(path.segments(), &[Segment::Name("network")]);
    }

    #[test]
    fn test_empty_segments_rejected() {
        assert_eq!(Path::parse("a//b"), Err(invalid("a//b")));
        assert_eq!(Path::parse("//a"), Err(invalid("//a")));
        assert_eq!(Path::parse("a//"), Err(invalid("a//")));
        assert_eq!(Path::parse("//"), Err(invalid("//")));
    }

    #[test]
    fn test_path_too_deep() {
        let mut deep = String::new();
        for _ in 0..MAX_PATH_DEPTH {
            deep.push_str("d/");
        }
        assert_eq!(Path::parse(&deep).unwrap().segment_count(), MAX_PATH_DEPTH);

        deep.push('d');
        assert_eq!(
            Path::parse(&deep),
            Err(PathError::PathTooDeep { max: MAX_PATH_DEPTH })
        );
    }

    #[test]
    fn test_resolve_root_and_navigation() {
        let h = sample();
        assert_eq!(dir(&h, "/"), DirectoryId::ROOT);

        let a = dir(&h, "a");
        assert_eq!(dir(&h, "a/b/.."), a);
        assert_eq!(dir(&h, "a/."), a);
        assert_eq!(dir(&h, "/a/"), a);
        assert_eq!(dir(&h, "."), DirectoryId::ROOT);
    }

    #[test]
    fn test_resolve_relative_to_working_directory() {
        let h = sample();
        let a = dir(&h, "a");
        h.set_working_directory(a);

        assert_eq!(h.path_of(dir(&h, "b")), "/a/b");
        assert_eq!(dir(&h, ".."), DirectoryId::ROOT);
        assert_eq!(h.path_of(dir(&h, "/a/c")), "/a/c");
    }

    #[test]
    fn test_resolve_directory_errors() {
        let h = sample();
        assert_eq!(
            h.resolve_directory(".."),
            Err(PathError::NoParent {
                directory: "/".to_string()
            })
        );
        assert_eq!(
            h.resolve_directory("a/x"),
            Err(PathError::UnknownDirectory {
                scope: "/a".to_string(),
                name: "x".to_string()
            })
        );
        assert_eq!(h.resolve_directory("a//b"), Err(invalid("a//b")));
        assert_eq!(h.resolve_directory(""), Err(invalid("")));
    }

    #[test]
    fn test_resolve_command() {
        let h = sample();
        let run = h.resolve_command("a/run").unwrap();
        assert_eq!(h.command_path(run), "/a/run");
        assert_eq!(h.resolve_command("/a/b/deep"), h.resolve_command("a/b/../b/deep"));

        h.set_working_directory(dir(&h, "a"));
        assert_eq!(h.resolve_command("run"), Ok(run));
    }

    #[test]
    fn test_resolve_command_prefers_globals() {
        let h = sample();
        h.set_working_directory(dir(&h, "a/b"));
        let help = h.resolve_command("help").unwrap();
        assert!(h.cmd(help).is_global());
    }

    #[test]
    fn test_resolve_command_errors() {
        let h = sample();
        assert_eq!(
            h.resolve_command("a/"),
            Err(PathError::InvalidCommandPath {
                path: "a/".to_string()
            })
        );
        assert_eq!(
            h.resolve_command("a/missing"),
            Err(PathError::UnknownCommand {
                scope: "/a".to_string(),
                name: "missing".to_string()
            })
        );
        assert_eq!(
            h.resolve_command("x/run"),
            Err(PathError::UnknownDirectory {
                scope: "/".to_string(),
                name: "x".to_string()
            })
        );
        assert_eq!(h.resolve_command(""), Err(invalid("")));
    }

    #[test]
    fn test_resolve_either() {
        let h = sample();
        assert!(h.resolve("a/run").unwrap().is_command());
        assert!(h.resolve("a/b").unwrap().is_directory());
        assert!(h.resolve("a/b/..").unwrap().is_directory());
        assert_eq!(
            h.resolve("a/nothing"),
            Err(PathError::UnknownCommand {
                scope: "/a".to_string(),
                name: "nothing".to_string()
            })
        );
    }
}
