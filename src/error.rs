//! Error types for hierarchy construction, parsing and execution.
//!
//! Parsing and resolution errors ([`PathError`], [`ArgumentError`], wrapped
//! in [`ParseError`]) are always recovered by the shell and reported through
//! the output sink. [`ExecuteError`] is what command actions return.
//! [`BuildError`] only ever comes out of the hierarchy builder.
//!
//! Every variant carries the offending token or name so a message can be
//! rendered without re-parsing.

use alloc::string::String;
use core::fmt;

/// Path resolution failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// Empty path or an empty segment (e.g. `a//b`)
    InvalidPath {
        /// The raw path as typed
        path: String,
    },

    /// A segment named a directory that doesn't exist
    UnknownDirectory {
        /// Absolute path of the directory that was searched
        scope: String,
        /// The missing directory name
        name: String,
    },

    /// The final segment named a command that doesn't exist
    UnknownCommand {
        /// Absolute path of the directory that was searched
        scope: String,
        /// The missing command name
        name: String,
    },

    /// `..` used at the root
    NoParent {
        /// Name of the directory without a parent
        directory: String,
    },

    /// Path ends with a delimiter, so it can't denote a command
    InvalidCommandPath {
        /// The raw path as typed
        path: String,
    },

    /// Path has more segments than `MAX_PATH_DEPTH`
    PathTooDeep {
        /// Maximum supported segment count
        max: usize,
    },
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathError::InvalidPath { path } => write!(f, "Invalid path: '{}'", path),
            PathError::UnknownDirectory { scope, name } => {
                write!(f, "Directory '{}' doesn't contain directory: '{}'", scope, name)
            }
            PathError::UnknownCommand { scope, name } => {
                write!(f, "Directory '{}' doesn't contain command: '{}'", scope, name)
            }
            PathError::NoParent { directory } => {
                write!(f, "Directory '{}' doesn't have a parent", directory)
            }
            PathError::InvalidCommandPath { path } => {
                write!(f, "Path doesn't point to a command: '{}'", path)
            }
            PathError::PathTooDeep { max } => {
                write!(f, "Path too deep (at most {} segments)", max)
            }
        }
    }
}

impl core::error::Error for PathError {}

/// Argument binding or validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgumentError {
    /// Value text rejected by the parameter's kind
    InvalidValue {
        /// Parameter name
        param: String,
        /// Offending value text
        value: String,
        /// What the parameter accepts (e.g. "integer")
        expected: String,
    },

    /// A mandatory parameter was never bound
    MissingMandatoryParameter {
        /// Parameter name
        param: String,
    },

    /// `name=value` used a name the command doesn't declare
    UnknownParameterName {
        /// Command name
        command: String,
        /// The unknown parameter name
        name: String,
    },

    /// Parameter bound twice under the reject policy
    AmbiguousBinding {
        /// Parameter name
        param: String,
        /// Value from the first binding
        first: String,
        /// Value from the rejected binding
        second: String,
    },

    /// Bare token with no unbound mandatory parameter left to take it
    UnexpectedArgument {
        /// Command name
        command: String,
        /// The surplus token
        token: String,
    },
}

impl fmt::Display for ArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgumentError::InvalidValue {
                param,
                value,
                expected,
            } => write!(
                f,
                "Invalid value for parameter '{}': '{}' (expected {})",
                param, value, expected
            ),
            ArgumentError::MissingMandatoryParameter { param } => {
                write!(f, "Missing mandatory parameter: '{}'", param)
            }
            ArgumentError::UnknownParameterName { command, name } => {
                write!(f, "Command '{}' has no parameter named '{}'", command, name)
            }
            ArgumentError::AmbiguousBinding {
                param,
                first,
                second,
            } => write!(
                f,
                "Parameter '{}' bound more than once: '{}' and '{}'",
                param, first, second
            ),
            ArgumentError::UnexpectedArgument { command, token } => {
                write!(f, "Unexpected argument for command '{}': '{}'", command, token)
            }
        }
    }
}

impl core::error::Error for ArgumentError {}

/// Any failure while turning a command line into a bound command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Path resolution failed
    Path(PathError),

    /// Argument binding or validation failed
    Argument(ArgumentError),

    /// Line longer than `ShellConfig::MAX_INPUT`
    InputTooLong {
        /// Maximum accepted length in bytes
        max: usize,
    },
}

impl From<PathError> for ParseError {
    fn from(error: PathError) -> Self {
        ParseError::Path(error)
    }
}

impl From<ArgumentError> for ParseError {
    fn from(error: ArgumentError) -> Self {
        ParseError::Argument(error)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Path(e) => write!(f, "{}", e),
            ParseError::Argument(e) => write!(f, "{}", e),
            ParseError::InputTooLong { max } => {
                write!(f, "Command line too long (at most {} bytes)", max)
            }
        }
    }
}

impl core::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            ParseError::Path(e) => Some(e),
            ParseError::Argument(e) => Some(e),
            ParseError::InputTooLong { .. } => None,
        }
    }
}

/// Failure returned by a command action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecuteError {
    /// Deliberate, user-facing failure
    Failed(String),

    /// Unexpected condition inside the action (host diagnostic detail)
    Unhandled(String),
}

impl ExecuteError {
    /// Declared failure with a user-facing message.
    pub fn failed(message: impl Into<String>) -> Self {
        ExecuteError::Failed(message.into())
    }

    /// Unexpected failure; `detail` is whatever the host wants logged.
    pub fn unhandled(detail: impl fmt::Display) -> Self {
        use alloc::string::ToString;
        ExecuteError::Unhandled(detail.to_string())
    }
}

impl fmt::Display for ExecuteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecuteError::Failed(msg) => write!(f, "{}", msg),
            ExecuteError::Unhandled(detail) => write!(f, "Unhandled error: {}", detail),
        }
    }
}

impl core::error::Error for ExecuteError {}

/// Hierarchy construction failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// Empty name, or one containing the delimiter, whitespace or `=`, or `.`/`..`
    InvalidName {
        /// The rejected name
        name: String,
    },

    /// Two entries of one directory share a name
    DuplicateEntry {
        /// Absolute path of the directory
        directory: String,
        /// The duplicated name
        name: String,
    },

    /// Two parameters of one command share a name
    DuplicateParameter {
        /// Command name
        command: String,
        /// The duplicated parameter name
        param: String,
    },

    /// A global command shares its name with a directory entry
    GlobalCollision {
        /// The colliding name
        name: String,
        /// Absolute path of the directory holding the local entry
        directory: String,
    },

    /// Constant default doesn't fit the parameter kind
    DefaultKindMismatch {
        /// Command name
        command: String,
        /// Parameter name
        param: String,
    },

    /// Directory or command reference given as a constant default instead of a supplier
    ConstantReferenceDefault {
        /// Command name
        command: String,
        /// Parameter name
        param: String,
    },

    /// The hierarchy handle was already bound to a hierarchy
    AlreadyBound,
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::InvalidName { name } => write!(f, "Invalid name: '{}'", name),
            BuildError::DuplicateEntry { directory, name } => {
                write!(f, "Directory '{}' already contains an entry named '{}'", directory, name)
            }
            BuildError::DuplicateParameter { command, param } => {
                write!(f, "Command '{}' declares parameter '{}' twice", command, param)
            }
            BuildError::GlobalCollision { name, directory } => write!(
                f,
                "Global command '{}' collides with an entry of directory '{}'",
                name, directory
            ),
            BuildError::DefaultKindMismatch { command, param } => write!(
                f,
                "Default value of parameter '{}' of command '{}' doesn't match its kind",
                param, command
            ),
            BuildError::ConstantReferenceDefault { command, param } => write!(
                f,
                "Parameter '{}' of command '{}' needs a supplier for its default reference",
                param, command
            ),
            BuildError::AlreadyBound => write!(f, "Hierarchy handle already bound"),
        }
    }
}

impl core::error::Error for BuildError {}
