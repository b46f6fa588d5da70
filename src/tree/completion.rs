//! Tab completion for paths, parameter names and parameter values.
//!
//! Every completion source produces an [`AutoComplete`]: the prefix being
//! completed plus a trie of candidate words, each tagged with its
//! [`CompletionKind`]. [`AutoComplete::outcome`] turns that into what the
//! shell shows: nothing, a single completion with its terminator, or the
//! longest common extension plus categorized suggestions.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::error::PathError;
use crate::tree::path::DELIMITER;
use crate::tree::{DirectoryId, Hierarchy};
use crate::trie::Trie;

/// Kind of a completion candidate. Decides the character appended after a
/// unique completion.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum CompletionKind {
    /// Directory name, followed by `/`
    Directory,
    /// Command name, followed by a space
    Command,
    /// Parameter name, followed by `=`
    ParameterName,
    /// Flag name, followed by a space
    Flag,
    /// Parameter value, followed by a space
    ParameterValue,
}

impl CompletionKind {
    /// Character appended after a unique completion of this kind.
    pub fn terminator(self) -> char {
        match self {
            CompletionKind::Directory => DELIMITER,
            CompletionKind::ParameterName => '=',
            CompletionKind::Command | CompletionKind::Flag | CompletionKind::ParameterValue => ' ',
        }
    }
}

/// Candidates grouped for display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Suggestions {
    /// Directory names
    pub directories: Vec<String>,
    /// Command names
    pub commands: Vec<String>,
    /// Parameter and flag names
    pub parameter_names: Vec<String>,
    /// Parameter values
    pub parameter_values: Vec<String>,
}

impl Suggestions {
    /// Group the candidates of a completion trie by kind, in key order.
    pub fn from_candidates(candidates: &Trie<CompletionKind>) -> Self {
        let mut suggestions = Self::default();
        for (word, kind) in candidates.iter() {
            let bucket = match kind {
                CompletionKind::Directory => &mut suggestions.directories,
                CompletionKind::Command => &mut suggestions.commands,
                CompletionKind::ParameterName | CompletionKind::Flag => {
                    &mut suggestions.parameter_names
                }
                CompletionKind::ParameterValue => &mut suggestions.parameter_values,
            };
            bucket.push(word);
        }
        suggestions
    }

    /// True when no category has entries.
    pub fn is_empty(&self) -> bool {
        self.directories.is_empty()
            && self.commands.is_empty()
            && self.parameter_names.is_empty()
            && self.parameter_values.is_empty()
    }

    /// Total number of suggestions.
    pub fn len(&self) -> usize {
        self.directories.len()
            + self.commands.len()
            + self.parameter_names.len()
            + self.parameter_values.len()
    }

    /// Keep at most `max` entries per category.
    pub fn truncate(&mut self, max: usize) {
        self.directories.truncate(max);
        self.commands.truncate(max);
        self.parameter_names.truncate(max);
        self.parameter_values.truncate(max);
    }
}

/// What a completion request produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutoCompleteOutcome {
    /// No candidate matches
    NotPossible,

    /// Exactly one candidate
    Single {
        /// Text to append: rest of the word plus its terminator
        addition: String,
        /// Kind of the candidate
        kind: CompletionKind,
    },

    /// Several candidates
    Multiple {
        /// Text to append: longest common extension of the prefix (may be empty)
        addition: String,
        /// All candidates, grouped
        suggestions: Suggestions,
    },
}

/// Prefix being completed and every candidate that extends it.
#[derive(Debug, Clone)]
pub struct AutoComplete {
    prefix: String,
    possibilities: Trie<CompletionKind>,
}

impl AutoComplete {
    /// Completion of `prefix`; every key of `possibilities` must start with it.
    pub fn new(prefix: &str, possibilities: Trie<CompletionKind>) -> Self {
        Self {
            prefix: prefix.to_string(),
            possibilities,
        }
    }

    /// The word being completed.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Candidate words.
    pub fn possibilities(&self) -> &Trie<CompletionKind> {
        &self.possibilities
    }

    /// Decide what to show.
    pub fn outcome(&self) -> AutoCompleteOutcome {
        let lcp = self.possibilities.longest_common_prefix();
        let mut addition = lcp
            .strip_prefix(self.prefix.as_str())
            .unwrap_or_default()
            .to_string();

        match self.possibilities.len() {
            0 => AutoCompleteOutcome::NotPossible,
            1 => {
                let kind = self
                    .possibilities
                    .values()
                    .first()
                    .map_or(CompletionKind::Command, |kind| **kind);
                addition.push(kind.terminator());
                AutoCompleteOutcome::Single { addition, kind }
            }
            _ => AutoCompleteOutcome::Multiple {
                addition,
                suggestions: Suggestions::from_candidates(&self.possibilities),
            },
        }
    }
}

impl Hierarchy {
    /// Entries of `dir` starting with `prefix`, tagged by kind.
    fn entries(&self, dir: DirectoryId, prefix: &str, commands: bool) -> Trie<CompletionKind> {
        let directory = self.dir(dir);
        let dirs = directory
            .directories
            .sub_trie(prefix)
            .map_values(|_| CompletionKind::Directory);
        if !commands {
            return dirs;
        }
        let cmds = directory
            .commands
            .sub_trie(prefix)
            .map_values(|_| CompletionKind::Command);
        dirs.union(&cmds)
    }

    fn complete_in(&self, raw: &str, commands: bool) -> Result<AutoComplete, PathError> {
        let (scope, prefix, with_globals) = match raw.rfind(DELIMITER) {
            None => (self.working_directory(), raw, commands),
            Some(idx) => (self.resolve_directory(&raw[..=idx])?, &raw[idx + 1..], false),
        };

        let mut candidates = self.entries(scope, prefix, commands);
        if with_globals {
            let globals = self
                .globals
                .sub_trie(prefix)
                .map_values(|_| CompletionKind::Command);
            candidates = candidates.union(&globals);
        }
        Ok(AutoComplete::new(prefix, candidates))
    }

    /// Complete a partially typed directory or command path.
    ///
    /// A bare word also matches global commands.
    pub fn complete_path(&self, raw: &str) -> Result<AutoComplete, PathError> {
        self.complete_in(raw, true)
    }

    /// Complete a partially typed path, offering directories only.
    pub fn complete_directory_path(&self, raw: &str) -> Result<AutoComplete, PathError> {
        self.complete_in(raw, false)
    }
}
