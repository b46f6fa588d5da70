//! Argument binding.
//!
//! Turns the tokens after a command path into a [`CommandArgs`] map. A token
//! is either `name=value` (split at the first `=`), a flag name, or a bare
//! value bound to the next unbound mandatory parameter in declaration order.
//! The same binder drives completion of the last, partially typed token.

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

use crate::config::RebindPolicy;
use crate::error::{ArgumentError, ExecuteError, ParseError};
use crate::param::{Param, ParamEnum, Value};
use crate::tree::completion::{AutoComplete, CompletionKind};
use crate::tree::{Command, CommandId, DirectoryId, Hierarchy};
use crate::trie::Trie;

/// Arguments bound for one invocation, keyed by parameter name.
///
/// After a successful parse every declared parameter has a value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandArgs {
    values: BTreeMap<String, Value>,
}

impl CommandArgs {
    /// Raw value of a parameter.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Number of bound parameters.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if the command declares no parameters.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// All bindings in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    fn value(&self, name: &str) -> Result<&Value, ExecuteError> {
        self.values
            .get(name)
            .ok_or_else(|| ExecuteError::Unhandled(alloc::format!("No parameter named '{}'", name)))
    }

    fn mismatch(name: &str, wanted: &str, value: &Value) -> ExecuteError {
        ExecuteError::Unhandled(alloc::format!(
            "Parameter '{}' is {}, not {}",
            name,
            value.type_label(),
            wanted
        ))
    }

    /// String value (also enum values).
    pub fn string(&self, name: &str) -> Result<&str, ExecuteError> {
        match self.value(name)? {
            Value::String(s) => Ok(s),
            other => Err(Self::mismatch(name, "string", other)),
        }
    }

    /// Integer value.
    pub fn integer(&self, name: &str) -> Result<i64, ExecuteError> {
        match self.value(name)? {
            Value::Integer(i) => Ok(*i),
            other => Err(Self::mismatch(name, "integer", other)),
        }
    }

    /// Real value.
    pub fn real(&self, name: &str) -> Result<f64, ExecuteError> {
        match self.value(name)? {
            Value::Real(r) => Ok(*r),
            other => Err(Self::mismatch(name, "real", other)),
        }
    }

    /// Boolean or flag value.
    pub fn boolean(&self, name: &str) -> Result<bool, ExecuteError> {
        match self.value(name)? {
            Value::Boolean(b) => Ok(*b),
            other => Err(Self::mismatch(name, "boolean", other)),
        }
    }

    /// Directory reference.
    pub fn directory(&self, name: &str) -> Result<DirectoryId, ExecuteError> {
        match self.value(name)? {
            Value::Directory(id) => Ok(*id),
            other => Err(Self::mismatch(name, "directory", other)),
        }
    }

    /// Command reference.
    pub fn command(&self, name: &str) -> Result<CommandId, ExecuteError> {
        match self.value(name)? {
            Value::Command(id) => Ok(*id),
            other => Err(Self::mismatch(name, "command", other)),
        }
    }

    /// Enum value, converted back from its variant name.
    pub fn enumeration<T: ParamEnum>(&self, name: &str) -> Result<T, ExecuteError> {
        let raw = self.string(name)?;
        T::from_name(raw).ok_or_else(|| {
            ExecuteError::Unhandled(alloc::format!(
                "Parameter '{}' holds unknown variant '{}'",
                name,
                raw
            ))
        })
    }
}

/// Binds tokens one at a time for a single command.
pub(crate) struct ArgumentBinder<'h> {
    hierarchy: &'h Hierarchy,
    command: &'h Command,
    policy: RebindPolicy,
    // value plus the token text that bound it
    bound: BTreeMap<&'h str, (Value, String)>,
}

impl<'h> ArgumentBinder<'h> {
    pub(crate) fn new(hierarchy: &'h Hierarchy, command: &'h Command, policy: RebindPolicy) -> Self {
        Self {
            hierarchy,
            command,
            policy,
            bound: BTreeMap::new(),
        }
    }

    fn find(&self, name: &str) -> Result<&'h Param, ArgumentError> {
        self.command
            .find_param(name)
            .ok_or_else(|| ArgumentError::UnknownParameterName {
                command: self.command.name().to_string(),
                name: name.to_string(),
            })
    }

    pub(crate) fn is_bound(&self, name: &str) -> bool {
        self.bound.contains_key(name)
    }

    /// Bind one complete token.
    pub(crate) fn bind_token(&mut self, token: &str) -> Result<(), ParseError> {
        if let Some((name, raw)) = token.split_once('=') {
            let param = self.find(name)?;
            let value = param.parse_value(raw, self.hierarchy)?;
            return Ok(self.bind(param, value, raw)?);
        }

        if let Some(flag) = self.command.find_param(token).filter(|p| p.is_flag()) {
            return Ok(self.bind(flag, Value::Boolean(true), token)?);
        }

        let param = self
            .command
            .params()
            .iter()
            .find(|p| !p.is_optional() && !self.is_bound(p.name()))
            .ok_or_else(|| ArgumentError::UnexpectedArgument {
                command: self.command.name().to_string(),
                token: token.to_string(),
            })?;
        let value = param.parse_value(token, self.hierarchy)?;
        Ok(self.bind(param, value, token)?)
    }

    fn bind(&mut self, param: &'h Param, value: Value, raw: &str) -> Result<(), ArgumentError> {
        if let Some((_, first)) = self.bound.get(param.name()) {
            match self.policy {
                RebindPolicy::Reject => {
                    return Err(ArgumentError::AmbiguousBinding {
                        param: param.name().to_string(),
                        first: first.clone(),
                        second: raw.to_string(),
                    });
                }
                RebindPolicy::Override => {
                    log::warn!(
                        "parameter '{}' of '{}' rebound: '{}' replaces '{}'",
                        param.name(),
                        self.command.name(),
                        raw,
                        first
                    );
                }
            }
        }
        self.bound.insert(param.name(), (value, raw.to_string()));
        Ok(())
    }

    /// Check mandatory parameters and fill in defaults.
    ///
    /// Default suppliers run here, once per unbound parameter.
    pub(crate) fn finish(mut self) -> Result<CommandArgs, ParseError> {
        let mut values = BTreeMap::new();
        for param in self.command.params() {
            let value = match self.bound.remove(param.name()) {
                Some((value, _)) => value,
                None => match param.default_value() {
                    Some(default) => {
                        let value = default.resolve();
                        param.validate(&value, self.hierarchy)?;
                        value
                    }
                    None => {
                        return Err(ArgumentError::MissingMandatoryParameter {
                            param: param.name().to_string(),
                        }
                        .into());
                    }
                },
            };
            values.insert(param.name().to_string(), value);
        }
        Ok(CommandArgs { values })
    }
}

/// Bind every token and apply defaults.
pub fn parse_args(
    hierarchy: &Hierarchy,
    command: &Command,
    tokens: &[&str],
    policy: RebindPolicy,
) -> Result<CommandArgs, ParseError> {
    let mut binder = ArgumentBinder::new(hierarchy, command, policy);
    for token in tokens {
        binder.bind_token(token)?;
    }
    let args = binder.finish()?;
    log::trace!("bound {} argument(s) for '{}'", args.len(), command.name());
    Ok(args)
}

/// Complete the last token of an argument list.
///
/// Earlier tokens are bound first so parameters already given are not offered
/// again. The last token completes a parameter or flag name until it contains
/// `=`, after which its value part is completed.
pub fn complete_args(
    hierarchy: &Hierarchy,
    command: &Command,
    tokens: &[&str],
    policy: RebindPolicy,
) -> Result<AutoComplete, ParseError> {
    let (last, previous) = match tokens.split_last() {
        Some((last, previous)) => (*last, previous),
        None => ("", tokens),
    };

    let mut binder = ArgumentBinder::new(hierarchy, command, policy);
    for token in previous {
        binder.bind_token(token)?;
    }

    match last.split_once('=') {
        Some((name, partial)) => {
            let param = binder.find(name)?;
            param.complete_value(partial, hierarchy)
        }
        None => {
            let names: Trie<CompletionKind> = command
                .params()
                .iter()
                .filter(|p| !binder.is_bound(p.name()) && p.name().starts_with(last))
                .map(|p| {
                    let kind = if p.is_flag() {
                        CompletionKind::Flag
                    } else {
                        CompletionKind::ParameterName
                    };
                    (p.name(), kind)
                })
                .collect();
            Ok(AutoComplete::new(last, names))
        }
    }
}
