//! Parameter model.
//!
//! A [`Param`] is a named, typed slot of a command. Its [`ParamKind`] is a
//! closed set matched exhaustively for validation, value completion and help
//! rendering. Optional parameters carry a [`DefaultValue`]: either a constant
//! or a zero-argument supplier that runs only when the parameter is left
//! unbound, once per parse.
//!
//! # Example
//!
//! ```rust
//! use trie_shell::param::Param;
//!
//! let params = [
//!     Param::integer("count", "How many"),
//!     Param::string("mode", "Run mode").values(["fast", "slow"]).optional("fast"),
//!     Param::flag("verbose", "Print more"),
//! ];
//! assert!(!params[0].is_optional());
//! assert!(params[1].is_optional());
//! assert!(params[2].is_flag());
//! ```

use alloc::boxed::Box;
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use crate::error::{ArgumentError, ParseError};
use crate::tree::completion::{AutoComplete, CompletionKind};
use crate::tree::{CommandId, DirectoryId, Hierarchy};
use crate::trie::Trie;

pub mod args;

pub use args::CommandArgs;

/// Literal accepted as boolean true.
pub const TRUE_LITERAL: &str = "true";

/// Literal accepted as boolean false.
pub const FALSE_LITERAL: &str = "false";

/// Enum usable as a string parameter restricted to its variant names.
///
/// Usually derived with `#[derive(ParamEnum)]`.
pub trait ParamEnum: Sized + 'static {
    /// Variant names, in declaration order.
    const VARIANTS: &'static [&'static str];

    /// Parse a variant from its exact name.
    fn from_name(name: &str) -> Option<Self>;

    /// Name of this variant.
    fn name(&self) -> &'static str;
}

/// Bound parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// String or enum value
    String(String),
    /// Integer value
    Integer(i64),
    /// Real value
    Real(f64),
    /// Boolean or flag value
    Boolean(bool),
    /// Resolved directory reference
    Directory(DirectoryId),
    /// Resolved command reference
    Command(CommandId),
}

impl Value {
    /// Short label of the value's type, used in messages.
    pub fn type_label(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Integer(_) => "integer",
            Value::Real(_) => "real",
            Value::Boolean(_) => "boolean",
            Value::Directory(_) => "directory",
            Value::Command(_) => "command",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{}", s),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Real(r) => write!(f, "{}", r),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Directory(id) => write!(f, "{}", id),
            Value::Command(id) => write!(f, "{}", id),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Real(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<DirectoryId> for Value {
    fn from(value: DirectoryId) -> Self {
        Value::Directory(value)
    }
}

impl From<CommandId> for Value {
    fn from(value: CommandId) -> Self {
        Value::Command(value)
    }
}

/// Values a string parameter accepts.
pub enum AcceptedValues {
    /// Any non-empty string
    Any,
    /// A fixed set, declared up front
    Fixed(Trie<()>),
    /// A set recomputed on every parse or completion
    Dynamic(Box<dyn Fn() -> Vec<String> + Send + Sync>),
}

impl AcceptedValues {
    /// Current value set, or `None` when any string is accepted.
    pub fn current(&self) -> Option<Trie<()>> {
        match self {
            AcceptedValues::Any => None,
            AcceptedValues::Fixed(values) => Some(values.clone()),
            AcceptedValues::Dynamic(supplier) => {
                Some(supplier().into_iter().map(|v| (v, ())).collect())
            }
        }
    }
}

impl fmt::Debug for AcceptedValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AcceptedValues::Any => write!(f, "Any"),
            AcceptedValues::Fixed(values) => f.debug_tuple("Fixed").field(&values.keys()).finish(),
            AcceptedValues::Dynamic(_) => write!(f, "Dynamic(<supplier>)"),
        }
    }
}

/// Parameter kind.
#[derive(Debug)]
pub enum ParamKind {
    /// String, optionally restricted to a value set (enums use a fixed set)
    String(AcceptedValues),
    /// Signed integer
    Integer,
    /// Floating point number
    Real,
    /// `true` or `false`
    Boolean,
    /// Presence-only boolean; never consumes a value token
    Flag,
    /// Path to a directory, resolved at parse time
    Directory,
    /// Path to a command, resolved at parse time
    Command,
}

impl ParamKind {
    /// Label used in help views and error messages.
    pub fn label(&self) -> &'static str {
        match self {
            ParamKind::String(AcceptedValues::Any) => "string",
            ParamKind::String(_) => "enum",
            ParamKind::Integer => "integer",
            ParamKind::Real => "real",
            ParamKind::Boolean => "boolean",
            ParamKind::Flag => "flag",
            ParamKind::Directory => "directory",
            ParamKind::Command => "command",
        }
    }
}

/// Source of an optional parameter's value when it is left unbound.
pub enum DefaultValue {
    /// Fixed value
    Constant(Value),
    /// Evaluated lazily, once per unbound occurrence
    Supplier(Box<dyn Fn() -> Value + Send + Sync>),
}

impl DefaultValue {
    /// Produce the default. Suppliers run on every call.
    pub fn resolve(&self) -> Value {
        match self {
            DefaultValue::Constant(value) => value.clone(),
            DefaultValue::Supplier(supplier) => supplier(),
        }
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
            DefaultValue::Supplier(_) => write!(f, "Supplier(<fn>)"),
        }
    }
}

/// Parameter definition.
#[derive(Debug)]
pub struct Param {
    name: String,
    description: String,
    kind: ParamKind,
    default: Option<DefaultValue>,
}

impl Param {
    fn new(name: &str, description: &str, kind: ParamKind) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            kind,
            default: None,
        }
    }

    /// Mandatory string parameter accepting any value.
    pub fn string(name: &str, description: &str) -> Self {
        Self::new(name, description, ParamKind::String(AcceptedValues::Any))
    }

    /// Mandatory string parameter whose accepted values come from `supplier`,
    /// evaluated each time a value is parsed or completed.
    pub fn dynamic_string<F>(name: &str, description: &str, supplier: F) -> Self
    where
        F: Fn() -> Vec<String> + Send + Sync + 'static,
    {
        Self::new(
            name,
            description,
            ParamKind::String(AcceptedValues::Dynamic(Box::new(supplier))),
        )
    }

    /// Mandatory parameter restricted to the variant names of `T`.
    pub fn enumeration<T: ParamEnum>(name: &str, description: &str) -> Self {
        let values = T::VARIANTS.iter().map(|v| (*v, ())).collect();
        Self::new(name, description, ParamKind::String(AcceptedValues::Fixed(values)))
    }

    /// Mandatory integer parameter.
    pub fn integer(name: &str, description: &str) -> Self {
        Self::new(name, description, ParamKind::Integer)
    }

    /// Mandatory real parameter.
    pub fn real(name: &str, description: &str) -> Self {
        Self::new(name, description, ParamKind::Real)
    }

    /// Mandatory boolean parameter.
    pub fn boolean(name: &str, description: &str) -> Self {
        Self::new(name, description, ParamKind::Boolean)
    }

    /// Flag: always optional, `false` unless its name appears on the line.
    pub fn flag(name: &str, description: &str) -> Self {
        let mut param = Self::new(name, description, ParamKind::Flag);
        param.default = Some(DefaultValue::Constant(Value::Boolean(false)));
        param
    }

    /// Mandatory directory-reference parameter.
    pub fn directory(name: &str, description: &str) -> Self {
        Self::new(name, description, ParamKind::Directory)
    }

    /// Mandatory command-reference parameter.
    pub fn command(name: &str, description: &str) -> Self {
        Self::new(name, description, ParamKind::Command)
    }

    /// Restrict a string parameter to a fixed value set. No effect on other kinds.
    pub fn values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if let ParamKind::String(accepted) = &mut self.kind {
            *accepted = AcceptedValues::Fixed(values.into_iter().map(|v| (v, ())).collect());
        }
        self
    }

    /// Make the parameter optional with a constant default.
    pub fn optional(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(DefaultValue::Constant(default.into()));
        self
    }

    /// Make the parameter optional with a default computed at parse time.
    pub fn optional_with<F, T>(mut self, supplier: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
        T: Into<Value>,
    {
        self.default = Some(DefaultValue::Supplier(Box::new(move || supplier().into())));
        self
    }

    /// Parameter name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parameter description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Parameter kind.
    pub fn kind(&self) -> &ParamKind {
        &self.kind
    }

    /// Default value source (present exactly when optional).
    pub fn default_value(&self) -> Option<&DefaultValue> {
        self.default.as_ref()
    }

    /// True if the parameter may be left unbound.
    pub fn is_optional(&self) -> bool {
        self.default.is_some()
    }

    /// True for flag parameters.
    pub fn is_flag(&self) -> bool {
        matches!(self.kind, ParamKind::Flag)
    }

    /// Whether `value` has the right shape for this parameter.
    ///
    /// Fixed value sets are checked for membership; dynamic sets only for type.
    pub fn accepts(&self, value: &Value) -> bool {
        match (&self.kind, value) {
            (ParamKind::String(AcceptedValues::Fixed(values)), Value::String(s)) => {
                values.contains(s)
            }
            (ParamKind::String(_), Value::String(_)) => true,
            (ParamKind::Integer, Value::Integer(_)) => true,
            (ParamKind::Real, Value::Real(_)) => true,
            (ParamKind::Boolean | ParamKind::Flag, Value::Boolean(_)) => true,
            (ParamKind::Directory, Value::Directory(_)) => true,
            (ParamKind::Command, Value::Command(_)) => true,
            _ => false,
        }
    }

    /// Check an already built value, such as a computed default.
    ///
    /// Unlike [`Param::accepts`], string values are checked against the
    /// current dynamic set too, and references must exist in `hierarchy`.
    pub fn validate(&self, value: &Value, hierarchy: &Hierarchy) -> Result<(), ParseError> {
        if let (ParamKind::String(accepted), Value::String(s)) = (&self.kind, value)
            && let Some(values) = accepted.current()
            && !values.contains(s)
        {
            let expected = format!("one of: {}", values.keys().join(", "));
            return Err(self.invalid(s, &expected));
        }

        let known = match value {
            Value::Directory(id) => hierarchy.directory(*id).is_some(),
            Value::Command(id) => hierarchy.command(*id).is_some(),
            _ => true,
        };
        if !known || !self.accepts(value) {
            return Err(self.invalid(&value.to_string(), self.kind.label()));
        }
        Ok(())
    }

    /// Validate raw value text and convert it to a [`Value`].
    ///
    /// Directory and command references are resolved against `hierarchy`.
    pub fn parse_value(&self, raw: &str, hierarchy: &Hierarchy) -> Result<Value, ParseError> {
        if raw.is_empty() {
            return Err(self.invalid(raw, "a non-empty value"));
        }

        match &self.kind {
            ParamKind::String(accepted) => match accepted.current() {
                Some(values) if !values.contains(raw) => {
                    let expected = format!("one of: {}", values.keys().join(", "));
                    Err(self.invalid(raw, &expected))
                }
                _ => Ok(Value::String(raw.to_string())),
            },
            ParamKind::Integer => raw
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|_| self.invalid(raw, "integer")),
            ParamKind::Real => raw
                .parse::<f64>()
                .map(Value::Real)
                .map_err(|_| self.invalid(raw, "real")),
            ParamKind::Boolean => match raw {
                TRUE_LITERAL => Ok(Value::Boolean(true)),
                FALSE_LITERAL => Ok(Value::Boolean(false)),
                _ => Err(self.invalid(raw, "'true' or 'false'")),
            },
            ParamKind::Flag => Err(self.invalid(raw, "no value (flag)")),
            ParamKind::Directory => Ok(Value::Directory(hierarchy.resolve_directory(raw)?)),
            ParamKind::Command => Ok(Value::Command(hierarchy.resolve_command(raw)?)),
        }
    }

    /// Complete a partially typed value for this parameter.
    pub fn complete_value(
        &self,
        partial: &str,
        hierarchy: &Hierarchy,
    ) -> Result<AutoComplete, ParseError> {
        let values = match &self.kind {
            ParamKind::String(accepted) => accepted.current().unwrap_or_default(),
            ParamKind::Boolean => [(TRUE_LITERAL, ()), (FALSE_LITERAL, ())].into_iter().collect(),
            ParamKind::Integer | ParamKind::Real | ParamKind::Flag => Trie::new(),
            ParamKind::Directory => return Ok(hierarchy.complete_directory_path(partial)?),
            ParamKind::Command => return Ok(hierarchy.complete_path(partial)?),
        };

        let possibilities = values
            .sub_trie(partial)
            .map_values(|_| CompletionKind::ParameterValue);
        Ok(AutoComplete::new(partial, possibilities))
    }

    fn invalid(&self, raw: &str, expected: &str) -> ParseError {
        ArgumentError::InvalidValue {
            param: self.name.clone(),
            value: raw.to_string(),
            expected: expected.to_string(),
        }
        .into()
    }
}
