//! Configuration traits and implementations.
//!
//! The `ShellConfig` trait fixes limits, binding policy and banner text at
//! compile time without runtime overhead.

/// What happens when a parameter receives a second binding on one line.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RebindPolicy {
    /// Fail with `ArgumentError::AmbiguousBinding`
    Reject,

    /// Keep the later value; the overridden one is logged at warn level
    Override,
}

/// Shell configuration trait.
///
/// All values are const (zero runtime cost). Implement it on a zero-sized
/// type to change limits or policy.
pub trait ShellConfig {
    /// Maximum accepted command line length in bytes (default: 128)
    const MAX_INPUT: usize;

    /// Maximum suggestions surfaced per category (default: 32)
    const MAX_SUGGESTIONS: usize;

    /// Re-binding policy for parameters (default: `Reject`)
    const REBIND_POLICY: RebindPolicy;

    /// Banner shown by `Shell::activate()`
    const MSG_WELCOME: &'static str;
}

/// Default configuration.
///
/// - MAX_INPUT: 128 bytes
/// - MAX_SUGGESTIONS: 32 per category
/// - REBIND_POLICY: Reject
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DefaultConfig;

impl ShellConfig for DefaultConfig {
    const MAX_INPUT: usize = 128;
    const MAX_SUGGESTIONS: usize = 32;
    const REBIND_POLICY: RebindPolicy = RebindPolicy::Reject;
    const MSG_WELCOME: &'static str = "Welcome to trie-shell. Type 'help' for global commands.";
}

/// Minimal configuration for small displays and short input lines.
///
/// - MAX_INPUT: 64 bytes
/// - MAX_SUGGESTIONS: 8 per category
/// - REBIND_POLICY: Reject
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MinimalConfig;

impl ShellConfig for MinimalConfig {
    const MAX_INPUT: usize = 64;
    const MAX_SUGGESTIONS: usize = 8;
    const REBIND_POLICY: RebindPolicy = RebindPolicy::Reject;
    const MSG_WELCOME: &'static str = "trie-shell";
}
