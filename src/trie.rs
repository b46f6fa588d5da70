//! Ordered prefix tree.
//!
//! `Trie<V>` maps non-empty string keys to values and backs every name
//! lookup and completion in the crate. Nodes are keyed by single `char`s
//! and kept in a `BTreeMap`, so iteration is always lexicographic.
//!
//! Only [`Trie::insert`] mutates. Every derived trie (`sub_trie`, `filter`,
//! `map_values`, `union`) is a fresh allocation and leaves the receiver
//! untouched.
//!
//! # Example
//!
//! ```rust
//! use trie_shell::trie::Trie;
//!
//! let trie: Trie<u32> = [("cat", 1), ("car", 2), ("cap", 3), ("dog", 4)]
//!     .into_iter()
//!     .collect();
//!
//! let ca = trie.sub_trie("ca");
//! assert_eq!(ca.len(), 3);
//! assert_eq!(ca.longest_common_prefix(), "ca");
//! assert_eq!(trie.get("dog"), Some(&4));
//! ```

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

/// Single trie node. A node carries a value only when it terminates a key.
#[derive(Debug, Clone, PartialEq)]
struct TrieNode<V> {
    children: BTreeMap<char, TrieNode<V>>,
    value: Option<V>,
}

impl<V> TrieNode<V> {
    fn new() -> Self {
        Self {
            children: BTreeMap::new(),
            value: None,
        }
    }

    fn count(&self) -> usize {
        let own = usize::from(self.value.is_some());
        own + self.children.values().map(TrieNode::count).sum::<usize>()
    }

    fn collect<'a>(&'a self, key: &mut String, out: &mut Vec<(String, &'a V)>) {
        if let Some(value) = &self.value {
            out.push((key.clone(), value));
        }
        for (c, child) in self.children.iter() {
            key.push(*c);
            child.collect(key, out);
            key.pop();
        }
    }

    /// Copy of this subtree keeping only values accepted by `predicate`.
    ///
    /// Returns `None` when nothing survives, so callers never keep empty branches.
    fn filtered<F>(&self, predicate: &F) -> Option<Self>
    where
        V: Clone,
        F: Fn(&V) -> bool,
    {
        let value = self.value.as_ref().filter(|v| predicate(v)).cloned();
        let children: BTreeMap<char, TrieNode<V>> = self
            .children
            .iter()
            .filter_map(|(c, child)| child.filtered(predicate).map(|node| (*c, node)))
            .collect();

        if value.is_none() && children.is_empty() {
            None
        } else {
            Some(Self { children, value })
        }
    }

    fn mapped<W, F>(&self, f: &F) -> TrieNode<W>
    where
        F: Fn(&V) -> W,
    {
        TrieNode {
            children: self
                .children
                .iter()
                .map(|(c, child)| (*c, child.mapped(f)))
                .collect(),
            value: self.value.as_ref().map(f),
        }
    }
}

/// Prefix tree mapping non-empty string keys to values.
#[derive(Debug, Clone, PartialEq)]
pub struct Trie<V> {
    root: TrieNode<V>,
    len: usize,
}

impl<V> Default for Trie<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Trie<V> {
    /// Create an empty trie.
    pub fn new() -> Self {
        Self {
            root: TrieNode::new(),
            len: 0,
        }
    }

    /// Number of keys in the trie.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if the trie holds no keys.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert `key -> value`, returning the value previously stored under `key`.
    ///
    /// Re-inserting an existing key overwrites its value. Empty keys are
    /// ignored; uniqueness is the caller's concern.
    pub fn insert(&mut self, key: &str, value: V) -> Option<V> {
        if key.is_empty() {
            return None;
        }

        let mut node = &mut self.root;
        for c in key.chars() {
            node = node.children.entry(c).or_insert_with(TrieNode::new);
        }

        let previous = node.value.replace(value);
        if previous.is_none() {
            self.len += 1;
        }
        previous
    }

    /// Exact-match lookup.
    pub fn get(&self, key: &str) -> Option<&V> {
        if key.is_empty() {
            return None;
        }
        self.node_at(key).and_then(|node| node.value.as_ref())
    }

    /// True if `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Longest string that prefixes every key. Empty for an empty trie.
    pub fn longest_common_prefix(&self) -> String {
        let mut prefix = String::new();
        if self.is_empty() {
            return prefix;
        }

        let mut node = &self.root;
        while node.value.is_none() && node.children.len() == 1 {
            let Some((c, child)) = node.children.iter().next() else {
                break;
            };
            prefix.push(*c);
            node = child;
        }
        prefix
    }

    /// All entries in lexicographic key order.
    pub fn iter(&self) -> impl Iterator<Item = (String, &V)> + '_ {
        let mut entries = Vec::with_capacity(self.len);
        let mut key = String::new();
        self.root.collect(&mut key, &mut entries);
        entries.into_iter()
    }

    /// All keys in lexicographic order.
    pub fn keys(&self) -> Vec<String> {
        self.iter().map(|(key, _)| key).collect()
    }

    /// All values in key order.
    pub fn values(&self) -> Vec<&V> {
        self.iter().map(|(_, value)| value).collect()
    }

    /// New trie with every value transformed by `f`. Keys are preserved.
    pub fn map_values<W, F>(&self, f: F) -> Trie<W>
    where
        F: Fn(&V) -> W,
    {
        Trie {
            root: self.root.mapped(&f),
            len: self.len,
        }
    }

    fn node_at(&self, prefix: &str) -> Option<&TrieNode<V>> {
        let mut node = &self.root;
        for c in prefix.chars() {
            node = node.children.get(&c)?;
        }
        Some(node)
    }
}

impl<V: Clone> Trie<V> {
    /// New trie holding exactly the entries whose key starts with `prefix`.
    ///
    /// `sub_trie("")` is a copy of the whole trie; an unmatched prefix yields
    /// an empty trie.
    pub fn sub_trie(&self, prefix: &str) -> Self {
        let Some(node) = self.node_at(prefix) else {
            return Self::new();
        };

        let len = node.count();
        if len == 0 {
            return Self::new();
        }

        let mut root = node.clone();
        for c in prefix.chars().rev() {
            let mut parent = TrieNode::new();
            parent.children.insert(c, root);
            root = parent;
        }

        Self { root, len }
    }

    /// New trie keeping only entries whose value satisfies `predicate`.
    pub fn filter<F>(&self, predicate: F) -> Self
    where
        F: Fn(&V) -> bool,
    {
        match self.root.filtered(&predicate) {
            Some(root) => {
                let len = root.count();
                Self { root, len }
            }
            None => Self::new(),
        }
    }

    /// Key-set union. On collision the value from `self` wins.
    pub fn union(&self, other: &Trie<V>) -> Self {
        let mut merged = self.clone();
        for (key, value) in other.iter() {
            if !merged.contains(&key) {
                merged.insert(&key, value.clone());
            }
        }
        merged
    }
}

impl<K: AsRef<str>, V> FromIterator<(K, V)> for Trie<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut trie = Trie::new();
        trie.extend(iter);
        trie
    }
}

impl<K: AsRef<str>, V> Extend<(K, V)> for Trie<V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key.as_ref(), value);
        }
    }
}
