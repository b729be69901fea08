// Copyright 2023 The Regents of the University of California
// released under BSD 3-Clause License
// author: Kevin Laeufer <laeufer@berkeley.edu>

use crate::ir::{StateRef, Transition};
use indexmap::IndexSet;

/// One point of execution: the active state and the stack content.
/// The first character of `stack` is the top of the stack.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct Configuration {
    pub state: StateRef,
    pub stack: String,
}

impl Configuration {
    pub fn new(state: StateRef, stack: impl Into<String>) -> Self {
        Self {
            state,
            stack: stack.into(),
        }
    }

    pub fn top_of_stack(&self) -> Option<char> {
        self.stack.chars().next()
    }

    /// Everything except the top symbol.
    fn below_top(&self) -> &str {
        let mut chars = self.stack.chars();
        chars.next();
        chars.as_str()
    }

    /// Follows `transition`, popping the top of stack and pushing its write symbols.
    /// Does not check whether the transition matches.
    pub(crate) fn follow(&self, transition: &Transition) -> Configuration {
        let below = self.below_top();
        let mut stack = String::with_capacity(transition.write_stack.len() + below.len());
        stack.push_str(&transition.write_stack);
        stack.push_str(below);
        Configuration::new(transition.destination, stack)
    }
}

/// Deduplicating set of configurations which iterates in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigSet {
    inner: IndexSet<Configuration>,
}

impl ConfigSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` iff no equal configuration was present.
    pub fn add(&mut self, config: Configuration) -> bool {
        self.inner.insert(config)
    }

    pub fn contains(&self, config: &Configuration) -> bool {
        self.inner.contains(config)
    }

    pub fn values(&self) -> &IndexSet<Configuration> {
        &self.inner
    }

    pub fn iter(&self) -> impl Iterator<Item = &Configuration> + '_ {
        self.inner.iter()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Compares contents independent of insertion order.
    pub fn same_contents(&self, other: &ConfigSet) -> bool {
        self.len() == other.len() && self.iter().all(|c| other.contains(c))
    }
}

impl Extend<Configuration> for ConfigSet {
    fn extend<T: IntoIterator<Item = Configuration>>(&mut self, iter: T) {
        self.inner.extend(iter)
    }
}

impl FromIterator<Configuration> for ConfigSet {
    fn from_iter<T: IntoIterator<Item = Configuration>>(iter: T) -> Self {
        Self {
            inner: IndexSet::from_iter(iter),
        }
    }
}

impl IntoIterator for ConfigSet {
    type Item = Configuration;
    type IntoIter = indexmap::set::IntoIter<Configuration>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

impl<'a> IntoIterator for &'a ConfigSet {
    type Item = &'a Configuration;
    type IntoIter = indexmap::set::Iter<'a, Configuration>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}
