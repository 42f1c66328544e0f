//! Identity resolution: which catalog definition a build object stands for.
//!
//! Two objects at different customization depths are "the same logical
//! object" when they resolve to the same real definition. The real definition
//! is the nearest concrete catalog ancestor, folded through the registered
//! groups of identical definitions.

use std::collections::HashMap;
use std::hash::Hash;

use crate::core::hierarchy::{self, OverrideGraph};

/// Registry of identical-definition groups for one kind of build object.
#[derive(Debug, Clone)]
pub struct IdentityRegistry<Id> {
    /// member -> real representative
    aliases: HashMap<Id, Id>,
    /// real representative -> members, in registration order
    groups: HashMap<Id, Vec<Id>>,
}

impl<Id> Default for IdentityRegistry<Id> {
    fn default() -> Self {
        IdentityRegistry {
            aliases: HashMap::new(),
            groups: HashMap::new(),
        }
    }
}

impl<Id: Copy + Eq + Hash> IdentityRegistry<Id> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `member` as identical to the real definition `real`.
    pub fn register_identical(&mut self, member: Id, real: Id) {
        if member == real || self.aliases.contains_key(&member) {
            return;
        }
        self.aliases.insert(member, real);
        self.groups.entry(real).or_default().push(member);
    }

    /// The real definition behind `id`; `id` itself when its chain has no
    /// concrete catalog ancestor.
    pub fn real<G>(&self, graph: &G, id: Id) -> Id
    where
        G: OverrideGraph<Id> + ?Sized,
    {
        let concrete = hierarchy::ancestors(graph, id)
            .find(|a| graph.is_extension(*a) && !graph.is_abstract(*a));
        match concrete {
            Some(c) => self.aliases.get(&c).copied().unwrap_or(c),
            None => id,
        }
    }

    /// The nearest catalog ancestor of `id`; `id` itself when there is none.
    pub fn base<G>(&self, graph: &G, id: Id) -> Id
    where
        G: OverrideGraph<Id> + ?Sized,
    {
        hierarchy::nearest_extension(graph, id).unwrap_or(id)
    }

    /// Every catalog definition resolving to `real`, `real` first.
    pub fn identical(&self, real: Id) -> Vec<Id> {
        let mut ids = vec![real];
        if let Some(members) = self.groups.get(&real) {
            ids.extend(members.iter().copied());
        }
        ids
    }
}
