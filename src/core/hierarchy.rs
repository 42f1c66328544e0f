//! Override-chain queries shared by every overridable build object.
//!
//! Tools and tool-chains both form singly linked override chains: each node
//! may name one superclass, and the walk always ends at a node without one.
//! The walks here are written once against [`OverrideGraph`] and used for
//! both kinds.

use std::collections::HashSet;
use std::hash::Hash;

/// A store of overridable nodes addressed by `Id`.
pub trait OverrideGraph<Id: Copy + Eq + Hash> {
    /// The node this one overrides, if any.
    fn superclass_of(&self, id: Id) -> Option<Id>;

    /// Whether the node is defined by the catalog rather than by a project.
    fn is_extension(&self, id: Id) -> bool;

    /// Whether the node is an abstract catalog definition that is never
    /// instantiated on its own.
    fn is_abstract(&self, id: Id) -> bool;
}

/// Iterator over a node and its ancestors, nearest first.
pub struct Ancestors<'g, G: ?Sized, Id> {
    graph: &'g G,
    next: Option<Id>,
}

impl<G, Id> Iterator for Ancestors<'_, G, Id>
where
    G: OverrideGraph<Id> + ?Sized,
    Id: Copy + Eq + Hash,
{
    type Item = Id;

    fn next(&mut self) -> Option<Id> {
        let current = self.next?;
        self.next = self.graph.superclass_of(current);
        Some(current)
    }
}

/// Walk from `id` (inclusive) up to the root of its override chain.
pub fn ancestors<G, Id>(graph: &G, id: Id) -> Ancestors<'_, G, Id>
where
    G: OverrideGraph<Id> + ?Sized,
    Id: Copy + Eq + Hash,
{
    Ancestors {
        graph,
        next: Some(id),
    }
}

/// Collect the override chain of `id`, nearest first.
pub fn ancestor_chain<G, Id>(graph: &G, id: Id) -> Vec<Id>
where
    G: OverrideGraph<Id> + ?Sized,
    Id: Copy + Eq + Hash,
{
    ancestors(graph, id).collect()
}

/// Number of superclass hops from `id` to the root of its chain.
pub fn chain_depth<G, Id>(graph: &G, id: Id) -> usize
where
    G: OverrideGraph<Id> + ?Sized,
    Id: Copy + Eq + Hash,
{
    ancestors(graph, id).count() - 1
}

/// The nearest node of `a`'s chain that also appears in `b`'s chain.
pub fn common_ancestor<G, Id>(graph: &G, a: Id, b: Id) -> Option<Id>
where
    G: OverrideGraph<Id> + ?Sized,
    Id: Copy + Eq + Hash,
{
    let other: HashSet<Id> = ancestors(graph, b).collect();
    ancestors(graph, a).find(|id| other.contains(id))
}

/// Whether `ancestor` appears in the chain of `id` (a node is its own ancestor).
pub fn is_ancestor<G, Id>(graph: &G, id: Id, ancestor: Id) -> bool
where
    G: OverrideGraph<Id> + ?Sized,
    Id: Copy + Eq + Hash,
{
    ancestors(graph, id).any(|a| a == ancestor)
}

/// The nearest catalog-defined node of the chain, `id` included.
pub fn nearest_extension<G, Id>(graph: &G, id: Id) -> Option<Id>
where
    G: OverrideGraph<Id> + ?Sized,
    Id: Copy + Eq + Hash,
{
    ancestors(graph, id).find(|a| graph.is_extension(*a))
}
