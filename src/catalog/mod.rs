//! Catalog - read-only knowledge about catalog-defined build objects.
//!
//! The catalog answers identity questions (real and base definitions,
//! identical definitions), finds registered converters, lists the defined
//! build properties and mints ids for new project objects. One catalog is
//! built per model and passed by reference to every operation.

pub mod converter;
pub mod identity;

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::core::{Model, ToolChainId, ToolId};

pub use converter::{
    ConversionError, ConversionRequest, Converter, ConverterDescriptor, ConverterRegistry,
};
pub use identity::IdentityRegistry;

/// A matched converter together with the target definition it was found for.
#[derive(Debug, Clone, Copy)]
pub struct ConverterMatch<'c, Id> {
    /// Target definition the converter is registered for.
    pub to: Id,
    /// The converter.
    pub descriptor: &'c ConverterDescriptor,
}

/// Catalog of tool and tool-chain definitions.
#[derive(Debug, Default)]
pub struct Catalog {
    tools: IdentityRegistry<ToolId>,
    tool_chains: IdentityRegistry<ToolChainId>,
    converters: ConverterRegistry,
    defined_properties: BTreeSet<String>,
    next_child: AtomicU64,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Catalog::default()
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Register `member` as identical to the real tool `real`.
    pub fn register_identical_tool(&mut self, member: ToolId, real: ToolId) {
        self.tools.register_identical(member, real);
    }

    /// Register `member` as identical to the real tool-chain `real`.
    pub fn register_identical_tool_chain(&mut self, member: ToolChainId, real: ToolChainId) {
        self.tool_chains.register_identical(member, real);
    }

    /// Register a tool converter.
    pub fn register_tool_converter(&mut self, from: ToolId, to: ToolId, descriptor: ConverterDescriptor) {
        self.converters.register_tool(from, to, descriptor);
    }

    /// Register a tool-chain converter.
    pub fn register_tool_chain_converter(
        &mut self,
        from: ToolChainId,
        to: ToolChainId,
        descriptor: ConverterDescriptor,
    ) {
        self.converters.register_tool_chain(from, to, descriptor);
    }

    /// Declare a build property id.
    pub fn define_property(&mut self, id: impl Into<String>) {
        self.defined_properties.insert(id.into());
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Real tool of any tool.
    pub fn real_tool(&self, model: &Model, tool: ToolId) -> ToolId {
        self.tools.real(model, tool)
    }

    /// Nearest catalog tool of any tool.
    pub fn base_tool(&self, model: &Model, tool: ToolId) -> ToolId {
        self.tools.base(model, tool)
    }

    /// Catalog tools resolving to `real`.
    pub fn identical_tools(&self, real: ToolId) -> Vec<ToolId> {
        self.tools.identical(real)
    }

    /// Real tool-chain of any tool-chain.
    pub fn real_tool_chain(&self, model: &Model, tool_chain: ToolChainId) -> ToolChainId {
        self.tool_chains.real(model, tool_chain)
    }

    /// Nearest catalog tool-chain of any tool-chain.
    pub fn base_tool_chain(&self, model: &Model, tool_chain: ToolChainId) -> ToolChainId {
        self.tool_chains.base(model, tool_chain)
    }

    /// Registered converters.
    pub fn converters(&self) -> &ConverterRegistry {
        &self.converters
    }

    /// Find a converter from the real tool `from_real` to the catalog tool
    /// `to_base`, falling back to definitions identical to `to_base`.
    pub fn find_tool_converter(
        &self,
        model: &Model,
        from_real: ToolId,
        to_base: ToolId,
    ) -> Option<ConverterMatch<'_, ToolId>> {
        if let Some(descriptor) = self.converters.tool(from_real, to_base) {
            return Some(ConverterMatch { to: to_base, descriptor });
        }
        let to_real = self.real_tool(model, to_base);
        self.identical_tools(to_real)
            .into_iter()
            .filter(|candidate| *candidate != to_base)
            .find_map(|candidate| {
                self.converters
                    .tool(from_real, candidate)
                    .map(|descriptor| ConverterMatch { to: candidate, descriptor })
            })
    }

    /// Find a converter between tool-chains, with the same identical-definition
    /// fallback as [`Catalog::find_tool_converter`].
    pub fn find_tool_chain_converter(
        &self,
        model: &Model,
        from_real: ToolChainId,
        to_base: ToolChainId,
    ) -> Option<ConverterMatch<'_, ToolChainId>> {
        if let Some(descriptor) = self.converters.tool_chain(from_real, to_base) {
            return Some(ConverterMatch { to: to_base, descriptor });
        }
        let to_real = self.real_tool_chain(model, to_base);
        self.tool_chains
            .identical(to_real)
            .into_iter()
            .filter(|candidate| *candidate != to_base)
            .find_map(|candidate| {
                self.converters
                    .tool_chain(from_real, candidate)
                    .map(|descriptor| ConverterMatch { to: candidate, descriptor })
            })
    }

    /// Whether a build property id is defined.
    pub fn is_property_defined(&self, id: &str) -> bool {
        self.defined_properties.contains(id)
    }

    /// Mint a fresh id for an object overriding `super_id`.
    pub fn child_id(&self, super_id: &str) -> String {
        let n = self.next_child.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}.{}", super_id, n)
    }
}
