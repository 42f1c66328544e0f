//! Converter registry - structural migrations between catalog definitions.
//!
//! A converter is registered for a (source, target) pair of catalog
//! definitions. Executing it produces the build object that replaces the
//! source in a project.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::catalog::Catalog;
use crate::core::{BuildObject, Model, ResourceId, ToolChainId, ToolId};

/// Error raised by a converter executor.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConversionError {
    #[error("converter `{converter}` cannot convert a {from} into a {to}")]
    Unsupported {
        converter: String,
        from: &'static str,
        to: &'static str,
    },

    #[error("converter `{converter}` produced a {produced}, expected a {expected}")]
    IncompatibleResult {
        converter: String,
        produced: &'static str,
        expected: &'static str,
    },

    #[error("converter `{converter}` failed: {message}")]
    Failed { converter: String, message: String },
}

/// What to convert, and where the result will live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionRequest {
    /// The object being migrated away from.
    pub from: BuildObject,
    /// The catalog definition the result must be shaped like.
    pub to: BuildObject,
    /// Resource the result is attached to.
    pub resource: ResourceId,
}

/// Executes a structural conversion.
pub trait Converter: fmt::Debug + Send + Sync {
    /// Convert `request.from` into an object shaped like `request.to`.
    fn convert(
        &self,
        model: &mut Model,
        catalog: &Catalog,
        request: &ConversionRequest,
    ) -> Result<BuildObject, ConversionError>;
}

/// A registered converter and its executor.
#[derive(Debug, Clone)]
pub struct ConverterDescriptor {
    id: String,
    executor: Arc<dyn Converter>,
}

impl ConverterDescriptor {
    /// Create a descriptor.
    pub fn new(id: impl Into<String>, executor: Arc<dyn Converter>) -> Self {
        ConverterDescriptor {
            id: id.into(),
            executor,
        }
    }

    /// Converter id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Run the executor.
    pub fn execute(
        &self,
        model: &mut Model,
        catalog: &Catalog,
        request: &ConversionRequest,
    ) -> Result<BuildObject, ConversionError> {
        tracing::debug!("running converter `{}` for {:?}", self.id, request);
        self.executor.convert(model, catalog, request)
    }
}

/// Converters keyed by (source, target) catalog definitions.
#[derive(Debug, Clone, Default)]
pub struct ConverterRegistry {
    tools: Vec<(ToolId, ToolId, ConverterDescriptor)>,
    tool_chains: Vec<(ToolChainId, ToolChainId, ConverterDescriptor)>,
}

impl ConverterRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool converter.
    pub fn register_tool(&mut self, from: ToolId, to: ToolId, descriptor: ConverterDescriptor) {
        self.tools.push((from, to, descriptor));
    }

    /// Register a tool-chain converter.
    pub fn register_tool_chain(
        &mut self,
        from: ToolChainId,
        to: ToolChainId,
        descriptor: ConverterDescriptor,
    ) {
        self.tool_chains.push((from, to, descriptor));
    }

    /// The first tool converter registered for the pair.
    pub fn tool(&self, from: ToolId, to: ToolId) -> Option<&ConverterDescriptor> {
        self.tools
            .iter()
            .find(|(f, t, _)| *f == from && *t == to)
            .map(|(_, _, d)| d)
    }

    /// The first tool-chain converter registered for the pair.
    pub fn tool_chain(&self, from: ToolChainId, to: ToolChainId) -> Option<&ConverterDescriptor> {
        self.tool_chains
            .iter()
            .find(|(f, t, _)| *f == from && *t == to)
            .map(|(_, _, d)| d)
    }

    /// Number of registered converters.
    pub fn len(&self) -> usize {
        self.tools.len() + self.tool_chains.len()
    }

    /// Whether no converter is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
