//! toolset - tool list reconciliation for managed C/C++ builds
//!
//! This crate provides the core library functionality for toolset: an
//! in-memory build model of tools and tool-chains with their override
//! hierarchies, and the engine that reconciles a resource's current tool
//! list with a requested one.

pub mod catalog;
pub mod core;
pub mod ops;
pub mod util;

/// Test utilities and mocks for toolset unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides a shared project fixture and a scriptable
/// converter.
#[cfg(test)]
pub mod test_support;

pub use catalog::Catalog;
pub use core::{
    manifest::Manifest, manifest::Project, model::Model, tool::Tool, tool_chain::ToolChain,
    BuildObject, ResourceId, ToolChainId, ToolId,
};
pub use ops::{ModificationStatus, ToolInfo, ToolListModificationInfo};
