//! Core data structures for toolset.
//!
//! This module contains the build model the reconciliation operations work on:
//! - Typed arena handles (ToolId, ToolChainId, ResourceId, ConfigurationId)
//! - Tools, tool-chains, resource infos and configurations
//! - Override-chain walks shared by tools and tool-chains
//! - The TOML project manifest

pub mod error;
pub mod hierarchy;
pub mod id;
pub mod manifest;
pub mod model;
pub mod resource;
pub mod tool;
pub mod tool_chain;

pub use error::ModelError;
pub use hierarchy::OverrideGraph;
pub use id::{BuildObject, ConfigurationId, ResourceId, ToolChainId, ToolId};
pub use manifest::{Manifest, ManifestError, Project};
pub use model::Model;
pub use resource::{Configuration, ProjectNature, ResourceInfo, ResourceKind, ROOT_PATH};
pub use tool::{NatureFilter, SupportedProperties, Tool, ToolOwner};
pub use tool_chain::ToolChain;
