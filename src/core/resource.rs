//! Resource infos and configurations.
//!
//! A configuration is a named set of build settings for a project (Debug,
//! Release, ...). Its settings are scoped per resource: the root folder info
//! carries the configuration's tool-chain, sub-folders may carry their own,
//! and single files may override individual tools.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::core::id::{ConfigurationId, ResourceId, ToolChainId, ToolId};

/// Path of the root folder info of every configuration.
pub const ROOT_PATH: &str = "/";

/// Project language nature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectNature {
    /// Plain C project
    #[default]
    C,
    /// C++ project
    #[serde(alias = "cpp", alias = "c++")]
    Cxx,
}

/// The scope-specific part of a resource info.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceKind {
    /// Folder scope, tools come from its tool-chain.
    Folder { tool_chain: ToolChainId },
    /// File scope, tools are attached directly.
    File { tools: Vec<ToolId> },
}

/// Folder- or file-scoped build settings of a configuration.
#[derive(Debug, Clone)]
pub struct ResourceInfo {
    pub(crate) path: String,
    pub(crate) configuration: ConfigurationId,
    pub(crate) kind: ResourceKind,
    pub(crate) rebuild_needed: bool,
}

impl ResourceInfo {
    /// Project-relative path (`/` for the root folder).
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Owning configuration.
    pub fn configuration(&self) -> ConfigurationId {
        self.configuration
    }

    /// Folder or file scope.
    pub fn kind(&self) -> &ResourceKind {
        &self.kind
    }

    /// Whether this is a folder info.
    pub fn is_folder(&self) -> bool {
        matches!(self.kind, ResourceKind::Folder { .. })
    }

    /// Whether this is the configuration's root folder info.
    pub fn is_root(&self) -> bool {
        self.is_folder() && self.path == ROOT_PATH
    }

    /// The folder's tool-chain, if this is a folder info.
    pub fn tool_chain(&self) -> Option<ToolChainId> {
        match self.kind {
            ResourceKind::Folder { tool_chain } => Some(tool_chain),
            ResourceKind::File { .. } => None,
        }
    }

    /// Whether the last modification requires a rebuild.
    pub fn needs_rebuild(&self) -> bool {
        self.rebuild_needed
    }
}

/// A build configuration.
#[derive(Debug, Clone)]
pub struct Configuration {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) resources: Vec<ResourceId>,
    pub(crate) managed_build_on: bool,
    pub(crate) properties: BTreeMap<String, String>,
    pub(crate) required_properties: BTreeSet<String>,
}

impl Configuration {
    /// Create a configuration with managed build enabled.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Configuration {
            id: id.into(),
            name: name.into(),
            resources: Vec::new(),
            managed_build_on: true,
            properties: BTreeMap::new(),
            required_properties: BTreeSet::new(),
        }
    }

    /// Enable or disable the managed (generated makefile) build.
    pub fn with_managed_build(mut self, on: bool) -> Self {
        self.managed_build_on = on;
        self
    }

    /// Set a build property value.
    pub fn with_property(mut self, id: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(id.into(), value.into());
        self
    }

    /// Set a build property value that every tool must support.
    pub fn with_required_property(mut self, id: impl Into<String>, value: impl Into<String>) -> Self {
        let id = id.into();
        self.required_properties.insert(id.clone());
        self.properties.insert(id, value.into());
        self
    }

    /// Configuration id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Human-readable name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resource infos in creation order; the root folder comes first.
    pub fn resources(&self) -> &[ResourceId] {
        &self.resources
    }

    /// Whether the managed build is enabled.
    pub fn is_managed_build_on(&self) -> bool {
        self.managed_build_on
    }

    /// Build property values.
    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    /// Whether a property must be supported by every tool.
    pub fn is_required_property(&self, id: &str) -> bool {
        self.required_properties.contains(id)
    }

    /// Required properties that have no value.
    pub fn unspecified_required_properties(&self) -> impl Iterator<Item = &str> {
        self.required_properties
            .iter()
            .filter(|id| !self.properties.contains_key(*id))
            .map(String::as_str)
    }
}
