//! ToolChain - an ordered set of tools plus the build-wide attributes they share.

use std::collections::BTreeMap;

use crate::core::id::{ResourceId, ToolChainId, ToolId};
use crate::core::tool::SupportedProperties;

/// A tool-chain definition or folder-level customization.
#[derive(Debug, Clone)]
pub struct ToolChain {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) superclass: Option<ToolChainId>,
    pub(crate) extension: bool,
    pub(crate) is_abstract: bool,
    pub(crate) owner: Option<ResourceId>,
    pub(crate) tools: Vec<ToolId>,
    pub(crate) target_tool_ids: Option<Vec<String>>,
    pub(crate) unused_children: Vec<ToolId>,
    pub(crate) supports_managed_build: Option<bool>,
    pub(crate) supported_properties: Option<SupportedProperties>,
}

impl ToolChain {
    /// Create a catalog-defined tool-chain.
    pub fn extension(id: impl Into<String>, name: impl Into<String>) -> Self {
        ToolChain {
            id: id.into(),
            name: name.into(),
            superclass: None,
            extension: true,
            is_abstract: false,
            owner: None,
            tools: Vec::new(),
            target_tool_ids: None,
            unused_children: Vec::new(),
            supports_managed_build: None,
            supported_properties: None,
        }
    }

    /// Create a project-level tool-chain; the folder it is attached to
    /// becomes its owner.
    pub fn project(id: impl Into<String>, name: impl Into<String>) -> Self {
        ToolChain {
            extension: false,
            ..ToolChain::extension(id, name)
        }
    }

    /// Set the tool-chain this one overrides.
    pub fn with_superclass(mut self, superclass: ToolChainId) -> Self {
        self.superclass = Some(superclass);
        self
    }

    /// Mark the tool-chain as an abstract catalog base.
    pub fn into_abstract(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    /// Set the member tools.
    pub fn with_tools(mut self, tools: impl IntoIterator<Item = ToolId>) -> Self {
        self.tools = tools.into_iter().collect();
        self
    }

    /// Set the ids of the tools producing the final build artifact.
    pub fn with_target_tools(mut self, ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.target_tool_ids = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    /// Declare whether managed builds are supported.
    pub fn with_managed_build(mut self, supported: bool) -> Self {
        self.supports_managed_build = Some(supported);
        self
    }

    /// Declare the supported values of a build property.
    pub fn with_supported_property(
        mut self,
        property: impl Into<String>,
        values: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.supported_properties
            .get_or_insert_with(BTreeMap::new)
            .insert(property.into(), values.into_iter().map(Into::into).collect());
        self
    }

    /// The tool-chain's unique id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Human-readable name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The tool-chain this one overrides.
    pub fn superclass(&self) -> Option<ToolChainId> {
        self.superclass
    }

    /// Whether the catalog defines this tool-chain.
    pub fn is_extension(&self) -> bool {
        self.extension
    }

    /// Folder resource owning this tool-chain, for project tool-chains.
    pub fn owner(&self) -> Option<ResourceId> {
        self.owner
    }

    /// Tools declared directly on this tool-chain.
    pub fn own_tools(&self) -> &[ToolId] {
        &self.tools
    }

    /// Catalog tools that were removed from this tool-chain but that its
    /// superclass still defines.
    pub fn unused_children(&self) -> &[ToolId] {
        &self.unused_children
    }

    pub(crate) fn add_unused_child(&mut self, tool: ToolId) {
        if !self.unused_children.contains(&tool) {
            self.unused_children.push(tool);
        }
    }
}
