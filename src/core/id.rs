//! Typed arena handles for build objects.
//!
//! Every build object lives in the [`Model`](crate::core::Model) arena and is
//! addressed by a small `Copy` handle. Handles compare by identity: two handles
//! are equal only if they name the same slot of the same model.

use std::fmt;

/// Handle to a [`Tool`](crate::core::Tool) in a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ToolId(u32);

/// Handle to a [`ToolChain`](crate::core::ToolChain) in a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ToolChainId(u32);

/// Handle to a [`ResourceInfo`](crate::core::ResourceInfo) in a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(u32);

/// Handle to a [`Configuration`](crate::core::Configuration) in a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConfigurationId(u32);

impl ToolId {
    pub(crate) fn new(index: usize) -> Self {
        ToolId(index as u32)
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl ToolChainId {
    pub(crate) fn new(index: usize) -> Self {
        ToolChainId(index as u32)
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl ResourceId {
    pub(crate) fn new(index: usize) -> Self {
        ResourceId(index as u32)
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl ConfigurationId {
    pub(crate) fn new(index: usize) -> Self {
        ConfigurationId(index as u32)
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ToolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tool#{}", self.0)
    }
}

impl fmt::Display for ToolChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tool-chain#{}", self.0)
    }
}

/// Any build object that a converter can produce or consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildObject {
    Tool(ToolId),
    ToolChain(ToolChainId),
    Configuration(ConfigurationId),
}

impl BuildObject {
    /// The tool handle, if this object is a tool.
    pub fn as_tool(&self) -> Option<ToolId> {
        match self {
            BuildObject::Tool(id) => Some(*id),
            _ => None,
        }
    }

    /// The tool-chain handle, if this object is a tool-chain.
    pub fn as_tool_chain(&self) -> Option<ToolChainId> {
        match self {
            BuildObject::ToolChain(id) => Some(*id),
            _ => None,
        }
    }

    /// Short kind name used in messages.
    pub fn kind(&self) -> &'static str {
        match self {
            BuildObject::Tool(_) => "tool",
            BuildObject::ToolChain(_) => "tool-chain",
            BuildObject::Configuration(_) => "configuration",
        }
    }
}
