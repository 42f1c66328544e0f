//! Tool - a single build step definition (compiler, assembler, linker, ...).
//!
//! Attributes left as `None` are inherited from the superclass; the effective
//! value of any attribute is resolved by walking the override chain in
//! [`Model`](crate::core::Model).

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::core::id::{ResourceId, ToolChainId, ToolId};

/// Supported values per build property id.
pub type SupportedProperties = BTreeMap<String, BTreeSet<String>>;

/// Who owns a tool instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolOwner {
    /// Defined by the catalog, shared by every project.
    Catalog,
    /// Child of a (folder-level) tool-chain.
    ToolChain(ToolChainId),
    /// Attached directly to a file-level resource.
    Resource(ResourceId),
}

/// Which project natures a tool applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NatureFilter {
    /// Applies to C and C++ projects
    #[default]
    Both,
    /// C projects only
    C,
    /// C++ projects only
    #[serde(alias = "cpp", alias = "c++")]
    Cxx,
}

/// A build tool definition or customization.
#[derive(Debug, Clone)]
pub struct Tool {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) superclass: Option<ToolId>,
    pub(crate) extension: bool,
    pub(crate) is_abstract: bool,
    pub(crate) owner: ToolOwner,
    pub(crate) input_extensions: Option<Vec<String>>,
    pub(crate) input_content_types: Option<Vec<String>>,
    pub(crate) output_extensions: Option<Vec<String>>,
    pub(crate) output_variables: Option<Vec<String>>,
    pub(crate) supports_managed_build: Option<bool>,
    pub(crate) nature_filter: Option<NatureFilter>,
    pub(crate) supported_properties: Option<SupportedProperties>,
    pub(crate) settings: BTreeMap<String, String>,
}

impl Tool {
    /// Create a catalog-defined tool.
    pub fn extension(id: impl Into<String>, name: impl Into<String>) -> Self {
        Tool {
            id: id.into(),
            name: name.into(),
            superclass: None,
            extension: true,
            is_abstract: false,
            owner: ToolOwner::Catalog,
            input_extensions: None,
            input_content_types: None,
            output_extensions: None,
            output_variables: None,
            supports_managed_build: None,
            nature_filter: None,
            supported_properties: None,
            settings: BTreeMap::new(),
        }
    }

    /// Create a project-level tool owned by `owner`.
    pub fn project(id: impl Into<String>, name: impl Into<String>, owner: ToolOwner) -> Self {
        Tool {
            extension: false,
            owner,
            ..Tool::extension(id, name)
        }
    }

    /// Set the tool this one overrides.
    pub fn with_superclass(mut self, superclass: ToolId) -> Self {
        self.superclass = Some(superclass);
        self
    }

    /// Mark the tool as an abstract catalog base.
    pub fn into_abstract(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    /// Declare input file extensions.
    pub fn with_inputs(mut self, exts: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.input_extensions = Some(exts.into_iter().map(Into::into).collect());
        self
    }

    /// Declare input content types (resolved through project file associations).
    pub fn with_content_types(mut self, types: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.input_content_types = Some(types.into_iter().map(Into::into).collect());
        self
    }

    /// Declare output file extensions.
    pub fn with_outputs(mut self, exts: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.output_extensions = Some(exts.into_iter().map(Into::into).collect());
        self
    }

    /// Declare build variables the tool's outputs are collected into.
    pub fn with_output_variables(
        mut self,
        vars: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.output_variables = Some(vars.into_iter().map(Into::into).collect());
        self
    }

    /// Declare whether managed (generated makefile) builds are supported.
    pub fn with_managed_build(mut self, supported: bool) -> Self {
        self.supports_managed_build = Some(supported);
        self
    }

    /// Restrict the tool to a project nature.
    pub fn with_nature(mut self, filter: NatureFilter) -> Self {
        self.nature_filter = Some(filter);
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

    /// Set a setting value on this tool.
    pub fn with_setting(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.settings.insert(key.into(), value.into());
        self
    }

    /// The tool's unique id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Human-readable name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The tool this one overrides.
    pub fn superclass(&self) -> Option<ToolId> {
        self.superclass
    }

    /// Whether the catalog defines this tool.
    pub fn is_extension(&self) -> bool {
        self.extension
    }

    /// Whether this is an abstract catalog base.
    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    /// Who owns the tool.
    pub fn owner(&self) -> ToolOwner {
        self.owner
    }

    /// Settings set on this tool itself (not inherited ones).
    pub fn settings(&self) -> &BTreeMap<String, String> {
        &self.settings
    }

    /// Set (override) a setting on this tool.
    pub fn set_setting(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.settings.insert(key.into(), value.into());
    }

    /// Whether this tool overrides `key` locally.
    pub fn overrides(&self, key: &str) -> bool {
        self.settings.contains_key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_tool_keeps_builder_defaults() {
        let tool = Tool::project("gcc.1", "GCC", ToolOwner::Catalog)
            .with_inputs(["c"])
            .with_setting("opt", "-O2");

        assert!(!tool.is_extension());
        assert_eq!(tool.input_extensions.as_deref(), Some(&["c".to_string()][..]));
        assert!(tool.overrides("opt"));
        assert!(!tool.overrides("debug"));
    }

    #[test]
    fn test_nature_filter_aliases() {
        #[derive(Deserialize)]
        struct Wrapper {
            nature: NatureFilter,
        }

        let w: Wrapper = toml::from_str("nature = \"c++\"").unwrap();
        assert_eq!(w.nature, NatureFilter::Cxx);
        let w: Wrapper = toml::from_str("nature = \"both\"").unwrap();
        assert_eq!(w.nature, NatureFilter::Both);
    }
}
