//! Model - arena owning every build object of a project and its catalog.
//!
//! Catalog-defined tools and tool-chains live in the same arena as project
//! customizations so that override chains can cross from one to the other.
//! Superclass links always point at an object created earlier, which keeps
//! every chain finite and acyclic.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::core::error::ModelError;
use crate::core::hierarchy::{self, OverrideGraph};
use crate::core::id::{ConfigurationId, ResourceId, ToolChainId, ToolId};
use crate::core::resource::{
    Configuration, ProjectNature, ResourceInfo, ResourceKind, ROOT_PATH,
};
use crate::core::tool::{NatureFilter, SupportedProperties, Tool, ToolOwner};
use crate::core::tool_chain::ToolChain;

/// In-memory build model of one project.
#[derive(Debug, Clone, Default)]
pub struct Model {
    tools: Vec<Tool>,
    tool_chains: Vec<ToolChain>,
    resources: Vec<ResourceInfo>,
    configurations: Vec<Configuration>,
    tool_index: HashMap<String, ToolId>,
    tool_chain_index: HashMap<String, ToolChainId>,
    nature: ProjectNature,
    file_associations: BTreeMap<String, Vec<String>>,
}

impl Model {
    /// Create an empty model for a C project.
    pub fn new() -> Self {
        Model::default()
    }

    /// Set the project nature.
    pub fn set_nature(&mut self, nature: ProjectNature) {
        self.nature = nature;
    }

    /// Project nature.
    pub fn nature(&self) -> ProjectNature {
        self.nature
    }

    /// Associate extra file extensions with a content type.
    pub fn associate(&mut self, content_type: impl Into<String>, exts: impl IntoIterator<Item = impl Into<String>>) {
        self.file_associations
            .entry(content_type.into())
            .or_default()
            .extend(exts.into_iter().map(Into::into));
    }

    // =========================================================================
    // Tools
    // =========================================================================

    /// Add a tool to the arena.
    pub fn add_tool(&mut self, tool: Tool) -> ToolId {
        let id = ToolId::new(self.tools.len());
        debug_assert!(tool.superclass.map_or(true, |s| s.index() < id.index()));
        self.tool_index.entry(tool.id.clone()).or_insert(id);
        self.tools.push(tool);
        id
    }

    /// Get a tool.
    pub fn tool(&self, id: ToolId) -> &Tool {
        &self.tools[id.index()]
    }

    /// Get a tool for modification.
    pub fn tool_mut(&mut self, id: ToolId) -> &mut Tool {
        &mut self.tools[id.index()]
    }

    /// Look a tool up by its string id.
    pub fn find_tool(&self, id: &str) -> Option<ToolId> {
        self.tool_index.get(id).copied()
    }

    /// Look a tool up by its string id, failing on unknown ids.
    pub fn require_tool(&self, id: &str) -> Result<ToolId, ModelError> {
        self.find_tool(id)
            .ok_or_else(|| ModelError::UnknownTool(id.to_string()))
    }

    /// All tools in creation order.
    pub fn tools(&self) -> impl Iterator<Item = (ToolId, &Tool)> {
        self.tools
            .iter()
            .enumerate()
            .map(|(i, t)| (ToolId::new(i), t))
    }

    /// Create a project tool overriding `superclass`.
    pub fn create_child_tool(&mut self, superclass: ToolId, owner: ToolOwner, id: String) -> ToolId {
        let name = self.tool(superclass).name.clone();
        let tool = Tool::project(id, name, owner).with_superclass(superclass);
        self.add_tool(tool)
    }

    /// Repoint a tool to another superclass.
    ///
    /// The new superclass must already be an ancestor of `tool`.
    pub(crate) fn set_tool_superclass(&mut self, tool: ToolId, superclass: Option<ToolId>) {
        debug_assert!(superclass.map_or(true, |s| hierarchy::is_ancestor(self, tool, s)));
        self.tools[tool.index()].superclass = superclass;
    }

    fn inherited<T>(&self, tool: ToolId, field: impl Fn(&Tool) -> Option<&T>) -> Option<&T>
    where
        T: ?Sized,
    {
        hierarchy::ancestors(self, tool).find_map(|id| field(self.tool(id)))
    }

    /// Effective declared input extensions.
    pub fn input_extensions(&self, tool: ToolId) -> &[String] {
        self.inherited(tool, |t| t.input_extensions.as_deref())
            .unwrap_or(&[])
    }

    /// Input extensions including the project's file associations for the
    /// tool's input content types.
    pub fn all_input_extensions(&self, tool: ToolId) -> BTreeSet<String> {
        let mut exts: BTreeSet<String> = self.input_extensions(tool).iter().cloned().collect();
        let content_types = self
            .inherited(tool, |t| t.input_content_types.as_deref())
            .unwrap_or(&[]);
        for content_type in content_types {
            if let Some(extra) = self.file_associations.get(content_type) {
                exts.extend(extra.iter().cloned());
            }
        }
        exts
    }

    /// Effective output extensions.
    pub fn output_extensions(&self, tool: ToolId) -> &[String] {
        self.inherited(tool, |t| t.output_extensions.as_deref())
            .unwrap_or(&[])
    }

    /// Effective output build variables.
    pub fn output_variables(&self, tool: ToolId) -> &[String] {
        self.inherited(tool, |t| t.output_variables.as_deref())
            .unwrap_or(&[])
    }

    /// Effective supported build properties.
    pub fn tool_supported_properties(&self, tool: ToolId) -> Option<&SupportedProperties> {
        self.inherited(tool, |t| t.supported_properties.as_ref())
    }

    /// Effective value of a setting.
    pub fn setting(&self, tool: ToolId, key: &str) -> Option<&str> {
        self.inherited(tool, |t| t.settings.get(key))
            .map(String::as_str)
    }

    /// Every setting visible on the tool, nearest override winning.
    pub fn effective_settings(&self, tool: ToolId) -> BTreeMap<String, String> {
        let chain = hierarchy::ancestor_chain(self, tool);
        let mut settings = BTreeMap::new();
        for id in chain.into_iter().rev() {
            for (k, v) in &self.tool(id).settings {
                settings.insert(k.clone(), v.clone());
            }
        }
        settings
    }

    /// Setting keys defined anywhere in the tool's chain.
    pub fn defined_setting_keys(&self, tool: ToolId) -> BTreeSet<String> {
        hierarchy::ancestors(self, tool)
            .flat_map(|id| self.tool(id).settings.keys().cloned())
            .collect()
    }

    /// Whether the tool can take part in a build of the given kind.
    pub fn tool_supports_build(&self, tool: ToolId, managed: bool) -> bool {
        if !managed {
            return true;
        }
        self.inherited(tool, |t| t.supports_managed_build.as_ref())
            .copied()
            .unwrap_or(true)
    }

    /// Whether the tool applies to the project's nature.
    pub fn tool_matches_nature(&self, tool: ToolId) -> bool {
        let filter = self
            .inherited(tool, |t| t.nature_filter.as_ref())
            .copied()
            .unwrap_or_default();
        match (filter, self.nature) {
            (NatureFilter::Both, _) => true,
            (NatureFilter::C, ProjectNature::C) => true,
            (NatureFilter::Cxx, ProjectNature::Cxx) => true,
            _ => false,
        }
    }

    /// Keep only the tools applying to the project's nature.
    pub fn filter_tools(&self, tools: &[ToolId]) -> Vec<ToolId> {
        tools
            .iter()
            .copied()
            .filter(|t| self.tool_matches_nature(*t))
            .collect()
    }

    // =========================================================================
    // Tool-chains
    // =========================================================================

    /// Add a tool-chain to the arena.
    pub fn add_tool_chain(&mut self, tool_chain: ToolChain) -> ToolChainId {
        let id = ToolChainId::new(self.tool_chains.len());
        debug_assert!(tool_chain.superclass.map_or(true, |s| s.index() < id.index()));
        self.tool_chain_index
            .entry(tool_chain.id.clone())
            .or_insert(id);
        self.tool_chains.push(tool_chain);
        id
    }

    /// Get a tool-chain.
    pub fn tool_chain(&self, id: ToolChainId) -> &ToolChain {
        &self.tool_chains[id.index()]
    }

    /// Get a tool-chain for modification.
    pub fn tool_chain_mut(&mut self, id: ToolChainId) -> &mut ToolChain {
        &mut self.tool_chains[id.index()]
    }

    /// Look a tool-chain up by its string id.
    pub fn find_tool_chain(&self, id: &str) -> Option<ToolChainId> {
        self.tool_chain_index.get(id).copied()
    }

    /// Look a tool-chain up by its string id, failing on unknown ids.
    pub fn require_tool_chain(&self, id: &str) -> Result<ToolChainId, ModelError> {
        self.find_tool_chain(id)
            .ok_or_else(|| ModelError::UnknownToolChain(id.to_string()))
    }

    /// Tools of a tool-chain; a tool-chain without tools of its own uses its
    /// superclass's tools.
    pub fn tool_chain_tools(&self, tool_chain: ToolChainId) -> &[ToolId] {
        hierarchy::ancestors(self, tool_chain)
            .map(|id| self.tool_chain(id).tools.as_slice())
            .find(|tools| !tools.is_empty())
            .unwrap_or(&[])
    }

    /// Effective ids of the tools producing the final build artifact.
    pub fn target_tool_ids(&self, tool_chain: ToolChainId) -> &[String] {
        hierarchy::ancestors(self, tool_chain)
            .find_map(|id| self.tool_chain(id).target_tool_ids.as_deref())
            .unwrap_or(&[])
    }

    /// Effective supported build properties of a tool-chain.
    pub fn tool_chain_supported_properties(&self, tool_chain: ToolChainId) -> Option<&SupportedProperties> {
        hierarchy::ancestors(self, tool_chain)
            .find_map(|id| self.tool_chain(id).supported_properties.as_ref())
    }

    /// Whether the tool-chain declares support for managed builds.
    pub fn tool_chain_supports_managed_build(&self, tool_chain: ToolChainId) -> bool {
        hierarchy::ancestors(self, tool_chain)
            .find_map(|id| self.tool_chain(id).supports_managed_build)
            .unwrap_or(true)
    }

    // =========================================================================
    // Configurations and resources
    // =========================================================================

    /// Add a configuration (without resources) to the arena.
    pub fn add_configuration(&mut self, configuration: Configuration) -> ConfigurationId {
        let id = ConfigurationId::new(self.configurations.len());
        self.configurations.push(configuration);
        id
    }

    /// Get a configuration.
    pub fn configuration(&self, id: ConfigurationId) -> &Configuration {
        &self.configurations[id.index()]
    }

    /// Find a configuration by id or name.
    pub fn find_configuration(&self, key: &str) -> Result<ConfigurationId, ModelError> {
        self.configurations
            .iter()
            .position(|c| c.id == key || c.name == key)
            .map(ConfigurationId::new)
            .ok_or_else(|| ModelError::UnknownConfiguration(key.to_string()))
    }

    /// Attach a folder info using `tool_chain`.
    pub fn add_folder(
        &mut self,
        configuration: ConfigurationId,
        path: impl Into<String>,
        tool_chain: ToolChainId,
    ) -> ResourceId {
        let id = self.add_resource(configuration, path.into(), ResourceKind::Folder { tool_chain });
        let tc = &mut self.tool_chains[tool_chain.index()];
        if !tc.extension {
            tc.owner = Some(id);
        }
        id
    }

    /// Attach a file info using `tools`.
    pub fn add_file(
        &mut self,
        configuration: ConfigurationId,
        path: impl Into<String>,
        tools: Vec<ToolId>,
    ) -> ResourceId {
        self.add_resource(configuration, path.into(), ResourceKind::File { tools })
    }

    fn add_resource(&mut self, configuration: ConfigurationId, path: String, kind: ResourceKind) -> ResourceId {
        let id = ResourceId::new(self.resources.len());
        self.resources.push(ResourceInfo {
            path,
            configuration,
            kind,
            rebuild_needed: false,
        });
        self.configurations[configuration.index()].resources.push(id);
        id
    }

    /// Get a resource info.
    pub fn resource(&self, id: ResourceId) -> &ResourceInfo {
        &self.resources[id.index()]
    }

    /// Find the resource info of a configuration by path.
    pub fn find_resource(&self, configuration: ConfigurationId, path: &str) -> Result<ResourceId, ModelError> {
        let cfg = self.configuration(configuration);
        cfg.resources
            .iter()
            .copied()
            .find(|r| self.resource(*r).path == path)
            .ok_or_else(|| ModelError::UnknownResource {
                configuration: cfg.id.clone(),
                path: path.to_string(),
            })
    }

    /// The root folder info of a configuration.
    pub fn root_folder(&self, configuration: ConfigurationId) -> Result<ResourceId, ModelError> {
        self.find_resource(configuration, ROOT_PATH)
            .map_err(|_| ModelError::MissingRootFolder(self.configuration(configuration).id.clone()))
    }

    /// The tool-chain of a folder info, failing for file infos.
    pub fn folder_tool_chain(&self, resource: ResourceId) -> Result<ToolChainId, ModelError> {
        let info = self.resource(resource);
        info.tool_chain()
            .ok_or_else(|| ModelError::NotAFolder(info.path.clone()))
    }

    /// Tools currently applying to a resource, in order.
    pub fn resource_tools(&self, resource: ResourceId) -> Vec<ToolId> {
        match &self.resource(resource).kind {
            ResourceKind::Folder { tool_chain } => self.tool_chain_tools(*tool_chain).to_vec(),
            ResourceKind::File { tools } => tools.clone(),
        }
    }

    /// Replace the tools applying to a resource.
    pub fn set_resource_tools(&mut self, resource: ResourceId, tools: Vec<ToolId>) {
        match &mut self.resources[resource.index()].kind {
            ResourceKind::Folder { tool_chain } => {
                let tool_chain = *tool_chain;
                self.tool_chains[tool_chain.index()].tools = tools;
            }
            ResourceKind::File { tools: current } => *current = tools,
        }
    }

    /// Point a folder info at another tool-chain.
    pub fn set_folder_tool_chain(&mut self, resource: ResourceId, tool_chain: ToolChainId) -> Result<(), ModelError> {
        let info = &mut self.resources[resource.index()];
        match &mut info.kind {
            ResourceKind::Folder { tool_chain: current } => {
                *current = tool_chain;
                self.tool_chains[tool_chain.index()].owner = Some(resource);
                Ok(())
            }
            ResourceKind::File { .. } => Err(ModelError::NotAFolder(info.path.clone())),
        }
    }

    /// Owner that new tools of a resource get.
    pub fn owner_for(&self, resource: ResourceId) -> ToolOwner {
        match &self.resource(resource).kind {
            ResourceKind::Folder { tool_chain } => ToolOwner::ToolChain(*tool_chain),
            ResourceKind::File { .. } => ToolOwner::Resource(resource),
        }
    }

    /// Whether `tool` is defined by the resource itself rather than inherited
    /// from the catalog or another resource.
    pub fn belongs_to(&self, tool: ToolId, resource: ResourceId) -> bool {
        self.tool(tool).owner == self.owner_for(resource)
    }

    /// Flag a resource as needing a rebuild.
    pub fn mark_rebuild(&mut self, resource: ResourceId) {
        self.resources[resource.index()].rebuild_needed = true;
    }

    /// Whether the resource can build in the given mode. Decided by the
    /// configuration's required properties and the folder tool-chain; the
    /// resource's tools are judged separately by analysis.
    pub fn resource_supports_build(&self, resource: ResourceId, managed: bool) -> bool {
        let info = self.resource(resource);
        let configuration = self.configuration(info.configuration());
        if configuration.unspecified_required_properties().next().is_some() {
            return false;
        }
        match info.tool_chain() {
            Some(tool_chain) if !self.tool_chain_supports_managed_build(tool_chain) => !managed,
            _ => true,
        }
    }

    /// Whether every resource of the configuration can build in the given mode.
    pub fn configuration_supports_build(&self, configuration: ConfigurationId, managed: bool) -> bool {
        self.configuration(configuration)
            .resources
            .iter()
            .all(|r| self.resource_supports_build(*r, managed))
    }
}

impl OverrideGraph<ToolId> for Model {
    fn superclass_of(&self, id: ToolId) -> Option<ToolId> {
        self.tool(id).superclass
    }

    fn is_extension(&self, id: ToolId) -> bool {
        self.tool(id).extension
    }

    fn is_abstract(&self, id: ToolId) -> bool {
        self.tool(id).is_abstract
    }
}

impl OverrideGraph<ToolChainId> for Model {
    fn superclass_of(&self, id: ToolChainId) -> Option<ToolChainId> {
        self.tool_chain(id).superclass
    }

    fn is_extension(&self, id: ToolChainId) -> bool {
        self.tool_chain(id).extension
    }

    fn is_abstract(&self, id: ToolChainId) -> bool {
        self.tool_chain(id).is_abstract
    }
}
