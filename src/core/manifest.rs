//! Project manifest parsing.
//!
//! A manifest describes the catalog (extension tools, tool-chains, aliases
//! and converters) together with one project: its nature, file associations
//! and configurations. Loading it produces a [`Project`], the model and
//! catalog every operation works on.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use miette::{Diagnostic, NamedSource, SourceSpan};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Topo;
use serde::Deserialize;
use thiserror::Error;

use crate::catalog::{Catalog, ConverterDescriptor};
use crate::core::error::ModelError;
use crate::core::hierarchy;
use crate::core::id::{ConfigurationId, ResourceId, ToolChainId, ToolId};
use crate::core::model::Model;
use crate::core::resource::{Configuration, ProjectNature, ROOT_PATH};
use crate::core::tool::{NatureFilter, Tool, ToolOwner};
use crate::core::tool_chain::ToolChain;
use crate::ops::settings::{instantiate_tool_chain, CopySettingsConverter};

/// Errors raised while reading a manifest.
#[derive(Debug, Error, Diagnostic)]
pub enum ManifestError {
    #[error("failed to read manifest `{path}`")]
    #[diagnostic(code(toolset::manifest::io))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse manifest: {message}")]
    #[diagnostic(code(toolset::manifest::parse))]
    Parse {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: Option<SourceSpan>,
    },

    #[error("duplicate {kind} id `{id}`")]
    #[diagnostic(code(toolset::manifest::duplicate_id))]
    DuplicateId { kind: &'static str, id: String },

    #[error("{kind} `{id}` refers to unknown {reference} `{target}`")]
    #[diagnostic(
        code(toolset::manifest::unknown_reference),
        help("Declare every referenced definition in the manifest")
    )]
    UnknownReference {
        kind: &'static str,
        id: String,
        reference: &'static str,
        target: String,
    },

    #[error("{kind} `{id}` has a cyclic superclass chain")]
    #[diagnostic(
        code(toolset::manifest::cycle),
        help("Superclass links must form chains ending at a definition without a superclass")
    )]
    Cycle { kind: &'static str, id: String },

    #[error("converter `{id}` has unknown kind `{kind}`")]
    #[diagnostic(code(toolset::manifest::converter_kind), help("Supported kinds: copy-settings"))]
    UnknownConverterKind { id: String, kind: String },

    #[error("converter `{id}` must convert between two tools or two tool-chains")]
    #[diagnostic(code(toolset::manifest::converter_target))]
    MismatchedConverter { id: String },

    #[error("configuration `{configuration}` requires property `{property}` without setting it")]
    #[diagnostic(code(toolset::manifest::required_property))]
    RequiredWithoutValue {
        configuration: String,
        property: String,
    },

    #[error("configuration `{configuration}` declares `{path}` twice")]
    #[diagnostic(code(toolset::manifest::duplicate_resource))]
    DuplicateResource { configuration: String, path: String },

    #[error("configuration `{configuration}` has settings for `{tool}`, which its root folder does not use")]
    #[diagnostic(code(toolset::manifest::settings_target))]
    UnusedSettings { configuration: String, tool: String },

    #[error(transparent)]
    #[diagnostic(code(toolset::manifest::model))]
    Model(#[from] ModelError),
}

// =============================================================================
// Schema
// =============================================================================

/// Parsed manifest contents.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub project: ProjectSection,
    #[serde(default, rename = "tool")]
    pub tools: Vec<ToolDef>,
    #[serde(default, rename = "tool_chain")]
    pub tool_chains: Vec<ToolChainDef>,
    #[serde(default, rename = "alias")]
    pub aliases: Vec<AliasDef>,
    #[serde(default, rename = "converter")]
    pub converters: Vec<ConverterDef>,
    #[serde(default, rename = "configuration")]
    pub configurations: Vec<ConfigurationDef>,
}

/// `[project]`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectSection {
    #[serde(default)]
    pub nature: ProjectNature,
    /// Defined build property ids.
    #[serde(default)]
    pub properties: Vec<String>,
    /// Content type -> extra file extensions.
    #[serde(default)]
    pub file_associations: BTreeMap<String, Vec<String>>,
}

/// `[[tool]]`
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolDef {
    pub id: String,
    pub name: Option<String>,
    pub superclass: Option<String>,
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    pub inputs: Option<Vec<String>>,
    pub content_types: Option<Vec<String>>,
    pub outputs: Option<Vec<String>>,
    pub output_variables: Option<Vec<String>>,
    pub managed_build: Option<bool>,
    pub nature: Option<NatureFilter>,
    #[serde(default)]
    pub supported_properties: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub settings: BTreeMap<String, String>,
}

/// `[[tool_chain]]`
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolChainDef {
    pub id: String,
    pub name: Option<String>,
    pub superclass: Option<String>,
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    #[serde(default)]
    pub tools: Vec<String>,
    pub target_tools: Option<Vec<String>>,
    pub managed_build: Option<bool>,
    #[serde(default)]
    pub supported_properties: BTreeMap<String, Vec<String>>,
}

/// Which kind of definition an alias groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AliasKind {
    #[default]
    Tool,
    ToolChain,
}

/// `[[alias]]` - `member` stands for the same logical definition as `real`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AliasDef {
    pub member: String,
    pub real: String,
    #[serde(default)]
    pub kind: AliasKind,
}

/// `[[converter]]`
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConverterDef {
    pub id: String,
    pub kind: String,
    pub from: String,
    pub to: String,
}

/// `[[configuration]]`
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigurationDef {
    pub id: String,
    pub name: Option<String>,
    /// Catalog tool-chain the root folder customizes.
    pub tool_chain: String,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
    #[serde(default)]
    pub required_properties: Vec<String>,
    pub managed_build: Option<bool>,
    /// Catalog tool id -> settings of the root folder tool customizing it.
    #[serde(default)]
    pub settings: BTreeMap<String, BTreeMap<String, String>>,
    #[serde(default, rename = "folder")]
    pub folders: Vec<FolderDef>,
    #[serde(default, rename = "file")]
    pub files: Vec<FileDef>,
}

/// `[[configuration.folder]]`
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FolderDef {
    pub path: String,
    /// Catalog tool-chain; without one the folder customizes the root's.
    pub tool_chain: Option<String>,
}

/// `[[configuration.file]]`
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileDef {
    pub path: String,
    pub tools: Vec<String>,
}

/// A loaded project: the build model and the catalog describing it.
#[derive(Debug)]
pub struct Project {
    pub model: Model,
    pub catalog: Catalog,
}

impl Project {
    /// Load and build the manifest at `path`.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        Manifest::load(path)?.build()
    }
}

// =============================================================================
// Loading
// =============================================================================

impl Manifest {
    /// Load a manifest from a file path.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.display().to_string(),
            source,
        })?;

        Self::parse(&content, path)
    }

    /// Parse manifest content.
    pub fn parse(content: &str, path: &Path) -> Result<Self, ManifestError> {
        toml::from_str(content).map_err(|e| ManifestError::Parse {
            message: e.message().to_string(),
            src: NamedSource::new(path.display().to_string(), content.to_string()),
            span: e.span().map(SourceSpan::from),
        })
    }

    /// Build the model and catalog described by the manifest.
    pub fn build(&self) -> Result<Project, ManifestError> {
        let mut model = Model::new();
        let mut catalog = Catalog::new();

        model.set_nature(self.project.nature);
        for (content_type, exts) in &self.project.file_associations {
            model.associate(content_type.clone(), exts.iter().cloned());
        }
        for property in &self.project.properties {
            catalog.define_property(property.clone());
        }

        self.add_tools(&mut model)?;
        self.add_tool_chains(&mut model)?;
        self.register_aliases(&model, &mut catalog)?;
        self.register_converters(&model, &mut catalog)?;

        for def in &self.configurations {
            add_configuration(&mut model, &catalog, def)?;
        }

        tracing::debug!(
            "loaded {} tools, {} tool-chains and {} configurations",
            self.tools.len(),
            self.tool_chains.len(),
            self.configurations.len()
        );
        Ok(Project { model, catalog })
    }

    fn add_tools(&self, model: &mut Model) -> Result<(), ManifestError> {
        let order = definition_order(
            "tool",
            self.tools.iter().map(|t| (t.id.as_str(), t.superclass.as_deref())),
        )?;

        for index in order {
            let def = &self.tools[index];
            let mut tool = Tool::extension(&def.id, def.name.as_deref().unwrap_or(&def.id));
            if let Some(superclass) = &def.superclass {
                tool = tool.with_superclass(model.require_tool(superclass)?);
            }
            if def.is_abstract {
                tool = tool.into_abstract();
            }
            if let Some(exts) = &def.inputs {
                tool = tool.with_inputs(exts);
            }
            if let Some(types) = &def.content_types {
                tool = tool.with_content_types(types);
            }
            if let Some(exts) = &def.outputs {
                tool = tool.with_outputs(exts);
            }
            if let Some(vars) = &def.output_variables {
                tool = tool.with_output_variables(vars);
            }
            if let Some(managed) = def.managed_build {
                tool = tool.with_managed_build(managed);
            }
            if let Some(nature) = def.nature {
                tool = tool.with_nature(nature);
            }
            for (property, values) in &def.supported_properties {
                tool = tool.with_supported_property(property, values);
            }
            for (key, value) in &def.settings {
                tool = tool.with_setting(key, value);
            }
            model.add_tool(tool);
        }
        Ok(())
    }

    fn add_tool_chains(&self, model: &mut Model) -> Result<(), ManifestError> {
        let order = definition_order(
            "tool_chain",
            self.tool_chains
                .iter()
                .map(|tc| (tc.id.as_str(), tc.superclass.as_deref())),
        )?;

        for index in order {
            let def = &self.tool_chains[index];
            let tools = def
                .tools
                .iter()
                .map(|id| tool_ref(model, "tool_chain", &def.id, id))
                .collect::<Result<Vec<_>, _>>()?;

            let mut tool_chain = ToolChain::extension(&def.id, def.name.as_deref().unwrap_or(&def.id))
                .with_tools(tools);
            if let Some(superclass) = &def.superclass {
                tool_chain = tool_chain.with_superclass(model.require_tool_chain(superclass)?);
            }
            if def.is_abstract {
                tool_chain = tool_chain.into_abstract();
            }
            if let Some(targets) = &def.target_tools {
                for id in targets {
                    tool_ref(model, "tool_chain", &def.id, id)?;
                }
                tool_chain = tool_chain.with_target_tools(targets);
            }
            if let Some(managed) = def.managed_build {
                tool_chain = tool_chain.with_managed_build(managed);
            }
            for (property, values) in &def.supported_properties {
                tool_chain = tool_chain.with_supported_property(property, values);
            }
            model.add_tool_chain(tool_chain);
        }
        Ok(())
    }

    fn register_aliases(&self, model: &Model, catalog: &mut Catalog) -> Result<(), ManifestError> {
        for alias in &self.aliases {
            match alias.kind {
                AliasKind::Tool => {
                    let member = tool_ref(model, "alias", &alias.member, &alias.member)?;
                    let real = tool_ref(model, "alias", &alias.member, &alias.real)?;
                    catalog.register_identical_tool(member, real);
                }
                AliasKind::ToolChain => {
                    let member = tool_chain_ref(model, "alias", &alias.member, &alias.member)?;
                    let real = tool_chain_ref(model, "alias", &alias.member, &alias.real)?;
                    catalog.register_identical_tool_chain(member, real);
                }
            }
        }
        Ok(())
    }

    fn register_converters(&self, model: &Model, catalog: &mut Catalog) -> Result<(), ManifestError> {
        let mut seen = HashSet::new();
        for def in &self.converters {
            if !seen.insert(def.id.as_str()) {
                return Err(ManifestError::DuplicateId {
                    kind: "converter",
                    id: def.id.clone(),
                });
            }
            if def.kind != CopySettingsConverter::KIND {
                return Err(ManifestError::UnknownConverterKind {
                    id: def.id.clone(),
                    kind: def.kind.clone(),
                });
            }
            let descriptor = ConverterDescriptor::new(&def.id, Arc::new(CopySettingsConverter));

            if let Some(from) = model.find_tool(&def.from) {
                match model.find_tool(&def.to) {
                    Some(to) => catalog.register_tool_converter(from, to, descriptor),
                    None if model.find_tool_chain(&def.to).is_some() => {
                        return Err(ManifestError::MismatchedConverter { id: def.id.clone() })
                    }
                    None => return Err(unknown_converter_end(def, "tool", &def.to)),
                }
            } else if let Some(from) = model.find_tool_chain(&def.from) {
                match model.find_tool_chain(&def.to) {
                    Some(to) => catalog.register_tool_chain_converter(from, to, descriptor),
                    None if model.find_tool(&def.to).is_some() => {
                        return Err(ManifestError::MismatchedConverter { id: def.id.clone() })
                    }
                    None => return Err(unknown_converter_end(def, "tool_chain", &def.to)),
                }
            } else {
                return Err(unknown_converter_end(def, "tool", &def.from));
            }
        }
        Ok(())
    }
}

fn unknown_converter_end(def: &ConverterDef, reference: &'static str, target: &str) -> ManifestError {
    ManifestError::UnknownReference {
        kind: "converter",
        id: def.id.clone(),
        reference,
        target: target.to_string(),
    }
}

/// Order definitions so that every superclass precedes its subclasses.
///
/// Returns indices into the definition list. Definitions without a
/// superclass keep their declaration order.
fn definition_order<'a>(
    kind: &'static str,
    defs: impl Iterator<Item = (&'a str, Option<&'a str>)>,
) -> Result<Vec<usize>, ManifestError> {
    let defs: Vec<_> = defs.collect();
    let mut graph: DiGraph<usize, ()> = DiGraph::new();
    let mut by_id: HashMap<&str, NodeIndex> = HashMap::new();

    for (index, (id, _)) in defs.iter().enumerate() {
        let node = graph.add_node(index);
        if by_id.insert(*id, node).is_some() {
            return Err(ManifestError::DuplicateId {
                kind,
                id: id.to_string(),
            });
        }
    }

    for (id, superclass) in &defs {
        let Some(superclass) = superclass else {
            continue;
        };
        let parent = by_id
            .get(superclass)
            .ok_or_else(|| ManifestError::UnknownReference {
                kind,
                id: id.to_string(),
                reference: kind,
                target: superclass.to_string(),
            })?;
        graph.add_edge(*parent, by_id[id], ());
    }

    let mut topo = Topo::new(&graph);
    let mut order = Vec::with_capacity(defs.len());
    while let Some(node) = topo.next(&graph) {
        order.push(graph[node]);
    }

    // Topo never reaches nodes on a cycle.
    if order.len() < defs.len() {
        let visited: HashSet<usize> = order.iter().copied().collect();
        let index = (0..defs.len()).find(|i| !visited.contains(i)).unwrap_or_default();
        return Err(ManifestError::Cycle {
            kind,
            id: defs[index].0.to_string(),
        });
    }
    Ok(order)
}

fn tool_ref(model: &Model, kind: &'static str, id: &str, target: &str) -> Result<ToolId, ManifestError> {
    model.find_tool(target).ok_or_else(|| ManifestError::UnknownReference {
        kind,
        id: id.to_string(),
        reference: "tool",
        target: target.to_string(),
    })
}

fn tool_chain_ref(
    model: &Model,
    kind: &'static str,
    id: &str,
    target: &str,
) -> Result<ToolChainId, ManifestError> {
    model
        .find_tool_chain(target)
        .ok_or_else(|| ManifestError::UnknownReference {
            kind,
            id: id.to_string(),
            reference: "tool_chain",
            target: target.to_string(),
        })
}

fn add_configuration(model: &mut Model, catalog: &Catalog, def: &ConfigurationDef) -> Result<(), ManifestError> {
    if model.find_configuration(&def.id).is_ok() {
        return Err(ManifestError::DuplicateId {
            kind: "configuration",
            id: def.id.clone(),
        });
    }

    let mut configuration = Configuration::new(&def.id, def.name.as_deref().unwrap_or(&def.id))
        .with_managed_build(def.managed_build.unwrap_or(true));
    for property in &def.required_properties {
        let value = def
            .properties
            .get(property)
            .ok_or_else(|| ManifestError::RequiredWithoutValue {
                configuration: def.id.clone(),
                property: property.clone(),
            })?;
        configuration = configuration.with_required_property(property, value);
    }
    for (property, value) in &def.properties {
        if !def.required_properties.contains(property) {
            configuration = configuration.with_property(property, value);
        }
    }
    let cfg = model.add_configuration(configuration);

    let ext_tc = tool_chain_ref(model, "configuration", &def.id, &def.tool_chain)?;
    let root_tc = instantiate_tool_chain(model, catalog, ext_tc, None);
    let root = model.add_folder(cfg, ROOT_PATH, root_tc);

    for (tool_id, settings) in &def.settings {
        let ext = tool_ref(model, "configuration", &def.id, tool_id)?;
        let tool = root_tool_for(model, root, ext).ok_or_else(|| ManifestError::UnusedSettings {
            configuration: def.id.clone(),
            tool: tool_id.clone(),
        })?;
        for (key, value) in settings {
            model.tool_mut(tool).set_setting(key, value);
        }
    }

    let mut paths: HashSet<&str> = HashSet::from([ROOT_PATH]);
    for folder in &def.folders {
        claim_path(&mut paths, def, &folder.path)?;
        let superclass = match &folder.tool_chain {
            Some(id) => tool_chain_ref(model, "configuration", &def.id, id)?,
            None => root_tc,
        };
        let tc = instantiate_tool_chain(model, catalog, superclass, None);
        model.add_folder(cfg, folder.path.as_str(), tc);
    }

    for file in &def.files {
        claim_path(&mut paths, def, &file.path)?;
        add_file(model, catalog, cfg, root, def, file)?;
    }
    Ok(())
}

fn claim_path<'a>(
    paths: &mut HashSet<&'a str>,
    def: &ConfigurationDef,
    path: &'a str,
) -> Result<(), ManifestError> {
    if paths.insert(path) {
        Ok(())
    } else {
        Err(ManifestError::DuplicateResource {
            configuration: def.id.clone(),
            path: path.to_string(),
        })
    }
}

/// The root folder tool customizing the catalog tool `ext`.
fn root_tool_for(model: &Model, root: ResourceId, ext: ToolId) -> Option<ToolId> {
    model
        .resource_tools(root)
        .into_iter()
        .find(|t| hierarchy::is_ancestor(model, *t, ext))
}

/// File tools customize the root folder's tool for the same catalog tool,
/// or the catalog tool itself when the root folder does not use it.
fn add_file(
    model: &mut Model,
    catalog: &Catalog,
    cfg: ConfigurationId,
    root: ResourceId,
    def: &ConfigurationDef,
    file: &FileDef,
) -> Result<(), ManifestError> {
    let resource = model.add_file(cfg, file.path.as_str(), Vec::new());
    let mut tools = Vec::with_capacity(file.tools.len());
    for tool_id in &file.tools {
        let ext = tool_ref(model, "configuration", &def.id, tool_id)?;
        let superclass = root_tool_for(model, root, ext).unwrap_or(ext);
        let id = catalog.child_id(model.tool(superclass).id());
        tools.push(model.create_child_tool(superclass, ToolOwner::Resource(resource), id));
    }
    model.set_resource_tools(resource, tools);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fixtures::gnu_manifest;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn build(content: &str) -> Result<Project, ManifestError> {
        Manifest::parse(content, &PathBuf::from("project.toml"))?.build()
    }

    #[test]
    fn test_build_gnu_manifest() {
        let project = build(gnu_manifest()).unwrap();
        let model = &project.model;

        let base = model.find_tool("cdt.c.compiler").unwrap();
        let gcc = model.find_tool("gnu.c.compiler").unwrap();
        assert!(model.tool(base).is_abstract());
        assert_eq!(model.tool(gcc).superclass(), Some(base));
        assert_eq!(model.input_extensions(gcc), &["c".to_string()]);
        // file association of the inherited content type
        assert!(model.all_input_extensions(gcc).contains("i"));

        let cfg = model.find_configuration("Debug").unwrap();
        assert_eq!(model.configuration(cfg).resources().len(), 3);
        assert_eq!(model.configuration(cfg).properties()["buildType"], "debug");
        assert!(project.catalog.is_property_defined("buildType"));
        assert!(!project.catalog.converters().is_empty());
    }

    #[test]
    fn test_configuration_settings_apply_to_root_tools() {
        let project = build(gnu_manifest()).unwrap();
        let model = &project.model;
        let cfg = model.find_configuration("debug").unwrap();
        let root = model.root_folder(cfg).unwrap();
        let gcc = model.find_tool("gnu.c.compiler").unwrap();

        let root_gcc = root_tool_for(model, root, gcc).unwrap();
        assert_eq!(model.setting(root_gcc, "opt"), Some("-O3"));
        assert_eq!(model.setting(root_gcc, "warnings"), Some("-Wall"));
        assert!(model.belongs_to(root_gcc, root));
    }

    #[test]
    fn test_folders_and_files_customize_root_tools() {
        let project = build(gnu_manifest()).unwrap();
        let model = &project.model;
        let cfg = model.find_configuration("debug").unwrap();
        let root = model.root_folder(cfg).unwrap();
        let root_tc = model.folder_tool_chain(root).unwrap();

        let legacy = model.find_resource(cfg, "src/legacy").unwrap();
        let legacy_tc = model.folder_tool_chain(legacy).unwrap();
        assert_eq!(model.tool_chain(legacy_tc).superclass(), Some(root_tc));

        let main = model.find_resource(cfg, "src/main.c").unwrap();
        let tools = model.resource_tools(main);
        assert_eq!(tools.len(), 1);
        let root_gcc = model.resource_tools(root)[0];
        assert_eq!(model.tool(tools[0]).superclass(), Some(root_gcc));
        assert!(model.belongs_to(tools[0], main));
    }

    #[test]
    fn test_superclass_may_be_declared_later() {
        let project = build(
            r#"
[[tool]]
id = "gcc.linux"
superclass = "gcc"

[[tool]]
id = "gcc"
inputs = ["c"]
"#,
        )
        .unwrap();
        let linux = project.model.find_tool("gcc.linux").unwrap();
        assert_eq!(project.model.input_extensions(linux), &["c".to_string()]);
        assert_eq!(project.model.tool(linux).name(), "gcc.linux");
    }

    #[test]
    fn test_superclass_cycle() {
        let err = build(
            r#"
[[tool]]
id = "a"
superclass = "b"

[[tool]]
id = "b"
superclass = "a"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ManifestError::Cycle { kind: "tool", .. }));
    }

    #[test]
    fn test_unknown_references() {
        let err = build(
            r#"
[[tool_chain]]
id = "gnu"
tools = ["gcc"]
"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ManifestError::UnknownReference { reference: "tool", ref target, .. } if target == "gcc"
        ));

        let err = build(
            r#"
[[tool]]
id = "gcc"
superclass = "missing"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ManifestError::UnknownReference { .. }));
    }

    #[test]
    fn test_duplicate_tool_id() {
        let err = build(
            r#"
[[tool]]
id = "gcc"

[[tool]]
id = "gcc"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ManifestError::DuplicateId { kind: "tool", .. }));
    }

    #[test]
    fn test_converter_validation() {
        let err = build(
            r#"
[[tool]]
id = "gcc"

[[tool_chain]]
id = "gnu"

[[converter]]
id = "odd"
kind = "copy-settings"
from = "gcc"
to = "gnu"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ManifestError::MismatchedConverter { .. }));

        let err = build(
            r#"
[[tool]]
id = "gcc"

[[converter]]
id = "script"
kind = "python"
from = "gcc"
to = "gcc"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ManifestError::UnknownConverterKind { .. }));
    }

    #[test]
    fn test_aliases_register_identical_definitions() {
        let project = build(
            r#"
[[tool]]
id = "gcc.linux"

[[tool]]
id = "gcc.cygwin"

[[alias]]
member = "gcc.cygwin"
real = "gcc.linux"
"#,
        )
        .unwrap();
        let linux = project.model.find_tool("gcc.linux").unwrap();
        let cygwin = project.model.find_tool("gcc.cygwin").unwrap();
        assert_eq!(project.catalog.real_tool(&project.model, cygwin), linux);
    }

    #[test]
    fn test_required_property_needs_value() {
        let err = build(
            r#"
[[tool_chain]]
id = "gnu"

[[configuration]]
id = "debug"
tool_chain = "gnu"
required_properties = ["buildType"]
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ManifestError::RequiredWithoutValue { .. }));
    }

    #[test]
    fn test_parse_error_points_at_source() {
        let err = Manifest::parse("[[tool]]\nid = 3\n", &PathBuf::from("project.toml")).unwrap_err();
        match err {
            ManifestError::Parse { span, .. } => assert!(span.is_some()),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_from_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("project.toml");
        std::fs::write(&path, gnu_manifest()).unwrap();

        let project = Project::load(&path).unwrap();
        assert!(project.model.find_tool_chain("llvm.toolchain").is_some());

        let missing = Project::load(&tmp.path().join("missing.toml")).unwrap_err();
        assert!(matches!(missing, ManifestError::Io { .. }));
    }
}
