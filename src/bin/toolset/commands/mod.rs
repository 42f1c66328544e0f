//! Command implementations

pub mod check;
pub mod completions;
pub mod plan;
pub mod switch;

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::{anyhow, Result};
use serde::Serialize;

use crate::cli::ProjectArgs;
use toolset::core::{ConfigurationId, Model, Project, ResourceId, ToolId};
use toolset::ops::{ModificationStatus, Severity};
use toolset::util::config::{global_config_path, load_config, project_config_path, Config, OutputFormat};
use toolset::util::diagnostic::{self, suggestions};

/// A loaded project plus the settings a command runs with.
pub struct Session {
    pub project: Project,
    pub config: Config,
    pub configuration: ConfigurationId,
    pub json: bool,
    pub color: bool,
}

impl Session {
    /// Load the manifest, the layered configuration and the selected
    /// build configuration.
    pub fn open(args: &ProjectArgs, color: bool) -> Result<Self> {
        let project = Project::load(&args.manifest)?;

        let project_root = args
            .manifest
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let global = global_config_path().unwrap_or_default();
        let config = load_config(&global, &project_config_path(project_root));

        let configuration = project.model.find_configuration(&args.config).map_err(|e| {
            anyhow!("{}\n{}", e, suggestions::CONFIGURATION_NOT_FOUND)
        })?;

        Ok(Session {
            json: args.json || config.output_format() == OutputFormat::Json,
            color: color && config.color(),
            project,
            config,
            configuration,
        })
    }

    /// Resource info of the selected configuration at `path`.
    pub fn resource(&self, path: &str) -> Result<ResourceId> {
        self.project
            .model
            .find_resource(self.configuration, path)
            .map_err(|e| anyhow!("{}\n{}", e, suggestions::RESOURCE_NOT_FOUND))
    }
}

/// Look tools up by id.
pub fn tool_ids(model: &Model, ids: &[String]) -> Result<Vec<ToolId>> {
    ids.iter()
        .map(|id| {
            model
                .require_tool(id)
                .map_err(|e| anyhow!("{}\n{}", e, suggestions::TOOL_NOT_FOUND))
        })
        .collect()
}

/// Comma-separated tool ids.
pub fn tool_names(model: &Model, tools: &[ToolId]) -> String {
    tools
        .iter()
        .map(|t| model.tool(*t).id())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Serializable form of a [`ModificationStatus`].
#[derive(Debug, Serialize)]
pub struct StatusView {
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub unsupported_required_properties: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub unsupported_properties: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub undefined_properties: BTreeSet<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub conflicting_tools: Vec<Vec<String>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub non_managed_build_tools: Vec<String>,
}

impl StatusView {
    pub fn new(model: &Model, status: &ModificationStatus) -> Self {
        let ids = |tools: &[ToolId]| -> Vec<String> {
            tools.iter().map(|t| model.tool(*t).id().to_string()).collect()
        };
        StatusView {
            severity: status.severity(),
            message: status.message().map(str::to_string),
            failures: status.failures().to_vec(),
            unsupported_required_properties: status.unsupported_required_properties().clone(),
            unsupported_properties: status.unsupported_properties().clone(),
            undefined_properties: status.undefined_properties().clone(),
            conflicting_tools: status.conflicting_tools().iter().map(|g| ids(g)).collect(),
            non_managed_build_tools: ids(status.non_managed_build_tools()),
        }
    }
}

/// Print the findings of a status to stderr.
pub fn emit_status(model: &Model, status: &ModificationStatus, color: bool) {
    for diag in status.to_diagnostics(model) {
        diagnostic::emit(&diag, color);
    }
}

/// Print a value as pretty JSON to stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
