//! ToolListModificationInfo - the outcome of a reconciliation, ready to be
//! reviewed and applied.

use thiserror::Error;
use tracing::debug;

use crate::catalog::{Catalog, ConversionError};
use crate::core::{Model, ModelError, ResourceId, ToolId};
use crate::ops::analyze::{analyze, AnalysisOptions};
use crate::ops::converter_info::ConverterInfo;
use crate::ops::disconnect::disconnect_dependents;
use crate::ops::status::{Findings, ModificationStatus, Severity};
use crate::ops::target_tools::adjust_target_tools;
use crate::ops::tool_info::{ChangeKind, ToolInfo};

/// Errors raised while committing a modification.
#[derive(Debug, Error)]
pub enum ModificationError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("`{tool}` cannot be applied: {status}")]
    Unresolved { tool: String, status: String },

    #[error("folder `{path}` uses the catalog tool-chain `{tool_chain}` directly")]
    CatalogToolChain { path: String, tool_chain: String },

    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

/// A proposed change of a resource's tool list.
#[derive(Debug)]
pub struct ToolListModificationInfo<'c> {
    catalog: &'c Catalog,
    resource: ResourceId,
    resulting: Vec<ToolInfo>,
    removed: Vec<ToolInfo>,
    converters: Vec<ConverterInfo>,
}

impl<'c> ToolListModificationInfo<'c> {
    pub(crate) fn new(
        catalog: &'c Catalog,
        resource: ResourceId,
        resulting: Vec<ToolInfo>,
        removed: Vec<ToolInfo>,
        converters: Vec<ConverterInfo>,
    ) -> Self {
        ToolListModificationInfo {
            catalog,
            resource,
            resulting,
            removed,
            converters,
        }
    }

    /// Resource being modified.
    pub fn resource(&self) -> ResourceId {
        self.resource
    }

    /// ADDED and REMAINED entries, in requested order.
    pub fn resulting_infos(&self) -> &[ToolInfo] {
        &self.resulting
    }

    /// REMOVED entries, in current order.
    pub fn removed_infos(&self) -> &[ToolInfo] {
        &self.removed
    }

    /// Converters connecting removed and added entries.
    pub fn converters(&self) -> &[ConverterInfo] {
        &self.converters
    }

    fn tools_of(&self, kind: ChangeKind) -> Vec<ToolId> {
        self.resulting
            .iter()
            .chain(&self.removed)
            .filter(|info| info.kind() == kind)
            .map(ToolInfo::tool)
            .collect()
    }

    /// Requested tools not matched by a current tool.
    pub fn added_tools(&self) -> Vec<ToolId> {
        self.tools_of(ChangeKind::Added)
    }

    /// Current tools that go away.
    pub fn removed_tools(&self) -> Vec<ToolId> {
        self.tools_of(ChangeKind::Removed)
    }

    /// Current tools that stay.
    pub fn remained_tools(&self) -> Vec<ToolId> {
        self.tools_of(ChangeKind::Remained)
    }

    /// Whether anything is added or removed.
    pub fn is_changed(&self) -> bool {
        !self.removed.is_empty()
            || self
                .resulting
                .iter()
                .any(|info| info.kind() == ChangeKind::Added)
    }

    /// Resulting tools before instantiation: kept instances and the requested
    /// definitions of new tools.
    pub fn candidate_tools(&self) -> Vec<ToolId> {
        self.resulting.iter().map(ToolInfo::tool).collect()
    }

    /// Status of one entry, resolving it if needed.
    pub fn entry_status<'a>(&self, model: &mut Model, info: &'a ToolInfo) -> &'a ModificationStatus {
        info.status(model, self.catalog, &self.converters)
    }

    /// Resulting tool of the `index`th resulting entry.
    pub fn resulting_tool(&self, model: &mut Model, index: usize) -> Option<ToolId> {
        self.resulting[index].resulting_tool(model, self.catalog, &self.converters)
    }

    /// Every resulting tool that could be resolved, in requested order.
    pub fn resulting_tools(&self, model: &mut Model) -> Vec<ToolId> {
        self.resulting
            .iter()
            .filter_map(|info| info.resulting_tool(model, self.catalog, &self.converters))
            .collect()
    }

    /// Aggregate status: analysis of the resulting tools plus the entries
    /// that failed to resolve. Removed entries do not count.
    pub fn report(&self, model: &mut Model, options: &AnalysisOptions) -> ModificationStatus {
        let tools = self.resulting_tools(model);
        let failures: Vec<String> = self
            .resulting
            .iter()
            .filter_map(|info| {
                let status = info.status(model, self.catalog, &self.converters);
                (status.severity() == Severity::Error)
                    .then(|| format!("`{}`: {}", model.tool(info.tool()).id(), status))
            })
            .collect();

        let analysis = analyze(model, self.catalog, self.resource, &tools, options);
        if failures.is_empty() {
            return analysis;
        }
        ModificationStatus::from_findings(Findings {
            unsupported_required_properties: analysis.unsupported_required_properties().clone(),
            unsupported_properties: analysis.unsupported_properties().clone(),
            undefined_properties: analysis.undefined_properties().clone(),
            conflicting_tools: analysis.conflicting_tools().to_vec(),
            non_managed_build_tools: analysis.non_managed_build_tools().to_vec(),
            failures,
        })
    }

    /// Commit the resulting tools into the resource.
    ///
    /// Dependents of removed tools owned by the resource are disconnected
    /// first, and the catalog tools behind removed tools that the folder's
    /// tool-chain superclass provides are remembered as unused. The root
    /// folder's target tools follow the change. Returns the new tool list.
    pub fn apply(self, model: &mut Model) -> Result<Vec<ToolId>, ModificationError> {
        let info = model.resource(self.resource);
        let configuration = info.configuration();
        let is_root = info.is_root();
        let tool_chain = info.tool_chain();
        if let Some(tc) = tool_chain {
            if model.tool_chain(tc).is_extension() {
                return Err(ModificationError::CatalogToolChain {
                    path: info.path().to_string(),
                    tool_chain: model.tool_chain(tc).id().to_string(),
                });
            }
        }

        let mut tools = Vec::with_capacity(self.resulting.len());
        for entry in &self.resulting {
            let resolution = entry.resolve(model, self.catalog, &self.converters);
            match resolution.tool {
                Some(tool) => tools.push(tool),
                None => {
                    return Err(ModificationError::Unresolved {
                        tool: model.tool(entry.tool()).id().to_string(),
                        status: resolution.status.to_string(),
                    })
                }
            }
        }

        let removed = self.removed_tools();
        for tool in &removed {
            if model.belongs_to(*tool, self.resource) {
                disconnect_dependents(model, configuration, *tool);
            }
        }

        if let Some(tc) = tool_chain {
            if let Some(superclass) = model.tool_chain(tc).superclass() {
                for tool in &removed {
                    let base = self.catalog.base_tool(model, *tool);
                    if model.tool_chain_tools(superclass).contains(&base) {
                        model.tool_chain_mut(tc).add_unused_child(base);
                    }
                }
            }
        }

        model.set_resource_tools(self.resource, tools.clone());

        if let (true, Some(tc)) = (is_root, tool_chain) {
            let added: Vec<ToolId> = self
                .resulting
                .iter()
                .zip(&tools)
                .filter(|(info, _)| info.kind() == ChangeKind::Added)
                .map(|(_, tool)| *tool)
                .collect();
            adjust_target_tools(model, self.catalog, tc, &removed, &added);
        }

        model.mark_rebuild(self.resource);
        debug!(
            "applied {} tools to `{}`",
            tools.len(),
            model.resource(self.resource).path()
        );
        Ok(tools)
    }
}
