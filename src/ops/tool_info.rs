//! ToolInfo - one tool's role in a tool list modification.

use std::cell::OnceCell;
use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::catalog::{Catalog, ConversionError};
use crate::core::{BuildObject, Model, ResourceId, ToolId};
use crate::ops::converter_info::ConverterInfo;
use crate::ops::settings::copy_common_settings;
use crate::ops::status::{ModificationStatus, CONVERSION_FAILURE, TOOL_REMOVED};

/// Classification of a tool in a modification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeKind {
    Added,
    Removed,
    Remained,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeKind::Added => write!(f, "ADDED"),
            ChangeKind::Removed => write!(f, "REMOVED"),
            ChangeKind::Remained => write!(f, "REMAINED"),
        }
    }
}

/// Link between a REMOVED and an ADDED entry connected by a converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pairing {
    /// Index of the partner entry in the opposite list.
    pub partner: usize,
    /// Index of the connecting converter.
    pub converter: usize,
}

/// The tool an entry ends up as, and how that went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub tool: Option<ToolId>,
    pub status: ModificationStatus,
}

/// A tool wrapped with its classification and lazily computed identities.
#[derive(Debug)]
pub struct ToolInfo {
    tool: ToolId,
    kind: ChangeKind,
    resource: ResourceId,
    real: OnceCell<ToolId>,
    base: OnceCell<ToolId>,
    pub(crate) pairing: Option<Pairing>,
    pub(crate) best_match: Option<ToolId>,
    resolution: OnceCell<Resolution>,
}

impl ToolInfo {
    fn new(tool: ToolId, kind: ChangeKind, resource: ResourceId) -> Self {
        ToolInfo {
            tool,
            kind,
            resource,
            real: OnceCell::new(),
            base: OnceCell::new(),
            pairing: None,
            best_match: None,
            resolution: OnceCell::new(),
        }
    }

    /// A tool that is not part of the current list yet.
    pub fn added(tool: ToolId, resource: ResourceId) -> Self {
        ToolInfo::new(tool, ChangeKind::Added, resource)
    }

    /// A current tool kept as is.
    pub fn remained(tool: ToolId, resource: ResourceId, real: ToolId) -> Self {
        let info = ToolInfo::new(tool, ChangeKind::Remained, resource);
        let _ = info.real.set(real);
        let _ = info.resolution.set(Resolution {
            tool: Some(tool),
            status: ModificationStatus::ok(),
        });
        info
    }

    /// A current tool that goes away.
    pub fn removed(tool: ToolId, resource: ResourceId, real: ToolId) -> Self {
        let info = ToolInfo::new(tool, ChangeKind::Removed, resource);
        let _ = info.real.set(real);
        let _ = info.resolution.set(Resolution {
            tool: None,
            status: ModificationStatus::error(TOOL_REMOVED),
        });
        info
    }

    /// The wrapped tool.
    pub fn tool(&self) -> ToolId {
        self.tool
    }

    /// Classification.
    pub fn kind(&self) -> ChangeKind {
        self.kind
    }

    /// Resource being modified.
    pub fn resource(&self) -> ResourceId {
        self.resource
    }

    /// Converter pairing, if any.
    pub fn pairing(&self) -> Option<Pairing> {
        self.pairing
    }

    /// Removed tool the resulting tool copies its settings from.
    pub fn best_match(&self) -> Option<ToolId> {
        self.best_match
    }

    /// Real tool of the wrapped tool.
    pub fn real(&self, model: &Model, catalog: &Catalog) -> ToolId {
        *self.real.get_or_init(|| catalog.real_tool(model, self.tool))
    }

    /// Nearest catalog tool of the wrapped tool.
    pub fn base(&self, model: &Model, catalog: &Catalog) -> ToolId {
        *self.base.get_or_init(|| catalog.base_tool(model, self.tool))
    }

    /// Compute the resulting tool on first call. ADDED entries may create
    /// objects in `model`; later calls return the memoized outcome.
    pub fn resolve(
        &self,
        model: &mut Model,
        catalog: &Catalog,
        converters: &[ConverterInfo],
    ) -> &Resolution {
        self.resolution
            .get_or_init(|| self.resolve_added(model, catalog, converters))
    }

    /// Resulting tool, see [`ToolInfo::resolve`].
    pub fn resulting_tool(
        &self,
        model: &mut Model,
        catalog: &Catalog,
        converters: &[ConverterInfo],
    ) -> Option<ToolId> {
        self.resolve(model, catalog, converters).tool
    }

    /// Status of the resulting tool computation, see [`ToolInfo::resolve`].
    pub fn status(
        &self,
        model: &mut Model,
        catalog: &Catalog,
        converters: &[ConverterInfo],
    ) -> &ModificationStatus {
        &self.resolve(model, catalog, converters).status
    }

    fn resolve_added(
        &self,
        model: &mut Model,
        catalog: &Catalog,
        converters: &[ConverterInfo],
    ) -> Resolution {
        if let Some(pairing) = self.pairing {
            let converter = &converters[pairing.converter];
            let outcome = match converter.converted(model, catalog) {
                Ok(BuildObject::Tool(tool)) => Ok(*tool),
                Ok(other) => Err(ConversionError::IncompatibleResult {
                    converter: converter.descriptor().id().to_string(),
                    produced: other.kind(),
                    expected: "tool",
                }),
                Err(err) => Err(err.clone()),
            };
            return match outcome {
                Ok(tool) => {
                    debug!("`{}` converted into `{}`", model.tool(self.tool).id(), model.tool(tool).id());
                    Resolution {
                        tool: Some(tool),
                        status: ModificationStatus::ok(),
                    }
                }
                Err(err) => Resolution {
                    tool: None,
                    status: ModificationStatus::error(format!("{}: {}", CONVERSION_FAILURE, err)),
                },
            };
        }

        if model.belongs_to(self.tool, self.resource) {
            return Resolution {
                tool: Some(self.tool),
                status: ModificationStatus::ok(),
            };
        }

        let id = catalog.child_id(model.tool(self.tool).id());
        let owner = model.owner_for(self.resource);
        let child = model.create_child_tool(self.tool, owner, id);
        if let Some(source) = self.best_match {
            copy_common_settings(model, source, child);
        }
        debug!(
            "instantiated `{}` from `{}`{}",
            model.tool(child).id(),
            model.tool(self.tool).id(),
            match self.best_match {
                Some(source) => format!(" with settings of `{}`", model.tool(source).id()),
                None => String::new(),
            }
        );
        Resolution {
            tool: Some(child),
            status: ModificationStatus::ok(),
        }
    }
}
