//! Tool list reconciliation.
//!
//! Given the tools currently applying to a resource and the requested ones,
//! work out which tools stay, which go and which are new, then connect the
//! leaving and arriving tools through converters and best matches so that
//! the new tools can inherit what the user configured on the old ones.

use std::collections::{HashMap, VecDeque};

use tracing::{debug, trace};

use crate::catalog::Catalog;
use crate::core::hierarchy;
use crate::core::{BuildObject, Model, ResourceId, ToolId};
use crate::ops::converter_info::ConverterInfo;
use crate::ops::modification::ToolListModificationInfo;
use crate::ops::tool_info::{ChangeKind, Pairing, ToolInfo};

/// Knobs for [`reconcile_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileOptions {
    /// Pair removed and added tools through registered converters.
    pub converters: bool,
    /// Seed new tools with the settings of the closest removed tool.
    pub best_match: bool,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        ReconcileOptions {
            converters: true,
            best_match: true,
        }
    }
}

/// Reconcile the tools of `resource` from `from` to `to` with default options.
pub fn reconcile<'c>(
    model: &Model,
    catalog: &'c Catalog,
    resource: ResourceId,
    from: &[ToolId],
    to: &[ToolId],
) -> ToolListModificationInfo<'c> {
    reconcile_with(model, catalog, resource, from, to, &ReconcileOptions::default())
}

/// Reconcile the tools of `resource` from `from` to `to`.
///
/// Entries of `to` are matched against `from` by real tool, first come first
/// served; a match keeps the existing instance. Nothing is created until a
/// resulting tool is asked for.
pub fn reconcile_with<'c>(
    model: &Model,
    catalog: &'c Catalog,
    resource: ResourceId,
    from: &[ToolId],
    to: &[ToolId],
    options: &ReconcileOptions,
) -> ToolListModificationInfo<'c> {
    let from_reals: Vec<ToolId> = from
        .iter()
        .map(|tool| catalog.real_tool(model, *tool))
        .collect();
    let mut pending: HashMap<ToolId, VecDeque<usize>> = HashMap::new();
    for (pos, real) in from_reals.iter().enumerate() {
        pending.entry(*real).or_default().push_back(pos);
    }

    let mut consumed = vec![false; from.len()];
    let mut resulting = Vec::with_capacity(to.len());
    for tool in to {
        let real = catalog.real_tool(model, *tool);
        match pending.get_mut(&real).and_then(VecDeque::pop_front) {
            Some(pos) => {
                consumed[pos] = true;
                trace!("`{}` remains", model.tool(from[pos]).id());
                resulting.push(ToolInfo::remained(from[pos], resource, real));
            }
            None => {
                trace!("`{}` is added", model.tool(*tool).id());
                resulting.push(ToolInfo::added(*tool, resource));
            }
        }
    }

    let mut removed: Vec<ToolInfo> = from
        .iter()
        .zip(&from_reals)
        .enumerate()
        .filter(|(pos, _)| !consumed[*pos])
        .map(|(_, (tool, real))| {
            trace!("`{}` is removed", model.tool(*tool).id());
            ToolInfo::removed(*tool, resource, *real)
        })
        .collect();

    let converters = if options.converters {
        pair_converters(model, catalog, resource, &mut resulting, &mut removed)
    } else {
        Vec::new()
    };

    if options.best_match {
        assign_best_matches(model, catalog, &mut resulting, &removed);
    }

    ToolListModificationInfo::new(catalog, resource, resulting, removed, converters)
}

/// Reconcile from `from` to `from` minus `removed` plus `added`.
///
/// Removed tools are matched by real tool against their first occurrence.
/// Added tools whose real tool is already in the list are skipped, so the
/// result never lists one real tool twice through this entry point.
pub fn reconcile_delta<'c>(
    model: &Model,
    catalog: &'c Catalog,
    resource: ResourceId,
    from: &[ToolId],
    added: &[ToolId],
    removed: &[ToolId],
    options: &ReconcileOptions,
) -> ToolListModificationInfo<'c> {
    let mut to = from.to_vec();
    for tool in removed {
        let real = catalog.real_tool(model, *tool);
        if let Some(pos) = to.iter().position(|t| catalog.real_tool(model, *t) == real) {
            to.remove(pos);
        }
    }
    for tool in added {
        let real = catalog.real_tool(model, *tool);
        if to.iter().any(|t| catalog.real_tool(model, *t) == real) {
            debug!("skipping `{}`: already in the tool list", model.tool(*tool).id());
            continue;
        }
        to.push(*tool);
    }
    reconcile_with(model, catalog, resource, from, &to, options)
}

/// Pair removed tools local to the resource with added tools inherited from
/// elsewhere, through the first matching converter.
fn pair_converters(
    model: &Model,
    catalog: &Catalog,
    resource: ResourceId,
    resulting: &mut [ToolInfo],
    removed: &mut [ToolInfo],
) -> Vec<ConverterInfo> {
    let mut converters = Vec::new();

    for (r, removed_info) in removed.iter_mut().enumerate() {
        if !model.belongs_to(removed_info.tool(), resource) {
            continue;
        }
        let from_real = removed_info.real(model, catalog);

        for (a, added_info) in resulting.iter_mut().enumerate() {
            if added_info.kind() != ChangeKind::Added
                || added_info.pairing.is_some()
                || model.belongs_to(added_info.tool(), resource)
            {
                continue;
            }
            let to_base = added_info.base(model, catalog);
            let Some(found) = catalog.find_tool_converter(model, from_real, to_base) else {
                continue;
            };

            debug!(
                "converter `{}` pairs `{}` with `{}`",
                found.descriptor.id(),
                model.tool(removed_info.tool()).id(),
                model.tool(added_info.tool()).id()
            );
            let converter = converters.len();
            converters.push(ConverterInfo::new(
                resource,
                BuildObject::Tool(removed_info.tool()),
                BuildObject::Tool(found.to),
                found.descriptor.clone(),
            ));
            removed_info.pairing = Some(Pairing { partner: a, converter });
            added_info.pairing = Some(Pairing { partner: r, converter });
            break;
        }
    }
    converters
}

/// Give every unpaired added tool the unpaired removed tool sharing the
/// deepest common ancestor with it, first one winning ties.
fn assign_best_matches(
    model: &Model,
    catalog: &Catalog,
    resulting: &mut [ToolInfo],
    removed: &[ToolInfo],
) {
    for added in resulting.iter_mut() {
        if added.kind() != ChangeKind::Added || added.pairing.is_some() {
            continue;
        }
        let added_real = added.real(model, catalog);

        let mut best: Option<(usize, ToolId)> = None;
        for candidate in removed.iter().filter(|r| r.pairing.is_none()) {
            let candidate_real = candidate.real(model, catalog);
            let Some(ancestor) = hierarchy::common_ancestor(model, added_real, candidate_real) else {
                continue;
            };
            let depth = hierarchy::chain_depth(model, ancestor);
            if best.map_or(true, |(best_depth, _)| depth > best_depth) {
                best = Some((depth, candidate.tool()));
            }
        }

        if let Some((_, source)) = best {
            debug!(
                "`{}` takes its settings from `{}`",
                model.tool(added.tool()).id(),
                model.tool(source).id()
            );
            added.best_match = Some(source);
        }
    }
}
