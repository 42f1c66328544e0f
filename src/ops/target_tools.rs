//! Keeping a tool-chain's target tools valid when its tools change.

use std::collections::HashSet;

use tracing::debug;

use crate::catalog::Catalog;
use crate::core::hierarchy;
use crate::core::{Model, ToolChainId, ToolId};

/// Replace target tool ids that point at removed tools.
///
/// A target is kept when an added tool derives from the removed one;
/// otherwise it is replaced by the catalog id of a compatible added tool.
/// Returns whether the target list changed.
pub fn adjust_target_tools(
    model: &mut Model,
    catalog: &Catalog,
    tool_chain: ToolChainId,
    removed: &[ToolId],
    added: &[ToolId],
) -> bool {
    let mut targets = model.target_tool_ids(tool_chain).to_vec();
    if targets.is_empty() {
        return false;
    }

    let mut changed = false;
    for tool in removed {
        let chain_ids: HashSet<&str> = hierarchy::ancestors(&*model, *tool)
            .map(|id| model.tool(id).id())
            .collect();
        let Some(pos) = targets.iter().position(|id| chain_ids.contains(id.as_str())) else {
            continue;
        };
        let base = catalog.base_tool(model, *tool);
        if added.iter().any(|a| hierarchy::is_ancestor(&*model, *a, base)) {
            continue;
        }
        if let Some(replacement) = find_compatible_target_tool(model, *tool, added) {
            let id = model.tool(catalog.base_tool(model, replacement)).id().to_string();
            debug!("target tool `{}` replaced by `{}`", targets[pos], id);
            targets[pos] = id;
            changed = true;
        }
    }

    if changed {
        model.tool_chain_mut(tool_chain).target_tool_ids = Some(targets);
    }
    changed
}

/// The first candidate producing one of the output extensions of `tool`,
/// else the first producing one of its output build variables.
pub fn find_compatible_target_tool(model: &Model, tool: ToolId, candidates: &[ToolId]) -> Option<ToolId> {
    let outputs = model.output_extensions(tool);
    let by_output = candidates.iter().copied().find(|c| {
        model
            .output_extensions(*c)
            .iter()
            .any(|ext| outputs.contains(ext))
    });
    if by_output.is_some() {
        return by_output;
    }

    let variables = model.output_variables(tool);
    candidates.iter().copied().find(|c| {
        model
            .output_variables(*c)
            .iter()
            .any(|var| variables.contains(var))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Tool;
    use crate::test_support::fixtures::gnu_project;

    #[test]
    fn test_removed_target_replaced_by_output_match() {
        let mut fixture = gnu_project();
        let changed = adjust_target_tools(
            &mut fixture.model,
            &fixture.catalog,
            fixture.tool_chain,
            &[fixture.root_linker],
            &[fixture.archiver, fixture.lld],
        );
        assert!(changed);
        assert_eq!(fixture.model.target_tool_ids(fixture.tool_chain), ["llvm.lld"]);
        // the catalog tool-chain is untouched
        assert_eq!(fixture.model.target_tool_ids(fixture.gnu_tc), ["gnu.c.linker"]);
    }

    #[test]
    fn test_output_variable_fallback() {
        let mut fixture = gnu_project();
        let mold = fixture.model.add_tool(
            Tool::extension("mold", "Mold")
                .with_outputs(["out"])
                .with_output_variables(["EXECUTABLES"]),
        );
        assert_eq!(
            find_compatible_target_tool(&fixture.model, fixture.root_linker, &[fixture.archiver, mold]),
            Some(mold)
        );
    }

    #[test]
    fn test_derived_replacement_keeps_target() {
        let mut fixture = gnu_project();
        let changed = adjust_target_tools(
            &mut fixture.model,
            &fixture.catalog,
            fixture.tool_chain,
            &[fixture.root_linker],
            &[fixture.linker],
        );
        assert!(!changed);
        assert_eq!(fixture.model.target_tool_ids(fixture.tool_chain), ["gnu.c.linker"]);
    }

    #[test]
    fn test_non_target_removal_is_ignored() {
        let mut fixture = gnu_project();
        assert!(!adjust_target_tools(
            &mut fixture.model,
            &fixture.catalog,
            fixture.tool_chain,
            &[fixture.root_gcc],
            &[fixture.lld],
        ));
    }
}
