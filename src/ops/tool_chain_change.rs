//! Replacing the tool-chain of a folder.

use tracing::debug;

use crate::catalog::{Catalog, ConversionError, ConversionRequest};
use crate::core::{BuildObject, Model, ResourceId, ToolChainId};
use crate::ops::disconnect::disconnect_dependents;
use crate::ops::modification::ModificationError;
use crate::ops::settings::instantiate_tool_chain;

/// Whether `candidate` stands for the same tool-chain as `current`.
pub fn is_tool_chain_compatible(
    model: &Model,
    catalog: &Catalog,
    current: ToolChainId,
    candidate: ToolChainId,
) -> bool {
    catalog.real_tool_chain(model, current) == catalog.real_tool_chain(model, candidate)
}

/// Make `folder` use a tool-chain derived from `new_superclass`.
///
/// A compatible tool-chain is kept. Otherwise a registered tool-chain
/// converter produces the replacement, or a fresh customization of
/// `new_superclass` takes over the settings of the current tools. Tools that
/// customized the old tools elsewhere in the configuration are disconnected.
pub fn change_tool_chain(
    model: &mut Model,
    catalog: &Catalog,
    folder: ResourceId,
    new_superclass: ToolChainId,
) -> Result<ToolChainId, ModificationError> {
    let current = model.folder_tool_chain(folder)?;
    if is_tool_chain_compatible(model, catalog, current, new_superclass) {
        debug!(
            "`{}` is compatible with `{}`, keeping it",
            model.tool_chain(current).id(),
            model.tool_chain(new_superclass).id()
        );
        return Ok(current);
    }

    let old_tools = model.tool_chain_tools(current).to_vec();
    let from_real = catalog.real_tool_chain(model, current);
    let to_base = catalog.base_tool_chain(model, new_superclass);

    let replacement = match catalog.find_tool_chain_converter(model, from_real, to_base) {
        Some(found) => {
            let request = ConversionRequest {
                from: BuildObject::ToolChain(current),
                to: BuildObject::ToolChain(found.to),
                resource: folder,
            };
            match found.descriptor.execute(model, catalog, &request)? {
                BuildObject::ToolChain(tc) => tc,
                other => {
                    return Err(ConversionError::IncompatibleResult {
                        converter: found.descriptor.id().to_string(),
                        produced: other.kind(),
                        expected: "tool-chain",
                    }
                    .into())
                }
            }
        }
        None => instantiate_tool_chain(model, catalog, new_superclass, Some(current)),
    };

    model.set_folder_tool_chain(folder, replacement)?;
    let configuration = model.resource(folder).configuration();
    for tool in old_tools {
        if !model.tool(tool).is_extension() {
            disconnect_dependents(model, configuration, tool);
        }
    }
    model.mark_rebuild(folder);

    debug!(
        "`{}` now uses `{}`",
        model.resource(folder).path(),
        model.tool_chain(replacement).id()
    );
    Ok(replacement)
}
