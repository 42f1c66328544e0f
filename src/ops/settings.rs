//! Setting transfer between tools.
//!
//! Used whenever a tool is replaced by a structurally different one: the new
//! tool starts from the settings of the tool it replaces wherever both
//! definitions know the same setting.

use tracing::trace;

use crate::catalog::{Catalog, ConversionError, ConversionRequest, Converter};
use crate::core::{BuildObject, Model, ToolChain, ToolChainId, ToolId, ToolOwner};

/// Copy `from`'s effective values onto `to` for every setting key that
/// `to`'s definition chain knows. Returns the number of values written.
pub fn copy_common_settings(model: &mut Model, from: ToolId, to: ToolId) -> usize {
    let known = model.defined_setting_keys(to);
    let source = model.effective_settings(from);
    let mut copied = 0;
    for (key, value) in source {
        if !known.contains(&key) || model.setting(to, &key) == Some(value.as_str()) {
            continue;
        }
        model.tool_mut(to).set_setting(key, value);
        copied += 1;
    }
    trace!(
        "copied {} common settings from `{}` to `{}`",
        copied,
        model.tool(from).id(),
        model.tool(to).id()
    );
    copied
}

/// Copy everything `from` sets itself and `to` does not override onto `to`.
pub fn copy_non_overridden(model: &mut Model, from: ToolId, to: ToolId) {
    let source = model.tool(from).clone();
    let target = model.tool_mut(to);

    for (key, value) in source.settings {
        target.settings.entry(key).or_insert(value);
    }
    if target.input_extensions.is_none() {
        target.input_extensions = source.input_extensions;
    }
    if target.input_content_types.is_none() {
        target.input_content_types = source.input_content_types;
    }
    if target.output_extensions.is_none() {
        target.output_extensions = source.output_extensions;
    }
    if target.output_variables.is_none() {
        target.output_variables = source.output_variables;
    }
    if target.supports_managed_build.is_none() {
        target.supports_managed_build = source.supports_managed_build;
    }
    if target.nature_filter.is_none() {
        target.nature_filter = source.nature_filter;
    }
    if target.supported_properties.is_none() {
        target.supported_properties = source.supported_properties;
    }
}

/// Pair each tool of `from` with the not yet paired tool of `to` sharing the
/// most input extensions. Tools sharing none stay unpaired.
pub fn best_matches(model: &Model, from: &[ToolId], to: &[ToolId]) -> Vec<(ToolId, ToolId)> {
    let mut available: Vec<ToolId> = to.to_vec();
    let mut pairs = Vec::new();

    for &source in from {
        let source_exts = model.all_input_extensions(source);
        let mut best: Option<(usize, usize)> = None;
        for (pos, candidate) in available.iter().enumerate() {
            let shared = model
                .all_input_extensions(*candidate)
                .intersection(&source_exts)
                .count();
            if shared > best.map_or(0, |(_, n)| n) {
                best = Some((pos, shared));
            }
        }
        if let Some((pos, _)) = best {
            pairs.push((source, available.remove(pos)));
        }
    }
    pairs
}

/// Create a project tool-chain overriding `superclass`, with a fresh child of
/// every tool the superclass provides. When `previous` is given, settings are
/// carried over from its tools by best input-extension match.
pub fn instantiate_tool_chain(
    model: &mut Model,
    catalog: &Catalog,
    superclass: ToolChainId,
    previous: Option<ToolChainId>,
) -> ToolChainId {
    let base = model.tool_chain(superclass);
    let tool_chain = ToolChain::project(catalog.child_id(base.id()), base.name().to_string())
        .with_superclass(superclass);
    let tc = model.add_tool_chain(tool_chain);

    let templates = model.tool_chain_tools(superclass).to_vec();
    let tools: Vec<ToolId> = templates
        .into_iter()
        .map(|t| {
            let id = catalog.child_id(model.tool(t).id());
            model.create_child_tool(t, ToolOwner::ToolChain(tc), id)
        })
        .collect();
    model.tool_chain_mut(tc).tools = tools.clone();

    if let Some(previous) = previous {
        let old = model.filter_tools(model.tool_chain_tools(previous));
        let new = model.filter_tools(&tools);
        for (from, to) in best_matches(model, &old, &new) {
            copy_common_settings(model, from, to);
        }
    }
    tc
}

/// Built-in converter: instantiates the target definition and carries the
/// common settings of the source over.
#[derive(Debug, Default, Clone, Copy)]
pub struct CopySettingsConverter;

impl CopySettingsConverter {
    /// Kind name used in manifests.
    pub const KIND: &'static str = "copy-settings";
}

impl Converter for CopySettingsConverter {
    fn convert(
        &self,
        model: &mut Model,
        catalog: &Catalog,
        request: &ConversionRequest,
    ) -> Result<BuildObject, ConversionError> {
        match (request.from, request.to) {
            (BuildObject::Tool(from), BuildObject::Tool(to)) => {
                let owner = model.owner_for(request.resource);
                let id = catalog.child_id(model.tool(to).id());
                let tool = model.create_child_tool(to, owner, id);
                copy_common_settings(model, from, tool);
                Ok(BuildObject::Tool(tool))
            }
            (BuildObject::ToolChain(from), BuildObject::ToolChain(to)) => Ok(BuildObject::ToolChain(
                instantiate_tool_chain(model, catalog, to, Some(from)),
            )),
            (from, to) => Err(ConversionError::Unsupported {
                converter: Self::KIND.to_string(),
                from: from.kind(),
                to: to.kind(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Tool;

    #[test]
    fn test_common_settings_only_copy_known_keys() {
        let mut model = Model::new();
        let gcc = model.add_tool(
            Tool::extension("gcc", "GCC")
                .with_setting("opt", "-O0")
                .with_setting("gcc.only", "x"),
        );
        let clang = model.add_tool(Tool::extension("clang", "Clang").with_setting("opt", "-O0"));
        let mine = model.add_tool(
            Tool::project("gcc.1", "GCC", ToolOwner::Catalog)
                .with_superclass(gcc)
                .with_setting("opt", "-O3"),
        );
        let target = model.add_tool(Tool::project("clang.1", "Clang", ToolOwner::Catalog).with_superclass(clang));

        assert_eq!(copy_common_settings(&mut model, mine, target), 1);
        assert_eq!(model.setting(target, "opt"), Some("-O3"));
        assert_eq!(model.setting(target, "gcc.only"), None);
    }

    #[test]
    fn test_best_matches_by_shared_inputs() {
        let mut model = Model::new();
        let cc = model.add_tool(Tool::extension("cc", "CC").with_inputs(["c"]));
        let cxx = model.add_tool(Tool::extension("cxx", "CXX").with_inputs(["cpp", "cc"]));
        let ld = model.add_tool(Tool::extension("ld", "LD").with_inputs(["o"]));
        let new_cc = model.add_tool(Tool::extension("clang", "Clang").with_inputs(["c", "m"]));
        let new_cxx = model.add_tool(Tool::extension("clang++", "Clang++").with_inputs(["cpp"]));

        let pairs = best_matches(&model, &[cc, cxx, ld], &[new_cxx, new_cc]);
        assert_eq!(pairs, vec![(cc, new_cc), (cxx, new_cxx)]);
    }
}
