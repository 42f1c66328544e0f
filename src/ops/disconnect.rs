//! Severing customization links to tools that leave a configuration.
//!
//! A project tool may be customized further down the resource tree (a
//! sub-folder or file tool overriding a folder tool). When the overridden
//! tool goes away its direct children are re-parented one level up and keep
//! their effective values.

use tracing::debug;

use crate::core::{ConfigurationId, Model, ToolId};
use crate::ops::settings::copy_non_overridden;

/// Tools of `candidates` whose immediate superclass is `tool`.
pub fn dependent_tools(model: &Model, candidates: &[ToolId], tool: ToolId) -> Vec<ToolId> {
    let mut dependents: Vec<ToolId> = Vec::new();
    for candidate in candidates {
        if model.tool(*candidate).superclass() == Some(tool) && !dependents.contains(candidate) {
            dependents.push(*candidate);
        }
    }
    dependents
}

/// Every tool applying to any resource of the configuration, without repeats.
pub fn configuration_tools(model: &Model, configuration: ConfigurationId) -> Vec<ToolId> {
    let mut tools: Vec<ToolId> = Vec::new();
    for resource in model.configuration(configuration).resources() {
        for tool in model.resource_tools(*resource) {
            if !tools.contains(&tool) {
                tools.push(tool);
            }
        }
    }
    tools
}

/// Re-parent every direct child of `tool` in the configuration onto `tool`'s
/// superclass, copying down the values it took from `tool`. Returns the
/// disconnected tools.
pub fn disconnect_dependents(
    model: &mut Model,
    configuration: ConfigurationId,
    tool: ToolId,
) -> Vec<ToolId> {
    let candidates = configuration_tools(model, configuration);
    let dependents = dependent_tools(model, &candidates, tool);
    let superclass = model.tool(tool).superclass();

    for dependent in &dependents {
        copy_non_overridden(model, tool, *dependent);
        model.set_tool_superclass(*dependent, superclass);
        debug!(
            "disconnected `{}` from `{}`",
            model.tool(*dependent).id(),
            model.tool(tool).id()
        );
    }
    dependents
}

/// [`disconnect_dependents`] for several tools.
pub fn disconnect_all(model: &mut Model, configuration: ConfigurationId, tools: &[ToolId]) -> Vec<ToolId> {
    tools
        .iter()
        .flat_map(|tool| disconnect_dependents(model, configuration, *tool))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hierarchy;
    use crate::test_support::fixtures::gnu_project;

    #[test]
    fn test_disconnect_repoints_and_preserves_values() {
        let mut fixture = gnu_project();
        fixture.model.tool_mut(fixture.root_gcc).set_setting("opt", "-O2");
        fixture.model.tool_mut(fixture.root_gcc).set_setting("warnings", "-Wextra");

        let sub = fixture.add_sub_folder("src/net");
        let sub_gcc = fixture.model.resource_tools(sub)[0];
        fixture.model.tool_mut(sub_gcc).set_setting("warnings", "-Werror");
        assert_eq!(fixture.model.tool(sub_gcc).superclass(), Some(fixture.root_gcc));

        let disconnected =
            disconnect_dependents(&mut fixture.model, fixture.configuration, fixture.root_gcc);

        assert_eq!(disconnected, vec![sub_gcc]);
        assert_eq!(
            fixture.model.tool(sub_gcc).superclass(),
            fixture.model.tool(fixture.root_gcc).superclass()
        );
        assert!(!hierarchy::is_ancestor(&fixture.model, sub_gcc, fixture.root_gcc));
        assert_eq!(fixture.model.setting(sub_gcc, "opt"), Some("-O2"));
        assert_eq!(fixture.model.setting(sub_gcc, "warnings"), Some("-Werror"));
    }

    #[test]
    fn test_every_direct_child_is_disconnected() {
        let mut fixture = gnu_project();
        let a = fixture.add_sub_folder("a");
        let b = fixture.add_sub_folder("b");
        let a_gcc = fixture.model.resource_tools(a)[0];
        let b_gcc = fixture.model.resource_tools(b)[0];

        let disconnected =
            disconnect_dependents(&mut fixture.model, fixture.configuration, fixture.root_gcc);
        assert_eq!(disconnected, vec![a_gcc, b_gcc]);
    }

    #[test]
    fn test_grandchildren_are_not_dependents() {
        let fixture = gnu_project();
        let candidates = fixture.root_tools();
        assert!(dependent_tools(&fixture.model, &candidates, fixture.c_base).is_empty());
        assert_eq!(
            dependent_tools(&fixture.model, &candidates, fixture.gcc),
            vec![fixture.root_gcc]
        );
    }
}
