//! Conflict and compatibility analysis of a resulting tool list.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use petgraph::unionfind::UnionFind;
use rayon::prelude::*;
use tracing::trace;

use crate::catalog::Catalog;
use crate::core::{ConfigurationId, Model, ResourceId, SupportedProperties, ToolId};
use crate::ops::status::{Findings, ModificationStatus};

/// Knobs for [`analyze`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisOptions {
    /// Build mode passed to the "supports build" predicates.
    pub managed: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        AnalysisOptions { managed: true }
    }
}

/// Analyse `tools` as the tool list of `resource`.
pub fn analyze(
    model: &Model,
    catalog: &Catalog,
    resource: ResourceId,
    tools: &[ToolId],
    options: &AnalysisOptions,
) -> ModificationStatus {
    let mut filtered: Vec<ToolId> = Vec::new();
    for tool in model.filter_tools(tools) {
        if !filtered.contains(&tool) {
            filtered.push(tool);
        }
    }

    let info = model.resource(resource);
    let configuration = info.configuration();
    let tool_chain_props = info
        .tool_chain()
        .and_then(|tc| model.tool_chain_supported_properties(tc));

    let mut findings = Findings {
        conflicting_tools: conflicting_tools(model, &filtered),
        ..Findings::default()
    };

    let cfg = model.configuration(configuration);
    for (prop, value) in cfg.properties() {
        let supported = tool_chain_props.map_or(true, |p| supports_value(p, prop, value))
            && filtered.iter().all(|tool| {
                model
                    .tool_supported_properties(*tool)
                    .map_or(true, |p| supports_value(p, prop, value))
            });
        if !supported {
            if cfg.is_required_property(prop) {
                findings
                    .unsupported_required_properties
                    .insert(prop.clone(), value.clone());
            } else {
                findings.unsupported_properties.insert(prop.clone(), value.clone());
            }
        }
        if !catalog.is_property_defined(prop) {
            findings.undefined_properties.insert(prop.clone());
        }
    }

    let declared = filtered
        .iter()
        .filter_map(|tool| model.tool_supported_properties(*tool))
        .chain(tool_chain_props);
    for props in declared {
        for prop in props.keys() {
            if !catalog.is_property_defined(prop) {
                findings.undefined_properties.insert(prop.clone());
            }
        }
    }

    if options.managed
        && cfg.is_managed_build_on()
        && model.configuration_supports_build(configuration, true)
    {
        for tool in tools {
            if !model.tool_supports_build(*tool, true)
                && !findings.non_managed_build_tools.contains(tool)
            {
                findings.non_managed_build_tools.push(*tool);
            }
        }
    }

    let status = ModificationStatus::from_findings(findings);
    trace!("analysis of `{}`: {}", info.path(), status.severity());
    status
}

/// A tool set that declares no value set for `prop` accepts every value.
fn supports_value(props: &SupportedProperties, prop: &str, value: &str) -> bool {
    props.get(prop).map_or(true, |values| values.contains(value))
}

/// Group tools whose input extensions overlap, directly or through another
/// tool of the group. Groups and their members keep the order of `tools`.
pub fn conflicting_tools(model: &Model, tools: &[ToolId]) -> Vec<Vec<ToolId>> {
    let exts: Vec<BTreeSet<String>> = tools
        .iter()
        .map(|tool| model.all_input_extensions(*tool))
        .collect();
    let mut sets = UnionFind::<usize>::new(tools.len());
    let mut conflicting = vec![false; tools.len()];

    for i in 0..tools.len() {
        for j in (i + 1)..tools.len() {
            if !exts[i].is_disjoint(&exts[j]) {
                sets.union(i, j);
                conflicting[i] = true;
                conflicting[j] = true;
            }
        }
    }

    let mut groups: Vec<Vec<ToolId>> = Vec::new();
    let mut group_of: HashMap<usize, usize> = HashMap::new();
    for (i, tool) in tools.iter().enumerate() {
        if !conflicting[i] {
            continue;
        }
        let root = sets.find(i);
        let idx = *group_of.entry(root).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[idx].push(*tool);
    }
    groups
}

/// Analyse every resource of a configuration against its current tools.
///
/// Resources are independent, so they are analysed in parallel.
pub fn analyze_configuration(
    model: &Model,
    catalog: &Catalog,
    configuration: ConfigurationId,
    options: &AnalysisOptions,
) -> BTreeMap<ResourceId, ModificationStatus> {
    model
        .configuration(configuration)
        .resources()
        .par_iter()
        .map(|resource| {
            let tools = model.resource_tools(*resource);
            (*resource, analyze(model, catalog, *resource, &tools, options))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Configuration, NatureFilter, Tool};
    use crate::ops::status::Severity;
    use crate::test_support::fixtures::gnu_project;

    #[test]
    fn test_current_root_is_clean() {
        let fixture = gnu_project();
        let status = analyze(
            &fixture.model,
            &fixture.catalog,
            fixture.root,
            &fixture.root_tools(),
            &AnalysisOptions::default(),
        );
        assert_eq!(status.severity(), Severity::Ok, "{:?}", status);
    }

    #[test]
    fn test_shared_c_input_conflicts() {
        let fixture = gnu_project();
        let mut tools = fixture.root_tools();
        tools.push(fixture.tcc);

        let status = analyze(
            &fixture.model,
            &fixture.catalog,
            fixture.root,
            &tools,
            &AnalysisOptions::default(),
        );
        assert_eq!(status.severity(), Severity::Warning);
        assert_eq!(status.conflicting_tools(), &[vec![fixture.root_gcc, fixture.tcc]]);
    }

    #[test]
    fn test_conflicts_are_transitive_and_symmetric() {
        let mut model = Model::new();
        let a = model.add_tool(Tool::extension("a", "A").with_inputs(["c"]));
        let b = model.add_tool(Tool::extension("b", "B").with_inputs(["c", "s"]));
        let c = model.add_tool(Tool::extension("c", "C").with_inputs(["s"]));
        let d = model.add_tool(Tool::extension("d", "D").with_inputs(["o"]));

        assert_eq!(conflicting_tools(&model, &[a, b, c, d]), vec![vec![a, b, c]]);
        assert_eq!(conflicting_tools(&model, &[c, b, a, d]), vec![vec![c, b, a]]);
        assert!(conflicting_tools(&model, &[a, c, d]).is_empty());
    }

    #[test]
    fn test_file_associations_extend_inputs() {
        let mut model = Model::new();
        model.associate("source.asm", ["s"]);
        let gas = model.add_tool(Tool::extension("gas", "GAS").with_inputs(["S"]).with_content_types(["source.asm"]));
        let nasm = model.add_tool(Tool::extension("nasm", "NASM").with_inputs(["s", "asm"]));
        assert_eq!(conflicting_tools(&model, &[gas, nasm]), vec![vec![gas, nasm]]);
    }

    #[test]
    fn test_unsupported_property_values() {
        let mut fixture = gnu_project();
        let release_only = fixture.model.add_tool(
            Tool::extension("release.c.compiler", "Release only")
                .with_inputs(["r"])
                .with_supported_property("buildType", ["release"]),
        );
        let mut tools = fixture.root_tools();
        tools.push(release_only);

        let status = analyze(
            &fixture.model,
            &fixture.catalog,
            fixture.root,
            &tools,
            &AnalysisOptions::default(),
        );
        assert_eq!(status.severity(), Severity::Warning);
        assert_eq!(status.unsupported_properties().get("buildType").map(String::as_str), Some("debug"));

        let cfg = fixture.model.add_configuration(
            Configuration::new("strict", "Strict").with_required_property("buildType", "debug"),
        );
        let root = fixture.model.add_folder(cfg, "/", fixture.tool_chain);
        let status = analyze(
            &fixture.model,
            &fixture.catalog,
            root,
            &tools,
            &AnalysisOptions::default(),
        );
        assert_eq!(status.severity(), Severity::Error);
        assert!(status.unsupported_required_properties().contains_key("buildType"));
    }

    #[test]
    fn test_undefined_property_warns() {
        let mut fixture = gnu_project();
        let odd = fixture.model.add_tool(
            Tool::extension("odd", "Odd")
                .with_inputs(["odd"])
                .with_supported_property("optimization", ["none"]),
        );
        let mut tools = fixture.root_tools();
        tools.push(odd);

        let status = analyze(
            &fixture.model,
            &fixture.catalog,
            fixture.root,
            &tools,
            &AnalysisOptions::default(),
        );
        assert_eq!(status.severity(), Severity::Warning);
        assert!(status.undefined_properties().contains("optimization"));
    }

    #[test]
    fn test_non_managed_tools_only_flagged_in_managed_mode() {
        let mut fixture = gnu_project();
        let legacy = fixture.model.add_tool(
            Tool::extension("legacy", "Legacy")
                .with_inputs(["l"])
                .with_managed_build(false),
        );
        let mut tools = fixture.root_tools();
        tools.push(legacy);

        let managed = analyze(
            &fixture.model,
            &fixture.catalog,
            fixture.root,
            &tools,
            &AnalysisOptions::default(),
        );
        assert_eq!(managed.severity(), Severity::Error);
        assert_eq!(managed.non_managed_build_tools(), &[legacy]);

        let unmanaged = analyze(
            &fixture.model,
            &fixture.catalog,
            fixture.root,
            &tools,
            &AnalysisOptions { managed: false },
        );
        assert_eq!(unmanaged.severity(), Severity::Ok);
    }

    #[test]
    fn test_configuration_analysis_covers_every_resource() {
        let mut fixture = gnu_project();
        let sub = fixture.add_sub_folder("src/net");
        let statuses = analyze_configuration(
            &fixture.model,
            &fixture.catalog,
            fixture.configuration,
            &AnalysisOptions::default(),
        );
        assert_eq!(statuses.len(), 2);
        assert!(statuses[&fixture.root].is_ok());
        assert!(statuses[&sub].is_ok());
    }

    #[test]
    fn test_current_non_managed_tool_is_reported() {
        let mut fixture = gnu_project();
        let legacy = fixture.model.add_tool(
            Tool::extension("legacy", "Legacy")
                .with_inputs(["l"])
                .with_managed_build(false),
        );
        let mut tools = fixture.root_tools();
        tools.push(legacy);
        fixture.model.set_resource_tools(fixture.root, tools);

        let statuses = analyze_configuration(
            &fixture.model,
            &fixture.catalog,
            fixture.configuration,
            &AnalysisOptions::default(),
        );
        let root = &statuses[&fixture.root];
        assert_eq!(root.severity(), Severity::Error);
        assert_eq!(root.non_managed_build_tools(), &[legacy]);
    }

    #[test]
    fn test_non_managed_file_tool_does_not_hide_root_findings() {
        let mut fixture = gnu_project();
        let legacy = fixture.model.add_tool(
            Tool::extension("legacy", "Legacy")
                .with_inputs(["l"])
                .with_managed_build(false),
        );
        let other = fixture.model.add_tool(
            Tool::extension("legacy2", "Legacy 2")
                .with_inputs(["l2"])
                .with_managed_build(false),
        );
        let file = fixture
            .model
            .add_file(fixture.configuration, "src/old.l", vec![legacy]);

        let mut tools = fixture.root_tools();
        tools.push(other);
        let status = analyze(
            &fixture.model,
            &fixture.catalog,
            fixture.root,
            &tools,
            &AnalysisOptions::default(),
        );
        assert_eq!(status.severity(), Severity::Error);
        assert_eq!(status.non_managed_build_tools(), &[other]);

        let statuses = analyze_configuration(
            &fixture.model,
            &fixture.catalog,
            fixture.configuration,
            &AnalysisOptions::default(),
        );
        assert_eq!(statuses[&file].non_managed_build_tools(), &[legacy]);
        assert!(statuses[&fixture.root].is_ok());
    }

    #[test]
    fn test_non_managed_scan_ignores_nature_filter() {
        let mut fixture = gnu_project();
        let cxx_only = fixture.model.add_tool(
            Tool::extension("legacy.cxx", "Legacy C++")
                .with_inputs(["cpp"])
                .with_nature(NatureFilter::Cxx)
                .with_managed_build(false),
        );
        let mut tools = fixture.root_tools();
        tools.push(cxx_only);

        let status = analyze(
            &fixture.model,
            &fixture.catalog,
            fixture.root,
            &tools,
            &AnalysisOptions::default(),
        );
        assert_eq!(status.severity(), Severity::Error);
        assert_eq!(status.non_managed_build_tools(), &[cxx_only]);
        assert!(status.conflicting_tools().is_empty());
    }
}
