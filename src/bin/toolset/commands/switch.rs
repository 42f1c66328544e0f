//! `toolset switch` command

use anyhow::{anyhow, Result};
use serde::Serialize;

use crate::cli::SwitchArgs;
use crate::commands::{emit_status, print_json, tool_names, Session, StatusView};
use toolset::core::Project;
use toolset::ops::{analyze, change_tool_chain};

#[derive(Debug, Serialize)]
struct SwitchReport {
    resource: String,
    changed: bool,
    tool_chain: String,
    tools: Vec<String>,
    status: StatusView,
}

pub fn execute(args: SwitchArgs, color: bool) -> Result<()> {
    let mut session = Session::open(&args.project, color)?;
    let folder = session.resource(&args.resource)?;
    let analysis = session.config.analysis_options();

    let Project { model, catalog } = &mut session.project;
    let target = model.require_tool_chain(&args.tool_chain).map_err(|e| {
        anyhow!("{}\nhelp: Tool-chains are declared with [[tool_chain]] in the manifest", e)
    })?;

    let previous = model.folder_tool_chain(folder)?;
    let tool_chain = change_tool_chain(model, catalog, folder, target)?;
    let tools = model.resource_tools(folder);
    let status = analyze(model, catalog, folder, &tools, &analysis);

    let report = SwitchReport {
        resource: args.resource.clone(),
        changed: tool_chain != previous,
        tool_chain: model.tool_chain(tool_chain).id().to_string(),
        tools: tools.iter().map(|t| model.tool(*t).id().to_string()).collect(),
        status: StatusView::new(model, &status),
    };

    if session.json {
        return print_json(&report);
    }

    if report.changed {
        println!("`{}` now uses `{}`", report.resource, report.tool_chain);
    } else {
        println!(
            "`{}` already uses a tool-chain compatible with `{}`",
            report.resource, args.tool_chain
        );
    }
    println!("tools: {}", tool_names(model, &tools));
    emit_status(model, &status, session.color);
    Ok(())
}
