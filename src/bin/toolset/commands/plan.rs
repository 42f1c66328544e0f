//! `toolset plan` command

use anyhow::Result;
use serde::Serialize;

use crate::cli::PlanArgs;
use crate::commands::{emit_status, print_json, tool_ids, tool_names, Session, StatusView};
use toolset::catalog::Catalog;
use toolset::core::{Model, Project};
use toolset::ops::{
    reconcile_delta, reconcile_with, ChangeKind, Severity, ToolInfo, ToolListModificationInfo,
};
use toolset::util::diagnostic::{self, suggestions, Diagnostic};

#[derive(Debug, Serialize)]
struct PlanReport {
    configuration: String,
    resource: String,
    changed: bool,
    entries: Vec<EntryView>,
    removed: Vec<EntryView>,
    status: StatusView,
    #[serde(skip_serializing_if = "Option::is_none")]
    applied: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct EntryView {
    kind: ChangeKind,
    tool: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    resulting: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    converter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    best_match: Option<String>,
    severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl EntryView {
    fn new(model: &mut Model, catalog: &Catalog, plan: &ToolListModificationInfo<'_>, entry: &ToolInfo) -> Self {
        let resolution = entry.resolve(model, catalog, plan.converters());
        EntryView {
            kind: entry.kind(),
            tool: model.tool(entry.tool()).id().to_string(),
            resulting: resolution
                .tool
                .filter(|t| *t != entry.tool())
                .map(|t| model.tool(t).id().to_string()),
            converter: entry
                .pairing()
                .map(|p| plan.converters()[p.converter].descriptor().id().to_string()),
            best_match: entry.best_match().map(|t| model.tool(t).id().to_string()),
            severity: resolution.status.severity(),
            message: resolution.status.message().map(str::to_string),
        }
    }

    fn print(&self) {
        let mut line = format!("  {:<9} {}", self.kind.to_string(), self.tool);
        if let Some(resulting) = &self.resulting {
            line.push_str(&format!(" -> {}", resulting));
        }
        if let Some(converter) = &self.converter {
            line.push_str(&format!(" (converter `{}`)", converter));
        }
        if let Some(best_match) = &self.best_match {
            line.push_str(&format!(" (settings from `{}`)", best_match));
        }
        if self.severity != Severity::Ok {
            if let Some(message) = &self.message {
                line.push_str(&format!(" [{}: {}]", self.severity, message));
            }
        }
        println!("{}", line);
    }
}

pub fn execute(args: PlanArgs, color: bool) -> Result<()> {
    let mut session = Session::open(&args.project, color)?;
    let resource = session.resource(&args.resource)?;

    let mut options = session.config.reconcile_options();
    if args.no_converters {
        options.converters = false;
    }
    let analysis = session.config.analysis_options();
    let configuration = session
        .project
        .model
        .configuration(session.configuration)
        .id()
        .to_string();

    let Project { model, catalog } = &mut session.project;
    let catalog: &Catalog = catalog;
    let from = model.resource_tools(resource);

    let plan = match &args.to {
        Some(to) => {
            let to = tool_ids(model, to)?;
            reconcile_with(model, catalog, resource, &from, &to, &options)
        }
        None => {
            let added = tool_ids(model, &args.add)?;
            let removed = tool_ids(model, &args.remove)?;
            reconcile_delta(model, catalog, resource, &from, &added, &removed, &options)
        }
    };

    let status = plan.report(model, &analysis);
    let entries: Vec<EntryView> = plan
        .resulting_infos()
        .iter()
        .map(|entry| EntryView::new(model, catalog, &plan, entry))
        .collect();
    let removed: Vec<EntryView> = plan
        .removed_infos()
        .iter()
        .map(|entry| EntryView::new(model, catalog, &plan, entry))
        .collect();
    let changed = plan.is_changed();

    let applied = if args.apply {
        Some(plan.apply(model).map_err(|e| {
            anyhow::anyhow!("{}\n{}", e, suggestions::NOT_APPLIED)
        })?)
    } else {
        None
    };

    let report = PlanReport {
        configuration,
        resource: args.resource.clone(),
        changed,
        entries,
        removed,
        status: StatusView::new(model, &status),
        applied: applied
            .as_ref()
            .map(|tools| tools.iter().map(|t| model.tool(*t).id().to_string()).collect()),
    };

    if session.json {
        return print_json(&report);
    }

    println!(
        "plan for `{}` (configuration `{}`)",
        report.resource, report.configuration
    );
    if !report.changed {
        println!("  no changes");
    }
    for entry in report.entries.iter().chain(&report.removed) {
        entry.print();
    }
    println!("status: {}", report.status.severity);
    emit_status(model, &status, session.color);

    if let Some(tools) = &applied {
        println!("applied: {}", tool_names(model, tools));
    } else if report.changed {
        let hint = Diagnostic::note("nothing was changed")
            .with_suggestion("Re-run with --apply to commit the plan");
        diagnostic::emit(&hint, session.color);
    }
    Ok(())
}
