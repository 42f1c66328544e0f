//! `toolset check` command

use std::collections::BTreeMap;

use anyhow::Result;
use serde::Serialize;

use crate::cli::CheckArgs;
use crate::commands::{emit_status, print_json, tool_names, Session, StatusView};
use toolset::ops::{analyze_configuration, Severity};

#[derive(Debug, Serialize)]
struct CheckReport {
    configuration: String,
    severity: Severity,
    resources: BTreeMap<String, StatusView>,
}

/// Returns `false` when any resource reports an error.
pub fn execute(args: CheckArgs, color: bool) -> Result<bool> {
    let session = Session::open(&args.project, color)?;
    let model = &session.project.model;
    let analysis = session.config.analysis_options();

    let statuses = analyze_configuration(
        model,
        &session.project.catalog,
        session.configuration,
        &analysis,
    );
    let severity = statuses
        .values()
        .map(|s| s.severity())
        .max()
        .unwrap_or_default();

    if session.json {
        let report = CheckReport {
            configuration: model.configuration(session.configuration).id().to_string(),
            severity,
            resources: statuses
                .iter()
                .map(|(resource, status)| {
                    (
                        model.resource(*resource).path().to_string(),
                        StatusView::new(model, status),
                    )
                })
                .collect(),
        };
        print_json(&report)?;
        return Ok(severity != Severity::Error);
    }

    for (resource, status) in &statuses {
        let info = model.resource(*resource);
        println!(
            "{:<7} {} [{}]",
            status.severity().to_string(),
            info.path(),
            tool_names(model, &model.resource_tools(*resource))
        );
        emit_status(model, status, session.color);
    }
    println!("{} resources checked, worst severity: {}", statuses.len(), severity);

    Ok(severity != Severity::Error)
}
