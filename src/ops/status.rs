//! ModificationStatus - the outcome of a proposed tool modification.
//!
//! Expected problems (removed tools, conflicting inputs, unsupported
//! properties) are data here rather than errors; callers inspect the
//! severity and decide whether to apply.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;

use crate::core::{Model, ToolId};
use crate::util::diagnostic::Diagnostic;

/// Message of the status attached to every removed tool.
pub const TOOL_REMOVED: &str = "the tool is removed";

/// Message prefix of the status attached to a failed conversion.
pub const CONVERSION_FAILURE: &str = "conversion failure";

/// Severity of a modification outcome, ordered from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Ok,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Ok => write!(f, "ok"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Immutable classification of a modification outcome.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ModificationStatus {
    severity: Severity,
    message: Option<String>,
    unsupported_required_properties: BTreeMap<String, String>,
    unsupported_properties: BTreeMap<String, String>,
    undefined_properties: BTreeSet<String>,
    conflicting_tools: Vec<Vec<ToolId>>,
    non_managed_build_tools: Vec<ToolId>,
    failures: Vec<String>,
}

/// Raw findings an analysis collected, turned into a status by
/// [`ModificationStatus::from_findings`].
#[derive(Debug, Clone, Default)]
pub struct Findings {
    /// Required property id -> configured value no tool supports.
    pub unsupported_required_properties: BTreeMap<String, String>,
    /// Optional property id -> configured value no tool supports.
    pub unsupported_properties: BTreeMap<String, String>,
    /// Property ids referenced by tools but not defined by the catalog.
    pub undefined_properties: BTreeSet<String>,
    /// Groups of tools claiming overlapping input extensions.
    pub conflicting_tools: Vec<Vec<ToolId>>,
    /// Tools that cannot take part in a managed build.
    pub non_managed_build_tools: Vec<ToolId>,
    /// Entries of the modification that could not be resolved.
    pub failures: Vec<String>,
}

impl ModificationStatus {
    /// A successful outcome.
    pub fn ok() -> Self {
        ModificationStatus::default()
    }

    /// A failed outcome described by `message`.
    pub fn error(message: impl Into<String>) -> Self {
        ModificationStatus {
            severity: Severity::Error,
            message: Some(message.into()),
            ..ModificationStatus::default()
        }
    }

    /// Classify analysis findings.
    ///
    /// ERROR if a required property is unsupported, a tool cannot take part
    /// in the managed build or an entry failed to resolve; WARNING for unsupported optional properties,
    /// undefined properties and input conflicts; OK otherwise.
    pub fn from_findings(findings: Findings) -> Self {
        let severity = if !findings.unsupported_required_properties.is_empty()
            || !findings.non_managed_build_tools.is_empty()
            || !findings.failures.is_empty()
        {
            Severity::Error
        } else if !findings.unsupported_properties.is_empty()
            || !findings.undefined_properties.is_empty()
            || !findings.conflicting_tools.is_empty()
        {
            Severity::Warning
        } else {
            Severity::Ok
        };

        ModificationStatus {
            severity,
            message: None,
            unsupported_required_properties: findings.unsupported_required_properties,
            unsupported_properties: findings.unsupported_properties,
            undefined_properties: findings.undefined_properties,
            conflicting_tools: findings.conflicting_tools,
            non_managed_build_tools: findings.non_managed_build_tools,
            failures: findings.failures,
        }
    }

    /// Severity of the outcome.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Whether the outcome is OK.
    pub fn is_ok(&self) -> bool {
        self.severity == Severity::Ok
    }

    /// Free-form message, for single-entry statuses.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Required properties whose configured value is not supported.
    pub fn unsupported_required_properties(&self) -> &BTreeMap<String, String> {
        &self.unsupported_required_properties
    }

    /// Optional properties whose configured value is not supported.
    pub fn unsupported_properties(&self) -> &BTreeMap<String, String> {
        &self.unsupported_properties
    }

    /// Property ids referenced but not defined.
    pub fn undefined_properties(&self) -> &BTreeSet<String> {
        &self.undefined_properties
    }

    /// Groups of mutually or transitively conflicting tools.
    pub fn conflicting_tools(&self) -> &[Vec<ToolId>] {
        &self.conflicting_tools
    }

    /// Tools that cannot take part in a managed build.
    pub fn non_managed_build_tools(&self) -> &[ToolId] {
        &self.non_managed_build_tools
    }

    /// Messages of the entries that failed to resolve.
    pub fn failures(&self) -> &[String] {
        &self.failures
    }

    /// Render the findings as user-facing diagnostics.
    pub fn to_diagnostics(&self, model: &Model) -> Vec<Diagnostic> {
        let names = |tools: &[ToolId]| {
            tools
                .iter()
                .map(|t| format!("`{}`", model.tool(*t).id()))
                .collect::<Vec<_>>()
                .join(", ")
        };
        let mut diags = Vec::new();

        if let Some(message) = &self.message {
            diags.push(match self.severity {
                Severity::Error => Diagnostic::error(message.clone()),
                _ => Diagnostic::warning(message.clone()),
            });
        }

        for failure in &self.failures {
            diags.push(Diagnostic::error(failure.clone()));
        }

        for (prop, value) in &self.unsupported_required_properties {
            diags.push(
                Diagnostic::error(format!("required property `{}` = `{}` is not supported", prop, value))
                    .with_suggestion("Pick tools that support the configured value, or change the property"),
            );
        }

        for (prop, value) in &self.unsupported_properties {
            diags.push(Diagnostic::warning(format!(
                "property `{}` = `{}` is not supported",
                prop, value
            )));
        }

        for prop in &self.undefined_properties {
            diags.push(
                Diagnostic::warning(format!("property `{}` is not defined", prop))
                    .with_suggestion("Define the property in the catalog"),
            );
        }

        for group in &self.conflicting_tools {
            let mut exts: Option<BTreeSet<String>> = None;
            for tool in group {
                let tool_exts = model.all_input_extensions(*tool);
                exts = Some(match exts {
                    None => tool_exts,
                    Some(acc) => acc.union(&tool_exts).cloned().collect(),
                });
            }
            diags.push(
                Diagnostic::warning(format!("tools {} claim the same input files", names(group)))
                    .with_context(format!(
                        "input extensions: {}",
                        exts.unwrap_or_default().into_iter().collect::<Vec<_>>().join(", ")
                    ))
                    .with_suggestion("Remove one of the conflicting tools"),
            );
        }

        if !self.non_managed_build_tools.is_empty() {
            diags.push(
                Diagnostic::error(format!(
                    "tools {} do not support the managed build",
                    names(&self.non_managed_build_tools)
                ))
                .with_suggestion("Disable the managed build or choose other tools"),
            );
        }

        diags
    }
}

impl fmt::Display for ModificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{}: {}", self.severity, message),
            None => write!(f, "{}", self.severity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Tool;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Ok < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
        assert_eq!(
            [Severity::Warning, Severity::Error, Severity::Ok].into_iter().max(),
            Some(Severity::Error)
        );
    }

    #[test]
    fn test_findings_escalate_severity() {
        assert_eq!(ModificationStatus::from_findings(Findings::default()).severity(), Severity::Ok);

        let mut findings = Findings::default();
        findings.undefined_properties.insert("buildType".into());
        assert_eq!(ModificationStatus::from_findings(findings.clone()).severity(), Severity::Warning);

        findings
            .unsupported_required_properties
            .insert("artifactType".into(), "sharedLib".into());
        assert_eq!(ModificationStatus::from_findings(findings).severity(), Severity::Error);
    }

    #[test]
    fn test_conflict_diagnostic_lists_tools_and_extensions() {
        let mut model = Model::new();
        let gcc = model.add_tool(Tool::extension("gcc", "GCC").with_inputs(["c"]));
        let tcc = model.add_tool(Tool::extension("tcc", "TCC").with_inputs(["c", "h"]));

        let status = ModificationStatus::from_findings(Findings {
            conflicting_tools: vec![vec![gcc, tcc]],
            ..Findings::default()
        });
        let diags = status.to_diagnostics(&model);
        assert_eq!(diags.len(), 1);

        let text = diags[0].format(false);
        assert!(text.contains("warning: tools `gcc`, `tcc` claim the same input files"));
        assert!(text.contains("input extensions: c, h"));
    }

    #[test]
    fn test_error_status_display() {
        let status = ModificationStatus::error(TOOL_REMOVED);
        assert_eq!(status.to_string(), "error: the tool is removed");
        assert!(!status.is_ok());
    }
}
