//! High-level operations.
//!
//! This module contains the tool list reconciliation engine and the
//! operations built on it: analysis, applying a modification, disconnecting
//! dependents and replacing a folder's tool-chain.

pub mod analyze;
pub mod converter_info;
pub mod disconnect;
pub mod modification;
pub mod reconcile;
pub mod settings;
pub mod status;
pub mod target_tools;
pub mod tool_chain_change;
pub mod tool_info;

pub use analyze::{analyze, analyze_configuration, conflicting_tools, AnalysisOptions};
pub use converter_info::ConverterInfo;
pub use disconnect::{configuration_tools, dependent_tools, disconnect_all, disconnect_dependents};
pub use modification::{ModificationError, ToolListModificationInfo};
pub use reconcile::{reconcile, reconcile_delta, reconcile_with, ReconcileOptions};
pub use settings::{copy_common_settings, instantiate_tool_chain, CopySettingsConverter};
pub use status::{ModificationStatus, Severity};
pub use target_tools::{adjust_target_tools, find_compatible_target_tool};
pub use tool_chain_change::{change_tool_chain, is_tool_chain_compatible};
pub use tool_info::{ChangeKind, Pairing, ToolInfo};
