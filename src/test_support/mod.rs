//! Test utilities and mocks for toolset unit tests.
//!
//! This module provides a shared project fixture, a scriptable converter and
//! a few assertion helpers.
//!
//! # Example
//!
//! ```rust,ignore
//! use toolset::test_support::{gnu_project, MockConverter};
//!
//! #[test]
//! fn test_example() {
//!     let mut fixture = gnu_project();
//!     let converter = MockConverter::failing("unsupported option");
//!     fixture.catalog.register_tool_converter(fixture.gcc, fixture.clang, converter.descriptor("broken"));
//!     // reconcile, resolve, inspect converter.runs() ...
//! }
//! ```

pub mod fixtures;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::catalog::{Catalog, ConversionError, ConversionRequest, Converter, ConverterDescriptor};
use crate::core::{BuildObject, Model};

// Re-export fixtures for convenience
pub use fixtures::*;

/// What a [`MockConverter`] does when it runs.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Create a child of the target definition, owned by the request's resource.
    Instantiate,
    /// Fail with the given message.
    Fail(String),
    /// Return the given object regardless of the request.
    Return(BuildObject),
}

/// Converter mock that counts its runs.
#[derive(Debug)]
pub struct MockConverter {
    behavior: MockBehavior,
    runs: AtomicUsize,
}

impl MockConverter {
    /// A mock instantiating the target tool.
    pub fn instantiating() -> Arc<Self> {
        Self::with_behavior(MockBehavior::Instantiate)
    }

    /// A mock that always fails.
    pub fn failing(message: impl Into<String>) -> Arc<Self> {
        Self::with_behavior(MockBehavior::Fail(message.into()))
    }

    /// A mock with the given behavior.
    pub fn with_behavior(behavior: MockBehavior) -> Arc<Self> {
        Arc::new(MockConverter {
            behavior,
            runs: AtomicUsize::new(0),
        })
    }

    /// Descriptor registering this mock under `id`.
    pub fn descriptor(self: &Arc<Self>, id: &str) -> ConverterDescriptor {
        ConverterDescriptor::new(id, self.clone())
    }

    /// How many times the converter ran.
    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }
}

impl Converter for MockConverter {
    fn convert(
        &self,
        model: &mut Model,
        catalog: &Catalog,
        request: &ConversionRequest,
    ) -> Result<BuildObject, ConversionError> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            MockBehavior::Instantiate => {
                let to = request.to.as_tool().ok_or_else(|| ConversionError::Unsupported {
                    converter: "mock".into(),
                    from: request.from.kind(),
                    to: request.to.kind(),
                })?;
                let owner = model.owner_for(request.resource);
                let id = catalog.child_id(model.tool(to).id());
                Ok(BuildObject::Tool(model.create_child_tool(to, owner, id)))
            }
            MockBehavior::Fail(message) => Err(ConversionError::Failed {
                converter: "mock".into(),
                message: message.clone(),
            }),
            MockBehavior::Return(object) => Ok(*object),
        }
    }
}

/// Write `manifest` to `project.toml` in a fresh temporary directory.
pub fn create_test_project(manifest: &str) -> tempfile::TempDir {
    let dir = tempfile::TempDir::new().expect("failed to create temp dir");
    std::fs::write(dir.path().join("project.toml"), manifest).expect("failed to write manifest");
    dir
}

/// Assertion helpers for tests.
pub mod assertions {
    use crate::core::{Model, ToolId};

    /// Assert that a result is Ok and return the value.
    pub fn assert_ok<T, E: std::fmt::Debug>(result: Result<T, E>) -> T {
        match result {
            Ok(v) => v,
            Err(e) => panic!("expected Ok, got Err: {:?}", e),
        }
    }

    /// Assert that a result is Err and return the error.
    pub fn assert_err<T: std::fmt::Debug, E>(result: Result<T, E>) -> E {
        match result {
            Ok(v) => panic!("expected Err, got Ok: {:?}", v),
            Err(e) => e,
        }
    }

    /// Assert that an error message contains a substring.
    pub fn assert_error_contains<T: std::fmt::Debug, E: std::fmt::Display>(
        result: Result<T, E>,
        substring: &str,
    ) {
        match result {
            Ok(v) => panic!("expected Err containing '{}', got Ok: {:?}", substring, v),
            Err(e) => {
                let msg = e.to_string();
                assert!(
                    msg.contains(substring),
                    "error '{}' does not contain '{}'",
                    msg,
                    substring
                );
            }
        }
    }

    /// Assert that `tool` customizes `superclass` directly.
    pub fn assert_child_of(model: &Model, tool: ToolId, superclass: ToolId) {
        assert_eq!(
            model.tool(tool).superclass(),
            Some(superclass),
            "`{}` does not derive from `{}`",
            model.tool(tool).id(),
            model.tool(superclass).id()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::assertions::*;
    use super::*;
    use crate::core::{Project, ROOT_PATH};

    #[test]
    fn test_mock_converter_instantiates_target() {
        let mut fixture = gnu_project();
        let converter = MockConverter::instantiating();
        let descriptor = converter.descriptor("mock");
        let request = ConversionRequest {
            from: BuildObject::Tool(fixture.root_gcc),
            to: BuildObject::Tool(fixture.clang),
            resource: fixture.root,
        };

        let produced = assert_ok(descriptor.execute(&mut fixture.model, &fixture.catalog, &request));
        let tool = produced.as_tool().unwrap();
        assert_child_of(&fixture.model, tool, fixture.clang);
        assert!(fixture.model.belongs_to(tool, fixture.root));
        assert_eq!(converter.runs(), 1);
    }

    #[test]
    fn test_mock_converter_failure() {
        let mut fixture = gnu_project();
        let converter = MockConverter::failing("unsupported option");
        let request = ConversionRequest {
            from: BuildObject::Tool(fixture.root_gcc),
            to: BuildObject::ToolChain(fixture.llvm_tc),
            resource: fixture.root,
        };

        assert_error_contains(
            converter.convert(&mut fixture.model, &fixture.catalog, &request),
            "unsupported option",
        );
    }

    #[test]
    fn test_create_test_project() {
        let dir = create_test_project(gnu_manifest());
        let project = assert_ok(Project::load(&dir.path().join("project.toml")));
        let cfg = assert_ok(project.model.find_configuration("debug"));
        assert_ok(project.model.find_resource(cfg, ROOT_PATH));
        assert_err(project.model.find_resource(cfg, "missing"));
    }
}
